use crate::bio::fasta::combine_fasta;
use anyhow::{Context, Result};
use clap::Args;
use colored::*;
use std::path::PathBuf;

#[derive(Args)]
pub struct CombineArgs {
    /// FASTA files to merge, in order
    #[arg(required = true, value_name = "FILE")]
    pub inputs: Vec<PathBuf>,

    /// Merged output file
    #[arg(short, long, default_value = "combined.fasta")]
    pub output: PathBuf,
}

pub fn run(args: CombineArgs) -> Result<()> {
    let count = combine_fasta(&args.inputs, &args.output)
        .with_context(|| format!("failed to combine into {}", args.output.display()))?;

    println!(
        "{} {} file(s) ({} record(s)) into {}",
        "Combined".green().bold(),
        args.inputs.len(),
        count,
        args.output.display()
    );
    Ok(())
}
