use crate::bio::fasta::write_fasta;
use crate::bio::genbank::{accession_of, extract_co1, split_records};
use crate::bio::sequence::FastaRecord;
use anyhow::{Context, Result};
use clap::Args;
use colored::*;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

#[derive(Args)]
pub struct ExtractArgs {
    /// GenBank flat files to scan
    #[arg(required = true, value_name = "FILE")]
    pub inputs: Vec<PathBuf>,

    /// Combined output FASTA
    #[arg(short, long, default_value = "co1.fasta")]
    pub output: PathBuf,
}

pub fn run(args: ExtractArgs) -> Result<()> {
    // Records are independent, so files fan out across the thread pool;
    // par_iter keeps input order in the collected result.
    let per_file: Result<Vec<Vec<FastaRecord>>> = args
        .inputs
        .par_iter()
        .map(|path| extract_file(path))
        .collect();
    let pairs: Vec<FastaRecord> = per_file?.into_iter().flatten().collect();

    write_fasta(&args.output, &pairs)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    println!(
        "{} {} CO1 region(s) from {} file(s) into {}",
        "Extracted".green().bold(),
        pairs.len(),
        args.inputs.len(),
        args.output.display()
    );
    Ok(())
}

fn extract_file(path: &Path) -> Result<Vec<FastaRecord>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("record");

    let mut pairs = Vec::new();
    for (index, record) in split_records(&text).iter().enumerate() {
        let id = accession_of(record).unwrap_or_else(|| {
            if index == 0 {
                stem.to_string()
            } else {
                format!("{}_{}", stem, index + 1)
            }
        });
        pairs.extend(extract_co1(record, &id));
    }
    Ok(pairs)
}
