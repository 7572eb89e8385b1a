pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "mitoharvest",
    version,
    about = "CO1 barcode harvesting from NCBI GenBank records",
    long_about = "Mitoharvest queries the NCBI Entrez nucleotide database per taxon, archives \
                  the returned GenBank records, and extracts the annotated CO1 (cytochrome c \
                  oxidase subunit 1) regions as FASTA, reverse-complemented when the feature \
                  sits on the complementary strand."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Number of threads to use (0 = all available)
    #[arg(short = 'j', long, default_value = "0", global = true)]
    pub threads: usize,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search, fetch, and extract CO1 regions for one or more taxa
    Harvest(commands::harvest::HarvestArgs),

    /// Extract CO1 regions from local GenBank files
    Extract(commands::extract::ExtractArgs),

    /// Combine FASTA files into one
    Combine(commands::combine::CombineArgs),
}
