use clap::Parser;
use colored::*;
use mitoharvest::cli::{Cli, Commands};
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    // Initialize logging with MITOHARVEST_LOG environment variable support
    let log_level = std::env::var("MITOHARVEST_LOG").unwrap_or_else(|_| "info".to_string());

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level)),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);

        let exit_code = match e.downcast_ref::<mitoharvest::HarvestError>() {
            Some(mitoharvest::HarvestError::Config(_)) => 2,
            Some(mitoharvest::HarvestError::Io(_)) => 3,
            Some(mitoharvest::HarvestError::Parse(_)) => 4,
            Some(mitoharvest::HarvestError::Http(_))
            | Some(mitoharvest::HarvestError::Entrez(_)) => 5,
            _ => 1,
        };
        process::exit(exit_code);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let num_threads = if cli.threads == 0 {
        num_cpus::get()
    } else {
        cli.threads
    };

    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()
        .expect("Failed to initialize thread pool");

    if cli.verbose > 0 {
        eprintln!("Using {} threads", num_threads);
    }

    match cli.command {
        Commands::Harvest(args) => mitoharvest::cli::commands::harvest::run(args),
        Commands::Extract(args) => mitoharvest::cli::commands::extract::run(args),
        Commands::Combine(args) => mitoharvest::cli::commands::combine::run(args),
    }
}
