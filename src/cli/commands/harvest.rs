use crate::bio::fasta::append_fasta;
use crate::bio::genbank::{accession_of, extract_co1, split_records};
use crate::download::entrez::{EntrezClient, DEFAULT_DELAY_SECS};
use crate::report::{RunSummary, TaxonSummary};
use crate::storage::{archive_record, OutputLayout};
use anyhow::{Context, Result};
use clap::Args;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Args)]
pub struct HarvestArgs {
    /// Taxon to harvest: NCBI taxonomy ID or scientific name (repeatable)
    #[arg(short, long = "taxon", value_name = "TAXON", required = true)]
    pub taxa: Vec<String>,

    /// Output directory for archives, FASTA files, and the summary
    #[arg(short, long, default_value = "mitoharvest_out")]
    pub output: PathBuf,

    /// Cap on records retrieved per taxon (0 = no cap)
    #[arg(long, default_value = "0")]
    pub max_records: u64,

    /// Records requested per efetch call
    #[arg(long, default_value = "100")]
    pub batch_size: u64,

    /// Contact email forwarded to NCBI
    #[arg(long, env = "NCBI_EMAIL")]
    pub email: Option<String>,

    /// NCBI API key (raises the allowed request rate)
    #[arg(long, env = "NCBI_API_KEY")]
    pub api_key: Option<String>,

    /// Seconds to wait between E-utilities requests
    #[arg(long, default_value_t = DEFAULT_DELAY_SECS)]
    pub delay: f64,

    /// Skip records whose archive file already exists
    #[arg(long)]
    pub resume: bool,
}

pub fn run(args: HarvestArgs) -> Result<()> {
    if args.batch_size == 0 {
        anyhow::bail!("--batch-size must be at least 1");
    }

    let client = EntrezClient::new(args.email.clone(), args.api_key.clone(), args.delay)?;
    let layout = OutputLayout::new(&args.output);
    std::fs::create_dir_all(layout.root())
        .with_context(|| format!("failed to create {}", layout.root().display()))?;

    let mut summary = RunSummary::new();
    for taxon in &args.taxa {
        // Collaborator failures are caught per taxon so one bad group does
        // not abort the run.
        match harvest_taxon(&client, &layout, taxon, &args) {
            Ok(row) => {
                println!(
                    "{} taxid{}: {} found, {} retrieved, {} extracted",
                    "Done".green().bold(),
                    row.taxid,
                    row.found,
                    row.retrieved,
                    row.extracted
                );
                summary.push(row);
            }
            Err(e) => {
                warn!(taxon = %taxon, error = %e, "taxon failed");
                eprintln!("{} taxon {}: {}", "Skipping".yellow().bold(), taxon, e);
            }
        }
    }

    summary.write_csv(&layout.summary_path())?;
    println!(
        "Wrote {} ({} CO1 region(s) total)",
        layout.summary_path().display(),
        summary.total_extracted()
    );
    Ok(())
}

fn harvest_taxon(
    client: &EntrezClient,
    layout: &OutputLayout,
    taxon: &str,
    args: &HarvestArgs,
) -> Result<TaxonSummary> {
    let taxid = client.resolve_taxid(taxon)?;
    layout.prepare_taxon(&taxid)?;

    let query = EntrezClient::co1_query(&taxid);
    let found = client.search_count(&query)?;
    info!(taxid = %taxid, found, "search complete");

    let target = if args.max_records > 0 {
        found.min(args.max_records)
    } else {
        found
    };

    let pb = ProgressBar::new(target);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} taxid{msg} [{bar:40.cyan/blue}] {pos}/{len}")
            .unwrap(),
    );
    pb.set_message(taxid.clone());

    let gb_dir = layout.genbank_dir(&taxid);
    let fasta_path = layout.fasta_path(&taxid);

    let mut retrieved = 0u64;
    let mut extracted = 0u64;
    let mut fallback_index = 0u64;
    let mut retstart = 0u64;

    while retstart < target {
        let page = args.batch_size.min(target - retstart);
        let ids = client.search_ids(&query, retstart, page)?;
        if ids.is_empty() {
            break;
        }
        let payload = client.fetch_records(&ids)?;

        for record in split_records(&payload) {
            let record_id = accession_of(&record).unwrap_or_else(|| {
                fallback_index += 1;
                format!("taxid{}_record{}", taxid, fallback_index)
            });

            let archived = archive_record(&gb_dir, &record_id, &record)?;
            if !archived && args.resume {
                // Already harvested in a previous run; its FASTA pairs are
                // in place too.
                pb.inc(1);
                continue;
            }
            retrieved += 1;

            let pairs = extract_co1(&record, &record_id);
            if !pairs.is_empty() {
                append_fasta(&fasta_path, &pairs)?;
            }
            extracted += pairs.len() as u64;
            pb.inc(1);
        }

        retstart += page;
    }

    pb.finish_and_clear();
    Ok(TaxonSummary {
        taxid,
        found,
        retrieved,
        extracted,
    })
}
