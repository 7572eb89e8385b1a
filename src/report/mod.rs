//! Run summary: one CSV row per processed taxon.

use anyhow::{Context, Result};
use std::path::Path;

#[derive(Debug, Clone)]
pub struct TaxonSummary {
    pub taxid: String,
    /// Search hits reported by esearch.
    pub found: u64,
    /// Records actually fetched and archived.
    pub retrieved: u64,
    /// FASTA pairs extracted from those records.
    pub extracted: u64,
}

#[derive(Debug, Default)]
pub struct RunSummary {
    rows: Vec<TaxonSummary>,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: TaxonSummary) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[TaxonSummary] {
        &self.rows
    }

    pub fn total_extracted(&self) -> u64 {
        self.rows.iter().map(|r| r.extracted).sum()
    }

    pub fn to_csv(&self) -> String {
        use std::fmt::Write;

        let mut output = String::new();
        // writeln! into a String cannot fail
        let _ = writeln!(&mut output, "taxid,found,retrieved,extracted");
        for row in &self.rows {
            let _ = writeln!(
                &mut output,
                "{},{},{},{}",
                row.taxid, row.found, row.retrieved, row.extracted
            );
        }
        output
    }

    pub fn write_csv(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_csv())
            .with_context(|| format!("failed to write summary {}", path.display()))
    }
}
