//! Filesystem layout for a harvest run:
//!
//! ```text
//! <out>/genbank/taxid<ID>/<accession>.gb   raw record archive
//! <out>/fasta/taxid<ID>.fasta              per-taxon extractions
//! <out>/summary.csv                        per-taxon counts
//! ```

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn genbank_dir(&self, taxid: &str) -> PathBuf {
        self.root.join("genbank").join(format!("taxid{}", taxid))
    }

    pub fn fasta_path(&self, taxid: &str) -> PathBuf {
        self.root.join("fasta").join(format!("taxid{}.fasta", taxid))
    }

    pub fn summary_path(&self) -> PathBuf {
        self.root.join("summary.csv")
    }

    pub fn prepare_taxon(&self, taxid: &str) -> Result<()> {
        let gb_dir = self.genbank_dir(taxid);
        fs::create_dir_all(&gb_dir)
            .with_context(|| format!("failed to create {}", gb_dir.display()))?;
        let fasta_dir = self.root.join("fasta");
        fs::create_dir_all(&fasta_dir)
            .with_context(|| format!("failed to create {}", fasta_dir.display()))?;
        Ok(())
    }
}

/// Keep only filename-safe characters; runs of anything else become `_`.
pub fn sanitize_filename(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_underscore = false;
    for ch in text.trim().chars() {
        if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-') {
            out.push(ch);
            prev_underscore = false;
        } else if !prev_underscore {
            out.push('_');
            prev_underscore = true;
        }
    }
    out
}

/// Archive one raw record as `<dir>/<accession>.gb`. Existing files are
/// left untouched so interrupted runs can resume; returns whether the file
/// was written.
pub fn archive_record(dir: &Path, accession: &str, record_text: &str) -> Result<bool> {
    let path = dir.join(format!("{}.gb", sanitize_filename(accession)));
    if path.exists() {
        return Ok(false);
    }
    let mut text = record_text.to_string();
    if !text.ends_with('\n') {
        text.push('\n');
    }
    text.push_str("//\n");
    fs::write(&path, text).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(true)
}
