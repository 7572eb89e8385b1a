//! FASTA emission. Extracted subsequences are written one pair per record,
//! header line then a single unwrapped sequence line, so outputs can be
//! concatenated directly.

use crate::bio::sequence::FastaRecord;
use crate::Result;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Write records to a new FASTA file, replacing any existing content.
pub fn write_fasta<P: AsRef<Path>>(path: P, records: &[FastaRecord]) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    write_fasta_to_writer(&mut writer, records)?;
    writer.flush()?;
    Ok(())
}

/// Append records to a per-group FASTA file, creating it on first use.
pub fn append_fasta<P: AsRef<Path>>(path: P, records: &[FastaRecord]) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    write_fasta_to_writer(&mut writer, records)?;
    writer.flush()?;
    Ok(())
}

fn write_fasta_to_writer<W: Write>(writer: &mut W, records: &[FastaRecord]) -> Result<()> {
    for record in records {
        writeln!(writer, "{}", record.header())?;
        writeln!(writer, "{}", record.sequence)?;
    }
    Ok(())
}

/// Concatenate FASTA files into one, preserving input order. Inputs are
/// copied line by line so a file missing its trailing newline cannot glue
/// two records together.
pub fn combine_fasta<P: AsRef<Path>>(inputs: &[P], output: &Path) -> Result<usize> {
    let file = File::create(output)?;
    let mut writer = BufWriter::new(file);
    let mut headers = 0usize;

    for input in inputs {
        let reader = BufReader::new(File::open(input.as_ref())?);
        for line in reader.lines() {
            let line = line?;
            if line.starts_with('>') {
                headers += 1;
            }
            writeln!(writer, "{}", line)?;
        }
    }

    writer.flush()?;
    Ok(headers)
}
