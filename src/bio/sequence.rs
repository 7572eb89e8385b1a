use serde::{Deserialize, Serialize};

/// One extracted FASTA pair. The id is stored without the leading `>`;
/// `header()` adds it when serializing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FastaRecord {
    pub id: String,
    pub sequence: String,
}

impl FastaRecord {
    pub fn new(id: String, sequence: String) -> Self {
        Self { id, sequence }
    }

    pub fn header(&self) -> String {
        format!(">{}", self.id)
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

/// Characters that survive ORIGIN-block filtering.
pub fn is_nucleotide(c: char) -> bool {
    matches!(c, 'a' | 'c' | 'g' | 't' | 'n' | 'A' | 'C' | 'G' | 'T' | 'N')
}

/// Complement of a single uppercased base. Ambiguity codes and anything
/// else collapse to `N` rather than failing.
fn complement(base: u8) -> u8 {
    match base.to_ascii_uppercase() {
        b'A' => b'T',
        b'T' => b'A',
        b'G' => b'C',
        b'C' => b'G',
        b'N' => b'N',
        _ => b'N',
    }
}

/// Reverse complement: uppercase, complement each base, reverse the result.
pub fn reverse_complement(seq: &str) -> String {
    seq.bytes().rev().map(|b| complement(b) as char).collect()
}
