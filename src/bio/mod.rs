pub mod fasta;
pub mod genbank;
pub mod sequence;
