pub mod bio;
pub mod cli;
pub mod download;
pub mod report;
pub mod storage;

pub use crate::bio::genbank::extract_co1;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarvestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Entrez error: {0}")]
    Entrez(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, HarvestError>;
