//! Blocking client for the NCBI Entrez E-utilities: taxonomy resolution,
//! paginated nucleotide searches, and GenBank flat-file fetches.

use crate::{HarvestError, Result};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

const EUTILS_BASE: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";

/// Bounded retry on transport errors, 429 and 5xx.
const MAX_ATTEMPTS: u32 = 4;

/// NCBI allows ~3 requests/second without an API key.
pub const DEFAULT_DELAY_SECS: f64 = 0.34;

/// Search terms OR-ed into the nucleotide query; the same gene-name
/// vocabulary the extractor matches against feature text.
const CO1_SEARCH_TERMS: [&str; 8] = [
    "CO1[All Fields]",
    "COI[All Fields]",
    "COX1[All Fields]",
    "COXI[All Fields]",
    "\"cytochrome c oxidase subunit 1\"[All Fields]",
    "\"cytochrome c oxidase subunit I\"[All Fields]",
    "\"cytochrome oxidase subunit 1\"[All Fields]",
    "\"cytochrome oxidase subunit I\"[All Fields]",
];

#[derive(Debug, Deserialize)]
struct ESearchResponse {
    esearchresult: ESearchResult,
}

#[derive(Debug, Default, Deserialize)]
struct ESearchResult {
    #[serde(default)]
    count: String,
    #[serde(default)]
    idlist: Vec<String>,
}

pub struct EntrezClient {
    client: Client,
    base_url: String,
    email: Option<String>,
    api_key: Option<String>,
    delay: Duration,
}

impl EntrezClient {
    pub fn new(email: Option<String>, api_key: Option<String>, delay_secs: f64) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("mitoharvest/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(300))
            .connect_timeout(Duration::from_secs(30))
            .build()?;
        Ok(EntrezClient {
            client,
            base_url: EUTILS_BASE.to_string(),
            email,
            api_key,
            delay: Duration::from_secs_f64(delay_secs.max(0.0)),
        })
    }

    /// Nucleotide query for one taxon: organism term AND the CO1 OR-group.
    pub fn co1_query(taxid: &str) -> String {
        format!(
            "(txid{}[Organism]) AND ({})",
            taxid,
            CO1_SEARCH_TERMS.join(" OR ")
        )
    }

    /// Resolve a taxon name to its taxonomy ID. Numeric input passes
    /// through untouched.
    pub fn resolve_taxid(&self, taxon: &str) -> Result<String> {
        let taxon = taxon.trim();
        if !taxon.is_empty() && taxon.chars().all(|c| c.is_ascii_digit()) {
            return Ok(taxon.to_string());
        }
        let term = format!("\"{}\"[Scientific Name]", taxon);
        let response: ESearchResponse = self.get_json(
            "esearch.fcgi",
            &[
                ("db", "taxonomy".to_string()),
                ("term", term),
                ("retmax", "5".to_string()),
                ("retmode", "json".to_string()),
            ],
        )?;
        response
            .esearchresult
            .idlist
            .into_iter()
            .next()
            .ok_or_else(|| HarvestError::Entrez(format!("taxon not found: {}", taxon)))
    }

    /// Total number of nucleotide records matching the query.
    pub fn search_count(&self, query: &str) -> Result<u64> {
        let response: ESearchResponse = self.get_json(
            "esearch.fcgi",
            &[
                ("db", "nucleotide".to_string()),
                ("term", query.to_string()),
                ("retmax", "0".to_string()),
                ("retmode", "json".to_string()),
            ],
        )?;
        response
            .esearchresult
            .count
            .parse()
            .map_err(|_| HarvestError::Entrez("esearch count was not numeric".to_string()))
    }

    /// One page of record IDs for the query.
    pub fn search_ids(&self, query: &str, retstart: u64, retmax: u64) -> Result<Vec<String>> {
        let response: ESearchResponse = self.get_json(
            "esearch.fcgi",
            &[
                ("db", "nucleotide".to_string()),
                ("term", query.to_string()),
                ("retstart", retstart.to_string()),
                ("retmax", retmax.to_string()),
                ("retmode", "json".to_string()),
            ],
        )?;
        Ok(response.esearchresult.idlist)
    }

    /// Fetch GenBank flat-file text for a batch of record IDs. The payload
    /// may hold several records; callers split at `//` boundaries.
    pub fn fetch_records(&self, ids: &[String]) -> Result<String> {
        if ids.is_empty() {
            return Ok(String::new());
        }
        self.get_text(
            "efetch.fcgi",
            &[
                ("db", "nucleotide".to_string()),
                ("rettype", "gb".to_string()),
                ("retmode", "text".to_string()),
                ("id", ids.join(",")),
            ],
        )
    }

    fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let text = self.get_text(endpoint, params)?;
        serde_json::from_str(&text)
            .map_err(|e| HarvestError::Entrez(format!("{} returned invalid JSON: {}", endpoint, e)))
    }

    fn get_text(&self, endpoint: &str, params: &[(&str, String)]) -> Result<String> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let mut query: Vec<(&str, String)> = params.to_vec();
        if let Some(email) = &self.email {
            query.push(("email", email.clone()));
        }
        if let Some(api_key) = &self.api_key {
            query.push(("api_key", api_key.clone()));
        }

        let mut last_error = None;
        for attempt in 0..MAX_ATTEMPTS {
            if attempt > 0 {
                let backoff = Duration::from_secs(1u64 << attempt);
                warn!(endpoint, attempt, "retrying after {:?}", backoff);
                thread::sleep(backoff);
            }

            let result = self.client.get(&url).query(&query).send();
            match result {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let body = response.text()?;
                        debug!(endpoint, bytes = body.len(), "eutils response");
                        // Inter-request delay keeps us under NCBI's rate
                        // policy even on tight loops.
                        if !self.delay.is_zero() {
                            thread::sleep(self.delay);
                        }
                        return Ok(body);
                    }
                    if status.as_u16() == 429 || status.is_server_error() {
                        last_error = Some(HarvestError::Entrez(format!(
                            "{} returned HTTP {}",
                            endpoint, status
                        )));
                        continue;
                    }
                    return Err(HarvestError::Entrez(format!(
                        "{} returned HTTP {}",
                        endpoint, status
                    )));
                }
                Err(e) => {
                    last_error = Some(HarvestError::Http(e));
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| HarvestError::Entrez(format!("{} failed without response", endpoint))))
    }
}
