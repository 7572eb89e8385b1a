//! Single-pass scanner and CO1 feature extractor for GenBank flat-file
//! records.
//!
//! The format contract is positional: a feature opens with exactly 5 leading
//! spaces followed by a letter, qualifier/continuation lines carry exactly
//! 21 leading spaces, and the `FEATURES`/`ORIGIN`/`//` markers are anchored
//! at column 0. Indentation widths are kept as explicit constants instead of
//! being inferred.

use crate::bio::sequence::{is_nucleotide, reverse_complement, FastaRecord};
use regex::Regex;
use std::sync::OnceLock;

/// Column where a feature-start line's type token begins.
const FEATURE_INDENT: usize = 5;
/// Column where qualifier/continuation text begins.
const CONTINUATION_INDENT: usize = 21;

/// Gene-name tokens that qualify a feature as CO1. Matched as
/// case-insensitive substrings of the feature's joined text; the feature
/// type itself is not filtered.
const CO1_TOKENS: [&str; 8] = [
    "co1",
    "coi",
    "cox1",
    "coxi",
    "cytochrome c oxidase subunit 1",
    "cytochrome c oxidase subunit i",
    "cytochrome oxidase subunit 1",
    "cytochrome oxidase subunit i",
];

/// A 1-based inclusive coordinate range, optionally on the reverse strand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub start: u64,
    pub end: u64,
    pub complement: bool,
}

/// One feature entry: a start line plus its continuation lines, trimmed.
#[derive(Debug, Clone)]
pub struct FeatureGroup {
    pub feature_type: String,
    lines: Vec<String>,
}

impl FeatureGroup {
    fn open(line: &str) -> Self {
        let body = &line[FEATURE_INDENT..];
        let feature_type = body
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_string();
        Self {
            feature_type,
            lines: vec![line.trim().to_string()],
        }
    }

    fn push(&mut self, line: &str) {
        self.lines.push(line.trim().to_string());
    }

    /// The feature's lines joined into one space-separated blob, the text
    /// classification and location parsing both run over.
    pub fn joined(&self) -> String {
        self.lines.join(" ")
    }
}

/// Scan section state. `ORIGIN` always wins over `FEATURES`, and `//`
/// terminates the scan outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Pre,
    Features,
    Origin,
    Done,
}

/// Output of one scanner pass: feature groups in encounter order plus the
/// assembled nucleotide sequence.
#[derive(Debug)]
pub struct ScannedRecord {
    pub features: Vec<FeatureGroup>,
    pub sequence: String,
}

fn is_feature_start(line: &str) -> bool {
    let bytes = line.as_bytes();
    bytes.len() > FEATURE_INDENT
        && bytes[..FEATURE_INDENT].iter().all(|&b| b == b' ')
        && bytes[FEATURE_INDENT].is_ascii_alphabetic()
}

fn is_continuation(line: &str) -> bool {
    let bytes = line.as_bytes();
    bytes.len() > CONTINUATION_INDENT
        && bytes[..CONTINUATION_INDENT].iter().all(|&b| b == b' ')
        && bytes[CONTINUATION_INDENT] != b' '
}

/// Partition one record into feature groups and the assembled sequence in a
/// single forward pass. Lines matching no rule are ignored; a missing `//`
/// terminator is treated as end-of-record.
pub fn scan_record(text: &str) -> ScannedRecord {
    let mut section = Section::Pre;
    let mut features: Vec<FeatureGroup> = Vec::new();
    let mut open: Option<FeatureGroup> = None;
    let mut sequence = String::new();

    for line in text.lines() {
        if line.starts_with("//") {
            section = Section::Done;
            break;
        }
        if line.starts_with("FEATURES") {
            section = Section::Features;
            continue;
        }
        if line.starts_with("ORIGIN") {
            // Exits FEATURES even mid-feature; the open feature still gets
            // evaluated.
            if let Some(feature) = open.take() {
                features.push(feature);
            }
            section = Section::Origin;
            continue;
        }

        match section {
            Section::Origin => {
                // Stripping everything outside the nucleotide alphabet also
                // removes the numeric position ladder and spacing.
                let fragment: String = line.chars().filter(|&c| is_nucleotide(c)).collect();
                if !fragment.is_empty() {
                    sequence.push_str(&fragment);
                }
            }
            Section::Features => {
                if is_feature_start(line) {
                    if let Some(feature) = open.take() {
                        features.push(feature);
                    }
                    open = Some(FeatureGroup::open(line));
                } else if is_continuation(line) {
                    // Continuations before any feature has opened are
                    // ignored.
                    if let Some(feature) = open.as_mut() {
                        feature.push(line);
                    }
                }
            }
            Section::Pre | Section::Done => {}
        }
    }

    if let Some(feature) = open.take() {
        features.push(feature);
    }

    ScannedRecord { features, sequence }
}

fn location_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)\.\.(\d+)").expect("location pattern"))
}

/// Case-insensitive substring match against the CO1 token table.
pub fn is_co1_feature(joined: &str) -> bool {
    let lower = joined.to_lowercase();
    CO1_TOKENS.iter().any(|token| lower.contains(token))
}

/// Parse the first `start..end` range out of a feature's joined text.
/// A `complement` substring anywhere marks the reverse strand. Returns
/// `None` for any other location syntax or for ranges violating
/// `end > start > 0`; such features are dropped, not errors.
pub fn parse_location(joined: &str) -> Option<Location> {
    let complement = joined.to_lowercase().contains("complement");
    let caps = location_pattern().captures(joined)?;
    let start: u64 = caps[1].parse().ok()?;
    let end: u64 = caps[2].parse().ok()?;
    if start == 0 || end <= start {
        return None;
    }
    Some(Location {
        start,
        end,
        complement,
    })
}

/// 1-based inclusive slice, `None` when the range exceeds the assembled
/// length. The assembled sequence is ASCII by construction, so byte
/// indexing is positional.
fn slice_location(sequence: &str, location: &Location) -> Option<String> {
    if location.end > sequence.len() as u64 {
        return None;
    }
    Some(sequence[(location.start - 1) as usize..location.end as usize].to_string())
}

/// Extract every CO1-annotated subsequence from one record, in feature
/// encounter order. `record_id` is used only for header construction.
/// Malformed features are skipped individually; an empty result is valid.
pub fn extract_co1(record_text: &str, record_id: &str) -> Vec<FastaRecord> {
    let scanned = scan_record(record_text);
    let mut out = Vec::new();

    for feature in &scanned.features {
        let joined = feature.joined();
        if !is_co1_feature(&joined) {
            continue;
        }
        let Some(location) = parse_location(&joined) else {
            continue;
        };
        let Some(slice) = slice_location(&scanned.sequence, &location) else {
            continue;
        };
        let sequence = if location.complement {
            reverse_complement(&slice)
        } else {
            slice
        };
        let mut id = format!("CO1_from_{}_{}..{}", record_id, location.start, location.end);
        if location.complement {
            id.push_str("_complement");
        }
        out.push(FastaRecord::new(id, sequence));
    }

    out
}

/// Accession token from the record's `ACCESSION` line, used as the record
/// identifier when harvesting.
pub fn accession_of(record_text: &str) -> Option<String> {
    for line in record_text.lines() {
        if let Some(rest) = line.strip_prefix("ACCESSION") {
            if let Some(token) = rest.split_whitespace().next() {
                return Some(token.to_string());
            }
        }
    }
    None
}

/// Split a multi-record efetch payload at `//` boundaries. The core is
/// single-record by contract; this is the driver-side seam in front of it.
pub fn split_records(chunk: &str) -> Vec<String> {
    let mut records = Vec::new();
    let mut current = String::new();
    for line in chunk.lines() {
        if line.starts_with("//") {
            if !current.trim().is_empty() {
                records.push(std::mem::take(&mut current));
            }
            current.clear();
            continue;
        }
        current.push_str(line);
        current.push('\n');
    }
    if !current.trim().is_empty() {
        records.push(current);
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    // 60 bases once the ladder and spacing are stripped.
    const RECORD: &str = "\
LOCUS       NC_000001              60 bp    DNA     circular VRT 01-JAN-2020
DEFINITION  Test mitochondrion, partial genome.
ACCESSION   NC_000001
FEATURES             Location/Qualifiers
     source          1..60
                     /organism=\"Testus testus\"
     gene            5..16
                     /gene=\"COX1\"
     CDS             complement(21..32)
                     /product=\"cytochrome c oxidase subunit I\"
     gene            40..52
                     /gene=\"ND2\"
ORIGIN
        1 atgcatgcat gcatgcatgc atgcatgcat
       31 ttttggggcc ccaaaannnn acgtacgtac
//
";

    const ASSEMBLED: &str = "atgcatgcatgcatgcatgcatgcatgcatttttggggccccaaaannnnacgtacgtac";

    #[test]
    fn test_scan_assembles_sequence() {
        let scanned = scan_record(RECORD);
        assert_eq!(scanned.sequence, ASSEMBLED);
        assert_eq!(scanned.features.len(), 4);
        assert_eq!(scanned.features[0].feature_type, "source");
        assert_eq!(scanned.features[2].feature_type, "CDS");
    }

    #[test]
    fn test_record_without_markers_yields_nothing() {
        let out = extract_co1("LOCUS       X\nDEFINITION  nothing here\n", "X");
        assert!(out.is_empty());
    }

    #[test]
    fn test_empty_record_is_valid_degenerate_input() {
        assert!(extract_co1("", "X").is_empty());
    }

    #[test]
    fn test_missing_terminator_still_flushes() {
        let truncated = RECORD.trim_end_matches("//\n");
        let scanned = scan_record(truncated);
        assert_eq!(scanned.sequence, ASSEMBLED);
        assert_eq!(scanned.features.len(), 4);
    }

    #[test]
    fn test_no_origin_block_gives_empty_sequence() {
        let text = "FEATURES             Location/Qualifiers\n     gene            5..16\n                     /gene=\"COX1\"\n//\n";
        let scanned = scan_record(text);
        assert!(scanned.sequence.is_empty());
        assert_eq!(scanned.features.len(), 1);
        // Extraction then produces nothing since no slice succeeds.
        assert!(extract_co1(text, "X").is_empty());
    }

    #[test]
    fn test_parse_location_plain_range() {
        let loc = parse_location("gene 570..9008 /gene=\"COX1\"").unwrap();
        assert_eq!(
            loc,
            Location {
                start: 570,
                end: 9008,
                complement: false
            }
        );
    }

    #[test]
    fn test_parse_location_complement() {
        let loc = parse_location("CDS complement(123..456)").unwrap();
        assert_eq!(
            loc,
            Location {
                start: 123,
                end: 456,
                complement: true
            }
        );
    }

    #[test]
    fn test_parse_location_rejects_degenerate_ranges() {
        assert_eq!(parse_location("gene 5..5"), None);
        assert_eq!(parse_location("gene 9..3"), None);
        assert_eq!(parse_location("gene 0..7"), None);
    }

    #[test]
    fn test_parse_location_ignores_fuzzy_and_join_syntax() {
        assert_eq!(parse_location("CDS <1..>500"), None);
        assert_eq!(parse_location("gene 1234"), None);
        // join() segments carry plain ranges inside, which the first-match
        // rule does pick up; only syntax without any digits..digits fails.
        assert!(parse_location("CDS join(1..5,8..20)").is_some());
    }

    #[test]
    fn test_classification_is_case_insensitive() {
        assert!(is_co1_feature("CDS 1..9 /product=\"Cytochrome Oxidase Subunit I\""));
        assert!(is_co1_feature("gene 1..9 /gene=\"cox1\""));
        assert!(!is_co1_feature(
            "CDS 1..9 /product=\"cytochrome c oxidase subunit 2\""
        ));
        assert!(!is_co1_feature("gene 1..9 /gene=\"ND2\""));
    }

    #[test]
    fn test_extract_plain_and_complement() {
        let out = extract_co1(RECORD, "NC_000001");
        assert_eq!(out.len(), 2);

        assert_eq!(out[0].id, "CO1_from_NC_000001_5..16");
        assert_eq!(out[0].sequence, &ASSEMBLED[4..16]);

        assert_eq!(out[1].id, "CO1_from_NC_000001_21..32_complement");
        assert_eq!(out[1].sequence, reverse_complement(&ASSEMBLED[20..32]));
    }

    #[test]
    fn test_header_exact_format() {
        let text = "\
FEATURES             Location/Qualifiers
     CDS             complement(10..20)
                     /gene=\"CO1\"
ORIGIN
        1 acgtacgtac gtacgtacgt acgtacgtac
//
";
        let out = extract_co1(text, "NC_000001");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].header(), ">CO1_from_NC_000001_10..20_complement");
    }

    #[test]
    fn test_out_of_bounds_feature_skipped_others_kept() {
        let text = "\
FEATURES             Location/Qualifiers
     gene            2..9
                     /gene=\"COX1\"
     CDS             5..150
                     /gene=\"CO1\"
ORIGIN
        1 acgtacgtac acgtacgtac
//
";
        let out = extract_co1(text, "R");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "CO1_from_R_2..9");
        assert_eq!(out[0].sequence, "cgtacgta");
    }

    #[test]
    fn test_orphan_continuation_lines_ignored() {
        let text = "\
FEATURES             Location/Qualifiers
                     /gene=\"COX1\"
     gene            2..6
                     /gene=\"ND1\"
ORIGIN
        1 acgtacgtac
//
";
        // The orphan qualifier must not attach to the later feature.
        assert!(extract_co1(text, "R").is_empty());
    }

    #[test]
    fn test_origin_exits_features_mid_feature() {
        let text = "\
FEATURES             Location/Qualifiers
     gene            2..6
                     /gene=\"CO1\"
ORIGIN
        1 acgtacgtac
//
";
        let out = extract_co1(text, "R");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].sequence, "cgtac");
    }

    #[test]
    fn test_accession_of() {
        assert_eq!(accession_of(RECORD), Some("NC_000001".to_string()));
        assert_eq!(accession_of("LOCUS X\n"), None);
    }

    #[test]
    fn test_split_records() {
        let chunk = "LOCUS A\nORIGIN\n 1 acgt\n//\nLOCUS B\nORIGIN\n 1 ttgg\n//\n";
        let records = split_records(chunk);
        assert_eq!(records.len(), 2);
        assert!(records[0].starts_with("LOCUS A"));
        assert!(records[1].starts_with("LOCUS B"));
    }
}
