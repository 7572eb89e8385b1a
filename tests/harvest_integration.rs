//! End-to-end coverage for the record → FASTA → filesystem path, using the
//! same library seams the CLI drives.

use mitoharvest::bio::fasta::{append_fasta, combine_fasta};
use mitoharvest::bio::genbank::{accession_of, extract_co1, split_records};
use mitoharvest::report::{RunSummary, TaxonSummary};
use mitoharvest::storage::{archive_record, OutputLayout};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

const PAYLOAD: &str = "\
LOCUS       AB000001                40 bp    DNA     linear   VRT 01-JAN-2020
ACCESSION   AB000001
FEATURES             Location/Qualifiers
     CDS             3..14
                     /gene=\"COX1\"
                     /product=\"cytochrome c oxidase subunit I\"
ORIGIN
        1 ttacgtacgt acgtacgtac gtacgtacgt acgtacgtaa
//
LOCUS       AB000002                40 bp    DNA     linear   VRT 01-JAN-2020
ACCESSION   AB000002
FEATURES             Location/Qualifiers
     gene            complement(5..16)
                     /gene=\"CO1\"
     CDS             1..8
                     /gene=\"cytb\"
ORIGIN
        1 aaaaccccgg ggttttaaaa ccccggggtt ttaaaacccc
//
";

#[test]
fn test_fetched_payload_to_per_taxon_outputs() {
    let dir = tempdir().unwrap();
    let layout = OutputLayout::new(dir.path());
    layout.prepare_taxon("7955").unwrap();

    let gb_dir = layout.genbank_dir("7955");
    let fasta_path = layout.fasta_path("7955");

    let mut summary = RunSummary::new();
    let records = split_records(PAYLOAD);
    assert_eq!(records.len(), 2);

    let mut retrieved = 0;
    let mut extracted = 0;
    for record in &records {
        let id = accession_of(record).unwrap();
        assert!(archive_record(&gb_dir, &id, record).unwrap());
        retrieved += 1;

        let pairs = extract_co1(record, &id);
        append_fasta(&fasta_path, &pairs).unwrap();
        extracted += pairs.len() as u64;
    }
    summary.push(TaxonSummary {
        taxid: "7955".to_string(),
        found: 2,
        retrieved,
        extracted,
    });

    // Both archives exist and are replayable through the extractor.
    let archived = std::fs::read_to_string(gb_dir.join("AB000001.gb")).unwrap();
    assert_eq!(extract_co1(&archived, "AB000001").len(), 1);

    let fasta = std::fs::read_to_string(&fasta_path).unwrap();
    let lines: Vec<&str> = fasta.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], ">CO1_from_AB000001_3..14");
    assert_eq!(lines[1], "acgtacgtacgt");
    assert_eq!(lines[2], ">CO1_from_AB000002_5..16_complement");
    // complement(5..16) of aaaaccccggggtttt... slice ccccggggtttt
    assert_eq!(lines[3], "AAAACCCCGGGG");

    summary.write_csv(&layout.summary_path()).unwrap();
    let csv = std::fs::read_to_string(layout.summary_path()).unwrap();
    assert_eq!(csv, "taxid,found,retrieved,extracted\n7955,2,2,2\n");
}

#[test]
fn test_resume_skips_archived_records() {
    let dir = tempdir().unwrap();
    let layout = OutputLayout::new(dir.path());
    layout.prepare_taxon("1").unwrap();
    let gb_dir = layout.genbank_dir("1");

    let record = &split_records(PAYLOAD)[0];
    assert!(archive_record(&gb_dir, "AB000001", record).unwrap());
    assert!(!archive_record(&gb_dir, "AB000001", record).unwrap());
}

#[test]
fn test_combine_per_taxon_fastas() {
    let dir = tempdir().unwrap();
    let layout = OutputLayout::new(dir.path());

    let mut paths = Vec::new();
    for (taxid, index) in [("1", 0usize), ("2", 1usize)] {
        layout.prepare_taxon(taxid).unwrap();
        let path = layout.fasta_path(taxid);
        let rec = &split_records(PAYLOAD)[index];
        let id = accession_of(rec).unwrap();
        append_fasta(&path, &extract_co1(rec, &id)).unwrap();
        paths.push(path);
    }

    let combined = dir.path().join("combined.fasta");
    let count = combine_fasta(&paths, &combined).unwrap();
    assert_eq!(count, 2);

    let text = std::fs::read_to_string(&combined).unwrap();
    assert!(text.contains(">CO1_from_AB000001_3..14"));
    assert!(text.contains(">CO1_from_AB000002_5..16_complement"));
}
