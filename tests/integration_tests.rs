//! Integration tests for fastaidx
//!
//! These tests use the FASTA fixture in tests/data/ plus generated files.

use fastaidx::{Error, Fasta, IndexedFasta, Options, reference_lengths};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::PathBuf;
use std::sync::Arc;

fn test_data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data")
}

fn open_small() -> IndexedFasta<File> {
    let dir = test_data_dir();
    let fasta = File::open(dir.join("small.fa")).unwrap();
    let index = BufReader::new(File::open(dir.join("small.fa.fai")).unwrap());
    IndexedFasta::new(fasta, index, Options::default()).unwrap()
}

/// Sequences of a FASTA file, parsed naively.
fn expected_sequences(text: &str) -> HashMap<String, String> {
    let mut seqs = HashMap::new();
    for record in text.split('>').skip(1) {
        let mut lines = record.lines();
        let header = lines.next().unwrap();
        let name = header.split_whitespace().next().unwrap().to_string();
        seqs.insert(name, lines.collect::<String>());
    }
    seqs
}

fn small_sequences() -> HashMap<String, String> {
    let text = std::fs::read_to_string(test_data_dir().join("small.fa")).unwrap();
    expected_sequences(&text)
}

#[test]
fn test_seq_names_in_file_order() {
    let fasta = open_small();
    assert_eq!(
        fasta.seq_names(),
        ["chr1", "chr2", "chrM", "empty", "tiny", "chrX"]
    );
}

#[test]
fn test_lengths_match_fixture() {
    let fasta = open_small();
    for (name, seq) in small_sequences() {
        assert_eq!(fasta.len(&name).unwrap(), seq.len() as u64, "{}", name);
    }
}

#[test]
fn test_every_range_of_short_sequences() {
    let fasta = open_small();
    let seqs = small_sequences();
    for name in ["chrM", "tiny", "chr2"] {
        let seq = &seqs[name];
        let len = seq.len() as u64;
        for start in 0..len {
            for end in start + 1..=len {
                let got = fasta.get(name, start, end).unwrap();
                assert_eq!(got, seq[start as usize..end as usize], "{}:{}-{}", name, start, end);
            }
        }
    }
}

#[test]
fn test_results_have_exact_length_without_newlines() {
    let fasta = open_small();
    let len = fasta.len("chr1").unwrap();
    for (start, end) in [(0, len), (0, 60), (59, 61), (60, 120), (1, 156), (119, 157)] {
        let got = fasta.get("chr1", start, end).unwrap();
        assert_eq!(got.len() as u64, end - start);
        assert!(!got.contains('\n'));
    }
}

#[test]
fn test_idempotent() {
    let fasta = open_small();
    let first = fasta.get("chr1", 17, 140).unwrap();
    fasta.get("chrX", 0, 61).unwrap();
    assert_eq!(fasta.get("chr1", 17, 140).unwrap(), first);
    assert_eq!(fasta.get("chr1", 17, 140).unwrap(), first);
}

#[test]
fn test_split_concatenation() {
    let fasta = open_small();
    let len = fasta.len("chr1").unwrap();
    let whole = fasta.get("chr1", 0, len).unwrap();
    for k in 1..len {
        let left = fasta.get("chr1", 0, k).unwrap();
        let right = fasta.get("chr1", k, len).unwrap();
        assert_eq!(left + &right, whole, "split at {}", k);
    }
}

#[test]
fn test_whole_last_sequence_stays_in_file() {
    // chrX is the last record; its final line is a single base.
    let fasta = open_small();
    let seqs = small_sequences();
    assert_eq!(fasta.get("chrX", 0, 61).unwrap(), seqs["chrX"]);
    assert_eq!(fasta.get("chrX", 60, 61).unwrap(), &seqs["chrX"][60..]);
}

#[test]
fn test_out_of_bounds_and_bad_ranges() {
    let fasta = open_small();
    let len = fasta.len("chr2").unwrap();
    assert!(matches!(
        fasta.get("chr2", 10, len + 1),
        Err(Error::OutOfBounds { .. })
    ));
    assert!(matches!(
        fasta.get("chr2", 10, 10),
        Err(Error::InvalidRange { .. })
    ));
    assert!(matches!(
        fasta.get("empty", 0, 1),
        Err(Error::OutOfBounds { .. })
    ));
    assert!(matches!(fasta.get("chr9", 0, 1), Err(Error::NotFound(_))));
}

#[test]
fn test_concurrent_gets() {
    let fasta = Arc::new(open_small());
    let seqs = Arc::new(small_sequences());

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let fasta = Arc::clone(&fasta);
            let seqs = Arc::clone(&seqs);
            std::thread::spawn(move || {
                let names = ["chr1", "chr2", "chrM", "chrX"];
                for i in 0..200usize {
                    let name = names[(i + t) % names.len()];
                    let seq = &seqs[name];
                    let start = (i * 7 + t) % (seq.len() - 1);
                    let end = seq.len().min(start + 1 + (i * 13) % 70);
                    let got = fasta.get(name, start as u64, end as u64).unwrap();
                    assert_eq!(got, seq[start..end]);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_borrowed_source() {
    let dir = test_data_dir();
    let mut file = File::open(dir.join("small.fa")).unwrap();
    {
        let index = BufReader::new(File::open(dir.join("small.fa.fai")).unwrap());
        let fasta = IndexedFasta::new(&mut file, index, Options::default()).unwrap();
        assert_eq!(fasta.get("tiny", 0, 3).unwrap(), "gTT");
    }
    // The handle is still ours to use.
    assert!(file.metadata().unwrap().len() > 0);
}

#[test]
fn test_reference_lengths() {
    let index = BufReader::new(File::open(test_data_dir().join("small.fa.fai")).unwrap());
    let lengths = reference_lengths(index).unwrap();
    assert_eq!(lengths.len(), 6);
    assert_eq!(lengths["chr1"], 157);
    assert_eq!(lengths["empty"], 0);
    assert_eq!(lengths["chrX"], 61);
}

#[test]
fn test_malformed_index() {
    let index = "chr1\t157\t18\t60\t61\nchr2\t80\t196\t20\n";
    let fasta = File::open(test_data_dir().join("small.fa")).unwrap();
    match IndexedFasta::new(fasta, index.as_bytes(), Options::default()) {
        Err(Error::Format { line, .. }) => assert_eq!(line, 2),
        Err(e) => panic!("unexpected error: {}", e),
        Ok(_) => panic!("malformed index accepted"),
    }
}

#[test]
fn test_duplicate_name_last_entry_wins() {
    // Second chr1 entry points at the chr2 record.
    let index = "chr1\t157\t18\t60\t61\nchr1\t80\t196\t20\t21\n";
    let fasta = File::open(test_data_dir().join("small.fa")).unwrap();
    let fasta = IndexedFasta::new(fasta, index.as_bytes(), Options::default()).unwrap();
    assert_eq!(fasta.seq_names(), ["chr1"]);
    assert_eq!(fasta.len("chr1").unwrap(), 80);
    assert_eq!(fasta.get("chr1", 0, 80).unwrap(), small_sequences()["chr2"]);
}

#[test]
fn test_generated_file_without_trailing_newline() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b">a\nACGTA\nCCGTT\nGG").unwrap();
    let fasta = IndexedFasta::new(
        file.reopen().unwrap(),
        "a\t12\t3\t5\t6\n".as_bytes(),
        Options::default(),
    )
    .unwrap();
    assert_eq!(fasta.get("a", 0, 12).unwrap(), "ACGTACCGTTGG");
    assert_eq!(fasta.get("a", 9, 12).unwrap(), "TGG");
}

#[test]
fn test_index_data_mismatch_is_eof() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b">a\nACGTA\nCC\n").unwrap();
    // Index claims more bases than the file holds.
    let fasta = IndexedFasta::new(
        file.reopen().unwrap(),
        "a\t12\t3\t5\t6\n".as_bytes(),
        Options::default(),
    )
    .unwrap();
    assert!(matches!(
        fasta.get("a", 0, 12),
        Err(Error::UnexpectedEof { .. })
    ));
    assert_eq!(fasta.get("a", 0, 7).unwrap(), "ACGTACC");
}

#[test]
fn test_matches_noodles_indexed_reader() {
    use noodles::core::Region;
    use noodles::fasta;

    let dir = tempfile::tempdir().unwrap();
    let fa_path = dir.path().join("ref.fa");
    let fai_path = dir.path().join("ref.fa.fai");

    let seqs = [
        ("s1", "ACGTTGCAACGTTGCAAC".repeat(9), 17usize),
        ("s2", "GGATCCNNAT".repeat(5), 50),
        ("s3", "TTAGGG".repeat(11), 8),
    ];
    let mut fa = Vec::new();
    let mut fai = String::new();
    for (name, seq, width) in &seqs {
        fa.extend_from_slice(format!(">{}\n", name).as_bytes());
        let offset = fa.len();
        for line in seq.as_bytes().chunks(*width) {
            fa.extend_from_slice(line);
            fa.push(b'\n');
        }
        fai.push_str(&format!("{}\t{}\t{}\t{}\t{}\n", name, seq.len(), offset, width, width + 1));
    }
    std::fs::write(&fa_path, &fa).unwrap();
    std::fs::write(&fai_path, &fai).unwrap();

    let mut reference = fasta::io::indexed_reader::Builder::default()
        .build_from_path(&fa_path)
        .unwrap();
    let ours = IndexedFasta::new(
        File::open(&fa_path).unwrap(),
        fai.as_bytes(),
        Options::default().with_min_read_size(16),
    )
    .unwrap();

    for (name, seq, _) in &seqs {
        let len = seq.len() as u64;
        for (start, end) in [(0, len), (3, 40), (16, 18), (len - 5, len), (1, len - 1)] {
            let region: Region = format!("{}:{}-{}", name, start + 1, end).parse().unwrap();
            let record = reference.query(&region).unwrap();
            let expected = std::str::from_utf8(record.sequence().as_ref()).unwrap().to_string();
            assert_eq!(ours.get(name, start, end).unwrap(), expected, "{}", region);
        }
    }
}
