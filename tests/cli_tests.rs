//! End-to-end tests of the `afin` binary.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Deterministic pseudo-random genome
fn genome(len: usize) -> Vec<u8> {
    let mut state: u64 = 0x1234_5678_9abc_def1;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            b"ACGT"[(state % 4) as usize]
        })
        .collect()
}

fn reverse_complement(seq: &[u8]) -> Vec<u8> {
    seq.iter()
        .rev()
        .map(|b| match b {
            b'A' => b'T',
            b'C' => b'G',
            b'G' => b'C',
            b'T' => b'A',
            _ => b'N',
        })
        .collect()
}

/// Error-free 80 base reads every 4 bases, alternating strands, as FASTQ
fn write_reads(dir: &Path, genome: &[u8]) -> PathBuf {
    let mut fastq = String::new();
    for (i, start) in (0..=genome.len() - 80).step_by(4).enumerate() {
        let mut read = genome[start..start + 80].to_vec();
        if i % 2 == 1 {
            read = reverse_complement(&read);
        }
        fastq.push_str(&format!(
            "@read{i}\n{}\n+\n{}\n",
            String::from_utf8(read).unwrap(),
            "I".repeat(80)
        ));
    }
    let path = dir.join("reads.fq");
    fs::write(&path, fastq).unwrap();
    path
}

fn write_contigs(dir: &Path, genome: &[u8]) -> PathBuf {
    let fasta = format!(
        ">left\n{}\n>right\n{}\n",
        String::from_utf8(genome[200..350].to_vec()).unwrap(),
        String::from_utf8(genome[420..600].to_vec()).unwrap()
    );
    let path = dir.join("contigs.fa");
    fs::write(&path, fasta).unwrap();
    path
}

/// Sequences of a FASTA file, joined across lines
fn read_fasta(path: &Path) -> Vec<Vec<u8>> {
    let text = fs::read_to_string(path).unwrap();
    let mut records: Vec<Vec<u8>> = Vec::new();
    for line in text.lines() {
        if line.starts_with('>') {
            records.push(Vec::new());
        } else if let Some(last) = records.last_mut() {
            last.extend_from_slice(line.trim().as_bytes());
        }
    }
    records
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

fn afin() -> Command {
    Command::cargo_bin("afin").unwrap()
}

#[test]
fn test_extend_closes_gap_and_fuses() {
    let dir = TempDir::new().unwrap();
    let g = genome(800);
    let reads = write_reads(dir.path(), &g);
    let contigs = write_contigs(dir.path(), &g);
    let prefix = dir.path().join("out");

    afin()
        .arg("extend")
        .arg("-r")
        .arg(&reads)
        .arg("-c")
        .arg(&contigs)
        .arg("-o")
        .arg(&prefix)
        .arg("-t")
        .arg("3")
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::contains("Sweep entry 0"));

    let records = read_fasta(&dir.path().join("out.fa"));
    assert_eq!(records.len(), 1);
    let merged = &records[0];
    assert!(merged.len() >= 400);
    assert!(contains(&g, merged) || contains(&reverse_complement(&g), merged));
    assert!(dir.path().join("out.log").exists());
}

#[test]
fn test_no_fusion_keeps_both_contigs() {
    let dir = TempDir::new().unwrap();
    let g = genome(800);
    let reads = write_reads(dir.path(), &g);
    let contigs = write_contigs(dir.path(), &g);

    afin()
        .args(["extend", "--no-fusion", "--no-log", "-q", "-l", "2"])
        .arg("-r")
        .arg(&reads)
        .arg("-c")
        .arg(&contigs)
        .arg("-o")
        .arg(dir.path().join("nf"))
        .assert()
        .success();

    let records = read_fasta(&dir.path().join("nf.fa"));
    assert_eq!(records.len(), 2);
    assert!(records[0].len() > 150);
    assert!(contains(&g, &records[0]));
    assert!(!dir.path().join("nf.log").exists());
}

#[test]
fn test_sweep_and_test_run_outputs() {
    let dir = TempDir::new().unwrap();
    let g = genome(800);
    let reads = write_reads(dir.path(), &g);
    let contigs = write_contigs(dir.path(), &g);

    let output = afin()
        .args(["extend", "-q", "--test-run", "-i", "2", "-l", "1,2"])
        .args(["--format", "json"])
        .arg("-r")
        .arg(&reads)
        .arg("-c")
        .arg(&contigs)
        .arg("-o")
        .arg(dir.path().join("sw"))
        .output()
        .unwrap();
    assert!(output.status.success());

    let summaries: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let summaries = summaries.as_array().unwrap();
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[1]["params"]["max_search_loops"], 2);

    for name in ["sw.0.fa", "sw.1.fa", "sw.fus.fa", "sw.fus0.fa", "sw.fus1.fa"] {
        assert!(dir.path().join(name).exists(), "missing {name}");
    }
}

#[test]
fn test_invalid_sweep_value_fails() {
    let dir = TempDir::new().unwrap();
    afin()
        .args(["extend", "--no-log", "-r", "r.fq", "-c", "c.fa", "--min-cov", "3,abc"])
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("abc"));
}

#[test]
fn test_missing_reads_file_fails() {
    let dir = TempDir::new().unwrap();
    let g = genome(800);
    let contigs = write_contigs(dir.path(), &g);
    afin()
        .args(["extend", "--no-log", "-q"])
        .arg("-r")
        .arg(dir.path().join("missing.fq"))
        .arg("-c")
        .arg(&contigs)
        .arg("-o")
        .arg(dir.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.fq"));
    assert!(!dir.path().join("out.fa").exists());
}

#[test]
fn test_stats_tsv() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("a.fa");
    fs::write(&path, ">a\nACGTACGTAC\n>b\nACGT\n>c\nACGTAC\n").unwrap();

    afin()
        .args(["stats", "--format", "tsv"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("\t3\t20\t10\t10"));
}
