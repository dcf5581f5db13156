use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

fn dump_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("pgraph-dump"))
}

fn zero_size_struct_message() -> Vec<u8> {
    // Non-null, zero-size self-referential struct pointer: see the crate
    // doctest for why offset=0 alone would be indistinguishable from null.
    vec![0xFC, 0xFF, 0xFF, 0xFF, 0, 0, 0, 0]
}

/// A path under the system temp directory scoped to this test process, so
/// file-based CLI tests don't need a temp-directory crate dependency.
struct ScratchFile(PathBuf);

impl ScratchFile {
    fn new(name: &str) -> Self {
        let path = std::env::temp_dir().join(format!("pgraph-cli-test-{}-{name}", std::process::id()));
        ScratchFile(path)
    }

    fn write(&self, bytes: &[u8]) {
        fs::write(&self.0, bytes).unwrap();
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.0);
    }
}

#[test]
fn test_help() {
    dump_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("pretty-print"));
}

#[test]
fn test_version() {
    dump_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("pgraph-dump"));
}

#[test]
fn test_rejects_null_root_from_stdin() {
    dump_cmd()
        .write_stdin([0u8; 8])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to decode root pointer"));
}

#[test]
fn test_dumps_empty_struct_from_file() {
    let input_file = ScratchFile::new("empty-struct.bin");
    input_file.write(&zero_size_struct_message());

    dump_cmd()
        .arg("--input")
        .arg(&input_file.0)
        .assert()
        .success()
        .stdout(predicate::str::contains("STRUCT data_words=0 pointers=0"));
}

#[test]
fn test_dumps_single_data_word_in_hex() {
    let word0 = (1u64 << 32) | 0b00;
    let word1: [u8; 8] = [0xDE, 0xAD, 0xBE, 0xEF, 0xCA, 0xFE, 0xBA, 0xBE];
    let mut bytes = vec![0u8; 16];
    bytes[0..8].copy_from_slice(&word0.to_le_bytes());
    bytes[8..16].copy_from_slice(&word1);

    dump_cmd()
        .write_stdin(bytes)
        .assert()
        .success()
        .stdout(predicate::str::contains("BEBAFECAEFBEADDE"));
}

#[test]
fn test_rejects_truncated_input() {
    dump_cmd()
        .write_stdin(vec![0u8; 3])
        .assert()
        .failure()
        .stderr(predicate::str::contains("pgraph-dump:"));
}

#[test]
fn test_rejects_empty_input() {
    dump_cmd()
        .write_stdin(Vec::<u8>::new())
        .assert()
        .failure();
}

#[test]
fn test_rejects_missing_file() {
    dump_cmd()
        .arg("--input")
        .arg("/nonexistent/path/to/message.bin")
        .assert()
        .failure();
}

#[test]
fn test_dash_reads_stdin_explicitly() {
    dump_cmd()
        .arg("--input")
        .arg("-")
        .write_stdin(zero_size_struct_message())
        .assert()
        .success()
        .stdout(predicate::str::contains("STRUCT data_words=0 pointers=0"));
}

#[test]
fn test_depth_limit_is_enforced() {
    // A struct with one pointer slot pointing one word backward at itself:
    // a legitimate, bounded-size self-loop that an unbounded walk would
    // recurse on forever.
    let mut bytes = vec![0u8; 16];
    let root_ptr = (1u64 << 48) | 0b00; // 0 data words, 1 pointer slot
    bytes[0..8].copy_from_slice(&root_ptr.to_le_bytes());
    let self_ptr = ((-2i32 as u32 as u64) << 2) | 0b00; // back to word 0
    bytes[8..16].copy_from_slice(&self_ptr.to_le_bytes());

    dump_cmd()
        .arg("--max-depth")
        .arg("3")
        .write_stdin(bytes)
        .assert()
        .failure()
        .stderr(predicate::str::contains("depth"));
}

#[test]
fn test_dedupe_shared_flag_is_accepted() {
    dump_cmd()
        .arg("--dedupe-shared")
        .write_stdin(zero_size_struct_message())
        .assert()
        .success();
}

#[test]
fn test_rejects_input_exceeding_max_words() {
    let bytes = vec![0u8; 8 * 4];
    dump_cmd()
        .arg("--max-words")
        .arg("1")
        .write_stdin(bytes)
        .assert()
        .failure()
        .stderr(predicate::str::contains("word budget"));
}

#[test]
fn test_large_stdin_message_is_rejected_cleanly_when_malformed() {
    // A struct pointer claiming far more data words than the buffer has.
    let raw = (u16::MAX as u64) << 32;
    let mut stdin = std::io::Cursor::new(Vec::new());
    stdin.write_all(&raw.to_le_bytes()).unwrap();

    dump_cmd()
        .write_stdin(stdin.into_inner())
        .assert()
        .failure();
}
