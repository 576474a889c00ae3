//! Integration tests driving the CLI binary end to end, piping commands over
//! stdin and reading the REPL's stdout (§4.7's facade exercised through the
//! out-of-scope shell adapter).
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// Spawns the CLI against a fresh directory, pipes `command` followed by
/// `EXIT`, and returns its captured stdout.
fn run_cli_command(dir: &Path, mem_limit: &str, compacting_size: &str, command: &str) -> String {
    use std::io::Write;
    use std::process::{Command, Stdio};

    let mut child = Command::new("cargo")
        .args(["run", "-p", "cli", "--"])
        .env("KV_DIR", dir.to_str().unwrap())
        .env("KV_MEM_LIMIT", mem_limit)
        .env("KV_COMPACTING_SIZE", compacting_size)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn cli");

    {
        let stdin = child.stdin.as_mut().expect("failed to open stdin");
        stdin
            .write_all(command.as_bytes())
            .expect("failed to write to stdin");
        stdin.write_all(b"EXIT\n").expect("failed to write EXIT");
    }

    let output = child.wait_with_output().expect("failed to read output");
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[test]
fn basic_set_and_get() {
    let dir = tempdir().unwrap();
    let output = run_cli_command(dir.path(), "10", "5", "SET key1 value1\nGET key1\n");

    assert!(output.contains("OK"));
    assert!(output.contains("value1"));
}

#[test]
fn overwrite_returns_the_latest_value() {
    let dir = tempdir().unwrap();
    let commands = "SET mykey oldvalue\nGET mykey\nSET mykey newvalue\nGET mykey\n";
    let output = run_cli_command(dir.path(), "10", "5", commands);

    assert!(output.contains("oldvalue"));
    assert!(output.contains("newvalue"));
}

#[test]
fn delete_then_get_reports_an_error() {
    let dir = tempdir().unwrap();
    let commands = "SET delme value\nGET delme\nDEL delme\nGET delme\n";
    let output = run_cli_command(dir.path(), "10", "5", commands);

    assert!(output.contains("value"));
    assert!(output.contains("ERR"));
}

#[test]
fn flush_creates_an_sst_file() {
    let dir = tempdir().unwrap();
    let commands = "SET a 1\nSET b 2\nFLUSH\nGET a\nGET b\n";
    let output = run_cli_command(dir.path(), "10", "5", commands);

    assert!(output.contains("OK"));
    assert!(output.contains('1'));
    assert!(output.contains('2'));

    let sst_files: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().map(|x| x == "sst").unwrap_or(false))
        .collect();
    assert!(!sst_files.is_empty(), "an sstable should exist after flush");
}

#[test]
fn auto_flush_at_mem_limit_keeps_every_key_readable() {
    let dir = tempdir().unwrap();
    let mut commands = String::new();
    for i in 0..20 {
        commands.push_str(&format!("SET key{i:02} value{i}\n"));
    }
    for i in 0..20 {
        commands.push_str(&format!("GET key{i:02}\n"));
    }

    let output = run_cli_command(dir.path(), "5", "100", &commands);

    assert!(output.contains("value0"));
    assert!(output.contains("value19"));
}

#[test]
fn persists_across_restarts() {
    let dir = tempdir().unwrap();
    run_cli_command(dir.path(), "10", "5", "SET persist_key persist_value\nFLUSH\n");

    let output = run_cli_command(dir.path(), "10", "5", "GET persist_key\n");
    assert!(output.contains("persist_value"));
}

#[test]
fn set_without_a_value_is_a_usage_error() {
    let dir = tempdir().unwrap();
    let output = run_cli_command(dir.path(), "10", "5", "SET onlykey\n");
    assert!(output.contains("ERR usage"));
}

#[test]
fn quit_command_says_bye() {
    let dir = tempdir().unwrap();
    let output = run_cli_command(dir.path(), "10", "5", "SET foo bar\nQUIT\n");

    assert!(output.contains("OK"));
    assert!(output.contains("bye"));
}
