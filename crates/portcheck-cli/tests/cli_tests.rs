//! Integration tests for the portcheck CLI
//!
//! These tests invoke the actual binary and verify:
//! - Exit codes (0 = implemented, 1 = operations missing, 2 = error)
//! - stdout/stderr output
//! - JSON output format

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

// ── Helpers ───────────────────────────────────────────────

fn portcheck_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_portcheck"))
}

fn run_portcheck(args: &[&str]) -> std::process::Output {
    Command::new(portcheck_bin())
        .args(args)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to execute portcheck")
}

fn write(dir: &TempDir, name: &str, contents: &str) -> String {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).expect("write manifest");
    path_str(&path)
}

fn path_str(path: &Path) -> String {
    path.to_str().expect("utf-8 temp path").to_string()
}

const MY_PORT: &str = r#"{"name": "MyPort", "operations": ["foo", {"name": "bar", "arity": 1}]}"#;
const COMPLETE: &str = r#"{"name": "CompleteAdapter", "operations": ["foo", "bar"]}"#;
const INCOMPLETE: &str = r#"{"name": "IncompleteAdapter", "operations": ["foo"]}"#;
const EMPTY: &str = r#"{"name": "EmptyAdapter", "operations": []}"#;

// ── Version ───────────────────────────────────────────────

#[test]
fn test_version_command() {
    let output = run_portcheck(&["version"]);
    assert!(output.status.success(), "version should exit 0");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("portcheck"), "should contain 'portcheck'");
    assert!(
        stdout.contains(env!("CARGO_PKG_VERSION")),
        "should contain version"
    );
}

#[test]
fn test_version_reports_core_version() {
    let output = run_portcheck(&["version"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let expected = format!("(portcheck-core {})", portcheck_core::VERSION);
    assert!(stdout.contains(&expected), "should report the core crate version");
}

#[test]
fn test_version_flag() {
    let output = run_portcheck(&["--version"]);
    assert!(output.status.success(), "--version should exit 0");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

// ── Verify ────────────────────────────────────────────────

#[test]
fn test_verify_complete_adapter() {
    let dir = TempDir::new().unwrap();
    let port = write(&dir, "port.json", MY_PORT);
    let adapter = write(&dir, "adapter.json", COMPLETE);

    let output = run_portcheck(&["verify", &port, &adapter]);
    assert!(output.status.success(), "complete adapter should exit 0");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("CompleteAdapter implements MyPort"));
}

#[test]
fn test_verify_incomplete_adapter() {
    let dir = TempDir::new().unwrap();
    let port = write(&dir, "port.json", MY_PORT);
    let adapter = write(&dir, "adapter.json", INCOMPLETE);

    let output = run_portcheck(&["verify", &port, &adapter]);
    assert_eq!(output.status.code(), Some(1), "missing operations should exit 1");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("does not implement MyPort"));
    assert!(stdout.contains("missing: bar"));
    assert!(!stdout.contains("missing: foo"));
}

#[test]
fn test_verify_json_preserves_declared_order() {
    let dir = TempDir::new().unwrap();
    let port = write(&dir, "port.json", MY_PORT);
    let adapter = write(&dir, "adapter.json", EMPTY);

    let output = run_portcheck(&["verify", "--json", &port, &adapter]);
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("should be valid JSON");
    assert_eq!(json["port"], "MyPort");
    assert_eq!(json["implemented"], false);
    assert_eq!(json["missing_operations"], serde_json::json!(["foo", "bar"]));
}

#[test]
fn test_verify_json_complete() {
    let dir = TempDir::new().unwrap();
    let port = write(&dir, "port.json", MY_PORT);
    let adapter = write(&dir, "adapter.json", COMPLETE);

    let output = run_portcheck(&["verify", "--json", &port, &adapter]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("should be valid JSON");
    assert_eq!(json["implemented"], true);
    assert_eq!(json["missing_operations"], serde_json::json!([]));
}

#[test]
fn test_verify_quiet() {
    let dir = TempDir::new().unwrap();
    let port = write(&dir, "port.json", MY_PORT);
    let adapter = write(&dir, "adapter.json", INCOMPLETE);

    let output = run_portcheck(&["--quiet", "verify", &port, &adapter]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty(), "quiet mode should produce no stdout");
}

#[test]
fn test_verify_against_abstract_base() {
    let dir = TempDir::new().unwrap();
    let port = write(&dir, "port.json", r#"{"name": "Port", "operations": []}"#);
    let adapter = write(&dir, "adapter.json", COMPLETE);

    let output = run_portcheck(&["verify", &port, &adapter]);
    assert_eq!(output.status.code(), Some(2), "abstract base should exit 2");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid definition"));
}

#[test]
fn test_verify_duplicate_operations() {
    let dir = TempDir::new().unwrap();
    let port = write(&dir, "port.json", r#"{"name": "Dup", "operations": ["a", "a"]}"#);
    let adapter = write(&dir, "adapter.json", COMPLETE);

    let output = run_portcheck(&["verify", &port, &adapter]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_verify_nonexistent_file() {
    let dir = TempDir::new().unwrap();
    let adapter = write(&dir, "adapter.json", COMPLETE);
    let output = run_portcheck(&["verify", "nonexistent.json", &adapter]);
    assert_eq!(output.status.code(), Some(2), "missing file should exit 2");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error"));
}

#[test]
fn test_verify_malformed_adapter() {
    let dir = TempDir::new().unwrap();
    let port = write(&dir, "port.json", MY_PORT);
    let adapter = write(&dir, "adapter.json", "not json");

    let output = run_portcheck(&["verify", &port, &adapter]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_verify_ignores_inherited_operations() {
    let dir = TempDir::new().unwrap();
    let port = write(
        &dir,
        "port.json",
        r#"{"name": "ReservationPort", "extends": ["HealthPort"], "operations": ["list"]}"#,
    );
    let adapter = write(&dir, "adapter.json", r#"{"name": "A", "operations": ["list"]}"#);

    let output = run_portcheck(&["verify", &port, &adapter]);
    assert!(output.status.success());
}

// ── Show ──────────────────────────────────────────────────

#[test]
fn test_show_port() {
    let dir = TempDir::new().unwrap();
    let port = write(&dir, "port.json", MY_PORT);

    let output = run_portcheck(&["show", &port]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("MyPort"));
    assert!(stdout.contains("- foo"));
    assert!(stdout.contains("- bar/1"));
}

#[test]
fn test_show_json() {
    let dir = TempDir::new().unwrap();
    let port = write(&dir, "port.json", MY_PORT);

    let output = run_portcheck(&["show", "--json", &port]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("should be valid JSON");
    assert_eq!(json["definition"]["name"], "MyPort");
    assert_eq!(json["definition"]["operations"][1]["arity"], 1);
    assert_eq!(json["fingerprint"].as_str().map(str::len), Some(64));
}

// ── Hash ──────────────────────────────────────────────────

#[test]
fn test_hash_port() {
    let dir = TempDir::new().unwrap();
    let port = write(&dir, "port.json", MY_PORT);

    let output = run_portcheck(&["hash", &port]);
    assert!(output.status.success(), "hash should exit 0");
    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    assert_eq!(stdout.len(), 64, "SHA-256 hash should be 64 hex chars");
    assert!(stdout.chars().all(|c| c.is_ascii_hexdigit()), "hash should be hex");
}

#[test]
fn test_hash_determinism() {
    let dir = TempDir::new().unwrap();
    let port = write(&dir, "port.json", MY_PORT);

    let first = run_portcheck(&["hash", &port]);
    let first_hash = String::from_utf8_lossy(&first.stdout).trim().to_string();

    for _ in 0..10 {
        let output = run_portcheck(&["hash", &port]);
        let hash = String::from_utf8_lossy(&output.stdout).trim().to_string();
        assert_eq!(first_hash, hash, "hash must be deterministic");
    }
}

#[test]
fn test_hash_ignores_arity() {
    let dir = TempDir::new().unwrap();
    let plain = write(&dir, "plain.json", r#"{"name": "MyPort", "operations": ["foo", "bar"]}"#);
    let rich = write(&dir, "rich.json", MY_PORT);

    let a = run_portcheck(&["hash", &plain]);
    let b = run_portcheck(&["hash", &rich]);
    assert_eq!(a.stdout, b.stdout);
}
