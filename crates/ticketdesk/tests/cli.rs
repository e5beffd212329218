//! Exit status of the `ticketdesk` binary.

use std::path::Path;
use std::process::{Command, Output};

fn run_validate(dir: &Path, file: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ticketdesk"))
        .arg("--config")
        .arg(dir.join("absent.toml"))
        .args(["--quiet", "config", "validate"])
        .arg(file)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn test_config_validate_accepts_good_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("good.toml");
    std::fs::write(&file, "[server]\nport = 8080\n").unwrap();

    let output = run_validate(dir.path(), &file);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Configuration is valid."));
}

#[test]
fn test_config_validate_fails_on_bad_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("bad.toml");
    std::fs::write(&file, "[dashboard]\npage_size = 0\n").unwrap();

    let output = run_validate(dir.path(), &file);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("configuration is invalid"));
}
