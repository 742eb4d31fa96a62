//! Runs the binary with a short, exiting configuration.

use std::process::Command;

#[test]
fn test_cli_blocking_phase_exits_with_one_capture() {
    let output = Command::new(env!("CARGO_BIN_EXE_taskdump"))
        .args(["--phases", "blocking", "--settle", "50", "--exit"])
        .output()
        .expect("failed to run taskdump");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("Booting blocking tasks...\n"));
    assert_eq!(stdout.matches("Stack of ").count(), 1);
    assert!(stdout.contains("block_wait_group()"));
    assert!(stdout.contains("[sync.WaitGroup.Wait"));
}

#[test]
fn test_cli_rejects_zero_samples() {
    let output = Command::new(env!("CARGO_BIN_EXE_taskdump"))
        .args(["--samples", "0", "--exit"])
        .output()
        .expect("failed to run taskdump");

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("samples must be at least 1"));
}
