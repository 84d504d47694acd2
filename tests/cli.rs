// Binary-level checks that do not need a terminal.

use assert_cmd::Command;

#[test]
fn help_lists_duration_formats() {
    let assert = Command::cargo_bin("pomoclock")
        .unwrap()
        .arg("--help")
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    assert!(stdout.contains("Duration formats"), "{stdout}");
    assert!(stdout.contains("--cmd"), "{stdout}");
    assert!(stdout.contains("--log-dir"), "{stdout}");
}

#[test]
fn refuses_to_run_without_a_tty() {
    let dir = tempfile::tempdir().unwrap();
    let assert = Command::cargo_bin("pomoclock")
        .unwrap()
        .args(["1", "1", "--log-dir"])
        .arg(dir.path())
        .write_stdin("")
        .assert()
        .failure();
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert!(stderr.contains("stdin must be a tty"), "{stderr}");
    // nothing was started, so nothing was logged
    assert!(!dir.path().join("events.csv").exists());
}

#[test]
fn version_flag() {
    Command::cargo_bin("pomoclock")
        .unwrap()
        .arg("--version")
        .assert()
        .success();
}
