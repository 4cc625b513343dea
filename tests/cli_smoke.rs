use assert_cmd::prelude::*;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

const CONFIG_VARS: [&str; 8] = [
    "AZURE_ORG",
    "AZURE_DEVOPS_PAT",
    "AUTHOR_EMAILS",
    "HEATMAP_WINDOW_DAYS",
    "OUTPUT_FILE",
    "AZURE_DEVOPS_URL",
    "HEATMAP_SCALE",
    "AZURE_HTTP_TIMEOUT_SECS",
];

fn heatmap_cmd(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("ado-heatmap").unwrap();
    cmd.current_dir(dir);
    for var in CONFIG_VARS {
        cmd.env_remove(var);
    }
    cmd
}

fn stderr_of(cmd: &mut Command) -> String {
    let out = cmd.assert().failure().get_output().stderr.clone();
    String::from_utf8_lossy(&out).to_string()
}

#[test]
fn missing_token_fails_before_any_request() {
    let dir = tempdir().unwrap();
    let mut cmd = heatmap_cmd(dir.path());
    cmd.env("AZURE_ORG", "acme");

    let stderr = stderr_of(&mut cmd);
    assert!(stderr.contains("AZURE_DEVOPS_PAT"), "stderr was: {stderr}");
    assert!(!dir.path().join("commits-heatmap.svg").exists());
}

#[test]
fn invalid_window_is_rejected() {
    let dir = tempdir().unwrap();
    let mut cmd = heatmap_cmd(dir.path());
    cmd.env("AZURE_ORG", "acme")
        .env("AZURE_DEVOPS_PAT", "token")
        .env("HEATMAP_WINDOW_DAYS", "0");

    let stderr = stderr_of(&mut cmd);
    assert!(stderr.contains("HEATMAP_WINDOW_DAYS"), "stderr was: {stderr}");
}

#[test]
fn network_failure_exits_non_zero_without_output() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("out/heatmap.svg");
    let mut cmd = heatmap_cmd(dir.path());
    cmd.env("AZURE_ORG", "acme")
        .env("AZURE_DEVOPS_PAT", "token")
        .env("AZURE_DEVOPS_URL", "http://127.0.0.1:9")
        .env("AZURE_HTTP_TIMEOUT_SECS", "5")
        .env("OUTPUT_FILE", &output);

    let stderr = stderr_of(&mut cmd);
    assert!(stderr.contains("Failed to enumerate repositories"), "stderr was: {stderr}");
    assert!(!output.exists());
}

#[test]
fn dotenv_file_supplies_configuration() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join(".env"), "AZURE_ORG=acme\nHEATMAP_SCALE=bogus\n").unwrap();
    let mut cmd = heatmap_cmd(dir.path());
    cmd.env("AZURE_DEVOPS_PAT", "token");

    let stderr = stderr_of(&mut cmd);
    assert!(stderr.contains("'bogus'"), "stderr was: {stderr}");
    assert!(stderr.contains("fixed") && stderr.contains("relative"), "stderr was: {stderr}");
}

#[test]
fn dotenv_in_a_parent_directory_is_ignored() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join(".env"), "AZURE_DEVOPS_PAT=from-parent\n").unwrap();
    let child = dir.path().join("child");
    std::fs::create_dir(&child).unwrap();
    let mut cmd = heatmap_cmd(&child);
    cmd.env("AZURE_ORG", "acme")
        .env("AZURE_DEVOPS_URL", "http://127.0.0.1:9")
        .env("AZURE_HTTP_TIMEOUT_SECS", "5");

    let stderr = stderr_of(&mut cmd);
    assert!(
        stderr.contains("AZURE_DEVOPS_PAT environment variable is not set"),
        "stderr was: {stderr}"
    );
    assert!(!child.join("commits-heatmap.svg").exists());
}

#[test]
fn help_lists_environment_variables() {
    let dir = tempdir().unwrap();
    let out = heatmap_cmd(dir.path())
        .arg("--help")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let help = String::from_utf8_lossy(&out);
    assert!(help.contains("AZURE_ORG"));
    assert!(help.contains("AUTHOR_EMAILS"));
    assert!(help.contains("HEATMAP_SCALE"));
    assert!(help.contains("fixed") && help.contains("relative"), "help was: {help}");
}
