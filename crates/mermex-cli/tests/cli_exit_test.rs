//! Exit status checks for the compiled binaries.

use std::{fs, path::Path, process::Command};

use assert_cmd::prelude::*;
use tempfile::tempdir;

fn write_missing_renderer_config(dir: &Path) -> String {
    let config = dir.join("config.toml");
    fs::write(
        &config,
        "[renderer]\ncommand = \"mermex-test-renderer-that-does-not-exist\"\n",
    )
    .expect("Failed to write config");
    config.to_string_lossy().to_string()
}

fn write_markdown(dir: &Path) -> String {
    let input = dir.join("doc.md");
    fs::write(&input, "```mermaid\ngraph TD\nA-->B\n```\n").expect("Failed to write input");
    input.to_string_lossy().to_string()
}

#[test]
fn missing_renderer_exits_with_failure() {
    let tmp = tempdir().expect("tempdir");
    let config = write_missing_renderer_config(tmp.path());
    let input = write_markdown(tmp.path());

    Command::cargo_bin("mermex")
        .expect("binary built")
        .args(["--config", &config, "--formats", "svg", "--output-dir"])
        .arg(tmp.path())
        .arg(&input)
        .assert()
        .failure()
        .code(1);

    assert!(!tmp.path().join("output").exists());
}

#[test]
fn missing_renderer_fails_in_validate_only_mode() {
    let tmp = tempdir().expect("tempdir");
    let config = write_missing_renderer_config(tmp.path());
    let input = write_markdown(tmp.path());

    Command::cargo_bin("mermex")
        .expect("binary built")
        .args(["--config", &config, "--formats", "svg", "--validate-only", "--output-dir"])
        .arg(tmp.path())
        .arg(&input)
        .assert()
        .failure()
        .code(1);
}

#[test]
fn empty_renderer_command_is_a_config_error() {
    let tmp = tempdir().expect("tempdir");
    let config = tmp.path().join("config.toml");
    fs::write(&config, "[renderer]\ncommand = \"\"\n").expect("Failed to write config");
    let input = write_markdown(tmp.path());

    Command::cargo_bin("mermex")
        .expect("binary built")
        .arg("--config")
        .arg(&config)
        .arg("--output-dir")
        .arg(tmp.path())
        .arg(&input)
        .assert()
        .failure()
        .code(1);

    assert!(!tmp.path().join("output").exists());
}

#[test]
fn missing_renderer_is_ignored_for_source_output() {
    let tmp = tempdir().expect("tempdir");
    let config = write_missing_renderer_config(tmp.path());
    let input = write_markdown(tmp.path());

    Command::cargo_bin("mermex")
        .expect("binary built")
        .args(["--config", &config, "--formats", "mmd", "--output-dir"])
        .arg(tmp.path())
        .arg(&input)
        .assert()
        .success();

    assert!(tmp.path().join("output/mmd/doc.mmd").exists());
}

#[test]
fn missing_input_exits_successfully() {
    let tmp = tempdir().expect("tempdir");

    Command::cargo_bin("mermex-js")
        .expect("binary built")
        .arg("--output-dir")
        .arg(tmp.path())
        .arg(tmp.path().join("absent.html"))
        .assert()
        .success();
}

#[test]
fn embedded_binary_extracts_payload() {
    let tmp = tempdir().expect("tempdir");
    let input = tmp.path().join("page.html");
    fs::write(
        &input,
        r#"<script>self.__next_f.push([1, "```mermaid\ngantt\n  title Plan\n```\n"])</script>"#,
    )
    .expect("Failed to write input");

    Command::cargo_bin("mermex-js")
        .expect("binary built")
        .arg("--output-dir")
        .arg(tmp.path())
        .arg(&input)
        .assert()
        .success();

    let written = fs::read_to_string(tmp.path().join("output/mmd/page.mmd")).expect("output");
    assert_eq!(written, "gantt\n  title Plan");
}
