use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::tempdir;

use mermex::{DirectSource, EmbeddedSource, FileStatus, TextSource};
use mermex_cli::{Args, FormatArg, run};

/// Collects all demo inputs with the given extensions
fn collect_demo_files(extensions: &[&str]) -> Vec<PathBuf> {
    // Demos are at workspace root, relative to workspace not the crate
    let demos_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("demos");

    let mut files: Vec<PathBuf> = if let Ok(entries) = fs::read_dir(&demos_path) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file()
                    && path
                        .extension()
                        .and_then(|s| s.to_str())
                        .is_some_and(|ext| extensions.contains(&ext))
            })
            .collect()
    } else {
        Vec::new()
    };

    // Sort for consistent test output
    files.sort();
    files
}

fn args_for(input: &Path, output_dir: &Path, validate_only: bool) -> Args {
    Args {
        input: input.to_string_lossy().to_string(),
        formats: vec![FormatArg::Mmd],
        output_dir: output_dir.to_string_lossy().to_string(),
        validate_only,
        config: None,
        log_level: "off".to_string(),
    }
}

fn check_demos(extensions: &[&str], source: &dyn TextSource) {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output_dir = temp_dir.path().to_path_buf();

    let demos = collect_demo_files(extensions);
    assert!(!demos.is_empty(), "No demo inputs found for {extensions:?}");

    let mut failed = Vec::new();
    for demo in &demos {
        match run(&args_for(demo, &output_dir, false), source) {
            Ok(Some(report)) if report.status() == FileStatus::Processed => {
                for path in report.written() {
                    assert!(path.exists(), "missing output {}", path.display());
                }
            }
            Ok(other) => failed.push((demo.clone(), format!("{other:?}"))),
            Err(err) => failed.push((demo.clone(), err.to_string())),
        }
    }

    if !failed.is_empty() {
        eprintln!("\nDemo inputs that failed:");
        for (path, reason) in &failed {
            eprintln!("  - {}: {}", path.display(), reason);
        }
        panic!("{} demo input(s) failed unexpectedly", failed.len());
    }
}

#[test]
fn e2e_smoke_test_direct_demos() {
    check_demos(&["md", "mmd"], &DirectSource);
}

#[test]
fn e2e_smoke_test_embedded_demos() {
    check_demos(&["html"], &EmbeddedSource);
}

#[test]
fn e2e_architecture_demo_outputs() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output_dir = temp_dir.path().to_path_buf();
    let demo = collect_demo_files(&["md"])
        .into_iter()
        .find(|path| path.ends_with("architecture.md"))
        .expect("architecture demo present");

    let report = run(&args_for(&demo, &output_dir, false), &DirectSource)
        .expect("Run failed")
        .expect("Input readable");

    let mmd_dir = output_dir.join("output").join("mmd");
    let names: Vec<_> = report
        .written()
        .iter()
        .map(|p| p.strip_prefix(&mmd_dir).unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(
        names,
        vec!["architecture_01.mmd", "architecture_02.mmd", "architecture_03.mmd"]
    );

    let class_diagram = fs::read_to_string(mmd_dir.join("architecture_02.mmd")).unwrap();
    assert!(!class_diagram.contains('"'), "quotes remain:\n{class_diagram}");
    assert!(class_diagram.contains("Order <|-- RushOrder"));
    assert!(class_diagram.contains("Order --> Customer : placed by"));
}

#[test]
fn e2e_embedded_demo_uses_first_payload_only() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output_dir = temp_dir.path().to_path_buf();
    let demo = collect_demo_files(&["html"])
        .into_iter()
        .next()
        .expect("html demo present");

    let report = run(&args_for(&demo, &output_dir, false), &EmbeddedSource)
        .expect("Run failed")
        .expect("Input readable");

    assert_eq!(report.diagrams(), 2);
    let first = fs::read_to_string(&report.written()[0]).unwrap();
    assert!(first.starts_with("graph TD"));
    assert!(first.contains("Build[\"Build & test\"]"));
}

#[test]
fn e2e_validate_only_writes_nothing() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output_dir = temp_dir.path().to_path_buf();

    for demo in collect_demo_files(&["md", "mmd"]) {
        let report = run(&args_for(&demo, &output_dir, true), &DirectSource)
            .expect("Run failed")
            .expect("Input readable");
        assert!(report.diagrams() > 0);
        assert!(report.written().is_empty());
    }

    assert!(!output_dir.join("output").exists());
}

#[test]
fn e2e_missing_input_is_not_fatal() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output_dir = temp_dir.path().to_path_buf();
    let missing = output_dir.join("does-not-exist.md");

    let result = run(&args_for(&missing, &output_dir, false), &DirectSource);
    assert!(matches!(result, Ok(None)), "unexpected result: {result:?}");
}
