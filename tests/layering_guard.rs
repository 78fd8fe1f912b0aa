//! Layering guardrails for the workspace crates.
//!
//! `typesys_core` is pure vocabulary and must stay dependency-free; `typesys_syntax` may depend on
//! the vocabulary but never on the interpreter. These tests scan the member manifests.

use std::fs;
use std::path::Path;

/// Dependency names declared in the `[dependencies]` table of a manifest.
fn main_dependencies(manifest: &str) -> Vec<String> {
    let mut in_dependencies = false;
    let mut names = Vec::new();

    for raw_line in manifest.lines() {
        let line = raw_line.trim();
        if line.starts_with('[') {
            in_dependencies = line == "[dependencies]";
            continue;
        }
        if !in_dependencies || line.is_empty() || line.starts_with('#') {
            continue;
        }
        // Strip inline comments for robustness.
        let line_no_comment = line.split('#').next().unwrap_or("").trim();
        if let Some((name, _)) = line_no_comment.split_once('=') {
            names.push(name.trim().to_string());
        }
    }
    names
}

fn manifest(crate_dir: &str) -> String {
    fs::read_to_string(Path::new(env!("CARGO_MANIFEST_DIR")).join(crate_dir).join("Cargo.toml")).unwrap()
}

#[test]
fn core_vocabulary_has_no_dependencies() {
    let deps = main_dependencies(&manifest("crates/typesys_core"));
    assert!(deps.is_empty(), "typesys_core must stay dependency-free, found {deps:?}");
}

#[test]
fn syntax_does_not_depend_on_the_interpreter() {
    let deps = main_dependencies(&manifest("crates/typesys_syntax"));
    assert!(deps.iter().any(|d| d == "typesys_core"));
    assert!(
        !deps.iter().any(|d| d == "typesys"),
        "`typesys` must not appear in typesys_syntax [dependencies]"
    );
}

#[test]
fn interpreter_depends_on_both_layers() {
    let deps = main_dependencies(&manifest("."));
    assert!(deps.iter().any(|d| d == "typesys_core"));
    assert!(deps.iter().any(|d| d == "typesys_syntax"));
}
