use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use typesys_core::lang::attributes::{self, AttrDefault};
use typesys_core::lang::registry::{self, VocabInfo};
use typesys_core::lang::tags::{self, TAGS};
use typesys_core::lang::{containers, documentation, languages, modifiers, ownership};

/// Every spelling resolves back to its own id, and no spelling is shared between entries.
fn assert_registry<Id: Copy + PartialEq + std::fmt::Debug>(name: &str, table: &[VocabInfo<Id>]) {
    let mut seen = BTreeSet::new();
    for info in table {
        assert!(!info.description.is_empty(), "{name}: '{}' has no description", info.canonical);
        for spelling in std::iter::once(&info.canonical).chain(info.aliases) {
            assert!(
                seen.insert(spelling.to_ascii_lowercase()),
                "{name}: spelling '{spelling}' is registered twice"
            );
            assert_eq!(registry::lookup(table, spelling), Some(info.id), "{name}: '{spelling}'");
        }
        assert_eq!(registry::spelling(table, info.id), info.canonical);
    }
}

#[test]
fn keyword_registries_are_unique_and_resolvable() {
    assert_registry("containers", containers::CONTAINERS);
    assert_registry("doc modes", documentation::DOC_MODES);
    assert_registry("include locations", documentation::INCLUDE_LOCATIONS);
    assert_registry("languages", languages::LANGUAGES);
    assert_registry("positions", languages::POSITIONS);
    assert_registry("modifiers", modifiers::MODIFIERS);
    assert_registry("removal scopes", modifiers::REMOVAL_SCOPES);
    assert_registry("ownerships", ownership::OWNERSHIPS);
    assert_registry("reference-count actions", ownership::REFERENCE_COUNT_ACTIONS);
    assert_registry("parent actions", ownership::PARENT_ACTIONS);
}

#[test]
fn tag_spellings_are_unique_and_resolvable() {
    let mut seen = BTreeSet::new();
    for info in TAGS {
        assert!(seen.insert(info.canonical), "tag '{}' is registered twice", info.canonical);
        assert_eq!(tags::from_str(info.canonical), Some(info.id));
        assert_eq!(tags::as_str(info.id), info.canonical);
        assert!(!info.parent_hint.is_empty(), "'{}' has no parent hint", info.canonical);
    }
    assert!(tags::from_str(tags::IMPORT_FILE).is_none());
}

#[test]
fn attribute_schemas_are_well_formed() {
    for info in TAGS {
        let mut keys = BTreeSet::new();
        for spec in attributes::specs(info.id) {
            assert!(
                keys.insert(spec.key),
                "'{}' declares attribute '{}' twice",
                info.canonical,
                spec.key
            );
            assert_eq!(spec.key, spec.key.to_ascii_lowercase(), "keys are stored lowercased");
            if spec.required {
                assert_eq!(
                    spec.default,
                    AttrDefault::Empty,
                    "required '{}' on '{}' has a default",
                    spec.key,
                    info.canonical
                );
            }
        }
        assert!(keys.contains("since"), "'{}' has no 'since' attribute", info.canonical);
    }
}

/// Guardrail against reintroducing stringly-typed tag checks.
///
/// This is intentionally a **coarse** safety net. It looks for suspicious patterns like
/// `== "modify-function"` or `"value-type" => ...` in Rust source files where we expect callers
/// to go through `typesys_core::lang` registries instead.
///
/// Notes:
/// - We allow occurrences in `crates/typesys_core/src/lang/**` (registries themselves), in docgen, and in tests.
#[test]
fn no_new_stringly_vocab_checks_in_rust_sources() {
    let root = repo_root();
    let spellings: Vec<&'static str> = TAGS.iter().map(|t| t.canonical).collect();
    let mut offenders: Vec<(PathBuf, usize, String)> = Vec::new();

    for dir in [root.join("src"), root.join("crates")] {
        if dir.exists() {
            scan_dir(&root, &dir, &spellings, &mut offenders);
        }
    }

    if !offenders.is_empty() {
        let mut msg = String::new();
        msg.push_str("Found potential stringly-typed tag checks. Prefer typesys_core registries.\n\n");
        for (path, line_no, line) in offenders.into_iter().take(80) {
            msg.push_str(&format!(
                "- {}:{}: {}\n",
                path.strip_prefix(&root).unwrap_or(&path).display(),
                line_no,
                line.trim()
            ));
        }
        panic!("{msg}");
    }
}

fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

fn is_allowed_file(root: &Path, path: &Path) -> bool {
    let rel = path.strip_prefix(root).unwrap_or(path).to_string_lossy();
    if !rel.ends_with(".rs") {
        return true;
    }
    if rel.starts_with("crates/typesys_core/src/lang/") || rel.starts_with("crates/typesys_core/src/bin/") {
        return true;
    }
    // Unit tests spell tags directly in their documents.
    rel.ends_with("/tests.rs")
}

fn scan_dir(root: &Path, dir: &Path, spellings: &[&'static str], offenders: &mut Vec<(PathBuf, usize, String)>) {
    let Ok(entries) = fs::read_dir(dir) else { return };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            scan_dir(root, &path, spellings, offenders);
            continue;
        }
        if is_allowed_file(root, &path) {
            continue;
        }
        let Ok(contents) = fs::read_to_string(&path) else {
            continue;
        };
        for (idx, line) in contents.lines().enumerate() {
            if is_suspicious_line(line, spellings) {
                offenders.push((path.clone(), idx + 1, line.to_string()));
            }
        }
    }
}

fn is_suspicious_line(line: &str, spellings: &[&'static str]) -> bool {
    let trimmed = line.trim_start();
    if trimmed.starts_with("//") {
        return false;
    }
    spellings.iter().any(|s| {
        let eq = format!("== \"{s}\"");
        let arm = format!("\"{s}\" =>");
        line.contains(&eq) || line.contains(&arm)
    })
}
