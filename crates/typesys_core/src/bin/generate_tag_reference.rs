//! Generate Markdown reference docs from `typesys_core::lang` registries.
//!
//! This binary renders the tag table, attribute schemas and keyword registries into a single
//! Markdown document at `docs/reference/tags.md`.
//!
//! ## Notes
//! - The generated file is a derived artifact; update the registries instead of editing it.
//!
//! ## Examples
//! Run from the workspace root:
//! ```bash
//! cargo run -p typesys_core --bin generate_tag_reference
//! ```
//!
//! ## Panics
//! - If the workspace root cannot be resolved.
//! - If the output file cannot be written.

use std::fs;
use std::path::{Path, PathBuf};

use typesys_core::lang::attributes::{self, AttrDefault};
use typesys_core::lang::registry::VocabInfo;
use typesys_core::lang::tags::{self, TAGS};
use typesys_core::lang::{containers, documentation, languages, modifiers, ownership};

fn main() {
    let root = workspace_root();
    let out_dir = root.join("docs/reference");
    fs::create_dir_all(&out_dir).expect("create docs/reference/");
    write_reference(&out_dir.join("tags.md"));
}

fn write_reference(path: &Path) {
    let mut out = String::new();
    out.push_str("# Typesystem tag reference\n\n");
    out.push_str("Generated file. Regenerate with `cargo run -p typesys_core --bin generate_tag_reference`.\n\n");

    render_tags(&mut out);
    render_keywords(&mut out, "Code languages", languages::LANGUAGES);
    render_keywords(&mut out, "Snippet positions", languages::POSITIONS);
    render_keywords(&mut out, "Access modifiers", modifiers::MODIFIERS);
    render_keywords(&mut out, "Removal scopes", modifiers::REMOVAL_SCOPES);
    render_keywords(&mut out, "Ownership", ownership::OWNERSHIPS);
    render_keywords(&mut out, "Reference-count actions", ownership::REFERENCE_COUNT_ACTIONS);
    render_keywords(&mut out, "Parent actions", ownership::PARENT_ACTIONS);
    render_keywords(&mut out, "Container kinds", containers::CONTAINERS);
    render_keywords(&mut out, "Documentation modes", documentation::DOC_MODES);
    render_keywords(&mut out, "Include locations", documentation::INCLUDE_LOCATIONS);

    while out.ends_with("\n\n") {
        out.pop();
    }
    fs::write(path, out).expect("write tags.md");
}

fn render_tags(out: &mut String) {
    out.push_str("## Tags\n\n");
    out.push_str("| Tag | Parent | Attributes | Description |\n");
    out.push_str("|---|---|---|---|\n");
    for tag in TAGS {
        let attrs = attributes::specs(tag.id)
            .map(|spec| {
                let default = match spec.default {
                    AttrDefault::Empty => String::new(),
                    AttrDefault::Literal(v) => format!("=`{v}`"),
                    AttrDefault::DocumentPackage => "=(package)".to_string(),
                    AttrDefault::DocumentSuperclass => "=(default-superclass)".to_string(),
                    AttrDefault::EntitySuffix(s) => format!("=(entity){s}"),
                };
                let marker = if spec.required { "*" } else { "" };
                format!("`{}`{marker}{default}", spec.key)
            })
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&format!(
            "| `{}` | {} | {} | {} |\n",
            tags::as_str(tag.id),
            tag.parent_hint,
            attrs,
            tag.description
        ));
    }
    out.push_str("\n`*` marks required attributes.\n\n");
}

fn render_keywords<Id: Copy + std::fmt::Debug>(out: &mut String, heading: &str, table: &[VocabInfo<Id>]) {
    out.push_str(&format!("## {heading}\n\n"));
    out.push_str("| Id | Spelling | Description |\n");
    out.push_str("|---|---|---|\n");
    for info in table {
        out.push_str(&format!("| {:?} | `{}` | {} |\n", info.id, info.canonical, info.description));
    }
    out.push('\n');
}

fn workspace_root() -> PathBuf {
    // crates/typesys_core -> crates -> workspace root
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .map(|p| p.to_path_buf())
        .expect("workspace root (two levels above crates/typesys_core)")
}
