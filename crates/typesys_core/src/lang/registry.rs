//! Shareable metadata for `typesys_core::lang` registries.
//!
//! The `typesys_core::lang` module is a set of **registry-first** vocabularies: tags, languages,
//! positions, ownership keywords, etc. This submodule provides the small, dependency-free metadata
//! type and lookup helpers reused across the keyword registries.
//!
//! ## Notes
//! - [`VocabInfo`] is `Copy` so registries can live in `const` tables.
//! - Spellings are compared ASCII-case-insensitively, matching how documents are read.
//!
//! ## See also
//! - [`crate::lang::languages`]
//! - [`crate::lang::ownership`]
//! - [`crate::lang::modifiers`]

/// Shared metadata shape for keyword-like vocabulary items.
///
/// ## Notes
/// - `canonical` is the spelling used in documentation and diagnostics.
/// - `aliases` are extra spellings accepted by the handler.
/// - `description` is mandatory to keep generated reference tables useful.
#[derive(Debug, Clone, Copy)]
pub struct VocabInfo<Id> {
    pub id: Id,
    pub canonical: &'static str,
    pub aliases: &'static [&'static str],
    pub description: &'static str,
}

impl<Id: Copy> VocabInfo<Id> {
    /// Whether `s` is the canonical spelling or one of the aliases (case-insensitive).
    pub fn matches(&self, s: &str) -> bool {
        self.canonical.eq_ignore_ascii_case(s) || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(s))
    }
}

/// Build a [`VocabInfo`] without aliases.
pub const fn vocab<Id: Copy>(id: Id, canonical: &'static str, description: &'static str) -> VocabInfo<Id> {
    VocabInfo {
        id,
        canonical,
        aliases: &[],
        description,
    }
}

/// Lookup an id by spelling (canonical or alias).
///
/// ## Parameters
/// - `table`: the registry to search.
/// - `s`: candidate spelling.
///
/// ## Returns
/// - `Some(id)` for the first matching entry, `None` otherwise.
pub fn lookup<Id: Copy>(table: &[VocabInfo<Id>], s: &str) -> Option<Id> {
    table.iter().find(|info| info.matches(s)).map(|info| info.id)
}

/// Canonical spelling of `id` within `table`.
///
/// ## Panics
/// - If `id` has no entry in `table` (this indicates a programming error in a registry).
pub fn spelling<Id: Copy + PartialEq>(table: &[VocabInfo<Id>], id: Id) -> &'static str {
    table
        .iter()
        .find(|info| info.id == id)
        .map(|info| info.canonical)
        .expect("INVARIANT: vocabulary registry is missing an entry")
}

/// Canonical spellings of a registry, in table order (for diagnostics listing accepted values).
pub fn spellings<Id: Copy>(table: &[VocabInfo<Id>]) -> Vec<&'static str> {
    table.iter().map(|info| info.canonical).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Probe {
        One,
        Two,
    }

    const TABLE: &[VocabInfo<Probe>] = &[
        vocab(Probe::One, "one", "First."),
        VocabInfo {
            id: Probe::Two,
            canonical: "two",
            aliases: &["deux"],
            description: "Second.",
        },
    ];

    #[test]
    fn lookup_is_case_insensitive_and_honors_aliases() {
        assert_eq!(lookup(TABLE, "ONE"), Some(Probe::One));
        assert_eq!(lookup(TABLE, "Deux"), Some(Probe::Two));
        assert_eq!(lookup(TABLE, "three"), None);
    }

    #[test]
    fn spelling_returns_canonical() {
        assert_eq!(spelling(TABLE, Probe::Two), "two");
        assert_eq!(spellings(TABLE), vec!["one", "two"]);
    }
}
