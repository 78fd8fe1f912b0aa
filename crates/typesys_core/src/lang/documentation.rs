//! Documentation modes and include locations.

use super::registry::{self, VocabInfo, vocab};

/// `inject-documentation mode=...`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocMode {
    Append,
    Prepend,
    Replace,
}

pub const DOC_MODES: &[VocabInfo<DocMode>] = &[
    vocab(DocMode::Append, "append", "Append to the extracted documentation."),
    vocab(DocMode::Prepend, "prepend", "Prepend to the extracted documentation."),
    vocab(DocMode::Replace, "replace", "Replace the extracted documentation."),
];

pub fn doc_mode_from_str(s: &str) -> Option<DocMode> {
    registry::lookup(DOC_MODES, s)
}

/// `include location=...`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IncludeLocation {
    /// `#include <file>`
    Global,
    /// `#include "file"`
    Local,
    /// A target-language import.
    Target,
}

pub const INCLUDE_LOCATIONS: &[VocabInfo<IncludeLocation>] = &[
    vocab(IncludeLocation::Global, "global", "System include path."),
    vocab(IncludeLocation::Local, "local", "Local include path."),
    vocab(IncludeLocation::Target, "target", "Target-language import."),
];

pub fn include_location_from_str(s: &str) -> Option<IncludeLocation> {
    registry::lookup(INCLUDE_LOCATIONS, s)
}

pub fn include_location_as_str(location: IncludeLocation) -> &'static str {
    registry::spelling(INCLUDE_LOCATIONS, location)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups() {
        assert_eq!(doc_mode_from_str("Prepend"), Some(DocMode::Prepend));
        assert_eq!(doc_mode_from_str("xpath"), None);
        assert_eq!(include_location_from_str("LOCAL"), Some(IncludeLocation::Local));
        assert_eq!(include_location_from_str(""), None);
    }
}
