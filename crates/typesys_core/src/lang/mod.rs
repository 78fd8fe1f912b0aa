//! Typesystem vocabulary registries.
//!
//! This module is the "front door" for document vocabulary: tag names, attribute schemas and the
//! keyword sets accepted as attribute values.
//!
//! The design goal is to avoid stringly-typed checks scattered across the handler. Callers work with
//! **stable IDs** (e.g. `TagId`, `CodeLanguage`) and look up spellings/metadata via registry tables.
//!
//! ## Notes
//! - Registries are intentionally **pure**: no IO, no side effects.
//! - Every lookup by spelling is **case-insensitive**; documents are matched the same way.
//!
//! ## Examples
//! ```rust
//! use typesys_core::lang::languages::{self, CodeLanguage, LanguageContext};
//!
//! assert_eq!(languages::from_str(LanguageContext::Snippet, "native"), Some(CodeLanguage::Native));
//! assert_eq!(languages::from_str(LanguageContext::Ownership, "native"), None);
//! ```
//!
//! ## See also
//! - `cargo run -p typesys_core --bin generate_tag_reference` to generate Markdown reference tables.

pub mod attributes;
pub mod containers;
pub mod cpp_keywords;
pub mod documentation;
pub mod languages;
pub mod modifiers;
pub mod ownership;
pub mod registry;
pub mod tags;
