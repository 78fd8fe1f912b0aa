//! Provide the canonical, closed vocabulary of typesystem documents.
//!
//! This crate is intentionally small and dependency-free. It contains the static tables that both the
//! document handler and tooling (CLI, reference generator, guardrail tests) read:
//! - the tag vocabulary, tag groups (masks) and the parent-compatibility table,
//! - the per-tag attribute schemas (key, default, required),
//! - the small keyword sets used as attribute values (languages, positions, ownership, modifiers, ...).
//!
//! ## Notes
//!
//! - This is a "vocabulary" crate: **no IO**, no global state, no handler types.
//! - Enforcement (errors, warnings) lives in the `typesys` crate; this crate only answers lookups.
//!
//! ## Examples
//! ```rust
//! use typesys_core::lang::tags::{self, TagId};
//!
//! assert_eq!(tags::from_str("Value-Type"), Some(TagId::ValueType));
//! assert!(tags::is_complex_type_entry(TagId::ValueType));
//! ```

pub mod lang;
