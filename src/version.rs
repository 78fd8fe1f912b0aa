//! Version information and the API-version policy.
//!
//! This module exposes the crate version as a single constant and the comparison used to decide
//! whether a tag's `since` version is part of the API being generated.
//!
//! ## Notes
//!
//! - The crate version is taken from Cargo metadata (`CARGO_PKG_VERSION`) at compile time.
//! - The comparison is a plain function pointer stored in [`crate::config::ParserConfig`] so it can
//!   be swapped without touching the handler.

/// The typesys version string (for example, `0.1.0-alpha.4`).
pub const TYPESYS_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Decides whether a tag introduced in `since` belongs to the `requested` API version.
///
/// `requested` is `None` when the caller did not pin a version.
pub type VersionPolicy = fn(since: f64, requested: Option<f64>) -> bool;

/// Default policy: a tag is supported when `since <= requested`; everything is supported when no
/// version was requested.
pub fn inclusive(since: f64, requested: Option<f64>) -> bool {
    requested.is_none_or(|v| since <= v)
}

/// Strict variant: a tag introduced exactly at the requested version is excluded.
pub fn exclusive(since: f64, requested: Option<f64>) -> bool {
    requested.is_none_or(|v| since < v)
}
