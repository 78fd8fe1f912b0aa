#![forbid(unsafe_code)]
//! Typesystem document interpreter
//!
//! A typesystem document describes how a native library is exposed to a target language: which
//! types exist, how their functions and fields are renamed, removed or re-owned, and which code
//! is injected where. This crate reads such documents (following `load-typesystem` dependencies)
//! into a registry of type entries that a binding generator consumes.
//!
//! ## Layout
//!
//! - [`model`] - type entries, modification records and code buffers
//! - [`database`] - the [`Registry`] contract and the in-memory [`TypeDatabase`]
//! - [`handler`] - the document stack machine
//! - [`diagnostics`] - fatal errors and warnings
//! - [`config`] - search paths and API-version selection
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module
//!   enforces `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **True invariants**: If a panic represents an interpreter bug (logic error), use
//!   `.expect("INVARIANT: reason")` with a clear explanation.

pub mod cli;
pub mod config;
pub mod database;
pub mod diagnostics;
pub mod handler;
pub mod model;
pub mod version;

pub use config::ParserConfig;
pub use database::{Registry, TypeDatabase};
pub use diagnostics::{TypesystemError, Warning, WarningKind};
pub use handler::{Handler, parse_document};
