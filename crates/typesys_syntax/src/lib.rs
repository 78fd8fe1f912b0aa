//! Syntax frontend for typesystem documents: document events, signature grammar, diagnostics.
//!
//! This crate is "syntax-only": it turns document text into a flat stream of open/close/text events
//! and decomposes signature strings into descriptors. It never touches a registry and never decides
//! what a tag means; that is the job of the `typesys` handler.
//!
//! ## Examples
//! ```rust
//! use typesys_syntax::signature;
//!
//! let f = signature::parse_function("foo(int a, const Bar &b)", "void", 0.0).unwrap();
//! assert_eq!(f.name, "foo");
//! assert_eq!(f.arguments.len(), 2);
//! assert!(f.arguments[1].is_const && f.arguments[1].is_reference);
//! ```
//!
//! ## See also
//! - `typesys_core::lang` for the closed tag vocabulary.

pub mod diagnostics;
pub mod events;
pub mod signature;

pub use diagnostics::{SignatureError, SyntaxError};
pub use events::{DocumentEvent, EventReader, Span, Spanned};
