//! Ownership, reference-count and parent-owner keywords.
//!
//! ## Examples
//! ```rust
//! use typesys_core::lang::ownership::{self, Ownership};
//!
//! assert_eq!(ownership::from_str("C++"), Some(Ownership::Native));
//! assert_eq!(ownership::from_str("nobody"), None);
//! ```

use super::registry::{self, VocabInfo, vocab};

/// Who owns an object after a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ownership {
    Target,
    Native,
    Default,
}

pub const OWNERSHIPS: &[VocabInfo<Ownership>] = &[
    vocab(Ownership::Target, "target", "The target language owns the object."),
    vocab(Ownership::Native, "c++", "Native code owns the object."),
    vocab(Ownership::Default, "default", "Use the default ownership rules."),
];

pub fn from_str(s: &str) -> Option<Ownership> {
    registry::lookup(OWNERSHIPS, s)
}

pub fn as_str(owner: Ownership) -> &'static str {
    registry::spelling(OWNERSHIPS, owner)
}

/// `reference-count action=...`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceCountAction {
    Add,
    Remove,
    Ignore,
}

pub const REFERENCE_COUNT_ACTIONS: &[VocabInfo<ReferenceCountAction>] = &[
    vocab(ReferenceCountAction::Add, "add", "Keep a reference to the argument."),
    vocab(ReferenceCountAction::Remove, "remove", "Drop the kept reference."),
    vocab(ReferenceCountAction::Ignore, "ignore", "Do not track the argument."),
];

pub fn reference_count_from_str(s: &str) -> Option<ReferenceCountAction> {
    registry::lookup(REFERENCE_COUNT_ACTIONS, s)
}

/// `parent action=...`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParentAction {
    Add,
    Remove,
}

pub const PARENT_ACTIONS: &[VocabInfo<ParentAction>] = &[
    vocab(ParentAction::Add, "add", "Make the indexed argument the owner."),
    vocab(ParentAction::Remove, "remove", "Release the ownership link."),
];

pub fn parent_action_from_str(s: &str) -> Option<ParentAction> {
    registry::lookup(PARENT_ACTIONS, s)
}
