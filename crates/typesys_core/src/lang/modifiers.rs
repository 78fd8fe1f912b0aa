//! Access modifiers and removal scopes.
//!
//! Access keywords are accepted in three places with different subsets:
//! - the `access` tag (`modifier=...`) accepts all of them, including `rename`;
//! - `modify-function access=...` accepts the visibility and finality keywords;
//! - `add-function access=...` accepts only `public` and `protected`.

use super::registry::{self, VocabInfo, vocab};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModifierId {
    Private,
    Public,
    Protected,
    Friendly,
    Rename,
    Final,
    NonFinal,
}

/// Which tag or attribute is asking for a modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifierContext {
    AccessTag,
    ModifyFunction,
    AddFunction,
}

pub const MODIFIERS: &[VocabInfo<ModifierId>] = &[
    vocab(ModifierId::Private, "private", "Private visibility."),
    vocab(ModifierId::Public, "public", "Public visibility."),
    vocab(ModifierId::Protected, "protected", "Protected visibility."),
    vocab(ModifierId::Friendly, "friendly", "Package visibility."),
    vocab(ModifierId::Rename, "rename", "Marks the target as renamed."),
    vocab(ModifierId::Final, "final", "The function may not be overridden."),
    vocab(ModifierId::NonFinal, "non-final", "The function may be overridden."),
];

pub fn accepted(context: ModifierContext) -> &'static [ModifierId] {
    match context {
        ModifierContext::AccessTag => &[
            ModifierId::Private,
            ModifierId::Public,
            ModifierId::Protected,
            ModifierId::Friendly,
            ModifierId::Rename,
            ModifierId::Final,
            ModifierId::NonFinal,
        ],
        ModifierContext::ModifyFunction => &[
            ModifierId::Private,
            ModifierId::Protected,
            ModifierId::Public,
            ModifierId::Final,
            ModifierId::NonFinal,
        ],
        ModifierContext::AddFunction => &[ModifierId::Public, ModifierId::Protected],
    }
}

pub fn from_str(context: ModifierContext, s: &str) -> Option<ModifierId> {
    registry::lookup(MODIFIERS, s).filter(|m| accepted(context).contains(m))
}

pub fn as_str(id: ModifierId) -> &'static str {
    registry::spelling(MODIFIERS, id)
}

/// Scope of a `remove` directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemovalScope {
    /// Removed from the target language and the native wrapper.
    Target,
    /// Removed everywhere.
    All,
}

pub const REMOVAL_SCOPES: &[VocabInfo<RemovalScope>] = &[
    vocab(RemovalScope::Target, "target", "Remove from target-language and native code."),
    vocab(RemovalScope::All, "all", "Remove everywhere."),
];

pub fn removal_from_str(s: &str) -> Option<RemovalScope> {
    registry::lookup(REMOVAL_SCOPES, s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_function_only_accepts_public_and_protected() {
        assert_eq!(from_str(ModifierContext::AddFunction, "Protected"), Some(ModifierId::Protected));
        assert_eq!(from_str(ModifierContext::AddFunction, "private"), None);
        assert_eq!(from_str(ModifierContext::ModifyFunction, "non-final"), Some(ModifierId::NonFinal));
        assert_eq!(from_str(ModifierContext::ModifyFunction, "friendly"), None);
        assert_eq!(from_str(ModifierContext::AccessTag, "rename"), Some(ModifierId::Rename));
    }

    #[test]
    fn removal_scopes() {
        assert_eq!(removal_from_str("ALL"), Some(RemovalScope::All));
        assert_eq!(removal_from_str("native"), None);
        assert_eq!(as_str(ModifierId::NonFinal), "non-final");
    }
}
