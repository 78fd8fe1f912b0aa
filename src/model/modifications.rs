//! Function, argument, field and documentation modifications.

use std::collections::BTreeMap;

use bitflags::bitflags;
use typesys_core::lang::documentation::{DocMode, IncludeLocation};
use typesys_core::lang::languages::CodeLanguage;
use typesys_core::lang::modifiers::{ModifierId, RemovalScope};
use typesys_core::lang::ownership::{Ownership, ParentAction, ReferenceCountAction};

use super::code::{CodeBuffer, CodeSnip};

bitflags! {
    /// Access, finality and bookkeeping bits of a modification.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u32 {
        const PRIVATE = 1 << 0;
        const PROTECTED = 1 << 1;
        const PUBLIC = 1 << 2;
        const FRIENDLY = 1 << 3;
        const FINAL = 1 << 4;
        const NON_FINAL = 1 << 5;
        const READABLE = 1 << 6;
        const WRITABLE = 1 << 7;
        const CODE_INJECTION = 1 << 8;
        const RENAME = 1 << 9;
        const DEPRECATED = 1 << 10;
        const REPLACE_EXPRESSION = 1 << 11;
        const VIRTUAL_SLOT = 1 << 12;
    }
}

impl Modifiers {
    /// The bit set by an access keyword.
    pub fn from_modifier(id: ModifierId) -> Self {
        match id {
            ModifierId::Private => Modifiers::PRIVATE,
            ModifierId::Public => Modifiers::PUBLIC,
            ModifierId::Protected => Modifiers::PROTECTED,
            ModifierId::Friendly => Modifiers::FRIENDLY,
            ModifierId::Rename => Modifiers::RENAME,
            ModifierId::Final => Modifiers::FINAL,
            ModifierId::NonFinal => Modifiers::NON_FINAL,
        }
    }
}

/// Where a removed function disappears from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Removal {
    #[default]
    None,
    TargetOnly,
    All,
}

impl From<RemovalScope> for Removal {
    fn from(scope: RemovalScope) -> Self {
        match scope {
            RemovalScope::Target => Removal::TargetOnly,
            RemovalScope::All => Removal::All,
        }
    }
}

/// `reference-count` rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceCount {
    pub action: ReferenceCountAction,
    pub variable_name: String,
}

/// `parent` rule: argument `index` becomes (or stops being) the owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgumentOwner {
    pub index: i32,
    pub action: ParentAction,
}

/// Changes to one argument (or the return value, or the receiver) of a function.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ArgumentModification {
    /// `0` is the return value, `-1` the receiver, positive values are 1-based parameters.
    pub index: i32,
    /// Only meaningful for the return value.
    pub replace_value: Option<String>,
    pub reset_after_use: bool,
    pub no_null_pointers: bool,
    /// Only kept for the return value.
    pub null_pointer_default_value: Option<String>,
    pub ownerships: BTreeMap<CodeLanguage, Ownership>,
    pub reference_counts: Vec<ReferenceCount>,
    pub owner: Option<ArgumentOwner>,
    pub modified_type: Option<String>,
    pub conversion_rules: Vec<CodeSnip>,
    pub replaced_default_expression: Option<String>,
    pub removed_default_expression: bool,
    pub removed: bool,
    pub renamed_to: Option<String>,
    /// Bits set by `access` children of the argument.
    pub modifiers: Modifiers,
}

impl ArgumentModification {
    pub fn new(index: i32) -> Self {
        Self {
            index,
            ..Self::default()
        }
    }
}

/// Changes to one function, keyed by its normalized signature.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FunctionModification {
    pub signature: String,
    pub since: f64,
    pub modifiers: Modifiers,
    pub removal: Removal,
    pub renamed_to: Option<String>,
    pub association: Option<String>,
    pub thread: bool,
    pub allow_thread: bool,
    pub argument_mods: Vec<ArgumentModification>,
    pub snips: Vec<CodeSnip>,
}

impl FunctionModification {
    pub fn new(signature: impl Into<String>, since: f64) -> Self {
        Self {
            signature: signature.into(),
            since,
            ..Self::default()
        }
    }

    pub fn is_renamed(&self) -> bool {
        self.modifiers.contains(Modifiers::RENAME)
    }

    pub fn is_removed(&self) -> bool {
        self.removal != Removal::None
    }

    pub fn is_deprecated(&self) -> bool {
        self.modifiers.contains(Modifiers::DEPRECATED)
    }
}

/// Changes to one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldModification {
    pub name: String,
    pub modifiers: Modifiers,
    pub renamed_to: Option<String>,
}

impl FieldModification {
    /// A modification that leaves the field readable and writable.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            modifiers: Modifiers::READABLE | Modifiers::WRITABLE,
            renamed_to: None,
        }
    }

    pub fn is_readable(&self) -> bool {
        self.modifiers.contains(Modifiers::READABLE)
    }

    pub fn is_writable(&self) -> bool {
        self.modifiers.contains(Modifiers::WRITABLE)
    }
}

/// How a documentation modification applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocModificationMode {
    Append,
    Prepend,
    Replace,
    XPathReplace,
}

impl From<DocMode> for DocModificationMode {
    fn from(mode: DocMode) -> Self {
        match mode {
            DocMode::Append => DocModificationMode::Append,
            DocMode::Prepend => DocModificationMode::Prepend,
            DocMode::Replace => DocModificationMode::Replace,
        }
    }
}

/// `inject-documentation` or `modify-documentation`.
#[derive(Debug, Clone, PartialEq)]
pub struct DocModification {
    pub mode: DocModificationMode,
    /// Only set for [`DocModificationMode::XPathReplace`].
    pub xpath: String,
    /// Signature of the targeted function; empty for type-level documentation.
    pub signature: String,
    pub format: CodeLanguage,
    pub code: CodeBuffer,
    pub since: f64,
}

/// `rejection`: any field left at `*` matches everything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub class: String,
    pub function_name: String,
    pub field_name: String,
    pub enum_name: String,
}

impl Rejection {
    pub const WILDCARD: &'static str = "*";

    /// Whether the whole class is rejected (no narrower selector given).
    pub fn rejects_class(&self, class: &str) -> bool {
        self.class == class
            && self.function_name == Self::WILDCARD
            && self.field_name == Self::WILDCARD
            && self.enum_name == Self::WILDCARD
    }
}

/// A header or import that provides a type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Include {
    pub location: IncludeLocation,
    pub file_name: String,
}
