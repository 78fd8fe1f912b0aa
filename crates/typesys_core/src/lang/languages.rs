//! Code languages and snippet positions.
//!
//! The same `class` attribute spelling means different things depending on the tag it appears on:
//! `inject-code` accepts every [`CodeLanguage`], while ownership rules, conversion rules and
//! documentation formats only accept a subset. [`LanguageContext`] captures which subset applies.
//!
//! ## Examples
//! ```rust
//! use typesys_core::lang::languages::{self, CodeLanguage, LanguageContext};
//!
//! assert_eq!(languages::from_str(LanguageContext::Ownership, "shell"), Some(CodeLanguage::Shell));
//! assert_eq!(languages::from_str(LanguageContext::Ownership, "interface"), None);
//! ```

use super::registry::{self, VocabInfo, vocab};

/// Language a code snippet or rule is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CodeLanguage {
    Target,
    Native,
    Shell,
    ShellDeclaration,
    LibraryInitializer,
    DestructorFunction,
    Constructors,
    Interface,
}

/// Which tag is asking for a language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageContext {
    /// `inject-code class=...`
    Snippet,
    /// `conversion-rule class=...` under `modify-argument`
    Conversion,
    /// `define-ownership class=...`
    Ownership,
    /// `inject-documentation format=...`
    DocumentationFormat,
}

pub const LANGUAGES: &[VocabInfo<CodeLanguage>] = &[
    vocab(CodeLanguage::Target, "target", "Target-language binding code."),
    vocab(CodeLanguage::Native, "native", "Native wrapper code."),
    vocab(CodeLanguage::Shell, "shell", "Shell class code, before the class declaration."),
    vocab(
        CodeLanguage::ShellDeclaration,
        "shell-declaration",
        "Shell class code, inside the class declaration.",
    ),
    vocab(
        CodeLanguage::LibraryInitializer,
        "library-initializer",
        "Module initialization code.",
    ),
    vocab(
        CodeLanguage::DestructorFunction,
        "destructor-function",
        "Code for the generated destructor function.",
    ),
    vocab(CodeLanguage::Constructors, "constructors", "Code run by every constructor."),
    vocab(CodeLanguage::Interface, "interface", "Code for an interface type."),
];

/// Where a snippet is inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnipPosition {
    Beginning,
    End,
    Declaration,
    PrototypeInitialization,
    ConstructorInitialization,
    Constructor,
}

pub const POSITIONS: &[VocabInfo<SnipPosition>] = &[
    vocab(SnipPosition::Beginning, "beginning", "Before the generated body."),
    vocab(SnipPosition::End, "end", "After the generated body."),
    vocab(SnipPosition::Declaration, "declaration", "In the declaration section."),
    vocab(
        SnipPosition::PrototypeInitialization,
        "prototype-initialization",
        "During prototype initialization.",
    ),
    vocab(
        SnipPosition::ConstructorInitialization,
        "constructor-initialization",
        "During constructor initialization.",
    ),
    vocab(SnipPosition::Constructor, "constructor", "Inside the constructor."),
];

/// Languages accepted in `context`, in table order.
pub fn accepted(context: LanguageContext) -> &'static [CodeLanguage] {
    match context {
        LanguageContext::Snippet => &[
            CodeLanguage::Target,
            CodeLanguage::Native,
            CodeLanguage::Shell,
            CodeLanguage::ShellDeclaration,
            CodeLanguage::LibraryInitializer,
            CodeLanguage::DestructorFunction,
            CodeLanguage::Constructors,
            CodeLanguage::Interface,
        ],
        LanguageContext::Conversion => &[CodeLanguage::Target, CodeLanguage::Native, CodeLanguage::Shell],
        LanguageContext::Ownership => &[CodeLanguage::Target, CodeLanguage::Shell],
        LanguageContext::DocumentationFormat => &[CodeLanguage::Target, CodeLanguage::Native],
    }
}

/// Lookup a language spelling valid in `context` (case-insensitive).
pub fn from_str(context: LanguageContext, s: &str) -> Option<CodeLanguage> {
    registry::lookup(LANGUAGES, s).filter(|lang| accepted(context).contains(lang))
}

pub fn as_str(lang: CodeLanguage) -> &'static str {
    registry::spelling(LANGUAGES, lang)
}

pub fn position_from_str(s: &str) -> Option<SnipPosition> {
    registry::lookup(POSITIONS, s)
}

pub fn position_as_str(position: SnipPosition) -> &'static str {
    registry::spelling(POSITIONS, position)
}
