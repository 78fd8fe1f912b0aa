//! Define the closed tag vocabulary of typesystem documents.
//!
//! This module is the single source of truth for tag names: a stable identifier ([`TagId`]) plus a
//! const metadata table ([`TAGS`]) that records the canonical spelling, the groups (masks) a tag belongs
//! to, and the parent-compatibility rule the handler enforces before reading any attribute.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-insensitive**.
//! - [`IMPORT_FILE`] is a pseudo-tag: it is recognized by name before lookup and never produces a
//!   frame, so it has no [`TagId`].
//! - Type-entry tags have a dedicated placement rule (document root, or directly inside a
//!   `namespace-type`); see [`may_nest_type_entry`].
//!
//! ## Examples
//! ```rust
//! use typesys_core::lang::tags::{self, TagId};
//!
//! assert_eq!(tags::from_str("modify-argument"), Some(TagId::ModifyArgument));
//! assert!(tags::parent_allows(TagId::ModifyArgument, TagId::AddFunction));
//! assert!(!tags::parent_allows(TagId::ModifyArgument, TagId::ObjectType));
//! ```

/// Spelling of the `import-file` pseudo-tag.
pub const IMPORT_FILE: &str = "import-file";

/// Stable identifier for every recognized tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TagId {
    // Document root
    Root,

    // Type entries
    PrimitiveType,
    ContainerType,
    EnumType,
    ObjectType,
    ValueType,
    InterfaceType,
    NamespaceType,
    Function,

    // Root-level directives
    Rejection,
    SuppressWarning,
    LoadTypesystem,
    Template,

    // Type-level modifications
    AddFunction,
    AddField,
    ModifyFunction,
    ModifyField,
    ExtraIncludes,
    Include,
    CustomConstructor,
    CustomDestructor,
    RejectEnumValue,

    // Code and documentation
    InjectCode,
    ArgumentMap,
    InsertTemplate,
    Replace,
    InjectDocumentation,
    ModifyDocumentation,
    ConversionRule,

    // Function modifiers
    Access,
    Remove,
    Rename,
    ModifyArgument,

    // Argument modifiers
    ReplaceType,
    ReplaceDefaultExpression,
    RemoveDefaultExpression,
    RemoveArgument,
    DefineOwnership,
    NoNullPointer,
    ReferenceCount,
    Parent,
}

/// Named tag groups ("masks") used for structural validation and text routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagGroup {
    /// Tags that build an entity record.
    TypeEntry,
    /// Object, value, interface and namespace types.
    ComplexTypeEntry,
    /// Tags whose body is collected as a code snippet.
    CodeSnippet,
    /// Tags whose body is collected as documentation.
    Documentation,
    /// Tags that may hold documentation tags.
    DocumentationTarget,
    /// Tags that are only valid inside `modify-argument`.
    ArgumentModifier,
}

/// Parent-compatibility rule of a tag.
///
/// A parent is accepted when its tag is listed in `tags` or belongs to one of `groups`.
#[derive(Debug, Clone, Copy)]
pub struct ParentRule {
    pub tags: &'static [TagId],
    pub groups: &'static [TagGroup],
}

/// Metadata for a tag.
///
/// ## Notes
/// - `parent_hint` completes the sentence "'<tag>' requires ... as parent" in diagnostics.
#[derive(Debug, Clone, Copy)]
pub struct TagInfo {
    pub id: TagId,
    pub canonical: &'static str,
    pub groups: &'static [TagGroup],
    pub parents: ParentRule,
    pub parent_hint: &'static str,
    pub description: &'static str,
}

const TYPE_ENTRY: &[TagGroup] = &[TagGroup::TypeEntry, TagGroup::DocumentationTarget];
const COMPLEX_TYPE_ENTRY: &[TagGroup] = &[
    TagGroup::TypeEntry,
    TagGroup::ComplexTypeEntry,
    TagGroup::DocumentationTarget,
];
const ARGUMENT_MODIFIER: &[TagGroup] = &[TagGroup::ArgumentModifier];

const UNDER_ROOT: ParentRule = rule(&[TagId::Root], &[]);
const UNDER_TYPE_SCOPE: ParentRule = rule(&[TagId::Root, TagId::NamespaceType], &[]);
const UNDER_COMPLEX: ParentRule = rule(&[], &[TagGroup::ComplexTypeEntry]);
const UNDER_ROOT_OR_COMPLEX: ParentRule = rule(&[TagId::Root], &[TagGroup::ComplexTypeEntry]);
const UNDER_TYPE_ENTRY: ParentRule = rule(&[], &[TagGroup::TypeEntry]);
const UNDER_MODIFY_ARGUMENT: ParentRule = rule(&[TagId::ModifyArgument], &[]);

/// Registry of all tags.
///
/// ## Notes
/// - The ordering is not semantically meaningful, but is grouped like [`TagId`].
pub const TAGS: &[TagInfo] = &[
    info(
        TagId::Root,
        "typesystem",
        &[],
        rule(&[], &[]),
        "no element (it must be the document element)",
        "Document root; sets the default package and superclass.",
    ),
    // Type entries
    info(
        TagId::PrimitiveType,
        "primitive-type",
        TYPE_ENTRY,
        UNDER_TYPE_SCOPE,
        "the document root or a namespace-type",
        "A primitive host type; may be declared several times.",
    ),
    info(
        TagId::ContainerType,
        "container-type",
        TYPE_ENTRY,
        UNDER_TYPE_SCOPE,
        "the document root or a namespace-type",
        "A container template (list, map, pair, ...).",
    ),
    info(
        TagId::EnumType,
        "enum-type",
        TYPE_ENTRY,
        UNDER_TYPE_SCOPE,
        "the document root or a namespace-type",
        "An enumeration, optionally with a flags twin.",
    ),
    info(
        TagId::ObjectType,
        "object-type",
        COMPLEX_TYPE_ENTRY,
        UNDER_TYPE_SCOPE,
        "the document root or a namespace-type",
        "A class with identity semantics.",
    ),
    info(
        TagId::ValueType,
        "value-type",
        COMPLEX_TYPE_ENTRY,
        UNDER_TYPE_SCOPE,
        "the document root or a namespace-type",
        "A copyable class with value semantics.",
    ),
    info(
        TagId::InterfaceType,
        "interface-type",
        COMPLEX_TYPE_ENTRY,
        UNDER_TYPE_SCOPE,
        "the document root or a namespace-type",
        "An object type paired with a designated interface twin.",
    ),
    info(
        TagId::NamespaceType,
        "namespace-type",
        COMPLEX_TYPE_ENTRY,
        UNDER_TYPE_SCOPE,
        "the document root or a namespace-type",
        "A namespace; may declare namespace-scoped types.",
    ),
    info(
        TagId::Function,
        "function",
        TYPE_ENTRY,
        UNDER_TYPE_SCOPE,
        "the document root or a namespace-type",
        "A global function overload set.",
    ),
    // Root-level directives
    info(
        TagId::Rejection,
        "rejection",
        &[],
        UNDER_ROOT,
        "the document root",
        "Rejects classes, functions, fields or enums by name.",
    ),
    info(
        TagId::SuppressWarning,
        "suppress-warning",
        &[],
        UNDER_ROOT,
        "the document root",
        "Silences warnings matching a text pattern.",
    ),
    info(
        TagId::LoadTypesystem,
        "load-typesystem",
        &[],
        UNDER_ROOT,
        "the document root",
        "Parses another typesystem document in place.",
    ),
    info(
        TagId::Template,
        "template",
        &[],
        UNDER_ROOT,
        "the document root",
        "Defines a reusable named code template.",
    ),
    // Type-level modifications
    info(
        TagId::AddFunction,
        "add-function",
        &[],
        UNDER_ROOT_OR_COMPLEX,
        "a complex type or the document root",
        "Adds a user-defined function.",
    ),
    info(
        TagId::AddField,
        "add-field",
        &[],
        UNDER_ROOT_OR_COMPLEX,
        "a complex type or the document root",
        "Adds a user-defined field; the body is its default value.",
    ),
    info(
        TagId::ModifyFunction,
        "modify-function",
        &[TagGroup::DocumentationTarget],
        UNDER_COMPLEX,
        "a complex type",
        "Modifies an existing function by signature.",
    ),
    info(
        TagId::ModifyField,
        "modify-field",
        &[TagGroup::DocumentationTarget],
        UNDER_COMPLEX,
        "a complex type",
        "Modifies an existing field by name.",
    ),
    info(
        TagId::ExtraIncludes,
        "extra-includes",
        &[],
        UNDER_TYPE_ENTRY,
        "a type entry",
        "Groups additional include directives.",
    ),
    info(
        TagId::Include,
        "include",
        &[],
        rule(&[TagId::PrimitiveType, TagId::ExtraIncludes], &[TagGroup::ComplexTypeEntry]),
        "primitive-type, a complex type or extra-includes",
        "Declares the header or import providing a type.",
    ),
    info(
        TagId::CustomConstructor,
        "custom-constructor",
        &[],
        UNDER_TYPE_ENTRY,
        "a type entry",
        "Custom construction code for a type.",
    ),
    info(
        TagId::CustomDestructor,
        "custom-destructor",
        &[],
        UNDER_TYPE_ENTRY,
        "a type entry",
        "Custom destruction code for a type.",
    ),
    info(
        TagId::RejectEnumValue,
        "reject-enum-value",
        &[],
        rule(&[TagId::EnumType], &[]),
        "enum-type",
        "Rejects a single enum value by name.",
    ),
    // Code and documentation
    info(
        TagId::InjectCode,
        "inject-code",
        &[TagGroup::CodeSnippet],
        rule(
            &[TagId::Root, TagId::AddFunction, TagId::ModifyFunction],
            &[TagGroup::ComplexTypeEntry],
        ),
        "a complex type, add-function, modify-function or the document root",
        "Injects code at a generation point.",
    ),
    info(
        TagId::ArgumentMap,
        "argument-map",
        &[],
        rule(&[], &[TagGroup::CodeSnippet]),
        "inject-code",
        "Maps an argument position to a meta name inside injected code.",
    ),
    info(
        TagId::InsertTemplate,
        "insert-template",
        &[],
        rule(
            &[
                TagId::Template,
                TagId::CustomConstructor,
                TagId::CustomDestructor,
                TagId::ConversionRule,
            ],
            &[TagGroup::CodeSnippet],
        ),
        "inject-code, template, custom-constructor, custom-destructor or conversion-rule",
        "Inserts a named template into the enclosing code.",
    ),
    info(
        TagId::Replace,
        "replace",
        &[],
        rule(&[TagId::InsertTemplate], &[]),
        "insert-template",
        "A from/to replace rule applied when a template is expanded.",
    ),
    info(
        TagId::InjectDocumentation,
        "inject-documentation",
        &[TagGroup::Documentation],
        rule(&[], &[TagGroup::DocumentationTarget]),
        "modify-function, modify-field or a type entry",
        "Injects documentation text.",
    ),
    info(
        TagId::ModifyDocumentation,
        "modify-documentation",
        &[TagGroup::Documentation],
        rule(&[], &[TagGroup::DocumentationTarget]),
        "modify-function, modify-field or a type entry",
        "Replaces the documentation node selected by an xpath.",
    ),
    info(
        TagId::ConversionRule,
        "conversion-rule",
        ARGUMENT_MODIFIER,
        rule(
            &[
                TagId::ModifyArgument,
                TagId::ValueType,
                TagId::ObjectType,
                TagId::PrimitiveType,
                TagId::ContainerType,
            ],
            &[],
        ),
        "modify-argument, value-type, object-type, primitive-type or container-type",
        "Conversion code for an argument or a whole type.",
    ),
    // Function modifiers
    info(
        TagId::Access,
        "access",
        &[],
        rule(&[TagId::ModifyFunction, TagId::ModifyField, TagId::ModifyArgument], &[]),
        "modify-function, modify-field or modify-argument",
        "Changes access or finality.",
    ),
    info(
        TagId::Remove,
        "remove",
        &[],
        rule(&[TagId::ModifyFunction], &[]),
        "modify-function",
        "Removes a function from the generated API.",
    ),
    info(
        TagId::Rename,
        "rename",
        &[],
        rule(&[TagId::ModifyFunction, TagId::ModifyField, TagId::ModifyArgument], &[]),
        "modify-function, modify-field or modify-argument",
        "Renames a function, field or argument.",
    ),
    info(
        TagId::ModifyArgument,
        "modify-argument",
        &[],
        rule(&[TagId::ModifyFunction, TagId::AddFunction], &[]),
        "modify-function or add-function",
        "Modifies an argument, the return value or the receiver.",
    ),
    // Argument modifiers
    info(
        TagId::ReplaceType,
        "replace-type",
        ARGUMENT_MODIFIER,
        UNDER_MODIFY_ARGUMENT,
        "modify-argument",
        "Overrides the argument type.",
    ),
    info(
        TagId::ReplaceDefaultExpression,
        "replace-default-expression",
        ARGUMENT_MODIFIER,
        UNDER_MODIFY_ARGUMENT,
        "modify-argument",
        "Replaces the default-value expression.",
    ),
    info(
        TagId::RemoveDefaultExpression,
        "remove-default-expression",
        ARGUMENT_MODIFIER,
        UNDER_MODIFY_ARGUMENT,
        "modify-argument",
        "Removes the default-value expression.",
    ),
    info(
        TagId::RemoveArgument,
        "remove-argument",
        ARGUMENT_MODIFIER,
        UNDER_MODIFY_ARGUMENT,
        "modify-argument",
        "Removes the argument from the generated signature.",
    ),
    info(
        TagId::DefineOwnership,
        "define-ownership",
        ARGUMENT_MODIFIER,
        UNDER_MODIFY_ARGUMENT,
        "modify-argument",
        "Transfers ownership for one language.",
    ),
    info(
        TagId::NoNullPointer,
        "no-null-pointer",
        ARGUMENT_MODIFIER,
        UNDER_MODIFY_ARGUMENT,
        "modify-argument",
        "Guards against null pointers.",
    ),
    info(
        TagId::ReferenceCount,
        "reference-count",
        ARGUMENT_MODIFIER,
        UNDER_MODIFY_ARGUMENT,
        "modify-argument",
        "Keeps a reference to the argument alive.",
    ),
    info(
        TagId::Parent,
        "parent",
        ARGUMENT_MODIFIER,
        UNDER_MODIFY_ARGUMENT,
        "modify-argument",
        "Makes another argument the parent (owner) of this one.",
    ),
];

/// Canonical spelling.
///
/// ## Parameters
/// - `id`: Tag identifier.
///
/// ## Returns
/// - The canonical tag name (e.g. `"modify-function"`).
pub fn as_str(id: TagId) -> &'static str {
    info_for(id).canonical
}

/// Full metadata.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: TagId) -> &'static TagInfo {
    TAGS.iter().find(|t| t.id == id).expect("tag info missing")
}

/// Lookup by spelling.
///
/// ## Parameters
/// - `s`: Candidate tag name.
///
/// ## Returns
/// - `Some(TagId)` if the name is part of the vocabulary (ASCII-case-insensitive), `None` otherwise.
pub fn from_str(s: &str) -> Option<TagId> {
    TAGS.iter().find(|t| t.canonical.eq_ignore_ascii_case(s)).map(|t| t.id)
}

/// Whether the tag is the `import-file` pseudo-tag.
pub fn is_import_file(s: &str) -> bool {
    IMPORT_FILE.eq_ignore_ascii_case(s)
}

/// Whether `id` belongs to `group`.
pub fn in_group(id: TagId, group: TagGroup) -> bool {
    info_for(id).groups.contains(&group)
}

pub fn is_type_entry(id: TagId) -> bool {
    in_group(id, TagGroup::TypeEntry)
}

pub fn is_complex_type_entry(id: TagId) -> bool {
    in_group(id, TagGroup::ComplexTypeEntry)
}

pub fn is_code_snippet(id: TagId) -> bool {
    in_group(id, TagGroup::CodeSnippet)
}

pub fn is_documentation(id: TagId) -> bool {
    in_group(id, TagGroup::Documentation)
}

/// Whether a type-entry tag may be opened directly under `parent`.
///
/// Type entries live at the document root; a `namespace-type` may additionally declare
/// namespace-scoped types.
pub fn may_nest_type_entry(parent: TagId) -> bool {
    matches!(parent, TagId::Root | TagId::NamespaceType)
}

/// Whether `child` accepts `parent` as its immediate parent.
///
/// ## Notes
/// - The document root accepts no parent at all.
pub fn parent_allows(child: TagId, parent: TagId) -> bool {
    let rule = info_for(child).parents;
    rule.tags.contains(&parent) || rule.groups.iter().any(|g| in_group(parent, *g))
}

// --- helpers -----------------------------------------------------------------

const fn rule(tags: &'static [TagId], groups: &'static [TagGroup]) -> ParentRule {
    ParentRule { tags, groups }
}

const fn info(
    id: TagId,
    canonical: &'static str,
    groups: &'static [TagGroup],
    parents: ParentRule,
    parent_hint: &'static str,
    description: &'static str,
) -> TagInfo {
    TagInfo {
        id,
        canonical,
        groups,
        parents,
        parent_hint,
        description,
    }
}
