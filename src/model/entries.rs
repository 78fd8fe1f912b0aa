//! Entity records.
//!
//! One [`TypeEntry`] is built per type-entry tag. Fields every kind has live on the struct; the
//! kind-specific parts live in [`TypeEntryKind`], so accessors that differ per kind are exhaustive
//! matches.

use bitflags::bitflags;
use typesys_core::lang::containers::ContainerKind;

use super::TypeEntryId;
use super::added::{AddedField, AddedFunction};
use super::code::{CodeSnip, CustomFunction};
use super::modifications::{DocModification, FieldModification, FunctionModification, Include};
use crate::config::ParserConfig;

/// How much of an entity the binding generator emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodeGeneration {
    #[default]
    GenerateAll,
    /// Only what subclasses in other modules need.
    GenerateForSubclass,
    GenerateNothing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Copyability {
    #[default]
    Unknown,
    Copyable,
    NonCopyable,
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TypeFlags: u8 {
        const FORCE_ABSTRACT = 1 << 0;
        const DEPRECATED = 1 << 1;
        const DELETE_IN_MAIN_THREAD = 1 << 2;
    }
}

/// Cost expression and numeric limit of an expensive type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpensePolicy {
    pub cost: String,
    pub limit: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PrimitiveEntry {
    pub target_lang_name: String,
    pub target_lang_api_name: String,
    pub default_constructor: String,
    pub preferred_conversion: bool,
    pub preferred_target_lang_type: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerEntry {
    pub kind: ContainerKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnumEntry {
    /// Everything before the last `::` of the qualified name.
    pub qualifier: String,
    pub enum_name: String,
    /// Declared through `identified-by-value`.
    pub anonymous: bool,
    pub upper_bound: String,
    pub lower_bound: String,
    pub force_integer: bool,
    pub extensible: bool,
    pub package: String,
    pub flags: Option<TypeEntryId>,
    pub rejected_values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagsEntry {
    pub originator: TypeEntryId,
    /// The `flags` attribute as written, qualifier included.
    pub original_name: String,
    pub flags_name: String,
}

/// Object, value, interface and namespace data.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ComplexEntry {
    pub target_lang_name: Option<String>,
    pub package: String,
    pub default_superclass: String,
    pub added_functions: Vec<AddedFunction>,
    pub function_mods: Vec<FunctionModification>,
    pub field_mods: Vec<FieldModification>,
    pub added_fields: Vec<AddedField>,
    pub expense: Option<ExpensePolicy>,
    pub copyable: Copyability,
    pub held_type: String,
    pub target_type: String,
    pub hash_function: String,
    pub polymorphic_id_expression: String,
    pub stream: bool,
    pub generic_class: bool,
    pub polymorphic_base: bool,
    pub type_flags: TypeFlags,
    /// Interface twin of an object declared with `interface-type`.
    pub designated_interface: Option<TypeEntryId>,
    /// Object an interface twin was synthesized from.
    pub origin: Option<TypeEntryId>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeEntryKind {
    Primitive(PrimitiveEntry),
    Container(ContainerEntry),
    Enum(EnumEntry),
    Flags(FlagsEntry),
    Object(ComplexEntry),
    Value(ComplexEntry),
    Interface(ComplexEntry),
    Namespace(ComplexEntry),
    /// Every normalized signature registered under one function name.
    Function { signatures: Vec<String> },
    /// The module entry of a document package.
    TypeSystem,
}

/// One registered entity.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeEntry {
    pub name: String,
    pub since: f64,
    pub code_generation: CodeGeneration,
    pub include: Option<Include>,
    pub extra_includes: Vec<Include>,
    /// Every injected snippet, unfiltered; see [`TypeEntry::code_snips`] for the API-gated view.
    pub code_snips: Vec<CodeSnip>,
    pub doc_modifications: Vec<DocModification>,
    pub conversion_rule: Option<String>,
    pub custom_constructor: Option<CustomFunction>,
    pub custom_destructor: Option<CustomFunction>,
    pub kind: TypeEntryKind,
}

impl TypeEntry {
    pub fn new(name: impl Into<String>, since: f64, kind: TypeEntryKind) -> Self {
        Self {
            name: name.into(),
            since,
            code_generation: CodeGeneration::GenerateAll,
            include: None,
            extra_includes: Vec::new(),
            code_snips: Vec::new(),
            doc_modifications: Vec::new(),
            conversion_rule: None,
            custom_constructor: None,
            custom_destructor: None,
            kind,
        }
    }

    pub fn with_code_generation(mut self, generation: CodeGeneration) -> Self {
        self.code_generation = generation;
        self
    }

    /// Lowercase kind name used in listings.
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            TypeEntryKind::Primitive(_) => "primitive",
            TypeEntryKind::Container(_) => "container",
            TypeEntryKind::Enum(_) => "enum",
            TypeEntryKind::Flags(_) => "flags",
            TypeEntryKind::Object(_) => "object",
            TypeEntryKind::Value(_) => "value",
            TypeEntryKind::Interface(_) => "interface",
            TypeEntryKind::Namespace(_) => "namespace",
            TypeEntryKind::Function { .. } => "function",
            TypeEntryKind::TypeSystem => "typesystem",
        }
    }

    /// Primitive types and function overload sets may be registered more than once.
    pub fn allows_duplicates(&self) -> bool {
        matches!(self.kind, TypeEntryKind::Primitive(_) | TypeEntryKind::Function { .. })
    }

    /// Name of the entity in the target language.
    pub fn target_lang_name(&self) -> &str {
        match &self.kind {
            TypeEntryKind::Primitive(p) if !p.target_lang_name.is_empty() => &p.target_lang_name,
            TypeEntryKind::Enum(e) => &e.enum_name,
            TypeEntryKind::Flags(f) => &f.flags_name,
            TypeEntryKind::Object(c)
            | TypeEntryKind::Value(c)
            | TypeEntryKind::Interface(c)
            | TypeEntryKind::Namespace(c) => c.target_lang_name.as_deref().unwrap_or(&self.name),
            TypeEntryKind::Primitive(_)
            | TypeEntryKind::Container(_)
            | TypeEntryKind::Function { .. }
            | TypeEntryKind::TypeSystem => &self.name,
        }
    }

    /// Target-language package, for kinds that have one.
    pub fn package(&self) -> Option<&str> {
        match &self.kind {
            TypeEntryKind::Enum(e) => Some(&e.package),
            TypeEntryKind::Object(c)
            | TypeEntryKind::Value(c)
            | TypeEntryKind::Interface(c)
            | TypeEntryKind::Namespace(c) => Some(&c.package),
            TypeEntryKind::TypeSystem => Some(&self.name),
            TypeEntryKind::Primitive(_)
            | TypeEntryKind::Container(_)
            | TypeEntryKind::Flags(_)
            | TypeEntryKind::Function { .. } => None,
        }
    }

    pub fn is_complex(&self) -> bool {
        self.complex().is_some()
    }

    pub fn complex(&self) -> Option<&ComplexEntry> {
        match &self.kind {
            TypeEntryKind::Object(c)
            | TypeEntryKind::Value(c)
            | TypeEntryKind::Interface(c)
            | TypeEntryKind::Namespace(c) => Some(c),
            _ => None,
        }
    }

    pub fn complex_mut(&mut self) -> Option<&mut ComplexEntry> {
        match &mut self.kind {
            TypeEntryKind::Object(c)
            | TypeEntryKind::Value(c)
            | TypeEntryKind::Interface(c)
            | TypeEntryKind::Namespace(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumEntry> {
        match &self.kind {
            TypeEntryKind::Enum(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_enum_mut(&mut self) -> Option<&mut EnumEntry> {
        match &mut self.kind {
            TypeEntryKind::Enum(e) => Some(e),
            _ => None,
        }
    }

    /// Designated interface of an object declared with `interface-type`.
    pub fn designated_interface(&self) -> Option<TypeEntryId> {
        self.complex().and_then(|c| c.designated_interface)
    }

    /// Modifications of `signature` whose `since` is supported by `config`.
    pub fn function_modifications<'a>(
        &'a self,
        signature: &'a str,
        config: &'a ParserConfig,
    ) -> impl Iterator<Item = &'a FunctionModification> + 'a {
        self.complex()
            .into_iter()
            .flat_map(|c| c.function_mods.iter())
            .filter(move |m| m.signature == signature && config.supports(m.since))
    }

    /// Injected snippets whose `since` is supported by `config`.
    pub fn code_snips<'a>(&'a self, config: &'a ParserConfig) -> impl Iterator<Item = &'a CodeSnip> + 'a {
        self.code_snips.iter().filter(move |s| config.supports(s.since))
    }

    /// The modification of field `name`; unmodified fields are readable and writable.
    pub fn field_modification(&self, name: &str) -> FieldModification {
        self.complex()
            .and_then(|c| c.field_mods.iter().find(|m| m.name == name))
            .cloned()
            .unwrap_or_else(|| FieldModification::new(name))
    }
}
