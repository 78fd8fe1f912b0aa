//! Entity records and the modification lists attached to them.
//!
//! Everything in this module is plain data: the handler builds it while reading a document and the
//! binding generator reads it afterwards. Records are written once during the parse and never
//! mutated after their owning document finishes.
//!
//! ## Modules
//!
//! - `entries` - one [`TypeEntry`] per type-entry tag, with a [`TypeEntryKind`] sum type
//! - `modifications` - function, argument, field and documentation modifications
//! - `added` - user-added functions and fields
//! - `code` - code snippets, templates and template instances

pub mod added;
pub mod code;
pub mod entries;
pub mod modifications;

pub use added::{AddedField, AddedFunction};
pub use code::{CodeBuffer, CodeFragment, CodeSnip, CustomFunction, TemplateEntry, TemplateInstance};
pub use entries::{
    CodeGeneration, ComplexEntry, ContainerEntry, Copyability, EnumEntry, ExpensePolicy, FlagsEntry, PrimitiveEntry,
    TypeEntry, TypeEntryKind, TypeFlags,
};
pub use modifications::{
    ArgumentModification, ArgumentOwner, DocModification, DocModificationMode, FieldModification,
    FunctionModification, Include, Modifiers, ReferenceCount, Rejection, Removal,
};

/// Index of an entry in the registry arena.
///
/// Two references to the same entity compare equal as ids.
pub type TypeEntryId = usize;
