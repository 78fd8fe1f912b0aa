//! User-added functions and fields.

use typesys_syntax::signature::{FunctionDescriptor, TypeDescriptor};

use super::TypeEntryId;

/// A function that does not exist in the host API and is declared by `add-function`.
#[derive(Debug, Clone, PartialEq)]
pub struct AddedFunction {
    /// Normalized signature, always with an argument list.
    pub signature: String,
    pub function: FunctionDescriptor,
}

/// A field declared by `add-field`.
#[derive(Debug, Clone, PartialEq)]
pub struct AddedField {
    pub name: String,
    pub field_type: TypeDescriptor,
    /// Entry registered under the field's base type name when the field was declared.
    pub type_entry: Option<TypeEntryId>,
    /// Tag body, trimmed.
    pub default_value: String,
    /// Qualified name of the enclosing class; `None` at module scope.
    pub enclosing: Option<String>,
    pub since: f64,
}

impl AddedField {
    /// Added fields never come from the host API.
    pub fn is_user_added(&self) -> bool {
        true
    }

    /// The field type as written in a C++ declaration.
    pub fn type_signature(&self) -> String {
        self.field_type.cpp_signature()
    }
}
