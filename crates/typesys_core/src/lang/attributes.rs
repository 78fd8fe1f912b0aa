//! Attribute schemas for every tag.
//!
//! A schema is an ordered list of recognized keys with their default value and whether the key is
//! required. Schemas are composed from shared group slices so that, for example, every complex type
//! shares the namespace group and object/value types add their own flags on top.
//!
//! ## Notes
//! - Keys are stored lowercase; raw keys are lowercased before lookup.
//! - Some defaults depend on the document being parsed (package, default superclass, the name of
//!   the enclosing entity). Those are expressed as [`AttrDefault`] variants and resolved by the
//!   handler.
//!
//! ## Examples
//! ```rust
//! use typesys_core::lang::attributes::{self, AttrDefault};
//! use typesys_core::lang::tags::TagId;
//!
//! let spec = attributes::find(TagId::ObjectType, "package").unwrap();
//! assert_eq!(spec.default, AttrDefault::DocumentPackage);
//! assert!(attributes::find(TagId::ObjectType, "flags").is_none());
//! ```

use super::tags::TagId;

/// Default value of an attribute absent from the raw input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrDefault {
    /// The empty string.
    Empty,
    /// A fixed literal.
    Literal(&'static str),
    /// The `package` of the current document root.
    DocumentPackage,
    /// The `default-superclass` of the current document root.
    DocumentSuperclass,
    /// Lowercased name of the enclosing entity followed by the given suffix.
    EntitySuffix(&'static str),
}

/// One recognized attribute key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeSpec {
    pub key: &'static str,
    pub default: AttrDefault,
    /// Missing or empty values are a fatal attribute error.
    pub required: bool,
}

const fn opt(key: &'static str) -> AttributeSpec {
    AttributeSpec {
        key,
        default: AttrDefault::Empty,
        required: false,
    }
}

const fn lit(key: &'static str, value: &'static str) -> AttributeSpec {
    AttributeSpec {
        key,
        default: AttrDefault::Literal(value),
        required: false,
    }
}

const fn req(key: &'static str) -> AttributeSpec {
    AttributeSpec {
        key,
        default: AttrDefault::Empty,
        required: true,
    }
}

const fn dynamic(key: &'static str, default: AttrDefault) -> AttributeSpec {
    AttributeSpec {
        key,
        default,
        required: false,
    }
}

// --- shared groups -----------------------------------------------------------

const SINCE: &[AttributeSpec] = &[lit("since", "0")];
const NAME: &[AttributeSpec] = &[req("name")];

const PRIMITIVE: &[AttributeSpec] = &[
    opt("target-lang-name"),
    opt("target-lang-api-name"),
    lit("preferred-conversion", "yes"),
    lit("preferred-target-lang-type", "yes"),
    opt("default-constructor"),
];

const CONTAINER: &[AttributeSpec] = &[req("type")];

const ENUM: &[AttributeSpec] = &[
    opt("name"),
    lit("flags", "no"),
    opt("upper-bound"),
    opt("lower-bound"),
    lit("force-integer", "no"),
    lit("extensible", "no"),
    opt("identified-by-value"),
];

/// Keys shared by object and value types only.
const OBJECT_VALUE_GROUP: &[AttributeSpec] = &[
    lit("force-abstract", "no"),
    lit("deprecated", "no"),
    opt("hash-function"),
    lit("stream", "no"),
];

/// Keys shared by object, value and interface types.
const INTERFACE_GROUP: &[AttributeSpec] = &[
    dynamic("default-superclass", AttrDefault::DocumentSuperclass),
    opt("polymorphic-id-expression"),
    lit("delete-in-main-thread", "no"),
    opt("held-type"),
    opt("copyable"),
];

/// Keys shared by every complex type.
const NAMESPACE_GROUP: &[AttributeSpec] = &[
    opt("target-lang-name"),
    dynamic("package", AttrDefault::DocumentPackage),
    lit("expense-cost", "1"),
    lit("expense-limit", "none"),
    lit("polymorphic-base", "no"),
    lit("generate", "yes"),
    opt("target-type"),
    lit("generic-class", "no"),
];

const FUNCTION_ENTRY: &[AttributeSpec] = &[req("signature")];

const ROOT: &[AttributeSpec] = &[opt("package"), opt("default-superclass")];
const LOAD_TYPESYSTEM: &[AttributeSpec] = &[req("name"), lit("generate", "yes")];
const NO_NULL_POINTER: &[AttributeSpec] = &[opt("default-value")];
const SUPPRESS_WARNING: &[AttributeSpec] = &[opt("text")];
const REPLACE_DEFAULT_EXPRESSION: &[AttributeSpec] = &[opt("with")];
const DEFINE_OWNERSHIP: &[AttributeSpec] = &[lit("class", "target"), opt("owner")];
const ADD_FUNCTION: &[AttributeSpec] = &[
    opt("signature"),
    lit("return-type", "void"),
    lit("access", "public"),
    lit("static", "no"),
];
const MODIFY_FUNCTION: &[AttributeSpec] = &[
    opt("signature"),
    opt("access"),
    opt("remove"),
    opt("rename"),
    lit("deprecated", "no"),
    opt("associated-to"),
    lit("virtual-slot", "no"),
    lit("thread", "no"),
    lit("allow-thread", "no"),
];
const MODIFY_ARGUMENT: &[AttributeSpec] = &[
    req("index"),
    opt("replace-value"),
    lit("invalidate-after-use", "no"),
];
const MODIFY_FIELD: &[AttributeSpec] = &[opt("name"), lit("write", "true"), lit("read", "true")];
const ADD_FIELD: &[AttributeSpec] = &[req("name"), req("type")];
const ACCESS: &[AttributeSpec] = &[opt("modifier")];
const INCLUDE: &[AttributeSpec] = &[opt("file-name"), opt("location")];
const CUSTOM_CONSTRUCTOR: &[AttributeSpec] = &[
    dynamic("name", AttrDefault::EntitySuffix("_create")),
    lit("param-name", "copy"),
];
const CUSTOM_DESTRUCTOR: &[AttributeSpec] = &[
    dynamic("name", AttrDefault::EntitySuffix("_delete")),
    lit("param-name", "copy"),
];
const REPLACE_TYPE: &[AttributeSpec] = &[opt("modified-type")];
const INJECT_CODE: &[AttributeSpec] = &[lit("class", "target"), lit("position", "beginning"), opt("file")];
const CONVERSION_RULE: &[AttributeSpec] = &[opt("class"), opt("file")];
const REJECT_ENUM_VALUE: &[AttributeSpec] = &[opt("name")];
const ARGUMENT_MAP: &[AttributeSpec] = &[lit("index", "1"), opt("meta-name")];
const RENAME: &[AttributeSpec] = &[opt("to")];
const REJECTION: &[AttributeSpec] = &[
    lit("class", "*"),
    lit("function-name", "*"),
    lit("field-name", "*"),
    lit("enum-name", "*"),
];
const REMOVE: &[AttributeSpec] = &[lit("class", "all")];
const TEMPLATE: &[AttributeSpec] = &[req("name")];
const REPLACE: &[AttributeSpec] = &[opt("from"), opt("to")];
const REFERENCE_COUNT: &[AttributeSpec] = &[opt("action"), opt("variable-name")];
const PARENT: &[AttributeSpec] = &[req("index"), opt("action")];
const INJECT_DOCUMENTATION: &[AttributeSpec] = &[lit("mode", "replace"), lit("format", "native")];
const MODIFY_DOCUMENTATION: &[AttributeSpec] = &[opt("xpath")];

/// Keys of the `import-file` pseudo-tag.
pub const IMPORT_FILE: &[AttributeSpec] = &[req("name"), opt("quote-after-line"), opt("quote-before-line")];

/// Schema of `tag` as an ordered list of group slices.
///
/// ## Notes
/// - Every schema includes `since`.
pub fn schema(tag: TagId) -> &'static [&'static [AttributeSpec]] {
    match tag {
        TagId::Root => &[ROOT, SINCE],
        TagId::PrimitiveType => &[NAME, SINCE, PRIMITIVE],
        TagId::ContainerType => &[NAME, SINCE, CONTAINER],
        TagId::EnumType => &[SINCE, ENUM],
        TagId::ObjectType | TagId::ValueType => &[NAME, SINCE, OBJECT_VALUE_GROUP, INTERFACE_GROUP, NAMESPACE_GROUP],
        TagId::InterfaceType => &[NAME, SINCE, INTERFACE_GROUP, NAMESPACE_GROUP],
        TagId::NamespaceType => &[NAME, SINCE, NAMESPACE_GROUP],
        TagId::Function => &[SINCE, FUNCTION_ENTRY],
        TagId::Rejection => &[REJECTION, SINCE],
        TagId::SuppressWarning => &[SUPPRESS_WARNING, SINCE],
        TagId::LoadTypesystem => &[LOAD_TYPESYSTEM, SINCE],
        TagId::Template => &[TEMPLATE, SINCE],
        TagId::AddFunction => &[ADD_FUNCTION, SINCE],
        TagId::AddField => &[ADD_FIELD, SINCE],
        TagId::ModifyFunction => &[MODIFY_FUNCTION, SINCE],
        TagId::ModifyField => &[MODIFY_FIELD, SINCE],
        TagId::ExtraIncludes => &[SINCE],
        TagId::Include => &[INCLUDE, SINCE],
        TagId::CustomConstructor => &[CUSTOM_CONSTRUCTOR, SINCE],
        TagId::CustomDestructor => &[CUSTOM_DESTRUCTOR, SINCE],
        TagId::RejectEnumValue => &[REJECT_ENUM_VALUE, SINCE],
        TagId::InjectCode => &[INJECT_CODE, SINCE],
        TagId::ArgumentMap => &[ARGUMENT_MAP, SINCE],
        TagId::InsertTemplate => &[TEMPLATE, SINCE],
        TagId::Replace => &[REPLACE, SINCE],
        TagId::InjectDocumentation => &[INJECT_DOCUMENTATION, SINCE],
        TagId::ModifyDocumentation => &[MODIFY_DOCUMENTATION, SINCE],
        TagId::ConversionRule => &[CONVERSION_RULE, SINCE],
        TagId::Access => &[ACCESS, SINCE],
        TagId::Remove => &[REMOVE, SINCE],
        TagId::Rename => &[RENAME, SINCE],
        TagId::ModifyArgument => &[MODIFY_ARGUMENT, SINCE],
        TagId::ReplaceType => &[REPLACE_TYPE, SINCE],
        TagId::ReplaceDefaultExpression => &[REPLACE_DEFAULT_EXPRESSION, SINCE],
        TagId::RemoveDefaultExpression | TagId::RemoveArgument => &[SINCE],
        TagId::DefineOwnership => &[DEFINE_OWNERSHIP, SINCE],
        TagId::NoNullPointer => &[NO_NULL_POINTER, SINCE],
        TagId::ReferenceCount => &[REFERENCE_COUNT, SINCE],
        TagId::Parent => &[PARENT, SINCE],
    }
}

/// Iterate every key of `tag` in schema order.
pub fn specs(tag: TagId) -> impl Iterator<Item = &'static AttributeSpec> + Clone {
    schema(tag).iter().flat_map(|group| group.iter())
}

/// Find the spec of `key` (already lowercased) for `tag`.
pub fn find(tag: TagId, key: &str) -> Option<&'static AttributeSpec> {
    specs(tag).find(|s| s.key == key)
}
