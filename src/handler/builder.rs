//! Entity construction for the document root and type-entry tags.

use typesys_core::lang::containers;
use typesys_core::lang::tags::TagId;
use typesys_syntax::signature;

use super::Handler;
use super::attributes::Attributes;
use super::stack::Frame;
use crate::diagnostics::{TypesystemError, WarningKind};
use crate::model::{
    CodeGeneration, ComplexEntry, ContainerEntry, Copyability, EnumEntry, ExpensePolicy, FlagsEntry, PrimitiveEntry,
    TypeEntry, TypeEntryId, TypeEntryKind, TypeFlags,
};

impl Handler<'_> {
    /// `typesystem`: record the document defaults and find or create the module entry.
    pub(super) fn open_root(&mut self, attrs: &Attributes, since: f64) -> Result<Frame, TypesystemError> {
        self.default_package = attrs.get("package").to_string();
        self.default_superclass = attrs.get("default-superclass").to_string();
        let package = self.default_package.clone();

        let existing = self
            .db
            .find_type(&package)
            .filter(|id| matches!(self.db.entry(*id).map(|e| &e.kind), Some(TypeEntryKind::TypeSystem)));
        let module = match existing {
            Some(id) => id,
            None => self.db.add_type(
                TypeEntry::new(package.clone(), since, TypeEntryKind::TypeSystem).with_code_generation(self.generate),
            ),
        };

        if self.generate != CodeGeneration::GenerateAll && !package.is_empty() {
            self.db.add_required_target_import(&package);
        }
        Ok(Frame::new(TagId::Root, Some(module)).with_mods())
    }

    /// Build and register the entity of a type-entry tag.
    pub(super) fn open_type_entry(&mut self, tag: TagId, attrs: &Attributes, since: f64) -> Result<Frame, TypesystemError> {
        let name = self.entity_name(tag, attrs)?;

        if tag == TagId::Function {
            let id = self.open_function_entry(&name, attrs, since)?;
            return Ok(Frame::new(tag, Some(id)).with_mods());
        }

        if tag != TagId::PrimitiveType {
            self.warn_if_duplicate(&name);
        }

        let id = match tag {
            TagId::PrimitiveType => self.build_primitive(name, attrs, since),
            TagId::ContainerType => self.build_container(name, attrs, since)?,
            TagId::EnumType => self.build_enum(name, attrs, since),
            TagId::ObjectType | TagId::ValueType | TagId::NamespaceType => {
                let complex = self.complex_entry(attrs)?;
                let generation = self.complex_generation(attrs);
                let kind = match tag {
                    TagId::ObjectType => TypeEntryKind::Object(complex),
                    TagId::ValueType => TypeEntryKind::Value(complex),
                    _ => TypeEntryKind::Namespace(complex),
                };
                self.db
                    .add_type(TypeEntry::new(name, since, kind).with_code_generation(generation))
            }
            TagId::InterfaceType => self.build_interface(name, attrs, since)?,
            other => {
                return Err(TypesystemError::structural(format!(
                    "'{}' is not a type entry",
                    typesys_core::lang::tags::as_str(other)
                )));
            }
        };
        Ok(Frame::new(tag, Some(id)).with_mods())
    }

    fn warn_if_duplicate(&self, name: &str) {
        if self.db.find_type(name).is_some() {
            self.warn(WarningKind::DuplicateType, format!("Duplicate type entry: '{name}'"));
        }
    }

    /// Qualified entity name of a type-entry tag.
    fn entity_name(&self, tag: TagId, attrs: &Attributes) -> Result<String, TypesystemError> {
        let mut name = attrs.get("name").to_string();
        match tag {
            TagId::Function => {
                let sig = attrs.get("signature");
                name = sig.split('(').next().unwrap_or(sig).trim().to_string();
            }
            TagId::EnumType => {
                let by_value = attrs.get("identified-by-value");
                if name.is_empty() {
                    name = by_value.to_string();
                } else if !by_value.is_empty() {
                    return Err(TypesystemError::attribute(
                        "can't specify both 'name' and 'identified-by-value' attributes",
                    ));
                }
            }
            _ => {}
        }
        if name.is_empty() {
            return Err(TypesystemError::attribute("no 'name' attribute specified"));
        }

        let namespace = self
            .stack
            .top()
            .filter(|f| f.tag == TagId::NamespaceType)
            .and_then(|f| f.entry)
            .and_then(|id| self.db.entry(id))
            .map(|e| e.name.clone());
        Ok(match namespace {
            Some(ns) if !name.starts_with(&format!("{ns}::")) => format!("{ns}::{name}"),
            _ => name,
        })
    }

    fn build_primitive(&mut self, name: String, attrs: &Attributes, since: f64) -> TypeEntryId {
        let or_name = |key: &str| {
            let v = attrs.get(key);
            if v.is_empty() { name.clone() } else { v.to_string() }
        };
        let primitive = PrimitiveEntry {
            target_lang_name: or_name("target-lang-name"),
            target_lang_api_name: or_name("target-lang-api-name"),
            default_constructor: attrs.get("default-constructor").to_string(),
            preferred_conversion: self.flag(attrs, "preferred-conversion", true),
            preferred_target_lang_type: self.flag(attrs, "preferred-target-lang-type", true),
        };
        self.db.add_type(
            TypeEntry::new(name, since, TypeEntryKind::Primitive(primitive)).with_code_generation(self.generate),
        )
    }

    fn build_container(&mut self, name: String, attrs: &Attributes, since: f64) -> Result<TypeEntryId, TypesystemError> {
        let type_name = attrs.get("type");
        let kind = containers::from_str(type_name)
            .ok_or_else(|| TypesystemError::attribute(format!("there is no container of type '{type_name}'")))?;
        Ok(self.db.add_type(
            TypeEntry::new(name, since, TypeEntryKind::Container(ContainerEntry { kind }))
                .with_code_generation(self.generate),
        ))
    }

    fn build_enum(&mut self, name: String, attrs: &Attributes, since: f64) -> TypeEntryId {
        let (qualifier, enum_name) = match name.rfind("::") {
            Some(i) => (name[..i].to_string(), name[i + 2..].to_string()),
            None => (String::new(), name.clone()),
        };
        let entry = EnumEntry {
            qualifier,
            enum_name,
            anonymous: attrs.has_value("identified-by-value"),
            upper_bound: attrs.get("upper-bound").to_string(),
            lower_bound: attrs.get("lower-bound").to_string(),
            force_integer: self.flag(attrs, "force-integer", false),
            extensible: self.flag(attrs, "extensible", false),
            package: self.default_package.clone(),
            flags: None,
            rejected_values: Vec::new(),
        };
        let id = self.db.add_type(
            TypeEntry::new(name.clone(), since, TypeEntryKind::Enum(entry)).with_code_generation(self.generate),
        );
        self.current_enum = Some(id);

        let flags = attrs.get("flags");
        if !flags.is_empty() && !flags.eq_ignore_ascii_case("no") {
            self.build_flags(id, &name, flags, since);
        }
        id
    }

    /// Register the flags twin of enum `enum_id` and link the two.
    fn build_flags(&mut self, enum_id: TypeEntryId, enum_name: &str, original_name: &str, since: f64) {
        let segments: Vec<&str> = original_name.split("::").collect();
        let flags_qualifier = segments[..segments.len() - 1].join("::");
        let flags_name = segments.last().copied().unwrap_or(original_name).to_string();

        let enum_qualifier = self
            .db
            .entry(enum_id)
            .and_then(|e| e.as_enum())
            .map(|e| e.qualifier.clone())
            .unwrap_or_default();
        // The qualifier is compared in target-language spelling when it names a known type.
        let target_qualifier = self
            .db
            .find_type(&enum_qualifier)
            .and_then(|id| self.db.entry(id))
            .map(|e| e.target_lang_name().to_string())
            .unwrap_or(enum_qualifier);
        if flags_qualifier != target_qualifier {
            self.warn(
                WarningKind::QualifierMismatch,
                format!("enum {target_qualifier} and flags {} differ in qualifiers", segments[0]),
            );
        }

        let flags = FlagsEntry {
            originator: enum_id,
            original_name: original_name.to_string(),
            flags_name,
        };
        let twin_name = format!("QFlags<{enum_name}>");
        self.warn_if_duplicate(&twin_name);
        let flags_id = self.db.add_type(
            TypeEntry::new(twin_name, since, TypeEntryKind::Flags(flags))
                .with_code_generation(self.generate),
        );
        if let Some(e) = self.db.entry_mut(enum_id).and_then(|e| e.as_enum_mut()) {
            e.flags = Some(flags_id);
        }
    }

    /// `interface-type`: an object entry plus its designated interface twin.
    fn build_interface(&mut self, name: String, attrs: &Attributes, since: f64) -> Result<TypeEntryId, TypesystemError> {
        let object = self.complex_entry(attrs)?;
        let generation = self.complex_generation(attrs);
        let twin_name = format!("{}Interface", object.target_lang_name.as_deref().unwrap_or(&name));
        let twin = ComplexEntry {
            package: object.package.clone(),
            ..ComplexEntry::default()
        };

        let object_id = self
            .db
            .add_type(TypeEntry::new(name, since, TypeEntryKind::Object(object)).with_code_generation(generation));
        self.warn_if_duplicate(&twin_name);
        let twin_id = self.db.add_type(
            TypeEntry::new(
                twin_name,
                since,
                TypeEntryKind::Interface(ComplexEntry {
                    origin: Some(object_id),
                    ..twin
                }),
            )
            .with_code_generation(generation),
        );
        if let Some(c) = self.db.entry_mut(object_id).and_then(|e| e.complex_mut()) {
            c.designated_interface = Some(twin_id);
        }
        Ok(object_id)
    }

    /// `function`: add the signature to an existing overload set or start a new one.
    fn open_function_entry(&mut self, name: &str, attrs: &Attributes, since: f64) -> Result<TypeEntryId, TypesystemError> {
        let sig = signature::normalized_signature(attrs.get("signature"));
        match self.db.find_type(name) {
            Some(id) => {
                let entry = self.entry_mut(id)?;
                match &mut entry.kind {
                    TypeEntryKind::Function { signatures } => {
                        signatures.push(sig);
                        Ok(id)
                    }
                    _ => Err(TypesystemError::structural(format!(
                        "{name} expected to be a function, but isn't! Maybe it was already declared as a class or something else."
                    ))),
                }
            }
            None => Ok(self.db.add_type(
                TypeEntry::new(name, since, TypeEntryKind::Function { signatures: vec![sig] })
                    .with_code_generation(self.generate),
            )),
        }
    }

    /// Attributes shared by every complex kind.
    fn complex_entry(&self, attrs: &Attributes) -> Result<ComplexEntry, TypesystemError> {
        let expense = match attrs.get("expense-limit") {
            "" => None,
            limit if limit.eq_ignore_ascii_case("none") => None,
            limit => {
                let limit = limit
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| TypesystemError::attribute(format!("Invalid expense-limit '{limit}'")))?;
                Some(ExpensePolicy {
                    cost: attrs.get("expense-cost").to_string(),
                    limit,
                })
            }
        };

        let copyable = match attrs.get("copyable") {
            "" => Copyability::Unknown,
            v if super::attributes::convert_boolean(v, "copyable", false, &*self.db) => Copyability::Copyable,
            _ => Copyability::NonCopyable,
        };

        let mut type_flags = TypeFlags::empty();
        type_flags.set(TypeFlags::FORCE_ABSTRACT, self.flag(attrs, "force-abstract", false));
        type_flags.set(TypeFlags::DEPRECATED, self.flag(attrs, "deprecated", false));
        type_flags.set(
            TypeFlags::DELETE_IN_MAIN_THREAD,
            self.flag(attrs, "delete-in-main-thread", false),
        );

        Ok(ComplexEntry {
            target_lang_name: Some(attrs.get("target-lang-name").to_string()).filter(|n| !n.is_empty()),
            package: attrs.get("package").to_string(),
            default_superclass: attrs.get("default-superclass").to_string(),
            expense,
            copyable,
            held_type: attrs.get("held-type").to_string(),
            target_type: attrs.get("target-type").to_string(),
            hash_function: attrs.get("hash-function").to_string(),
            polymorphic_id_expression: attrs.get("polymorphic-id-expression").to_string(),
            stream: self.flag(attrs, "stream", false),
            generic_class: self.flag(attrs, "generic-class", false),
            polymorphic_base: self.flag(attrs, "polymorphic-base", false),
            type_flags,
            ..ComplexEntry::default()
        })
    }

    /// `generate="no"` limits a complex type to what subclasses need.
    fn complex_generation(&self, attrs: &Attributes) -> CodeGeneration {
        if self.flag(attrs, "generate", true) {
            self.generate
        } else {
            CodeGeneration::GenerateForSubclass
        }
    }
}
