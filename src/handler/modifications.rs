//! Modification and directive tags, and the commit protocol run when frames close.
//!
//! Opening a directive appends a record to the buffer of the nearest owning frame (the document
//! root or a type entry) or to the function / argument modification its parent opened. Closing a
//! type-entry frame moves its buffer onto the entity.

use std::mem;

use typesys_core::lang::documentation::{doc_mode_from_str, include_location_from_str};
use typesys_core::lang::languages::{self, CodeLanguage, LanguageContext, SnipPosition};
use typesys_core::lang::modifiers::{self, ModifierContext, ModifierId};
use typesys_core::lang::ownership::{self, REFERENCE_COUNT_ACTIONS};
use typesys_core::lang::registry;
use typesys_core::lang::tags::{self, TagId};
use typesys_syntax::signature::{self, FunctionAccess};

use super::Handler;
use super::attributes::Attributes;
use super::stack::{Frame, Payload, SnipTarget, TransientMods};
use crate::diagnostics::{TypesystemError, WarningKind};
use crate::model::{
    AddedField, AddedFunction, ArgumentModification, ArgumentOwner, CodeGeneration, CodeSnip, CustomFunction,
    DocModification, DocModificationMode, FieldModification, FunctionModification, Include, Modifiers, ReferenceCount,
    Rejection, TemplateEntry, TemplateInstance,
};

/// Record an `access` or `rename` tag applies to, chosen by the parent frame.
#[derive(Debug, Clone, Copy)]
enum ModificationTarget {
    Function { owner: usize, index: usize },
    Field { owner: usize, index: usize },
    Argument { owner: usize, function: usize, argument: usize },
    /// The parent `modify-field` had no name.
    Skipped,
}

/// `return` is the return value (0), `this` the receiver (-1).
fn parse_argument_index(value: &str) -> Result<i32, TypesystemError> {
    let normalized = match value.trim() {
        "return" => "0",
        "this" => "-1",
        other => other,
    };
    normalized
        .parse()
        .map_err(|_| TypesystemError::attribute(format!("Cannot convert '{normalized}' to integer")))
}

fn no_target(what: &str) -> TypesystemError {
    TypesystemError::structural(format!("no open {what} to modify"))
}

impl Handler<'_> {
    /// Open a non-type-entry tag (other than the document root).
    pub(super) fn open_directive(&mut self, tag: TagId, attrs: &Attributes, since: f64) -> Result<Frame, TypesystemError> {
        let frame = Frame::new(tag, self.stack.current_entry());
        let payload = match tag {
            TagId::LoadTypesystem => {
                self.load_typesystem(attrs)?;
                Payload::None
            }
            TagId::RejectEnumValue => {
                self.reject_enum_value(attrs, since)?;
                Payload::None
            }
            TagId::Rejection => {
                self.add_rejection(attrs)?;
                Payload::None
            }
            TagId::SuppressWarning => {
                match attrs.get("text") {
                    "" => self.warn(WarningKind::EmptySuppression, "Suppressed warning with no text specified"),
                    text => self.db.add_suppressed_warning(text),
                }
                Payload::None
            }
            TagId::Template => Payload::Template(TemplateEntry::new(attrs.get("name"), since)),
            TagId::InsertTemplate => Payload::TemplateInstance(TemplateInstance::new(attrs.get("name"), since)),
            TagId::Replace => {
                match self.stack.top_mut().map(|f| &mut f.payload) {
                    Some(Payload::TemplateInstance(instance)) => {
                        instance.add_replace_rule(attrs.get("from"), attrs.get("to"));
                    }
                    _ => {
                        return Err(TypesystemError::structural(
                            "Can only insert replace rules into insert-template.",
                        ));
                    }
                }
                Payload::None
            }
            TagId::CustomConstructor | TagId::CustomDestructor => {
                Payload::CustomFunction(CustomFunction::new(attrs.get("name"), attrs.get("param-name")))
            }
            TagId::ExtraIncludes => Payload::None,
            TagId::Include => {
                self.add_include(attrs)?;
                Payload::None
            }
            TagId::AddFunction => self.open_add_function(attrs, since)?,
            TagId::ModifyFunction => self.open_modify_function(attrs, since)?,
            TagId::ModifyField => self.open_modify_field(attrs)?,
            TagId::AddField => self.open_add_field(attrs, since)?,
            TagId::Access | TagId::Rename => {
                self.apply_access(tag, attrs)?;
                Payload::None
            }
            TagId::Remove => {
                let class = attrs.get("class");
                let scope = modifiers::removal_from_str(class)
                    .ok_or_else(|| TypesystemError::attribute(format!("Bad removal type '{class}'")))?;
                self.function_mut()?.removal = scope.into();
                Payload::None
            }
            TagId::ModifyArgument => self.open_modify_argument(attrs)?,
            TagId::ConversionRule => self.open_conversion_rule(attrs, since)?,
            TagId::InjectCode => self.open_inject_code(attrs, since)?,
            TagId::ArgumentMap => {
                self.add_argument_map(attrs)?;
                Payload::None
            }
            TagId::InjectDocumentation | TagId::ModifyDocumentation => self.open_documentation(tag, attrs, since)?,
            TagId::ReplaceType
            | TagId::ReplaceDefaultExpression
            | TagId::RemoveDefaultExpression
            | TagId::RemoveArgument
            | TagId::DefineOwnership
            | TagId::NoNullPointer
            | TagId::ReferenceCount
            | TagId::Parent => {
                self.modify_argument(tag, attrs)?;
                Payload::None
            }
            TagId::Root
            | TagId::PrimitiveType
            | TagId::ContainerType
            | TagId::EnumType
            | TagId::ObjectType
            | TagId::ValueType
            | TagId::InterfaceType
            | TagId::NamespaceType
            | TagId::Function => {
                return Err(TypesystemError::structural(format!(
                    "'{}' is not a directive",
                    tags::as_str(tag)
                )));
            }
        };
        Ok(frame.with_payload(payload))
    }

    /// Commit whatever `frame` built, after it has been popped.
    pub(super) fn close_frame(&mut self, frame: Frame) -> Result<(), TypesystemError> {
        match frame.tag {
            TagId::Root => self.commit_root(frame),
            TagId::ObjectType | TagId::ValueType | TagId::InterfaceType | TagId::NamespaceType => {
                self.commit_complex(frame)
            }
            TagId::EnumType => {
                self.current_enum = None;
                self.commit_documentation(frame)
            }
            TagId::PrimitiveType | TagId::ContainerType | TagId::Function => self.commit_documentation(frame),
            TagId::AddFunction if self.stack.top_tag() == Some(TagId::Root) => {
                self.commit_global_functions();
                Ok(())
            }
            TagId::AddField => {
                self.close_add_field(frame);
                Ok(())
            }
            TagId::CustomConstructor | TagId::CustomDestructor => {
                let (Payload::CustomFunction(function), Some(id)) = (frame.payload, frame.entry) else {
                    return Ok(());
                };
                let entry = self.entry_mut(id)?;
                if frame.tag == TagId::CustomConstructor {
                    entry.custom_constructor = Some(function);
                } else {
                    entry.custom_destructor = Some(function);
                }
                Ok(())
            }
            TagId::Template => {
                if let Payload::Template(template) = frame.payload {
                    self.db.add_template(template);
                }
                Ok(())
            }
            TagId::InsertTemplate => {
                if let Payload::TemplateInstance(instance) = frame.payload {
                    // A type-level conversion rule has no body to insert into.
                    if let Some(code) = self.active_code() {
                        code.add_template(instance);
                    }
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    // --- commit --------------------------------------------------------------

    fn commit_root(&mut self, frame: Frame) -> Result<(), TypesystemError> {
        let (Some(id), Some(mods)) = (frame.entry, frame.mods) else {
            return Ok(());
        };
        if !mods.code_snips.is_empty() {
            self.entry_mut(id)?.code_snips.extend(mods.code_snips);
        }
        Ok(())
    }

    fn commit_complex(&mut self, frame: Frame) -> Result<(), TypesystemError> {
        let (Some(id), Some(mods)) = (frame.entry, frame.mods) else {
            return Ok(());
        };
        let TransientMods {
            added_functions,
            function_mods,
            field_mods,
            added_fields,
            code_snips,
            doc_modifications,
        } = mods;

        let entry = self.entry_mut(id)?;
        let twin = entry.designated_interface();
        tracing::debug!(
            entry = %entry.name,
            functions = function_mods.len(),
            fields = field_mods.len(),
            snips = code_snips.len(),
            "committing modifications"
        );
        entry.code_snips.extend(code_snips.iter().cloned());
        entry.doc_modifications.extend(doc_modifications);
        if let Some(complex) = entry.complex_mut() {
            complex.added_functions.extend(added_functions);
            complex.function_mods.extend(function_mods.iter().cloned());
            complex.field_mods.extend(field_mods);
            complex.added_fields.extend(added_fields);
        }

        if let Some(twin) = twin {
            let interface = self.entry_mut(twin)?;
            interface.code_snips.extend(code_snips);
            if let Some(complex) = interface.complex_mut() {
                complex.function_mods.extend(function_mods);
            }
        }
        Ok(())
    }

    fn commit_documentation(&mut self, frame: Frame) -> Result<(), TypesystemError> {
        let (Some(id), Some(mods)) = (frame.entry, frame.mods) else {
            return Ok(());
        };
        if !mods.doc_modifications.is_empty() {
            self.entry_mut(id)?.doc_modifications.extend(mods.doc_modifications);
        }
        Ok(())
    }

    /// A root-level `add-function` goes to the global lists, or nowhere when not generating.
    fn commit_global_functions(&mut self) {
        let Some(root) = self.stack.top_mut().and_then(|f| f.mods.as_mut()) else {
            return;
        };
        let functions = mem::take(&mut root.added_functions);
        let modifications = mem::take(&mut root.function_mods);
        if self.generate == CodeGeneration::GenerateAll {
            self.db.add_global_user_functions(functions);
            self.db.add_global_user_function_modifications(modifications);
        }
    }

    fn close_add_field(&mut self, frame: Frame) {
        let Payload::AddedField { owner, index } = frame.payload else {
            return;
        };
        let at_root = self.stack.frame(owner).is_some_and(|f| f.tag == TagId::Root);
        let Some(mods) = self.stack.mods_mut(owner) else {
            return;
        };
        if let Some(field) = mods.added_fields.get_mut(index) {
            field.default_value = field.default_value.trim().to_string();
        }
        if at_root {
            let fields = mem::take(&mut mods.added_fields);
            if self.generate == CodeGeneration::GenerateAll {
                self.db.add_global_user_fields(fields);
            }
        }
    }

    // --- root-level directives -----------------------------------------------

    fn load_typesystem(&mut self, attrs: &Attributes) -> Result<(), TypesystemError> {
        let name = attrs.get("name");
        if name.is_empty() {
            return Err(TypesystemError::attribute("No typesystem name specified"));
        }
        let generate_child = self.flag(attrs, "generate", true) && self.generate == CodeGeneration::GenerateAll;
        tracing::debug!(name, generate_child, "loading typesystem");
        self.db.parse_file(name, generate_child)
    }

    fn reject_enum_value(&mut self, attrs: &Attributes, since: f64) -> Result<(), TypesystemError> {
        let Some(id) = self.current_enum else {
            return Err(TypesystemError::structural(
                "<reject-enum-value> node must be used inside a <enum-type> node",
            ));
        };
        let name = attrs.get("name");
        if !name.is_empty() && self.db.supported_api_version(since) {
            if let Some(e) = self.entry_mut(id)?.as_enum_mut() {
                e.rejected_values.push(name.to_string());
            }
        }
        Ok(())
    }

    fn add_rejection(&mut self, attrs: &Attributes) -> Result<(), TypesystemError> {
        let rejection = Rejection {
            class: attrs.get("class").to_string(),
            function_name: attrs.get("function-name").to_string(),
            field_name: attrs.get("field-name").to_string(),
            enum_name: attrs.get("enum-name").to_string(),
        };
        let all_wild = [
            &rejection.class,
            &rejection.function_name,
            &rejection.field_name,
            &rejection.enum_name,
        ]
        .iter()
        .all(|v| v.as_str() == Rejection::WILDCARD);
        if all_wild {
            return Err(TypesystemError::attribute(
                "bad reject entry, neither 'class', 'function-name', 'field-name' nor 'enum-name' specified",
            ));
        }
        self.db.add_rejection(rejection);
        Ok(())
    }

    // --- type-level directives -----------------------------------------------

    fn add_include(&mut self, attrs: &Attributes) -> Result<(), TypesystemError> {
        let location = attrs.get("location");
        let location = include_location_from_str(location)
            .ok_or_else(|| TypesystemError::attribute(format!("Location not recognized: '{}'", location.to_lowercase())))?;
        let include = Include {
            location,
            file_name: attrs.get("file-name").to_string(),
        };
        let extra = self.stack.top_tag() == Some(TagId::ExtraIncludes);
        let id = self.stack.current_entry().ok_or_else(|| no_target("type entry"))?;

        let entry = self.entry_mut(id)?;
        if extra {
            entry.extra_includes.push(include);
        } else {
            entry.include = Some(include);
        }
        let (primary, extras, twin) = (
            entry.include.clone(),
            entry.extra_includes.clone(),
            entry.designated_interface(),
        );
        if let Some(twin) = twin {
            let interface = self.entry_mut(twin)?;
            interface.include = primary;
            interface.extra_includes = extras;
        }
        Ok(())
    }

    fn open_add_function(&mut self, attrs: &Attributes, since: f64) -> Result<Payload, TypesystemError> {
        let mut sig = signature::normalized_signature(attrs.get("signature"));
        if sig.is_empty() {
            return Err(TypesystemError::attribute("No signature for the added function"));
        }
        let access = match modifiers::from_str(ModifierContext::AddFunction, attrs.get("access")) {
            Some(ModifierId::Protected) => FunctionAccess::Protected,
            Some(_) => FunctionAccess::Public,
            None => {
                return Err(TypesystemError::attribute(format!(
                    "Bad access type '{}'",
                    attrs.get("access")
                )));
            }
        };

        let mut function = signature::parse_function(&sig, attrs.get("return-type"), since)?;
        function.is_static = self.flag(attrs, "static", false);
        function.access = access;
        if !sig.contains('(') {
            sig.push_str("()");
        }
        self.current_signature = sig.clone();

        let owner = self.owner()?;
        let mods = self.buffer(owner)?;
        mods.added_functions.push(AddedFunction {
            signature: sig.clone(),
            function,
        });
        mods.function_mods.push(FunctionModification::new(sig, since));
        Ok(Payload::Function {
            owner,
            index: mods.function_mods.len() - 1,
        })
    }

    fn open_modify_function(&mut self, attrs: &Attributes, since: f64) -> Result<Payload, TypesystemError> {
        let sig = signature::normalized_signature(attrs.get("signature"));
        if sig.is_empty() {
            return Err(TypesystemError::attribute("No signature for modified function"));
        }
        let mut m = FunctionModification::new(sig.clone(), since);
        self.current_signature = sig;

        let access = attrs.get("access");
        if !access.is_empty() {
            let id = modifiers::from_str(ModifierContext::ModifyFunction, access)
                .ok_or_else(|| TypesystemError::attribute(format!("Bad access type '{access}'")))?;
            m.modifiers |= Modifiers::from_modifier(id);
        }
        if self.flag(attrs, "deprecated", false) {
            m.modifiers |= Modifiers::DEPRECATED;
        }
        let remove = attrs.get("remove");
        if !remove.is_empty() {
            let scope = modifiers::removal_from_str(remove)
                .ok_or_else(|| TypesystemError::attribute(format!("Bad removal type '{remove}'")))?;
            m.removal = scope.into();
        }
        let rename = attrs.get("rename");
        if !rename.is_empty() {
            m.renamed_to = Some(rename.to_string());
            m.modifiers |= Modifiers::RENAME;
        }
        if attrs.has_value("associated-to") {
            m.association = Some(attrs.get("associated-to").to_string());
        }
        m.thread = self.flag(attrs, "thread", false);
        m.allow_thread = self.flag(attrs, "allow-thread", false);
        if self.flag(attrs, "virtual-slot", false) {
            m.modifiers |= Modifiers::VIRTUAL_SLOT;
        }

        let owner = self.owner()?;
        let mods = self.buffer(owner)?;
        mods.function_mods.push(m);
        Ok(Payload::Function {
            owner,
            index: mods.function_mods.len() - 1,
        })
    }

    /// An unnamed `modify-field` is accepted and ignored.
    fn open_modify_field(&mut self, attrs: &Attributes) -> Result<Payload, TypesystemError> {
        let name = attrs.get("name");
        if name.is_empty() {
            return Ok(Payload::SkippedField);
        }
        let mut m = FieldModification::new(name);
        m.modifiers.set(Modifiers::READABLE, self.flag(attrs, "read", true));
        m.modifiers.set(Modifiers::WRITABLE, self.flag(attrs, "write", true));

        let owner = self.owner()?;
        let mods = self.buffer(owner)?;
        mods.field_mods.push(m);
        Ok(Payload::Field {
            owner,
            index: mods.field_mods.len() - 1,
        })
    }

    fn open_add_field(&mut self, attrs: &Attributes, since: f64) -> Result<Payload, TypesystemError> {
        let field_type = signature::parse_type(attrs.get("type"))?;
        let owner = self.owner()?;
        let enclosing = self
            .stack
            .frame(owner)
            .filter(|f| f.tag != TagId::Root)
            .and_then(|f| f.entry)
            .and_then(|id| self.db.entry(id))
            .map(|e| e.name.clone());
        // Inside a namespace a bare type name may refer to a namespace-scoped type.
        let type_entry = self.db.find_type(&field_type.name).or_else(|| {
            enclosing
                .as_ref()
                .and_then(|ns| self.db.find_type(&format!("{ns}::{}", field_type.name)))
        });

        let mods = self.buffer(owner)?;
        mods.added_fields.push(AddedField {
            name: attrs.get("name").to_string(),
            field_type,
            type_entry,
            default_value: String::new(),
            enclosing,
            since,
        });
        Ok(Payload::AddedField {
            owner,
            index: mods.added_fields.len() - 1,
        })
    }

    fn open_inject_code(&mut self, attrs: &Attributes, since: f64) -> Result<Payload, TypesystemError> {
        let class = attrs.get("class");
        let language = languages::from_str(LanguageContext::Snippet, class)
            .ok_or_else(|| TypesystemError::attribute(format!("Invalid class specifier: '{}'", class.to_lowercase())))?;
        let position = attrs.get("position");
        let position = languages::position_from_str(position)
            .ok_or_else(|| TypesystemError::attribute(format!("Invalid position: '{}'", position.to_lowercase())))?;

        let mut snip = CodeSnip::new(language, position, since);
        let file = attrs.get("file");
        let mut in_file = false;
        if self.generate == CodeGeneration::GenerateAll && !file.is_empty() {
            match self.read_code_file(file) {
                Some(content) => {
                    snip.code.add_text(&content);
                    in_file = true;
                }
                None => self.warn(WarningKind::MissingFile, format!("File for inject code not exist: {file}")),
            }
        }

        let parent = self.stack.top_tag();
        if language == CodeLanguage::Interface && parent != Some(TagId::InterfaceType) {
            return Err(TypesystemError::structural(
                "Interface code injections must be direct child of an interface type entry",
            ));
        }

        if matches!(parent, Some(TagId::ModifyFunction | TagId::AddFunction)) {
            if language == CodeLanguage::ShellDeclaration {
                return Err(TypesystemError::structural(
                    "no function implementation in shell declaration in which to inject code",
                ));
            }
            let (owner, function) = self.function_position()?;
            let m = self.stack.function_mut(owner, function).ok_or_else(|| no_target("function"))?;
            m.snips.push(snip);
            if in_file {
                m.modifiers |= Modifiers::CODE_INJECTION;
            }
            return Ok(Payload::Snip(SnipTarget::Function {
                owner,
                function,
                snip: m.snips.len() - 1,
            }));
        }

        let owner = self.owner()?;
        let mods = self.buffer(owner)?;
        mods.code_snips.push(snip);
        Ok(Payload::Snip(SnipTarget::Entity {
            owner,
            index: mods.code_snips.len() - 1,
        }))
    }

    fn add_argument_map(&mut self, attrs: &Attributes) -> Result<(), TypesystemError> {
        let raw = attrs.get("index");
        let position: i64 = raw
            .trim()
            .parse()
            .map_err(|_| TypesystemError::attribute(format!("Can't convert position '{raw}' to integer")))?;
        if position <= 0 {
            return Err(TypesystemError::attribute(format!(
                "Argument position {position} must be a positive number"
            )));
        }
        let meta_name = attrs.get("meta-name").to_string();
        if meta_name.is_empty() {
            self.warn(WarningKind::ArgumentMap, "Empty meta name in argument map");
        }

        let target = match self.stack.top().map(|f| &f.payload) {
            Some(Payload::Snip(SnipTarget::Function { owner, function, snip })) => Some((*owner, *function, *snip)),
            _ => None,
        };
        let snip = match target {
            Some((owner, function, snip)) => self
                .stack
                .function_mut(owner, function)
                .and_then(|m| m.snips.get_mut(snip)),
            None => None,
        };
        match snip {
            Some(snip) => {
                snip.argument_map.insert(position as usize, meta_name);
            }
            None => self.warn(
                WarningKind::ArgumentMap,
                "Argument maps are only useful for injection of code into functions.",
            ),
        }
        Ok(())
    }

    fn open_documentation(&mut self, tag: TagId, attrs: &Attributes, since: f64) -> Result<Payload, TypesystemError> {
        let signature = if self.stack.top_tag().is_some_and(tags::is_type_entry) {
            String::new()
        } else {
            self.current_signature.clone()
        };

        let doc = if tag == TagId::InjectDocumentation {
            let mode = attrs.get("mode");
            let mode = doc_mode_from_str(mode)
                .ok_or_else(|| TypesystemError::attribute(format!("Unknown documentation injection mode: '{mode}'")))?;
            let format = attrs.get("format");
            let format = languages::from_str(LanguageContext::DocumentationFormat, format)
                .ok_or_else(|| TypesystemError::attribute(format!("Unknown documentation format: '{format}'")))?;
            DocModification {
                mode: mode.into(),
                xpath: String::new(),
                signature,
                format,
                code: Default::default(),
                since,
            }
        } else {
            DocModification {
                mode: DocModificationMode::XPathReplace,
                xpath: attrs.get("xpath").to_string(),
                signature,
                format: CodeLanguage::Native,
                code: Default::default(),
                since,
            }
        };

        let owner = self.owner()?;
        let mods = self.buffer(owner)?;
        mods.doc_modifications.push(doc);
        Ok(Payload::Documentation {
            owner,
            index: mods.doc_modifications.len() - 1,
        })
    }

    // --- access / rename -----------------------------------------------------

    /// Dispatch on the parent frame: function, field or argument modification.
    fn apply_access(&mut self, tag: TagId, attrs: &Attributes) -> Result<(), TypesystemError> {
        let (bits, renamed_to) = if tag == TagId::Rename {
            let to = attrs.get("to");
            if to.is_empty() {
                return Err(TypesystemError::attribute("Rename modifier requires 'to' attribute"));
            }
            (Modifiers::RENAME, Some(to.to_string()))
        } else {
            let modifier = attrs.get("modifier");
            if modifier.is_empty() {
                return Err(TypesystemError::attribute("No access modification specified"));
            }
            let id = modifiers::from_str(ModifierContext::AccessTag, modifier)
                .ok_or_else(|| TypesystemError::attribute(format!("Unknown access modifier: '{modifier}'")))?;
            (Modifiers::from_modifier(id), None)
        };

        let target = match self.stack.top().map(|f| &f.payload) {
            Some(Payload::Function { owner, index }) => ModificationTarget::Function {
                owner: *owner,
                index: *index,
            },
            Some(Payload::Field { owner, index }) => ModificationTarget::Field {
                owner: *owner,
                index: *index,
            },
            Some(Payload::Argument {
                owner,
                function,
                argument,
            }) => ModificationTarget::Argument {
                owner: *owner,
                function: *function,
                argument: *argument,
            },
            Some(Payload::SkippedField) => ModificationTarget::Skipped,
            _ => return Err(no_target("function, field or argument")),
        };

        match target {
            ModificationTarget::Function { owner, index } => {
                let m = self.stack.function_mut(owner, index).ok_or_else(|| no_target("function"))?;
                m.modifiers |= bits;
                if renamed_to.is_some() {
                    m.renamed_to = renamed_to;
                }
            }
            ModificationTarget::Field { owner, index } => {
                let m = self
                    .stack
                    .mods_mut(owner)
                    .and_then(|mods| mods.field_mods.get_mut(index))
                    .ok_or_else(|| no_target("field"))?;
                m.modifiers |= bits;
                if renamed_to.is_some() {
                    m.renamed_to = renamed_to;
                }
            }
            ModificationTarget::Argument {
                owner,
                function,
                argument,
            } => {
                let m = self
                    .stack
                    .function_mut(owner, function)
                    .and_then(|f| f.argument_mods.get_mut(argument))
                    .ok_or_else(|| no_target("argument"))?;
                m.modifiers |= bits;
                if renamed_to.is_some() {
                    m.renamed_to = renamed_to;
                }
            }
            ModificationTarget::Skipped => {}
        }
        Ok(())
    }

    // --- arguments -----------------------------------------------------------

    fn open_modify_argument(&mut self, attrs: &Attributes) -> Result<Payload, TypesystemError> {
        let (owner, function) = self.function_position()?;
        let index = parse_argument_index(attrs.get("index"))?;
        let replace_value = attrs.get("replace-value");
        if !replace_value.is_empty() && index != 0 {
            return Err(TypesystemError::attribute(
                "replace-value is only supported for return values (index=0).",
            ));
        }
        let mut m = ArgumentModification::new(index);
        m.replace_value = Some(replace_value.to_string()).filter(|v| !v.is_empty());
        m.reset_after_use = self.flag(attrs, "invalidate-after-use", false);

        let function_mod = self.stack.function_mut(owner, function).ok_or_else(|| no_target("function"))?;
        function_mod.argument_mods.push(m);
        Ok(Payload::Argument {
            owner,
            function,
            argument: function_mod.argument_mods.len() - 1,
        })
    }

    fn open_conversion_rule(&mut self, attrs: &Attributes, since: f64) -> Result<Payload, TypesystemError> {
        if self.stack.top_tag() == Some(TagId::ModifyArgument) {
            let class = attrs.get("class");
            let language = languages::from_str(LanguageContext::Conversion, class)
                .ok_or_else(|| TypesystemError::attribute(format!("unsupported class attribute: '{class}'")))?;
            let (owner, function, argument) = self.argument_position()?;
            let m = self.argument_mut()?;
            m.conversion_rules
                .push(CodeSnip::new(language, SnipPosition::Beginning, since));
            return Ok(Payload::ArgumentConversion {
                owner,
                function,
                argument,
                rule: m.conversion_rules.len() - 1,
            });
        }

        let id = self.stack.current_entry().ok_or_else(|| no_target("type entry"))?;
        let entry_name = {
            let entry = self.entry_mut(id)?;
            if entry.conversion_rule.is_some() {
                return Err(TypesystemError::structural("Types can have only one conversion rule"));
            }
            entry.name.clone()
        };
        let file = attrs.get("file");
        if file.is_empty() {
            return Err(TypesystemError::attribute(
                "'file' attribute required; the source file containing the conversion functions must be provided",
            ));
        }
        if self.generate == CodeGeneration::GenerateAll {
            match self.read_code_file(file) {
                Some(content) => self.entry_mut(id)?.conversion_rule = Some(content),
                None => self.warn(
                    WarningKind::MissingFile,
                    format!("File containing conversion code for {entry_name} type does not exist or is not readable: {file}"),
                ),
            }
        }
        Ok(Payload::None)
    }

    /// Argument-modifier tags: each edits the argument modification its parent opened.
    fn modify_argument(&mut self, tag: TagId, attrs: &Attributes) -> Result<(), TypesystemError> {
        match tag {
            TagId::ReplaceType => {
                let modified = attrs.get("modified-type");
                if modified.is_empty() {
                    return Err(TypesystemError::attribute(
                        "Type replacement requires 'modified-type' attribute",
                    ));
                }
                self.argument_mut()?.modified_type = Some(modified.to_string());
            }
            TagId::ReplaceDefaultExpression => {
                let with = attrs.get("with");
                if with.is_empty() {
                    return Err(TypesystemError::attribute(
                        "Default expression replaced with empty string. Use remove-default-expression instead.",
                    ));
                }
                self.argument_mut()?.replaced_default_expression = Some(with.to_string());
            }
            TagId::RemoveDefaultExpression => self.argument_mut()?.removed_default_expression = true,
            TagId::RemoveArgument => self.argument_mut()?.removed = true,
            TagId::DefineOwnership => {
                let class = attrs.get("class");
                let language = languages::from_str(LanguageContext::Ownership, class)
                    .ok_or_else(|| TypesystemError::attribute(format!("unsupported class attribute: '{class}'")))?;
                let owner = attrs.get("owner");
                let owner = ownership::from_str(owner)
                    .ok_or_else(|| TypesystemError::attribute(format!("unsupported owner attribute: '{owner}'")))?;
                self.argument_mut()?.ownerships.insert(language, owner);
            }
            TagId::NoNullPointer => {
                let default = attrs.get("default-value");
                let m = self.argument_mut()?;
                m.no_null_pointers = true;
                let misplaced = if m.index == 0 {
                    m.null_pointer_default_value = Some(default.to_string()).filter(|d| !d.is_empty());
                    false
                } else {
                    !default.is_empty()
                };
                if misplaced {
                    self.warn(
                        WarningKind::NullPointerDefault,
                        "default values for null pointer guards are only effective for return values",
                    );
                }
            }
            TagId::ReferenceCount => {
                let action = attrs.get("action");
                match ownership::reference_count_from_str(action) {
                    Some(action) => {
                        let variable_name = attrs.get("variable-name").to_string();
                        self.argument_mut()?
                            .reference_counts
                            .push(ReferenceCount { action, variable_name });
                    }
                    None => self.warn(
                        WarningKind::InvalidReferenceCount,
                        format!(
                            "unrecognized value '{action}' for action attribute. supported actions: {}",
                            registry::spellings(REFERENCE_COUNT_ACTIONS).join(" ")
                        ),
                    ),
                }
            }
            TagId::Parent => {
                let index = parse_argument_index(attrs.get("index"))?;
                let action = attrs.get("action");
                let action = ownership::parent_action_from_str(action)
                    .ok_or_else(|| TypesystemError::attribute(format!("Invalid parent action '{action}'")))?;
                self.argument_mut()?.owner = Some(ArgumentOwner { index, action });
            }
            other => {
                return Err(TypesystemError::structural(format!(
                    "'{}' is not an argument modifier",
                    tags::as_str(other)
                )));
            }
        }
        Ok(())
    }

    // --- positions -----------------------------------------------------------

    /// Innermost frame owning a modification buffer.
    fn owner(&self) -> Result<usize, TypesystemError> {
        self.stack.owner_index().ok_or_else(|| no_target("type entry"))
    }

    fn buffer(&mut self, owner: usize) -> Result<&mut TransientMods, TypesystemError> {
        self.stack.mods_mut(owner).ok_or_else(|| no_target("type entry"))
    }

    /// Position of the function modification opened by the parent frame.
    fn function_position(&self) -> Result<(usize, usize), TypesystemError> {
        match self.stack.top().map(|f| &f.payload) {
            Some(Payload::Function { owner, index }) => Ok((*owner, *index)),
            _ => Err(no_target("function")),
        }
    }

    fn function_mut(&mut self) -> Result<&mut FunctionModification, TypesystemError> {
        let (owner, index) = self.function_position()?;
        self.stack.function_mut(owner, index).ok_or_else(|| no_target("function"))
    }

    /// Position of the argument modification opened by the parent frame.
    fn argument_position(&self) -> Result<(usize, usize, usize), TypesystemError> {
        match self.stack.top().map(|f| &f.payload) {
            Some(Payload::Argument {
                owner,
                function,
                argument,
            }) => Ok((*owner, *function, *argument)),
            _ => Err(no_target("argument")),
        }
    }

    fn argument_mut(&mut self) -> Result<&mut ArgumentModification, TypesystemError> {
        let (owner, function, argument) = self.argument_position()?;
        self.stack
            .function_mut(owner, function)
            .and_then(|f| f.argument_mods.get_mut(argument))
            .ok_or_else(|| no_target("argument"))
    }
}
