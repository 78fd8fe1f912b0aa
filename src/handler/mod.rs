//! The document handler: turns the event stream of one typesystem document into registry entries.
//!
//! The handler is a stack machine. Every open tag pushes a [`stack::Frame`]; directives edit the
//! record their parent frame opened, and closing a type-entry frame commits the modifications
//! gathered for it. The first fatal error aborts the document and is returned with its position.
//!
//! ## Notes
//! - `import-file` is transparent: it pushes no frame and its quoted lines are routed as text of the
//!   enclosing frame.
//! - `load-typesystem` re-enters the registry, which in turn runs a fresh handler on the loaded
//!   document.
//!
//! ## Examples
//! ```rust
//! use typesys::database::{Registry, TypeDatabase};
//!
//! let mut db = TypeDatabase::new();
//! db.parse_str(
//!     "<typesystem package='Foo'>\
//!        <value-type name='Point'><modify-function signature='x()' rename='getX'/></value-type>\
//!      </typesystem>",
//!     true,
//! )
//! .unwrap();
//! let point = db.entry(db.find_type("Point").unwrap()).unwrap();
//! assert_eq!(point.complex().unwrap().function_mods[0].renamed_to.as_deref(), Some("getX"));
//! ```

mod attributes;
mod builder;
mod include;
mod modifications;
mod stack;
mod text;

#[cfg(test)]
mod tests;

use typesys_core::lang::attributes as schema;
use typesys_core::lang::tags::{self, TagId};
use typesys_syntax::events::{DocumentEvent, EventReader};

use self::attributes::{Attributes, DefaultContext};
use self::stack::ParseStack;
use crate::database::Registry;
use crate::diagnostics::{TypesystemError, Warning, WarningKind};
use crate::model::{CodeGeneration, TypeEntry, TypeEntryId};

/// Parser state for one document.
pub struct Handler<'a> {
    db: &'a mut dyn Registry,
    generate: CodeGeneration,
    stack: ParseStack,
    default_package: String,
    default_superclass: String,
    /// Signature of the last `add-function` / `modify-function`, inherited by documentation tags.
    current_signature: String,
    /// Open `enum-type`, the only legal home of `reject-enum-value`.
    current_enum: Option<TypeEntryId>,
    /// Set once the document element has opened; a document has exactly one.
    saw_root: bool,
}

impl<'a> Handler<'a> {
    /// `generate = false` marks every entity of the document as provided by another module.
    pub fn new(db: &'a mut dyn Registry, generate: bool) -> Self {
        Self {
            db,
            generate: if generate {
                CodeGeneration::GenerateAll
            } else {
                CodeGeneration::GenerateNothing
            },
            stack: ParseStack::default(),
            default_package: String::new(),
            default_superclass: String::new(),
            current_signature: String::new(),
            current_enum: None,
            saw_root: false,
        }
    }

    /// Number of open frames.
    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    /// Handle an open tag with its raw attributes.
    ///
    /// ## Errors
    /// - [`TypesystemError::Structural`] for unknown tags and misplaced tags.
    /// - [`TypesystemError::Attribute`] for missing or invalid attribute values.
    /// - Any error of a nested `load-typesystem` document.
    pub fn start_element(&mut self, name: &str, raw: &[(String, String)]) -> Result<(), TypesystemError> {
        if tags::is_import_file(name) {
            return self.import_file(raw);
        }
        let tag = tags::from_str(name)
            .ok_or_else(|| TypesystemError::structural(format!("Unknown tag name: '{name}'")))?;
        self.check_placement(tag)?;

        let entity_name = self
            .stack
            .current_entry()
            .and_then(|id| self.db.entry(id))
            .map(|e| e.name.clone());
        let attrs = attributes::resolve(
            tags::as_str(tag),
            schema::specs(tag),
            raw,
            DefaultContext {
                package: &self.default_package,
                superclass: &self.default_superclass,
                entity_name: entity_name.as_deref(),
            },
            &*self.db,
        )?;
        let since = attributes::parse_since(attrs.get("since"), &*self.db);

        let frame = if tag == TagId::Root {
            self.saw_root = true;
            self.open_root(&attrs, since)?
        } else if tags::is_type_entry(tag) {
            self.open_type_entry(tag, &attrs, since)?
        } else {
            self.open_directive(tag, &attrs, since)?
        };
        tracing::trace!(tag = tags::as_str(tag), depth = self.stack.depth(), "open");
        self.stack.push(frame);
        Ok(())
    }

    /// Handle a close tag.
    pub fn end_element(&mut self, name: &str) -> Result<(), TypesystemError> {
        if tags::is_import_file(name) {
            return Ok(());
        }
        let frame = self
            .stack
            .pop()
            .ok_or_else(|| TypesystemError::structural(format!("Unbalanced close tag: '{name}'")))?;
        self.close_frame(frame)
    }

    /// Handle a text run.
    pub fn characters(&mut self, text: &str) {
        self.route_text(text);
    }

    /// Reject a tag whose position in the document is not legal.
    fn check_placement(&self, tag: TagId) -> Result<(), TypesystemError> {
        let Some(parent) = self.stack.top_tag() else {
            if tag == TagId::Root && !self.saw_root {
                return Ok(());
            }
            if tag == TagId::Root {
                return Err(TypesystemError::structural("'typesystem' must be the document element"));
            }
            return Err(TypesystemError::structural(format!(
                "Document element must be 'typesystem', found '{}'",
                tags::as_str(tag)
            )));
        };
        if tag == TagId::Root {
            return Err(TypesystemError::structural("'typesystem' must be the document element"));
        }
        if tags::is_type_entry(tag) {
            if tags::may_nest_type_entry(parent) {
                return Ok(());
            }
            return Err(TypesystemError::structural("Nested types not supported"));
        }
        if tags::parent_allows(tag, parent) {
            return Ok(());
        }
        if parent == TagId::Root {
            return Err(TypesystemError::structural(format!(
                "Tag requires parent: '{}'",
                tags::as_str(tag)
            )));
        }
        Err(TypesystemError::structural(format!(
            "'{}' requires {} as parent, found '{}'",
            tags::as_str(tag),
            tags::info_for(tag).parent_hint,
            tags::as_str(parent)
        )))
    }

    fn default_context(&self) -> DefaultContext<'_> {
        DefaultContext {
            package: &self.default_package,
            superclass: &self.default_superclass,
            entity_name: None,
        }
    }

    fn warn(&self, kind: WarningKind, message: impl Into<String>) {
        self.db.report_warning(Warning::new(kind, message));
    }

    /// Boolean attribute; an empty value reads as `default`.
    fn flag(&self, attrs: &Attributes, key: &str, default: bool) -> bool {
        match attrs.get(key) {
            "" => default,
            value => attributes::convert_boolean(value, key, default, &*self.db),
        }
    }

    fn entry_mut(&mut self, id: TypeEntryId) -> Result<&mut TypeEntry, TypesystemError> {
        self.db
            .entry_mut(id)
            .ok_or_else(|| TypesystemError::structural(format!("no type entry with id {id}")))
    }
}

/// Parse `source` into `registry`.
///
/// ## Errors
/// The first fatal error of the document, wrapped in [`TypesystemError::Located`] with the
/// position of the offending event. Errors of nested documents keep their own position.
#[tracing::instrument(level = "debug", skip(registry, source))]
pub fn parse_document(
    registry: &mut dyn Registry,
    source: &str,
    file_name: &str,
    generate: bool,
) -> Result<(), TypesystemError> {
    let mut reader = EventReader::new(source);
    let mut handler = Handler::new(registry, generate);
    let mut saw_root = false;

    loop {
        let event = match reader.next_event() {
            Ok(Some(event)) => event,
            Ok(None) => break,
            Err(err) => {
                let offset = err.offset();
                return Err(TypesystemError::from(err).locate(file_name, source, offset));
            }
        };
        let result = match &event.node {
            DocumentEvent::Start { name, attributes } => {
                saw_root = true;
                handler.start_element(name, attributes)
            }
            DocumentEvent::End { name } => handler.end_element(name),
            DocumentEvent::Text(text) => {
                handler.characters(text);
                Ok(())
            }
        };
        result.map_err(|err| err.locate(file_name, source, event.span.start))?;
    }

    if !saw_root {
        return Err(TypesystemError::structural("Document has no 'typesystem' element").locate(file_name, source, 0));
    }
    tracing::debug!(file = file_name, "document parsed");
    Ok(())
}
