//! The registry: the only state that outlives a single document parse.
//!
//! The handler talks to the registry exclusively through the [`Registry`] trait so that a binding
//! generator can bring its own storage. [`TypeDatabase`] is the in-memory implementation used by
//! the CLI and the tests.
//!
//! ## Notes
//!
//! - Entries live in an arena and are referenced by [`TypeEntryId`]; the name index maps a
//!   qualified name to the ids registered under it.
//! - For kinds that do not allow duplicates only the first registration is indexed, so
//!   [`Registry::find_type`] keeps returning the first record.
//! - `load-typesystem` re-enters the handler through [`Registry::parse_file`]; already loaded
//!   documents are skipped.
//!
//! ## Examples
//! ```rust
//! use typesys::database::{Registry, TypeDatabase};
//!
//! let mut db = TypeDatabase::new();
//! db.parse_str("<typesystem package='P'><value-type name='A'/></typesystem>", true).unwrap();
//! let id = db.find_type("A").unwrap();
//! assert_eq!(db.entry(id).unwrap().kind_name(), "value");
//! ```

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::config::ParserConfig;
use crate::diagnostics::{TypesystemError, Warning};
use crate::handler;
use crate::model::{
    AddedField, AddedFunction, FunctionModification, Rejection, TemplateEntry, TypeEntry, TypeEntryId,
};

/// Lookup and insert contract the handler relies on.
pub trait Registry {
    fn config(&self) -> &ParserConfig;

    /// First entry registered under `name`.
    fn find_type(&self, name: &str) -> Option<TypeEntryId>;
    fn entry(&self, id: TypeEntryId) -> Option<&TypeEntry>;
    fn entry_mut(&mut self, id: TypeEntryId) -> Option<&mut TypeEntry>;
    /// Store `entry` and return its id.
    fn add_type(&mut self, entry: TypeEntry) -> TypeEntryId;

    fn add_template(&mut self, template: TemplateEntry);
    fn find_template(&self, name: &str) -> Option<&TemplateEntry>;

    /// Parse the typesystem document `name` into this registry.
    fn parse_file(&mut self, name: &str, generate: bool) -> Result<(), TypesystemError>;

    /// Whether a tag introduced in `since` belongs to the API being generated.
    fn supported_api_version(&self, since: f64) -> bool {
        self.config().supports(since)
    }

    fn add_rejection(&mut self, rejection: Rejection);
    fn add_suppressed_warning(&mut self, pattern: &str);
    fn add_global_user_functions(&mut self, functions: Vec<AddedFunction>);
    fn add_global_user_function_modifications(&mut self, modifications: Vec<FunctionModification>);
    fn add_global_user_fields(&mut self, fields: Vec<AddedField>);
    fn add_required_target_import(&mut self, package: &str);

    /// Report a non-fatal diagnostic.
    fn report_warning(&self, warning: Warning);
}

/// In-memory registry.
#[derive(Debug, Default)]
pub struct TypeDatabase {
    config: ParserConfig,
    entries: Vec<TypeEntry>,
    index: HashMap<String, Vec<TypeEntryId>>,
    templates: HashMap<String, TemplateEntry>,
    rejections: Vec<Rejection>,
    suppressed: Vec<(String, Regex)>,
    global_functions: Vec<AddedFunction>,
    global_function_mods: Vec<FunctionModification>,
    global_fields: Vec<AddedField>,
    required_imports: Vec<String>,
    loaded: HashSet<PathBuf>,
    warnings: RefCell<Vec<Warning>>,
}

impl TypeDatabase {
    pub fn new() -> Self {
        Self::with_config(ParserConfig::default())
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Parse a document held in memory.
    pub fn parse_str(&mut self, source: &str, generate: bool) -> Result<(), TypesystemError> {
        handler::parse_document(self, source, "<memory>", generate)
    }

    /// Parse the document at `path` (resolved as given, not through the search paths).
    pub fn parse_path(&mut self, path: &Path, generate: bool) -> Result<(), TypesystemError> {
        let source = fs::read_to_string(path).map_err(|source| TypesystemError::Io {
            path: path.display().to_string(),
            source,
        })?;
        if let Ok(canonical) = path.canonicalize() {
            self.loaded.insert(canonical);
        }
        handler::parse_document(self, &source, &path.display().to_string(), generate)
    }

    pub fn entries(&self) -> &[TypeEntry] {
        &self.entries
    }

    /// Every id registered and indexed under `name`, in registration order.
    pub fn find_all(&self, name: &str) -> &[TypeEntryId] {
        self.index.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn templates(&self) -> impl Iterator<Item = &TemplateEntry> {
        self.templates.values()
    }

    pub fn rejections(&self) -> &[Rejection] {
        &self.rejections
    }

    pub fn is_class_rejected(&self, class: &str) -> bool {
        self.rejections.iter().any(|r| r.rejects_class(class))
    }

    pub fn global_user_functions(&self) -> &[AddedFunction] {
        &self.global_functions
    }

    pub fn global_user_function_modifications(&self) -> &[FunctionModification] {
        &self.global_function_mods
    }

    pub fn global_user_fields(&self) -> &[AddedField] {
        &self.global_fields
    }

    pub fn required_target_imports(&self) -> &[String] {
        &self.required_imports
    }

    /// Warnings reported so far that were not suppressed.
    pub fn warnings(&self) -> Vec<Warning> {
        self.warnings.borrow().clone()
    }

    /// Whether `message` matches a `suppress-warning` pattern.
    pub fn is_suppressed(&self, message: &str) -> bool {
        self.suppressed.iter().any(|(_, re)| re.is_match(message))
    }

    fn locate_document(&self, name: &str) -> Option<PathBuf> {
        let direct = PathBuf::from(name);
        if direct.is_file() {
            return Some(direct);
        }
        self.config
            .typesystem_paths
            .iter()
            .map(|dir| dir.join(name))
            .find(|candidate| candidate.is_file())
    }
}

impl Registry for TypeDatabase {
    fn config(&self) -> &ParserConfig {
        &self.config
    }

    fn find_type(&self, name: &str) -> Option<TypeEntryId> {
        self.index.get(name).and_then(|ids| ids.first().copied())
    }

    fn entry(&self, id: TypeEntryId) -> Option<&TypeEntry> {
        self.entries.get(id)
    }

    fn entry_mut(&mut self, id: TypeEntryId) -> Option<&mut TypeEntry> {
        self.entries.get_mut(id)
    }

    fn add_type(&mut self, entry: TypeEntry) -> TypeEntryId {
        let id = self.entries.len();
        if !entry.name.is_empty() {
            let ids = self.index.entry(entry.name.clone()).or_default();
            if ids.is_empty() || entry.allows_duplicates() {
                ids.push(id);
            }
        }
        tracing::debug!(name = %entry.name, kind = entry.kind_name(), id, "registered type entry");
        self.entries.push(entry);
        id
    }

    fn add_template(&mut self, template: TemplateEntry) {
        tracing::debug!(name = %template.name, "registered template");
        self.templates.insert(template.name.clone(), template);
    }

    fn find_template(&self, name: &str) -> Option<&TemplateEntry> {
        self.templates.get(name)
    }

    #[tracing::instrument(level = "debug", skip(self))]
    fn parse_file(&mut self, name: &str, generate: bool) -> Result<(), TypesystemError> {
        let path = self
            .locate_document(name)
            .ok_or_else(|| TypesystemError::resource(format!("Failed to parse: '{name}'")))?;
        let canonical = path.canonicalize().unwrap_or_else(|_| path.clone());
        if !self.loaded.insert(canonical) {
            tracing::debug!(file = %path.display(), "typesystem already loaded");
            return Ok(());
        }
        let source = fs::read_to_string(&path).map_err(|source| TypesystemError::Io {
            path: path.display().to_string(),
            source,
        })?;
        handler::parse_document(self, &source, &path.display().to_string(), generate)
    }

    fn add_rejection(&mut self, rejection: Rejection) {
        self.rejections.push(rejection);
    }

    fn add_suppressed_warning(&mut self, pattern: &str) {
        let source = pattern
            .split('*')
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(".*");
        match Regex::new(&format!("^{source}$")) {
            Ok(re) => self.suppressed.push((pattern.to_string(), re)),
            Err(err) => tracing::warn!(pattern, error = %err, "ignoring unusable suppression pattern"),
        }
    }

    fn add_global_user_functions(&mut self, functions: Vec<AddedFunction>) {
        self.global_functions.extend(functions);
    }

    fn add_global_user_function_modifications(&mut self, modifications: Vec<FunctionModification>) {
        self.global_function_mods.extend(modifications);
    }

    fn add_global_user_fields(&mut self, fields: Vec<AddedField>) {
        self.global_fields.extend(fields);
    }

    fn add_required_target_import(&mut self, package: &str) {
        if !self.required_imports.iter().any(|p| p == package) {
            self.required_imports.push(package.to_string());
        }
    }

    fn report_warning(&self, warning: Warning) {
        if self.is_suppressed(&warning.message) {
            tracing::debug!(message = %warning.message, "suppressed warning");
            return;
        }
        tracing::warn!(kind = ?warning.kind, "{}", warning.message);
        self.warnings.borrow_mut().push(warning);
    }
}
