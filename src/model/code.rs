//! Code snippets, templates and template instances.
//!
//! A code body is an ordered list of [`CodeFragment`]s: literal text, or a reference to a named
//! template plus replace rules. Template references are resolved against the registry when the
//! body is rendered, so a template may be defined after the snippet that uses it as long as it
//! exists by generation time.
//!
//! ## Examples
//! ```rust
//! use typesys::database::TypeDatabase;
//! use typesys::database::Registry;
//! use typesys::model::{TemplateEntry, TemplateInstance};
//!
//! let mut db = TypeDatabase::new();
//! let mut template = TemplateEntry::new("T", 0.0);
//! template.code.add_text("x = $X;");
//! db.add_template(template);
//!
//! let mut instance = TemplateInstance::new("T", 0.0);
//! instance.add_replace_rule("$X", "42");
//! assert_eq!(instance.expand(&db), "// TEMPLATE - T - STARTx = 42;// TEMPLATE - T - END");
//! ```

use std::collections::BTreeMap;

use typesys_core::lang::languages::{CodeLanguage, SnipPosition};

use crate::database::Registry;
use crate::diagnostics::{Warning, WarningKind};

/// Templates referencing templates deeper than this expand to nothing.
pub const MAX_TEMPLATE_DEPTH: usize = 16;

/// One piece of a code body.
#[derive(Debug, Clone, PartialEq)]
pub enum CodeFragment {
    Text(String),
    Template(TemplateInstance),
}

/// An ordered code body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CodeBuffer {
    fragments: Vec<CodeFragment>,
}

impl CodeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append literal text, merging with a trailing text fragment.
    pub fn add_text(&mut self, text: &str) {
        if let Some(CodeFragment::Text(last)) = self.fragments.last_mut() {
            last.push_str(text);
        } else {
            self.fragments.push(CodeFragment::Text(text.to_string()));
        }
    }

    pub fn add_template(&mut self, instance: TemplateInstance) {
        self.fragments.push(CodeFragment::Template(instance));
    }

    pub fn fragments(&self) -> &[CodeFragment] {
        &self.fragments
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Literal text only, with template references left out.
    pub fn literal_text(&self) -> String {
        self.fragments
            .iter()
            .filter_map(|f| match f {
                CodeFragment::Text(t) => Some(t.as_str()),
                CodeFragment::Template(_) => None,
            })
            .collect()
    }

    /// Render the body, expanding template references through `registry`.
    pub fn render(&self, registry: &dyn Registry) -> String {
        self.render_at(registry, 0)
    }

    fn render_at(&self, registry: &dyn Registry, depth: usize) -> String {
        let mut out = String::new();
        for fragment in &self.fragments {
            match fragment {
                CodeFragment::Text(t) => out.push_str(t),
                CodeFragment::Template(instance) => out.push_str(&instance.expand_at(registry, depth)),
            }
        }
        out
    }
}

/// A named, versioned text template.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateEntry {
    pub name: String,
    pub since: f64,
    pub code: CodeBuffer,
}

impl TemplateEntry {
    pub fn new(name: impl Into<String>, since: f64) -> Self {
        Self {
            name: name.into(),
            since,
            code: CodeBuffer::new(),
        }
    }
}

/// A reference to a template plus `from -> to` replace rules.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateInstance {
    pub name: String,
    pub since: f64,
    /// Applied in declaration order.
    pub replace_rules: Vec<(String, String)>,
}

impl TemplateInstance {
    pub fn new(name: impl Into<String>, since: f64) -> Self {
        Self {
            name: name.into(),
            since,
            replace_rules: Vec::new(),
        }
    }

    pub fn add_replace_rule(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.replace_rules.push((from.into(), to.into()));
    }

    /// Expand against the templates known to `registry`.
    ///
    /// An undefined template reports a warning and expands to the empty string.
    pub fn expand(&self, registry: &dyn Registry) -> String {
        self.expand_at(registry, 0)
    }

    fn expand_at(&self, registry: &dyn Registry, depth: usize) -> String {
        if depth >= MAX_TEMPLATE_DEPTH {
            registry.report_warning(Warning::new(
                WarningKind::TemplateRecursion,
                format!("insert-template '{}' nested more than {MAX_TEMPLATE_DEPTH} levels deep", self.name),
            ));
            return String::new();
        }
        let Some(template) = registry.find_template(&self.name) else {
            registry.report_warning(Warning::new(
                WarningKind::UndefinedTemplate,
                format!("insert-template referring to non-existing template '{}'", self.name),
            ));
            return String::new();
        };

        let mut body = template.code.render_at(registry, depth + 1);
        for (from, to) in &self.replace_rules {
            if !from.is_empty() {
                body = body.replace(from.as_str(), to);
            }
        }
        format!(
            "// TEMPLATE - {name} - START{body}// TEMPLATE - {name} - END",
            name = self.name
        )
    }
}

/// Code injected at a generation point.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeSnip {
    pub language: CodeLanguage,
    pub position: SnipPosition,
    pub since: f64,
    pub code: CodeBuffer,
    /// Argument position (1-based) to the meta name used inside the code.
    pub argument_map: BTreeMap<usize, String>,
}

impl CodeSnip {
    pub fn new(language: CodeLanguage, position: SnipPosition, since: f64) -> Self {
        Self {
            language,
            position,
            since,
            code: CodeBuffer::new(),
            argument_map: BTreeMap::new(),
        }
    }
}

/// Body of a `custom-constructor` or `custom-destructor`.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomFunction {
    pub name: String,
    pub param_name: String,
    pub code: CodeBuffer,
}

impl CustomFunction {
    pub fn new(name: impl Into<String>, param_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            param_name: param_name.into(),
            code: CodeBuffer::new(),
        }
    }
}
