//! Errors and warnings produced while interpreting typesystem documents.
//!
//! Fatal conditions are [`TypesystemError`] values: the handler stops at the first one and wraps it
//! in [`TypesystemError::Located`] with the document name and position. Non-fatal conditions are
//! [`Warning`] values reported through [`crate::database::Registry::report_warning`].

use std::fmt;

use miette::Diagnostic;
use thiserror::Error;
use typesys_syntax::diagnostics::line_info;
use typesys_syntax::{SignatureError, SyntaxError};

/// A fatal error that aborts the current document and every document that loaded it.
#[derive(Debug, Error, Diagnostic)]
pub enum TypesystemError {
    /// Unknown tag, a tag under an incompatible parent, or a directive used in the wrong context.
    #[error("{0}")]
    #[diagnostic(code(typesys::structural))]
    Structural(String),

    /// Missing required attribute or an unrecognized enumerated value.
    #[error("{0}")]
    #[diagnostic(code(typesys::attribute))]
    Attribute(String),

    /// A file named by `import-file` or `load-typesystem` could not be used.
    #[error("{0}")]
    #[diagnostic(code(typesys::resource))]
    Resource(String),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Signature(#[from] SignatureError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] SyntaxError),

    #[error("cannot read '{path}': {source}")]
    #[diagnostic(code(typesys::io))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The first fatal error of a document, with its position.
    #[error("{file}:{line}:{column}: {error}")]
    #[diagnostic(code(typesys::located))]
    Located {
        file: String,
        line: usize,
        column: usize,
        /// Byte offset of the offending event in the document.
        offset: usize,
        error: Box<TypesystemError>,
    },
}

impl TypesystemError {
    pub fn structural(message: impl Into<String>) -> Self {
        Self::Structural(message.into())
    }

    pub fn attribute(message: impl Into<String>) -> Self {
        Self::Attribute(message.into())
    }

    pub fn resource(message: impl Into<String>) -> Self {
        Self::Resource(message.into())
    }

    /// Attach a document position, unless the error already carries one from a nested document.
    pub fn locate(self, file: &str, source: &str, offset: usize) -> Self {
        if matches!(self, Self::Located { .. }) {
            return self;
        }
        let (line, column, _) = line_info(source, offset);
        Self::Located {
            file: file.to_string(),
            line,
            column,
            offset,
            error: Box::new(self),
        }
    }

    /// The error without its location wrapper.
    pub fn innermost(&self) -> &TypesystemError {
        match self {
            Self::Located { error, .. } => error.innermost(),
            other => other,
        }
    }

    /// Short name of the error category, used as the diagnostic header.
    pub fn category(&self) -> &'static str {
        match self.innermost() {
            Self::Structural(_) => "structural error",
            Self::Attribute(_) => "attribute error",
            Self::Resource(_) | Self::Io { .. } => "resource error",
            Self::Signature(_) => "signature error",
            Self::Syntax(_) => "syntax error",
            Self::Located { .. } => "error",
        }
    }
}

/// What a warning is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningKind {
    UnknownAttribute,
    InvalidBoolean,
    InvalidVersion,
    DuplicateType,
    QualifierMismatch,
    EmptySuppression,
    UndefinedTemplate,
    TemplateRecursion,
    InvalidReferenceCount,
    NullPointerDefault,
    ArgumentMap,
    MissingFile,
}

/// A non-fatal diagnostic; the parse continues with a default or skips the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    pub fn new(kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Format an error with source context as plain text (no colors).
///
/// Errors without a location render as a single line.
pub fn format_error(source: &str, error: &TypesystemError) -> String {
    let TypesystemError::Located {
        file,
        line,
        column,
        offset,
        error: inner,
    } = error
    else {
        return format!("{}: {}\n", error.category(), error);
    };

    let (_, _, line_text) = line_info(source, *offset);
    let width = line.to_string().len();
    let mut out = String::new();
    out.push_str(&format!("{}: {}\n", error.category(), inner));
    out.push_str(&format!("  --> {file}:{line}:{column}\n"));
    out.push_str(&format!("  {:>width$} |\n", ""));
    out.push_str(&format!("  {line:>width$} | {line_text}\n"));
    out.push_str(&format!("  {:>width$} | {}^\n", "", " ".repeat(column.saturating_sub(1))));
    out
}

/// Print an error with source context to stderr.
///
/// `source` must be the text of the document named in the error's location; errors raised inside
/// a nested document carry that document's name and are printed without the source line.
pub fn print_error(file_name: &str, source: &str, error: &TypesystemError) {
    let red = "\x1b[31m";
    let cyan = "\x1b[36m";
    let bold = "\x1b[1m";
    let reset = "\x1b[0m";

    let TypesystemError::Located {
        file,
        line,
        column,
        offset,
        error: inner,
    } = error
    else {
        eprintln!("{bold}{red}{}{reset}{bold}: {error}{reset}", error.category());
        eprintln!("  {cyan}-->{reset} {file_name}");
        return;
    };

    eprintln!("{bold}{red}{}{reset}{bold}: {inner}{reset}", error.category());
    eprintln!("  {cyan}-->{reset} {file}:{line}:{column}");
    if file != file_name {
        eprintln!();
        return;
    }

    let (_, _, line_text) = line_info(source, *offset);
    let width = line.to_string().len();
    eprintln!("  {cyan}{:>width$} |{reset}", "");
    eprintln!("  {cyan}{line:>width$} |{reset} {line_text}");
    eprintln!(
        "  {cyan}{:>width$} |{reset} {}{red}^{reset}",
        "",
        " ".repeat(column.saturating_sub(1))
    );
    eprintln!();
}
