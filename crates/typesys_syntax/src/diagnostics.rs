//! Syntax-level errors and source location helpers.

use miette::Diagnostic;
use thiserror::Error;

/// Malformed document text.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum SyntaxError {
    #[error("malformed document: {message}")]
    #[diagnostic(code(typesys::syntax::xml))]
    Xml { message: String, offset: usize },

    #[error("malformed attribute: {message}")]
    #[diagnostic(code(typesys::syntax::attribute))]
    Attribute { message: String, offset: usize },

    #[error("document ended before '{tag}' was closed")]
    #[diagnostic(code(typesys::syntax::unclosed))]
    UnexpectedEof { tag: String, offset: usize },
}

impl SyntaxError {
    /// Byte offset of the error in the document.
    pub fn offset(&self) -> usize {
        match self {
            SyntaxError::Xml { offset, .. }
            | SyntaxError::Attribute { offset, .. }
            | SyntaxError::UnexpectedEof { offset, .. } => *offset,
        }
    }
}

/// A signature string the grammar cannot decompose.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum SignatureError {
    #[error("a return type is required for '{signature}'")]
    #[diagnostic(code(typesys::signature::return_type), help("use 'void' for functions without a result"))]
    EmptyReturnType { signature: String },

    #[error("unbalanced '>' at position {position} in '{signature}'")]
    #[diagnostic(code(typesys::signature::brackets))]
    UnbalancedBrackets { signature: String, position: usize },

    #[error("argument list of '{signature}' is not closed")]
    #[diagnostic(code(typesys::signature::unclosed))]
    UnclosedArguments { signature: String },

    #[error("empty type in '{signature}'")]
    #[diagnostic(code(typesys::signature::empty_type))]
    EmptyType { signature: String },
}

/// 1-based line and column of `offset` in `source`, plus the text of that line.
pub fn line_info(source: &str, offset: usize) -> (usize, usize, &str) {
    let offset = offset.min(source.len());
    let mut line_num = 1;
    let mut line_start = 0;

    for (i, c) in source.char_indices() {
        if i >= offset {
            break;
        }
        if c == '\n' {
            line_num += 1;
            line_start = i + 1;
        }
    }

    let line_end = source[line_start..]
        .find('\n')
        .map(|i| line_start + i)
        .unwrap_or(source.len());

    (line_num, offset - line_start + 1, &source[line_start..line_end])
}
