//! Signature grammar.
//!
//! Signatures are treated as opaque text subjected to a narrow grammar, not compiled:
//!
//! ```text
//! signature := name [ '(' [ argument { ',' argument } ] ')' [ suffix ] ]
//! argument  := '...' | [ 'const' ] type [ '&' ] { '*' } [ parameter-name ] [ '=' default ]
//! ```
//!
//! Commas inside `<...>` and `(...)` do not split arguments. The function is `const` when the text
//! after the closing parenthesis mentions `const`.
//!
//! ## Examples
//! ```rust
//! use typesys_syntax::signature::{parse_function, parse_type};
//!
//! let f = parse_function("value() const", "QList<int>", 4.5).unwrap();
//! assert!(f.is_const);
//! assert_eq!(f.return_type.name, "QList<int>");
//!
//! assert_eq!(parse_type("const char*").unwrap().cpp_signature(), "const char *");
//! ```

use typesys_core::lang::cpp_keywords;

use crate::diagnostics::SignatureError;

/// Literal name of a variadic tail argument.
pub const VARIADIC: &str = "...";

/// Access level of an added function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FunctionAccess {
    #[default]
    Public,
    Protected,
}

/// One type in a signature: an argument or a return type.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TypeDescriptor {
    /// Base type name, or [`VARIADIC`].
    pub name: String,
    pub is_const: bool,
    pub is_reference: bool,
    pub indirections: usize,
    pub default_value: Option<String>,
    pub parameter_name: Option<String>,
}

impl TypeDescriptor {
    pub fn is_variadic(&self) -> bool {
        self.name == VARIADIC
    }

    /// Render the type the way native code spells it, e.g. `const char *` or `const Bar &`.
    pub fn cpp_signature(&self) -> String {
        let mut out = String::new();
        if self.is_const {
            out.push_str("const ");
        }
        out.push_str(&self.name);
        if self.indirections > 0 || self.is_reference {
            out.push(' ');
            out.push_str(&"*".repeat(self.indirections));
            if self.is_reference {
                out.push('&');
            }
        }
        out
    }
}

/// Structured form of a function signature.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDescriptor {
    pub name: String,
    pub return_type: TypeDescriptor,
    pub arguments: Vec<TypeDescriptor>,
    pub is_static: bool,
    pub is_const: bool,
    pub access: FunctionAccess,
    pub since: f64,
}

/// Decompose `signature` and `return_type` into a [`FunctionDescriptor`].
///
/// ## Errors
/// - [`SignatureError::EmptyReturnType`] if `return_type` is blank.
/// - [`SignatureError::UnbalancedBrackets`] if a `>` closes more brackets than were opened.
/// - [`SignatureError::UnclosedArguments`] if the argument list never closes.
#[tracing::instrument(level = "trace", skip_all, fields(signature = %signature))]
pub fn parse_function(signature: &str, return_type: &str, since: f64) -> Result<FunctionDescriptor, SignatureError> {
    if return_type.trim().is_empty() {
        return Err(SignatureError::EmptyReturnType {
            signature: signature.to_string(),
        });
    }
    let return_type = parse_type(return_type)?;
    let signature = signature.trim();

    let Some(open) = signature.find('(') else {
        return Ok(FunctionDescriptor {
            name: signature.to_string(),
            return_type,
            arguments: Vec::new(),
            is_static: false,
            is_const: false,
            access: FunctionAccess::Public,
            since,
        });
    };

    let (pieces, close) = split_arguments(signature, open + 1)?;
    let mut arguments = Vec::new();
    for piece in pieces {
        let piece = piece.trim();
        if piece.is_empty() {
            continue;
        }
        arguments.push(parse_argument(piece, signature)?);
    }
    // `f(void)` declares no arguments.
    if arguments.len() == 1 && is_bare_void(&arguments[0]) {
        arguments.clear();
    }

    Ok(FunctionDescriptor {
        name: signature[..open].trim().to_string(),
        return_type,
        arguments,
        is_static: false,
        is_const: signature[close + 1..].contains("const"),
        access: FunctionAccess::Public,
        since,
    })
}

/// Parse a standalone type such as a return type or a field type.
pub fn parse_type(text: &str) -> Result<TypeDescriptor, SignatureError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(SignatureError::EmptyType {
            signature: text.to_string(),
        });
    }
    check_brackets(text)?;
    parse_argument(text, text)
}

/// Collapse whitespace in a signature, keeping single spaces only between identifier characters.
///
/// ```rust
/// use typesys_syntax::signature::normalized_signature;
///
/// assert_eq!(normalized_signature(" foo( const  char * s , unsigned   int ) "), "foo(const char*s,unsigned int)");
/// ```
pub fn normalized_signature(signature: &str) -> String {
    let mut out = String::with_capacity(signature.len());
    let mut pending_space = false;
    for c in signature.trim().chars() {
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space && is_ident_char(c) && out.chars().last().is_some_and(is_ident_char) {
            out.push(' ');
        }
        pending_space = false;
        out.push(c);
    }
    out
}

// --- scanning ----------------------------------------------------------------

/// Split the argument list starting at byte `from` (just after `(`).
///
/// Returns the raw argument pieces and the byte index of the closing `)`.
fn split_arguments(signature: &str, from: usize) -> Result<(Vec<&str>, usize), SignatureError> {
    let mut angle = 0usize;
    let mut paren = 0usize;
    let mut piece_start = from;
    let mut pieces = Vec::new();

    for (offset, c) in signature[from..].char_indices() {
        let i = from + offset;
        match c {
            '<' => angle += 1,
            '>' => {
                angle = angle.checked_sub(1).ok_or_else(|| SignatureError::UnbalancedBrackets {
                    signature: signature.to_string(),
                    position: i,
                })?;
            }
            '(' => paren += 1,
            ')' if paren > 0 => paren -= 1,
            ')' if angle == 0 => {
                pieces.push(&signature[piece_start..i]);
                return Ok((pieces, i));
            }
            ',' if angle == 0 && paren == 0 => {
                pieces.push(&signature[piece_start..i]);
                piece_start = i + 1;
            }
            _ => {}
        }
    }

    Err(SignatureError::UnclosedArguments {
        signature: signature.to_string(),
    })
}

fn check_brackets(text: &str) -> Result<(), SignatureError> {
    let mut angle = 0usize;
    for (i, c) in text.char_indices() {
        match c {
            '<' => angle += 1,
            '>' => {
                angle = angle.checked_sub(1).ok_or_else(|| SignatureError::UnbalancedBrackets {
                    signature: text.to_string(),
                    position: i,
                })?;
            }
            _ => {}
        }
    }
    Ok(())
}

fn parse_argument(piece: &str, signature: &str) -> Result<TypeDescriptor, SignatureError> {
    if piece == VARIADIC {
        return Ok(TypeDescriptor {
            name: VARIADIC.to_string(),
            ..TypeDescriptor::default()
        });
    }

    let mut descriptor = TypeDescriptor::default();
    let mut text = match split_default(piece) {
        Some((ty, default)) => {
            descriptor.default_value = Some(default.trim().to_string());
            ty.trim()
        }
        None => piece.trim(),
    };

    if let Some(rest) = text.strip_prefix("const ") {
        descriptor.is_const = true;
        text = rest.trim_start();
    }

    let (ty, parameter_name) = split_parameter_name(text);
    descriptor.parameter_name = parameter_name.map(str::to_string);
    let mut ty = ty.trim_end();

    if let Some(rest) = ty.strip_suffix('&') {
        descriptor.is_reference = true;
        ty = rest.trim_end();
    }
    while let Some(rest) = ty.strip_suffix('*') {
        descriptor.indirections += 1;
        ty = rest.trim_end();
    }

    if ty.is_empty() {
        return Err(SignatureError::EmptyType {
            signature: signature.to_string(),
        });
    }
    descriptor.name = ty.split_whitespace().collect::<Vec<_>>().join(" ");
    Ok(descriptor)
}

/// Split `text` at the first top-level `=`.
fn split_default(text: &str) -> Option<(&str, &str)> {
    let mut angle = 0usize;
    for (i, c) in text.char_indices() {
        match c {
            '<' => angle += 1,
            '>' => angle = angle.saturating_sub(1),
            '=' if angle == 0 => return Some((&text[..i], &text[i + 1..])),
            _ => {}
        }
    }
    None
}

/// Detach a trailing parameter name (`Bar &b` -> `Bar &`, `b`).
///
/// A trailing identifier is a name only if something other than `::` separates it from the type
/// and it is not itself part of a fundamental type spelling (`unsigned int`).
fn split_parameter_name(text: &str) -> (&str, Option<&str>) {
    let ident_start = text
        .char_indices()
        .rev()
        .take_while(|(_, c)| is_ident_char(*c))
        .last()
        .map(|(i, _)| i);
    let Some(start) = ident_start else {
        return (text, None);
    };
    let name = &text[start..];
    let head = &text[..start];
    let separated = head.ends_with(|c: char| c.is_whitespace() || c == '*' || c == '&');
    if head.trim().is_empty() || !separated || cpp_keywords::is_type_word(name) {
        return (text, None);
    }
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        return (text, None);
    }
    (head, Some(name))
}

fn is_bare_void(arg: &TypeDescriptor) -> bool {
    arg.name == "void" && arg.indirections == 0 && !arg.is_reference && arg.parameter_name.is_none()
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
