//! Document event stream.
//!
//! [`EventReader`] wraps `quick-xml` and yields a flat sequence of [`DocumentEvent`]s: open tags with
//! their raw attributes, close tags and text runs. Self-closing tags are expanded into an open/close
//! pair so the handler only ever sees balanced events.
//!
//! ## Notes
//! - Comments, processing instructions and the XML declaration are skipped.
//! - CDATA sections are delivered as ordinary text.
//! - Names are delivered as written; case folding is the handler's job.
//!
//! ## Examples
//! ```rust
//! use typesys_syntax::events::{DocumentEvent, EventReader};
//!
//! let mut reader = EventReader::new("<typesystem package='Foo'/>");
//! let first = reader.next_event().unwrap().unwrap();
//! assert!(matches!(first.node, DocumentEvent::Start { ref name, .. } if name == "typesystem"));
//! ```

use std::borrow::Cow;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::diagnostics::SyntaxError;

/// Source location span (byte offsets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// A node with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// One event of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentEvent {
    Start {
        name: String,
        /// Raw `(key, value)` pairs in document order, values unescaped.
        attributes: Vec<(String, String)>,
    },
    End {
        name: String,
    },
    Text(String),
}

/// Pull-based reader over a document held in memory.
pub struct EventReader<'a> {
    reader: Reader<&'a [u8]>,
    open: Vec<String>,
}

impl<'a> EventReader<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut reader = Reader::from_str(source);
        reader.config_mut().expand_empty_elements = true;
        Self {
            reader,
            open: Vec::new(),
        }
    }

    /// Number of currently open elements.
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Read the next event, or `None` at the end of the document.
    ///
    /// ## Errors
    /// - [`SyntaxError::Xml`] for malformed markup (including mismatched close tags).
    /// - [`SyntaxError::UnexpectedEof`] when the document ends with elements still open.
    pub fn next_event(&mut self) -> Result<Option<Spanned<DocumentEvent>>, SyntaxError> {
        loop {
            let start = self.position();
            let event = self.reader.read_event().map_err(|e| SyntaxError::Xml {
                message: e.to_string(),
                offset: self.position(),
            })?;
            let span = Span::new(start, self.position());

            let node = match event {
                Event::Start(e) => {
                    let (name, attributes) = self.open_tag(&e, start)?;
                    self.open.push(name.clone());
                    DocumentEvent::Start { name, attributes }
                }
                Event::End(e) => {
                    let name = decode(e.name().as_ref(), start)?.into_owned();
                    self.open.pop();
                    DocumentEvent::End { name }
                }
                // Only reachable if empty-element expansion is turned off.
                Event::Empty(e) => {
                    let (name, attributes) = self.open_tag(&e, start)?;
                    DocumentEvent::Start { name, attributes }
                }
                Event::Text(t) => {
                    let text = t.unescape().map_err(|e| SyntaxError::Xml {
                        message: e.to_string(),
                        offset: start,
                    })?;
                    DocumentEvent::Text(text.into_owned())
                }
                Event::CData(c) => DocumentEvent::Text(String::from_utf8_lossy(&c.into_inner()).into_owned()),
                Event::Eof => {
                    if let Some(tag) = self.open.last() {
                        return Err(SyntaxError::UnexpectedEof {
                            tag: tag.clone(),
                            offset: start,
                        });
                    }
                    return Ok(None);
                }
                Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => continue,
            };
            return Ok(Some(Spanned::new(node, span)));
        }
    }

    fn open_tag(&self, e: &BytesStart<'_>, offset: usize) -> Result<(String, Vec<(String, String)>), SyntaxError> {
        let name = decode(e.name().as_ref(), offset)?.into_owned();
        let mut attributes = Vec::new();
        for attr in e.attributes() {
            let attr = attr.map_err(|err| SyntaxError::Attribute {
                message: err.to_string(),
                offset,
            })?;
            let key = decode(attr.key.as_ref(), offset)?.into_owned();
            let value = attr.unescape_value().map_err(|err| SyntaxError::Attribute {
                message: err.to_string(),
                offset,
            })?;
            attributes.push((key, value.into_owned()));
        }
        Ok((name, attributes))
    }

    fn position(&self) -> usize {
        self.reader.buffer_position() as usize
    }
}

fn decode(bytes: &[u8], offset: usize) -> Result<Cow<'_, str>, SyntaxError> {
    std::str::from_utf8(bytes)
        .map(Cow::Borrowed)
        .map_err(|e| SyntaxError::Xml {
            message: e.to_string(),
            offset,
        })
}

/// Read every event of `source` (convenience for tests and tooling).
pub fn collect_events(source: &str) -> Result<Vec<Spanned<DocumentEvent>>, SyntaxError> {
    let mut reader = EventReader::new(source);
    let mut out = Vec::new();
    while let Some(event) = reader.next_event()? {
        out.push(event);
    }
    Ok(out)
}
