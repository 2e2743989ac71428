// crates/sedml-rs/src/xml.rs

//! The XML engine boundary.
//!
//! Tree nodes never talk to `quick-xml` directly. They read through an
//! [`XmlInput`] cursor and an [`AttributeSource`], and write through an
//! [`XmlSink`]. [`QuickXmlInput`] and [`QuickXmlSink`] are the default
//! implementations; anything else that honours the traits can be injected.

use crate::diagnostics::ErrorCode;
use crate::error::SedmlError;
use crate::types::NamespaceDecl;
use log::trace;
use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::errors::IllFormedError;
use quick_xml::{Reader, Writer};

// --- Tokens ---

/// One attribute of a start tag, with namespace declarations already removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlAttribute {
    pub prefix: Option<String>,
    pub name: String,
    pub value: String,
}

impl XmlAttribute {
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            prefix: None,
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

/// Read access to the attribute set of a start tag.
pub trait AttributeSource {
    fn attributes(&self) -> &[XmlAttribute];

    /// Value of the unprefixed attribute `name`.
    fn get(&self, name: &str) -> Option<&str> {
        self.attributes()
            .iter()
            .find(|a| a.prefix.is_none() && a.name == name)
            .map(|a| a.value.as_str())
    }

    fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

/// Plain owned attribute list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlAttributes(pub Vec<XmlAttribute>);

impl XmlAttributes {
    pub fn push(&mut self, name: &str, value: &str) {
        self.0.push(XmlAttribute::new(name, value));
    }
}

impl AttributeSource for XmlAttributes {
    fn attributes(&self) -> &[XmlAttribute] {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTag {
    /// Local element name, without prefix.
    pub name: String,
    pub prefix: Option<String>,
    pub attributes: XmlAttributes,
    pub namespaces: Vec<NamespaceDecl>,
    /// `true` for a self-closing tag. No `End` token follows it.
    pub is_empty: bool,
    pub line: u32,
    pub column: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlToken {
    Start(StartTag),
    End { name: String },
    Text(String),
    Eof,
}

/// A well-formedness problem reported by the input cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlIssue {
    pub code: ErrorCode,
    pub message: String,
    pub line: u32,
    pub column: u32,
}

// --- Input Cursor ---

/// A line/column aware, one-token-lookahead XML cursor.
pub trait XmlInput {
    /// The next token, without consuming it.
    fn peek(&mut self) -> &XmlToken;

    fn next_token(&mut self) -> XmlToken;

    /// Consumes the element whose start tag is the next token, verbatim.
    ///
    /// Returns `None` when the next token is not a start tag.
    fn read_raw_element(&mut self) -> Option<String>;

    /// Line of the next token (1-based).
    fn line(&mut self) -> u32;

    /// Column of the next token (1-based).
    fn column(&mut self) -> u32;

    /// Takes the well-formedness error that stopped the cursor, if any.
    fn take_issue(&mut self) -> Option<XmlIssue>;

    /// Consumes the element whose start tag is the next token, with all its content.
    fn skip_element(&mut self) {
        let XmlToken::Start(tag) = self.next_token() else {
            return;
        };
        if tag.is_empty {
            return;
        }
        let mut depth = 1usize;
        loop {
            match self.next_token() {
                XmlToken::Start(inner) if !inner.is_empty => depth += 1,
                XmlToken::End { .. } => {
                    depth -= 1;
                    if depth == 0 {
                        return;
                    }
                }
                XmlToken::Eof => return,
                _ => {}
            }
        }
    }

    /// Collects the text content up to the end of the current element and consumes the end tag.
    fn read_text_content(&mut self) -> String {
        let mut text = String::new();
        loop {
            match self.peek() {
                XmlToken::Text(_) => {
                    if let XmlToken::Text(t) = self.next_token() {
                        text.push_str(&t);
                    }
                }
                XmlToken::Start(_) => self.skip_element(),
                XmlToken::End { .. } => {
                    self.next_token();
                    return text;
                }
                XmlToken::Eof => return text,
            }
        }
    }
}

/// [`XmlInput`] over an in-memory string, backed by `quick_xml::Reader`.
pub struct QuickXmlInput<'a> {
    source: &'a str,
    reader: Reader<&'a [u8]>,
    peeked: Option<(XmlToken, usize)>,
    depth: usize,
    finished: bool,
    issue: Option<XmlIssue>,
    // (byte offset, line, column) of the last position lookup.
    cursor: (usize, u32, u32),
}

impl<'a> QuickXmlInput<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut reader = Reader::from_str(source);
        reader.config_mut().trim_text(false);
        Self {
            source,
            reader,
            peeked: None,
            depth: 0,
            finished: false,
            issue: None,
            cursor: (0, 1, 1),
        }
    }

    fn offset(&self) -> usize {
        usize::try_from(self.reader.buffer_position()).unwrap_or(self.source.len())
    }

    /// Moves `offset` back onto the `<` that opens the tag read from it.
    fn tag_start(&self, offset: usize) -> usize {
        let bytes = self.source.as_bytes();
        if offset < bytes.len() && bytes[offset] == b'<' {
            return offset;
        }
        let upto = offset.min(bytes.len());
        match self.source[..upto].rfind('<') {
            Some(pos) if !self.source[pos..upto].contains('>') => pos,
            _ => self.source[upto..].find('<').map_or(upto, |p| upto + p),
        }
    }

    fn position_of(&mut self, offset: usize) -> (u32, u32) {
        let (mut at, mut line, mut column) = self.cursor;
        if offset < at {
            (at, line, column) = (0, 1, 1);
        }
        let end = offset.min(self.source.len());
        for &b in &self.source.as_bytes()[at..end] {
            if b == b'\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        self.cursor = (end, line, column);
        (line, column)
    }

    fn fail(&mut self, err: quick_xml::Error) -> (XmlToken, usize) {
        let code = match &err {
            quick_xml::Error::IllFormed(IllFormedError::MismatchedEndTag { .. }) => {
                ErrorCode::XmlTagMismatch
            }
            quick_xml::Error::InvalidAttr(AttrError::Duplicated(..)) => {
                ErrorCode::DuplicateXmlAttribute
            }
            quick_xml::Error::Escape(_) => ErrorCode::UndefinedXmlEntity,
            _ => ErrorCode::BadlyFormedXml,
        };
        let at = usize::try_from(self.reader.error_position()).unwrap_or(self.source.len());
        let (line, column) = self.position_of(at);
        self.issue = Some(XmlIssue {
            code,
            message: err.to_string(),
            line,
            column,
        });
        self.finished = true;
        (XmlToken::Eof, self.source.len())
    }

    fn start_tag(
        &mut self,
        e: &BytesStart<'_>,
        is_empty: bool,
        offset: usize,
    ) -> Result<StartTag, quick_xml::Error> {
        let qname = e.name();
        let name = lossy(qname.local_name().as_ref());
        let prefix = qname.prefix().map(|p| lossy(p.as_ref()));

        let mut attributes = XmlAttributes::default();
        let mut namespaces = Vec::new();
        for attr in e.attributes() {
            let attr = attr?;
            let value = attr.unescape_value()?.into_owned();
            let key = attr.key;
            let local = lossy(key.local_name().as_ref());
            let key_prefix = key.prefix().map(|p| lossy(p.as_ref()));
            match key_prefix.as_deref() {
                None if local == "xmlns" => namespaces.push(NamespaceDecl { prefix: None, uri: value }),
                Some("xmlns") => namespaces.push(NamespaceDecl {
                    prefix: Some(local),
                    uri: value,
                }),
                _ => attributes.0.push(XmlAttribute {
                    prefix: key_prefix,
                    name: local,
                    value,
                }),
            }
        }

        let (line, column) = self.position_of(offset);
        Ok(StartTag {
            name,
            prefix,
            attributes,
            namespaces,
            is_empty,
            line,
            column,
        })
    }

    fn read_token(&mut self) -> (XmlToken, usize) {
        loop {
            if self.finished {
                return (XmlToken::Eof, self.source.len());
            }
            let raw_offset = self.offset();
            match self.reader.read_event() {
                Ok(Event::Start(e)) => {
                    let offset = self.tag_start(raw_offset);
                    self.depth += 1;
                    return match self.start_tag(&e, false, offset) {
                        Ok(tag) => (XmlToken::Start(tag), offset),
                        Err(err) => self.fail(err),
                    };
                }
                Ok(Event::Empty(e)) => {
                    let offset = self.tag_start(raw_offset);
                    return match self.start_tag(&e, true, offset) {
                        Ok(tag) => (XmlToken::Start(tag), offset),
                        Err(err) => self.fail(err),
                    };
                }
                Ok(Event::End(e)) => {
                    self.depth = self.depth.saturating_sub(1);
                    let name = lossy(e.name().local_name().as_ref());
                    return (XmlToken::End { name }, self.tag_start(raw_offset));
                }
                Ok(Event::Text(e)) => match e.unescape() {
                    Ok(text) if text.trim().is_empty() => continue,
                    Ok(text) => return (XmlToken::Text(text.into_owned()), raw_offset),
                    Err(err) => return self.fail(err),
                },
                Ok(Event::CData(e)) => {
                    return (XmlToken::Text(lossy(&e.into_inner())), raw_offset);
                }
                Ok(Event::Eof) => {
                    self.finished = true;
                    if self.depth > 0 {
                        let (line, column) = self.position_of(self.source.len());
                        self.issue = Some(XmlIssue {
                            code: ErrorCode::XmlUnexpectedEof,
                            message: format!("{} element(s) left open", self.depth),
                            line,
                            column,
                        });
                    }
                    return (XmlToken::Eof, self.source.len());
                }
                // Declarations, comments, processing instructions, doctype.
                Ok(_) => continue,
                Err(err) => return self.fail(err),
            }
        }
    }

    fn fill(&mut self) {
        if self.peeked.is_none() {
            let token = self.read_token();
            self.peeked = Some(token);
        }
    }

    fn peeked_offset(&mut self) -> usize {
        self.fill();
        self.peeked.as_ref().map_or(self.source.len(), |(_, offset)| *offset)
    }
}

impl XmlInput for QuickXmlInput<'_> {
    fn peek(&mut self) -> &XmlToken {
        self.fill();
        match &self.peeked {
            Some((token, _)) => token,
            None => &XmlToken::Eof,
        }
    }

    fn next_token(&mut self) -> XmlToken {
        self.fill();
        let token = self.peeked.take().map_or(XmlToken::Eof, |(token, _)| token);
        trace!("xml token: {:?}", token);
        token
    }

    fn read_raw_element(&mut self) -> Option<String> {
        let start = self.peeked_offset();
        let is_empty = match self.peek() {
            XmlToken::Start(tag) => tag.is_empty,
            _ => return None,
        };
        self.next_token();
        if !is_empty {
            let mut depth = 1usize;
            while depth > 0 {
                match self.next_token() {
                    XmlToken::Start(tag) if !tag.is_empty => depth += 1,
                    XmlToken::End { .. } => depth -= 1,
                    XmlToken::Eof => return None,
                    _ => {}
                }
            }
        }
        let end = self.offset().min(self.source.len());
        self.source.get(start..end).map(str::to_string)
    }

    fn line(&mut self) -> u32 {
        let offset = self.peeked_offset();
        self.position_of(offset).0
    }

    fn column(&mut self) -> u32 {
        let offset = self.peeked_offset();
        self.position_of(offset).1
    }

    fn take_issue(&mut self) -> Option<XmlIssue> {
        self.issue.take()
    }
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

// --- Output Sink ---

/// Streaming XML writer capability used by every node's write path.
pub trait XmlSink {
    fn start_element(&mut self, name: &str) -> Result<(), SedmlError>;

    /// Declares a namespace on the element most recently started.
    fn write_namespace(&mut self, prefix: Option<&str>, uri: &str) -> Result<(), SedmlError> {
        match prefix {
            Some(prefix) => self.write_attribute(&format!("xmlns:{}", prefix), uri),
            None => self.write_attribute("xmlns", uri),
        }
    }

    /// Adds an attribute to the element most recently started.
    ///
    /// Fails once content has been written to that element.
    fn write_attribute(&mut self, name: &str, value: &str) -> Result<(), SedmlError>;

    /// Writes escaped character data.
    fn write_text(&mut self, text: &str) -> Result<(), SedmlError>;

    /// Writes an already serialized XML fragment unchanged.
    fn write_raw(&mut self, fragment: &str) -> Result<(), SedmlError>;

    fn end_element(&mut self, name: &str) -> Result<(), SedmlError>;
}

/// [`XmlSink`] writing into an in-memory buffer through `quick_xml::Writer`.
///
/// A started element is held back until its first content arrives, so that
/// childless elements come out self-closing.
pub struct QuickXmlSink {
    writer: Writer<Vec<u8>>,
    pending: Option<BytesStart<'static>>,
}

impl QuickXmlSink {
    /// `indent` is the number of spaces per nesting level; 0 writes everything on one line.
    pub fn new(indent: usize) -> Self {
        let writer = if indent == 0 {
            Writer::new(Vec::new())
        } else {
            Writer::new_with_indent(Vec::new(), b' ', indent)
        };
        Self {
            writer,
            pending: None,
        }
    }

    pub fn write_declaration(&mut self) -> Result<(), SedmlError> {
        self.writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        Ok(())
    }

    fn flush_pending(&mut self) -> Result<(), SedmlError> {
        if let Some(start) = self.pending.take() {
            self.writer.write_event(Event::Start(start))?;
        }
        Ok(())
    }

    pub fn into_string(mut self) -> Result<String, SedmlError> {
        self.flush_pending()?;
        let mut bytes = self.writer.into_inner();
        bytes.push(b'\n');
        Ok(String::from_utf8(bytes)?)
    }
}

impl XmlSink for QuickXmlSink {
    fn start_element(&mut self, name: &str) -> Result<(), SedmlError> {
        self.flush_pending()?;
        self.pending = Some(BytesStart::new(name.to_string()));
        Ok(())
    }

    fn write_attribute(&mut self, name: &str, value: &str) -> Result<(), SedmlError> {
        match self.pending.as_mut() {
            Some(start) => {
                start.push_attribute((name, value));
                Ok(())
            }
            None => Err(SedmlError::InvalidXmlOperation(
                "attribute written after element content",
            )),
        }
    }

    fn write_text(&mut self, text: &str) -> Result<(), SedmlError> {
        self.flush_pending()?;
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        Ok(())
    }

    fn write_raw(&mut self, fragment: &str) -> Result<(), SedmlError> {
        self.flush_pending()?;
        self.writer.write_indent()?;
        self.writer.get_mut().extend_from_slice(fragment.trim().as_bytes());
        Ok(())
    }

    fn end_element(&mut self, name: &str) -> Result<(), SedmlError> {
        match self.pending.take() {
            Some(start) => self.writer.write_event(Event::Empty(start))?,
            None => self.writer.write_event(Event::End(BytesEnd::new(name)))?,
        }
        Ok(())
    }
}
