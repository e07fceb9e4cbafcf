//! Streaming XML parsing for sprite packer manifests
//!
//! A manifest is a single root element (any tag) whose direct children each
//! describe one sprite with `name`, `x`, `y`, `width` and `height`
//! attributes. Anything nested deeper than the direct children is skipped.

use crate::atlas::{Atlas, DuplicateName, DuplicatePolicy, SpriteEntry};
use quick_xml::encoding::Decoder;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::borrow::Cow;
use std::fmt::Display;
use std::io::BufRead;
use thiserror::Error;

/// Error type for manifest parsing failures.
///
/// `index` is the 0-based position of the offending element among the root's
/// children.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("malformed XML at byte {position}: {message}")]
    Xml { message: String, position: u64 },
    #[error("document has no root element")]
    NoRoot,
    #[error("document ended before the root element was closed")]
    UnexpectedEof,
    #[error("unexpected content after the root element at byte {position}")]
    TrailingContent { position: u64 },
    #[error("element {index} <{element}>: missing required attribute '{attribute}'")]
    MissingAttribute { index: usize, element: String, attribute: &'static str },
    #[error("element {index} <{element}>: attribute '{attribute}' is not an integer: '{value}'")]
    InvalidInteger { index: usize, element: String, attribute: &'static str, value: String },
    #[error("element {index} <{element}>: attribute 'name' is empty")]
    EmptyName { index: usize, element: String },
    #[error("element {index} <{element}>: {message}")]
    BadAttribute { index: usize, element: String, message: String },
    #[error("element {index}: {source}")]
    DuplicateName { index: usize, source: DuplicateName },
}

impl ParseError {
    /// Index of the child element the error belongs to, when known
    pub fn element_index(&self) -> Option<usize> {
        match self {
            ParseError::MissingAttribute { index, .. }
            | ParseError::InvalidInteger { index, .. }
            | ParseError::EmptyName { index, .. }
            | ParseError::BadAttribute { index, .. }
            | ParseError::DuplicateName { index, .. } => Some(*index),
            _ => None,
        }
    }
}

/// One sprite element read from the manifest
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteElement {
    /// Position among the root's children
    pub index: usize,
    /// Element tag as written in the document
    pub tag: String,
    pub entry: SpriteEntry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    InRoot,
    RootClosed,
    Done,
}

enum Step {
    Yield(Result<SpriteElement, ParseError>),
    RootClosed,
    Skip,
    Fail(ParseError),
}

/// Single-pass iterator over the root element's direct children.
///
/// Stops after the first error.
pub struct SpriteElements<R> {
    reader: Reader<R>,
    buf: Vec<u8>,
    skip_buf: Vec<u8>,
    index: usize,
    state: State,
}

impl<R: BufRead> SpriteElements<R> {
    /// Read up to and including the root element's start tag.
    pub fn new(source: R) -> Result<Self, ParseError> {
        let mut reader = Reader::from_reader(source);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        let state = loop {
            buf.clear();
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(_)) => break State::InRoot,
                Ok(Event::Empty(_)) => break State::RootClosed,
                Ok(Event::Text(_)) | Ok(Event::CData(_)) => {
                    return Err(ParseError::Xml {
                        message: "text before the root element".to_string(),
                        position: reader.buffer_position() as u64,
                    });
                }
                Ok(Event::End(_)) => {
                    return Err(ParseError::Xml {
                        message: "end tag before the root element".to_string(),
                        position: reader.buffer_position() as u64,
                    });
                }
                Ok(Event::Eof) => return Err(ParseError::NoRoot),
                Ok(_) => {}
                Err(e) => return Err(xml_error(&reader, &e)),
            }
        };

        Ok(Self { reader, buf, skip_buf: Vec::new(), index: 0, state })
    }
}

impl<R: BufRead> Iterator for SpriteElements<R> {
    type Item = Result<SpriteElement, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.state {
                State::Done => return None,
                State::RootClosed => {
                    self.state = State::Done;
                    return check_trailing(&mut self.reader, &mut self.buf).err().map(Err);
                }
                State::InRoot => {}
            }

            self.buf.clear();
            let step = match self.reader.read_event_into(&mut self.buf) {
                Ok(Event::Start(e)) => {
                    let item = read_sprite(&e, self.index, self.reader.decoder());
                    self.index += 1;

                    // Grandchildren are not sprites
                    let end = e.to_end().into_owned();
                    self.skip_buf.clear();
                    match self.reader.read_to_end_into(end.name(), &mut self.skip_buf) {
                        Ok(_) => Step::Yield(item),
                        Err(err) => Step::Fail(xml_error(&self.reader, &err)),
                    }
                }
                Ok(Event::Empty(e)) => {
                    let item = read_sprite(&e, self.index, self.reader.decoder());
                    self.index += 1;
                    Step::Yield(item)
                }
                Ok(Event::End(_)) => Step::RootClosed,
                Ok(Event::Eof) => Step::Fail(ParseError::UnexpectedEof),
                Ok(_) => Step::Skip,
                Err(err) => Step::Fail(xml_error(&self.reader, &err)),
            };

            match step {
                Step::Yield(item) => {
                    if item.is_err() {
                        self.state = State::Done;
                    }
                    return Some(item);
                }
                Step::RootClosed => self.state = State::RootClosed,
                Step::Skip => {}
                Step::Fail(err) => {
                    self.state = State::Done;
                    return Some(Err(err));
                }
            }
        }
    }
}

/// Only comments, processing instructions and whitespace may follow the root.
fn check_trailing<R: BufRead>(reader: &mut Reader<R>, buf: &mut Vec<u8>) -> Result<(), ParseError> {
    loop {
        buf.clear();
        match reader.read_event_into(buf) {
            Ok(Event::Eof) => return Ok(()),
            Ok(Event::Comment(_)) | Ok(Event::PI(_)) => {}
            Ok(_) => {
                return Err(ParseError::TrailingContent {
                    position: reader.buffer_position() as u64,
                })
            }
            Err(e) => return Err(xml_error(reader, &e)),
        }
    }
}

fn xml_error<R>(reader: &Reader<R>, err: &impl Display) -> ParseError {
    ParseError::Xml { message: err.to_string(), position: reader.buffer_position() as u64 }
}

/// Attribute-value normalization: a literal tab, CR, LF or CRLF pair becomes
/// one space. Character references such as `&#9;` are expanded later and
/// survive as written. `None` when the value needs no change.
fn normalize_whitespace(raw: &[u8]) -> Option<Vec<u8>> {
    if !raw.iter().any(|b| matches!(b, b'\t' | b'\r' | b'\n')) {
        return None;
    }
    let mut out = Vec::with_capacity(raw.len());
    let mut bytes = raw.iter().copied().peekable();
    while let Some(b) = bytes.next() {
        match b {
            b'\r' => {
                bytes.next_if_eq(&b'\n');
                out.push(b' ');
            }
            b'\t' | b'\n' => out.push(b' '),
            _ => out.push(b),
        }
    }
    Some(out)
}

/// Extract the sprite attributes from one child element.
fn read_sprite(
    element: &BytesStart<'_>,
    index: usize,
    decoder: Decoder,
) -> Result<SpriteElement, ParseError> {
    let tag = String::from_utf8_lossy(element.name().as_ref()).into_owned();
    let bad_attribute = |message: String| ParseError::BadAttribute {
        index,
        element: tag.clone(),
        message,
    };

    let mut name = None;
    let mut x = None;
    let mut y = None;
    let mut width = None;
    let mut height = None;

    for attr in element.attributes() {
        let mut attr = attr.map_err(|e| bad_attribute(e.to_string()))?;
        let slot = match attr.key.as_ref() {
            b"name" => &mut name,
            b"x" => &mut x,
            b"y" => &mut y,
            b"width" => &mut width,
            b"height" => &mut height,
            _ => continue,
        };
        if let Some(normalized) = normalize_whitespace(&attr.value) {
            attr.value = Cow::Owned(normalized);
        }
        let value = attr
            .decode_and_unescape_value(decoder)
            .map_err(|e| bad_attribute(e.to_string()))?;
        *slot = Some(value.into_owned());
    }

    let name = name.ok_or_else(|| ParseError::MissingAttribute {
        index,
        element: tag.clone(),
        attribute: "name",
    })?;
    if name.is_empty() {
        return Err(ParseError::EmptyName { index, element: tag });
    }

    let int = |value: Option<String>, attribute: &'static str| -> Result<i64, ParseError> {
        let value = value.ok_or_else(|| ParseError::MissingAttribute {
            index,
            element: tag.clone(),
            attribute,
        })?;
        value.trim().parse::<i64>().map_err(|_| ParseError::InvalidInteger {
            index,
            element: tag.clone(),
            attribute,
            value,
        })
    };

    let x = int(x, "x")?;
    let y = int(y, "y")?;
    let width = int(width, "width")?;
    let height = int(height, "height")?;

    Ok(SpriteElement { index, tag, entry: SpriteEntry::new(name, x, y, width, height) })
}

/// Parse a complete manifest into an [`Atlas`].
pub fn parse_atlas<R: BufRead>(
    source: R,
    duplicates: DuplicatePolicy,
) -> Result<Atlas, ParseError> {
    let mut atlas = Atlas::new(duplicates);

    for element in SpriteElements::new(source)? {
        let SpriteElement { index, entry, .. } = element?;
        let replaced = atlas
            .insert(entry)
            .map_err(|source| ParseError::DuplicateName { index, source })?;
        if let Some(previous) = replaced {
            log::debug!("element {}: sprite '{}' replaces an earlier entry", index, previous.name);
        }
    }

    Ok(atlas)
}

/// Parse a manifest held in memory.
pub fn parse_str(xml: &str, duplicates: DuplicatePolicy) -> Result<Atlas, ParseError> {
    parse_atlas(xml.as_bytes(), duplicates)
}
