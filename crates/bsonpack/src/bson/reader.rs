// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Pull reader over a borrowed payload.
//!
//! Every length prefix is checked against the enclosing container before it
//! is trusted, so a corrupt payload yields `MalformedPayload` instead of
//! reading out of bounds.

use super::element::{ElementType, Scalar, Token};
use crate::error::{Error, Result};
use byteorder::{ByteOrder, LittleEndian};

/// Containers nested deeper than this are rejected.
pub const MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContainerKind {
    Document,
    Array,
}

#[derive(Debug, Clone, Copy)]
struct Container {
    kind: ContainerKind,
    /// Offset one past the container's terminating NUL.
    end: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    Element,
    Value(ElementType),
    Done,
}

/// Pull tokens from a payload, with one token of look-ahead.
#[derive(Debug)]
pub struct BsonReader<'a> {
    data: &'a [u8],
    pos: usize,
    stack: Vec<Container>,
    state: State,
    peeked: Option<Token<'a>>,
    root_as_array: bool,
}

impl<'a> BsonReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            stack: Vec::new(),
            state: State::Start,
            peeked: None,
            root_as_array: false,
        }
    }

    /// Report the root document as an array, ignoring its keys.
    #[must_use]
    pub fn root_as_array(mut self, enabled: bool) -> Self {
        self.root_as_array = enabled;
        self
    }

    /// Byte offset of the next unread element.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Current nesting depth.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Next token without consuming it.
    pub fn peek(&mut self) -> Result<Option<Token<'a>>> {
        if self.peeked.is_none() {
            self.peeked = self.advance()?;
        }
        Ok(self.peeked)
    }

    /// Consume and return the next token; `None` once the root is closed.
    pub fn next_token(&mut self) -> Result<Option<Token<'a>>> {
        match self.peeked.take() {
            Some(token) => Ok(Some(token)),
            None => self.advance(),
        }
    }

    /// Consume the next value, including every token of a container.
    pub fn skip_value(&mut self) -> Result<()> {
        let mut depth = 0usize;
        loop {
            let token = self.next_token()?.ok_or_else(|| {
                Error::MalformedPayload("payload ended while skipping a value".into())
            })?;
            match token {
                Token::StartObject | Token::StartArray => depth += 1,
                Token::EndObject | Token::EndArray => {
                    depth = depth.checked_sub(1).ok_or_else(|| {
                        Error::MalformedPayload("unexpected end of container".into())
                    })?;
                }
                Token::PropertyName(_) => continue,
                Token::Value(_) => {}
            }
            if depth == 0 {
                return Ok(());
            }
        }
    }

    /// Fail unless the root container was fully consumed and nothing follows.
    pub fn finish(&mut self) -> Result<()> {
        if self.state != State::Done || self.peeked.is_some() {
            return Err(Error::MalformedPayload(
                "payload has unread tokens".into(),
            ));
        }
        if self.pos != self.data.len() {
            return Err(Error::MalformedPayload(format!(
                "{} trailing bytes after the root document",
                self.data.len() - self.pos
            )));
        }
        Ok(())
    }

    fn advance(&mut self) -> Result<Option<Token<'a>>> {
        match self.state {
            State::Done => Ok(None),
            State::Start => {
                let kind = if self.root_as_array {
                    ContainerKind::Array
                } else {
                    ContainerKind::Document
                };
                self.open_container(kind).map(Some)
            }
            State::Value(ty) => {
                self.state = State::Element;
                self.read_value(ty).map(Some)
            }
            State::Element => self.read_element().map(Some),
        }
    }

    fn read_element(&mut self) -> Result<Token<'a>> {
        let container = *self
            .stack
            .last()
            .ok_or_else(|| Error::MalformedPayload("element outside of a container".into()))?;
        let ty = self.take(1)?[0];
        if ty == 0 {
            if self.pos != container.end {
                return Err(Error::MalformedPayload(format!(
                    "container terminator at offset {} but declared end is {}",
                    self.pos - 1,
                    container.end
                )));
            }
            self.stack.pop();
            self.state = if self.stack.is_empty() {
                State::Done
            } else {
                State::Element
            };
            return Ok(match container.kind {
                ContainerKind::Document => Token::EndObject,
                ContainerKind::Array => Token::EndArray,
            });
        }
        let ty = ElementType::from_byte(ty)?;
        let key = self.read_cstr()?;
        match container.kind {
            ContainerKind::Document => {
                self.state = State::Value(ty);
                Ok(Token::PropertyName(key))
            }
            ContainerKind::Array => self.read_value(ty),
        }
    }

    fn read_value(&mut self, ty: ElementType) -> Result<Token<'a>> {
        let scalar = match ty {
            ElementType::Document => return self.open_container(ContainerKind::Document),
            ElementType::Array => return self.open_container(ContainerKind::Array),
            ElementType::Double => Scalar::Double(LittleEndian::read_f64(self.take(8)?)),
            ElementType::String | ElementType::JavaScript | ElementType::Symbol => {
                Scalar::String(self.read_string()?)
            }
            ElementType::Binary => {
                let len = self.read_length()?;
                let subtype = self.take(1)?[0];
                Scalar::Binary {
                    subtype,
                    bytes: self.take(len)?,
                }
            }
            ElementType::Undefined | ElementType::Null => Scalar::Null,
            ElementType::ObjectId => Scalar::ObjectId(self.take(12)?),
            ElementType::Boolean => match self.take(1)?[0] {
                0 => Scalar::Bool(false),
                1 => Scalar::Bool(true),
                other => {
                    return Err(Error::MalformedPayload(format!(
                        "invalid boolean byte 0x{other:02X}"
                    )))
                }
            },
            ElementType::DateTime => Scalar::DateTime(LittleEndian::read_i64(self.take(8)?)),
            ElementType::Int32 => Scalar::Int32(LittleEndian::read_i32(self.take(4)?)),
            ElementType::Int64 => Scalar::Int64(LittleEndian::read_i64(self.take(8)?)),
        };
        Ok(Token::Value(scalar))
    }

    fn open_container(&mut self, kind: ContainerKind) -> Result<Token<'a>> {
        if self.stack.len() >= MAX_DEPTH {
            return Err(Error::MalformedPayload(format!(
                "nesting exceeds {MAX_DEPTH} levels"
            )));
        }
        let start = self.pos;
        let len = self.read_length()?;
        if len < 5 {
            return Err(Error::MalformedPayload(format!(
                "container length {len} is below the minimum of 5"
            )));
        }
        let end = start + len;
        if end > self.limit() {
            return Err(Error::MalformedPayload(format!(
                "container at offset {start} declares {len} bytes, only {} available",
                self.limit() - start
            )));
        }
        self.stack.push(Container { kind, end });
        self.state = State::Element;
        Ok(match kind {
            ContainerKind::Document => Token::StartObject,
            ContainerKind::Array => Token::StartArray,
        })
    }

    /// Readable bytes end at the innermost container's end.
    fn limit(&self) -> usize {
        self.stack.last().map_or(self.data.len(), |c| c.end)
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.limit())
            .ok_or_else(|| {
                Error::MalformedPayload(format!(
                    "need {n} bytes at offset {}, container ends at {}",
                    self.pos,
                    self.limit()
                ))
            })?;
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn read_length(&mut self) -> Result<usize> {
        let raw = LittleEndian::read_i32(self.take(4)?);
        usize::try_from(raw)
            .map_err(|_| Error::MalformedPayload(format!("negative length {raw}")))
    }

    fn read_cstr(&mut self) -> Result<&'a str> {
        let limit = self.limit();
        let rest = &self.data[self.pos..limit];
        let nul = rest
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| Error::MalformedPayload("unterminated key".into()))?;
        let s = utf8(&rest[..nul])?;
        self.pos += nul + 1;
        Ok(s)
    }

    fn read_string(&mut self) -> Result<&'a str> {
        let len = self.read_length()?;
        if len == 0 {
            return Err(Error::MalformedPayload("string length 0".into()));
        }
        let bytes = self.take(len)?;
        if bytes[len - 1] != 0 {
            return Err(Error::MalformedPayload("string is not NUL-terminated".into()));
        }
        utf8(&bytes[..len - 1])
    }
}

fn utf8(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(|e| Error::MalformedPayload(format!("invalid UTF-8: {e}")))
}

/// Key of the root document's first element, if it has one.
pub fn peek_root_key(data: &[u8]) -> Result<Option<&str>> {
    let mut reader = BsonReader::new(data);
    match reader.next_token()? {
        Some(Token::StartObject) => {}
        _ => return Err(Error::MalformedPayload("missing root document".into())),
    }
    match reader.next_token()? {
        Some(Token::PropertyName(key)) => Ok(Some(key)),
        _ => Ok(None),
    }
}
