// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Token-driven payload writer.
//!
//! Containers are written with a placeholder length that is patched when the
//! container is closed, so a payload is produced in a single forward pass.

use super::element::{ElementType, BINARY_GENERIC};
use crate::error::{Error, Result};
use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContainerKind {
    Document,
    Array,
}

#[derive(Debug)]
struct Frame {
    kind: ContainerKind,
    start: usize,
    next_index: usize,
    pending_key: Option<String>,
}

/// Streaming writer with explicit start/end tokens.
#[derive(Debug, Default)]
pub struct BsonWriter {
    buffer: Vec<u8>,
    stack: Vec<Frame>,
    root_closed: bool,
}

impl BsonWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes written so far (including unpatched lengths).
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Current nesting depth.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn write_start_object(&mut self) -> Result<()> {
        self.start_container(ContainerKind::Document)
    }

    pub fn write_start_array(&mut self) -> Result<()> {
        self.start_container(ContainerKind::Array)
    }

    pub fn write_end_object(&mut self) -> Result<()> {
        self.end_container(ContainerKind::Document)
    }

    pub fn write_end_array(&mut self) -> Result<()> {
        self.end_container(ContainerKind::Array)
    }

    /// Key of the next value in the current document.
    pub fn write_property_name(&mut self, name: &str) -> Result<()> {
        if name.contains('\0') {
            return Err(Error::Unrepresentable(format!(
                "property name {name:?} contains a NUL byte"
            )));
        }
        let frame = self
            .stack
            .last_mut()
            .ok_or_else(|| Error::Unrepresentable("property name outside of a document".into()))?;
        if frame.kind != ContainerKind::Document {
            return Err(Error::Unrepresentable(
                "property name inside an array".into(),
            ));
        }
        if frame.pending_key.is_some() {
            return Err(Error::Unrepresentable(format!(
                "property name {name:?} follows a property name without a value"
            )));
        }
        frame.pending_key = Some(name.to_string());
        Ok(())
    }

    pub fn write_null(&mut self) -> Result<()> {
        self.element_header(ElementType::Null)
    }

    pub fn write_bool(&mut self, value: bool) -> Result<()> {
        self.element_header(ElementType::Boolean)?;
        self.buffer.write_u8(u8::from(value))?;
        Ok(())
    }

    pub fn write_i32(&mut self, value: i32) -> Result<()> {
        self.element_header(ElementType::Int32)?;
        self.buffer.write_i32::<LittleEndian>(value)?;
        Ok(())
    }

    pub fn write_i64(&mut self, value: i64) -> Result<()> {
        self.element_header(ElementType::Int64)?;
        self.buffer.write_i64::<LittleEndian>(value)?;
        Ok(())
    }

    pub fn write_f64(&mut self, value: f64) -> Result<()> {
        self.element_header(ElementType::Double)?;
        self.buffer.write_f64::<LittleEndian>(value)?;
        Ok(())
    }

    pub fn write_str(&mut self, value: &str) -> Result<()> {
        self.element_header(ElementType::String)?;
        let len = length_prefix(value.len() + 1)?;
        self.buffer.write_i32::<LittleEndian>(len)?;
        self.buffer.extend_from_slice(value.as_bytes());
        self.buffer.push(0);
        Ok(())
    }

    /// Generic (subtype 0) binary.
    pub fn write_bytes(&mut self, value: &[u8]) -> Result<()> {
        self.write_binary(BINARY_GENERIC, value)
    }

    pub fn write_binary(&mut self, subtype: u8, value: &[u8]) -> Result<()> {
        self.element_header(ElementType::Binary)?;
        let len = length_prefix(value.len())?;
        self.buffer.write_i32::<LittleEndian>(len)?;
        self.buffer.push(subtype);
        self.buffer.extend_from_slice(value);
        Ok(())
    }

    /// UTC datetime in milliseconds since the Unix epoch.
    pub fn write_datetime(&mut self, millis: i64) -> Result<()> {
        self.element_header(ElementType::DateTime)?;
        self.buffer.write_i64::<LittleEndian>(millis)?;
        Ok(())
    }

    /// Complete payload; the root container must be closed.
    pub fn finish(self) -> Result<Vec<u8>> {
        if !self.root_closed || !self.stack.is_empty() {
            return Err(Error::Unrepresentable(
                "payload finished before its root container was closed".into(),
            ));
        }
        Ok(self.buffer)
    }

    fn start_container(&mut self, kind: ContainerKind) -> Result<()> {
        if self.stack.is_empty() {
            if self.root_closed {
                return Err(Error::Unrepresentable(
                    "payload already holds a root container".into(),
                ));
            }
        } else {
            let ty = match kind {
                ContainerKind::Document => ElementType::Document,
                ContainerKind::Array => ElementType::Array,
            };
            self.element_header(ty)?;
        }
        let start = self.buffer.len();
        self.buffer.extend_from_slice(&[0; 4]);
        self.stack.push(Frame {
            kind,
            start,
            next_index: 0,
            pending_key: None,
        });
        Ok(())
    }

    fn end_container(&mut self, kind: ContainerKind) -> Result<()> {
        let frame = match self.stack.pop() {
            Some(frame) if frame.kind == kind => frame,
            Some(frame) => {
                return Err(Error::Unrepresentable(format!(
                    "cannot close {kind:?} while {:?} is open",
                    frame.kind
                )))
            }
            None => return Err(Error::Unrepresentable("no open container to close".into())),
        };
        if let Some(key) = frame.pending_key {
            return Err(Error::Unrepresentable(format!(
                "property {key:?} has no value"
            )));
        }
        self.buffer.push(0);
        let len = length_prefix(self.buffer.len() - frame.start)?;
        LittleEndian::write_i32(&mut self.buffer[frame.start..frame.start + 4], len);
        if self.stack.is_empty() {
            self.root_closed = true;
        }
        Ok(())
    }

    fn element_header(&mut self, ty: ElementType) -> Result<()> {
        let frame = self
            .stack
            .last_mut()
            .ok_or_else(|| Error::Unrepresentable("value outside of a container".into()))?;
        let key = match frame.kind {
            ContainerKind::Document => frame
                .pending_key
                .take()
                .ok_or_else(|| Error::Unrepresentable("value without a property name".into()))?,
            ContainerKind::Array => {
                let index = frame.next_index;
                frame.next_index += 1;
                index.to_string()
            }
        };
        self.buffer.push(ty.as_byte());
        self.buffer.extend_from_slice(key.as_bytes());
        self.buffer.push(0);
        Ok(())
    }
}

fn length_prefix(len: usize) -> Result<i32> {
    i32::try_from(len).map_err(|_| {
        Error::Unrepresentable(format!("length {len} exceeds the 32-bit length prefix"))
    })
}
