// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Element type bytes and decoded tokens.

use crate::error::{Error, Result};

/// Element type tag preceding every key.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    Double = 0x01,
    String = 0x02,
    Document = 0x03,
    Array = 0x04,
    Binary = 0x05,
    /// Deprecated; read as null.
    Undefined = 0x06,
    ObjectId = 0x07,
    Boolean = 0x08,
    /// Milliseconds since the Unix epoch, UTC.
    DateTime = 0x09,
    Null = 0x0A,
    /// Read as a string.
    JavaScript = 0x0D,
    /// Read as a string.
    Symbol = 0x0E,
    Int32 = 0x10,
    Int64 = 0x12,
}

impl ElementType {
    pub fn from_byte(byte: u8) -> Result<Self> {
        Ok(match byte {
            0x01 => Self::Double,
            0x02 => Self::String,
            0x03 => Self::Document,
            0x04 => Self::Array,
            0x05 => Self::Binary,
            0x06 => Self::Undefined,
            0x07 => Self::ObjectId,
            0x08 => Self::Boolean,
            0x09 => Self::DateTime,
            0x0A => Self::Null,
            0x0D => Self::JavaScript,
            0x0E => Self::Symbol,
            0x10 => Self::Int32,
            0x12 => Self::Int64,
            other => {
                return Err(Error::MalformedPayload(format!(
                    "unsupported element type 0x{other:02X}"
                )))
            }
        })
    }

    pub fn as_byte(self) -> u8 {
        self as u8
    }
}

/// Generic binary subtype.
pub const BINARY_GENERIC: u8 = 0x00;

/// Leaf value decoded from a payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar<'a> {
    Double(f64),
    String(&'a str),
    Binary { subtype: u8, bytes: &'a [u8] },
    ObjectId(&'a [u8]),
    Bool(bool),
    DateTime(i64),
    Null,
    Int32(i32),
    Int64(i64),
}

impl Scalar<'_> {
    /// Short name for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Double(_) => "Float",
            Self::String(_) => "String",
            Self::Binary { .. } | Self::ObjectId(_) => "Bytes",
            Self::Bool(_) => "Boolean",
            Self::DateTime(_) => "Date",
            Self::Null => "Null",
            Self::Int32(_) | Self::Int64(_) => "Integer",
        }
    }
}

/// Pull token produced by [`BsonReader`](super::BsonReader).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token<'a> {
    StartObject,
    EndObject,
    StartArray,
    EndArray,
    PropertyName(&'a str),
    Value(Scalar<'a>),
}

impl Token<'_> {
    /// Short name for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::StartObject => "StartObject",
            Self::EndObject => "EndObject",
            Self::StartArray => "StartArray",
            Self::EndArray => "EndArray",
            Self::PropertyName(_) => "PropertyName",
            Self::Value(scalar) => scalar.kind_name(),
        }
    }
}
