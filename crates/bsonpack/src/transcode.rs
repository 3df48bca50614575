// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Streaming JSON to binary transcoding.
//!
//! Parser events are written straight into a [`BsonWriter`]; no intermediate
//! tree is built. The mapping is type-agnostic: every JSON integer becomes an
//! int64, every fractional number a double, and strings (including compact
//! converter tokens) are copied verbatim.

use crate::bson::BsonWriter;
use crate::error::{Error, Result};
use serde::de::{self, DeserializeSeed, Deserializer, MapAccess, SeqAccess, Unexpected, Visitor};
use std::fmt;
use std::io::Read;

/// Transcode a JSON document read from `reader`.
///
/// The root must be an object or an array. Trailing non-whitespace input is
/// rejected. No partial payload is returned on failure.
pub fn transcode<R: Read>(reader: R) -> Result<Vec<u8>> {
    run(serde_json::Deserializer::from_reader(reader))
}

/// Transcode a JSON document held in memory.
pub fn transcode_slice(input: &[u8]) -> Result<Vec<u8>> {
    run(serde_json::Deserializer::from_slice(input))
}

/// Transcode a JSON document held in a string.
pub fn transcode_str(input: &str) -> Result<Vec<u8>> {
    run(serde_json::Deserializer::from_str(input))
}

fn run<'de, R: serde_json::de::Read<'de>>(mut de: serde_json::Deserializer<R>) -> Result<Vec<u8>> {
    let mut writer = BsonWriter::new();
    ValueSeed {
        writer: &mut writer,
        root: true,
    }
    .deserialize(&mut de)
    .map_err(json_error)?;
    de.end().map_err(json_error)?;
    let payload = writer.finish()?;
    log::debug!("transcoded JSON into {} byte payload", payload.len());
    Ok(payload)
}

fn json_error(e: serde_json::Error) -> Error {
    if e.is_io() {
        return Error::Io(e.into());
    }
    let (line, column) = (e.line(), e.column());
    let full = e.to_string();
    let suffix = format!(" at line {line} column {column}");
    let message = full.strip_suffix(&suffix).unwrap_or(&full).to_string();
    Error::MalformedInput {
        line,
        column,
        message,
    }
}

struct ValueSeed<'w> {
    writer: &'w mut BsonWriter,
    root: bool,
}

impl ValueSeed<'_> {
    fn scalar<E: de::Error>(
        self,
        unexpected: Unexpected<'_>,
        write: impl FnOnce(&mut BsonWriter) -> Result<()>,
    ) -> std::result::Result<(), E> {
        if self.root {
            return Err(E::invalid_type(unexpected, &self));
        }
        write(self.writer).map_err(E::custom)
    }
}

impl<'de> DeserializeSeed<'de> for ValueSeed<'_> {
    type Value = ();

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> std::result::Result<(), D::Error> {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for ValueSeed<'_> {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.root {
            f.write_str("a JSON object or array")
        } else {
            f.write_str("a JSON value")
        }
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<(), E> {
        self.scalar(Unexpected::Bool(v), |w| w.write_bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<(), E> {
        self.scalar(Unexpected::Signed(v), |w| w.write_i64(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<(), E> {
        let signed = i64::try_from(v).map_err(|_| {
            E::custom(format_args!("integer {v} is outside the 64-bit signed range"))
        })?;
        self.scalar(Unexpected::Unsigned(v), |w| w.write_i64(signed))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<(), E> {
        self.scalar(Unexpected::Float(v), |w| w.write_f64(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<(), E> {
        self.scalar(Unexpected::Str(v), |w| w.write_str(v))
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<(), E> {
        self.scalar(Unexpected::Unit, BsonWriter::write_null)
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<(), E> {
        self.visit_unit()
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<(), A::Error> {
        let writer = self.writer;
        writer.write_start_array().map_err(de::Error::custom)?;
        while seq
            .next_element_seed(ValueSeed {
                writer: &mut *writer,
                root: false,
            })?
            .is_some()
        {}
        writer.write_end_array().map_err(de::Error::custom)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<(), A::Error> {
        let writer = self.writer;
        writer.write_start_object().map_err(de::Error::custom)?;
        while map
            .next_key_seed(KeySeed {
                writer: &mut *writer,
            })?
            .is_some()
        {
            map.next_value_seed(ValueSeed {
                writer: &mut *writer,
                root: false,
            })?;
        }
        writer.write_end_object().map_err(de::Error::custom)
    }
}

struct KeySeed<'w> {
    writer: &'w mut BsonWriter,
}

impl<'de> DeserializeSeed<'de> for KeySeed<'_> {
    type Value = ();

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> std::result::Result<(), D::Error> {
        deserializer.deserialize_str(self)
    }
}

impl<'de> Visitor<'de> for KeySeed<'_> {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a property name")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<(), E> {
        self.writer.write_property_name(v).map_err(E::custom)
    }
}
