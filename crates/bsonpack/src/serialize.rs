// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Object graph to binary payload.
//!
//! The write side of [`Reconstructor`](crate::reconstruct::Reconstructor):
//! payloads produced here rebuild to an equal graph under the same settings.

use crate::bson::BsonWriter;
use crate::convert::ConverterRegistry;
use crate::dynamic::{DynamicData, DynamicValue, TypeDescriptor, TypeKind};
use crate::error::{Error, Result};
use crate::reconstruct::{TYPE_PROPERTY, VALUES_PROPERTY};
use crate::settings::{NullValueHandling, SerializerSettings, TypeNameHandling};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Writes [`DynamicValue`] graphs as payloads.
pub struct Serializer<'r> {
    converters: &'r ConverterRegistry,
    settings: SerializerSettings,
    any: Arc<TypeDescriptor>,
}

impl<'r> Serializer<'r> {
    pub fn new(converters: &'r ConverterRegistry, settings: SerializerSettings) -> Self {
        Self {
            converters,
            settings,
            any: Arc::new(TypeDescriptor::object()),
        }
    }

    /// Serialize `value`, declared as `declared`.
    ///
    /// The root must be a struct, map or sequence. A root struct is always
    /// written structurally, even when its type has a converter.
    pub fn serialize(&self, value: &DynamicValue, declared: &Arc<TypeDescriptor>) -> Result<Vec<u8>> {
        let mut w = BsonWriter::new();
        match value {
            DynamicValue::Struct(data) => self.write_object(&mut w, data, declared)?,
            DynamicValue::Sequence(items) => self.write_sequence(&mut w, items, declared)?,
            DynamicValue::Map(entries) => self.write_map(&mut w, entries, declared)?,
            other => {
                return Err(Error::Unrepresentable(format!(
                    "root value must be a struct, map or sequence, got {}",
                    other.kind_name()
                )))
            }
        }
        let payload = w.finish()?;
        log::debug!("serialized {} into {} byte payload", declared.name, payload.len());
        Ok(payload)
    }

    fn write_value(
        &self,
        w: &mut BsonWriter,
        value: &DynamicValue,
        declared: &Arc<TypeDescriptor>,
    ) -> Result<()> {
        match value {
            DynamicValue::Null => w.write_null(),
            DynamicValue::Bool(v) => w.write_bool(*v),
            DynamicValue::U8(v) => w.write_i32(i32::from(*v)),
            DynamicValue::U16(v) => w.write_i32(i32::from(*v)),
            DynamicValue::I8(v) => w.write_i32(i32::from(*v)),
            DynamicValue::I16(v) => w.write_i32(i32::from(*v)),
            DynamicValue::I32(v) => w.write_i32(*v),
            DynamicValue::U32(v) => w.write_i64(i64::from(*v)),
            DynamicValue::I64(v) => w.write_i64(*v),
            DynamicValue::U64(v) => {
                let v = i64::try_from(*v).map_err(|_| {
                    Error::Unrepresentable(format!("integer {v} is outside the 64-bit signed range"))
                })?;
                w.write_i64(v)
            }
            DynamicValue::F32(v) => w.write_f64(f64::from(*v)),
            DynamicValue::F64(v) => w.write_f64(*v),
            DynamicValue::Char(c) => w.write_str(c.encode_utf8(&mut [0u8; 4])),
            DynamicValue::String(s) => w.write_str(s),
            DynamicValue::Bytes(b) => w.write_bytes(b),
            DynamicValue::DateTime(ms) => w.write_datetime(*ms),
            DynamicValue::Enum(v, _) => match i32::try_from(*v) {
                Ok(small) => w.write_i32(small),
                Err(_) => w.write_i64(*v),
            },
            DynamicValue::Struct(data) => match self.converters.for_type(data.descriptor()) {
                Some(kind) => w.write_str(&kind.encode(data)?),
                None => self.write_object(w, data, declared),
            },
            DynamicValue::Sequence(items) => self.write_sequence(w, items, declared),
            DynamicValue::Map(entries) => self.write_map(w, entries, declared),
        }
    }

    fn write_object(
        &self,
        w: &mut BsonWriter,
        data: &DynamicData,
        declared: &TypeDescriptor,
    ) -> Result<()> {
        let runtime = data.descriptor();
        let tagged = match self.settings.type_name_handling {
            TypeNameHandling::Objects | TypeNameHandling::All => true,
            TypeNameHandling::Auto => !runtime.is_same_type(declared),
            TypeNameHandling::None | TypeNameHandling::Arrays => false,
        };

        w.write_start_object()?;
        if tagged {
            w.write_property_name(TYPE_PROPERTY)?;
            w.write_str(&runtime.qualified_name())?;
        }
        for (field, value) in data.fields() {
            if value.is_null() && self.settings.null_value_handling == NullValueHandling::Ignore {
                continue;
            }
            if self.settings.default_value_handling.ignores_defaults()
                && *value == field.resolved_default()
            {
                continue;
            }
            w.write_property_name(&field.name)?;
            self.write_value(w, value, &field.type_desc)?;
        }
        w.write_end_object()
    }

    fn write_sequence(
        &self,
        w: &mut BsonWriter,
        items: &[DynamicValue],
        declared: &Arc<TypeDescriptor>,
    ) -> Result<()> {
        let element = declared
            .element_type()
            .cloned()
            .unwrap_or_else(|| Arc::clone(&self.any));
        let wrapped = match self.settings.type_name_handling {
            TypeNameHandling::Arrays | TypeNameHandling::All => true,
            TypeNameHandling::Auto => declared.is_any(),
            TypeNameHandling::None | TypeNameHandling::Objects => false,
        };

        if wrapped {
            let tag = match declared.kind {
                TypeKind::Sequence(_) => declared.qualified_name(),
                _ => TypeDescriptor::sequence(Arc::clone(&element)).qualified_name(),
            };
            w.write_start_object()?;
            w.write_property_name(TYPE_PROPERTY)?;
            w.write_str(&tag)?;
            w.write_property_name(VALUES_PROPERTY)?;
        }
        w.write_start_array()?;
        for item in items {
            self.write_value(w, item, &element)?;
        }
        w.write_end_array()?;
        if wrapped {
            w.write_end_object()?;
        }
        Ok(())
    }

    fn write_map(
        &self,
        w: &mut BsonWriter,
        entries: &BTreeMap<String, DynamicValue>,
        declared: &TypeDescriptor,
    ) -> Result<()> {
        let value_type = match &declared.kind {
            TypeKind::Map(map) => Arc::clone(&map.value_type),
            _ => Arc::clone(&self.any),
        };
        w.write_start_object()?;
        for (key, value) in entries {
            w.write_property_name(key)?;
            self.write_value(w, value, &value_type)?;
        }
        w.write_end_object()
    }
}
