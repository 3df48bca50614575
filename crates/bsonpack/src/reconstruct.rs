// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Reflective reconstruction of object graphs from binary payloads.
//!
//! The target type comes from a type name resolved through a
//! [`TypeRegistry`]; individual nodes may override it with a `$type` tag
//! (first property of an object) when tag handling is enabled. A tagged
//! collection carries its elements in a `$values` property.
//!
//! # Policies
//!
//! | policy                         | effect on read                                  |
//! |--------------------------------|-------------------------------------------------|
//! | `TypeNameHandling::None`       | tags are skipped, declared types win            |
//! | any other `TypeNameHandling`   | tags are resolved and must be assignable        |
//! | `NullValueHandling::Ignore`    | explicit nulls leave the member zero-initialised|
//! | `NullValueHandling::Include`   | explicit nulls are assigned                     |
//! | `DefaultValueHandling::Ignore` | values equal to the default are not assigned    |
//! | `DefaultValueHandling::Populate` | absent members receive their default          |

use crate::bson::{peek_root_key, BsonReader, Scalar, Token};
use crate::convert::ConverterRegistry;
use crate::diagnostics;
use crate::dynamic::{
    DynamicData, DynamicValue, EnumDescriptor, PrimitiveKind, TypeDescriptor, TypeKind,
    TypeRegistry,
};
use crate::error::{Error, Result};
use crate::settings::{NullValueHandling, SerializerSettings};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

/// Property naming the concrete type of an object.
pub const TYPE_PROPERTY: &str = "$type";

/// Property holding the elements of a tagged collection.
pub const VALUES_PROPERTY: &str = "$values";

/// Rebuild `payload` as `type_name`.
pub fn reconstruct(
    payload: &[u8],
    type_name: &str,
    settings: SerializerSettings,
    types: &dyn TypeRegistry,
    converters: &ConverterRegistry,
) -> Result<DynamicValue> {
    Reconstructor::new(types, converters, settings).reconstruct(payload, type_name)
}

/// Reusable reconstruction context. Holds no per-payload state.
pub struct Reconstructor<'r> {
    types: &'r dyn TypeRegistry,
    converters: &'r ConverterRegistry,
    settings: SerializerSettings,
    any: Arc<TypeDescriptor>,
}

impl<'r> Reconstructor<'r> {
    pub fn new(
        types: &'r dyn TypeRegistry,
        converters: &'r ConverterRegistry,
        settings: SerializerSettings,
    ) -> Self {
        Self {
            types,
            converters,
            settings,
            any: Arc::new(TypeDescriptor::object()),
        }
    }

    pub fn settings(&self) -> SerializerSettings {
        self.settings
    }

    /// Resolve `type_name`, then rebuild `payload` as that type.
    pub fn reconstruct(&self, payload: &[u8], type_name: &str) -> Result<DynamicValue> {
        let target = self.types.resolve(type_name)?;
        self.reconstruct_as(payload, &target)
    }

    /// Like [`reconstruct`](Self::reconstruct), enriching type resolution
    /// failures with the contents of `module_hint`.
    pub fn reconstruct_with_hint(
        &self,
        payload: &[u8],
        type_name: &str,
        module_hint: Option<&str>,
    ) -> Result<DynamicValue> {
        self.reconstruct(payload, type_name)
            .map_err(|e| diagnostics::enrich(e, module_hint, self.types))
    }

    /// Rebuild `payload` as an already resolved type.
    pub fn reconstruct_as(
        &self,
        payload: &[u8],
        target: &Arc<TypeDescriptor>,
    ) -> Result<DynamicValue> {
        let root_as_array = matches!(target.kind, TypeKind::Sequence(_))
            && peek_root_key(payload)? != Some(TYPE_PROPERTY);
        let mut reader = BsonReader::new(payload).root_as_array(root_as_array);
        let mut path = FieldPath::default();
        let value = self.read_value(&mut reader, target, &mut path)?;
        if let Some(token) = reader.next_token()? {
            return Err(Error::MalformedPayload(format!(
                "unexpected {} after the root value",
                token.kind_name()
            )));
        }
        reader.finish()?;
        log::debug!(
            "reconstructed {} from {} byte payload",
            target.name,
            payload.len()
        );
        Ok(value)
    }

    fn read_value(
        &self,
        reader: &mut BsonReader<'_>,
        declared: &Arc<TypeDescriptor>,
        path: &mut FieldPath,
    ) -> Result<DynamicValue> {
        match reader.next_token()? {
            Some(Token::Value(Scalar::Null)) => Ok(DynamicValue::Null),
            Some(Token::Value(scalar)) => self.read_scalar(scalar, declared, path),
            Some(Token::StartObject) => self.read_object(reader, declared, path),
            Some(Token::StartArray) => self.read_array(reader, declared, path),
            Some(token) => Err(path.error(format!(
                "Unexpected token {} when reading {}.",
                token.kind_name(),
                declared.name
            ))),
            None => Err(path.error("Unexpected end of payload.")),
        }
    }

    fn read_scalar(
        &self,
        scalar: Scalar<'_>,
        declared: &Arc<TypeDescriptor>,
        path: &FieldPath,
    ) -> Result<DynamicValue> {
        match &declared.kind {
            TypeKind::Primitive(kind) => coerce_primitive(scalar, *kind, path),
            TypeKind::Enum(e) => coerce_enum(scalar, e, &declared.name, path),
            TypeKind::Any => Ok(natural_value(scalar)),
            TypeKind::Struct(_) => match (self.converters.for_type(declared), scalar) {
                (Some(kind), Scalar::String(token)) => {
                    Ok(DynamicValue::Struct(kind.decode(token, declared)?))
                }
                _ => Err(conversion_error(scalar, &declared.name, path)),
            },
            TypeKind::Sequence(_) | TypeKind::Map(_) => {
                Err(conversion_error(scalar, &declared.name, path))
            }
        }
    }

    fn read_object(
        &self,
        reader: &mut BsonReader<'_>,
        declared: &Arc<TypeDescriptor>,
        path: &mut FieldPath,
    ) -> Result<DynamicValue> {
        let concrete = match reader.peek()? {
            Some(Token::PropertyName(TYPE_PROPERTY)) => {
                reader.next_token()?;
                let tag = match reader.next_token()? {
                    Some(Token::Value(Scalar::String(tag))) => tag,
                    _ => return Err(path.error("Type name property must hold a string.")),
                };
                self.resolve_tag(tag, declared, path)?
            }
            _ => Arc::clone(declared),
        };

        match &concrete.kind {
            TypeKind::Struct(_) => {
                if concrete.is_abstract {
                    return Err(path.error(format!(
                        "Could not create an instance of type {}. Type is abstract and cannot be instantiated.",
                        concrete.name
                    )));
                }
                self.read_struct(reader, &concrete, path)
            }
            TypeKind::Sequence(_) => self.read_wrapped_sequence(reader, &concrete, path),
            TypeKind::Map(map) => {
                let value_type = Arc::clone(&map.value_type);
                self.read_map(reader, &value_type, path)
            }
            TypeKind::Any => {
                let any = Arc::clone(&self.any);
                self.read_map(reader, &any, path)
            }
            TypeKind::Primitive(_) | TypeKind::Enum(_) => Err(path.error(format!(
                "Cannot deserialize an object into type '{}'.",
                concrete.name
            ))),
        }
    }

    fn resolve_tag(
        &self,
        tag: &str,
        declared: &Arc<TypeDescriptor>,
        path: &FieldPath,
    ) -> Result<Arc<TypeDescriptor>> {
        if !self.settings.type_name_handling.reads_tags() {
            log::trace!("ignoring type tag {tag} at '{path}'");
            return Ok(Arc::clone(declared));
        }
        let actual = self.types.resolve(tag)?;
        if !actual.is_assignable_to(declared) {
            return Err(path.error(format!(
                "Type specified in payload '{}' is not compatible with '{}'.",
                actual.qualified_name(),
                declared.qualified_name()
            )));
        }
        log::trace!("type tag {tag} selects {} at '{path}'", actual.name);
        Ok(actual)
    }

    fn read_struct(
        &self,
        reader: &mut BsonReader<'_>,
        desc: &Arc<TypeDescriptor>,
        path: &mut FieldPath,
    ) -> Result<DynamicValue> {
        let mut data = DynamicData::new(desc);
        let mut present = BTreeSet::new();

        loop {
            let name = match reader.next_token()? {
                Some(Token::EndObject) => break,
                Some(Token::PropertyName(name)) => name,
                other => return Err(unexpected(other, desc, path)),
            };
            let Some(field) = desc.find_field(name) else {
                log::debug!("skipping unknown member '{name}' of {}", desc.name);
                reader.skip_value()?;
                continue;
            };
            present.insert(field.name.as_str());
            path.push_field(&field.name);

            if let Some(Token::Value(Scalar::Null)) = reader.peek()? {
                reader.next_token()?;
                if self.settings.null_value_handling == NullValueHandling::Include {
                    if !field.is_nullable() {
                        return Err(conversion_error(Scalar::Null, &field.type_desc.name, path));
                    }
                    data.set_field(&field.name, DynamicValue::Null)?;
                }
            } else {
                let value = self.read_value(reader, &field.type_desc, path)?;
                let skip = self.settings.default_value_handling.ignores_defaults()
                    && value == field.resolved_default();
                if !skip {
                    data.set_field(&field.name, value)?;
                }
            }
            path.pop();
        }

        if self.settings.default_value_handling.populates_defaults() {
            for field in desc.fields().unwrap_or(&[]) {
                if !present.contains(field.name.as_str()) {
                    data.set_field(&field.name, field.resolved_default())?;
                }
            }
        }
        Ok(DynamicValue::Struct(data))
    }

    fn read_wrapped_sequence(
        &self,
        reader: &mut BsonReader<'_>,
        desc: &Arc<TypeDescriptor>,
        path: &mut FieldPath,
    ) -> Result<DynamicValue> {
        match reader.next_token()? {
            Some(Token::PropertyName(VALUES_PROPERTY)) => {}
            other => {
                return Err(path.error(format!(
                    "Expected a {VALUES_PROPERTY} property for collection {}, found {}.",
                    desc.name,
                    describe_token(other)
                )))
            }
        }
        let values = match reader.next_token()? {
            Some(Token::StartArray) => self.read_array(reader, desc, path)?,
            other => {
                return Err(path.error(format!(
                    "Expected an array of values for {}, found {}.",
                    desc.name,
                    describe_token(other)
                )))
            }
        };
        match reader.next_token()? {
            Some(Token::EndObject) => Ok(values),
            other => Err(unexpected(other, desc, path)),
        }
    }

    fn read_array(
        &self,
        reader: &mut BsonReader<'_>,
        declared: &Arc<TypeDescriptor>,
        path: &mut FieldPath,
    ) -> Result<DynamicValue> {
        let element = match &declared.kind {
            TypeKind::Sequence(seq) => Arc::clone(&seq.element_type),
            TypeKind::Any => Arc::clone(&self.any),
            _ => {
                return Err(path.error(format!(
                    "Cannot deserialize an array into type '{}'.",
                    declared.name
                )))
            }
        };
        let mut items = Vec::new();
        loop {
            if let Some(Token::EndArray) = reader.peek()? {
                reader.next_token()?;
                return Ok(DynamicValue::Sequence(items));
            }
            path.push_index(items.len());
            let item = self.read_value(reader, &element, path)?;
            if item.is_null() && !element.is_nullable() {
                return Err(conversion_error(Scalar::Null, &element.name, path));
            }
            path.pop();
            items.push(item);
        }
    }

    fn read_map(
        &self,
        reader: &mut BsonReader<'_>,
        value_type: &Arc<TypeDescriptor>,
        path: &mut FieldPath,
    ) -> Result<DynamicValue> {
        let mut entries = BTreeMap::new();
        loop {
            let key = match reader.next_token()? {
                Some(Token::EndObject) => return Ok(DynamicValue::Map(entries)),
                Some(Token::PropertyName(key)) => key,
                other => return Err(unexpected(other, value_type, path)),
            };
            path.push_field(key);
            let value = self.read_value(reader, value_type, path)?;
            if value.is_null() && !value_type.is_nullable() {
                return Err(conversion_error(Scalar::Null, &value_type.name, path));
            }
            path.pop();
            entries.insert(key.to_string(), value);
        }
    }
}

/// Location of the node being reconstructed, rendered as `a.b[2]`.
#[derive(Debug, Default)]
struct FieldPath {
    segments: Vec<Segment>,
}

#[derive(Debug)]
enum Segment {
    Field(String),
    Index(usize),
}

impl FieldPath {
    fn push_field(&mut self, name: &str) {
        self.segments.push(Segment::Field(name.to_string()));
    }

    fn push_index(&mut self, index: usize) {
        self.segments.push(Segment::Index(index));
    }

    fn pop(&mut self) {
        self.segments.pop();
    }

    fn error(&self, message: impl Into<String>) -> Error {
        Error::reconstruct(&self.to_string(), message)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Field(name) if i == 0 => f.write_str(name)?,
                Segment::Field(name) => write!(f, ".{name}")?,
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

fn describe_token(token: Option<Token<'_>>) -> String {
    match token {
        Some(Token::PropertyName(name)) => format!("property '{name}'"),
        Some(token) => token.kind_name().to_string(),
        None => "end of payload".to_string(),
    }
}

fn unexpected(token: Option<Token<'_>>, desc: &TypeDescriptor, path: &FieldPath) -> Error {
    path.error(format!(
        "Unexpected {} when reading {}.",
        describe_token(token),
        desc.name
    ))
}

fn describe_scalar(scalar: Scalar<'_>) -> String {
    match scalar {
        Scalar::Null => "{null}".to_string(),
        Scalar::String(s) => format!("\"{s}\""),
        Scalar::Double(v) => v.to_string(),
        Scalar::Int32(v) => v.to_string(),
        Scalar::Int64(v) | Scalar::DateTime(v) => v.to_string(),
        Scalar::Bool(v) => v.to_string(),
        Scalar::Binary { bytes, .. } | Scalar::ObjectId(bytes) => {
            format!("<{} bytes>", bytes.len())
        }
    }
}

fn conversion_error(scalar: Scalar<'_>, type_name: &str, path: &FieldPath) -> Error {
    path.error(format!(
        "Error converting value {} to type '{type_name}'.",
        describe_scalar(scalar)
    ))
}

/// Value of a scalar when no type is declared.
fn natural_value(scalar: Scalar<'_>) -> DynamicValue {
    match scalar {
        Scalar::Double(v) => DynamicValue::F64(v),
        Scalar::String(s) => DynamicValue::String(s.to_string()),
        Scalar::Binary { bytes, .. } | Scalar::ObjectId(bytes) => DynamicValue::Bytes(bytes.to_vec()),
        Scalar::Bool(v) => DynamicValue::Bool(v),
        Scalar::DateTime(v) => DynamicValue::DateTime(v),
        Scalar::Null => DynamicValue::Null,
        Scalar::Int32(v) => DynamicValue::I32(v),
        Scalar::Int64(v) => DynamicValue::I64(v),
    }
}

/// Integer value of a scalar; doubles qualify only when integral.
fn integral(scalar: Scalar<'_>) -> Option<i64> {
    match scalar {
        Scalar::Int32(v) => Some(i64::from(v)),
        Scalar::Int64(v) => Some(v),
        Scalar::Double(v) if v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 => {
            Some(v as i64)
        }
        _ => None,
    }
}

fn int_as<T: TryFrom<i64>>(scalar: Scalar<'_>) -> Option<T> {
    integral(scalar).and_then(|v| T::try_from(v).ok())
}

fn float(scalar: Scalar<'_>) -> Option<f64> {
    match scalar {
        Scalar::Double(v) => Some(v),
        Scalar::Int32(v) => Some(f64::from(v)),
        Scalar::Int64(v) => Some(v as f64),
        _ => None,
    }
}

// @audit-ok: Simple pattern matching (one arm per primitive)
fn coerce_primitive(
    scalar: Scalar<'_>,
    kind: PrimitiveKind,
    path: &FieldPath,
) -> Result<DynamicValue> {
    let value = match kind {
        PrimitiveKind::Bool => match scalar {
            Scalar::Bool(v) => Some(DynamicValue::Bool(v)),
            _ => None,
        },
        PrimitiveKind::U8 => int_as(scalar).map(DynamicValue::U8),
        PrimitiveKind::U16 => int_as(scalar).map(DynamicValue::U16),
        PrimitiveKind::U32 => int_as(scalar).map(DynamicValue::U32),
        PrimitiveKind::U64 => int_as(scalar).map(DynamicValue::U64),
        PrimitiveKind::I8 => int_as(scalar).map(DynamicValue::I8),
        PrimitiveKind::I16 => int_as(scalar).map(DynamicValue::I16),
        PrimitiveKind::I32 => int_as(scalar).map(DynamicValue::I32),
        PrimitiveKind::I64 => integral(scalar).map(DynamicValue::I64),
        PrimitiveKind::F32 => float(scalar).map(|v| DynamicValue::F32(v as f32)),
        PrimitiveKind::F64 => float(scalar).map(DynamicValue::F64),
        PrimitiveKind::Char => match scalar {
            Scalar::String(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(DynamicValue::Char(c)),
                    _ => None,
                }
            }
            _ => None,
        },
        PrimitiveKind::String => match scalar {
            Scalar::String(s) => Some(DynamicValue::String(s.to_string())),
            Scalar::Int32(_) | Scalar::Int64(_) | Scalar::Double(_) | Scalar::Bool(_) => {
                Some(DynamicValue::String(describe_scalar(scalar)))
            }
            _ => None,
        },
        PrimitiveKind::Bytes => match scalar {
            Scalar::Binary { bytes, .. } | Scalar::ObjectId(bytes) => {
                Some(DynamicValue::Bytes(bytes.to_vec()))
            }
            _ => None,
        },
        PrimitiveKind::DateTime => match scalar {
            Scalar::DateTime(v) => Some(DynamicValue::DateTime(v)),
            _ => None,
        },
    };
    value.ok_or_else(|| conversion_error(scalar, kind.type_name(), path))
}

fn coerce_enum(
    scalar: Scalar<'_>,
    desc: &EnumDescriptor,
    type_name: &str,
    path: &FieldPath,
) -> Result<DynamicValue> {
    if let Scalar::String(name) = scalar {
        return desc
            .variant(name)
            .map(|v| DynamicValue::Enum(v.value, v.name.clone()))
            .ok_or_else(|| {
                path.error(format!(
                    "Requested value '{name}' was not found in enum '{type_name}'."
                ))
            });
    }
    let value = integral(scalar).ok_or_else(|| conversion_error(scalar, type_name, path))?;
    // 0 is every enum's zero value, declared or not.
    if value == 0 {
        return Ok(desc.zero_value());
    }
    desc.variant_by_value(value)
        .map(|v| DynamicValue::Enum(v.value, v.name.clone()))
        .ok_or_else(|| {
            path.error(format!(
                "Value {value} is not defined in enum '{type_name}'."
            ))
        })
}
