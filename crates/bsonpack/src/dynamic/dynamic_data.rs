// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! DynamicData container for runtime data manipulation.

use crate::dynamic::{DynamicValue, FieldDescriptor, TypeDescriptor};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

/// Errors for DynamicData operations.
#[derive(Debug, Error)]
pub enum DynamicDataError {
    #[error("Field not found: {0}")]
    FieldNotFound(String),
    #[error("Type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: String, got: String },
    #[error("Invalid operation for type: {0}")]
    InvalidOperation(String),
}

/// Struct instance with runtime type checking.
///
/// Every field declared by the descriptor is present from construction,
/// holding its zero value until assigned.
#[derive(Debug, Clone)]
pub struct DynamicData {
    /// Type descriptor.
    descriptor: Arc<TypeDescriptor>,
    /// Field values by name.
    values: BTreeMap<String, DynamicValue>,
}

impl DynamicData {
    /// Create new DynamicData with zero-initialised fields.
    pub fn new(descriptor: &Arc<TypeDescriptor>) -> Self {
        let values = descriptor
            .fields()
            .unwrap_or(&[])
            .iter()
            .map(|f| (f.name.clone(), f.type_desc.zero_value()))
            .collect();
        Self {
            descriptor: Arc::clone(descriptor),
            values,
        }
    }

    /// Create new DynamicData with every field set to its resolved default.
    pub fn with_defaults(descriptor: &Arc<TypeDescriptor>) -> Self {
        let values = descriptor
            .fields()
            .unwrap_or(&[])
            .iter()
            .map(|f| (f.name.clone(), f.resolved_default()))
            .collect();
        Self {
            descriptor: Arc::clone(descriptor),
            values,
        }
    }

    /// Get the type descriptor.
    pub fn descriptor(&self) -> &Arc<TypeDescriptor> {
        &self.descriptor
    }

    /// Get the type name.
    pub fn type_name(&self) -> &str {
        &self.descriptor.name
    }

    /// Get a field value by name.
    pub fn get<T: FromDynamicValue>(&self, name: &str) -> Result<T, DynamicDataError> {
        let field_value = self.get_field(name)?;
        T::from_dynamic(field_value)
    }

    /// Set a field value by name.
    pub fn set<T: Into<DynamicValue>>(
        &mut self,
        name: &str,
        value: T,
    ) -> Result<(), DynamicDataError> {
        self.set_field(name, value.into())
    }

    /// Get field by name.
    pub fn get_field(&self, name: &str) -> Result<&DynamicValue, DynamicDataError> {
        self.values
            .get(name)
            .ok_or_else(|| DynamicDataError::FieldNotFound(name.to_string()))
    }

    /// Replace a declared field's value.
    pub fn set_field(&mut self, name: &str, value: DynamicValue) -> Result<(), DynamicDataError> {
        match self.values.get_mut(name) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(DynamicDataError::FieldNotFound(name.to_string())),
        }
    }

    /// Iterate over fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&FieldDescriptor, &DynamicValue)> + '_ {
        self.descriptor
            .fields()
            .unwrap_or(&[])
            .iter()
            .filter_map(move |f| self.values.get(&f.name).map(|v| (f, v)))
    }
}

impl PartialEq for DynamicData {
    fn eq(&self, other: &Self) -> bool {
        self.descriptor.is_same_type(&other.descriptor) && self.values == other.values
    }
}

/// Trait for converting from DynamicValue.
pub trait FromDynamicValue: Sized {
    fn from_dynamic(value: &DynamicValue) -> Result<Self, DynamicDataError>;
}

fn mismatch(expected: &str, got: &DynamicValue) -> DynamicDataError {
    DynamicDataError::TypeMismatch {
        expected: expected.to_string(),
        got: got.kind_name().to_string(),
    }
}

// Implement FromDynamicValue for primitives
macro_rules! impl_from_dynamic {
    ($ty:ty, $variant:ident, $name:expr) => {
        impl FromDynamicValue for $ty {
            fn from_dynamic(value: &DynamicValue) -> Result<Self, DynamicDataError> {
                match value {
                    DynamicValue::$variant(v) => Ok(*v),
                    other => Err(mismatch($name, other)),
                }
            }
        }
    };
}

impl_from_dynamic!(bool, Bool, "bool");
impl_from_dynamic!(u8, U8, "u8");
impl_from_dynamic!(u16, U16, "u16");
impl_from_dynamic!(u32, U32, "u32");
impl_from_dynamic!(u64, U64, "u64");
impl_from_dynamic!(i8, I8, "i8");
impl_from_dynamic!(i16, I16, "i16");
impl_from_dynamic!(i32, I32, "i32");
impl_from_dynamic!(i64, I64, "i64");
impl_from_dynamic!(f32, F32, "f32");
impl_from_dynamic!(f64, F64, "f64");
impl_from_dynamic!(char, Char, "char");

impl FromDynamicValue for String {
    fn from_dynamic(value: &DynamicValue) -> Result<Self, DynamicDataError> {
        match value {
            DynamicValue::String(s) => Ok(s.clone()),
            other => Err(mismatch("string", other)),
        }
    }
}

impl FromDynamicValue for Vec<u8> {
    fn from_dynamic(value: &DynamicValue) -> Result<Self, DynamicDataError> {
        match value {
            DynamicValue::Bytes(b) => Ok(b.clone()),
            other => Err(mismatch("bytes", other)),
        }
    }
}

impl FromDynamicValue for DynamicData {
    fn from_dynamic(value: &DynamicValue) -> Result<Self, DynamicDataError> {
        match value {
            DynamicValue::Struct(d) => Ok(d.clone()),
            other => Err(mismatch("struct", other)),
        }
    }
}

impl FromDynamicValue for DynamicValue {
    fn from_dynamic(value: &DynamicValue) -> Result<Self, DynamicDataError> {
        Ok(value.clone())
    }
}
