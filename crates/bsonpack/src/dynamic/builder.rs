// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent builder API for TypeDescriptor.

use crate::dynamic::{
    DynamicValue, EnumDescriptor, EnumVariant, FieldDescriptor, PrimitiveKind, TypeDescriptor,
    TypeKind,
};
use std::sync::Arc;

/// Builder for creating struct TypeDescriptor instances.
#[derive(Debug)]
pub struct TypeDescriptorBuilder {
    name: String,
    module: Option<String>,
    base: Option<Arc<TypeDescriptor>>,
    is_abstract: bool,
    fields: Vec<FieldDescriptor>,
}

impl TypeDescriptorBuilder {
    /// Create a new builder for a struct type.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            module: None,
            base: None,
            is_abstract: false,
            fields: Vec::new(),
        }
    }

    /// Set the exporting module.
    pub fn module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    /// Derive from `base`. Inherited fields come first, in base order.
    pub fn extends(mut self, base: &Arc<TypeDescriptor>) -> Self {
        let mut inherited: Vec<FieldDescriptor> = base.fields().unwrap_or(&[]).to_vec();
        inherited.append(&mut self.fields);
        self.fields = inherited;
        self.base = Some(Arc::clone(base));
        self
    }

    /// Mark the type abstract.
    pub fn abstract_type(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// Add a primitive field.
    pub fn field(self, name: impl Into<String>, kind: PrimitiveKind) -> Self {
        self.field_with_type(name, Arc::new(TypeDescriptor::primitive(kind)))
    }

    /// Add a field with a type descriptor.
    pub fn field_with_type(
        mut self,
        name: impl Into<String>,
        type_desc: Arc<TypeDescriptor>,
    ) -> Self {
        self.fields.push(FieldDescriptor::new(name, type_desc));
        self
    }

    /// Add a prebuilt field descriptor.
    pub fn field_descriptor(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Add an optional (nullable) primitive field.
    pub fn optional_field(mut self, name: impl Into<String>, kind: PrimitiveKind) -> Self {
        let type_desc = Arc::new(TypeDescriptor::primitive(kind));
        self.fields
            .push(FieldDescriptor::new(name, type_desc).optional());
        self
    }

    /// Add a primitive field with a declared default.
    pub fn field_with_default(
        mut self,
        name: impl Into<String>,
        kind: PrimitiveKind,
        default: impl Into<DynamicValue>,
    ) -> Self {
        let type_desc = Arc::new(TypeDescriptor::primitive(kind));
        self.fields
            .push(FieldDescriptor::new(name, type_desc).with_default(default));
        self
    }

    /// Add a string field.
    pub fn string_field(self, name: impl Into<String>) -> Self {
        self.field(name, PrimitiveKind::String)
    }

    /// Add a sequence field.
    pub fn sequence_field(self, name: impl Into<String>, element: Arc<TypeDescriptor>) -> Self {
        self.field_with_type(name, Arc::new(TypeDescriptor::sequence(element)))
    }

    /// Add a string-keyed map field.
    pub fn map_field(self, name: impl Into<String>, value: Arc<TypeDescriptor>) -> Self {
        self.field_with_type(name, Arc::new(TypeDescriptor::map(value)))
    }

    /// Add a field of any type; the payload tags the concrete type.
    pub fn object_field(self, name: impl Into<String>) -> Self {
        self.field_with_type(name, Arc::new(TypeDescriptor::object()))
    }

    /// Build the TypeDescriptor.
    pub fn build(self) -> TypeDescriptor {
        TypeDescriptor {
            name: self.name,
            module: self.module,
            kind: TypeKind::Struct(self.fields),
            base: self.base,
            is_abstract: self.is_abstract,
        }
    }
}

/// Builder for enum types.
#[derive(Debug)]
pub struct EnumBuilder {
    name: String,
    module: Option<String>,
    variants: Vec<EnumVariant>,
    next_value: i64,
}

impl EnumBuilder {
    /// Create a new enum builder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            module: None,
            variants: Vec::new(),
            next_value: 0,
        }
    }

    /// Set the exporting module.
    pub fn module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    /// Add a variant with auto-incrementing value.
    pub fn variant(mut self, name: impl Into<String>) -> Self {
        self.variants.push(EnumVariant::new(name, self.next_value));
        self.next_value += 1;
        self
    }

    /// Add a variant with explicit value.
    pub fn variant_value(mut self, name: impl Into<String>, value: i64) -> Self {
        self.variants.push(EnumVariant::new(name, value));
        self.next_value = value + 1;
        self
    }

    /// Build the TypeDescriptor.
    pub fn build(self) -> TypeDescriptor {
        let mut desc = TypeDescriptor::new(self.name, TypeKind::Enum(EnumDescriptor::new(self.variants)));
        desc.module = self.module;
        desc
    }
}
