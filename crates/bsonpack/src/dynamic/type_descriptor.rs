// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type descriptors for runtime type information.

use crate::dynamic::DynamicValue;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Module holding the built-in types.
pub const CORE_MODULE: &str = "core";

/// Name of the universal type every value is assignable to.
pub const OBJECT_TYPE: &str = "core.Object";

/// Primitive type kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    Char,
    String,
    /// Opaque byte buffer.
    Bytes,
    /// Milliseconds since the Unix epoch, UTC.
    DateTime,
}

impl PrimitiveKind {
    /// Every primitive, in registration order.
    pub const ALL: [PrimitiveKind; 15] = [
        Self::Bool,
        Self::U8,
        Self::U16,
        Self::U32,
        Self::U64,
        Self::I8,
        Self::I16,
        Self::I32,
        Self::I64,
        Self::F32,
        Self::F64,
        Self::Char,
        Self::String,
        Self::Bytes,
        Self::DateTime,
    ];

    /// Name of the built-in type in the core module.
    pub fn type_name(self) -> &'static str {
        match self {
            Self::Bool => "core.Boolean",
            Self::U8 => "core.Byte",
            Self::U16 => "core.UInt16",
            Self::U32 => "core.UInt32",
            Self::U64 => "core.UInt64",
            Self::I8 => "core.SByte",
            Self::I16 => "core.Int16",
            Self::I32 => "core.Int32",
            Self::I64 => "core.Int64",
            Self::F32 => "core.Single",
            Self::F64 => "core.Double",
            Self::Char => "core.Char",
            Self::String => "core.String",
            Self::Bytes => "core.Bytes",
            Self::DateTime => "core.DateTime",
        }
    }

    /// Reference-like primitives accept null.
    pub fn is_nullable(self) -> bool {
        matches!(self, Self::String | Self::Bytes)
    }

    /// Zero value of the primitive.
    // @audit-ok: Simple pattern matching - zero value dispatch table
    pub fn zero_value(self) -> DynamicValue {
        match self {
            Self::Bool => DynamicValue::Bool(false),
            Self::U8 => DynamicValue::U8(0),
            Self::U16 => DynamicValue::U16(0),
            Self::U32 => DynamicValue::U32(0),
            Self::U64 => DynamicValue::U64(0),
            Self::I8 => DynamicValue::I8(0),
            Self::I16 => DynamicValue::I16(0),
            Self::I32 => DynamicValue::I32(0),
            Self::I64 => DynamicValue::I64(0),
            Self::F32 => DynamicValue::F32(0.0),
            Self::F64 => DynamicValue::F64(0.0),
            Self::Char => DynamicValue::Char('\0'),
            Self::String => DynamicValue::String(String::new()),
            Self::Bytes => DynamicValue::Bytes(Vec::new()),
            Self::DateTime => DynamicValue::DateTime(0),
        }
    }
}

/// Type kind enumeration.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    /// Primitive type.
    Primitive(PrimitiveKind),
    /// Struct with named fields (inherited fields first).
    Struct(Vec<FieldDescriptor>),
    /// Sequence (dynamic length).
    Sequence(SequenceDescriptor),
    /// String-keyed dictionary.
    Map(MapDescriptor),
    /// Enumeration.
    Enum(EnumDescriptor),
    /// Any value; the concrete type comes from the payload.
    Any,
}

/// A complete type descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDescriptor {
    /// Namespace-qualified type name (`Game.Player`).
    pub name: String,
    /// Module exporting the type.
    pub module: Option<String>,
    /// Type kind.
    pub kind: TypeKind,
    /// Direct base type, for structs.
    pub base: Option<Arc<TypeDescriptor>>,
    /// Cannot be instantiated without a concrete type tag.
    pub is_abstract: bool,
}

impl TypeDescriptor {
    /// Create a new type descriptor.
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            module: None,
            kind,
            base: None,
            is_abstract: false,
        }
    }

    /// Built-in descriptor of a primitive.
    pub fn primitive(kind: PrimitiveKind) -> Self {
        Self::new(kind.type_name(), TypeKind::Primitive(kind)).in_module(CORE_MODULE)
    }

    /// Built-in `core.Object` descriptor.
    pub fn object() -> Self {
        Self::new(OBJECT_TYPE, TypeKind::Any).in_module(CORE_MODULE)
    }

    /// Create a struct type descriptor.
    pub fn struct_type(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self::new(name, TypeKind::Struct(fields))
    }

    /// Sequence of `element`, named `Element[]` in the element's module.
    pub fn sequence(element: Arc<TypeDescriptor>) -> Self {
        let name = format!("{}[]", element.name);
        let module = element.module.clone();
        let mut desc = Self::new(name, TypeKind::Sequence(SequenceDescriptor::new(element)));
        desc.module = module;
        desc
    }

    /// String-keyed map of `value`.
    pub fn map(value: Arc<TypeDescriptor>) -> Self {
        let name = format!("core.Dictionary<{}>", value.name);
        let mut desc = Self::new(name, TypeKind::Map(MapDescriptor::new(value)));
        desc.module = Some(CORE_MODULE.to_string());
        desc
    }

    /// Set the exporting module.
    #[must_use]
    pub fn in_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    /// `Name, Module` form used by type tags.
    pub fn qualified_name(&self) -> String {
        match &self.module {
            Some(module) => format!("{}, {}", self.name, module),
            None => self.name.clone(),
        }
    }

    /// Check if this is a struct type.
    pub fn is_struct(&self) -> bool {
        matches!(self.kind, TypeKind::Struct(_))
    }

    /// Check if this is `core.Object`.
    pub fn is_any(&self) -> bool {
        matches!(self.kind, TypeKind::Any)
    }

    /// Get fields if this is a struct.
    pub fn fields(&self) -> Option<&[FieldDescriptor]> {
        match &self.kind {
            TypeKind::Struct(fields) => Some(fields),
            _ => None,
        }
    }

    /// Get field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields()?.iter().find(|f| f.name == name)
    }

    /// Get field by exact name, falling back to a case-insensitive match.
    pub fn find_field(&self, name: &str) -> Option<&FieldDescriptor> {
        let fields = self.fields()?;
        fields
            .iter()
            .find(|f| f.name == name)
            .or_else(|| fields.iter().find(|f| eq_ignore_case(&f.name, name)))
    }

    /// Element type of a sequence.
    pub fn element_type(&self) -> Option<&Arc<TypeDescriptor>> {
        match &self.kind {
            TypeKind::Sequence(seq) => Some(&seq.element_type),
            _ => None,
        }
    }

    /// Whether an explicit null is a legal value of this type.
    pub fn is_nullable(&self) -> bool {
        match &self.kind {
            TypeKind::Primitive(p) => p.is_nullable(),
            TypeKind::Enum(_) => false,
            TypeKind::Struct(_) | TypeKind::Sequence(_) | TypeKind::Map(_) | TypeKind::Any => true,
        }
    }

    /// Same type, or this type derives from it.
    pub fn derives_from(&self, other: &TypeDescriptor) -> bool {
        let mut current = Some(self);
        while let Some(desc) = current {
            if desc.is_same_type(other) {
                return true;
            }
            current = desc.base.as_deref();
        }
        false
    }

    /// Same name exported from the same module.
    pub fn is_same_type(&self, other: &TypeDescriptor) -> bool {
        self.name == other.name && self.module == other.module
    }

    /// A value of this type can be stored where `declared` is expected.
    pub fn is_assignable_to(&self, declared: &TypeDescriptor) -> bool {
        if declared.is_any() || self.derives_from(declared) {
            return true;
        }
        match (&self.kind, &declared.kind) {
            (TypeKind::Sequence(actual), TypeKind::Sequence(expected)) => actual
                .element_type
                .is_assignable_to(&expected.element_type),
            (TypeKind::Map(actual), TypeKind::Map(expected)) => {
                actual.value_type.is_assignable_to(&expected.value_type)
            }
            _ => false,
        }
    }

    /// Zero value: what a fresh instance holds before any assignment.
    ///
    /// Struct-typed members start as null so recursive types terminate.
    /// Enums start at the underlying value 0 whether or not a variant
    /// declares it.
    pub fn zero_value(&self) -> DynamicValue {
        match &self.kind {
            TypeKind::Primitive(p) => p.zero_value(),
            TypeKind::Enum(e) => e.zero_value(),
            TypeKind::Sequence(_) => DynamicValue::Sequence(Vec::new()),
            TypeKind::Map(_) => DynamicValue::Map(BTreeMap::new()),
            TypeKind::Struct(_) | TypeKind::Any => DynamicValue::Null,
        }
    }
}

/// Field descriptor for struct members.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Field name.
    pub name: String,
    /// Field type.
    pub type_desc: Arc<TypeDescriptor>,
    /// Accepts null even when the type does not.
    pub optional: bool,
    /// Declared default value (if any).
    pub default: Option<DynamicValue>,
}

impl FieldDescriptor {
    /// Create a new field descriptor.
    pub fn new(name: impl Into<String>, type_desc: Arc<TypeDescriptor>) -> Self {
        Self {
            name: name.into(),
            type_desc,
            optional: false,
            default: None,
        }
    }

    /// Mark as optional.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Set default value.
    #[must_use]
    pub fn with_default(mut self, default: impl Into<DynamicValue>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Declared default, or the zero value of the field's type.
    pub fn resolved_default(&self) -> DynamicValue {
        self.default
            .clone()
            .unwrap_or_else(|| self.type_desc.zero_value())
    }

    /// Whether the field may hold an explicit null.
    pub fn is_nullable(&self) -> bool {
        self.optional || self.type_desc.is_nullable()
    }
}

/// Sequence type descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceDescriptor {
    /// Element type.
    pub element_type: Arc<TypeDescriptor>,
}

impl SequenceDescriptor {
    pub fn new(element_type: Arc<TypeDescriptor>) -> Self {
        Self { element_type }
    }
}

/// Map type descriptor. Keys are always strings.
#[derive(Debug, Clone, PartialEq)]
pub struct MapDescriptor {
    /// Value type.
    pub value_type: Arc<TypeDescriptor>,
}

impl MapDescriptor {
    pub fn new(value_type: Arc<TypeDescriptor>) -> Self {
        Self { value_type }
    }
}

/// Enumeration type descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDescriptor {
    /// Enum variants.
    pub variants: Vec<EnumVariant>,
}

impl EnumDescriptor {
    /// Create enum descriptor.
    pub fn new(variants: Vec<EnumVariant>) -> Self {
        Self { variants }
    }

    /// Get variant by name, exact first then ignoring case.
    pub fn variant(&self, name: &str) -> Option<&EnumVariant> {
        self.variants
            .iter()
            .find(|v| v.name == name)
            .or_else(|| {
                self.variants
                    .iter()
                    .find(|v| eq_ignore_case(&v.name, name))
            })
    }

    /// Get variant by value.
    pub fn variant_by_value(&self, value: i64) -> Option<&EnumVariant> {
        self.variants.iter().find(|v| v.value == value)
    }

    /// Underlying value 0, named after the variant declaring it (if any).
    pub fn zero_value(&self) -> DynamicValue {
        let name = self
            .variant_by_value(0)
            .map(|v| v.name.clone())
            .unwrap_or_default();
        DynamicValue::Enum(0, name)
    }
}

/// Unicode case-insensitive comparison, without allocating.
fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

/// Enum variant.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumVariant {
    /// Variant name.
    pub name: String,
    /// Variant value.
    pub value: i64,
}

impl EnumVariant {
    /// Create enum variant.
    pub fn new(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}
