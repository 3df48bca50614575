// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dynamic Types
//!
//! Runtime type information and type-erased object graphs. Reconstruction
//! targets these instead of compile-time types, so any registered type can
//! be rebuilt from a payload.
//!
//! # Features
//!
//! - **TypeDescriptor**: Runtime type description (primitives, structs, sequences, maps, enums)
//! - **DynamicData**: Type-erased struct instance with field access
//! - **Builder API**: Fluent interface for building type descriptors
//! - **TypeRegistry**: Name resolution over modules of registered types
//!
//! # Example
//!
//! ```rust
//! use bsonpack::dynamic::{DynamicData, PrimitiveKind, TypeDescriptorBuilder};
//! use std::sync::Arc;
//!
//! let descriptor = Arc::new(TypeDescriptorBuilder::new("Game.Pickup")
//!     .module("Game")
//!     .string_field("Item")
//!     .field("Amount", PrimitiveKind::I32)
//!     .build());
//!
//! let mut data = DynamicData::new(&descriptor);
//! data.set("Item", "medkit").unwrap();
//! data.set("Amount", 25i32).unwrap();
//!
//! let amount: i32 = data.get("Amount").unwrap();
//! assert_eq!(amount, 25);
//! ```

mod builder;
mod dynamic_data;
mod registry;
mod type_descriptor;
mod value;

pub use builder::{EnumBuilder, TypeDescriptorBuilder};
pub use dynamic_data::{DynamicData, DynamicDataError, FromDynamicValue};
pub use registry::{ModuleInfo, ModuleRegistry, TypeName, TypeRegistry};
pub use type_descriptor::{
    EnumDescriptor, EnumVariant, FieldDescriptor, MapDescriptor, PrimitiveKind,
    SequenceDescriptor, TypeDescriptor, TypeKind, CORE_MODULE, OBJECT_TYPE,
};
pub use value::DynamicValue;
