// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! bsonpack: JSON content to typed objects through a binary payload
//!
//! Build-time stages turn a JSON document into a compact binary payload and
//! wrap it in a self-describing record; load-time stages read the record and
//! rebuild a typed object graph under the recorded policies.
//!
//! # Quick Start
//!
//! ```rust
//! use bsonpack::{
//!     transcode_str, BinaryContentProcessor, ContentLoader, ConverterRegistry,
//!     ModuleRegistry, ProcessorConfig, TypeDescriptorBuilder,
//! };
//!
//! let mut types = ModuleRegistry::new();
//! let vector = types.register(bsonpack::convert::geometry::Vector2::descriptor());
//! types.register(
//!     TypeDescriptorBuilder::new("Game.Spawn")
//!         .module("Game")
//!         .string_field("Name")
//!         .field_with_type("Position", vector)
//!         .build(),
//! );
//!
//! let payload = transcode_str(r#"{"Name": "start", "Position": "1.5, -2"}"#)?;
//! let config = ProcessorConfig {
//!     type_name: "Game.Spawn, Game".into(),
//!     ..ProcessorConfig::default()
//! };
//! let record = BinaryContentProcessor::new(config).process(payload)?.to_record_bytes()?;
//!
//! let converters = ConverterRegistry::standard();
//! let spawn = ContentLoader::new(&types, &converters).load_bytes(&record)?;
//! assert_eq!(spawn.get_field("Name").and_then(|v| v.as_str()), Some("start"));
//! # Ok::<(), bsonpack::Error>(())
//! ```
//!
//! # Policies
//!
//! | setting                | values                                      |
//! |------------------------|---------------------------------------------|
//! | `TypeNameHandling`     | None, Objects, Arrays, All, Auto            |
//! | `NullValueHandling`    | Include, Ignore                             |
//! | `DefaultValueHandling` | Include, Ignore, Populate, IgnoreAndPopulate|

pub mod bson;
pub mod config;
pub mod content;
pub mod convert;
pub mod diagnostics;
pub mod dynamic;
pub mod error;
pub mod pipeline;
pub mod reconstruct;
mod record;
pub mod serialize;
pub mod settings;
pub mod transcode;

pub use config::ProcessorConfig;
pub use content::ContentDescriptor;
pub use convert::{ConverterKind, ConverterRegistry};
pub use dynamic::{
    DynamicData, DynamicValue, ModuleRegistry, TypeDescriptor, TypeDescriptorBuilder,
    TypeRegistry,
};
pub use error::{Error, Result};
pub use pipeline::{BinaryContentProcessor, ContentImporter, ContentLoader, ObjectContentProcessor};
pub use reconstruct::{reconstruct, Reconstructor};
pub use serialize::Serializer;
pub use settings::{
    DefaultValueHandling, NullValueHandling, SerializerSettings, TypeNameHandling,
};
pub use transcode::{transcode, transcode_slice, transcode_str};
