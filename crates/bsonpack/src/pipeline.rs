// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Content pipeline stages.
//!
//! ```text
//! .json --ContentImporter--> payload --BinaryContentProcessor--> ContentDescriptor
//!                                                                      |
//!                                                          write / save (record)
//!                                                                      |
//!                             DynamicValue <--ContentLoader-- record bytes / file
//! ```
//!
//! [`ObjectContentProcessor`] skips the record and rebuilds the object at
//! build time.

use crate::config::ProcessorConfig;
use crate::content::ContentDescriptor;
use crate::convert::ConverterRegistry;
use crate::dynamic::{DynamicValue, TypeRegistry};
use crate::error::Result;
use crate::reconstruct::Reconstructor;
use crate::transcode::transcode;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Reads a JSON document from disk and transcodes it.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentImporter;

impl ContentImporter {
    pub fn new() -> Self {
        Self
    }

    /// Stream the file at `path` through the transcoder.
    pub fn import(&self, path: impl AsRef<Path>) -> Result<Vec<u8>> {
        let path = path.as_ref();
        let payload = transcode(BufReader::new(File::open(path)?))?;
        log::debug!("imported {} ({} bytes)", path.display(), payload.len());
        Ok(payload)
    }
}

/// Wraps payloads into descriptors using configured policies.
#[derive(Debug, Clone, Default)]
pub struct BinaryContentProcessor {
    config: ProcessorConfig,
}

impl BinaryContentProcessor {
    pub fn new(config: ProcessorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// The type name is recorded as configured; it is resolved at load time.
    pub fn process(&self, payload: Vec<u8>) -> Result<ContentDescriptor> {
        ContentDescriptor::build(payload, self.config.type_name.as_str(), self.config.settings())
    }
}

/// Rebuilds payloads directly, without producing a record.
#[derive(Debug, Clone, Default)]
pub struct ObjectContentProcessor {
    config: ProcessorConfig,
}

impl ObjectContentProcessor {
    pub fn new(config: ProcessorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    pub fn process(
        &self,
        payload: &[u8],
        types: &dyn TypeRegistry,
        converters: &ConverterRegistry,
    ) -> Result<DynamicValue> {
        Reconstructor::new(types, converters, self.config.settings())
            .reconstruct(payload, &self.config.type_name)
    }
}

/// Load-time stage: reads records and rebuilds their objects.
pub struct ContentLoader<'r> {
    types: &'r dyn TypeRegistry,
    converters: &'r ConverterRegistry,
    module_hint: Option<String>,
}

impl<'r> ContentLoader<'r> {
    pub fn new(types: &'r dyn TypeRegistry, converters: &'r ConverterRegistry) -> Self {
        Self {
            types,
            converters,
            module_hint: None,
        }
    }

    /// Module whose exports are listed when a type cannot be resolved.
    #[must_use]
    pub fn with_module_hint(mut self, module: impl Into<String>) -> Self {
        self.module_hint = Some(module.into());
        self
    }

    /// Rebuild a descriptor with its own recorded settings.
    pub fn load_descriptor(&self, descriptor: &ContentDescriptor) -> Result<DynamicValue> {
        Reconstructor::new(self.types, self.converters, descriptor.settings()).reconstruct_with_hint(
            descriptor.data(),
            descriptor.type_name(),
            self.module_hint.as_deref(),
        )
    }

    /// Read one record from `r` and rebuild it.
    pub fn load<R: Read>(&self, r: &mut R) -> Result<DynamicValue> {
        self.load_descriptor(&ContentDescriptor::read(r)?)
    }

    pub fn load_bytes(&self, bytes: &[u8]) -> Result<DynamicValue> {
        self.load_descriptor(&ContentDescriptor::from_record_bytes(bytes)?)
    }

    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<DynamicValue> {
        self.load_descriptor(&ContentDescriptor::open(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamic::{ModuleRegistry, TypeDescriptorBuilder};
    use crate::error::Error;
    use crate::settings::TypeNameHandling;
    use crate::transcode::transcode_str;

    fn registry() -> ModuleRegistry {
        let mut reg = ModuleRegistry::new();
        reg.register(
            TypeDescriptorBuilder::new("Game.Level")
                .module("Game")
                .string_field("Title")
                .build(),
        );
        reg
    }

    fn config(type_name: &str) -> ProcessorConfig {
        ProcessorConfig {
            type_name: type_name.to_string(),
            type_name_handling: TypeNameHandling::Auto,
            ..ProcessorConfig::default()
        }
    }

    #[test]
    fn test_binary_processor_then_loader() {
        let reg = registry();
        let converters = ConverterRegistry::standard();
        let payload = transcode_str(r#"{"Title": "Caves"}"#).expect("transcode");
        let descriptor = BinaryContentProcessor::new(config("Game.Level, Game"))
            .process(payload)
            .expect("process");
        assert_eq!(descriptor.type_name_handling(), TypeNameHandling::Auto);

        let bytes = descriptor.to_record_bytes().expect("write");
        let value = ContentLoader::new(&reg, &converters)
            .load_bytes(&bytes)
            .expect("load");
        assert_eq!(value.get_field("Title"), Some(&DynamicValue::from("Caves")));
    }

    #[test]
    fn test_object_processor() {
        let reg = registry();
        let converters = ConverterRegistry::standard();
        let payload = transcode_str(r#"{"title": "Caves"}"#).expect("transcode");
        let value = ObjectContentProcessor::new(config("Game.Level, Game"))
            .process(&payload, &reg, &converters)
            .expect("process");
        assert_eq!(value.get_field("Title"), Some(&DynamicValue::from("Caves")));
    }

    #[test]
    fn test_loader_hint_enriches_resolution_failure() {
        let reg = registry();
        let converters = ConverterRegistry::standard();
        let payload = transcode_str("{}").expect("transcode");
        let bytes = BinaryContentProcessor::new(config("Game.Levle, Game"))
            .process(payload)
            .and_then(|d| d.to_record_bytes())
            .expect("record");

        let plain = ContentLoader::new(&reg, &converters).load_bytes(&bytes);
        assert!(matches!(plain, Err(Error::TypeResolution { .. })));

        let hinted = ContentLoader::new(&reg, &converters)
            .with_module_hint("Game")
            .load_bytes(&bytes)
            .expect_err("unresolved");
        assert!(hinted.to_string().contains("  Game.Level\n"));
    }
}
