// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Processor configuration.
//!
//! ```yaml
//! type_name: "Game.Level, Game"
//! type_name_handling: Auto
//! null_value_handling: Ignore
//! default_value_handling: Populate
//! ```
//!
//! Every key is optional; missing keys take the values of
//! [`ProcessorConfig::default`].

use crate::dynamic::OBJECT_TYPE;
use crate::error::{Error, Result};
use crate::settings::{
    DefaultValueHandling, NullValueHandling, SerializerSettings, TypeNameHandling,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings of the binary content processor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessorConfig {
    /// Type the payload is rebuilt as, `Namespace.Type, Module`.
    pub type_name: String,
    pub type_name_handling: TypeNameHandling,
    pub null_value_handling: NullValueHandling,
    pub default_value_handling: DefaultValueHandling,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            type_name: format!("{OBJECT_TYPE}, core"),
            type_name_handling: TypeNameHandling::All,
            null_value_handling: NullValueHandling::Include,
            default_value_handling: DefaultValueHandling::Include,
        }
    }
}

/// Configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    #[cfg(feature = "yaml-config")]
    Yaml,
}

impl ConfigFormat {
    /// Detect format from file extension.
    pub fn from_extension(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Some(Self::Json),
            #[cfg(feature = "yaml-config")]
            Some("yaml") | Some("yml") => Some(Self::Yaml),
            _ => None,
        }
    }
}

impl ProcessorConfig {
    /// The three policies as serializer settings.
    pub fn settings(&self) -> SerializerSettings {
        SerializerSettings::new(
            self.type_name_handling,
            self.null_value_handling,
            self.default_value_handling,
        )
    }

    /// Parse configuration from a YAML string.
    #[cfg(feature = "yaml-config")]
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| Error::Config(format!("YAML parse error: {e}")))
    }

    /// Parse configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(format!("JSON parse error: {e}")))
    }

    /// Load configuration from a file, picking the format from its extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = ConfigFormat::from_extension(path).ok_or_else(|| {
            Error::Config(format!(
                "unrecognized configuration format: {}",
                path.display()
            ))
        })?;
        let content = std::fs::read_to_string(path)?;
        let config = match format {
            ConfigFormat::Json => Self::from_json_str(&content)?,
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => Self::from_yaml_str(&content)?,
        };
        log::debug!("loaded processor config from {}: {:?}", path.display(), config);
        Ok(config)
    }
}
