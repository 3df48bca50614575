// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Content descriptor: a payload plus everything needed to rebuild it.

use crate::error::{Error, Result};
use crate::settings::{
    DefaultValueHandling, NullValueHandling, SerializerSettings, TypeNameHandling,
};

/// Largest payload a record can describe (its length field is an `i32`).
pub const MAX_PAYLOAD_LEN: usize = i32::MAX as usize;

/// Immutable bundle of a binary payload, the type to rebuild it as, and the
/// policies it was produced with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDescriptor {
    type_name: String,
    settings: SerializerSettings,
    data_length: u32,
    data: Vec<u8>,
}

impl ContentDescriptor {
    /// Wrap `data`. The type name is stored as given, not resolved.
    pub fn build(
        data: Vec<u8>,
        type_name: impl Into<String>,
        settings: SerializerSettings,
    ) -> Result<Self> {
        if data.len() > MAX_PAYLOAD_LEN {
            return Err(Error::PayloadTooLarge {
                len: data.len(),
                max: MAX_PAYLOAD_LEN,
            });
        }
        Ok(Self {
            type_name: type_name.into(),
            settings,
            data_length: data.len() as u32,
            data,
        })
    }

    /// `Namespace.Type, Module` name of the payload's root.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn settings(&self) -> SerializerSettings {
        self.settings
    }

    pub fn type_name_handling(&self) -> TypeNameHandling {
        self.settings.type_name_handling
    }

    pub fn null_value_handling(&self) -> NullValueHandling {
        self.settings.null_value_handling
    }

    pub fn default_value_handling(&self) -> DefaultValueHandling {
        self.settings.default_value_handling
    }

    /// Always equal to `data().len()`.
    pub fn data_length(&self) -> u32 {
        self.data_length
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_computes_length() {
        let settings = SerializerSettings::default()
            .with_type_name_handling(TypeNameHandling::All)
            .with_default_value_handling(DefaultValueHandling::Populate);
        let d = ContentDescriptor::build(vec![5, 0, 0, 0, 0], "Game.Level, Game", settings)
            .expect("build");
        assert_eq!(d.data_length(), 5);
        assert_eq!(d.data(), [5, 0, 0, 0, 0]);
        assert_eq!(d.type_name(), "Game.Level, Game");
        assert_eq!(d.type_name_handling(), TypeNameHandling::All);
        assert_eq!(d.null_value_handling(), NullValueHandling::Include);
        assert_eq!(d.default_value_handling(), DefaultValueHandling::Populate);
    }

    #[test]
    fn test_empty_payload() {
        let d = ContentDescriptor::build(Vec::new(), "core.Object", SerializerSettings::default())
            .expect("build");
        assert_eq!(d.data_length(), 0);
        assert!(d.into_data().is_empty());
    }
}
