// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Handling policies carried by every content descriptor.
//!
//! The integer value of each variant is written to persisted records, so the
//! mapping below is a compatibility contract: never renumber a variant.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Where `$type` tags are embedded and honoured.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TypeNameHandling {
    /// Never write tags; skip them on read.
    #[default]
    None = 0,
    /// Tag objects.
    Objects = 1,
    /// Tag collections (`$type` + `$values` wrapper).
    Arrays = 2,
    /// Tag objects and collections.
    All = 3,
    /// Tag only where the runtime type differs from the declared type.
    Auto = 4,
}

/// Whether null members are written and assigned.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NullValueHandling {
    #[default]
    Include = 0,
    Ignore = 1,
}

/// Whether members equal to their default are written, and whether absent
/// members are populated with their default on read.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DefaultValueHandling {
    #[default]
    Include = 0,
    Ignore = 1,
    Populate = 2,
    IgnoreAndPopulate = 3,
}

impl TypeNameHandling {
    /// Wire value.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Tags must be consulted on read.
    pub fn reads_tags(self) -> bool {
        self != Self::None
    }
}

impl TryFrom<i32> for TypeNameHandling {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::Objects),
            2 => Ok(Self::Arrays),
            3 => Ok(Self::All),
            4 => Ok(Self::Auto),
            other => Err(Error::InvalidRecord(format!(
                "unknown TypeNameHandling value {other}"
            ))),
        }
    }
}

impl NullValueHandling {
    /// Wire value.
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl TryFrom<i32> for NullValueHandling {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self> {
        match value {
            0 => Ok(Self::Include),
            1 => Ok(Self::Ignore),
            other => Err(Error::InvalidRecord(format!(
                "unknown NullValueHandling value {other}"
            ))),
        }
    }
}

impl DefaultValueHandling {
    /// Wire value.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Members equal to their default are neither written nor assigned.
    pub fn ignores_defaults(self) -> bool {
        matches!(self, Self::Ignore | Self::IgnoreAndPopulate)
    }

    /// Members absent from the payload are set to their default on read.
    pub fn populates_defaults(self) -> bool {
        matches!(self, Self::Populate | Self::IgnoreAndPopulate)
    }
}

impl TryFrom<i32> for DefaultValueHandling {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self> {
        match value {
            0 => Ok(Self::Include),
            1 => Ok(Self::Ignore),
            2 => Ok(Self::Populate),
            3 => Ok(Self::IgnoreAndPopulate),
            other => Err(Error::InvalidRecord(format!(
                "unknown DefaultValueHandling value {other}"
            ))),
        }
    }
}

/// Immutable bundle of the three policies, passed to every serializer and
/// reconstructor call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SerializerSettings {
    pub type_name_handling: TypeNameHandling,
    pub null_value_handling: NullValueHandling,
    pub default_value_handling: DefaultValueHandling,
}

impl SerializerSettings {
    /// Create settings from explicit policies.
    pub fn new(
        type_name_handling: TypeNameHandling,
        null_value_handling: NullValueHandling,
        default_value_handling: DefaultValueHandling,
    ) -> Self {
        Self {
            type_name_handling,
            null_value_handling,
            default_value_handling,
        }
    }

    /// Replace the type name policy.
    #[must_use]
    pub fn with_type_name_handling(mut self, handling: TypeNameHandling) -> Self {
        self.type_name_handling = handling;
        self
    }

    /// Replace the null policy.
    #[must_use]
    pub fn with_null_value_handling(mut self, handling: NullValueHandling) -> Self {
        self.null_value_handling = handling;
        self
    }

    /// Replace the default-value policy.
    #[must_use]
    pub fn with_default_value_handling(mut self, handling: DefaultValueHandling) -> Self {
        self.default_value_handling = handling;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_values_are_stable() {
        assert_eq!(TypeNameHandling::None.as_i32(), 0);
        assert_eq!(TypeNameHandling::Objects.as_i32(), 1);
        assert_eq!(TypeNameHandling::Arrays.as_i32(), 2);
        assert_eq!(TypeNameHandling::All.as_i32(), 3);
        assert_eq!(TypeNameHandling::Auto.as_i32(), 4);
        assert_eq!(NullValueHandling::Ignore.as_i32(), 1);
        assert_eq!(DefaultValueHandling::Populate.as_i32(), 2);
        assert_eq!(DefaultValueHandling::IgnoreAndPopulate.as_i32(), 3);
    }

    #[test]
    fn test_try_from_rejects_unknown_values() {
        assert_eq!(TypeNameHandling::try_from(4).ok(), Some(TypeNameHandling::Auto));
        assert!(TypeNameHandling::try_from(5).is_err());
        assert!(NullValueHandling::try_from(-1).is_err());
        assert!(matches!(
            DefaultValueHandling::try_from(9),
            Err(Error::InvalidRecord(_))
        ));
    }

    #[test]
    fn test_default_policy_flags() {
        assert!(!DefaultValueHandling::Include.ignores_defaults());
        assert!(DefaultValueHandling::Ignore.ignores_defaults());
        assert!(!DefaultValueHandling::Ignore.populates_defaults());
        assert!(DefaultValueHandling::Populate.populates_defaults());
        assert!(DefaultValueHandling::IgnoreAndPopulate.ignores_defaults());
        assert!(DefaultValueHandling::IgnoreAndPopulate.populates_defaults());
    }

    #[test]
    fn test_settings_builders() {
        let settings = SerializerSettings::default()
            .with_type_name_handling(TypeNameHandling::Auto)
            .with_null_value_handling(NullValueHandling::Ignore);
        assert_eq!(settings.type_name_handling, TypeNameHandling::Auto);
        assert_eq!(settings.null_value_handling, NullValueHandling::Ignore);
        assert_eq!(settings.default_value_handling, DefaultValueHandling::Include);
    }
}
