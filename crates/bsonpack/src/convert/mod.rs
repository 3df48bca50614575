// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Value converters.
//!
//! A converter maps a structured value onto a single string token of
//! comma-separated components (`"1.5, -2"`) and back. The set of converter
//! kinds is closed; the registry maps type names onto kinds and can be
//! extended by composition with [`ConverterRegistry::with`].

pub mod geometry;

use crate::dynamic::{DynamicData, TypeDescriptor};
use crate::error::{Error, Result};
use geometry::{Color, Point, Rectangle, RectangleF, SizeF, Vector2, GEOMETRY_MODULE};
use std::num::{ParseFloatError, ParseIntError};
use std::sync::Arc;
use thiserror::Error;

/// Why a token could not be split into components.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComponentError {
    #[error("expected {expected} components, found {found}")]
    Count { expected: usize, found: usize },
    #[error("invalid floating-point component: {0}")]
    Float(#[from] ParseFloatError),
    #[error("invalid integer component: {0}")]
    Int(#[from] ParseIntError),
}

/// Split a token on `,`, trimming each component.
pub(crate) fn split_components(
    token: &str,
    expected: usize,
) -> std::result::Result<Vec<&str>, ComponentError> {
    let parts: Vec<&str> = token.split(',').map(str::trim).collect();
    if parts.len() != expected {
        return Err(ComponentError::Count {
            expected,
            found: parts.len(),
        });
    }
    Ok(parts)
}

/// Converter dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConverterKind {
    Vector2,
    RectangleF,
    Rectangle,
    SizeF,
    Point,
    Color,
}

impl ConverterKind {
    /// Every kind, in standard registry order.
    pub const ALL: [ConverterKind; 6] = [
        Self::Vector2,
        Self::RectangleF,
        Self::Rectangle,
        Self::SizeF,
        Self::Point,
        Self::Color,
    ];

    /// Type name the kind is registered under by default.
    pub fn type_name(self) -> &'static str {
        match self {
            Self::Vector2 => Vector2::TYPE_NAME,
            Self::RectangleF => RectangleF::TYPE_NAME,
            Self::Rectangle => Rectangle::TYPE_NAME,
            Self::SizeF => SizeF::TYPE_NAME,
            Self::Point => Point::TYPE_NAME,
            Self::Color => Color::TYPE_NAME,
        }
    }

    /// Component names, in token order.
    pub fn components(self) -> &'static [&'static str] {
        match self {
            Self::Vector2 => Vector2::COMPONENTS,
            Self::RectangleF => RectangleF::COMPONENTS,
            Self::Rectangle => Rectangle::COMPONENTS,
            Self::SizeF => SizeF::COMPONENTS,
            Self::Point => Point::COMPONENTS,
            Self::Color => Color::COMPONENTS,
        }
    }

    /// Render an instance as its token.
    pub fn encode(self, data: &DynamicData) -> Result<String> {
        let token = match self {
            Self::Vector2 => Vector2::from_dynamic(data)?.to_string(),
            Self::RectangleF => RectangleF::from_dynamic(data)?.to_string(),
            Self::Rectangle => Rectangle::from_dynamic(data)?.to_string(),
            Self::SizeF => SizeF::from_dynamic(data)?.to_string(),
            Self::Point => Point::from_dynamic(data)?.to_string(),
            Self::Color => Color::from_dynamic(data)?.to_string(),
        };
        Ok(token)
    }

    /// Parse `token` into an instance of `descriptor`.
    pub fn decode(self, token: &str, descriptor: &Arc<TypeDescriptor>) -> Result<DynamicData> {
        let parsed = match self {
            Self::Vector2 => token.parse::<Vector2>().map(|v| v.to_dynamic(descriptor)),
            Self::RectangleF => token.parse::<RectangleF>().map(|v| v.to_dynamic(descriptor)),
            Self::Rectangle => token.parse::<Rectangle>().map(|v| v.to_dynamic(descriptor)),
            Self::SizeF => token.parse::<SizeF>().map(|v| v.to_dynamic(descriptor)),
            Self::Point => token.parse::<Point>().map(|v| v.to_dynamic(descriptor)),
            Self::Color => token.parse::<Color>().map(|v| v.to_dynamic(descriptor)),
        };
        match parsed {
            Ok(data) => Ok(data?),
            Err(source) => Err(Error::ConverterParse {
                token: token.to_string(),
                type_name: descriptor.name.clone(),
                source,
            }),
        }
    }
}

#[derive(Debug, Clone)]
struct ConverterEntry {
    name: String,
    /// `None` matches the name in any module.
    module: Option<String>,
    kind: ConverterKind,
}

impl ConverterEntry {
    fn matches(&self, name: &str, module: Option<&str>) -> bool {
        self.name == name
            && match (self.module.as_deref(), module) {
                (Some(own), Some(other)) => own == other,
                _ => true,
            }
    }
}

/// Split `Namespace.Type, Module` into its name and optional module.
fn split_type_name(raw: &str) -> (&str, Option<&str>) {
    let mut parts = raw.splitn(3, ',');
    let name = parts.next().unwrap_or_default().trim();
    let module = parts.next().map(str::trim).filter(|m| !m.is_empty());
    (name, module)
}

/// Ordered, immutable mapping from type names to converter kinds.
///
/// Names may be module-qualified (`Geometry.Vector2, Geometry`); an
/// unqualified name applies to that type name in every module.
#[derive(Debug, Clone, Default)]
pub struct ConverterRegistry {
    entries: Vec<ConverterEntry>,
}

impl ConverterRegistry {
    /// Registry without converters.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// The six geometry converters under their default type names.
    #[must_use]
    pub fn standard() -> Self {
        ConverterKind::ALL.into_iter().fold(Self::empty(), |reg, kind| {
            reg.with(format!("{}, {}", kind.type_name(), GEOMETRY_MODULE), kind)
        })
    }

    /// Map `type_name` onto `kind`, replacing the mappings it covers.
    ///
    /// An unqualified name replaces that name in every module.
    #[must_use]
    pub fn with(mut self, type_name: impl Into<String>, kind: ConverterKind) -> Self {
        let type_name = type_name.into();
        let (name, module) = split_type_name(&type_name);
        let entry = ConverterEntry {
            name: name.to_string(),
            module: module.map(str::to_string),
            kind,
        };
        let covers = |e: &ConverterEntry| {
            e.name == entry.name && (entry.module.is_none() || e.module == entry.module)
        };
        match self.entries.iter().position(covers) {
            Some(at) => {
                self.entries.retain(|e| !covers(e));
                self.entries.insert(at, entry);
            }
            None => self.entries.push(entry),
        }
        self
    }

    /// Converter for the type name, if any. An unqualified name matches
    /// regardless of module.
    pub fn get(&self, type_name: &str) -> Option<ConverterKind> {
        let (name, module) = split_type_name(type_name);
        self.entries
            .iter()
            .find(|e| e.matches(name, module))
            .map(|e| e.kind)
    }

    /// Converter for the descriptor's type, if any.
    pub fn for_type(&self, descriptor: &TypeDescriptor) -> Option<ConverterKind> {
        self.entries
            .iter()
            .find(|e| {
                e.name == descriptor.name
                    && (e.module.is_none() || e.module == descriptor.module)
            })
            .map(|e| e.kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ConverterKind)> {
        self.entries.iter().map(|e| (e.name.as_str(), e.kind))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_registry_order() {
        let reg = ConverterRegistry::standard();
        let names: Vec<_> = reg.iter().map(|(name, _)| name).collect();
        assert_eq!(
            names,
            [
                "Geometry.Vector2",
                "Geometry.RectangleF",
                "Geometry.Rectangle",
                "Geometry.SizeF",
                "Geometry.Point",
                "Geometry.Color",
            ]
        );
    }

    #[test]
    fn test_with_extends_and_replaces() {
        let reg = ConverterRegistry::standard()
            .with("Game.Position", ConverterKind::Vector2)
            .with("Geometry.Point", ConverterKind::Vector2);
        assert_eq!(reg.len(), 7);
        assert_eq!(reg.get("Game.Position"), Some(ConverterKind::Vector2));
        assert_eq!(reg.get("Geometry.Point"), Some(ConverterKind::Vector2));
        assert_eq!(reg.get("Game.Unknown"), None);
        assert!(ConverterRegistry::empty().is_empty());
    }

    #[test]
    fn test_for_type_checks_module() {
        let reg = ConverterRegistry::standard().with("Game.Anchor", ConverterKind::Point);
        let geometry = Vector2::descriptor();
        assert_eq!(reg.for_type(&geometry), Some(ConverterKind::Vector2));

        let lookalike = TypeDescriptor::struct_type("Geometry.Vector2", vec![]).in_module("Mods");
        assert_eq!(reg.for_type(&lookalike), None);
        assert_eq!(reg.get("Geometry.Vector2, Mods"), None);
        assert_eq!(reg.get("Geometry.Vector2"), Some(ConverterKind::Vector2));

        let anchor = TypeDescriptor::struct_type("Game.Anchor", vec![]).in_module("Ui");
        assert_eq!(reg.for_type(&anchor), Some(ConverterKind::Point));
    }

    #[test]
    fn test_decode_vector_token() {
        let desc = Arc::new(Vector2::descriptor());
        let data = ConverterKind::Vector2.decode("1.5, -2", &desc).expect("decode");
        assert_eq!(data.get::<f32>("x").expect("x"), 1.5);
        assert_eq!(data.get::<f32>("y").expect("y"), -2.0);
        assert_eq!(ConverterKind::Vector2.encode(&data).expect("encode"), "1.5, -2");
    }

    #[test]
    fn test_decode_error_names_token() {
        let desc = Arc::new(RectangleF::descriptor());
        let err = ConverterKind::RectangleF
            .decode("1.5", &desc)
            .expect_err("too few components");
        assert!(err.to_string().contains("1.5"));
        assert!(matches!(
            err,
            Error::ConverterParse {
                source: ComponentError::Count { expected: 4, found: 1 },
                ..
            }
        ));
    }

    #[test]
    fn test_split_components_counts_empty_parts() {
        assert_eq!(split_components("1,,2", 3).expect("split"), ["1", "", "2"]);
        assert!(split_components("", 2).is_err());
    }
}
