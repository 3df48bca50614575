// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Geometry value types with a compact `"a, b, c"` text form.

use super::{split_components, ComponentError};
use crate::dynamic::{
    DynamicData, DynamicDataError, ModuleRegistry, PrimitiveKind, TypeDescriptor,
    TypeDescriptorBuilder,
};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Module exporting the geometry types.
pub const GEOMETRY_MODULE: &str = "Geometry";

macro_rules! geometry_type {
    ($(#[$meta:meta])* $name:ident = $type_name:literal, $ty:ty, $prim:expr, { $($field:ident),+ }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Default)]
        pub struct $name {
            $(pub $field: $ty,)+
        }

        impl $name {
            /// Registered type name.
            pub const TYPE_NAME: &'static str = $type_name;
            /// Component names, in token order.
            pub const COMPONENTS: &'static [&'static str] = &[$(stringify!($field)),+];

            pub fn new($($field: $ty),+) -> Self {
                Self { $($field),+ }
            }

            /// Struct descriptor exported from the geometry module.
            pub fn descriptor() -> TypeDescriptor {
                TypeDescriptorBuilder::new($type_name)
                    .module(GEOMETRY_MODULE)
                    $(.field(stringify!($field), $prim))+
                    .build()
            }

            /// Instance of `descriptor` holding these components.
            pub fn to_dynamic(
                &self,
                descriptor: &Arc<TypeDescriptor>,
            ) -> Result<DynamicData, DynamicDataError> {
                let mut data = DynamicData::new(descriptor);
                $(data.set(stringify!($field), self.$field)?;)+
                Ok(data)
            }

            pub fn from_dynamic(data: &DynamicData) -> Result<Self, DynamicDataError> {
                Ok(Self {
                    $($field: data.get(stringify!($field))?,)+
                })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&[$(self.$field.to_string()),+].join(", "))
            }
        }

        impl FromStr for $name {
            type Err = ComponentError;

            fn from_str(s: &str) -> Result<Self, ComponentError> {
                let mut parts = split_components(s, Self::COMPONENTS.len())?.into_iter();
                Ok(Self {
                    $($field: parts.next().unwrap_or_default().parse::<$ty>()?,)+
                })
            }
        }
    };
}

geometry_type!(
    /// 2D vector.
    Vector2 = "Geometry.Vector2", f32, PrimitiveKind::F32, { x, y }
);

geometry_type!(
    /// Rectangle with floating-point origin and size.
    RectangleF = "Geometry.RectangleF", f32, PrimitiveKind::F32, { x, y, width, height }
);

geometry_type!(
    /// Rectangle with integer origin and size.
    Rectangle = "Geometry.Rectangle", i32, PrimitiveKind::I32, { x, y, width, height }
);

geometry_type!(
    SizeF = "Geometry.SizeF", f32, PrimitiveKind::F32, { width, height }
);

geometry_type!(
    Point = "Geometry.Point", i32, PrimitiveKind::I32, { x, y }
);

geometry_type!(
    /// RGBA color, one byte per channel.
    Color = "Geometry.Color", u8, PrimitiveKind::U8, { r, g, b, a }
);

/// Register the six geometry descriptors as exports of `Geometry`.
pub fn register_types(registry: &mut ModuleRegistry) {
    registry.register(Vector2::descriptor());
    registry.register(RectangleF::descriptor());
    registry.register(Rectangle::descriptor());
    registry.register(SizeF::descriptor());
    registry.register(Point::descriptor());
    registry.register(Color::descriptor());
}
