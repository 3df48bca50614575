// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::float_cmp)] // Exact comparisons on literals

//! Type tag, null and default policies on the read side.

use bsonpack::dynamic::{EnumBuilder, FieldDescriptor, PrimitiveKind};
use bsonpack::{
    transcode_str, ConverterRegistry, DefaultValueHandling, DynamicData, DynamicValue, Error,
    ModuleRegistry, NullValueHandling, Reconstructor, Serializer, SerializerSettings,
    TypeDescriptor, TypeDescriptorBuilder, TypeNameHandling, TypeRegistry,
};
use std::collections::BTreeMap;
use std::sync::Arc;

fn shape_types() -> ModuleRegistry {
    let mut types = ModuleRegistry::new();
    let shape = types.register(
        TypeDescriptorBuilder::new("Game.Shape")
            .module("Game")
            .string_field("Name")
            .abstract_type()
            .build(),
    );
    types.register(
        TypeDescriptorBuilder::new("Game.Circle")
            .module("Game")
            .extends(&shape)
            .field("Radius", PrimitiveKind::F64)
            .build(),
    );
    types.register(
        TypeDescriptorBuilder::new("Game.Square")
            .module("Game")
            .extends(&shape)
            .field("Side", PrimitiveKind::I32)
            .build(),
    );
    types.register(
        TypeDescriptorBuilder::new("Game.Marker")
            .module("Game")
            .string_field("Label")
            .build(),
    );
    types.register(
        TypeDescriptorBuilder::new("Game.Board")
            .module("Game")
            .field_with_type("Focus", shape.clone())
            .sequence_field("Shapes", shape)
            .object_field("Payload")
            .field_with_default("Columns", PrimitiveKind::I32, 8i32)
            .optional_field("Rows", PrimitiveKind::I32)
            .string_field("Title")
            .build(),
    );
    let tint = types.register(
        EnumBuilder::new("Game.Tint")
            .module("Game")
            .variant_value("Red", 1)
            .variant("Blue")
            .build(),
    );
    types.register(
        TypeDescriptorBuilder::new("Game.Paint")
            .module("Game")
            .field_with_type("Tint", Arc::clone(&tint))
            .field_descriptor(
                FieldDescriptor::new("Accent", tint).with_default(DynamicValue::Enum(2, "Blue".into())),
            )
            .sequence_field("Layers", Arc::new(TypeDescriptor::primitive(PrimitiveKind::String)))
            .map_field("Weights", Arc::new(TypeDescriptor::primitive(PrimitiveKind::I32)))
            .build(),
    );
    types
}

fn read_as(
    json: &str,
    type_name: &str,
    settings: SerializerSettings,
) -> bsonpack::Result<DynamicValue> {
    let types = shape_types();
    let converters = ConverterRegistry::standard();
    let payload = transcode_str(json).expect("transcode");
    Reconstructor::new(&types, &converters, settings).reconstruct(&payload, type_name)
}

fn read(json: &str, settings: SerializerSettings) -> bsonpack::Result<DynamicValue> {
    read_as(json, "Game.Board, Game", settings)
}

fn paint(json: &str, settings: SerializerSettings) -> bsonpack::Result<DynamicValue> {
    read_as(json, "Game.Paint, Game", settings)
}

fn no_tint() -> DynamicValue {
    DynamicValue::Enum(0, String::new())
}

fn tags(handling: TypeNameHandling) -> SerializerSettings {
    SerializerSettings::default().with_type_name_handling(handling)
}

#[test]
fn polymorphic_field_takes_tagged_type() {
    let board = read(
        r#"{"Focus": {"$type": "Game.Circle, Game", "Name": "sun", "Radius": 2.5}}"#,
        tags(TypeNameHandling::Auto),
    )
    .expect("reconstruct");
    let focus = board
        .get_field("Focus")
        .and_then(DynamicValue::as_struct)
        .expect("focus");
    assert_eq!(focus.type_name(), "Game.Circle");
    assert_eq!(focus.get::<f64>("Radius").expect("radius"), 2.5);
    assert_eq!(focus.get::<String>("Name").expect("name"), "sun");
}

#[test]
fn heterogeneous_sequence_keeps_element_types() {
    let board = read(
        r#"{"Shapes": [
            {"$type": "Game.Circle, Game", "Radius": 1},
            {"$type": "Game.Square, Game", "Side": 4}
        ]}"#,
        tags(TypeNameHandling::Objects),
    )
    .expect("reconstruct");
    let shapes = board
        .get_field("Shapes")
        .and_then(DynamicValue::as_sequence)
        .expect("shapes");
    let names: Vec<_> = shapes
        .iter()
        .filter_map(DynamicValue::as_struct)
        .map(DynamicData::type_name)
        .collect();
    assert_eq!(names, ["Game.Circle", "Game.Square"]);
    assert_eq!(shapes[1].get_field("Side"), Some(&DynamicValue::I32(4)));
}

#[test]
fn tagged_collection_wrapper() {
    let board = read(
        r#"{"Shapes": {"$type": "Game.Shape[], Game", "$values": [
            {"$type": "Game.Square, Game", "Side": 2}
        ]}}"#,
        tags(TypeNameHandling::All),
    )
    .expect("reconstruct");
    let shapes = board
        .get_field("Shapes")
        .and_then(DynamicValue::as_sequence)
        .expect("shapes");
    assert_eq!(shapes.len(), 1);
}

#[test]
fn object_field_accepts_any_tagged_type() {
    let board = read(
        r#"{"Payload": {"$type": "Game.Marker, Game", "Label": "exit"}}"#,
        tags(TypeNameHandling::Objects),
    )
    .expect("reconstruct");
    let payload = board
        .get_field("Payload")
        .and_then(DynamicValue::as_struct)
        .expect("payload");
    assert_eq!(payload.type_name(), "Game.Marker");

    let board = read(r#"{"Payload": {"Label": "exit"}}"#, tags(TypeNameHandling::Objects))
        .expect("reconstruct");
    assert!(board
        .get_field("Payload")
        .and_then(DynamicValue::as_map)
        .is_some());
}

#[test]
fn abstract_type_requires_tag() {
    let err = read(
        r#"{"Shapes": [{"Name": "mystery"}]}"#,
        tags(TypeNameHandling::Objects),
    )
    .expect_err("abstract");
    match err {
        Error::Reconstruct { path, message } => {
            assert_eq!(path, "Shapes[0]");
            assert!(message.contains("Game.Shape"));
        }
        other => panic!("unexpected {other:?}"),
    }

    // With tags disabled the tag is ignored and the abstract type remains.
    let err = read(
        r#"{"Focus": {"$type": "Game.Circle, Game", "Radius": 1}}"#,
        tags(TypeNameHandling::None),
    )
    .expect_err("abstract");
    assert!(matches!(err, Error::Reconstruct { ref path, .. } if path == "Focus"));
}

#[test]
fn incompatible_and_unknown_tags() {
    let err = read(
        r#"{"Focus": {"$type": "Game.Marker, Game", "Label": "x"}}"#,
        tags(TypeNameHandling::Auto),
    )
    .expect_err("incompatible");
    assert!(matches!(err, Error::Reconstruct { .. }));

    let err = read(
        r#"{"Focus": {"$type": "Game.Triangle, Game"}}"#,
        tags(TypeNameHandling::Auto),
    )
    .expect_err("unknown");
    assert!(err.is_type_resolution());
}

#[test]
fn null_handling() {
    let include = read(r#"{"Title": null, "Rows": null}"#, SerializerSettings::default())
        .expect("reconstruct");
    assert_eq!(include.get_field("Title"), Some(&DynamicValue::Null));
    assert_eq!(include.get_field("Rows"), Some(&DynamicValue::Null));

    let ignore = SerializerSettings::default().with_null_value_handling(NullValueHandling::Ignore);
    let skipped = read(r#"{"Title": null, "Rows": null, "Columns": null}"#, ignore)
        .expect("reconstruct");
    assert_eq!(skipped.get_field("Title"), Some(&DynamicValue::from("")));
    assert_eq!(skipped.get_field("Rows"), Some(&DynamicValue::I32(0)));
    assert_eq!(skipped.get_field("Columns"), Some(&DynamicValue::I32(0)));

    let err = read(r#"{"Columns": null}"#, SerializerSettings::default()).expect_err("null");
    assert!(err.to_string().contains("Path 'Columns'"));
}

#[test]
fn default_handling() {
    let with = |handling: DefaultValueHandling| {
        SerializerSettings::default().with_default_value_handling(handling)
    };
    let columns = |board: &DynamicValue| board.get_field("Columns").cloned();

    let include = read("{}", with(DefaultValueHandling::Include)).expect("reconstruct");
    assert_eq!(columns(&include), Some(DynamicValue::I32(0)));

    let populate = read("{}", with(DefaultValueHandling::Populate)).expect("reconstruct");
    assert_eq!(columns(&populate), Some(DynamicValue::I32(8)));

    // Explicit values win over population.
    let explicit = read(r#"{"Columns": 3}"#, with(DefaultValueHandling::IgnoreAndPopulate))
        .expect("reconstruct");
    assert_eq!(columns(&explicit), Some(DynamicValue::I32(3)));

    // A payload value equal to the default is not assigned.
    let ignored = read(r#"{"Columns": 8}"#, with(DefaultValueHandling::Ignore))
        .expect("reconstruct");
    assert_eq!(columns(&ignored), Some(DynamicValue::I32(0)));
}

#[test]
fn auto_tags_only_where_runtime_type_differs() {
    let types = shape_types();
    let converters = ConverterRegistry::standard();
    let board_type = types.resolve("Game.Board, Game").expect("board");
    let circle = types.resolve("Game.Circle, Game").expect("circle");

    let mut c = DynamicData::new(&circle);
    c.set("Radius", 3.0f64).expect("set");
    let mut board = DynamicData::new(&board_type);
    board.set("Focus", c.clone()).expect("set");
    board
        .set_field("Shapes", DynamicValue::Sequence(vec![c.into()]))
        .expect("set");
    let value = DynamicValue::Struct(board);

    let settings = tags(TypeNameHandling::Auto);
    let payload = Serializer::new(&converters, settings)
        .serialize(&value, &board_type)
        .expect("serialize");
    let text = String::from_utf8_lossy(&payload);
    assert!(!text.contains("Game.Board"));
    assert_eq!(text.matches("Game.Circle, Game").count(), 2);

    let back = Reconstructor::new(&types, &converters, settings)
        .reconstruct(&payload, "Game.Board, Game")
        .expect("reconstruct");
    assert_eq!(back, value);
}

#[test]
fn missing_enum_starts_at_underlying_zero() {
    let value = paint("{}", SerializerSettings::default()).expect("reconstruct");
    assert_eq!(value.get_field("Tint"), Some(&no_tint()));
    assert_eq!(value.get_field("Accent"), Some(&no_tint()));

    // 0 is accepted from the payload even though no variant declares it.
    let value = paint(r#"{"Tint": 0}"#, SerializerSettings::default()).expect("reconstruct");
    assert_eq!(value.get_field("Tint"), Some(&no_tint()));
    let err = paint(r#"{"Tint": 3}"#, SerializerSettings::default()).expect_err("undefined");
    assert!(err.to_string().contains("Path 'Tint'"));
}

#[test]
fn zero_values_of_enum_sequence_and_map() {
    let value = paint("{}", SerializerSettings::default()).expect("reconstruct");
    assert_eq!(value.get_field("Layers"), Some(&DynamicValue::Sequence(Vec::new())));
    assert_eq!(value.get_field("Weights"), Some(&DynamicValue::Map(BTreeMap::new())));

    let ignore = SerializerSettings::default().with_null_value_handling(NullValueHandling::Ignore);
    let value = paint(r#"{"Tint": null, "Layers": null, "Weights": null}"#, ignore)
        .expect("reconstruct");
    assert_eq!(value.get_field("Tint"), Some(&no_tint()));
    assert_eq!(value.get_field("Layers"), Some(&DynamicValue::Sequence(Vec::new())));
    assert_eq!(value.get_field("Weights"), Some(&DynamicValue::Map(BTreeMap::new())));

    let include = paint(r#"{"Layers": null, "Weights": null}"#, SerializerSettings::default())
        .expect("reconstruct");
    assert_eq!(include.get_field("Layers"), Some(&DynamicValue::Null));
    assert_eq!(include.get_field("Weights"), Some(&DynamicValue::Null));
    let err = paint(r#"{"Tint": null}"#, SerializerSettings::default()).expect_err("null enum");
    assert!(err.to_string().contains("Path 'Tint'"));
}

#[test]
fn populate_and_ignore_defaults_per_kind() {
    let with = |handling: DefaultValueHandling| {
        SerializerSettings::default().with_default_value_handling(handling)
    };

    let populated = paint("{}", with(DefaultValueHandling::Populate)).expect("reconstruct");
    assert_eq!(populated.get_field("Tint"), Some(&no_tint()));
    assert_eq!(
        populated.get_field("Accent"),
        Some(&DynamicValue::Enum(2, "Blue".into()))
    );
    assert_eq!(populated.get_field("Layers"), Some(&DynamicValue::Sequence(Vec::new())));
    assert_eq!(populated.get_field("Weights"), Some(&DynamicValue::Map(BTreeMap::new())));

    let json = r#"{"Tint": "red", "Accent": "Blue", "Layers": ["base"], "Weights": {}}"#;
    let ignored = paint(json, with(DefaultValueHandling::Ignore)).expect("reconstruct");
    assert_eq!(ignored.get_field("Tint"), Some(&DynamicValue::Enum(1, "Red".into())));
    assert_eq!(ignored.get_field("Accent"), Some(&no_tint()));
    assert_eq!(ignored.get_field("Layers"), Some(&DynamicValue::from(vec!["base"])));
    assert_eq!(ignored.get_field("Weights"), Some(&DynamicValue::Map(BTreeMap::new())));

    let included = paint(json, with(DefaultValueHandling::Include)).expect("reconstruct");
    assert_eq!(
        included.get_field("Accent"),
        Some(&DynamicValue::Enum(2, "Blue".into()))
    );
}

#[test]
fn zero_enum_survives_a_round_trip() {
    let types = shape_types();
    let converters = ConverterRegistry::standard();
    let paint_type = types.resolve("Game.Paint, Game").expect("paint");
    let value = DynamicValue::Struct(DynamicData::new(&paint_type));

    let settings = SerializerSettings::default();
    let payload = Serializer::new(&converters, settings)
        .serialize(&value, &paint_type)
        .expect("serialize");
    let back = Reconstructor::new(&types, &converters, settings)
        .reconstruct(&payload, "Game.Paint, Game")
        .expect("reconstruct");
    assert_eq!(back, value);
}
