// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Import, process, persist and load through files.

use bsonpack::convert::geometry::{self, Vector2};
use bsonpack::{
    BinaryContentProcessor, ContentDescriptor, ContentImporter, ContentLoader, ConverterRegistry,
    DynamicValue, Error, ModuleRegistry, ObjectContentProcessor, ProcessorConfig,
    TypeDescriptorBuilder, TypeNameHandling, TypeRegistry,
};
use std::path::Path;

fn types() -> ModuleRegistry {
    let mut types = ModuleRegistry::new();
    geometry::register_types(&mut types);
    let vector = types.resolve(Vector2::TYPE_NAME).expect("vector");
    let waypoint = types.register(
        TypeDescriptorBuilder::new("Game.Waypoint")
            .module("Game")
            .field_with_type("At", vector)
            .build(),
    );
    types.register(
        TypeDescriptorBuilder::new("Game.Route")
            .module("Game")
            .string_field("Name")
            .sequence_field("Points", waypoint)
            .build(),
    );
    types
}

const ROUTE: &str = r#"{
    "Name": "patrol",
    "Points": [
        {"$type": "Game.Waypoint, Game", "At": "0, 0"},
        {"At": "12.5, -4"}
    ]
}"#;

fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("write");
    path
}

fn point(route: &DynamicValue, index: usize) -> Vector2 {
    let points = route
        .get_field("Points")
        .and_then(DynamicValue::as_sequence)
        .expect("points");
    let at = points[index]
        .get_field("At")
        .and_then(DynamicValue::as_struct)
        .expect("at");
    Vector2::from_dynamic(at).expect("vector")
}

#[cfg(feature = "yaml-config")]
#[test]
fn json_file_to_record_file_to_object() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = write(dir.path(), "route.json", ROUTE);
    let config = write(
        dir.path(),
        "route.yaml",
        "type_name: \"Game.Route, Game\"\ntype_name_handling: Auto\n",
    );

    let payload = ContentImporter::new().import(&source).expect("import");
    let config = ProcessorConfig::load(&config).expect("config");
    let descriptor = BinaryContentProcessor::new(config)
        .process(payload)
        .expect("process");
    let record = dir.path().join("route.bin");
    descriptor.save(&record).expect("save");

    let types = types();
    let converters = ConverterRegistry::standard();
    let route = ContentLoader::new(&types, &converters)
        .load_file(&record)
        .expect("load");
    assert_eq!(route.get_field("Name"), Some(&DynamicValue::from("patrol")));
    assert_eq!(point(&route, 1), Vector2::new(12.5, -4.0));

    let mut reader = std::io::BufReader::new(std::fs::File::open(&record).expect("open"));
    let again = ContentLoader::new(&types, &converters)
        .load(&mut reader)
        .expect("load");
    assert_eq!(again, route);
}

#[test]
fn object_processor_with_json_config() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = write(dir.path(), "route.json", ROUTE);
    let config = write(
        dir.path(),
        "processor.json",
        r#"{"type_name": "Game.Route, Game", "type_name_handling": "Objects"}"#,
    );

    let config = ProcessorConfig::load(&config).expect("config");
    assert_eq!(config.type_name_handling, TypeNameHandling::Objects);
    let payload = ContentImporter::new().import(&source).expect("import");
    let types = types();
    let route = ObjectContentProcessor::new(config)
        .process(&payload, &types, &ConverterRegistry::standard())
        .expect("process");
    assert_eq!(point(&route, 0), Vector2::new(0.0, 0.0));
}

#[test]
fn import_failures() {
    let dir = tempfile::tempdir().expect("tempdir");
    let importer = ContentImporter::new();
    assert!(matches!(
        importer.import(dir.path().join("missing.json")),
        Err(Error::Io(_))
    ));

    let broken = write(dir.path(), "broken.json", "{\n  \"Name\": \"patrol\",\n  \"Points\": [\n");
    match importer.import(&broken) {
        Err(Error::MalformedInput { line, .. }) => assert_eq!(line, 4),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn default_processor_targets_object() {
    let descriptor = BinaryContentProcessor::default()
        .process(vec![5, 0, 0, 0, 0])
        .expect("process");
    assert_eq!(descriptor.type_name(), "core.Object, core");
    assert_eq!(descriptor.type_name_handling(), TypeNameHandling::All);

    let bytes = descriptor.to_record_bytes().expect("write");
    let types = ModuleRegistry::new();
    let converters = ConverterRegistry::empty();
    let value = ContentLoader::new(&types, &converters)
        .load_bytes(&bytes)
        .expect("load");
    assert_eq!(value, DynamicValue::Map(Default::default()));
    assert_eq!(
        ContentDescriptor::from_record_bytes(&bytes).expect("read"),
        descriptor
    );
}
