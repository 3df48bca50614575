// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use bsonpack::bson::BsonReader;
use bsonpack::{reconstruct, transcode_slice, ConverterRegistry, ModuleRegistry, SerializerSettings};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Every accepted document must produce a well-formed payload
    if let Ok(payload) = transcode_slice(data) {
        let mut reader = BsonReader::new(&payload);
        while reader.next_token().expect("well-formed payload").is_some() {}
        reader.finish().expect("fully consumed");

        let types = ModuleRegistry::new();
        let converters = ConverterRegistry::standard();
        let _ = reconstruct(
            &payload,
            "core.Object, core",
            SerializerSettings::default(),
            &types,
            &converters,
        );
    }
});
