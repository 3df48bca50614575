// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use bsonpack::convert::geometry;
use bsonpack::{ConverterKind, ModuleRegistry, TypeRegistry};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(token) = std::str::from_utf8(data) else {
        return;
    };
    let mut types = ModuleRegistry::new();
    geometry::register_types(&mut types);
    for kind in ConverterKind::ALL {
        let descriptor = types.resolve(kind.type_name()).expect("registered");
        if let Ok(value) = kind.decode(token, &descriptor) {
            // Canonical tokens are stable
            let canonical = kind.encode(&value).expect("encode");
            let again = kind.decode(&canonical, &descriptor).expect("canonical token");
            assert_eq!(kind.encode(&again).expect("encode"), canonical);
        }
    }
});
