// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use bsonpack::{ContentDescriptor, ContentLoader, ConverterRegistry, ModuleRegistry};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Record header, then reconstruction of whatever payload it carries
    if let Ok(descriptor) = ContentDescriptor::from_record_bytes(data) {
        let bytes = descriptor.to_record_bytes().expect("re-encode");
        assert_eq!(ContentDescriptor::from_record_bytes(&bytes).ok(), Some(descriptor.clone()));

        let types = ModuleRegistry::new();
        let converters = ConverterRegistry::standard();
        let _ = ContentLoader::new(&types, &converters).load_descriptor(&descriptor);
    }
});
