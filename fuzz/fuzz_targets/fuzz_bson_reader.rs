// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use bsonpack::bson::BsonReader;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    for as_array in [false, true] {
        let mut reader = BsonReader::new(data).root_as_array(as_array);
        while let Ok(Some(_)) = reader.next_token() {}
        let _ = reader.finish();
    }
    let _ = bsonpack::bson::peek_root_key(data);
});
