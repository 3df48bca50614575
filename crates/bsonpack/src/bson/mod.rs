// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Binary document encoding.
//!
//! ```text
//! document := i32 total_length, element*, 0x00
//! element  := u8 type, cstring key, value
//! ```
//!
//! All integers are little-endian. Arrays are documents keyed `"0"`, `"1"`,
//! ... in order. Both sides are token based: the writer is driven by
//! start/name/value/end calls, the reader yields the same tokens back.

mod element;
mod reader;
mod writer;

pub use element::{ElementType, Scalar, Token, BINARY_GENERIC};
pub use reader::{peek_root_key, BsonReader, MAX_DEPTH};
pub use writer::BsonWriter;
