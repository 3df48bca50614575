// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Persisted content record.
//!
//! # Record Format
//!
//! ```text
//! +--------------------------------------------------------------+
//! | name_len (7-bit varint, 1..=5) | type_name (UTF-8, name_len) |
//! | type_name_handling (i32) | null_value_handling (i32)        |
//! | default_value_handling (i32) | data_length (i32)            |
//! | data (data_length)                                           |
//! +--------------------------------------------------------------+
//! ```
//!
//! Integers are little-endian. The varint stores 7 bits per byte, low bits
//! first, with the high bit set on every byte but the last. There is no
//! magic, version, checksum or compression.

use crate::content::ContentDescriptor;
use crate::error::{Error, Result};
use crate::settings::{
    DefaultValueHandling, NullValueHandling, SerializerSettings, TypeNameHandling,
};
use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Longest valid 7-bit encoded length.
const MAX_VARINT_BYTES: usize = 5;

impl ContentDescriptor {
    /// Serialize the record to `w`.
    pub fn write<W: Write>(&self, w: &mut W) -> Result<()> {
        let name = self.type_name().as_bytes();
        write_7bit_len(w, name.len())?;
        w.write_all(name)?;
        w.write_i32::<LittleEndian>(self.type_name_handling().as_i32())?;
        w.write_i32::<LittleEndian>(self.null_value_handling().as_i32())?;
        w.write_i32::<LittleEndian>(self.default_value_handling().as_i32())?;
        // build() guarantees the payload fits an i32.
        w.write_i32::<LittleEndian>(self.data_length() as i32)?;
        w.write_all(self.data())?;
        Ok(())
    }

    /// Serialize the record into a new buffer.
    pub fn to_record_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(self.type_name().len() + 21 + self.data().len());
        self.write(&mut buf)?;
        Ok(buf)
    }

    /// Write the record to a file, replacing it.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut w = BufWriter::new(File::create(path.as_ref())?);
        self.write(&mut w)?;
        w.flush()?;
        log::debug!(
            "saved {} record ({} byte payload) to {}",
            self.type_name(),
            self.data_length(),
            path.as_ref().display()
        );
        Ok(())
    }

    /// Read one record from `r`. Bytes after the record are left unread.
    pub fn read<R: Read>(r: &mut R) -> Result<Self> {
        let name_len = read_7bit_len(r)?;
        let name = read_counted(r, name_len, "type_name")?;
        let type_name = String::from_utf8(name)
            .map_err(|e| Error::InvalidRecord(format!("type name is not UTF-8: {e}")))?;

        let type_name_handling = TypeNameHandling::try_from(read_i32(r, "type_name_handling")?)?;
        let null_value_handling =
            NullValueHandling::try_from(read_i32(r, "null_value_handling")?)?;
        let default_value_handling =
            DefaultValueHandling::try_from(read_i32(r, "default_value_handling")?)?;

        let data_length = read_i32(r, "data_length")?;
        let data_length = usize::try_from(data_length)
            .map_err(|_| Error::InvalidRecord(format!("negative data length {data_length}")))?;
        let data = read_counted(r, data_length, "data")?;

        ContentDescriptor::build(
            data,
            type_name,
            SerializerSettings::new(
                type_name_handling,
                null_value_handling,
                default_value_handling,
            ),
        )
    }

    /// Read a record from a byte slice.
    pub fn from_record_bytes(mut bytes: &[u8]) -> Result<Self> {
        Self::read(&mut bytes)
    }

    /// Read the record stored in a file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut r = BufReader::new(File::open(path.as_ref())?);
        let record = Self::read(&mut r)?;
        log::debug!(
            "opened {} record ({} byte payload) from {}",
            record.type_name(),
            record.data_length(),
            path.as_ref().display()
        );
        Ok(record)
    }
}

fn write_7bit_len<W: Write>(w: &mut W, len: usize) -> Result<()> {
    let mut value = u32::try_from(len)
        .ok()
        .filter(|&v| v <= i32::MAX as u32)
        .ok_or(Error::PayloadTooLarge {
            len,
            max: i32::MAX as usize,
        })?;
    while value >= 0x80 {
        w.write_u8((value as u8) | 0x80)?;
        value >>= 7;
    }
    w.write_u8(value as u8)?;
    Ok(())
}

fn read_7bit_len<R: Read>(r: &mut R) -> Result<usize> {
    let mut value: u32 = 0;
    for index in 0..MAX_VARINT_BYTES {
        let mut byte = [0u8; 1];
        if read_full(r, &mut byte)? == 0 {
            return Err(Error::TruncatedRecord {
                field: "type_name length",
                needed: index + 1,
                available: index,
            });
        }
        let byte = byte[0];
        if index == MAX_VARINT_BYTES - 1 && byte > 0x07 {
            return Err(Error::InvalidRecord(
                "type name length exceeds the signed 32-bit range".into(),
            ));
        }
        value |= u32::from(byte & 0x7F) << (7 * index);
        if byte & 0x80 == 0 {
            return Ok(value as usize);
        }
    }
    Err(Error::InvalidRecord(
        "7-bit encoded length is longer than 5 bytes".into(),
    ))
}

fn read_i32<R: Read>(r: &mut R, field: &'static str) -> Result<i32> {
    let mut buf = [0u8; 4];
    let got = read_full(r, &mut buf)?;
    if got < buf.len() {
        return Err(Error::TruncatedRecord {
            field,
            needed: buf.len(),
            available: got,
        });
    }
    Ok(LittleEndian::read_i32(&buf))
}

/// Read exactly `len` bytes without trusting `len` for the allocation.
fn read_counted<R: Read>(r: &mut R, len: usize, field: &'static str) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(len.min(64 * 1024));
    r.take(len as u64).read_to_end(&mut buf)?;
    if buf.len() < len {
        return Err(Error::TruncatedRecord {
            field,
            needed: len,
            available: buf.len(),
        });
    }
    Ok(buf)
}

/// Fill `buf` as far as the reader allows; returns the byte count.
fn read_full<R: Read>(r: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match r.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(filled)
}
