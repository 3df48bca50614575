// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Transcoding and record throughput.
//!
//! Measures:
//! - JSON to payload transcoding for flat and nested documents
//! - Record write and read for the resulting payloads

#![allow(clippy::uninlined_format_args)]
#![allow(clippy::cast_possible_truncation)]

use bsonpack::{transcode_str, ContentDescriptor, SerializerSettings};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::fmt::Write;

fn flat_document(fields: usize) -> String {
    let mut json = String::from("{");
    for i in 0..fields {
        if i > 0 {
            json.push(',');
        }
        let _ = write!(json, "\"field_{i}\": {}", i * 3);
    }
    json.push('}');
    json
}

fn level_document(enemies: usize) -> String {
    let mut json = String::from(r#"{"Title": "The Deep", "Bounds": "0, 0, 640, 480", "Enemies": ["#);
    for i in 0..enemies {
        if i > 0 {
            json.push(',');
        }
        let _ = write!(
            json,
            r#"{{"Name": "enemy-{i}", "Health": {}, "Position": "{}.5, -{}", "Tags": ["a", "b"]}}"#,
            100 + i,
            i,
            i * 2
        );
    }
    json.push_str("]}");
    json
}

fn bench_transcode(c: &mut Criterion) {
    let mut group = c.benchmark_group("transcode");
    for size in [16usize, 256, 4096] {
        let flat = flat_document(size);
        group.throughput(Throughput::Bytes(flat.len() as u64));
        group.bench_with_input(BenchmarkId::new("flat", size), &flat, |b, json| {
            b.iter(|| transcode_str(black_box(json)).expect("transcode"));
        });

        let nested = level_document(size);
        group.throughput(Throughput::Bytes(nested.len() as u64));
        group.bench_with_input(BenchmarkId::new("level", size), &nested, |b, json| {
            b.iter(|| transcode_str(black_box(json)).expect("transcode"));
        });
    }
    group.finish();
}

fn bench_record(c: &mut Criterion) {
    let payload = transcode_str(&level_document(1024)).expect("transcode");
    let descriptor =
        ContentDescriptor::build(payload, "Game.Level, Game", SerializerSettings::default())
            .expect("build");
    let bytes = descriptor.to_record_bytes().expect("write");

    let mut group = c.benchmark_group("record");
    group.throughput(Throughput::Bytes(bytes.len() as u64));
    group.bench_function("write", |b| {
        b.iter(|| black_box(&descriptor).to_record_bytes().expect("write"));
    });
    group.bench_function("read", |b| {
        b.iter(|| ContentDescriptor::from_record_bytes(black_box(&bytes)).expect("read"));
    });
    group.finish();
}

criterion_group!(benches, bench_transcode, bench_record);
criterion_main!(benches);
