// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Benchmarks for type-specification parsing and value validation.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use value_core::{DType, NdArray, Shape, Value};

fn bench_parse(c: &mut Criterion) {
    let specs = [
        "numeric/int",
        "ndarray/uint8///3",
        "[numeric/float]",
        "ndarray/float32/1/224/224/3",
    ];
    c.bench_function("parse_typespecs", |b| {
        b.iter(|| {
            for s in &specs {
                black_box(type_grammar::parse(black_box(s)).unwrap());
            }
        })
    });
}

fn bench_validate(c: &mut Criterion) {
    let image = type_grammar::parse("ndarray/uint8///3").unwrap();
    let value = Value::Array(NdArray::zeros(Shape::new(vec![480, 640, 3]), DType::UInt8));
    c.bench_function("validate_image_array", |b| {
        b.iter(|| value_validator::validate(black_box(&value), black_box(&image)))
    });

    let probs = type_grammar::parse("[numeric/float]").unwrap();
    let list = Value::List((0..1000).map(|i| Value::Float(i as f64 / 1000.0)).collect());
    c.bench_function("validate_float_list", |b| {
        b.iter(|| value_validator::validate(black_box(&list), black_box(&probs)))
    });
}

criterion_group!(benches, bench_parse, bench_validate);
criterion_main!(benches);
