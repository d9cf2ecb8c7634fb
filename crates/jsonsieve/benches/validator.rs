//! Benchmark – `jsonsieve::Validator`
#![allow(missing_docs)]

use std::time::Duration;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use jsonsieve::{Status, Validator, ValidatorOptions};

/// Produce a deterministic document of roughly `target_len` bytes: an object
/// of records, each with a few string members and a nested array, so that
/// every kind of token is exercised.
fn make_payload(target_len: usize) -> String {
    let mut s = String::with_capacity(target_len + 128);
    s.push_str("{\"records\":[");
    let mut i = 0usize;
    while s.len() < target_len {
        if i > 0 {
            s.push(',');
        }
        s.push_str(&format!(
            "{{\"id\":\"r{i}\",\"name\":\"record \\\"{i}\\\" \\u00e9\",\"tags\":[\"a\",\"b{i}\"]}}"
        ));
        i += 1;
    }
    s.push_str("]}");
    s
}

/// `{"a":{"a":{ ... "v" ... }}}` nested `depth` levels deep.
fn make_nested(depth: usize) -> String {
    let mut s = "{\"a\":".repeat(depth);
    s.push_str("\"v\"");
    s.push_str(&"}".repeat(depth));
    s
}

fn run_chars(payload: &str) -> Status {
    let mut validator = Validator::new();
    for c in payload.chars() {
        validator.accept(c).expect("payload is valid");
    }
    validator.status()
}

fn run_chunks(payload: &str, parts: usize) -> Status {
    assert!(parts > 0);
    let chunk_size = payload.len().div_ceil(parts);

    let mut validator = Validator::new();
    for chunk in payload.as_bytes().chunks(chunk_size) {
        validator.feed_bytes(chunk).expect("payload is valid");
    }
    validator.finalize().expect("payload is complete");
    validator.status()
}

fn bench_validator(c: &mut Criterion) {
    let payload = make_payload(100_000);

    let mut group = c.benchmark_group("validator");
    group.throughput(Throughput::Bytes(payload.len() as u64));

    group.bench_function("chars", |b| {
        b.iter(|| black_box(run_chars(black_box(&payload))));
    });
    for &parts in &[1usize, 100, 10_000] {
        group.bench_with_input(BenchmarkId::new("bytes", parts), &parts, |b, &parts| {
            b.iter(|| black_box(run_chunks(black_box(&payload), parts)));
        });
    }
    group.finish();
}

fn bench_nesting(c: &mut Criterion) {
    let mut group = c.benchmark_group("nesting");
    for &depth in &[10usize, 100] {
        let payload = make_nested(depth);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &payload, |b, payload| {
            b.iter(|| black_box(run_chars(black_box(payload))));
        });
    }

    // Rejection must stay cheap however deep the attempted nesting goes.
    let hostile = format!("{{\"a\":{}", "[".repeat(1_000_000));
    group.bench_function("reject_deep", |b| {
        b.iter(|| {
            let mut validator = Validator::with_options(ValidatorOptions::default());
            black_box(validator.feed(black_box(&hostile)).is_err())
        });
    });
    group.finish();
}

fn criterion() -> Criterion {
    let mut c = Criterion::default();
    if cfg!(feature = "bench-fast") {
        c = c
            .warm_up_time(Duration::from_millis(10))
            .measurement_time(Duration::from_millis(100))
            .sample_size(10);
    } else {
        c = c
            .warm_up_time(Duration::from_secs(5))
            .measurement_time(Duration::from_secs(10));
    }
    c
}

criterion_group! { name = benches; config = criterion(); targets = bench_validator, bench_nesting }
criterion_main!(benches);
