//! Benchmarks for output adapters: file formats, insert statements, and
//! code emitters.
//!
//! Measures throughput of rendering a pre-built dataset. File formats write
//! into a black-hole writer to isolate formatter cost from I/O.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use indexmap::IndexMap;
use std::io::Write;

use rowsmith_core::code::{render_code, Language};
use rowsmith_core::generate::value::Value;
use rowsmith_core::output::{csv, json, spreadsheet, xml};
use rowsmith_core::sql::{render_inserts, Dialect};
use rowsmith_core::Dataset;

/// A writer that discards all output.
struct NullWriter;

impl Write for NullWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        Ok(buf.len())
    }
    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Build a dataset with N rows of realistic column types.
fn make_dataset(row_count: usize) -> Dataset {
    let base = chrono::NaiveDate::from_ymd_opt(2025, 1, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();
    let mut rows = Vec::with_capacity(row_count);
    for i in 0..row_count {
        let mut row = IndexMap::new();
        row.insert("name".to_string(), Value::owned(format!("User {}", i)));
        row.insert(
            "email".to_string(),
            Value::owned(format!("user{}@example.com", i)),
        );
        row.insert("age".to_string(), Value::Int(20 + (i as i64 % 60)));
        row.insert("price".to_string(), Value::Float(9.99 + i as f64 * 0.01));
        row.insert("active".to_string(), Value::Bool(i % 3 != 0));
        row.insert(
            "created_at".to_string(),
            Value::DateTime(base + chrono::Duration::seconds(i as i64)),
        );
        if i % 10 == 0 {
            row.insert("bio".to_string(), Value::Null);
        } else {
            row.insert(
                "bio".to_string(),
                Value::owned(format!(
                    "A longer description field that contains commas, \"quotes\", and O'Brien-style apostrophes for row {}.",
                    i
                )),
            );
        }
        rows.push(row);
    }
    Dataset::new(rows)
}

fn bench_file_formats(c: &mut Criterion) {
    let mut group = c.benchmark_group("output/formats");

    for row_count in [100, 1000, 10_000] {
        let data = make_dataset(row_count);
        group.throughput(Throughput::Elements(row_count as u64));
        group.bench_with_input(BenchmarkId::new("csv", row_count), &data, |b, data| {
            b.iter(|| csv::write_csv(NullWriter, data).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("json", row_count), &data, |b, data| {
            b.iter(|| {
                let mut w = NullWriter;
                json::write_json(&mut w, data).unwrap();
            });
        });
        group.bench_with_input(BenchmarkId::new("xml", row_count), &data, |b, data| {
            b.iter(|| xml::write_xml(NullWriter, data, "users").unwrap());
        });
        group.bench_with_input(BenchmarkId::new("spreadsheet", row_count), &data, |b, data| {
            b.iter(|| spreadsheet::write_spreadsheet(NullWriter, data, "users").unwrap());
        });
    }
    group.finish();
}

fn bench_inserts(c: &mut Criterion) {
    let mut group = c.benchmark_group("output/inserts");
    let data = make_dataset(1000);
    group.throughput(Throughput::Elements(1000));

    for dialect in Dialect::ALL {
        group.bench_with_input(BenchmarkId::new("dialect", dialect), &data, |b, data| {
            b.iter(|| render_inserts("users", dialect, data).unwrap());
        });
    }
    group.finish();
}

fn bench_code(c: &mut Criterion) {
    let mut group = c.benchmark_group("output/code");
    let data = make_dataset(1000);
    group.throughput(Throughput::Elements(1000));

    for language in Language::ALL {
        group.bench_with_input(BenchmarkId::new("language", language), &data, |b, data| {
            b.iter(|| render_code(data, language).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_file_formats, bench_inserts, bench_code);
criterion_main!(benches);
