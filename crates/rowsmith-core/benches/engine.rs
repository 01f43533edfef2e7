//! Benchmarks for the generation engine.
//!
//! Measures rows-per-second throughput for `DatasetGenerator::generate`
//! across row counts, field counts, and the uniqueness policy.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use rowsmith_core::generate::custom::{CustomTypes, ValueListGenerator};
use rowsmith_core::schema::{FieldSpec, FieldType, Schema};
use rowsmith_core::{DatasetGenerator, GenerationOptions};
use rowsmith_testutil::{all_types_schema, device_schema, int_field, unique};

fn seeded() -> DatasetGenerator {
    DatasetGenerator::new(GenerationOptions::default().with_seed(42))
}

/// A schema of N fields cycling through the cheap built-in types.
fn wide_schema(num_fields: usize) -> Schema {
    let types = [
        FieldType::String,
        FieldType::Int,
        FieldType::Float,
        FieldType::Boolean,
        FieldType::DateTime,
        FieldType::Email,
        FieldType::Phone,
        FieldType::Uuid,
        FieldType::Ip,
        FieldType::Time,
    ];
    let fields = (0..num_fields)
        .map(|i| FieldSpec::new(format!("f{}", i), types[i % types.len()].clone()))
        .collect();
    Schema::new(fields)
}

fn bench_device_table(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine/device");
    let schema = device_schema();
    let generator = seeded();

    for row_count in [100, 1000, 10_000] {
        group.throughput(Throughput::Elements(row_count as u64));
        group.bench_with_input(BenchmarkId::new("rows", row_count), &row_count, |b, &rows| {
            b.iter(|| {
                generator.generate(&schema, rows).unwrap();
            });
        });
    }
    group.finish();
}

fn bench_field_count(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine/field_count");
    let row_count = 1000;
    let generator = seeded();

    for field_count in [5, 10, 20] {
        let schema = wide_schema(field_count);
        group.throughput(Throughput::Elements(row_count as u64));
        group.bench_with_input(BenchmarkId::new("fields", field_count), &schema, |b, schema| {
            b.iter(|| {
                generator.generate(schema, row_count).unwrap();
            });
        });
    }
    group.finish();
}

fn bench_all_types(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine/all_types");
    let schema = all_types_schema();
    let generator = seeded();

    group.throughput(Throughput::Elements(1000));
    group.bench_function("1k", |b| {
        b.iter(|| {
            generator.generate(&schema, 1000).unwrap();
        });
    });
    group.finish();
}

fn bench_unique_fill(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine/unique");
    let generator = seeded();

    // Filling most of a small domain forces late rows through many retries.
    for fill in [50, 90] {
        let schema = Schema::new(vec![unique(int_field("id", 1, 1000))]);
        let rows = fill * 10;
        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(BenchmarkId::new("fill_pct", fill), &rows, |b, &rows| {
            b.iter(|| {
                generator.generate(&schema, rows).unwrap();
            });
        });
    }
    group.finish();
}

fn bench_weighted_custom_type(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine/value_list");

    let mut types = CustomTypes::new();
    types.register(
        "color",
        ValueListGenerator::new(
            ["red", "blue", "green", "black", "white"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            Some(vec![0.25, 0.20, 0.20, 0.20, 0.15]),
        )
        .unwrap(),
    );
    let generator = seeded().with_custom_types(types);
    let schema = Schema::new(vec![FieldSpec::new("color", FieldType::parse("color"))]);

    group.throughput(Throughput::Elements(10_000));
    group.bench_function("weighted_10k", |b| {
        b.iter(|| {
            generator.generate(&schema, 10_000).unwrap();
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_device_table,
    bench_field_count,
    bench_all_types,
    bench_unique_fill,
    bench_weighted_custom_type,
);
criterion_main!(benches);
