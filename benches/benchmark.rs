use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use semtypes::dataitem::DataItemKind;
use semtypes::factory::new_type_id_value;
use semtypes::language::LanguageTables;
use semtypes::registry::TypeRegistry;

fn lookups(c: &mut Criterion) {
    let registry = TypeRegistry::new(&LanguageTables::english());
    c.bench_function("find_type_id by label", |b| {
        b.iter(|| registry.find_type_id(black_box("Telephone number"), true))
    });
    c.bench_function("find_type_id by alias", |b| {
        b.iter(|| registry.find_type_id(black_box("Integer"), true))
    });
    c.bench_function("data_item_id", |b| b.iter(|| registry.data_item_id(black_box("_wpg"))));
    c.bench_function("default_data_item_type_id", |b| {
        b.iter(|| registry.default_data_item_type_id(black_box(DataItemKind::Number)))
    });
}

fn values(c: &mut Criterion) {
    let registry = TypeRegistry::new(&LanguageTables::english());
    c.bench_function("new_type_id_value number", |b| {
        b.iter(|| new_type_id_value(&registry, "_num", black_box("1,234.5")))
    });
    c.bench_function("new_type_id_value page", |b| {
        b.iter(|| new_type_id_value(&registry, "_wpg", black_box("Category:Some page")))
    });
}

criterion_group!(benches, lookups, values);
criterion_main!(benches);
