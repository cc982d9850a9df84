#![allow(missing_docs)]

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use wiremap::{Wiremap, WireObject};

#[derive(Debug, Clone, PartialEq, Default, WireObject)]
struct BenchItem {
    #[wire(name = "L_NAME{I}")]
    name: String,
    #[wire(name = "L_AMT{I}", format = "0.00")]
    amount: f64,
    #[wire(name = "L_QTY{I}")]
    quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Default, WireObject)]
struct BenchOrder {
    #[wire(name = "METHOD", order = -2, write_default)]
    method: String,
    #[wire(name = "TOKEN")]
    token: String,
    #[wire(name = "AMT", format = "0.00")]
    amount: f64,
    #[wire(pattern = r"^L_(?:NAME|AMT|QTY)(?<I>\d+)$", key = "I", order = 1)]
    items: Vec<BenchItem>,
}

fn generate_order(count: usize) -> BenchOrder {
    let items = (0..count)
        .map(|i| BenchItem {
            name: format!("Item number {i}"),
            amount: i as f64 + 0.5,
            quantity: (i % 7) as i64 + 1,
        })
        .collect();
    BenchOrder {
        method: "SetExpressCheckout".into(),
        token: "EC-BENCH".into(),
        amount: 1234.5,
        items,
    }
}

fn bench_save(c: &mut Criterion) {
    let mut group = c.benchmark_group("save");
    for count in [10usize, 100, 1000] {
        let order = generate_order(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_function(format!("items_{count}"), |b| {
            b.iter(|| Wiremap::save(black_box(&order)).expect("save"));
        });
    }
    group.finish();
}

fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("load");
    for count in [10usize, 100, 1000] {
        let wire = Wiremap::save(&generate_order(count)).expect("save");
        group.throughput(Throughput::Elements(count as u64));
        group.bench_function(format!("items_{count}"), |b| {
            b.iter(|| Wiremap::load::<BenchOrder>(black_box(&wire)).expect("load"));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_save, bench_load);
criterion_main!(benches);
