use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;

use supplier_catalog::{Product, Sku, StockRequest, reconcile};

fn catalog(size: usize) -> Vec<Product> {
    (0..size)
        .map(|i| {
            let sku = Sku::parse(&format!("SKU{i:05}")).unwrap();
            Product::new(sku, "bench item", Decimal::new(199, 2), 1_000).unwrap()
        })
        .collect()
}

fn requests(size: usize, lines: usize) -> Vec<StockRequest> {
    (0..lines)
        .map(|i| StockRequest::new(Sku::parse(&format!("SKU{:05}", (i * 7) % size)).unwrap(), 3))
        .collect()
}

fn bench_reconcile(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconcile");
    let products = catalog(1_000);

    for lines in [1usize, 10, 100] {
        let reqs = requests(products.len(), lines);
        group.throughput(Throughput::Elements(lines as u64));
        group.bench_with_input(BenchmarkId::new("lines", lines), &reqs, |b, reqs| {
            b.iter(|| reconcile(black_box(&products), black_box(reqs)))
        });
    }

    let mut short = requests(products.len(), 100);
    short[50].quantity = 5_000;
    group.bench_function("rejected_100_lines", |b| {
        b.iter(|| reconcile(black_box(&products), black_box(&short)))
    });

    group.finish();
}

criterion_group!(benches, bench_reconcile);
criterion_main!(benches);
