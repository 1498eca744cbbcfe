use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use productapi_core::ProductId;
use productapi_infra::{InMemoryProductStore, ProductCatalog};
use productapi_products::{NewProduct, Product, sources_conflict};

/// `count` products; every third one is a bundle of the two before it.
fn build_products(count: i64) -> Vec<Product> {
    (1..=count)
        .map(|i| Product {
            id: ProductId::new(i),
            name: format!("Product {i}"),
            price: i as f64,
            source_ids: if i % 3 == 0 {
                vec![ProductId::new(i - 2), ProductId::new(i - 1)]
            } else {
                vec![]
            },
        })
        .collect()
}

fn bench_conflict_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("bundle_conflict_scan");

    for count in [10i64, 100, 1_000, 10_000].iter() {
        let products = build_products(*count);
        // Ids above `count` are never sources, so the scan runs to the end.
        let requested = vec![ProductId::new(count + 1), ProductId::new(count + 2)];

        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::new("miss", count), &products, |b, products| {
            b.iter(|| black_box(sources_conflict(products, &requested)));
        });
    }

    group.finish();
}

fn bench_create_bundle(c: &mut Criterion) {
    let mut group = c.benchmark_group("create_bundle");
    let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");

    for count in [10usize, 100, 1_000].iter() {
        group.bench_with_input(BenchmarkId::new("in_memory", count), count, |b, &count| {
            let catalog = ProductCatalog::new(InMemoryProductStore::new());
            runtime.block_on(async {
                for i in 0..count {
                    catalog
                        .create(NewProduct::new(format!("Product {i}"), 1.0))
                        .await
                        .unwrap();
                }
            });

            b.iter(|| {
                runtime.block_on(async {
                    let first = catalog.create(NewProduct::new("A", 1.0)).await.unwrap();
                    let second = catalog.create(NewProduct::new("B", 2.0)).await.unwrap();
                    black_box(catalog.create_bundle(&[first.id, second.id]).await.unwrap());
                })
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_conflict_scan, bench_create_bundle);
criterion_main!(benches);
