use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gcp_daily_reporter::discord::build_discord_payload;
use gcp_daily_reporter::parsing::summarize;
use gcp_daily_reporter::{CostLineItem, CostReport, ResourceUsage};

fn summarize_benchmark(c: &mut Criterion) {
    // A day of one-minute samples across a few instances
    let values: Vec<f64> = (0..1440 * 8).map(|i| (i % 100) as f64 / 100.0).collect();

    c.bench_function("summarize", |b| {
        b.iter(|| black_box(summarize(black_box(&values))))
    });
}

fn payload_benchmark(c: &mut Criterion) {
    let items: Vec<CostLineItem> = (0..10)
        .map(|i| CostLineItem {
            service: format!("Service {}", i),
            sku: format!("SKU {}", i),
            cost: 100.0 / (i + 1) as f64,
        })
        .collect();
    let cost = CostReport::from_items(items);
    let usage = ResourceUsage {
        cpu: summarize(&[0.2, 0.4, 0.9]),
        storage: summarize(&[1073741824.0, 2147483648.0]),
        sql_memory: summarize(&[55.0, 60.0]),
    };
    let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

    c.bench_function("build_discord_payload", |b| {
        b.iter(|| black_box(build_discord_payload(black_box(&cost), black_box(&usage), date)))
    });
}

criterion_group!(benches, summarize_benchmark, payload_benchmark);
criterion_main!(benches);
