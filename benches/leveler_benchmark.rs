//! Benchmarks for the book leveling hot path

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use orderbook_capture::book::BookLeveler;
use orderbook_capture::parser::{DepthUpdate, RawLevel};
use orderbook_capture::recorder::OutputRow;
use rust_decimal::Decimal;

fn create_update(levels: usize) -> DepthUpdate {
    let bids: Vec<RawLevel> = (0..levels)
        .map(|i| RawLevel {
            price: format!("{}", 50_000 - i as i64),
            size: "1.5".to_string(),
        })
        .collect();

    let asks: Vec<RawLevel> = (0..levels)
        .map(|i| RawLevel {
            price: format!("{}", 50_001 + i as i64),
            size: "1.5".to_string(),
        })
        .collect();

    DepthUpdate {
        event_time: Some(1_672_531_200_000),
        bids,
        asks,
    }
}

fn benchmark_level_update(c: &mut Criterion) {
    let leveler = BookLeveler::new(10, Decimal::from(1_000_000));
    let update = create_update(100);

    c.bench_function("level_100_raw_levels", |b| {
        b.iter(|| leveler.level(black_box(&update)))
    });
}

fn benchmark_parse_and_level(c: &mut Criterion) {
    let leveler = BookLeveler::new(10, Decimal::from(1_000_000));
    let raw = serde_json::json!({
        "E": 1_672_531_200_000u64,
        "b": (0..20).map(|i| [format!("{}", 50_000 - i), "1.5".to_string()]).collect::<Vec<_>>(),
        "a": (0..20).map(|i| [format!("{}", 50_001 + i), "1.5".to_string()]).collect::<Vec<_>>(),
    })
    .to_string();

    c.bench_function("parse_and_level", |b| {
        b.iter(|| {
            let update = DepthUpdate::parse(black_box(&raw)).unwrap();
            leveler.level(&update)
        })
    });
}

fn benchmark_render_row(c: &mut Criterion) {
    let leveler = BookLeveler::new(10, Decimal::from(1_000_000));
    let snapshot = leveler.level(&create_update(100)).unwrap();
    let row = OutputRow::new(
        "1672531200000".to_string(),
        "1672531200000".to_string(),
        snapshot,
        10,
        1,
    );

    c.bench_function("render_row_fields", |b| b.iter(|| black_box(&row).fields()));
}

criterion_group!(
    benches,
    benchmark_level_update,
    benchmark_parse_and_level,
    benchmark_render_row
);
criterion_main!(benches);
