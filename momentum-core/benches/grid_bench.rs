//! Criterion benchmarks for the dashboard's hot paths.
//!
//! Benchmarks:
//! 1. Column and row construction over a year of history
//! 2. Table render plus filter
//! 3. Composed chart figure for one stock

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use chrono::NaiveDate;
use momentum_core::chart::{compose_price_figure, ChartOptions};
use momentum_core::domain::{IndicatorSeries, MomentumEntry, MomentumHistory, PriceSeries, StockPrices};
use momentum_core::grid::{build_columns, build_rows, SortOrder};
use momentum_core::table::{render, RenderOptions};

// ── Helpers ──────────────────────────────────────────────────────────

fn make_history(days: usize, stocks: usize) -> MomentumHistory {
    let base = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
    let mut h = MomentumHistory::new();
    for day in 0..days {
        let date = base + chrono::Duration::days(day as i64);
        for s in 0..stocks {
            h.insert(
                date,
                format!("{}", 1000 + s),
                MomentumEntry {
                    stock_name: format!("Stock {s}"),
                    momentum: ((day * 7 + s * 13) % 200) as f64 / 10.0 - 10.0,
                    days: Some((day % 9) as u32),
                },
            );
        }
    }
    h
}

fn make_stock(n: usize) -> StockPrices {
    let base = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
    let dates = (0..n).map(|i| base + chrono::Duration::days(i as i64)).collect();
    let close: Vec<f64> = (0..n).map(|i| 100.0 + (i as f64 * 0.1).sin() * 10.0).collect();
    let open = close.iter().map(|c| c - 0.3).collect();
    let high = close.iter().map(|c| c + 1.5).collect();
    let low = close.iter().map(|c| c - 1.5).collect();
    StockPrices {
        name: Some("Bench".into()),
        prices: PriceSeries::new(dates, open, high, low, close, vec![1e6; n]).unwrap(),
        indicators: Some(IndicatorSeries {
            dates: None,
            macd: Some(vec![0.5; n]),
            signal: Some(vec![0.4; n]),
            histogram: Some(vec![0.1; n]),
            rsi: Some(vec![55.0; n]),
        }),
    }
}

// ── 1. Grid ──────────────────────────────────────────────────────────

fn bench_grid(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid");
    for stocks in [50usize, 500] {
        let history = make_history(250, stocks);
        group.bench_with_input(BenchmarkId::new("build", stocks), &history, |b, h| {
            b.iter(|| {
                let cols = build_columns(black_box(h), 5);
                build_rows(h, &cols, SortOrder::Desc)
            })
        });
    }
    group.finish();
}

// ── 2. Table ─────────────────────────────────────────────────────────

fn bench_table(c: &mut Criterion) {
    let history = make_history(60, 500);
    let cols = build_columns(&history, 5);
    let rows = build_rows(&history, &cols, SortOrder::Desc);
    let options = RenderOptions::default();

    let mut group = c.benchmark_group("table");
    group.bench_function("render_500x65", |b| {
        b.iter(|| render(black_box(&rows), &cols, &options, |_| true))
    });
    group.bench_function("render_and_filter", |b| {
        b.iter(|| {
            let mut view = render(&rows, &cols, &options, |_| true);
            view.apply_filter(black_box("stock 4"));
            view.visible_count()
        })
    });
    group.finish();
}

// ── 3. Chart ─────────────────────────────────────────────────────────

fn bench_chart(c: &mut Criterion) {
    let stock = make_stock(250);
    let options = ChartOptions {
        show_volume: true,
        ..ChartOptions::default()
    };
    c.bench_function("compose_price_figure_90d", |b| {
        b.iter(|| compose_price_figure("BENCH", Some(black_box(&stock)), &options))
    });
}

criterion_group!(benches, bench_grid, bench_table, bench_chart);
criterion_main!(benches);
