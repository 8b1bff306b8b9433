use chrono::{Duration, NaiveDate};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use timeline_rs::api::{GridLayoutCache, LayoutInputs};
use timeline_rs::core::{
    TimelineGrid, WorkCenter, WorkOrder, ZoomLevel, ZoomScaleTable, date_from_position,
    date_position, overlaps,
};
use timeline_rs::{TimelineEngine, TimelineEngineConfig};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).expect("valid date")
}

fn generated_orders(count: usize, centers: usize) -> Vec<WorkOrder> {
    let origin = d(2024, 1, 1);
    (0..count)
        .map(|i| {
            let lane = i % centers;
            let slot = (i / centers) as i64;
            let start = origin + Duration::days(slot * 6);
            let end = start + Duration::days(3);
            WorkOrder::new(format!("wo-{i}"), format!("wc-{lane}"), start, end)
                .expect("valid generated order")
                .with_name(format!("Order {i}"))
        })
        .collect()
}

fn bench_day_grid_round_trip(c: &mut Criterion) {
    let grid = TimelineGrid::generate(
        d(2024, 1, 1),
        d(2026, 12, 31),
        ZoomLevel::Day,
        ZoomScaleTable::CANONICAL,
    );

    c.bench_function("day_grid_round_trip", |b| {
        b.iter(|| {
            let px = date_position(black_box(d(2025, 7, 14)), &grid);
            let _ = date_from_position(black_box(px), &grid);
        })
    });
}

fn bench_month_grid_generation(c: &mut Criterion) {
    c.bench_function("month_grid_generation_3y", |b| {
        b.iter(|| {
            let _ = TimelineGrid::generate(
                black_box(d(2024, 1, 1)),
                black_box(d(2026, 12, 31)),
                ZoomLevel::Month,
                ZoomScaleTable::CANONICAL,
            );
        })
    });
}

fn bench_overlap_scan_2k(c: &mut Criterion) {
    let orders = generated_orders(2_000, 9);
    let candidate = WorkOrder::new("candidate", "wc-4", d(2026, 6, 1), d(2026, 6, 3))
        .expect("valid candidate");

    c.bench_function("overlap_scan_2k", |b| {
        b.iter(|| {
            let _ = overlaps(black_box(&candidate), black_box(&orders), None);
        })
    });
}

fn bench_layout_rebuild_2k(c: &mut Criterion) {
    let orders = generated_orders(2_000, 9);
    let centers: Vec<WorkCenter> = (0..9)
        .map(|i| WorkCenter::new(format!("wc-{i}"), format!("Center {i}")))
        .collect();
    let grid = TimelineGrid::generate(
        d(2024, 1, 1),
        d(2026, 12, 31),
        ZoomLevel::Week,
        ZoomScaleTable::CANONICAL,
    );
    let mut cache = GridLayoutCache::new();

    c.bench_function("layout_rebuild_2k", |b| {
        b.iter(|| {
            let inputs = LayoutInputs {
                orders: &orders,
                orders_revision: 1,
                work_centers: &centers,
                centers_revision: 1,
                grid: &grid,
                drill_column: None,
            };
            let _ = cache.invalidate(black_box(&inputs));
        })
    });
}

fn bench_engine_frame_json_2k(c: &mut Criterion) {
    let mut engine =
        TimelineEngine::new(TimelineEngineConfig::default().with_zoom(ZoomLevel::Week))
            .expect("engine init");
    engine
        .set_work_orders(generated_orders(2_000, 9))
        .expect("valid orders");

    c.bench_function("engine_frame_json_2k", |b| {
        b.iter(|| {
            let _ = engine
                .build_frame(None)
                .to_json_pretty()
                .expect("frame json should succeed");
        })
    });
}

criterion_group!(
    benches,
    bench_day_grid_round_trip,
    bench_month_grid_generation,
    bench_overlap_scan_2k,
    bench_layout_rebuild_2k,
    bench_engine_frame_json_2k
);
criterion_main!(benches);
