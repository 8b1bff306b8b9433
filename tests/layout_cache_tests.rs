use std::sync::Arc;

use chrono::NaiveDate;
use timeline_rs::api::{GridLayoutCache, GridLayoutSnapshot, LayoutInputs};
use timeline_rs::core::{TimelineGrid, WorkCenter, WorkCenterId, WorkOrder, ZoomLevel, ZoomScaleTable};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).expect("valid date")
}

fn centers() -> Vec<WorkCenter> {
    vec![
        WorkCenter::new("wc-1", "Genesis Hardware"),
        WorkCenter::new("wc-2", "Rodriques Electrics"),
    ]
}

fn orders() -> Vec<WorkOrder> {
    vec![
        WorkOrder::new("wo-1", "wc-1", d(2025, 1, 10), d(2025, 1, 14)).expect("valid order"),
        WorkOrder::new("wo-2", "wc-2", d(2025, 1, 11), d(2025, 1, 13)).expect("valid order"),
        WorkOrder::new("wo-3", "wc-9", d(2025, 2, 1), d(2025, 2, 3)).expect("valid order"),
    ]
}

fn day_grid() -> TimelineGrid {
    TimelineGrid::generate(
        d(2025, 1, 1),
        d(2025, 3, 31),
        ZoomLevel::Day,
        ZoomScaleTable::CANONICAL,
    )
}

fn inputs<'a>(
    orders: &'a [WorkOrder],
    centers: &'a [WorkCenter],
    grid: &'a TimelineGrid,
) -> LayoutInputs<'a> {
    LayoutInputs {
        orders,
        orders_revision: 1,
        work_centers: centers,
        centers_revision: 1,
        grid,
        drill_column: None,
    }
}

fn visible_ids(snapshot: &GridLayoutSnapshot) -> Vec<&str> {
    snapshot.flat_orders().map(|order| order.id.as_str()).collect()
}

#[test]
fn lanes_list_catalog_centers_then_placeholders() {
    let (orders, centers, grid) = (orders(), centers(), day_grid());
    let snapshot = GridLayoutSnapshot::build(&inputs(&orders, &centers, &grid));

    let ids: Vec<&str> = snapshot.lane_names().keys().map(WorkCenterId::as_str).collect();
    assert_eq!(ids, vec!["wc-1", "wc-2", "wc-9"]);
    assert_eq!(
        snapshot.lane_name(&WorkCenterId::new("wc-1")),
        Some("Genesis Hardware")
    );
    assert_eq!(
        snapshot.lane_name(&WorkCenterId::new("wc-9")),
        Some("Center wc-9")
    );
    assert_eq!(snapshot.visible_order_count(), 3);
    assert!(
        snapshot
            .visible_orders(&WorkCenterId::new("wc-404"))
            .is_empty()
    );
}

#[test]
fn centers_without_orders_still_get_a_lane() {
    let centers = centers();
    let grid = day_grid();
    let snapshot = GridLayoutSnapshot::build(&inputs(&[], &centers, &grid));

    assert_eq!(snapshot.lane_names().len(), 2);
    assert_eq!(snapshot.lanes().count(), 2);
    assert_eq!(snapshot.visible_order_count(), 0);
}

#[test]
fn unchanged_inputs_return_the_same_snapshot() {
    let (orders, centers, grid) = (orders(), centers(), day_grid());
    let mut cache = GridLayoutCache::new();

    let first = cache.refresh(&inputs(&orders, &centers, &grid));
    let second = cache.refresh(&inputs(&orders, &centers, &grid));

    assert!(Arc::ptr_eq(&first, &second));
    let stats = cache.stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.lanes, 3);
    assert_eq!(stats.visible_orders, 3);
}

#[test]
fn each_input_change_rebuilds() {
    let (orders, centers, grid) = (orders(), centers(), day_grid());
    let mut cache = GridLayoutCache::new();
    let base = cache.refresh(&inputs(&orders, &centers, &grid));

    let mut bumped_orders = inputs(&orders, &centers, &grid);
    bumped_orders.orders_revision = 2;
    let after_orders = cache.refresh(&bumped_orders);
    assert!(!Arc::ptr_eq(&base, &after_orders));

    let mut bumped_centers = bumped_orders;
    bumped_centers.centers_revision = 2;
    let after_centers = cache.refresh(&bumped_centers);
    assert!(!Arc::ptr_eq(&after_orders, &after_centers));

    let week = TimelineGrid::generate(
        d(2025, 1, 1),
        d(2025, 3, 31),
        ZoomLevel::Week,
        ZoomScaleTable::CANONICAL,
    );
    let mut rezoomed = bumped_centers;
    rezoomed.grid = &week;
    let after_zoom = cache.refresh(&rezoomed);
    assert!(!Arc::ptr_eq(&after_centers, &after_zoom));

    let mut drilled = rezoomed;
    drilled.drill_column = week.column(1);
    let after_drill = cache.refresh(&drilled);
    assert!(!Arc::ptr_eq(&after_zoom, &after_drill));

    assert_eq!(cache.stats().misses, 5);
    assert_eq!(cache.stats().hits, 0);
}

#[test]
fn forced_invalidation_always_rebuilds() {
    let (orders, centers, grid) = (orders(), centers(), day_grid());
    let mut cache = GridLayoutCache::new();
    let first = cache.refresh(&inputs(&orders, &centers, &grid));
    let forced = cache.invalidate(&inputs(&orders, &centers, &grid));

    assert!(!Arc::ptr_eq(&first, &forced));
    assert_eq!(*first, *forced);
    let current = cache.snapshot().expect("snapshot after invalidate");
    assert!(Arc::ptr_eq(&current, &forced));

    cache.clear();
    assert!(cache.snapshot().is_none());
    assert_eq!(cache.stats().lanes, 0);
}

#[test]
fn drilled_day_column_shows_only_intersecting_orders() {
    let (orders, centers, grid) = (orders(), centers(), day_grid());
    let mut drilled = inputs(&orders, &centers, &grid);

    // Jan 12 lies inside wo-1 and wo-2.
    drilled.drill_column = grid.column(11);
    let snapshot = GridLayoutSnapshot::build(&drilled);
    assert_eq!(visible_ids(&snapshot), vec!["wo-1", "wo-2"]);
    assert_eq!(snapshot.lane_names().len(), 3);

    // wo-1 ends on Jan 14, so Jan 15 is empty.
    drilled.drill_column = grid.column(14);
    let snapshot = GridLayoutSnapshot::build(&drilled);
    assert!(visible_ids(&snapshot).is_empty());
}

#[test]
fn drilled_month_column_filters_by_whole_month() {
    let (orders, centers) = (orders(), centers());
    let grid = TimelineGrid::generate(
        d(2025, 1, 1),
        d(2025, 12, 31),
        ZoomLevel::Month,
        ZoomScaleTable::CANONICAL,
    );
    let mut drilled = inputs(&orders, &centers, &grid);
    drilled.drill_column = grid.column(1);

    let snapshot = GridLayoutSnapshot::build(&drilled);
    assert_eq!(visible_ids(&snapshot), vec!["wo-3"]);
    assert_eq!(
        snapshot.visible_orders(&WorkCenterId::new("wc-9")).len(),
        1
    );
}

#[test]
fn orders_outside_the_calendar_are_hidden() {
    let centers = centers();
    let orders = vec![
        WorkOrder::new("early", "wc-1", d(2024, 6, 1), d(2024, 6, 5)).expect("valid order"),
        WorkOrder::new("edge", "wc-1", d(2024, 12, 30), d(2025, 1, 1)).expect("valid order"),
    ];
    let grid = day_grid();
    let snapshot = GridLayoutSnapshot::build(&inputs(&orders, &centers, &grid));

    assert_eq!(visible_ids(&snapshot), vec!["edge"]);
}
