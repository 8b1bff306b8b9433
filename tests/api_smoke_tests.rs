use chrono::NaiveDate;
use timeline_rs::api::{InvalidationLevel, InvalidationTopic, TimelineDataset};
use timeline_rs::core::primitives::midnight;
use timeline_rs::core::{WorkCenterId, WorkOrder, WorkOrderId, ZoomLevel, ZoomScaleTable};
use timeline_rs::{TimelineEngine, TimelineEngineConfig, TimelineError};

const SAMPLE_DOCUMENTS: &str = include_str!("fixtures/sample_documents.json");

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).expect("valid date")
}

fn january_day_engine() -> TimelineEngine {
    let dataset = TimelineDataset::from_json_compat_str(SAMPLE_DOCUMENTS).expect("sample parses");
    let config =
        TimelineEngineConfig::new(d(2025, 1, 1), d(2025, 1, 31)).with_zoom(ZoomLevel::Day);
    TimelineEngine::with_dataset(config, dataset).expect("engine init")
}

#[test]
fn engine_default_config_builds_the_three_year_month_grid() {
    let mut engine = TimelineEngine::new(TimelineEngineConfig::default()).expect("engine init");

    assert_eq!(engine.zoom(), ZoomLevel::Month);
    assert_eq!(engine.columns().len(), 36);
    assert_eq!(engine.total_width_px(), 36 * 180);

    assert!(engine.set_zoom(ZoomLevel::Day));
    assert_eq!(engine.columns().len(), 366 + 365 + 365);
    assert_eq!(engine.total_width_px(), 1096 * 140);
}

#[test]
fn unknown_zoom_name_falls_back_to_month() {
    let config =
        TimelineEngineConfig::new(d(2025, 1, 1), d(2025, 1, 31)).with_zoom(ZoomLevel::Week);
    let mut engine = TimelineEngine::new(config).expect("engine init");

    assert!(engine.set_zoom_by_name("fortnight"));
    assert_eq!(engine.zoom(), ZoomLevel::Month);
    assert!(engine.set_zoom_by_name(" Hour "));
    assert_eq!(engine.zoom(), ZoomLevel::Hour);
}

#[test]
fn invalid_configuration_is_rejected() {
    let inverted = TimelineEngineConfig::new(d(2025, 2, 1), d(2025, 1, 1));
    assert!(matches!(
        TimelineEngine::new(inverted),
        Err(TimelineError::InvalidCalendarBounds { .. })
    ));

    let negative_margin = TimelineEngineConfig::default().with_scroll_reveal_margin_px(-1.0);
    assert!(matches!(
        TimelineEngine::new(negative_margin),
        Err(TimelineError::InvalidConfig(_))
    ));

    let mut engine = TimelineEngine::new(TimelineEngineConfig::default()).expect("engine init");
    assert!(
        engine
            .set_calendar_bounds(d(2026, 1, 1), d(2025, 1, 1))
            .is_err()
    );
    assert_eq!(engine.config().calendar_start, d(2024, 1, 1));
}

#[test]
fn frame_describes_lanes_bars_and_markers() {
    let mut engine = january_day_engine();
    let frame = engine.build_frame(Some(midnight(d(2025, 1, 12)) + chrono::Duration::hours(12)));

    assert_eq!(frame.zoom, ZoomLevel::Day);
    assert_eq!(frame.columns.len(), 31);
    assert_eq!(frame.total_width_px, 31.0 * 140.0);
    assert_eq!(frame.lanes.len(), 9);
    assert_eq!(frame.bar_count(), 8);
    assert_eq!(frame.today_offset_px, Some(11.5 * 140.0));
    assert!(frame.selected_column_badge.is_none());

    let lane = frame.lane(&WorkCenterId::new("wc-1")).expect("wc-1 lane");
    assert_eq!(lane.name, "Genesis Hardware");
    let bars: Vec<(&str, f64, f64)> = lane
        .bars
        .iter()
        .map(|bar| (bar.id.as_str(), bar.left_px, bar.width_px))
        .collect();
    assert_eq!(
        bars,
        vec![("wo-1", 9.0 * 140.0, 5.0 * 140.0), ("wo-6", 15.0 * 140.0, 3.0 * 140.0)]
    );
    assert!(lane.bars[0].tooltip.starts_with("Aluminum Extrusion Batch 42\nStatus: In progress"));
    assert!(frame.lane(&WorkCenterId::new("wc-6")).is_some_and(|lane| lane.bars.is_empty()));
}

#[test]
fn drilled_frame_carries_the_period_badge() {
    let mut engine = january_day_engine();
    engine.toggle_column(11);
    engine.navigate_orders(1);
    engine.toggle_menu(&WorkOrderId::new("wo-2"));

    let frame = engine.build_frame(None);
    let badge = frame.selected_column_badge.as_ref().expect("badge");
    assert_eq!(badge.label, "Current day");
    assert_eq!(badge.center_px, 11.0 * 140.0 + 70.0);
    assert_eq!(frame.columns.iter().filter(|column| column.selected).count(), 1);
    assert!(frame.columns[11].selected);

    let mut ids: Vec<&str> = frame
        .lanes
        .iter()
        .flat_map(|lane| lane.bars.iter().map(|bar| bar.id.as_str()))
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, vec!["wo-1", "wo-2", "wo-3"]);

    let bars: Vec<_> = frame.lanes.iter().flat_map(|lane| lane.bars.iter()).collect();
    assert!(bars.iter().any(|bar| bar.id.as_str() == "wo-1" && bar.focused));
    assert!(bars.iter().any(|bar| bar.id.as_str() == "wo-2" && bar.menu_open));
    assert!(frame.today_offset_px.is_none());

    let json = frame.to_json_pretty().expect("frame json");
    assert!(json.contains("\"selected_column_badge\""));
    assert!(json.contains("\"Current day\""));
}

#[test]
fn scroll_to_date_centres_the_column_and_is_idempotent() {
    let mut engine = january_day_engine();
    engine.set_viewport_width(700.0);
    engine.take_pending_invalidation();

    let offset = engine.scroll_to_date(d(2025, 1, 15));
    assert_eq!(offset, 14.0 * 140.0 - 350.0 + 70.0);
    assert!(
        engine
            .take_pending_invalidation()
            .has_topic(InvalidationTopic::Scroll)
    );

    assert_eq!(engine.scroll_to_date(d(2025, 1, 15)), offset);
    assert!(!engine.has_pending_invalidation());

    // Off-grid dates centre the last column, clamped to the scroll range.
    let last = engine.scroll_to_date(d(2030, 1, 1));
    assert_eq!(last, 31.0 * 140.0 - 700.0);
}

#[test]
fn scroll_offsets_stay_inside_the_grid() {
    let mut engine = january_day_engine();
    engine.set_viewport_width(1_000.0);

    engine.set_scroll_offset(-50.0);
    assert_eq!(engine.scroll_offset_px(), 0.0);
    engine.set_scroll_offset(1e9);
    assert_eq!(engine.scroll_offset_px(), 31.0 * 140.0 - 1_000.0);

    engine.set_viewport_width(10_000.0);
    assert_eq!(engine.scroll_offset_px(), 0.0);
}

#[test]
fn invalidation_levels_follow_the_changed_input() {
    let mut engine = january_day_engine();
    assert_eq!(engine.take_pending_invalidation().level(), InvalidationLevel::Full);
    assert!(!engine.has_pending_invalidation());

    engine.focus_order(Some(WorkOrderId::new("wo-3")));
    assert_eq!(engine.take_pending_invalidation().level(), InvalidationLevel::Selection);

    let orders = engine.work_orders().to_vec();
    engine.set_work_orders(orders).expect("valid orders");
    let pending = engine.take_pending_invalidation();
    assert_eq!(pending.level(), InvalidationLevel::Layout);
    assert!(pending.has_topic(InvalidationTopic::WorkOrders));

    engine
        .set_calendar_bounds(d(2025, 1, 1), d(2025, 2, 28))
        .expect("valid bounds");
    assert_eq!(engine.take_pending_invalidation().level(), InvalidationLevel::Full);
    assert_eq!(engine.columns().len(), 59);
}

#[test]
fn layout_is_cached_until_an_input_changes() {
    let mut engine = january_day_engine();
    let first = engine.layout();
    let second = engine.layout();
    assert!(std::sync::Arc::ptr_eq(&first, &second));

    let stats = engine.layout_cache_stats();
    assert_eq!((stats.hits, stats.misses), (1, 1));
    assert_eq!(stats.lanes, 9);

    engine.set_zoom(ZoomLevel::Week);
    let rezoomed = engine.layout();
    assert!(!std::sync::Arc::ptr_eq(&first, &rezoomed));

    let forced = engine.invalidate();
    assert!(!std::sync::Arc::ptr_eq(&rezoomed, &forced));
    assert_eq!(*engine.layout_uncached().lane_names(), *forced.lane_names());
}

#[test]
fn bounds_change_drops_a_column_that_no_longer_exists() {
    let mut engine = january_day_engine();
    engine.toggle_column(30);
    engine
        .set_calendar_bounds(d(2025, 1, 1), d(2025, 1, 15))
        .expect("valid bounds");
    assert!(engine.selection().selected_column().is_none());

    engine.toggle_column(3);
    engine
        .set_calendar_bounds(d(2025, 1, 1), d(2025, 1, 20))
        .expect("valid bounds");
    assert!(engine.selection().selected_column().is_some());
}

#[test]
fn wider_scale_widens_columns_and_bars() {
    let mut engine = january_day_engine();
    let order = WorkOrder::new("probe", "wc-1", d(2025, 1, 2), d(2025, 1, 2)).expect("valid order");
    assert_eq!(engine.order_width_px(&order), 140.0);

    let scale = ZoomScaleTable::CANONICAL
        .with_column_width(ZoomLevel::Day, 200)
        .expect("valid override");
    engine.set_scale(scale).expect("valid scale");

    assert_eq!(engine.total_width_px(), 31 * 200);
    assert_eq!(engine.order_left_position(&order), 200.0);
    assert_eq!(engine.order_width_px(&order), 200.0);
    assert_eq!(engine.date_from_position(450.0), d(2025, 1, 3));
    assert_eq!(engine.column_index_at(450.0), Some(2));
}
