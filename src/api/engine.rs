use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, trace};

use crate::core::coordinate::{BarGeometry, column_index_at, date_from_position, order_geometry};
use crate::core::overlap::{find_conflicts, overlaps};
use crate::core::{
    DateColumn, TimelineGrid, WorkCenter, WorkCenterId, WorkOrder, WorkOrderId, ZoomLevel,
    ZoomScaleTable,
};
use crate::error::{TimelineError, TimelineResult};

use super::engine_config::TimelineEngineConfig;
use super::frame_builder::{TimelineFrame, build_timeline_frame};
use super::invalidation::{InvalidationMask, InvalidationTopic};
use super::json_contract::TimelineDataset;
use super::layout_cache::{GridLayoutCache, GridLayoutSnapshot, LayoutCacheStats, LayoutInputs};
use super::navigation_target_resolver::{
    clamp_scroll_offset, scroll_offset_for_date, scroll_offset_to_reveal,
};
use super::repository::WorkOrderRepository;
use super::selection::TimelineSelection;

/// Main orchestration facade consumed by host applications.
///
/// `TimelineEngine` owns the current grid, the latest work-center and
/// work-order snapshots, the selection state and the layout cache. Every
/// mutation records an [`InvalidationMask`] topic that the host drains with
/// [`TimelineEngine::take_pending_invalidation`] before painting.
#[derive(Debug)]
pub struct TimelineEngine {
    config: TimelineEngineConfig,
    grid: TimelineGrid,
    work_centers: Vec<WorkCenter>,
    work_orders: Vec<WorkOrder>,
    centers_revision: u64,
    orders_revision: u64,
    layout_cache: GridLayoutCache,
    selection: TimelineSelection,
    pending_invalidation: InvalidationMask,
    scroll_offset_px: f64,
    viewport_width_px: f64,
}

impl TimelineEngine {
    pub fn new(config: TimelineEngineConfig) -> TimelineResult<Self> {
        config.validate()?;
        let grid = Self::generate_grid(&config);
        Ok(Self {
            config,
            grid,
            work_centers: Vec::new(),
            work_orders: Vec::new(),
            centers_revision: 0,
            orders_revision: 0,
            layout_cache: GridLayoutCache::new(),
            selection: TimelineSelection::new(),
            pending_invalidation: InvalidationMask::full(),
            scroll_offset_px: 0.0,
            viewport_width_px: 0.0,
        })
    }

    /// Builds an engine pre-loaded with `dataset`.
    pub fn with_dataset(
        config: TimelineEngineConfig,
        dataset: TimelineDataset,
    ) -> TimelineResult<Self> {
        let mut engine = Self::new(config)?;
        engine.load_dataset(dataset)?;
        Ok(engine)
    }

    fn generate_grid(config: &TimelineEngineConfig) -> TimelineGrid {
        let grid = TimelineGrid::generate(
            config.calendar_start,
            config.calendar_end,
            config.zoom,
            config.scale,
        );
        debug!(
            zoom = %config.zoom,
            start = %config.calendar_start,
            end = %config.calendar_end,
            columns = grid.len(),
            total_width_px = grid.total_width_px(),
            "generated timeline grid"
        );
        grid
    }

    fn regenerate_grid(&mut self, topic: InvalidationTopic) {
        self.grid = Self::generate_grid(&self.config);
        self.scroll_offset_px =
            clamp_scroll_offset(self.scroll_offset_px, &self.grid, self.viewport_width_px);
        self.pending_invalidation.record(topic);
    }

    #[must_use]
    pub fn config(&self) -> &TimelineEngineConfig {
        &self.config
    }

    #[must_use]
    pub fn grid(&self) -> &TimelineGrid {
        &self.grid
    }

    #[must_use]
    pub fn zoom(&self) -> ZoomLevel {
        self.grid.zoom()
    }

    #[must_use]
    pub fn columns(&self) -> &[DateColumn] {
        self.grid.columns()
    }

    #[must_use]
    pub fn total_width_px(&self) -> u32 {
        self.grid.total_width_px()
    }

    #[must_use]
    pub fn work_centers(&self) -> &[WorkCenter] {
        &self.work_centers
    }

    #[must_use]
    pub fn work_orders(&self) -> &[WorkOrder] {
        &self.work_orders
    }

    #[must_use]
    pub fn selection(&self) -> &TimelineSelection {
        &self.selection
    }

    /// Switches zoom, regenerating the grid and clearing the drilled column.
    ///
    /// Returns `false` when `zoom` is already active.
    pub fn set_zoom(&mut self, zoom: ZoomLevel) -> bool {
        if self.config.zoom == zoom {
            return false;
        }
        self.config.zoom = zoom;
        if self.selection.select_column(None) {
            self.pending_invalidation.record(InvalidationTopic::DrillFilter);
        }
        self.regenerate_grid(InvalidationTopic::Zoom);
        true
    }

    /// Parses `name` leniently; unknown names select month zoom.
    pub fn set_zoom_by_name(&mut self, name: &str) -> bool {
        self.set_zoom(ZoomLevel::from_name_lossy(name))
    }

    pub fn set_calendar_bounds(&mut self, start: NaiveDate, end: NaiveDate) -> TimelineResult<()> {
        if start > end {
            return Err(TimelineError::InvalidCalendarBounds { start, end });
        }
        if self.config.calendar_start == start && self.config.calendar_end == end {
            return Ok(());
        }
        self.config.calendar_start = start;
        self.config.calendar_end = end;
        self.regenerate_grid(InvalidationTopic::CalendarBounds);
        self.drop_stale_column_selection();
        Ok(())
    }

    pub fn set_scale(&mut self, scale: ZoomScaleTable) -> TimelineResult<()> {
        let scale = scale.validate()?;
        if self.config.scale == scale {
            return Ok(());
        }
        self.config.scale = scale;
        self.regenerate_grid(InvalidationTopic::Zoom);
        self.drop_stale_column_selection();
        Ok(())
    }

    fn drop_stale_column_selection(&mut self) {
        let stale = self
            .selection
            .selected_column()
            .is_some_and(|column| self.grid.index_of_column_start(column.start).is_none());
        if stale {
            self.selection.select_column(None);
            self.pending_invalidation.record(InvalidationTopic::DrillFilter);
        }
    }

    pub fn set_work_centers(&mut self, work_centers: Vec<WorkCenter>) {
        self.work_centers = work_centers;
        self.centers_revision = self.centers_revision.saturating_add(1);
        self.pending_invalidation.record(InvalidationTopic::WorkCenters);
    }

    /// Replaces the work-order snapshot. Rejects the whole batch if any order
    /// has an inverted range; overlaps are the repository's concern.
    pub fn set_work_orders(&mut self, work_orders: Vec<WorkOrder>) -> TimelineResult<()> {
        for order in &work_orders {
            order.validate()?;
        }
        self.work_orders = work_orders;
        self.orders_revision = self.orders_revision.saturating_add(1);
        if self.selection.retain_orders(&self.work_orders) {
            self.pending_invalidation.record(InvalidationTopic::Focus);
        }
        self.pending_invalidation.record(InvalidationTopic::WorkOrders);
        Ok(())
    }

    pub fn load_dataset(&mut self, dataset: TimelineDataset) -> TimelineResult<()> {
        self.set_work_orders(dataset.work_orders)?;
        self.set_work_centers(dataset.work_centers);
        Ok(())
    }

    /// Reloads the work-order snapshot from `repository`.
    pub fn sync_from_repository<R>(&mut self, repository: &R) -> TimelineResult<()>
    where
        R: WorkOrderRepository + ?Sized,
    {
        self.set_work_orders(repository.get_all())
    }

    fn cache_and_inputs(&mut self) -> (&mut GridLayoutCache, LayoutInputs<'_>) {
        let inputs = LayoutInputs {
            orders: &self.work_orders,
            orders_revision: self.orders_revision,
            work_centers: &self.work_centers,
            centers_revision: self.centers_revision,
            grid: &self.grid,
            drill_column: self.selection.selected_column(),
        };
        (&mut self.layout_cache, inputs)
    }

    /// Current lane indexes; the same `Arc` is returned until an input changes.
    pub fn layout(&mut self) -> Arc<GridLayoutSnapshot> {
        let (cache, inputs) = self.cache_and_inputs();
        cache.refresh(&inputs)
    }

    /// Forces a rebuild of the lane indexes and returns the fresh snapshot.
    pub fn invalidate(&mut self) -> Arc<GridLayoutSnapshot> {
        let (cache, inputs) = self.cache_and_inputs();
        let snapshot = cache.invalidate(&inputs);
        self.pending_invalidation.record(InvalidationTopic::WorkOrders);
        snapshot
    }

    /// Lane indexes computed without touching the cache.
    #[must_use]
    pub fn layout_uncached(&self) -> GridLayoutSnapshot {
        GridLayoutSnapshot::build(&LayoutInputs {
            orders: &self.work_orders,
            orders_revision: self.orders_revision,
            work_centers: &self.work_centers,
            centers_revision: self.centers_revision,
            grid: &self.grid,
            drill_column: self.selection.selected_column(),
        })
    }

    #[must_use]
    pub fn layout_cache_stats(&self) -> LayoutCacheStats {
        self.layout_cache.stats()
    }

    #[must_use]
    pub fn order_geometry(&self, order: &WorkOrder) -> BarGeometry {
        order_geometry(order, &self.grid)
    }

    #[must_use]
    pub fn order_left_position(&self, order: &WorkOrder) -> f64 {
        self.order_geometry(order).left_px
    }

    #[must_use]
    pub fn order_width_px(&self, order: &WorkOrder) -> f64 {
        self.order_geometry(order).width_px
    }

    /// Calendar date under grid pixel `x`, e.g. for "create order here".
    #[must_use]
    pub fn date_from_position(&self, x: f64) -> NaiveDate {
        date_from_position(x, &self.grid)
    }

    #[must_use]
    pub fn column_index_at(&self, x: f64) -> Option<usize> {
        column_index_at(x, &self.grid)
    }

    /// `true` when `candidate` collides with the loaded snapshot.
    #[must_use]
    pub fn overlaps(&self, candidate: &WorkOrder, ignore_id: Option<&WorkOrderId>) -> bool {
        overlaps(candidate, &self.work_orders, ignore_id)
    }

    /// Like [`Self::overlaps`] but names the first blocking order.
    pub fn check_overlap(
        &self,
        candidate: &WorkOrder,
        ignore_id: Option<&WorkOrderId>,
    ) -> TimelineResult<()> {
        match find_conflicts(candidate, &self.work_orders, ignore_id).first() {
            Some(existing) => Err(TimelineError::Overlap {
                candidate: candidate.id.to_string(),
                existing: existing.id.to_string(),
                work_center: candidate.work_center_id.to_string(),
            }),
            None => Ok(()),
        }
    }

    #[must_use]
    pub fn lane_name(&mut self, id: &WorkCenterId) -> Option<String> {
        self.layout().lane_name(id).map(str::to_owned)
    }

    #[must_use]
    pub fn visible_orders(&mut self, id: &WorkCenterId) -> Vec<WorkOrder> {
        self.layout().visible_orders(id).to_vec()
    }

    /// Drills into column `index`, or clears the drill filter if it is already selected.
    pub fn toggle_column(&mut self, index: usize) -> Option<DateColumn> {
        let column = self.grid.column(index)?.clone();
        let selected = self.selection.toggle_column(&column).cloned();
        self.pending_invalidation.record(InvalidationTopic::DrillFilter);
        selected
    }

    /// Treats a header click at pixel `x` as a column toggle.
    pub fn toggle_column_at(&mut self, x: f64) -> Option<DateColumn> {
        let index = self.column_index_at(x)?;
        self.toggle_column(index)
    }

    pub fn navigate_columns(&mut self, delta: isize) -> Option<DateColumn> {
        if self.selection.navigate_columns(delta, self.grid.columns()) {
            self.pending_invalidation.record(InvalidationTopic::DrillFilter);
        }
        self.selection.selected_column().cloned()
    }

    /// Moves focus cyclically and scrolls the newly focused bar into view.
    pub fn navigate_orders(&mut self, delta: isize) -> Option<WorkOrderId> {
        let snapshot = self.layout();
        let before = self.selection.focused_order_id().cloned();
        let focused = self.selection.navigate_orders(delta, &snapshot).cloned();
        if focused != before {
            self.pending_invalidation.record(InvalidationTopic::Focus);
            if let Some(order) = self.selection.focused_order(&snapshot) {
                let left_px = order_geometry(order, &self.grid).left_px;
                self.reveal_position(left_px);
            }
        }
        focused
    }

    /// Called when the grid gains keyboard focus.
    pub fn focus_first_if_none(&mut self) -> Option<WorkOrderId> {
        let snapshot = self.layout();
        if self.selection.focus_first_if_none(&snapshot) {
            self.pending_invalidation.record(InvalidationTopic::Focus);
        }
        self.selection.focused_order_id().cloned()
    }

    pub fn focus_order(&mut self, id: Option<WorkOrderId>) {
        if self.selection.focus_order(id) {
            self.pending_invalidation.record(InvalidationTopic::Focus);
        }
    }

    /// The focused order if it is currently visible.
    pub fn focused_order(&mut self) -> Option<WorkOrder> {
        let snapshot = self.layout();
        self.selection.focused_order(&snapshot).cloned()
    }

    pub fn toggle_menu(&mut self, id: &WorkOrderId) -> Option<WorkOrderId> {
        let open = self.selection.toggle_menu(id).cloned();
        self.pending_invalidation.record(InvalidationTopic::Focus);
        open
    }

    pub fn close_menu(&mut self) {
        if self.selection.close_menu() {
            self.pending_invalidation.record(InvalidationTopic::Focus);
        }
    }

    /// Clears focus, drill filter and open menu.
    pub fn escape(&mut self) {
        let had_column = self.selection.selected_column().is_some();
        if self.selection.escape() {
            self.pending_invalidation.record(InvalidationTopic::Focus);
            if had_column {
                self.pending_invalidation.record(InvalidationTopic::DrillFilter);
            }
        }
    }

    #[must_use]
    pub fn scroll_offset_px(&self) -> f64 {
        self.scroll_offset_px
    }

    #[must_use]
    pub fn viewport_width_px(&self) -> f64 {
        self.viewport_width_px
    }

    pub fn set_viewport_width(&mut self, width_px: f64) {
        let width_px = if width_px.is_finite() { width_px.max(0.0) } else { 0.0 };
        self.viewport_width_px = width_px;
        self.set_scroll_offset(self.scroll_offset_px);
    }

    pub fn set_scroll_offset(&mut self, offset_px: f64) {
        let clamped = clamp_scroll_offset(offset_px, &self.grid, self.viewport_width_px);
        if (clamped - self.scroll_offset_px).abs() > f64::EPSILON {
            self.scroll_offset_px = clamped;
            self.pending_invalidation.record(InvalidationTopic::Scroll);
        }
    }

    /// Centres the column containing `date`. Idempotent for a fixed target.
    pub fn scroll_to_date(&mut self, date: NaiveDate) -> f64 {
        let target = scroll_offset_for_date(date, &self.grid, self.viewport_width_px);
        trace!(%date, target, "scroll to date");
        self.set_scroll_offset(target);
        self.scroll_offset_px
    }

    fn reveal_position(&mut self, left_px: f64) {
        if self.viewport_width_px <= 0.0 {
            return;
        }
        let target = scroll_offset_to_reveal(
            left_px,
            self.scroll_offset_px,
            self.viewport_width_px,
            self.config.scroll_reveal_margin_px,
        );
        self.set_scroll_offset(target);
    }

    #[must_use]
    pub fn pending_invalidation(&self) -> InvalidationMask {
        self.pending_invalidation
    }

    #[must_use]
    pub fn has_pending_invalidation(&self) -> bool {
        !self.pending_invalidation.is_none()
    }

    /// Returns and resets the accumulated invalidation.
    pub fn take_pending_invalidation(&mut self) -> InvalidationMask {
        std::mem::take(&mut self.pending_invalidation)
    }

    /// Paint description for the current state. `now` drives the
    /// current-time marker and may be omitted.
    pub fn build_frame(&mut self, now: Option<NaiveDateTime>) -> TimelineFrame {
        let snapshot = self.layout();
        build_timeline_frame(
            &self.grid,
            &snapshot,
            &self.selection,
            self.scroll_offset_px,
            now,
        )
    }
}
