use std::sync::Arc;

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::core::primitives::midnight;
use crate::core::{
    DateColumn, TimelineGrid, WorkCenter, WorkCenterId, WorkOrder, WorkOrderId, ZoomLevel,
};

/// Everything the lane indexes are derived from.
#[derive(Debug, Clone, Copy)]
pub struct LayoutInputs<'a> {
    pub orders: &'a [WorkOrder],
    pub orders_revision: u64,
    pub work_centers: &'a [WorkCenter],
    pub centers_revision: u64,
    pub grid: &'a TimelineGrid,
    pub drill_column: Option<&'a DateColumn>,
}

impl LayoutInputs<'_> {
    #[must_use]
    pub fn key(&self) -> LayoutCacheKey {
        LayoutCacheKey {
            orders_revision: self.orders_revision,
            centers_revision: self.centers_revision,
            zoom: self.grid.zoom(),
            grid_start: self.grid.grid_start(),
            grid_end: self.grid.grid_end_exclusive(),
            drill_start: self.drill_column.map(|column| column.start),
        }
    }
}

/// Change token deciding whether a cached snapshot is still valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayoutCacheKey {
    pub orders_revision: u64,
    pub centers_revision: u64,
    pub zoom: ZoomLevel,
    pub grid_start: NaiveDateTime,
    pub grid_end: NaiveDateTime,
    pub drill_start: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayoutCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub lanes: usize,
    pub visible_orders: usize,
}

/// Immutable lane indexes for one input tuple.
#[derive(Debug, Clone, PartialEq)]
pub struct GridLayoutSnapshot {
    key: LayoutCacheKey,
    lane_names: IndexMap<WorkCenterId, String>,
    visible_orders: IndexMap<WorkCenterId, Vec<WorkOrder>>,
}

impl GridLayoutSnapshot {
    /// Builds both indexes from scratch.
    #[must_use]
    pub fn build(inputs: &LayoutInputs<'_>) -> Self {
        let mut lane_names: IndexMap<WorkCenterId, String> = inputs
            .work_centers
            .iter()
            .map(|center| (center.id.clone(), center.name.clone()))
            .collect();
        for order in inputs.orders {
            if !lane_names.contains_key(&order.work_center_id) {
                debug!(
                    work_center = %order.work_center_id,
                    order = %order.id,
                    "order references an unknown work center, using placeholder lane"
                );
                lane_names.insert(
                    order.work_center_id.clone(),
                    WorkCenter::placeholder_name(&order.work_center_id),
                );
            }
        }

        let window = visibility_window(inputs.grid, inputs.drill_column);
        let mut visible_orders: IndexMap<WorkCenterId, Vec<WorkOrder>> = lane_names
            .keys()
            .map(|id| (id.clone(), Vec::new()))
            .collect();
        if let Some((window_start, window_end)) = window {
            for order in inputs.orders {
                if !order_intersects_window(order, window_start, window_end) {
                    continue;
                }
                if let Some(lane) = visible_orders.get_mut(&order.work_center_id) {
                    lane.push(order.clone());
                }
            }
        }

        Self {
            key: inputs.key(),
            lane_names,
            visible_orders,
        }
    }

    #[must_use]
    pub fn key(&self) -> LayoutCacheKey {
        self.key
    }

    #[must_use]
    pub fn lane_names(&self) -> &IndexMap<WorkCenterId, String> {
        &self.lane_names
    }

    #[must_use]
    pub fn lane_name(&self, id: &WorkCenterId) -> Option<&str> {
        self.lane_names.get(id).map(String::as_str)
    }

    /// Orders of one lane in input order; empty for unknown lanes.
    #[must_use]
    pub fn visible_orders(&self, id: &WorkCenterId) -> &[WorkOrder] {
        self.visible_orders
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// `(lane id, lane name, visible orders)` in lane order.
    pub fn lanes(&self) -> impl Iterator<Item = (&WorkCenterId, &str, &[WorkOrder])> + '_ {
        self.lane_names
            .iter()
            .map(|(id, name)| (id, name.as_str(), self.visible_orders(id)))
    }

    /// Visible orders flattened by lane order, then by order within the lane.
    pub fn flat_orders(&self) -> impl Iterator<Item = &WorkOrder> + '_ {
        self.visible_orders.values().flatten()
    }

    #[must_use]
    pub fn visible_order_count(&self) -> usize {
        self.visible_orders.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn find_order(&self, id: &WorkOrderId) -> Option<&WorkOrder> {
        self.flat_orders().find(|order| &order.id == id)
    }
}

/// Half-open span orders must intersect to be shown: the whole grid, or the
/// drilled column alone. `None` when the grid has no columns.
#[must_use]
pub fn visibility_window(
    grid: &TimelineGrid,
    drill_column: Option<&DateColumn>,
) -> Option<(NaiveDateTime, NaiveDateTime)> {
    if let Some(column) = drill_column {
        return Some((column.start, column.end(grid.zoom())));
    }
    if grid.is_empty() {
        return None;
    }
    Some((grid.grid_start(), grid.grid_end_exclusive()))
}

/// Orders cover `[start 00:00, end + 1 day 00:00)`.
#[must_use]
pub fn order_intersects_window(
    order: &WorkOrder,
    window_start: NaiveDateTime,
    window_end: NaiveDateTime,
) -> bool {
    let order_start = midnight(order.start_date);
    let order_end = midnight(order.exclusive_end());
    order_start < window_end && order_end > window_start
}

/// Holds the latest [`GridLayoutSnapshot`] and rebuilds it only when its key changes.
#[derive(Debug, Default)]
pub struct GridLayoutCache {
    current: Option<Arc<GridLayoutSnapshot>>,
    hits: u64,
    misses: u64,
}

impl GridLayoutCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached snapshot when `inputs` produce the same key, otherwise
    /// rebuilds. Repeated calls without an input change yield the same `Arc`.
    pub fn refresh(&mut self, inputs: &LayoutInputs<'_>) -> Arc<GridLayoutSnapshot> {
        let key = inputs.key();
        if let Some(current) = &self.current {
            if current.key == key {
                self.hits = self.hits.saturating_add(1);
                trace!(orders_revision = key.orders_revision, "grid layout cache hit");
                return Arc::clone(current);
            }
        }
        self.rebuild(inputs)
    }

    /// Drops the cached snapshot and returns a freshly built one.
    pub fn invalidate(&mut self, inputs: &LayoutInputs<'_>) -> Arc<GridLayoutSnapshot> {
        self.current = None;
        self.rebuild(inputs)
    }

    /// Forgets the cached snapshot without rebuilding.
    pub fn clear(&mut self) {
        self.current = None;
    }

    #[must_use]
    pub fn snapshot(&self) -> Option<Arc<GridLayoutSnapshot>> {
        self.current.clone()
    }

    #[must_use]
    pub fn stats(&self) -> LayoutCacheStats {
        LayoutCacheStats {
            hits: self.hits,
            misses: self.misses,
            lanes: self
                .current
                .as_ref()
                .map_or(0, |snapshot| snapshot.lane_names.len()),
            visible_orders: self
                .current
                .as_ref()
                .map_or(0, |snapshot| snapshot.visible_order_count()),
        }
    }

    fn rebuild(&mut self, inputs: &LayoutInputs<'_>) -> Arc<GridLayoutSnapshot> {
        self.misses = self.misses.saturating_add(1);
        let snapshot = Arc::new(GridLayoutSnapshot::build(inputs));
        debug!(
            zoom = %inputs.grid.zoom(),
            lanes = snapshot.lane_names.len(),
            visible_orders = snapshot.visible_order_count(),
            drilled = inputs.drill_column.is_some(),
            "rebuilt grid layout snapshot"
        );
        self.current = Some(Arc::clone(&snapshot));
        snapshot
    }
}
