use chrono::NaiveDateTime;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::coordinate::order_geometry;
use crate::core::{TimelineGrid, WorkCenterId, WorkOrderId, WorkOrderStatus, ZoomLevel};
use crate::error::{TimelineError, TimelineResult};

use super::layout_cache::GridLayoutSnapshot;
use super::navigation_target_resolver::{selected_column_center, today_indicator_offset};
use super::selection::TimelineSelection;

/// Header slot as the rendering layer draws it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameColumn {
    pub left_px: f64,
    pub width_px: f64,
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameBar {
    pub id: WorkOrderId,
    pub name: String,
    pub status: WorkOrderStatus,
    pub left_px: f64,
    pub width_px: f64,
    pub focused: bool,
    pub menu_open: bool,
    pub tooltip: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameLane {
    pub id: WorkCenterId,
    pub name: String,
    /// Ordered by left edge.
    pub bars: Vec<FrameBar>,
}

/// Pill drawn above the drilled column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameBadge {
    pub center_px: f64,
    pub label: String,
}

/// Everything needed to paint one timeline frame, in grid pixel space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineFrame {
    pub zoom: ZoomLevel,
    pub total_width_px: f64,
    pub scroll_offset_px: f64,
    pub columns: Vec<FrameColumn>,
    pub lanes: Vec<FrameLane>,
    pub selected_column_badge: Option<FrameBadge>,
    pub today_offset_px: Option<f64>,
}

impl TimelineFrame {
    pub fn to_json_pretty(&self) -> TimelineResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| TimelineError::InvalidData(format!("failed to serialize frame: {e}")))
    }

    #[must_use]
    pub fn bar_count(&self) -> usize {
        self.lanes.iter().map(|lane| lane.bars.len()).sum()
    }

    #[must_use]
    pub fn lane(&self, id: &WorkCenterId) -> Option<&FrameLane> {
        self.lanes.iter().find(|lane| &lane.id == id)
    }
}

pub(super) fn build_timeline_frame(
    grid: &TimelineGrid,
    snapshot: &GridLayoutSnapshot,
    selection: &TimelineSelection,
    scroll_offset_px: f64,
    now: Option<NaiveDateTime>,
) -> TimelineFrame {
    let columns = grid
        .columns_with_offsets()
        .map(|(left_px, column)| FrameColumn {
            left_px,
            width_px: column.width(),
            label: column.label.clone(),
            selected: selection.is_column_selected(column),
        })
        .collect();

    let focused = selection.focused_order_id();
    let lanes = snapshot
        .lanes()
        .map(|(id, name, orders)| {
            let mut bars: Vec<FrameBar> = orders
                .iter()
                .map(|order| {
                    let geometry = order_geometry(order, grid);
                    FrameBar {
                        id: order.id.clone(),
                        name: order.name.clone(),
                        status: order.status,
                        left_px: geometry.left_px,
                        width_px: geometry.width_px,
                        focused: focused == Some(&order.id),
                        menu_open: selection.is_menu_open(&order.id),
                        tooltip: order.summary_text(),
                    }
                })
                .collect();
            bars.sort_by_key(|bar| OrderedFloat(bar.left_px));
            FrameLane {
                id: id.clone(),
                name: name.to_owned(),
                bars,
            }
        })
        .collect();

    let selected_column_badge =
        selected_column_center(selection, grid).map(|center_px| FrameBadge {
            center_px,
            label: grid.zoom().current_period_label().to_owned(),
        });

    TimelineFrame {
        zoom: grid.zoom(),
        total_width_px: grid.total_width(),
        scroll_offset_px,
        columns,
        lanes,
        selected_column_badge,
        today_offset_px: now.and_then(|now| today_indicator_offset(now, grid)),
    }
}
