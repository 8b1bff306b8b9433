use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::grid::TimelineGrid;
use crate::core::primitives::{add_days, days_in_month, first_of_month, midnight, month_day_fraction};
use crate::core::types::{WorkOrder, ZoomLevel};
use crate::core::zoom::date_offset;

// Guards `floor(fraction * days)` against values like 13.999999999 that
// come back from a forward transform of an exact day boundary.
const DAY_SNAP_EPSILON: f64 = 1e-9;

/// Horizontal placement of one work-order bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarGeometry {
    pub left_px: f64,
    pub width_px: f64,
}

impl BarGeometry {
    #[must_use]
    pub fn right_px(self) -> f64 {
        self.left_px + self.width_px
    }
}

/// Pixel position of the left edge of `date` within `grid`, clamped to
/// `[0, total_width]`.
#[must_use]
pub fn date_position(date: NaiveDate, grid: &TimelineGrid) -> f64 {
    if grid.is_empty() {
        return 0.0;
    }
    let grid_start = grid.grid_start_date();
    if date <= grid_start {
        return 0.0;
    }

    let raw = match grid.zoom() {
        ZoomLevel::Month => month_column_scan(date, grid),
        zoom => date_offset(date, grid_start, zoom, grid.scale()),
    };
    raw.clamp(0.0, grid.total_width())
}

fn month_column_scan(date: NaiveDate, grid: &TimelineGrid) -> f64 {
    let target_month = first_of_month(date);
    let mut left = 0.0;
    for column in grid.columns() {
        let column_date = column.date();
        if column_date == target_month {
            left += month_day_fraction(date) * column.width();
            break;
        } else if column_date < target_month {
            left += column.width();
        } else {
            break;
        }
    }
    left
}

#[must_use]
pub fn order_left_position(order: &WorkOrder, grid: &TimelineGrid) -> f64 {
    date_position(order.start_date, grid)
}

/// Bar width measured to the order's exclusive end, floored to the zoom's
/// minimum and truncated at the grid's right edge.
#[must_use]
pub fn order_width_px(order: &WorkOrder, grid: &TimelineGrid) -> f64 {
    order_geometry(order, grid).width_px
}

#[must_use]
pub fn order_geometry(order: &WorkOrder, grid: &TimelineGrid) -> BarGeometry {
    if grid.is_empty() {
        return BarGeometry {
            left_px: 0.0,
            width_px: 0.0,
        };
    }

    let left_px = order_left_position(order, grid);
    let grid_end = grid.grid_end_exclusive().date();
    let exclusive_end = order.exclusive_end().min(grid_end);
    let right_px = date_position(exclusive_end, grid);

    let mut width_px = (right_px - left_px).max(grid.scale().min_bar_width(grid.zoom()));
    let total = grid.total_width();
    if left_px + width_px > total {
        width_px = (total - left_px).max(0.0);
    }
    BarGeometry { left_px, width_px }
}

/// Index of the column containing pixel `x`, or `None` outside the grid.
#[must_use]
pub fn column_index_at(x: f64, grid: &TimelineGrid) -> Option<usize> {
    if !x.is_finite() || x < 0.0 {
        return None;
    }
    grid.columns_with_offsets()
        .position(|(left, column)| left + column.width() > x)
}

/// Index of the column whose span contains `date`.
#[must_use]
pub fn column_index_for_date(date: NaiveDate, grid: &TimelineGrid) -> Option<usize> {
    let instant = midnight(date);
    let zoom = grid.zoom();
    grid.columns()
        .iter()
        .position(|column| column.start <= instant && instant < column.end(zoom))
}

/// Inverse of [`date_position`]: the calendar date under pixel `x`.
///
/// Positions past the right edge saturate to the last column's date and
/// negative positions to the first column's date. An empty grid answers with
/// its requested start date.
#[must_use]
pub fn date_from_position(x: f64, grid: &TimelineGrid) -> NaiveDate {
    let Some(first) = grid.columns().first() else {
        return grid.start_date();
    };
    if !x.is_finite() || x < 0.0 {
        return first.date();
    }

    for (left, column) in grid.columns_with_offsets() {
        let width = column.width();
        if left + width <= x {
            continue;
        }
        let fraction = (x - left) / width;
        let date = column.date();
        return match grid.zoom() {
            ZoomLevel::Hour | ZoomLevel::Day => date,
            ZoomLevel::Week => add_days(date, days_into_span(fraction, 7)),
            ZoomLevel::Month => add_days(date, days_into_span(fraction, days_in_month(date))),
        };
    }

    grid.columns()
        .last()
        .map_or_else(|| first.date(), |column| column.date())
}

fn days_into_span(fraction: f64, span_days: u32) -> i64 {
    let days = (fraction * f64::from(span_days) + DAY_SNAP_EPSILON).floor() as i64;
    days.clamp(0, i64::from(span_days) - 1)
}
