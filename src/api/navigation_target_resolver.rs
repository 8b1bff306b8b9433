use chrono::{NaiveDate, NaiveDateTime};

use crate::core::coordinate::column_index_for_date;
use crate::core::zoom::datetime_offset;
use crate::core::TimelineGrid;

use super::selection::TimelineSelection;

/// Scroll offset that centres the column containing `date` in the viewport.
///
/// Dates outside the grid centre the last column. The result depends only on
/// its inputs, so repeating the call with the same target never drifts.
#[must_use]
pub fn scroll_offset_for_date(date: NaiveDate, grid: &TimelineGrid, viewport_width: f64) -> f64 {
    if grid.is_empty() {
        return 0.0;
    }
    let index = column_index_for_date(date, grid).unwrap_or(grid.len() - 1);
    let left = grid.column_left(index);
    let width = grid.column(index).map_or(0.0, |column| column.width());
    let viewport = viewport_width.max(0.0);
    clamp_scroll_offset(left - viewport / 2.0 + width / 2.0, grid, viewport)
}

/// Keeps `scroll` when `left_px` is already visible with `margin` to spare,
/// otherwise scrolls so the bar sits `margin` pixels from the left edge.
#[must_use]
pub fn scroll_offset_to_reveal(left_px: f64, scroll: f64, viewport_width: f64, margin: f64) -> f64 {
    let visible_end = scroll + viewport_width - margin;
    if left_px < scroll || left_px > visible_end {
        return (left_px - margin).max(0.0);
    }
    scroll
}

/// Clamps a scroll offset to `[0, total_width - viewport_width]`.
#[must_use]
pub fn clamp_scroll_offset(offset: f64, grid: &TimelineGrid, viewport_width: f64) -> f64 {
    if !offset.is_finite() {
        return 0.0;
    }
    let max_scroll = (grid.total_width() - viewport_width.max(0.0)).max(0.0);
    offset.clamp(0.0, max_scroll)
}

/// Horizontal centre of the drilled column, used to anchor the period badge.
#[must_use]
pub fn selected_column_center(selection: &TimelineSelection, grid: &TimelineGrid) -> Option<f64> {
    let selected = selection.selected_column()?;
    let index = grid.index_of_column_start(selected.start)?;
    let column = grid.column(index)?;
    Some(grid.column_left(index) + column.width() / 2.0)
}

/// Pixel offset of the current-time marker, `None` when `now` is off the grid.
#[must_use]
pub fn today_indicator_offset(now: NaiveDateTime, grid: &TimelineGrid) -> Option<f64> {
    if grid.is_empty() {
        return None;
    }
    let start = grid.grid_start();
    if now < start || now >= grid.grid_end_exclusive() {
        return None;
    }
    Some(datetime_offset(now, start, grid.zoom(), grid.scale()))
}
