use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::core::primitives::midnight;
use crate::core::types::ZoomLevel;
use crate::core::zoom::{ZoomScaleTable, generate_columns};

/// One fixed-width slot on the horizontal axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateColumn {
    /// Inclusive start of the column. Midnight for every zoom except hour.
    pub start: NaiveDateTime,
    pub label: String,
    pub width_px: u32,
}

impl DateColumn {
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.start.date()
    }

    /// Exclusive end of the column at `zoom`.
    #[must_use]
    pub fn end(&self, zoom: ZoomLevel) -> NaiveDateTime {
        zoom.step_forward(self.start).unwrap_or(self.start)
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        f64::from(self.width_px)
    }
}

/// Column layout for one zoom level over fixed calendar bounds.
///
/// Purely derived from `(start_date, end_date, zoom, scale)`; regenerate it
/// instead of patching when any input changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineGrid {
    zoom: ZoomLevel,
    start_date: NaiveDate,
    end_date: NaiveDate,
    scale: ZoomScaleTable,
    columns: Vec<DateColumn>,
    total_width_px: u32,
}

impl TimelineGrid {
    #[must_use]
    pub fn generate(
        start_date: NaiveDate,
        end_date: NaiveDate,
        zoom: ZoomLevel,
        scale: ZoomScaleTable,
    ) -> Self {
        let columns = generate_columns(start_date, end_date, zoom, &scale);
        let total_width_px = columns
            .iter()
            .fold(0u32, |sum, column| sum.saturating_add(column.width_px));
        Self {
            zoom,
            start_date,
            end_date,
            scale,
            columns,
            total_width_px,
        }
    }

    #[must_use]
    pub fn zoom(&self) -> ZoomLevel {
        self.zoom
    }

    #[must_use]
    pub fn scale(&self) -> &ZoomScaleTable {
        &self.scale
    }

    /// Requested calendar start, before any week/month alignment.
    #[must_use]
    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    #[must_use]
    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    #[must_use]
    pub fn columns(&self) -> &[DateColumn] {
        &self.columns
    }

    #[must_use]
    pub fn column(&self, index: usize) -> Option<&DateColumn> {
        self.columns.get(index)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn total_width_px(&self) -> u32 {
        self.total_width_px
    }

    #[must_use]
    pub fn total_width(&self) -> f64 {
        f64::from(self.total_width_px)
    }

    /// First column anchor; columns may start before the requested start for
    /// week and month zoom.
    #[must_use]
    pub fn grid_start(&self) -> NaiveDateTime {
        self.columns
            .first()
            .map_or_else(|| midnight(self.start_date), |column| column.start)
    }

    #[must_use]
    pub fn grid_start_date(&self) -> NaiveDate {
        self.grid_start().date()
    }

    /// One granularity step past the last column.
    #[must_use]
    pub fn grid_end_exclusive(&self) -> NaiveDateTime {
        self.columns
            .last()
            .map_or_else(|| midnight(self.end_date), |column| column.end(self.zoom))
    }

    /// Exclusive end of column `index`.
    #[must_use]
    pub fn column_end(&self, index: usize) -> Option<NaiveDateTime> {
        self.columns.get(index).map(|column| column.end(self.zoom))
    }

    /// Pixel offset of the left edge of column `index`, by accumulating widths.
    #[must_use]
    pub fn column_left(&self, index: usize) -> f64 {
        self.columns
            .iter()
            .take(index)
            .map(DateColumn::width)
            .sum()
    }

    /// Iterates `(left_px, column)` pairs in order.
    pub fn columns_with_offsets(&self) -> impl Iterator<Item = (f64, &DateColumn)> + '_ {
        self.columns.iter().scan(0.0, |left, column| {
            let current = *left;
            *left += column.width();
            Some((current, column))
        })
    }

    /// Index of the column whose anchor equals `start`.
    #[must_use]
    pub fn index_of_column_start(&self, start: NaiveDateTime) -> Option<usize> {
        self.columns.iter().position(|column| column.start == start)
    }
}
