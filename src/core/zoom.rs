use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::grid::DateColumn;
use crate::core::primitives::{
    add_months, days_in_month, elapsed_days, elapsed_days_between, end_of_day, first_of_month,
    midnight, month_day_fraction, months_between, next_day, start_of_week, top_of_hour,
};
use crate::core::types::ZoomLevel;
use crate::error::{TimelineError, TimelineResult};

/// Nominal column width and minimum bar width for one zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoomMetrics {
    pub column_width_px: u32,
    pub min_bar_width_px: u32,
}

impl ZoomMetrics {
    #[must_use]
    pub const fn new(column_width_px: u32, min_bar_width_px: u32) -> Self {
        Self {
            column_width_px,
            min_bar_width_px,
        }
    }
}

/// The single width table every column, offset and bar computation reads from.
///
/// Contexts that need a different visual width build an explicit override with
/// [`ZoomScaleTable::with_column_width`] instead of hardcoding a second value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoomScaleTable {
    pub hour: ZoomMetrics,
    pub day: ZoomMetrics,
    pub week: ZoomMetrics,
    pub month: ZoomMetrics,
}

impl Default for ZoomScaleTable {
    fn default() -> Self {
        Self::CANONICAL
    }
}

impl ZoomScaleTable {
    pub const CANONICAL: Self = Self {
        hour: ZoomMetrics::new(40, 40),
        day: ZoomMetrics::new(140, 60),
        week: ZoomMetrics::new(175, 140),
        month: ZoomMetrics::new(180, 180),
    };

    #[must_use]
    pub const fn metrics(&self, zoom: ZoomLevel) -> ZoomMetrics {
        match zoom {
            ZoomLevel::Hour => self.hour,
            ZoomLevel::Day => self.day,
            ZoomLevel::Week => self.week,
            ZoomLevel::Month => self.month,
        }
    }

    #[must_use]
    pub const fn column_width(&self, zoom: ZoomLevel) -> u32 {
        self.metrics(zoom).column_width_px
    }

    #[must_use]
    pub fn min_bar_width(&self, zoom: ZoomLevel) -> f64 {
        f64::from(self.metrics(zoom).min_bar_width_px)
    }

    /// Uniform pixels per calendar day, `None` for month columns whose day
    /// width depends on the month length.
    #[must_use]
    pub fn pixels_per_day(&self, zoom: ZoomLevel) -> Option<f64> {
        let width = f64::from(self.column_width(zoom));
        match zoom {
            ZoomLevel::Hour => Some(width * 24.0),
            ZoomLevel::Day => Some(width),
            ZoomLevel::Week => Some(width / 7.0),
            ZoomLevel::Month => None,
        }
    }

    /// Returns a copy with an explicit column-width override for `zoom`.
    pub fn with_column_width(mut self, zoom: ZoomLevel, width_px: u32) -> TimelineResult<Self> {
        self.metrics_mut(zoom).column_width_px = width_px;
        self.validate()
    }

    /// Returns a copy with an explicit minimum bar width for `zoom`.
    pub fn with_min_bar_width(mut self, zoom: ZoomLevel, width_px: u32) -> TimelineResult<Self> {
        self.metrics_mut(zoom).min_bar_width_px = width_px;
        self.validate()
    }

    pub fn validate(self) -> TimelineResult<Self> {
        for zoom in ZoomLevel::ALL {
            let metrics = self.metrics(zoom);
            if metrics.column_width_px == 0 {
                return Err(TimelineError::InvalidConfig(format!(
                    "{zoom} column width must be > 0"
                )));
            }
            if metrics.min_bar_width_px == 0 {
                return Err(TimelineError::InvalidConfig(format!(
                    "{zoom} minimum bar width must be > 0"
                )));
            }
        }
        Ok(self)
    }

    fn metrics_mut(&mut self, zoom: ZoomLevel) -> &mut ZoomMetrics {
        match zoom {
            ZoomLevel::Hour => &mut self.hour,
            ZoomLevel::Day => &mut self.day,
            ZoomLevel::Week => &mut self.week,
            ZoomLevel::Month => &mut self.month,
        }
    }
}

impl ZoomLevel {
    /// Snaps `time` down to the start of the column containing it.
    #[must_use]
    pub fn column_anchor(self, time: NaiveDateTime) -> NaiveDateTime {
        match self {
            Self::Hour => top_of_hour(time),
            Self::Day => midnight(time.date()),
            Self::Week => midnight(start_of_week(time.date())),
            Self::Month => midnight(first_of_month(time.date())),
        }
    }

    /// Start of the column following the one anchored at `time`.
    #[must_use]
    pub fn step_forward(self, time: NaiveDateTime) -> Option<NaiveDateTime> {
        match self {
            Self::Hour => time.checked_add_signed(Duration::hours(1)),
            Self::Day => time.checked_add_signed(Duration::days(1)),
            Self::Week => time.checked_add_signed(Duration::days(7)),
            Self::Month => add_months(time, 1),
        }
    }

    #[must_use]
    pub fn column_label(self, time: NaiveDateTime) -> String {
        match self {
            Self::Hour => time.format("%I:%M %p").to_string(),
            Self::Day => time.format("%a, %b %-d").to_string(),
            Self::Week => format!("Week of {}", time.format("%b %-d")),
            Self::Month => time.format("%b %Y").to_string(),
        }
    }
}

/// Columns covering the inclusive calendar range `[start, end]`.
///
/// Generation stops once a column's calendar date exceeds `end`; an inverted
/// range yields no columns.
#[must_use]
pub fn generate_columns(
    start: NaiveDate,
    end: NaiveDate,
    zoom: ZoomLevel,
    scale: &ZoomScaleTable,
) -> Vec<DateColumn> {
    if start > end {
        debug!(%start, %end, "inverted calendar range, generating no columns");
        return Vec::new();
    }
    generate_columns_between(midnight(start), end_of_day(end), zoom, scale)
}

/// Columns from the one containing `start` until a column start exceeds `end`.
#[must_use]
pub fn generate_columns_between(
    start: NaiveDateTime,
    end: NaiveDateTime,
    zoom: ZoomLevel,
    scale: &ZoomScaleTable,
) -> Vec<DateColumn> {
    let mut columns = Vec::new();
    if start > end {
        return columns;
    }

    let width_px = scale.column_width(zoom);
    let mut current = zoom.column_anchor(start);
    while current <= end {
        columns.push(DateColumn {
            start: current,
            label: zoom.column_label(current),
            width_px,
        });
        match zoom.step_forward(current) {
            Some(next) => current = next,
            None => break,
        }
    }
    columns
}

/// Pixel offset of `target` measured from `grid_start`.
#[must_use]
pub fn date_offset(
    target: NaiveDate,
    grid_start: NaiveDate,
    zoom: ZoomLevel,
    scale: &ZoomScaleTable,
) -> f64 {
    match scale.pixels_per_day(zoom) {
        Some(pixels_per_day) => elapsed_days(target, grid_start) * pixels_per_day,
        None => {
            let months = months_between(grid_start, target) as f64;
            (months + month_day_fraction(target)) * f64::from(scale.column_width(zoom))
        }
    }
}

/// Sub-day variant of [`date_offset`], used for "now" markers on hour grids.
#[must_use]
pub fn datetime_offset(
    target: NaiveDateTime,
    grid_start: NaiveDateTime,
    zoom: ZoomLevel,
    scale: &ZoomScaleTable,
) -> f64 {
    match scale.pixels_per_day(zoom) {
        Some(pixels_per_day) => elapsed_days_between(target, grid_start) * pixels_per_day,
        None => {
            let date = target.date();
            let intra_day = elapsed_days_between(target, midnight(date));
            let month_width = f64::from(scale.column_width(zoom));
            date_offset(date, grid_start.date(), zoom, scale)
                + intra_day / f64::from(days_in_month(date)) * month_width
        }
    }
}

/// Width of the inclusive range `[start, end]`, floored so short ranges stay visible.
#[must_use]
pub fn date_range_width(
    start: NaiveDate,
    end: NaiveDate,
    zoom: ZoomLevel,
    scale: &ZoomScaleTable,
) -> f64 {
    let floor = scale.min_bar_width(zoom);
    if end < start {
        return floor;
    }
    let left = date_offset(start, start, zoom, scale);
    let right = date_offset(next_day(end), start, zoom, scale);
    (right - left).max(floor)
}
