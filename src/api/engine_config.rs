use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::{ZoomLevel, ZoomScaleTable};
use crate::error::{TimelineError, TimelineResult};

/// Public engine bootstrap configuration.
///
/// Serializable so host applications can persist/load timeline setup without
/// inventing their own ad-hoc format. Missing fields fall back to the
/// defaults below.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimelineEngineConfig {
    #[serde(default = "default_calendar_start")]
    pub calendar_start: NaiveDate,
    #[serde(default = "default_calendar_end")]
    pub calendar_end: NaiveDate,
    #[serde(default)]
    pub zoom: ZoomLevel,
    #[serde(default)]
    pub scale: ZoomScaleTable,
    /// Gap kept between a revealed bar and the viewport's left edge.
    #[serde(default = "default_scroll_reveal_margin_px")]
    pub scroll_reveal_margin_px: f64,
}

impl Default for TimelineEngineConfig {
    fn default() -> Self {
        Self {
            calendar_start: default_calendar_start(),
            calendar_end: default_calendar_end(),
            zoom: ZoomLevel::default(),
            scale: ZoomScaleTable::default(),
            scroll_reveal_margin_px: default_scroll_reveal_margin_px(),
        }
    }
}

impl TimelineEngineConfig {
    /// Creates a config over explicit calendar bounds with default zoom and widths.
    #[must_use]
    pub fn new(calendar_start: NaiveDate, calendar_end: NaiveDate) -> Self {
        Self {
            calendar_start,
            calendar_end,
            ..Self::default()
        }
    }

    /// Sets the initial zoom level.
    #[must_use]
    pub fn with_zoom(mut self, zoom: ZoomLevel) -> Self {
        self.zoom = zoom;
        self
    }

    /// Replaces the width table used for every zoom level.
    #[must_use]
    pub fn with_scale(mut self, scale: ZoomScaleTable) -> Self {
        self.scale = scale;
        self
    }

    #[must_use]
    pub fn with_scroll_reveal_margin_px(mut self, margin_px: f64) -> Self {
        self.scroll_reveal_margin_px = margin_px;
        self
    }

    pub fn validate(&self) -> TimelineResult<()> {
        if self.calendar_start > self.calendar_end {
            return Err(TimelineError::InvalidCalendarBounds {
                start: self.calendar_start,
                end: self.calendar_end,
            });
        }
        if !self.scroll_reveal_margin_px.is_finite() || self.scroll_reveal_margin_px < 0.0 {
            return Err(TimelineError::InvalidConfig(format!(
                "scroll reveal margin must be finite and >= 0, got {}",
                self.scroll_reveal_margin_px
            )));
        }
        self.scale.validate()?;
        Ok(())
    }
}

fn default_calendar_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or(NaiveDate::MIN)
}

fn default_calendar_end() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 12, 31).unwrap_or(NaiveDate::MAX)
}

fn default_scroll_reveal_margin_px() -> f64 {
    100.0
}
