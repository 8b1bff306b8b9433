use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::core::primitives::next_day;
use crate::error::{TimelineError, TimelineResult};

/// Calendar granularity of one timeline column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ZoomLevel {
    Hour,
    Day,
    Week,
    #[default]
    Month,
}

impl ZoomLevel {
    pub const ALL: [ZoomLevel; 4] = [Self::Hour, Self::Day, Self::Week, Self::Month];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }

    /// Parses a zoom name, falling back to `Month` for anything unrecognized.
    #[must_use]
    pub fn from_name_lossy(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "hour" => Self::Hour,
            "day" => Self::Day,
            "week" => Self::Week,
            "month" => Self::Month,
            other => {
                warn!(zoom = other, "unrecognized zoom level, falling back to month");
                Self::Month
            }
        }
    }

    /// Label used by the "current period" badge.
    #[must_use]
    pub const fn current_period_label(self) -> &'static str {
        match self {
            Self::Hour => "Current hour",
            Self::Day => "Current day",
            Self::Week => "Current week",
            Self::Month => "Current month",
        }
    }
}

impl fmt::Display for ZoomLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ZoomLevel {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_name_lossy(s))
    }
}

impl<'de> Deserialize<'de> for ZoomLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from_name_lossy(&raw))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkCenterId(String);

impl WorkCenterId {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkCenterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WorkCenterId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkOrderId(String);

impl WorkOrderId {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkOrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WorkOrderId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A resource lane that work orders compete for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkCenter {
    pub id: WorkCenterId,
    pub name: String,
}

impl WorkCenter {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: WorkCenterId::new(id),
            name: name.into(),
        }
    }

    /// Display name used when an order references a center missing from the catalog.
    #[must_use]
    pub fn placeholder_name(id: &WorkCenterId) -> String {
        format!("Center {id}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum WorkOrderStatus {
    #[default]
    Open,
    InProgress,
    Complete,
    Blocked,
}

impl WorkOrderStatus {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::InProgress => "In progress",
            Self::Complete => "Complete",
            Self::Blocked => "Blocked",
        }
    }
}

/// A scheduled work order occupying one work center over inclusive calendar dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkOrder {
    pub id: WorkOrderId,
    pub name: String,
    pub work_center_id: WorkCenterId,
    #[serde(default)]
    pub status: WorkOrderStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl WorkOrder {
    pub fn new(
        id: impl Into<String>,
        work_center_id: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> TimelineResult<Self> {
        let order = Self {
            id: WorkOrderId::new(id),
            name: String::new(),
            work_center_id: WorkCenterId::new(work_center_id),
            status: WorkOrderStatus::default(),
            start_date,
            end_date,
        };
        order.validate()?;
        Ok(order)
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: WorkOrderStatus) -> Self {
        self.status = status;
        self
    }

    pub fn validate(&self) -> TimelineResult<()> {
        if self.start_date > self.end_date {
            return Err(TimelineError::InvalidData(format!(
                "work order {} starts on {} after its end {}",
                self.id, self.start_date, self.end_date
            )));
        }
        Ok(())
    }

    /// Day after the inclusive end date.
    #[must_use]
    pub fn exclusive_end(&self) -> NaiveDate {
        next_day(self.end_date)
    }

    /// Inclusive day count.
    #[must_use]
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// Tooltip text in the form `name / status / start → end (n days)`.
    #[must_use]
    pub fn summary_text(&self) -> String {
        let days = self.duration_days();
        format!(
            "{}\nStatus: {}\n{} \u{2192} {} ({} day{})",
            self.name,
            self.status.label(),
            self.start_date.format("%b %-d, %Y"),
            self.end_date.format("%b %-d, %Y"),
            days,
            if days == 1 { "" } else { "s" }
        )
    }
}
