use chrono::NaiveDate;
use thiserror::Error;

pub type TimelineResult<T> = Result<T, TimelineError>;

#[derive(Debug, Error)]
pub enum TimelineError {
    #[error("invalid calendar bounds: start={start}, end={end}")]
    InvalidCalendarBounds { start: NaiveDate, end: NaiveDate },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("work order `{0}` already exists")]
    DuplicateWorkOrder(String),

    #[error("work order `{0}` not found")]
    WorkOrderNotFound(String),

    #[error("work order `{candidate}` overlaps `{existing}` on work center `{work_center}`")]
    Overlap {
        candidate: String,
        existing: String,
        work_center: String,
    },
}
