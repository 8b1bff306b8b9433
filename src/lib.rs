//! timeline-rs: work-order timeline layout engine.
//!
//! `core` holds the pure date/pixel transforms and the overlap rule; `api`
//! wraps them in [`TimelineEngine`], which owns the derived state a host
//! application renders from.

pub mod api;
pub mod core;
pub mod error;
pub mod telemetry;

pub use api::{TimelineEngine, TimelineEngineConfig};
pub use error::{TimelineError, TimelineResult};
