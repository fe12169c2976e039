//! Telemetry wire models
//!
//! This module contains the data types exchanged with the console API:
//! - `point_value` - Sampled values and set-point writes (PointValue, PointWrite)
//! - `statistics` - Window aggregates (PointStatistics)
//! - `query` - Range queries and rollup parameters (ValueRangeQuery, RollupType, TimePeriodType)
//! - `event` - Push-channel notifications (PointEvent, PointEventKind)

mod event;
mod point_value;
mod query;
mod statistics;

pub use event::{PointEvent, PointEventKind};
pub use point_value::{PointValue, PointWrite};
pub use query::{RollupType, TimePeriodType, ValueRangeQuery};
pub use statistics::PointStatistics;
