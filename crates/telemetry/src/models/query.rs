use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Server-side rollup applied to a range of point values
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RollupType {
    /// Raw values, no aggregation
    None,
    Average,
    Minimum,
    Maximum,
    Sum,
    First,
    Last,
    Count,
    Delta,
    Integral,
}

impl RollupType {
    /// Wire representation used in query parameters
    pub fn as_str(&self) -> &'static str {
        match self {
            RollupType::None => "NONE",
            RollupType::Average => "AVERAGE",
            RollupType::Minimum => "MINIMUM",
            RollupType::Maximum => "MAXIMUM",
            RollupType::Sum => "SUM",
            RollupType::First => "FIRST",
            RollupType::Last => "LAST",
            RollupType::Count => "COUNT",
            RollupType::Delta => "DELTA",
            RollupType::Integral => "INTEGRAL",
        }
    }
}

impl fmt::Display for RollupType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Calendar unit sizing the rollup buckets
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimePeriodType {
    Seconds,
    Minutes,
    Hours,
    Days,
    Weeks,
    Months,
    Years,
}

impl TimePeriodType {
    /// Wire representation used in query parameters
    pub fn as_str(&self) -> &'static str {
        match self {
            TimePeriodType::Seconds => "SECONDS",
            TimePeriodType::Minutes => "MINUTES",
            TimePeriodType::Hours => "HOURS",
            TimePeriodType::Days => "DAYS",
            TimePeriodType::Weeks => "WEEKS",
            TimePeriodType::Months => "MONTHS",
            TimePeriodType::Years => "YEARS",
        }
    }
}

impl fmt::Display for TimePeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Transport-level request for a range of point values or statistics
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueRangeQuery {
    /// Inclusive start of the window
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<DateTime<Utc>>,

    /// Exclusive end of the window
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<DateTime<Utc>>,

    /// Rollup applied by the server
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rollup: Option<RollupType>,

    /// Calendar unit for rollup buckets
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_period_type: Option<TimePeriodType>,

    /// Number of units per rollup bucket
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_periods: Option<u32>,

    /// Maximum number of values the server may return
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
}

impl ValueRangeQuery {
    /// Query over a bounded window with no rollup
    pub fn between(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
            ..Default::default()
        }
    }

    pub fn with_rollup(mut self, rollup: RollupType) -> Self {
        self.rollup = Some(rollup);
        self
    }

    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }
}
