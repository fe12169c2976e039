//! Query options and the option change comparator.
//!
//! Every load carries a [`QueryOptions`] value describing the window and
//! rollup a display wants. Providers cache the options of the last load
//! and diff them against the next call's options to decide whether any
//! work is needed at all. The diff result is an [`OptionsDelta`]; each
//! provider kind inspects the subset of its flags it cares about.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gridwatch_telemetry::{RollupType, TimePeriodType, ValueRangeQuery};

/// The window and rollup parameters of one load request.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryOptions {
    /// Inclusive start of the window
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<DateTime<Utc>>,

    /// Exclusive end of the window
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<DateTime<Utc>>,

    /// Server-side rollup to apply
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rollup: Option<RollupType>,

    /// Calendar unit for rollup buckets
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_period_type: Option<TimePeriodType>,

    /// Number of units per rollup bucket
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_periods: Option<u32>,

    /// Load even when the options match the previous load
    #[serde(default, skip_serializing)]
    pub force_refresh: bool,
}

impl QueryOptions {
    /// Options over a bounded window with no rollup.
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

    pub fn with_time_periods(mut self, period_type: TimePeriodType, periods: u32) -> Self {
        self.time_period_type = Some(period_type);
        self.time_periods = Some(periods);
        self
    }

    pub fn with_force_refresh(mut self) -> Self {
        self.force_refresh = true;
        self
    }

    /// The transport query these options describe.
    pub fn to_range_query(&self) -> ValueRangeQuery {
        ValueRangeQuery {
            from: self.from,
            to: self.to,
            rollup: self.rollup,
            time_period_type: self.time_period_type,
            time_periods: self.time_periods,
            limit: None,
        }
    }
}

/// Field-by-field comparison of two [`QueryOptions`].
///
/// One boolean flag per comparable field, plus the incoming value of
/// every field for logging and debugging. `force_refresh` is not part of
/// the comparison; it bypasses the delta check entirely.
///
/// A field counts as unchanged only when both sides carry it and the
/// values are equal; timestamps compare by instant. A field absent on
/// either side, including absent on both, counts as changed. Callers
/// that omit a field therefore reload on every call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OptionsDelta {
    /// Window start changed
    pub from: bool,
    /// Window end changed
    pub to: bool,
    /// Rollup changed
    pub rollup: bool,
    /// Rollup bucket unit changed
    pub time_period_type: bool,
    /// Rollup bucket count changed
    pub time_periods: bool,

    /// Incoming window start
    pub from_value: Option<DateTime<Utc>>,
    /// Incoming window end
    pub to_value: Option<DateTime<Utc>>,
    /// Incoming rollup
    pub rollup_value: Option<RollupType>,
    /// Incoming rollup bucket unit
    pub time_period_type_value: Option<TimePeriodType>,
    /// Incoming rollup bucket count
    pub time_periods_value: Option<u32>,
}

impl OptionsDelta {
    /// Compare `previous` against `next`.
    ///
    /// The flags are symmetric in the two arguments. The `*_value`
    /// payloads always come from `next`, whether or not the field
    /// changed.
    pub fn between(previous: &QueryOptions, next: &QueryOptions) -> Self {
        Self {
            from: !instants_equal(previous.from, next.from),
            to: !instants_equal(previous.to, next.to),
            rollup: !values_equal(previous.rollup, next.rollup),
            time_period_type: !values_equal(previous.time_period_type, next.time_period_type),
            time_periods: !values_equal(previous.time_periods, next.time_periods),
            from_value: next.from,
            to_value: next.to,
            rollup_value: next.rollup,
            time_period_type_value: next.time_period_type,
            time_periods_value: next.time_periods,
        }
    }

    /// Whether any compared field changed.
    pub fn any(&self) -> bool {
        self.from || self.to || self.rollup || self.time_period_type || self.time_periods
    }

    /// Whether either end of the window changed.
    pub fn window(&self) -> bool {
        self.from || self.to
    }
}

/// Present-and-equal check for timestamps, comparing by instant.
fn instants_equal(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.timestamp_millis() == b.timestamp_millis(),
        _ => false,
    }
}

/// Present-and-equal check for plain fields.
fn values_equal<T: PartialEq>(a: Option<T>, b: Option<T>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn window() -> (DateTime<Utc>, DateTime<Utc>) {
        (
            Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap(),
        )
    }

    fn full_options() -> QueryOptions {
        let (from, to) = window();
        QueryOptions::between(from, to)
            .with_rollup(RollupType::Average)
            .with_time_periods(TimePeriodType::Minutes, 15)
    }

    #[test]
    fn test_identical_full_options_show_no_change() {
        let delta = OptionsDelta::between(&full_options(), &full_options());
        assert!(!delta.any());
        assert!(!delta.window());
    }

    #[test]
    fn test_changed_window_is_flagged() {
        let previous = full_options();
        let mut next = full_options();
        next.to = Some(Utc.with_ymd_and_hms(2024, 3, 3, 0, 0, 0).unwrap());

        let delta = OptionsDelta::between(&previous, &next);
        assert!(!delta.from);
        assert!(delta.to);
        assert!(delta.any());
        assert!(delta.window());
    }

    #[test]
    fn test_absent_on_one_side_counts_changed() {
        let previous = full_options();
        let mut next = full_options();
        next.rollup = None;

        let delta = OptionsDelta::between(&previous, &next);
        assert!(delta.rollup);

        // Symmetric: present-to-absent and absent-to-present both flag.
        let delta = OptionsDelta::between(&next, &previous);
        assert!(delta.rollup);
    }

    #[test]
    fn test_absent_on_both_sides_counts_changed() {
        // Two Default options agree on every field, yet every field is
        // absent, so every field is flagged. Sparse options always reload.
        let delta = OptionsDelta::between(&QueryOptions::default(), &QueryOptions::default());
        assert!(delta.from);
        assert!(delta.to);
        assert!(delta.rollup);
        assert!(delta.time_period_type);
        assert!(delta.time_periods);
        assert!(delta.any());
    }

    #[test]
    fn test_payload_values_come_from_next() {
        let previous = full_options();
        let mut next = full_options();
        next.time_periods = Some(30);

        let delta = OptionsDelta::between(&previous, &next);
        assert_eq!(delta.time_periods_value, Some(30));
        // Unchanged fields still carry the incoming values.
        assert_eq!(delta.rollup_value, Some(RollupType::Average));
        assert_eq!(delta.from_value, next.from);
    }

    #[test]
    fn test_timestamps_compare_by_instant() {
        let (from, to) = window();
        let previous = QueryOptions::between(from, to);
        // Same instant rebuilt from millis, not the same value identity.
        let rebuilt_from = Utc.timestamp_millis_opt(from.timestamp_millis()).unwrap();
        let rebuilt_to = Utc.timestamp_millis_opt(to.timestamp_millis()).unwrap();
        let next = QueryOptions::between(rebuilt_from, rebuilt_to);

        let delta = OptionsDelta::between(&previous, &next);
        assert!(!delta.from);
        assert!(!delta.to);
    }

    #[test]
    fn test_force_refresh_not_compared() {
        let previous = full_options();
        let next = full_options().with_force_refresh();

        let delta = OptionsDelta::between(&previous, &next);
        assert!(!delta.any());
    }

    #[test]
    fn test_to_range_query_carries_fields() {
        let options = full_options();
        let query = options.to_range_query();
        assert_eq!(query.from, options.from);
        assert_eq!(query.rollup, Some(RollupType::Average));
        assert_eq!(query.time_periods, Some(15));
        assert!(query.limit.is_none());
    }
}
