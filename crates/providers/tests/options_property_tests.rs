//! Property-based tests for the query option comparator.
//!
//! These tests verify that universal properties hold across all valid
//! option pairs, using the `proptest` crate for random test case
//! generation. The comparator drives every provider's decision to skip
//! or run a load, so its contract gets the widest input coverage.

use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;

use gridwatch_providers::provider::kind::ProviderKind;
use gridwatch_providers::provider::options::{OptionsDelta, QueryOptions};
use gridwatch_telemetry::{RollupType, TimePeriodType};

// =============================================================================
// Generators
// =============================================================================

/// Generates a random instant within a plausible dashboard range.
fn arb_instant() -> impl Strategy<Value = DateTime<Utc>> {
    // Millisecond precision across roughly 2020-2026. A coarse step keeps
    // accidental equality between independently drawn instants possible.
    (1_577_836_800i64..1_766_016_000)
        .prop_map(|secs| Utc.timestamp_millis_opt(secs * 1000).unwrap())
}

fn arb_rollup() -> impl Strategy<Value = RollupType> {
    prop_oneof![
        Just(RollupType::None),
        Just(RollupType::Average),
        Just(RollupType::Minimum),
        Just(RollupType::Maximum),
        Just(RollupType::Sum),
        Just(RollupType::First),
        Just(RollupType::Last),
        Just(RollupType::Count),
        Just(RollupType::Delta),
        Just(RollupType::Integral),
    ]
}

fn arb_period_type() -> impl Strategy<Value = TimePeriodType> {
    prop_oneof![
        Just(TimePeriodType::Seconds),
        Just(TimePeriodType::Minutes),
        Just(TimePeriodType::Hours),
        Just(TimePeriodType::Days),
        Just(TimePeriodType::Weeks),
        Just(TimePeriodType::Months),
        Just(TimePeriodType::Years),
    ]
}

/// Generates options with every field independently present or absent.
fn arb_options() -> impl Strategy<Value = QueryOptions> {
    (
        proptest::option::of(arb_instant()),
        proptest::option::of(arb_instant()),
        proptest::option::of(arb_rollup()),
        proptest::option::of(arb_period_type()),
        proptest::option::of(1u32..100),
    )
        .prop_map(|(from, to, rollup, time_period_type, time_periods)| QueryOptions {
            from,
            to,
            rollup,
            time_period_type,
            time_periods,
            force_refresh: false,
        })
}

/// Generates options with every field populated.
fn arb_full_options() -> impl Strategy<Value = QueryOptions> {
    (
        arb_instant(),
        arb_instant(),
        arb_rollup(),
        arb_period_type(),
        1u32..100,
    )
        .prop_map(|(from, to, rollup, time_period_type, time_periods)| QueryOptions {
            from: Some(from),
            to: Some(to),
            rollup: Some(rollup),
            time_period_type: Some(time_period_type),
            time_periods: Some(time_periods),
            force_refresh: false,
        })
}

/// The per-field contract: unchanged only when both sides are present
/// and equal, timestamps comparing by instant.
fn both_present_equal<T: PartialEq>(a: &Option<T>, b: &Option<T>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a == b)
}

fn instants_present_equal(a: &Option<DateTime<Utc>>, b: &Option<DateTime<Utc>>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a.timestamp_millis() == b.timestamp_millis())
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// **Property: change flags are symmetric in the two arguments**
    ///
    /// Swapping the comparison order must never change which fields are
    /// flagged, only the `*_value` payloads.
    #[test]
    fn prop_flags_are_symmetric(a in arb_options(), b in arb_options()) {
        let forward = OptionsDelta::between(&a, &b);
        let reverse = OptionsDelta::between(&b, &a);

        prop_assert_eq!(forward.from, reverse.from);
        prop_assert_eq!(forward.to, reverse.to);
        prop_assert_eq!(forward.rollup, reverse.rollup);
        prop_assert_eq!(forward.time_period_type, reverse.time_period_type);
        prop_assert_eq!(forward.time_periods, reverse.time_periods);
    }

    /// **Property: each flag follows the present-and-equal rule**
    ///
    /// A field is unchanged exactly when both sides carry it with equal
    /// values; any absence counts as a change.
    #[test]
    fn prop_flags_follow_the_per_field_contract(a in arb_options(), b in arb_options()) {
        let delta = OptionsDelta::between(&a, &b);

        prop_assert_eq!(delta.from, !instants_present_equal(&a.from, &b.from));
        prop_assert_eq!(delta.to, !instants_present_equal(&a.to, &b.to));
        prop_assert_eq!(delta.rollup, !both_present_equal(&a.rollup, &b.rollup));
        prop_assert_eq!(
            delta.time_period_type,
            !both_present_equal(&a.time_period_type, &b.time_period_type)
        );
        prop_assert_eq!(
            delta.time_periods,
            !both_present_equal(&a.time_periods, &b.time_periods)
        );
    }

    /// **Property: payloads always come from the second argument**
    ///
    /// Whether or not a field changed, the delta reports the incoming
    /// value, so reversing the arguments reports the other side.
    #[test]
    fn prop_payloads_come_from_the_incoming_options(a in arb_options(), b in arb_options()) {
        let delta = OptionsDelta::between(&a, &b);

        prop_assert_eq!(delta.from_value, b.from);
        prop_assert_eq!(delta.to_value, b.to);
        prop_assert_eq!(delta.rollup_value, b.rollup);
        prop_assert_eq!(delta.time_period_type_value, b.time_period_type);
        prop_assert_eq!(delta.time_periods_value, b.time_periods);
    }

    /// **Property: fully populated identical options diff clean**
    ///
    /// When every field is present on both sides and equal, nothing is
    /// flagged, and no provider kind wants a reload.
    #[test]
    fn prop_identical_full_options_never_reload(options in arb_full_options()) {
        let delta = OptionsDelta::between(&options, &options.clone());

        prop_assert!(!delta.any());
        prop_assert!(!ProviderKind::PointValues.needs_to_load(&delta));
        prop_assert!(!ProviderKind::Statistics.needs_to_load(&delta));
        prop_assert!(!ProviderKind::Accumulator.needs_to_load(&delta));
    }

    /// **Property: any() is the disjunction of the five flags**
    #[test]
    fn prop_any_is_the_flag_disjunction(a in arb_options(), b in arb_options()) {
        let delta = OptionsDelta::between(&a, &b);
        let expected = delta.from
            || delta.to
            || delta.rollup
            || delta.time_period_type
            || delta.time_periods;

        prop_assert_eq!(delta.any(), expected);
        prop_assert_eq!(delta.window(), delta.from || delta.to);
    }

    /// **Property: kind predicates inspect only their fields**
    ///
    /// Value providers reload on any flag; statistics and accumulator
    /// providers reload on window flags only.
    #[test]
    fn prop_kind_predicates_inspect_their_fields(a in arb_options(), b in arb_options()) {
        let delta = OptionsDelta::between(&a, &b);

        prop_assert_eq!(ProviderKind::PointValues.needs_to_load(&delta), delta.any());
        prop_assert_eq!(ProviderKind::Statistics.needs_to_load(&delta), delta.window());
        prop_assert_eq!(ProviderKind::Accumulator.needs_to_load(&delta), delta.window());
    }
}
