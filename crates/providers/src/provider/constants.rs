//! Provider configuration constants.

/// Default ceiling on the number of values a single point load may pull.
///
/// A display asking for more raw values than this gets a `TooMuchData`
/// failure instead; the fix on the display side is a narrower window or
/// a rollup. Statistics loads are exempt since the server aggregates
/// before answering.
pub const DEFAULT_BATCH_LIMIT: u64 = 5000;

/// Provider kind names used in logs and diagnostics.
pub const KIND_POINT_VALUES: &str = "POINT_VALUES";
pub const KIND_STATISTICS: &str = "STATISTICS";
pub const KIND_ACCUMULATOR: &str = "ACCUMULATOR";
pub const KIND_REALTIME: &str = "REALTIME";
