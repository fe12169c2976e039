//! Error types and severity classification for the provider layer.
//!
//! This module provides:
//! - [`LoadError`]: The load-level error enum returned by provider operations
//! - [`PointLoadError`]: Per-point failure kinds inside a batch
//! - [`PointLoadFailure`]: A per-point error paired with the point's xid
//!
//! Two of the load-level kinds are control-flow signals rather than
//! faults: a disabled provider and a load that the option delta made
//! unnecessary both resolve the call without any network traffic. The
//! [`is_benign`](LoadError::is_benign) classification keeps callers from
//! alarming on them.

use thiserror::Error;

use gridwatch_telemetry::ApiError;

use crate::provider::types::Xid;

/// Errors returned by provider load and write operations.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The provider is disabled; nothing was fetched and no listener ran.
    #[error("Provider disabled: {0}")]
    ProviderDisabled(String),

    /// The query options did not change in any way this provider kind
    /// cares about, so the previous results remain valid.
    #[error("Load not needed")]
    LoadNotNeeded,

    /// A newer load superseded this one before its batch settled.
    /// Nothing was delivered to listeners.
    #[error("Load cancelled")]
    Cancelled,

    /// One or more points in the batch failed. Successful points in the
    /// same batch are withheld; listeners saw the failure pass instead.
    #[error("{failed} of {total} point loads failed")]
    PointLoadsFailed {
        /// Number of points that failed
        failed: usize,
        /// Number of points in the batch
        total: usize,
        /// The per-point failures, in configuration order
        failures: Vec<PointLoadFailure>,
    },
}

impl LoadError {
    /// Whether this outcome is a control-flow signal rather than a fault.
    ///
    /// Benign outcomes must never be surfaced to operators as errors:
    /// a display that asks for the same window twice gets `LoadNotNeeded`,
    /// and a display that pans quickly gets `Cancelled` for the loads it
    /// abandoned.
    pub fn is_benign(&self) -> bool {
        matches!(self, Self::LoadNotNeeded | Self::Cancelled)
    }
}

/// Failure kinds for a single point inside a batch.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PointLoadError {
    /// The window matched no values. Expected for idle points.
    #[error("No data in the requested range")]
    NoData,

    /// The window matched more values than the provider is willing to
    /// pull into a display. Narrow the window or add a rollup.
    #[error("Too much data: {count} values exceeds the limit of {limit}")]
    TooMuchData {
        /// Number of values the query would return
        count: u64,
        /// The provider's batch ceiling
        limit: u64,
    },

    /// The transport or the console API failed.
    #[error("API failure: {message}")]
    Api {
        /// HTTP status, when one was observed
        status: Option<u16>,
        /// Transport error message
        message: String,
        /// Whether retrying could succeed, per [`ApiError::is_transient`]
        transient: bool,
    },
}

impl PointLoadError {
    /// Whether this is an expected data-shape outcome rather than a fault.
    ///
    /// `NoData` and `TooMuchData` describe the window, not the system;
    /// they are reported to listeners but never to the diagnostics sink.
    pub fn is_expected(&self) -> bool {
        matches!(self, Self::NoData | Self::TooMuchData { .. })
    }
}

impl From<ApiError> for PointLoadError {
    fn from(error: ApiError) -> Self {
        Self::Api {
            status: error.status_code(),
            transient: error.is_transient(),
            message: error.to_string(),
        }
    }
}

/// A per-point failure, tagged with the point it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct PointLoadFailure {
    /// External id of the failed point
    pub xid: Xid,
    /// What went wrong
    pub error: PointLoadError,
}

impl PointLoadFailure {
    pub fn new(xid: Xid, error: PointLoadError) -> Self {
        Self { xid, error }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_not_needed_is_benign() {
        assert!(LoadError::LoadNotNeeded.is_benign());
    }

    #[test]
    fn test_cancelled_is_benign() {
        assert!(LoadError::Cancelled.is_benign());
    }

    #[test]
    fn test_disabled_is_not_benign() {
        assert!(!LoadError::ProviderDisabled("chart-1".to_string()).is_benign());
    }

    #[test]
    fn test_point_failures_are_not_benign() {
        let error = LoadError::PointLoadsFailed {
            failed: 1,
            total: 3,
            failures: vec![PointLoadFailure::new(
                Xid::new("pump-7-flow"),
                PointLoadError::NoData,
            )],
        };
        assert!(!error.is_benign());
        assert_eq!(error.to_string(), "1 of 3 point loads failed");
    }

    #[test]
    fn test_no_data_is_expected() {
        assert!(PointLoadError::NoData.is_expected());
    }

    #[test]
    fn test_too_much_data_is_expected() {
        let error = PointLoadError::TooMuchData {
            count: 12000,
            limit: 5000,
        };
        assert!(error.is_expected());
        assert_eq!(
            error.to_string(),
            "Too much data: 12000 values exceeds the limit of 5000"
        );
    }

    #[test]
    fn test_api_error_is_not_expected() {
        let error = PointLoadError::Api {
            status: Some(500),
            message: "boom".to_string(),
            transient: true,
        };
        assert!(!error.is_expected());
    }

    #[test]
    fn test_api_error_conversion_keeps_status() {
        let api = ApiError::Status {
            status: 503,
            message: "maintenance".to_string(),
        };
        let error = PointLoadError::from(api);
        match error {
            PointLoadError::Api { status, .. } => assert_eq!(status, Some(503)),
            other => panic!("expected Api, got {:?}", other),
        }
    }

    #[test]
    fn test_api_error_conversion_keeps_transiency() {
        // The transport's retry classification survives the flattening,
        // so a display can tell "try again later" from "give up".
        let error = PointLoadError::from(ApiError::RateLimited);
        assert!(matches!(
            error,
            PointLoadError::Api {
                transient: true,
                ..
            }
        ));

        let error = PointLoadError::from(ApiError::PointNotFound("pump-7-flow".to_string()));
        assert!(matches!(
            error,
            PointLoadError::Api {
                transient: false,
                ..
            }
        ));
    }
}
