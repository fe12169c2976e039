//! Provider kinds and their per-point load behavior.
//!
//! A provider's kind fixes three things: which option changes make a
//! reload necessary, what a single point load fetches, and whether the
//! point rides the push channel. The kinds form a closed set; displays
//! pick one at construction and never change it.

use std::fmt;
use std::sync::Arc;

use gridwatch_telemetry::{ApiError, PushChannel, TelemetryClient};

use crate::errors::PointLoadError;

use super::constants::{
    KIND_ACCUMULATOR, KIND_POINT_VALUES, KIND_REALTIME, KIND_STATISTICS,
};
use super::listener::PointData;
use super::options::{OptionsDelta, QueryOptions};
use super::types::Xid;

/// What a provider loads and when it reloads.
#[derive(Clone)]
pub enum ProviderKind {
    /// Historical values in a window, optionally rolled up
    PointValues,

    /// Server-side window statistics
    Statistics,

    /// Change accumulated over the window, from the window statistics
    Accumulator,

    /// Historical values plus push updates over the given channel
    Realtime {
        channel: Arc<dyn PushChannel>,
    },
}

impl ProviderKind {
    /// Kind name used in logs and diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::PointValues => KIND_POINT_VALUES,
            Self::Statistics => KIND_STATISTICS,
            Self::Accumulator => KIND_ACCUMULATOR,
            Self::Realtime { .. } => KIND_REALTIME,
        }
    }

    pub fn is_realtime(&self) -> bool {
        matches!(self, Self::Realtime { .. })
    }

    /// Whether a change in options makes a reload necessary.
    ///
    /// Only consulted when a previous load completed; first loads and
    /// loads after a point-set change skip the check entirely.
    pub fn needs_to_load(&self, delta: &OptionsDelta) -> bool {
        match self {
            // Every compared field feeds the value query.
            Self::PointValues => delta.any(),

            // Statistics ignore rollup parameters; only the window matters.
            Self::Statistics | Self::Accumulator => delta.window(),

            // A completed load exists by the time the delta is consulted,
            // and everything after it arrives over the push channel.
            Self::Realtime { .. } => false,
        }
    }

    /// Load one point according to this kind.
    pub async fn load_point(
        &self,
        client: &dyn TelemetryClient,
        xid: &Xid,
        options: &QueryOptions,
        batch_limit: u64,
    ) -> Result<PointData, PointLoadError> {
        match self {
            Self::PointValues | Self::Realtime { .. } => {
                let mut query = options.to_range_query();

                // Count before fetching so an oversized window fails
                // without moving the data.
                let count = client.point_value_count(xid.as_str(), &query).await?;
                if count == 0 {
                    return Err(PointLoadError::NoData);
                }
                if count > batch_limit {
                    return Err(PointLoadError::TooMuchData {
                        count,
                        limit: batch_limit,
                    });
                }

                query.limit = Some(batch_limit);
                let values = client.point_values(xid.as_str(), &query).await?;
                if values.is_empty() {
                    return Err(PointLoadError::NoData);
                }
                Ok(PointData::Values(values))
            }

            Self::Statistics => {
                let stats = client.statistics(xid.as_str(), &options.to_range_query()).await?;
                if !stats.has_data() {
                    return Err(PointLoadError::NoData);
                }
                Ok(PointData::Statistics(stats))
            }

            Self::Accumulator => {
                let stats = client.statistics(xid.as_str(), &options.to_range_query()).await?;
                if !stats.has_data() {
                    return Err(PointLoadError::NoData);
                }
                match stats.change() {
                    Some(change) => Ok(PointData::Accumulation(change)),
                    None => Err(PointLoadError::NoData),
                }
            }
        }
    }

    /// Register a point on the push channel. No-op for non-realtime kinds.
    pub(crate) async fn subscribe_point(&self, xid: &Xid) -> Result<(), ApiError> {
        match self {
            Self::Realtime { channel } => channel.subscribe(xid.as_str()).await,
            _ => Ok(()),
        }
    }

    /// Drop a point's push-channel registration. No-op for non-realtime kinds.
    pub(crate) async fn unsubscribe_point(&self, xid: &Xid) -> Result<(), ApiError> {
        match self {
            Self::Realtime { channel } => channel.unsubscribe(xid.as_str()).await,
            _ => Ok(()),
        }
    }
}

impl fmt::Debug for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProviderKind::{}", self.name())
    }
}
