//! Transport trait definitions.
//!
//! This module defines the `TelemetryClient` trait the provider layer
//! loads point data through, and the `PushChannel` trait that manages
//! server-side subscriptions for realtime points.

pub mod rest;

use async_trait::async_trait;

use crate::errors::ApiError;
use crate::models::{PointStatistics, PointValue, PointWrite, ValueRangeQuery};

/// Trait for console API clients.
///
/// Implement this trait to back providers with a new transport. The
/// shipped implementation is [`rest::RestTelemetryClient`]; tests use
/// scripted in-memory implementations.
#[async_trait]
pub trait TelemetryClient: Send + Sync {
    /// Count the values a query would match, without fetching them.
    ///
    /// Providers call this before a bulk fetch to catch empty and
    /// oversized windows cheaply.
    ///
    /// # Arguments
    ///
    /// * `xid` - External id of the point
    /// * `query` - The window and rollup parameters
    ///
    /// # Returns
    ///
    /// The number of matching values, or an `ApiError` on failure.
    async fn point_value_count(&self, xid: &str, query: &ValueRangeQuery)
        -> Result<u64, ApiError>;

    /// Fetch point values in a window.
    ///
    /// # Arguments
    ///
    /// * `xid` - External id of the point
    /// * `query` - The window and rollup parameters
    ///
    /// # Returns
    ///
    /// Values ordered by timestamp ascending, or an `ApiError` on failure.
    async fn point_values(
        &self,
        xid: &str,
        query: &ValueRangeQuery,
    ) -> Result<Vec<PointValue>, ApiError>;

    /// Fetch the server-side aggregate over a window.
    ///
    /// # Arguments
    ///
    /// * `xid` - External id of the point
    /// * `query` - The window; rollup parameters are ignored by the server
    ///
    /// # Returns
    ///
    /// The window statistics, or an `ApiError` on failure.
    async fn statistics(
        &self,
        xid: &str,
        query: &ValueRangeQuery,
    ) -> Result<PointStatistics, ApiError>;

    /// Write a value to a settable point.
    ///
    /// # Arguments
    ///
    /// * `xid` - External id of the point
    /// * `write` - The value, optional timestamp, and optional annotation
    ///
    /// # Returns
    ///
    /// The value as stored by the server, or an `ApiError` on failure.
    async fn write_point_value(&self, xid: &str, write: &PointWrite)
        -> Result<PointValue, ApiError>;
}

/// Trait for the console's push channel.
///
/// Covers server-side registration bookkeeping only. Delivering the
/// events that arrive on the channel is the composition root's job: it
/// decodes frames into [`PointEvent`](crate::models::PointEvent)s and
/// hands them to the owning provider.
#[async_trait]
pub trait PushChannel: Send + Sync {
    /// Register interest in a point's value updates.
    async fn subscribe(&self, xid: &str) -> Result<(), ApiError>;

    /// Drop a registration made with [`subscribe`](Self::subscribe).
    async fn unsubscribe(&self, xid: &str) -> Result<(), ApiError>;
}

pub use rest::{RestClientConfig, RestTelemetryClient};
