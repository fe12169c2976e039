//! Gridwatch Telemetry Crate
//!
//! This crate provides the wire models and transports for talking to a
//! Gridwatch console server.
//!
//! # Overview
//!
//! The telemetry crate supports:
//! - Range queries over point values with server-side rollups
//! - Window statistics (count, first/last, min/max, average, sum, integral, delta)
//! - Set-point writes with optional annotations
//! - Push-channel subscriptions for realtime points
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +------------------+
//! |  Provider Layer  | --> | TelemetryClient  |  (transport trait)
//! +------------------+     +------------------+
//!                                  |
//!                                  v
//!                         +-------------------+
//!                         | RestTelemetryClient|  (reqwest)
//!                         +-------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |   Console API    |  (/api/v1/points/...)
//!                          +------------------+
//!
//! +------------------+     +------------------+
//! |  Provider Layer  | --> |   PushChannel    |  (subscription trait)
//! +------------------+     +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`PointValue`] - A sampled value with optional rendered text
//! - [`PointStatistics`] - Server-side aggregate over a window
//! - [`ValueRangeQuery`] - Window, rollup, and limit parameters
//! - [`PointWrite`] - A set-point write
//! - [`PointEvent`] - A push-channel notification

pub mod client;
pub mod errors;
pub mod models;

// Re-export all public types from models
pub use models::{
    PointEvent, PointEventKind, PointStatistics, PointValue, PointWrite, RollupType,
    TimePeriodType, ValueRangeQuery,
};

// Re-export transport types
pub use client::{PushChannel, RestClientConfig, RestTelemetryClient, TelemetryClient};

// Re-export error types
pub use errors::ApiError;
