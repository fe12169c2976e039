//! Gridwatch Providers - Data providers for console displays.
//!
//! This crate contains the client-side data access layer of the
//! Gridwatch console. It is transport-agnostic above the
//! `TelemetryClient` trait defined by the `gridwatch-telemetry` crate:
//! providers batch concurrent point loads, skip loads their query
//! options do not call for, and fan settled results out to display
//! listeners in a deterministic order.

pub mod errors;
pub mod provider;

// Re-export common types from the provider module
pub use provider::*;

// Re-export error types
pub use errors::{LoadError, PointLoadError, PointLoadFailure};
