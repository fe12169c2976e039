//! Data provider module.
//!
//! This module provides the core types and traits for feeding console
//! displays with point data:
//!
//! - [`types`] - Strong identities (Xid) and point configurations
//! - [`options`] - Query options and the option change comparator
//! - [`kind`] - Provider kinds and their per-point load behavior
//! - [`listener`] - Display listener trait and delivery payloads
//! - [`data_provider`] - The provider engine
//! - [`registry`] - Id-keyed provider registry for composition roots
//! - [`diagnostics`] - Failure diagnostics sink
//! - [`constants`] - Configuration constants
//!
//! # Architecture
//!
//! ```text
//! Display component(s)              Console server
//!   |         ^                        ^      |
//!   | load()  | on_load/redraw         |      | push frames
//!   v         |                        |      v
//! DataProvider ---- TelemetryClient ---+   PointEvent
//!   |    ^                                    |
//!   |    +------------------------------------+
//!   |              handle_point_event
//!   v
//! DiagnosticsSink
//! ```
//!
//! 1. **Options** (`options.rs`) - Value objects compared field by field to
//!    decide whether a load is needed at all
//! 2. **Kinds** (`kind.rs`) - Closed set of load behaviors: values,
//!    statistics, accumulator, realtime
//! 3. **Engine** (`data_provider.rs`) - Batched concurrent loads, ordered
//!    delivery, cancellation, write-back
//! 4. **Listeners** (`listener.rs`) - Displays observing one provider
//! 5. **Registry** (`registry.rs`) - Explicit wiring owned by the
//!    composition root
//!
//! This separation allows:
//! - Easy testing with scripted transport clients
//! - Swapping the REST transport without touching delivery semantics
//! - Clear boundaries between display state and data access

pub mod constants;
pub mod data_provider;
pub mod diagnostics;
pub mod kind;
pub mod listener;
pub mod options;
pub mod registry;
pub mod types;


// Re-export strong types
pub use types::{PointConfiguration, Xid};

// Re-export option types
pub use options::{OptionsDelta, QueryOptions};

// Re-export kind and listener types
pub use kind::ProviderKind;
pub use listener::{DisplayListener, ListenerCall, PointData, RecordingListener};

// Re-export engine types
pub use data_provider::{DataProvider, LoadOutcome, ProviderSettings, PutRequest};

// Re-export registry types
pub use registry::{ProviderRegistry, RegistryError};

// Re-export diagnostics types
pub use diagnostics::{
    DiagnosticsSink, LoadDiagnostic, LogDiagnosticsSink, NoOpDiagnosticsSink,
    RecordingDiagnosticsSink,
};

// Re-export constants
pub use constants::*;
