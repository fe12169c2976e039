//! Diagnostics sink trait and implementations.

use std::sync::{Arc, Mutex};

use log::error;

use super::types::Xid;

/// A transport or API failure observed during a load or write.
///
/// Expected data-shape outcomes (no data, too much data) never become
/// diagnostics; only failures that indicate the system is unhealthy do.
#[derive(Clone, Debug, PartialEq)]
pub struct LoadDiagnostic {
    /// Id of the provider that observed the failure
    pub provider_id: String,

    /// The point involved, when the failure was point-scoped
    pub xid: Option<Xid>,

    /// Human-readable failure description
    pub message: String,
}

impl LoadDiagnostic {
    pub fn new(provider_id: impl Into<String>, xid: Option<Xid>, message: impl Into<String>) -> Self {
        Self {
            provider_id: provider_id.into(),
            xid,
            message: message.into(),
        }
    }
}

/// Trait for receiving provider failure diagnostics.
///
/// # Design Rules
///
/// - `record()` must be fast and non-blocking (no network calls)
/// - Failure to record must not affect the load that reported it
pub trait DiagnosticsSink: Send + Sync {
    /// Record a single diagnostic.
    fn record(&self, diagnostic: LoadDiagnostic);
}

/// Default sink - forwards diagnostics to the log facade.
#[derive(Clone, Default)]
pub struct LogDiagnosticsSink;

impl DiagnosticsSink for LogDiagnosticsSink {
    fn record(&self, diagnostic: LoadDiagnostic) {
        match &diagnostic.xid {
            Some(xid) => error!(
                "provider {} failed loading {}: {}",
                diagnostic.provider_id, xid, diagnostic.message
            ),
            None => error!(
                "provider {} failed: {}",
                diagnostic.provider_id, diagnostic.message
            ),
        }
    }
}

/// No-op sink for contexts that don't track diagnostics.
#[derive(Clone, Default)]
pub struct NoOpDiagnosticsSink;

impl DiagnosticsSink for NoOpDiagnosticsSink {
    fn record(&self, _diagnostic: LoadDiagnostic) {
        // Intentionally empty - diagnostics are discarded
    }
}

/// Recording sink for tests - collects recorded diagnostics.
#[derive(Clone, Default)]
pub struct RecordingDiagnosticsSink {
    diagnostics: Arc<Mutex<Vec<LoadDiagnostic>>>,
}

impl RecordingDiagnosticsSink {
    pub fn new() -> Self {
        Self {
            diagnostics: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns all collected diagnostics.
    pub fn diagnostics(&self) -> Vec<LoadDiagnostic> {
        self.diagnostics.lock().unwrap().clone()
    }

    /// Returns the number of collected diagnostics.
    pub fn len(&self) -> usize {
        self.diagnostics.lock().unwrap().len()
    }

    /// Returns true if no diagnostics were collected.
    pub fn is_empty(&self) -> bool {
        self.diagnostics.lock().unwrap().is_empty()
    }
}

impl DiagnosticsSink for RecordingDiagnosticsSink {
    fn record(&self, diagnostic: LoadDiagnostic) {
        self.diagnostics.lock().unwrap().push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_sink_does_not_panic() {
        let sink = NoOpDiagnosticsSink;
        sink.record(LoadDiagnostic::new(
            "chart-1",
            Some(Xid::new("pump-7-flow")),
            "HTTP 500",
        ));
    }

    #[test]
    fn test_recording_sink_collects() {
        let sink = RecordingDiagnosticsSink::new();
        assert!(sink.is_empty());

        sink.record(LoadDiagnostic::new("chart-1", None, "connection refused"));
        sink.record(LoadDiagnostic::new(
            "chart-1",
            Some(Xid::new("tank-2-level")),
            "HTTP 503",
        ));

        assert_eq!(sink.len(), 2);
        let diagnostics = sink.diagnostics();
        assert_eq!(diagnostics[0].xid, None);
        assert_eq!(diagnostics[1].xid, Some(Xid::new("tank-2-level")));
    }
}
