//! Display listener trait and implementations.

use std::sync::{Arc, Mutex};

use gridwatch_telemetry::{PointStatistics, PointValue};

use crate::errors::{PointLoadError, PointLoadFailure};

use super::types::{PointConfiguration, Xid};

/// Data delivered to a listener for one point.
///
/// Which variant arrives is fixed by the provider kind: value providers
/// deliver `Values`, statistics providers deliver `Statistics`, and
/// accumulator providers deliver `Accumulation`.
#[derive(Clone, Debug, PartialEq)]
pub enum PointData {
    /// Sampled or rolled-up values, ascending by timestamp
    Values(Vec<PointValue>),
    /// Aggregate over the requested window
    Statistics(PointStatistics),
    /// Change accumulated over the requested window
    Accumulation(f64),
}

impl PointData {
    pub fn as_values(&self) -> Option<&[PointValue]> {
        match self {
            Self::Values(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_statistics(&self) -> Option<&PointStatistics> {
        match self {
            Self::Statistics(stats) => Some(stats),
            _ => None,
        }
    }
}

/// Trait for display components fed by a provider.
///
/// Providers notify listeners in registration order, and deliver points
/// in configuration order once a whole batch has settled. Only `on_load`
/// is required; the remaining callbacks default to no-ops so a gauge
/// that never shows a spinner simply skips `loading`.
///
/// # Design Rules
///
/// - Callbacks must be fast and non-blocking (no network calls)
/// - Callbacks run on the provider's task; a slow listener delays the
///   listeners registered after it
/// - Panicking in a callback is a listener bug, not a provider concern
pub trait DisplayListener: Send + Sync {
    /// Deliver one point's data.
    fn on_load(&self, data: &PointData, point: &PointConfiguration);

    /// The provider was cleared; drop any displayed state.
    fn on_clear(&self) {}

    /// A load batch is about to start.
    fn loading(&self) {}

    /// One point in the batch failed.
    fn load_point_failed(&self, failure: &PointLoadFailure) {
        let _ = failure;
    }

    /// The batch settled and all deliveries for it are done.
    fn redraw(&self) {}
}

/// One observed listener callback, for assertions on ordering.
#[derive(Clone, Debug, PartialEq)]
pub enum ListenerCall {
    Load { xid: Xid, data: PointData },
    Clear,
    Loading,
    LoadFailed { xid: Xid, error: PointLoadError },
    Redraw,
}

/// Recording listener for tests - collects every callback in order.
#[derive(Clone, Default)]
pub struct RecordingListener {
    calls: Arc<Mutex<Vec<ListenerCall>>>,
}

impl RecordingListener {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns all recorded calls.
    pub fn calls(&self) -> Vec<ListenerCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Clears recorded calls.
    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Returns the number of recorded calls.
    pub fn len(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Returns true if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.calls.lock().unwrap().is_empty()
    }

    /// Xids of the `on_load` calls, in delivery order.
    pub fn loaded_xids(&self) -> Vec<Xid> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ListenerCall::Load { xid, .. } => Some(xid),
                _ => None,
            })
            .collect()
    }
}

impl DisplayListener for RecordingListener {
    fn on_load(&self, data: &PointData, point: &PointConfiguration) {
        self.calls.lock().unwrap().push(ListenerCall::Load {
            xid: point.xid.clone(),
            data: data.clone(),
        });
    }

    fn on_clear(&self) {
        self.calls.lock().unwrap().push(ListenerCall::Clear);
    }

    fn loading(&self) {
        self.calls.lock().unwrap().push(ListenerCall::Loading);
    }

    fn load_point_failed(&self, failure: &PointLoadFailure) {
        self.calls.lock().unwrap().push(ListenerCall::LoadFailed {
            xid: failure.xid.clone(),
            error: failure.error.clone(),
        });
    }

    fn redraw(&self) {
        self.calls.lock().unwrap().push(ListenerCall::Redraw);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    struct LoadOnlyListener;

    impl DisplayListener for LoadOnlyListener {
        fn on_load(&self, _data: &PointData, _point: &PointConfiguration) {}
    }

    #[test]
    fn test_default_callbacks_are_noops() {
        let listener = LoadOnlyListener;
        listener.on_clear();
        listener.loading();
        listener.load_point_failed(&PointLoadFailure::new(
            Xid::new("pump-7-flow"),
            PointLoadError::NoData,
        ));
        listener.redraw();
    }

    #[test]
    fn test_recording_listener_keeps_order() {
        let listener = RecordingListener::new();
        assert!(listener.is_empty());

        listener.loading();
        listener.on_load(
            &PointData::Values(vec![PointValue::new(Utc::now(), 1.0)]),
            &PointConfiguration::new("pump-7-flow"),
        );
        listener.redraw();

        let calls = listener.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0], ListenerCall::Loading);
        assert!(matches!(calls[1], ListenerCall::Load { .. }));
        assert_eq!(calls[2], ListenerCall::Redraw);

        listener.clear();
        assert!(listener.is_empty());
    }

    #[test]
    fn test_loaded_xids_filters_loads() {
        let listener = RecordingListener::new();
        listener.loading();
        listener.on_load(
            &PointData::Accumulation(4.2),
            &PointConfiguration::new("tank-2-level"),
        );
        listener.redraw();

        assert_eq!(listener.loaded_xids(), vec![Xid::new("tank-2-level")]);
    }
}
