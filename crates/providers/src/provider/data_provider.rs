//! The data provider engine.
//!
//! A [`DataProvider`] owns a list of point configurations and a list of
//! display listeners, loads every configured point concurrently when its
//! query options call for it, and fans the settled batch out to the
//! listeners in a deterministic order. Results are buffered until the
//! whole batch settles; listeners never observe completion order.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use futures::future::join_all;
use log::{debug, warn};
use tokio::sync::watch;

use gridwatch_telemetry::{PointEvent, PointEventKind, PointWrite, TelemetryClient};

use crate::errors::{LoadError, PointLoadError, PointLoadFailure};

use super::constants::DEFAULT_BATCH_LIMIT;
use super::diagnostics::{DiagnosticsSink, LoadDiagnostic, LogDiagnosticsSink};
use super::kind::ProviderKind;
use super::listener::{DisplayListener, PointData};
use super::options::{OptionsDelta, QueryOptions};
use super::types::{PointConfiguration, Xid};

// =============================================================================
// Settings and request types
// =============================================================================

/// Per-provider behavior switches.
#[derive(Clone, Debug)]
pub struct ProviderSettings {
    /// Clear listeners at the start of every load
    pub clear_on_load: bool,

    /// A new load cancels the previous in-flight load of this provider
    pub cancel_last_load: bool,

    /// Ceiling on raw values per point load
    pub batch_limit: u64,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            clear_on_load: false,
            cancel_last_load: false,
            batch_limit: DEFAULT_BATCH_LIMIT,
        }
    }
}

impl ProviderSettings {
    pub fn with_clear_on_load(mut self) -> Self {
        self.clear_on_load = true;
        self
    }

    pub fn with_cancel_last_load(mut self) -> Self {
        self.cancel_last_load = true;
        self
    }

    pub fn with_batch_limit(mut self, limit: u64) -> Self {
        self.batch_limit = limit;
        self
    }
}

/// A set-point write request against a provider's configured points.
#[derive(Clone, Debug, Default)]
pub struct PutRequest {
    /// Value written to every point when `put_all` is set
    pub value: Option<f64>,

    /// Per-point values for targeted writes
    pub values: HashMap<Xid, f64>,

    /// Write `value` to every configured point
    pub put_all: bool,

    /// Deliver the written values through the listener pass afterwards
    pub refresh: bool,
}

impl PutRequest {
    /// Write the same value to every configured point.
    pub fn all(value: f64) -> Self {
        Self {
            value: Some(value),
            put_all: true,
            ..Default::default()
        }
    }

    /// Write per-point values; points missing from the map are skipped.
    pub fn for_points(values: HashMap<Xid, f64>) -> Self {
        Self {
            values,
            ..Default::default()
        }
    }

    pub fn with_refresh(mut self) -> Self {
        self.refresh = true;
        self
    }
}

/// Settled results of a load or write, in configuration order.
#[derive(Clone, Debug, Default)]
pub struct LoadOutcome {
    /// One entry per point that produced data
    pub results: Vec<(PointConfiguration, PointData)>,
}

impl LoadOutcome {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

// =============================================================================
// DataProvider
// =============================================================================

/// Mutable provider state, guarded by one mutex.
struct ProviderState {
    points: Vec<PointConfiguration>,
    listeners: Vec<Arc<dyn DisplayListener>>,
    previous_options: Option<QueryOptions>,
    enabled: bool,
}

/// One provider instance feeding one display component.
///
/// All state lives on the instance; nothing is shared between providers
/// except the transport client handed in at construction. Methods take
/// `&self` so registries and event pumps can share the provider behind
/// an `Arc`.
pub struct DataProvider {
    id: String,
    kind: ProviderKind,
    settings: ProviderSettings,
    client: Arc<dyn TelemetryClient>,
    diagnostics: Arc<dyn DiagnosticsSink>,
    state: Mutex<ProviderState>,
    // Monotonic load generation; bumping it supersedes in-flight batches.
    generation: watch::Sender<u64>,
}

impl DataProvider {
    /// Create an enabled provider with default settings and log-backed
    /// diagnostics.
    pub fn new(
        id: impl Into<String>,
        kind: ProviderKind,
        client: Arc<dyn TelemetryClient>,
    ) -> Self {
        let (generation, _) = watch::channel(0u64);
        Self {
            id: id.into(),
            kind,
            settings: ProviderSettings::default(),
            client,
            diagnostics: Arc::new(LogDiagnosticsSink),
            state: Mutex::new(ProviderState {
                points: Vec::new(),
                listeners: Vec::new(),
                previous_options: None,
                enabled: true,
            }),
            generation,
        }
    }

    pub fn with_settings(mut self, settings: ProviderSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn DiagnosticsSink>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> &ProviderKind {
        &self.kind
    }

    pub fn settings(&self) -> &ProviderSettings {
        &self.settings
    }

    pub fn is_enabled(&self) -> bool {
        self.lock_state().enabled
    }

    pub fn point_count(&self) -> usize {
        self.lock_state().points.len()
    }

    pub fn has_point(&self, xid: &Xid) -> bool {
        self.lock_state().points.iter().any(|p| &p.xid == xid)
    }

    /// Snapshot of the configured points, in configuration order.
    pub fn points(&self) -> Vec<PointConfiguration> {
        self.lock_state().points.clone()
    }

    /// Options of the last accepted load, until a point-set change
    /// invalidates them.
    pub fn previous_options(&self) -> Option<QueryOptions> {
        self.lock_state().previous_options.clone()
    }

    /// Lock the state mutex, recovering from poison if necessary.
    ///
    /// A panicking listener can poison the lock; provider bookkeeping is
    /// still consistent at every lock boundary, so recovery is safe.
    fn lock_state(&self) -> MutexGuard<'_, ProviderState> {
        self.state.lock().unwrap_or_else(|poisoned| {
            warn!("provider {} state mutex was poisoned, recovering", self.id);
            poisoned.into_inner()
        })
    }

    // =========================================================================
    // Point and listener management
    // =========================================================================

    /// Add a point configuration.
    ///
    /// Returns `false` without side effects when the xid is already
    /// configured. Otherwise the point is appended, the cached options
    /// are invalidated so the next load runs unconditionally, and a
    /// realtime provider that is enabled subscribes the point.
    pub async fn add_data_point(&self, config: PointConfiguration) -> bool {
        let subscribe = {
            let mut state = self.lock_state();
            if state.points.iter().any(|p| p.xid == config.xid) {
                debug!("provider {}: point {} already configured", self.id, config.xid);
                return false;
            }
            state.points.push(config.clone());
            state.previous_options = None;
            state.enabled
        };

        if subscribe {
            if let Err(e) = self.kind.subscribe_point(&config.xid).await {
                warn!("provider {}: subscribe {} failed: {}", self.id, config.xid, e);
                self.diagnostics.record(LoadDiagnostic::new(
                    &self.id,
                    Some(config.xid.clone()),
                    e.to_string(),
                ));
            }
        }
        true
    }

    /// Remove a point configuration by xid.
    ///
    /// Returns `false` when the xid is not configured. Otherwise the
    /// point is removed, the cached options are invalidated, and a
    /// realtime provider that is enabled unsubscribes the point.
    pub async fn remove_data_point(&self, xid: &Xid) -> bool {
        let unsubscribe = {
            let mut state = self.lock_state();
            let before = state.points.len();
            state.points.retain(|p| &p.xid != xid);
            if state.points.len() == before {
                return false;
            }
            state.previous_options = None;
            state.enabled
        };

        if unsubscribe {
            if let Err(e) = self.kind.unsubscribe_point(xid).await {
                warn!("provider {}: unsubscribe {} failed: {}", self.id, xid, e);
                self.diagnostics.record(LoadDiagnostic::new(
                    &self.id,
                    Some(xid.clone()),
                    e.to_string(),
                ));
            }
        }
        true
    }

    /// Register a listener. Notification order follows registration order.
    pub fn add_listener(&self, listener: Arc<dyn DisplayListener>) {
        self.lock_state().listeners.push(listener);
    }

    /// Remove a listener by identity. Returns `false` when it was not
    /// registered.
    pub fn remove_listener(&self, listener: &Arc<dyn DisplayListener>) -> bool {
        let mut state = self.lock_state();
        let before = state.listeners.len();
        state.listeners.retain(|l| !Arc::ptr_eq(l, listener));
        state.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.lock_state().listeners.len()
    }

    /// Clear displayed state, and optionally the point configurations.
    ///
    /// `on_clear` runs on every listener in either case. Push-channel
    /// registrations are left in place; `disable` drops them.
    pub fn clear(&self, clear_configurations: bool) {
        let listeners = {
            let mut state = self.lock_state();
            if clear_configurations {
                state.points.clear();
                state.previous_options = None;
            }
            state.listeners.clone()
        };
        for listener in &listeners {
            listener.on_clear();
        }
    }

    // =========================================================================
    // Enable / disable
    // =========================================================================

    /// Make the provider eligible to load. Idempotent.
    ///
    /// A realtime provider subscribes every configured point on the
    /// disabled-to-enabled transition.
    pub async fn enable(&self) {
        let points = {
            let mut state = self.lock_state();
            if state.enabled {
                return;
            }
            state.enabled = true;
            state.points.clone()
        };
        debug!("provider {} enabled", self.id);
        self.sync_subscriptions(&points, true).await;
    }

    /// Stop the provider from loading. Idempotent.
    ///
    /// A realtime provider unsubscribes every configured point on the
    /// enabled-to-disabled transition.
    pub async fn disable(&self) {
        let points = {
            let mut state = self.lock_state();
            if !state.enabled {
                return;
            }
            state.enabled = false;
            state.points.clone()
        };
        debug!("provider {} disabled", self.id);
        self.sync_subscriptions(&points, false).await;
    }

    async fn sync_subscriptions(&self, points: &[PointConfiguration], subscribe: bool) {
        for point in points {
            let result = if subscribe {
                self.kind.subscribe_point(&point.xid).await
            } else {
                self.kind.unsubscribe_point(&point.xid).await
            };
            if let Err(e) = result {
                let verb = if subscribe { "subscribe" } else { "unsubscribe" };
                warn!("provider {}: {} {} failed: {}", self.id, verb, point.xid, e);
                self.diagnostics.record(LoadDiagnostic::new(
                    &self.id,
                    Some(point.xid.clone()),
                    e.to_string(),
                ));
            }
        }
    }

    // =========================================================================
    // Load pipeline
    // =========================================================================

    /// Load every configured point for the given options.
    ///
    /// Skips work the options do not call for, runs the per-point loads
    /// concurrently, and delivers the settled batch to the listeners in
    /// configuration order. See [`LoadError::is_benign`] for the
    /// outcomes that are signals rather than faults.
    pub async fn load(&self, options: &QueryOptions) -> Result<LoadOutcome, LoadError> {
        let (points, listeners) = {
            let mut state = self.lock_state();
            if !state.enabled {
                debug!("provider {} is disabled, not loading", self.id);
                return Err(LoadError::ProviderDisabled(self.id.clone()));
            }

            if let Some(previous) = &state.previous_options {
                let delta = OptionsDelta::between(previous, options);
                if !options.force_refresh && !self.kind.needs_to_load(&delta) {
                    debug!("provider {}: options unchanged, not loading", self.id);
                    return Err(LoadError::LoadNotNeeded);
                }
            }

            state.previous_options = Some(options.clone());
            (state.points.clone(), state.listeners.clone())
        };

        if self.settings.clear_on_load {
            for listener in &listeners {
                listener.on_clear();
            }
        }

        if points.is_empty() {
            debug!("provider {} has no points configured", self.id);
            return Ok(LoadOutcome::default());
        }

        for listener in &listeners {
            listener.loading();
        }

        let mut superseded = self.generation.subscribe();
        let my_generation = if self.settings.cancel_last_load {
            let mut bumped = 0;
            self.generation.send_modify(|g| {
                *g += 1;
                bumped = *g;
            });
            bumped
        } else {
            *self.generation.borrow()
        };

        let batch = join_all(points.iter().map(|point| {
            let client = Arc::clone(&self.client);
            let kind = self.kind.clone();
            let options = options.clone();
            let limit = self.settings.batch_limit;
            let xid = point.xid.clone();
            async move { kind.load_point(client.as_ref(), &xid, &options, limit).await }
        }));

        let results = tokio::select! {
            results = batch => results,
            _ = wait_superseded(&mut superseded, my_generation) => {
                debug!("provider {}: load superseded in flight", self.id);
                return Err(LoadError::Cancelled);
            }
        };

        // A newer load can land between the batch settling and delivery;
        // its results win and ours are discarded.
        if *self.generation.borrow() != my_generation {
            debug!("provider {}: load superseded after settling", self.id);
            return Err(LoadError::Cancelled);
        }

        let (successes, failures) = split_results(&points, results);
        let total = points.len();

        if failures.is_empty() {
            notify_success(&listeners, &successes);
            debug!("provider {} loaded {} points", self.id, total);
            return Ok(LoadOutcome { results: successes });
        }

        self.record_failures(&failures);
        notify_failures(&listeners, &failures);
        warn!(
            "provider {}: {} of {} point loads failed",
            self.id,
            failures.len(),
            total
        );
        Err(LoadError::PointLoadsFailed {
            failed: failures.len(),
            total,
            failures,
        })
    }

    // =========================================================================
    // Write-back
    // =========================================================================

    /// Write values to configured points, and optionally deliver the
    /// written values through the listener pass used by [`load`](Self::load).
    ///
    /// Writes run concurrently and settle in configuration order.
    /// Points outside the request are untouched; a request that targets
    /// no configured point resolves to an empty outcome.
    pub async fn put(&self, request: &PutRequest) -> Result<LoadOutcome, LoadError> {
        let (points, listeners) = {
            let state = self.lock_state();
            (state.points.clone(), state.listeners.clone())
        };

        let plan = write_plan(request, &points);
        if plan.is_empty() {
            debug!("provider {}: put targeted no configured points", self.id);
            return Ok(LoadOutcome::default());
        }

        let batch = join_all(plan.iter().map(|(point, value)| {
            let client = Arc::clone(&self.client);
            let xid = point.xid.clone();
            let write = PointWrite::new(*value);
            async move {
                client
                    .write_point_value(xid.as_str(), &write)
                    .await
                    .map(|written| PointData::Values(vec![written]))
                    .map_err(PointLoadError::from)
            }
        }));
        let results = batch.await;

        let targeted: Vec<PointConfiguration> =
            plan.into_iter().map(|(point, _)| point).collect();
        let (successes, failures) = split_results(&targeted, results);
        let total = targeted.len();

        if failures.is_empty() {
            if request.refresh {
                notify_success(&listeners, &successes);
            }
            debug!("provider {} wrote {} points", self.id, total);
            return Ok(LoadOutcome { results: successes });
        }

        self.record_failures(&failures);
        if request.refresh {
            notify_failures(&listeners, &failures);
        }
        warn!(
            "provider {}: {} of {} point writes failed",
            self.id,
            failures.len(),
            total
        );
        Err(LoadError::PointLoadsFailed {
            failed: failures.len(),
            total,
            failures,
        })
    }

    // =========================================================================
    // Push events
    // =========================================================================

    /// Deliver a push-channel event to the listeners.
    ///
    /// Only realtime providers consume events, and only while enabled.
    /// Events for unconfigured xids are dropped.
    pub fn handle_point_event(&self, event: &PointEvent) {
        if !self.kind.is_realtime() {
            debug!("provider {} ignores push events", self.id);
            return;
        }

        let (point, listeners) = {
            let state = self.lock_state();
            if !state.enabled {
                debug!("provider {} is disabled, dropping event", self.id);
                return;
            }
            let point = state
                .points
                .iter()
                .find(|p| p.xid.as_str() == event.xid)
                .cloned();
            (point, state.listeners.clone())
        };

        let Some(point) = point else {
            debug!("provider {}: event for unknown point {}", self.id, event.xid);
            return;
        };

        match event.kind {
            PointEventKind::Update => {
                if let Some(value) = &event.value {
                    let data = PointData::Values(vec![value.clone()]);
                    for listener in &listeners {
                        listener.on_load(&data, &point);
                    }
                    for listener in &listeners {
                        listener.redraw();
                    }
                }
            }
            PointEventKind::Registered => {
                debug!("provider {}: {} registered on push channel", self.id, point.xid);
            }
            PointEventKind::Terminated => {
                warn!("provider {}: {} terminated on push channel", self.id, point.xid);
            }
        }
    }

    fn record_failures(&self, failures: &[PointLoadFailure]) {
        for failure in failures {
            if !failure.error.is_expected() {
                self.diagnostics.record(LoadDiagnostic::new(
                    &self.id,
                    Some(failure.xid.clone()),
                    failure.error.to_string(),
                ));
            }
        }
    }
}

// =============================================================================
// Batch helpers
// =============================================================================

/// Resolves when the load generation moves past `my_generation`.
async fn wait_superseded(rx: &mut watch::Receiver<u64>, my_generation: u64) {
    loop {
        if *rx.borrow() > my_generation {
            return;
        }
        if rx.changed().await.is_err() {
            // Sender dropped: the provider is gone, nothing supersedes us.
            std::future::pending::<()>().await;
        }
    }
}

/// Pair settled results with their points, splitting successes from
/// failures. Both halves keep configuration order.
fn split_results(
    points: &[PointConfiguration],
    results: Vec<Result<PointData, PointLoadError>>,
) -> (Vec<(PointConfiguration, PointData)>, Vec<PointLoadFailure>) {
    let mut successes = Vec::with_capacity(results.len());
    let mut failures = Vec::new();
    for (point, result) in points.iter().zip(results) {
        match result {
            Ok(data) => successes.push((point.clone(), data)),
            Err(error) => failures.push(PointLoadFailure::new(point.xid.clone(), error)),
        }
    }
    (successes, failures)
}

/// Success pass: every point to every listener, points outermost so the
/// configuration order is preserved, then one redraw per listener.
fn notify_success(
    listeners: &[Arc<dyn DisplayListener>],
    successes: &[(PointConfiguration, PointData)],
) {
    for (point, data) in successes {
        for listener in listeners {
            listener.on_load(data, point);
        }
    }
    for listener in listeners {
        listener.redraw();
    }
}

/// Failure pass: every failure to every listener instead of any data,
/// then one redraw per listener.
fn notify_failures(listeners: &[Arc<dyn DisplayListener>], failures: &[PointLoadFailure]) {
    for failure in failures {
        for listener in listeners {
            listener.load_point_failed(failure);
        }
    }
    for listener in listeners {
        listener.redraw();
    }
}

/// Points targeted by a put request, with their values, in
/// configuration order.
fn write_plan(request: &PutRequest, points: &[PointConfiguration]) -> Vec<(PointConfiguration, f64)> {
    points
        .iter()
        .filter_map(|point| {
            if request.put_all {
                request.value.map(|value| (point.clone(), value))
            } else {
                request
                    .values
                    .get(&point.xid)
                    .map(|value| (point.clone(), *value))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(xids: &[&str]) -> Vec<PointConfiguration> {
        xids.iter().map(|xid| PointConfiguration::new(*xid)).collect()
    }

    #[test]
    fn test_settings_defaults() {
        let settings = ProviderSettings::default();
        assert!(!settings.clear_on_load);
        assert!(!settings.cancel_last_load);
        assert_eq!(settings.batch_limit, DEFAULT_BATCH_LIMIT);
    }

    #[test]
    fn test_settings_builders() {
        let settings = ProviderSettings::default()
            .with_clear_on_load()
            .with_cancel_last_load()
            .with_batch_limit(100);
        assert!(settings.clear_on_load);
        assert!(settings.cancel_last_load);
        assert_eq!(settings.batch_limit, 100);
    }

    #[test]
    fn test_write_plan_put_all() {
        let plan = write_plan(&PutRequest::all(7.5), &points(&["a", "b", "c"]));
        assert_eq!(plan.len(), 3);
        assert!(plan.iter().all(|(_, value)| *value == 7.5));
        let order: Vec<&str> = plan.iter().map(|(p, _)| p.xid.as_str()).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_write_plan_targeted_keeps_configuration_order() {
        let mut values = HashMap::new();
        values.insert(Xid::new("c"), 3.0);
        values.insert(Xid::new("a"), 1.0);
        let plan = write_plan(&PutRequest::for_points(values), &points(&["a", "b", "c"]));

        let order: Vec<(&str, f64)> = plan.iter().map(|(p, v)| (p.xid.as_str(), *v)).collect();
        assert_eq!(order, vec![("a", 1.0), ("c", 3.0)]);
    }

    #[test]
    fn test_write_plan_put_all_without_value_is_empty() {
        let request = PutRequest {
            put_all: true,
            ..Default::default()
        };
        assert!(write_plan(&request, &points(&["a"])).is_empty());
    }

    #[test]
    fn test_split_results_keeps_order() {
        let configured = points(&["a", "b", "c"]);
        let results = vec![
            Ok(PointData::Accumulation(1.0)),
            Err(PointLoadError::NoData),
            Ok(PointData::Accumulation(3.0)),
        ];
        let (successes, failures) = split_results(&configured, results);
        assert_eq!(successes.len(), 2);
        assert_eq!(successes[0].0.xid.as_str(), "a");
        assert_eq!(successes[1].0.xid.as_str(), "c");
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].xid.as_str(), "b");
    }
}
