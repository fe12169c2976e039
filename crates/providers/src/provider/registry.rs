//! Provider registry.
//!
//! Composition roots own one [`ProviderRegistry`] and wire everything
//! through it: displays look their provider up by id, and the push-event
//! pump routes incoming frames to the provider that owns the points.
//! There is no process-global registry; two consoles in one process get
//! two registries.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use log::{debug, warn};
use thiserror::Error;

use super::data_provider::DataProvider;

/// Errors from registry wiring.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A provider with this id is already registered.
    #[error("Provider id already registered: {0}")]
    DuplicateId(String),
}

/// Id-keyed collection of the providers behind one console.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: Mutex<HashMap<String, Arc<DataProvider>>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self {
            providers: Mutex::new(HashMap::new()),
        }
    }

    /// Lock the provider map, recovering from poison if necessary.
    fn lock_providers(&self) -> MutexGuard<'_, HashMap<String, Arc<DataProvider>>> {
        self.providers.lock().unwrap_or_else(|poisoned| {
            warn!("provider registry mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Register a provider under its id.
    ///
    /// Ids are caller-chosen and must be unique within the registry;
    /// a collision is a wiring bug and is returned as an error rather
    /// than silently replacing the existing provider.
    pub fn register(&self, provider: Arc<DataProvider>) -> Result<(), RegistryError> {
        let mut providers = self.lock_providers();
        let id = provider.id().to_string();
        if providers.contains_key(&id) {
            return Err(RegistryError::DuplicateId(id));
        }
        debug!("registered provider {}", id);
        providers.insert(id, provider);
        Ok(())
    }

    /// Look a provider up by id.
    pub fn get(&self, id: &str) -> Option<Arc<DataProvider>> {
        self.lock_providers().get(id).cloned()
    }

    /// Remove a provider, returning it when it was registered.
    pub fn unregister(&self, id: &str) -> Option<Arc<DataProvider>> {
        let removed = self.lock_providers().remove(id);
        if removed.is_some() {
            debug!("unregistered provider {}", id);
        }
        removed
    }

    /// Ids of every registered provider, in no particular order.
    pub fn ids(&self) -> Vec<String> {
        self.lock_providers().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock_providers().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_providers().is_empty()
    }
}
