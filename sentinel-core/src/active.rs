// sentinel-core/src/active.rs
//! Hot-swappable engine handle.
//!
//! `ActiveEngine` holds the currently active orchestrator behind a lock and
//! swaps it atomically when a new profile is applied. Callers snapshot the
//! current `Arc` and keep using it for the whole request; in-flight
//! validations are never torn by a swap.

use log::info;
use std::sync::{Arc, RwLock};

use crate::backends::Backends;
use crate::detectors::PluginRegistry;
use crate::errors::SentinelError;
use crate::orchestrator::Orchestrator;
use crate::profile::Profile;

pub struct ActiveEngine {
    current: RwLock<Arc<Orchestrator>>,
    backends: Backends,
    registry: PluginRegistry,
}

impl ActiveEngine {
    /// Compile `profile` and wrap it as the active engine.
    pub fn new(
        profile: Profile,
        backends: Backends,
        registry: PluginRegistry,
    ) -> Result<Self, SentinelError> {
        let orchestrator = Orchestrator::compile(profile, &backends, &registry)?;
        Ok(Self {
            current: RwLock::new(Arc::new(orchestrator)),
            backends,
            registry,
        })
    }

    /// Snapshot the active orchestrator. The snapshot stays valid across
    /// concurrent swaps.
    pub fn current(&self) -> Arc<Orchestrator> {
        Arc::clone(&self.current.read().unwrap_or_else(|e| e.into_inner()))
    }

    /// Compile `profile` and atomically make it the active engine.
    ///
    /// Compilation happens before the swap, so a bad profile leaves the
    /// previous engine in place.
    pub fn swap(&self, profile: Profile) -> Result<(), SentinelError> {
        let name = profile.name.clone();
        let orchestrator = Orchestrator::compile(profile, &self.backends, &self.registry)?;
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        *guard = Arc::new(orchestrator);
        info!("Active profile swapped to '{name}'.");
        Ok(())
    }
}
