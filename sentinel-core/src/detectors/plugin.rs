// sentinel-core/src/detectors/plugin.rs
//! Plugin detector support.
//!
//! Plugins are third-party `Detector` implementations registered by name in
//! a [`PluginRegistry`]. Profiles reference them through the plugin module
//! list; the orchestrator wraps each one in a [`PluginDetector`], which
//! isolates faults: a failing plugin contributes one INFO finding instead of
//! aborting the validation.

use anyhow::Result;
use log::warn;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::detector::{Detector, DetectorKind};
use crate::errors::SentinelError;
use crate::verdict::Finding;

/// Named plugin detectors available to profile compilation.
#[derive(Clone, Default)]
pub struct PluginRegistry {
    plugins: HashMap<String, Arc<dyn Detector>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plugin under `name`, replacing any previous registration.
    pub fn register(&mut self, name: impl Into<String>, detector: Arc<dyn Detector>) {
        self.plugins.insert(name.into(), detector);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Detector>> {
        self.plugins.get(name).cloned()
    }

    pub fn names(&self) -> Vec<&str> {
        self.plugins.keys().map(String::as_str).collect()
    }

    /// Resolve a profile's module list, attributing unknown names to
    /// `profile_name`.
    pub fn resolve(
        &self,
        profile_name: &str,
        modules: &[String],
    ) -> Result<Vec<PluginDetector>, SentinelError> {
        modules
            .iter()
            .map(|name| {
                self.get(name)
                    .map(|inner| PluginDetector::new(name.clone(), inner))
                    .ok_or_else(|| {
                        SentinelError::UnknownPlugin(profile_name.to_string(), name.clone())
                    })
            })
            .collect()
    }
}

/// Wraps a registered plugin and normalizes its behavior: findings are
/// re-attributed to the plugin kind and scan faults degrade to INFO.
pub struct PluginDetector {
    name: String,
    inner: Arc<dyn Detector>,
}

// Manual impl: the wrapped detector trait object is not Debug.
impl fmt::Debug for PluginDetector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginDetector").field("name", &self.name).finish()
    }
}

impl PluginDetector {
    pub fn new(name: String, inner: Arc<dyn Detector>) -> Self {
        Self { name, inner }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Detector for PluginDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::Plugin
    }

    fn scan(&self, text: &str) -> Result<Vec<Finding>> {
        match self.inner.scan(text) {
            Ok(mut findings) => {
                for f in &mut findings {
                    f.detector = DetectorKind::Plugin;
                }
                Ok(findings)
            }
            Err(e) => {
                warn!("Plugin '{}' failed: {e:#}", self.name);
                Ok(vec![Finding::info(
                    DetectorKind::Plugin,
                    "Plugin:Error",
                    format!("plugin '{}' failed: {e:#}", self.name),
                )])
            }
        }
    }
}
