//! Shared application state for the exporter.
//!
//! The registry is constructed here from the configured catalog and handed
//! to both the HTTP handlers and the simulation driver by `Arc`.

use std::sync::Arc;

use vqmon_core::error::Result;
use vqmon_core::{MetricDescriptor, Registry};

#[derive(Clone)]
pub struct AppState {
    registry: Arc<Registry>,
}

impl AppState {
    /// Wrap an existing registry.
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    /// Build a fresh registry holding every catalog descriptor.
    /// Returns Result so main can report a bad catalog instead of panicking.
    pub fn from_catalog(catalog: &[MetricDescriptor]) -> Result<Self> {
        let registry = Registry::new();
        registry.register_all(catalog.iter().cloned())?;
        tracing::info!(metrics = catalog.len(), "metric catalog registered");
        Ok(Self::new(Arc::new(registry)))
    }

    pub fn registry(&self) -> Arc<Registry> {
        Arc::clone(&self.registry)
    }
}
