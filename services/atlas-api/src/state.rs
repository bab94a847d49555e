//! Application state for the atlas API.

use anyhow::{Context, Result};
use boundaries::BoundaryCollection;
use dataset_registry::DatasetRegistry;

use crate::config::AtlasConfig;

/// Shared application state. Immutable after startup.
pub struct AppState {
    /// Year-keyed attribution and raw-value tables.
    pub registry: DatasetRegistry,

    /// County polygons keyed by FIPS code.
    pub boundaries: BoundaryCollection,

    pub config: AtlasConfig,
}

impl AppState {
    pub fn new(registry: DatasetRegistry, boundaries: BoundaryCollection, config: AtlasConfig) -> Self {
        Self {
            registry,
            boundaries,
            config,
        }
    }

    /// Load the dataset and boundary artifacts named by `config`.
    ///
    /// Blocking; called once before the server starts accepting requests.
    pub fn load(config: AtlasConfig) -> Result<Self> {
        config.validate()?;

        let registry = DatasetRegistry::from_path(&config.dataset_path).with_context(|| {
            format!("Failed to load dataset artifact {:?}", config.dataset_path)
        })?;
        let boundaries = BoundaryCollection::from_path(&config.boundaries_path).with_context(|| {
            format!("Failed to load county boundaries {:?}", config.boundaries_path)
        })?;

        let counties: usize = registry.iter().map(|d| d.shap_values().len()).sum();
        crate::metrics::record_startup(registry.len(), counties, boundaries.len());
        tracing::info!(
            years = registry.len(),
            counties,
            boundaries = boundaries.len(),
            "Atlas data loaded"
        );

        Ok(Self::new(registry, boundaries, config))
    }
}
