//! Application state shared by every endpoint.

use anyhow::{anyhow, Result};
use forecast_engine::{ForecastEngine, ReturnPeriodComparator};
use forecast_store::ForecastStore;
use hydro_common::Precision;
use tracing::info;

use crate::config::ApiConfig;

/// Shared, read-only state.
pub struct AppState {
    pub engine: ForecastEngine,
    pub config: ApiConfig,
}

impl AppState {
    /// Validate the configuration and build the engine.
    pub fn new(config: ApiConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| anyhow!("Invalid configuration: {}", e))?;

        let engine = ForecastEngine::new(ForecastStore::new(config.store.clone()))
            .with_exceedance_source(ReturnPeriodComparator::new(config.precision));

        info!(
            data_root = %config.store.data_root.display(),
            precision = config.precision.decimals(),
            record_year = config.store.record_year,
            "Initialized forecast service"
        );

        Ok(Self { engine, config })
    }

    pub fn precision(&self) -> Precision {
        self.config.precision
    }
}
