//! Service configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use forecast_store::{RegionIndex, StoreConfig};
use hydro_common::Precision;

/// Largest decimal precision accepted.
pub const MAX_PRECISION: u32 = 10;

/// Configuration for the forecast service.
#[derive(Debug, Clone, Default)]
pub struct ApiConfig {
    /// Store adapter settings.
    pub store: StoreConfig,

    /// Decimal places kept in every output value.
    pub precision: Precision,

    /// YAML file that replaced the default region table, if any.
    pub regions_file: Option<PathBuf>,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Only a broken regions file is an error; unparseable numbers keep
    /// their defaults.
    pub fn from_env() -> Result<Self> {
        let mut config = Self {
            store: StoreConfig::from_env(),
            ..Self::default()
        };

        if let Ok(val) = std::env::var("FORECAST_PRECISION") {
            match val.parse() {
                Ok(decimals) => config.precision = Precision::new(decimals),
                Err(_) => tracing::warn!(value = %val, "Ignoring unparseable FORECAST_PRECISION"),
            }
        }

        if let Ok(path) = std::env::var("FORECAST_REGIONS_FILE") {
            config = config.with_regions_file(path)?;
        }

        Ok(config)
    }

    /// Replace the region table with the contents of a YAML file.
    pub fn with_regions_file(mut self, path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        self.store.regions = load_regions(&path)?;
        self.regions_file = Some(path);
        Ok(self)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.precision.decimals() > MAX_PRECISION {
            return Err(format!(
                "precision {} exceeds the maximum of {}",
                self.precision.decimals(),
                MAX_PRECISION
            ));
        }

        if self.store.regions.is_empty() {
            return Err("region table must not be empty".to_string());
        }

        self.store.validate()
    }
}

/// Parse a region table:
///
/// ```yaml
/// regions:
///   - name: africa-geoglows
///     min_reach_id: 800000
///     max_reach_id: 899999
/// ```
pub fn load_regions(path: &Path) -> Result<RegionIndex> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read regions file: {:?}", path))?;

    let regions: RegionIndex = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse regions file: {:?}", path))?;

    tracing::info!("Loaded {} regions from {:?}", regions.regions.len(), path);
    Ok(regions)
}
