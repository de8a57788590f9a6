//! Run configuration.
//!
//! Every endpoint, column table and target list is carried in a [`Config`]
//! value and handed to the pipelines explicitly. The defaults reproduce the
//! stock TESS catalog query and the eleven Horizons bodies; a JSON file loaded
//! with [`Config::load`] can override any subset of fields except the catalog
//! column table, which is fixed by the record layout.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::CatalogConfig;
use crate::ephemeris::EphemerisConfig;
use crate::http::DEFAULT_TIMEOUT;

/// Errors from loading a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid config {}: {reason}", path.display())]
    Invalid { path: PathBuf, reason: String },
}

/// Settings for both pipelines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Exoplanet catalog query and cleaning table
    pub catalog: CatalogConfig,
    /// Horizons endpoint and target list
    pub ephemeris: EphemerisConfig,
    /// Per-request timeout in seconds, at least 1
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig::default(),
            ephemeris: EphemerisConfig::default(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl Config {
    /// Load a JSON config file. Fields missing from the file keep their defaults.
    ///
    /// # Errors
    /// [`ConfigError::Invalid`] if `timeout_secs` is 0.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if config.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                path: path.to_path_buf(),
                reason: "timeout_secs must be at least 1".to_string(),
            });
        }
        Ok(config)
    }

    /// Request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Directory the output files go to when none is given: `data/` beside the
/// crate sources.
pub fn default_output_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data")
}
