//! `escape-plan.toml`: engine policies plus front-end defaults.
//!
//! ```toml
//! [engine]
//! default_taxable_income = 350000
//!
//! [engine.forecast]
//! chart_stride_divisor = 8
//!
//! [data]
//! catalog = "catalog.json"
//! brackets = "brackets.csv"
//! tax_year = 2025
//!
//! [logging]
//! level = "debug"
//! file = "escape-plan.log"
//! ```
//!
//! Every table and key is optional. Unknown keys are rejected.

use std::path::{Path, PathBuf};

use plan_core::{ConfigError, EngineConfig};
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("cannot read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid engine config: {0}")]
    Invalid(#[from] ConfigError),
}

/// Where reference data comes from when no flag overrides it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataConfig {
    pub catalog: Option<PathBuf>,
    pub brackets: Option<PathBuf>,
    pub tax_year: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Bare level or any `EnvFilter` directive. `RUST_LOG` takes precedence.
    pub level: String,
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub data: DataConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Parses and validates TOML text.
    pub fn from_toml(text: &str) -> Result<Self, ConfigFileError> {
        let config: AppConfig = toml::from_str(text)?;
        config.engine.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigFileError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigFileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }
}
