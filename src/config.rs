//! Configuration module
//!
//! Settings are read from a TOML file (`~/.config/chargehub/config.toml`
//! by default). Every section is optional; a missing file yields defaults.
//!
//! ```toml
//! [logging]
//! level = "info"
//! format = "text"   # or "json"
//!
//! [workflow]
//! threshold = 5
//! policy = "approval_required"   # or "immediate"
//!
//! [[stations]]
//! id = 7
//! postal_code = "10115"
//! latitude = 52.532
//! longitude = 13.384
//! operator = "Stromnetz Berlin"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

use crate::application::services::{ModerationPolicy, DEFAULT_THRESHOLD};
use crate::domain::{DomainError, DomainResult, PostalCode, Station};
use crate::shared::errors::{AppResult, InfraError};

/// Environment variable that overrides the config file location
pub const CONFIG_ENV: &str = "CHARGEHUB_CONFIG";

/// Default config path: `<config_dir>/chargehub/config.toml`
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("chargehub")
        .join("config.toml")
}

/// Config path from `CHARGEHUB_CONFIG`, falling back to the default
pub fn resolve_config_path() -> PathBuf {
    std::env::var(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| default_config_path())
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `chargehub=debug`
    #[validate(length(min = 1, message = "logging.level must not be empty"))]
    pub level: String,
    /// `text` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Approved reports that take a station out of service
    #[validate(range(min = 1, message = "workflow.threshold must be >= 1"))]
    pub threshold: u32,
    pub policy: ModerationPolicy,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            policy: ModerationPolicy::default(),
        }
    }
}

/// Station record seeded into the station store at startup.
///
/// Seeded stations always start available; only the workflow may take
/// them out of service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StationSeed {
    pub id: i32,
    pub postal_code: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub operator: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl StationSeed {
    pub fn to_station(&self) -> DomainResult<Station> {
        let postal_code = PostalCode::parse(self.postal_code.as_str())?;
        let mut station = Station::new(self.id, postal_code);

        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => station = station.with_location(lat, lon),
            (None, None) => {}
            _ => {
                return Err(DomainError::Validation(format!(
                    "Station {}: latitude and longitude must be given together",
                    self.id
                )))
            }
        }
        if let Some(operator) = &self.operator {
            station = station.with_operator(operator.as_str());
        }
        if let Some(address) = &self.address {
            station = station.with_address(address.as_str());
        }
        Ok(station)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AppConfig {
    #[validate(nested)]
    pub logging: LoggingConfig,
    #[validate(nested)]
    pub workflow: WorkflowConfig,
    pub stations: Vec<StationSeed>,
}

impl AppConfig {
    /// Load from `path`; a missing file gives the defaults.
    pub fn load(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path).map_err(InfraError::from)?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> AppResult<Self> {
        let config: AppConfig = toml::from_str(raw).map_err(InfraError::from)?;
        config.validate().map_err(InfraError::from)?;
        Ok(config)
    }

    /// Build the seeded stations, validating every postal code
    pub fn seed_stations(&self) -> DomainResult<Vec<Station>> {
        self.stations.iter().map(StationSeed::to_station).collect()
    }
}
