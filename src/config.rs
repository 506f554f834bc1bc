//! Configuration module for the spool beacon
//!
//! Handles configuration loading from TOML files and provides structured
//! configuration types with sensible defaults for every optional field.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::types::{Category, CategoryMap};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Spool directory and category table
    pub spool: SpoolConfig,

    /// Poll cadence
    #[serde(default)]
    pub poll: PollConfig,

    /// Forwarder service liveness probe
    #[serde(default)]
    pub service: ServiceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpoolConfig {
    /// Store-and-forward directory written by the forwarder
    #[serde(default = "default_spool_directory")]
    pub directory: PathBuf,

    /// Category table override; empty means the built-in reference table
    #[serde(default)]
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    /// Seconds between inspection cycles
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Service-manager name of the forwarding service
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Query the service manager each cycle
    #[serde(default = "default_true")]
    pub probe: bool,
}

// Default value functions
fn default_spool_directory() -> PathBuf {
    PathBuf::from("/var/spool/testmon")
}
fn default_interval_secs() -> u64 {
    60
}
fn default_service_name() -> String {
    "testmon-forwarder".to_string()
}
fn default_true() -> bool {
    true
}

impl SpoolConfig {
    /// Effective category table for aggregation
    pub fn category_map(&self) -> CategoryMap {
        if self.categories.is_empty() {
            CategoryMap::default()
        } else {
            CategoryMap::new(self.categories.clone())
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            spool: SpoolConfig {
                directory: default_spool_directory(),
                categories: Vec::new(),
            },
            poll: PollConfig::default(),
            service: ServiceConfig::default(),
        }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            probe: default_true(),
        }
    }
}
