// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event bus configuration
//!
//! Read from the `[events]` table of the router configuration file:
//!
//! ```toml
//! [events]
//! initial_capacity = 32
//! trace_deliveries = false
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur loading bus configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// TOML syntax or type error
    #[error("TOML syntax error: {0}")]
    Toml(#[from] toml::de::Error),

    /// IO error reading file
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Tuning for the event bus
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BusConfig {
    /// Subscription slots reserved up front
    pub initial_capacity: usize,
    /// Emit a trace record for every raised event
    pub trace_deliveries: bool,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 16,
            trace_deliveries: true,
        }
    }
}

#[derive(Deserialize)]
struct ConfigFile {
    #[serde(default)]
    events: BusConfig,
}

impl BusConfig {
    /// Parse the `[events]` table out of TOML content; other tables are ignored
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(content)?;
        Ok(file.events)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_toml_str(&content)
    }
}

#[cfg(test)]
#[path = "bus_tests.rs"]
mod tests;
