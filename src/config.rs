//! Configuration Management
//!
//! Persistent user configuration, and the [`ProviderConfig`] context of ambient
//! defaults that data source reads resolve against.

use crate::error::ConfigurationError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Default project
    #[serde(default)]
    pub project_id: Option<String>,
    /// Default region
    #[serde(default)]
    pub region: Option<String>,
    /// Compute API endpoint override
    #[serde(default)]
    pub compute_endpoint: Option<String>,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("gcp-router-status").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load configuration from a file, defaulting when it is missing or unreadable
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed config {:?}: {}", path, e);
                Self::default()
            }),
            // Unreadable counts as missing
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        // No config dir on this platform, nothing to persist
        let Some(path) = Self::config_path() else {
            return Ok(());
        };
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))?;

        Ok(())
    }

    /// Effective project (config > gcloud default)
    pub fn effective_project(&self) -> Option<String> {
        self.project_id
            .clone()
            .or_else(crate::gcp::auth::get_default_project)
    }

    /// Effective region (config > gcloud default)
    pub fn effective_region(&self) -> Option<String> {
        self.region
            .clone()
            .or_else(crate::gcp::auth::get_default_region)
    }

    /// Ambient defaults for reads, with CLI values taking precedence
    pub fn provider_config(&self, project: Option<&str>, region: Option<&str>) -> ProviderConfig {
        ProviderConfig {
            project: project.map(str::to_string).or_else(|| self.effective_project()),
            region: region.map(str::to_string).or_else(|| self.effective_region()),
        }
    }
}

/// Ambient project/region defaults applied when a data source leaves them unset
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderConfig {
    pub project: Option<String>,
    pub region: Option<String>,
}

impl ProviderConfig {
    pub fn new(project: Option<&str>, region: Option<&str>) -> Self {
        Self {
            project: project.map(str::to_string),
            region: region.map(str::to_string),
        }
    }

    /// Default project, or a configuration error if none is set
    pub fn project(&self) -> Result<&str, ConfigurationError> {
        non_empty(self.project.as_deref())
            .ok_or(ConfigurationError::Unresolved { attribute: "project" })
    }

    /// Default region, or a configuration error if none is set
    pub fn region(&self) -> Result<&str, ConfigurationError> {
        non_empty(self.region.as_deref())
            .ok_or(ConfigurationError::Unresolved { attribute: "region" })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
