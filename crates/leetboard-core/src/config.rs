//! Application configuration
//!
//! Loaded from `<config_dir>/leetboard/config.json`. Every field is
//! optional; resolution order is CLI flag > environment > this file >
//! built-in default, with the first two handled by the binary. A missing or
//! broken file degrades to defaults so the tool never refuses to start over
//! configuration.

use crate::api::assistant::AssistantConfig;
use crate::api::leetcode::DEFAULT_CATALOG_ENDPOINT;
use crate::cache::AnalysisCacheConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Settings file contents (config.json)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// Data directory override
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// User signed in when no flag or environment override is given
    #[serde(default)]
    pub default_user: Option<String>,

    /// GraphQL catalog endpoint override
    #[serde(default)]
    pub catalog_endpoint: Option<String>,

    /// Analysis assistant settings
    #[serde(default)]
    pub assistant: AssistantSettings,

    /// Memory-tier capacity for the analysis cache
    #[serde(default)]
    pub analysis_memory_capacity: Option<u64>,

    /// Additional untyped fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// Assistant endpoint and sampling knobs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantSettings {
    #[serde(default)]
    pub endpoint: Option<String>,

    #[serde(default)]
    pub max_tokens: Option<u32>,

    #[serde(default)]
    pub temperature: Option<f32>,
}

impl AppConfig {
    /// Load from the platform config path, degrading to defaults
    pub fn load() -> Self {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load from an explicit path. Missing file is the normal first-run
    /// case; a file that exists but does not parse gets a warning.
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Ignoring unparsable config file");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Catalog endpoint with the public default filled in
    pub fn catalog_endpoint(&self) -> &str {
        self.catalog_endpoint
            .as_deref()
            .unwrap_or(DEFAULT_CATALOG_ENDPOINT)
    }

    /// Assistant client settings with defaults filled in
    pub fn assistant_config(&self) -> AssistantConfig {
        let defaults = AssistantConfig::default();
        AssistantConfig {
            endpoint: self
                .assistant
                .endpoint
                .clone()
                .unwrap_or(defaults.endpoint),
            max_tokens: self.assistant.max_tokens.unwrap_or(defaults.max_tokens),
            temperature: self.assistant.temperature.unwrap_or(defaults.temperature),
        }
    }

    /// Analysis cache settings with defaults filled in
    pub fn cache_config(&self) -> AnalysisCacheConfig {
        let mut config = AnalysisCacheConfig::default();
        if let Some(capacity) = self.analysis_memory_capacity {
            config.memory_capacity = capacity;
        }
        config
    }

    /// Platform data directory used when no override is configured
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("leetboard")
    }
}

/// Platform path of the settings file
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("leetboard").join("config.json"))
}
