//! View preferences persistence
//!
//! Stores list-view preferences (visible columns, widths, theme) in
//! `<data_dir>/preferences.json`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

const PREFERENCES_FILE: &str = "preferences.json";

/// Color theme for rendered output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

/// One list column's visibility and optional fixed width
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnPreference {
    pub key: String,
    pub visible: bool,
    #[serde(default)]
    pub width: Option<u16>,
}

/// List-view preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewPreferences {
    pub columns: Vec<ColumnPreference>,
    pub theme: Theme,
}

impl Default for ViewPreferences {
    fn default() -> Self {
        let visible = ["id", "title", "difficulty", "status", "tags", "attempts"];
        let hidden = ["companies", "time", "updated"];

        let mut columns: Vec<ColumnPreference> = visible
            .iter()
            .map(|key| ColumnPreference {
                key: (*key).to_string(),
                visible: true,
                width: None,
            })
            .collect();
        columns.extend(hidden.iter().map(|key| ColumnPreference {
            key: (*key).to_string(),
            visible: false,
            width: None,
        }));

        Self {
            columns,
            theme: Theme::Dark,
        }
    }
}

impl ViewPreferences {
    /// Load from `<data_dir>/preferences.json`.
    /// Falls back to defaults when the file is missing or unreadable.
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join(PREFERENCES_FILE);
        match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    /// Persist to `<data_dir>/preferences.json`.
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(data_dir)
            .context("Failed to create data directory for preferences")?;
        let path = data_dir.join(PREFERENCES_FILE);
        let content = serde_json::to_string_pretty(self).context("Failed to serialize preferences")?;
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write preferences to {}", path.display()))
    }

    /// Keys of the columns to render, in order
    pub fn visible_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.visible)
            .map(|c| c.key.as_str())
            .collect()
    }

    /// Set exactly these columns visible, preserving known-column order and
    /// appending unknown keys at the end
    pub fn set_visible_columns(&mut self, keys: &[String]) {
        for column in &mut self.columns {
            column.visible = keys.iter().any(|k| k == &column.key);
        }
        for key in keys {
            if !self.columns.iter().any(|c| &c.key == key) {
                self.columns.push(ColumnPreference {
                    key: key.clone(),
                    visible: true,
                    width: None,
                });
            }
        }
    }
}
