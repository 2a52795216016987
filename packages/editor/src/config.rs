use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::EditorError;

pub const DEFAULT_CONFIG_NAME: &str = "pagecraft.config.json";

/// Editor configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    /// Undo levels kept before the oldest entry is evicted (0 = unlimited)
    #[serde(default = "default_max_undo_levels")]
    pub max_undo_levels: usize,

    /// Height of the always-append zone at the bottom of a container, in px
    #[serde(default = "default_last_drop_zone_threshold")]
    pub last_drop_zone_threshold: f64,

    /// Seed for generated node ids
    #[serde(default = "default_id_seed")]
    pub id_seed: String,
}

fn default_max_undo_levels() -> usize {
    crate::undo_stack::DEFAULT_MAX_UNDO_LEVELS
}

fn default_last_drop_zone_threshold() -> f64 {
    crate::drag_drop::DEFAULT_LAST_DROP_ZONE_THRESHOLD
}

fn default_id_seed() -> String {
    "pagecraft".to_string()
}

impl EditorConfig {
    /// Load config from a directory, falling back to defaults if absent
    pub fn load(dir: &Path) -> Result<Self, EditorError> {
        let config_path = dir.join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_json_str(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_json_str(source: &str) -> Result<Self, EditorError> {
        let config: EditorConfig =
            serde_json::from_str(source).map_err(|e| EditorError::Config(e.to_string()))?;
        if !config.last_drop_zone_threshold.is_finite() || config.last_drop_zone_threshold < 0.0 {
            return Err(EditorError::Config(format!(
                "lastDropZoneThreshold must be a non-negative number, got {}",
                config.last_drop_zone_threshold
            )));
        }
        Ok(config)
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_undo_levels: default_max_undo_levels(),
            last_drop_zone_threshold: default_last_drop_zone_threshold(),
            id_seed: default_id_seed(),
        }
    }
}
