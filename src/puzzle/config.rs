use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

const CONFIG_DIR_NAME: &str = "tessera";
const CONFIG_FILE_NAME: &str = "config.json";
pub const INDEX_PLACEHOLDER: &str = "{n}";

/// Thresholds the touch adapter uses to tell a tap from a drag.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureThresholds {
    pub drag_slop_px: f64,
    pub hold_ms: u64,
    pub tap_max_ms: u64,
}

impl Default for GestureThresholds {
    fn default() -> Self {
        Self {
            drag_slop_px: 10.0,
            hold_ms: 300,
            tap_max_ms: 250,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PuzzleConfig {
    pub rows: usize,
    pub cols: usize,
    pub initial_grid: usize,
    pub front_pattern: String,
    pub back_pattern: String,
    pub asset_dir: Option<PathBuf>,
    pub tick_interval_ms: u64,
    pub gestures: GestureThresholds,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            rows: 6,
            cols: 8,
            initial_grid: 3,
            front_pattern: "images/piece_{n}.jpg".to_string(),
            back_pattern: "images/back_piece_{n}.jpg".to_string(),
            asset_dir: None,
            tick_interval_ms: 1000,
            gestures: GestureThresholds::default(),
        }
    }
}

impl PuzzleConfig {
    pub fn total_pieces(&self) -> usize {
        self.rows * self.cols
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(ConfigError::Invalid(format!(
                "board must have at least one row and column (got {}x{})",
                self.cols, self.rows
            )));
        }
        if self.initial_grid > self.total_pieces() {
            return Err(ConfigError::Invalid(format!(
                "initial_grid {} exceeds the {} pieces of the board",
                self.initial_grid,
                self.total_pieces()
            )));
        }
        for (name, pattern) in [
            ("front_pattern", &self.front_pattern),
            ("back_pattern", &self.back_pattern),
        ] {
            if !pattern.contains(INDEX_PLACEHOLDER) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must contain {INDEX_PLACEHOLDER}"
                )));
            }
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid("tick_interval_ms must be positive".into()));
        }
        let gestures = &self.gestures;
        if gestures.drag_slop_px <= 0.0 || gestures.hold_ms == 0 || gestures.tap_max_ms == 0 {
            return Err(ConfigError::Invalid("gesture thresholds must be positive".into()));
        }
        Ok(())
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: PuzzleConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    /// Loads the user config, falling back to defaults when no file exists.
    pub fn load() -> Result<Self, ConfigError> {
        match config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Resolves a face reference against `asset_dir` when one is set.
    pub fn resolve_asset(&self, reference: &str) -> PathBuf {
        match &self.asset_dir {
            Some(dir) => dir.join(reference),
            None => PathBuf::from(reference),
        }
    }
}

/// `$XDG_CONFIG_HOME/tessera/config.json`, else under `$HOME/.config`. Read
/// from the environment so the core does not depend on glib.
pub fn config_path() -> Option<PathBuf> {
    let base = match std::env::var_os("XDG_CONFIG_HOME") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => PathBuf::from(std::env::var_os("HOME")?).join(".config"),
    };
    Some(base.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}
