use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{
    BASE_GRID_CELLS, DEFAULT_VIEWPORT_HEIGHT, DEFAULT_VIEWPORT_WIDTH, MAX_FRAME_DT, TILE_SIZE,
};
use crate::error::ConfigError;
use crate::logging::TracingConfig;

/// Host-facing simulation settings. Missing fields fall back to defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Viewport size; its centre is the aiming origin
    pub viewport_width: f32,
    pub viewport_height: f32,
    pub tile_size: f32,
    /// Fixed RNG seed; `None` seeds from entropy
    pub seed: Option<u64>,
    /// Upper bound the driver applies to frame dt
    pub max_frame_dt: f32,
    /// Grid edge in cells before the rank multiplier
    pub base_grid_cells: usize,
    pub tracing: TracingConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            tile_size: TILE_SIZE,
            seed: None,
            max_frame_dt: MAX_FRAME_DT,
            base_grid_cells: BASE_GRID_CELLS,
            tracing: TracingConfig::default(),
        }
    }
}

impl SimConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a `.json` or `.ron` file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&text),
            Some("ron") => Self::from_ron(&text),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or_default().to_string(),
            )),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.viewport_width > 0.0 && self.viewport_height > 0.0) {
            return Err(ConfigError::Invalid("viewport must be positive".into()));
        }
        if !(self.tile_size > 0.0) {
            return Err(ConfigError::Invalid("tile_size must be positive".into()));
        }
        if !(self.max_frame_dt > 0.0) {
            return Err(ConfigError::Invalid("max_frame_dt must be positive".into()));
        }
        // the boss room alone needs this much room plus a wall border
        if self.base_grid_cells < 32 {
            return Err(ConfigError::Invalid(format!(
                "base_grid_cells {} is below 32",
                self.base_grid_cells
            )));
        }
        Ok(())
    }
}
