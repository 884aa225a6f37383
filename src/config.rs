//! Game tunables loaded from JSON.

use crate::error::MapError;
use serde::Deserialize;
use std::path::Path;

/// Tunables for a game built on the crate. Missing fields take the defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Tile width in pixels.
    pub tile_width: u32,
    /// Tile height in pixels.
    pub tile_height: u32,
    /// Camera viewport width in pixels.
    pub viewport_width: f32,
    /// Camera viewport height in pixels.
    pub viewport_height: f32,
    /// Fixed update rate.
    pub ticks_per_second: u32,
    /// Pixels an actor moves per tick.
    pub actor_speed: f32,
    /// Ticks each animation frame is shown for.
    pub ticks_per_frame: u32,
    /// Seconds a trigger stays quiet after firing.
    pub trigger_cooldown_secs: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            tile_width: 16,
            tile_height: 16,
            viewport_width: 240.0,
            viewport_height: 160.0,
            ticks_per_second: 60,
            actor_speed: 16.0,
            ticks_per_frame: 15,
            trigger_cooldown_secs: 5.0,
        }
    }
}

impl GameConfig {
    /// Parses a config held in memory.
    pub fn from_json_str(txt: &str) -> Result<Self, MapError> {
        serde_json::from_str(txt).map_err(MapError::Parse)
    }

    /// Reads and parses a config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, MapError> {
        let path = path.as_ref();
        let txt = std::fs::read_to_string(path).map_err(|source| MapError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&txt).map_err(|source| MapError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Seconds covered by one tick.
    pub fn tick_seconds(&self) -> f64 {
        1.0 / self.ticks_per_second.max(1) as f64
    }
}
