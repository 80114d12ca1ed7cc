//! Game settings and tuning
//!
//! Loaded from an optional JSON file. Missing keys fall back to the
//! compile-time defaults in [`crate::consts`], so a minimal file can override
//! just the values you care about.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{GameError, GameResult};

/// Runtime-tunable gameplay configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Arena ===
    /// Logical arena width (landscape)
    pub arena_width: f32,
    /// Logical arena height (landscape)
    pub arena_height: f32,
    /// Boundary inset from the arena edge
    pub boundary_margin: f32,

    // === Cycles ===
    /// Speed as a fraction of arena height per second
    pub speed_fraction: f32,
    /// Trail line width
    pub trail_width: f32,

    // === Scoring ===
    /// Bonus for each survivor when an opponent crashes
    pub winner_bonus: f32,
    /// Points per second survived
    pub time_bonus_rate: f32,
    /// Grace period after the first death (ms)
    pub roll_off_ms: f32,

    // === Effects ===
    /// Particles per crash
    pub burst_count: usize,

    // === Powerups ===
    /// Spawn interval (ms)
    pub powerup_interval_ms: f32,
    /// Placement attempts per spawn cycle
    pub powerup_retries: u32,
    /// Hit box edge length
    pub powerup_size: f32,

    // === Input ===
    /// Controller axis deadzone
    pub deadzone: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            boundary_margin: BOUNDARY_MARGIN,

            speed_fraction: SPEED_FRACTION,
            trail_width: TRAIL_WIDTH,

            winner_bonus: WINNER_BONUS,
            time_bonus_rate: TIME_BONUS_RATE,
            roll_off_ms: ROLL_OFF_MS,

            burst_count: BURST_COUNT,

            powerup_interval_ms: POWERUP_INTERVAL_MS,
            powerup_retries: POWERUP_RETRIES,
            powerup_size: POWERUP_SIZE,

            deadzone: DEADZONE,
        }
    }
}

impl Settings {
    /// Cycle speed in arena units per second
    pub fn speed(&self) -> f32 {
        self.arena_height * self.speed_fraction
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(Some(settings)) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Ok(None) => {
                log::info!("No settings at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!("{}; using default settings", e);
                Self::default()
            }
        }
    }

    /// Strict load: `Ok(None)` if the file does not exist
    pub fn try_load(path: &Path) -> GameResult<Option<Self>> {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(GameError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        serde_json::from_str(&json)
            .map(Some)
            .map_err(|source| GameError::Json {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Write settings to a JSON file
    pub fn save(&self, path: &Path) -> GameResult<()> {
        let json = serde_json::to_string_pretty(self).map_err(|source| GameError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(|source| GameError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("light-cycles-{}-{}.json", name, std::process::id()))
    }

    #[test]
    fn test_speed_scales_with_height() {
        let settings = Settings::default();
        assert!((settings.speed() - 60.0).abs() < 1e-4);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings: Settings = serde_json::from_str(r#"{ "winner_bonus": 250.0 }"#).unwrap();
        assert_eq!(settings.winner_bonus, 250.0);
        assert_eq!(settings.roll_off_ms, ROLL_OFF_MS);
        assert_eq!(settings.burst_count, BURST_COUNT);
    }

    #[test]
    fn test_missing_file_is_defaults() {
        let path = temp_path("settings-missing");
        let _ = std::fs::remove_file(&path);
        assert!(Settings::try_load(&path).unwrap().is_none());
        assert_eq!(Settings::load(&path), Settings::default());
    }

    #[test]
    fn test_malformed_file_falls_back() {
        let path = temp_path("settings-bad");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(Settings::try_load(&path).is_err());
        assert_eq!(Settings::load(&path), Settings::default());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("settings-save");
        let settings = Settings {
            roll_off_ms: 1500.0,
            ..Default::default()
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path), settings);
        let _ = std::fs::remove_file(&path);
    }
}
