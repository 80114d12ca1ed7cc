//! High score store keyed by matchup
//!
//! Every player name maps to the opponents it has played against, each with
//! the score from the most recent confirmed round of that pairing. Persisted
//! as a single JSON object and rewritten in full on every save.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GameError, GameResult};

/// Matchup high scores: `player -> opponent -> score`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HighScores {
    pub entries: BTreeMap<String, BTreeMap<String, f64>>,
}

impl HighScores {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Record `player`'s score against `opponent`, replacing only that pair
    pub fn record(&mut self, player: &str, opponent: &str, score: f64) {
        self.entries
            .entry(player.to_string())
            .or_default()
            .insert(opponent.to_string(), score);
    }

    /// Score recorded for a matchup, if any
    pub fn get(&self, player: &str, opponent: &str) -> Option<f64> {
        self.entries.get(player)?.get(opponent).copied()
    }

    /// Total score per player across all opponents, highest first
    pub fn totals(&self) -> Vec<(String, f64)> {
        let mut totals: Vec<(String, f64)> = self
            .entries
            .iter()
            .map(|(name, matchups)| (name.clone(), matchups.values().sum()))
            .collect();
        // Stable sort keeps names alphabetical within equal totals
        totals.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        totals
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load the store, treating a missing or corrupt file as empty
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(Some(scores)) => {
                log::info!(
                    "Loaded high scores for {} players from {}",
                    scores.entries.len(),
                    path.display()
                );
                scores
            }
            Ok(None) => {
                log::info!("No high scores at {}, starting fresh", path.display());
                Self::new()
            }
            Err(e) => {
                log::warn!("{}; starting with empty high scores", e);
                Self::new()
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

    /// Overwrite the file with the whole store
    pub fn save(&self, path: &Path) -> GameResult<()> {
        let json = serde_json::to_string_pretty(self).map_err(|source| GameError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(|source| GameError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!(
            "High scores saved ({} players) to {}",
            self.entries.len(),
            path.display()
        );
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
    fn test_record_overwrites_only_that_pair() {
        let mut scores = HighScores::new();
        scores.record("ABC", "XYZ", 120.0);
        scores.record("ABC", "QQQ", 50.0);
        scores.record("ABC", "XYZ", 300.0);

        assert_eq!(scores.get("ABC", "XYZ"), Some(300.0));
        assert_eq!(scores.get("ABC", "QQQ"), Some(50.0));
        assert_eq!(scores.get("XYZ", "ABC"), None);
    }

    #[test]
    fn test_totals_sum_across_opponents() {
        let mut scores = HighScores::new();
        scores.record("ABC", "X", 10.0);
        scores.record("ABC", "Y", 20.0);
        scores.record("DEF", "ABC", 45.0);

        let totals = scores.totals();
        assert_eq!(totals[0], ("DEF".to_string(), 45.0));
        assert_eq!(totals[1], ("ABC".to_string(), 30.0));
    }

    #[test]
    fn test_json_shape_is_nested_object() {
        let mut scores = HighScores::new();
        scores.record("ABC", "XYZ", 120.0);
        let json = serde_json::to_value(&scores).unwrap();
        assert_eq!(json["ABC"]["XYZ"], serde_json::json!(120.0));
    }

    #[test]
    fn test_missing_file_is_empty() {
        let path = temp_path("scores-missing");
        let _ = std::fs::remove_file(&path);
        assert!(HighScores::try_load(&path).unwrap().is_none());
        assert!(HighScores::load(&path).is_empty());
    }

    #[test]
    fn test_corrupt_file_is_empty() {
        let path = temp_path("scores-corrupt");
        std::fs::write(&path, "[1, 2").unwrap();
        assert!(matches!(
            HighScores::try_load(&path),
            Err(GameError::Json { .. })
        ));
        assert!(HighScores::load(&path).is_empty());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_save_overwrites_file() {
        let path = temp_path("scores-save");
        let mut scores = HighScores::new();
        scores.record("ABC", "XYZ", 120.0);
        scores.save(&path).unwrap();

        let mut fresh = HighScores::new();
        fresh.record("DEF", "GHI", 1.0);
        fresh.save(&path).unwrap();

        let loaded = HighScores::load(&path);
        assert_eq!(loaded, fresh);
        let _ = std::fs::remove_file(&path);
    }
}
