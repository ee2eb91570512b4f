//! Game configuration.
//!
//! Every field has a default, so a TOML file only needs the keys it
//! changes:
//!
//! ```toml
//! player_name = "Ada"
//! difficulty = "hard"
//! seed = 7
//! autosave_interval = 5
//! save_path = "saves/synapse.json"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{FictionError, FictionResult};

/// Difficulty scales event frequency, sanity loss and challenge deadlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Fewer events, gentler penalties.
    Easy,
    /// The intended experience.
    #[default]
    Normal,
    /// Frequent events, harsh penalties, short deadlines.
    Hard,
}

impl Difficulty {
    /// Parse a difficulty name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" | "e" => Some(Self::Easy),
            "normal" | "n" => Some(Self::Normal),
            "hard" | "h" => Some(Self::Hard),
            _ => None,
        }
    }

    /// Probability that entering a room triggers a room event.
    pub fn event_chance(&self) -> f64 {
        match self {
            Self::Easy => 0.2,
            Self::Normal => 0.35,
            Self::Hard => 0.5,
        }
    }

    /// Sanity lost to a disturbing room event.
    pub fn sanity_penalty(&self) -> i32 {
        match self {
            Self::Easy => 3,
            Self::Normal => 5,
            Self::Hard => 8,
        }
    }

    /// Time allowed to answer a timed challenge.
    pub fn challenge_window(&self) -> Duration {
        match self {
            Self::Easy => Duration::from_secs(15),
            Self::Normal => Duration::from_secs(10),
            Self::Hard => Duration::from_secs(6),
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Easy => write!(f, "easy"),
            Self::Normal => write!(f, "normal"),
            Self::Hard => write!(f, "hard"),
        }
    }
}

/// Configuration for a game session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Name SYNAPSE calls the player.
    pub player_name: String,
    /// Difficulty level.
    pub difficulty: Difficulty,
    /// RNG seed for room events.
    pub seed: u64,
    /// Autosave every this many turns; 0 disables autosave.
    pub autosave_interval: u32,
    /// Journal entries kept before the oldest is evicted.
    pub journal_capacity: usize,
    /// Inputs remembered by `history`.
    pub history_capacity: usize,
    /// Total item weight the player can carry.
    pub inventory_capacity: u32,
    /// Where `save`, `load` and autosave read and write.
    pub save_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player_name: "Operator".to_string(),
            difficulty: Difficulty::Normal,
            seed: 42,
            autosave_interval: 5,
            journal_capacity: 20,
            history_capacity: 10,
            inventory_capacity: 10,
            save_path: PathBuf::from("synapse_save.json"),
        }
    }
}

impl GameConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(s: &str) -> FictionResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| FictionError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file.
    pub fn load(path: &Path) -> FictionResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| FictionError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Reject values the game cannot run with.
    pub fn validate(&self) -> FictionResult<()> {
        if self.player_name.trim().is_empty() {
            return Err(FictionError::Config("player_name must not be empty".into()));
        }
        if self.player_name.contains(['{', '}']) {
            return Err(FictionError::Config(
                "player_name must not contain braces".into(),
            ));
        }
        if self.journal_capacity == 0 {
            return Err(FictionError::Config("journal_capacity must be at least 1".into()));
        }
        Ok(())
    }

    /// Set the player name.
    pub fn with_player_name(mut self, name: impl Into<String>) -> Self {
        self.player_name = name.into();
        self
    }

    /// Set the difficulty.
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the autosave interval (0 disables autosave).
    pub fn with_autosave_interval(mut self, turns: u32) -> Self {
        self.autosave_interval = turns;
        self
    }

    /// Set the save file path.
    pub fn with_save_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.save_path = path.into();
        self
    }

    /// Set the inventory weight capacity.
    pub fn with_inventory_capacity(mut self, capacity: u32) -> Self {
        self.inventory_capacity = capacity;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let cfg = GameConfig::default();
        assert_eq!(cfg.seed, 42);
        assert_eq!(cfg.difficulty, Difficulty::Normal);
        assert_eq!(cfg.autosave_interval, 5);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn builder_methods() {
        let cfg = GameConfig::default()
            .with_seed(7)
            .with_difficulty(Difficulty::Hard)
            .with_player_name("Ada")
            .with_autosave_interval(0);
        assert_eq!(cfg.seed, 7);
        assert_eq!(cfg.difficulty, Difficulty::Hard);
        assert_eq!(cfg.player_name, "Ada");
        assert_eq!(cfg.autosave_interval, 0);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = GameConfig::from_toml_str("player_name = \"Ada\"\ndifficulty = \"easy\"\n").unwrap();
        assert_eq!(cfg.player_name, "Ada");
        assert_eq!(cfg.difficulty, Difficulty::Easy);
        assert_eq!(cfg.seed, 42);
    }

    #[test]
    fn invalid_toml_rejected() {
        assert!(matches!(
            GameConfig::from_toml_str("difficulty = \"nightmare\""),
            Err(FictionError::Config(_))
        ));
        assert!(GameConfig::from_toml_str("player_name = \"{evil\"").is_err());
    }

    #[test]
    fn difficulty_scaling() {
        assert!(Difficulty::Easy.event_chance() < Difficulty::Hard.event_chance());
        assert!(Difficulty::Easy.challenge_window() > Difficulty::Hard.challenge_window());
        assert_eq!(Difficulty::parse("HARD"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::parse("brutal"), None);
    }
}
