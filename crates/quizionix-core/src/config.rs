//! Configuration loading and typed config structures for Quizionix.
//!
//! The canonical configuration lives in `quizionix-config.yaml` at the project
//! root. Every section and field has a default, so an empty file (or no file
//! at all) yields the standard game. The Knowledge Health, progression and
//! difficulty sections reuse the parameter structs from
//! `quizionix-progression`; pacing, scoring, world and logging live here.

use std::path::Path;

use quizionix_progression::{
    DifficultyConfig, KnowledgeHealthConfig, ProgressionConfig, ZoneCatalog,
};
use quizionix_types::{DifficultyTier, EncounterType};
use serde::{Deserialize, Serialize};

/// Environment variable overriding `world.seed`.
pub const SEED_ENV: &str = "QUIZIONIX_SEED";

/// Environment variable overriding `logging.level`.
pub const LOG_LEVEL_ENV: &str = "QUIZIONIX_LOG_LEVEL";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The configuration parsed but describes an unplayable game.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// What is wrong.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level game configuration.
///
/// Mirrors the structure of `quizionix-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// World-level settings (name, seed).
    #[serde(default)]
    pub world: WorldConfig,

    /// Knowledge Health model parameters.
    #[serde(default)]
    pub knowledge_health: KnowledgeHealthConfig,

    /// Mastery, boss and outcome-window parameters.
    #[serde(default)]
    pub progression: ProgressionConfig,

    /// Difficulty adapter thresholds.
    #[serde(default)]
    pub difficulty: DifficultyConfig,

    /// Expected-time budget, timing multiplier and tick interval.
    #[serde(default)]
    pub pacing: PacingConfig,

    /// Points per tier and boss bonus.
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Zones and branches.
    #[serde(default)]
    pub catalog: ZoneCatalog,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl GameConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `QUIZIONIX_SEED` overrides `world.seed`
    /// - `QUIZIONIX_LOG_LEVEL` overrides `logging.level`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if the values are unusable.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, then apply environment
    /// overrides and validate.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if the values are unusable.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup (normally the process
    /// environment). Unparseable seeds are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(seed) = lookup(SEED_ENV).and_then(|s| s.trim().parse::<u64>().ok()) {
            self.world.seed = seed;
        }
        if let Some(level) = lookup(LOG_LEVEL_ENV).filter(|l| !l.trim().is_empty()) {
            self.logging.level = level.trim().to_owned();
        }
    }

    /// Check the configuration for values that would make the game
    /// unplayable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.progression.boss_max_hp == 0 {
            return Err(invalid("progression.boss_max_hp must be at least 1"));
        }
        if self.progression.boss_damage == 0 {
            return Err(invalid("progression.boss_damage must be at least 1"));
        }
        if self.difficulty.advanced_threshold > self.difficulty.master_threshold {
            return Err(invalid(
                "difficulty.advanced_threshold must not exceed difficulty.master_threshold",
            ));
        }
        if self.pacing.tick_interval_ms == 0 {
            return Err(invalid("pacing.tick_interval_ms must be at least 1"));
        }
        if !(self.pacing.floor_seconds.is_finite() && self.pacing.floor_seconds > 0.0) {
            return Err(invalid("pacing.floor_seconds must be positive"));
        }
        self.catalog
            .validate()
            .map_err(|e| invalid(&format!("catalog: {e}")))
    }
}

fn invalid(reason: &str) -> ConfigError {
    ConfigError::Invalid {
        reason: reason.to_owned(),
    }
}

/// World-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Human-readable game name.
    #[serde(default = "default_world_name")]
    pub name: String,

    /// Seed for challenge seeds and choice shuffles.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: default_world_name(),
            seed: default_seed(),
        }
    }
}

/// Expected-time budget and timing-multiplier parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Base expected seconds at Beginner (default: 22).
    pub base_seconds_beginner: f64,

    /// Base expected seconds at Advanced (default: 17).
    pub base_seconds_advanced: f64,

    /// Base expected seconds at Master (default: 13).
    pub base_seconds_master: f64,

    /// Extra seconds for boss challenges (default: 7).
    pub boss_extra_seconds: f64,

    /// Knowledge Health below which extra time is granted (default: 40).
    pub low_health_below: f64,

    /// Extra seconds granted at low Knowledge Health (default: 4).
    pub low_health_extra_seconds: f64,

    /// Knowledge Health above which time is trimmed (default: 80).
    pub high_health_above: f64,

    /// Seconds trimmed at high Knowledge Health (default: 1).
    pub high_health_trim_seconds: f64,

    /// Minimum expected seconds (default: 8).
    pub floor_seconds: f64,

    /// Multiplier at zero elapsed time (default: 3).
    pub multiplier_peak: f64,

    /// Exponential decay of the multiplier per unit of pace ratio (default: 0.9).
    pub multiplier_decay: f64,

    /// Lowest multiplier (default: 0.25).
    pub multiplier_min: f64,

    /// Highest multiplier (default: 3).
    pub multiplier_max: f64,

    /// Pace ratio at or below which an answer is fast (default: 0.6).
    pub fast_ratio: f64,

    /// Pace ratio at or below which an answer is on pace (default: 1.0).
    pub on_pace_ratio: f64,

    /// Pace ratio at or below which an answer is slow (default: 1.6).
    pub slow_ratio: f64,

    /// Interval between Knowledge Health decay ticks (default: 250).
    pub tick_interval_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            base_seconds_beginner: 22.0,
            base_seconds_advanced: 17.0,
            base_seconds_master: 13.0,
            boss_extra_seconds: 7.0,
            low_health_below: 40.0,
            low_health_extra_seconds: 4.0,
            high_health_above: 80.0,
            high_health_trim_seconds: 1.0,
            floor_seconds: 8.0,
            multiplier_peak: 3.0,
            multiplier_decay: 0.9,
            multiplier_min: 0.25,
            multiplier_max: 3.0,
            fast_ratio: 0.6,
            on_pace_ratio: 1.0,
            slow_ratio: 1.6,
            tick_interval_ms: 250,
        }
    }
}

impl PacingConfig {
    /// Base expected seconds for a tier.
    pub const fn base_seconds(&self, tier: DifficultyTier) -> f64 {
        match tier {
            DifficultyTier::Beginner => self.base_seconds_beginner,
            DifficultyTier::Advanced => self.base_seconds_advanced,
            DifficultyTier::Master => self.base_seconds_master,
        }
    }
}

/// Points awarded for correct answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Base points at Beginner (default: 10).
    pub base_points_beginner: u32,

    /// Base points at Advanced (default: 15).
    pub base_points_advanced: u32,

    /// Base points at Master (default: 20).
    pub base_points_master: u32,

    /// Boss answers are worth this percentage of the base (default: 150).
    pub boss_bonus_pct: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            base_points_beginner: 10,
            base_points_advanced: 15,
            base_points_master: 20,
            boss_bonus_pct: 150,
        }
    }
}

impl ScoringConfig {
    /// Base points for a correct answer before the timing multiplier.
    pub fn base_points(&self, tier: DifficultyTier, encounter: EncounterType) -> u64 {
        let base = match tier {
            DifficultyTier::Beginner => self.base_points_beginner,
            DifficultyTier::Advanced => self.base_points_advanced,
            DifficultyTier::Master => self.base_points_master,
        };
        let base = u64::from(base);
        if encounter.is_boss() {
            base.saturating_mul(u64::from(self.boss_bonus_pct)) / 100
        } else {
            base
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

fn default_world_name() -> String {
    "Quizionix".to_owned()
}

const fn default_seed() -> u64 {
    42
}

fn default_log_level() -> String {
    "info".to_owned()
}
