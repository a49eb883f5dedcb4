//! Configuration loading for the social engine.
//!
//! All tuning knobs are loaded from a TOML file. Every section defaults, so a
//! partial file only overrides what it names.

use serde::{Deserialize, Serialize};
use std::path::Path;

use thiserror::Error;

/// Complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub tick: TickConfig,
    #[serde(default)]
    pub relationships: RelationshipConfig,
    #[serde(default)]
    pub interpretation: InterpretationConfig,
    #[serde(default)]
    pub autonomy: AutonomyConfig,
    #[serde(default)]
    pub events: EventsConfig,
    #[serde(default)]
    pub health: HealthConfig,
}

impl EngineConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parses configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Returns the default configuration as a TOML string.
pub fn default_config_toml() -> String {
    EngineConfig::default().to_toml().unwrap_or_default()
}

/// Tick cadence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickConfig {
    /// Minimum wall-clock gap between full ticks
    pub interval_ms: u64,
    pub start_day: u32,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            interval_ms: 30_000,
            start_day: 1,
        }
    }
}

/// Relationship graph tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelationshipConfig {
    pub default_trust: f32,
    pub default_suspicion: f32,
    /// Extra starting suspicion per point of observer paranoia
    pub paranoia_suspicion: f32,
    pub default_closeness: f32,
    /// Window for counting recent interactions
    pub recent_window_days: u32,
    pub early_game_days: u32,
    pub early_gain_multiplier: f32,
    /// Gain divisor per recent interaction
    pub diminishing_factor: f32,
    pub loss_multiplier: f32,
    /// Loss amplification per recent negative interaction
    pub compounding_factor: f32,
    pub mirror_trust: f32,
    pub mirror_suspicion: f32,
    pub mirror_closeness: f32,
    pub decay_grace_days: u32,
    pub decay_rate: f32,
    pub decay_max_step: f32,
    pub neutral_trust_low: f32,
    pub neutral_trust_high: f32,
    pub suspicion_midpoint: f32,
    pub close_threshold: f32,
}

impl Default for RelationshipConfig {
    fn default() -> Self {
        Self {
            default_trust: 50.0,
            default_suspicion: 10.0,
            paranoia_suspicion: 0.3,
            default_closeness: 20.0,
            recent_window_days: 3,
            early_game_days: 7,
            early_gain_multiplier: 1.5,
            diminishing_factor: 0.3,
            loss_multiplier: 1.3,
            compounding_factor: 0.25,
            mirror_trust: 0.7,
            mirror_suspicion: 0.8,
            mirror_closeness: 0.6,
            decay_grace_days: 3,
            decay_rate: 2.0,
            decay_max_step: 10.0,
            neutral_trust_low: 30.0,
            neutral_trust_high: 70.0,
            suspicion_midpoint: 60.0,
            close_threshold: 50.0,
        }
    }
}

/// Interpretation and anti-exploit tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpretationConfig {
    /// Weight of the newest sample in rolling profiles
    pub profile_blend: f32,
    /// Below this emotionality readings are always argmax
    pub steady_emotionality: f32,
    /// Above this axis confidence readings are always argmax
    pub confident_axis: f32,
    pub exploit_decay: f32,
    pub pr_tone_rise: f32,
    pub meta_gaming_rise: f32,
    pub keyword_spam_rise: f32,
}

impl Default for InterpretationConfig {
    fn default() -> Self {
        Self {
            profile_blend: 0.1,
            steady_emotionality: 30.0,
            confident_axis: 0.7,
            exploit_decay: 0.9,
            pr_tone_rise: 15.0,
            meta_gaming_rise: 40.0,
            keyword_spam_rise: 20.0,
        }
    }
}

/// Autonomous decision tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutonomyConfig {
    /// Minimum gap between two executed decisions of one NPC
    pub cooldown_ms: u64,
    /// Acting within this window halves decision weights
    pub recency_window_ms: u64,
    /// Urgency under which the flat chance applies
    pub low_urgency: f32,
    pub low_urgency_chance: f64,
    pub revenge_window_days: u32,
    pub revenge_deadline_days: u32,
}

impl Default for AutonomyConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: 60_000,
            recency_window_ms: 300_000,
            low_urgency: 40.0,
            low_urgency_chance: 0.3,
            revenge_window_days: 2,
            revenge_deadline_days: 3,
        }
    }
}

/// Emergent event tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventsConfig {
    pub retention_days: u32,
    pub recent_memory_days: u32,
    pub revenge_chance: f64,
    pub memory_alliance_chance: f64,
    pub escalation_chance: f64,
    pub escalation_threshold: f32,
    pub escalation_boost: f32,
    pub drama_floor_tension: f32,
    pub drama_floor_idle_ms: u64,
    pub seeds: SeedChances,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            retention_days: 7,
            recent_memory_days: 3,
            revenge_chance: 0.3,
            memory_alliance_chance: 0.25,
            escalation_chance: 0.2,
            escalation_threshold: 60.0,
            escalation_boost: 20.0,
            drama_floor_tension: 30.0,
            drama_floor_idle_ms: 600_000,
            seeds: SeedChances::default(),
        }
    }
}

/// Fire probability of each seed once its conditions hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedChances {
    pub conflict: f64,
    pub alliance: f64,
    pub betrayal: f64,
    pub romance: f64,
    pub rumor: f64,
    pub confession_leak: f64,
}

impl Default for SeedChances {
    fn default() -> Self {
        Self {
            conflict: 0.35,
            alliance: 0.3,
            betrayal: 0.2,
            romance: 0.25,
            rumor: 0.3,
            confession_leak: 0.15,
        }
    }
}

/// Advisory health check thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthConfig {
    /// Edges touched within this many days count as active
    pub activity_window_days: u32,
    /// Warn when fewer than this share of edges are active
    pub min_activity_share: f32,
    /// |trust| or suspicion at or above this is extreme
    pub extreme_threshold: f32,
    /// Warn when more than this share of edges are extreme
    pub max_extreme_share: f32,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            activity_window_days: 2,
            min_activity_share: 0.05,
            extreme_threshold: 90.0,
            max_extreme_share: 0.3,
        }
    }
}

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}
