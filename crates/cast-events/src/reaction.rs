//! Reaction Types
//!
//! What the engine hands back to the game layer after a player action, plus the
//! per-member standing snapshot.

use serde::{Deserialize, Serialize};

use crate::NpcId;

/// Overall read of how the NPC took the player's action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReactionTake {
    Positive,
    Neutral,
    Suspicious,
    Pushback,
}

/// Numeric consequences surfaced to the UI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ReactionDeltas {
    pub trust: f32,
    pub suspicion: f32,
    pub influence: f32,
    pub entertainment: f32,
}

/// Summary of an NPC reaction to one player action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionSummary {
    pub take: ReactionTake,
    pub context: String,
    #[serde(default)]
    pub notes: Vec<String>,
    pub deltas: ReactionDeltas,
}

impl ReactionSummary {
    /// Reaction used when an action could not be applied (unknown target etc).
    pub fn neutral(context: impl Into<String>) -> Self {
        Self {
            take: ReactionTake::Neutral,
            context: context.into(),
            notes: Vec::new(),
            deltas: ReactionDeltas::default(),
        }
    }
}

/// Response strategy chosen by the integrator for an NPC reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStrategy {
    Defensive,
    StrategicAlliance,
    Hostile,
    InformationExtraction,
    ReciprocalFlirting,
    Suspicious,
    Confrontational,
    Neutral,
}

impl ResponseStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            ResponseStrategy::Defensive => "defensive",
            ResponseStrategy::StrategicAlliance => "strategic_alliance",
            ResponseStrategy::Hostile => "hostile",
            ResponseStrategy::InformationExtraction => "information_extraction",
            ResponseStrategy::ReciprocalFlirting => "reciprocal_flirting",
            ResponseStrategy::Suspicious => "suspicious",
            ResponseStrategy::Confrontational => "confrontational",
            ResponseStrategy::Neutral => "neutral",
        }
    }

    pub fn take(self) -> ReactionTake {
        match self {
            ResponseStrategy::StrategicAlliance | ResponseStrategy::ReciprocalFlirting => {
                ReactionTake::Positive
            }
            ResponseStrategy::Suspicious | ResponseStrategy::InformationExtraction => {
                ReactionTake::Suspicious
            }
            ResponseStrategy::Defensive
            | ResponseStrategy::Hostile
            | ResponseStrategy::Confrontational => ReactionTake::Pushback,
            ResponseStrategy::Neutral => ReactionTake::Neutral,
        }
    }

    pub fn all() -> &'static [ResponseStrategy] {
        &[
            ResponseStrategy::Defensive,
            ResponseStrategy::StrategicAlliance,
            ResponseStrategy::Hostile,
            ResponseStrategy::InformationExtraction,
            ResponseStrategy::ReciprocalFlirting,
            ResponseStrategy::Suspicious,
            ResponseStrategy::Confrontational,
            ResponseStrategy::Neutral,
        ]
    }
}

/// Delivery tone of an NPC reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseTone {
    Warm,
    Guarded,
    Cold,
    Playful,
    Sharp,
    Flat,
}

impl ResponseTone {
    pub fn as_str(self) -> &'static str {
        match self {
            ResponseTone::Warm => "warm",
            ResponseTone::Guarded => "guarded",
            ResponseTone::Cold => "cold",
            ResponseTone::Playful => "playful",
            ResponseTone::Sharp => "sharp",
            ResponseTone::Flat => "flat",
        }
    }
}

/// Aggregate standing of one cast member in the eyes of everyone else.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SocialStanding {
    pub npc: NpcId,
    pub avg_trust: f32,
    pub avg_suspicion: f32,
    pub alliance_count: u32,
    /// 0-100 composite
    pub social_power: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_take_mapping() {
        assert_eq!(ResponseStrategy::StrategicAlliance.take(), ReactionTake::Positive);
        assert_eq!(ResponseStrategy::Suspicious.take(), ReactionTake::Suspicious);
        assert_eq!(ResponseStrategy::Confrontational.take(), ReactionTake::Pushback);
        assert_eq!(ResponseStrategy::Neutral.take(), ReactionTake::Neutral);
    }

    #[test]
    fn test_strategy_serialization_matches_as_str() {
        for strategy in ResponseStrategy::all() {
            let json = serde_json::to_string(strategy).unwrap();
            assert_eq!(json, format!("\"{}\"", strategy.as_str()));
        }
    }
}
