//! Autonomous Decision Types
//!
//! Decisions selected by the autonomy engine for presentation and consequence application.

use serde::{Deserialize, Serialize};

use crate::NpcId;

/// Generates a decision ID with the given sequence number.
pub fn generate_decision_id(sequence: u64) -> String {
    format!("dec_{:06}", sequence)
}

/// Drives behind NPC behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotiveType {
    Survival,
    AllianceBuilding,
    Revenge,
    Romance,
    Chaos,
    InformationGathering,
}

/// What an NPC decided to do on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionType {
    ProposeAlliance,
    SendDm,
    Confront,
    Scheme,
    SpreadRumor,
    Flirt,
    Betray,
}

impl DecisionType {
    pub fn as_str(self) -> &'static str {
        match self {
            DecisionType::ProposeAlliance => "propose_alliance",
            DecisionType::SendDm => "send_dm",
            DecisionType::Confront => "confront",
            DecisionType::Scheme => "scheme",
            DecisionType::SpreadRumor => "spread_rumor",
            DecisionType::Flirt => "flirt",
            DecisionType::Betray => "betray",
        }
    }

    /// Decisions that damage the target relationship.
    pub fn is_hostile(self) -> bool {
        matches!(
            self,
            DecisionType::Confront | DecisionType::Scheme | DecisionType::SpreadRumor | DecisionType::Betray
        )
    }
}

/// An executed autonomous decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcDecision {
    pub decision_id: String,
    pub npc: NpcId,
    pub npc_name: String,
    pub decision: DecisionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<NpcId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_name: Option<String>,
    /// Who a rumor or scheme is about, when different from the target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<NpcId>,
    pub motive: MotiveType,
    /// 0-100, copied from the driving motive's intensity
    pub urgency: f32,
    pub content: String,
    pub day: u32,
}
