//! Relationship Components
//!
//! One directed edge of the relationship graph and its bounded history.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use cast_events::NpcId;

/// Maximum history entries kept per edge.
pub const MAX_HISTORY: usize = 10;

/// What kind of interaction produced a relationship change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    Conversation,
    Compliment,
    Flirt,
    AllianceFormed,
    AllianceBroken,
    Conflict,
    Rumor,
    Vote,
    Event,
}

/// One entry of an edge's interaction history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub day: u32,
    pub kind: InteractionKind,
    /// Adjusted trust delta applied to this edge
    pub impact: f32,
    pub description: String,
    /// Mirrored update caused by the other direction
    #[serde(default)]
    pub received: bool,
}

/// Directed edge: how `source` feels about `target`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub source: NpcId,
    pub target: NpcId,
    /// -100 to 100
    pub trust: f32,
    /// 0 to 100
    pub suspicion: f32,
    /// 0 to 100
    pub closeness: f32,
    pub in_alliance: bool,
    /// 0 to 100
    pub alliance_strength: f32,
    pub last_interaction_day: u32,
    pub history: VecDeque<InteractionRecord>,
}

impl Relationship {
    pub fn new(source: NpcId, target: NpcId, trust: f32, suspicion: f32, closeness: f32) -> Self {
        let mut rel = Self {
            source,
            target,
            trust,
            suspicion,
            closeness,
            in_alliance: false,
            alliance_strength: 0.0,
            last_interaction_day: 0,
            history: VecDeque::new(),
        };
        rel.clamp();
        rel
    }

    /// Applies raw deltas and clamps all scores.
    pub fn apply(&mut self, trust: f32, suspicion: f32, closeness: f32) {
        self.trust += trust;
        self.suspicion += suspicion;
        self.closeness += closeness;
        self.clamp();
    }

    pub fn clamp(&mut self) {
        self.trust = self.trust.clamp(-100.0, 100.0);
        self.suspicion = self.suspicion.clamp(0.0, 100.0);
        self.closeness = self.closeness.clamp(0.0, 100.0);
        self.alliance_strength = self.alliance_strength.clamp(0.0, 100.0);
    }

    pub fn push_history(&mut self, record: InteractionRecord) {
        self.history.push_back(record);
        while self.history.len() > MAX_HISTORY {
            self.history.pop_front();
        }
    }

    /// Interactions and negative interactions within `window` days of `day`.
    pub fn recent_counts(&self, day: u32, window: u32) -> (usize, usize) {
        let recent = self
            .history
            .iter()
            .filter(|r| !r.received && day.saturating_sub(r.day) <= window);
        recent.fold((0, 0), |(all, neg), r| {
            (all + 1, neg + usize::from(r.impact < 0.0))
        })
    }

    pub fn days_silent(&self, day: u32) -> u32 {
        day.saturating_sub(self.last_interaction_day)
    }

    pub fn is_healthy(&self) -> bool {
        self.trust >= 60.0 && self.suspicion <= 30.0
    }
}
