//! Memory Components
//!
//! Immutable memory events and the private journal each cast member keeps.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, VecDeque};

use cast_events::NpcId;

/// Working-set cap for a journal's entries.
pub const MAX_JOURNAL_ENTRIES: usize = 50;

/// Category of a remembered event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryKind {
    Conversation,
    Alliance,
    Betrayal,
    Conflict,
    Romance,
    Rumor,
    Secret,
    Promise,
    Vote,
    Elimination,
    Event,
}

/// Where a memory came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MemorySource {
    Firsthand,
    Gossip { from: NpcId },
}

/// A remembered event. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryEvent {
    pub id: u64,
    pub day: u32,
    pub kind: MemoryKind,
    pub participants: Vec<NpcId>,
    pub content: String,
    /// -10 to 10
    pub emotional_impact: f32,
    /// 0 to 10
    pub importance: f32,
    /// 0 to 1
    pub reliability: f32,
    pub source: MemorySource,
}

impl MemoryEvent {
    pub fn is_negative(&self) -> bool {
        self.emotional_impact < 0.0
    }

    pub fn is_positive(&self) -> bool {
        self.emotional_impact > 0.0
    }

    pub fn involves(&self, npc: NpcId) -> bool {
        self.participants.contains(&npc)
    }
}

/// Current voting intention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VotingPlan {
    pub target: NpcId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup: Option<NpcId>,
    pub reason: String,
    pub day: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromiseStatus {
    Open,
    Kept,
    Broken,
}

/// A promise made by the journal owner to someone else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Promise {
    pub id: u64,
    pub to: NpcId,
    pub content: String,
    pub day: u32,
    pub status: PromiseStatus,
}

/// A secret and who knows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Secret {
    pub id: u64,
    pub owner: NpcId,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about: Option<NpcId>,
    pub known_by: BTreeSet<NpcId>,
    pub day: u32,
}

/// Private notebook of one cast member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrivateJournal {
    pub owner: NpcId,
    pub strategy: String,
    pub goals: Vec<String>,
    pub entries: VecDeque<MemoryEvent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voting_plan: Option<VotingPlan>,
    /// 0 to 10 per member
    pub threat_assessment: BTreeMap<NpcId, f32>,
    /// -10 to 10 per member
    pub personal_bonds: BTreeMap<NpcId, f32>,
    pub promises: Vec<Promise>,
    pub secrets: Vec<Secret>,
}

impl PrivateJournal {
    pub fn new(owner: NpcId, strategy: impl Into<String>, goals: Vec<String>) -> Self {
        Self {
            owner,
            strategy: strategy.into(),
            goals,
            entries: VecDeque::new(),
            voting_plan: None,
            threat_assessment: BTreeMap::new(),
            personal_bonds: BTreeMap::new(),
            promises: Vec::new(),
            secrets: Vec::new(),
        }
    }

    pub fn push_entry(&mut self, event: MemoryEvent) {
        self.entries.push_back(event);
        while self.entries.len() > MAX_JOURNAL_ENTRIES {
            self.entries.pop_front();
        }
    }

    pub fn knows(&self, memory_id: u64) -> bool {
        self.entries.iter().any(|e| e.id == memory_id)
    }

    pub fn bond(&self, other: NpcId) -> f32 {
        self.personal_bonds.get(&other).copied().unwrap_or(0.0)
    }

    pub fn threat(&self, other: NpcId) -> f32 {
        self.threat_assessment.get(&other).copied().unwrap_or(0.0)
    }

    pub fn open_promises(&self) -> impl Iterator<Item = &Promise> {
        self.promises.iter().filter(|p| p.status == PromiseStatus::Open)
    }
}
