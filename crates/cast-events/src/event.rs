//! Emergent Event Types
//!
//! Dramatic events seeded by the simulation, with the consequences they applied.

use serde::{Deserialize, Serialize};

use crate::NpcId;

/// Generates an event ID with the given sequence number.
pub fn generate_event_id(sequence: u64) -> String {
    format!("evt_{:08}", sequence)
}

/// Category of an emergent event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmergentEventType {
    Conflict,
    Alliance,
    Betrayal,
    Romance,
    Rumor,
    ConfessionLeak,
    /// Confrontation spawned from a remembered betrayal
    Revenge,
    /// Forced event keeping a minimum level of drama
    LowKey,
}

impl EmergentEventType {
    pub fn as_str(self) -> &'static str {
        match self {
            EmergentEventType::Conflict => "conflict",
            EmergentEventType::Alliance => "alliance",
            EmergentEventType::Betrayal => "betrayal",
            EmergentEventType::Romance => "romance",
            EmergentEventType::Rumor => "rumor",
            EmergentEventType::ConfessionLeak => "confession_leak",
            EmergentEventType::Revenge => "revenge",
            EmergentEventType::LowKey => "low_key",
        }
    }

    /// Returns all event type variants.
    pub fn all() -> &'static [EmergentEventType] {
        &[
            EmergentEventType::Conflict,
            EmergentEventType::Alliance,
            EmergentEventType::Betrayal,
            EmergentEventType::Romance,
            EmergentEventType::Rumor,
            EmergentEventType::ConfessionLeak,
            EmergentEventType::Revenge,
            EmergentEventType::LowKey,
        ]
    }
}

/// Lifecycle state of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventOutcome {
    Resolved,
    Escalated,
    Ongoing,
}

/// A state change an event applied when it fired.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Consequence {
    RelationshipDelta {
        from: NpcId,
        to: NpcId,
        trust: f32,
        suspicion: f32,
        closeness: f32,
    },
    AllianceFormed {
        a: NpcId,
        b: NpcId,
    },
    AllianceBroken {
        betrayer: NpcId,
        betrayed: NpcId,
        level: f32,
    },
    MemoryRecorded {
        memory_id: u64,
        participants: Vec<NpcId>,
    },
    GossipSpread {
        from: NpcId,
        to: NpcId,
        about: NpcId,
    },
}

/// Common drama tags for categorizing events.
pub mod drama_tags {
    pub const BETRAYAL: &str = "betrayal";
    pub const REVENGE: &str = "revenge";
    pub const SECRET_REVEALED: &str = "secret_revealed";
    pub const RUMOR_SPREADING: &str = "rumor_spreading";
    pub const SHOWMANCE: &str = "showmance";
    pub const BLINDSIDE: &str = "blindside";
    pub const ESCALATION: &str = "escalation";
    pub const MEMORY_GROUNDED: &str = "memory_grounded";
    pub const DRAMA_FLOOR: &str = "drama_floor";
}

/// A seeded or escalated dramatic event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergentEvent {
    pub event_id: String,
    pub event_type: EmergentEventType,
    pub participants: Vec<NpcId>,
    pub description: String,
    /// 0-100
    pub drama_tension: f32,
    pub day: u32,
    pub player_involvement: bool,
    pub outcome: EventOutcome,
    #[serde(default)]
    pub consequences: Vec<Consequence>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub drama_tags: Vec<String>,
    /// Event this one escalated from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub escalated_from: Option<String>,
}

impl EmergentEvent {
    pub fn new(
        event_id: impl Into<String>,
        event_type: EmergentEventType,
        participants: Vec<NpcId>,
        day: u32,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            event_type,
            participants,
            description: String::new(),
            drama_tension: 0.0,
            day,
            player_involvement: false,
            outcome: EventOutcome::Ongoing,
            consequences: Vec::new(),
            drama_tags: Vec::new(),
            escalated_from: None,
        }
    }

    pub fn with_tension(mut self, tension: f32) -> Self {
        self.drama_tension = tension.clamp(0.0, 100.0);
        self
    }

    pub fn with_outcome(mut self, outcome: EventOutcome) -> Self {
        self.outcome = outcome;
        self
    }

    pub fn with_tag(mut self, tag: &str) -> Self {
        self.drama_tags.push(tag.to_string());
        self
    }

    pub fn involves(&self, npc: NpcId) -> bool {
        self.participants.contains(&npc)
    }

    /// Whether this event is older than the retention window.
    pub fn is_expired(&self, current_day: u32, retention_days: u32) -> bool {
        current_day.saturating_sub(self.day) > retention_days
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_id_format() {
        assert_eq!(generate_event_id(1), "evt_00000001");
    }

    #[test]
    fn test_tension_is_clamped() {
        let event = EmergentEvent::new("evt", EmergentEventType::Conflict, vec![NpcId(0)], 1)
            .with_tension(140.0);
        assert_eq!(event.drama_tension, 100.0);
    }

    #[test]
    fn test_expiry_window() {
        let event = EmergentEvent::new("evt", EmergentEventType::Rumor, vec![], 3);
        assert!(!event.is_expired(10, 7));
        assert!(event.is_expired(11, 7));
    }

    #[test]
    fn test_consequence_tagged_serialization() {
        let c = Consequence::AllianceFormed { a: NpcId(1), b: NpcId(2) };
        let json = serde_json::to_string(&c).unwrap();
        assert!(json.contains(r#""kind":"alliance_formed""#));
        let back: Consequence = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }
}
