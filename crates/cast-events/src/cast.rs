//! Cast Types
//!
//! Roster entries and the player-action descriptor consumed from the game layer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable index of a cast member inside the engine's arena.
///
/// Ids are assigned in roster order at initialization and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NpcId(pub u32);

impl NpcId {
    /// Position of this member in per-cast vectors.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NpcId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "npc_{:03}", self.0)
    }
}

/// One entry of the cast roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastMember {
    pub id: NpcId,
    pub name: String,
    /// Free-form disposition tags ("paranoid", "loyal", "flirt", ...)
    #[serde(default)]
    pub dispositions: Vec<String>,
    /// The human-controlled contestant; present in the graph, never autonomous
    #[serde(default)]
    pub is_player: bool,
    /// Cleared when the member is voted out; edges are kept
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl CastMember {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id: NpcId(id),
            name: name.into(),
            dispositions: Vec::new(),
            is_player: false,
            active: true,
        }
    }

    pub fn with_dispositions<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dispositions = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn as_player(mut self) -> Self {
        self.is_player = true;
        self
    }

    /// First whitespace-separated word of the display name.
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }
}

/// Kind of player action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerActionKind {
    Talk,
    Dm,
    Scheme,
    Flirt,
    VotePitch,
    AlliancePitch,
}

/// Player-action descriptor: `{type, target?, content?, tone?}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerAction {
    pub kind: PlayerActionKind,
    /// Display name of the addressed cast member
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Tone the UI attached to the action ("friendly", "aggressive", ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,
}

impl PlayerAction {
    pub fn talk(target: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            kind: PlayerActionKind::Talk,
            target: Some(target.into()),
            content: Some(content.into()),
            tone: None,
        }
    }

    pub fn with_kind(mut self, kind: PlayerActionKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_tone(mut self, tone: impl Into<String>) -> Self {
        self.tone = Some(tone.into());
        self
    }
}
