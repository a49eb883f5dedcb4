//! Motive Components

use serde::{Deserialize, Serialize};

use cast_events::{MotiveType, NpcId};

/// A current drive of an NPC. Recomputed every tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcMotive {
    pub motive: MotiveType,
    /// 0 to 100
    pub intensity: f32,
    pub targets: Vec<NpcId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<u32>,
}

impl NpcMotive {
    pub fn new(motive: MotiveType, intensity: f32) -> Self {
        Self {
            motive,
            intensity: intensity.clamp(0.0, 100.0),
            targets: Vec::new(),
            deadline: None,
        }
    }

    pub fn with_targets(mut self, targets: Vec<NpcId>) -> Self {
        self.targets = targets;
        self
    }

    pub fn with_deadline(mut self, day: u32) -> Self {
        self.deadline = Some(day);
        self
    }

    pub fn primary_target(&self) -> Option<NpcId> {
        self.targets.first().copied()
    }
}
