//! Personality Components
//!
//! Fixed per-member traits derived once from disposition tags.

use serde::{Deserialize, Serialize};

/// Trait baseline before any disposition offsets.
pub const TRAIT_BASE: f32 = 50.0;

/// Per-tag trait offsets. Unknown tags are ignored.
///
/// Columns: aggressiveness, manipulation, loyalty, paranoia, charisma,
/// intelligence, emotionality, risk_tolerance.
const TAG_OFFSETS: &[(&str, [f32; 8])] = &[
    ("paranoid", [0.0, 0.0, -5.0, 35.0, 0.0, 5.0, 0.0, 0.0]),
    ("strategic", [0.0, 15.0, 0.0, 0.0, 0.0, 20.0, 0.0, 0.0]),
    ("loyal", [0.0, -15.0, 35.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
    ("calm", [-15.0, 0.0, 0.0, 0.0, 0.0, 0.0, -30.0, 0.0]),
    ("charming", [0.0, 0.0, 0.0, 0.0, 30.0, 0.0, 0.0, 0.0]),
    ("flirt", [0.0, 0.0, 0.0, 0.0, 15.0, 0.0, 10.0, 10.0]),
    ("emotional", [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 30.0, 0.0]),
    ("aggressive", [35.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 10.0]),
    ("schemer", [0.0, 35.0, -15.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
    ("risk-taker", [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 35.0]),
    ("smart", [0.0, 0.0, 0.0, 0.0, 0.0, 30.0, 0.0, 0.0]),
    ("cautious", [0.0, 0.0, 0.0, 10.0, 0.0, 0.0, 0.0, -25.0]),
    ("honest", [0.0, -25.0, 10.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
    ("competitive", [15.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 10.0]),
    ("social", [0.0, 0.0, 0.0, 0.0, 20.0, 0.0, 0.0, 0.0]),
    ("shy", [0.0, 0.0, 0.0, 0.0, -20.0, 0.0, 0.0, -10.0]),
    ("volatile", [10.0, 0.0, 0.0, 0.0, 0.0, 0.0, 25.0, 0.0]),
];

/// Eight 0-100 traits, immutable after cast creation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PersonalityProfile {
    pub aggressiveness: f32,
    pub manipulation: f32,
    pub loyalty: f32,
    pub paranoia: f32,
    pub charisma: f32,
    pub intelligence: f32,
    pub emotionality: f32,
    pub risk_tolerance: f32,
}

impl Default for PersonalityProfile {
    fn default() -> Self {
        Self::from_values([TRAIT_BASE; 8])
    }
}

impl PersonalityProfile {
    fn from_values(v: [f32; 8]) -> Self {
        Self {
            aggressiveness: v[0].clamp(0.0, 100.0),
            manipulation: v[1].clamp(0.0, 100.0),
            loyalty: v[2].clamp(0.0, 100.0),
            paranoia: v[3].clamp(0.0, 100.0),
            charisma: v[4].clamp(0.0, 100.0),
            intelligence: v[5].clamp(0.0, 100.0),
            emotionality: v[6].clamp(0.0, 100.0),
            risk_tolerance: v[7].clamp(0.0, 100.0),
        }
    }

    /// Derives traits from disposition tags (case-insensitive).
    pub fn from_dispositions<S: AsRef<str>>(tags: &[S]) -> Self {
        let mut values = [TRAIT_BASE; 8];
        for tag in tags {
            let tag = tag.as_ref().trim().to_lowercase();
            if let Some((_, offsets)) = TAG_OFFSETS.iter().find(|(name, _)| *name == tag) {
                for (value, offset) in values.iter_mut().zip(offsets) {
                    *value += offset;
                }
            }
        }
        Self::from_values(values)
    }

    /// Short description handed to external phrase renderers.
    pub fn describe(&self) -> String {
        let traits = [
            ("aggressive", self.aggressiveness),
            ("manipulative", self.manipulation),
            ("loyal", self.loyalty),
            ("paranoid", self.paranoia),
            ("charismatic", self.charisma),
            ("sharp", self.intelligence),
            ("emotional", self.emotionality),
            ("bold", self.risk_tolerance),
        ];
        let strong: Vec<&str> = traits
            .iter()
            .filter(|(_, v)| *v >= 70.0)
            .map(|(name, _)| *name)
            .collect();
        if strong.is_empty() {
            "even-keeled".to_string()
        } else {
            strong.join(", ")
        }
    }
}
