//! Intent Hypotheses
//!
//! Four observer-independent probability distributions describing what the
//! speaker likely meant. Each axis starts uniform, receives additive boosts
//! keyed to signals, then normalizes. No randomness, no state.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use super::conversation::{ConversationIntent, ConversationTopic};
use super::speech_act::{SpeechAct, SpeechActType};
use super::surface::SurfaceFeatures;

/// A label set forming one axis.
pub trait AxisLabel: Copy + Eq + Debug + 'static {
    const AXIS: &'static str;
    fn all() -> &'static [Self];
    fn as_str(self) -> &'static str;
}

macro_rules! axis_label {
    ($name:ident, $axis:literal, { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl AxisLabel for $name {
            const AXIS: &'static str = $axis;

            fn all() -> &'static [Self] {
                &[$($name::$variant),+]
            }

            fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $s),+
                }
            }
        }
    };
}

axis_label!(SocialStrategy, "social_strategy", {
    Bonding => "bonding",
    Distancing => "distancing",
    Dominance => "dominance",
    Deflection => "deflection",
});

axis_label!(EmotionalPosture, "emotional_posture", {
    Guarded => "guarded",
    Performative => "performative",
    Sincere => "sincere",
    PassiveAggressive => "passive_aggressive",
});

axis_label!(GameMotive, "game_motive", {
    InformationFishing => "information_fishing",
    AllianceSignaling => "alliance_signaling",
    ReputationManagement => "reputation_management",
    Venting => "venting",
});

axis_label!(RiskStance, "risk_tolerance", {
    Bold => "bold",
    Cautious => "cautious",
    Reckless => "reckless",
    RiskAverse => "risk_averse",
});

/// Weighted labels of one axis. Weights sum to 1 once normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisDistribution<T> {
    pub axis: String,
    pub weights: Vec<(T, f32)>,
    /// 0-1, max weight minus min weight
    pub confidence: f32,
}

impl<T: AxisLabel> AxisDistribution<T> {
    /// Uniform prior: weight 1 per label, not yet normalized.
    pub fn uniform() -> Self {
        Self {
            axis: T::AXIS.to_string(),
            weights: T::all().iter().map(|l| (*l, 1.0)).collect(),
            confidence: 0.0,
        }
    }

    pub fn boost(&mut self, label: T, amount: f32) {
        if let Some((_, w)) = self.weights.iter_mut().find(|(l, _)| *l == label) {
            *w += amount;
        }
    }

    /// Scales one label's weight.
    pub fn scale(&mut self, label: T, factor: f32) {
        if let Some((_, w)) = self.weights.iter_mut().find(|(l, _)| *l == label) {
            *w *= factor;
        }
    }

    /// Normalizes to sum 1 and recomputes confidence.
    pub fn normalize(&mut self) {
        let total: f32 = self.weights.iter().map(|(_, w)| w.max(0.0)).sum();
        if total <= 0.0 {
            let n = self.weights.len().max(1) as f32;
            for (_, w) in self.weights.iter_mut() {
                *w = 1.0 / n;
            }
        } else {
            for (_, w) in self.weights.iter_mut() {
                *w = w.max(0.0) / total;
            }
        }
        let max = self.weights.iter().map(|(_, w)| *w).fold(f32::MIN, f32::max);
        let min = self.weights.iter().map(|(_, w)| *w).fold(f32::MAX, f32::min);
        self.confidence = (max - min).clamp(0.0, 1.0);
    }

    pub fn weight(&self, label: T) -> f32 {
        self.weights
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, w)| *w)
            .unwrap_or(0.0)
    }

    /// Labels by descending weight; equal weights keep label order.
    pub fn ranked(&self) -> Vec<(T, f32)> {
        let mut ranked = self.weights.clone();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked
    }

    pub fn argmax(&self) -> T {
        self.ranked()
            .first()
            .map(|(l, _)| *l)
            .unwrap_or(T::all()[0])
    }
}

/// The four global axes for one utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentHypotheses {
    pub social_strategy: AxisDistribution<SocialStrategy>,
    pub emotional_posture: AxisDistribution<EmotionalPosture>,
    pub game_motive: AxisDistribution<GameMotive>,
    pub risk: AxisDistribution<RiskStance>,
}

/// Builds the four axes. Pure and deterministic.
pub fn generate(
    features: &SurfaceFeatures,
    act: &SpeechAct,
    intent: &ConversationIntent,
) -> IntentHypotheses {
    use SpeechActType as A;

    let primary = act.primary;
    let sub = &act.subtext;

    let mut social = AxisDistribution::<SocialStrategy>::uniform();
    if act.trust_building {
        social.boost(SocialStrategy::Bonding, 2.0);
    }
    if matches!(primary, A::Compliment | A::Reassurance | A::Flirtation) {
        social.boost(SocialStrategy::Bonding, 1.5);
    }
    if !intent.wants_alliance_with.is_empty() {
        social.boost(SocialStrategy::Bonding, 1.0);
    }
    if primary == A::Accusation {
        social.boost(SocialStrategy::Distancing, 1.5);
    }
    if !intent.wants_to_exclude.is_empty() {
        social.boost(SocialStrategy::Distancing, 1.0);
    }
    if sub.fear > 50.0 {
        social.boost(SocialStrategy::Distancing, 1.0);
    }
    if act.threat_level > 40.0 {
        social.boost(SocialStrategy::Dominance, 2.5);
    }
    if features.bluntness > 0 || features.absolutes > 1 {
        social.boost(SocialStrategy::Dominance, 1.5);
    }
    if sub.confidence > 60.0 {
        social.boost(SocialStrategy::Dominance, 1.0);
    }
    if primary == A::Deflection {
        social.boost(SocialStrategy::Deflection, 2.0);
    }
    if features.hedges >= 2 {
        social.boost(SocialStrategy::Deflection, 1.0);
    }
    social.normalize();

    let mut posture = AxisDistribution::<EmotionalPosture>::uniform();
    if features.hedges > 0 {
        posture.boost(EmotionalPosture::Guarded, 1.5);
    }
    if sub.fear > 40.0 {
        posture.boost(EmotionalPosture::Guarded, 1.0);
    }
    if features.word_count < 5 {
        posture.boost(EmotionalPosture::Guarded, 1.0);
    }
    if features.exclamations >= 2 || features.caps_ratio() > 0.3 {
        posture.boost(EmotionalPosture::Performative, 1.5);
    }
    if act.manipulation_level > 30.0 {
        posture.boost(EmotionalPosture::Performative, 1.5);
    }
    if features.politeness >= 2 && features.emotional_intensity < 20.0 {
        posture.boost(EmotionalPosture::Performative, 1.0);
    }
    if primary == A::Confession {
        posture.boost(EmotionalPosture::Sincere, 2.0);
    }
    if sub.sincerity > 50.0 && act.manipulation_level < 30.0 {
        posture.boost(EmotionalPosture::Sincere, 1.5);
    }
    if act.trust_building {
        posture.boost(EmotionalPosture::Sincere, 1.0);
    }
    if features.politeness > 0 && (sub.anger > 30.0 || features.absolutes > 0) {
        posture.boost(EmotionalPosture::PassiveAggressive, 2.0);
    }
    if primary == A::Deflection && features.politeness > 0 {
        posture.boost(EmotionalPosture::PassiveAggressive, 1.0);
    }
    posture.normalize();

    let mut motive = AxisDistribution::<GameMotive>::uniform();
    if act.information_seeking {
        motive.boost(GameMotive::InformationFishing, 2.5);
    }
    if !intent.wants_info_on.is_empty() {
        motive.boost(GameMotive::InformationFishing, 1.0);
    }
    if primary == A::AllianceProposal {
        motive.boost(GameMotive::AllianceSignaling, 2.5);
    }
    if intent.topic == ConversationTopic::Alliance {
        motive.boost(GameMotive::AllianceSignaling, 1.0);
    }
    if act.trust_building {
        motive.boost(GameMotive::AllianceSignaling, 0.5);
    }
    if matches!(primary, A::Confession | A::Reassurance | A::Deflection) {
        motive.boost(GameMotive::ReputationManagement, 2.0);
    }
    if intent.topic == ConversationTopic::Edit {
        motive.boost(GameMotive::ReputationManagement, 1.0);
    }
    if features.politeness > 0 && features.hedges > 0 {
        motive.boost(GameMotive::ReputationManagement, 1.0);
    }
    if sub.anger > 50.0 {
        motive.boost(GameMotive::Venting, 2.0);
    }
    if matches!(primary, A::Accusation | A::Threat) {
        motive.boost(GameMotive::Venting, 1.5);
    }
    if features.exclamations >= 2 {
        motive.boost(GameMotive::Venting, 1.0);
    }
    motive.normalize();

    let mut risk = AxisDistribution::<RiskStance>::uniform();
    if matches!(primary, A::Threat | A::Accusation) {
        risk.boost(RiskStance::Bold, 2.0);
    }
    if features.direct_address >= 2 {
        risk.boost(RiskStance::Bold, 1.0);
    }
    if intent.vote_target.is_some() {
        risk.boost(RiskStance::Bold, 1.0);
    }
    if features.hedges > 0 {
        risk.boost(RiskStance::Cautious, 1.5);
    }
    if features.politeness > 0 {
        risk.boost(RiskStance::Cautious, 1.0);
    }
    if primary == A::InformationRequest {
        risk.boost(RiskStance::Cautious, 1.0);
    }
    if act.threat_level > 60.0 || (features.caps_ratio() > 0.3 && features.exclamations >= 2) {
        risk.boost(RiskStance::Reckless, 2.0);
    }
    if features.absolutes >= 2 {
        risk.boost(RiskStance::Reckless, 1.0);
    }
    if matches!(primary, A::Reassurance | A::Deflection) {
        risk.boost(RiskStance::RiskAverse, 1.5);
    }
    if sub.fear > 50.0 {
        risk.boost(RiskStance::RiskAverse, 1.0);
    }
    if features.word_count < 5 {
        risk.boost(RiskStance::RiskAverse, 0.5);
    }
    risk.normalize();

    IntentHypotheses {
        social_strategy: social,
        emotional_posture: posture,
        game_motive: motive,
        risk,
    }
}
