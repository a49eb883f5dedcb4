//! Social Interpretation
//!
//! Each NPC reads the global hypotheses through its personality and settles on
//! one perceived label per axis. Steady or confident readings take the argmax;
//! volatile readings of ambiguous axes draw from the top three with the injected
//! RNG, which is where misreadings come from.
//!
//! The interpreter also keeps rolling tone profiles and the anti-exploit profile
//! the consequence layer reads to dampen rewards.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use cast_events::NpcId;

use super::hypothesis::{
    AxisDistribution, AxisLabel, EmotionalPosture, GameMotive, IntentHypotheses, RiskStance,
    SocialStrategy,
};
use super::speech_act::SpeechAct;
use super::surface::SurfaceFeatures;
use crate::components::{PersonalityProfile, Relationship};
use crate::config::InterpretationConfig;

/// One NPC's reading of one utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerceivedIntent {
    pub npc: NpcId,
    pub social_strategy: SocialStrategy,
    pub emotional_posture: EmotionalPosture,
    pub game_motive: GameMotive,
    pub risk: RiskStance,
    /// 0-100, how far the reading drifted from the global distribution
    pub divergence: f32,
    /// 0-100
    pub hostility: f32,
    /// 0-100
    pub warmth: f32,
    /// 0-1
    pub certainty: f32,
    /// At least one axis was drawn at random
    pub sampled: bool,
}

/// Rolling profile of how the player comes across overall.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalToneProfile {
    pub baseline_assertiveness: f32,
    pub emotional_volatility: f32,
    pub performative_skew: f32,
    pub conflict_avoidance: f32,
    pub avg_risk_tolerance: f32,
    pub samples: u64,
}

/// Rolling profile of how one NPC perceives the player.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NpcToneProfile {
    pub perceived_assertiveness: f32,
    pub volatility: f32,
    pub fakeness: f32,
    pub consistency: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_strategy: Option<SocialStrategy>,
    pub samples: u64,
}

/// Scores for phrasing that tries to game NPCs. Each 0-100.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AntiExploitProfile {
    pub pr_tone: f32,
    pub meta_gaming: f32,
    pub keyword_spam: f32,
}

impl AntiExploitProfile {
    pub fn max_score(&self) -> f32 {
        self.pr_tone.max(self.meta_gaming).max(self.keyword_spam)
    }

    /// Multiplier for positive trust rewards: `1 - max_score / 200`.
    pub fn dampening(&self) -> f32 {
        1.0 - self.max_score() / 200.0
    }

    /// Decays all scores, then raises the ones this message triggers.
    pub fn observe(&mut self, features: &SurfaceFeatures, act: &SpeechAct, config: &InterpretationConfig) {
        self.pr_tone *= config.exploit_decay;
        self.meta_gaming *= config.exploit_decay;
        self.keyword_spam *= config.exploit_decay;

        if is_pr_tone(features) {
            self.pr_tone = (self.pr_tone + config.pr_tone_rise).min(100.0);
        }
        if features.meta_text {
            self.meta_gaming = (self.meta_gaming + config.meta_gaming_rise).min(100.0);
        }
        if act.strategic_categories() > 2 {
            self.keyword_spam = (self.keyword_spam + config.keyword_spam_rise).min(100.0);
        }
    }
}

fn is_pr_tone(f: &SurfaceFeatures) -> bool {
    f.politeness > 0 && f.hedges > 0 && f.fragment_ratio < 0.2 && f.all_caps_words == 0
}

fn blend(old: f32, new: f32, rate: f32, first: bool) -> f32 {
    if first {
        new
    } else {
        old * (1.0 - rate) + new * rate
    }
}

/// Personality lens and rolling profiles.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SocialInterpreter {
    #[serde(skip)]
    config: InterpretationConfig,
    pub global: GlobalToneProfile,
    pub npc_profiles: BTreeMap<NpcId, NpcToneProfile>,
    pub exploit: AntiExploitProfile,
}

impl SocialInterpreter {
    pub fn new(config: InterpretationConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn set_config(&mut self, config: InterpretationConfig) {
        self.config = config;
    }

    /// Folds one player message into the global tone and anti-exploit profiles.
    pub fn observe_message(
        &mut self,
        features: &SurfaceFeatures,
        act: &SpeechAct,
        hypotheses: &IntentHypotheses,
    ) {
        self.exploit.observe(features, act, &self.config);

        let social = &hypotheses.social_strategy;
        let risk = &hypotheses.risk;
        let assertiveness = (social.weight(SocialStrategy::Dominance) * 100.0
            + features.bluntness as f32 * 10.0)
            .clamp(0.0, 100.0);
        let performative = hypotheses.emotional_posture.weight(EmotionalPosture::Performative) * 100.0;
        let avoidance = (social.weight(SocialStrategy::Deflection)
            + risk.weight(RiskStance::RiskAverse))
            * 50.0;
        let risk_taking = (risk.weight(RiskStance::Bold) + risk.weight(RiskStance::Reckless)) * 100.0;

        let rate = self.config.profile_blend;
        let g = &mut self.global;
        let first = g.samples == 0;
        g.baseline_assertiveness = blend(g.baseline_assertiveness, assertiveness, rate, first);
        g.emotional_volatility = blend(g.emotional_volatility, features.emotional_intensity, rate, first);
        g.performative_skew = blend(g.performative_skew, performative, rate, first);
        g.conflict_avoidance = blend(g.conflict_avoidance, avoidance, rate, first);
        g.avg_risk_tolerance = blend(g.avg_risk_tolerance, risk_taking, rate, first);
        g.samples += 1;
    }

    /// Reads `hypotheses` through `npc`'s personality.
    #[allow(clippy::too_many_arguments)]
    pub fn interpret<R: Rng + ?Sized>(
        &mut self,
        npc: NpcId,
        personality: &PersonalityProfile,
        hypotheses: &IntentHypotheses,
        features: &SurfaceFeatures,
        act: &SpeechAct,
        relationship: Option<&Relationship>,
        rng: &mut R,
    ) -> PerceivedIntent {
        let lens = reweight(hypotheses, personality);
        let steady = personality.emotionality < self.config.steady_emotionality;
        let threshold = self.config.confident_axis;

        let (social, s1) = pick(&lens.social_strategy, steady, threshold, rng);
        let (posture, s2) = pick(&lens.emotional_posture, steady, threshold, rng);
        let (motive, s3) = pick(&lens.game_motive, steady, threshold, rng);
        let (risk, s4) = pick(&lens.risk, steady, threshold, rng);

        let divergence = (4.0
            - hypotheses.social_strategy.weight(social)
            - hypotheses.emotional_posture.weight(posture)
            - hypotheses.game_motive.weight(motive)
            - hypotheses.risk.weight(risk))
            / 4.0
            * 100.0;

        let certainty = (lens.social_strategy.weight(social)
            + lens.emotional_posture.weight(posture)
            + lens.game_motive.weight(motive)
            + lens.risk.weight(risk))
            / 4.0;

        let (mut hostility, mut warmth) = label_scores(social, posture, motive, risk);
        hostility += act.threat_level * 0.3;
        if let Some(rel) = relationship {
            if rel.trust > 65.0 && rel.suspicion < 40.0 {
                warmth += 15.0;
                hostility -= 10.0;
            }
            if rel.suspicion > 60.0 {
                hostility += 15.0;
            }
        }

        self.update_npc_profile(npc, &lens, social, features, act);

        PerceivedIntent {
            npc,
            social_strategy: social,
            emotional_posture: posture,
            game_motive: motive,
            risk,
            divergence: divergence.clamp(0.0, 100.0),
            hostility: hostility.clamp(0.0, 100.0),
            warmth: warmth.clamp(0.0, 100.0),
            certainty: certainty.clamp(0.0, 1.0),
            sampled: s1 || s2 || s3 || s4,
        }
    }

    fn update_npc_profile(
        &mut self,
        npc: NpcId,
        lens: &IntentHypotheses,
        social: SocialStrategy,
        features: &SurfaceFeatures,
        act: &SpeechAct,
    ) {
        let rate = self.config.profile_blend;
        let profile = self.npc_profiles.entry(npc).or_default();
        let first = profile.samples == 0;
        let assertiveness = lens.social_strategy.weight(SocialStrategy::Dominance) * 100.0;
        let fakeness = (lens.emotional_posture.weight(EmotionalPosture::Performative) * 100.0
            + act.manipulation_level * 0.5)
            .clamp(0.0, 100.0);
        let consistency = match profile.last_strategy {
            Some(last) if last == social => 100.0,
            Some(_) => 0.0,
            None => 50.0,
        };
        profile.perceived_assertiveness = blend(profile.perceived_assertiveness, assertiveness, rate, first);
        profile.volatility = blend(profile.volatility, features.emotional_intensity, rate, first);
        profile.fakeness = blend(profile.fakeness, fakeness, rate, first);
        profile.consistency = blend(profile.consistency, consistency, rate, first);
        profile.last_strategy = Some(social);
        profile.samples += 1;
    }
}

fn amp(trait_value: f32) -> f32 {
    1.0 + trait_value / 100.0
}

/// Multiplies global axes by personality factors and renormalizes.
fn reweight(h: &IntentHypotheses, p: &PersonalityProfile) -> IntentHypotheses {
    let mut lens = h.clone();

    lens.social_strategy.scale(SocialStrategy::Distancing, amp(p.paranoia));
    lens.social_strategy.scale(SocialStrategy::Bonding, amp(p.loyalty));
    lens.social_strategy.scale(SocialStrategy::Dominance, amp(p.aggressiveness));

    lens.emotional_posture.scale(EmotionalPosture::Guarded, amp(p.paranoia));
    lens.emotional_posture.scale(EmotionalPosture::Sincere, amp(p.loyalty));
    lens.emotional_posture.scale(EmotionalPosture::Performative, amp(p.manipulation));

    lens.game_motive.scale(GameMotive::InformationFishing, amp(p.paranoia));
    lens.game_motive.scale(GameMotive::ReputationManagement, amp(p.manipulation));

    lens.risk.scale(RiskStance::Bold, amp(p.aggressiveness) * amp(p.risk_tolerance / 2.0));
    lens.risk.scale(RiskStance::Reckless, amp(p.risk_tolerance / 2.0));

    lens.social_strategy.normalize();
    lens.emotional_posture.normalize();
    lens.game_motive.normalize();
    lens.risk.normalize();
    lens
}

/// Picks a label; returns whether it was drawn at random.
fn pick<T: AxisLabel, R: Rng + ?Sized>(
    axis: &AxisDistribution<T>,
    steady: bool,
    confident_threshold: f32,
    rng: &mut R,
) -> (T, bool) {
    if steady || axis.confidence > confident_threshold {
        return (axis.argmax(), false);
    }
    let top: Vec<(T, f32)> = axis.ranked().into_iter().take(3).collect();
    let total: f32 = top.iter().map(|(_, w)| *w).sum();
    if total <= 0.0 {
        return (axis.argmax(), false);
    }
    let roll = rng.gen::<f32>() * total;
    let mut cumulative = 0.0;
    for (label, weight) in &top {
        cumulative += weight;
        if roll < cumulative {
            return (*label, true);
        }
    }
    (top[top.len() - 1].0, true)
}

/// Fixed (hostility, warmth) contributions of the four labels, on a 10/20 base.
fn label_scores(
    social: SocialStrategy,
    posture: EmotionalPosture,
    motive: GameMotive,
    risk: RiskStance,
) -> (f32, f32) {
    let mut hostility = 10.0;
    let mut warmth = 20.0;

    let (h, w) = match social {
        SocialStrategy::Bonding => (0.0, 25.0),
        SocialStrategy::Distancing => (10.0, -5.0),
        SocialStrategy::Dominance => (25.0, -10.0),
        SocialStrategy::Deflection => (5.0, -5.0),
    };
    hostility += h;
    warmth += w;

    let (h, w) = match posture {
        EmotionalPosture::Guarded => (5.0, -5.0),
        EmotionalPosture::Performative => (10.0, -5.0),
        EmotionalPosture::Sincere => (-5.0, 20.0),
        EmotionalPosture::PassiveAggressive => (20.0, -10.0),
    };
    hostility += h;
    warmth += w;

    let (h, w) = match motive {
        GameMotive::InformationFishing => (5.0, 0.0),
        GameMotive::AllianceSignaling => (0.0, 20.0),
        GameMotive::ReputationManagement => (5.0, 0.0),
        GameMotive::Venting => (15.0, -5.0),
    };
    hostility += h;
    warmth += w;

    let (h, w) = match risk {
        RiskStance::Bold => (5.0, 0.0),
        RiskStance::Cautious => (0.0, 5.0),
        RiskStance::Reckless => (10.0, -5.0),
        RiskStance::RiskAverse => (0.0, 5.0),
    };
    (hostility + h, warmth + w)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::conversation::analyze;
    use crate::language::hypothesis::generate;
    use crate::language::speech_act::classify;
    use crate::language::surface::extract;
    use crate::setup::Roster;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    struct Parsed {
        features: SurfaceFeatures,
        act: SpeechAct,
        hypotheses: IntentHypotheses,
    }

    fn parse(text: &str) -> Parsed {
        let roster = Roster::new(vec![]);
        let features = extract(text);
        let act = classify(text, &features);
        let intent = analyze(text, &act, &roster, None);
        let hypotheses = generate(&features, &act, &intent);
        Parsed {
            features,
            act,
            hypotheses,
        }
    }

    #[test]
    fn test_calm_npc_reading_is_deterministic() {
        let p = parse("Maybe we could talk later? I don't know.");
        let calm = PersonalityProfile::from_dispositions(&["calm"]);
        let mut interpreter = SocialInterpreter::new(InterpretationConfig::default());
        let readings: Vec<PerceivedIntent> = (0..10)
            .map(|seed| {
                let mut rng = SmallRng::seed_from_u64(seed);
                interpreter.interpret(NpcId(1), &calm, &p.hypotheses, &p.features, &p.act, None, &mut rng)
            })
            .collect();
        assert!(readings.iter().all(|r| !r.sampled));
        assert!(readings.windows(2).all(|w| w[0].social_strategy == w[1].social_strategy
            && w[0].emotional_posture == w[1].emotional_posture
            && w[0].divergence == w[1].divergence));
    }

    #[test]
    fn test_volatile_npc_reproducible_under_seed() {
        let p = parse("Maybe we could talk later? I don't know.");
        let volatile = PersonalityProfile::from_dispositions(&["emotional", "volatile"]);
        let run = |seed: u64| {
            let mut interpreter = SocialInterpreter::new(InterpretationConfig::default());
            let mut rng = SmallRng::seed_from_u64(seed);
            (0..20)
                .map(|_| {
                    interpreter.interpret(NpcId(3), &volatile, &p.hypotheses, &p.features, &p.act, None, &mut rng)
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(run(7), run(7));
        assert!(run(7).iter().any(|r| r.sampled));
    }

    #[test]
    fn test_divergence_from_global_weights() {
        let p = parse("");
        let calm = PersonalityProfile::from_dispositions(&["calm"]);
        let mut interpreter = SocialInterpreter::default();
        let mut rng = SmallRng::seed_from_u64(1);
        let reading = interpreter.interpret(NpcId(1), &calm, &p.hypotheses, &p.features, &p.act, None, &mut rng);
        // Uniform game motive axis: the chosen label has weight 0.25 globally.
        assert!(reading.divergence > 0.0 && reading.divergence < 100.0);
    }

    #[test]
    fn test_trusted_relationship_warms_reading() {
        let p = parse("Thank you for having my back yesterday, I really mean it.");
        let calm = PersonalityProfile::from_dispositions(&["calm"]);
        let mut interpreter = SocialInterpreter::default();
        let mut rng = SmallRng::seed_from_u64(1);
        let cold = interpreter.interpret(NpcId(2), &calm, &p.hypotheses, &p.features, &p.act, None, &mut rng);
        let friend = Relationship::new(NpcId(2), NpcId(0), 80.0, 10.0, 50.0);
        let warm = interpreter.interpret(NpcId(2), &calm, &p.hypotheses, &p.features, &p.act, Some(&friend), &mut rng);
        assert!(warm.warmth > cold.warmth);
        assert!(warm.hostility <= cold.hostility);
    }

    #[test]
    fn test_anti_exploit_meta_rise_and_decay() {
        let config = InterpretationConfig::default();
        let meta = parse("You're just an NPC reading a script.");
        let plain = parse("See you at dinner.");
        let mut profile = AntiExploitProfile::default();
        profile.observe(&meta.features, &meta.act, &config);
        assert_eq!(profile.meta_gaming, 40.0);
        assert!((profile.dampening() - 0.8).abs() < 1e-6);
        profile.observe(&plain.features, &plain.act, &config);
        assert!((profile.meta_gaming - 36.0).abs() < 1e-4);
    }

    #[test]
    fn test_pr_tone_detection() {
        let config = InterpretationConfig::default();
        let pr = parse("I think, with all due respect, we should probably consider working with everyone here.");
        let mut profile = AntiExploitProfile::default();
        profile.observe(&pr.features, &pr.act, &config);
        assert_eq!(profile.pr_tone, 15.0);
    }

    #[test]
    fn test_global_profile_blends() {
        let p = parse("I HATE THIS!!");
        let q = parse("ok");
        let mut interpreter = SocialInterpreter::default();
        interpreter.observe_message(&p.features, &p.act, &p.hypotheses);
        let first = interpreter.global.emotional_volatility;
        interpreter.observe_message(&q.features, &q.act, &q.hypotheses);
        let expected = first * 0.9 + q.features.emotional_intensity * 0.1;
        assert!((interpreter.global.emotional_volatility - expected).abs() < 1e-4);
        assert_eq!(interpreter.global.samples, 2);
    }
}
