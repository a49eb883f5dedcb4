//! Response strategy selection and synthesis.
//!
//! Pure functions from one NPC's reading of a player message to the reply it
//! gives: strategy, tone, relationship consequences, an optional follow-up and
//! the memory it keeps.

use cast_events::{
    DecisionType, MotiveType, NpcId, PlayerActionKind, ResponseStrategy, ResponseTone,
};

use crate::components::{InteractionKind, MemoryKind, PersonalityProfile, Relationship};
use crate::language::{
    AxisLabel, ConversationIntent, ConversationTopic, EmotionalPosture, PerceivedIntent,
    SpeechAct, SpeechActType,
};

/// Everything strategy selection reads.
pub struct ResponseInputs<'a> {
    pub npc: NpcId,
    pub personality: &'a PersonalityProfile,
    pub act: &'a SpeechAct,
    pub intent: &'a ConversationIntent,
    pub perceived: &'a PerceivedIntent,
    /// How the NPC currently feels about the player
    pub relationship: Option<&'a Relationship>,
    pub action_kind: PlayerActionKind,
}

/// Something the NPC will do later because of this exchange.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FollowUp {
    pub decision: DecisionType,
    pub motive: MotiveType,
    pub delay_ms: u64,
}

/// A synthesized reply before it is applied to the world.
#[derive(Debug, Clone, PartialEq)]
pub struct NpcResponse {
    pub strategy: ResponseStrategy,
    pub tone: ResponseTone,
    pub fourth_wall: bool,
    pub trust: f32,
    pub suspicion: f32,
    pub closeness: f32,
    pub influence: f32,
    pub entertainment: f32,
    pub interaction: InteractionKind,
    pub memory_kind: MemoryKind,
    pub memory_impact: f32,
    pub importance: f32,
    pub follow_up: Option<FollowUp>,
    pub notes: Vec<String>,
}

impl NpcResponse {
    /// Scales positive trust rewards by the anti-exploit dampening factor.
    pub fn dampen(&mut self, factor: f32) {
        if self.trust > 0.0 && factor < 1.0 {
            self.trust *= factor.clamp(0.0, 1.0);
            self.notes.push("reward dampened".to_string());
        }
    }
}

/// Base consequences per strategy: trust, suspicion, closeness, influence, entertainment.
fn base_deltas(strategy: ResponseStrategy) -> (f32, f32, f32, f32, f32) {
    match strategy {
        ResponseStrategy::Defensive => (-5.0, 5.0, -2.0, 0.0, 4.0),
        ResponseStrategy::StrategicAlliance => (8.0, -2.0, 4.0, 5.0, 2.0),
        ResponseStrategy::Hostile => (-10.0, 10.0, -5.0, -2.0, 6.0),
        ResponseStrategy::InformationExtraction => (1.0, 3.0, 0.0, 3.0, 1.0),
        ResponseStrategy::ReciprocalFlirting => (6.0, 0.0, 8.0, 2.0, 6.0),
        ResponseStrategy::Suspicious => (-3.0, 8.0, 0.0, 0.0, 2.0),
        ResponseStrategy::Confrontational => (-12.0, 8.0, -4.0, -3.0, 10.0),
        ResponseStrategy::Neutral => (2.0, 0.0, 1.0, 0.0, 0.0),
    }
}

/// Picks how the NPC answers.
pub fn select_strategy(inputs: &ResponseInputs<'_>) -> ResponseStrategy {
    use SpeechActType as A;

    let p = inputs.personality;
    let act = inputs.act;
    let perceived = inputs.perceived;
    if act.meta_text {
        return ResponseStrategy::Suspicious;
    }

    // The player talks to this NPC, so an aggressive act is aimed at them
    // unless it names someone else.
    let aimed = inputs.intent.vote_target.map_or(true, |t| t == inputs.npc);
    let (trust, suspicion, closeness) = inputs
        .relationship
        .map(|r| (r.trust, r.suspicion, r.closeness))
        .unwrap_or((50.0, 10.0, 20.0));

    if act.primary == A::Threat || act.threat_level >= 50.0 {
        return match (aimed, p.aggressiveness >= 65.0) {
            (true, true) => ResponseStrategy::Confrontational,
            (true, false) => ResponseStrategy::Defensive,
            (false, _) => ResponseStrategy::Suspicious,
        };
    }
    if act.primary == A::Accusation {
        return match (aimed, p.aggressiveness >= 65.0) {
            (true, true) => ResponseStrategy::Confrontational,
            (true, false) => ResponseStrategy::Defensive,
            (false, _) => ResponseStrategy::InformationExtraction,
        };
    }
    if perceived.hostility >= 65.0 {
        return ResponseStrategy::Hostile;
    }
    if (act.primary == A::Manipulation || act.manipulation_level >= 50.0)
        && (p.paranoia >= 60.0 || p.intelligence >= 70.0)
    {
        return ResponseStrategy::Suspicious;
    }

    let alliance_pitch = act.primary == A::AllianceProposal
        || inputs.intent.topic == ConversationTopic::Alliance
        || inputs.action_kind == PlayerActionKind::AlliancePitch;
    if alliance_pitch {
        return if trust >= 20.0 && suspicion < 50.0 && perceived.warmth >= perceived.hostility {
            ResponseStrategy::StrategicAlliance
        } else if p.paranoia >= 70.0 {
            ResponseStrategy::Suspicious
        } else {
            ResponseStrategy::InformationExtraction
        };
    }

    if act.primary == A::Flirtation || inputs.action_kind == PlayerActionKind::Flirt {
        return if p.charisma >= 60.0 || closeness >= 40.0 {
            ResponseStrategy::ReciprocalFlirting
        } else {
            ResponseStrategy::Neutral
        };
    }

    if matches!(act.primary, A::InformationRequest | A::Gossip)
        || inputs.intent.topic == ConversationTopic::Vote
    {
        return if p.paranoia >= 70.0 {
            ResponseStrategy::Suspicious
        } else if p.intelligence >= 60.0 {
            ResponseStrategy::InformationExtraction
        } else {
            ResponseStrategy::Neutral
        };
    }

    match act.primary {
        A::Compliment | A::Reassurance
            if perceived.emotional_posture == EmotionalPosture::Performative && p.paranoia >= 60.0 =>
        {
            ResponseStrategy::Suspicious
        }
        A::Confession if trust >= 50.0 => ResponseStrategy::StrategicAlliance,
        A::Deflection if p.paranoia >= 60.0 => ResponseStrategy::Suspicious,
        _ if perceived.hostility > perceived.warmth + 20.0 => ResponseStrategy::Suspicious,
        _ => ResponseStrategy::Neutral,
    }
}

pub fn select_tone(strategy: ResponseStrategy, p: &PersonalityProfile, warmth: f32) -> ResponseTone {
    match strategy {
        ResponseStrategy::StrategicAlliance if p.paranoia >= 70.0 => ResponseTone::Guarded,
        ResponseStrategy::StrategicAlliance => ResponseTone::Warm,
        ResponseStrategy::ReciprocalFlirting => ResponseTone::Playful,
        ResponseStrategy::Hostile => ResponseTone::Cold,
        ResponseStrategy::Confrontational => ResponseTone::Sharp,
        ResponseStrategy::Defensive if p.aggressiveness >= 60.0 => ResponseTone::Sharp,
        ResponseStrategy::Defensive
        | ResponseStrategy::Suspicious
        | ResponseStrategy::InformationExtraction => ResponseTone::Guarded,
        ResponseStrategy::Neutral if warmth >= 50.0 => ResponseTone::Warm,
        ResponseStrategy::Neutral => ResponseTone::Flat,
    }
}

/// Builds the full reply for a regular (in-fiction) message.
pub fn synthesize(inputs: &ResponseInputs<'_>) -> NpcResponse {
    let strategy = select_strategy(inputs);
    let perceived = inputs.perceived;
    let (trust, suspicion, closeness, influence, entertainment) = base_deltas(strategy);
    let trust = trust + ((perceived.warmth - perceived.hostility) / 20.0).clamp(-5.0, 5.0);

    let (interaction, memory_kind) = match strategy {
        ResponseStrategy::StrategicAlliance => (InteractionKind::AllianceFormed, MemoryKind::Alliance),
        ResponseStrategy::ReciprocalFlirting => (InteractionKind::Flirt, MemoryKind::Romance),
        ResponseStrategy::Hostile | ResponseStrategy::Confrontational | ResponseStrategy::Defensive => {
            (InteractionKind::Conflict, MemoryKind::Conflict)
        }
        _ if inputs.act.primary == SpeechActType::Compliment => {
            (InteractionKind::Compliment, MemoryKind::Conversation)
        }
        _ => (InteractionKind::Conversation, MemoryKind::Conversation),
    };

    let follow_up = match strategy {
        ResponseStrategy::StrategicAlliance => Some(FollowUp {
            decision: DecisionType::SendDm,
            motive: MotiveType::AllianceBuilding,
            delay_ms: 120_000,
        }),
        ResponseStrategy::Confrontational => Some(FollowUp {
            decision: DecisionType::Confront,
            motive: MotiveType::Revenge,
            delay_ms: 60_000,
        }),
        ResponseStrategy::InformationExtraction => Some(FollowUp {
            decision: DecisionType::SendDm,
            motive: MotiveType::InformationGathering,
            delay_ms: 90_000,
        }),
        _ => None,
    };

    let strategic_bonus = if inputs.act.primary.is_strategic() { 2.0 } else { 0.0 };
    let mut notes = vec![format!(
        "read as {} / {}",
        perceived.social_strategy.as_str(),
        perceived.game_motive.as_str()
    )];
    if perceived.divergence > 60.0 {
        notes.push("misread the message".to_string());
    }

    NpcResponse {
        strategy,
        tone: select_tone(strategy, inputs.personality, perceived.warmth),
        fourth_wall: false,
        trust,
        suspicion,
        closeness,
        influence,
        entertainment,
        interaction,
        memory_kind,
        memory_impact: (trust / 2.0).clamp(-10.0, 10.0),
        importance: (3.0 + inputs.act.confidence / 25.0 + strategic_bonus).clamp(0.0, 10.0),
        follow_up,
        notes,
    }
}

/// Reply when the player talks about the game itself.
pub fn fourth_wall_response() -> NpcResponse {
    NpcResponse {
        strategy: ResponseStrategy::Suspicious,
        tone: ResponseTone::Guarded,
        fourth_wall: true,
        trust: -6.0,
        suspicion: 12.0,
        closeness: -2.0,
        influence: -3.0,
        entertainment: 3.0,
        interaction: InteractionKind::Conversation,
        memory_kind: MemoryKind::Conversation,
        memory_impact: -2.0,
        importance: 4.0,
        follow_up: None,
        notes: vec!["broke the fourth wall".to_string()],
    }
}

/// One-line gist of the reply, used by the narrator as a fallback.
pub fn strategy_summary(strategy: ResponseStrategy, npc: &str, player: &str) -> String {
    match strategy {
        ResponseStrategy::Defensive => format!("{npc} pushes back and denies what {player} implied."),
        ResponseStrategy::StrategicAlliance => format!("{npc} agrees to work with {player}, quietly."),
        ResponseStrategy::Hostile => format!("{npc} shuts {player} down coldly."),
        ResponseStrategy::InformationExtraction => {
            format!("{npc} deflects and asks {player} what they know.")
        }
        ResponseStrategy::ReciprocalFlirting => format!("{npc} flirts back with {player}."),
        ResponseStrategy::Suspicious => format!("{npc} doesn't buy what {player} is selling."),
        ResponseStrategy::Confrontational => format!("{npc} squares up to {player}."),
        ResponseStrategy::Neutral => format!("{npc} gives {player} a noncommittal answer."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::{analyze, classify, extract, generate, SocialInterpreter};
    use crate::setup::Roster;
    use cast_events::fixtures::sample_cast;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn respond(npc: u32, text: &str, kind: PlayerActionKind) -> NpcResponse {
        let roster = Roster::new(sample_cast());
        let npc = NpcId(npc);
        let features = extract(text);
        let act = classify(text, &features);
        let intent = analyze(text, &act, &roster, Some(NpcId(0)));
        let hypotheses = generate(&features, &act, &intent);
        let personality = roster.personality(npc);
        let mut interpreter = SocialInterpreter::default();
        let mut rng = SmallRng::seed_from_u64(9);
        let perceived = interpreter.interpret(npc, &personality, &hypotheses, &features, &act, None, &mut rng);
        if act.meta_text {
            return fourth_wall_response();
        }
        synthesize(&ResponseInputs {
            npc,
            personality: &personality,
            act: &act,
            intent: &intent,
            perceived: &perceived,
            relationship: None,
            action_kind: kind,
        })
    }

    #[test]
    fn test_threat_against_aggressive_npc_is_confrontational() {
        let r = respond(4, "If you come after me I will make sure you go home next.", PlayerActionKind::Talk);
        assert_eq!(r.strategy, ResponseStrategy::Confrontational);
        assert_eq!(r.tone, ResponseTone::Sharp);
        assert!(r.trust < 0.0);
        assert_eq!(r.follow_up.map(|f| f.decision), Some(DecisionType::Confront));
    }

    #[test]
    fn test_threat_against_calm_npc_is_defensive() {
        let r = respond(2, "If you come after me I will make sure you go home next.", PlayerActionKind::Talk);
        assert_eq!(r.strategy, ResponseStrategy::Defensive);
        assert_eq!(r.memory_kind, MemoryKind::Conflict);
    }

    #[test]
    fn test_alliance_pitch_to_trusting_npc() {
        let r = respond(2, "We should work together with Lena, just the three of us.", PlayerActionKind::AlliancePitch);
        assert_eq!(r.strategy, ResponseStrategy::StrategicAlliance);
        assert!(r.trust > 0.0);
        assert_eq!(r.follow_up.map(|f| f.decision), Some(DecisionType::SendDm));
    }

    #[test]
    fn test_meta_text_forces_fourth_wall() {
        let r = respond(3, "You're just an NPC in a game, the AI writes your lines.", PlayerActionKind::Talk);
        assert!(r.fourth_wall);
        assert_eq!(r.strategy, ResponseStrategy::Suspicious);
        assert!(r.suspicion > 0.0);
    }

    #[test]
    fn test_dampening_only_touches_rewards() {
        let mut good = respond(2, "Thank you for having my back yesterday, I really mean it.", PlayerActionKind::Talk);
        let before = good.trust;
        assert!(before > 0.0);
        good.dampen(0.5);
        assert!((good.trust - before * 0.5).abs() < 1e-5);

        let mut bad = fourth_wall_response();
        bad.dampen(0.5);
        assert_eq!(bad.trust, -6.0);
    }

    #[test]
    fn test_summary_names_both_sides() {
        let s = strategy_summary(ResponseStrategy::StrategicAlliance, "Theo", "Jordan");
        assert_eq!(s, "Theo agrees to work with Jordan, quietly.");
    }
}
