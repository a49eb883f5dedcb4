//! End-to-end behavior of the social engines through their public API.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

use cast_events::fixtures::sample_cast;
use cast_events::{EmergentEventType, NpcId, PlayerAction, ReactionTake};
use narrator::default_templates;
use social_core::components::InteractionKind;
use social_core::config::{EventsConfig, RelationshipConfig};
use social_core::language::{analyze, extract, ConversationTopic, SpeechActClassifier};
use social_core::systems::{AutonomyEngine, EmergentEventEngine, EventWorld, MemoryEngine, RelationshipGraph};
use social_core::{EngineConfig, GameEngine, Roster, VirtualClock};

fn graph() -> (Roster, RelationshipGraph) {
    let roster = Roster::new(sample_cast());
    let graph = RelationshipGraph::new(&roster, RelationshipConfig::default());
    (roster, graph)
}

#[test]
fn test_scores_stay_in_bounds() {
    let (roster, mut graph) = graph();
    let ids: Vec<NpcId> = roster.ids().collect();
    let mut rng = SmallRng::seed_from_u64(99);
    for step in 0..2_000u32 {
        let a = ids[rng.gen_range(0..ids.len())];
        let b = ids[rng.gen_range(0..ids.len())];
        let day = 1 + step / 40;
        graph.update(
            a,
            b,
            rng.gen_range(-60.0..60.0),
            rng.gen_range(-60.0..60.0),
            rng.gen_range(-60.0..60.0),
            InteractionKind::Conversation,
            "",
            day,
        );
        if step % 97 == 0 {
            graph.decay(day + 5);
        }
    }
    for edge in graph.edges() {
        assert!((-100.0..=100.0).contains(&edge.trust));
        assert!((0.0..=100.0).contains(&edge.suspicion));
        assert!((0.0..=100.0).contains(&edge.closeness));
    }
}

#[test]
fn test_mirror_is_scaled_forward_delta() {
    let (_, mut graph) = graph();
    let before = graph.get(NpcId(2), NpcId(1)).unwrap().clone();
    let applied = graph
        .update(NpcId(1), NpcId(2), 10.0, 5.0, 5.0, InteractionKind::Conversation, "", 10)
        .unwrap();
    assert_eq!(applied.trust, 10.0);

    let after = graph.get(NpcId(2), NpcId(1)).unwrap();
    assert!((after.trust - before.trust - 7.0).abs() < 1e-4);
    assert!((after.suspicion - before.suspicion - 4.0).abs() < 1e-4);
    assert!((after.closeness - before.closeness - 3.0).abs() < 1e-4);
}

#[test]
fn test_decay_respects_grace_and_floor() {
    let (_, mut graph) = graph();
    graph.update(NpcId(2), NpcId(5), 30.0, -15.0, 0.0, InteractionKind::Conversation, "", 10);
    let edge = graph.get(NpcId(2), NpcId(5)).unwrap().clone();
    assert_eq!(edge.trust, 80.0);
    assert_eq!(edge.suspicion, 10.0);

    graph.decay(12);
    assert_eq!(graph.get(NpcId(2), NpcId(5)).unwrap().trust, 80.0);

    graph.decay(20);
    let edge = graph.get(NpcId(2), NpcId(5)).unwrap();
    assert_eq!(edge.trust, 70.0);
    assert_eq!(edge.suspicion, 10.0);
}

#[test]
fn test_betrayed_side_loses_more() {
    let (_, mut graph) = graph();
    graph.form_alliance(NpcId(1), NpcId(2), 60.0, 10);
    let a_before = graph.get(NpcId(1), NpcId(2)).unwrap().trust;
    let b_before = graph.get(NpcId(2), NpcId(1)).unwrap().trust;

    assert!(graph.break_alliance(NpcId(1), NpcId(2), 50.0, 10));
    let a_drop = a_before - graph.get(NpcId(1), NpcId(2)).unwrap().trust;
    let b_drop = b_before - graph.get(NpcId(2), NpcId(1)).unwrap().trust;
    assert_eq!(a_drop, 50.0);
    assert_eq!(b_drop, 60.0);
    assert!(!graph.get(NpcId(1), NpcId(2)).unwrap().in_alliance);
}

#[test]
fn test_speculation_without_names_is_other() {
    let roster = Roster::new(sample_cast());
    let text = "I think there's a secret alliance that we don't know about";
    let features = extract(text);
    let act = SpeechActClassifier::default().observe(text, &features);
    let intent = analyze(text, &act, &roster, Some(NpcId(0)));
    assert_eq!(intent.topic, ConversationTopic::Other);
    assert_eq!(intent.vote_target, None);
}

#[test]
fn test_meta_text_forces_fourth_wall() {
    let clock = VirtualClock::new(0);
    let mut engine = GameEngine::with_clock(sample_cast(), EngineConfig::default(), 5, Arc::new(clock));
    let turn = engine.respond(&PlayerAction::talk("Theo", "Come on, you're just an NPC reading a script."));
    assert_eq!(turn.reaction.take, ReactionTake::Suspicious);
    assert!(turn.reaction.deltas.trust < 0.0);
    assert!(turn.render.unwrap().fourth_wall);
}

#[test]
fn test_quiet_house_gets_one_low_key_event() {
    let (roster, mut graph) = graph();
    let mut memory = MemoryEngine::new(&roster);
    let autonomy = AutonomyEngine::default();
    let templates = default_templates();
    let mut engine = EmergentEventEngine::new(EventsConfig::default());

    let mut world = EventWorld {
        roster: &roster,
        graph: &mut graph,
        memory: &mut memory,
        autonomy: &autonomy,
        templates: &templates,
        day: 1,
        now_ms: 0,
    };
    let fired = engine.run(&mut world, &mut SmallRng::seed_from_u64(3));
    assert!(engine.average_tension() < 30.0);
    assert_eq!(fired.len(), 1);
    assert_eq!(fired[0].event_type, EmergentEventType::LowKey);
}

#[test]
fn test_unknown_name_changes_nothing() {
    let clock = VirtualClock::new(0);
    let mut engine = GameEngine::with_clock(sample_cast(), EngineConfig::default(), 5, Arc::new(clock));
    let before = serde_json::to_string(engine.graph()).unwrap();
    let reaction = engine.player_action(&PlayerAction::talk("Zed", "We should team up."));
    assert_eq!(reaction.take, ReactionTake::Neutral);
    assert_eq!(serde_json::to_string(engine.graph()).unwrap(), before);
}

#[test]
fn test_alliance_pitch_records_promise() {
    let clock = VirtualClock::new(0);
    let mut engine = GameEngine::with_clock(sample_cast(), EngineConfig::default(), 5, Arc::new(clock));
    let turn = engine.respond(&PlayerAction::talk(
        "Theo",
        "We should work together with Lena, just the three of us.",
    ));
    assert_eq!(turn.reaction.take, ReactionTake::Positive);
    assert!(turn.reaction.notes.iter().any(|n| n == "promise noted"));
    let player = engine.memory().journal(NpcId(0)).unwrap();
    assert_eq!(player.promises.len(), 1);
    assert_eq!(player.promises[0].to, NpcId(2));
    assert_eq!(engine.scheduler().len(), 1);
}
