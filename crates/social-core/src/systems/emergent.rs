//! Emergent Event Engine
//!
//! Tracks per-NPC tension and seeds dramatic events from relationship state,
//! remembered betrayals and ongoing events. Every fired event applies its
//! consequences to the graph and the journals before the tick returns.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use rand::Rng;

use cast_events::{
    drama_tags, generate_event_id, Consequence, EmergentEvent, EmergentEventType, EventOutcome,
    NpcId,
};
use narrator::{NarrationTemplates, Slot, SlotValues};
use tracing::{debug, info};

use crate::components::{InteractionKind, MemoryKind};
use crate::config::EventsConfig;
use crate::setup::Roster;
use crate::systems::autonomy::motives::by_trust;
use crate::systems::autonomy::AutonomyEngine;
use crate::systems::memory::{MemoryDraft, MemoryEngine};
use crate::systems::relationships::RelationshipGraph;

/// Tension from relationship scores alone is weighted by this before memories
/// and motives are added.
const SCORE_WEIGHT: f32 = 0.5;
const NEGATIVE_MEMORY_TENSION: f32 = 10.0;
const HOT_MOTIVE_TENSION: f32 = 15.0;
const HOT_MOTIVE_INTENSITY: f32 = 70.0;

/// Mutable world the event pass reads and writes.
pub struct EventWorld<'a> {
    pub roster: &'a Roster,
    pub graph: &'a mut RelationshipGraph,
    pub memory: &'a mut MemoryEngine,
    pub autonomy: &'a AutonomyEngine,
    pub templates: &'a NarrationTemplates,
    pub day: u32,
    pub now_ms: u64,
}

/// Tension tracker and event log.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmergentEventEngine {
    #[serde(skip)]
    config: EventsConfig,
    events: Vec<EmergentEvent>,
    tension: BTreeMap<NpcId, f32>,
    sequence: u64,
    #[serde(default)]
    last_event_ms: Option<u64>,
    /// Memories and secrets that already had their chance to spawn an event
    #[serde(default)]
    considered: BTreeSet<u64>,
}

impl EmergentEventEngine {
    pub fn new(config: EventsConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn set_config(&mut self, config: EventsConfig) {
        self.config = config;
    }

    /// Events still inside the retention window.
    pub fn events(&self) -> &[EmergentEvent] {
        &self.events
    }

    pub fn tension(&self, npc: NpcId) -> f32 {
        self.tension.get(&npc).copied().unwrap_or(0.0)
    }

    pub fn average_tension(&self) -> f32 {
        if self.tension.is_empty() {
            return 0.0;
        }
        self.tension.values().sum::<f32>() / self.tension.len() as f32
    }

    /// Drops events older than the retention window.
    pub fn purge(&mut self, day: u32) -> usize {
        let before = self.events.len();
        let retention = self.config.retention_days;
        self.events.retain(|e| !e.is_expired(day, retention));
        before - self.events.len()
    }

    /// Runs one event pass and returns the events it fired.
    pub fn run<R: Rng + ?Sized>(&mut self, world: &mut EventWorld<'_>, rng: &mut R) -> Vec<EmergentEvent> {
        let cfg = self.config.clone();
        let purged = self.purge(world.day);

        let eligible: Vec<NpcId> = world
            .roster
            .autonomous_ids()
            .filter(|id| !world.graph.is_eliminated(*id))
            .collect();
        self.tension = eligible
            .iter()
            .map(|id| (*id, compute_tension(*id, world, &cfg)))
            .collect();

        let existing = self.events.len();
        let mut fired = Vec::new();

        let seeds = [
            (EmergentEventType::Conflict, cfg.seeds.conflict),
            (EmergentEventType::Alliance, cfg.seeds.alliance),
            (EmergentEventType::Betrayal, cfg.seeds.betrayal),
            (EmergentEventType::Romance, cfg.seeds.romance),
            (EmergentEventType::Rumor, cfg.seeds.rumor),
            (EmergentEventType::ConfessionLeak, cfg.seeds.confession_leak),
        ];
        for (event_type, chance) in seeds {
            let Some((participants, origin)) = self.seed_participants(event_type, world, &eligible) else {
                continue;
            };
            if let Some(id) = origin {
                self.considered.insert(id);
            }
            if rng.gen_bool(chance.clamp(0.0, 1.0)) {
                let tension = self.pair_tension(&participants);
                fired.push(self.fire(world, event_type, participants, tension, &[], None, rng));
            }
        }

        if let Some(participants) = self.revenge_participants(world, &cfg) {
            if rng.gen_bool(cfg.revenge_chance.clamp(0.0, 1.0)) {
                let tension = self.pair_tension(&participants) + 20.0;
                fired.push(self.fire(
                    world,
                    EmergentEventType::Revenge,
                    participants,
                    tension,
                    &[drama_tags::REVENGE],
                    None,
                    rng,
                ));
            }
        }

        if let Some(participants) = memory_alliance_participants(world, &eligible, &cfg) {
            if rng.gen_bool(cfg.memory_alliance_chance.clamp(0.0, 1.0)) {
                let tension = self.pair_tension(&participants);
                fired.push(self.fire(
                    world,
                    EmergentEventType::Alliance,
                    participants,
                    tension,
                    &[drama_tags::MEMORY_GROUNDED],
                    None,
                    rng,
                ));
            }
        }

        for index in 0..existing {
            let source = &self.events[index];
            if source.outcome != EventOutcome::Ongoing || source.drama_tension <= cfg.escalation_threshold {
                continue;
            }
            if !rng.gen_bool(cfg.escalation_chance.clamp(0.0, 1.0)) {
                continue;
            }
            let (event_type, participants, source_id) =
                (source.event_type, source.participants.clone(), source.event_id.clone());
            let tension = (source.drama_tension + cfg.escalation_boost).min(100.0);
            self.events[index].outcome = EventOutcome::Escalated;
            fired.push(self.fire(
                world,
                event_type,
                participants,
                tension,
                &[drama_tags::ESCALATION],
                Some(source_id),
                rng,
            ));
        }

        let idle = self
            .last_event_ms
            .map(|last| world.now_ms.saturating_sub(last) > cfg.drama_floor_idle_ms)
            .unwrap_or(true);
        if fired.is_empty()
            && eligible.len() >= 2
            && (self.average_tension() < cfg.drama_floor_tension || idle)
        {
            let n = eligible.len();
            let i = rng.gen_range(0..n);
            let mut j = rng.gen_range(0..n - 1);
            if j >= i {
                j += 1;
            }
            let participants = vec![eligible[i], eligible[j]];
            let tension = self.pair_tension(&participants);
            fired.push(self.fire(
                world,
                EmergentEventType::LowKey,
                participants,
                tension,
                &[drama_tags::DRAMA_FLOOR],
                None,
                rng,
            ));
        }

        debug!(
            day = world.day,
            fired = fired.len(),
            purged,
            avg_tension = self.average_tension(),
            "event pass"
        );
        fired
    }

    fn pair_tension(&self, participants: &[NpcId]) -> f32 {
        if participants.is_empty() {
            return 0.0;
        }
        let sum: f32 = participants.iter().map(|id| self.tension(*id)).sum();
        sum / participants.len() as f32
    }

    /// Participants for a seed whose conditions hold, plus the memory or
    /// secret id it consumes, if any.
    fn seed_participants(
        &self,
        event_type: EmergentEventType,
        world: &EventWorld<'_>,
        eligible: &[NpcId],
    ) -> Option<(Vec<NpcId>, Option<u64>)> {
        let graph = &*world.graph;
        let roster = world.roster;
        let ordered = || {
            eligible
                .iter()
                .flat_map(move |a| eligible.iter().map(move |b| (*a, *b)))
                .filter(|(a, b)| a != b)
        };
        let unordered = || ordered().filter(|(a, b)| a < b);

        let pair = match event_type {
            EmergentEventType::Conflict => best(ordered().filter_map(|(a, b)| {
                let e = graph.get(a, b)?;
                ((e.suspicion > 50.0 || e.trust < 0.0) && self.tension(a) > 40.0)
                    .then_some(((a, b), e.suspicion - e.trust))
            })),
            EmergentEventType::Alliance => best(unordered().filter_map(|(a, b)| {
                let (ab, ba) = (graph.get(a, b)?, graph.get(b, a)?);
                (ab.trust > 60.0 && ba.trust > 60.0 && !ab.in_alliance)
                    .then_some(((a, b), ab.trust + ba.trust))
            })),
            EmergentEventType::Betrayal => best(ordered().filter_map(|(a, b)| {
                let e = graph.get(a, b)?;
                let manipulative = roster.personality(a).manipulation > 60.0;
                (e.in_alliance && manipulative && (e.trust < 40.0 || e.suspicion > 50.0))
                    .then_some(((a, b), roster.personality(a).manipulation - e.trust))
            })),
            EmergentEventType::Romance => best(unordered().filter_map(|(a, b)| {
                let (ab, ba) = (graph.get(a, b)?, graph.get(b, a)?);
                let charm = roster.personality(a).charisma.max(roster.personality(b).charisma);
                (ab.closeness > 60.0 && ba.closeness > 60.0 && ab.trust > 50.0 && ba.trust > 50.0 && charm > 65.0)
                    .then_some(((a, b), ab.closeness + ba.closeness))
            })),
            EmergentEventType::Rumor => best(ordered().filter_map(|(a, b)| {
                let e = graph.get(a, b)?;
                (roster.personality(a).manipulation > 60.0 && e.trust < 20.0).then_some(((a, b), -e.trust))
            })),
            EmergentEventType::ConfessionLeak => {
                let secret = world.memory.secrets().find(|s| {
                    !self.considered.contains(&s.id)
                        && eligible.contains(&s.owner)
                        && s.known_by.iter().any(|k| *k != s.owner && eligible.contains(k))
                })?;
                let leaker = secret
                    .known_by
                    .iter()
                    .copied()
                    .find(|k| *k != secret.owner && eligible.contains(k))?;
                return Some((vec![secret.owner, leaker], Some(secret.id)));
            }
            EmergentEventType::Revenge | EmergentEventType::LowKey => None,
        };
        pair.map(|(a, b)| (vec![a, b], None))
    }

    /// Newest unconsidered betrayal in the shared log within the memory window.
    fn revenge_participants(&mut self, world: &EventWorld<'_>, cfg: &EventsConfig) -> Option<Vec<NpcId>> {
        let start = world.day.saturating_sub(cfg.recent_memory_days);
        let betrayal = world
            .memory
            .events_between(start, world.day)
            .into_iter()
            .filter(|m| m.kind == MemoryKind::Betrayal && !self.considered.contains(&m.id))
            .max_by_key(|m| (m.day, m.id))?;
        self.considered.insert(betrayal.id);

        let participants: Vec<NpcId> = betrayal
            .participants
            .iter()
            .copied()
            .filter(|id| world.roster.is_active(*id) && !world.graph.is_eliminated(*id))
            .take(2)
            .collect();
        (participants.len() == 2).then_some(participants)
    }

    #[allow(clippy::too_many_arguments)]
    fn fire<R: Rng + ?Sized>(
        &mut self,
        world: &mut EventWorld<'_>,
        event_type: EmergentEventType,
        participants: Vec<NpcId>,
        tension: f32,
        tags: &[&str],
        escalated_from: Option<String>,
        rng: &mut R,
    ) -> EmergentEvent {
        self.sequence += 1;
        let speaker = participants.first().copied().unwrap_or(NpcId(0));
        let target = participants.get(1).copied().unwrap_or(speaker);
        let values = SlotValues::new()
            .with(Slot::Speaker, world.roster.first_name(speaker))
            .with(Slot::Target, world.roster.first_name(target));
        let description = world
            .templates
            .event_caption(event_type, &values, rng.gen())
            .unwrap_or_else(|_| {
                format!(
                    "{} between {} and {}",
                    event_type.as_str(),
                    world.roster.first_name(speaker),
                    world.roster.first_name(target)
                )
            });

        let player = world.roster.player();
        let mut event = EmergentEvent::new(
            generate_event_id(self.sequence),
            event_type,
            participants,
            world.day,
        )
        .with_tension(tension)
        .with_outcome(initial_outcome(event_type));
        event.player_involvement = player.is_some_and(|p| event.involves(p));
        event.escalated_from = escalated_from;
        for tag in tags {
            event = event.with_tag(tag);
        }
        if let Some(tag) = type_tag(event_type) {
            event = event.with_tag(tag);
        }
        event.consequences = apply_consequences(event_type, &event.participants, &description, world);
        event.description = description;

        info!(
            event_id = %event.event_id,
            event_type = event_type.as_str(),
            tension = event.drama_tension,
            "emergent event"
        );
        self.last_event_ms = Some(world.now_ms);
        self.events.push(event.clone());
        event
    }
}

/// Tension of one member: relationship strain plus recent hurt and hot motives.
fn compute_tension(npc: NpcId, world: &EventWorld<'_>, cfg: &EventsConfig) -> f32 {
    let suspicion = world.graph.outgoing_avg_suspicion(npc);
    let trust = world.graph.outgoing_avg_trust(npc);
    let negative = world
        .memory
        .recent_memories(npc, world.day, cfg.recent_memory_days)
        .into_iter()
        .filter(|m| m.is_negative())
        .count();
    let hot = world
        .autonomy
        .motives(npc)
        .iter()
        .filter(|m| m.intensity > HOT_MOTIVE_INTENSITY)
        .count();
    (suspicion * SCORE_WEIGHT
        + (50.0 - trust).max(0.0) * SCORE_WEIGHT
        + NEGATIVE_MEMORY_TENSION * negative as f32
        + HOT_MOTIVE_TENSION * hot as f32)
        .clamp(0.0, 100.0)
}

/// A member with at least two recent positive memories shared with the same
/// unallied partner.
fn memory_alliance_participants(
    world: &EventWorld<'_>,
    eligible: &[NpcId],
    cfg: &EventsConfig,
) -> Option<Vec<NpcId>> {
    for npc in eligible {
        let mut shared: BTreeMap<NpcId, usize> = BTreeMap::new();
        for memory in world.memory.recent_memories(*npc, world.day, cfg.recent_memory_days) {
            if !memory.is_positive() {
                continue;
            }
            for other in memory.participants.iter().filter(|o| *o != npc && eligible.contains(*o)) {
                *shared.entry(*other).or_default() += 1;
            }
        }
        let allies = world.graph.allies(*npc);
        if let Some((other, _)) = shared
            .into_iter()
            .find(|(other, count)| *count >= 2 && !allies.contains(other))
        {
            return Some(vec![*npc, other]);
        }
    }
    None
}

fn best<I>(candidates: I) -> Option<(NpcId, NpcId)>
where
    I: Iterator<Item = ((NpcId, NpcId), f32)>,
{
    let mut top: Option<((NpcId, NpcId), f32)> = None;
    for (pair, score) in candidates {
        if top.map_or(true, |(_, s)| score > s) {
            top = Some((pair, score));
        }
    }
    top.map(|(pair, _)| pair)
}

fn initial_outcome(event_type: EmergentEventType) -> EventOutcome {
    match event_type {
        EmergentEventType::Alliance | EmergentEventType::Romance | EmergentEventType::LowKey => {
            EventOutcome::Resolved
        }
        _ => EventOutcome::Ongoing,
    }
}

fn type_tag(event_type: EmergentEventType) -> Option<&'static str> {
    match event_type {
        EmergentEventType::Betrayal => Some(drama_tags::BETRAYAL),
        EmergentEventType::Romance => Some(drama_tags::SHOWMANCE),
        EmergentEventType::Rumor => Some(drama_tags::RUMOR_SPREADING),
        EmergentEventType::ConfessionLeak => Some(drama_tags::SECRET_REVEALED),
        _ => None,
    }
}

#[allow(clippy::too_many_arguments)]
fn relate(
    world: &mut EventWorld<'_>,
    out: &mut Vec<Consequence>,
    from: NpcId,
    to: NpcId,
    deltas: (f32, f32, f32),
    kind: InteractionKind,
    description: &str,
) {
    let (trust, suspicion, closeness) = deltas;
    if let Some(applied) = world
        .graph
        .update(from, to, trust, suspicion, closeness, kind, description, world.day)
    {
        out.push(Consequence::RelationshipDelta {
            from,
            to,
            trust: applied.trust,
            suspicion: applied.suspicion,
            closeness: applied.closeness,
        });
    }
}

fn remember(
    world: &mut EventWorld<'_>,
    out: &mut Vec<Consequence>,
    kind: MemoryKind,
    participants: Vec<NpcId>,
    content: &str,
    impact: f32,
    importance: f32,
) {
    let draft = MemoryDraft::new(world.day, kind, participants.clone(), content)
        .impact(impact)
        .importance(importance);
    let memory_id = world.memory.record_event(draft);
    out.push(Consequence::MemoryRecorded {
        memory_id,
        participants,
    });
}

/// Applies an event's effects right away and reports what changed.
fn apply_consequences(
    event_type: EmergentEventType,
    participants: &[NpcId],
    description: &str,
    world: &mut EventWorld<'_>,
) -> Vec<Consequence> {
    let mut out = Vec::new();
    let (a, b) = match participants {
        [a, b, ..] => (*a, *b),
        _ => return out,
    };
    let day = world.day;

    match event_type {
        EmergentEventType::Conflict => {
            relate(world, &mut out, a, b, (-8.0, 6.0, -3.0), InteractionKind::Conflict, description);
            remember(world, &mut out, MemoryKind::Conflict, vec![a, b], description, -5.0, 6.0);
        }
        EmergentEventType::Alliance => {
            if world.graph.form_alliance(a, b, 50.0, day) {
                out.push(Consequence::AllianceFormed { a, b });
            }
            relate(world, &mut out, a, b, (6.0, -3.0, 4.0), InteractionKind::AllianceFormed, description);
            remember(world, &mut out, MemoryKind::Alliance, vec![a, b], description, 5.0, 7.0);
        }
        EmergentEventType::Betrayal => {
            let level = 40.0;
            if world.graph.break_alliance(a, b, level, day) {
                out.push(Consequence::AllianceBroken {
                    betrayer: a,
                    betrayed: b,
                    level,
                });
            }
            remember(world, &mut out, MemoryKind::Betrayal, vec![b, a], description, -7.0, 9.0);
        }
        EmergentEventType::Romance => {
            relate(world, &mut out, a, b, (5.0, 0.0, 8.0), InteractionKind::Flirt, description);
            remember(world, &mut out, MemoryKind::Romance, vec![a, b], description, 6.0, 6.0);
        }
        EmergentEventType::Rumor => {
            let audience = by_trust(a, world.roster, world.graph)
                .into_iter()
                .map(|(id, _)| id)
                .find(|id| *id != b);
            let mut involved = vec![a, b];
            if let Some(c) = audience {
                relate(world, &mut out, c, b, (-6.0, 8.0, 0.0), InteractionKind::Rumor, description);
                out.push(Consequence::GossipSpread {
                    from: a,
                    to: c,
                    about: b,
                });
                involved.push(c);
            }
            remember(world, &mut out, MemoryKind::Rumor, involved, description, -3.0, 5.0);
        }
        EmergentEventType::ConfessionLeak => {
            relate(world, &mut out, a, b, (-12.0, 10.0, -5.0), InteractionKind::Rumor, description);
            remember(world, &mut out, MemoryKind::Secret, vec![a, b], description, -6.0, 8.0);
        }
        EmergentEventType::Revenge => {
            relate(world, &mut out, a, b, (-10.0, 8.0, -4.0), InteractionKind::Conflict, description);
            remember(world, &mut out, MemoryKind::Conflict, vec![a, b], description, -6.0, 7.0);
        }
        EmergentEventType::LowKey => {
            relate(world, &mut out, a, b, (2.0, 0.0, 2.0), InteractionKind::Conversation, description);
            remember(world, &mut out, MemoryKind::Conversation, vec![a, b], description, 1.0, 2.0);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RelationshipConfig;
    use cast_events::fixtures::sample_cast;
    use narrator::default_templates;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    struct Fixture {
        roster: Roster,
        graph: RelationshipGraph,
        memory: MemoryEngine,
        autonomy: AutonomyEngine,
        templates: NarrationTemplates,
    }

    impl Fixture {
        fn new() -> Self {
            let roster = Roster::new(sample_cast());
            Self {
                graph: RelationshipGraph::new(&roster, RelationshipConfig::default()),
                memory: MemoryEngine::new(&roster),
                autonomy: AutonomyEngine::default(),
                templates: default_templates(),
                roster,
            }
        }

        fn run(&mut self, engine: &mut EmergentEventEngine, day: u32, now_ms: u64, seed: u64) -> Vec<EmergentEvent> {
            let mut world = EventWorld {
                roster: &self.roster,
                graph: &mut self.graph,
                memory: &mut self.memory,
                autonomy: &self.autonomy,
                templates: &self.templates,
                day,
                now_ms,
            };
            let mut rng = SmallRng::seed_from_u64(seed);
            engine.run(&mut world, &mut rng)
        }
    }

    #[test]
    fn test_quiet_house_forces_one_low_key_event() {
        let mut fx = Fixture::new();
        let mut engine = EmergentEventEngine::new(EventsConfig::default());
        let fired = fx.run(&mut engine, 1, 0, 7);

        assert!(engine.average_tension() < 30.0);
        assert_eq!(fired.len(), 1);
        let event = &fired[0];
        assert_eq!(event.event_type, EmergentEventType::LowKey);
        assert_eq!(event.participants.len(), 2);
        assert_ne!(event.participants[0], event.participants[1]);
        assert!(!event.player_involvement);
        assert!(event.drama_tags.contains(&drama_tags::DRAMA_FLOOR.to_string()));
        assert!(event
            .consequences
            .iter()
            .any(|c| matches!(c, Consequence::MemoryRecorded { .. })));
        assert!(!event.description.is_empty());
    }

    #[test]
    fn test_events_purged_after_retention() {
        let mut fx = Fixture::new();
        let mut engine = EmergentEventEngine::new(EventsConfig::default());
        fx.run(&mut engine, 1, 0, 1);
        assert_eq!(engine.events().len(), 1);
        assert_eq!(engine.purge(8), 0);
        assert_eq!(engine.purge(9), 1);
        assert!(engine.events().is_empty());
    }

    #[test]
    fn test_trusting_pair_eventually_allies() {
        let mut fx = Fixture::new();
        for day in 1..6 {
            fx.graph.update(NpcId(2), NpcId(5), 10.0, 0.0, 5.0, InteractionKind::Compliment, "", day);
            fx.graph.update(NpcId(5), NpcId(2), 10.0, 0.0, 5.0, InteractionKind::Compliment, "", day);
        }
        assert!(fx.graph.get(NpcId(2), NpcId(5)).unwrap().trust > 60.0);

        let mut engine = EmergentEventEngine::new(EventsConfig::default());
        let mut allied = None;
        for tick in 0..30u64 {
            let fired = fx.run(&mut engine, 6, tick * 30_000, tick);
            if let Some(event) = fired.iter().find(|e| {
                e.event_type == EmergentEventType::Alliance && e.participants == vec![NpcId(2), NpcId(5)]
            }) {
                allied = Some(event.clone());
                break;
            }
        }
        let event = allied.expect("alliance should fire within 30 ticks");
        assert!(event
            .consequences
            .iter()
            .any(|c| matches!(c, Consequence::AllianceFormed { .. })));
        assert!(fx.graph.get(NpcId(2), NpcId(5)).unwrap().in_alliance);
    }

    #[test]
    fn test_tension_formula() {
        let mut fx = Fixture::new();
        fx.memory.record_event(
            MemoryDraft::new(3, MemoryKind::Conflict, vec![NpcId(2), NpcId(4)], "fight").impact(-4.0),
        );
        let world = EventWorld {
            roster: &fx.roster,
            graph: &mut fx.graph,
            memory: &mut fx.memory,
            autonomy: &fx.autonomy,
            templates: &fx.templates,
            day: 4,
            now_ms: 0,
        };
        // Theo: suspicion 10 + 50 * 0.3 = 25 toward everyone, trust 50, one recent fight.
        let tension = compute_tension(NpcId(2), &world, &EventsConfig::default());
        assert!((tension - 22.5).abs() < 1e-4);
    }

    #[test]
    fn test_hot_ongoing_event_can_escalate() {
        let mut escalations = 0;
        for seed in 0..40 {
            let mut fx = Fixture::new();
            let mut engine = EmergentEventEngine::new(EventsConfig::default());
            engine.events.push(
                EmergentEvent::new("evt_seeded", EmergentEventType::Conflict, vec![NpcId(1), NpcId(4)], 1)
                    .with_tension(85.0),
            );
            let fired = fx.run(&mut engine, 2, 0, seed);
            if let Some(event) = fired.iter().find(|e| e.escalated_from.is_some()) {
                escalations += 1;
                assert_eq!(event.drama_tension, 100.0);
                assert_eq!(event.participants, vec![NpcId(1), NpcId(4)]);
                assert_eq!(engine.events()[0].outcome, EventOutcome::Escalated);
            }
        }
        assert!(escalations > 0);
        assert!(escalations < 40);
    }
}
