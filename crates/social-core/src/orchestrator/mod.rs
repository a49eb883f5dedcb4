//! Game Engine
//!
//! Single owner of every engine. [`GameEngine::tick`] advances the autonomous
//! world on the configured cadence; [`GameEngine::respond`] runs one player
//! action through the language pipeline, applies the reply and hands back a
//! render request the caller phrases off the mutation path.
//!
//! Each tick and each player turn draws from its own RNG stream derived from
//! the seed and the counters, so a restored snapshot replays identically.

pub mod clock;
pub mod consequences;
pub mod response;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::iter;
use std::sync::Arc;

use cast_events::{
    CastMember, EmergentEvent, NpcDecision, NpcId, PlayerAction, PlayerActionKind, ReactionDeltas,
    ReactionSummary, ReactionTake, ResponseStrategy, SocialStanding,
};
use narrator::{default_templates, NarrationTemplates, RenderRequest, RenderedLine, Slot, SlotValues};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::components::{InteractionKind, MemoryKind};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::language::{
    analyze, extract, generate, ConversationTopic, SocialInterpreter, SpeechActClassifier,
    SpeechActType,
};
use crate::output::snapshot::{snapshot_id, GameSnapshot, SNAPSHOT_VERSION};
use crate::setup::Roster;
use crate::systems::{
    check_health, AutonomyContext, AutonomyEngine, EmergentEventEngine, EventWorld, HealthWarning,
    MemoryDraft, MemoryEngine, MemoryQuery, MemorySearchResult, RelationshipGraph,
};

pub use clock::{Clock, ScheduledAction, Scheduler, SystemClock, VirtualClock};
pub use consequences::{apply_decision, apply_decisions, DecisionOutcome};
pub use response::{
    fourth_wall_response, select_strategy, select_tone, strategy_summary, synthesize, FollowUp,
    NpcResponse, ResponseInputs,
};

/// Longest excerpt of player text kept in a memory.
const QUOTE_CHARS: usize = 120;

/// Urgency given to follow-ups when they come due.
const FOLLOW_UP_URGENCY: f32 = 50.0;

fn stream_seed(seed: u64, ticks: u64, turn: u64) -> u64 {
    seed ^ ticks.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ turn.wrapping_mul(0xC2B2_AE3D_27D4_EB4F)
}

fn quote(text: &str) -> String {
    let mut out: String = text.chars().take(QUOTE_CHARS).collect();
    if text.chars().count() > QUOTE_CHARS {
        out.push_str("...");
    }
    out
}

/// Everything one tick produced.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TickReport {
    pub tick: u64,
    pub day: u32,
    /// False when the call landed inside the throttle window
    pub ran: bool,
    pub decisions: Vec<NpcDecision>,
    pub events: Vec<EmergentEvent>,
    pub warnings: Vec<HealthWarning>,
}

/// Result of one player action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerTurn {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub npc: Option<NpcId>,
    pub reaction: ReactionSummary,
    /// Absent when the action was ignored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub render: Option<RenderRequest>,
}

impl PlayerTurn {
    fn ignored(context: impl Into<String>) -> Self {
        Self {
            npc: None,
            reaction: ReactionSummary::neutral(context),
            render: None,
        }
    }
}

/// The social simulation.
pub struct GameEngine {
    config: EngineConfig,
    clock: Arc<dyn Clock>,
    templates: NarrationTemplates,
    rng: SmallRng,
    seed: u64,
    session_id: Uuid,
    snapshot_sequence: u64,
    day: u32,
    turn: u64,
    ticks: u64,
    last_tick_ms: Option<u64>,
    roster: Roster,
    graph: RelationshipGraph,
    memory: MemoryEngine,
    autonomy: AutonomyEngine,
    events: EmergentEventEngine,
    interpreter: SocialInterpreter,
    classifier: SpeechActClassifier,
    scheduler: Scheduler,
}

impl GameEngine {
    /// Builds every engine for `cast` on the system clock.
    pub fn new(cast: Vec<CastMember>, config: EngineConfig, seed: u64) -> Self {
        Self::with_clock(cast, config, seed, Arc::new(SystemClock))
    }

    pub fn with_clock(cast: Vec<CastMember>, config: EngineConfig, seed: u64, clock: Arc<dyn Clock>) -> Self {
        let roster = Roster::new(cast);
        let graph = RelationshipGraph::new(&roster, config.relationships.clone());
        let memory = MemoryEngine::new(&roster);
        info!(members = roster.len(), seed, "game engine ready");
        Self {
            clock,
            templates: default_templates(),
            rng: SmallRng::seed_from_u64(stream_seed(seed, 0, 0)),
            seed,
            session_id: Uuid::new_v4(),
            snapshot_sequence: 0,
            day: config.tick.start_day,
            turn: 0,
            ticks: 0,
            last_tick_ms: None,
            graph,
            memory,
            autonomy: AutonomyEngine::new(config.autonomy.clone()),
            events: EmergentEventEngine::new(config.events.clone()),
            interpreter: SocialInterpreter::new(config.interpretation.clone()),
            classifier: SpeechActClassifier::default(),
            scheduler: Scheduler::new(),
            roster,
            config,
        }
    }

    pub fn with_templates(mut self, templates: NarrationTemplates) -> Self {
        self.templates = templates;
        self
    }

    fn reseed(&mut self) {
        self.rng = SmallRng::seed_from_u64(stream_seed(self.seed, self.ticks, self.turn));
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn graph(&self) -> &RelationshipGraph {
        &self.graph
    }

    pub fn memory(&self) -> &MemoryEngine {
        &self.memory
    }

    pub fn autonomy(&self) -> &AutonomyEngine {
        &self.autonomy
    }

    pub fn events(&self) -> &EmergentEventEngine {
        &self.events
    }

    pub fn interpreter(&self) -> &SocialInterpreter {
        &self.interpreter
    }

    pub fn classifier(&self) -> &SpeechActClassifier {
        &self.classifier
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn templates(&self) -> &NarrationTemplates {
        &self.templates
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn turn(&self) -> u64 {
        self.turn
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn set_day(&mut self, day: u32) {
        if day < self.day {
            warn!(from = self.day, to = day, "day moved backwards");
        }
        self.day = day;
        self.events.purge(day);
    }

    pub fn advance_day(&mut self) -> u32 {
        self.set_day(self.day + 1);
        self.day
    }

    /// Advisory health warnings for the current day.
    pub fn health(&self) -> Vec<HealthWarning> {
        check_health(&self.roster, &self.graph, &self.config.health, self.day)
    }

    /// Runs one tick unless the last one was less than the tick interval ago.
    pub fn tick(&mut self) -> TickReport {
        let now = self.clock.now_ms();
        let due = self
            .last_tick_ms
            .map_or(true, |last| now.saturating_sub(last) >= self.config.tick.interval_ms);
        if !due {
            return TickReport {
                tick: self.ticks,
                day: self.day,
                ran: false,
                warnings: self.health(),
                ..TickReport::default()
            };
        }

        self.last_tick_ms = Some(now);
        self.ticks += 1;
        self.reseed();
        let day = self.day;

        let decayed = self.graph.decay(day);

        let mut decisions = self.autonomy.run(
            &AutonomyContext {
                roster: &self.roster,
                graph: &self.graph,
                memory: &self.memory,
                templates: &self.templates,
                day,
                now_ms: now,
            },
            &mut self.rng,
        );
        for action in self.scheduler.take_due(now) {
            if !self.roster.is_active(action.npc) || !self.roster.is_active(action.target) {
                continue;
            }
            let decision = NpcDecision {
                decision_id: self.autonomy.next_decision_id(),
                npc: action.npc,
                npc_name: self.roster.name(action.npc).to_string(),
                decision: action.decision,
                target: Some(action.target),
                target_name: Some(self.roster.name(action.target).to_string()),
                subject: None,
                motive: action.motive,
                urgency: FOLLOW_UP_URGENCY,
                content: action.content,
                day,
            };
            self.autonomy.note_action(action.npc, now);
            decisions.push(decision);
        }
        let outcomes = apply_decisions(&decisions, &self.roster, &mut self.graph, &mut self.memory);
        let alliances_formed = outcomes.iter().filter(|(_, o)| o.alliance_formed).count();
        let alliances_broken = outcomes.iter().filter(|(_, o)| o.alliance_broken).count();

        let mut world = EventWorld {
            roster: &self.roster,
            graph: &mut self.graph,
            memory: &mut self.memory,
            autonomy: &self.autonomy,
            templates: &self.templates,
            day,
            now_ms: now,
        };
        let events = self.events.run(&mut world, &mut self.rng);
        let warnings = self.health();

        debug!(
            tick = self.ticks,
            day,
            decayed,
            decisions = decisions.len(),
            alliances_formed,
            alliances_broken,
            events = events.len(),
            warnings = warnings.len(),
            "tick complete"
        );
        TickReport {
            tick: self.ticks,
            day,
            ran: true,
            decisions,
            events,
            warnings,
        }
    }

    /// Applies a player action and returns only the reaction.
    pub fn player_action(&mut self, action: &PlayerAction) -> ReactionSummary {
        self.respond(action).reaction
    }

    /// Runs a player action through the language pipeline and applies the
    /// addressed NPC's reply. Unknown or inactive targets are ignored.
    pub fn respond(&mut self, action: &PlayerAction) -> PlayerTurn {
        let Some(name) = action.target.as_deref() else {
            warn!(kind = ?action.kind, "player action without a target ignored");
            return PlayerTurn::ignored("nobody was addressed");
        };
        let Some(npc) = self.roster.resolve(name) else {
            warn!(target = name, "unknown target, player action ignored");
            return PlayerTurn::ignored(format!("no one named {name}"));
        };
        let Some(player) = self.roster.player() else {
            warn!("roster has no player, player action ignored");
            return PlayerTurn::ignored("no player in the cast");
        };
        if npc == player || !self.roster.is_active(npc) {
            warn!(target = name, "target cannot respond, player action ignored");
            return PlayerTurn::ignored(format!("{name} cannot respond"));
        }

        self.turn += 1;
        self.reseed();
        let now = self.clock.now_ms();
        let day = self.day;
        let text = action.content.as_deref().unwrap_or("");
        let npc_first = self.roster.first_name(npc).to_string();
        let player_first = self.roster.first_name(player).to_string();

        let features = extract(text);
        let act = self.classifier.observe(text, &features);
        let intent = analyze(text, &act, &self.roster, Some(player));
        let hypotheses = generate(&features, &act, &intent);
        self.interpreter.observe_message(&features, &act, &hypotheses);

        let personality = self.roster.personality(npc);
        let relationship = self.graph.get(npc, player).cloned();
        let perceived = self.interpreter.interpret(
            npc,
            &personality,
            &hypotheses,
            &features,
            &act,
            relationship.as_ref(),
            &mut self.rng,
        );

        let mut response = if act.meta_text {
            fourth_wall_response()
        } else {
            synthesize(&ResponseInputs {
                npc,
                personality: &personality,
                act: &act,
                intent: &intent,
                perceived: &perceived,
                relationship: relationship.as_ref(),
                action_kind: action.kind,
            })
        };
        response.dampen(self.interpreter.exploit.dampening());
        let strategy = response.strategy;

        let (trust, suspicion) = self
            .graph
            .update(
                npc,
                player,
                response.trust,
                response.suspicion,
                response.closeness,
                response.interaction,
                &format!("{} replied {}", npc_first, strategy.as_str()),
                day,
            )
            .map(|d| (d.trust, d.suspicion))
            .unwrap_or((0.0, 0.0));

        let mut notes = response.notes.clone();

        // Gossip or accusations about someone else rub off on them.
        if matches!(act.primary, SpeechActType::Gossip | SpeechActType::Accusation) {
            let subject = intent
                .vote_target
                .or_else(|| intent.mentioned.first().copied())
                .filter(|id| *id != npc && *id != player);
            if let Some(other) = subject {
                self.graph.update(npc, other, -4.0, 6.0, 0.0, InteractionKind::Rumor, "heard it from the player", day);
                notes.push(format!("now doubts {}", self.roster.first_name(other)));
            }
        }

        if act.threat_level > 40.0 {
            self.memory.update_threat_assessment(npc, player, act.threat_level / 20.0);
        }
        self.memory.update_personal_bond(npc, player, trust / 4.0);

        let content = if text.trim().is_empty() {
            format!("{} approached {} without a word", player_first, npc_first)
        } else {
            format!("{} said: \"{}\"", player_first, quote(text))
        };
        self.memory.record_event(
            MemoryDraft::new(day, response.memory_kind, vec![npc, player], content)
                .impact(response.memory_impact)
                .importance(response.importance),
        );

        let pitched = act.primary == SpeechActType::AllianceProposal
            || action.kind == PlayerActionKind::AlliancePitch;
        if strategy == ResponseStrategy::StrategicAlliance && pitched {
            if self
                .memory
                .record_promise(player, npc, format!("{} will work with {}", player_first, npc_first), day)
                .is_some()
            {
                notes.push("promise noted".to_string());
            }
        }

        let trusts_player = self.graph.get(npc, player).map(|r| r.trust >= 50.0).unwrap_or(false);
        if intent.topic == ConversationTopic::Vote
            && trusts_player
            && matches!(strategy, ResponseStrategy::StrategicAlliance | ResponseStrategy::Neutral)
        {
            if let Some(target) = intent.vote_target.filter(|t| *t != npc && *t != player) {
                self.memory
                    .update_voting_plan(npc, target, None, format!("{}'s pitch", player_first), day);
                notes.push(format!("will consider voting {}", self.roster.first_name(target)));
            }
        }

        if let Some(follow) = response.follow_up {
            let values = SlotValues::new()
                .with(Slot::Speaker, npc_first.as_str())
                .with(Slot::Target, player_first.as_str());
            let content = self
                .templates
                .decision_line(follow.decision, &values, self.rng.gen())
                .unwrap_or_else(|err| {
                    debug!(%err, "follow-up template fell back");
                    format!("{} follows up with {}", npc_first, player_first)
                });
            self.scheduler.schedule(
                ScheduledAction::new(now + follow.delay_ms, npc, player, follow.decision, follow.motive)
                    .with_content(content)
                    .on_day(day),
            );
        }
        self.autonomy.note_action(npc, now);

        let render = RenderRequest {
            npc_name: self.roster.name(npc).to_string(),
            npc_profile: personality.describe(),
            player_name: self.roster.name(player).to_string(),
            strategy,
            tone: response.tone,
            summary: strategy_summary(strategy, &npc_first, &player_first),
            fourth_wall: response.fourth_wall,
            variant: self.rng.gen(),
            day,
            turn: self.turn,
        };

        let take = if response.fourth_wall {
            ReactionTake::Suspicious
        } else {
            strategy.take()
        };
        info!(
            npc = %npc,
            strategy = strategy.as_str(),
            trust,
            suspicion,
            "player action applied"
        );

        PlayerTurn {
            npc: Some(npc),
            reaction: ReactionSummary {
                take,
                context: format!("{} answered {}", npc_first, strategy.as_str().replace('_', " ")),
                notes,
                deltas: ReactionDeltas {
                    trust,
                    suspicion,
                    influence: response.influence,
                    entertainment: response.entertainment,
                },
            },
            render: Some(render),
        }
    }

    /// Stores a rendered reply as a memory. Lines issued for an earlier turn
    /// or day are rejected.
    pub fn apply_rendered_line(&mut self, npc: NpcId, line: &RenderedLine) -> Result<u64, EngineError> {
        if line.day != self.day || line.turn != self.turn {
            warn!(
                day = line.day,
                turn = line.turn,
                current_day = self.day,
                current_turn = self.turn,
                "stale render discarded"
            );
            return Err(EngineError::StaleRender {
                day: line.day,
                turn: line.turn,
                current_day: self.day,
                current_turn: self.turn,
            });
        }
        if !self.roster.contains(npc) {
            return Err(EngineError::UnknownMember(npc.to_string()));
        }
        let player = self
            .roster
            .player()
            .ok_or_else(|| EngineError::UnknownMember("player".to_string()))?;
        let content = format!("{}: \"{}\"", self.roster.first_name(npc), quote(&line.text));
        Ok(self.memory.record_event(
            MemoryDraft::new(self.day, MemoryKind::Conversation, vec![npc, player], content).importance(2.0),
        ))
    }

    /// Applies revealed votes and an optional elimination.
    pub fn apply_votes(&mut self, votes: &[(NpcId, NpcId)], eliminated: Option<NpcId>) {
        let day = self.day;
        self.graph.voting_update(votes, eliminated, day);
        for (voter, target) in votes {
            let content = format!(
                "{} voted for {}",
                self.roster.first_name(*voter),
                self.roster.first_name(*target)
            );
            self.memory.record_event(
                MemoryDraft::new(day, MemoryKind::Vote, vec![*voter, *target], content)
                    .impact(-3.0)
                    .importance(6.0),
            );
        }

        if let Some(out) = eliminated {
            self.roster.set_active(out, false);
            let cancelled = self.scheduler.cancel_for(out);
            let witnesses: Vec<NpcId> = self
                .roster
                .active_ids()
                .chain(iter::once(out))
                .collect();
            let content = format!("{} was voted out", self.roster.name(out));
            self.memory.record_event(
                MemoryDraft::new(day, MemoryKind::Elimination, witnesses, content)
                    .impact(-2.0)
                    .importance(9.0),
            );
            info!(npc = %out, cancelled, "member eliminated");
        }
    }

    pub fn social_standing(&self, npc: NpcId) -> SocialStanding {
        self.graph.social_standing(npc)
    }

    /// Standing looked up by display or first name.
    pub fn standing_of(&self, name: &str) -> Option<SocialStanding> {
        self.roster.resolve(name).map(|id| self.graph.social_standing(id))
    }

    pub fn query_memory(&self, npc: NpcId, query: &MemoryQuery) -> MemorySearchResult {
        self.memory.query_memory(npc, query)
    }

    pub fn personal_notes(&self, npc: NpcId) -> Vec<String> {
        self.memory.generate_personal_notes(npc, &self.roster)
    }

    /// Full state export. Configuration and templates are not included.
    pub fn export_snapshot(&mut self) -> GameSnapshot {
        self.snapshot_sequence += 1;
        GameSnapshot {
            version: SNAPSHOT_VERSION,
            snapshot_id: snapshot_id(self.snapshot_sequence),
            session_id: self.session_id,
            seed: self.seed,
            day: self.day,
            turn: self.turn,
            ticks: self.ticks,
            last_tick_ms: self.last_tick_ms,
            roster: self.roster.clone(),
            graph: self.graph.clone(),
            memory: self.memory.clone(),
            autonomy: self.autonomy.clone(),
            events: self.events.clone(),
            interpreter: self.interpreter.clone(),
            classifier: self.classifier.clone(),
            scheduler: self.scheduler.clone(),
        }
    }

    /// Rebuilds an engine from a snapshot, applying `config` to every engine.
    pub fn from_snapshot(
        snapshot: GameSnapshot,
        config: EngineConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, EngineError> {
        snapshot.validate()?;
        let sequence = snapshot
            .snapshot_id
            .trim_start_matches("snap_")
            .parse()
            .unwrap_or(0);
        let GameSnapshot {
            session_id,
            seed,
            day,
            turn,
            ticks,
            last_tick_ms,
            roster,
            mut graph,
            memory,
            mut autonomy,
            mut events,
            mut interpreter,
            classifier,
            scheduler,
            ..
        } = snapshot;

        graph.set_config(config.relationships.clone());
        autonomy.set_config(config.autonomy.clone());
        events.set_config(config.events.clone());
        interpreter.set_config(config.interpretation.clone());
        info!(%session_id, day, ticks, turn, "engine restored from snapshot");

        Ok(Self {
            clock,
            templates: default_templates(),
            rng: SmallRng::seed_from_u64(stream_seed(seed, ticks, turn)),
            seed,
            session_id,
            snapshot_sequence: sequence,
            day,
            turn,
            ticks,
            last_tick_ms,
            roster,
            graph,
            memory,
            autonomy,
            events,
            interpreter,
            classifier,
            scheduler,
            config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cast_events::fixtures::sample_cast;

    fn engine() -> (GameEngine, VirtualClock) {
        let clock = VirtualClock::new(0);
        let engine = GameEngine::with_clock(sample_cast(), EngineConfig::default(), 42, Arc::new(clock.clone()));
        (engine, clock)
    }

    #[test]
    fn test_tick_is_throttled() {
        let (mut engine, clock) = engine();
        assert!(engine.tick().ran);
        clock.advance(10_000);
        let skipped = engine.tick();
        assert!(!skipped.ran);
        assert!(skipped.decisions.is_empty());
        assert_eq!(engine.ticks(), 1);
        clock.advance(20_000);
        assert!(engine.tick().ran);
        assert_eq!(engine.ticks(), 2);
    }

    #[test]
    fn test_unknown_target_is_a_no_op() {
        let (mut engine, _) = engine();
        let reaction = engine.player_action(&PlayerAction::talk("Nobody", "hello there"));
        assert_eq!(reaction.take, ReactionTake::Neutral);
        assert_eq!(reaction.deltas, ReactionDeltas::default());
        assert_eq!(engine.turn(), 0);
        assert_eq!(engine.memory().global_log().count(), 0);
    }

    #[test]
    fn test_reply_moves_relationship_and_records_memory() {
        let (mut engine, _) = engine();
        let before = engine.graph().get(NpcId(2), NpcId(0)).unwrap().trust;
        let turn = engine.respond(&PlayerAction::talk(
            "Theo",
            "Thank you for having my back yesterday, I really mean it.",
        ));
        assert_eq!(turn.npc, Some(NpcId(2)));
        assert!(turn.reaction.deltas.trust > 0.0);
        assert!(engine.graph().get(NpcId(2), NpcId(0)).unwrap().trust > before);

        let log: Vec<_> = engine.memory().global_log().collect();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].participants, vec![NpcId(2), NpcId(0)]);

        let render = turn.render.unwrap();
        assert_eq!(render.turn, 1);
        assert_eq!(render.npc_name, "Theo Park");
    }

    #[test]
    fn test_meta_text_takes_fourth_wall_branch() {
        let (mut engine, _) = engine();
        let turn = engine.respond(&PlayerAction::talk("Mira", "You're an NPC, the devs wrote your script."));
        assert_eq!(turn.reaction.take, ReactionTake::Suspicious);
        assert!(turn.reaction.deltas.suspicion > 0.0);
        assert!(turn.render.unwrap().fourth_wall);
        assert!(turn.reaction.notes.iter().any(|n| n.contains("fourth wall")));
    }

    #[test]
    fn test_threat_schedules_confrontation() {
        let (mut engine, clock) = engine();
        engine.respond(&PlayerAction::talk(
            "Dex",
            "If you come after me I will make sure you go home next.",
        ));
        let pending = engine.scheduler().pending();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].npc, NpcId(4));
        assert_eq!(pending[0].due_ms, 60_000);

        clock.advance(60_000);
        let report = engine.tick();
        assert!(report
            .decisions
            .iter()
            .any(|d| d.npc == NpcId(4) && d.target == Some(NpcId(0))));
        assert!(engine.scheduler().is_empty());
    }

    #[test]
    fn test_stale_render_is_rejected() {
        let (mut engine, _) = engine();
        let turn = engine.respond(&PlayerAction::talk("Lena", "What do you know about the vote tonight?"));
        let request = turn.render.unwrap();
        let line = RenderedLine {
            text: "Not much.".to_string(),
            source: narrator::LineSource::Template,
            day: request.day,
            turn: request.turn,
        };

        engine.respond(&PlayerAction::talk("Lena", "Anything else?"));
        assert!(matches!(
            engine.apply_rendered_line(NpcId(5), &line),
            Err(EngineError::StaleRender { turn: 1, current_turn: 2, .. })
        ));

        let fresh = RenderedLine { turn: 2, ..line };
        assert!(engine.apply_rendered_line(NpcId(5), &fresh).is_ok());
    }

    #[test]
    fn test_elimination_deactivates_and_cancels() {
        let (mut engine, _) = engine();
        engine.respond(&PlayerAction::talk(
            "Dex",
            "If you come after me I will make sure you go home next.",
        ));
        assert_eq!(engine.scheduler().len(), 1);

        engine.apply_votes(&[(NpcId(1), NpcId(4)), (NpcId(2), NpcId(4))], Some(NpcId(4)));
        assert!(!engine.roster().is_active(NpcId(4)));
        assert!(engine.scheduler().is_empty());
        let reaction = engine.player_action(&PlayerAction::talk("Dex", "Sorry."));
        assert_eq!(reaction.take, ReactionTake::Neutral);
    }

    #[test]
    fn test_snapshot_restores_future() {
        let (mut a, clock_a) = engine();
        a.tick();
        a.respond(&PlayerAction::talk("Sasha", "You look amazing today, honestly."));
        let snapshot = a.export_snapshot();
        assert_eq!(snapshot.snapshot_id, "snap_000001");

        let clock_b = VirtualClock::new(clock_a.now_ms());
        let mut b = GameEngine::from_snapshot(snapshot, EngineConfig::default(), Arc::new(clock_b.clone())).unwrap();

        for _ in 0..5 {
            clock_a.advance(30_000);
            clock_b.advance(30_000);
            let ra = serde_json::to_string(&a.tick()).unwrap();
            let rb = serde_json::to_string(&b.tick()).unwrap();
            assert_eq!(ra, rb);
        }
        assert_eq!(b.export_snapshot().snapshot_id, "snap_000002");
    }
}
