//! NPC Autonomy Engine
//!
//! Each tick every autonomous cast member recomputes its motives, enumerates
//! candidate decisions, picks one by weighted draw among the top three and
//! executes it if its cooldown elapsed and the urgency gate passes. Only
//! executed decisions are returned; the orchestrator applies their consequences.

pub mod generate;
pub mod motives;
pub mod select;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use rand::Rng;

use cast_events::{generate_decision_id, NpcDecision, NpcId};
use narrator::NarrationTemplates;
use tracing::debug;

use crate::components::NpcMotive;
use crate::config::AutonomyConfig;
use crate::setup::Roster;
use crate::systems::memory::MemoryEngine;
use crate::systems::relationships::RelationshipGraph;

pub use generate::{candidate_decisions, Candidate, CandidateContext};
pub use motives::compute_motives;
pub use select::{choose, gate_probability, trait_fit};

/// Read-only view of the world handed to the autonomy pass.
pub struct AutonomyContext<'a> {
    pub roster: &'a Roster,
    pub graph: &'a RelationshipGraph,
    pub memory: &'a MemoryEngine,
    pub templates: &'a NarrationTemplates,
    pub day: u32,
    /// Clock time in milliseconds
    pub now_ms: u64,
}

/// Autonomy state: motives from the last pass and per-NPC action times.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AutonomyEngine {
    #[serde(skip)]
    config: AutonomyConfig,
    motives: BTreeMap<NpcId, Vec<NpcMotive>>,
    last_action_ms: BTreeMap<NpcId, u64>,
    decision_sequence: u64,
}

impl AutonomyEngine {
    pub fn new(config: AutonomyConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn set_config(&mut self, config: AutonomyConfig) {
        self.config = config;
    }

    /// Motives computed for `npc` on the last pass.
    pub fn motives(&self, npc: NpcId) -> &[NpcMotive] {
        self.motives.get(&npc).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn last_action_ms(&self, npc: NpcId) -> Option<u64> {
        self.last_action_ms.get(&npc).copied()
    }

    /// Records an action taken outside the autonomy pass (e.g. replying to the player).
    pub fn note_action(&mut self, npc: NpcId, now_ms: u64) {
        self.last_action_ms.insert(npc, now_ms);
    }

    /// Allocates the next decision id. Follow-ups share the sequence.
    pub fn next_decision_id(&mut self) -> String {
        self.decision_sequence += 1;
        generate_decision_id(self.decision_sequence)
    }

    fn cooled_down(&self, npc: NpcId, now_ms: u64) -> bool {
        self.last_action_ms(npc)
            .map(|last| now_ms.saturating_sub(last) >= self.config.cooldown_ms)
            .unwrap_or(true)
    }

    fn acted_recently(&self, npc: NpcId, now_ms: u64) -> bool {
        self.last_action_ms(npc)
            .map(|last| now_ms.saturating_sub(last) < self.config.recency_window_ms)
            .unwrap_or(false)
    }

    /// Runs one autonomy pass over every active non-player member, in id order.
    pub fn run<R: Rng + ?Sized>(&mut self, ctx: &AutonomyContext<'_>, rng: &mut R) -> Vec<NpcDecision> {
        let candidate_ctx = CandidateContext {
            roster: ctx.roster,
            graph: ctx.graph,
            templates: ctx.templates,
        };
        let npcs: Vec<NpcId> = ctx
            .roster
            .autonomous_ids()
            .filter(|id| !ctx.graph.is_eliminated(*id))
            .collect();

        let mut executed = Vec::new();
        for npc in npcs {
            let motives = compute_motives(npc, ctx.roster, ctx.graph, ctx.memory, &self.config, ctx.day);
            let candidates = candidate_decisions(npc, &motives, &candidate_ctx, rng);
            self.motives.insert(npc, motives);

            let personality = ctx.roster.personality(npc);
            let recent = self.acted_recently(npc, ctx.now_ms);
            let weights: Vec<f32> = candidates
                .iter()
                .map(|c| select::weight(c, &personality, recent))
                .collect();

            let Some(choice) = choose(&candidates, &weights, rng) else {
                continue;
            };
            if !self.cooled_down(npc, ctx.now_ms) {
                debug!(%npc, decision = choice.decision.as_str(), "decision skipped, cooling down");
                continue;
            }
            if !select::passes_gate(choice.urgency, &self.config, rng) {
                continue;
            }

            self.last_action_ms.insert(npc, ctx.now_ms);
            executed.push(NpcDecision {
                decision_id: self.next_decision_id(),
                npc,
                npc_name: ctx.roster.name(npc).to_string(),
                decision: choice.decision,
                target: Some(choice.target),
                target_name: Some(ctx.roster.name(choice.target).to_string()),
                subject: choice.subject,
                motive: choice.motive,
                urgency: choice.urgency,
                content: choice.content.clone(),
                day: ctx.day,
            });
        }
        debug!(day = ctx.day, executed = executed.len(), "autonomy pass");
        executed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RelationshipConfig;
    use cast_events::fixtures::sample_cast;
    use narrator::default_templates;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    struct World {
        roster: Roster,
        graph: RelationshipGraph,
        memory: MemoryEngine,
        templates: NarrationTemplates,
    }

    fn world() -> World {
        let roster = Roster::new(sample_cast());
        World {
            graph: RelationshipGraph::new(&roster, RelationshipConfig::default()),
            memory: MemoryEngine::new(&roster),
            templates: default_templates(),
            roster,
        }
    }

    fn ctx(w: &World, now_ms: u64) -> AutonomyContext<'_> {
        AutonomyContext {
            roster: &w.roster,
            graph: &w.graph,
            memory: &w.memory,
            templates: &w.templates,
            day: 2,
            now_ms,
        }
    }

    #[test]
    fn test_player_never_acts() {
        let w = world();
        let mut engine = AutonomyEngine::new(AutonomyConfig::default());
        let mut rng = SmallRng::seed_from_u64(1);
        for step in 0..20 {
            let decisions = engine.run(&ctx(&w, step * 120_000), &mut rng);
            assert!(decisions.iter().all(|d| d.npc != NpcId(0)));
            assert!(decisions.iter().all(|d| d.target != Some(d.npc)));
        }
        assert!(engine.motives(NpcId(0)).is_empty());
        assert!(!engine.motives(NpcId(1)).is_empty());
    }

    #[test]
    fn test_cooldown_blocks_second_action() {
        let w = world();
        let mut engine = AutonomyEngine::new(AutonomyConfig::default());
        for npc in w.roster.autonomous_ids() {
            engine.note_action(npc, 1_000);
        }
        let mut rng = SmallRng::seed_from_u64(5);
        assert!(engine.run(&ctx(&w, 30_000), &mut rng).is_empty());
    }

    #[test]
    fn test_same_seed_same_decisions() {
        let w = world();
        let run = |seed: u64| {
            let mut engine = AutonomyEngine::new(AutonomyConfig::default());
            let mut rng = SmallRng::seed_from_u64(seed);
            (0..10)
                .flat_map(|step| engine.run(&ctx(&w, step * 90_000), &mut rng))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(42), run(42));
    }
}
