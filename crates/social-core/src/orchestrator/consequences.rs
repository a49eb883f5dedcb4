//! Decision Consequences
//!
//! Turns an executed NPC decision into relationship updates and memories.

use cast_events::{DecisionType, NpcDecision, NpcId};
use tracing::debug;

use crate::components::{InteractionKind, MemoryKind};
use crate::setup::Roster;
use crate::systems::memory::{MemoryDraft, MemoryEngine};
use crate::systems::relationships::RelationshipGraph;

/// Target accepts an alliance proposal at or above this trust in the proposer.
const ACCEPT_TRUST: f32 = 40.0;
/// ...and below this suspicion.
const ACCEPT_SUSPICION: f32 = 50.0;

/// What applying a decision changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecisionOutcome {
    pub alliance_formed: bool,
    pub alliance_broken: bool,
    pub memories: usize,
}

/// Applies one decision. Decisions without a live target are ignored.
pub fn apply_decision(
    decision: &NpcDecision,
    roster: &Roster,
    graph: &mut RelationshipGraph,
    memory: &mut MemoryEngine,
) -> DecisionOutcome {
    let mut outcome = DecisionOutcome::default();
    let Some(target) = decision.target else {
        return outcome;
    };
    if target == decision.npc || graph.is_eliminated(target) || graph.is_eliminated(decision.npc) {
        return outcome;
    }

    let npc = decision.npc;
    let day = decision.day;
    let mut drafts = Vec::new();

    match decision.decision {
        DecisionType::ProposeAlliance => {
            let accepted = graph
                .get(target, npc)
                .map(|r| r.trust >= ACCEPT_TRUST && r.suspicion < ACCEPT_SUSPICION)
                .unwrap_or(false);
            if accepted && graph.form_alliance(npc, target, decision.urgency.clamp(30.0, 80.0), day) {
                outcome.alliance_formed = true;
                drafts.push(
                    MemoryDraft::new(
                        day,
                        MemoryKind::Alliance,
                        vec![npc, target],
                        format!("{} and {} agreed to work together", roster.first_name(npc), roster.first_name(target)),
                    )
                    .impact(4.0)
                    .importance(7.0),
                );
            } else {
                graph.update(npc, target, -2.0, 0.0, 0.0, InteractionKind::Conversation, "alliance turned down", day);
                drafts.push(
                    MemoryDraft::new(
                        day,
                        MemoryKind::Conversation,
                        vec![npc, target],
                        format!("{} turned down {}'s alliance pitch", roster.first_name(target), roster.first_name(npc)),
                    )
                    .impact(-1.0)
                    .importance(4.0),
                );
            }
        }
        DecisionType::SendDm => {
            graph.update(npc, target, 3.0, 0.0, 2.0, InteractionKind::Conversation, &decision.content, day);
            drafts.push(
                MemoryDraft::new(day, MemoryKind::Conversation, vec![npc, target], decision.content.clone())
                    .impact(1.0)
                    .importance(3.0),
            );
        }
        DecisionType::Confront => {
            graph.update(npc, target, -6.0, 5.0, -3.0, InteractionKind::Conflict, &decision.content, day);
            memory.update_threat_assessment(target, npc, 1.0);
            drafts.push(
                MemoryDraft::new(day, MemoryKind::Conflict, vec![npc, target], decision.content.clone())
                    .impact(-4.0)
                    .importance(6.0),
            );
        }
        DecisionType::Scheme => {
            memory.update_threat_assessment(npc, target, 1.0);
            memory.update_voting_plan(npc, target, None, "scheming", day);
            memory.record_secret(
                npc,
                format!("{} is working against {}", roster.first_name(npc), roster.first_name(target)),
                Some(target),
                day,
            );
        }
        DecisionType::SpreadRumor => {
            let victim = decision.subject.unwrap_or(target);
            if victim != target {
                graph.update(target, victim, -5.0, 7.0, 0.0, InteractionKind::Rumor, &decision.content, day);
            }
            let source = memory
                .recent_memories(npc, day, u32::MAX)
                .into_iter()
                .rev()
                .find(|m| m.is_negative() && m.involves(victim))
                .map(|m| m.id);
            if let Some(memory_id) = source {
                memory.spread_gossip(memory_id, npc, target, day);
            }
            drafts.push(
                MemoryDraft::new(day, MemoryKind::Rumor, vec![npc, target, victim], decision.content.clone())
                    .impact(-1.0)
                    .importance(5.0),
            );
        }
        DecisionType::Flirt => {
            graph.update(npc, target, 4.0, 0.0, 6.0, InteractionKind::Flirt, &decision.content, day);
            drafts.push(
                MemoryDraft::new(day, MemoryKind::Romance, vec![npc, target], decision.content.clone())
                    .impact(3.0)
                    .importance(5.0),
            );
        }
        DecisionType::Betray => {
            let level = (decision.urgency / 2.0).clamp(10.0, 50.0);
            if graph.break_alliance(npc, target, level, day) {
                outcome.alliance_broken = true;
                drafts.push(
                    MemoryDraft::new(
                        day,
                        MemoryKind::Betrayal,
                        vec![target, npc],
                        format!("{} betrayed {}", roster.first_name(npc), roster.first_name(target)),
                    )
                    .impact(-7.0)
                    .importance(9.0),
                );
            }
        }
    }

    outcome.memories = drafts.len();
    for draft in drafts {
        memory.record_event(draft);
    }
    debug!(npc = %npc, target = %target, decision = decision.decision.as_str(), "decision applied");
    outcome
}

/// Applies every decision in order.
pub fn apply_decisions(
    decisions: &[NpcDecision],
    roster: &Roster,
    graph: &mut RelationshipGraph,
    memory: &mut MemoryEngine,
) -> Vec<(NpcId, DecisionOutcome)> {
    decisions
        .iter()
        .map(|d| (d.npc, apply_decision(d, roster, graph, memory)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RelationshipConfig;
    use cast_events::fixtures::sample_cast;
    use cast_events::MotiveType;

    fn setup() -> (Roster, RelationshipGraph, MemoryEngine) {
        let roster = Roster::new(sample_cast());
        let graph = RelationshipGraph::new(&roster, RelationshipConfig::default());
        let memory = MemoryEngine::new(&roster);
        (roster, graph, memory)
    }

    fn decision(npc: u32, kind: DecisionType, target: u32, urgency: f32) -> NpcDecision {
        NpcDecision {
            decision_id: "dec_000001".to_string(),
            npc: NpcId(npc),
            npc_name: String::new(),
            decision: kind,
            target: Some(NpcId(target)),
            target_name: None,
            subject: None,
            motive: MotiveType::AllianceBuilding,
            urgency,
            content: "test".to_string(),
            day: 2,
        }
    }

    #[test]
    fn test_alliance_accepted_by_trusting_target() {
        let (roster, mut graph, mut memory) = setup();
        let out = apply_decision(&decision(2, DecisionType::ProposeAlliance, 5, 60.0), &roster, &mut graph, &mut memory);
        assert!(out.alliance_formed);
        assert!(graph.get(NpcId(2), NpcId(5)).unwrap().in_alliance);
        assert_eq!(out.memories, 1);
    }

    #[test]
    fn test_alliance_refused_by_suspicious_target() {
        let (roster, mut graph, mut memory) = setup();
        graph.update(NpcId(5), NpcId(2), -30.0, 40.0, 0.0, InteractionKind::Conflict, "", 2);
        let out = apply_decision(&decision(2, DecisionType::ProposeAlliance, 5, 60.0), &roster, &mut graph, &mut memory);
        assert!(!out.alliance_formed);
        assert!(!graph.get(NpcId(2), NpcId(5)).unwrap().in_alliance);
    }

    #[test]
    fn test_betrayal_breaks_alliance_and_is_remembered() {
        let (roster, mut graph, mut memory) = setup();
        graph.form_alliance(NpcId(4), NpcId(1), 60.0, 1);
        let out = apply_decision(&decision(4, DecisionType::Betray, 1, 80.0), &roster, &mut graph, &mut memory);
        assert!(out.alliance_broken);
        let last = memory.global_log().last().unwrap();
        assert_eq!(last.kind, MemoryKind::Betrayal);
        assert_eq!(last.participants, vec![NpcId(1), NpcId(4)]);
    }

    #[test]
    fn test_betraying_non_ally_is_not_a_betrayal() {
        let (roster, mut graph, mut memory) = setup();
        let out = apply_decision(&decision(4, DecisionType::Betray, 1, 80.0), &roster, &mut graph, &mut memory);
        assert!(!out.alliance_broken);
        assert_eq!(out.memories, 0);
        assert_eq!(memory.global_log().count(), 0);
    }

    #[test]
    fn test_scheme_records_secret() {
        let (roster, mut graph, mut memory) = setup();
        apply_decision(&decision(4, DecisionType::Scheme, 2, 50.0), &roster, &mut graph, &mut memory);
        let secret = memory.secrets().next().unwrap();
        assert_eq!(secret.about, Some(NpcId(2)));
        assert_eq!(memory.journal(NpcId(4)).unwrap().voting_plan.as_ref().unwrap().target, NpcId(2));
    }

    #[test]
    fn test_batch_applies_in_order() {
        let (roster, mut graph, mut memory) = setup();
        let batch = [
            decision(2, DecisionType::ProposeAlliance, 5, 60.0),
            decision(2, DecisionType::Betray, 5, 60.0),
        ];
        let outcomes = apply_decisions(&batch, &roster, &mut graph, &mut memory);
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].0, NpcId(2));
        assert!(outcomes[0].1.alliance_formed);
        assert!(outcomes[1].1.alliance_broken);
        assert!(!graph.get(NpcId(5), NpcId(2)).unwrap().in_alliance);
    }

    #[test]
    fn test_eliminated_target_is_ignored() {
        let (roster, mut graph, mut memory) = setup();
        graph.voting_update(&[(NpcId(1), NpcId(3))], Some(NpcId(3)), 2);
        let out = apply_decision(&decision(2, DecisionType::Flirt, 3, 50.0), &roster, &mut graph, &mut memory);
        assert_eq!(out, DecisionOutcome::default());
    }
}
