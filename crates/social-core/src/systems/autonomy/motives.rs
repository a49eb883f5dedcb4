//! Motive derivation from personality, standing and recent memories.

use cast_events::{MotiveType, NpcId};

use crate::components::{MemoryKind, NpcMotive};
use crate::config::AutonomyConfig;
use crate::setup::Roster;
use crate::systems::memory::MemoryEngine;
use crate::systems::relationships::RelationshipGraph;

/// Active members other than `npc`, sorted by `npc`'s trust in them, highest first.
/// Ties keep roster order.
pub fn by_trust(npc: NpcId, roster: &Roster, graph: &RelationshipGraph) -> Vec<(NpcId, f32)> {
    let mut others: Vec<(NpcId, f32)> = roster
        .active_ids()
        .filter(|id| *id != npc && !graph.is_eliminated(*id))
        .filter_map(|id| graph.get(npc, id).map(|e| (id, e.trust)))
        .collect();
    others.sort_by(|a, b| b.1.total_cmp(&a.1));
    others
}

/// Recomputes every motive of `npc` for `day`. Survival is always present.
pub fn compute_motives(
    npc: NpcId,
    roster: &Roster,
    graph: &RelationshipGraph,
    memory: &MemoryEngine,
    config: &AutonomyConfig,
    day: u32,
) -> Vec<NpcMotive> {
    let p = roster.personality(npc);
    let ranked = by_trust(npc, roster, graph);
    let most_trusted = ranked.first().map(|(id, _)| *id);
    let least_trusted = ranked.last().map(|(id, _)| *id);

    let survival_intensity = 100.0 - (graph.incoming_avg_trust(npc) + 100.0) / 2.0;
    let mut motives =
        vec![NpcMotive::new(MotiveType::Survival, survival_intensity)
            .with_targets(least_trusted.into_iter().collect())];

    let betrayal = memory
        .recent_memories(npc, day, config.revenge_window_days)
        .into_iter()
        .filter(|m| m.kind == MemoryKind::Betrayal && m.is_negative())
        .max_by_key(|m| (m.day, m.id));
    if let Some(event) = betrayal {
        let targets: Vec<NpcId> = event
            .participants
            .iter()
            .copied()
            .filter(|id| *id != npc && roster.is_active(*id))
            .collect();
        if !targets.is_empty() {
            motives.push(
                NpcMotive::new(MotiveType::Revenge, event.emotional_impact.abs() * 10.0)
                    .with_targets(targets)
                    .with_deadline(event.day + config.revenge_deadline_days),
            );
        }
    }

    if p.charisma > 70.0 {
        let crush = ranked.iter().find_map(|(id, _)| {
            graph
                .get(npc, *id)
                .filter(|e| e.trust > 60.0 && e.closeness > 50.0)
                .map(|e| (*id, e.closeness))
        });
        if let Some((id, closeness)) = crush {
            motives.push(
                NpcMotive::new(MotiveType::Romance, (closeness + p.charisma) / 2.0)
                    .with_targets(vec![id]),
            );
        }
    }

    if graph.allies(npc).is_empty() && (p.loyalty > 55.0 || survival_intensity > 50.0) {
        let targets: Vec<NpcId> = ranked.iter().take(2).map(|(id, _)| *id).collect();
        if !targets.is_empty() {
            motives.push(
                NpcMotive::new(
                    MotiveType::AllianceBuilding,
                    p.loyalty * 0.5 + survival_intensity * 0.5,
                )
                .with_targets(targets),
            );
        }
    }

    if p.intelligence > 60.0 {
        if let (Some(source), Some(subject)) = (most_trusted, least_trusted) {
            motives.push(
                NpcMotive::new(MotiveType::InformationGathering, p.intelligence * 0.7)
                    .with_targets(vec![source, subject]),
            );
        }
    }

    if p.manipulation > 70.0 && p.aggressiveness > 60.0 {
        if let (Some(audience), Some(victim)) = (most_trusted, least_trusted) {
            motives.push(
                NpcMotive::new(
                    MotiveType::Chaos,
                    (p.manipulation + p.aggressiveness) / 2.0 * 0.8,
                )
                .with_targets(vec![audience, victim]),
            );
        }
    }

    motives
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RelationshipConfig;
    use crate::systems::memory::MemoryDraft;
    use cast_events::fixtures::sample_cast;

    fn setup() -> (Roster, RelationshipGraph, MemoryEngine) {
        let roster = Roster::new(sample_cast());
        let graph = RelationshipGraph::new(&roster, RelationshipConfig::default());
        let memory = MemoryEngine::new(&roster);
        (roster, graph, memory)
    }

    fn kinds(motives: &[NpcMotive]) -> Vec<MotiveType> {
        motives.iter().map(|m| m.motive).collect()
    }

    #[test]
    fn test_survival_always_present() {
        let (roster, graph, memory) = setup();
        for id in roster.ids() {
            let motives = compute_motives(id, &roster, &graph, &memory, &AutonomyConfig::default(), 1);
            assert_eq!(motives[0].motive, MotiveType::Survival);
            // neutral trust 50 -> 100 - 75
            assert_eq!(motives[0].intensity, 25.0);
        }
    }

    #[test]
    fn test_revenge_from_recent_betrayal() {
        let (roster, graph, mut memory) = setup();
        memory.record_event(
            MemoryDraft::new(4, MemoryKind::Betrayal, vec![NpcId(2), NpcId(4)], "flipped the vote")
                .impact(-7.0),
        );
        let config = AutonomyConfig::default();
        let motives = compute_motives(NpcId(2), &roster, &graph, &memory, &config, 5);
        let revenge = motives.iter().find(|m| m.motive == MotiveType::Revenge).unwrap();
        assert_eq!(revenge.intensity, 70.0);
        assert_eq!(revenge.targets, vec![NpcId(4)]);
        assert_eq!(revenge.deadline, Some(7));

        let later = compute_motives(NpcId(2), &roster, &graph, &memory, &config, 9);
        assert!(!kinds(&later).contains(&MotiveType::Revenge));
    }

    #[test]
    fn test_trait_gated_motives() {
        let (roster, graph, memory) = setup();
        let config = AutonomyConfig::default();
        let dex = compute_motives(NpcId(4), &roster, &graph, &memory, &config, 1);
        assert!(kinds(&dex).contains(&MotiveType::Chaos));

        let theo = compute_motives(NpcId(2), &roster, &graph, &memory, &config, 1);
        assert!(kinds(&theo).contains(&MotiveType::AllianceBuilding));
        assert!(!kinds(&theo).contains(&MotiveType::Chaos));

        let lena = compute_motives(NpcId(5), &roster, &graph, &memory, &config, 1);
        assert!(kinds(&lena).contains(&MotiveType::InformationGathering));
    }
}
