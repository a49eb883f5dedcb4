//! Simulation health checks.
//!
//! Advisory only: nothing here mutates state. Warnings flag cast members who
//! have dropped out of the social game and graphs that have saturated.

use serde::{Deserialize, Serialize};

use cast_events::NpcId;
use tracing::debug;

use crate::config::HealthConfig;
use crate::setup::Roster;
use crate::systems::relationships::RelationshipGraph;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthWarningKind {
    /// Member's share of recent interactions is below the floor
    Inactive,
    /// Too many edges pinned at the score extremes
    ExtremeRelationships,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthWarning {
    pub kind: HealthWarningKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub npc: Option<NpcId>,
    pub message: String,
}

/// Runs every check for `day`.
pub fn check_health(
    roster: &Roster,
    graph: &RelationshipGraph,
    config: &HealthConfig,
    day: u32,
) -> Vec<HealthWarning> {
    let mut warnings = activity_floor(roster, graph, config, day);
    warnings.extend(extreme_share(graph, config));
    for warning in &warnings {
        debug!(kind = ?warning.kind, message = %warning.message, "health warning");
    }
    warnings
}

fn activity_floor(
    roster: &Roster,
    graph: &RelationshipGraph,
    config: &HealthConfig,
    day: u32,
) -> Vec<HealthWarning> {
    let counts: Vec<(NpcId, usize)> = roster
        .autonomous_ids()
        .filter(|id| !graph.is_eliminated(*id))
        .map(|id| {
            let n = graph
                .outgoing(id)
                .flat_map(|e| e.history.iter())
                .filter(|r| day.saturating_sub(r.day) <= config.activity_window_days)
                .count();
            (id, n)
        })
        .collect();
    let total: usize = counts.iter().map(|(_, n)| n).sum();
    if total == 0 {
        return Vec::new();
    }

    counts
        .into_iter()
        .filter(|(_, n)| (*n as f32 / total as f32) < config.min_activity_share)
        .map(|(id, n)| HealthWarning {
            kind: HealthWarningKind::Inactive,
            npc: Some(id),
            message: format!(
                "{} took part in {} of {} recent interactions",
                roster.name(id),
                n,
                total
            ),
        })
        .collect()
}

fn extreme_share(graph: &RelationshipGraph, config: &HealthConfig) -> Option<HealthWarning> {
    let (mut edges, mut extreme) = (0usize, 0usize);
    for edge in graph.edges() {
        edges += 1;
        if edge.trust.abs() >= config.extreme_threshold || edge.suspicion >= config.extreme_threshold {
            extreme += 1;
        }
    }
    if edges == 0 {
        return None;
    }
    let share = extreme as f32 / edges as f32;
    (share > config.max_extreme_share).then(|| HealthWarning {
        kind: HealthWarningKind::ExtremeRelationships,
        npc: None,
        message: format!("{:.0}% of relationships are at an extreme", share * 100.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::InteractionKind;
    use crate::config::RelationshipConfig;
    use cast_events::fixtures::sample_cast;

    fn setup() -> (Roster, RelationshipGraph) {
        let roster = Roster::new(sample_cast());
        let graph = RelationshipGraph::new(&roster, RelationshipConfig::default());
        (roster, graph)
    }

    #[test]
    fn test_fresh_cast_is_healthy() {
        let (roster, graph) = setup();
        assert!(check_health(&roster, &graph, &HealthConfig::default(), 1).is_empty());
    }

    #[test]
    fn test_sidelined_member_is_flagged() {
        let (roster, mut graph) = setup();
        for day in 1..4 {
            for (a, b) in [(1, 2), (2, 3), (3, 4), (4, 1)] {
                graph.update(NpcId(a), NpcId(b), 1.0, 0.0, 0.0, InteractionKind::Conversation, "", day);
            }
        }
        let warnings = check_health(&roster, &graph, &HealthConfig::default(), 3);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, HealthWarningKind::Inactive);
        assert_eq!(warnings[0].npc, Some(NpcId(5)));
    }

    #[test]
    fn test_saturated_graph_is_flagged() {
        let (roster, mut graph) = setup();
        let ids: Vec<NpcId> = roster.ids().collect();
        for a in &ids {
            for b in &ids {
                graph.update(*a, *b, -100.0, 100.0, 0.0, InteractionKind::Conflict, "", 20);
            }
        }
        let warnings = check_health(&roster, &graph, &HealthConfig::default(), 20);
        assert!(warnings
            .iter()
            .any(|w| w.kind == HealthWarningKind::ExtremeRelationships));
    }
}
