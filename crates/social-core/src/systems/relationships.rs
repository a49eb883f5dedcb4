//! Relationship Graph
//!
//! Directed, asymmetric weighted graph of trust, suspicion and closeness. Every
//! ordered pair of cast members has its own edge, created at initialization and
//! never removed. Updates to one direction trigger a smaller mirrored update to
//! the other inside the same `&mut self` call.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use cast_events::{NpcId, SocialStanding};
use tracing::{debug, info, warn};

use crate::components::{InteractionKind, InteractionRecord, Relationship};
use crate::config::RelationshipConfig;
use crate::setup::Roster;

/// Deltas actually applied to the forward edge after scaling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AppliedDelta {
    pub trust: f32,
    pub suspicion: f32,
    pub closeness: f32,
}

/// The graph itself. Edges are stored densely, indexed by `source * n + target`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelationshipGraph {
    #[serde(skip)]
    config: RelationshipConfig,
    size: usize,
    edges: Vec<Relationship>,
    #[serde(default)]
    last_decay_day: Option<u32>,
    #[serde(default)]
    eliminated: BTreeSet<NpcId>,
}

impl RelationshipGraph {
    /// Creates an edge for every ordered pair of the roster.
    pub fn new(roster: &Roster, config: RelationshipConfig) -> Self {
        let size = roster.len();
        let mut edges = Vec::with_capacity(size * size);
        for source in roster.ids() {
            let paranoia = roster.personality(source).paranoia;
            for target in roster.ids() {
                edges.push(Relationship::new(
                    source,
                    target,
                    config.default_trust,
                    config.default_suspicion + paranoia * config.paranoia_suspicion,
                    config.default_closeness,
                ));
            }
        }
        Self {
            config,
            size,
            edges,
            last_decay_day: None,
            eliminated: BTreeSet::new(),
        }
    }

    pub fn set_config(&mut self, config: RelationshipConfig) {
        self.config = config;
    }

    pub fn config(&self) -> &RelationshipConfig {
        &self.config
    }

    /// Number of members the graph was built for.
    pub fn member_count(&self) -> usize {
        self.size
    }

    /// Edge storage holds exactly one slot per ordered pair.
    pub fn is_well_formed(&self) -> bool {
        self.edges.len() == self.size * self.size
    }

    fn index(&self, source: NpcId, target: NpcId) -> Option<usize> {
        let (s, t) = (source.index(), target.index());
        (s < self.size && t < self.size && s != t).then_some(s * self.size + t)
    }

    pub fn get(&self, source: NpcId, target: NpcId) -> Option<&Relationship> {
        self.index(source, target).map(|i| &self.edges[i])
    }

    fn get_mut(&mut self, source: NpcId, target: NpcId) -> Option<&mut Relationship> {
        self.index(source, target).map(move |i| &mut self.edges[i])
    }

    /// All directed edges, self-pairs excluded.
    pub fn edges(&self) -> impl Iterator<Item = &Relationship> {
        self.edges.iter().filter(|e| e.source != e.target)
    }

    pub fn outgoing(&self, source: NpcId) -> impl Iterator<Item = &Relationship> {
        self.edges().filter(move |e| e.source == source)
    }

    pub fn incoming(&self, target: NpcId) -> impl Iterator<Item = &Relationship> {
        self.edges().filter(move |e| e.target == target)
    }

    pub fn allies(&self, npc: NpcId) -> Vec<NpcId> {
        self.outgoing(npc)
            .filter(|e| e.in_alliance)
            .map(|e| e.target)
            .collect()
    }

    pub fn is_eliminated(&self, npc: NpcId) -> bool {
        self.eliminated.contains(&npc)
    }

    /// Applies an interaction from `source` toward `target` plus the mirrored
    /// update on the reverse edge. Returns the scaled forward deltas.
    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &mut self,
        source: NpcId,
        target: NpcId,
        trust: f32,
        suspicion: f32,
        closeness: f32,
        kind: InteractionKind,
        description: &str,
        day: u32,
    ) -> Option<AppliedDelta> {
        let Some(reverse_idx) = self.index(target, source) else {
            warn!(%source, %target, "relationship update for unknown pair");
            return None;
        };
        let cfg = self.config.clone();
        let forward = self.get_mut(source, target)?;

        let (recent, recent_negative) = forward.recent_counts(day, cfg.recent_window_days);
        let mut adjusted_trust = trust;
        if trust > 0.0 {
            if day <= cfg.early_game_days {
                adjusted_trust *= cfg.early_gain_multiplier;
            }
            adjusted_trust /= 1.0 + cfg.diminishing_factor * recent as f32;
        } else if trust < 0.0 {
            adjusted_trust *=
                cfg.loss_multiplier * (1.0 + cfg.compounding_factor * recent_negative as f32);
        }

        forward.apply(adjusted_trust, suspicion, closeness);
        forward.last_interaction_day = day;
        forward.push_history(InteractionRecord {
            day,
            kind,
            impact: adjusted_trust,
            description: description.to_string(),
            received: false,
        });

        let reverse = &mut self.edges[reverse_idx];
        let mirrored_trust = adjusted_trust * cfg.mirror_trust;
        reverse.apply(
            mirrored_trust,
            suspicion * cfg.mirror_suspicion,
            closeness * cfg.mirror_closeness,
        );
        reverse.last_interaction_day = day;
        reverse.push_history(InteractionRecord {
            day,
            kind,
            impact: mirrored_trust,
            description: description.to_string(),
            received: true,
        });

        debug!(
            %source, %target, trust = adjusted_trust, suspicion, closeness, ?kind,
            "relationship updated"
        );

        Some(AppliedDelta {
            trust: adjusted_trust,
            suspicion,
            closeness,
        })
    }

    /// Marks `a` and `b` as allied in both directions.
    pub fn form_alliance(&mut self, a: NpcId, b: NpcId, strength: f32, day: u32) -> bool {
        if self.index(a, b).is_none() {
            return false;
        }
        for (s, t) in [(a, b), (b, a)] {
            if let Some(edge) = self.get_mut(s, t) {
                edge.in_alliance = true;
                edge.alliance_strength = strength.clamp(0.0, 100.0);
                edge.last_interaction_day = day;
                edge.push_history(InteractionRecord {
                    day,
                    kind: InteractionKind::AllianceFormed,
                    impact: 0.0,
                    description: "alliance formed".to_string(),
                    received: s == b,
                });
            }
        }
        info!(%a, %b, strength, day, "alliance formed");
        true
    }

    /// Dissolves an alliance. The betrayed side loses more trust and gains more
    /// suspicion than the betrayer. Returns false when the pair was not allied.
    pub fn break_alliance(&mut self, betrayer: NpcId, betrayed: NpcId, level: f32, day: u32) -> bool {
        let allied = self.get(betrayer, betrayed).is_some_and(|e| e.in_alliance)
            || self.get(betrayed, betrayer).is_some_and(|e| e.in_alliance);
        if !allied {
            return false;
        }
        let level = level.max(0.0);
        let changes = [
            (betrayed, betrayer, -1.2 * level, 0.6 * level, false),
            (betrayer, betrayed, -1.0 * level, 0.3 * level, true),
        ];
        for (s, t, trust, suspicion, received) in changes {
            if let Some(edge) = self.get_mut(s, t) {
                edge.in_alliance = false;
                edge.alliance_strength = 0.0;
                edge.apply(trust, suspicion, 0.0);
                edge.last_interaction_day = day;
                edge.push_history(InteractionRecord {
                    day,
                    kind: InteractionKind::AllianceBroken,
                    impact: trust,
                    description: "alliance broken".to_string(),
                    received,
                });
            }
        }
        info!(%betrayer, %betrayed, level, day, "alliance broken");
        true
    }

    /// Pulls silent edges back toward neutral. Repeated calls for the same day
    /// are no-ops. Returns the number of edges touched.
    pub fn decay(&mut self, day: u32) -> usize {
        if self.last_decay_day == Some(day) {
            return 0;
        }
        self.last_decay_day = Some(day);

        let cfg = self.config.clone();
        let mut touched = 0;
        for edge in self.edges.iter_mut().filter(|e| e.source != e.target) {
            let silence = edge.days_silent(day);
            if silence <= cfg.decay_grace_days {
                continue;
            }
            let step = (cfg.decay_rate * (silence - cfg.decay_grace_days) as f32).min(cfg.decay_max_step);
            let before = (edge.trust, edge.suspicion, edge.closeness);

            if edge.trust > cfg.neutral_trust_high {
                edge.trust = (edge.trust - step).max(cfg.neutral_trust_high);
            } else if edge.trust < cfg.neutral_trust_low {
                edge.trust = (edge.trust + step).min(cfg.neutral_trust_low);
            }
            if edge.suspicion > cfg.suspicion_midpoint {
                edge.suspicion = (edge.suspicion - step).max(cfg.suspicion_midpoint);
            }
            if edge.closeness >= cfg.close_threshold {
                if edge.is_healthy() {
                    edge.closeness += 1.0;
                } else {
                    edge.closeness -= step / 2.0;
                }
            }
            edge.clamp();

            if before != (edge.trust, edge.suspicion, edge.closeness) {
                touched += 1;
            }
        }
        debug!(day, touched, "relationship decay");
        touched
    }

    /// Applies revealed votes: voters and targets sour on each other, co-voters
    /// warm up. `eliminated` is recorded as out of the game.
    pub fn voting_update(&mut self, votes: &[(NpcId, NpcId)], eliminated: Option<NpcId>, day: u32) {
        for &(voter, target) in votes {
            self.apply_direct(voter, target, -15.0, 10.0, 0.0, InteractionKind::Vote, "voted against", day);
            self.apply_direct(target, voter, -20.0, 15.0, 0.0, InteractionKind::Vote, "was voted against by", day);
        }

        for (i, &(a, target_a)) in votes.iter().enumerate() {
            for &(b, target_b) in votes.iter().skip(i + 1) {
                if target_a == target_b && a != b {
                    self.apply_direct(a, b, 5.0, 0.0, 3.0, InteractionKind::Vote, "voted together", day);
                    self.apply_direct(b, a, 5.0, 0.0, 3.0, InteractionKind::Vote, "voted together", day);
                }
            }
        }

        if let Some(out) = eliminated {
            self.eliminated.insert(out);
            info!(eliminated = %out, day, "cast member eliminated");
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn apply_direct(
        &mut self,
        source: NpcId,
        target: NpcId,
        trust: f32,
        suspicion: f32,
        closeness: f32,
        kind: InteractionKind,
        description: &str,
        day: u32,
    ) {
        if let Some(edge) = self.get_mut(source, target) {
            edge.apply(trust, suspicion, closeness);
            edge.last_interaction_day = day;
            edge.push_history(InteractionRecord {
                day,
                kind,
                impact: trust,
                description: description.to_string(),
                received: false,
            });
        }
    }

    /// Aggregate standing of `npc` in the eyes of everyone else.
    pub fn social_standing(&self, npc: NpcId) -> SocialStanding {
        let incoming: Vec<&Relationship> = self
            .incoming(npc)
            .filter(|e| !self.eliminated.contains(&e.source))
            .collect();
        let n = incoming.len().max(1) as f32;
        let avg_trust = incoming.iter().map(|e| e.trust).sum::<f32>() / n;
        let avg_suspicion = incoming.iter().map(|e| e.suspicion).sum::<f32>() / n;
        let avg_closeness = incoming.iter().map(|e| e.closeness).sum::<f32>() / n;
        let alliance_count = self.allies(npc).len() as u32;

        let social_power = (0.5 * (avg_trust + 100.0) / 2.0 + 10.0 * alliance_count as f32
            - 0.3 * avg_suspicion
            + 0.2 * avg_closeness)
            .clamp(0.0, 100.0);

        SocialStanding {
            npc,
            avg_trust,
            avg_suspicion,
            alliance_count,
            social_power,
        }
    }

    /// Average trust `npc` receives from everyone else.
    pub fn incoming_avg_trust(&self, npc: NpcId) -> f32 {
        average(self.incoming(npc).map(|e| e.trust))
    }

    pub fn outgoing_avg_trust(&self, npc: NpcId) -> f32 {
        average(self.outgoing(npc).map(|e| e.trust))
    }

    pub fn outgoing_avg_suspicion(&self, npc: NpcId) -> f32 {
        average(self.outgoing(npc).map(|e| e.suspicion))
    }
}

fn average(values: impl Iterator<Item = f32>) -> f32 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f32
    }
}
