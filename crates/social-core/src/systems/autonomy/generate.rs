//! Candidate decisions enumerated from each motive.

use rand::Rng;

use cast_events::{DecisionType, MotiveType, NpcId};
use narrator::{NarrationTemplates, Slot, SlotValues};
use tracing::debug;

use crate::components::NpcMotive;
use crate::setup::Roster;
use crate::systems::relationships::RelationshipGraph;

/// A decision an NPC could take this tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub decision: DecisionType,
    pub target: NpcId,
    pub subject: Option<NpcId>,
    pub motive: MotiveType,
    pub urgency: f32,
    pub content: String,
}

/// Everything candidate generation reads.
pub struct CandidateContext<'a> {
    pub roster: &'a Roster,
    pub graph: &'a RelationshipGraph,
    pub templates: &'a NarrationTemplates,
}

impl CandidateContext<'_> {
    fn candidate<R: Rng + ?Sized>(
        &self,
        npc: NpcId,
        motive: &NpcMotive,
        decision: DecisionType,
        target: NpcId,
        subject: Option<NpcId>,
        rng: &mut R,
    ) -> Candidate {
        let mut values = SlotValues::new()
            .with(Slot::Speaker, self.roster.first_name(npc))
            .with(Slot::Target, self.roster.first_name(target));
        if let Some(subject) = subject {
            values.set(Slot::Subject, self.roster.first_name(subject));
        }
        let content = self
            .templates
            .decision_line(decision, &values, rng.gen())
            .unwrap_or_else(|err| {
                debug!(%err, decision = decision.as_str(), "decision template fell back");
                format!(
                    "{} decides to {} {}",
                    self.roster.first_name(npc),
                    decision.as_str().replace('_', " "),
                    self.roster.first_name(target)
                )
            });
        Candidate {
            decision,
            target,
            subject,
            motive: motive.motive,
            urgency: motive.intensity,
            content,
        }
    }
}

/// Enumerates decisions for every motive of `npc`.
pub fn candidate_decisions<R: Rng + ?Sized>(
    npc: NpcId,
    motives: &[NpcMotive],
    ctx: &CandidateContext<'_>,
    rng: &mut R,
) -> Vec<Candidate> {
    let p = ctx.roster.personality(npc);
    let allies = ctx.graph.allies(npc);
    let ranked = super::motives::by_trust(npc, ctx.roster, ctx.graph);
    let most_trusted_non_ally = ranked
        .iter()
        .map(|(id, _)| *id)
        .find(|id| !allies.contains(id));

    let mut out = Vec::new();
    for motive in motives {
        let Some(primary) = motive.primary_target() else {
            continue;
        };
        let secondary = motive.targets.get(1).copied();
        match motive.motive {
            MotiveType::Survival => {
                if let Some(friend) = most_trusted_non_ally {
                    out.push(ctx.candidate(npc, motive, DecisionType::ProposeAlliance, friend, None, rng));
                    out.push(ctx.candidate(npc, motive, DecisionType::SendDm, friend, None, rng));
                }
                if motive.intensity > 60.0 {
                    out.push(ctx.candidate(npc, motive, DecisionType::Scheme, primary, None, rng));
                }
            }
            MotiveType::Revenge => {
                out.push(ctx.candidate(npc, motive, DecisionType::Confront, primary, None, rng));
                if let Some(audience) = ranked.iter().map(|(id, _)| *id).find(|id| *id != primary) {
                    out.push(ctx.candidate(
                        npc,
                        motive,
                        DecisionType::SpreadRumor,
                        audience,
                        Some(primary),
                        rng,
                    ));
                }
                if allies.contains(&primary) {
                    out.push(ctx.candidate(npc, motive, DecisionType::Betray, primary, None, rng));
                }
            }
            MotiveType::Romance => {
                out.push(ctx.candidate(npc, motive, DecisionType::Flirt, primary, None, rng));
                out.push(ctx.candidate(npc, motive, DecisionType::SendDm, primary, None, rng));
            }
            MotiveType::AllianceBuilding => {
                out.push(ctx.candidate(npc, motive, DecisionType::ProposeAlliance, primary, None, rng));
                out.push(ctx.candidate(npc, motive, DecisionType::SendDm, primary, None, rng));
            }
            MotiveType::InformationGathering => {
                out.push(ctx.candidate(npc, motive, DecisionType::SendDm, primary, secondary, rng));
            }
            MotiveType::Chaos => {
                if let Some(victim) = secondary.filter(|v| *v != primary) {
                    out.push(ctx.candidate(
                        npc,
                        motive,
                        DecisionType::SpreadRumor,
                        primary,
                        Some(victim),
                        rng,
                    ));
                    out.push(ctx.candidate(npc, motive, DecisionType::Scheme, victim, None, rng));
                    if p.aggressiveness > 70.0 {
                        out.push(ctx.candidate(npc, motive, DecisionType::Confront, victim, None, rng));
                    }
                }
                if p.manipulation > 80.0 {
                    if let Some(ally) = allies.first() {
                        out.push(ctx.candidate(npc, motive, DecisionType::Betray, *ally, None, rng));
                    }
                }
            }
        }
    }
    out
}
