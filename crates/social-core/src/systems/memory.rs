//! Memory Engine
//!
//! Private journals, the shared event log with weekly buckets, and the gossip
//! network. Memory events are immutable once recorded; relayed gossip creates
//! a new, less reliable event in the recipient's journal.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};

use cast_events::NpcId;
use tracing::{debug, warn};

use crate::components::{
    MemoryEvent, MemoryKind, MemorySource, PersonalityProfile, PrivateJournal, Promise,
    PromiseStatus, Secret, VotingPlan,
};
use crate::setup::Roster;

/// Cap on the shared event log.
pub const MAX_GLOBAL_LOG: usize = 500;
/// Cap on the gossip ledger; the oldest relays are forgotten first.
pub const MAX_GOSSIP_RECORDS: usize = MAX_GLOBAL_LOG;
/// Reliability multiplier applied at every gossip hop.
pub const GOSSIP_RELIABILITY_DECAY: f32 = 0.7;
/// Maximum lines returned by `generate_personal_notes`.
pub const MAX_PERSONAL_NOTES: usize = 5;

const DAYS_PER_WEEK: u32 = 7;

/// Fields of a memory about to be recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryDraft {
    pub day: u32,
    pub kind: MemoryKind,
    pub participants: Vec<NpcId>,
    pub content: String,
    pub emotional_impact: f32,
    pub importance: f32,
}

impl MemoryDraft {
    pub fn new(day: u32, kind: MemoryKind, participants: Vec<NpcId>, content: impl Into<String>) -> Self {
        Self {
            day,
            kind,
            participants,
            content: content.into(),
            emotional_impact: 0.0,
            importance: 5.0,
        }
    }

    pub fn impact(mut self, emotional_impact: f32) -> Self {
        self.emotional_impact = emotional_impact;
        self
    }

    pub fn importance(mut self, importance: f32) -> Self {
        self.importance = importance;
        self
    }
}

/// One hop of a rumor through the cast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GossipRecord {
    /// Memory id created in the recipient's journal
    pub memory_id: u64,
    /// Firsthand memory the rumor started from
    pub origin_id: u64,
    pub from: NpcId,
    pub to: NpcId,
    pub day: u32,
    pub reliability: f32,
    /// Everyone the item passed through, origin holder first
    pub chain: Vec<NpcId>,
}

/// Compound journal filter. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryQuery {
    pub participant: Option<NpcId>,
    pub kinds: Vec<MemoryKind>,
    pub day_range: Option<(u32, u32)>,
    pub min_importance: Option<f32>,
    pub min_reliability: Option<f32>,
    pub limit: Option<usize>,
}

impl MemoryQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn participant(mut self, npc: NpcId) -> Self {
        self.participant = Some(npc);
        self
    }

    pub fn kinds(mut self, kinds: &[MemoryKind]) -> Self {
        self.kinds = kinds.to_vec();
        self
    }

    pub fn days(mut self, start: u32, end: u32) -> Self {
        self.day_range = Some((start.min(end), start.max(end)));
        self
    }

    pub fn min_importance(mut self, value: f32) -> Self {
        self.min_importance = Some(value);
        self
    }

    pub fn min_reliability(mut self, value: f32) -> Self {
        self.min_reliability = Some(value);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn matches(&self, event: &MemoryEvent) -> bool {
        if let Some(npc) = self.participant {
            if !event.involves(npc) {
                return false;
            }
        }
        if !self.kinds.is_empty() && !self.kinds.contains(&event.kind) {
            return false;
        }
        if let Some((start, end)) = self.day_range {
            if event.day < start || event.day > end {
                return false;
            }
        }
        if self.min_importance.is_some_and(|min| event.importance < min) {
            return false;
        }
        if self.min_reliability.is_some_and(|min| event.reliability < min) {
            return false;
        }
        true
    }
}

/// Result of a journal query, newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemorySearchResult {
    pub npc: NpcId,
    pub memories: Vec<MemoryEvent>,
    /// Matches before `limit` was applied
    pub total_matches: usize,
}

/// Journals, shared log and gossip network for the whole cast.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryEngine {
    next_id: u64,
    journals: BTreeMap<NpcId, PrivateJournal>,
    global_log: VecDeque<MemoryEvent>,
    /// week number (day / 7) -> memory ids still in the global log
    weekly: BTreeMap<u32, Vec<u64>>,
    gossip: VecDeque<GossipRecord>,
}

impl MemoryEngine {
    /// Opens one journal per cast member.
    pub fn new(roster: &Roster) -> Self {
        let journals = roster
            .ids()
            .map(|id| {
                let personality = roster.personality(id);
                let journal =
                    PrivateJournal::new(id, strategy_for(&personality), goals_for(&personality));
                (id, journal)
            })
            .collect();
        Self {
            next_id: 1,
            journals,
            ..Self::default()
        }
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        id
    }

    pub fn journal(&self, npc: NpcId) -> Option<&PrivateJournal> {
        self.journals.get(&npc)
    }

    pub fn global_log(&self) -> impl Iterator<Item = &MemoryEvent> {
        self.global_log.iter()
    }

    pub fn gossip_records(&self) -> impl Iterator<Item = &GossipRecord> {
        self.gossip.iter()
    }

    /// Appends a firsthand memory to the shared log, its weekly bucket and
    /// each participant's journal. Returns the memory id.
    pub fn record_event(&mut self, draft: MemoryDraft) -> u64 {
        let id = self.allocate_id();
        let mut participants = draft.participants;
        participants.dedup();
        let event = MemoryEvent {
            id,
            day: draft.day,
            kind: draft.kind,
            participants,
            content: draft.content,
            emotional_impact: draft.emotional_impact.clamp(-10.0, 10.0),
            importance: draft.importance.clamp(0.0, 10.0),
            reliability: 1.0,
            source: MemorySource::Firsthand,
        };

        for npc in &event.participants {
            if let Some(journal) = self.journals.get_mut(npc) {
                journal.push_entry(event.clone());
            }
        }

        self.weekly.entry(event.day / DAYS_PER_WEEK).or_default().push(id);
        self.global_log.push_back(event);
        while self.global_log.len() > MAX_GLOBAL_LOG {
            if let Some(old) = self.global_log.pop_front() {
                let week = old.day / DAYS_PER_WEEK;
                if let Some(bucket) = self.weekly.get_mut(&week) {
                    bucket.retain(|m| *m != old.id);
                    if bucket.is_empty() {
                        self.weekly.remove(&week);
                    }
                }
            }
        }
        id
    }

    /// Shared-log events in `[start, end]`, read through the weekly buckets.
    pub fn events_between(&self, start: u32, end: u32) -> Vec<&MemoryEvent> {
        let weeks = (start / DAYS_PER_WEEK)..=(end / DAYS_PER_WEEK);
        let ids: Vec<u64> = self
            .weekly
            .range(weeks)
            .flat_map(|(_, ids)| ids.iter().copied())
            .collect();
        self.global_log
            .iter()
            .filter(|e| ids.contains(&e.id) && e.day >= start && e.day <= end)
            .collect()
    }

    /// Journal entries of `npc` from the last `window` days.
    pub fn recent_memories(&self, npc: NpcId, day: u32, window: u32) -> Vec<&MemoryEvent> {
        self.journals
            .get(&npc)
            .map(|j| {
                j.entries
                    .iter()
                    .filter(|e| day.saturating_sub(e.day) <= window && e.day <= day)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn update_voting_plan(
        &mut self,
        npc: NpcId,
        target: NpcId,
        backup: Option<NpcId>,
        reason: impl Into<String>,
        day: u32,
    ) -> bool {
        match self.journals.get_mut(&npc) {
            Some(journal) => {
                journal.voting_plan = Some(VotingPlan {
                    target,
                    backup,
                    reason: reason.into(),
                    day,
                });
                true
            }
            None => false,
        }
    }

    /// Records a promise from `from` to `to`. Both remember it.
    pub fn record_promise(
        &mut self,
        from: NpcId,
        to: NpcId,
        content: impl Into<String>,
        day: u32,
    ) -> Option<u64> {
        if !self.journals.contains_key(&from) {
            return None;
        }
        let content = content.into();
        let id = self.record_event(
            MemoryDraft::new(day, MemoryKind::Promise, vec![from, to], content.clone())
                .impact(2.0)
                .importance(6.0),
        );
        if let Some(journal) = self.journals.get_mut(&from) {
            journal.promises.push(Promise {
                id,
                to,
                content,
                day,
                status: PromiseStatus::Open,
            });
        }
        Some(id)
    }

    /// Marks a promise kept or broken. Broken promises leave a betrayal memory
    /// and sour the recipient's bond.
    pub fn resolve_promise(&mut self, owner: NpcId, promise_id: u64, kept: bool, day: u32) -> bool {
        let Some(journal) = self.journals.get_mut(&owner) else {
            return false;
        };
        let Some(promise) = journal
            .promises
            .iter_mut()
            .find(|p| p.id == promise_id && p.status == PromiseStatus::Open)
        else {
            return false;
        };
        promise.status = if kept {
            PromiseStatus::Kept
        } else {
            PromiseStatus::Broken
        };
        let to = promise.to;
        let content = promise.content.clone();

        if kept {
            self.update_personal_bond(to, owner, 2.0);
        } else {
            self.update_personal_bond(to, owner, -4.0);
            self.update_threat_assessment(to, owner, 1.5);
            self.record_event(
                MemoryDraft::new(day, MemoryKind::Betrayal, vec![to, owner], format!("broke a promise: {}", content))
                    .impact(-6.0)
                    .importance(8.0),
            );
        }
        true
    }

    /// Stores a secret in its owner's journal.
    pub fn record_secret(
        &mut self,
        owner: NpcId,
        content: impl Into<String>,
        about: Option<NpcId>,
        day: u32,
    ) -> Option<u64> {
        if !self.journals.contains_key(&owner) {
            return None;
        }
        let id = self.allocate_id();
        if let Some(journal) = self.journals.get_mut(&owner) {
            journal.secrets.push(Secret {
                id,
                owner,
                content: content.into(),
                about,
                known_by: [owner].into_iter().collect(),
                day,
            });
        }
        Some(id)
    }

    fn find_secret_mut(&mut self, secret_id: u64) -> Option<&mut Secret> {
        self.journals
            .values_mut()
            .flat_map(|j| j.secrets.iter_mut())
            .find(|s| s.id == secret_id)
    }

    pub fn secret(&self, secret_id: u64) -> Option<&Secret> {
        self.secrets().find(|s| s.id == secret_id)
    }

    /// Every secret in the cast, ordered by owner.
    pub fn secrets(&self) -> impl Iterator<Item = &Secret> {
        self.journals.values().flat_map(|j| j.secrets.iter())
    }

    /// Shares a secret `from` already knows with `to`.
    pub fn share_secret(&mut self, secret_id: u64, from: NpcId, to: NpcId, day: u32) -> bool {
        if !self.journals.contains_key(&to) {
            return false;
        }
        let Some(secret) = self.find_secret_mut(secret_id) else {
            return false;
        };
        if !secret.known_by.contains(&from) || secret.known_by.contains(&to) {
            return false;
        }
        secret.known_by.insert(to);
        let content = secret.content.clone();
        let mut participants = vec![to, from];
        if let Some(about) = secret.about {
            participants.push(about);
        }

        self.record_event(
            MemoryDraft::new(day, MemoryKind::Secret, participants, content)
                .impact(1.0)
                .importance(7.0),
        );
        self.update_personal_bond(to, from, 1.0);
        true
    }

    /// Relays a memory `from` holds to `to`. Returns the new memory id, or
    /// `None` when the sender doesn't know it or the recipient already does.
    pub fn spread_gossip(&mut self, memory_id: u64, from: NpcId, to: NpcId, day: u32) -> Option<u64> {
        if from == to {
            return None;
        }
        let original = self
            .journals
            .get(&from)?
            .entries
            .iter()
            .find(|e| e.id == memory_id)?
            .clone();

        let parent = self.gossip.iter().find(|g| g.memory_id == memory_id).cloned();
        let origin_id = parent.as_ref().map(|g| g.origin_id).unwrap_or(memory_id);

        let recipient = self.journals.get(&to)?;
        let already_heard = recipient.knows(memory_id)
            || recipient.knows(origin_id)
            || self.gossip.iter().any(|g| g.to == to && g.origin_id == origin_id);
        if already_heard {
            debug!(memory_id, %from, %to, "gossip skipped, recipient already knows");
            return None;
        }

        let reliability = (original.reliability * GOSSIP_RELIABILITY_DECAY).clamp(0.0, 1.0);
        let id = self.allocate_id();
        let event = MemoryEvent {
            id,
            day,
            kind: original.kind,
            participants: original.participants.clone(),
            content: original.content.clone(),
            emotional_impact: original.emotional_impact * reliability,
            importance: original.importance,
            reliability,
            source: MemorySource::Gossip { from },
        };
        if let Some(journal) = self.journals.get_mut(&to) {
            journal.push_entry(event);
        }

        let mut chain = parent.map(|g| g.chain).unwrap_or_else(|| vec![from]);
        chain.push(to);
        self.gossip.push_back(GossipRecord {
            memory_id: id,
            origin_id,
            from,
            to,
            day,
            reliability,
            chain,
        });
        while self.gossip.len() > MAX_GOSSIP_RECORDS {
            self.gossip.pop_front();
        }
        Some(id)
    }

    /// Adjusts how threatening `npc` considers `about` (0 to 10).
    pub fn update_threat_assessment(&mut self, npc: NpcId, about: NpcId, delta: f32) {
        match self.journals.get_mut(&npc) {
            Some(journal) => {
                let value = journal.threat_assessment.entry(about).or_insert(0.0);
                *value = (*value + delta).clamp(0.0, 10.0);
            }
            None => warn!(%npc, "threat update for unknown journal"),
        }
    }

    /// Adjusts the personal bond `npc` feels toward `about` (-10 to 10).
    pub fn update_personal_bond(&mut self, npc: NpcId, about: NpcId, delta: f32) {
        match self.journals.get_mut(&npc) {
            Some(journal) => {
                let value = journal.personal_bonds.entry(about).or_insert(0.0);
                *value = (*value + delta).clamp(-10.0, 10.0);
            }
            None => warn!(%npc, "bond update for unknown journal"),
        }
    }

    /// Filters `npc`'s journal. Always newest first.
    pub fn query_memory(&self, npc: NpcId, query: &MemoryQuery) -> MemorySearchResult {
        let mut memories: Vec<MemoryEvent> = self
            .journals
            .get(&npc)
            .map(|j| j.entries.iter().filter(|e| query.matches(e)).cloned().collect())
            .unwrap_or_default();
        memories.sort_by(|a, b| b.day.cmp(&a.day).then(b.id.cmp(&a.id)));
        let total_matches = memories.len();
        if let Some(limit) = query.limit {
            memories.truncate(limit);
        }
        MemorySearchResult {
            npc,
            memories,
            total_matches,
        }
    }

    /// Up to five reminders from open promises, serious threats and strong bonds.
    pub fn generate_personal_notes(&self, npc: NpcId, roster: &Roster) -> Vec<String> {
        let Some(journal) = self.journals.get(&npc) else {
            return Vec::new();
        };
        let mut notes = Vec::new();
        for promise in journal.open_promises() {
            notes.push(format!(
                "I promised {}: {}",
                roster.first_name(promise.to),
                promise.content
            ));
        }
        for (other, threat) in &journal.threat_assessment {
            if *threat > 7.0 {
                notes.push(format!("{} is a serious threat", roster.first_name(*other)));
            }
        }
        for (other, bond) in &journal.personal_bonds {
            if *bond > 3.0 {
                notes.push(format!("I can count on {}", roster.first_name(*other)));
            } else if *bond < -3.0 {
                notes.push(format!("I don't trust {} one bit", roster.first_name(*other)));
            }
        }
        notes.truncate(MAX_PERSONAL_NOTES);
        notes
    }
}

fn strategy_for(p: &PersonalityProfile) -> &'static str {
    if p.manipulation >= 70.0 {
        "play every side and control the information"
    } else if p.loyalty >= 70.0 {
        "build one tight alliance and stay loyal to it"
    } else if p.aggressiveness >= 70.0 {
        "take out the biggest threats early"
    } else if p.paranoia >= 70.0 {
        "trust no one and watch for betrayal"
    } else if p.charisma >= 70.0 {
        "stay well liked by the whole house"
    } else {
        "stay under the radar"
    }
}

fn goals_for(p: &PersonalityProfile) -> Vec<String> {
    let mut goals = vec!["make it to the final vote".to_string()];
    if p.intelligence >= 70.0 {
        goals.push("learn where every vote is going".to_string());
    }
    if p.charisma >= 70.0 {
        goals.push("keep a wide circle of friends".to_string());
    }
    if p.loyalty >= 70.0 {
        goals.push("protect my allies".to_string());
    }
    if p.risk_tolerance >= 70.0 {
        goals.push("make a big move".to_string());
    }
    goals
}

#[cfg(test)]
mod tests {
    use super::*;
    use cast_events::CastMember;

    fn roster() -> Roster {
        Roster::new(vec![
            CastMember::new(0, "Jordan").as_player(),
            CastMember::new(1, "Mira").with_dispositions(["schemer", "strategic"]),
            CastMember::new(2, "Theo").with_dispositions(["loyal"]),
            CastMember::new(3, "Dex"),
        ])
    }

    fn conflict(day: u32) -> MemoryDraft {
        MemoryDraft::new(day, MemoryKind::Conflict, vec![NpcId(1), NpcId(2)], "shouting match")
            .impact(-5.0)
            .importance(7.0)
    }

    #[test]
    fn test_journals_derive_strategy() {
        let engine = MemoryEngine::new(&roster());
        assert_eq!(
            engine.journal(NpcId(1)).unwrap().strategy,
            "play every side and control the information"
        );
        assert!(engine
            .journal(NpcId(2))
            .unwrap()
            .goals
            .contains(&"protect my allies".to_string()));
    }

    #[test]
    fn test_record_event_reaches_participants_only() {
        let mut engine = MemoryEngine::new(&roster());
        let id = engine.record_event(conflict(3));
        assert!(engine.journal(NpcId(1)).unwrap().knows(id));
        assert!(engine.journal(NpcId(2)).unwrap().knows(id));
        assert!(!engine.journal(NpcId(3)).unwrap().knows(id));
        assert_eq!(engine.events_between(0, 6).len(), 1);
        assert!(engine.events_between(7, 13).is_empty());
    }

    #[test]
    fn test_global_log_is_capped() {
        let mut engine = MemoryEngine::new(&roster());
        for day in 0..(MAX_GLOBAL_LOG as u32 + 20) {
            engine.record_event(conflict(day));
        }
        assert_eq!(engine.global_log().count(), MAX_GLOBAL_LOG);
        assert!(engine.events_between(0, 6).is_empty());
    }

    #[test]
    fn test_gossip_reliability_and_skip() {
        let mut engine = MemoryEngine::new(&roster());
        let id = engine.record_event(conflict(2));

        let relayed = engine.spread_gossip(id, NpcId(1), NpcId(3), 3).unwrap();
        let heard = engine
            .journal(NpcId(3))
            .unwrap()
            .entries
            .iter()
            .find(|e| e.id == relayed)
            .unwrap();
        assert!((heard.reliability - 0.7).abs() < 1e-6);
        assert_eq!(heard.source, MemorySource::Gossip { from: NpcId(1) });

        // Second hop decays again and extends the chain.
        let second = engine.spread_gossip(relayed, NpcId(3), NpcId(0), 4).unwrap();
        let record = engine.gossip_records().find(|g| g.memory_id == second).unwrap();
        assert!((record.reliability - 0.49).abs() < 1e-6);
        assert_eq!(record.chain, vec![NpcId(1), NpcId(3), NpcId(0)]);
        assert_eq!(record.origin_id, id);

        // Theo was there: nothing to relay.
        assert!(engine.spread_gossip(id, NpcId(1), NpcId(2), 4).is_none());
        // Dex already heard it.
        assert!(engine.spread_gossip(id, NpcId(2), NpcId(3), 5).is_none());
    }

    #[test]
    fn test_gossip_ledger_is_capped() {
        let mut engine = MemoryEngine::new(&roster());
        let mut last = None;
        for day in 0..2_000u32 {
            let id = engine.record_event(conflict(day));
            last = engine.spread_gossip(id, NpcId(1), NpcId(3), day);
            assert!(last.is_some());
        }
        assert_eq!(engine.global_log().count(), MAX_GLOBAL_LOG);
        assert_eq!(engine.gossip_records().count(), MAX_GOSSIP_RECORDS);
        let newest = engine.gossip_records().last().map(|g| g.memory_id);
        assert_eq!(newest, last);
    }

    #[test]
    fn test_query_filters_and_order() {
        let mut engine = MemoryEngine::new(&roster());
        engine.record_event(conflict(1));
        engine.record_event(
            MemoryDraft::new(4, MemoryKind::Alliance, vec![NpcId(1), NpcId(3)], "deal").impact(4.0),
        );
        engine.record_event(conflict(6).importance(2.0));

        let all = engine.query_memory(NpcId(1), &MemoryQuery::new());
        let days: Vec<u32> = all.memories.iter().map(|m| m.day).collect();
        assert_eq!(days, vec![6, 4, 1]);

        let result = engine.query_memory(
            NpcId(1),
            &MemoryQuery::new()
                .kinds(&[MemoryKind::Conflict])
                .min_importance(5.0)
                .days(0, 10)
                .limit(5),
        );
        assert_eq!(result.total_matches, 1);
        assert_eq!(result.memories[0].day, 1);

        let limited = engine.query_memory(NpcId(1), &MemoryQuery::new().participant(NpcId(2)).limit(1));
        assert_eq!(limited.total_matches, 2);
        assert_eq!(limited.memories.len(), 1);
        assert_eq!(limited.memories[0].day, 6);
    }

    #[test]
    fn test_promises_and_notes() {
        let roster = roster();
        let mut engine = MemoryEngine::new(&roster);
        let kept = engine.record_promise(NpcId(2), NpcId(1), "vote with you", 2).unwrap();
        let broken = engine.record_promise(NpcId(1), NpcId(2), "keep you safe", 2).unwrap();

        assert!(engine.resolve_promise(NpcId(2), kept, true, 3));
        assert!(engine.resolve_promise(NpcId(1), broken, false, 4));
        assert!(!engine.resolve_promise(NpcId(1), broken, true, 5));

        let theo = engine.journal(NpcId(2)).unwrap();
        assert_eq!(theo.bond(NpcId(1)), -4.0);
        assert!(theo.entries.iter().any(|e| e.kind == MemoryKind::Betrayal));

        engine.update_threat_assessment(NpcId(2), NpcId(1), 9.0);
        engine.update_personal_bond(NpcId(2), NpcId(3), 5.0);
        let notes = engine.generate_personal_notes(NpcId(2), &roster);
        assert!(notes.contains(&"Mira is a serious threat".to_string()));
        assert!(notes.contains(&"I can count on Dex".to_string()));
        assert!(notes.contains(&"I don't trust Mira one bit".to_string()));
        assert!(notes.len() <= MAX_PERSONAL_NOTES);
    }

    #[test]
    fn test_secrets_spread_only_from_holders() {
        let mut engine = MemoryEngine::new(&roster());
        let id = engine
            .record_secret(NpcId(1), "is steering the vote", Some(NpcId(3)), 2)
            .unwrap();
        assert!(!engine.share_secret(id, NpcId(2), NpcId(3), 2));
        assert!(engine.share_secret(id, NpcId(1), NpcId(2), 2));
        assert!(engine.share_secret(id, NpcId(2), NpcId(0), 3));
        assert!(!engine.share_secret(id, NpcId(1), NpcId(2), 3));
        assert_eq!(engine.secret(id).unwrap().known_by.len(), 3);
    }

    #[test]
    fn test_bounded_assessments() {
        let mut engine = MemoryEngine::new(&roster());
        engine.update_threat_assessment(NpcId(1), NpcId(3), 40.0);
        engine.update_personal_bond(NpcId(1), NpcId(3), -40.0);
        let journal = engine.journal(NpcId(1)).unwrap();
        assert_eq!(journal.threat(NpcId(3)), 10.0);
        assert_eq!(journal.bond(NpcId(3)), -10.0);
        // unknown journal is ignored
        engine.update_personal_bond(NpcId(42), NpcId(3), 1.0);
    }
}
