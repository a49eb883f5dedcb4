//! Cast Roster
//!
//! Arena of cast members indexed by `NpcId`. Names are resolved to ids only here.

use serde::{Deserialize, Serialize};

use cast_events::{CastMember, NpcId};

use crate::components::PersonalityProfile;

/// All cast members with their derived personalities.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    members: Vec<CastMember>,
    personalities: Vec<PersonalityProfile>,
}

impl Roster {
    /// Builds the arena. Ids are reassigned in roster order.
    pub fn new(members: Vec<CastMember>) -> Self {
        let members: Vec<CastMember> = members
            .into_iter()
            .enumerate()
            .map(|(i, mut m)| {
                m.id = NpcId(i as u32);
                m
            })
            .collect();
        let personalities = members
            .iter()
            .map(|m| PersonalityProfile::from_dispositions(&m.dispositions))
            .collect();
        Self {
            members,
            personalities,
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn members(&self) -> &[CastMember] {
        &self.members
    }

    pub fn get(&self, id: NpcId) -> Option<&CastMember> {
        self.members.get(id.index())
    }

    pub fn contains(&self, id: NpcId) -> bool {
        id.index() < self.members.len()
    }

    /// Personality of a member, or the baseline profile for unknown ids.
    pub fn personality(&self, id: NpcId) -> PersonalityProfile {
        self.personalities
            .get(id.index())
            .copied()
            .unwrap_or_default()
    }

    pub fn name(&self, id: NpcId) -> &str {
        self.get(id).map(|m| m.name.as_str()).unwrap_or("someone")
    }

    pub fn first_name(&self, id: NpcId) -> &str {
        self.get(id).map(|m| m.first_name()).unwrap_or("someone")
    }

    /// Case-insensitive lookup by full display name or first name.
    pub fn resolve(&self, name: &str) -> Option<NpcId> {
        let wanted = name.trim().to_lowercase();
        if wanted.is_empty() {
            return None;
        }
        self.members
            .iter()
            .find(|m| m.name.to_lowercase() == wanted)
            .or_else(|| {
                self.members
                    .iter()
                    .find(|m| m.first_name().to_lowercase() == wanted)
            })
            .map(|m| m.id)
    }

    pub fn player(&self) -> Option<NpcId> {
        self.members.iter().find(|m| m.is_player).map(|m| m.id)
    }

    pub fn ids(&self) -> impl Iterator<Item = NpcId> + '_ {
        self.members.iter().map(|m| m.id)
    }

    pub fn active_ids(&self) -> impl Iterator<Item = NpcId> + '_ {
        self.members.iter().filter(|m| m.active).map(|m| m.id)
    }

    /// Active members that act on their own.
    pub fn autonomous_ids(&self) -> impl Iterator<Item = NpcId> + '_ {
        self.members
            .iter()
            .filter(|m| m.active && !m.is_player)
            .map(|m| m.id)
    }

    pub fn is_active(&self, id: NpcId) -> bool {
        self.get(id).map(|m| m.active).unwrap_or(false)
    }

    pub fn set_active(&mut self, id: NpcId, active: bool) {
        if let Some(member) = self.members.get_mut(id.index()) {
            member.active = active;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Roster {
        Roster::new(vec![
            CastMember::new(9, "Jordan Reyes").as_player(),
            CastMember::new(9, "Mira Vance").with_dispositions(["paranoid"]),
            CastMember::new(9, "Theo Park"),
        ])
    }

    #[test]
    fn test_ids_follow_roster_order() {
        let roster = roster();
        let ids: Vec<_> = roster.ids().collect();
        assert_eq!(ids, vec![NpcId(0), NpcId(1), NpcId(2)]);
        assert_eq!(roster.personality(NpcId(1)).paranoia, 85.0);
    }

    #[test]
    fn test_resolve_full_and_first_names() {
        let roster = roster();
        assert_eq!(roster.resolve("mira vance"), Some(NpcId(1)));
        assert_eq!(roster.resolve("THEO"), Some(NpcId(2)));
        assert_eq!(roster.resolve("Zed"), None);
        assert_eq!(roster.resolve(""), None);
    }

    #[test]
    fn test_autonomous_ids_skip_player_and_eliminated() {
        let mut roster = roster();
        roster.set_active(NpcId(2), false);
        let ids: Vec<_> = roster.autonomous_ids().collect();
        assert_eq!(ids, vec![NpcId(1)]);
        assert_eq!(roster.player(), Some(NpcId(0)));
    }
}
