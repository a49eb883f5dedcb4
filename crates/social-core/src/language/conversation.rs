//! Conversation Intent
//!
//! Topic and target extraction over a classified utterance and the roster.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use cast_events::NpcId;

use super::speech_act::{SpeechAct, SpeechActType};
use crate::setup::Roster;

/// What the utterance is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationTopic {
    Vote,
    Alliance,
    Relationship,
    Edit,
    Life,
    Other,
}

/// Topic rules in priority order. Targeted rules need at least one valid mention.
const TOPIC_RULES: &[(ConversationTopic, &str, bool)] = &[
    (
        ConversationTopic::Vote,
        r"\b(vote|voting|votes|eliminat\w*|send \w+ home|target|nominat\w*)\b",
        true,
    ),
    (
        ConversationTopic::Alliance,
        r"\b(alliance|ally|allies|team up|work together|stick together|final (two|three)|side with)\b",
        true,
    ),
    (
        ConversationTopic::Relationship,
        r"\b(trust|friend|friends|like you|feel about|care about|close|crush|love|relationship)\b",
        false,
    ),
    (
        ConversationTopic::Edit,
        r"\b(edit|camera|cameras|confessional|audience|fans|screen ?time|episode)\b",
        false,
    ),
    (
        ConversationTopic::Life,
        r"\b(family|home town|hometown|job|work back home|kids|mom|dad|childhood|life outside)\b",
        false,
    ),
];

static TOPIC_RE: LazyLock<Vec<(ConversationTopic, Regex, bool)>> = LazyLock::new(|| {
    TOPIC_RULES
        .iter()
        .map(|(topic, p, targeted)| (*topic, Regex::new(&format!("(?i){}", p)).unwrap(), *targeted))
        .collect()
});

static EXCLUSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:without|not|except|excluding|but not)\s+([A-Z][\w']+)").unwrap()
});

static US_WE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\b(us|we)\b").unwrap());

static NUMERIC_CLAIM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d+|two|three|four|five|six)\s+(votes?|people|days|of us)\b").unwrap()
});

/// An explicit numeric statement ("three votes", "2 days").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericClaim {
    pub value: u32,
    pub unit: String,
}

/// Structured conversational intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationIntent {
    pub topic: ConversationTopic,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote_target: Option<NpcId>,
    /// Valid roster mentions in order of appearance
    pub mentioned: Vec<NpcId>,
    pub wants_alliance_with: Vec<NpcId>,
    pub wants_to_exclude: Vec<NpcId>,
    pub wants_info_on: Vec<NpcId>,
    pub numeric_claims: Vec<NumericClaim>,
}

fn word_number(word: &str) -> Option<u32> {
    match word.to_lowercase().as_str() {
        "two" => Some(2),
        "three" => Some(3),
        "four" => Some(4),
        "five" => Some(5),
        "six" => Some(6),
        other => other.parse().ok(),
    }
}

/// Resolves mentions against the roster, dropping unknown names and `speaker`.
fn valid_mentions(act: &SpeechAct, roster: &Roster, speaker: Option<NpcId>) -> Vec<NpcId> {
    let mut ids = Vec::new();
    for name in &act.mentions {
        if let Some(id) = roster.resolve(name) {
            if Some(id) != speaker && !ids.contains(&id) {
                ids.push(id);
            }
        }
    }
    ids
}

/// Derives intent from the classified text. Pure.
pub fn analyze(
    text: &str,
    act: &SpeechAct,
    roster: &Roster,
    speaker: Option<NpcId>,
) -> ConversationIntent {
    let mentioned = valid_mentions(act, roster, speaker);

    let topic = TOPIC_RE
        .iter()
        .find(|(_, re, targeted)| re.is_match(text) && (!*targeted || !mentioned.is_empty()))
        .map(|(topic, _, _)| *topic)
        .unwrap_or(ConversationTopic::Other);

    let vote_target = if topic == ConversationTopic::Vote && mentioned.len() == 1 {
        Some(mentioned[0])
    } else if act.primary.is_aggressive() && !mentioned.is_empty() {
        Some(mentioned[0])
    } else {
        None
    };

    let mut wants_to_exclude: Vec<NpcId> = EXCLUSION_RE
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .filter_map(|m| {
            let name = m.as_str().trim_end_matches("'s");
            roster.resolve(name)
        })
        .filter(|id| mentioned.contains(id))
        .collect();
    // Several names under "us/we": the first is the partner, the rest are left out.
    if mentioned.len() > 1 && US_WE_RE.is_match(text) {
        for id in mentioned.iter().skip(1) {
            if !wants_to_exclude.contains(id) {
                wants_to_exclude.push(*id);
            }
        }
    }

    let wants_alliance_with = if topic == ConversationTopic::Alliance
        || act.primary == SpeechActType::AllianceProposal
    {
        mentioned
            .iter()
            .filter(|id| !wants_to_exclude.contains(id))
            .copied()
            .collect()
    } else {
        Vec::new()
    };

    let wants_info_on = if act.information_seeking {
        mentioned
            .iter()
            .filter(|id| !wants_to_exclude.contains(id))
            .copied()
            .collect()
    } else {
        Vec::new()
    };

    let numeric_claims = NUMERIC_CLAIM_RE
        .captures_iter(text)
        .filter_map(|c| {
            let value = word_number(c.get(1)?.as_str())?;
            Some(NumericClaim {
                value,
                unit: c.get(2)?.as_str().to_lowercase(),
            })
        })
        .collect();

    ConversationIntent {
        topic,
        vote_target,
        mentioned,
        wants_alliance_with,
        wants_to_exclude,
        wants_info_on,
        numeric_claims,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::speech_act::classify;
    use crate::language::surface::extract;
    use cast_events::CastMember;

    fn roster() -> Roster {
        Roster::new(vec![
            CastMember::new(0, "Jordan Reyes").as_player(),
            CastMember::new(1, "Mira Vance"),
            CastMember::new(2, "Theo Park"),
            CastMember::new(3, "Dex Moreau"),
        ])
    }

    fn intent(text: &str) -> ConversationIntent {
        let act = classify(text, &extract(text));
        analyze(text, &act, &roster(), Some(NpcId(0)))
    }

    #[test]
    fn test_speculative_alliance_without_names_is_other() {
        let i = intent("I think there's a secret alliance that we don't know about");
        assert_eq!(i.topic, ConversationTopic::Other);
        assert!(i.vote_target.is_none());
        assert!(i.mentioned.is_empty());
    }

    #[test]
    fn test_vote_with_single_mention_sets_target() {
        let i = intent("I'm voting Dex tonight.");
        assert_eq!(i.topic, ConversationTopic::Vote);
        assert_eq!(i.vote_target, Some(NpcId(3)));
    }

    #[test]
    fn test_unknown_names_are_dropped() {
        let i = intent("Vote out Gregory and Dex");
        assert_eq!(i.mentioned, vec![NpcId(3)]);
        assert_eq!(i.vote_target, Some(NpcId(3)));
    }

    #[test]
    fn test_exclusion_regex_and_us_we_heuristic() {
        let i = intent("We should work together with Theo, but not Mira.");
        assert_eq!(i.topic, ConversationTopic::Alliance);
        assert_eq!(i.wants_to_exclude, vec![NpcId(1)]);
        assert_eq!(i.wants_alliance_with, vec![NpcId(2)]);

        let i = intent("Us and Theo and Dex, we stick together.");
        assert_eq!(i.wants_alliance_with, vec![NpcId(2)]);
        assert_eq!(i.wants_to_exclude, vec![NpcId(3)]);
    }

    #[test]
    fn test_aggressive_act_targets_first_mention() {
        let i = intent("Mira, you lied to me and Theo knows it.");
        assert_eq!(i.vote_target, Some(NpcId(1)));
    }

    #[test]
    fn test_numeric_claims() {
        let i = intent("We have three votes and 2 days left.");
        assert_eq!(i.numeric_claims.len(), 2);
        assert_eq!(i.numeric_claims[0].value, 3);
        assert_eq!(i.numeric_claims[1].unit, "days");
    }
}
