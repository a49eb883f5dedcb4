//! Template sets for NPC replies, autonomous decision lines and event captions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use cast_events::{DecisionType, EmergentEventType, ResponseStrategy};

use crate::config::ConfigError;
use crate::template::{SlotResolver, Template, TemplateError};

/// All template tables used by the narrator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NarrationTemplates {
    /// Reply lines keyed by response strategy name
    pub responses: BTreeMap<String, Vec<Template>>,
    /// Reply lines for messages that break the fiction
    pub fourth_wall: Vec<Template>,
    /// Content lines for autonomous decisions keyed by decision type
    pub decisions: BTreeMap<String, Vec<Template>>,
    /// Captions keyed by emergent event type
    pub events: BTreeMap<String, Vec<Template>>,
}

impl NarrationTemplates {
    /// Loads templates from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parses templates from a TOML string. Tables not present keep the defaults.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let parsed: NarrationTemplates = toml::from_str(content)?;
        let mut templates = default_templates();
        templates.responses.extend(parsed.responses);
        templates.decisions.extend(parsed.decisions);
        templates.events.extend(parsed.events);
        if !parsed.fourth_wall.is_empty() {
            templates.fourth_wall = parsed.fourth_wall;
        }
        Ok(templates)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn response(&self, strategy: ResponseStrategy, variant: u64) -> Option<&Template> {
        pick(self.responses.get(strategy.as_str()), variant)
    }

    pub fn fourth_wall(&self, variant: u64) -> Option<&Template> {
        pick(Some(&self.fourth_wall), variant)
    }

    /// Renders the content line for an autonomous decision.
    pub fn decision_line(
        &self,
        decision: DecisionType,
        resolver: &dyn SlotResolver,
        variant: u64,
    ) -> Result<String, TemplateError> {
        pick(self.decisions.get(decision.as_str()), variant)
            .ok_or_else(|| TemplateError::NoTemplate(decision.as_str().to_string()))?
            .render(resolver)
    }

    /// Renders a caption for an emergent event.
    pub fn event_caption(
        &self,
        event_type: EmergentEventType,
        resolver: &dyn SlotResolver,
        variant: u64,
    ) -> Result<String, TemplateError> {
        pick(self.events.get(event_type.as_str()), variant)
            .ok_or_else(|| TemplateError::NoTemplate(event_type.as_str().to_string()))?
            .render(resolver)
    }
}

fn pick(list: Option<&Vec<Template>>, variant: u64) -> Option<&Template> {
    let list = list?;
    if list.is_empty() {
        return None;
    }
    list.get((variant % list.len() as u64) as usize)
}

fn parse_all(sources: &[&str]) -> Vec<Template> {
    sources
        .iter()
        .filter_map(|s| Template::parse(s).ok())
        .collect()
}

/// Built-in template tables.
pub fn default_templates() -> NarrationTemplates {
    let mut responses = BTreeMap::new();
    responses.insert(
        ResponseStrategy::Defensive.as_str().to_string(),
        parse_all(&[
            "Whoa, {player}. I don't know where that's coming from, but that's not me.",
            "I've been nothing but straight with you, {player}. Don't twist this.",
            "You're putting me on the spot and I don't love it.",
        ]),
    );
    responses.insert(
        ResponseStrategy::StrategicAlliance.as_str().to_string(),
        parse_all(&[
            "Okay {player}, I'm listening. If we do this, we do it quietly.",
            "I've been hoping you'd say that. Let's keep this between us for now.",
            "Fine. You and me. But I need to see you follow through.",
        ]),
    );
    responses.insert(
        ResponseStrategy::Hostile.as_str().to_string(),
        parse_all(&[
            "Save it, {player}. I know exactly what you're doing.",
            "You really think that works on me?",
            "We're done talking.",
        ]),
    );
    responses.insert(
        ResponseStrategy::InformationExtraction.as_str().to_string(),
        parse_all(&[
            "Interesting. And who else have you been talking to, {player}?",
            "Maybe. What have you heard?",
            "I'll tell you what I know when you tell me what you know.",
        ]),
    );
    responses.insert(
        ResponseStrategy::ReciprocalFlirting.as_str().to_string(),
        parse_all(&[
            "Careful, {player}. Keep talking like that and people will notice.",
            "You're not so bad yourself.",
            "Is that a line? Because it's working a little.",
        ]),
    );
    responses.insert(
        ResponseStrategy::Suspicious.as_str().to_string(),
        parse_all(&[
            "Why are you really telling me this, {player}?",
            "That sounds rehearsed.",
            "Mm-hm. I'll keep that in mind.",
        ]),
    );
    responses.insert(
        ResponseStrategy::Confrontational.as_str().to_string(),
        parse_all(&[
            "Say that again, {player}. To my face, in front of everyone.",
            "You want a fight? You've got one.",
            "Keep threatening me and see where it gets you.",
        ]),
    );
    responses.insert(
        ResponseStrategy::Neutral.as_str().to_string(),
        parse_all(&[
            "Sure, {player}. Noted.",
            "Okay. Anything else?",
            "Yeah, maybe.",
        ]),
    );

    let fourth_wall = parse_all(&[
        "What are you even talking about, {player}? That's a weird thing to say.",
        "Are you okay? You're talking like none of this is real.",
        "I'm going to pretend you didn't say that.",
    ]);

    let mut decisions = BTreeMap::new();
    decisions.insert(
        DecisionType::ProposeAlliance.as_str().to_string(),
        parse_all(&[
            "{speaker} pulls {target} aside: \"We should be working together.\"",
            "{speaker} offers {target} a quiet deal to stick together.",
        ]),
    );
    decisions.insert(
        DecisionType::SendDm.as_str().to_string(),
        parse_all(&[
            "{speaker} slides into {target}'s DMs: \"Got a minute?\"",
            "{speaker} messages {target} to check where their head is at.",
        ]),
    );
    decisions.insert(
        DecisionType::Confront.as_str().to_string(),
        parse_all(&[
            "{speaker} confronts {target} in front of the house.",
            "{speaker} corners {target}: \"We need to talk. Now.\"",
        ]),
    );
    decisions.insert(
        DecisionType::Scheme.as_str().to_string(),
        parse_all(&[
            "{speaker} starts quietly counting votes against {target}.",
            "{speaker} drafts a plan to get {target} out.",
        ]),
    );
    decisions.insert(
        DecisionType::SpreadRumor.as_str().to_string(),
        parse_all(&[
            "{speaker} tells {target} that {subject} can't be trusted.",
            "{speaker} whispers to {target} about what {subject} has been up to.",
        ]),
    );
    decisions.insert(
        DecisionType::Flirt.as_str().to_string(),
        parse_all(&[
            "{speaker} lingers a little too long next to {target}.",
            "{speaker} compliments {target} with a grin.",
        ]),
    );
    decisions.insert(
        DecisionType::Betray.as_str().to_string(),
        parse_all(&[
            "{speaker} quietly cuts ties with {target}.",
            "{speaker} decides {target} is a liability.",
        ]),
    );

    let mut events = BTreeMap::new();
    events.insert(
        EmergentEventType::Conflict.as_str().to_string(),
        parse_all(&[
            "Tension boils over between {speaker} and {target}.",
            "{speaker} and {target} get into a heated argument.",
        ]),
    );
    events.insert(
        EmergentEventType::Alliance.as_str().to_string(),
        parse_all(&[
            "{speaker} and {target} shake on an alliance.",
            "{speaker} and {target} agree to watch each other's backs.",
        ]),
    );
    events.insert(
        EmergentEventType::Betrayal.as_str().to_string(),
        parse_all(&[
            "{speaker} turns on {target}.",
            "{speaker} blindsides {target} and walks away from their deal.",
        ]),
    );
    events.insert(
        EmergentEventType::Romance.as_str().to_string(),
        parse_all(&[
            "Sparks fly between {speaker} and {target}.",
            "{speaker} and {target} are caught sharing a quiet moment.",
        ]),
    );
    events.insert(
        EmergentEventType::Rumor.as_str().to_string(),
        parse_all(&[
            "{speaker} spreads a rumor about {target}.",
            "Whispers about {target} start with {speaker}.",
        ]),
    );
    events.insert(
        EmergentEventType::ConfessionLeak.as_str().to_string(),
        parse_all(&[
            "{speaker}'s secret gets out, and {target} is the one who talked.",
            "{target} lets slip what {speaker} told them in confidence.",
        ]),
    );
    events.insert(
        EmergentEventType::Revenge.as_str().to_string(),
        parse_all(&[
            "{speaker} comes for {target} over the betrayal.",
            "{speaker} hasn't forgotten what {target} did.",
        ]),
    );
    events.insert(
        EmergentEventType::LowKey.as_str().to_string(),
        parse_all(&[
            "{speaker} and {target} chat by the pool.",
            "{speaker} and {target} cook dinner together.",
        ]),
    );

    NarrationTemplates {
        responses,
        fourth_wall,
        decisions,
        events,
    }
}
