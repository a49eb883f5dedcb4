//! Speech-Act Classification
//!
//! A fixed, ordered table of pattern rules per act type. Confidence for a type is
//! the share of its rules that matched. The table order breaks ties.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use super::lexicon::{emotion_vector, EMOTIONS};
use super::surface::SurfaceFeatures;

/// Typed classification of an utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeechActType {
    Threat,
    Accusation,
    AllianceProposal,
    Manipulation,
    InformationRequest,
    Flirtation,
    Gossip,
    Confession,
    Reassurance,
    Compliment,
    Deflection,
    Neutral,
}

impl SpeechActType {
    /// Acts that count toward keyword-spam detection.
    pub fn is_strategic(self) -> bool {
        matches!(
            self,
            SpeechActType::Threat
                | SpeechActType::Accusation
                | SpeechActType::AllianceProposal
                | SpeechActType::Manipulation
                | SpeechActType::InformationRequest
                | SpeechActType::Gossip
        )
    }

    pub fn is_aggressive(self) -> bool {
        matches!(
            self,
            SpeechActType::Threat | SpeechActType::Accusation | SpeechActType::Manipulation
        )
    }
}

/// Rule table in priority order.
const RULES: &[(SpeechActType, &[&str])] = &[
    (
        SpeechActType::Threat,
        &[
            r"\b(i'?ll|i will|gonna|going to)\b.*\b(make sure|destroy|ruin|end you|come after|get you|send you home)\b",
            r"\byou'?ll (regret|pay|be sorry|go home)\b|\byou will (regret|pay|be sorry|go home)\b",
            r"\b(watch your back|or else|last warning|you'?re (done|finished|next))\b",
            r"\bif you\b.*\b(i will|i'?ll)\b",
        ],
    ),
    (
        SpeechActType::Accusation,
        &[
            r"\byou (lied|betrayed|threw|played|used|backstabbed|flipped)\b",
            r"\b(liar|snake|traitor|fake|two-faced)\b",
            r"\bhow could you\b",
            r"\byou'?re (lying|playing|fake|a snake)\b",
        ],
    ),
    (
        SpeechActType::AllianceProposal,
        &[
            r"\b(work|team|stick) together\b",
            r"\b(alliance|ally|allies|final two|final three)\b",
            r"\b(you and me|you and i|the three of us|just us)\b",
            r"\b(have (my|your) back|got your back|protect each other)\b",
        ],
    ),
    (
        SpeechActType::Manipulation,
        &[
            r"\b(trust me|believe me)\b",
            r"\b(everyone (knows|is saying|thinks)|nobody (trusts|likes) (you|him|her|them))\b",
            r"\byou (need|have) to\b",
            r"\b(if you were smart|only (i|we) can|you owe me)\b",
        ],
    ),
    (
        SpeechActType::InformationRequest,
        &[
            r"\?",
            r"\b(what|who|where|why|how|when) (do|did|is|are|was|were|have|has|will|would)\b",
            r"\b(tell me|do you know|have you heard|what'?s going on)\b",
            r"\b(vote|voting) (for|tonight)\b.*\?",
        ],
    ),
    (
        SpeechActType::Flirtation,
        &[
            r"\b(cute|hot|gorgeous|beautiful|handsome|attractive|sexy)\b",
            r"\b(date|kiss|crush|flirt|cuddle)\b",
            r"\byou look (amazing|great|good|incredible)\b",
            r"\b(can'?t stop thinking about you|into you)\b",
        ],
    ),
    (
        SpeechActType::Gossip,
        &[
            r"\b(heard|rumor|apparently|word is)\b",
            r"\b(said|told me|talking) about\b",
            r"\b(he|she|they) (said|told|thinks)\b",
            r"\b(don'?t tell|between us|between you and me)\b",
        ],
    ),
    (
        SpeechActType::Confession,
        &[
            r"\bi (have to|need to|gotta) (tell|admit|confess)\b",
            r"\b(to be honest|honestly)\b",
            r"\bi (lied|messed up|was wrong|feel bad)\b",
            r"\b(my secret|the truth is)\b",
        ],
    ),
    (
        SpeechActType::Reassurance,
        &[
            r"\b(don'?t worry|it'?s (okay|fine|alright))\b",
            r"\bi (promise|swear)\b",
            r"\b(you'?re safe|i won'?t vote (for )?you|i'?m with you)\b",
            r"\b(have your back|got you)\b",
        ],
    ),
    (
        SpeechActType::Compliment,
        &[
            r"\b(thank you|thanks|appreciate)\b",
            r"\b(great|amazing|awesome|incredible|smart|brilliant) (job|move|player|person)\b",
            r"\byou'?re (so )?(smart|kind|funny|great|amazing|awesome)\b",
            r"\b(i really mean it|respect you)\b",
        ],
    ),
    (
        SpeechActType::Deflection,
        &[
            r"\b(whatever|not my problem|doesn'?t matter|don'?t know what you'?re talking about)\b",
            r"\b(anyway|moving on|change the subject)\b",
            r"\b(why does it matter|who cares)\b",
            r"\b(wasn'?t me|not me)\b",
        ],
    ),
];

static COMPILED_RULES: LazyLock<Vec<(SpeechActType, Vec<Regex>)>> = LazyLock::new(|| {
    RULES
        .iter()
        .map(|(act, patterns)| {
            let compiled = patterns
                .iter()
                .map(|p| Regex::new(&format!("(?i){}", p)).unwrap())
                .collect();
            (*act, compiled)
        })
        .collect()
});

/// Manipulation cues: (pattern, points per hit). Each cue contributes at most 1.5x its points.
const MANIPULATION_CUES: &[(&str, f32)] = &[
    (r"\btrust me\b", 25.0),
    (r"\bbelieve me\b", 20.0),
    (r"\bbetween (us|you and me)\b", 20.0),
    (r"\beveryone (knows|is saying|thinks)\b", 25.0),
    (r"\byou owe me\b", 30.0),
    (r"\bif you were smart\b", 30.0),
    (r"\bonly (i|we) can\b", 25.0),
    (r"\byou (need|have) to\b", 15.0),
];

/// Threat cues, disjoint from the manipulation cues.
const THREAT_CUES: &[(&str, f32)] = &[
    (r"\b(destroy|ruin|end) you\b", 35.0),
    (r"\bwatch your back\b", 35.0),
    (r"\byou'?ll (regret|pay)\b", 35.0),
    (r"\b(go|send you) home\b", 20.0),
    (r"\bor else\b", 30.0),
    (r"\bcome after\b", 25.0),
    (r"\bmake sure\b", 15.0),
    (r"\blast warning\b", 30.0),
];

static MANIPULATION_RE: LazyLock<Vec<(Regex, f32)>> = LazyLock::new(|| compile_cues(MANIPULATION_CUES));
static THREAT_RE: LazyLock<Vec<(Regex, f32)>> = LazyLock::new(|| compile_cues(THREAT_CUES));

fn compile_cues(cues: &[(&str, f32)]) -> Vec<(Regex, f32)> {
    cues.iter()
        .map(|(p, w)| (Regex::new(&format!("(?i){}", p)).unwrap(), *w))
        .collect()
}

fn cue_level(cues: &[(Regex, f32)], text: &str) -> f32 {
    cues.iter()
        .map(|(re, points)| (re.find_iter(text).count() as f32 * points).min(points * 1.5))
        .sum::<f32>()
        .clamp(0.0, 100.0)
}

/// Words that look like names but are not.
const NOT_NAMES: &[&str] = &[
    "I", "I'm", "I'll", "I've", "I'd", "We", "You", "The", "He", "She", "They", "It", "If",
    "What", "Who", "Why", "How", "When", "Where", "Okay", "OK", "Yes", "No", "Hey", "Hi",
    "And", "But", "So", "Just", "Honestly", "Please", "Thanks", "Thank", "Don't", "Do", "Is",
    "Are", "My", "Your", "Our", "This", "That", "Maybe", "Look", "Listen", "Day", "Tonight",
];

/// Emotional subtext scores, each 0-100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EmotionalSubtext {
    pub anger: f32,
    pub fear: f32,
    pub attraction: f32,
    pub manipulation: f32,
    pub sincerity: f32,
    pub desperation: f32,
    pub confidence: f32,
}

impl EmotionalSubtext {
    fn from_array(v: [f32; EMOTIONS]) -> Self {
        Self {
            anger: v[0],
            fear: v[1],
            attraction: v[2],
            manipulation: v[3],
            sincerity: v[4],
            desperation: v[5],
            confidence: v[6],
        }
    }

    fn clamp(mut self) -> Self {
        for v in [
            &mut self.anger,
            &mut self.fear,
            &mut self.attraction,
            &mut self.manipulation,
            &mut self.sincerity,
            &mut self.desperation,
            &mut self.confidence,
        ] {
            *v = v.clamp(0.0, 100.0);
        }
        self
    }
}

/// Classification of one utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechAct {
    pub primary: SpeechActType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<SpeechActType>,
    /// 0-100
    pub confidence: f32,
    pub subtext: EmotionalSubtext,
    /// 0-100
    pub manipulation_level: f32,
    /// 0-100
    pub threat_level: f32,
    pub information_seeking: bool,
    pub trust_building: bool,
    /// Capitalized name candidates, in order of appearance
    pub mentions: Vec<String>,
    /// Every act type with at least one matched rule
    pub matched: Vec<SpeechActType>,
    pub meta_text: bool,
}

impl SpeechAct {
    pub fn neutral() -> Self {
        Self {
            primary: SpeechActType::Neutral,
            secondary: None,
            confidence: 0.0,
            subtext: EmotionalSubtext::default(),
            manipulation_level: 0.0,
            threat_level: 0.0,
            information_seeking: false,
            trust_building: false,
            mentions: Vec::new(),
            matched: Vec::new(),
            meta_text: false,
        }
    }

    pub fn strategic_categories(&self) -> usize {
        self.matched.iter().filter(|a| a.is_strategic()).count()
    }
}

/// Candidate names: capitalized tokens with punctuation and possessives stripped.
pub fn extract_mentions(text: &str) -> Vec<String> {
    let mut mentions: Vec<String> = Vec::new();
    for raw in text.split_whitespace() {
        let token = raw.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'');
        let token = token
            .strip_suffix("'s")
            .or_else(|| token.strip_suffix('\''))
            .unwrap_or(token);
        let starts_upper = token.chars().next().map(|c| c.is_uppercase()).unwrap_or(false);
        if token.chars().count() < 2 || !starts_upper || NOT_NAMES.contains(&token) {
            continue;
        }
        if !mentions.iter().any(|m| m == token) {
            mentions.push(token.to_string());
        }
    }
    mentions
}

fn subtext_for(text: &str, features: &SurfaceFeatures) -> EmotionalSubtext {
    let lower = text.to_lowercase();
    let vectors: Vec<&[f32; EMOTIONS]> = lower
        .split(|c: char| !c.is_alphanumeric() && c != '\'')
        .filter_map(emotion_vector)
        .collect();

    let mut avg = [0.0_f32; EMOTIONS];
    if !vectors.is_empty() {
        for v in &vectors {
            for (sum, x) in avg.iter_mut().zip(v.iter()) {
                *sum += x;
            }
        }
        for sum in avg.iter_mut() {
            *sum /= vectors.len() as f32;
        }
    }

    let mut subtext = EmotionalSubtext::from_array(avg);
    if features.exclamations >= 2 {
        subtext.anger += 15.0;
        subtext.desperation += 10.0;
        subtext.confidence += 10.0;
    }
    if features.caps_ratio() > 0.3 {
        subtext.anger += 20.0;
    }
    subtext.clamp()
}

/// Classifies `text`. Pure.
pub fn classify(text: &str, features: &SurfaceFeatures) -> SpeechAct {
    if text.trim().is_empty() {
        return SpeechAct::neutral();
    }

    let scores: Vec<(SpeechActType, f32)> = COMPILED_RULES
        .iter()
        .map(|(act, rules)| {
            let hits = rules.iter().filter(|re| re.is_match(text)).count();
            (*act, hits as f32 / rules.len() as f32 * 100.0)
        })
        .filter(|(_, score)| *score > 0.0)
        .collect();

    // Stable sort keeps table order for equal scores.
    let mut ranked = scores.clone();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let (primary, confidence) = ranked
        .first()
        .copied()
        .unwrap_or((SpeechActType::Neutral, 0.0));
    let secondary = ranked.get(1).map(|(act, _)| *act);
    let matched: Vec<SpeechActType> = scores.iter().map(|(act, _)| *act).collect();

    let manipulation_level = cue_level(&MANIPULATION_RE, text);
    let threat_level = cue_level(&THREAT_RE, text);

    let information_seeking = primary == SpeechActType::InformationRequest
        || secondary == Some(SpeechActType::InformationRequest);
    let trust_building = matches!(
        primary,
        SpeechActType::Reassurance
            | SpeechActType::Compliment
            | SpeechActType::Confession
            | SpeechActType::AllianceProposal
    ) && manipulation_level < 40.0;

    SpeechAct {
        primary,
        secondary,
        confidence,
        subtext: subtext_for(text, features),
        manipulation_level,
        threat_level,
        information_seeking,
        trust_building,
        mentions: extract_mentions(text),
        matched,
        meta_text: features.meta_text,
    }
}

/// Rolling style profile of a message author.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinguisticProfile {
    pub messages: u64,
    pub avg_length: f32,
    /// 0-100
    pub formality: f32,
    /// 0-100
    pub expressiveness: f32,
    /// 0-100
    pub manipulation_tendency: f32,
}

/// Classifier that also keeps the author's linguistic profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechActClassifier {
    pub profile: LinguisticProfile,
    blend: f32,
}

impl Default for SpeechActClassifier {
    fn default() -> Self {
        Self::new(0.1)
    }
}

impl SpeechActClassifier {
    pub fn new(blend: f32) -> Self {
        Self {
            profile: LinguisticProfile::default(),
            blend: blend.clamp(0.0, 1.0),
        }
    }

    /// Classifies and folds the message into the author profile.
    pub fn observe(&mut self, text: &str, features: &SurfaceFeatures) -> SpeechAct {
        let act = classify(text, features);
        if features.word_count > 0 {
            self.update_profile(features, &act);
        }
        act
    }

    fn update_profile(&mut self, features: &SurfaceFeatures, act: &SpeechAct) {
        let formality = (features.politeness as f32 * 20.0
            + (1.0 - features.fragment_ratio) * 30.0
            + features.hedges as f32 * 10.0
            - features.bluntness as f32 * 15.0)
            .clamp(0.0, 100.0);
        let expressiveness = (features.emotional_intensity * 0.5
            + features.exclamations as f32 * 10.0
            + features.caps_ratio() * 100.0)
            .clamp(0.0, 100.0);

        let b = self.blend;
        let p = &mut self.profile;
        if p.messages == 0 {
            p.avg_length = features.word_count as f32;
            p.formality = formality;
            p.expressiveness = expressiveness;
            p.manipulation_tendency = act.manipulation_level;
        } else {
            p.avg_length = p.avg_length * (1.0 - b) + features.word_count as f32 * b;
            p.formality = p.formality * (1.0 - b) + formality * b;
            p.expressiveness = p.expressiveness * (1.0 - b) + expressiveness * b;
            p.manipulation_tendency =
                p.manipulation_tendency * (1.0 - b) + act.manipulation_level * b;
        }
        p.messages += 1;
    }
}
