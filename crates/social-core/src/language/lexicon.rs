//! Lexicon
//!
//! Marker phrase lists and the small emotional lexicon used by the feature
//! extractor and the speech-act classifier.

use regex::Regex;
use std::sync::LazyLock;

/// Emotion dimensions, in lexicon column order.
pub const EMOTIONS: usize = 7;

/// Column order: anger, fear, attraction, manipulation, sincerity, desperation, confidence.
pub const EMOTIONAL_LEXICON: &[(&str, [f32; EMOTIONS])] = &[
    ("hate", [85.0, 10.0, 0.0, 10.0, 20.0, 10.0, 40.0]),
    ("angry", [80.0, 10.0, 0.0, 0.0, 30.0, 10.0, 30.0]),
    ("furious", [95.0, 5.0, 0.0, 0.0, 30.0, 15.0, 40.0]),
    ("liar", [75.0, 20.0, 0.0, 15.0, 25.0, 10.0, 40.0]),
    ("betray", [70.0, 40.0, 0.0, 30.0, 20.0, 20.0, 30.0]),
    ("betrayed", [75.0, 45.0, 0.0, 10.0, 40.0, 30.0, 20.0]),
    ("destroy", [80.0, 10.0, 0.0, 20.0, 10.0, 10.0, 60.0]),
    ("scared", [5.0, 85.0, 0.0, 0.0, 50.0, 40.0, 5.0]),
    ("afraid", [5.0, 80.0, 0.0, 0.0, 50.0, 40.0, 5.0]),
    ("worried", [5.0, 70.0, 0.0, 0.0, 55.0, 35.0, 10.0]),
    ("nervous", [5.0, 65.0, 5.0, 0.0, 50.0, 30.0, 10.0]),
    ("please", [0.0, 20.0, 0.0, 15.0, 40.0, 50.0, 10.0]),
    ("beg", [0.0, 40.0, 0.0, 10.0, 40.0, 90.0, 0.0]),
    ("need", [0.0, 30.0, 5.0, 10.0, 40.0, 60.0, 20.0]),
    ("desperate", [10.0, 60.0, 0.0, 10.0, 40.0, 95.0, 5.0]),
    ("beautiful", [0.0, 0.0, 85.0, 10.0, 50.0, 0.0, 40.0]),
    ("gorgeous", [0.0, 0.0, 90.0, 10.0, 45.0, 0.0, 45.0]),
    ("cute", [0.0, 0.0, 75.0, 5.0, 45.0, 0.0, 35.0]),
    ("amazing", [0.0, 0.0, 60.0, 15.0, 45.0, 0.0, 50.0]),
    ("love", [0.0, 10.0, 80.0, 10.0, 60.0, 10.0, 40.0]),
    ("trust", [0.0, 10.0, 10.0, 25.0, 60.0, 15.0, 50.0]),
    ("honest", [0.0, 5.0, 5.0, 20.0, 75.0, 5.0, 50.0]),
    ("honestly", [0.0, 5.0, 5.0, 30.0, 65.0, 5.0, 45.0]),
    ("promise", [0.0, 10.0, 5.0, 35.0, 60.0, 20.0, 45.0]),
    ("swear", [10.0, 10.0, 0.0, 35.0, 55.0, 25.0, 50.0]),
    ("sorry", [0.0, 30.0, 0.0, 10.0, 75.0, 30.0, 10.0]),
    ("thank", [0.0, 0.0, 15.0, 5.0, 80.0, 0.0, 30.0]),
    ("thanks", [0.0, 0.0, 15.0, 5.0, 75.0, 0.0, 30.0]),
    ("obviously", [30.0, 0.0, 0.0, 30.0, 10.0, 0.0, 80.0]),
    ("definitely", [10.0, 0.0, 0.0, 20.0, 30.0, 0.0, 85.0]),
    ("easy", [0.0, 0.0, 0.0, 25.0, 20.0, 0.0, 80.0]),
    ("win", [15.0, 0.0, 0.0, 20.0, 20.0, 10.0, 85.0]),
    ("everyone", [10.0, 10.0, 0.0, 40.0, 20.0, 10.0, 40.0]),
    ("secret", [0.0, 30.0, 10.0, 55.0, 30.0, 10.0, 30.0]),
    ("between", [0.0, 20.0, 10.0, 45.0, 30.0, 10.0, 30.0]),
];

/// Hedging phrases.
pub const HEDGES: &[&str] = &[
    "maybe", "perhaps", "i think", "kind of", "sort of", "probably", "i guess", "might",
    "possibly", "not sure", "i feel like",
];

/// Absolute/overgeneralizing phrases.
pub const ABSOLUTES: &[&str] = &[
    "always", "never", "everyone", "nobody", "everything", "nothing", "definitely",
    "absolutely", "completely", "totally",
];

/// Politeness markers.
pub const POLITENESS: &[&str] = &[
    "please", "thank you", "thanks", "sorry", "appreciate", "would you mind",
    "if you don't mind", "respect", "with all due respect",
];

/// Bluntness markers.
pub const BLUNTNESS: &[&str] = &[
    "whatever", "shut up", "listen", "obviously", "seriously", "just do it", "don't care",
    "deal with it", "period",
];

/// Phrases that break the fiction of the show on their own.
pub const META_MARKERS: &[&str] = &[
    "the ai", "an ai", "as an ai", "language model", "chatgpt", "npc", "npcs",
    "the developers", "the devs", "the algorithm", "you're a bot", "you are a bot",
    "just a game", "only a game", "just the game",
];

/// Phrases that also have an in-show reading ("win the game"). They break the
/// fiction only when two different ones appear together.
pub const WEAK_META_MARKERS: &[&str] = &["the game", "the program", "script", "scripted", "prompt"];

/// Second-person address words.
pub const DIRECT_ADDRESS: &[&str] = &["you", "your", "you're", "yours", "yourself"];

fn phrase_regex(phrases: &[&str]) -> Regex {
    let alternation = phrases
        .iter()
        .map(|p| regex::escape(p))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{})\b", alternation)).unwrap()
}

pub static HEDGE_RE: LazyLock<Regex> = LazyLock::new(|| phrase_regex(HEDGES));
pub static ABSOLUTE_RE: LazyLock<Regex> = LazyLock::new(|| phrase_regex(ABSOLUTES));
pub static POLITENESS_RE: LazyLock<Regex> = LazyLock::new(|| phrase_regex(POLITENESS));
pub static BLUNTNESS_RE: LazyLock<Regex> = LazyLock::new(|| phrase_regex(BLUNTNESS));
pub static META_RE: LazyLock<Regex> = LazyLock::new(|| phrase_regex(META_MARKERS));
pub static WEAK_META_RE: LazyLock<Regex> = LazyLock::new(|| phrase_regex(WEAK_META_MARKERS));
pub static DIRECT_ADDRESS_RE: LazyLock<Regex> = LazyLock::new(|| phrase_regex(DIRECT_ADDRESS));

/// Lexicon vector for a lowercase word.
pub fn emotion_vector(word: &str) -> Option<&'static [f32; EMOTIONS]> {
    EMOTIONAL_LEXICON
        .iter()
        .find(|(w, _)| *w == word)
        .map(|(_, v)| v)
}

pub fn has_meta_marker(text: &str) -> bool {
    if META_RE.is_match(text) {
        return true;
    }
    let mut weak: Vec<String> = WEAK_META_RE
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect();
    weak.sort();
    weak.dedup();
    weak.len() >= 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phrase_matching_respects_word_boundaries() {
        assert!(has_meta_marker("Is this just the game talking?"));
        assert!(has_meta_marker("you're just an NPC"));
        assert!(!has_meta_marker("the gamer in me"));
        assert!(!has_meta_marker("transcript of the night"));
        assert_eq!(HEDGE_RE.find_iter("maybe, I think, probably").count(), 3);
    }

    #[test]
    fn test_in_show_game_talk_is_not_meta() {
        assert!(!has_meta_marker("You want to win the game as much as I do."));
        assert!(!has_meta_marker("Stick to the script tonight."));
        assert!(has_meta_marker("The game follows a script and you know it."));
    }

    #[test]
    fn test_lexicon_lookup() {
        assert!(emotion_vector("furious").is_some());
        assert!(emotion_vector("sandwich").is_none());
    }
}
