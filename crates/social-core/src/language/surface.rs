//! Surface Feature Extraction
//!
//! Shape metrics over a single utterance. No semantics, no state.

use serde::{Deserialize, Serialize};

use super::lexicon::{
    emotion_vector, has_meta_marker, ABSOLUTE_RE, BLUNTNESS_RE, DIRECT_ADDRESS_RE, HEDGE_RE,
    POLITENESS_RE,
};

/// Sentences shorter than this are fragments.
const FRAGMENT_WORDS: usize = 4;

/// Counts and ratios describing the shape of a message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurfaceFeatures {
    pub word_count: usize,
    pub sentence_count: usize,
    pub avg_words_per_sentence: f32,
    /// Share of sentences under four words
    pub fragment_ratio: f32,
    /// Punctuation characters per word
    pub punctuation_density: f32,
    pub exclamations: usize,
    pub questions: usize,
    pub hedges: usize,
    pub absolutes: usize,
    pub politeness: usize,
    pub bluntness: usize,
    pub direct_address: usize,
    pub all_caps_words: usize,
    /// 0-100
    pub emotional_intensity: f32,
    pub meta_text: bool,
}

impl SurfaceFeatures {
    pub fn caps_ratio(&self) -> f32 {
        if self.word_count == 0 {
            0.0
        } else {
            self.all_caps_words as f32 / self.word_count as f32
        }
    }
}

fn is_all_caps_word(word: &str) -> bool {
    let letters: Vec<char> = word.chars().filter(|c| c.is_alphabetic()).collect();
    letters.len() >= 2
        && letters.len() == word.trim_matches(|c: char| !c.is_alphanumeric()).chars().count()
        && letters.iter().all(|c| c.is_uppercase())
}

/// Extracts surface features from `text`.
pub fn extract(text: &str) -> SurfaceFeatures {
    let text = text.trim();
    if text.is_empty() {
        return SurfaceFeatures::default();
    }

    let words: Vec<&str> = text.split_whitespace().collect();
    let word_count = words.len();

    let sentences: Vec<usize> = text
        .split(['.', '!', '?'])
        .map(|s| s.split_whitespace().count())
        .filter(|&n| n > 0)
        .collect();
    let sentence_count = sentences.len().max(1);
    let fragments = sentences.iter().filter(|&&n| n < FRAGMENT_WORDS).count();

    let punctuation = text.chars().filter(|c| c.is_ascii_punctuation()).count();
    let exclamations = text.matches('!').count();
    let questions = text.matches('?').count();

    let all_caps_words = words.iter().filter(|w| is_all_caps_word(w)).count();

    let lower = text.to_lowercase();
    let emotional_hits: Vec<f32> = lower
        .split(|c: char| !c.is_alphanumeric() && c != '\'')
        .filter_map(emotion_vector)
        .map(|v| v.iter().cloned().fold(0.0_f32, f32::max))
        .collect();
    let density = emotional_hits.len() as f32 / word_count as f32;
    let peak = emotional_hits.iter().cloned().fold(0.0_f32, f32::max);
    let emotional_intensity = (peak * 0.6 + density * 200.0 + exclamations as f32 * 5.0)
        .clamp(0.0, 100.0);

    SurfaceFeatures {
        word_count,
        sentence_count,
        avg_words_per_sentence: word_count as f32 / sentence_count as f32,
        fragment_ratio: if sentences.is_empty() {
            0.0
        } else {
            fragments as f32 / sentences.len() as f32
        },
        punctuation_density: punctuation as f32 / word_count as f32,
        exclamations,
        questions,
        hedges: HEDGE_RE.find_iter(text).count(),
        absolutes: ABSOLUTE_RE.find_iter(text).count(),
        politeness: POLITENESS_RE.find_iter(text).count(),
        bluntness: BLUNTNESS_RE.find_iter(text).count(),
        direct_address: DIRECT_ADDRESS_RE.find_iter(text).count(),
        all_caps_words,
        emotional_intensity,
        meta_text: has_meta_marker(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_is_all_zero() {
        assert_eq!(extract(""), SurfaceFeatures::default());
        assert_eq!(extract("   "), SurfaceFeatures::default());
        assert!(!extract("").meta_text);
    }

    #[test]
    fn test_sentence_and_fragment_counts() {
        let f = extract("I think we should talk. Now! Okay?");
        assert_eq!(f.word_count, 7);
        assert_eq!(f.sentence_count, 3);
        assert!((f.fragment_ratio - 2.0 / 3.0).abs() < 1e-6);
        assert_eq!(f.exclamations, 1);
        assert_eq!(f.questions, 1);
        assert_eq!(f.hedges, 1);
    }

    #[test]
    fn test_all_caps_excludes_single_letters() {
        let f = extract("I am SO DONE with you");
        assert_eq!(f.all_caps_words, 2);
        assert_eq!(f.direct_address, 1);
    }

    #[test]
    fn test_markers_and_meta() {
        let f = extract("Please, with all due respect, you are a bot reading a script.");
        assert!(f.politeness >= 2);
        assert!(f.meta_text);
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let text = "I HATE liars!! Obviously everyone knows.";
        assert_eq!(extract(text), extract(text));
        assert!(extract(text).emotional_intensity > 50.0);
    }
}
