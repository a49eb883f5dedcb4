//! Utterance understanding: surface features, speech acts, conversational
//! intent, global intent hypotheses and per-NPC interpretation.

pub mod conversation;
pub mod hypothesis;
pub mod interpretation;
pub mod lexicon;
pub mod speech_act;
pub mod surface;

pub use conversation::{analyze, ConversationIntent, ConversationTopic, NumericClaim};
pub use hypothesis::{
    generate, AxisDistribution, AxisLabel, EmotionalPosture, GameMotive, IntentHypotheses,
    RiskStance, SocialStrategy,
};
pub use interpretation::{
    AntiExploitProfile, GlobalToneProfile, NpcToneProfile, PerceivedIntent, SocialInterpreter,
};
pub use speech_act::{
    classify, EmotionalSubtext, LinguisticProfile, SpeechAct, SpeechActClassifier, SpeechActType,
};
pub use surface::{extract, SurfaceFeatures};
