//! Shared data types exchanged between the social simulation and its collaborators.
//!
//! This crate contains pure data structures with no simulation logic.
//! It is a dependency for all other crates in the workspace.

pub mod cast;
pub mod decision;
pub mod event;
pub mod reaction;

#[cfg(feature = "test-fixtures")]
pub mod fixtures;

pub use cast::{CastMember, NpcId, PlayerAction, PlayerActionKind};
pub use decision::{generate_decision_id, DecisionType, MotiveType, NpcDecision};
pub use event::{
    drama_tags, generate_event_id, Consequence, EmergentEvent, EmergentEventType, EventOutcome,
};
pub use reaction::{
    ReactionDeltas, ReactionSummary, ReactionTake, ResponseStrategy, ResponseTone, SocialStanding,
};
