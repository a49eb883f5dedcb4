//! Per-member state: personality, relationship edges, journals and motives.

pub mod journal;
pub mod motive;
pub mod personality;
pub mod relationship;

pub use journal::{
    MemoryEvent, MemoryKind, MemorySource, PrivateJournal, Promise, PromiseStatus, Secret,
    VotingPlan,
};
pub use motive::NpcMotive;
pub use personality::PersonalityProfile;
pub use relationship::{InteractionKind, InteractionRecord, Relationship};
