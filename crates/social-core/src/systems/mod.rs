//! Engines that evolve the social state: the relationship graph, memory,
//! autonomy, emergent events and advisory health checks.

pub mod autonomy;
pub mod emergent;
pub mod health;
pub mod memory;
pub mod relationships;

pub use autonomy::{AutonomyContext, AutonomyEngine};
pub use emergent::{EmergentEventEngine, EventWorld};
pub use health::{check_health, HealthWarning, HealthWarningKind};
pub use memory::{
    GossipRecord, MemoryDraft, MemoryEngine, MemoryQuery, MemorySearchResult, MAX_GLOBAL_LOG,
    MAX_GOSSIP_RECORDS,
};
pub use relationships::{AppliedDelta, RelationshipGraph};
