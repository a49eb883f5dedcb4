//! Social Simulation Core
//!
//! Turns player utterances into structured intent, keeps the cast's web of
//! relationships and memories, drives autonomous NPC behavior and seeds
//! emergent drama. [`GameEngine`] owns every engine and is the entry point.

pub mod components;
pub mod config;
pub mod error;
pub mod language;
pub mod orchestrator;
pub mod output;
pub mod setup;
pub mod systems;

pub use config::{default_config_toml, ConfigError, EngineConfig};
pub use error::EngineError;
pub use orchestrator::{GameEngine, PlayerTurn, SystemClock, TickReport, VirtualClock};
pub use output::{read_snapshot, write_snapshot, GameSnapshot, SnapshotError};
pub use setup::Roster;
