//! Engine-level errors.

use thiserror::Error;

use crate::config::ConfigError;
use crate::output::SnapshotError;

#[derive(Debug, Error)]
pub enum EngineError {
    /// A rendered line arrived after the engine moved on.
    #[error("stale render for day {day} turn {turn} (engine is at day {current_day} turn {current_turn})")]
    StaleRender {
        day: u32,
        turn: u64,
        current_day: u32,
        current_turn: u64,
    },
    #[error("unknown cast member `{0}`")]
    UnknownMember(String),
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),
}
