//! Snapshot Export and Import
//!
//! A snapshot is the full serializable engine state. Tuning configuration is
//! not part of it; the importer supplies its own. The RNG is not stored either:
//! it is re-derived from the seed and the tick/turn counters.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use thiserror::Error;
use uuid::Uuid;

use crate::language::{SocialInterpreter, SpeechActClassifier};
use crate::orchestrator::clock::Scheduler;
use crate::setup::Roster;
use crate::systems::{AutonomyEngine, EmergentEventEngine, MemoryEngine, RelationshipGraph};

/// Bumped when the layout changes incompatibly.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported snapshot version {0}")]
    Version(u32),
    #[error("snapshot is inconsistent: {0}")]
    Inconsistent(String),
}

/// Complete engine state at one point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub version: u32,
    pub snapshot_id: String,
    pub session_id: Uuid,
    pub seed: u64,
    pub day: u32,
    pub turn: u64,
    pub ticks: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_tick_ms: Option<u64>,
    pub roster: Roster,
    pub graph: RelationshipGraph,
    pub memory: MemoryEngine,
    pub autonomy: AutonomyEngine,
    pub events: EmergentEventEngine,
    pub interpreter: SocialInterpreter,
    pub classifier: SpeechActClassifier,
    pub scheduler: Scheduler,
}

impl GameSnapshot {
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_str(json)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Checks the version and that the graph matches the roster.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::Version(self.version));
        }
        if !self.graph.is_well_formed() || self.graph.member_count() != self.roster.len() {
            return Err(SnapshotError::Inconsistent(format!(
                "graph built for {} members, roster has {}",
                self.graph.member_count(),
                self.roster.len()
            )));
        }
        Ok(())
    }
}

/// Formats a snapshot id.
pub fn snapshot_id(sequence: u64) -> String {
    format!("snap_{:06}", sequence)
}

/// Write snapshot to file
pub fn write_snapshot(snapshot: &GameSnapshot, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
    if let Some(parent) = path.as_ref().parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, snapshot.to_json()?)?;
    Ok(())
}

/// Read snapshot from file
pub fn read_snapshot(path: impl AsRef<Path>) -> Result<GameSnapshot, SnapshotError> {
    let json = fs::read_to_string(path)?;
    GameSnapshot::from_json(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EngineConfig, RelationshipConfig};
    use cast_events::fixtures::sample_cast;

    fn snapshot() -> GameSnapshot {
        let roster = Roster::new(sample_cast());
        let config = EngineConfig::default();
        GameSnapshot {
            version: SNAPSHOT_VERSION,
            snapshot_id: snapshot_id(1),
            session_id: Uuid::new_v4(),
            seed: 42,
            day: 3,
            turn: 7,
            ticks: 12,
            last_tick_ms: Some(360_000),
            graph: RelationshipGraph::new(&roster, RelationshipConfig::default()),
            memory: MemoryEngine::new(&roster),
            autonomy: AutonomyEngine::new(config.autonomy.clone()),
            events: EmergentEventEngine::new(config.events.clone()),
            interpreter: SocialInterpreter::new(config.interpretation.clone()),
            classifier: SpeechActClassifier::default(),
            scheduler: Scheduler::new(),
            roster,
        }
    }

    #[test]
    fn test_snapshot_id_format() {
        assert_eq!(snapshot_id(1), "snap_000001");
    }

    #[test]
    fn test_snapshot_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("snap.json");
        let original = snapshot();
        write_snapshot(&original, &path).unwrap();

        let parsed = read_snapshot(&path).unwrap();
        assert_eq!(parsed.snapshot_id, "snap_000001");
        assert_eq!(parsed.session_id, original.session_id);
        assert_eq!(parsed.turn, 7);
        assert_eq!(parsed.roster.len(), 6);
    }

    #[test]
    fn test_rejects_mismatched_graph() {
        let mut bad = snapshot();
        bad.roster = Roster::new(sample_cast().into_iter().take(3).collect());
        let json = bad.to_json().unwrap();
        assert!(matches!(
            GameSnapshot::from_json(&json),
            Err(SnapshotError::Inconsistent(_))
        ));
    }

    #[test]
    fn test_rejects_unknown_version() {
        let mut bad = snapshot();
        bad.version = 99;
        let json = bad.to_json().unwrap();
        assert!(matches!(GameSnapshot::from_json(&json), Err(SnapshotError::Version(99))));
    }
}
