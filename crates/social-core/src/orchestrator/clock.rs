//! Clocks and the follow-up scheduler.
//!
//! The engine never reads wall time directly. It asks an injected [`Clock`],
//! which is either the system clock or a [`VirtualClock`] that tests and the
//! CLI advance by hand.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use cast_events::{DecisionType, MotiveType, NpcId};

/// Millisecond time source.
pub trait Clock: Send + Sync + fmt::Debug {
    fn now_ms(&self) -> u64;
}

/// Wall-clock time since the Unix epoch.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Hand-driven clock. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct VirtualClock {
    now: Arc<AtomicU64>,
}

impl VirtualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(start_ms)),
        }
    }

    pub fn advance(&self, ms: u64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }

    pub fn set(&self, ms: u64) {
        self.now.store(ms, Ordering::SeqCst);
    }
}

impl Clock for VirtualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// A follow-up an NPC committed to during a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledAction {
    pub id: u64,
    pub due_ms: u64,
    pub npc: NpcId,
    pub target: NpcId,
    pub decision: DecisionType,
    pub motive: MotiveType,
    pub content: String,
    /// Day the follow-up was scheduled on
    pub day: u32,
}

impl ScheduledAction {
    pub fn new(due_ms: u64, npc: NpcId, target: NpcId, decision: DecisionType, motive: MotiveType) -> Self {
        Self {
            id: 0,
            due_ms,
            npc,
            target,
            decision,
            motive,
            content: String::new(),
            day: 0,
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn on_day(mut self, day: u32) -> Self {
        self.day = day;
        self
    }
}

/// Pending follow-ups ordered by due time, then id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scheduler {
    next_id: u64,
    queue: Vec<ScheduledAction>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `action` under a fresh id and returns the id.
    pub fn schedule(&mut self, mut action: ScheduledAction) -> u64 {
        self.next_id += 1;
        action.id = self.next_id;
        let at = self
            .queue
            .partition_point(|a| (a.due_ms, a.id) <= (action.due_ms, action.id));
        self.queue.insert(at, action);
        self.next_id
    }

    /// Removes and returns every action due at `now_ms`.
    pub fn take_due(&mut self, now_ms: u64) -> Vec<ScheduledAction> {
        let split = self.queue.partition_point(|a| a.due_ms <= now_ms);
        self.queue.drain(..split).collect()
    }

    /// Drops pending actions involving `npc`.
    pub fn cancel_for(&mut self, npc: NpcId) -> usize {
        let before = self.queue.len();
        self.queue.retain(|a| a.npc != npc && a.target != npc);
        before - self.queue.len()
    }

    pub fn pending(&self) -> &[ScheduledAction] {
        &self.queue
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_virtual_clock_clones_share_time() {
        let clock = VirtualClock::new(1_000);
        let handle = clock.clone();
        handle.advance(500);
        assert_eq!(clock.now_ms(), 1_500);
        clock.set(10);
        assert_eq!(handle.now_ms(), 10);
    }

    #[test]
    fn test_system_clock_is_after_2020() {
        assert!(SystemClock.now_ms() > 1_577_836_800_000);
    }

    fn action(due_ms: u64, npc: u32, target: u32, decision: DecisionType, content: &str) -> ScheduledAction {
        ScheduledAction::new(due_ms, NpcId(npc), NpcId(target), decision, MotiveType::AllianceBuilding)
            .with_content(content)
            .on_day(1)
    }

    #[test]
    fn test_scheduler_orders_and_drains() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(action(300, 1, 0, DecisionType::SendDm, "late"));
        scheduler.schedule(action(100, 2, 0, DecisionType::Confront, "early"));
        scheduler.schedule(action(100, 3, 0, DecisionType::SendDm, "early too"));

        let due = scheduler.take_due(150);
        let contents: Vec<&str> = due.iter().map(|a| a.content.as_str()).collect();
        assert_eq!(contents, vec!["early", "early too"]);
        assert_eq!(scheduler.len(), 1);
        assert!(scheduler.take_due(299).is_empty());
        assert_eq!(scheduler.take_due(300).len(), 1);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_cancel_for_member() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(action(100, 1, 0, DecisionType::SendDm, "a"));
        scheduler.schedule(action(100, 2, 1, DecisionType::Confront, "b"));
        scheduler.schedule(action(100, 2, 0, DecisionType::SendDm, "c"));
        assert_eq!(scheduler.cancel_for(NpcId(1)), 2);
        assert_eq!(scheduler.pending()[0].content, "c");
    }
}
