use std::collections::{BTreeMap, HashMap};

use crate::foundation::ids::{NodeId, TimerId};

/// What a scheduled callback does when it fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum TimerKind {
    /// Staggered start of a reveal.
    BeginShow,
    /// End of the `show` transition.
    FinishShow,
    /// End of the `exit` transition; the node is disposed.
    FinishExit,
}

/// Payload handed back to [`RevealTree::on_timer`](crate::RevealTree::on_timer).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct TimerTask {
    /// Node the callback belongs to.
    pub node: NodeId,
    /// Node epoch at scheduling time; a mismatch marks the callback stale.
    pub epoch: u32,
    /// Action to perform.
    pub kind: TimerKind,
}

/// Cancellable "call back after N milliseconds" capability supplied by the host runtime.
pub trait TimerHost {
    /// Current time in milliseconds on the host clock.
    fn now_ms(&self) -> u64;

    /// Deliver `task` to the tree after `delay_ms`.
    fn schedule(&mut self, delay_ms: u64, task: TimerTask) -> TimerId;

    /// Drop a pending callback. Unknown or already fired ids are ignored.
    fn cancel(&mut self, id: TimerId);
}

/// Deterministic virtual clock.
///
/// Callbacks are delivered in deadline order, ties in scheduling order.
#[derive(Debug, Default)]
pub struct ManualTimers {
    now_ms: u64,
    next_id: u64,
    queue: BTreeMap<(u64, TimerId), TimerTask>,
    deadlines: HashMap<TimerId, u64>,
}

impl ManualTimers {
    /// Clock starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of callbacks still pending.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Deadline of the earliest pending callback.
    pub fn next_deadline(&self) -> Option<u64> {
        self.queue.keys().next().map(|(deadline, _)| *deadline)
    }

    /// Pop the earliest callback due at or before `until`, moving the clock to its deadline.
    pub fn pop_due(&mut self, until: u64) -> Option<TimerTask> {
        let (&(deadline, id), _) = self.queue.iter().next()?;
        if deadline > until {
            return None;
        }
        let task = self.queue.remove(&(deadline, id))?;
        self.deadlines.remove(&id);
        self.now_ms = self.now_ms.max(deadline);
        Some(task)
    }

    /// Move the clock forward without firing anything. The clock never runs backwards.
    pub fn set_now(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }
}

impl TimerHost for ManualTimers {
    fn now_ms(&self) -> u64 {
        self.now_ms
    }

    fn schedule(&mut self, delay_ms: u64, task: TimerTask) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let deadline = self.now_ms.saturating_add(delay_ms);
        self.queue.insert((deadline, id), task);
        self.deadlines.insert(id, deadline);
        id
    }

    fn cancel(&mut self, id: TimerId) {
        if let Some(deadline) = self.deadlines.remove(&id) {
            self.queue.remove(&(deadline, id));
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/reveal/timer.rs"]
mod tests;
