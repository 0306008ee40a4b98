use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

/// Identifies the wave generation a timer was scheduled for.
///
/// The epoch changes on every reset, so a ticket that outlives its game is
/// recognisably stale.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WaveTicket {
    pub epoch: u32,
    pub generation: u32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub u64);

/// Runs wave generations after a delay. Hosts deliver each fired ticket back
/// to [`Session::on_timer`](crate::Session::on_timer).
pub trait Scheduler {
    fn schedule(&mut self, delay_ms: u32, ticket: WaveTicket) -> TaskId;

    /// Cancelling a task that already fired or was cancelled does nothing.
    fn cancel(&mut self, task: TaskId);
}

#[derive(Clone, Debug, PartialEq)]
struct PendingTask {
    id: TaskId,
    due_ms: u64,
    ticket: WaveTicket,
}

/// Virtual-clock scheduler. Nothing fires until [`advance`](Self::advance)
/// moves time forward.
#[derive(Clone, Debug, Default)]
pub struct ManualScheduler {
    now_ms: u64,
    next_id: u64,
    pending: Vec<PendingTask>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    /// Delay until the earliest pending task is due.
    pub fn next_due_in(&self) -> Option<u64> {
        self.pending
            .iter()
            .map(|task| task.due_ms.saturating_sub(self.now_ms))
            .min()
    }

    /// Moves the clock forward and returns the tickets that fell due, earliest
    /// first.
    pub fn advance(&mut self, ms: u64) -> Vec<WaveTicket> {
        self.now_ms = self.now_ms.saturating_add(ms);
        let now = self.now_ms;

        let mut due: Vec<PendingTask> = Vec::new();
        self.pending.retain(|task| {
            if task.due_ms <= now {
                due.push(task.clone());
                false
            } else {
                true
            }
        });
        due.sort_by_key(|task| (task.due_ms, task.id));
        due.into_iter().map(|task| task.ticket).collect()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, delay_ms: u32, ticket: WaveTicket) -> TaskId {
        self.next_id += 1;
        let id = TaskId(self.next_id);
        self.pending.push(PendingTask {
            id,
            due_ms: self.now_ms.saturating_add(delay_ms.into()),
            ticket,
        });
        id
    }

    fn cancel(&mut self, task: TaskId) {
        self.pending.retain(|pending| pending.id != task);
    }
}
