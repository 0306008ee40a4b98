use chain_reaction_core::{Scheduler, TaskId, WaveTicket};
use gloo::timers::callback::Timeout;
use yew::Callback;

/// Paces waves with browser timeouts. Dropping a pending [`Timeout`] clears it,
/// which is how a reset cancels the next generation.
pub(crate) struct TimeoutScheduler {
    on_fire: Callback<WaveTicket>,
    next_id: u64,
    pending: Option<(TaskId, Timeout)>,
}

impl TimeoutScheduler {
    pub(crate) fn new(on_fire: Callback<WaveTicket>) -> Self {
        Self {
            on_fire,
            next_id: 0,
            pending: None,
        }
    }
}

impl Scheduler for TimeoutScheduler {
    fn schedule(&mut self, delay_ms: u32, ticket: WaveTicket) -> TaskId {
        self.next_id += 1;
        let id = TaskId(self.next_id);
        let on_fire = self.on_fire.clone();
        log::trace!("scheduling {:?} in {}ms", ticket, delay_ms);
        // Only one generation is ever pending, and the one replaced here has
        // already fired.
        self.pending = Some((id, Timeout::new(delay_ms, move || on_fire.emit(ticket))));
        id
    }

    fn cancel(&mut self, task: TaskId) {
        if let Some((_, timeout)) = self.pending.take_if(|(id, _)| *id == task) {
            log::trace!("cancelling {:?}", task);
            drop(timeout);
        }
    }
}
