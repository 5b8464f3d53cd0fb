//! Deferred work.
//!
//! Some edits can only be finished after the platform has applied its own
//! mutation (cut, paste, a mobile backspace whose caret update arrives late).
//! The controller queues those continuations as [`DeferredTask`] values on a
//! [`Scheduler`] and runs them when the host advances it.

use std::collections::BTreeMap;

/// A continuation queued by the controller. Tasks carry no text: they read
/// the live field when they run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeferredTask {
    /// Re-mask whatever the platform left after a cut.
    ResyncAfterCut,
    /// Re-mask the text the platform pasted.
    ResyncAfterPaste,
    /// Put the caret back just past `caret` and delete backwards from there.
    DeferredBackspace { caret: usize },
}

/// Host-provided deferral primitive.
///
/// A task deferred with `delay_ticks = 0` becomes due on the next tick.
/// Tasks due on the same tick come back in submission order. There is no
/// cancellation.
pub trait Scheduler {
    fn defer(&mut self, task: DeferredTask, delay_ticks: u32);

    /// Move to the next tick and hand back every task now due.
    fn advance(&mut self) -> Vec<DeferredTask>;

    /// Number of tasks still queued.
    fn pending(&self) -> usize;
}

/// Logical-clock scheduler.
#[derive(Clone, Debug, Default)]
pub struct TickScheduler {
    now: u64,
    next_seq: u64,
    queue: BTreeMap<(u64, u64), DeferredTask>,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ticks elapsed so far.
    pub fn now(&self) -> u64 {
        self.now
    }
}

impl Scheduler for TickScheduler {
    fn defer(&mut self, task: DeferredTask, delay_ticks: u32) {
        let due = self.now + 1 + u64::from(delay_ticks);
        self.queue.insert((due, self.next_seq), task);
        self.next_seq += 1;
    }

    fn advance(&mut self) -> Vec<DeferredTask> {
        self.now += 1;
        let later = self.queue.split_off(&(self.now + 1, 0));
        let due = std::mem::replace(&mut self.queue, later);
        due.into_values().collect()
    }

    fn pending(&self) -> usize {
        self.queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_delay_runs_on_next_tick() {
        let mut scheduler = TickScheduler::new();
        scheduler.defer(DeferredTask::ResyncAfterCut, 0);
        assert_eq!(scheduler.pending(), 1);
        assert_eq!(scheduler.advance(), vec![DeferredTask::ResyncAfterCut]);
        assert_eq!(scheduler.pending(), 0);
        assert!(scheduler.advance().is_empty());
    }

    #[test]
    fn longer_delay_runs_after_shorter_one() {
        let mut scheduler = TickScheduler::new();
        scheduler.defer(DeferredTask::ResyncAfterPaste, 1);
        scheduler.defer(DeferredTask::ResyncAfterCut, 0);

        assert_eq!(scheduler.advance(), vec![DeferredTask::ResyncAfterCut]);
        assert_eq!(scheduler.advance(), vec![DeferredTask::ResyncAfterPaste]);
        assert_eq!(scheduler.now(), 2);
    }

    #[test]
    fn same_tick_keeps_submission_order() {
        let mut scheduler = TickScheduler::new();
        scheduler.defer(DeferredTask::DeferredBackspace { caret: 4 }, 0);
        scheduler.defer(DeferredTask::ResyncAfterCut, 0);
        scheduler.defer(DeferredTask::DeferredBackspace { caret: 2 }, 0);

        assert_eq!(
            scheduler.advance(),
            vec![
                DeferredTask::DeferredBackspace { caret: 4 },
                DeferredTask::ResyncAfterCut,
                DeferredTask::DeferredBackspace { caret: 2 },
            ]
        );
    }

    #[test]
    fn tasks_deferred_later_are_relative_to_now() {
        let mut scheduler = TickScheduler::new();
        scheduler.advance();
        scheduler.advance();
        scheduler.defer(DeferredTask::ResyncAfterPaste, 1);
        assert!(scheduler.advance().is_empty());
        assert_eq!(scheduler.advance(), vec![DeferredTask::ResyncAfterPaste]);
    }
}
