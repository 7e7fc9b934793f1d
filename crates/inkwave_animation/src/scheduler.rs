//! Task scheduler
//!
//! Holds delayed tasks keyed by [`TimerId`] and releases them as the virtual
//! clock advances.

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    pub struct TimerId;
}

struct Timer<T> {
    due_ms: u64,
    /// Scheduling order, breaks ties between equal due times
    seq: u64,
    task: T,
}

/// A queue of delayed tasks on a millisecond virtual clock
pub struct TimerQueue<T> {
    timers: SlotMap<TimerId, Timer<T>>,
    now_ms: u64,
    next_seq: u64,
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            timers: SlotMap::with_key(),
            now_ms: 0,
            next_seq: 0,
        }
    }

    /// Current clock value in milliseconds
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Schedule `task` to fire `delay_ms` after the current time
    pub fn schedule(&mut self, delay_ms: u64, task: T) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        let due_ms = self.now_ms.saturating_add(delay_ms);
        let id = self.timers.insert(Timer { due_ms, seq, task });
        tracing::trace!(?id, due_ms, "timer scheduled");
        id
    }

    /// Cancel a pending task, returning it if it had not fired yet
    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        let timer = self.timers.remove(id)?;
        tracing::trace!(?id, "timer cancelled");
        Some(timer.task)
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.contains_key(id)
    }

    /// Due time of a pending task
    pub fn due_ms(&self, id: TimerId) -> Option<u64> {
        self.timers.get(id).map(|t| t.due_ms)
    }

    pub fn pending_count(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Due time of the earliest pending task
    pub fn next_due(&self) -> Option<u64> {
        self.timers.values().map(|t| t.due_ms).min()
    }

    /// Remove and return the earliest task due at or before `until_ms`.
    ///
    /// The clock moves forward to the task's due time so that tasks
    /// scheduled while handling it are relative to when it fired.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<(TimerId, T)> {
        let id = self
            .timers
            .iter()
            .filter(|(_, t)| t.due_ms <= until_ms)
            .min_by_key(|(_, t)| (t.due_ms, t.seq))
            .map(|(id, _)| id)?;

        let timer = self.timers.remove(id)?;
        self.now_ms = self.now_ms.max(timer.due_ms);
        Some((id, timer.task))
    }

    /// Move the clock to `ms`. The clock never moves backward.
    pub fn advance_to(&mut self, ms: u64) {
        self.now_ms = self.now_ms.max(ms);
    }

    /// Drop every pending task
    pub fn clear(&mut self) {
        self.timers.clear();
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_in_due_order() {
        let mut timers = TimerQueue::new();
        timers.schedule(30, "c");
        timers.schedule(10, "a");
        timers.schedule(20, "b");

        let mut fired = Vec::new();
        while let Some((_, task)) = timers.pop_due(100) {
            fired.push(task);
        }
        assert_eq!(fired, vec!["a", "b", "c"]);
        assert_eq!(timers.now_ms(), 30);
    }

    #[test]
    fn test_ties_fire_in_scheduling_order() {
        let mut timers = TimerQueue::new();
        timers.schedule(5, 1);
        timers.schedule(5, 2);
        timers.schedule(5, 3);

        let fired: Vec<_> = std::iter::from_fn(|| timers.pop_due(5).map(|(_, t)| t)).collect();
        assert_eq!(fired, vec![1, 2, 3]);
    }

    #[test]
    fn test_not_due_yet() {
        let mut timers = TimerQueue::new();
        timers.schedule(50, ());
        assert!(timers.pop_due(49).is_none());
        assert_eq!(timers.next_due(), Some(50));
        assert!(timers.pop_due(50).is_some());
        assert!(timers.is_empty());
    }

    #[test]
    fn test_cancel() {
        let mut timers = TimerQueue::new();
        let id = timers.schedule(10, "gone");
        timers.schedule(20, "kept");

        assert!(timers.is_pending(id));
        assert_eq!(timers.cancel(id), Some("gone"));
        assert!(!timers.is_pending(id));
        assert_eq!(timers.cancel(id), None);

        assert_eq!(timers.pop_due(100).map(|(_, t)| t), Some("kept"));
    }

    #[test]
    fn test_schedule_relative_to_fired_task() {
        let mut timers = TimerQueue::new();
        timers.schedule(50, 0);
        let (_, _) = timers.pop_due(1000).unwrap();

        let id = timers.schedule(150, 1);
        assert_eq!(timers.due_ms(id), Some(200));
    }

    #[test]
    fn test_clock_never_rewinds() {
        let mut timers: TimerQueue<()> = TimerQueue::new();
        timers.advance_to(100);
        timers.advance_to(40);
        assert_eq!(timers.now_ms(), 100);
    }
}
