//! Ripple records and their lifecycle
//!
//! Each ripple walks a fixed path of phases:
//!
//! ```text
//! Spawning --Activate--> Active --RequestTeardown--> Holding --BeginLeave--> Leaving --Dispose--> Disposed
//! ```
//!
//! `Spawning` covers the short delay before the grow animation starts and
//! `Holding` the enter delay between a teardown request and the fade.

use std::collections::VecDeque;

use inkwave_animation::TimerId;
use inkwave_core::NodeId;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Unique identifier for a ripple record
    pub struct RippleId;
}

/// Lifecycle phase of a ripple
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RipplePhase {
    Spawning,
    Active,
    Holding,
    Leaving,
    Disposed,
}

/// Events that move a ripple between phases
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhaseEvent {
    Activate,
    RequestTeardown,
    BeginLeave,
    Dispose,
}

impl RipplePhase {
    /// Phase reached by applying `event`, or `None` if the event does not apply
    pub fn next(self, event: PhaseEvent) -> Option<RipplePhase> {
        use PhaseEvent::*;
        use RipplePhase::*;

        match (self, event) {
            (Spawning, Activate) => Some(Active),
            (Active, RequestTeardown) => Some(Holding),
            (Holding, BeginLeave) => Some(Leaving),
            (Leaving, Dispose) => Some(Disposed),
            _ => None,
        }
    }

    /// Whether the fade has started
    pub fn is_leaving(self) -> bool {
        matches!(self, RipplePhase::Leaving | RipplePhase::Disposed)
    }
}

/// One in-flight ripple
#[derive(Clone, Debug)]
pub struct Ripple {
    /// The visual node
    pub element: NodeId,
    /// Ink target the ripple was spawned on
    pub target: NodeId,
    /// Container the visual node was inserted into
    pub container: NodeId,
    /// Clock value at spawn
    pub created_at: u64,
    /// The one scheduled task currently owned by this ripple
    pub timer: Option<TimerId>,
    pub phase: RipplePhase,
    /// A teardown was requested before the ripple became active
    pub release_pending: bool,
}

impl Ripple {
    pub fn new(element: NodeId, target: NodeId, container: NodeId, created_at: u64) -> Self {
        Self {
            element,
            target,
            container,
            created_at,
            timer: None,
            phase: RipplePhase::Spawning,
            release_pending: false,
        }
    }

    /// Apply a phase event. Returns false and leaves the phase alone if it does not apply.
    pub fn transition(&mut self, event: PhaseEvent) -> bool {
        match self.phase.next(event) {
            Some(next) => {
                self.phase = next;
                true
            }
            None => false,
        }
    }

    /// Active with no task pending
    pub fn can_tear_down(&self) -> bool {
        self.phase == RipplePhase::Active && self.timer.is_none()
    }

    pub fn is_leaving(&self) -> bool {
        self.phase.is_leaving()
    }
}

/// In-flight ripples, oldest first
#[derive(Default)]
pub struct RippleQueue {
    records: SlotMap<RippleId, Ripple>,
    order: VecDeque<RippleId>,
}

impl RippleQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a ripple at the tail
    pub fn push(&mut self, ripple: Ripple) -> RippleId {
        let id = self.records.insert(ripple);
        self.order.push_back(id);
        id
    }

    pub fn get(&self, id: RippleId) -> Option<&Ripple> {
        self.records.get(id)
    }

    pub fn get_mut(&mut self, id: RippleId) -> Option<&mut Ripple> {
        self.records.get_mut(id)
    }

    pub fn contains(&self, id: RippleId) -> bool {
        self.records.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Oldest ripple
    pub fn head(&self) -> Option<RippleId> {
        self.order.front().copied()
    }

    /// Most recently pushed ripple
    pub fn tail(&self) -> Option<RippleId> {
        self.order.back().copied()
    }

    /// Ripple with the latest creation time; ties go to the one pushed last
    pub fn latest(&self) -> Option<RippleId> {
        self.iter()
            .max_by_key(|(_, ripple)| ripple.created_at)
            .map(|(id, _)| id)
    }

    /// Ripples in queue order, oldest first
    pub fn iter(&self) -> impl Iterator<Item = (RippleId, &Ripple)> {
        self.order
            .iter()
            .filter_map(|&id| self.records.get(id).map(|ripple| (id, ripple)))
    }

    /// Ids in queue order, oldest first
    pub fn ids(&self) -> Vec<RippleId> {
        self.order.iter().copied().collect()
    }

    /// Oldest ripple that is active and has nothing scheduled
    pub fn oldest_eligible(&self) -> Option<RippleId> {
        self.find_oldest(Ripple::can_tear_down)
    }

    /// Oldest ripple still in its spawn delay with no teardown requested yet
    pub fn oldest_unreleased_spawning(&self) -> Option<RippleId> {
        self.find_oldest(|r| r.phase == RipplePhase::Spawning && !r.release_pending)
    }

    /// Oldest ripple whose fade has not started
    pub fn oldest_not_leaving(&self) -> Option<RippleId> {
        self.find_oldest(|r| !r.is_leaving())
    }

    fn find_oldest(&self, predicate: impl Fn(&Ripple) -> bool) -> Option<RippleId> {
        self.iter()
            .find(|(_, ripple)| predicate(ripple))
            .map(|(id, _)| id)
    }

    /// Remove a ripple wherever it sits in the queue
    pub fn remove(&mut self, id: RippleId) -> Option<Ripple> {
        let ripple = self.records.remove(id)?;
        if self.order.front() == Some(&id) {
            self.order.pop_front();
        } else {
            self.order.retain(|&other| other != id);
        }
        Some(ripple)
    }

    /// Remove every ripple except `keep`, returning the removed ones oldest first
    pub fn drain_except(&mut self, keep: RippleId) -> Vec<Ripple> {
        let removed: Vec<RippleId> = self.order.iter().copied().filter(|&id| id != keep).collect();
        removed.into_iter().filter_map(|id| self.remove(id)).collect()
    }

    /// Remove every ripple, oldest first
    pub fn drain(&mut self) -> Vec<Ripple> {
        let ids: Vec<RippleId> = self.order.drain(..).collect();
        ids.into_iter()
            .filter_map(|id| self.records.remove(id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ripple_at(created_at: u64) -> Ripple {
        Ripple::new(
            NodeId::default(),
            NodeId::default(),
            NodeId::default(),
            created_at,
        )
    }

    #[test]
    fn test_phase_path() {
        let mut ripple = ripple_at(0);
        assert!(ripple.transition(PhaseEvent::Activate));
        assert!(ripple.can_tear_down());
        assert!(ripple.transition(PhaseEvent::RequestTeardown));
        assert!(!ripple.is_leaving());
        assert!(ripple.transition(PhaseEvent::BeginLeave));
        assert!(ripple.is_leaving());
        assert!(ripple.transition(PhaseEvent::Dispose));
        assert_eq!(ripple.phase, RipplePhase::Disposed);
    }

    #[test]
    fn test_invalid_transitions_rejected() {
        let mut ripple = ripple_at(0);
        assert!(!ripple.transition(PhaseEvent::RequestTeardown));
        assert!(!ripple.transition(PhaseEvent::BeginLeave));
        assert!(!ripple.transition(PhaseEvent::Dispose));
        assert_eq!(ripple.phase, RipplePhase::Spawning);

        ripple.transition(PhaseEvent::Activate);
        assert!(!ripple.transition(PhaseEvent::Activate));
        assert_eq!(ripple.phase, RipplePhase::Active);
    }

    #[test]
    fn test_active_with_timer_is_not_eligible() {
        let mut queue = RippleQueue::new();
        let id = queue.push(ripple_at(0));
        queue.get_mut(id).unwrap().transition(PhaseEvent::Activate);
        assert_eq!(queue.oldest_eligible(), Some(id));

        queue.get_mut(id).unwrap().timer = Some(TimerId::default());
        assert_eq!(queue.oldest_eligible(), None);
    }

    #[test]
    fn test_queue_order_and_lookup() {
        let mut queue = RippleQueue::new();
        let a = queue.push(ripple_at(0));
        let b = queue.push(ripple_at(10));
        let c = queue.push(ripple_at(20));

        assert_eq!(queue.head(), Some(a));
        assert_eq!(queue.tail(), Some(c));
        assert_eq!(queue.latest(), Some(c));
        assert_eq!(queue.ids(), vec![a, b, c]);

        queue.get_mut(a).unwrap().transition(PhaseEvent::Activate);
        queue.get_mut(b).unwrap().transition(PhaseEvent::Activate);
        assert_eq!(queue.oldest_eligible(), Some(a));
        assert_eq!(queue.oldest_unreleased_spawning(), Some(c));

        queue.remove(b);
        assert_eq!(queue.ids(), vec![a, c]);
        assert!(!queue.contains(b));
    }

    #[test]
    fn test_latest_ties_go_to_last_pushed() {
        let mut queue = RippleQueue::new();
        queue.push(ripple_at(5));
        let second = queue.push(ripple_at(5));
        assert_eq!(queue.latest(), Some(second));
    }

    #[test]
    fn test_drain_except() {
        let mut queue = RippleQueue::new();
        let a = queue.push(ripple_at(0));
        let b = queue.push(ripple_at(1));
        let c = queue.push(ripple_at(2));

        let removed = queue.drain_except(c);
        assert_eq!(removed.len(), 2);
        assert_eq!(queue.ids(), vec![c]);
        assert!(!queue.contains(a));
        assert!(!queue.contains(b));
    }
}
