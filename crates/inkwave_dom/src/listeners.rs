//! Document-level listener registry
//!
//! Records which event types each global listener set subscribes to, so a
//! host knows which input it must route and tests can check how many sets
//! are attached.

use inkwave_core::EventType;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

new_key_type! {
    /// Handle for a registered listener set
    pub struct ListenerId;
}

/// Global listener sets attached to a document
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: SlotMap<ListenerId, SmallVec<[EventType; 4]>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener set for the given event types
    pub fn subscribe(&mut self, event_types: &[EventType]) -> ListenerId {
        self.listeners.insert(SmallVec::from_slice(event_types))
    }

    /// Remove a listener set. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id).is_some()
    }

    /// Whether any listener set subscribes to `event_type`
    pub fn is_subscribed(&self, event_type: EventType) -> bool {
        self.listeners.values().any(|types| types.contains(&event_type))
    }

    /// Whether the given listener set subscribes to `event_type`
    pub fn listens(&self, id: ListenerId, event_type: EventType) -> bool {
        self.listeners
            .get(id)
            .is_some_and(|types| types.contains(&event_type))
    }

    /// Event types of a listener set
    pub fn event_types(&self, id: ListenerId) -> Option<&[EventType]> {
        self.listeners.get(id).map(|types| types.as_slice())
    }

    /// Number of registered listener sets
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}
