//! Inkwave Core
//!
//! This crate provides the foundational primitives shared by the inkwave crates:
//!
//! - **Node ids**: arena keys for elements of the headless element tree
//! - **Geometry**: points, sizes and page-space rectangles
//! - **Input events**: pointer, touch and keyboard events with key codes and modifiers
//!
//! # Example
//!
//! ```rust
//! use inkwave_core::events::{event_types, Event};
//! use inkwave_core::NodeId;
//!
//! let mut event = Event::pointer_down(NodeId::default(), 50.0, 50.0);
//! assert_eq!(event.event_type, event_types::POINTER_DOWN);
//!
//! event.stop_propagation();
//! assert!(event.propagation_stopped);
//! ```

pub mod events;
pub mod geometry;

use slotmap::new_key_type;

new_key_type! {
    /// Unique identifier for an element in a document
    pub struct NodeId;
}

pub use events::{Event, EventData, EventType, KeyCode, Modifiers, TouchPoint};
pub use geometry::{Point, Rect, Size};
