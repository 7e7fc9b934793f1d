//! Inkwave Ink
//!
//! Ripple feedback for a whole document from a single listener set.
//!
//! Elements opt in with the `data-ink-target` attribute. The
//! [`InteractionWatcher`] listens for pointer and keyboard input (or touch
//! input on touch devices), finds the marked ancestor of whatever was hit,
//! and injects an `ink` node into an `ink-container` child of that target.
//! The stylesheet animates the node from its `active` and `leaving` classes.
//!
//! # Example
//!
//! ```rust
//! use inkwave_core::{Event, Rect};
//! use inkwave_dom::Document;
//! use inkwave_ink::{mark_ink_target, InkConfig, InkRuntime};
//!
//! let mut document = Document::new();
//! let button = document.create_element("button");
//! document.append_child(document.root(), button).unwrap();
//! document.set_frame(button, Rect::new(0.0, 0.0, 100.0, 100.0)).unwrap();
//! mark_ink_target(&mut document, button).unwrap();
//!
//! let mut runtime = InkRuntime::new(document, InkConfig::new().touch_mode(false));
//! runtime.start().unwrap();
//!
//! runtime.dispatch(Event::pointer_down(button, 50.0, 50.0));
//! assert_eq!(runtime.ripple_elements(button).len(), 1);
//!
//! runtime.advance(50);
//! runtime.dispatch(Event::pointer_up(button, 50.0, 50.0));
//! runtime.advance(600);
//! assert!(runtime.ripple_elements(button).is_empty());
//! ```

pub mod config;
pub mod error;
pub mod geometry;
pub mod ripple;
pub mod runtime;
pub mod watcher;

pub use config::InkConfig;
pub use error::{InkError, Result};
pub use geometry::RippleGeometry;
pub use ripple::{PhaseEvent, Ripple, RippleId, RipplePhase, RippleQueue};
pub use runtime::InkRuntime;
pub use watcher::{
    mark_ink_target, InkContext, InkTask, InputMode, InteractionWatcher, ACTIVE_CLASS,
    CONTAINER_CLASS, INK_CLASS, INK_TARGET_ATTR, LEAVING_CLASS,
};
