//! Inkwave Element Tree
//!
//! A headless stand-in for a browser document: an arena of elements with
//! attributes, classes, inline pixel styles and host-assigned page frames.
//! Layout is not computed here; the host sets each element's frame.

pub mod element;
pub mod error;
pub mod listeners;
pub mod tree;

pub use element::{Element, InlineStyle};
pub use error::{DomError, Result};
pub use listeners::{ListenerId, ListenerRegistry};
pub use tree::{Ancestors, Document};
