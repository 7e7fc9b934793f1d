//! Inkwave Animation Timing
//!
//! Fixed-delay animation phases are driven by scheduled tasks rather than
//! per-frame interpolation: the stylesheet owns the tweening, the scheduler
//! only decides when a state class flips.
//!
//! # Features
//!
//! - **Virtual clock**: time advances only when the host says so, which makes
//!   every delay deterministic under test
//! - **Cancellable**: every scheduled task is addressable by a [`TimerId`]
//! - **Ordered**: due tasks fire earliest first, ties in scheduling order

pub mod scheduler;

pub use scheduler::{TimerId, TimerQueue};
