//! Runtime host
//!
//! Bundles a document, the timer queue and the watcher, routes input to the
//! watcher and fires scheduled tasks as the clock advances.

use inkwave_animation::TimerQueue;
use inkwave_core::{Event, NodeId};
use inkwave_dom::Document;

use crate::config::InkConfig;
use crate::error::Result;
use crate::watcher::{InkContext, InkTask, InputMode, InteractionWatcher};

/// A document with an interaction watcher attached
pub struct InkRuntime {
    document: Document,
    timers: TimerQueue<InkTask>,
    watcher: InteractionWatcher,
}

impl InkRuntime {
    pub fn new(document: Document, config: InkConfig) -> Self {
        Self {
            document,
            timers: TimerQueue::new(),
            watcher: InteractionWatcher::new(config),
        }
    }

    /// Start watching the document
    pub fn start(&mut self) -> Result<InputMode> {
        self.watcher.start(&mut self.document)
    }

    /// Stop watching and discard in-flight ripples
    pub fn stop(&mut self) -> Result<()> {
        let mut ctx = InkContext::new(&mut self.document, &mut self.timers);
        self.watcher.stop(&mut ctx)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn watcher(&self) -> &InteractionWatcher {
        &self.watcher
    }

    /// Run `f` with direct access to the watcher and its context
    pub fn with_watcher<R>(
        &mut self,
        f: impl FnOnce(&mut InteractionWatcher, &mut InkContext<'_>) -> R,
    ) -> R {
        let mut ctx = InkContext::new(&mut self.document, &mut self.timers);
        f(&mut self.watcher, &mut ctx)
    }

    pub fn now_ms(&self) -> u64 {
        self.timers.now_ms()
    }

    pub fn pending_tasks(&self) -> usize {
        self.timers.pending_count()
    }

    /// Deliver an input event.
    ///
    /// A timestamp later than the clock advances the clock first. The event
    /// is returned so callers can see whether propagation was stopped.
    pub fn dispatch(&mut self, mut event: Event) -> Event {
        if event.timestamp > self.now_ms() {
            self.advance_to(event.timestamp);
        }

        if self.watcher.wants(&event) {
            let mut ctx = InkContext::new(&mut self.document, &mut self.timers);
            self.watcher.handle_event(&mut ctx, &mut event);
        }
        event
    }

    /// Advance the clock by `ms`, firing due tasks
    pub fn advance(&mut self, ms: u64) {
        self.advance_to(self.now_ms().saturating_add(ms));
    }

    /// Advance the clock to `until_ms`, firing due tasks in order
    pub fn advance_to(&mut self, until_ms: u64) {
        while let Some((_, task)) = self.timers.pop_due(until_ms) {
            let mut ctx = InkContext::new(&mut self.document, &mut self.timers);
            self.watcher.fire(&mut ctx, task);
        }
        self.timers.advance_to(until_ms);
    }

    /// Fire every pending task, including ones scheduled along the way
    pub fn run_until_idle(&mut self) {
        while let Some(due) = self.timers.next_due() {
            self.advance_to(due);
        }
    }

    /// Ripple nodes currently shown on a target
    pub fn ripple_elements(&self, target: NodeId) -> Vec<NodeId> {
        InteractionWatcher::ripple_elements(&self.document, target)
    }
}
