//! Document-wide interaction watcher
//!
//! One listener set covers every ink target in a document. Input is resolved
//! to the nearest marked ancestor, a container is created under that target
//! on demand, and each ripple is driven through its phases by scheduled
//! tasks:
//!
//! - spawn: insert the visual node, activate after [`SPAWN_DELAY_MS`]
//! - teardown request: start the leave after `enter_delay_ms`
//! - leave: dispose after `leave_delay_ms`
//!
//! Teardown is first-in first-out across the whole document: a release
//! retires the oldest ripple that is ready, not necessarily the one under
//! the pointer.

use inkwave_animation::TimerQueue;
use inkwave_core::events::{buttons, event_types};
use inkwave_core::{Event, EventData, EventType, KeyCode, NodeId, Point};
use inkwave_dom::{Document, InlineStyle, ListenerId};
use rustc_hash::FxHashSet;

use crate::config::InkConfig;
use crate::error::{InkError, Result};
use crate::geometry::{pointer_from, RippleGeometry};
use crate::ripple::{PhaseEvent, Ripple, RippleId, RippleQueue};

/// Attribute marking an element as an ink target
pub const INK_TARGET_ATTR: &str = "data-ink-target";

/// Class of the per-target ripple container
pub const CONTAINER_CLASS: &str = "ink-container";

/// Class of a ripple node
pub const INK_CLASS: &str = "ink";

/// State class added once the grow animation starts
pub const ACTIVE_CLASS: &str = "active";

/// State class added once the fade starts
pub const LEAVING_CLASS: &str = "leaving";

/// Delay between inserting a ripple and marking it active
pub const SPAWN_DELAY_MS: u64 = 50;

/// A touch-move this soon after the latest spawn cancels that ripple
pub const SCROLL_CANCEL_WINDOW_MS: u64 = 200;

/// Mark an element as an ink target
pub fn mark_ink_target(document: &mut Document, node: NodeId) -> inkwave_dom::Result<()> {
    document.set_attribute(node, INK_TARGET_ATTR, "true")
}

/// Scheduled work owned by the watcher
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InkTask {
    Activate(RippleId),
    BeginLeave(RippleId),
    Dispose(RippleId),
    /// Deferred teardown request for a target (touch end)
    Release(NodeId),
}

/// Which input family the watcher listens to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputMode {
    Touch,
    PointerAndKeyboard,
}

impl InputMode {
    /// Event types of the global listener set for this mode
    pub fn event_types(self) -> &'static [EventType] {
        match self {
            InputMode::Touch => &[event_types::TOUCH_START, event_types::TOUCH_END],
            InputMode::PointerAndKeyboard => &[
                event_types::POINTER_DOWN,
                event_types::POINTER_UP,
                event_types::KEY_UP,
            ],
        }
    }
}

/// Mutable state the watcher operates on
pub struct InkContext<'a> {
    pub document: &'a mut Document,
    pub timers: &'a mut TimerQueue<InkTask>,
}

impl<'a> InkContext<'a> {
    pub fn new(document: &'a mut Document, timers: &'a mut TimerQueue<InkTask>) -> Self {
        Self { document, timers }
    }

    fn now_ms(&self) -> u64 {
        self.timers.now_ms()
    }
}

/// Watches a document's input and drives ripple feedback on ink targets
pub struct InteractionWatcher {
    config: InkConfig,
    mode: Option<InputMode>,
    listener: Option<ListenerId>,
    ripples: RippleQueue,
    /// Targets with a one-shot pointer-leave listener
    leave_armed: FxHashSet<NodeId>,
    /// Targets with a one-shot blur listener
    blur_armed: FxHashSet<NodeId>,
    touch_move_armed: bool,
}

impl InteractionWatcher {
    pub fn new(config: InkConfig) -> Self {
        Self {
            config,
            mode: None,
            listener: None,
            ripples: RippleQueue::new(),
            leave_armed: FxHashSet::default(),
            blur_armed: FxHashSet::default(),
            touch_move_armed: false,
        }
    }

    pub fn config(&self) -> &InkConfig {
        &self.config
    }

    /// Input mode chosen at start, `None` while stopped
    pub fn mode(&self) -> Option<InputMode> {
        self.mode
    }

    pub fn is_started(&self) -> bool {
        self.mode.is_some()
    }

    pub fn ripples(&self) -> &RippleQueue {
        &self.ripples
    }

    pub fn is_touch_move_armed(&self) -> bool {
        self.touch_move_armed
    }

    pub fn is_leave_armed(&self, target: NodeId) -> bool {
        self.leave_armed.contains(&target)
    }

    pub fn is_blur_armed(&self, target: NodeId) -> bool {
        self.blur_armed.contains(&target)
    }

    /// Pick the input mode and attach the single global listener set
    pub fn start(&mut self, document: &mut Document) -> Result<InputMode> {
        if self.is_started() {
            return Err(InkError::AlreadyStarted);
        }

        let mode = if self.config.resolve_touch_mode(document) {
            InputMode::Touch
        } else {
            InputMode::PointerAndKeyboard
        };
        self.listener = Some(document.listeners_mut().subscribe(mode.event_types()));
        self.mode = Some(mode);
        tracing::debug!(?mode, "interaction watcher started");
        Ok(mode)
    }

    /// Detach the listener set and discard every in-flight ripple
    pub fn stop(&mut self, ctx: &mut InkContext<'_>) -> Result<()> {
        let listener = self.listener.take().ok_or(InkError::NotStarted)?;
        ctx.document.listeners_mut().unsubscribe(listener);
        self.mode = None;
        self.leave_armed.clear();
        self.blur_armed.clear();
        self.touch_move_armed = false;

        ctx.timers.clear();
        let discarded = self.ripples.drain();
        for ripple in &discarded {
            discard_node(ctx.document, ripple.element);
        }
        tracing::debug!(discarded = discarded.len(), "interaction watcher stopped");
        Ok(())
    }

    /// Whether the watcher has a listener for this event
    pub fn wants(&self, event: &Event) -> bool {
        let Some(mode) = self.mode else {
            return false;
        };
        match event.event_type {
            event_types::POINTER_LEAVE => self.leave_armed.contains(&event.target),
            event_types::BLUR => self.blur_armed.contains(&event.target),
            event_types::TOUCH_MOVE => self.touch_move_armed,
            other => mode.event_types().contains(&other),
        }
    }

    /// Handle one input event
    pub fn handle_event(&mut self, ctx: &mut InkContext<'_>, event: &mut Event) {
        if !self.wants(event) {
            return;
        }

        match event.event_type {
            event_types::POINTER_DOWN => self.on_pointer_down(ctx, event),
            event_types::POINTER_UP => self.on_pointer_up(ctx, event),
            event_types::POINTER_LEAVE => self.on_pointer_leave(ctx, event),
            event_types::KEY_UP => self.on_key_up(ctx, event),
            event_types::BLUR => self.on_blur(ctx, event),
            event_types::TOUCH_START => self.on_touch_start(ctx, event),
            event_types::TOUCH_MOVE => self.on_touch_move(ctx),
            event_types::TOUCH_END => self.on_touch_end(ctx, event),
            _ => {}
        }
    }

    /// Run a scheduled task
    pub fn fire(&mut self, ctx: &mut InkContext<'_>, task: InkTask) {
        match task {
            InkTask::Activate(id) => self.activate(ctx, id),
            InkTask::BeginLeave(id) => self.begin_leave(ctx, id),
            InkTask::Dispose(id) => self.dispose(ctx, id),
            InkTask::Release(target) => {
                self.dequeue_ripple(ctx, target);
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Target and container resolution
    // ─────────────────────────────────────────────────────────────────────

    /// Nearest marked element at or above `origin`.
    ///
    /// Only elements that have a parent are considered, so the root of the
    /// tree is never a target.
    pub fn resolve_target(document: &Document, origin: NodeId) -> Option<NodeId> {
        document
            .ancestors(origin)
            .take_while(|&node| document.parent(node).is_some())
            .find(|&node| document.has_attribute(node, INK_TARGET_ATTR))
    }

    /// Existing ripple container among the target's direct children
    pub fn find_container(document: &Document, target: NodeId) -> Option<NodeId> {
        document
            .children(target)
            .iter()
            .copied()
            .find(|&child| document.has_class(child, CONTAINER_CLASS))
    }

    /// Ripple container of a target, created as its first child if missing.
    ///
    /// The container's frame is synced to the target's current frame on
    /// every call, so a target moved by the host keeps local coordinates.
    pub fn get_or_create_container(
        document: &mut Document,
        target: NodeId,
    ) -> inkwave_dom::Result<NodeId> {
        let frame = document
            .frame(target)
            .ok_or(inkwave_dom::DomError::NodeNotFound(target))?;
        if let Some(container) = Self::find_container(document, target) {
            document.set_frame(container, frame)?;
            return Ok(container);
        }

        let container = document.create_element("div");
        document.add_class(container, CONTAINER_CLASS)?;
        document.set_frame(container, frame)?;
        document.prepend_child(target, container)?;
        tracing::trace!(?target, ?container, "ink container created");
        Ok(container)
    }

    /// Ripple nodes currently inside a target's container
    pub fn ripple_elements(document: &Document, target: NodeId) -> Vec<NodeId> {
        Self::find_container(document, target)
            .map(|container| document.children(container).to_vec())
            .unwrap_or_default()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Ripple transitions
    // ─────────────────────────────────────────────────────────────────────

    /// Insert a ripple for `target` at page coordinates `(x, y)`.
    ///
    /// Without both coordinates the ripple starts at the container center.
    /// Returns `None` if the target is no longer in the document.
    pub fn spawn_ripple(
        &mut self,
        ctx: &mut InkContext<'_>,
        x: Option<f32>,
        y: Option<f32>,
        target: NodeId,
    ) -> Option<RippleId> {
        let (container, element, geometry) = match insert_ripple(ctx.document, target, x, y) {
            Ok(inserted) => inserted,
            Err(err) => {
                tracing::debug!(?target, %err, "ripple not spawned");
                return None;
            }
        };

        let id = self.ripples.push(Ripple::new(
            element,
            target,
            container,
            ctx.now_ms(),
        ));
        let timer = ctx.timers.schedule(SPAWN_DELAY_MS, InkTask::Activate(id));
        if let Some(ripple) = self.ripples.get_mut(id) {
            ripple.timer = Some(timer);
        }

        tracing::debug!(
            ?id,
            ?target,
            x = geometry.center.x,
            y = geometry.center.y,
            radius = geometry.radius,
            "ripple spawned"
        );
        Some(id)
    }

    /// Spawn delay elapsed: start the grow animation
    pub fn activate(&mut self, ctx: &mut InkContext<'_>, id: RippleId) {
        let Some(ripple) = self.ripples.get_mut(id) else {
            return;
        };
        if !ripple.transition(PhaseEvent::Activate) {
            return;
        }
        ripple.timer = None;
        let element = ripple.element;
        let release_pending = std::mem::take(&mut ripple.release_pending);

        add_state_class(ctx.document, element, ACTIVE_CLASS);
        if release_pending {
            self.request_teardown(ctx, id);
        }
    }

    /// Ask for the oldest ready ripple to be torn down.
    ///
    /// If nothing is ready but a ripple is still in its spawn delay, that
    /// ripple is flagged so it tears down as soon as it activates.
    pub fn dequeue_ripple(&mut self, ctx: &mut InkContext<'_>, target: NodeId) -> Option<RippleId> {
        if let Some(id) = self.ripples.oldest_eligible() {
            self.request_teardown(ctx, id);
            tracing::trace!(?id, ?target, "ripple teardown scheduled");
            return Some(id);
        }

        if let Some(id) = self.ripples.oldest_unreleased_spawning() {
            if let Some(ripple) = self.ripples.get_mut(id) {
                ripple.release_pending = true;
            }
            tracing::trace!(?id, ?target, "ripple teardown deferred until active");
            return Some(id);
        }

        tracing::trace!(?target, "no ripple ready for teardown");
        None
    }

    fn request_teardown(&mut self, ctx: &mut InkContext<'_>, id: RippleId) -> bool {
        let enter_delay = self.config.enter_delay_ms;
        let Some(ripple) = self.ripples.get_mut(id) else {
            return false;
        };
        if !ripple.transition(PhaseEvent::RequestTeardown) {
            return false;
        }
        ripple.timer = Some(ctx.timers.schedule(enter_delay, InkTask::BeginLeave(id)));
        true
    }

    /// Enter delay elapsed: start the fade
    pub fn begin_leave(&mut self, ctx: &mut InkContext<'_>, id: RippleId) {
        let leave_delay = self.config.leave_delay_ms;
        let Some(ripple) = self.ripples.get_mut(id) else {
            return;
        };
        if !ripple.transition(PhaseEvent::BeginLeave) {
            return;
        }
        ripple.timer = Some(ctx.timers.schedule(leave_delay, InkTask::Dispose(id)));
        let element = ripple.element;

        add_state_class(ctx.document, element, LEAVING_CLASS);
    }

    /// Fade elapsed: remove the node and the record.
    ///
    /// If the node is no longer in its container (the target was unmounted
    /// underneath the animation) the queue is reconciled instead.
    pub fn dispose(&mut self, ctx: &mut InkContext<'_>, id: RippleId) {
        let Some(ripple) = self.ripples.get_mut(id) else {
            return;
        };
        if !ripple.transition(PhaseEvent::Dispose) {
            return;
        }
        ripple.timer = None;
        let (element, container) = (ripple.element, ripple.container);

        if ctx.document.parent(element) == Some(container) {
            let was_head = self.ripples.head() == Some(id);
            self.ripples.remove(id);
            discard_node(ctx.document, element);
            if !was_head {
                tracing::debug!(?id, "ripple disposed ahead of older ripples");
            }
            return;
        }

        tracing::debug!(?id, "ripple node left its container, reconciling queue");
        self.ripples.remove(id);
        discard_node(ctx.document, element);
        self.reconcile_queue(ctx);
    }

    /// Collapse the queue to its most recent ripple, cancelling and
    /// detaching everything else
    pub fn reconcile_queue(&mut self, ctx: &mut InkContext<'_>) {
        let Some(keep) = self.ripples.latest() else {
            return;
        };

        let dropped = self.ripples.drain_except(keep);
        for ripple in &dropped {
            if let Some(timer) = ripple.timer {
                ctx.timers.cancel(timer);
            }
            discard_node(ctx.document, ripple.element);
        }
        tracing::debug!(dropped = dropped.len(), ?keep, "ripple queue reconciled");
    }

    /// Drop the most recent ripple if it was spawned inside the scroll window
    pub fn cancel_scroll_ripple(&mut self, ctx: &mut InkContext<'_>) -> Option<RippleId> {
        let id = self.ripples.tail()?;
        let created_at = self.ripples.get(id)?.created_at;
        if ctx.now_ms() >= created_at.saturating_add(SCROLL_CANCEL_WINDOW_MS) {
            return None;
        }

        let ripple = self.ripples.remove(id)?;
        if let Some(timer) = ripple.timer {
            ctx.timers.cancel(timer);
        }
        discard_node(ctx.document, ripple.element);
        tracing::debug!(?id, "ripple cancelled by scroll");
        Some(id)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Input handlers
    // ─────────────────────────────────────────────────────────────────────

    fn on_pointer_down(&mut self, ctx: &mut InkContext<'_>, event: &mut Event) {
        let Some(point) = primary_press(event) else {
            return;
        };
        let Some(target) = Self::resolve_target(ctx.document, event.target) else {
            return;
        };

        event.stop_propagation();
        if self
            .spawn_ripple(ctx, Some(point.x), Some(point.y), target)
            .is_some()
        {
            self.leave_armed.insert(target);
        }
    }

    fn on_pointer_up(&mut self, ctx: &mut InkContext<'_>, event: &Event) {
        if primary_press(event).is_none() {
            return;
        }
        let Some(target) = Self::resolve_target(ctx.document, event.target) else {
            return;
        };

        self.leave_armed.remove(&target);
        self.dequeue_ripple(ctx, target);
    }

    fn on_pointer_leave(&mut self, ctx: &mut InkContext<'_>, event: &Event) {
        if self.leave_armed.remove(&event.target) {
            self.dequeue_ripple(ctx, event.target);
        }
    }

    fn on_key_up(&mut self, ctx: &mut InkContext<'_>, event: &Event) {
        let EventData::Key { key, .. } = event.data else {
            return;
        };
        if key != KeyCode::TAB {
            return;
        }
        let Some(target) = Self::resolve_target(ctx.document, event.target) else {
            return;
        };

        if self.spawn_ripple(ctx, None, None, target).is_some() {
            self.blur_armed.insert(target);
        }
    }

    fn on_blur(&mut self, ctx: &mut InkContext<'_>, event: &Event) {
        if self.blur_armed.remove(&event.target) {
            self.dequeue_ripple(ctx, event.target);
        }
    }

    fn on_touch_start(&mut self, ctx: &mut InkContext<'_>, event: &Event) {
        let Some(target) = Self::resolve_target(ctx.document, event.target) else {
            return;
        };

        let location = event.location();
        self.spawn_ripple(
            ctx,
            location.map(|p| p.x),
            location.map(|p| p.y),
            target,
        );
        self.touch_move_armed = true;
    }

    fn on_touch_move(&mut self, ctx: &mut InkContext<'_>) {
        if !std::mem::take(&mut self.touch_move_armed) {
            return;
        }
        self.cancel_scroll_ripple(ctx);
    }

    fn on_touch_end(&mut self, ctx: &mut InkContext<'_>, event: &Event) {
        let Some(target) = Self::resolve_target(ctx.document, event.target) else {
            return;
        };
        let Some(id) = self.ripples.oldest_not_leaving() else {
            return;
        };
        let Some(created_at) = self.ripples.get(id).map(|r| r.created_at) else {
            return;
        };

        self.touch_move_armed = false;
        let elapsed = ctx.now_ms().saturating_sub(created_at);
        ctx.timers.schedule(elapsed, InkTask::Release(target));
    }
}

/// Page coordinates of a primary-button pointer event without ctrl held
fn primary_press(event: &Event) -> Option<Point> {
    match event.data {
        EventData::Pointer {
            x,
            y,
            button,
            modifiers,
        } if button == buttons::PRIMARY && !modifiers.ctrl() => Some(Point::new(x, y)),
        _ => None,
    }
}

/// Place a ripple node for `target`, measured against the target's current frame
fn insert_ripple(
    document: &mut Document,
    target: NodeId,
    x: Option<f32>,
    y: Option<f32>,
) -> Result<(NodeId, NodeId, RippleGeometry)> {
    let container = InteractionWatcher::get_or_create_container(document, target)?;
    let frame = document
        .frame(container)
        .ok_or(inkwave_dom::DomError::NodeNotFound(container))?;
    let geometry = RippleGeometry::compute(pointer_from(x, y), frame, frame.size);
    let bounds = geometry.bounds();

    let element = document.create_element("span");
    document.add_class(element, INK_CLASS)?;
    document.set_style(element, InlineStyle::from_rect(bounds))?;
    document.set_frame(element, bounds.offset(frame.x(), frame.y()))?;
    document.prepend_child(container, element)?;
    Ok((container, element, geometry))
}

fn add_state_class(document: &mut Document, element: NodeId, class: &str) {
    if let Err(err) = document.add_class(element, class) {
        tracing::trace!(?element, class, %err, "state class not applied");
    }
}

/// Drop a visual node from the tree if it is still there
fn discard_node(document: &mut Document, element: NodeId) {
    if document.contains(element) {
        if let Err(err) = document.remove_node(element) {
            tracing::trace!(?element, %err, "ripple node not removed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkwave_core::Rect;
    use inkwave_dom::DomError;

    #[test]
    fn test_insert_ripple_reports_missing_target() {
        let mut document = Document::new();
        let target = document.create_element("button");
        document.append_child(document.root(), target).unwrap();
        document.remove_node(target).unwrap();

        let result = insert_ripple(&mut document, target, Some(1.0), Some(1.0));
        assert!(matches!(
            result,
            Err(InkError::Dom(DomError::NodeNotFound(node))) if node == target
        ));
    }

    #[test]
    fn test_insert_ripple_centers_without_pointer() {
        let mut document = Document::new();
        let target = document.create_element("button");
        document.append_child(document.root(), target).unwrap();
        document
            .set_frame(target, Rect::new(200.0, 100.0, 100.0, 80.0))
            .unwrap();

        let (container, element, geometry) =
            insert_ripple(&mut document, target, None, None).unwrap();
        assert_eq!(geometry.center, Point::new(50.0, 40.0));
        assert_eq!(document.first_child(container), Some(element));
        assert!(document.has_class(element, INK_CLASS));
    }
}
