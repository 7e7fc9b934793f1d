//! Input events
//!
//! Platform-neutral pointer, touch and keyboard events as delivered to a document.

use smallvec::SmallVec;

use crate::geometry::Point;
use crate::NodeId;

/// Event type identifier
pub type EventType = u32;

/// Common event types
pub mod event_types {
    use super::EventType;

    pub const POINTER_DOWN: EventType = 1;
    pub const POINTER_UP: EventType = 2;
    pub const POINTER_LEAVE: EventType = 5;
    pub const BLUR: EventType = 11;
    pub const KEY_UP: EventType = 21;

    // Touch events
    pub const TOUCH_START: EventType = 90;
    pub const TOUCH_MOVE: EventType = 91;
    pub const TOUCH_END: EventType = 92;
}

/// Pointer button indices
pub mod buttons {
    /// Primary (usually left) button
    pub const PRIMARY: u8 = 0;
    pub const SECONDARY: u8 = 2;
}

/// An input event with associated data
#[derive(Clone, Debug)]
pub struct Event {
    pub event_type: EventType,
    /// Element the event originated on
    pub target: NodeId,
    pub data: EventData,
    /// Milliseconds on the host clock; zero means "now"
    pub timestamp: u64,
    pub propagation_stopped: bool,
}

/// Event-specific data
#[derive(Clone, Debug)]
pub enum EventData {
    Pointer {
        /// Page-space coordinates
        x: f32,
        y: f32,
        button: u8,
        modifiers: Modifiers,
    },
    Touch {
        /// Touch points that changed in this event
        changed: SmallVec<[TouchPoint; 2]>,
    },
    Key {
        key: KeyCode,
        modifiers: Modifiers,
    },
    None,
}

/// A single touch contact in page space
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchPoint {
    pub id: u64,
    pub x: f32,
    pub y: f32,
}

impl TouchPoint {
    pub const fn new(id: u64, x: f32, y: f32) -> Self {
        Self { id, x, y }
    }
}

/// Virtual key codes (platform-agnostic)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct KeyCode(pub u32);

impl KeyCode {
    pub const BACKSPACE: KeyCode = KeyCode(0x08);
    pub const TAB: KeyCode = KeyCode(0x09);
    pub const ENTER: KeyCode = KeyCode(0x0D);
    pub const ESCAPE: KeyCode = KeyCode(0x1B);
    pub const SPACE: KeyCode = KeyCode(0x20);
    pub const DELETE: KeyCode = KeyCode(0x7F);

    // Arrow keys
    pub const LEFT: KeyCode = KeyCode(0x25);
    pub const UP: KeyCode = KeyCode(0x26);
    pub const RIGHT: KeyCode = KeyCode(0x27);
    pub const DOWN: KeyCode = KeyCode(0x28);

    // Navigation keys
    pub const HOME: KeyCode = KeyCode(0x24);
    pub const END: KeyCode = KeyCode(0x23);
    pub const PAGE_UP: KeyCode = KeyCode(0x21);
    pub const PAGE_DOWN: KeyCode = KeyCode(0x22);

    // Unknown/unmapped key
    pub const UNKNOWN: KeyCode = KeyCode(0);

    /// Look up a key by its lowercase name ("tab", "enter", "a", ...)
    pub fn from_name(name: &str) -> Option<KeyCode> {
        let key = match name.to_ascii_lowercase().as_str() {
            "backspace" => Self::BACKSPACE,
            "tab" => Self::TAB,
            "enter" | "return" => Self::ENTER,
            "escape" | "esc" => Self::ESCAPE,
            "space" => Self::SPACE,
            "delete" => Self::DELETE,
            "left" => Self::LEFT,
            "up" => Self::UP,
            "right" => Self::RIGHT,
            "down" => Self::DOWN,
            "home" => Self::HOME,
            "end" => Self::END,
            "pageup" => Self::PAGE_UP,
            "pagedown" => Self::PAGE_DOWN,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c.is_ascii_alphanumeric() => {
                        KeyCode(c.to_ascii_uppercase() as u32)
                    }
                    _ => return None,
                }
            }
        };
        Some(key)
    }
}

/// Keyboard modifier flags
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    bits: u8,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers { bits: 0 };
    pub const SHIFT: u8 = 0b0001;
    pub const CTRL: u8 = 0b0010;
    pub const ALT: u8 = 0b0100;
    pub const META: u8 = 0b1000; // Cmd on macOS, Win on Windows

    /// Create new modifiers from flags
    pub const fn new(shift: bool, ctrl: bool, alt: bool, meta: bool) -> Self {
        let mut bits = 0;
        if shift {
            bits |= Self::SHIFT;
        }
        if ctrl {
            bits |= Self::CTRL;
        }
        if alt {
            bits |= Self::ALT;
        }
        if meta {
            bits |= Self::META;
        }
        Self { bits }
    }

    pub const fn ctrl(&self) -> bool {
        self.bits & Self::CTRL != 0
    }
}

impl Event {
    pub fn new(event_type: EventType, target: NodeId, data: EventData) -> Self {
        Self {
            event_type,
            target,
            data,
            timestamp: 0,
            propagation_stopped: false,
        }
    }

    /// Primary-button press at page coordinates
    pub fn pointer_down(target: NodeId, x: f32, y: f32) -> Self {
        Self::new(
            event_types::POINTER_DOWN,
            target,
            EventData::Pointer {
                x,
                y,
                button: buttons::PRIMARY,
                modifiers: Modifiers::NONE,
            },
        )
    }

    /// Primary-button release at page coordinates
    pub fn pointer_up(target: NodeId, x: f32, y: f32) -> Self {
        Self::new(
            event_types::POINTER_UP,
            target,
            EventData::Pointer {
                x,
                y,
                button: buttons::PRIMARY,
                modifiers: Modifiers::NONE,
            },
        )
    }

    pub fn pointer_leave(target: NodeId) -> Self {
        Self::new(event_types::POINTER_LEAVE, target, EventData::None)
    }

    pub fn key_up(target: NodeId, key: KeyCode) -> Self {
        Self::new(
            event_types::KEY_UP,
            target,
            EventData::Key {
                key,
                modifiers: Modifiers::NONE,
            },
        )
    }

    pub fn blur(target: NodeId) -> Self {
        Self::new(event_types::BLUR, target, EventData::None)
    }

    pub fn touch_start(target: NodeId, x: f32, y: f32) -> Self {
        Self::touch(event_types::TOUCH_START, target, x, y)
    }

    pub fn touch_move(target: NodeId, x: f32, y: f32) -> Self {
        Self::touch(event_types::TOUCH_MOVE, target, x, y)
    }

    pub fn touch_end(target: NodeId, x: f32, y: f32) -> Self {
        Self::touch(event_types::TOUCH_END, target, x, y)
    }

    fn touch(event_type: EventType, target: NodeId, x: f32, y: f32) -> Self {
        let mut changed = SmallVec::new();
        changed.push(TouchPoint::new(0, x, y));
        Self::new(event_type, target, EventData::Touch { changed })
    }

    /// Set the event timestamp
    pub fn at(mut self, timestamp: u64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Replace the pointer button and modifiers of a pointer event
    pub fn with_button(mut self, new_button: u8, new_modifiers: Modifiers) -> Self {
        if let EventData::Pointer {
            button, modifiers, ..
        } = &mut self.data
        {
            *button = new_button;
            *modifiers = new_modifiers;
        }
        self
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Page-space location of the event, if it carries one.
    ///
    /// Touch events report their first changed touch point.
    pub fn location(&self) -> Option<Point> {
        match &self.data {
            EventData::Pointer { x, y, .. } => Some(Point::new(*x, *y)),
            EventData::Touch { changed } => changed.first().map(|t| Point::new(t.x, t.y)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_from_name() {
        assert_eq!(KeyCode::from_name("Tab"), Some(KeyCode::TAB));
        assert_eq!(KeyCode::from_name("a"), Some(KeyCode(0x41)));
        assert_eq!(KeyCode::from_name("7"), Some(KeyCode(0x37)));
        assert_eq!(KeyCode::from_name("hyper"), None);
    }

    #[test]
    fn test_modifiers() {
        let mods = Modifiers::new(false, true, false, false);
        assert!(mods.ctrl());
        assert!(!Modifiers::new(true, false, true, true).ctrl());
        assert!(!Modifiers::NONE.ctrl());
    }

    #[test]
    fn test_location() {
        let target = NodeId::default();
        assert_eq!(
            Event::touch_start(target, 3.0, 4.0).location(),
            Some(Point::new(3.0, 4.0))
        );
        assert_eq!(Event::key_up(target, KeyCode::TAB).location(), None);

        let empty = Event::new(
            event_types::TOUCH_END,
            target,
            EventData::Touch {
                changed: SmallVec::new(),
            },
        );
        assert_eq!(empty.location(), None);
    }

    #[test]
    fn test_with_button() {
        let event = Event::pointer_down(NodeId::default(), 0.0, 0.0)
            .with_button(buttons::SECONDARY, Modifiers::NONE);
        match event.data {
            EventData::Pointer { button, .. } => assert_eq!(button, buttons::SECONDARY),
            _ => panic!("expected pointer data"),
        }
    }
}
