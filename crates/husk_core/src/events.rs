//! Event types and the event value passed to handlers
//!
//! Events are identified by a small integer [`EventType`]. Element-level
//! handlers live in prop bags under their handler prop name (`onClick`,
//! `onPointerDown`, ...); document-level listeners are registered by type on a
//! [`Document`](crate::dom::Document).
//!
//! ```ignore
//! use husk_core::events::{event_types, Event};
//!
//! let event = Event::new(event_types::POINTER_DOWN)
//!     .with_target(node)
//!     .with_client_pos(12.0, 8.0);
//!
//! event.prevent_default();
//! assert!(event.default_prevented());
//! ```

use std::cell::Cell;

use crate::dom::NodeId;

/// Identifier for an event type
pub type EventType = u32;

/// Built-in event types
pub mod event_types {
    use super::EventType;

    pub const CLICK: EventType = 1;
    pub const POINTER_DOWN: EventType = 2;
    pub const POINTER_UP: EventType = 3;
    pub const POINTER_MOVE: EventType = 4;
    pub const POINTER_CANCEL: EventType = 5;
    pub const POINTER_ENTER: EventType = 6;
    pub const POINTER_LEAVE: EventType = 7;
    pub const MOUSE_DOWN: EventType = 8;
    pub const MOUSE_UP: EventType = 9;
    pub const KEY_DOWN: EventType = 10;
    pub const KEY_UP: EventType = 11;
    pub const KEY_PRESS: EventType = 12;
    pub const FOCUS: EventType = 13;
    pub const BLUR: EventType = 14;

    /// All event types paired with the prop name their element handler uses
    const HANDLER_PROPS: &[(EventType, &str)] = &[
        (CLICK, "onClick"),
        (POINTER_DOWN, "onPointerDown"),
        (POINTER_UP, "onPointerUp"),
        (POINTER_MOVE, "onPointerMove"),
        (POINTER_CANCEL, "onPointerCancel"),
        (POINTER_ENTER, "onPointerEnter"),
        (POINTER_LEAVE, "onPointerLeave"),
        (MOUSE_DOWN, "onMouseDown"),
        (MOUSE_UP, "onMouseUp"),
        (KEY_DOWN, "onKeyDown"),
        (KEY_UP, "onKeyUp"),
        (KEY_PRESS, "onKeyPress"),
        (FOCUS, "onFocus"),
        (BLUR, "onBlur"),
    ];

    /// Prop name under which an element stores its handler for `event_type`
    pub fn handler_prop(event_type: EventType) -> Option<&'static str> {
        HANDLER_PROPS
            .iter()
            .find(|(ty, _)| *ty == event_type)
            .map(|(_, name)| *name)
    }

    /// Event type handled by a handler prop name
    pub fn from_handler_prop(name: &str) -> Option<EventType> {
        HANDLER_PROPS
            .iter()
            .find(|(_, prop)| *prop == name)
            .map(|(ty, _)| *ty)
    }
}

/// Kind of device that produced a pointer event
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PointerType {
    #[default]
    Mouse,
    Pen,
    Touch,
}

/// An event delivered to handlers and listeners
///
/// `default_prevented` is interior-mutable so every handler in a chain sees a
/// `prevent_default()` made by an earlier one during the same dispatch.
#[derive(Clone, Debug)]
pub struct Event {
    /// The type of event that occurred
    pub event_type: EventType,
    /// The node whose handler is currently running
    pub current_target: Option<NodeId>,
    /// Pointer position in client coordinates
    pub client_x: f32,
    pub client_y: f32,
    /// Pointer contact geometry (zero for devices without a contact area)
    pub width: f32,
    pub height: f32,
    pub pointer_id: u32,
    pub pointer_type: PointerType,
    /// Key for keyboard events
    pub key: Option<String>,
    default_prevented: Cell<bool>,
}

impl Event {
    /// Create a new event of the given type
    pub fn new(event_type: EventType) -> Self {
        Self {
            event_type,
            current_target: None,
            client_x: 0.0,
            client_y: 0.0,
            width: 0.0,
            height: 0.0,
            pointer_id: 0,
            pointer_type: PointerType::Mouse,
            key: None,
            default_prevented: Cell::new(false),
        }
    }

    /// Set the current target
    pub fn with_target(mut self, node: NodeId) -> Self {
        self.current_target = Some(node);
        self
    }

    /// Set the pointer position
    pub fn with_client_pos(mut self, x: f32, y: f32) -> Self {
        self.client_x = x;
        self.client_y = y;
        self
    }

    /// Set the pointer contact size
    pub fn with_contact_size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_pointer(mut self, pointer_id: u32, pointer_type: PointerType) -> Self {
        self.pointer_id = pointer_id;
        self.pointer_type = pointer_type;
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Mark the event's default action as cancelled
    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}
