//! # Husk Widgets
//!
//! Headless widgets built on `husk_render` primitives. Widgets own their
//! interaction state (focus, hover, press, disabled) and describe what to
//! render as an [`Element`](husk_render::Element); styling and the host tree
//! are left to the caller.
//!
//! ## Widgets
//!
//! - **Button** - press, hover and focus-ring aware button that renders as any
//!   tag

pub mod button;

pub use button::{Button, ButtonProps, ButtonType, DEFAULT_BUTTON_TAG};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::button::{Button, ButtonProps, ButtonType};
    pub use husk_core::{event_types, Event, MemoryDocument, PropBag, Slot};
    pub use husk_render::{DisabledContext, Element, ElementProps, Tag};
}
