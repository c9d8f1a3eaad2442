//! Husk Core
//!
//! Foundational primitives for the Husk headless component library:
//!
//! - **Prop Bags**: ordered attribute/handler maps and the merge engine that
//!   chains event handlers and suppresses activation on disabled elements
//! - **Resource Groups**: deterministic, nested, idempotent cleanup of timers,
//!   frames, listeners and inline styles
//! - **Host Interfaces**: the document and scheduler traits every widget talks
//!   to, with in-memory implementations for headless use
//!
//! # Example
//!
//! ```rust
//! use husk_core::events::{event_types, Event};
//! use husk_core::props::{merge_props_advanced, PropBag};
//!
//! let merged = merge_props_advanced([
//!     PropBag::new().with("disabled", true),
//!     PropBag::new().on("onClick", |_| unreachable!()),
//! ]);
//!
//! let click = Event::new(event_types::CLICK);
//! if let Some(handler) = merged.handler("onClick") {
//!     handler(&click);
//! }
//! assert!(click.default_prevented());
//! ```

pub mod disposables;
pub mod dom;
pub mod events;
pub mod geometry;
pub mod node_ref;
pub mod props;
pub mod scheduler;
pub mod slot;

pub use disposables::{Cleanup, DisposeHandle, Disposables};
pub use dom::{Document, Host, Listener, ListenerId, MemoryDocument, NodeId};
pub use events::{event_types, Event, EventType, PointerType};
pub use geometry::Rect;
pub use node_ref::{ElementRef, RefContainer};
pub use props::{
    class_fn, handler, is_activation_handler, merge_props, merge_props_advanced, ClassFn, Handler,
    PropBag, PropValue, StyleMap,
};
pub use scheduler::{FrameId, ManualScheduler, Scheduler, TimerId};
pub use slot::{Slot, SlotValue};
