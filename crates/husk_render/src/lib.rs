//! Husk Render
//!
//! The rendering layer of the Husk headless component library:
//!
//! - **Polymorphic rendering**: [`render`] turns a widget's props and the
//!   caller's props into an [`Element`], honouring the caller's `as` tag,
//!   render-prop children, slot-dependent class names and Fragment forwarding
//! - **Refs**: merging the widget's ref with a child's ref
//! - **State attributes**: `data-*` attributes derived from the slot
//! - **Interactions**: press gesture tracking, hover and focus-ring detectors,
//!   and the disabled context
//!
//! # Example
//!
//! ```rust
//! use husk_core::props::PropBag;
//! use husk_core::slot::Slot;
//! use husk_render::{render, ElementProps, RenderRequest};
//!
//! let element = render(
//!     RenderRequest::new("Badge", "span")
//!         .our_props(PropBag::new().with("role", "status"))
//!         .their_props(ElementProps::new().as_tag("div").attr("id", "badge"))
//!         .slot(Slot::new().with("active", true)),
//! )
//! .expect("renders")
//! .expect("visible");
//!
//! assert_eq!(element.tag.host_name(), Some("div"));
//! assert_eq!(element.text("data-husk-state"), Some("active"));
//! ```

pub mod class_names;
pub mod disabled;
pub mod element;
pub mod error;
pub mod interactions;
pub mod press;
pub mod refs;
pub mod render;
pub mod state_attrs;

pub use class_names::class_names;
pub use disabled::DisabledContext;
pub use element::{Children, Component, DisplayName, Element, ElementProps, Node, Tag};
pub use error::{RenderError, Result};
pub use interactions::{
    FocusRing, FocusRingConfig, FocusRingState, Hover, HoverConfig, HoverState,
};
pub use press::{ActivePress, PressConfig, PressState};
pub use refs::{merge_refs, DefaultMergeRefs, MergeRefs, RefMerger};
pub use render::{render, RenderFeatures, RenderRequest, RenderStrategy};
pub use state_attrs::{state_attributes, STATE_ATTRIBUTE};
