//! Element refs
//!
//! A ref receives the host node an element is mounted as, and `None` when it
//! is detached. Refs come in two flavours: callbacks, and containers the
//! caller reads from later.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::dom::NodeId;

/// Shared, assignable slot holding a node handle
#[derive(Clone, Default)]
pub struct RefContainer(Rc<Cell<Option<NodeId>>>);

impl RefContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<NodeId> {
        self.0.get()
    }

    pub fn set(&self, node: Option<NodeId>) {
        self.0.set(node);
    }
}

/// A ref attached to an element
#[derive(Clone)]
pub enum ElementRef {
    Callback(Rc<dyn Fn(Option<NodeId>)>),
    Container(RefContainer),
}

impl ElementRef {
    /// Create a callback ref
    pub fn callback<F>(f: F) -> Self
    where
        F: Fn(Option<NodeId>) + 'static,
    {
        ElementRef::Callback(Rc::new(f))
    }

    /// Hand the node to this ref
    pub fn set(&self, node: Option<NodeId>) {
        match self {
            ElementRef::Callback(f) => f(node),
            ElementRef::Container(container) => container.set(node),
        }
    }

    /// Whether both refs are the same callback or the same container
    pub fn ptr_eq(&self, other: &ElementRef) -> bool {
        match (self, other) {
            (ElementRef::Callback(a), ElementRef::Callback(b)) => Rc::ptr_eq(a, b),
            (ElementRef::Container(a), ElementRef::Container(b)) => Rc::ptr_eq(&a.0, &b.0),
            _ => false,
        }
    }
}

impl From<RefContainer> for ElementRef {
    fn from(container: RefContainer) -> Self {
        ElementRef::Container(container)
    }
}

impl fmt::Debug for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementRef::Callback(_) => write!(f, "ElementRef::Callback(<fn>)"),
            ElementRef::Container(c) => f
                .debug_tuple("ElementRef::Container")
                .field(&c.get())
                .finish(),
        }
    }
}
