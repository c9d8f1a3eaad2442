//! Host document interfaces
//!
//! Husk never touches a real UI runtime directly. Anything it needs from the
//! host (document-level listeners, element geometry, inline styles, the owning
//! document of a node) goes through the [`Document`] and [`Host`] traits.
//!
//! [`MemoryDocument`] is an in-memory implementation used to drive widgets
//! headlessly and in tests:
//!
//! ```ignore
//! use husk_core::dom::MemoryDocument;
//! use husk_core::geometry::Rect;
//!
//! let doc = MemoryDocument::new();
//! let button = doc.create_node(Rect::new(0.0, 0.0, 100.0, 40.0));
//!
//! doc.add_event_listener(event_types::POINTER_UP, Rc::new(|_| println!("up")));
//! doc.dispatch(&Event::new(event_types::POINTER_UP));
//! ```

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use slotmap::{new_key_type, Key, SlotMap};

use crate::events::{Event, EventType};
use crate::geometry::Rect;

new_key_type! {
    /// Handle to a host node
    ///
    /// A handle does not keep the node alive; lookups for removed nodes fail.
    pub struct NodeId;
    /// Handle to a registered document listener
    pub struct ListenerId;
}

impl NodeId {
    /// Convert to a raw u64 representation
    pub fn to_raw(self) -> u64 {
        self.data().as_ffi()
    }
}

/// Document-level event listener
pub type Listener = Rc<dyn Fn(&Event)>;

/// A host document
pub trait Document {
    /// Register a listener for an event type
    fn add_event_listener(&self, event_type: EventType, listener: Listener) -> ListenerId;

    /// Remove a listener, returning whether it was registered
    fn remove_event_listener(&self, event_type: EventType, id: ListenerId) -> bool;

    /// Current bounding rectangle of a node in client coordinates
    fn bounding_client_rect(&self, node: NodeId) -> Option<Rect>;

    /// Inline style value of a node
    fn style_property(&self, node: NodeId, property: &str) -> Option<String>;

    /// Set an inline style value; an empty value removes the property
    fn set_style_property(&self, node: NodeId, property: &str, value: &str);
}

/// Resolves the document that owns a node
pub trait Host {
    fn owner_document(&self, node: NodeId) -> Option<Rc<dyn Document>>;
}

struct NodeData {
    bounds: Rect,
    style: IndexMap<String, String>,
}

struct ListenerEntry {
    event_type: EventType,
    listener: Listener,
}

/// In-memory document with a flat set of nodes
pub struct MemoryDocument {
    this: Weak<MemoryDocument>,
    nodes: RefCell<SlotMap<NodeId, NodeData>>,
    listeners: RefCell<SlotMap<ListenerId, ListenerEntry>>,
    /// Registration order per event type
    by_type: RefCell<FxHashMap<EventType, Vec<ListenerId>>>,
}

impl MemoryDocument {
    /// Create a new empty document
    pub fn new() -> Rc<Self> {
        Rc::new_cyclic(|this| Self {
            this: this.clone(),
            nodes: RefCell::new(SlotMap::with_key()),
            listeners: RefCell::new(SlotMap::with_key()),
            by_type: RefCell::new(FxHashMap::default()),
        })
    }

    /// Create a node with the given bounds
    pub fn create_node(&self, bounds: Rect) -> NodeId {
        self.nodes.borrow_mut().insert(NodeData {
            bounds,
            style: IndexMap::new(),
        })
    }

    /// Move or resize a node
    pub fn set_bounds(&self, node: NodeId, bounds: Rect) {
        if let Some(data) = self.nodes.borrow_mut().get_mut(node) {
            data.bounds = bounds;
        }
    }

    /// Remove a node; handles to it become dangling
    pub fn remove_node(&self, node: NodeId) {
        self.nodes.borrow_mut().remove(node);
    }

    pub fn contains_node(&self, node: NodeId) -> bool {
        self.nodes.borrow().contains_key(node)
    }

    /// Dispatch an event to every listener registered for its type
    ///
    /// Listeners removed by an earlier listener during the same dispatch are
    /// not called.
    pub fn dispatch(&self, event: &Event) {
        let ids = self
            .by_type
            .borrow()
            .get(&event.event_type)
            .cloned()
            .unwrap_or_default();

        for id in ids {
            let listener = self.listeners.borrow().get(id).map(|e| e.listener.clone());
            if let Some(listener) = listener {
                listener(event);
            }
        }
    }

    /// Number of listeners registered for an event type
    pub fn listener_count(&self, event_type: EventType) -> usize {
        self.by_type
            .borrow()
            .get(&event_type)
            .map(|ids| ids.len())
            .unwrap_or(0)
    }

    /// Number of listeners registered for any event type
    pub fn total_listeners(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl Document for MemoryDocument {
    fn add_event_listener(&self, event_type: EventType, listener: Listener) -> ListenerId {
        let id = self.listeners.borrow_mut().insert(ListenerEntry {
            event_type,
            listener,
        });
        self.by_type
            .borrow_mut()
            .entry(event_type)
            .or_default()
            .push(id);
        id
    }

    fn remove_event_listener(&self, event_type: EventType, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        match listeners.get(id) {
            Some(entry) if entry.event_type == event_type => {}
            _ => return false,
        }
        listeners.remove(id);

        let mut by_type = self.by_type.borrow_mut();
        if let Some(ids) = by_type.get_mut(&event_type) {
            ids.retain(|other| *other != id);
            if ids.is_empty() {
                by_type.remove(&event_type);
            }
        }
        true
    }

    fn bounding_client_rect(&self, node: NodeId) -> Option<Rect> {
        self.nodes.borrow().get(node).map(|data| data.bounds)
    }

    fn style_property(&self, node: NodeId, property: &str) -> Option<String> {
        self.nodes
            .borrow()
            .get(node)
            .and_then(|data| data.style.get(property).cloned())
    }

    fn set_style_property(&self, node: NodeId, property: &str, value: &str) {
        if let Some(data) = self.nodes.borrow_mut().get_mut(node) {
            if value.is_empty() {
                data.style.shift_remove(property);
            } else {
                data.style.insert(property.to_string(), value.to_string());
            }
        }
    }
}

impl Host for MemoryDocument {
    fn owner_document(&self, node: NodeId) -> Option<Rc<dyn Document>> {
        if !self.contains_node(node) {
            return None;
        }
        let this = self.this.upgrade()?;
        Some(this as Rc<dyn Document>)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::event_types;
    use std::cell::Cell;

    #[test]
    fn test_listener_registration_and_dispatch() {
        let doc = MemoryDocument::new();
        let calls = Rc::new(Cell::new(0));

        let c = calls.clone();
        let id = doc.add_event_listener(
            event_types::POINTER_UP,
            Rc::new(move |_| c.set(c.get() + 1)),
        );

        doc.dispatch(&Event::new(event_types::POINTER_UP));
        doc.dispatch(&Event::new(event_types::POINTER_MOVE));
        assert_eq!(calls.get(), 1);
        assert_eq!(doc.listener_count(event_types::POINTER_UP), 1);

        // Wrong type does not remove
        assert!(!doc.remove_event_listener(event_types::POINTER_MOVE, id));
        assert!(doc.remove_event_listener(event_types::POINTER_UP, id));
        assert!(!doc.remove_event_listener(event_types::POINTER_UP, id));

        doc.dispatch(&Event::new(event_types::POINTER_UP));
        assert_eq!(calls.get(), 1);
        assert_eq!(doc.total_listeners(), 0);
    }

    #[test]
    fn test_listener_removed_during_dispatch_is_skipped() {
        let doc = MemoryDocument::new();
        let second_called = Rc::new(Cell::new(false));
        let second_id = Rc::new(Cell::new(None::<ListenerId>));

        let d = Rc::downgrade(&doc);
        let sid = second_id.clone();
        doc.add_event_listener(
            event_types::CLICK,
            Rc::new(move |_| {
                if let (Some(doc), Some(id)) = (d.upgrade(), sid.get()) {
                    doc.remove_event_listener(event_types::CLICK, id);
                }
            }),
        );
        let flag = second_called.clone();
        let id = doc.add_event_listener(event_types::CLICK, Rc::new(move |_| flag.set(true)));
        second_id.set(Some(id));

        doc.dispatch(&Event::new(event_types::CLICK));
        assert!(!second_called.get());
    }

    #[test]
    fn test_owner_document_and_geometry() {
        let doc = MemoryDocument::new();
        let node = doc.create_node(Rect::new(0.0, 0.0, 10.0, 10.0));

        let owner = doc.owner_document(node).expect("node has an owner");
        assert_eq!(
            owner.bounding_client_rect(node),
            Some(Rect::new(0.0, 0.0, 10.0, 10.0))
        );

        doc.set_bounds(node, Rect::new(5.0, 5.0, 1.0, 1.0));
        assert_eq!(
            owner.bounding_client_rect(node),
            Some(Rect::new(5.0, 5.0, 1.0, 1.0))
        );

        doc.remove_node(node);
        assert!(doc.owner_document(node).is_none());
    }

    #[test]
    fn test_style_properties() {
        let doc = MemoryDocument::new();
        let node = doc.create_node(Rect::default());

        assert_eq!(doc.style_property(node, "overflow"), None);
        doc.set_style_property(node, "overflow", "hidden");
        assert_eq!(doc.style_property(node, "overflow").as_deref(), Some("hidden"));
        doc.set_style_property(node, "overflow", "");
        assert_eq!(doc.style_property(node, "overflow"), None);
    }
}
