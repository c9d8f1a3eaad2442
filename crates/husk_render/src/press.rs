//! Press gesture tracking
//!
//! [`ActivePress`] tells an intentional press apart from a pointer-down that
//! drags away. While a press is in flight it listens on the pressed node's
//! owning document:
//!
//! - pointer move updates `pressed` from whether the pointer contact still
//!   overlaps the node's bounding rect
//! - pointer up or pointer cancel ends the press
//!
//! A click or pointer-up on the element itself also ends it. Every document
//! listener lives in a [`Disposables`] group that is emptied when the press
//! ends.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use husk_core::disposables::Disposables;
use husk_core::dom::{Document, Host, NodeId};
use husk_core::events::{event_types, Event};
use husk_core::geometry::Rect;
use husk_core::props::PropBag;

/// Press tracking options
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PressConfig {
    /// Attach no handlers at all
    pub disabled: bool,
}

impl PressConfig {
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

/// Current press state and the handlers to attach to the element
#[derive(Clone, Debug)]
pub struct PressState {
    pub pressed: bool,
    pub press_props: PropBag,
}

type PressListener = Rc<dyn Fn(bool)>;

struct PressInner {
    host: Rc<dyn Host>,
    target: Cell<Option<NodeId>>,
    pressed: Cell<bool>,
    disposables: Disposables,
    subscribers: RefCell<Vec<PressListener>>,
}

/// Rect covered by the pointer contact, centred on the pointer
fn pointer_rect(event: &Event) -> Rect {
    Rect::from_center(event.client_x, event.client_y, event.width / 2.0, event.height / 2.0)
}

impl PressInner {
    fn set_pressed(&self, pressed: bool) {
        if self.pressed.replace(pressed) == pressed {
            return;
        }
        tracing::trace!(pressed, "press state changed");
        let subscribers = self.subscribers.borrow().clone();
        for subscriber in subscribers {
            subscriber(pressed);
        }
    }

    fn reset(&self) {
        self.target.set(None);
        self.set_pressed(false);
        self.disposables.dispose();
    }

    fn pointer_down(self: &Rc<Self>, event: &Event) {
        self.disposables.dispose();

        if self.target.get().is_some() {
            return;
        }
        let Some(node) = event.current_target else {
            tracing::debug!("pointer down without a current target");
            return;
        };

        self.target.set(Some(node));
        self.set_pressed(true);

        let Some(document) = self.host.owner_document(node) else {
            tracing::debug!(node = node.to_raw(), "pressed node has no owner document");
            return;
        };

        let this = Rc::downgrade(self);
        self.disposables.add_event_listener(
            &document,
            event_types::POINTER_UP,
            Rc::new(move |_| {
                if let Some(inner) = this.upgrade() {
                    inner.reset();
                }
            }),
        );

        let this = Rc::downgrade(self);
        let owner: Weak<dyn Document> = Rc::downgrade(&document);
        self.disposables.add_event_listener(
            &document,
            event_types::POINTER_MOVE,
            Rc::new(move |event| {
                let (Some(inner), Some(owner)) = (this.upgrade(), owner.upgrade()) else {
                    return;
                };
                if let Some(target) = inner.target.get() {
                    let overlapping = owner
                        .bounding_client_rect(target)
                        .map(|bounds| pointer_rect(event).overlaps(&bounds))
                        .unwrap_or(false);
                    inner.set_pressed(overlapping);
                }
            }),
        );

        let this = Rc::downgrade(self);
        self.disposables.add_event_listener(
            &document,
            event_types::POINTER_CANCEL,
            Rc::new(move |_| {
                if let Some(inner) = this.upgrade() {
                    inner.reset();
                }
            }),
        );
    }
}

/// Press gesture state machine for one element
///
/// Clones share the same gesture.
#[derive(Clone)]
pub struct ActivePress {
    inner: Rc<PressInner>,
}

impl ActivePress {
    pub fn new(host: Rc<dyn Host>) -> Self {
        Self {
            inner: Rc::new(PressInner {
                host,
                target: Cell::new(None),
                pressed: Cell::new(false),
                disposables: Disposables::new(),
                subscribers: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn pressed(&self) -> bool {
        self.inner.pressed.get()
    }

    /// Node of the press in flight
    pub fn target(&self) -> Option<NodeId> {
        self.inner.target.get()
    }

    /// Call `f` whenever `pressed` changes
    pub fn subscribe(&self, f: impl Fn(bool) + 'static) {
        self.inner.subscribers.borrow_mut().push(Rc::new(f));
    }

    /// Current state and element handlers
    pub fn state(&self, config: PressConfig) -> PressState {
        let press_props = if config.disabled {
            PropBag::new()
        } else {
            let down = Rc::downgrade(&self.inner);
            let up = Rc::downgrade(&self.inner);
            let click = Rc::downgrade(&self.inner);
            PropBag::new()
                .on("onPointerDown", move |event| {
                    if let Some(inner) = down.upgrade() {
                        inner.pointer_down(event);
                    }
                })
                .on("onPointerUp", move |_| {
                    if let Some(inner) = up.upgrade() {
                        inner.reset();
                    }
                })
                .on("onClick", move |_| {
                    if let Some(inner) = click.upgrade() {
                        inner.reset();
                    }
                })
        };

        PressState {
            pressed: self.pressed(),
            press_props,
        }
    }

    /// End any press in flight and release its document listeners
    pub fn dispose(&self) {
        self.inner.reset();
    }
}

impl fmt::Debug for ActivePress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActivePress")
            .field("pressed", &self.pressed())
            .field("target", &self.target())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use husk_core::dom::MemoryDocument;
    use husk_core::events::PointerType;

    fn setup() -> (Rc<MemoryDocument>, NodeId, ActivePress) {
        let doc = MemoryDocument::new();
        let node = doc.create_node(Rect::new(0.0, 0.0, 100.0, 40.0));
        let press = ActivePress::new(doc.clone());
        (doc, node, press)
    }

    fn pointer_down(press: &ActivePress, node: NodeId) {
        let props = press.state(PressConfig::default()).press_props;
        let handler = props.handler("onPointerDown").expect("pointer down handler");
        handler(&Event::new(event_types::POINTER_DOWN).with_target(node).with_client_pos(10.0, 10.0));
    }

    fn move_to(doc: &MemoryDocument, x: f32, y: f32) {
        doc.dispatch(&Event::new(event_types::POINTER_MOVE).with_client_pos(x, y));
    }

    #[test]
    fn test_pointer_down_starts_press() {
        let (doc, node, press) = setup();
        assert!(!press.pressed());

        pointer_down(&press, node);
        assert!(press.pressed());
        assert_eq!(press.target(), Some(node));
        assert_eq!(doc.total_listeners(), 3);
    }

    #[test]
    fn test_drag_away_and_back() {
        let (doc, node, press) = setup();
        pointer_down(&press, node);

        move_to(&doc, 150.0, 10.0);
        assert!(!press.pressed());

        // Returning re-presses without a new pointer down
        move_to(&doc, 50.0, 20.0);
        assert!(press.pressed());
    }

    #[test]
    fn test_edge_contact_counts_as_overlap() {
        let (doc, node, press) = setup();
        pointer_down(&press, node);

        move_to(&doc, 100.0, 40.0);
        assert!(press.pressed());
        move_to(&doc, 100.5, 40.0);
        assert!(!press.pressed());
    }

    #[test]
    fn test_touch_contact_area() {
        let (doc, node, press) = setup();
        pointer_down(&press, node);

        // Centre outside the node, contact area reaching into it
        let touch = Event::new(event_types::POINTER_MOVE)
            .with_pointer(1, PointerType::Touch)
            .with_client_pos(110.0, 20.0)
            .with_contact_size(30.0, 30.0);
        doc.dispatch(&touch);
        assert!(press.pressed());

        let touch = touch.with_client_pos(120.0, 20.0).with_contact_size(10.0, 10.0);
        doc.dispatch(&touch);
        assert!(!press.pressed());
    }

    #[test]
    fn test_press_ends_on_document_pointer_up() {
        let (doc, node, press) = setup();
        pointer_down(&press, node);

        doc.dispatch(&Event::new(event_types::POINTER_UP));
        assert!(!press.pressed());
        assert_eq!(press.target(), None);
        assert_eq!(doc.total_listeners(), 0);
    }

    #[test]
    fn test_press_ends_on_pointer_cancel() {
        let (doc, node, press) = setup();
        pointer_down(&press, node);

        doc.dispatch(&Event::new(event_types::POINTER_CANCEL));
        assert!(!press.pressed());
        assert_eq!(doc.total_listeners(), 0);
    }

    #[test]
    fn test_press_ends_on_click() {
        let (doc, node, press) = setup();
        pointer_down(&press, node);

        let props = press.state(PressConfig::default()).press_props;
        props.handler("onClick").expect("click handler")(&Event::new(event_types::CLICK));
        assert!(!press.pressed());
        assert_eq!(press.target(), None);
        assert_eq!(doc.total_listeners(), 0);
    }

    #[test]
    fn test_second_pointer_down_keeps_first_target() {
        let (doc, node, press) = setup();
        let other = doc.create_node(Rect::new(200.0, 0.0, 10.0, 10.0));

        pointer_down(&press, node);
        pointer_down(&press, other);
        assert_eq!(press.target(), Some(node));
        assert!(press.pressed());
        // The second pointer down released the first press's listeners
        assert_eq!(doc.total_listeners(), 0);

        // so a document pointer up no longer ends the press
        doc.dispatch(&Event::new(event_types::POINTER_UP));
        assert!(press.pressed());
        assert_eq!(press.target(), Some(node));
    }

    #[test]
    fn test_disabled_has_no_handlers() {
        let (_doc, _node, press) = setup();
        let state = press.state(PressConfig::default().disabled(true));
        assert!(state.press_props.is_empty());
        assert!(!state.pressed);
    }

    #[test]
    fn test_subscribers_see_changes() {
        let (doc, node, press) = setup();
        let changes = Rc::new(RefCell::new(Vec::new()));
        let c = changes.clone();
        press.subscribe(move |pressed| c.borrow_mut().push(pressed));

        pointer_down(&press, node);
        move_to(&doc, 50.0, 20.0);
        move_to(&doc, 500.0, 20.0);
        doc.dispatch(&Event::new(event_types::POINTER_UP));

        assert_eq!(*changes.borrow(), vec![true, false]);
    }

    #[test]
    fn test_dispose_releases_listeners() {
        let (doc, node, press) = setup();
        pointer_down(&press, node);

        press.dispose();
        assert!(!press.pressed());
        assert_eq!(doc.total_listeners(), 0);
    }

    #[test]
    fn test_drop_releases_listeners() {
        let (doc, node, press) = setup();
        pointer_down(&press, node);

        drop(press);
        assert_eq!(doc.total_listeners(), 0);
    }
}
