//! Hover and focus-ring detectors
//!
//! Both detectors follow the same shape as [`ActivePress`](crate::press::ActivePress):
//! a cloneable handle holding shared state, a `state(config)` call that
//! reports the current values along with the prop bag to attach to the
//! element, and `subscribe` for change notifications.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use husk_core::events::{Event, PointerType};
use husk_core::props::PropBag;

type ChangeListener = Rc<dyn Fn()>;

#[derive(Default)]
struct Subscribers(RefCell<Vec<ChangeListener>>);

impl Subscribers {
    fn push(&self, f: ChangeListener) {
        self.0.borrow_mut().push(f);
    }

    fn notify(&self) {
        let subscribers = self.0.borrow().clone();
        for subscriber in subscribers {
            subscriber();
        }
    }
}

/// Set a flag, notifying subscribers when it changed
fn update(cell: &Cell<bool>, value: bool, subscribers: &Subscribers) {
    if cell.replace(value) != value {
        subscribers.notify();
    }
}

// =============================================================================
// Hover
// =============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HoverConfig {
    pub is_disabled: bool,
}

#[derive(Clone, Debug)]
pub struct HoverState {
    pub is_hovered: bool,
    pub hover_props: PropBag,
}

#[derive(Default)]
struct HoverInner {
    hovered: Cell<bool>,
    subscribers: Subscribers,
}

/// Tracks whether a pointer is over the element
///
/// Touch pointers never start a hover.
#[derive(Clone, Default)]
pub struct Hover {
    inner: Rc<HoverInner>,
}

impl Hover {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_hovered(&self) -> bool {
        self.inner.hovered.get()
    }

    pub fn subscribe(&self, f: impl Fn() + 'static) {
        self.inner.subscribers.push(Rc::new(f));
    }

    pub fn state(&self, config: HoverConfig) -> HoverState {
        if config.is_disabled {
            update(&self.inner.hovered, false, &self.inner.subscribers);
            return HoverState {
                is_hovered: false,
                hover_props: PropBag::new(),
            };
        }

        let enter = Rc::downgrade(&self.inner);
        let leave = Rc::downgrade(&self.inner);
        HoverState {
            is_hovered: self.is_hovered(),
            hover_props: PropBag::new()
                .on("onPointerEnter", move |event: &Event| {
                    if event.pointer_type == PointerType::Touch {
                        return;
                    }
                    if let Some(inner) = enter.upgrade() {
                        update(&inner.hovered, true, &inner.subscribers);
                    }
                })
                .on("onPointerLeave", move |_| {
                    if let Some(inner) = leave.upgrade() {
                        update(&inner.hovered, false, &inner.subscribers);
                    }
                }),
        }
    }
}

// =============================================================================
// Focus ring
// =============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FocusRingConfig {
    /// The element is focused on mount
    pub auto_focus: bool,
}

#[derive(Clone, Debug)]
pub struct FocusRingState {
    pub is_focused: bool,
    /// Focused by keyboard or programmatically, not by a pointer press
    pub is_focus_visible: bool,
    pub focus_props: PropBag,
}

struct FocusInner {
    focused: Cell<bool>,
    visible: Cell<bool>,
    pointer_modality: Cell<bool>,
    /// Cleared by the first focus change
    auto_focus_pending: Cell<bool>,
    subscribers: Subscribers,
}

/// Tracks focus and whether it should show a focus ring
#[derive(Clone)]
pub struct FocusRing {
    inner: Rc<FocusInner>,
}

impl Default for FocusRing {
    fn default() -> Self {
        Self::new()
    }
}

impl FocusRing {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(FocusInner {
                focused: Cell::new(false),
                visible: Cell::new(false),
                pointer_modality: Cell::new(false),
                auto_focus_pending: Cell::new(true),
                subscribers: Subscribers::default(),
            }),
        }
    }

    pub fn subscribe(&self, f: impl Fn() + 'static) {
        self.inner.subscribers.push(Rc::new(f));
    }

    pub fn state(&self, config: FocusRingConfig) -> FocusRingState {
        let inner = &self.inner;
        let auto_focused = config.auto_focus && inner.auto_focus_pending.get();

        let focus = Rc::downgrade(inner);
        let blur = Rc::downgrade(inner);
        let pointer = Rc::downgrade(inner);
        let key = Rc::downgrade(inner);
        let focus_props = PropBag::new()
            .on("onFocus", move |_| {
                if let Some(inner) = focus.upgrade() {
                    inner.auto_focus_pending.set(false);
                    let visible = !inner.pointer_modality.get();
                    let changed = !inner.focused.replace(true) | (inner.visible.replace(visible) != visible);
                    if changed {
                        inner.subscribers.notify();
                    }
                }
            })
            .on("onBlur", move |_| {
                if let Some(inner) = blur.upgrade() {
                    inner.auto_focus_pending.set(false);
                    let changed = inner.focused.replace(false) | inner.visible.replace(false);
                    if changed {
                        inner.subscribers.notify();
                    }
                }
            })
            .on("onPointerDown", move |_| {
                if let Some(inner) = pointer.upgrade() {
                    inner.pointer_modality.set(true);
                }
            })
            .on("onKeyDown", move |_| {
                if let Some(inner) = key.upgrade() {
                    inner.pointer_modality.set(false);
                    if inner.focused.get() {
                        update(&inner.visible, true, &inner.subscribers);
                    }
                }
            });

        FocusRingState {
            is_focused: auto_focused || inner.focused.get(),
            is_focus_visible: auto_focused || inner.visible.get(),
            focus_props,
        }
    }
}
