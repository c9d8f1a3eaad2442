//! Disposable resource groups
//!
//! A [`Disposables`] group collects cleanup callbacks for timers, frames,
//! document listeners and inline style overrides. Each convenience method does
//! its setup immediately and registers the matching teardown, so a single
//! [`dispose`](Disposables::dispose) releases everything the group acquired.
//!
//! ```ignore
//! let d = Disposables::new();
//! d.add_event_listener(&doc, event_types::POINTER_UP, Rc::new(|_| {}));
//! d.set_timeout(&scheduler, Duration::from_millis(300), || println!("late"));
//!
//! // Removes the listener and cancels the timeout
//! d.dispose();
//! ```
//!
//! Dropping the last clone of a group runs whatever cleanups are left.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use crate::dom::{Document, Listener, NodeId};
use crate::events::EventType;
use crate::scheduler::Scheduler;

/// A cleanup callback that runs at most once
///
/// Clones share identity: adding a clone to a group that already holds the
/// original is a no-op.
#[derive(Clone)]
pub struct Cleanup(Rc<RefCell<Option<Box<dyn FnOnce()>>>>);

impl Cleanup {
    pub fn new(f: impl FnOnce() + 'static) -> Self {
        Self(Rc::new(RefCell::new(Some(Box::new(f)))))
    }

    /// Run the callback; later calls do nothing
    pub fn run(&self) {
        let f = self.0.borrow_mut().take();
        if let Some(f) = f {
            f();
        }
    }

    /// Whether the callback has already run
    pub fn is_spent(&self) -> bool {
        self.0.borrow().is_none()
    }

    pub fn ptr_eq(&self, other: &Cleanup) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Cleanup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cleanup")
            .field("spent", &self.is_spent())
            .finish()
    }
}

struct GroupInner {
    cleanups: RefCell<Vec<Cleanup>>,
}

impl GroupInner {
    fn remove(&self, cleanup: &Cleanup) -> bool {
        let mut cleanups = self.cleanups.borrow_mut();
        match cleanups.iter().position(|c| c.ptr_eq(cleanup)) {
            Some(index) => {
                cleanups.remove(index);
                true
            }
            None => false,
        }
    }
}

impl Drop for GroupInner {
    fn drop(&mut self) {
        for cleanup in std::mem::take(self.cleanups.get_mut()) {
            cleanup.run();
        }
    }
}

/// Handle returned for every registered cleanup
#[derive(Clone)]
pub struct DisposeHandle {
    group: Weak<GroupInner>,
    cleanup: Cleanup,
}

impl DisposeHandle {
    /// Remove the cleanup from its group and run it now
    ///
    /// Does nothing if the cleanup already ran.
    pub fn dispose(&self) {
        if let Some(group) = self.group.upgrade() {
            group.remove(&self.cleanup);
        }
        self.cleanup.run();
    }
}

/// An ordered group of cleanups
///
/// Clones share the same group.
#[derive(Clone)]
pub struct Disposables {
    inner: Rc<GroupInner>,
}

impl Default for Disposables {
    fn default() -> Self {
        Self::new()
    }
}

impl Disposables {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(GroupInner {
                cleanups: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Register a cleanup
    ///
    /// A cleanup that is already registered is not added twice.
    pub fn add(&self, cleanup: Cleanup) -> DisposeHandle {
        {
            let mut cleanups = self.inner.cleanups.borrow_mut();
            if !cleanups.iter().any(|c| c.ptr_eq(&cleanup)) {
                cleanups.push(cleanup.clone());
            }
        }
        DisposeHandle {
            group: Rc::downgrade(&self.inner),
            cleanup,
        }
    }

    /// Register a closure as a new cleanup
    pub fn add_cleanup(&self, f: impl FnOnce() + 'static) -> DisposeHandle {
        self.add(Cleanup::new(f))
    }

    /// Run every registered cleanup in insertion order and empty the group
    ///
    /// The group stays usable. Cleanups registered while disposing are kept
    /// for the next call.
    pub fn dispose(&self) {
        let cleanups = std::mem::take(&mut *self.inner.cleanups.borrow_mut());
        if cleanups.is_empty() {
            return;
        }
        tracing::trace!(count = cleanups.len(), "disposing resource group");
        for cleanup in cleanups {
            cleanup.run();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.inner.cleanups.borrow().is_empty()
    }

    pub fn len(&self) -> usize {
        self.inner.cleanups.borrow().len()
    }

    /// Schedule a timeout, cleared on dispose
    pub fn set_timeout<S>(
        &self,
        scheduler: &Rc<S>,
        delay: Duration,
        callback: impl FnOnce() + 'static,
    ) -> DisposeHandle
    where
        S: Scheduler + ?Sized + 'static,
    {
        let id = scheduler.set_timeout(delay, Box::new(callback));
        let scheduler = scheduler.clone();
        self.add_cleanup(move || scheduler.clear_timeout(id))
    }

    /// Request an animation frame, cancelled on dispose
    pub fn request_animation_frame<S>(
        &self,
        scheduler: &Rc<S>,
        callback: impl FnOnce(f64) + 'static,
    ) -> DisposeHandle
    where
        S: Scheduler + ?Sized + 'static,
    {
        let id = scheduler.request_animation_frame(Box::new(callback));
        let scheduler = scheduler.clone();
        self.add_cleanup(move || scheduler.cancel_animation_frame(id))
    }

    /// Run `callback` on the frame after the next one
    ///
    /// Both frame requests are registered in this group.
    pub fn next_frame<S>(
        &self,
        scheduler: &Rc<S>,
        callback: impl FnOnce(f64) + 'static,
    ) -> DisposeHandle
    where
        S: Scheduler + ?Sized + 'static,
    {
        let group = Rc::downgrade(&self.inner);
        let inner_scheduler = scheduler.clone();
        self.request_animation_frame(scheduler, move |_| {
            if let Some(inner) = group.upgrade() {
                Disposables { inner }.request_animation_frame(&inner_scheduler, callback);
            }
        })
    }

    /// Queue a microtask that is skipped if the group is disposed first
    pub fn micro_task<S>(&self, scheduler: &Rc<S>, callback: impl FnOnce() + 'static) -> DisposeHandle
    where
        S: Scheduler + ?Sized,
    {
        let armed = Rc::new(Cell::new(true));
        let guard = armed.clone();
        scheduler.queue_microtask(Box::new(move || {
            if guard.get() {
                callback();
            }
        }));
        self.add_cleanup(move || armed.set(false))
    }

    /// Add a document listener, removed on dispose
    pub fn add_event_listener<D>(
        &self,
        document: &Rc<D>,
        event_type: EventType,
        listener: Listener,
    ) -> DisposeHandle
    where
        D: Document + ?Sized + 'static,
    {
        let id = document.add_event_listener(event_type, listener);
        let document = document.clone();
        self.add_cleanup(move || {
            document.remove_event_listener(event_type, id);
        })
    }

    /// Override an inline style property, restoring the previous value on
    /// dispose
    pub fn style<D>(&self, document: &Rc<D>, node: NodeId, property: &str, value: &str) -> DisposeHandle
    where
        D: Document + ?Sized + 'static,
    {
        let previous = document.style_property(node, property).unwrap_or_default();
        document.set_style_property(node, property, value);

        let document = document.clone();
        let property = property.to_string();
        self.add_cleanup(move || document.set_style_property(node, &property, &previous))
    }

    /// Build a child group, registered here as a single cleanup
    pub fn group(&self, builder: impl FnOnce(&Disposables)) -> DisposeHandle {
        let child = Disposables::new();
        builder(&child);
        self.add_cleanup(move || child.dispose())
    }
}

impl fmt::Debug for Disposables {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Disposables").field("len", &self.len()).finish()
    }
}
