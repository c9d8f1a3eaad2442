//! Timer, animation-frame, and microtask scheduling
//!
//! [`Scheduler`] is the interface Husk uses for anything deferred. Hosts
//! implement it on top of their event loop; [`ManualScheduler`] is a
//! deterministic implementation that only makes progress when told to, which
//! is what tests use.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::time::Duration;

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle to a pending timeout
    pub struct TimerId;
    /// Handle to a pending animation frame callback
    pub struct FrameId;
}

/// Callback run when a timeout elapses
pub type TimerCallback = Box<dyn FnOnce()>;

/// Callback run on the next frame with the frame timestamp in milliseconds
pub type FrameCallback = Box<dyn FnOnce(f64)>;

/// Deferred execution provided by the host
pub trait Scheduler {
    fn set_timeout(&self, delay: Duration, callback: TimerCallback) -> TimerId;

    /// Cancel a timeout; unknown or already-fired ids are ignored
    fn clear_timeout(&self, id: TimerId);

    fn request_animation_frame(&self, callback: FrameCallback) -> FrameId;

    /// Cancel a frame callback; unknown or already-run ids are ignored
    fn cancel_animation_frame(&self, id: FrameId);

    /// Queue a microtask. Microtasks cannot be cancelled once queued.
    fn queue_microtask(&self, callback: TimerCallback);
}

struct PendingTimer {
    due: Duration,
    seq: u64,
    callback: TimerCallback,
}

/// Scheduler driven explicitly by the caller
///
/// Nothing runs until [`advance`](Self::advance), [`run_frame`](Self::run_frame)
/// or [`run_microtasks`](Self::run_microtasks) is called.
#[derive(Default)]
pub struct ManualScheduler {
    now: Cell<Duration>,
    next_seq: Cell<u64>,
    timers: RefCell<SlotMap<TimerId, PendingTimer>>,
    frames: RefCell<SlotMap<FrameId, FrameCallback>>,
    frame_time: Cell<f64>,
    microtasks: RefCell<VecDeque<TimerCallback>>,
}

impl ManualScheduler {
    /// Frame interval used for frame timestamps
    pub const FRAME_INTERVAL_MS: f64 = 16.0;

    pub fn new() -> Self {
        Self::default()
    }

    /// Elapsed virtual time
    pub fn now(&self) -> Duration {
        self.now.get()
    }

    /// Advance virtual time, running every timeout that becomes due
    ///
    /// Timeouts run in due order (registration order for ties). Timeouts
    /// scheduled by a callback run in the same call if they are already due.
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
        while let Some(callback) = self.take_next_due() {
            callback();
        }
    }

    fn take_next_due(&self) -> Option<TimerCallback> {
        let now = self.now.get();
        let mut timers = self.timers.borrow_mut();
        let next = timers
            .iter()
            .filter(|(_, t)| t.due <= now)
            .min_by_key(|(_, t)| (t.due, t.seq))
            .map(|(id, _)| id)?;
        timers.remove(next).map(|t| t.callback)
    }

    /// Run every frame callback requested before this call
    ///
    /// Callbacks requested while running are deferred to the next frame.
    pub fn run_frame(&self) {
        let timestamp = self.frame_time.get() + Self::FRAME_INTERVAL_MS;
        self.frame_time.set(timestamp);

        let pending: Vec<FrameId> = self.frames.borrow().keys().collect();
        for id in pending {
            let callback = self.frames.borrow_mut().remove(id);
            if let Some(callback) = callback {
                callback(timestamp);
            }
        }
    }

    /// Drain the microtask queue, including microtasks queued while draining
    pub fn run_microtasks(&self) {
        loop {
            let task = self.microtasks.borrow_mut().pop_front();
            match task {
                Some(task) => task(),
                None => break,
            }
        }
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.borrow().len()
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.borrow().len()
    }

    pub fn pending_microtasks(&self) -> usize {
        self.microtasks.borrow().len()
    }
}

impl Scheduler for ManualScheduler {
    fn set_timeout(&self, delay: Duration, callback: TimerCallback) -> TimerId {
        let seq = self.next_seq.get();
        self.next_seq.set(seq + 1);
        self.timers.borrow_mut().insert(PendingTimer {
            due: self.now.get() + delay,
            seq,
            callback,
        })
    }

    fn clear_timeout(&self, id: TimerId) {
        self.timers.borrow_mut().remove(id);
    }

    fn request_animation_frame(&self, callback: FrameCallback) -> FrameId {
        self.frames.borrow_mut().insert(callback)
    }

    fn cancel_animation_frame(&self, id: FrameId) {
        self.frames.borrow_mut().remove(id);
    }

    fn queue_microtask(&self, callback: TimerCallback) {
        self.microtasks.borrow_mut().push_back(callback);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn test_timeouts_run_in_due_order() {
        let scheduler = ManualScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        for (name, ms) in [("b", 20u64), ("a", 10), ("c", 20)] {
            let log = log.clone();
            scheduler.set_timeout(
                Duration::from_millis(ms),
                Box::new(move || log.borrow_mut().push(name)),
            );
        }

        scheduler.advance(Duration::from_millis(10));
        assert_eq!(*log.borrow(), vec!["a"]);

        scheduler.advance(Duration::from_millis(10));
        assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
        assert_eq!(scheduler.pending_timers(), 0);
    }

    #[test]
    fn test_cleared_timeout_never_runs() {
        let scheduler = ManualScheduler::new();
        let fired = Rc::new(Cell::new(false));

        let f = fired.clone();
        let id = scheduler.set_timeout(Duration::from_millis(5), Box::new(move || f.set(true)));
        scheduler.clear_timeout(id);
        scheduler.advance(Duration::from_secs(1));

        assert!(!fired.get());
    }

    #[test]
    fn test_frames_requested_during_frame_are_deferred() {
        let scheduler = Rc::new(ManualScheduler::new());
        let stamps = Rc::new(RefCell::new(Vec::new()));

        let s = scheduler.clone();
        let st = stamps.clone();
        scheduler.request_animation_frame(Box::new(move |t| {
            st.borrow_mut().push(t);
            let st = st.clone();
            s.request_animation_frame(Box::new(move |t| st.borrow_mut().push(t)));
        }));

        scheduler.run_frame();
        assert_eq!(*stamps.borrow(), vec![16.0]);
        assert_eq!(scheduler.pending_frames(), 1);

        scheduler.run_frame();
        assert_eq!(*stamps.borrow(), vec![16.0, 32.0]);
    }

    #[test]
    fn test_microtasks_drain_fully() {
        let scheduler = Rc::new(ManualScheduler::new());
        let count = Rc::new(Cell::new(0));

        let s = scheduler.clone();
        let c = count.clone();
        scheduler.queue_microtask(Box::new(move || {
            c.set(c.get() + 1);
            let c = c.clone();
            s.queue_microtask(Box::new(move || c.set(c.get() + 1)));
        }));

        scheduler.run_microtasks();
        assert_eq!(count.get(), 2);
        assert_eq!(scheduler.pending_microtasks(), 0);
    }
}
