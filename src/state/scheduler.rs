//! Scheduler - Single-threaded timer queue over a virtual clock
//!
//! Every wait in folio-tui (tick loops, pauses, preloader stages, blink
//! clocks) is a timer registered here. The scheduler never looks at real
//! time: the host advances it. The interactive loop maps wall-clock elapsed
//! time onto [`Scheduler::advance_to`], tests call [`Scheduler::advance_by`].
//!
//! # Semantics
//!
//! - Timers fire in `(due, registration)` order, one callback at a time.
//! - A callback receives the scheduler and may set or clear any timer,
//!   including itself. Clearing an interval from inside its own callback
//!   stops it before it is re-armed.
//! - Intervals re-arm relative to their previous due time, so a large
//!   advance delivers every missed period in order.
//! - Advancing from inside a callback is refused.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use folio_tui::state::Scheduler;
//!
//! let scheduler = Scheduler::new();
//! let handle = scheduler.set_interval(Duration::from_millis(100), Box::new(|_| {}));
//! assert_eq!(scheduler.advance_by(Duration::from_millis(350)), 3);
//! scheduler.clear(handle);
//! assert_eq!(scheduler.pending_count(), 0);
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

/// Smallest interval period accepted. Zero would never let time advance.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Opaque, cancelable timer handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

/// Timer callback. Receives the scheduler so it can chain further timers.
pub type TimerCallback = Box<dyn FnMut(&Scheduler)>;

struct TimerEntry {
    due: Duration,
    seq: u64,
    period: Option<Duration>,
    /// None while the callback is executing.
    callback: Option<TimerCallback>,
}

#[derive(Default)]
struct SchedulerInner {
    now: Duration,
    next_id: u64,
    next_seq: u64,
    advancing: bool,
    timers: HashMap<TimerHandle, TimerEntry>,
}

impl SchedulerInner {
    fn take_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    fn insert(&mut self, delay: Duration, period: Option<Duration>, callback: TimerCallback) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        let seq = self.take_seq();
        self.timers.insert(
            handle,
            TimerEntry {
                due: self.now + delay,
                seq,
                period,
                callback: Some(callback),
            },
        );
        handle
    }

    /// Earliest armed timer due at or before `limit`.
    fn next_ready(&self, limit: Duration) -> Option<(TimerHandle, Duration)> {
        self.timers
            .iter()
            .filter(|(_, entry)| entry.callback.is_some() && entry.due <= limit)
            .min_by_key(|(_, entry)| (entry.due, entry.seq))
            .map(|(handle, entry)| (*handle, entry.due))
    }
}

/// Cooperative timer scheduler. Cloning yields another handle to the same queue.
#[derive(Clone, Default)]
pub struct Scheduler {
    inner: Rc<RefCell<SchedulerInner>>,
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Scheduler")
            .field("now", &inner.now)
            .field("pending", &inner.timers.len())
            .finish()
    }
}

impl Scheduler {
    /// Create a scheduler with its virtual clock at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.inner.borrow().now
    }

    /// Run `callback` once after `delay`.
    pub fn set_timeout(&self, delay: Duration, callback: TimerCallback) -> TimerHandle {
        self.inner.borrow_mut().insert(delay, None, callback)
    }

    /// Run `callback` every `period` until cleared.
    pub fn set_interval(&self, period: Duration, callback: TimerCallback) -> TimerHandle {
        let period = period.max(MIN_INTERVAL);
        self.inner.borrow_mut().insert(period, Some(period), callback)
    }

    /// Cancel a timer. Returns false if it already fired (one-shot) or was cleared.
    pub fn clear(&self, handle: TimerHandle) -> bool {
        self.inner.borrow_mut().timers.remove(&handle).is_some()
    }

    /// Check whether a timer is still live.
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.inner.borrow().timers.contains_key(&handle)
    }

    /// Number of live timers.
    pub fn pending_count(&self) -> usize {
        self.inner.borrow().timers.len()
    }

    /// Due time of the earliest armed timer.
    pub fn next_due(&self) -> Option<Duration> {
        self.inner
            .borrow()
            .timers
            .values()
            .filter(|entry| entry.callback.is_some())
            .map(|entry| entry.due)
            .min()
    }

    /// Advance the clock by `delta`, firing everything that becomes due.
    ///
    /// Returns the number of callbacks invoked.
    pub fn advance_by(&self, delta: Duration) -> usize {
        let target = self.now() + delta;
        self.advance_to(target)
    }

    /// Advance the clock to `target`, firing everything due at or before it.
    ///
    /// A target in the past leaves the clock where it is.
    /// Returns the number of callbacks invoked.
    pub fn advance_to(&self, target: Duration) -> usize {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.advancing {
                tracing::warn!(?target, "scheduler advanced from inside a timer callback; ignored");
                return 0;
            }
            inner.advancing = true;
        }

        let mut fired = 0;
        loop {
            let taken = {
                let mut inner = self.inner.borrow_mut();
                match inner.next_ready(target) {
                    Some((handle, due)) => {
                        inner.now = due;
                        inner
                            .timers
                            .get_mut(&handle)
                            .and_then(|entry| entry.callback.take())
                            .map(|callback| (handle, due, callback))
                    }
                    None => None,
                }
            };
            let Some((handle, due, mut callback)) = taken else {
                break;
            };

            // No borrow is held here: the callback may freely use the scheduler.
            callback(self);
            fired += 1;

            let mut inner = self.inner.borrow_mut();
            let seq = inner.take_seq();
            let period = inner.timers.get(&handle).map(|entry| entry.period);
            match period {
                Some(Some(period)) => {
                    if let Some(entry) = inner.timers.get_mut(&handle) {
                        entry.due = due + period;
                        entry.seq = seq;
                        entry.callback = Some(callback);
                    }
                }
                Some(None) => {
                    inner.timers.remove(&handle);
                }
                // Cleared while running.
                None => {}
            }
        }

        let mut inner = self.inner.borrow_mut();
        if target > inner.now {
            inner.now = target;
        }
        inner.advancing = false;
        fired
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_timeout_fires_once_at_due_time() {
        let scheduler = Scheduler::new();
        let hits = Rc::new(Cell::new(0));
        let hits_clone = hits.clone();
        let at = Rc::new(Cell::new(Duration::ZERO));
        let at_clone = at.clone();

        scheduler.set_timeout(
            ms(250),
            Box::new(move |s| {
                hits_clone.set(hits_clone.get() + 1);
                at_clone.set(s.now());
            }),
        );

        assert_eq!(scheduler.advance_by(ms(249)), 0);
        assert_eq!(scheduler.advance_by(ms(1)), 1);
        assert_eq!(at.get(), ms(250));
        assert_eq!(scheduler.advance_by(ms(1000)), 0);
        assert_eq!(hits.get(), 1);
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn test_interval_delivers_every_missed_period() {
        let scheduler = Scheduler::new();
        let hits = Rc::new(Cell::new(0));
        let hits_clone = hits.clone();
        scheduler.set_interval(ms(100), Box::new(move |_| hits_clone.set(hits_clone.get() + 1)));

        scheduler.advance_by(ms(1050));
        assert_eq!(hits.get(), 10);
        assert_eq!(scheduler.now(), ms(1050));
        assert_eq!(scheduler.next_due(), Some(ms(1100)));
    }

    #[test]
    fn test_ties_fire_in_registration_order() {
        let scheduler = Scheduler::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        for label in ["a", "b", "c"] {
            let order = order.clone();
            scheduler.set_timeout(ms(10), Box::new(move |_| order.borrow_mut().push(label)));
        }

        scheduler.advance_by(ms(10));
        assert_eq!(*order.borrow(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_clear_prevents_firing() {
        let scheduler = Scheduler::new();
        let hits = Rc::new(Cell::new(0));
        let hits_clone = hits.clone();
        let handle = scheduler.set_timeout(ms(10), Box::new(move |_| hits_clone.set(1)));

        assert!(scheduler.is_pending(handle));
        assert!(scheduler.clear(handle));
        assert!(!scheduler.clear(handle));
        scheduler.advance_by(ms(100));
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn test_interval_can_clear_itself() {
        let scheduler = Scheduler::new();
        let hits = Rc::new(Cell::new(0));
        let own_handle: Rc<Cell<Option<TimerHandle>>> = Rc::new(Cell::new(None));

        let hits_clone = hits.clone();
        let own_clone = own_handle.clone();
        let handle = scheduler.set_interval(
            ms(10),
            Box::new(move |s| {
                hits_clone.set(hits_clone.get() + 1);
                if hits_clone.get() == 3 {
                    if let Some(h) = own_clone.get() {
                        s.clear(h);
                    }
                }
            }),
        );
        own_handle.set(Some(handle));

        scheduler.advance_by(ms(200));
        assert_eq!(hits.get(), 3);
        assert!(!scheduler.is_pending(handle));
    }

    #[test]
    fn test_callback_can_chain_timers() {
        let scheduler = Scheduler::new();
        let fired_at = Rc::new(Cell::new(Duration::ZERO));
        let fired_clone = fired_at.clone();

        scheduler.set_timeout(
            ms(100),
            Box::new(move |s| {
                let fired_clone = fired_clone.clone();
                s.set_timeout(ms(50), Box::new(move |s| fired_clone.set(s.now())));
            }),
        );

        // Both the outer and the chained timer land inside one advance.
        assert_eq!(scheduler.advance_by(ms(200)), 2);
        assert_eq!(fired_at.get(), ms(150));
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let scheduler = Scheduler::new();
        let hits = Rc::new(Cell::new(0));
        let hits_clone = hits.clone();
        scheduler.set_interval(Duration::ZERO, Box::new(move |_| hits_clone.set(hits_clone.get() + 1)));

        scheduler.advance_by(ms(5));
        assert_eq!(hits.get(), 5);
    }

    #[test]
    fn test_reentrant_advance_is_refused() {
        let scheduler = Scheduler::new();
        let inner_fired = Rc::new(Cell::new(usize::MAX));
        let inner_clone = inner_fired.clone();

        scheduler.set_timeout(ms(1), Box::new(move |s| inner_clone.set(s.advance_by(ms(100)))));
        scheduler.advance_by(ms(1));

        assert_eq!(inner_fired.get(), 0);
        assert_eq!(scheduler.now(), ms(1));
    }

    #[test]
    fn test_advance_to_past_keeps_clock() {
        let scheduler = Scheduler::new();
        scheduler.advance_by(ms(500));
        scheduler.advance_to(ms(100));
        assert_eq!(scheduler.now(), ms(500));
    }
}
