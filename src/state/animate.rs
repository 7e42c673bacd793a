//! Blink Animation System - Shared clocks per FPS
//!
//! Drives the typing caret blink with shared scheduler intervals.
//! All subscribers at the same FPS share a single interval for efficiency
//! and visual sync.
//!
//! # Pattern
//!
//! - Multiple carets blinking at 2 FPS share one interval
//! - Interval starts with the first subscriber, stops with the last
//! - Phase signal toggles true/false for blink visibility
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use folio_tui::state::{BlinkClocks, Scheduler};
//!
//! let scheduler = Scheduler::new();
//! let clocks = BlinkClocks::new(&scheduler);
//!
//! let subscription = clocks.subscribe(2);
//! assert!(clocks.phase(2));
//!
//! scheduler.advance_by(Duration::from_millis(250));
//! assert!(!clocks.phase(2));
//!
//! drop(subscription);
//! assert!(!clocks.is_running(2));
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use std::time::Duration;

use spark_signals::{signal, Signal};

use super::scheduler::{Scheduler, TimerHandle};

// =============================================================================
// BLINK REGISTRY
// =============================================================================

/// Per-FPS blink registry containing shared clock state
struct BlinkRegistry {
    /// Phase signal (true = visible)
    phase: Signal<bool>,
    /// Shared interval driving the phase
    timer: Option<TimerHandle>,
    /// Number of active subscribers
    subscribers: usize,
}

type Registries = RefCell<HashMap<u8, BlinkRegistry>>;

/// Owner of all blink clocks on one scheduler.
#[derive(Clone)]
pub struct BlinkClocks {
    scheduler: Scheduler,
    registries: Rc<Registries>,
}

/// Keeps a blink clock alive. Dropping it unsubscribes.
#[must_use = "dropping the subscription stops the blink clock"]
pub struct BlinkSubscription {
    fps: u8,
    scheduler: Scheduler,
    registries: Weak<Registries>,
}

impl BlinkClocks {
    pub fn new(scheduler: &Scheduler) -> Self {
        Self {
            scheduler: scheduler.clone(),
            registries: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    /// Subscribe to blink animation at the given FPS.
    ///
    /// Multiple subscribers at the same FPS share one interval.
    /// FPS 0 means blink disabled: the subscription is a no-op and the
    /// phase stays visible.
    pub fn subscribe(&self, fps: u8) -> BlinkSubscription {
        let subscription = BlinkSubscription {
            fps,
            scheduler: self.scheduler.clone(),
            registries: Rc::downgrade(&self.registries),
        };
        if fps == 0 {
            return subscription;
        }

        let mut registries = self.registries.borrow_mut();
        let registry = registries.entry(fps).or_insert_with(|| BlinkRegistry {
            phase: signal(true),
            timer: None,
            subscribers: 0,
        });
        registry.subscribers += 1;

        // Start clock if first subscriber
        if registry.subscribers == 1 {
            // 2 FPS = 1000/2/2 = 250ms per toggle (500ms full cycle)
            let period = Duration::from_millis(1000 / fps as u64 / 2);
            let phase = registry.phase.clone();
            registry.timer = Some(self.scheduler.set_interval(
                period,
                Box::new(move |_| {
                    phase.set(!phase.get());
                }),
            ));
            tracing::trace!(fps, ?period, "blink clock started");
        }

        subscription
    }

    /// Current blink phase for `fps`. Visible when no clock exists.
    pub fn phase(&self, fps: u8) -> bool {
        self.registries
            .borrow()
            .get(&fps)
            .map(|r| r.phase.get())
            .unwrap_or(true)
    }

    /// Phase signal for `fps`, if a registry exists.
    pub fn phase_signal(&self, fps: u8) -> Option<Signal<bool>> {
        self.registries.borrow().get(&fps).map(|r| r.phase.clone())
    }

    /// Whether a clock is running for `fps`.
    pub fn is_running(&self, fps: u8) -> bool {
        self.registries
            .borrow()
            .get(&fps)
            .map(|r| r.timer.is_some() && r.subscribers > 0)
            .unwrap_or(false)
    }

    /// Number of subscribers for `fps`.
    pub fn subscriber_count(&self, fps: u8) -> usize {
        self.registries
            .borrow()
            .get(&fps)
            .map(|r| r.subscribers)
            .unwrap_or(0)
    }

    /// Stop every clock and forget all registries.
    pub fn reset(&self) {
        let drained: Vec<_> = self.registries.borrow_mut().drain().collect();
        for (_, mut registry) in drained {
            if let Some(timer) = registry.timer.take() {
                self.scheduler.clear(timer);
            }
            registry.phase.set(true);
        }
    }
}

impl BlinkSubscription {
    pub fn fps(&self) -> u8 {
        self.fps
    }
}

impl Drop for BlinkSubscription {
    fn drop(&mut self) {
        if self.fps == 0 {
            return;
        }
        let Some(registries) = self.registries.upgrade() else {
            return;
        };
        let idle_phase = {
            let mut registries = registries.borrow_mut();
            let Some(registry) = registries.get_mut(&self.fps) else {
                return;
            };
            registry.subscribers = registry.subscribers.saturating_sub(1);

            // Stop clock if no more subscribers
            if registry.subscribers > 0 {
                return;
            }
            if let Some(timer) = registry.timer.take() {
                self.scheduler.clear(timer);
            }
            registry.phase.clone()
        };
        // Set outside the borrow: readers of the registry may react.
        idle_phase.set(true);
    }
}

// =============================================================================
// TESTS
// =============================================================================
