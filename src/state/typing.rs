//! Typing Animator - Typewriter bound to scheduler timers
//!
//! Owns at most one tick interval and at most one pause timeout. Both are
//! released by [`TypingAnimator::stop`], and dropping the animator stops it,
//! so no callback can reach the machine after teardown.
//!
//! The revealed text and the caret flag are published to signals so render
//! effects react to them without polling.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use folio_tui::state::{Scheduler, TypingAnimator, TypingConfig};
//!
//! let scheduler = Scheduler::new();
//! let animator = TypingAnimator::new(&scheduler, "Hi", TypingConfig::default());
//! animator.start();
//!
//! scheduler.advance_by(Duration::from_millis(100));
//! assert_eq!(animator.current_text(), "H");
//!
//! drop(animator);
//! assert_eq!(scheduler.pending_count(), 0);
//! ```

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use spark_signals::{batch, signal, Signal};

use super::scheduler::{Scheduler, TimerHandle};
use super::typewriter::{Step, Typewriter, TypingConfig};
use crate::types::{Direction, Phase};

struct TypingState {
    machine: Typewriter,
    tick_timer: Option<TimerHandle>,
    pause_timer: Option<TimerHandle>,
}

struct TypingShared {
    state: RefCell<TypingState>,
    text: Signal<String>,
    typing: Signal<bool>,
}

impl TypingShared {
    fn publish(&self) {
        let (text, typing) = {
            let state = self.state.borrow();
            (state.machine.current_text().to_string(), state.machine.is_typing())
        };
        batch(|| {
            self.text.set(text);
            self.typing.set(typing);
        });
    }
}

/// Infinite typing animation over one target string.
pub struct TypingAnimator {
    scheduler: Scheduler,
    shared: Rc<TypingShared>,
}

impl TypingAnimator {
    /// Create an idle animator. Call [`start`](Self::start) to begin ticking.
    pub fn new(scheduler: &Scheduler, text: impl Into<String>, config: TypingConfig) -> Self {
        let machine = Typewriter::with_config(text, config);
        let shared = Rc::new(TypingShared {
            text: signal(String::new()),
            typing: signal(machine.is_typing()),
            state: RefCell::new(TypingState {
                machine,
                tick_timer: None,
                pause_timer: None,
            }),
        });

        Self {
            scheduler: scheduler.clone(),
            shared,
        }
    }

    /// Reset to the first char and begin the tick loop.
    ///
    /// Calling this on a running animator restarts it from scratch.
    pub fn start(&self) {
        self.stop();
        self.shared.state.borrow_mut().machine.start();
        self.shared.publish();
        tracing::debug!(len = self.len(), "typing animator started");
        arm_ticks(&self.shared, &self.scheduler);
    }

    /// Cancel the tick loop and any pending pause.
    pub fn stop(&self) {
        let (tick, pause) = {
            let mut state = self.shared.state.borrow_mut();
            (state.tick_timer.take(), state.pause_timer.take())
        };
        for handle in tick.into_iter().chain(pause) {
            self.scheduler.clear(handle);
        }
    }

    /// Whether any timer of this animator is live.
    pub fn is_running(&self) -> bool {
        let state = self.shared.state.borrow();
        state.tick_timer.is_some() || state.pause_timer.is_some()
    }

    /// Revealed prefix of the target text.
    pub fn current_text(&self) -> String {
        self.shared.state.borrow().machine.current_text().to_string()
    }

    /// True while typing or erasing; false during pauses.
    pub fn is_typing(&self) -> bool {
        self.shared.state.borrow().machine.is_typing()
    }

    pub fn phase(&self) -> Phase {
        self.shared.state.borrow().machine.phase()
    }

    pub fn direction(&self) -> Direction {
        self.shared.state.borrow().machine.direction()
    }

    /// Target length in chars.
    pub fn len(&self) -> usize {
        self.shared.state.borrow().machine.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Signal carrying the revealed text.
    pub fn text_signal(&self) -> Signal<String> {
        self.shared.text.clone()
    }

    /// Signal carrying the caret flag.
    pub fn typing_signal(&self) -> Signal<bool> {
        self.shared.typing.clone()
    }
}

impl Drop for TypingAnimator {
    fn drop(&mut self) {
        self.stop();
    }
}

// =============================================================================
// TIMER WIRING
// =============================================================================

fn arm_ticks(shared: &Rc<TypingShared>, scheduler: &Scheduler) {
    let period = shared.state.borrow().machine.tick_period();
    let weak = Rc::downgrade(shared);
    let handle = scheduler.set_interval(
        period,
        Box::new(move |sched| {
            if let Some(shared) = weak.upgrade() {
                on_tick(&shared, sched);
            }
        }),
    );
    shared.state.borrow_mut().tick_timer = Some(handle);
}

fn on_tick(shared: &Rc<TypingShared>, scheduler: &Scheduler) {
    let step = shared.state.borrow_mut().machine.tick();
    shared.publish();

    if let Step::Pause(delay) = step {
        // Stop ticking and arm the pause inside this one callback.
        let tick = shared.state.borrow_mut().tick_timer.take();
        if let Some(handle) = tick {
            scheduler.clear(handle);
        }
        tracing::trace!(phase = ?shared.state.borrow().machine.phase(), ?delay, "typing paused");
        arm_pause(shared, scheduler, delay);
    }
}

fn arm_pause(shared: &Rc<TypingShared>, scheduler: &Scheduler, delay: Duration) {
    let weak: Weak<TypingShared> = Rc::downgrade(shared);
    let handle = scheduler.set_timeout(
        delay,
        Box::new(move |sched| {
            if let Some(shared) = weak.upgrade() {
                on_pause_elapsed(&shared, sched);
            }
        }),
    );
    shared.state.borrow_mut().pause_timer = Some(handle);
}

fn on_pause_elapsed(shared: &Rc<TypingShared>, scheduler: &Scheduler) {
    let resumed = {
        let mut state = shared.state.borrow_mut();
        state.pause_timer = None;
        state.machine.resume()
    };
    shared.publish();

    if resumed.is_some() {
        arm_ticks(shared, scheduler);
    }
}

// =============================================================================
// TESTS
// =============================================================================
