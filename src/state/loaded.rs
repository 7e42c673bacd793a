//! Loaded Signal - Single-fire completion event
//!
//! Two halves of the preloader → shell hand-off:
//!
//! - [`LoadedNotifier`] sits on the preloader side and wraps the `onLoaded`
//!   callback behind a guard flag. It can deliver at most once.
//! - [`LoadedFlag`] sits on the shell side: a reactive boolean that goes
//!   from false to true exactly once and never back.

use std::cell::{Cell, RefCell};
use std::fmt;

use spark_signals::{signal, Signal};

// =============================================================================
// NOTIFIER
// =============================================================================

/// Single-fire wrapper around a completion callback.
pub struct LoadedNotifier {
    fired: Cell<bool>,
    callback: RefCell<Option<Box<dyn FnOnce()>>>,
}

impl LoadedNotifier {
    pub fn new(callback: impl FnOnce() + 'static) -> Self {
        Self {
            fired: Cell::new(false),
            callback: RefCell::new(Some(Box::new(callback))),
        }
    }

    /// Deliver the event. Returns true only for the call that delivered it.
    pub fn fire(&self) -> bool {
        if self.fired.replace(true) {
            return false;
        }
        // Release the borrow before running the callback.
        let callback = self.callback.borrow_mut().take();
        match callback {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }

    /// Discard the callback without delivering. Later `fire` calls do nothing.
    pub fn disarm(&self) {
        self.fired.set(true);
        self.callback.borrow_mut().take();
    }

    pub fn has_fired(&self) -> bool {
        self.fired.get()
    }
}

impl fmt::Debug for LoadedNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedNotifier")
            .field("fired", &self.fired.get())
            .finish()
    }
}

// =============================================================================
// FLAG
// =============================================================================

/// One-shot reactive boolean owned by the page shell.
#[derive(Clone)]
pub struct LoadedFlag {
    value: Signal<bool>,
}

impl LoadedFlag {
    pub fn new() -> Self {
        Self { value: signal(false) }
    }

    /// Set the flag. Returns true if this call flipped it.
    pub fn mark(&self) -> bool {
        if self.value.get() {
            return false;
        }
        self.value.set(true);
        true
    }

    pub fn is_loaded(&self) -> bool {
        self.value.get()
    }

    /// Underlying signal for reactive readers.
    pub fn signal(&self) -> Signal<bool> {
        self.value.clone()
    }
}

impl Default for LoadedFlag {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// TESTS
// =============================================================================
