//! Terminal state signals and the raw-mode session guard.
//!
//! The size signals are the root inputs of the render effect: a resize sets
//! them and the next flush recomposes the frame.

use std::cell::RefCell;
use std::io::{self, Write};

use crossterm::{cursor, execute, terminal};
use spark_signals::{signal, Signal};

// =============================================================================
// Terminal Size Signals
// =============================================================================

thread_local! {
    static TERMINAL_WIDTH: RefCell<Signal<u16>> = RefCell::new(signal(80));
    static TERMINAL_HEIGHT: RefCell<Signal<u16>> = RefCell::new(signal(24));
}

/// Get the current terminal width.
pub fn terminal_width() -> u16 {
    TERMINAL_WIDTH.with(|w| w.borrow().get())
}

/// Get the current terminal height.
pub fn terminal_height() -> u16 {
    TERMINAL_HEIGHT.with(|h| h.borrow().get())
}

/// Set the terminal size (called on resize events).
pub fn set_terminal_size(width: u16, height: u16) {
    TERMINAL_WIDTH.with(|w| w.borrow().set(width));
    TERMINAL_HEIGHT.with(|h| h.borrow().set(height));
}

/// Get the terminal width signal for reactive tracking.
pub fn terminal_width_signal() -> Signal<u16> {
    TERMINAL_WIDTH.with(|w| w.borrow().clone())
}

/// Get the terminal height signal for reactive tracking.
pub fn terminal_height_signal() -> Signal<u16> {
    TERMINAL_HEIGHT.with(|h| h.borrow().clone())
}

/// Detect and set the actual terminal size from the environment.
pub fn detect_terminal_size() {
    if let Ok((width, height)) = terminal::size() {
        set_terminal_size(width, height);
    }
}

// =============================================================================
// Session Guard
// =============================================================================

/// Raw mode + alternate screen + hidden cursor for as long as it lives.
pub struct TerminalSession<W: Write> {
    out: W,
    active: bool,
}

impl TerminalSession<io::Stdout> {
    pub fn stdout() -> io::Result<Self> {
        Self::enter(io::stdout())
    }
}

impl<W: Write> TerminalSession<W> {
    pub fn enter(mut out: W) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        if let Err(error) = execute!(out, terminal::EnterAlternateScreen, cursor::Hide) {
            let _ = terminal::disable_raw_mode();
            return Err(error);
        }
        Ok(Self { out, active: true })
    }

    /// Restore the terminal. Safe to call more than once.
    pub fn leave(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        execute!(self.out, cursor::Show, terminal::LeaveAlternateScreen)?;
        terminal::disable_raw_mode()
    }
}

impl<W: Write> Drop for TerminalSession<W> {
    fn drop(&mut self) {
        // Best effort: we may be unwinding.
        let _ = self.leave();
    }
}

// =============================================================================
// Tests
// =============================================================================
