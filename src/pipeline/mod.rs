//! Reactive Pipeline
//!
//! This module connects the page state to the terminal output.
//!
//! # Pipeline Architecture
//!
//! ```text
//! Scheduler timers → state signals → PageShell::snapshot → compose → DiffRenderer
//! ```
//!
//! ## Data Flow
//!
//! 1. **shell** - Owns the preloader, the hero animator and navigation; its
//!    snapshot reads all of their signals
//! 2. **frame** - Pure composition of a snapshot into a `FrameBuffer`
//! 3. **mount** - The render effect plus the loop that advances time and
//!    feeds input
//!
//! ## Key Design Principles
//!
//! - **Pure composition**: `compose` has no side effects
//! - **Side Effects in Effect**: Only the render effect writes to the terminal
//! - **Reactive Dependencies**: Signal reads inside the effect auto-track

pub mod frame;
pub mod mount;
pub mod shell;
pub mod terminal;

// Re-exports
pub use frame::{compose, MainSnapshot, ViewSnapshot};
pub use mount::{mount, run, MountHandle};
pub use shell::{PageShell, ShellFlow, ShellServices, ViewKind};
pub use terminal::{
    detect_terminal_size, set_terminal_size, terminal_height, terminal_width, TerminalSession,
};
