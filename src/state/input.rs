//! Input Module - Event conversion and polling
//!
//! Bridges crossterm's event system to shell commands.
//!
//! # API
//!
//! - `convert_key_event` - Map a key press to a `ShellCommand`
//! - `convert_mouse_event` - Map wheel scrolling to a `ShellCommand`
//! - `convert_event` - Any crossterm event to an `InputEvent`
//! - `poll_event` - Non-blocking event check with timeout
//! - `enable_mouse` / `disable_mouse` - Control mouse capture
//!
//! # Key map
//!
//! | Key                    | Command           |
//! |------------------------|-------------------|
//! | `q`, `Esc`, `Ctrl+C`   | Quit              |
//! | `t`                    | ToggleTheme       |
//! | `1`..`5`               | Navigate          |
//! | `Tab`, `Right`, `l`    | NextSection       |
//! | `BackTab`, `Left`, `h` | PreviousSection   |
//! | `Up`, `k`              | ScrollUp          |
//! | `Down`, `j`            | ScrollDown        |
//! | `Home`, `g`            | ScrollTop         |
//! | `Enter`                | LearnMore         |

use std::io::stdout;
use std::time::Duration;

use crossterm::event::{
    poll, read, DisableMouseCapture, EnableMouseCapture, Event as CrosstermEvent, KeyCode,
    KeyEvent as CrosstermKeyEvent, KeyEventKind, KeyModifiers,
    MouseEvent as CrosstermMouseEvent, MouseEventKind,
};
use crossterm::execute;

use super::navigation::Section;

// =============================================================================
// Commands and events
// =============================================================================

/// What the user asked the shell to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellCommand {
    Quit,
    ToggleTheme,
    Navigate(Section),
    NextSection,
    PreviousSection,
    ScrollUp,
    ScrollDown,
    ScrollTop,
    /// The hero's call to action: jump to About.
    LearnMore,
}

/// Unified event type for the run loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Command(ShellCommand),
    /// Terminal resize event (new width, height)
    Resize(u16, u16),
    /// A key or mouse event with no binding. Still counts as interaction.
    Unbound,
    /// Focus changes, paste and the like.
    None,
}

// =============================================================================
// Conversion
// =============================================================================

/// Map a key press to a command. Key releases map to nothing.
pub fn convert_key_event(event: CrosstermKeyEvent) -> Option<ShellCommand> {
    if event.kind == KeyEventKind::Release {
        return None;
    }
    if event.modifiers.contains(KeyModifiers::CONTROL) {
        return match event.code {
            KeyCode::Char('c') => Some(ShellCommand::Quit),
            _ => None,
        };
    }

    let command = match event.code {
        KeyCode::Char('q') | KeyCode::Esc => ShellCommand::Quit,
        KeyCode::Char('t') => ShellCommand::ToggleTheme,
        KeyCode::Char(c @ '1'..='5') => {
            ShellCommand::Navigate(Section::from_index(c as usize - '1' as usize))
        }
        KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => ShellCommand::NextSection,
        KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => ShellCommand::PreviousSection,
        KeyCode::Up | KeyCode::Char('k') => ShellCommand::ScrollUp,
        KeyCode::Down | KeyCode::Char('j') => ShellCommand::ScrollDown,
        KeyCode::Home | KeyCode::Char('g') => ShellCommand::ScrollTop,
        KeyCode::Enter => ShellCommand::LearnMore,
        _ => return None,
    };
    Some(command)
}

/// Wheel scrolling scrolls the page; everything else is ignored.
pub fn convert_mouse_event(event: CrosstermMouseEvent) -> Option<ShellCommand> {
    match event.kind {
        MouseEventKind::ScrollUp => Some(ShellCommand::ScrollUp),
        MouseEventKind::ScrollDown => Some(ShellCommand::ScrollDown),
        _ => None,
    }
}

pub fn convert_event(event: CrosstermEvent) -> InputEvent {
    match event {
        CrosstermEvent::Key(key) => convert_key_event(key)
            .map(InputEvent::Command)
            .unwrap_or(InputEvent::Unbound),
        CrosstermEvent::Mouse(mouse) => match convert_mouse_event(mouse) {
            Some(command) => InputEvent::Command(command),
            None if matches!(mouse.kind, MouseEventKind::Down(_)) => InputEvent::Unbound,
            None => InputEvent::None,
        },
        CrosstermEvent::Resize(w, h) => InputEvent::Resize(w, h),
        _ => InputEvent::None,
    }
}

// =============================================================================
// Polling
// =============================================================================

/// Wait up to `timeout` for one event.
pub fn poll_event(timeout: Duration) -> std::io::Result<Option<InputEvent>> {
    if poll(timeout)? {
        Ok(Some(convert_event(read()?)))
    } else {
        Ok(None)
    }
}

pub fn enable_mouse() -> std::io::Result<()> {
    execute!(stdout(), EnableMouseCapture)
}

pub fn disable_mouse() -> std::io::Result<()> {
    execute!(stdout(), DisableMouseCapture)
}

// =============================================================================
// Tests
// =============================================================================
