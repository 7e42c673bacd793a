//! Mount API - Application lifecycle and render effect.
//!
//! `mount` builds the page shell and the ONE render effect. The effect reads
//! the terminal size signals and the shell snapshot, so any signal the shell
//! publishes (typed text, caret blink, preloader frame, scroll, theme)
//! schedules a redraw. `tick` drives time: it advances the scheduler to the
//! wall-clock offset, applies at most one input event, and flushes effects.
//!
//! # Example
//!
//! ```ignore
//! use folio_tui::pipeline::mount;
//!
//! // Raw mode, alternate screen, event loop; returns on quit.
//! mount::run(FolioConfig::default(), services)?;
//! ```

use std::io::{self, Write};
use std::rc::Rc;
use std::time::{Duration, Instant};

use spark_signals::{effect, flush_sync};

use super::frame::compose;
use super::shell::{PageShell, ShellFlow, ShellServices};
use super::terminal::{
    detect_terminal_size, set_terminal_size, terminal_height, terminal_height_signal,
    terminal_width, terminal_width_signal, TerminalSession,
};
use crate::config::FolioConfig;
use crate::error::Result;
use crate::renderer::DiffRenderer;
use crate::state::{input, InputEvent, Scheduler};
use crate::theme::Palette;

/// Longest the loop sleeps waiting for input when no timer is due sooner.
pub const MAX_IDLE: Duration = Duration::from_millis(100);

// =============================================================================
// Mount Handle
// =============================================================================

/// Handle returned by mount() that allows unmounting.
///
/// Holds the shell, its scheduler and the render effect stop function.
pub struct MountHandle {
    scheduler: Scheduler,
    shell: Rc<PageShell>,
    stop_effect: Option<Box<dyn FnOnce()>>,
}

impl MountHandle {
    pub fn shell(&self) -> &PageShell {
        &self.shell
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Advance to `now` (time since mount), apply `event`, and flush effects.
    pub fn tick(&self, now: Duration, event: Option<InputEvent>) -> ShellFlow {
        if now > self.scheduler.now() {
            self.scheduler.advance_to(now);
        }

        let flow = match event {
            Some(InputEvent::Command(command)) => self.shell.handle_command(command),
            Some(InputEvent::Resize(width, height)) => {
                set_terminal_size(width, height);
                self.shell.set_viewport(width, height);
                ShellFlow::Continue
            }
            Some(InputEvent::Unbound) => {
                self.shell.note_interaction();
                ShellFlow::Continue
            }
            Some(InputEvent::None) | None => ShellFlow::Continue,
        };

        flush_sync();
        flow
    }

    /// How long the loop may wait for input at `now` before a timer is due.
    pub fn poll_timeout(&self, now: Duration) -> Duration {
        self.scheduler
            .next_due()
            .map(|due| due.saturating_sub(now))
            .unwrap_or(MAX_IDLE)
            .min(MAX_IDLE)
    }

    /// Stop the render effect and tear the page down.
    pub fn unmount(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        if let Some(stop) = self.stop_effect.take() {
            stop();
        }
        self.shell.unmount();
    }
}

impl Drop for MountHandle {
    fn drop(&mut self) {
        self.teardown();
    }
}

// =============================================================================
// Mount Function
// =============================================================================

/// Mount the page on `scheduler`, rendering through `out`.
///
/// The terminal size signals must already hold the viewport size.
pub fn mount<W: Write + 'static>(
    scheduler: &Scheduler,
    config: FolioConfig,
    services: ShellServices,
    out: W,
) -> MountHandle {
    let shell = Rc::new(PageShell::mount(scheduler, config, services));
    shell.set_viewport(terminal_width(), terminal_height());

    let mut renderer = DiffRenderer::new(out);
    let view = shell.clone();
    let stop_fn = effect(move || {
        let width = terminal_width_signal().get();
        let height = terminal_height_signal().get();
        let snapshot = view.snapshot();
        let palette = Palette::for_mode(snapshot.mode());

        match compose(&snapshot, &palette, width, height) {
            Ok(buffer) => {
                if let Err(error) = renderer.render(&buffer) {
                    tracing::error!(%error, "render failed");
                }
            }
            Err(error) => tracing::error!(%error, "frame composition failed"),
        }
    });

    MountHandle {
        scheduler: scheduler.clone(),
        shell,
        stop_effect: Some(Box::new(stop_fn)),
    }
}

// =============================================================================
// Event Loop
// =============================================================================

/// Take over the terminal and run the page until the user quits.
pub fn run(config: FolioConfig, services: ShellServices) -> Result<()> {
    let _session = TerminalSession::stdout()?;
    input::enable_mouse()?;
    detect_terminal_size();

    let scheduler = Scheduler::new();
    let handle = mount(&scheduler, config, services, io::stdout());
    let started = Instant::now();
    tracing::info!(
        width = terminal_width(),
        height = terminal_height(),
        "event loop started"
    );

    let result = event_loop(&handle, started);

    handle.unmount();
    if let Err(error) = input::disable_mouse() {
        tracing::warn!(%error, "failed to release mouse capture");
    }
    result
}

fn event_loop(handle: &MountHandle, started: Instant) -> Result<()> {
    let mut event = None;
    loop {
        if handle.tick(started.elapsed(), event.take()) == ShellFlow::Quit {
            tracing::info!("quit requested");
            return Ok(());
        }
        event = input::poll_event(handle.poll_timeout(started.elapsed()))?;
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{AudioResource, ShellCommand};
    use crate::theme::{ThemeMode, ThemeState};
    use crate::pipeline::ViewKind;
    use std::cell::RefCell;

    /// Writer the test can read back after the effect consumed it.
    #[derive(Clone, Default)]
    struct SharedBuf(Rc<RefCell<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuf {
        fn len(&self) -> usize {
            self.0.borrow().len()
        }

        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.borrow()).into_owned()
        }
    }

    fn setup() -> (Scheduler, MountHandle, SharedBuf) {
        set_terminal_size(40, 12);
        let scheduler = Scheduler::new();
        let services = ShellServices {
            audio: Rc::new(AudioResource::silent()),
            theme: ThemeState::new(ThemeMode::Dark, None),
        };
        let out = SharedBuf::default();
        let handle = mount(&scheduler, FolioConfig::default(), services, out.clone());
        (scheduler, handle, out)
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_mount_renders_first_frame() {
        let (_scheduler, handle, out) = setup();
        handle.tick(Duration::ZERO, None);
        assert!(out.len() > 0);
        assert!(out.text().contains("Asad"));
    }

    #[test]
    fn test_tick_reaches_main_view() {
        let (_scheduler, handle, out) = setup();
        handle.tick(ms(3350), None);
        assert_eq!(handle.shell().view_kind(), ViewKind::Main);

        let before = out.len();
        handle.tick(ms(3650), None);
        assert_eq!(handle.shell().hero_text().as_deref(), Some("Hel"));
        // Each typed char lands in its own frame.
        assert!(out.len() > before);
        assert!(out.0.borrow()[before..].contains(&b'l'));
    }

    #[test]
    fn test_quit_command() {
        let (_scheduler, handle, _out) = setup();
        let flow = handle.tick(ms(10), Some(InputEvent::Command(ShellCommand::Quit)));
        assert_eq!(flow, ShellFlow::Quit);
    }

    #[test]
    fn test_resize_updates_viewport() {
        let (_scheduler, handle, _out) = setup();
        handle.tick(ms(10), Some(InputEvent::Resize(100, 30)));
        assert_eq!(terminal_width(), 100);
        assert_eq!(handle.shell().navigator().section_height(), 28);
    }

    #[test]
    fn test_poll_timeout_tracks_next_timer() {
        let (_scheduler, handle, _out) = setup();
        // Preloader frames tick every 16ms.
        assert_eq!(handle.poll_timeout(Duration::ZERO), ms(16));
        assert_eq!(handle.poll_timeout(ms(10)), ms(6));
    }

    #[test]
    fn test_unmount_clears_timers() {
        let (scheduler, handle, _out) = setup();
        handle.tick(ms(4000), None);
        handle.unmount();
        assert_eq!(scheduler.pending_count(), 0);
    }
}
