//! Page Shell - Intro hand-off and page lifecycle
//!
//! The shell owns the one-shot loaded flag and swaps the preloader out for
//! the main page the moment the preloader reports completion:
//!
//! ```text
//! mount()
//!   └─ View::Preloader(handle)        ← Quit only
//!         │ onLoaded (inside the scheduler callback)
//!         ▼
//!      View::Main(hero)               ← all commands, typing + caret running
//!         │ unmount() / drop
//!         ▼
//!      View::Unmounted                ← every timer canceled
//! ```
//!
//! The shell never touches the terminal. It publishes a [`ViewSnapshot`]
//! that frame composition turns into cells.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use spark_signals::{signal, Signal};

use super::frame::{MainSnapshot, ViewSnapshot};
use crate::config::FolioConfig;
use crate::state::{
    AudioResource, BlinkClocks, BlinkSubscription, HeadlineSplit, LoadedFlag, Navigator,
    PreloaderHandle, PreloaderSequencer, PreloaderStage, Scheduler, Section, ShellCommand,
    TypingAnimator,
};
use crate::theme::ThemeState;

/// Rows taken by the navigation bar and the footer.
pub const CHROME_ROWS: u16 = 2;

// =============================================================================
// Types
// =============================================================================

/// Shared services injected into the shell.
#[derive(Clone)]
pub struct ShellServices {
    pub audio: Rc<AudioResource>,
    pub theme: ThemeState,
}

/// Whether the run loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellFlow {
    Continue,
    Quit,
}

/// Which view is mounted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Unmounted,
    Preloader,
    Main,
}

/// The mounted hero section.
struct HeroMount {
    animator: TypingAnimator,
    split: HeadlineSplit,
    _caret: BlinkSubscription,
}

enum View {
    Unmounted,
    Preloader(PreloaderHandle),
    Main(HeroMount),
}

struct ShellInner {
    scheduler: Scheduler,
    config: FolioConfig,
    services: ShellServices,
    blink: BlinkClocks,
    loaded: LoadedFlag,
    navigator: Navigator,
    view: RefCell<View>,
    view_kind: Signal<ViewKind>,
}

impl ShellInner {
    /// Replace the view. The old one is dropped after the borrow is released
    /// so its teardown may touch the shell.
    fn swap_view(&self, next: View, kind: ViewKind) {
        let old = self.view.replace(next);
        self.view_kind.set(kind);
        drop(old);
    }
}

// =============================================================================
// PageShell
// =============================================================================

/// Root of the page: preloader first, then the main view.
pub struct PageShell {
    inner: Rc<ShellInner>,
}

impl PageShell {
    /// Mount the page and start the preloader.
    pub fn mount(scheduler: &Scheduler, config: FolioConfig, services: ShellServices) -> Self {
        let inner = Rc::new(ShellInner {
            scheduler: scheduler.clone(),
            navigator: Navigator::new(config.navigation),
            config,
            services,
            blink: BlinkClocks::new(scheduler),
            loaded: LoadedFlag::new(),
            view: RefCell::new(View::Unmounted),
            view_kind: signal(ViewKind::Unmounted),
        });

        let weak = Rc::downgrade(&inner);
        let handle = PreloaderSequencer::run(scheduler, inner.config.preloader, move || {
            on_loaded(&weak);
        });
        inner.swap_view(View::Preloader(handle), ViewKind::Preloader);
        tracing::info!(title = %inner.config.title, "page mounted");

        Self { inner }
    }

    /// Tear down whatever is mounted. Idempotent.
    pub fn unmount(&self) {
        if self.view_kind() == ViewKind::Unmounted {
            return;
        }
        self.inner.swap_view(View::Unmounted, ViewKind::Unmounted);
        tracing::info!("page unmounted");
    }

    pub fn view_kind(&self) -> ViewKind {
        self.inner.view_kind.get()
    }

    pub fn is_loaded(&self) -> bool {
        self.inner.loaded.is_loaded()
    }

    pub fn loaded_signal(&self) -> Signal<bool> {
        self.inner.loaded.signal()
    }

    pub fn navigator(&self) -> &Navigator {
        &self.inner.navigator
    }

    pub fn theme(&self) -> &ThemeState {
        &self.inner.services.theme
    }

    pub fn config(&self) -> &FolioConfig {
        &self.inner.config
    }

    /// Stage of the running preloader, if it is mounted.
    pub fn preloader_stage(&self) -> Option<PreloaderStage> {
        match &*self.inner.view.borrow() {
            View::Preloader(handle) => Some(handle.stage()),
            _ => None,
        }
    }

    /// Revealed hero text, once the main view is mounted.
    pub fn hero_text(&self) -> Option<String> {
        match &*self.inner.view.borrow() {
            View::Main(hero) => Some(hero.animator.current_text()),
            _ => None,
        }
    }

    /// Caret flag of the hero animator, once the main view is mounted.
    pub fn hero_typing(&self) -> Option<bool> {
        match &*self.inner.view.borrow() {
            View::Main(hero) => Some(hero.animator.is_typing()),
            _ => None,
        }
    }

    /// Resize: sections are one body-height tall.
    pub fn set_viewport(&self, _width: u16, height: u16) {
        self.inner
            .navigator
            .set_section_height(height.saturating_sub(CHROME_ROWS));
    }

    /// Any key press or click. The first one warms up audio.
    pub fn note_interaction(&self) {
        self.inner.services.audio.prime();
    }

    /// Apply a command. Returns whether the loop should continue.
    pub fn handle_command(&self, command: ShellCommand) -> ShellFlow {
        self.note_interaction();

        if command == ShellCommand::Quit {
            return ShellFlow::Quit;
        }
        if self.view_kind() != ViewKind::Main {
            tracing::trace!(?command, "ignored until the page has loaded");
            return ShellFlow::Continue;
        }

        let navigator = &self.inner.navigator;
        match command {
            ShellCommand::ToggleTheme => {
                let mode = self.inner.services.theme.toggle();
                tracing::info!(%mode, "theme toggled");
            }
            ShellCommand::Navigate(section) => navigator.navigate_to(section),
            ShellCommand::NextSection => navigator.next_section(),
            ShellCommand::PreviousSection => navigator.previous_section(),
            ShellCommand::ScrollUp => navigator.scroll_by(-1),
            ShellCommand::ScrollDown => navigator.scroll_by(1),
            ShellCommand::ScrollTop => navigator.scroll_to_top(),
            ShellCommand::LearnMore => navigator.navigate_to(Section::About),
            ShellCommand::Quit => return ShellFlow::Quit,
        }
        self.inner.services.audio.play_click();
        ShellFlow::Continue
    }

    /// Plain data describing what to draw.
    ///
    /// Reads every value through its signal, so calling this from an effect
    /// re-runs the effect whenever the picture changes.
    pub fn snapshot(&self) -> ViewSnapshot {
        let kind = self.inner.view_kind.get();
        let mode = self.inner.services.theme.signal().get();
        let config = &self.inner.config;

        match (&*self.inner.view.borrow(), kind) {
            (View::Preloader(handle), ViewKind::Preloader) => ViewSnapshot::Preloader {
                title: config.title.clone(),
                frame: handle.frame_signal().get(),
                mode,
            },
            (View::Main(hero), ViewKind::Main) => {
                let text = hero.animator.text_signal().get();
                let typing = hero.animator.typing_signal().get();
                let blink_on = match self.inner.blink.phase_signal(config.caret_fps) {
                    Some(phase) => phase.get(),
                    None => true,
                };
                let (prefix, name) = hero.split.split(&text);
                let navigator = &self.inner.navigator;
                let scroll = navigator.scroll_signal().get();

                ViewSnapshot::Main(MainSnapshot {
                    brand: config.title.clone(),
                    prefix: prefix.to_string(),
                    name: name.to_string(),
                    headline: config.headline.clone(),
                    caret_visible: typing && blink_on,
                    tagline: config.tagline.clone(),
                    current: navigator.current(),
                    scroll,
                    section_height: navigator.section_height(),
                    scroll_top_visible: navigator.scroll_top_visible(),
                    mode,
                })
            }
            _ => ViewSnapshot::Blank { mode },
        }
    }
}

impl Drop for PageShell {
    fn drop(&mut self) {
        self.unmount();
    }
}

// =============================================================================
// Hand-off
// =============================================================================

fn on_loaded(weak: &Weak<ShellInner>) {
    let Some(inner) = weak.upgrade() else {
        return;
    };
    if !inner.loaded.mark() {
        return;
    }

    let config = &inner.config;
    let animator = TypingAnimator::new(&inner.scheduler, config.headline.clone(), config.typing);
    let hero = HeroMount {
        split: HeadlineSplit::new(&config.headline, &config.name),
        _caret: inner.blink.subscribe(config.caret_fps),
        animator,
    };
    hero.animator.start();

    inner.swap_view(View::Main(hero), ViewKind::Main);
    tracing::info!(at = ?inner.scheduler.now(), "intro complete, main view mounted");
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::ThemeMode;
    use std::time::Duration;

    fn setup() -> (Scheduler, PageShell) {
        let scheduler = Scheduler::new();
        let services = ShellServices {
            audio: Rc::new(AudioResource::silent()),
            theme: ThemeState::new(ThemeMode::Dark, None),
        };
        let shell = PageShell::mount(&scheduler, FolioConfig::default(), services);
        shell.set_viewport(80, 24);
        (scheduler, shell)
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_mount_starts_preloader() {
        let (_scheduler, shell) = setup();
        assert_eq!(shell.view_kind(), ViewKind::Preloader);
        assert_eq!(shell.preloader_stage(), Some(PreloaderStage::Entering));
        assert!(!shell.is_loaded());
        assert!(matches!(shell.snapshot(), ViewSnapshot::Preloader { .. }));
    }

    #[test]
    fn test_hand_off_at_total_duration() {
        let (scheduler, shell) = setup();

        scheduler.advance_to(ms(3349));
        assert_eq!(shell.view_kind(), ViewKind::Preloader);

        scheduler.advance_to(ms(3350));
        assert_eq!(shell.view_kind(), ViewKind::Main);
        assert!(shell.is_loaded());
        assert_eq!(shell.hero_text().as_deref(), Some(""));
        assert_eq!(shell.hero_typing(), Some(true));

        scheduler.advance_to(ms(3450));
        assert_eq!(shell.hero_text().as_deref(), Some("H"));
    }

    #[test]
    fn test_commands_ignored_during_preloader() {
        let (scheduler, shell) = setup();
        assert_eq!(shell.handle_command(ShellCommand::ToggleTheme), ShellFlow::Continue);
        assert_eq!(shell.theme().mode(), ThemeMode::Dark);
        assert_eq!(shell.handle_command(ShellCommand::Quit), ShellFlow::Quit);

        scheduler.advance_to(ms(3350));
        shell.handle_command(ShellCommand::ToggleTheme);
        assert_eq!(shell.theme().mode(), ThemeMode::Light);
    }

    #[test]
    fn test_navigation_commands() {
        let (scheduler, shell) = setup();
        scheduler.advance_to(ms(3350));

        shell.handle_command(ShellCommand::LearnMore);
        assert_eq!(shell.navigator().current(), Section::About);
        shell.handle_command(ShellCommand::NextSection);
        assert_eq!(shell.navigator().current(), Section::Projects);
        shell.handle_command(ShellCommand::ScrollTop);
        assert_eq!(shell.navigator().current(), Section::Home);
        shell.handle_command(ShellCommand::Navigate(Section::Contact));
        assert_eq!(shell.navigator().scroll(), 88);
    }

    #[test]
    fn test_unmount_cancels_everything() {
        let (scheduler, shell) = setup();
        scheduler.advance_to(ms(3600));
        assert!(scheduler.pending_count() > 0);

        shell.unmount();
        assert_eq!(shell.view_kind(), ViewKind::Unmounted);
        assert_eq!(scheduler.pending_count(), 0);
        assert!(matches!(shell.snapshot(), ViewSnapshot::Blank { .. }));
    }

    #[test]
    fn test_unmount_during_preloader_never_loads() {
        let (scheduler, shell) = setup();
        scheduler.advance_to(ms(1500));
        shell.unmount();

        scheduler.advance_to(ms(10_000));
        assert!(!shell.is_loaded());
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn test_first_interaction_primes_audio() {
        let scheduler = Scheduler::new();
        let audio = Rc::new(AudioResource::silent());
        let services = ShellServices {
            audio: audio.clone(),
            theme: ThemeState::new(ThemeMode::Dark, None),
        };
        let shell = PageShell::mount(&scheduler, FolioConfig::default(), services);

        assert!(!audio.is_initialized());
        shell.note_interaction();
        shell.note_interaction();
        assert!(audio.is_initialized());
        assert_eq!(audio.init_attempts(), 1);
    }

    #[test]
    fn test_snapshot_splits_name() {
        let (scheduler, shell) = setup();
        // 3350ms hand-off, then 13 chars at 100ms each.
        scheduler.advance_to(ms(3350 + 1300));

        match shell.snapshot() {
            ViewSnapshot::Main(main) => {
                assert_eq!(main.prefix, "Hello, I'm ");
                assert_eq!(main.name, "As");
                assert_eq!(main.current, Section::Home);
            }
            _ => panic!("expected main view"),
        }
    }
}
