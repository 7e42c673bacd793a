//! State Module - Runtime state management systems
//!
//! This module contains the timer-driven state machines behind the page:
//!
//! - **Scheduler** - Virtual-clock timer queue every animation runs on
//! - **Typewriter / Typing** - Type, pause, erase, pause; forever
//! - **Preloader** - Enter, hold, fade text, fade surface, signal loaded
//! - **Loaded** - One-shot completion notifier and flag
//! - **Animate** - Shared caret blink clocks
//! - **Headline** - Prefix / highlighted-name split of the hero text
//! - **Navigation** - Sections, scroll position, current-section detection
//! - **Input** - crossterm events to shell commands
//! - **Audio** - Lazily created click-sound resource

pub mod animate;
pub mod audio;
pub mod headline;
pub mod input;
pub mod loaded;
pub mod navigation;
pub mod preloader;
pub mod scheduler;
pub mod typewriter;
pub mod typing;

pub use animate::{BlinkClocks, BlinkSubscription};
pub use audio::{AudioResource, ClickTone, SilentSink, SinkState, SoundSink, TerminalBell};
pub use headline::HeadlineSplit;
pub use input::{InputEvent, ShellCommand};
pub use loaded::{LoadedFlag, LoadedNotifier};
pub use navigation::{current_section, Navigator, NavigatorConfig, Section};
pub use preloader::{
    power3_in_out, PreloaderConfig, PreloaderFrame, PreloaderHandle, PreloaderSequencer,
};
pub use scheduler::{Scheduler, TimerCallback, TimerHandle, MIN_INTERVAL};
pub use typewriter::{Step, Typewriter, TypingConfig};
pub use typing::TypingAnimator;

pub use crate::types::{Direction, Phase, PreloaderStage};
