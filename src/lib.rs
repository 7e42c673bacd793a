//! # folio-tui
//!
//! A terminal rendition of a portfolio intro: a timed preloader that hands
//! off, exactly once, to a page whose headline types and erases itself
//! forever.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for fine-grained reactivity.
//!
//! ## Architecture
//!
//! All timing runs on a single-threaded [`state::Scheduler`] with a virtual
//! clock. The binary advances it from wall-clock time; tests advance it by
//! hand. State machines publish what they show through signals, and one
//! render effect turns those into terminal output:
//!
//! ```text
//! Scheduler → Preloader / TypingAnimator / BlinkClocks → PageShell → compose → DiffRenderer
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Core types (Rgba, Cell, Attr, Phase, PreloaderStage)
//! - [`state`] - Scheduler, animators, preloader, navigation, input, audio
//! - [`pipeline`] - Page shell, frame composition, mount and event loop
//! - [`layout`] - Taffy placement and text measurement
//! - [`renderer`] - Frame buffer and differential output
//! - [`theme`] - Light/dark palettes and the persisted preference
//! - [`config`] - Page configuration
//! - [`error`] - Error type

pub mod config;
pub mod error;
pub mod layout;
pub mod pipeline;
pub mod renderer;
pub mod state;
pub mod theme;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use config::FolioConfig;
pub use error::{FolioError, Result};

pub use layout::{center_column, string_width, wrap_text, LineBox, Placement};

pub use renderer::{DiffRenderer, FrameBuffer};

pub use pipeline::{
    compose, mount, run, MountHandle, PageShell, ShellFlow, ShellServices, ViewKind,
    ViewSnapshot,
};

pub use state::{
    AudioResource, BlinkClocks, HeadlineSplit, LoadedFlag, LoadedNotifier, Navigator, Section,
    PreloaderConfig, PreloaderFrame, PreloaderHandle, PreloaderSequencer, Scheduler,
    ShellCommand, TimerHandle, TypingAnimator, TypingConfig, Typewriter,
};

pub use theme::{Palette, PreferenceStore, ThemeMode, ThemeState};
