//! Theme System for folio-tui.
//!
//! Two modes (light and dark) with semantic palettes, a reactive current
//! mode, and a persisted preference stored as a single string.
//!
//! # Resolution order
//!
//! 1. Stored preference (`"light"` / `"dark"`)
//! 2. Terminal background hint from `COLORFGBG`
//! 3. Dark
//!
//! # Example
//!
//! ```
//! use folio_tui::theme::{ThemeMode, ThemeState};
//!
//! let theme = ThemeState::new(ThemeMode::Light, None);
//! theme.toggle();
//! assert_eq!(theme.mode(), ThemeMode::Dark);
//! assert_eq!(theme.palette().name, "dark");
//! ```

use std::fmt;
use std::str::FromStr;

use spark_signals::{signal, Signal};

use crate::error::FolioError;
use crate::types::Rgba;

pub mod presets;
pub mod store;

pub use presets::{dark, light};
pub use store::PreferenceStore;

// =============================================================================
// ThemeMode
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThemeMode {
    Light,
    Dark,
}

impl ThemeMode {
    pub const fn toggle(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Persisted form.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub const fn is_dark(self) -> bool {
        matches!(self, Self::Dark)
    }

    /// Guess from a `COLORFGBG` value (`"fg;bg"` or `"fg;default;bg"`).
    ///
    /// Background indices 0-6 and 8 are dark terminal colors.
    pub fn from_colorfgbg(value: &str) -> Option<Self> {
        let bg: u8 = value.rsplit(';').next()?.trim().parse().ok()?;
        Some(if bg <= 6 || bg == 8 { Self::Dark } else { Self::Light })
    }

    /// Resolve the starting mode from a stored value and a terminal hint.
    pub fn resolve(stored: Option<ThemeMode>, colorfgbg: Option<&str>) -> Self {
        stored
            .or_else(|| colorfgbg.and_then(Self::from_colorfgbg))
            .unwrap_or(Self::Dark)
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeMode {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(FolioError::InvalidTheme(other.to_string())),
        }
    }
}

// =============================================================================
// Palette - Semantic colors of one mode
// =============================================================================

/// Semantic colors used by frame composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub name: &'static str,
    /// Headline and body text.
    pub text: Rgba,
    /// Secondary copy (tagline, footer).
    pub text_muted: Rgba,
    /// Highlighted name, caret, active navigation item.
    pub accent: Rgba,
    /// Page and preloader surface.
    pub background: Rgba,
    /// Navigation bar surface.
    pub surface: Rgba,
}

impl Palette {
    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Light => light(),
            ThemeMode::Dark => dark(),
        }
    }
}

// =============================================================================
// ThemeState - Reactive current mode with persistence
// =============================================================================

/// Current theme mode, published as a signal and written through to the store.
#[derive(Clone)]
pub struct ThemeState {
    mode: Signal<ThemeMode>,
    store: Option<PreferenceStore>,
}

impl ThemeState {
    /// Create with an explicit mode. The mode is written to the store.
    pub fn new(mode: ThemeMode, store: Option<PreferenceStore>) -> Self {
        let state = Self {
            mode: signal(mode),
            store,
        };
        state.persist(mode);
        state
    }

    /// Resolve the starting mode from the store and the environment.
    pub fn load(store: Option<PreferenceStore>) -> Self {
        let stored = store.as_ref().and_then(|s| match s.load() {
            Ok(mode) => mode,
            Err(error) => {
                tracing::warn!(%error, "ignoring unreadable theme preference");
                None
            }
        });
        let hint = std::env::var("COLORFGBG").ok();
        let mode = ThemeMode::resolve(stored, hint.as_deref());
        tracing::debug!(%mode, from_store = stored.is_some(), "theme resolved");
        Self::new(mode, store)
    }

    pub fn mode(&self) -> ThemeMode {
        self.mode.get()
    }

    pub fn palette(&self) -> Palette {
        Palette::for_mode(self.mode())
    }

    /// Flip between light and dark. Returns the new mode.
    pub fn toggle(&self) -> ThemeMode {
        let next = self.mode().toggle();
        self.mode.set(next);
        self.persist(next);
        next
    }

    pub fn signal(&self) -> Signal<ThemeMode> {
        self.mode.clone()
    }

    fn persist(&self, mode: ThemeMode) {
        if let Some(store) = &self.store {
            if let Err(error) = store.save(mode) {
                tracing::warn!(%error, path = %store.path().display(), "failed to save theme preference");
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_round_trips_through_str() {
        assert_eq!("light".parse::<ThemeMode>().unwrap(), ThemeMode::Light);
        assert_eq!("dark\n".parse::<ThemeMode>().unwrap(), ThemeMode::Dark);
        assert_eq!(ThemeMode::Dark.to_string(), "dark");
    }

    #[test]
    fn test_invalid_mode_is_rejected() {
        let err = "sepia".parse::<ThemeMode>().unwrap_err();
        assert!(matches!(err, FolioError::InvalidTheme(ref s) if s == "sepia"));
    }

    #[test]
    fn test_colorfgbg_hint() {
        assert_eq!(ThemeMode::from_colorfgbg("15;0"), Some(ThemeMode::Dark));
        assert_eq!(ThemeMode::from_colorfgbg("0;default;15"), Some(ThemeMode::Light));
        assert_eq!(ThemeMode::from_colorfgbg("0;7"), Some(ThemeMode::Light));
        assert_eq!(ThemeMode::from_colorfgbg("garbage"), None);
    }

    #[test]
    fn test_resolution_order() {
        assert_eq!(
            ThemeMode::resolve(Some(ThemeMode::Light), Some("15;0")),
            ThemeMode::Light
        );
        assert_eq!(ThemeMode::resolve(None, Some("0;15")), ThemeMode::Light);
        assert_eq!(ThemeMode::resolve(None, None), ThemeMode::Dark);
    }

    #[test]
    fn test_toggle_updates_signal_and_palette() {
        let theme = ThemeState::new(ThemeMode::Dark, None);
        let sig = theme.signal();
        assert_eq!(theme.toggle(), ThemeMode::Light);
        assert_eq!(sig.get(), ThemeMode::Light);
        assert_eq!(theme.palette(), light());
    }
}
