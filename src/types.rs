//! Core types for folio-tui.
//!
//! These types define the foundation that everything builds on.
//! Animation state flows from the state machines through the shell snapshot
//! into frame composition, and the renderer only understands [`Cell`]s.

// =============================================================================
// Color
// =============================================================================

/// RGBA color with 8-bit channels (0-255).
///
/// Using integers for exact comparison - no floating point epsilon needed.
/// Special value: r=-1 means "terminal default" (let terminal pick).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba {
    pub r: i16,
    pub g: i16,
    pub b: i16,
    pub a: i16,
}

impl Rgba {
    /// Create a new RGBA color.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as i16,
            g: g as i16,
            b: b as i16,
            a: a as i16,
        }
    }

    /// Create an opaque RGB color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Terminal default color (let terminal decide).
    pub const TERMINAL_DEFAULT: Self = Self {
        r: -1,
        g: -1,
        b: -1,
        a: -1,
    };

    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Create a color from a 0xRRGGBB integer.
    pub const fn from_rgb_int(rgb: u32) -> Self {
        Self::rgb(
            ((rgb >> 16) & 0xFF) as u8,
            ((rgb >> 8) & 0xFF) as u8,
            (rgb & 0xFF) as u8,
        )
    }

    /// Check if this is the terminal default color.
    #[inline]
    pub const fn is_terminal_default(&self) -> bool {
        self.r == -1
    }

    /// Linear interpolation between two colors.
    ///
    /// Terminal default endpoints cannot be mixed; the nearer endpoint wins.
    #[inline]
    pub fn lerp(a: Self, b: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        if a.is_terminal_default() || b.is_terminal_default() {
            return if t < 0.5 { a } else { b };
        }
        let inv_t = 1.0 - t;

        Self {
            r: ((a.r as f32 * inv_t) + (b.r as f32 * t)).round() as i16,
            g: ((a.g as f32 * inv_t) + (b.g as f32 * t)).round() as i16,
            b: ((a.b as f32 * inv_t) + (b.b as f32 * t)).round() as i16,
            a: ((a.a as f32 * inv_t) + (b.a as f32 * t)).round() as i16,
        }
    }

    /// Fade `self` toward `background` (opacity 1.0 = unchanged, 0.0 = background).
    #[inline]
    pub fn with_opacity_over(self, background: Self, opacity: f32) -> Self {
        Self::lerp(background, self, opacity)
    }
}

// =============================================================================
// Cell Attributes (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Text attributes as a bitfield for efficient storage and comparison.
    ///
    /// Combine with bitwise OR: `Attr::BOLD | Attr::UNDERLINE`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Attr: u8 {
        const NONE = 0;
        const BOLD = 1 << 0;
        const DIM = 1 << 1;
        const ITALIC = 1 << 2;
        const UNDERLINE = 1 << 3;
        const INVERSE = 1 << 4;
    }
}

// =============================================================================
// Cell - The atomic unit of terminal rendering
// =============================================================================

/// A single terminal cell.
///
/// Wide characters occupy their own cell plus a continuation cell holding
/// `char == 0`, which the renderer skips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Unicode scalar (' ' for blank, '\0' for a wide-char continuation).
    pub char: char,
    /// Foreground color.
    pub fg: Rgba,
    /// Background color.
    pub bg: Rgba,
    /// Attribute flags (bold, italic, etc.).
    pub attrs: Attr,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            char: ' ',
            fg: Rgba::TERMINAL_DEFAULT,
            bg: Rgba::TERMINAL_DEFAULT,
            attrs: Attr::NONE,
        }
    }
}

// =============================================================================
// Animation enums
// =============================================================================

/// Direction the reveal cursor moves on each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

/// Typing animator phase. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Typing,
    PausedAfterTyping,
    Erasing,
    PausedAfterErasing,
}

impl Phase {
    /// Phase that follows this one in the cycle.
    pub const fn next(self) -> Self {
        match self {
            Self::Typing => Self::PausedAfterTyping,
            Self::PausedAfterTyping => Self::Erasing,
            Self::Erasing => Self::PausedAfterErasing,
            Self::PausedAfterErasing => Self::Typing,
        }
    }

    /// Direction the reveal cursor moves in (or last moved in) this phase.
    pub const fn direction(self) -> Direction {
        match self {
            Self::Typing | Self::PausedAfterTyping => Direction::Forward,
            Self::Erasing | Self::PausedAfterErasing => Direction::Backward,
        }
    }

    /// Whether the tick loop is active (caret shown).
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Typing | Self::Erasing)
    }
}

/// Preloader stage. Strictly linear, no loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PreloaderStage {
    #[default]
    Entering,
    Visible,
    FadingText,
    FadingOut,
    Done,
}

impl PreloaderStage {
    /// Stage that follows this one. `Done` is terminal.
    pub const fn next(self) -> Self {
        match self {
            Self::Entering => Self::Visible,
            Self::Visible => Self::FadingText,
            Self::FadingText => Self::FadingOut,
            Self::FadingOut | Self::Done => Self::Done,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
