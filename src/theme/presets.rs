//! Palette presets for folio-tui.
//!
//! Colors follow the Tailwind grays and blues of the portfolio page:
//! gray-900 text on white with blue-600 accents in light mode, white text on
//! gray-900 with blue-400 accents in dark mode.

use super::Palette;
use crate::types::Rgba;

/// Light palette.
pub fn light() -> Palette {
    Palette {
        name: "light",
        text: Rgba::from_rgb_int(0x111827),       // gray-900
        text_muted: Rgba::from_rgb_int(0x4b5563), // gray-600
        accent: Rgba::from_rgb_int(0x2563eb),     // blue-600
        background: Rgba::WHITE,
        surface: Rgba::from_rgb_int(0xf3f4f6), // gray-100
    }
}

/// Dark palette.
pub fn dark() -> Palette {
    Palette {
        name: "dark",
        text: Rgba::WHITE,
        text_muted: Rgba::from_rgb_int(0xd1d5db), // gray-300
        accent: Rgba::from_rgb_int(0x60a5fa),     // blue-400
        background: Rgba::from_rgb_int(0x111827), // gray-900
        surface: Rgba::from_rgb_int(0x1f2937),    // gray-800
    }
}
