//! Layout Module
//!
//! Flexbox placement for the terminal screens using Taffy, plus Unicode-aware
//! text measurement.
//!
//! # Example
//!
//! ```
//! use folio_tui::layout::{center_column, string_width, LineBox};
//!
//! let title = "Asad Ali";
//! let placed = center_column(80, 24, &[LineBox::new(string_width(title), 1)]).unwrap();
//! assert_eq!(placed[0].x, 36);
//! ```

mod taffy_bridge;
mod text_measure;

pub use taffy_bridge::{center_column, spread_row, LineBox, Placement};
pub use text_measure::*;
