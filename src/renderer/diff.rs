//! Differential renderer.
//!
//! The DiffRenderer compares the current frame to the previous frame and only
//! outputs cells that have changed.
//!
//! # Algorithm
//!
//! 1. Collect changed cells; if there are none, write nothing at all
//! 2. Wrap output in a synchronized update
//! 3. For each changed cell: move only when not already there, emit only the
//!    style codes that differ from the last cell written
//! 4. Flush once and keep the frame for the next comparison

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Attribute, Color, Print, SetAttribute, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{BeginSynchronizedUpdate, Clear, ClearType, EndSynchronizedUpdate};

use super::buffer::FrameBuffer;
use crate::layout::char_width;
use crate::types::{Attr, Cell, Rgba};

/// Map a color onto crossterm, keeping terminal default as `Reset`.
fn to_color(color: Rgba) -> Color {
    if color.is_terminal_default() {
        Color::Reset
    } else {
        Color::Rgb {
            r: color.r as u8,
            g: color.g as u8,
            b: color.b as u8,
        }
    }
}

/// Differential renderer over any writer.
pub struct DiffRenderer<W: Write> {
    out: W,
    previous: Option<FrameBuffer>,
    // What the terminal currently has, so redundant codes are skipped.
    cursor: Option<(u16, u16)>,
    fg: Option<Rgba>,
    bg: Option<Rgba>,
    attrs: Option<Attr>,
}

impl DiffRenderer<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> DiffRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            previous: None,
            cursor: None,
            fg: None,
            bg: None,
            attrs: None,
        }
    }

    /// Render a frame, outputting only changed cells.
    ///
    /// Returns false (and writes nothing) when no cell changed.
    pub fn render(&mut self, buffer: &FrameBuffer) -> io::Result<bool> {
        let comparable = self
            .previous
            .as_ref()
            .filter(|prev| prev.width() == buffer.width() && prev.height() == buffer.height());

        let Some(prev) = comparable else {
            self.render_full(buffer)?;
            return Ok(true);
        };

        let mut changed = Vec::new();
        for y in 0..buffer.height() {
            for x in 0..buffer.width() {
                if let (Some(cell), Some(old)) = (buffer.get(x, y), prev.get(x, y)) {
                    if cell != old {
                        changed.push((x, y, *cell));
                    }
                }
            }
        }

        if changed.is_empty() {
            return Ok(false);
        }

        queue!(self.out, BeginSynchronizedUpdate)?;
        self.forget_terminal_state();
        for (x, y, cell) in changed {
            self.render_cell(x, y, &cell)?;
        }
        queue!(self.out, EndSynchronizedUpdate)?;
        self.out.flush()?;

        self.previous = Some(buffer.clone());
        Ok(true)
    }

    /// Force a full redraw (no diffing).
    ///
    /// Used for the first frame and after a resize.
    pub fn render_full(&mut self, buffer: &FrameBuffer) -> io::Result<()> {
        queue!(
            self.out,
            BeginSynchronizedUpdate,
            SetAttribute(Attribute::Reset),
            Clear(ClearType::All)
        )?;
        self.forget_terminal_state();

        for y in 0..buffer.height() {
            for x in 0..buffer.width() {
                if let Some(cell) = buffer.get(x, y) {
                    self.render_cell(x, y, cell)?;
                }
            }
        }

        queue!(self.out, EndSynchronizedUpdate)?;
        self.out.flush()?;

        self.previous = Some(buffer.clone());
        Ok(())
    }

    /// Invalidate the previous frame. Next render will be a full redraw.
    pub fn invalidate(&mut self) {
        self.previous = None;
    }

    /// Check if we have a previous frame to diff against.
    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn forget_terminal_state(&mut self) {
        self.cursor = None;
        self.fg = None;
        self.bg = None;
        self.attrs = None;
    }

    fn render_cell(&mut self, x: u16, y: u16, cell: &Cell) -> io::Result<()> {
        // Continuation cells are painted by their wide leading glyph.
        if cell.char == '\0' {
            return Ok(());
        }

        if self.cursor != Some((x, y)) {
            queue!(self.out, MoveTo(x, y))?;
        }

        if self.attrs != Some(cell.attrs) {
            // Reset clears colors too.
            queue!(self.out, SetAttribute(Attribute::Reset))?;
            self.fg = None;
            self.bg = None;
            for (flag, attribute) in [
                (Attr::BOLD, Attribute::Bold),
                (Attr::DIM, Attribute::Dim),
                (Attr::ITALIC, Attribute::Italic),
                (Attr::UNDERLINE, Attribute::Underlined),
                (Attr::INVERSE, Attribute::Reverse),
            ] {
                if cell.attrs.contains(flag) {
                    queue!(self.out, SetAttribute(attribute))?;
                }
            }
            self.attrs = Some(cell.attrs);
        }

        if self.fg != Some(cell.fg) {
            queue!(self.out, SetForegroundColor(to_color(cell.fg)))?;
            self.fg = Some(cell.fg);
        }
        if self.bg != Some(cell.bg) {
            queue!(self.out, SetBackgroundColor(to_color(cell.bg)))?;
            self.bg = Some(cell.bg);
        }

        queue!(self.out, Print(cell.char))?;
        self.cursor = Some((x + char_width(cell.char).max(1), y));
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn output(renderer: &DiffRenderer<Vec<u8>>) -> String {
        String::from_utf8_lossy(renderer.writer()).into_owned()
    }

    #[test]
    fn test_first_frame_is_full() {
        let mut renderer = DiffRenderer::new(Vec::new());
        assert!(!renderer.has_previous());

        let mut buf = FrameBuffer::new(6, 1);
        buf.draw_text(0, 0, "Hi", Rgba::rgb(255, 0, 0), None, Attr::NONE);

        assert!(renderer.render(&buf).unwrap());
        let out = output(&renderer);
        assert!(out.contains("Hi"));
        assert!(out.contains("38;2;255;0;0"));
        assert!(renderer.has_previous());
    }

    #[test]
    fn test_unchanged_frame_writes_nothing() {
        let mut renderer = DiffRenderer::new(Vec::new());
        let buf = FrameBuffer::new(4, 2);
        renderer.render(&buf).unwrap();
        let before = renderer.writer().len();

        assert!(!renderer.render(&buf).unwrap());
        assert_eq!(renderer.writer().len(), before);
    }

    #[test]
    fn test_only_changed_cells_are_written() {
        let mut renderer = DiffRenderer::new(Vec::new());
        let mut buf = FrameBuffer::new(10, 3);
        renderer.render(&buf).unwrap();
        let before = renderer.writer().len();

        buf.draw_text(2, 1, "Z", Rgba::WHITE, None, Attr::BOLD);
        assert!(renderer.render(&buf).unwrap());

        let delta = String::from_utf8_lossy(&renderer.writer()[before..]).into_owned();
        // MoveTo is 1-based: row 2, column 3.
        assert!(delta.contains("\x1b[2;3H"));
        assert!(delta.contains('Z'));
        assert_eq!(delta.matches("\x1b[2;").count(), 1);
    }

    #[test]
    fn test_resize_forces_full_redraw() {
        let mut renderer = DiffRenderer::new(Vec::new());
        renderer.render(&FrameBuffer::new(4, 1)).unwrap();
        let before = renderer.writer().len();

        assert!(renderer.render(&FrameBuffer::new(5, 1)).unwrap());
        let delta = String::from_utf8_lossy(&renderer.writer()[before..]).into_owned();
        assert!(delta.contains("\x1b[2J"));
    }

    #[test]
    fn test_invalidate() {
        let mut renderer = DiffRenderer::new(Vec::new());
        renderer.render(&FrameBuffer::new(2, 2)).unwrap();
        assert!(renderer.has_previous());

        renderer.invalidate();
        assert!(!renderer.has_previous());
    }
}
