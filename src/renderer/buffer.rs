//! Frame buffer: a flat grid of cells for one composed frame.

use crate::layout::char_width;
use crate::types::{Attr, Cell, Rgba};

/// 2D cell grid, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    /// Create a buffer of blank cells.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// Set one cell. Out-of-bounds writes are dropped.
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.cells[i] = cell;
                true
            }
            None => false,
        }
    }

    /// Blank every cell onto `bg`.
    pub fn fill(&mut self, bg: Rgba) {
        let blank = Cell { bg, ..Cell::default() };
        self.cells.fill(blank);
    }

    /// Blank one row onto `bg`.
    pub fn fill_row(&mut self, y: u16, bg: Rgba) {
        if y >= self.height {
            return;
        }
        let start = y as usize * self.width as usize;
        let blank = Cell { bg, ..Cell::default() };
        self.cells[start..start + self.width as usize].fill(blank);
    }

    /// Draw `text` starting at (`x`, `y`), clipped at the right edge.
    ///
    /// When `bg` is `None` the existing background shows through. Returns the
    /// number of columns written.
    pub fn draw_text(
        &mut self,
        x: u16,
        y: u16,
        text: &str,
        fg: Rgba,
        bg: Option<Rgba>,
        attrs: Attr,
    ) -> u16 {
        if y >= self.height {
            return 0;
        }
        let mut col = x;
        for c in text.chars() {
            let w = char_width(c);
            if w == 0 {
                continue;
            }
            if col as u32 + w as u32 > self.width as u32 {
                break;
            }
            let under = self.get(col, y).map(|cell| cell.bg).unwrap_or_default();
            let bg = bg.unwrap_or(under);
            self.set(col, y, Cell { char: c, fg, bg, attrs });
            if w == 2 {
                self.set(col + 1, y, Cell { char: '\0', fg, bg, attrs });
            }
            col += w;
        }
        col - x
    }

    /// Row contents as a string, skipping wide-char continuations.
    pub fn row_text(&self, y: u16) -> String {
        (0..self.width)
            .filter_map(|x| self.get(x, y))
            .filter(|cell| cell.char != '\0')
            .map(|cell| cell.char)
            .collect()
    }
}
