//! Buffer: A grid of cells representing the terminal screen.
//!
//! The buffer uses contiguous memory allocation for cache efficiency.
//! Cells are stored in row-major order.

use super::cell::{Cell, Glyph, Modifiers};
use crate::style::StyleColor;

/// A grid of cells representing the terminal screen.
///
/// The buffer stores cells in a contiguous `Vec` for cache efficiency.
/// Access is in row-major order: `index = y * width + x`. A zero-sized
/// buffer is valid and holds no cells.
#[derive(Clone, PartialEq, Eq)]
pub struct Buffer {
    /// Contiguous cell storage (row-major order).
    cells: Vec<Cell>,
    /// Width in columns.
    width: u16,
    /// Height in rows.
    height: u16,
}

impl Buffer {
    /// Create a new buffer with the given dimensions.
    ///
    /// All cells are initialized to blank (space with default colors).
    pub fn new(width: u16, height: u16) -> Self {
        let size = usize::from(width) * usize::from(height);
        Self { cells: vec![Cell::BLANK; size], width, height }
    }

    /// Get the buffer width.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Get the buffer height.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Get the total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if the buffer holds no cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Get a reference to the underlying cell slice.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Convert (x, y) coordinates to a linear index.
    ///
    /// Returns `None` if coordinates are out of bounds.
    #[inline]
    pub fn index_of(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(usize::from(y) * usize::from(self.width) + usize::from(x))
        } else {
            None
        }
    }

    /// Get a reference to a cell at (x, y).
    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index_of(x, y).map(|i| &self.cells[i])
    }

    /// Replace the cell at (x, y) verbatim.
    ///
    /// Returns `false` if coordinates are out of bounds.
    #[inline]
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) -> bool {
        if let Some(idx) = self.index_of(x, y) {
            self.cells[idx] = cell;
            true
        } else {
            false
        }
    }

    /// Write a glyph at (x, y), keeping wide characters consistent.
    ///
    /// A double-width glyph also claims (x+1, y) as a continuation cell; one
    /// that would hang off the right edge is stored as a space. Overwriting
    /// either half of an existing wide glyph blanks the other half.
    ///
    /// Returns the number of columns written, or 0 if out of bounds.
    pub fn set_glyph(
        &mut self,
        x: u16,
        y: u16,
        glyph: Glyph,
        fg: StyleColor,
        bg: StyleColor,
        modifiers: Modifiers,
    ) -> usize {
        let Some(idx) = self.index_of(x, y) else {
            return 0;
        };

        let mut glyph = glyph;
        let mut width = glyph.width();
        if width > 1 && self.index_of(x + 1, y).is_none() {
            glyph = Glyph::SPACE;
            width = 1;
        }

        self.release_wide(x, y);
        self.cells[idx] = Cell::styled(glyph, fg, bg, modifiers);

        if width > 1 {
            self.release_wide(x + 1, y);
            if let Some(next) = self.index_of(x + 1, y) {
                self.cells[next] = Cell::continuation(bg);
            }
        }

        width
    }

    /// Blank whatever half of a wide glyph is paired with (x, y).
    fn release_wide(&mut self, x: u16, y: u16) {
        let Some(cell) = self.get(x, y).copied() else {
            return;
        };
        if cell.is_continuation() {
            if let Some(left) = x.checked_sub(1).and_then(|lx| self.index_of(lx, y)) {
                let bg = self.cells[left].bg();
                self.cells[left] = Cell::blank_on(bg);
            }
        } else if cell.glyph().width() > 1 {
            if let Some(right) = self.index_of(x + 1, y) {
                if self.cells[right].is_continuation() {
                    let bg = self.cells[right].bg();
                    self.cells[right] = Cell::blank_on(bg);
                }
            }
        }
    }

    /// Fill every cell with `cell`.
    pub fn fill(&mut self, cell: Cell) {
        self.cells.fill(cell);
    }

    /// Clear the entire buffer (fill with blank cells).
    pub fn clear(&mut self) {
        self.fill(Cell::BLANK);
    }

    /// Reallocate to new dimensions, discarding all content.
    ///
    /// Resizing to the current dimensions is a no-op.
    pub fn resize(&mut self, new_width: u16, new_height: u16) {
        if new_width == self.width && new_height == self.height {
            return;
        }
        *self = Self::new(new_width, new_height);
    }

    /// Get an iterator over rows.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(usize::from(self.width).max(1))
    }

    /// Text of one row, continuation cells omitted. Mostly useful in tests.
    pub fn row_text(&self, y: u16) -> String {
        self.rows()
            .nth(usize::from(y))
            .map(|row| {
                row.iter()
                    .filter(|cell| !cell.is_continuation())
                    .map(|cell| cell.glyph().as_str().to_owned())
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}
