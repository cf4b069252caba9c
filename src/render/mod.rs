//! Renderer: double-buffered cell grid with diff-based output.
//!
//! Draw calls write into the back buffer. [`Renderer::present`] compares it
//! against the front buffer (what the terminal currently shows), writes only
//! the changed cells to a sink, and brings the front buffer up to date.
//!
//! ```text
//! draw_* ──► back ──┐
//!                   ├─► present_diff ──► OutputBuffer ──► sink
//!          front ◄──┘
//! ```

mod draw;

use crate::buffer::{present_diff, Buffer, Cell, Glyph, Modifiers, PresentStats};
use crate::style::{ColorDepth, StyleColor};
use crate::terminal::{Capabilities, OutputBuffer};
use std::io::{self, Write};
use std::time::Instant;

/// Running totals across frames.
#[derive(Debug, Clone, Default)]
pub struct RenderStats {
    /// Total frames presented.
    pub frames: u64,
    /// Total cells emitted across all frames.
    pub cells_changed: u64,
    /// Total bytes written to the sink.
    pub bytes_written: u64,
    /// Last present time in microseconds.
    pub last_present_us: u64,
}

/// Double-buffered cell renderer.
pub struct Renderer {
    /// What the terminal currently shows.
    front: Buffer,
    /// The frame being drawn.
    back: Buffer,
    /// Staging buffer reused across frames.
    output: OutputBuffer,
    /// Whether box-drawing and other non-ASCII glyphs may be used.
    unicode: bool,
    /// How RGB colors are encoded.
    color_depth: ColorDepth,
    /// Repaint every cell on the next present.
    needs_full_redraw: bool,
    stats: RenderStats,
}

impl Renderer {
    /// Create a renderer with blank buffers, Unicode glyphs, and true color.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            front: Buffer::new(width, height),
            back: Buffer::new(width, height),
            output: OutputBuffer::new(),
            unicode: true,
            color_depth: ColorDepth::TrueColor,
            needs_full_redraw: false,
            stats: RenderStats::default(),
        }
    }

    /// Create a renderer configured from detected terminal capabilities.
    pub fn with_capabilities(width: u16, height: u16, caps: &Capabilities) -> Self {
        let mut renderer = Self::new(width, height);
        renderer.unicode = caps.unicode;
        renderer.color_depth = caps.color_depth;
        renderer
    }

    /// Width in columns.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.back.width()
    }

    /// Height in rows.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.back.height()
    }

    /// `(width, height)`.
    #[inline]
    pub const fn size(&self) -> (u16, u16) {
        (self.back.width(), self.back.height())
    }

    /// Whether non-ASCII glyph sets are used.
    #[inline]
    pub const fn unicode(&self) -> bool {
        self.unicode
    }

    /// Switch between Unicode and ASCII glyph sets.
    pub const fn set_unicode(&mut self, unicode: bool) {
        self.unicode = unicode;
    }

    /// How RGB colors are encoded.
    #[inline]
    pub const fn color_depth(&self) -> ColorDepth {
        self.color_depth
    }

    /// Change how RGB colors are encoded.
    pub const fn set_color_depth(&mut self, depth: ColorDepth) {
        self.color_depth = depth;
    }

    /// The frame being drawn.
    #[inline]
    pub const fn back(&self) -> &Buffer {
        &self.back
    }

    /// The last frame written out.
    #[inline]
    pub const fn front(&self) -> &Buffer {
        &self.front
    }

    /// Cumulative statistics.
    pub const fn stats(&self) -> &RenderStats {
        &self.stats
    }

    /// Reallocate both buffers, discarding their contents.
    ///
    /// Resizing to the current size is a no-op.
    pub fn resize(&mut self, width: u16, height: u16) {
        if (width, height) == self.size() {
            return;
        }
        tracing::debug!(width, height, "renderer resized");
        self.front.resize(width, height);
        self.back.resize(width, height);
    }

    /// Fill the back buffer with blanks over `bg`. The front buffer is untouched.
    pub fn clear(&mut self, bg: StyleColor) {
        self.back.fill(Cell::blank_on(bg));
    }

    /// Force the next [`Renderer::present`] to repaint every cell.
    ///
    /// Use after anything else has written to the terminal.
    pub const fn invalidate(&mut self) {
        self.needs_full_redraw = true;
    }

    /// Write one glyph into the back buffer. Out-of-range coordinates are ignored.
    pub fn set_cell(&mut self, x: i32, y: i32, glyph: &str, fg: StyleColor, bg: StyleColor) {
        self.put(x, y, Glyph::new(glyph), fg, bg, Modifiers::empty());
    }

    /// Write one glyph with text attributes.
    pub fn set_styled_cell(
        &mut self,
        x: i32,
        y: i32,
        glyph: &str,
        fg: StyleColor,
        bg: StyleColor,
        modifiers: Modifiers,
    ) {
        self.put(x, y, Glyph::new(glyph), fg, bg, modifiers);
    }

    /// The back-buffer cell at (x, y).
    pub fn cell(&self, x: i32, y: i32) -> Option<&Cell> {
        let (x, y) = (u16::try_from(x).ok()?, u16::try_from(y).ok()?);
        self.back.get(x, y)
    }

    /// Bounds-checked write shared by every primitive. Returns columns used.
    pub(crate) fn put(
        &mut self,
        x: i32,
        y: i32,
        glyph: Glyph,
        fg: StyleColor,
        bg: StyleColor,
        modifiers: Modifiers,
    ) -> usize {
        match (u16::try_from(x), u16::try_from(y)) {
            (Ok(x), Ok(y)) => self.back.set_glyph(x, y, glyph, fg, bg, modifiers),
            _ => 0,
        }
    }

    /// Write the changes since the last present to `sink`.
    ///
    /// A second call with no intervening draws writes nothing.
    ///
    /// # Errors
    ///
    /// Returns the sink's error. The next present then repaints every cell,
    /// since the terminal's contents are unknown.
    pub fn present<W: Write>(&mut self, sink: &mut W) -> io::Result<PresentStats> {
        let start = Instant::now();
        let force = std::mem::take(&mut self.needs_full_redraw);
        let result = present_diff(
            &mut self.front,
            &self.back,
            &mut self.output,
            sink,
            self.color_depth,
            force,
        );

        match result {
            Ok(frame) => {
                self.stats.frames += 1;
                self.stats.cells_changed += frame.cells_changed as u64;
                self.stats.bytes_written += frame.bytes_written as u64;
                self.stats.last_present_us =
                    u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX);
                tracing::trace!(
                    cells = frame.cells_changed,
                    bytes = frame.bytes_written,
                    moves = frame.cursor_moves,
                    "frame presented"
                );
                Ok(frame)
            }
            Err(err) => {
                self.needs_full_redraw = true;
                Err(err)
            }
        }
    }
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("unicode", &self.unicode)
            .field("color_depth", &self.color_depth)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingSink;

    impl Write for FailingSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_set_cell_then_present_updates_front() {
        let mut renderer = Renderer::new(10, 1);
        renderer.set_cell(3, 0, "X", StyleColor::RED, StyleColor::BLACK);

        let mut sink = Vec::new();
        renderer.present(&mut sink).unwrap();
        assert_eq!(sink, b"\x1b[1;4H\x1b[38;5;1m\x1b[48;5;0mX");
        assert_eq!(renderer.front().get(3, 0), renderer.back().get(3, 0));

        sink.clear();
        renderer.present(&mut sink).unwrap();
        assert!(sink.is_empty());
    }

    #[test]
    fn test_set_cell_out_of_range_ignored() {
        let mut renderer = Renderer::new(4, 4);
        renderer.set_cell(-1, 0, "X", StyleColor::RED, StyleColor::BLACK);
        renderer.set_cell(0, 4, "X", StyleColor::RED, StyleColor::BLACK);
        renderer.set_cell(100, 100, "X", StyleColor::RED, StyleColor::BLACK);
        assert!(renderer.back().cells().iter().all(|c| *c == Cell::BLANK));
    }

    #[test]
    fn test_empty_glyph_draws_space() {
        let mut renderer = Renderer::new(2, 1);
        renderer.set_cell(0, 0, "", StyleColor::RED, StyleColor::BLACK);
        assert_eq!(renderer.cell(0, 0).unwrap().glyph(), Glyph::SPACE);
    }

    #[test]
    fn test_clear_leaves_front_alone() {
        let mut renderer = Renderer::new(3, 1);
        renderer.set_cell(0, 0, "A", StyleColor::WHITE, StyleColor::BLACK);
        renderer.present(&mut Vec::new()).unwrap();

        renderer.clear(StyleColor::BLUE);
        assert_eq!(renderer.cell(0, 0).unwrap().bg(), StyleColor::BLUE);
        assert_eq!(renderer.cell(0, 0).unwrap().fg(), StyleColor::Default);
        assert_eq!(renderer.front().get(0, 0).unwrap().glyph().as_str(), "A");
    }

    #[test]
    fn test_resize_same_size_is_noop() {
        let mut renderer = Renderer::new(5, 5);
        renderer.set_cell(1, 1, "Q", StyleColor::WHITE, StyleColor::BLACK);
        renderer.resize(5, 5);
        assert_eq!(renderer.cell(1, 1).unwrap().glyph().as_str(), "Q");
    }

    #[test]
    fn test_resize_through_zero_is_blank() {
        let mut renderer = Renderer::new(5, 5);
        renderer.set_cell(1, 1, "Q", StyleColor::WHITE, StyleColor::BLACK);
        renderer.present(&mut Vec::new()).unwrap();

        renderer.resize(0, 0);
        assert_eq!(renderer.size(), (0, 0));
        renderer.present(&mut Vec::new()).unwrap();

        renderer.resize(7, 3);
        assert_eq!(renderer.size(), (7, 3));
        assert!(renderer.back().cells().iter().all(|c| *c == Cell::BLANK));
        assert!(renderer.front().cells().iter().all(|c| *c == Cell::BLANK));
    }

    #[test]
    fn test_failed_present_forces_repaint() {
        let mut renderer = Renderer::new(3, 1);
        renderer.set_cell(0, 0, "A", StyleColor::WHITE, StyleColor::BLACK);
        assert!(renderer.present(&mut FailingSink).is_err());

        let mut sink = Vec::new();
        let stats = renderer.present(&mut sink).unwrap();
        assert_eq!(stats.cells_changed, 3);
    }

    #[test]
    fn test_invalidate_repaints_once() {
        let mut renderer = Renderer::new(2, 2);
        renderer.invalidate();
        let mut sink = Vec::new();
        assert_eq!(renderer.present(&mut sink).unwrap().cells_changed, 4);
        assert_eq!(renderer.present(&mut sink).unwrap().cells_changed, 0);
        assert_eq!(renderer.stats().frames, 2);
    }

    #[test]
    fn test_color_depth_downgrades_rgb() {
        let mut renderer = Renderer::new(1, 1);
        renderer.set_color_depth(ColorDepth::Ansi256);
        renderer.set_cell(0, 0, "x", StyleColor::rgb(255, 0, 0), StyleColor::Default);
        let mut sink = Vec::new();
        renderer.present(&mut sink).unwrap();
        assert_eq!(sink, b"\x1b[1;1H\x1b[38;5;196m\x1b[49mx");
    }
}
