//! Diffing Engine: Generate minimal ANSI sequences from buffer changes.
//!
//! This module implements the present step of the renderer:
//! 1. Walk the back buffer in row-major order against the front buffer
//! 2. Skip unchanged cells entirely
//! 3. Move the cursor only when the next changed cell is not where the
//!    previous glyph left it
//! 4. Track emitted colors and attributes to avoid redundant SGR sequences
//! 5. Copy each emitted cell into the front buffer
//!
//! Output is staged in an [`OutputBuffer`] that is drained to the sink when it
//! nears capacity and once at the end.

use super::{Buffer, Modifiers};
use crate::style::{ColorDepth, StyleColor};
use crate::terminal::OutputBuffer;
use std::io::{self, Write};

/// State tracker for the diffing algorithm.
///
/// This tracks what the terminal has been told during the current frame so
/// redundant escape sequences can be skipped. Everything starts unknown.
#[derive(Debug, Clone, Default)]
pub struct DiffState {
    /// Where the terminal cursor is, if known.
    cursor: Option<(u16, u16)>,
    /// Last emitted foreground color.
    fg: Option<StyleColor>,
    /// Last emitted background color.
    bg: Option<StyleColor>,
    /// Attributes currently active on the terminal.
    modifiers: Modifiers,
}

impl DiffState {
    /// Create a new diff state with unknown terminal state.
    pub const fn new() -> Self {
        Self { cursor: None, fg: None, bg: None, modifiers: Modifiers::empty() }
    }
}

/// Statistics from one present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PresentStats {
    /// Number of cells that were different.
    pub cells_changed: usize,
    /// Number of cursor move sequences emitted.
    pub cursor_moves: usize,
    /// Number of color change sequences emitted.
    pub color_changes: usize,
    /// Number of attribute transitions emitted.
    pub modifier_changes: usize,
    /// Total bytes handed to the sink.
    pub bytes_written: usize,
}

/// Emit the difference between `front` and `back` and bring `front` up to date.
///
/// With `force` set, every cell is treated as changed (full repaint).
/// Continuation cells of wide glyphs are copied but never emitted.
///
/// # Errors
///
/// Returns the first error from `sink`. Cells processed before the failure
/// are already recorded in `front`.
pub fn present_diff<W: Write>(
    front: &mut Buffer,
    back: &Buffer,
    output: &mut OutputBuffer,
    sink: &mut W,
    depth: ColorDepth,
    force: bool,
) -> io::Result<PresentStats> {
    debug_assert_eq!(front.width(), back.width());
    debug_assert_eq!(front.height(), back.height());

    let mut stats = PresentStats::default();
    let mut state = DiffState::new();
    let width = back.width();
    output.clear();

    for (y, row) in (0..back.height()).zip(back.rows()) {
        for (x, next) in (0..width).zip(row.iter()) {
            let Some(idx) = front.index_of(x, y) else {
                continue;
            };
            if !force && front.cells()[idx] == *next {
                continue;
            }
            front.set(x, y, *next);

            if next.is_continuation() {
                continue;
            }
            stats.cells_changed += 1;

            if state.cursor != Some((x, y)) {
                output.cursor_move(x, y);
                stats.cursor_moves += 1;
            }

            if state.fg != Some(next.fg()) {
                output.set_fg(next.fg(), depth);
                state.fg = Some(next.fg());
                stats.color_changes += 1;
            }
            if state.bg != Some(next.bg()) {
                output.set_bg(next.bg(), depth);
                state.bg = Some(next.bg());
                stats.color_changes += 1;
            }
            if state.modifiers != next.modifiers() {
                output.set_modifiers(state.modifiers, next.modifiers());
                state.modifiers = next.modifiers();
                stats.modifier_changes += 1;
            }

            let glyph = next.glyph();
            output.write_str(glyph.as_str());

            // Zero-width clusters leave the cursor somewhere terminal-specific
            state.cursor = match u16::try_from(glyph.width()) {
                Ok(advance) if advance > 0 => Some((x.saturating_add(advance), y)),
                _ => None,
            };

            if output.needs_flush() {
                stats.bytes_written += output.drain_to(sink)?;
            }
        }
    }

    if !state.modifiers.is_empty() {
        output.set_modifiers(state.modifiers, Modifiers::empty());
    }
    stats.bytes_written += output.drain_to(sink)?;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{Cell, Glyph};

    fn present(front: &mut Buffer, back: &Buffer, sink: &mut Vec<u8>) -> PresentStats {
        let mut output = OutputBuffer::new();
        present_diff(front, back, &mut output, sink, ColorDepth::TrueColor, false).unwrap()
    }

    #[test]
    fn test_diff_identical_buffers() {
        let mut front = Buffer::new(10, 5);
        let back = Buffer::new(10, 5);
        let mut sink = Vec::new();

        let stats = present(&mut front, &back, &mut sink);

        assert_eq!(stats.cells_changed, 0);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_diff_single_cell_exact_bytes() {
        let mut front = Buffer::new(10, 1);
        let mut back = Buffer::new(10, 1);
        back.set(3, 0, Cell::new('X').with_fg(StyleColor::RED).with_bg(StyleColor::BLACK));

        let mut sink = Vec::new();
        let stats = present(&mut front, &back, &mut sink);

        assert_eq!(sink, b"\x1b[1;4H\x1b[38;5;1m\x1b[48;5;0mX");
        assert_eq!(stats.cells_changed, 1);
        assert_eq!(stats.cursor_moves, 1);
        assert_eq!(stats.color_changes, 2);
        assert_eq!(front, back);

        sink.clear();
        let stats = present(&mut front, &back, &mut sink);
        assert!(sink.is_empty());
        assert_eq!(stats, PresentStats::default());
    }

    #[test]
    fn test_diff_adjacent_cells_single_cursor_move() {
        let mut front = Buffer::new(10, 5);
        let mut back = Buffer::new(10, 5);
        back.set(4, 2, Cell::new('A'));
        back.set(5, 2, Cell::new('B'));
        back.set(6, 2, Cell::new('C'));

        let mut sink = Vec::new();
        let stats = present(&mut front, &back, &mut sink);

        assert_eq!(stats.cells_changed, 3);
        assert_eq!(stats.cursor_moves, 1);
        // Same colors throughout: fg and bg emitted once
        assert_eq!(stats.color_changes, 2);
        assert!(String::from_utf8_lossy(&sink).ends_with("ABC"));
    }

    #[test]
    fn test_diff_gap_forces_cursor_move() {
        let mut front = Buffer::new(10, 2);
        let mut back = Buffer::new(10, 2);
        back.set(0, 0, Cell::new('A'));
        back.set(2, 0, Cell::new('B'));
        back.set(0, 1, Cell::new('C'));

        let mut sink = Vec::new();
        let stats = present(&mut front, &back, &mut sink);
        assert_eq!(stats.cursor_moves, 3);
    }

    #[test]
    fn test_diff_wide_glyph_skips_continuation() {
        let mut front = Buffer::new(6, 1);
        let mut back = Buffer::new(6, 1);
        back.set_glyph(0, 0, Glyph::new("日"), StyleColor::Default, StyleColor::Default, Modifiers::empty());
        back.set(2, 0, Cell::new('x'));

        let mut sink = Vec::new();
        let stats = present(&mut front, &back, &mut sink);

        // The wide glyph advances the cursor two columns, so 'x' needs no move
        assert_eq!(stats.cells_changed, 2);
        assert_eq!(stats.cursor_moves, 1);
        assert_eq!(front, back);
    }

    #[test]
    fn test_diff_modifiers_reset_at_end() {
        let mut front = Buffer::new(4, 1);
        let mut back = Buffer::new(4, 1);
        back.set(0, 0, Cell::new('B').with_modifiers(Modifiers::BOLD));

        let mut sink = Vec::new();
        present(&mut front, &back, &mut sink);
        let text = String::from_utf8_lossy(&sink);
        assert!(text.contains("\x1b[1mB"));
        assert!(text.ends_with("\x1b[22m"));
    }

    #[test]
    fn test_diff_force_repaints_everything() {
        let mut front = Buffer::new(3, 2);
        let back = Buffer::new(3, 2);
        let mut output = OutputBuffer::new();
        let mut sink = Vec::new();
        let stats =
            present_diff(&mut front, &back, &mut output, &mut sink, ColorDepth::TrueColor, true)
                .unwrap();
        assert_eq!(stats.cells_changed, 6);
        assert_eq!(stats.cursor_moves, 2);
    }

    #[test]
    fn test_diff_flushes_when_staging_fills() {
        let mut front = Buffer::new(200, 50);
        let mut back = Buffer::new(200, 50);
        for y in 0..50 {
            for x in 0..200 {
                let shade = u8::try_from((x + y) % 256).unwrap();
                back.set(x, y, Cell::new('#').with_fg(StyleColor::rgb(shade, 0, 0)));
            }
        }

        let mut output = OutputBuffer::with_capacity(4096);
        let mut sink = Vec::new();
        let stats =
            present_diff(&mut front, &back, &mut output, &mut sink, ColorDepth::TrueColor, false)
                .unwrap();

        assert_eq!(stats.cells_changed, 10_000);
        assert_eq!(stats.bytes_written, sink.len());
        assert!(output.as_bytes().len() < 4096);
    }

    #[test]
    fn test_diff_output_renders_in_emulator() {
        let mut front = Buffer::new(12, 3);
        let mut back = Buffer::new(12, 3);
        for (i, c) in "hello".chars().enumerate() {
            back.set(u16::try_from(i).unwrap() + 2, 1, Cell::new(c).with_fg(StyleColor::rgb(1, 2, 3)));
        }

        let mut sink = Vec::new();
        present(&mut front, &back, &mut sink);

        let mut parser = vt100::Parser::new(3, 12, 0);
        parser.process(&sink);
        let screen = parser.screen();
        let text: String = (2..7)
            .map(|col| screen.cell(1, col).map(|cell| cell.contents()).unwrap_or_default())
            .collect();
        assert_eq!(text, "hello");
        let cell = screen.cell(1, 2).unwrap();
        assert_eq!(cell.fgcolor(), vt100::Color::Rgb(1, 2, 3));
    }
}
