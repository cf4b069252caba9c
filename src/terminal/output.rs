//! `OutputBuffer`: bounded staging buffer for ANSI sequences, plus the fixed
//! escape sequences the platform layer writes.

use crate::buffer::Modifiers;
use crate::style::{ColorDepth, Layer, StyleColor};
use std::io::{self, Write};

/// Default staging capacity (64 KiB).
pub const DEFAULT_CAPACITY: usize = 64 * 1024;

/// Headroom kept free before a flush is forced.
pub const FLUSH_MARGIN: usize = 256;

/// Fixed escape sequences.
pub mod seq {
    /// Erase the whole screen.
    pub const CLEAR_SCREEN: &[u8] = b"\x1b[2J";
    /// Hide the cursor.
    pub const CURSOR_HIDE: &[u8] = b"\x1b[?25l";
    /// Show the cursor.
    pub const CURSOR_SHOW: &[u8] = b"\x1b[?25h";
    /// Switch to the alternate screen.
    pub const ALT_SCREEN_ENTER: &[u8] = b"\x1b[?1049h";
    /// Return from the alternate screen.
    pub const ALT_SCREEN_EXIT: &[u8] = b"\x1b[?1049l";
    /// Audible bell.
    pub const BELL: &[u8] = b"\x07";
    /// Erase the current line.
    pub const CLEAR_LINE: &[u8] = b"\x1b[2K";
    /// Erase from the cursor to the end of the line.
    pub const CLEAR_TO_EOL: &[u8] = b"\x1b[K";
    /// Erase from the start of the line to the cursor.
    pub const CLEAR_TO_SOL: &[u8] = b"\x1b[1K";
    /// Save the cursor position.
    pub const CURSOR_SAVE: &[u8] = b"\x1b[s";
    /// Restore the saved cursor position.
    pub const CURSOR_RESTORE: &[u8] = b"\x1b[u";
    /// Enable button tracking with SGR coordinates.
    pub const MOUSE_ENABLE: &[u8] = b"\x1b[?1000h\x1b[?1006h";
    /// Disable mouse tracking.
    pub const MOUSE_DISABLE: &[u8] = b"\x1b[?1006l\x1b[?1000l";
    /// Enable focus-change reports.
    pub const FOCUS_REPORT_ENABLE: &[u8] = b"\x1b[?1004h";
    /// Disable focus-change reports.
    pub const FOCUS_REPORT_DISABLE: &[u8] = b"\x1b[?1004l";
}

/// Pre-allocated staging buffer for ANSI output.
///
/// Output accumulates here and is handed to the sink in large writes. Callers
/// check [`OutputBuffer::needs_flush`] between cells so the buffer never
/// grows past its capacity.
pub struct OutputBuffer {
    data: Vec<u8>,
    capacity: usize,
}

impl OutputBuffer {
    /// Create a new output buffer with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self { data: Vec::with_capacity(capacity), capacity: capacity.max(FLUSH_MARGIN * 2) }
    }

    /// Create a buffer with the default 64 KiB capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Clear the buffer for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Get the buffer contents.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Get the buffer length.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Whether the buffer is within [`FLUSH_MARGIN`] bytes of capacity.
    #[inline]
    pub fn needs_flush(&self) -> bool {
        self.data.len() + FLUSH_MARGIN >= self.capacity
    }

    /// Write raw bytes.
    #[inline]
    pub fn write_raw(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Write a string.
    #[inline]
    pub fn write_str(&mut self, s: &str) {
        self.data.extend_from_slice(s.as_bytes());
    }

    /// Move cursor to (x, y) position (0-indexed in, 1-indexed on the wire).
    #[inline]
    pub fn cursor_move(&mut self, x: u16, y: u16) {
        // CSI row ; col H
        let _ = write!(self.data, "\x1b[{};{}H", u32::from(y) + 1, u32::from(x) + 1);
    }

    /// Set foreground color.
    #[inline]
    pub fn set_fg(&mut self, color: StyleColor, depth: ColorDepth) {
        color.write_sgr(&mut self.data, Layer::Foreground, depth);
    }

    /// Set background color.
    #[inline]
    pub fn set_bg(&mut self, color: StyleColor, depth: ColorDepth) {
        color.write_sgr(&mut self.data, Layer::Background, depth);
    }

    /// Transition text attributes from `old` to `new` without touching colors.
    pub fn set_modifiers(&mut self, old: Modifiers, new: Modifiers) {
        let removed = old.difference(new);
        let mut added = new.difference(old);

        // 22 clears both bold and dim, so a survivor must be re-enabled
        if removed.intersects(Modifiers::BOLD | Modifiers::DIM) {
            self.data.extend_from_slice(b"\x1b[22m");
            added |= new & (Modifiers::BOLD | Modifiers::DIM);
        }
        if removed.contains(Modifiers::ITALIC) {
            self.data.extend_from_slice(b"\x1b[23m");
        }
        if removed.contains(Modifiers::UNDERLINE) {
            self.data.extend_from_slice(b"\x1b[24m");
        }
        if removed.contains(Modifiers::REVERSED) {
            self.data.extend_from_slice(b"\x1b[27m");
        }

        for (flag, code) in [
            (Modifiers::BOLD, &b"\x1b[1m"[..]),
            (Modifiers::DIM, b"\x1b[2m"),
            (Modifiers::ITALIC, b"\x1b[3m"),
            (Modifiers::UNDERLINE, b"\x1b[4m"),
            (Modifiers::REVERSED, b"\x1b[7m"),
        ] {
            if added.contains(flag) {
                self.data.extend_from_slice(code);
            }
        }
    }

    /// Write the contents to `writer` and empty the buffer.
    ///
    /// Returns the number of bytes written.
    pub fn drain_to<W: Write>(&mut self, writer: &mut W) -> io::Result<usize> {
        if self.data.is_empty() {
            return Ok(0);
        }
        let written = self.data.len();
        let result = writer.write_all(&self.data).and_then(|()| writer.flush());
        self.data.clear();
        result.map(|()| written)
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_move_is_one_indexed() {
        let mut out = OutputBuffer::new();
        out.cursor_move(3, 0);
        assert_eq!(out.as_bytes(), b"\x1b[1;4H");
    }

    #[test]
    fn test_needs_flush_near_capacity() {
        let mut out = OutputBuffer::with_capacity(1024);
        out.write_raw(&[b'x'; 700]);
        assert!(!out.needs_flush());
        out.write_raw(&[b'x'; 100]);
        assert!(out.needs_flush());
    }

    #[test]
    fn test_drain_to_empties() {
        let mut out = OutputBuffer::new();
        out.write_str("abc");
        let mut sink = Vec::new();
        assert_eq!(out.drain_to(&mut sink).unwrap(), 3);
        assert!(out.is_empty());
        assert_eq!(sink, b"abc");
        assert_eq!(out.drain_to(&mut sink).unwrap(), 0);
    }

    #[test]
    fn test_modifier_transitions() {
        let mut out = OutputBuffer::new();
        out.set_modifiers(Modifiers::empty(), Modifiers::BOLD | Modifiers::UNDERLINE);
        assert_eq!(out.as_bytes(), b"\x1b[1m\x1b[4m");

        out.clear();
        out.set_modifiers(Modifiers::BOLD | Modifiers::DIM, Modifiers::DIM);
        assert_eq!(out.as_bytes(), b"\x1b[22m\x1b[2m");

        out.clear();
        out.set_modifiers(Modifiers::UNDERLINE, Modifiers::empty());
        assert_eq!(out.as_bytes(), b"\x1b[24m");
    }
}
