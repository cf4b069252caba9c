//! Cell: The atomic unit of terminal display.
//!
//! # Memory Layout
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │  Cell Layout (16 bytes, byte aligned)                │
//! ├───────────────┬──────────────┬──────────────┬────────┤
//! │  glyph        │  fg          │  bg          │  mods  │
//! │  [u8; 7]      │  StyleColor  │  StyleColor  │  u8    │
//! │  7 bytes      │  4 bytes     │  4 bytes     │  1 b   │
//! └───────────────┴──────────────┴──────────────┴────────┘
//! ```
//!
//! A glyph holds one grapheme cluster inline, zero-padded. UTF-8 text never
//! contains a zero byte once control characters are excluded, so the padding
//! doubles as the length. Anything that does not fit, or that contains
//! control characters, is stored as a single space.

use crate::style::StyleColor;
use bitflags::bitflags;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Inline glyph capacity in bytes.
pub const GLYPH_CAPACITY: usize = 7;

/// One grapheme cluster stored inline as UTF-8.
///
/// An empty glyph marks the right half of a wide character; it is never
/// produced from user input.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Glyph {
    bytes: [u8; GLYPH_CAPACITY],
}

impl Glyph {
    /// A single space.
    pub const SPACE: Self = Self::from_ascii(b' ');

    /// Right half of a wide character.
    pub const CONTINUATION: Self = Self { bytes: [0; GLYPH_CAPACITY] };

    /// Glyph from a single ASCII byte. A zero byte gives [`Glyph::CONTINUATION`].
    pub const fn from_ascii(byte: u8) -> Self {
        let mut bytes = [0; GLYPH_CAPACITY];
        bytes[0] = byte;
        Self { bytes }
    }

    /// Glyph from the first grapheme cluster of `s`.
    ///
    /// Empty input, control characters, and clusters longer than
    /// [`GLYPH_CAPACITY`] bytes become a space.
    pub fn new(s: &str) -> Self {
        let Some(cluster) = s.graphemes(true).next() else {
            return Self::SPACE;
        };
        if cluster.len() > GLYPH_CAPACITY || cluster.chars().any(char::is_control) {
            return Self::SPACE;
        }
        let mut bytes = [0; GLYPH_CAPACITY];
        bytes[..cluster.len()].copy_from_slice(cluster.as_bytes());
        Self { bytes }
    }

    /// Glyph from a single character.
    pub fn from_char(c: char) -> Self {
        let mut buf = [0; 4];
        Self::new(c.encode_utf8(&mut buf))
    }

    /// The glyph text.
    pub fn as_str(&self) -> &str {
        let len = self.bytes.iter().position(|&b| b == 0).unwrap_or(GLYPH_CAPACITY);
        std::str::from_utf8(&self.bytes[..len]).unwrap_or(" ")
    }

    /// Columns this glyph occupies on screen.
    pub fn width(&self) -> usize {
        self.as_str().width()
    }

    /// Whether this is the right half of a wide character.
    #[inline]
    pub const fn is_continuation(&self) -> bool {
        self.bytes[0] == 0
    }
}

impl Default for Glyph {
    fn default() -> Self {
        Self::SPACE
    }
}

impl std::fmt::Debug for Glyph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_continuation() {
            f.write_str("Glyph(<cont>)")
        } else {
            write!(f, "Glyph({:?})", self.as_str())
        }
    }
}

impl From<char> for Glyph {
    fn from(c: char) -> Self {
        Self::from_char(c)
    }
}

impl From<&str> for Glyph {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

bitflags! {
    /// Text style modifiers.
    ///
    /// These can be combined using bitwise OR.
    ///
    /// # Example
    /// ```
    /// use tessel::Modifiers;
    /// let style = Modifiers::BOLD | Modifiers::UNDERLINE;
    /// ```
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// Bold text
        const BOLD = 0b0000_0001;
        /// Dim/faint text
        const DIM = 0b0000_0010;
        /// Italic text
        const ITALIC = 0b0000_0100;
        /// Underlined text
        const UNDERLINE = 0b0000_1000;
        /// Reversed colors (fg/bg swapped)
        const REVERSED = 0b0001_0000;
    }
}

impl std::fmt::Debug for Modifiers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        bitflags::parser::to_writer(self, f)
    }
}

/// A single terminal cell.
///
/// Equality is structural over glyph, colors, and modifiers; the renderer
/// relies on it to skip unchanged cells.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Cell {
    glyph: Glyph,
    fg: StyleColor,
    bg: StyleColor,
    modifiers: Modifiers,
}

// Compile-time assertion: four cells per cache line
const _: () = assert!(
    std::mem::size_of::<Cell>() == 16,
    "Cell must be exactly 16 bytes"
);

impl Default for Cell {
    fn default() -> Self {
        Self::BLANK
    }
}

impl Cell {
    /// A space with default colors and no modifiers.
    pub const BLANK: Self = Self {
        glyph: Glyph::SPACE,
        fg: StyleColor::Default,
        bg: StyleColor::Default,
        modifiers: Modifiers::empty(),
    };

    /// Create a cell with default colors.
    pub fn new(glyph: impl Into<Glyph>) -> Self {
        Self { glyph: glyph.into(), ..Self::BLANK }
    }

    /// Create a fully specified cell.
    pub const fn styled(glyph: Glyph, fg: StyleColor, bg: StyleColor, modifiers: Modifiers) -> Self {
        Self { glyph, fg, bg, modifiers }
    }

    /// A blank cell over `bg`.
    pub const fn blank_on(bg: StyleColor) -> Self {
        Self { bg, ..Self::BLANK }
    }

    /// The right half of a wide character drawn over `bg`.
    pub const fn continuation(bg: StyleColor) -> Self {
        Self { glyph: Glyph::CONTINUATION, bg, ..Self::BLANK }
    }

    /// The glyph.
    #[inline]
    pub const fn glyph(&self) -> Glyph {
        self.glyph
    }

    /// Foreground color.
    #[inline]
    pub const fn fg(&self) -> StyleColor {
        self.fg
    }

    /// Background color.
    #[inline]
    pub const fn bg(&self) -> StyleColor {
        self.bg
    }

    /// Text modifiers.
    #[inline]
    pub const fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Whether this is the right half of a wide character.
    #[inline]
    pub const fn is_continuation(&self) -> bool {
        self.glyph.is_continuation()
    }

    /// Builder: set foreground.
    #[inline]
    #[must_use]
    pub const fn with_fg(mut self, fg: StyleColor) -> Self {
        self.fg = fg;
        self
    }

    /// Builder: set background.
    #[inline]
    #[must_use]
    pub const fn with_bg(mut self, bg: StyleColor) -> Self {
        self.bg = bg;
        self
    }

    /// Builder: set modifiers.
    #[inline]
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}
