//! Color model: named ANSI palette entries, true-color RGB, and SGR encoding.
//!
//! Every color a cell can carry is a [`StyleColor`]. It is either the
//! terminal's own default, one of the sixteen ANSI palette entries, or an
//! explicit 24-bit triple. The encoder writes the matching SGR sequence and
//! downgrades RGB to a palette index when the terminal cannot show it.

use std::io::Write;

/// True-color RGB representation.
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rgb {
    /// Red channel (0-255)
    pub r: u8,
    /// Green channel (0-255)
    pub g: u8,
    /// Blue channel (0-255)
    pub b: u8,
}

impl Rgb {
    /// Create a new RGB color.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Black (0, 0, 0)
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// White (255, 255, 255)
    pub const WHITE: Self = Self::new(255, 255, 255);
    /// Mid-gray used when blending from a non-RGB color.
    pub const NEUTRAL: Self = Self::new(128, 128, 128);

    /// Create from a 24-bit hex color (e.g., 0xFF5500).
    #[inline]
    pub const fn from_u32(hex: u32) -> Self {
        Self::new(
            ((hex >> 16) & 0xFF) as u8,
            ((hex >> 8) & 0xFF) as u8,
            (hex & 0xFF) as u8,
        )
    }

    /// Squared euclidean distance, used for nearest-palette lookups.
    const fn distance_sq(self, other: Self) -> u32 {
        let dr = self.r.abs_diff(other.r) as u32;
        let dg = self.g.abs_diff(other.g) as u32;
        let db = self.b.abs_diff(other.b) as u32;
        dr * dr + dg * dg + db * db
    }
}

impl std::fmt::Debug for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<(u8, u8, u8)> for Rgb {
    #[inline]
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

/// The sixteen ANSI palette colors, in palette index order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum NamedColor {
    /// Palette index 0.
    Black = 0,
    /// Palette index 1.
    Red,
    /// Palette index 2.
    Green,
    /// Palette index 3.
    Yellow,
    /// Palette index 4.
    Blue,
    /// Palette index 5.
    Magenta,
    /// Palette index 6.
    Cyan,
    /// Palette index 7.
    White,
    /// Palette index 8.
    BrightBlack,
    /// Palette index 9.
    BrightRed,
    /// Palette index 10.
    BrightGreen,
    /// Palette index 11.
    BrightYellow,
    /// Palette index 12.
    BrightBlue,
    /// Palette index 13.
    BrightMagenta,
    /// Palette index 14.
    BrightCyan,
    /// Palette index 15.
    BrightWhite,
}

impl NamedColor {
    /// All named colors in palette order.
    pub const ALL: [Self; 16] = [
        Self::Black,
        Self::Red,
        Self::Green,
        Self::Yellow,
        Self::Blue,
        Self::Magenta,
        Self::Cyan,
        Self::White,
        Self::BrightBlack,
        Self::BrightRed,
        Self::BrightGreen,
        Self::BrightYellow,
        Self::BrightBlue,
        Self::BrightMagenta,
        Self::BrightCyan,
        Self::BrightWhite,
    ];

    /// The SGR palette index (0-15).
    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Approximate RGB value of this entry in the stock xterm palette.
    pub const fn to_rgb(self) -> Rgb {
        match self {
            Self::Black => Rgb::new(0, 0, 0),
            Self::Red => Rgb::new(205, 0, 0),
            Self::Green => Rgb::new(0, 205, 0),
            Self::Yellow => Rgb::new(205, 205, 0),
            Self::Blue => Rgb::new(0, 0, 238),
            Self::Magenta => Rgb::new(205, 0, 205),
            Self::Cyan => Rgb::new(0, 205, 205),
            Self::White => Rgb::new(229, 229, 229),
            Self::BrightBlack => Rgb::new(127, 127, 127),
            Self::BrightRed => Rgb::new(255, 0, 0),
            Self::BrightGreen => Rgb::new(0, 255, 0),
            Self::BrightYellow => Rgb::new(255, 255, 0),
            Self::BrightBlue => Rgb::new(92, 92, 255),
            Self::BrightMagenta => Rgb::new(255, 0, 255),
            Self::BrightCyan => Rgb::new(0, 255, 255),
            Self::BrightWhite => Rgb::new(255, 255, 255),
        }
    }

    /// The palette entry closest to an RGB value.
    pub fn nearest(rgb: Rgb) -> Self {
        Self::ALL
            .iter()
            .copied()
            .min_by_key(|named| named.to_rgb().distance_sq(rgb))
            .unwrap_or(Self::White)
    }
}

/// A cell color: the terminal default, a palette entry, or an RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StyleColor {
    /// Whatever the terminal uses when no color is set.
    #[default]
    Default,
    /// One of the sixteen ANSI palette colors.
    Named(NamedColor),
    /// Explicit 24-bit color.
    Rgb(Rgb),
}

impl StyleColor {
    /// Black palette entry.
    pub const BLACK: Self = Self::Named(NamedColor::Black);
    /// Red palette entry.
    pub const RED: Self = Self::Named(NamedColor::Red);
    /// Green palette entry.
    pub const GREEN: Self = Self::Named(NamedColor::Green);
    /// Yellow palette entry.
    pub const YELLOW: Self = Self::Named(NamedColor::Yellow);
    /// Blue palette entry.
    pub const BLUE: Self = Self::Named(NamedColor::Blue);
    /// Magenta palette entry.
    pub const MAGENTA: Self = Self::Named(NamedColor::Magenta);
    /// Cyan palette entry.
    pub const CYAN: Self = Self::Named(NamedColor::Cyan);
    /// White palette entry.
    pub const WHITE: Self = Self::Named(NamedColor::White);
    /// Bright black (gray) palette entry.
    pub const BRIGHT_BLACK: Self = Self::Named(NamedColor::BrightBlack);

    /// Construct from a palette entry.
    #[inline]
    pub const fn named(color: NamedColor) -> Self {
        Self::Named(color)
    }

    /// Construct from an RGB triple.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::Rgb(Rgb::new(r, g, b))
    }

    /// Whether this is the terminal default color.
    #[inline]
    pub const fn is_default(self) -> bool {
        matches!(self, Self::Default)
    }

    /// Replace the terminal default with `fallback`, keep anything else.
    #[inline]
    #[must_use]
    pub const fn or(self, fallback: Self) -> Self {
        match self {
            Self::Default => fallback,
            other => other,
        }
    }

    /// Write the SGR sequence selecting this color for `layer`.
    ///
    /// `depth` controls how RGB values are encoded. Palette and default
    /// colors are encoded the same way at every depth.
    pub fn write_sgr<W: Write>(self, out: &mut W, layer: Layer, depth: ColorDepth) {
        let base = match layer {
            Layer::Foreground => 38,
            Layer::Background => 48,
        };
        let _ = match self {
            Self::Default => write!(out, "\x1b[{}m", base + 1),
            Self::Named(named) => write!(out, "\x1b[{base};5;{}m", named.index()),
            Self::Rgb(rgb) => match depth {
                ColorDepth::TrueColor => {
                    write!(out, "\x1b[{base};2;{};{};{}m", rgb.r, rgb.g, rgb.b)
                }
                ColorDepth::Ansi256 => write!(out, "\x1b[{base};5;{}m", ansi256_index(rgb)),
                ColorDepth::Ansi16 => {
                    write!(out, "\x1b[{base};5;{}m", NamedColor::nearest(rgb).index())
                }
            },
        };
    }
}

impl From<NamedColor> for StyleColor {
    fn from(color: NamedColor) -> Self {
        Self::Named(color)
    }
}

impl From<Rgb> for StyleColor {
    fn from(rgb: Rgb) -> Self {
        Self::Rgb(rgb)
    }
}

/// Which half of a cell an SGR sequence colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    /// Glyph color.
    Foreground,
    /// Cell fill color.
    Background,
}

/// How many colors the output terminal can display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorDepth {
    /// 24-bit color.
    #[default]
    TrueColor,
    /// xterm 256-color palette.
    Ansi256,
    /// The sixteen ANSI colors only.
    Ansi16,
}

/// Map an RGB value onto the xterm 256-color cube or grayscale ramp.
#[allow(clippy::cast_possible_truncation)]
pub fn ansi256_index(rgb: Rgb) -> u8 {
    if rgb.r == rgb.g && rgb.g == rgb.b {
        return match rgb.r {
            0..=7 => 16,
            249..=255 => 231,
            v => 232 + ((u16::from(v) - 8) * 24 / 241) as u8,
        };
    }
    let level = |c: u8| ((u16::from(c) * 5 + 127) / 255) as u8;
    16 + 36 * level(rgb.r) + 6 * level(rgb.g) + level(rgb.b)
}

/// Linearly blend two colors at `t`, clamped to `[0, 1]`.
///
/// A non-RGB `start` blends from mid-gray and a non-RGB `end` blends toward
/// white. The result is always [`StyleColor::Rgb`].
pub fn interpolate(start: StyleColor, end: StyleColor, t: f32) -> StyleColor {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let from = match start {
        StyleColor::Rgb(rgb) => rgb,
        _ => Rgb::NEUTRAL,
    };
    let to = match end {
        StyleColor::Rgb(rgb) => rgb,
        _ => Rgb::WHITE,
    };
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let channel = |s: u8, e: u8| (f32::from(s) + (f32::from(e) - f32::from(s)) * t) as u8;
    StyleColor::Rgb(Rgb::new(
        channel(from.r, to.r),
        channel(from.g, to.g),
        channel(from.b, to.b),
    ))
}
