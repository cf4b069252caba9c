//! Colors, SGR encoding, and widget themes.

mod color;
mod theme;

pub use color::{ansi256_index, interpolate, ColorDepth, Layer, NamedColor, Rgb, StyleColor};
pub use theme::{BorderChars, BorderStyle, Spacing, Theme};
