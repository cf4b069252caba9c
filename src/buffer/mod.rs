//! Buffer module: Core data structures for the double-buffer rendering system.
//!
//! This module contains:
//! - [`Cell`]: The atomic unit of display, one glyph plus colors and attributes
//! - [`Glyph`]: Inline storage for one grapheme cluster
//! - [`Buffer`]: A grid of cells representing the terminal screen
//! - [`Modifiers`]: Text style bitflags
//! - [`diff`]: Diffing engine for generating minimal ANSI sequences

mod cell;
#[allow(clippy::module_inception)]
mod buffer;
pub mod diff;

pub use buffer::Buffer;
pub use cell::{Cell, Glyph, Modifiers, GLYPH_CAPACITY};
pub use diff::{present_diff, PresentStats};
