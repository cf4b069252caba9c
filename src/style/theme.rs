//! Widget themes and border glyph sets.

use super::StyleColor;

/// Border style tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BorderStyle {
    /// No border is drawn.
    None,
    /// ┌─┐ light box drawing.
    #[default]
    Single,
    /// ╔═╗ double lines.
    Double,
    /// ╭─╮ rounded corners.
    Rounded,
    /// ┏━┓ heavy lines.
    Thick,
    /// Glyphs come from an explicit [`BorderChars`].
    Custom,
}

/// The six glyphs that make up a rectangular border.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BorderChars {
    /// Top-left corner.
    pub top_left: char,
    /// Top-right corner.
    pub top_right: char,
    /// Bottom-left corner.
    pub bottom_left: char,
    /// Bottom-right corner.
    pub bottom_right: char,
    /// Top and bottom edges.
    pub horizontal: char,
    /// Left and right edges.
    pub vertical: char,
}

impl BorderChars {
    /// Build a glyph set from corners and edges.
    pub const fn new(
        top_left: char,
        top_right: char,
        bottom_left: char,
        bottom_right: char,
        horizontal: char,
        vertical: char,
    ) -> Self {
        Self { top_left, top_right, bottom_left, bottom_right, horizontal, vertical }
    }

    /// Light box drawing.
    pub const SINGLE: Self = Self::new('┌', '┐', '└', '┘', '─', '│');
    /// Double lines.
    pub const DOUBLE: Self = Self::new('╔', '╗', '╚', '╝', '═', '║');
    /// Rounded corners.
    pub const ROUNDED: Self = Self::new('╭', '╮', '╰', '╯', '─', '│');
    /// Heavy lines.
    pub const THICK: Self = Self::new('┏', '┓', '┗', '┛', '━', '┃');

    /// ASCII stand-in for [`Self::SINGLE`].
    pub const ASCII_SINGLE: Self = Self::new('+', '+', '+', '+', '-', '|');
    /// ASCII stand-in for [`Self::DOUBLE`].
    pub const ASCII_DOUBLE: Self = Self::new('+', '+', '+', '+', '=', '|');
    /// ASCII stand-in for [`Self::ROUNDED`].
    pub const ASCII_ROUNDED: Self = Self::new('/', '\\', '\\', '/', '-', '|');
    /// ASCII stand-in for [`Self::THICK`].
    pub const ASCII_THICK: Self = Self::new('#', '#', '#', '#', '=', '#');

    /// Resolve a named style to its glyph set.
    ///
    /// Returns `None` for [`BorderStyle::None`]. [`BorderStyle::Custom`] without
    /// explicit glyphs falls back to the single set.
    pub const fn for_style(style: BorderStyle, unicode: bool) -> Option<Self> {
        let chars = match (style, unicode) {
            (BorderStyle::None, _) => return None,
            (BorderStyle::Single | BorderStyle::Custom, true) => Self::SINGLE,
            (BorderStyle::Single | BorderStyle::Custom, false) => Self::ASCII_SINGLE,
            (BorderStyle::Double, true) => Self::DOUBLE,
            (BorderStyle::Double, false) => Self::ASCII_DOUBLE,
            (BorderStyle::Rounded, true) => Self::ROUNDED,
            (BorderStyle::Rounded, false) => Self::ASCII_ROUNDED,
            (BorderStyle::Thick, true) => Self::THICK,
            (BorderStyle::Thick, false) => Self::ASCII_THICK,
        };
        Some(chars)
    }
}

impl Default for BorderChars {
    fn default() -> Self {
        Self::SINGLE
    }
}

/// Space around the four sides of a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Spacing {
    /// Rows above.
    pub top: u16,
    /// Columns to the right.
    pub right: u16,
    /// Rows below.
    pub bottom: u16,
    /// Columns to the left.
    pub left: u16,
}

impl Spacing {
    /// Same amount on every side.
    pub const fn uniform(amount: u16) -> Self {
        Self { top: amount, right: amount, bottom: amount, left: amount }
    }

    /// No spacing.
    pub const ZERO: Self = Self::uniform(0);
}

/// Visual settings attached to every widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Theme {
    /// Text color. [`StyleColor::Default`] renders as white.
    pub fg: StyleColor,
    /// Fill color. [`StyleColor::Default`] renders as black.
    pub bg: StyleColor,
    /// Border color. [`StyleColor::Default`] renders as white.
    pub border_color: StyleColor,
    /// Which border to draw for widgets that have one.
    pub border: BorderStyle,
    /// Explicit glyphs overriding the style's named set.
    pub border_chars: Option<BorderChars>,
    /// Space between the border and the content.
    pub padding: Spacing,
    /// Space outside the bounds reserved by the caller's layout.
    pub margin: Spacing,
}

impl Theme {
    /// Copy of this theme with a different border style.
    #[must_use]
    pub const fn with_border(mut self, border: BorderStyle) -> Self {
        self.border = border;
        self
    }

    /// Copy of this theme with custom border glyphs.
    #[must_use]
    pub const fn with_border_chars(mut self, chars: BorderChars) -> Self {
        self.border = BorderStyle::Custom;
        self.border_chars = Some(chars);
        self
    }

    /// Copy of this theme with new text and fill colors.
    #[must_use]
    pub const fn with_colors(mut self, fg: StyleColor, bg: StyleColor) -> Self {
        self.fg = fg;
        self.bg = bg;
        self
    }

    /// Text color with the default resolved.
    pub const fn resolved_fg(&self) -> StyleColor {
        self.fg.or(StyleColor::WHITE)
    }

    /// Fill color with the default resolved.
    pub const fn resolved_bg(&self) -> StyleColor {
        self.bg.or(StyleColor::BLACK)
    }

    /// Border color with the default resolved.
    pub const fn resolved_border(&self) -> StyleColor {
        self.border_color.or(StyleColor::WHITE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_ascii_fallback() {
        let ascii = BorderChars::for_style(BorderStyle::Single, false).unwrap();
        assert_eq!(ascii.top_left, '+');
        assert_eq!(ascii.horizontal, '-');
        assert_eq!(ascii.vertical, '|');
        assert_eq!(BorderChars::for_style(BorderStyle::Rounded, false).unwrap().top_right, '\\');
    }

    #[test]
    fn test_resolve_unicode_sets() {
        assert_eq!(BorderChars::for_style(BorderStyle::Double, true), Some(BorderChars::DOUBLE));
        assert_eq!(BorderChars::for_style(BorderStyle::Thick, true).unwrap().vertical, '┃');
        assert_eq!(BorderChars::for_style(BorderStyle::None, true), None);
    }

    #[test]
    fn test_theme_defaults_resolve() {
        let theme = Theme::default();
        assert_eq!(theme.border, BorderStyle::Single);
        assert_eq!(theme.resolved_fg(), StyleColor::WHITE);
        assert_eq!(theme.resolved_bg(), StyleColor::BLACK);
        let custom = theme.with_border_chars(BorderChars::ASCII_THICK);
        assert_eq!(custom.border, BorderStyle::Custom);
    }
}
