//! Drawing primitives. Every primitive reduces to bounds-checked cell writes.

use super::Renderer;
use crate::buffer::{Glyph, Modifiers};
use crate::geom::Rect;
use crate::style::{interpolate, BorderChars, BorderStyle, StyleColor};
use unicode_segmentation::UnicodeSegmentation;
use std::ops::Range;
use unicode_width::UnicodeWidthStr;

impl Renderer {
    /// Draw text starting at (x, y), one grapheme cluster per cell (two for
    /// wide glyphs). Clips at the buffer edge.
    ///
    /// Returns the number of columns advanced.
    pub fn draw_text(&mut self, x: i32, y: i32, text: &str, fg: StyleColor, bg: StyleColor) -> i32 {
        self.draw_text_clipped(x, y, text, i32::MAX, fg, bg)
    }

    /// Like [`Renderer::draw_text`], but stops before exceeding `max_width` columns.
    pub fn draw_text_clipped(
        &mut self,
        x: i32,
        y: i32,
        text: &str,
        max_width: i32,
        fg: StyleColor,
        bg: StyleColor,
    ) -> i32 {
        self.draw_styled_text(x, y, text, max_width, fg, bg, Modifiers::empty())
    }

    /// Draw text with attributes, clipped to `max_width` columns.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_styled_text(
        &mut self,
        x: i32,
        y: i32,
        text: &str,
        max_width: i32,
        fg: StyleColor,
        bg: StyleColor,
        modifiers: Modifiers,
    ) -> i32 {
        let limit = i32::from(self.width());
        let mut col = x;
        for grapheme in text.graphemes(true) {
            let advance = i32::try_from(grapheme.width()).unwrap_or(1).max(1);
            if col >= limit || col - x + advance > max_width {
                break;
            }
            self.put(col, y, Glyph::new(grapheme), fg, bg, modifiers);
            col += advance;
        }
        col - x
    }

    /// Fill a rectangle with spaces.
    pub fn draw_rect(&mut self, rect: Rect, fg: StyleColor, bg: StyleColor) {
        self.fill_rect(rect, " ", fg, bg);
    }

    /// Fill a rectangle with one glyph.
    pub fn fill_rect(&mut self, rect: Rect, glyph: &str, fg: StyleColor, bg: StyleColor) {
        let glyph = Glyph::new(glyph);
        let (width, height) = (i32::from(self.width()), i32::from(self.height()));
        for y in rect.y.max(0)..rect.bottom().min(height) {
            for x in rect.x.max(0)..rect.right().min(width) {
                self.put(x, y, glyph, fg, bg, Modifiers::empty());
            }
        }
    }

    /// Draw a rectangular border on the default background.
    ///
    /// `custom` glyphs always win. Otherwise `style` resolves to its named
    /// set, or the ASCII stand-in when the renderer is not in Unicode mode.
    pub fn draw_border(
        &mut self,
        rect: Rect,
        style: BorderStyle,
        custom: Option<&BorderChars>,
        color: StyleColor,
    ) {
        if style == BorderStyle::None || rect.is_empty() {
            return;
        }
        let Some(chars) = custom.copied().or_else(|| BorderChars::for_style(style, self.unicode))
        else {
            return;
        };
        let bg = StyleColor::Default;
        let (left, top) = (rect.x, rect.y);
        let (right, bottom) = (rect.right() - 1, rect.bottom() - 1);
        let put = |r: &mut Self, x: i32, y: i32, c: char| {
            r.put(x, y, Glyph::from_char(c), color, bg, Modifiers::empty());
        };

        let (width, height) = (self.width(), self.height());
        for x in clip(i64::from(left) + 1, i64::from(right), width) {
            put(self, x, top, chars.horizontal);
            put(self, x, bottom, chars.horizontal);
        }
        for y in clip(i64::from(top) + 1, i64::from(bottom), height) {
            put(self, left, y, chars.vertical);
            put(self, right, y, chars.vertical);
        }
        put(self, left, top, chars.top_left);
        put(self, right, top, chars.top_right);
        put(self, left, bottom, chars.bottom_left);
        put(self, right, bottom, chars.bottom_right);
    }

    /// Horizontal run of `len` copies of `glyph`.
    pub fn draw_hline(&mut self, x: i32, y: i32, len: i32, glyph: &str, fg: StyleColor, bg: StyleColor) {
        let glyph = Glyph::new(glyph);
        let start = i64::from(x);
        for x in clip(start, start + i64::from(len), self.width()) {
            self.put(x, y, glyph, fg, bg, Modifiers::empty());
        }
    }

    /// Vertical run of `len` copies of `glyph`.
    pub fn draw_vline(&mut self, x: i32, y: i32, len: i32, glyph: &str, fg: StyleColor, bg: StyleColor) {
        let glyph = Glyph::new(glyph);
        let start = i64::from(y);
        for y in clip(start, start + i64::from(len), self.height()) {
            self.put(x, y, glyph, fg, bg, Modifiers::empty());
        }
    }

    /// Fill a rectangle with a color ramp from `start` to `end`.
    ///
    /// `vertical` ramps top to bottom, otherwise left to right.
    pub fn draw_gradient_rect(&mut self, rect: Rect, start: StyleColor, end: StyleColor, vertical: bool) {
        let (origin, steps, limit) = if vertical {
            (rect.y, rect.height, self.height())
        } else {
            (rect.x, rect.width, self.width())
        };
        let first = i64::from(origin);
        for pos in clip(first, first + i64::from(steps), limit) {
            let color = interpolate(start, end, ramp(i64::from(pos) - first, i64::from(steps)));
            if vertical {
                self.draw_hline(rect.x, pos, rect.width, " ", color, color);
            } else {
                self.draw_vline(pos, rect.y, rect.height, " ", color, color);
            }
        }
    }

    /// Draw text whose foreground ramps from `start` to `end`, one step per grapheme.
    pub fn draw_gradient_text(&mut self, x: i32, y: i32, text: &str, start: StyleColor, end: StyleColor) {
        let count = i64::try_from(text.graphemes(true).count()).unwrap_or(i64::MAX);
        let limit = i32::from(self.width());
        let mut col = x;
        for (i, grapheme) in (0..count).zip(text.graphemes(true)) {
            if col >= limit {
                break;
            }
            let color = interpolate(start, end, ramp(i, count));
            let glyph = Glyph::new(grapheme);
            self.put(col, y, glyph, color, StyleColor::Default, Modifiers::empty());
            col = col.saturating_add(i32::try_from(glyph.width()).unwrap_or(1).max(1));
        }
    }

    /// Filled disk: every cell with `dx² + dy² <= r²`.
    pub fn draw_circle(&mut self, cx: i32, cy: i32, radius: i32, glyph: &str, fg: StyleColor, bg: StyleColor) {
        let glyph = Glyph::new(glyph);
        self.for_each_in_disk(cx, cy, radius, |r, x, y, _| {
            r.put(x, y, glyph, fg, bg, Modifiers::empty());
        });
    }

    /// Digital line, both endpoints inclusive.
    ///
    /// Steps one cell at a time along the longer axis and rounds the other
    /// coordinate to the nearest cell. Only on-screen steps are visited.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_line(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        glyph: &str,
        fg: StyleColor,
        bg: StyleColor,
    ) {
        let glyph = Glyph::new(glyph);
        let (dx, dy) = (i64::from(x1) - i64::from(x0), i64::from(y1) - i64::from(y0));
        let x_major = dx.abs() >= dy.abs();
        let (major, minor, along, across, limit) = if x_major {
            (i64::from(x0), i64::from(y0), dx, dy, self.width())
        } else {
            (i64::from(y0), i64::from(x0), dy, dx, self.height())
        };
        let len = i128::from(along.abs());

        for a in clip(major.min(major + along), major.max(major + along) + 1, limit) {
            let offset = if len == 0 {
                0
            } else {
                let t = i128::from((i64::from(a) - major).abs());
                (2 * t * i128::from(across) + len).div_euclid(2 * len)
            };
            let Ok(b) = i32::try_from(i128::from(minor) + offset) else {
                continue;
            };
            let (x, y) = if x_major { (a, b) } else { (b, a) };
            self.put(x, y, glyph, fg, bg, Modifiers::empty());
        }
    }

    /// Solid black drop shadow `offset` cells right of and below `rect`.
    pub fn draw_shadow(&mut self, rect: Rect, offset: i32) {
        let shadow = StyleColor::rgb(0, 0, 0);
        let right = Rect::new(rect.right(), rect.y.saturating_add(offset), offset, rect.height);
        let below = Rect::new(rect.x.saturating_add(offset), rect.bottom(), rect.width, offset);
        self.draw_rect(right, shadow, shadow);
        self.draw_rect(below, shadow, shadow);
    }

    /// Radial glow around (cx, cy) fading from `color` at the center to black at `radius`.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    pub fn draw_glow(&mut self, cx: i32, cy: i32, radius: i32, color: StyleColor) {
        let dark = StyleColor::rgb(0, 0, 0);
        if radius <= 0 {
            let lit = interpolate(dark, color, 1.0);
            self.put(cx, cy, Glyph::SPACE, lit, lit, Modifiers::empty());
            return;
        }
        let r2 = u64::from(radius.unsigned_abs()).pow(2) as f64;
        self.for_each_in_disk(cx, cy, radius, |r, x, y, d2| {
            let lit = interpolate(dark, color, 1.0 - (d2 as f64 / r2) as f32);
            r.put(x, y, Glyph::SPACE, lit, lit, Modifiers::empty());
        });
    }

    /// Visit every on-screen cell with `dx² + dy² <= radius²`, passing its squared distance.
    fn for_each_in_disk(
        &mut self,
        cx: i32,
        cy: i32,
        radius: i32,
        mut visit: impl FnMut(&mut Self, i32, i32, u64),
    ) {
        if radius < 0 {
            return;
        }
        let r = i64::from(radius);
        let r2 = u64::from(radius.unsigned_abs()).pow(2);
        let (cx64, cy64) = (i64::from(cx), i64::from(cy));
        for y in clip(cy64 - r, cy64 + r + 1, self.height()) {
            let dy = (i64::from(y) - cy64).unsigned_abs();
            for x in clip(cx64 - r, cx64 + r + 1, self.width()) {
                let dx = (i64::from(x) - cx64).unsigned_abs();
                let d2 = dx * dx + dy * dy;
                if d2 <= r2 {
                    visit(self, x, y, d2);
                }
            }
        }
    }
}

/// The part of `start..end` inside `0..limit`.
#[allow(clippy::cast_possible_truncation)]
fn clip(start: i64, end: i64, limit: u16) -> Range<i32> {
    let limit = i64::from(limit);
    let (start, end) = (start.clamp(0, limit), end.clamp(0, limit));
    start as i32..end.max(start) as i32
}

/// Ramp position of step `i` out of `n`: `i / (n - 1)`, or 0 for a single step.
#[allow(clippy::cast_precision_loss)]
fn ramp(i: i64, n: i64) -> f32 {
    if n > 1 {
        i as f32 / (n - 1) as f32
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glyph_at(r: &Renderer, x: i32, y: i32) -> String {
        r.cell(x, y).map(|c| c.glyph().as_str().to_owned()).unwrap_or_default()
    }

    #[test]
    fn test_draw_text_clips_at_edge() {
        let mut r = Renderer::new(5, 1);
        let used = r.draw_text(2, 0, "hello", StyleColor::WHITE, StyleColor::BLACK);
        assert_eq!(used, 3);
        assert_eq!(r.back().row_text(0), "  hel");
    }

    #[test]
    fn test_draw_text_negative_start() {
        let mut r = Renderer::new(5, 1);
        r.draw_text(-2, 0, "hello", StyleColor::WHITE, StyleColor::BLACK);
        assert_eq!(r.back().row_text(0), "llo  ");
    }

    #[test]
    fn test_draw_text_clipped_wide() {
        let mut r = Renderer::new(10, 1);
        let used = r.draw_text_clipped(0, 0, "日本語", 5, StyleColor::WHITE, StyleColor::BLACK);
        assert_eq!(used, 4);
        assert_eq!(glyph_at(&r, 2, 0), "本");
    }

    #[test]
    fn test_border_ascii_single() {
        let mut r = Renderer::new(4, 3);
        r.set_unicode(false);
        r.draw_border(Rect::new(0, 0, 4, 3), BorderStyle::Single, None, StyleColor::WHITE);
        assert_eq!(r.back().row_text(0), "+--+");
        assert_eq!(r.back().row_text(1), "|  |");
        assert_eq!(r.back().row_text(2), "+--+");
        assert_eq!(r.cell(0, 0).unwrap().bg(), StyleColor::Default);
    }

    #[test]
    fn test_border_unicode_rounded_and_custom() {
        let mut r = Renderer::new(3, 3);
        r.draw_border(Rect::new(0, 0, 3, 3), BorderStyle::Rounded, None, StyleColor::WHITE);
        assert_eq!(r.back().row_text(0), "╭─╮");
        assert_eq!(r.back().row_text(2), "╰─╯");

        let stars = BorderChars::new('*', '*', '*', '*', '~', '!');
        r.draw_border(Rect::new(0, 0, 3, 3), BorderStyle::Double, Some(&stars), StyleColor::WHITE);
        assert_eq!(r.back().row_text(0), "*~*");
        assert_eq!(r.back().row_text(1), "! !");
    }

    #[test]
    fn test_border_none_draws_nothing() {
        let mut r = Renderer::new(3, 3);
        r.draw_border(Rect::new(0, 0, 3, 3), BorderStyle::None, None, StyleColor::WHITE);
        assert_eq!(r.back().row_text(0), "   ");
    }

    #[test]
    fn test_gradient_rect_endpoints() {
        let mut r = Renderer::new(3, 1);
        let (a, b) = (StyleColor::rgb(0, 0, 0), StyleColor::rgb(200, 100, 50));
        r.draw_gradient_rect(Rect::new(0, 0, 3, 1), a, b, false);
        assert_eq!(r.cell(0, 0).unwrap().bg(), a);
        assert_eq!(r.cell(1, 0).unwrap().bg(), StyleColor::rgb(100, 50, 25));
        assert_eq!(r.cell(2, 0).unwrap().bg(), b);
    }

    #[test]
    fn test_gradient_single_step_uses_start() {
        let mut r = Renderer::new(3, 1);
        let (a, b) = (StyleColor::rgb(9, 9, 9), StyleColor::rgb(200, 100, 50));
        r.draw_gradient_rect(Rect::new(0, 0, 3, 1), a, b, true);
        assert_eq!(r.cell(2, 0).unwrap().bg(), a);
        r.draw_gradient_text(0, 0, "A", a, b);
        assert_eq!(r.cell(0, 0).unwrap().fg(), a);
        assert_eq!(r.cell(0, 0).unwrap().bg(), StyleColor::Default);
    }

    #[test]
    fn test_circle_disk() {
        let mut r = Renderer::new(5, 5);
        r.draw_circle(2, 2, 1, "o", StyleColor::WHITE, StyleColor::BLACK);
        assert_eq!(r.back().row_text(1), "  o  ");
        assert_eq!(r.back().row_text(2), " ooo ");
        assert_eq!(r.back().row_text(3), "  o  ");
    }

    #[test]
    fn test_line_diagonal_and_clipped() {
        let mut r = Renderer::new(4, 4);
        r.draw_line(-1, -1, 3, 3, "*", StyleColor::WHITE, StyleColor::BLACK);
        for i in 0..4 {
            assert_eq!(glyph_at(&r, i, i), "*");
        }
        assert_eq!(glyph_at(&r, 1, 0), " ");
    }

    #[test]
    fn test_shadow_strips() {
        let mut r = Renderer::new(6, 6);
        r.draw_shadow(Rect::new(0, 0, 3, 3), 1);
        let black = StyleColor::rgb(0, 0, 0);
        // Right strip: x = 3, y in 1..4
        assert_eq!(r.cell(3, 1).unwrap().bg(), black);
        assert_eq!(r.cell(3, 3).unwrap().bg(), black);
        assert_eq!(r.cell(3, 0).unwrap().bg(), StyleColor::Default);
        // Bottom strip: y = 3, x in 1..4
        assert_eq!(r.cell(1, 3).unwrap().bg(), black);
        assert_eq!(r.cell(0, 3).unwrap().bg(), StyleColor::Default);
    }

    #[test]
    fn test_lines_at_extreme_coordinates() {
        let mut r = Renderer::new(4, 2);
        let (fg, bg) = (StyleColor::WHITE, StyleColor::BLACK);
        r.draw_hline(i32::MAX - 1, 0, 5, "x", fg, bg);
        r.draw_vline(0, i32::MAX - 1, 5, "x", fg, bg);
        r.draw_hline(i32::MIN, 0, i32::MAX, "x", fg, bg);
        assert_eq!(r.back().row_text(0), "    ");

        r.draw_hline(i32::MIN, 1, i32::MAX, "-", fg, bg);
        r.draw_hline(-2, 1, i32::MAX, "-", fg, bg);
        assert_eq!(r.back().row_text(1), "----");
        r.draw_hline(0, 0, i32::MIN, "x", fg, bg);
        assert_eq!(r.back().row_text(0), "    ");
    }

    #[test]
    fn test_shapes_at_extreme_sizes() {
        let mut r = Renderer::new(3, 3);
        let (fg, bg) = (StyleColor::WHITE, StyleColor::BLACK);
        r.draw_circle(0, 0, 50_000, "o", fg, bg);
        assert_eq!(r.back().row_text(2), "ooo");
        r.draw_circle(i32::MIN, i32::MAX, i32::MAX, "o", fg, bg);
        r.draw_circle(1, 1, i32::MIN, "x", fg, bg);
        assert_eq!(r.back().row_text(1), "ooo");

        r.draw_glow(i32::MAX, i32::MIN, i32::MAX, StyleColor::rgb(10, 10, 10));
        r.draw_glow(1, 1, i32::MAX, StyleColor::rgb(10, 10, 10));
        assert_eq!(r.cell(1, 1).unwrap().bg(), StyleColor::rgb(10, 10, 10));

        r.draw_shadow(Rect::new(i32::MAX - 1, i32::MAX - 1, i32::MAX, i32::MAX), i32::MAX);
        let huge = Rect::new(i32::MIN, i32::MIN, i32::MAX, i32::MAX);
        r.draw_border(huge, BorderStyle::Single, None, fg);
        r.draw_gradient_rect(Rect::new(i32::MIN, 0, i32::MAX, 1), fg, bg, false);
        r.draw_gradient_text(i32::MAX - 1, 0, "abc", fg, bg);
    }

    #[test]
    fn test_line_across_whole_range() {
        let mut r = Renderer::new(5, 5);
        let (fg, bg) = (StyleColor::WHITE, StyleColor::BLACK);
        r.draw_line(i32::MIN, 2, i32::MAX, 2, "-", fg, bg);
        assert_eq!(r.back().row_text(2), "-----");

        r.draw_line(i32::MIN, i32::MIN, i32::MAX, i32::MAX, "*", fg, bg);
        r.draw_line(i32::MAX, i32::MIN, i32::MIN, i32::MAX, "*", fg, bg);
        for i in 0..5 {
            assert_eq!(glyph_at(&r, i, i), "*");
        }

        r.draw_line(3, 0, 3, 0, "#", fg, bg);
        assert_eq!(glyph_at(&r, 3, 0), "#");
    }

    #[test]
    fn test_glow_center_is_full_color() {
        let mut r = Renderer::new(7, 7);
        let color = StyleColor::rgb(200, 100, 0);
        r.draw_glow(3, 3, 3, color);
        assert_eq!(r.cell(3, 3).unwrap().bg(), color);
        assert_eq!(r.cell(6, 3).unwrap().bg(), StyleColor::rgb(0, 0, 0));
        assert_eq!(r.cell(0, 0).unwrap().bg(), StyleColor::Default);
    }
}
