//! Drawing recipes for each widget variant.
//!
//! [`WidgetTree::render`] walks the tree in pre-order: a widget draws itself,
//! then its children in insertion order, so later siblings paint over earlier
//! ones. A hidden widget hides its whole subtree.

use super::kind::{ItemList, WidgetKind};
use super::node::Widget;
use super::tree::{NodeId, WidgetTree};
use crate::geom::Rect;
use crate::render::Renderer;
use crate::style::StyleColor;
use unicode_width::UnicodeWidthStr;

/// Fill behind a focused button and selected entries.
const HIGHLIGHT: StyleColor = StyleColor::BLUE;

fn width_of(text: &str) -> i32 {
    i32::try_from(text.width()).unwrap_or(i32::MAX)
}

impl WidgetTree {
    /// Draw the widget `id` and its visible descendants into `renderer`.
    pub fn render(&mut self, id: NodeId, renderer: &mut Renderer) {
        let Some(widget) = self.get_mut(id) else {
            return;
        };
        if !widget.visible {
            return;
        }
        if let Some(mut custom) = widget.handlers.render.take() {
            custom(widget, renderer);
            widget.handlers.render = Some(custom);
        } else {
            draw_widget(widget, renderer);
        }
        let children = widget.children.clone();
        for child in children {
            self.render(child, renderer);
        }
    }
}

/// Resolved colors for one widget.
#[derive(Clone, Copy)]
struct Colors {
    fg: StyleColor,
    bg: StyleColor,
    border: StyleColor,
}

/// Background fill plus the theme's border.
fn frame(widget: &Widget, r: &mut Renderer, fill: StyleColor, colors: Colors) {
    let theme = &widget.theme;
    r.draw_rect(widget.bounds, colors.fg, fill);
    r.draw_border(widget.bounds, theme.border, theme.border_chars.as_ref(), colors.border);
}

/// Area inside the border and padding.
fn content(widget: &Widget) -> Rect {
    widget.bounds.shrink(1).inset(widget.theme.padding)
}

/// Draw the built-in recipe for one widget, without its children.
pub(crate) fn draw_widget(widget: &Widget, r: &mut Renderer) {
    let theme = &widget.theme;
    let colors = Colors {
        fg: theme.resolved_fg(),
        bg: theme.resolved_bg(),
        border: theme.resolved_border(),
    };
    let Colors { fg, bg, .. } = colors;
    let b = widget.bounds;
    let unicode = r.unicode();

    match &widget.kind {
        WidgetKind::Window { title } => {
            frame(widget, r, bg, colors);
            let (x, width) = (b.x.saturating_add(2), b.width.saturating_sub(4));
            r.draw_text_clipped(x, b.y, title, width, fg, bg);
        }
        WidgetKind::Panel => frame(widget, r, bg, colors),
        WidgetKind::Label { text } => {
            r.draw_text_clipped(b.x, b.y, text, b.width, fg, bg);
        }
        WidgetKind::Button { text } => {
            let fill = if widget.focused { HIGHLIGHT } else { bg };
            frame(widget, r, fill, colors);
            let x = b.x.saturating_add(b.width.saturating_sub(width_of(text)) / 2);
            r.draw_text(x, b.y.saturating_add(b.height / 2), text, fg, fill);
        }
        WidgetKind::Checkbox { text, checked } => {
            let mark = if *checked { 'X' } else { ' ' };
            r.draw_text_clipped(b.x, b.y, &format!("[{mark}] {text}"), b.width, fg, bg);
        }
        WidgetKind::Radio { text, selected, .. } => {
            let mark = if *selected { '*' } else { ' ' };
            r.draw_text_clipped(b.x, b.y, &format!("({mark}) {text}"), b.width, fg, bg);
        }
        WidgetKind::Progress { value } => {
            let fraction = value.clamp(0.0, 1.0);
            #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
            let filled = (b.width as f32 * fraction) as i32;
            r.draw_rect(Rect::new(b.x, b.y, filled, b.height), fg, StyleColor::GREEN);
            let rest = Rect::new(b.x.saturating_add(filled), b.y, b.width - filled, b.height);
            r.draw_rect(rest, fg, bg);
        }
        WidgetKind::Slider(slider) => {
            let (track, marker) = if unicode { ("─", "●") } else { ("-", "O") };
            #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
            let pos = ((b.width as f32 * slider.normalized()) as i32)
                .min(b.width.saturating_sub(1));
            r.draw_hline(b.x, b.y, b.width, track, fg, bg);
            r.set_cell(b.x.saturating_add(pos), b.y, marker, fg, bg);
        }
        WidgetKind::Textbox(input) => {
            frame(widget, r, bg, colors);
            let inner = content(widget);
            r.draw_text_clipped(inner.x, inner.y, input.text(), inner.width, fg, bg);
        }
        WidgetKind::Editor(editor) => {
            frame(widget, r, bg, colors);
            let inner = content(widget);
            let visible = usize::try_from(inner.height).unwrap_or(0);
            let lines = editor.lines().iter().skip(editor.scroll()).take(visible);
            for (line, y) in lines.zip(inner.y..=i32::MAX) {
                r.draw_text_clipped(inner.x, y, line, inner.width, fg, bg);
            }
        }
        WidgetKind::List(list) => {
            frame(widget, r, bg, colors);
            draw_items(r, list, content(widget), colors);
        }
        WidgetKind::Dropdown { list, expanded } => {
            frame(widget, r, bg, colors);
            let inner = content(widget);
            if let Some(item) = list.selected_item() {
                r.draw_text_clipped(inner.x, inner.y, item, inner.width, fg, bg);
            }
            if *expanded && !list.is_empty() {
                let height = i32::try_from(list.len()).unwrap_or(i32::MAX).saturating_add(2);
                let popup = Rect::new(b.x, b.bottom(), b.width, height);
                r.draw_rect(popup, fg, bg);
                r.draw_border(popup, theme.border, theme.border_chars.as_ref(), colors.border);
                draw_items(r, list, popup.shrink(1), colors);
            }
        }
        WidgetKind::Menu(items) => {
            let mut x = b.x;
            for (i, item) in items.items().iter().enumerate() {
                let fill = if items.selected() == Some(i) { HIGHLIGHT } else { bg };
                r.draw_text(x, b.y, item, fg, fill);
                x = x.saturating_add(width_of(item)).saturating_add(2);
            }
        }
        WidgetKind::Tabs(tabs) => {
            let mut x = b.x;
            for (i, name) in tabs.items().iter().enumerate() {
                let fill = if tabs.selected() == Some(i) { HIGHLIGHT } else { bg };
                x = x.saturating_add(r.draw_text(x, b.y, &format!(" {name} "), fg, fill));
            }
        }
        WidgetKind::Table(table) => {
            frame(widget, r, bg, colors);
            let cols = i32::try_from(table.cols()).unwrap_or(0);
            if cols == 0 {
                return;
            }
            let cell_width = b.width.saturating_sub(2) / cols;
            let visible = usize::try_from(b.height.saturating_sub(2)).unwrap_or(0);
            let rows = (0..table.rows().min(visible)).zip(b.y.saturating_add(1)..=i32::MAX);
            for (row, y) in rows {
                let xs = (0..=i32::MAX)
                    .map(|c| b.x.saturating_add(1).saturating_add(c.saturating_mul(cell_width)));
                for (col, x) in (0..table.cols()).zip(xs) {
                    if let Some(text) = table.cell(row, col) {
                        r.draw_text_clipped(x, y, text, cell_width, fg, bg);
                    }
                }
            }
        }
        WidgetKind::StatusBar { text } => {
            r.draw_rect(b, fg, StyleColor::BRIGHT_BLACK);
            r.draw_text_clipped(b.x, b.y, text, b.width, fg, StyleColor::BRIGHT_BLACK);
        }
        WidgetKind::Notification { text, .. } => {
            frame(widget, r, StyleColor::YELLOW, colors);
            let inner = content(widget);
            r.draw_text_clipped(
                inner.x,
                inner.y,
                text,
                inner.width,
                StyleColor::BLACK,
                StyleColor::YELLOW,
            );
        }
        WidgetKind::Separator { horizontal: true } => {
            r.draw_hline(b.x, b.y, b.width, if unicode { "─" } else { "-" }, fg, bg);
        }
        WidgetKind::Separator { horizontal: false } => {
            r.draw_vline(b.x, b.y, b.height, if unicode { "│" } else { "|" }, fg, bg);
        }
        WidgetKind::Spinner(spinner) => {
            r.draw_text(b.x, b.y, spinner.current(unicode), fg, bg);
        }
        WidgetKind::VStack | WidgetKind::HStack | WidgetKind::Grid { .. } => {}
    }
}

/// One item per row from the list's scroll offset, selection highlighted.
fn draw_items(r: &mut Renderer, list: &ItemList, area: Rect, colors: Colors) {
    let visible = usize::try_from(area.height).unwrap_or(0);
    let rows = list.items().iter().enumerate().skip(list.scroll()).take(visible);
    for ((index, item), y) in rows.zip(area.y..=i32::MAX) {
        let fill = if list.selected() == Some(index) { HIGHLIGHT } else { colors.bg };
        r.draw_text_clipped(area.x, y, item, area.width, colors.fg, fill);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{BorderStyle, Theme};
    use crate::widget::SpinnerStyle;

    fn row(r: &Renderer, y: i32) -> String {
        (0..i32::from(r.width()))
            .map(|x| r.cell(x, y).map_or_else(|| " ".to_owned(), |c| c.glyph().as_str().to_owned()))
            .collect()
    }

    fn draw(widget: Widget, width: u16, height: u16, unicode: bool) -> Renderer {
        let mut tree = WidgetTree::new();
        let id = tree.insert(widget);
        let mut r = Renderer::new(width, height);
        r.set_unicode(unicode);
        tree.render(id, &mut r);
        r
    }

    #[test]
    fn test_ascii_border_without_unicode() {
        let r = draw(Widget::panel().with_bounds(0, 0, 5, 3), 5, 3, false);
        assert_eq!(row(&r, 0), "+---+");
        assert_eq!(row(&r, 1), "|   |");
        assert_eq!(row(&r, 2), "+---+");
    }

    #[test]
    fn test_unicode_border() {
        let r = draw(Widget::panel().with_bounds(0, 0, 4, 2), 4, 2, true);
        assert_eq!(row(&r, 0), "┌──┐");
        assert_eq!(row(&r, 1), "└──┘");
    }

    #[test]
    fn test_window_title_on_border() {
        let r = draw(Widget::window("Hi").with_bounds(0, 0, 8, 3), 8, 3, false);
        assert_eq!(row(&r, 0), "+-Hi---+");
    }

    #[test]
    fn test_button_centers_and_highlights_focus() {
        let mut tree = WidgetTree::new();
        let id = tree.insert(Widget::button("OK").with_bounds(0, 0, 8, 3));
        let mut r = Renderer::new(8, 3);
        tree.render(id, &mut r);
        assert_eq!(row(&r, 1), "│  OK  │");
        assert_eq!(r.cell(3, 1).unwrap().bg(), StyleColor::BLACK);

        tree.focus(id);
        tree.render(id, &mut r);
        assert_eq!(r.cell(3, 1).unwrap().bg(), HIGHLIGHT);
    }

    #[test]
    fn test_checkbox_and_radio_marks() {
        let mut check = Widget::checkbox("a");
        check.set_checked(true);
        assert_eq!(row(&draw(check, 6, 1, false), 0), "[X] a ");
        assert_eq!(row(&draw(Widget::radio("b", 0), 6, 1, false), 0), "( ) b ");
    }

    #[test]
    fn test_progress_splits_fill() {
        let mut bar = Widget::progress().with_bounds(0, 0, 10, 1);
        bar.set_value(1.7);
        let r = draw(bar, 10, 1, false);
        assert_eq!(r.cell(9, 0).unwrap().bg(), StyleColor::GREEN);

        let mut half = Widget::progress().with_bounds(0, 0, 10, 1);
        half.set_value(0.5);
        let r = draw(half, 10, 1, false);
        assert_eq!(r.cell(4, 0).unwrap().bg(), StyleColor::GREEN);
        assert_eq!(r.cell(5, 0).unwrap().bg(), StyleColor::BLACK);
    }

    #[test]
    fn test_slider_marker_position() {
        let r = draw(Widget::slider(0.0, 10.0, 5.0).with_bounds(0, 0, 10, 1), 10, 1, false);
        assert_eq!(row(&r, 0), "-----O----");
        let r = draw(Widget::slider(0.0, 10.0, 10.0).with_bounds(0, 0, 10, 1), 10, 1, true);
        assert_eq!(r.cell(9, 0).unwrap().glyph().as_str(), "●");
        let r = draw(Widget::slider(3.0, 3.0, 3.0).with_bounds(0, 0, 4, 1), 4, 1, false);
        assert_eq!(row(&r, 0), "O---");
    }

    #[test]
    fn test_list_highlights_selection() {
        let mut list = Widget::list(["one", "two"]).with_bounds(0, 0, 6, 4);
        list.set_selected(1);
        let r = draw(list, 6, 4, false);
        assert_eq!(row(&r, 1), "|one |");
        assert_eq!(row(&r, 2), "|two |");
        assert_eq!(r.cell(1, 2).unwrap().bg(), HIGHLIGHT);
        assert_eq!(r.cell(1, 1).unwrap().bg(), StyleColor::BLACK);
    }

    #[test]
    fn test_tabs_and_menu_layout() {
        let r = draw(Widget::tabs(["A", "B"]).with_bounds(0, 0, 8, 1), 8, 1, false);
        assert_eq!(row(&r, 0), " A  B   ");
        assert_eq!(r.cell(1, 0).unwrap().bg(), HIGHLIGHT);

        let r = draw(Widget::menu(["File", "Edit"]).with_bounds(0, 0, 12, 1), 12, 1, false);
        assert_eq!(row(&r, 0), "File  Edit  ");
    }

    #[test]
    fn test_table_cells() {
        let mut table = Widget::table(2, 2).with_bounds(0, 0, 10, 4);
        table.set_cell(0, 0, "a");
        table.set_cell(1, 1, "longtext");
        let r = draw(table, 10, 4, false);
        assert_eq!(row(&r, 1), "|a       |");
        assert_eq!(row(&r, 2), "|    long|");
    }

    #[test]
    fn test_separator_orientation() {
        let r = draw(Widget::separator(true).with_bounds(0, 0, 3, 1), 3, 1, true);
        assert_eq!(row(&r, 0), "───");
        let r = draw(Widget::separator(false).with_bounds(1, 0, 1, 2), 3, 2, false);
        assert_eq!(row(&r, 1), " | ");
    }

    #[test]
    fn test_spinner_frame() {
        let mut spinner = Widget::spinner(SpinnerStyle::Arrow);
        spinner.spinner_mut().unwrap().start();
        spinner.spinner_mut().unwrap().tick();
        assert_eq!(row(&draw(spinner, 2, 1, false), 0), "^ ");
    }

    #[test]
    fn test_hidden_hides_subtree() {
        let mut tree = WidgetTree::new();
        let panel = tree.insert(Widget::panel().with_bounds(0, 0, 6, 3));
        let label = tree.insert(Widget::label("x").with_bounds(1, 1, 1, 1));
        tree.add_child(panel, label);
        tree.get_mut(panel).unwrap().visible = false;

        let mut r = Renderer::new(6, 3);
        tree.render(panel, &mut r);
        assert_eq!(row(&r, 1), "      ");
    }

    #[test]
    fn test_custom_render_still_draws_children() {
        let mut tree = WidgetTree::new();
        let mut panel = Widget::panel().with_bounds(0, 0, 6, 3);
        panel.set_render(|w, r| {
            r.draw_text(w.bounds.x, w.bounds.y, "custom", StyleColor::RED, StyleColor::BLACK);
        });
        let panel = tree.insert(panel);
        let label = tree.insert(Widget::label("kid").with_bounds(0, 1, 3, 1));
        tree.add_child(panel, label);

        let mut r = Renderer::new(6, 3);
        tree.render(panel, &mut r);
        tree.render(panel, &mut r);
        assert_eq!(row(&r, 0), "custom");
        assert_eq!(row(&r, 1), "kid   ");
    }

    #[test]
    fn test_later_siblings_paint_over() {
        let mut tree = WidgetTree::new();
        let root = tree.insert(Widget::vstack());
        let first = tree.insert(Widget::label("aaa").with_bounds(0, 0, 3, 1));
        let second = tree.insert(Widget::label("b").with_bounds(1, 0, 1, 1));
        tree.add_child(root, first);
        tree.add_child(root, second);

        let mut r = Renderer::new(3, 1);
        tree.render(root, &mut r);
        assert_eq!(row(&r, 0), "aba");
    }

    #[test]
    fn test_borderless_theme() {
        let theme = Theme::default().with_border(BorderStyle::None);
        let r = draw(Widget::panel().with_bounds(0, 0, 3, 2).with_theme(theme), 3, 2, false);
        assert_eq!(row(&r, 0), "   ");
    }

    fn samples() -> Vec<Widget> {
        let mut table = Widget::table(2, 2);
        table.set_cell(0, 0, "cell");
        vec![
            Widget::window("title"),
            Widget::button("Go"),
            Widget::checkbox("x"),
            Widget::slider(f32::NAN, f32::INFINITY, 1.0),
            Widget::editor("a\nb"),
            Widget::list(["a", "b"]),
            Widget::menu(["File", "Edit"]),
            table,
            Widget::separator(false),
        ]
    }

    #[test]
    fn test_extreme_bounds_draw_nothing() {
        let corners = [
            (i32::MAX, i32::MAX, i32::MAX, i32::MAX),
            (i32::MIN, i32::MIN, i32::MAX, i32::MAX),
            (i32::MAX - 1, 0, i32::MIN, i32::MIN),
        ];
        for (x, y, w, h) in corners {
            for widget in samples() {
                let r = draw(widget.with_bounds(x, y, w, h), 4, 2, true);
                assert_eq!(row(&r, 0), "    ");
                assert_eq!(row(&r, 1), "    ");
            }
        }
    }

    #[test]
    fn test_notification_colors() {
        let r = draw(Widget::notification("hey").with_bounds(0, 0, 8, 3), 8, 3, false);
        let cell = r.cell(1, 1).unwrap();
        assert_eq!(cell.glyph().as_str(), "h");
        assert_eq!((cell.fg(), cell.bg()), (StyleColor::BLACK, StyleColor::YELLOW));
    }
}
