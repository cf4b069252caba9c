//! A single widget: shared fields, variant state, and attached callbacks.

use super::kind::{ItemList, Slider, Table, TextInput, WidgetKind};
use super::spinner::{Spinner, SpinnerStyle};
use super::tree::NodeId;
use crate::geom::Rect;
use crate::render::Renderer;
use crate::style::Theme;

/// Event callback. Receives the widget that fired it.
pub type Callback = Box<dyn FnMut(&mut Widget)>;

/// Custom render callback. Runs instead of the built-in recipe.
pub type RenderFn = Box<dyn FnMut(&Widget, &mut Renderer)>;

/// Which callback slot to fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Hook {
    Click,
    Change,
    Focus,
    Blur,
}

/// Callback slots. Attaching replaces whatever was there.
#[derive(Default)]
pub(crate) struct Handlers {
    click: Option<Callback>,
    change: Option<Callback>,
    focus: Option<Callback>,
    blur: Option<Callback>,
    pub(crate) render: Option<RenderFn>,
}

impl Handlers {
    fn slot(&mut self, hook: Hook) -> &mut Option<Callback> {
        match hook {
            Hook::Click => &mut self.click,
            Hook::Change => &mut self.change,
            Hook::Focus => &mut self.focus,
            Hook::Blur => &mut self.blur,
        }
    }
}

/// A widget in a [`WidgetTree`](super::WidgetTree).
///
/// Public fields are plain data and may be changed freely. Focus and
/// parent/child links are owned by the tree and exposed read-only.
pub struct Widget {
    /// Variant and its state.
    pub kind: WidgetKind,
    /// Optional identifier for [`WidgetTree::find_by_id`](super::WidgetTree::find_by_id).
    pub id: Option<String>,
    /// Position and size in cells.
    pub bounds: Rect,
    /// Hidden widgets and their subtrees are neither drawn nor receive events.
    pub visible: bool,
    /// Disabled widgets and their subtrees receive no events.
    pub enabled: bool,
    /// Whether the widget can take keyboard focus.
    pub focusable: bool,
    /// Colors, border, and spacing.
    pub theme: Theme,
    pub(crate) focused: bool,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) handlers: Handlers,
}

impl Widget {
    /// A widget at the origin with the variant's default size and focusability.
    pub fn new(kind: WidgetKind) -> Self {
        let (width, height) = kind.default_size();
        Self {
            focusable: kind.focusable_by_default(),
            kind,
            id: None,
            bounds: Rect::new(0, 0, width, height),
            visible: true,
            enabled: true,
            theme: Theme::default(),
            focused: false,
            parent: None,
            children: Vec::new(),
            handlers: Handlers::default(),
        }
    }

    /// Bordered window with a title.
    pub fn window(title: impl Into<String>) -> Self {
        Self::new(WidgetKind::Window { title: title.into() })
    }

    /// Bordered panel.
    pub fn panel() -> Self {
        Self::new(WidgetKind::Panel)
    }

    /// Static text.
    pub fn label(text: impl Into<String>) -> Self {
        Self::new(WidgetKind::Label { text: text.into() })
    }

    /// Push button.
    pub fn button(text: impl Into<String>) -> Self {
        Self::new(WidgetKind::Button { text: text.into() })
    }

    /// Unchecked checkbox.
    pub fn checkbox(text: impl Into<String>) -> Self {
        Self::new(WidgetKind::Checkbox { text: text.into(), checked: false })
    }

    /// Unselected radio button in `group`.
    pub fn radio(text: impl Into<String>, group: i32) -> Self {
        Self::new(WidgetKind::Radio { text: text.into(), group, selected: false })
    }

    /// Empty progress bar.
    pub fn progress() -> Self {
        Self::new(WidgetKind::Progress { value: 0.0 })
    }

    /// Slider over `[min, max]` starting at `value`.
    pub fn slider(min: f32, max: f32, value: f32) -> Self {
        Self::new(WidgetKind::Slider(Slider::new(min, max, value)))
    }

    /// Single-line text field.
    pub fn textbox(text: impl Into<String>) -> Self {
        Self::new(WidgetKind::Textbox(TextInput::new(text)))
    }

    /// Multi-line editor.
    pub fn editor(text: &str) -> Self {
        Self::new(WidgetKind::Editor(super::kind::Editor::new(text)))
    }

    /// Scrollable list, first item selected.
    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(WidgetKind::List(ItemList::new(items)))
    }

    /// Collapsed dropdown, first item selected.
    pub fn dropdown<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(WidgetKind::Dropdown { list: ItemList::new(items), expanded: false })
    }

    /// Menu bar with nothing selected.
    pub fn menu<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(WidgetKind::Menu(ItemList::unselected(items)))
    }

    /// Tab strip, first tab active.
    pub fn tabs<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(WidgetKind::Tabs(ItemList::new(names)))
    }

    /// Empty table.
    pub fn table(rows: usize, cols: usize) -> Self {
        Self::new(WidgetKind::Table(Table::new(rows, cols)))
    }

    /// Status line.
    pub fn status_bar(text: impl Into<String>) -> Self {
        Self::new(WidgetKind::StatusBar { text: text.into() })
    }

    /// Notification that hides itself after the default timeout.
    pub fn notification(text: impl Into<String>) -> Self {
        Self::new(WidgetKind::notification(text))
    }

    /// Horizontal or vertical rule.
    pub fn separator(horizontal: bool) -> Self {
        Self::new(WidgetKind::Separator { horizontal })
    }

    /// Stopped spinner.
    pub fn spinner(style: SpinnerStyle) -> Self {
        Self::new(WidgetKind::spinner(style))
    }

    /// Vertical stack container.
    pub fn vstack() -> Self {
        Self::new(WidgetKind::VStack)
    }

    /// Horizontal stack container.
    pub fn hstack() -> Self {
        Self::new(WidgetKind::HStack)
    }

    /// Grid container.
    pub fn grid(rows: u16, cols: u16) -> Self {
        Self::new(WidgetKind::Grid { rows, cols })
    }

    /// Builder: set the identifier.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Builder: set the bounds.
    #[must_use]
    pub fn with_bounds(mut self, x: i32, y: i32, width: i32, height: i32) -> Self {
        self.bounds = Rect::new(x, y, width, height);
        self
    }

    /// Builder: set the theme.
    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Builder: attach a click callback.
    #[must_use]
    pub fn on_click(mut self, f: impl FnMut(&mut Widget) + 'static) -> Self {
        self.set_on_click(f);
        self
    }

    /// Builder: attach a change callback.
    #[must_use]
    pub fn on_change(mut self, f: impl FnMut(&mut Widget) + 'static) -> Self {
        self.set_on_change(f);
        self
    }

    /// Replace the click callback.
    pub fn set_on_click(&mut self, f: impl FnMut(&mut Widget) + 'static) {
        self.handlers.click = Some(Box::new(f));
    }

    /// Replace the change callback.
    pub fn set_on_change(&mut self, f: impl FnMut(&mut Widget) + 'static) {
        self.handlers.change = Some(Box::new(f));
    }

    /// Replace the focus-gained callback.
    pub fn set_on_focus(&mut self, f: impl FnMut(&mut Widget) + 'static) {
        self.handlers.focus = Some(Box::new(f));
    }

    /// Replace the focus-lost callback.
    pub fn set_on_blur(&mut self, f: impl FnMut(&mut Widget) + 'static) {
        self.handlers.blur = Some(Box::new(f));
    }

    /// Replace the built-in drawing with `f`. Children are still drawn.
    pub fn set_render(&mut self, f: impl FnMut(&Widget, &mut Renderer) + 'static) {
        self.handlers.render = Some(Box::new(f));
    }

    /// Whether this widget holds keyboard focus.
    pub const fn is_focused(&self) -> bool {
        self.focused
    }

    /// Parent node, if attached.
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child nodes in draw order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub(crate) fn has_click_handler(&self) -> bool {
        self.handlers.click.is_some()
    }

    /// Run the callback in `hook`, if any.
    ///
    /// The callback is taken out of its slot while it runs so it can borrow
    /// the widget mutably. If it installed a replacement, the replacement wins.
    pub(crate) fn fire(&mut self, hook: Hook) {
        let Some(mut callback) = self.handlers.slot(hook).take() else {
            return;
        };
        callback(self);
        let slot = self.handlers.slot(hook);
        if slot.is_none() {
            *slot = Some(callback);
        }
    }

    /// Caption, title, or contents for variants that carry single-line text.
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            WidgetKind::Window { title: text }
            | WidgetKind::Label { text }
            | WidgetKind::Button { text }
            | WidgetKind::Checkbox { text, .. }
            | WidgetKind::Radio { text, .. }
            | WidgetKind::StatusBar { text }
            | WidgetKind::Notification { text, .. } => Some(text),
            WidgetKind::Textbox(input) => Some(input.text()),
            _ => None,
        }
    }

    /// Replace the text of a text-carrying variant. Others are unchanged.
    pub fn set_text(&mut self, new: impl Into<String>) {
        match &mut self.kind {
            WidgetKind::Window { title: text }
            | WidgetKind::Label { text }
            | WidgetKind::Button { text }
            | WidgetKind::Checkbox { text, .. }
            | WidgetKind::Radio { text, .. }
            | WidgetKind::StatusBar { text }
            | WidgetKind::Notification { text, .. } => *text = new.into(),
            WidgetKind::Textbox(input) => input.set_text(new),
            WidgetKind::Editor(editor) => editor.set_text(&new.into()),
            _ => {}
        }
    }

    /// Checkbox state or radio selection.
    pub const fn is_checked(&self) -> bool {
        match &self.kind {
            WidgetKind::Checkbox { checked, .. } => *checked,
            WidgetKind::Radio { selected, .. } => *selected,
            _ => false,
        }
    }

    /// Set a checkbox. Radios go through
    /// [`WidgetTree::select_radio`](super::WidgetTree::select_radio) so the
    /// group stays exclusive.
    pub fn set_checked(&mut self, value: bool) {
        if let WidgetKind::Checkbox { checked, .. } = &mut self.kind {
            *checked = value;
        }
    }

    /// Progress fraction or slider value.
    pub const fn value(&self) -> Option<f32> {
        match &self.kind {
            WidgetKind::Progress { value } => Some(*value),
            WidgetKind::Slider(slider) => Some(slider.value()),
            _ => None,
        }
    }

    /// Set a progress fraction or slider value. Sliders clamp into range.
    pub fn set_value(&mut self, new: f32) {
        match &mut self.kind {
            WidgetKind::Progress { value } => *value = new,
            WidgetKind::Slider(slider) => {
                slider.set_value(new);
            }
            _ => {}
        }
    }

    fn items(&self) -> Option<&ItemList> {
        match &self.kind {
            WidgetKind::List(list)
            | WidgetKind::Dropdown { list, .. }
            | WidgetKind::Menu(list)
            | WidgetKind::Tabs(list) => Some(list),
            _ => None,
        }
    }

    fn items_mut(&mut self) -> Option<&mut ItemList> {
        match &mut self.kind {
            WidgetKind::List(list)
            | WidgetKind::Dropdown { list, .. }
            | WidgetKind::Menu(list)
            | WidgetKind::Tabs(list) => Some(list),
            _ => None,
        }
    }

    /// Selected index of a list, dropdown, menu, or tab strip.
    pub fn selected(&self) -> Option<usize> {
        self.items().and_then(ItemList::selected)
    }

    /// Select an index. Out-of-range indices and other variants are ignored.
    pub fn set_selected(&mut self, index: usize) {
        if let Some(list) = self.items_mut() {
            list.select(index);
        }
    }

    /// Append an item to a list, dropdown, menu, or tab strip.
    pub fn push_item(&mut self, item: impl Into<String>) {
        if let Some(list) = self.items_mut() {
            list.push(item);
        }
    }

    /// Spinner state, for starting and stopping the animation.
    pub fn spinner_mut(&mut self) -> Option<&mut Spinner> {
        match &mut self.kind {
            WidgetKind::Spinner(spinner) => Some(spinner),
            _ => None,
        }
    }

    /// Set a table cell. Ignored for other variants.
    pub fn set_cell(&mut self, row: usize, col: usize, text: impl Into<String>) {
        if let WidgetKind::Table(table) = &mut self.kind {
            table.set_cell(row, col, text);
        }
    }
}

impl std::fmt::Debug for Widget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Widget")
            .field("kind", &self.kind)
            .field("id", &self.id)
            .field("bounds", &self.bounds)
            .field("visible", &self.visible)
            .field("enabled", &self.enabled)
            .field("focused", &self.focused)
            .field("children", &self.children.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_defaults_follow_variant() {
        let button = Widget::button("Save");
        assert!(button.focusable);
        assert_eq!(button.bounds, Rect::new(0, 0, 8, 3));
        assert!(button.visible && button.enabled && !button.is_focused());

        let label = Widget::label("hi");
        assert!(!label.focusable);
        assert_eq!(label.bounds.height, 1);
    }

    #[test]
    fn test_latest_callback_wins() {
        let hits = Rc::new(Cell::new(0));
        let first = Rc::clone(&hits);
        let second = Rc::clone(&hits);
        let mut button = Widget::button("x")
            .on_click(move |_| first.set(first.get() + 1))
            .on_click(move |_| second.set(second.get() + 10));
        button.fire(Hook::Click);
        assert_eq!(hits.get(), 10);
    }

    #[test]
    fn test_callback_can_replace_itself() {
        let hits = Rc::new(Cell::new(0));
        let inner = Rc::clone(&hits);
        let mut button = Widget::button("x").on_click(move |w| {
            let inner = Rc::clone(&inner);
            w.set_on_click(move |_| inner.set(inner.get() + 100));
        });
        button.fire(Hook::Click);
        button.fire(Hook::Click);
        assert_eq!(hits.get(), 100);
    }

    #[test]
    fn test_callback_mutates_widget() {
        let mut label = Widget::checkbox("a").on_change(|w| w.set_text("changed"));
        label.fire(Hook::Change);
        assert_eq!(label.text(), Some("changed"));
        label.fire(Hook::Blur);
    }

    #[test]
    fn test_accessors_ignore_other_variants() {
        let mut label = Widget::label("x");
        label.set_selected(3);
        label.set_value(0.5);
        label.set_checked(true);
        assert_eq!(label.selected(), None);
        assert_eq!(label.value(), None);
        assert!(!label.is_checked());

        let mut list = Widget::list(["a", "b"]);
        list.set_selected(5);
        assert_eq!(list.selected(), Some(0));
        list.set_selected(1);
        assert_eq!(list.selected(), Some(1));
    }

    #[test]
    fn test_slider_value_clamps() {
        let mut slider = Widget::slider(0.0, 1.0, 0.5);
        slider.set_value(4.0);
        assert_eq!(slider.value(), Some(1.0));
    }
}
