//! Widget variants, their state, and how each reacts to keys and text.
//!
//! Everything here is pure state manipulation. Callbacks and focus live in
//! the tree; a variant only reports what happened through [`Reaction`].

use super::spinner::{Spinner, SpinnerStyle};
use crate::event::{KeyCode, KeyEvent};
use std::time::Duration;

/// How long a notification stays visible.
pub const NOTIFICATION_TIMEOUT: Duration = Duration::from_millis(3000);

/// What applying an input to a variant did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Reaction {
    /// Not handled; keep propagating.
    Ignored,
    /// Handled without a state change callers care about.
    Consumed,
    /// State changed: fire the change callback.
    Changed,
    /// Activated: fire the click callback.
    Click,
    /// A radio button became selected in this group.
    RadioSelected(i32),
}

impl Reaction {
    const fn changed_if(moved: bool) -> Self {
        if moved {
            Self::Changed
        } else {
            Self::Ignored
        }
    }
}

fn is_space(key: &KeyEvent) -> bool {
    key.printable_ascii() == Some(' ')
}

/// Byte offset of the `col`-th character, or the end of the line.
fn byte_offset(line: &str, col: usize) -> usize {
    line.char_indices().nth(col).map_or(line.len(), |(i, _)| i)
}

/// Ordered items with an optional selection.
///
/// Lists built with [`ItemList::new`] always have a selection while they
/// have items, and none when empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemList {
    items: Vec<String>,
    selected: Option<usize>,
    scroll: usize,
}

impl ItemList {
    /// Items with the first one selected.
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items: Vec<String> = items.into_iter().map(Into::into).collect();
        let selected = (!items.is_empty()).then_some(0);
        Self { items, selected, scroll: 0 }
    }

    /// Items with nothing selected yet.
    pub fn unselected<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { selected: None, ..Self::new(items) }
    }

    /// All items.
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether there are no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Selected index.
    pub const fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Selected item text.
    pub fn selected_item(&self) -> Option<&str> {
        self.selected.and_then(|i| self.items.get(i)).map(String::as_str)
    }

    /// Select `index`. Out-of-range indices are ignored.
    ///
    /// Returns whether the selection changed.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.items.len() || self.selected == Some(index) {
            return false;
        }
        self.selected = Some(index);
        true
    }

    /// Replace the items and select the first.
    pub fn set_items<I, S>(&mut self, items: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        *self = Self::new(items);
    }

    /// Append an item, selecting it if it is the first.
    pub fn push(&mut self, item: impl Into<String>) {
        self.items.push(item.into());
        if self.selected.is_none() && self.items.len() == 1 {
            self.selected = Some(0);
        }
    }

    /// First visible row.
    pub const fn scroll(&self) -> usize {
        self.scroll
    }

    /// Move the selection by `delta`, clamped to the ends.
    ///
    /// With nothing selected, any move selects the first item. Returns
    /// whether the selection changed.
    pub fn move_by(&mut self, delta: isize) -> bool {
        let Some(last) = self.items.len().checked_sub(1) else {
            return false;
        };
        let next = match self.selected {
            None => 0,
            Some(current) => current.saturating_add_signed(delta).min(last),
        };
        if self.selected == Some(next) {
            return false;
        }
        self.selected = Some(next);
        true
    }

    /// Adjust scrolling so the selection is among `visible` rows.
    pub(crate) fn scroll_into_view(&mut self, visible: usize) {
        let Some(selected) = self.selected else {
            self.scroll = 0;
            return;
        };
        if visible == 0 {
            return;
        }
        if selected < self.scroll {
            self.scroll = selected;
        } else if selected >= self.scroll + visible {
            self.scroll = selected + 1 - visible;
        }
    }
}

/// Single-line text field contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    text: String,
}

impl TextInput {
    /// A field holding `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Current contents.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the contents.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Cursor column: always after the last character.
    pub fn cursor(&self) -> usize {
        self.text.chars().count()
    }

    fn apply_key(&mut self, key: &KeyEvent) -> Reaction {
        if let Some(c) = key.printable_ascii() {
            self.text.push(c);
            return Reaction::Changed;
        }
        if key.code == KeyCode::Backspace {
            return Reaction::changed_if(self.text.pop().is_some());
        }
        Reaction::Ignored
    }

    fn apply_text(&mut self, text: &str) -> Reaction {
        let before = self.text.len();
        self.text.extend(text.chars().filter(|c| !c.is_control()));
        Reaction::changed_if(self.text.len() != before)
    }
}

/// Multi-line text buffer with a cursor and vertical scrolling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Editor {
    lines: Vec<String>,
    row: usize,
    col: usize,
    scroll: usize,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new("")
    }
}

impl Editor {
    /// An editor holding `text`, cursor at the start.
    pub fn new(text: &str) -> Self {
        Self { lines: text.split('\n').map(str::to_owned).collect(), row: 0, col: 0, scroll: 0 }
    }

    /// Contents joined with `\n`.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Replace the contents and reset the cursor.
    pub fn set_text(&mut self, text: &str) {
        *self = Self::new(text);
    }

    /// All lines.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// `(row, column)` of the cursor, in characters.
    pub const fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    /// First visible line.
    pub const fn scroll(&self) -> usize {
        self.scroll
    }

    fn line_len(&self, row: usize) -> usize {
        self.lines.get(row).map_or(0, |l| l.chars().count())
    }

    fn current_line(&mut self) -> &mut String {
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
        let row = self.row.min(self.lines.len() - 1);
        &mut self.lines[row]
    }

    /// Insert a character at the cursor.
    pub fn insert_char(&mut self, c: char) {
        if c == '\n' {
            self.newline();
            return;
        }
        let col = self.col;
        let line = self.current_line();
        let at = byte_offset(line, col);
        line.insert(at, c);
        self.col += 1;
    }

    /// Split the line at the cursor.
    pub fn newline(&mut self) {
        let col = self.col;
        let line = self.current_line();
        let rest = line.split_off(byte_offset(line, col));
        self.lines.insert(self.row + 1, rest);
        self.row += 1;
        self.col = 0;
    }

    /// Delete before the cursor, joining with the previous line at column 0.
    pub fn backspace(&mut self) -> bool {
        if self.col > 0 {
            let col = self.col;
            let line = self.current_line();
            let at = byte_offset(line, col - 1);
            line.remove(at);
            self.col -= 1;
            return true;
        }
        if self.row == 0 {
            return false;
        }
        let line = self.lines.remove(self.row);
        self.row -= 1;
        self.col = self.line_len(self.row);
        self.current_line().push_str(&line);
        true
    }

    /// Delete under the cursor, joining with the next line at the end.
    pub fn delete(&mut self) -> bool {
        if self.col < self.line_len(self.row) {
            let col = self.col;
            let line = self.current_line();
            let at = byte_offset(line, col);
            line.remove(at);
            return true;
        }
        if self.row + 1 >= self.lines.len() {
            return false;
        }
        let next = self.lines.remove(self.row + 1);
        self.current_line().push_str(&next);
        true
    }

    fn move_to(&mut self, row: usize, col: usize) -> bool {
        let row = row.min(self.lines.len().saturating_sub(1));
        let col = col.min(self.line_len(row));
        let moved = (row, col) != (self.row, self.col);
        self.row = row;
        self.col = col;
        moved
    }

    /// Keep the cursor row among `visible` rows.
    pub(crate) fn scroll_into_view(&mut self, visible: usize) {
        if visible == 0 {
            return;
        }
        if self.row < self.scroll {
            self.scroll = self.row;
        } else if self.row >= self.scroll + visible {
            self.scroll = self.row + 1 - visible;
        }
    }

    fn apply_key(&mut self, key: &KeyEvent) -> Reaction {
        if let Some(c) = key.printable_ascii() {
            self.insert_char(c);
            return Reaction::Changed;
        }
        let (row, col) = (self.row, self.col);
        let moved = match key.code {
            KeyCode::Enter => {
                self.newline();
                return Reaction::Changed;
            }
            KeyCode::Backspace => return Reaction::changed_if(self.backspace()),
            KeyCode::Delete => return Reaction::changed_if(self.delete()),
            KeyCode::Left if col > 0 => self.move_to(row, col - 1),
            KeyCode::Left if row > 0 => self.move_to(row - 1, self.line_len(row - 1)),
            KeyCode::Right if col < self.line_len(row) => self.move_to(row, col + 1),
            KeyCode::Right => self.move_to(row + 1, 0),
            KeyCode::Up if row > 0 => self.move_to(row - 1, col),
            KeyCode::Down => self.move_to(row + 1, col),
            KeyCode::Home => self.move_to(row, 0),
            KeyCode::End => self.move_to(row, usize::MAX),
            _ => false,
        };
        if moved {
            Reaction::Consumed
        } else {
            Reaction::Ignored
        }
    }

    fn apply_text(&mut self, text: &str) -> Reaction {
        let mut changed = false;
        for c in text.chars().filter(|c| *c == '\n' || !c.is_control()) {
            self.insert_char(c);
            changed = true;
        }
        Reaction::changed_if(changed)
    }
}

/// Horizontal value picker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slider {
    min: f32,
    max: f32,
    value: f32,
    step: f32,
}

impl Slider {
    /// Steps across the full range for the default step size.
    pub const DEFAULT_STEPS: f32 = 20.0;

    /// A slider over `[min, max]`. `value` is clamped into range.
    ///
    /// A NaN bound becomes 0 and infinite bounds saturate to the finite range.
    pub fn new(min: f32, max: f32, value: f32) -> Self {
        let (a, b) = (finite_bound(min), finite_bound(max));
        let (min, max) = (a.min(b), a.max(b));
        let span = max / Self::DEFAULT_STEPS - min / Self::DEFAULT_STEPS;
        let step = if span > 0.0 { span } else { 1.0 };
        let mut slider = Self { min, max, value: min, step };
        slider.set_value(value);
        slider
    }

    /// Lower bound.
    pub const fn min(&self) -> f32 {
        self.min
    }

    /// Upper bound.
    pub const fn max(&self) -> f32 {
        self.max
    }

    /// Current value.
    pub const fn value(&self) -> f32 {
        self.value
    }

    /// Amount one arrow key moves the value.
    pub const fn step(&self) -> f32 {
        self.step
    }

    /// Change the arrow-key step. Non-positive and non-finite steps are ignored.
    pub fn set_step(&mut self, step: f32) {
        if step > 0.0 && step.is_finite() {
            self.step = step;
        }
    }

    /// Set the value, clamped into range. NaN is ignored.
    ///
    /// Returns whether the value changed.
    pub fn set_value(&mut self, value: f32) -> bool {
        if value.is_nan() {
            return false;
        }
        let value = value.max(self.min).min(self.max);
        #[allow(clippy::float_cmp)]
        let changed = value != self.value;
        self.value = value;
        changed
    }

    /// Position in `[0, 1]`; zero for an empty range.
    pub fn normalized(&self) -> f32 {
        let span = self.max / 2.0 - self.min / 2.0;
        if span > 0.0 {
            ((self.value / 2.0 - self.min / 2.0) / span).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    fn apply_key(&mut self, key: &KeyEvent) -> Reaction {
        let target = match key.code {
            KeyCode::Left => self.value - self.step,
            KeyCode::Right => self.value + self.step,
            _ => return Reaction::Ignored,
        };
        Reaction::changed_if(self.set_value(target))
    }
}

fn finite_bound(bound: f32) -> f32 {
    if bound.is_nan() {
        0.0
    } else {
        bound.clamp(f32::MIN, f32::MAX)
    }
}

/// Grid of text cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    rows: usize,
    cols: usize,
    cells: Vec<String>,
}

impl Table {
    /// An empty `rows` × `cols` table.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols, cells: vec![String::new(); rows * cols] }
    }

    /// Number of rows.
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Text at (row, col).
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells.get(row * self.cols + col).map(String::as_str)
    }

    /// Set the text at (row, col). Out-of-range positions are ignored.
    pub fn set_cell(&mut self, row: usize, col: usize, text: impl Into<String>) {
        if row >= self.rows || col >= self.cols {
            return;
        }
        if let Some(cell) = self.cells.get_mut(row * self.cols + col) {
            *cell = text.into();
        }
    }
}

/// The closed set of widget variants and their state.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetKind {
    /// Bordered top-level container with a title.
    Window {
        /// Title drawn on the top border.
        title: String,
    },
    /// Bordered container.
    Panel,
    /// Static text.
    Label {
        /// Text to draw.
        text: String,
    },
    /// Clickable button.
    Button {
        /// Caption.
        text: String,
    },
    /// Two-state toggle.
    Checkbox {
        /// Caption.
        text: String,
        /// Current state.
        checked: bool,
    },
    /// One-of-many choice within a group.
    Radio {
        /// Caption.
        text: String,
        /// Radios sharing a group under one parent are mutually exclusive.
        group: i32,
        /// Current state.
        selected: bool,
    },
    /// Progress bar; the value is clamped to `[0, 1]` when drawn.
    Progress {
        /// Fraction complete.
        value: f32,
    },
    /// Value slider.
    Slider(Slider),
    /// Single-line text field.
    Textbox(TextInput),
    /// Multi-line text editor.
    Editor(Editor),
    /// Scrollable list.
    List(ItemList),
    /// Collapsed list showing the selection.
    Dropdown {
        /// Choices.
        list: ItemList,
        /// Whether the choices are shown.
        expanded: bool,
    },
    /// Horizontal menu bar.
    Menu(ItemList),
    /// Tab strip; the selection is the active tab.
    Tabs(ItemList),
    /// Table of text cells.
    Table(Table),
    /// Full-width status line.
    StatusBar {
        /// Text to draw.
        text: String,
    },
    /// Transient message that hides itself after a timeout.
    Notification {
        /// Message.
        text: String,
        /// Time left before it hides.
        remaining: Duration,
    },
    /// Horizontal or vertical rule.
    Separator {
        /// Orientation.
        horizontal: bool,
    },
    /// Animated activity indicator.
    Spinner(Spinner),
    /// Container stacking children vertically.
    VStack,
    /// Container stacking children horizontally.
    HStack,
    /// Container arranging children in cells.
    Grid {
        /// Row count.
        rows: u16,
        /// Column count.
        cols: u16,
    },
}

fn text_width(text: &str) -> i32 {
    i32::try_from(unicode_width::UnicodeWidthStr::width(text)).unwrap_or(i32::MAX)
}

impl WidgetKind {
    /// A notification with the default timeout.
    pub fn notification(text: impl Into<String>) -> Self {
        Self::Notification { text: text.into(), remaining: NOTIFICATION_TIMEOUT }
    }

    /// A stopped spinner.
    pub const fn spinner(style: SpinnerStyle) -> Self {
        Self::Spinner(Spinner::new(style))
    }

    /// Short variant name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Window { .. } => "window",
            Self::Panel => "panel",
            Self::Label { .. } => "label",
            Self::Button { .. } => "button",
            Self::Checkbox { .. } => "checkbox",
            Self::Radio { .. } => "radio",
            Self::Progress { .. } => "progress",
            Self::Slider(_) => "slider",
            Self::Textbox(_) => "textbox",
            Self::Editor(_) => "editor",
            Self::List(_) => "list",
            Self::Dropdown { .. } => "dropdown",
            Self::Menu(_) => "menu",
            Self::Tabs(_) => "tabs",
            Self::Table(_) => "table",
            Self::StatusBar { .. } => "statusbar",
            Self::Notification { .. } => "notification",
            Self::Separator { .. } => "separator",
            Self::Spinner(_) => "spinner",
            Self::VStack => "vstack",
            Self::HStack => "hstack",
            Self::Grid { .. } => "grid",
        }
    }

    /// Whether new widgets of this variant take keyboard focus.
    pub const fn focusable_by_default(&self) -> bool {
        matches!(
            self,
            Self::Button { .. }
                | Self::Checkbox { .. }
                | Self::Radio { .. }
                | Self::Slider(_)
                | Self::Textbox(_)
                | Self::Editor(_)
                | Self::List(_)
                | Self::Dropdown { .. }
                | Self::Menu(_)
                | Self::Tabs(_)
        )
    }

    /// Initial `(width, height)` for a new widget.
    pub fn default_size(&self) -> (i32, i32) {
        match self {
            Self::Label { text } => (text_width(text), 1),
            Self::Button { text } => (text_width(text).saturating_add(4), 3),
            Self::Checkbox { text, .. } | Self::Radio { text, .. } => {
                (text_width(text).saturating_add(4), 1)
            }
            Self::Progress { .. } | Self::Slider(_) => (20, 1),
            Self::Textbox(_) => (30, 3),
            Self::Editor(_) => (40, 10),
            Self::List(_) => (30, 10),
            Self::Dropdown { .. } => (20, 3),
            Self::Menu(_) | Self::Tabs(_) => (50, 1),
            Self::Table(table) => {
                let cols = i32::try_from(table.cols()).unwrap_or(0);
                let rows = i32::try_from(table.rows()).unwrap_or(0);
                (cols.saturating_mul(10).saturating_add(2), rows.saturating_add(2))
            }
            Self::StatusBar { .. } => (80, 1),
            Self::Notification { .. } => (40, 3),
            Self::Separator { horizontal: true } => (40, 1),
            Self::Separator { horizontal: false } => (1, 10),
            Self::Grid { rows, cols } => (i32::from(*cols) * 10, i32::from(*rows) * 3),
            _ => (10, 3),
        }
    }

    /// Apply a key to a focused widget of this variant.
    ///
    /// `has_click` says whether a click handler is attached: Enter on a
    /// button or list is only consumed when something listens.
    pub(crate) fn apply_key(&mut self, key: &KeyEvent, has_click: bool) -> Reaction {
        match self {
            Self::Button { .. } if key.code == KeyCode::Enter && has_click => Reaction::Click,
            Self::Checkbox { checked, .. } if is_space(key) => {
                *checked = !*checked;
                Reaction::Changed
            }
            Self::Radio { group, selected, .. } if is_space(key) || key.code == KeyCode::Enter => {
                if *selected {
                    return Reaction::Consumed;
                }
                *selected = true;
                Reaction::RadioSelected(*group)
            }
            Self::Textbox(input) => input.apply_key(key),
            Self::Editor(editor) => editor.apply_key(key),
            Self::Slider(slider) => slider.apply_key(key),
            Self::List(list) => match key.code {
                KeyCode::Down => Reaction::changed_if(list.move_by(1)),
                KeyCode::Up => Reaction::changed_if(list.move_by(-1)),
                KeyCode::Enter if has_click => Reaction::Click,
                _ => Reaction::Ignored,
            },
            Self::Dropdown { list, expanded } => match key.code {
                KeyCode::Enter => {
                    *expanded = !*expanded;
                    Reaction::Consumed
                }
                _ if is_space(key) => {
                    *expanded = !*expanded;
                    Reaction::Consumed
                }
                KeyCode::Down => Reaction::changed_if(list.move_by(1)),
                KeyCode::Up => Reaction::changed_if(list.move_by(-1)),
                _ => Reaction::Ignored,
            },
            Self::Menu(items) => match key.code {
                KeyCode::Right => Reaction::changed_if(items.move_by(1)),
                KeyCode::Left => Reaction::changed_if(items.move_by(-1)),
                KeyCode::Enter if has_click && items.selected().is_some() => Reaction::Click,
                _ => Reaction::Ignored,
            },
            Self::Tabs(tabs) => match key.code {
                KeyCode::Right => Reaction::changed_if(tabs.move_by(1)),
                KeyCode::Left => Reaction::changed_if(tabs.move_by(-1)),
                _ => Reaction::Ignored,
            },
            _ => Reaction::Ignored,
        }
    }

    /// Apply typed or pasted text to a focused widget of this variant.
    pub(crate) fn apply_text(&mut self, text: &str) -> Reaction {
        match self {
            Self::Textbox(input) => input.apply_text(text),
            Self::Editor(editor) => editor.apply_text(text),
            _ => Reaction::Ignored,
        }
    }
}
