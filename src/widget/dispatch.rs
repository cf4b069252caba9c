//! Event dispatch and animation ticks.
//!
//! Dispatch visits children before their parent, topmost child first, and
//! stops at the first widget that consumes the event. Hidden or disabled
//! widgets are skipped together with everything below them.

use super::kind::{ItemList, Reaction, WidgetKind};
use super::node::{Hook, Widget};
use super::tree::{NodeId, WidgetTree};
use crate::event::{Event, KeyCode, KeyEvent, MouseButton, MouseEvent};
use std::time::Duration;
use unicode_width::UnicodeWidthStr;

/// Rows inside a one-cell border.
fn inner_rows(widget: &Widget) -> usize {
    usize::try_from(widget.bounds.height.saturating_sub(2)).unwrap_or(0)
}

/// Keep a list's selection or an editor's cursor on screen.
fn follow_cursor(widget: &mut Widget) {
    let rows = inner_rows(widget);
    match &mut widget.kind {
        WidgetKind::List(list) => list.scroll_into_view(rows),
        WidgetKind::Editor(editor) => editor.scroll_into_view(rows),
        _ => {}
    }
}

/// Index of the menu item or tab under column offset `dx`.
///
/// Each entry occupies its text width plus two columns.
fn strip_index(items: &ItemList, dx: i32) -> Option<usize> {
    let mut start = 0i32;
    for (i, item) in items.items().iter().enumerate() {
        let slot = i32::try_from(item.width()).unwrap_or(i32::MAX).saturating_add(2);
        if dx >= start && dx < start.saturating_add(slot) {
            return Some(i);
        }
        start = start.saturating_add(slot);
    }
    None
}

/// React to a left press at (x, y) inside a focusable widget.
fn press(widget: &mut Widget, x: i32, y: i32) -> Reaction {
    let has_click = widget.has_click_handler();
    let (dx, dy) = (x.saturating_sub(widget.bounds.x), y.saturating_sub(widget.bounds.y));
    let width = widget.bounds.width;
    let rows = inner_rows(widget);
    match &mut widget.kind {
        WidgetKind::Button { .. } if has_click => Reaction::Click,
        WidgetKind::Checkbox { checked, .. } => {
            *checked = !*checked;
            Reaction::Changed
        }
        WidgetKind::Radio { group, selected, .. } => {
            if *selected {
                return Reaction::Consumed;
            }
            *selected = true;
            Reaction::RadioSelected(*group)
        }
        WidgetKind::List(list) => {
            let row = usize::try_from(dy.saturating_sub(1))
                .ok()
                .filter(|&r| r < rows)
                .map(|r| r + list.scroll());
            match row {
                Some(index) if list.select(index) => Reaction::Changed,
                Some(index) if index < list.len() && has_click => Reaction::Click,
                _ => Reaction::Consumed,
            }
        }
        WidgetKind::Dropdown { expanded, .. } => {
            *expanded = !*expanded;
            Reaction::Consumed
        }
        WidgetKind::Menu(items) => match strip_index(items, dx) {
            Some(index) => {
                items.select(index);
                if has_click {
                    Reaction::Click
                } else {
                    Reaction::Changed
                }
            }
            None => Reaction::Consumed,
        },
        WidgetKind::Tabs(tabs) => match strip_index(tabs, dx) {
            Some(index) if tabs.select(index) => Reaction::Changed,
            _ => Reaction::Consumed,
        },
        WidgetKind::Slider(slider) => {
            let span = width.saturating_sub(1).max(1);
            #[allow(clippy::cast_precision_loss)]
            let t = dx.clamp(0, span) as f32 / span as f32;
            let target = slider.max().mul_add(t, slider.min() * (1.0 - t));
            if slider.set_value(target) {
                Reaction::Changed
            } else {
                Reaction::Consumed
            }
        }
        _ => Reaction::Consumed,
    }
}

/// Scroll a hovered list or editor by one row.
fn wheel(widget: &mut Widget, down: bool) -> Reaction {
    match &mut widget.kind {
        WidgetKind::List(list) | WidgetKind::Dropdown { list, .. } => {
            if list.move_by(if down { 1 } else { -1 }) {
                Reaction::Changed
            } else {
                Reaction::Consumed
            }
        }
        editor @ WidgetKind::Editor(_) => {
            let code = if down { KeyCode::Down } else { KeyCode::Up };
            match editor.apply_key(&KeyEvent::new(code), false) {
                Reaction::Ignored => Reaction::Consumed,
                other => other,
            }
        }
        _ => Reaction::Ignored,
    }
}

impl WidgetTree {
    /// Deliver `event` to the tree rooted at `root`.
    ///
    /// Tab and Shift+Tab move focus through [`WidgetTree::focus_order`] and
    /// are always consumed. Everything else goes to the deepest, topmost
    /// widget willing to take it. Returns whether any widget consumed it.
    pub fn dispatch(&mut self, root: NodeId, event: &Event) -> bool {
        if !self.get(root).is_some_and(|w| w.visible && w.enabled) {
            return false;
        }
        if let Some(forward) = event.as_key().and_then(KeyEvent::focus_direction) {
            let top = self.root_of(root);
            let moved = if forward { self.focus_next(top) } else { self.focus_prev(top) };
            tracing::trace!(?moved, forward, "focus traversal");
            return true;
        }
        self.dispatch_node(root, event)
    }

    fn dispatch_node(&mut self, id: NodeId, event: &Event) -> bool {
        let Some(widget) = self.get(id) else {
            return false;
        };
        if !widget.visible || !widget.enabled {
            return false;
        }
        let children = widget.children.clone();
        for child in children.into_iter().rev() {
            if self.dispatch_node(child, event) {
                return true;
            }
        }
        self.handle(id, event)
    }

    /// Let one widget react to `event` on its own.
    fn handle(&mut self, id: NodeId, event: &Event) -> bool {
        let Some(widget) = self.get_mut(id) else {
            return false;
        };
        let reaction = match event {
            Event::Key(key) if widget.focused => {
                let has_click = widget.has_click_handler();
                widget.kind.apply_key(key, has_click)
            }
            Event::Text(text) if widget.focused => widget.kind.apply_text(text),
            Event::Mouse(mouse) => return self.handle_mouse(id, mouse),
            _ => Reaction::Ignored,
        };
        self.react(id, reaction)
    }

    fn handle_mouse(&mut self, id: NodeId, mouse: &MouseEvent) -> bool {
        let (x, y) = (i32::from(mouse.x), i32::from(mouse.y));
        let Some(widget) = self.get_mut(id) else {
            return false;
        };
        if !widget.bounds.contains(x, y) {
            return false;
        }
        let reaction = match mouse.button {
            MouseButton::WheelUp => wheel(widget, false),
            MouseButton::WheelDown => wheel(widget, true),
            MouseButton::Left if mouse.pressed && widget.focusable => {
                self.focus(id);
                match self.get_mut(id) {
                    Some(widget) => press(widget, x, y),
                    None => Reaction::Consumed,
                }
            }
            _ => Reaction::Ignored,
        };
        self.react(id, reaction)
    }

    /// Run callbacks for a reaction. Returns whether the event was consumed.
    fn react(&mut self, id: NodeId, reaction: Reaction) -> bool {
        if let Some(widget) = self.get_mut(id) {
            follow_cursor(widget);
        }
        match reaction {
            Reaction::Ignored => false,
            Reaction::Consumed => true,
            Reaction::Changed => {
                self.fire(id, Hook::Change);
                true
            }
            Reaction::Click => {
                self.fire(id, Hook::Click);
                true
            }
            Reaction::RadioSelected(group) => {
                self.clear_radio_group(id, group);
                self.fire(id, Hook::Change);
                true
            }
        }
    }

    /// Advance time for the tree rooted at `root`.
    ///
    /// Running spinners move one frame; visible notifications count down
    /// and hide themselves when their time is up. Returns whether anything
    /// on screen changed.
    pub fn tick(&mut self, root: NodeId, elapsed: Duration) -> bool {
        let mut changed = false;
        for id in self.descendants(root) {
            let Some(widget) = self.get_mut(id) else {
                continue;
            };
            match &mut widget.kind {
                WidgetKind::Spinner(spinner) => changed |= spinner.tick(),
                WidgetKind::Notification { remaining, .. } if widget.visible => {
                    *remaining = remaining.saturating_sub(elapsed);
                    if remaining.is_zero() {
                        widget.visible = false;
                        changed = true;
                    }
                }
                _ => {}
            }
        }
        changed
    }
}
