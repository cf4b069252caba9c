//! Widget arena: ownership, lookup, and focus.
//!
//! Every widget lives in one [`SlotMap`]. Parents own their children through
//! the `children` list; the `parent` link is only used to find a node's root.
//! Handles to destroyed widgets go stale and every operation treats them as
//! absent.

use super::kind::WidgetKind;
use super::node::{Hook, Widget};
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle to a widget in a [`WidgetTree`].
    pub struct NodeId;
}

/// Owner of every widget and the links between them.
///
/// A tree may hold several disconnected roots. The focus invariant holds per
/// connected tree: at most one node reachable from a root is focused.
#[derive(Default)]
pub struct WidgetTree {
    arena: SlotMap<NodeId, Widget>,
}

impl WidgetTree {
    /// An empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live widgets.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Whether there are no widgets.
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Whether `id` refers to a live widget.
    pub fn contains(&self, id: NodeId) -> bool {
        self.arena.contains_key(id)
    }

    /// Add a detached widget and return its handle.
    pub fn insert(&mut self, mut widget: Widget) -> NodeId {
        widget.parent = None;
        widget.children.clear();
        widget.focused = false;
        self.arena.insert(widget)
    }

    /// Borrow a widget.
    pub fn get(&self, id: NodeId) -> Option<&Widget> {
        self.arena.get(id)
    }

    /// Mutably borrow a widget.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Widget> {
        self.arena.get_mut(id)
    }

    /// Whether `ancestor` is `id` or one of its ancestors.
    fn is_ancestor_or_self(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.arena.get(node).and_then(|w| w.parent);
        }
        false
    }

    /// Append `child` to `parent`'s children, moving it from any old parent.
    ///
    /// Returns `false` without changes for stale handles or when the move
    /// would create a cycle. If both trees hold focus, the incoming subtree
    /// loses it.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if !self.contains(parent) || !self.contains(child) {
            return false;
        }
        if self.is_ancestor_or_self(child, parent) {
            tracing::debug!("add_child refused: would create a cycle");
            return false;
        }
        self.detach(child);

        if let Some(incoming) = self.focused_in(child) {
            if self.focused_in(self.root_of(parent)).is_some() {
                self.blur(incoming);
            }
        }

        if let Some(widget) = self.arena.get_mut(child) {
            widget.parent = Some(parent);
        }
        if let Some(widget) = self.arena.get_mut(parent) {
            widget.children.push(child);
        }
        true
    }

    /// Detach `child` from `parent`, keeping sibling order. The child
    /// becomes a root and stays alive.
    ///
    /// Returns `false` if `child` is not a child of `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if self.arena.get(child).and_then(|w| w.parent) != Some(parent) {
            return false;
        }
        self.detach(child);
        true
    }

    fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.arena.get_mut(id).and_then(|w| w.parent.take()) else {
            return;
        };
        if let Some(widget) = self.arena.get_mut(parent) {
            widget.children.retain(|&c| c != id);
        }
    }

    /// Remove a widget and its whole subtree. Returns `false` for stale handles.
    pub fn destroy(&mut self, id: NodeId) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.detach(id);
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            if let Some(widget) = self.arena.remove(node) {
                stack.extend(widget.children);
            }
        }
        true
    }

    /// `root` and everything below it in pre-order (parent, then children
    /// in insertion order).
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        self.walk(root, |_| true)
    }

    /// Pre-order walk that skips the subtree of any node failing `enter`.
    pub(crate) fn walk(&self, root: NodeId, enter: impl Fn(&Widget) -> bool) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(widget) = self.arena.get(id) else {
                continue;
            };
            if !enter(widget) {
                continue;
            }
            out.push(id);
            stack.extend(widget.children.iter().rev());
        }
        out
    }

    /// First widget under `root`, in pre-order, whose identifier is `id`.
    pub fn find_by_id(&self, root: NodeId, id: &str) -> Option<NodeId> {
        self.descendants(root)
            .into_iter()
            .find(|&node| self.arena[node].id.as_deref() == Some(id))
    }

    /// Topmost ancestor of `id`, or `id` itself when detached.
    pub fn root_of(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(parent) = self.arena.get(current).and_then(|w| w.parent) {
            current = parent;
        }
        current
    }

    /// The focused widget in the tree rooted at `root`.
    pub fn focused_in(&self, root: NodeId) -> Option<NodeId> {
        self.descendants(root).into_iter().find(|&node| self.arena[node].focused)
    }

    pub(crate) fn fire(&mut self, id: NodeId, hook: Hook) {
        if let Some(widget) = self.arena.get_mut(id) {
            widget.fire(hook);
        }
    }

    /// Move focus to `id`.
    ///
    /// No-op for widgets that are not focusable. Otherwise the previously
    /// focused widget in the same tree is blurred, `id` is marked focused,
    /// and its focus callback runs.
    pub fn focus(&mut self, id: NodeId) -> bool {
        if !self.arena.get(id).is_some_and(|w| w.focusable) {
            return false;
        }
        if let Some(current) = self.focused_in(self.root_of(id)) {
            if current != id {
                self.blur(current);
            }
        }
        if let Some(widget) = self.arena.get_mut(id) {
            widget.focused = true;
        }
        self.fire(id, Hook::Focus);
        true
    }

    /// Clear focus on `id` and run its blur callback, focused or not.
    pub fn blur(&mut self, id: NodeId) {
        if let Some(widget) = self.arena.get_mut(id) {
            widget.focused = false;
        }
        self.fire(id, Hook::Blur);
    }

    /// Widgets Tab can reach: focusable, and not inside a hidden or
    /// disabled subtree.
    pub fn focus_order(&self, root: NodeId) -> Vec<NodeId> {
        self.walk(root, |w| w.visible && w.enabled)
            .into_iter()
            .filter(|&node| self.arena[node].focusable)
            .collect()
    }

    /// Focus the next reachable widget after the focused one, wrapping.
    ///
    /// Returns the newly focused widget, or `None` if nothing is reachable.
    pub fn focus_next(&mut self, root: NodeId) -> Option<NodeId> {
        self.cycle_focus(root, true)
    }

    /// Focus the previous reachable widget, wrapping.
    pub fn focus_prev(&mut self, root: NodeId) -> Option<NodeId> {
        self.cycle_focus(root, false)
    }

    fn cycle_focus(&mut self, root: NodeId, forward: bool) -> Option<NodeId> {
        let order = self.focus_order(root);
        if order.is_empty() {
            return None;
        }
        let current = self
            .focused_in(root)
            .and_then(|focused| order.iter().position(|&node| node == focused));
        let len = order.len();
        let next = match (current, forward) {
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
            (None, true) => 0,
            (None, false) => len - 1,
        };
        let target = order[next];
        self.focus(target);
        Some(target)
    }

    /// Select a radio button and clear the others in its group among its
    /// siblings. Callbacks do not run.
    pub fn select_radio(&mut self, id: NodeId) -> bool {
        let Some(WidgetKind::Radio { group, selected, .. }) =
            self.arena.get_mut(id).map(|w| &mut w.kind)
        else {
            return false;
        };
        *selected = true;
        let group = *group;
        self.clear_radio_group(id, group);
        true
    }

    /// Deselect radios in `group` that share a parent with `id`.
    pub(crate) fn clear_radio_group(&mut self, id: NodeId, group: i32) {
        let Some(parent) = self.arena.get(id).and_then(|w| w.parent) else {
            return;
        };
        let siblings = self.arena[parent].children.clone();
        for sibling in siblings.into_iter().filter(|&s| s != id) {
            if let Some(WidgetKind::Radio { group: g, selected, .. }) =
                self.arena.get_mut(sibling).map(|w| &mut w.kind)
            {
                if *g == group {
                    *selected = false;
                }
            }
        }
    }
}

impl std::fmt::Debug for WidgetTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetTree").field("widgets", &self.arena.len()).finish()
    }
}
