//! Widget tree: a closed set of widget variants arranged in a hierarchy.
//!
//! Widgets live in a [`WidgetTree`] arena and are addressed by [`NodeId`].
//! The tree owns focus, dispatches [`Event`](crate::Event)s, advances
//! animations, and draws into a [`Renderer`](crate::Renderer).
//!
//! # Example
//!
//! ```rust,ignore
//! use tessel::widget::{Widget, WidgetTree};
//!
//! let mut tree = WidgetTree::new();
//! let root = tree.insert(Widget::window("Demo").with_bounds(0, 0, 40, 10));
//! let ok = tree.insert(Widget::button("OK").with_bounds(2, 2, 8, 3).on_click(|w| {
//!     w.set_text("Done");
//! }));
//! tree.add_child(root, ok);
//! tree.focus(ok);
//! ```

mod dispatch;
mod kind;
mod node;
mod render;
mod spinner;
mod tree;

pub use kind::{Editor, ItemList, Slider, Table, TextInput, WidgetKind, NOTIFICATION_TIMEOUT};
pub use node::{Callback, RenderFn, Widget};
pub use spinner::{Spinner, SpinnerStyle};
pub use tree::{NodeId, WidgetTree};
