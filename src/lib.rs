//! # Tessel
//!
//! A retained-mode terminal UI engine.
//!
//! Tessel keeps a tree of widgets, draws them into a cell grid, and writes
//! only the cells that changed since the last frame.
//!
//! ## Core Concepts
//!
//! - **Double-buffered rendering**: front and back cell buffers with a minimal diff
//! - **Capability-aware output**: Unicode or ASCII glyphs, truecolor or palette colors
//! - **Widget tree**: a closed set of widget variants with focus and event dispatch
//! - **Scoped terminal state**: raw mode and the alternate screen are always restored
//!
//! ## Example
//!
//! ```rust,ignore
//! use tessel::{App, AppConfig, Widget};
//!
//! let mut app = App::new(AppConfig::default().with_title("Hello"));
//! let quit = app.quit_handle();
//! app.add(Widget::label("Press the button or Esc").with_bounds(2, 2, 30, 1));
//! let button = app.add(Widget::button("Quit").with_bounds(2, 4, 10, 3).on_click(move |_| {
//!     quit.request();
//! }));
//! app.tree_mut().focus(button);
//! app.run()?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod app;
pub mod buffer;
pub mod error;
pub mod event;
pub mod geom;
pub mod render;
pub mod style;
pub mod terminal;
pub mod widget;

// Re-exports for convenience
pub use app::{App, AppConfig, QuitHandle};
pub use buffer::{Buffer, Cell, Glyph, Modifiers, PresentStats};
pub use error::{Error, Result};
pub use event::{Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent};
pub use geom::Rect;
pub use render::{RenderStats, Renderer};
pub use style::{BorderChars, BorderStyle, ColorDepth, Spacing, StyleColor, Theme};
pub use terminal::{Capabilities, Platform, TerminalSession};
pub use widget::{NodeId, Widget, WidgetKind, WidgetTree};
