//! Application loop: platform, renderer, and widget tree in one place.
//!
//! ```text
//! ┌───────────┐ poll  ┌────────────┐ dispatch ┌────────────┐
//! │ Platform  │──────►│    App     │─────────►│ WidgetTree │
//! └───────────┘       └────────────┘          └────────────┘
//!       ▲                   │ render                 │
//!       │    present  ┌─────▼──────┐                 │
//!       └─────────────│  Renderer  │◄────────────────┘
//!                     └────────────┘
//! ```
//!
//! Everything runs on the calling thread. The poll timeout doubles as the
//! animation interval: every iteration ticks the tree once.

mod config;

pub use config::AppConfig;

use crate::error::Result;
use crate::event::{Event, KeyCode, KeyEvent};
use crate::render::Renderer;
use crate::terminal::{install_panic_hook, Platform, TerminalSession};
use crate::widget::{NodeId, Widget, WidgetTree};
use std::cell::Cell;
use std::io::Write;
use std::rc::Rc;
use std::time::Instant;

/// Shared flag that stops the loop at the end of the current iteration.
///
/// Clone it into callbacks that need to end the application.
#[derive(Debug, Clone, Default)]
pub struct QuitHandle(Rc<Cell<bool>>);

impl QuitHandle {
    /// Ask the loop to stop.
    pub fn request(&self) {
        self.0.set(true);
    }

    /// Whether a stop was requested.
    pub fn is_requested(&self) -> bool {
        self.0.get()
    }

    fn reset(&self) {
        self.0.set(false);
    }
}

/// A widget tree with a full-screen root window, driven by the terminal.
pub struct App {
    config: AppConfig,
    tree: WidgetTree,
    root: NodeId,
    quit: QuitHandle,
}

impl App {
    /// Create an application with an empty root window.
    pub fn new(config: AppConfig) -> Self {
        let mut tree = WidgetTree::new();
        let title = config.title.clone().unwrap_or_default();
        let root = tree.insert(Widget::window(title));
        Self { config, tree, root, quit: QuitHandle::default() }
    }

    /// Settings.
    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The widget tree.
    pub const fn tree(&self) -> &WidgetTree {
        &self.tree
    }

    /// The widget tree, for building and updating the UI.
    pub fn tree_mut(&mut self) -> &mut WidgetTree {
        &mut self.tree
    }

    /// The root window.
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// A handle callbacks can use to stop the loop.
    pub fn quit_handle(&self) -> QuitHandle {
        self.quit.clone()
    }

    /// Insert `widget` as a child of the root window.
    pub fn add(&mut self, widget: Widget) -> NodeId {
        let id = self.tree.insert(widget);
        self.tree.add_child(self.root, id);
        id
    }

    /// Run on the process's terminal until quit.
    ///
    /// Installs the terminal-restoring panic hook first.
    ///
    /// # Errors
    ///
    /// Fails if the terminal cannot be acquired or input cannot be read.
    /// The terminal is restored in every case.
    pub fn run(&mut self) -> Result<()> {
        install_panic_hook();
        let mut platform = Platform::stdout();
        self.run_on(&mut platform)
    }

    /// Run with an existing platform until quit.
    ///
    /// # Errors
    ///
    /// Fails if the terminal cannot be acquired or input cannot be read.
    pub fn run_on<W: Write>(&mut self, platform: &mut Platform<W>) -> Result<()> {
        let mut session = TerminalSession::begin(platform, &self.config)?;
        let (width, height) = session.terminal_size()?;
        let mut renderer = Renderer::with_capabilities(width, height, session.capabilities());
        self.fit_root(width, height);
        self.quit.reset();

        tracing::info!(width, height, "application started");
        let result = self.event_loop(&mut session, &mut renderer);
        tracing::info!(frames = renderer.stats().frames, "application stopped");
        result
    }

    fn event_loop<W: Write>(
        &mut self,
        session: &mut TerminalSession<'_, W>,
        renderer: &mut Renderer,
    ) -> Result<()> {
        self.draw(renderer);
        Self::present(session, renderer);

        let mut last_tick = Instant::now();
        while !self.quit.is_requested() {
            let mut dirty = match session.poll_event(self.config.poll_timeout)? {
                Some(event) => self.handle_event(&event, renderer),
                None => false,
            };

            let now = Instant::now();
            dirty |= self.tree.tick(self.root, now.duration_since(last_tick));
            last_tick = now;

            if dirty && !self.quit.is_requested() {
                self.draw(renderer);
                Self::present(session, renderer);
            }
        }
        Ok(())
    }

    fn present<W: Write>(session: &mut TerminalSession<'_, W>, renderer: &mut Renderer) {
        if let Err(err) = renderer.present(session.output()) {
            tracing::warn!(%err, "frame present failed, repainting next frame");
            renderer.invalidate();
        }
    }

    /// Size the root window to the whole terminal.
    fn fit_root(&mut self, width: u16, height: u16) {
        if let Some(root) = self.tree.get_mut(self.root) {
            root.bounds = crate::geom::Rect::from_size(width, height);
        }
    }

    fn is_quit_key(&self, key: &KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc => self.config.quit_on_escape,
            KeyCode::Char('c' | 'C') => self.config.quit_on_ctrl_c && key.modifiers.control,
            _ => false,
        }
    }

    /// Apply one event. Returns whether the screen needs redrawing.
    pub(crate) fn handle_event(&mut self, event: &Event, renderer: &mut Renderer) -> bool {
        match event {
            Event::Quit => {
                tracing::debug!("quit event received");
                self.quit.request();
                false
            }
            Event::Resize { width, height } => {
                renderer.resize(*width, *height);
                renderer.invalidate();
                self.fit_root(*width, *height);
                true
            }
            Event::Key(key) if self.is_quit_key(key) => {
                self.quit.request();
                false
            }
            _ => self.tree.dispatch(self.root, event),
        }
    }

    /// Clear the back buffer and draw the whole tree.
    pub(crate) fn draw(&mut self, renderer: &mut Renderer) {
        renderer.clear(self.config.background);
        self.tree.render(self.root, renderer);
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("config", &self.config)
            .field("tree", &self.tree)
            .field("quit", &self.quit.is_requested())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::KeyModifiers;

    fn screen(renderer: &mut Renderer) -> vt100::Parser {
        let (width, height) = renderer.size();
        let mut bytes = Vec::new();
        renderer.present(&mut bytes).unwrap();
        let mut parser = vt100::Parser::new(height, width, 0);
        parser.process(&bytes);
        parser
    }

    #[test]
    fn test_escape_and_ctrl_c_quit() {
        let mut app = App::new(AppConfig::default());
        let mut renderer = Renderer::new(10, 5);
        assert!(!app.handle_event(&Event::Key(KeyEvent::new(KeyCode::Esc)), &mut renderer));
        assert!(app.quit_handle().is_requested());

        let mut app = App::new(AppConfig { quit_on_escape: false, ..AppConfig::default() });
        app.handle_event(&Event::Key(KeyEvent::new(KeyCode::Esc)), &mut renderer);
        assert!(!app.quit_handle().is_requested());
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'))
            .with_char('\x03')
            .with_modifiers(KeyModifiers::CONTROL);
        app.handle_event(&Event::Key(ctrl_c), &mut renderer);
        assert!(app.quit_handle().is_requested());
    }

    #[test]
    fn test_quit_handle_from_callback() {
        let mut app = App::new(AppConfig::default());
        let quit = app.quit_handle();
        let button = app.add(Widget::button("Exit").on_click(move |_| quit.request()));
        app.tree_mut().focus(button);

        let mut renderer = Renderer::new(10, 5);
        assert!(app.handle_event(&Event::Key(KeyEvent::new(KeyCode::Enter)), &mut renderer));
        assert!(app.quit_handle().is_requested());
    }

    #[test]
    fn test_resize_fits_root() {
        let mut app = App::new(AppConfig::default());
        let mut renderer = Renderer::new(10, 5);
        assert!(app.handle_event(&Event::Resize { width: 30, height: 8 }, &mut renderer));
        assert_eq!(renderer.size(), (30, 8));
        let root = app.tree().get(app.root()).unwrap();
        assert_eq!((root.bounds.width, root.bounds.height), (30, 8));
    }

    #[test]
    fn test_unconsumed_event_is_clean() {
        let mut app = App::new(AppConfig::default());
        let mut renderer = Renderer::new(10, 5);
        assert!(!app.handle_event(&Event::Focus(true), &mut renderer));
        assert!(!app.handle_event(&Event::Key(KeyEvent::char('x')), &mut renderer));
    }

    #[test]
    fn test_frame_reaches_terminal() {
        let mut app = App::new(AppConfig::default().with_title("Demo"));
        let mut renderer = Renderer::new(20, 6);
        app.handle_event(&Event::Resize { width: 20, height: 6 }, &mut renderer);
        let label = app.add(Widget::label("hello").with_bounds(2, 2, 5, 1));
        assert!(app.tree().contains(label));

        app.draw(&mut renderer);
        let parser = screen(&mut renderer);
        let contents = parser.screen().contents();
        assert!(contents.contains("Demo"));
        assert!(contents.contains("hello"));
        assert_eq!(parser.screen().cell(0, 0).unwrap().contents(), "┌");
    }
}
