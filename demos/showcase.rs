//! Showcase: every widget variant in one screen.
//!
//! Demonstrates:
//! - Tab / Shift+Tab focus traversal
//! - Button, checkbox, radio, slider, textbox, editor, and list input
//! - A running spinner and a self-hiding notification
//!
//! Logs go to `tessel-showcase.log` in the temp directory; set `RUST_LOG`
//! to change the filter. Press Esc or Ctrl+C to exit.

use std::fs::File;
use std::sync::Mutex;
use tessel::widget::SpinnerStyle;
use tessel::{App, AppConfig, StyleColor, Theme, Widget};
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let path = std::env::temp_dir().join("tessel-showcase.log");
    let Ok(file) = File::create(&path) else {
        return;
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tessel=info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

fn main() -> tessel::Result<()> {
    init_logging();

    let config = AppConfig::default().with_title("Tessel Showcase").with_mouse(true);
    let mut app = App::new(config);
    let quit = app.quit_handle();

    app.add(Widget::menu(["File", "Edit", "View", "Help"]).with_bounds(2, 1, 40, 1));
    app.add(Widget::tabs(["Widgets", "Data", "About"]).with_bounds(2, 2, 40, 1));
    app.add(Widget::separator(true).with_bounds(2, 3, 60, 1));

    app.add(
        Widget::checkbox("Enable feature")
            .with_bounds(2, 5, 24, 1)
            .on_change(|w| {
                let text = if w.is_checked() { "Feature enabled" } else { "Enable feature" };
                w.set_text(text);
            }),
    );
    app.add(Widget::radio("Small", 1).with_bounds(2, 6, 12, 1));
    app.add(Widget::radio("Large", 1).with_bounds(14, 6, 12, 1));

    app.add(Widget::label("Volume").with_bounds(2, 8, 8, 1));
    app.add(Widget::slider(0.0, 100.0, 40.0).with_bounds(10, 8, 20, 1));
    let mut progress = Widget::progress().with_bounds(10, 9, 20, 1);
    progress.set_value(0.65);
    app.add(progress);

    app.add(Widget::textbox("").with_bounds(2, 11, 28, 3));
    app.add(Widget::editor("Multi-line\neditor").with_bounds(2, 14, 28, 6));

    app.add(
        Widget::list(["Alpha", "Bravo", "Charlie", "Delta", "Echo", "Foxtrot"])
            .with_bounds(34, 5, 20, 7),
    );
    app.add(Widget::dropdown(["Red", "Green", "Blue"]).with_bounds(34, 12, 20, 3));

    let mut table = Widget::table(3, 2).with_bounds(34, 15, 22, 5);
    for (row, (name, value)) in [("cpu", "12%"), ("mem", "1.2G"), ("net", "3 MB/s")].iter().enumerate() {
        table.set_cell(row, 0, *name);
        table.set_cell(row, 1, *value);
    }
    app.add(table);

    let mut spinner = Widget::spinner(SpinnerStyle::Dots).with_bounds(58, 1, 2, 1);
    if let Some(state) = spinner.spinner_mut() {
        state.start();
    }
    app.add(spinner);

    let warning = Theme::default().with_colors(StyleColor::BLACK, StyleColor::YELLOW);
    app.add(
        Widget::notification("Tab moves focus")
            .with_bounds(58, 5, 22, 3)
            .with_theme(warning),
    );

    let exit = app.add(
        Widget::button("Quit")
            .with_bounds(58, 17, 10, 3)
            .on_click(move |_| quit.request()),
    );
    app.add(Widget::status_bar(" Esc: quit  Tab: next  Shift+Tab: previous").with_bounds(0, 22, 80, 1));

    app.tree_mut().focus(exit);
    app.run()
}
