//! Application settings.

use crate::style::StyleColor;
use std::time::Duration;

/// Configuration for an [`App`](super::App).
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Terminal window title and root window caption.
    pub title: Option<String>,
    /// How long each iteration waits for input. Also the animation frame interval.
    pub poll_timeout: Duration,
    /// Draw on the alternate screen and restore the shell's screen on exit.
    pub alternate_screen: bool,
    /// Report mouse presses and the wheel.
    pub mouse: bool,
    /// Deliver terminal focus gained and lost as [`Event::Focus`](crate::Event::Focus).
    pub focus_reports: bool,
    /// Stop the loop when Escape is pressed.
    pub quit_on_escape: bool,
    /// Stop the loop on Ctrl+C.
    pub quit_on_ctrl_c: bool,
    /// Color every frame is cleared to before drawing.
    pub background: StyleColor,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: None,
            poll_timeout: Duration::from_millis(16),
            alternate_screen: true,
            mouse: false,
            focus_reports: false,
            quit_on_escape: true,
            quit_on_ctrl_c: true,
            background: StyleColor::BLACK,
        }
    }
}

impl AppConfig {
    /// Builder: set the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Builder: enable or disable mouse reporting.
    #[must_use]
    pub const fn with_mouse(mut self, mouse: bool) -> Self {
        self.mouse = mouse;
        self
    }

    /// Builder: enable or disable focus-change reports.
    #[must_use]
    pub const fn with_focus_reports(mut self, enabled: bool) -> Self {
        self.focus_reports = enabled;
        self
    }

    /// Builder: set the poll timeout.
    #[must_use]
    pub const fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }
}
