//! Scoped acquisition of the terminal.
//!
//! [`TerminalSession`] puts the terminal into full-screen mode on creation
//! and restores it when dropped, on every exit path. [`install_panic_hook`]
//! covers the one path `Drop` alone cannot: a panic message printed while the
//! terminal is still raw and on the alternate screen.

use super::output::seq;
use super::platform::Platform;
use crate::app::AppConfig;
use crate::error::Result;
use std::io::{self, Write};
use std::ops::{Deref, DerefMut};
use std::sync::Once;

/// RAII guard over an initialized [`Platform`].
///
/// When this guard is dropped, it will:
/// 1. Disable raw mode
/// 2. Show the cursor
/// 3. Leave the alternate screen
/// 4. Stop mouse and focus reporting and release the platform
pub struct TerminalSession<'a, W: Write> {
    platform: &'a mut Platform<W>,
}

impl<'a, W: Write> TerminalSession<'a, W> {
    /// Initialize the platform and enter full-screen mode as `config` asks.
    ///
    /// Sequence: init, raw mode, hide cursor, alternate screen, mouse, focus
    /// reports, title.
    ///
    /// # Errors
    ///
    /// Returns the first failing step's error after restoring the terminal.
    pub fn begin(platform: &'a mut Platform<W>, config: &AppConfig) -> Result<Self> {
        if let Err(err) = Self::setup(platform, config) {
            platform.shutdown();
            return Err(err);
        }
        Ok(Self { platform })
    }

    fn setup(platform: &mut Platform<W>, config: &AppConfig) -> Result<()> {
        platform.init()?;
        platform.enable_raw_mode()?;
        platform.hide_cursor()?;
        if config.alternate_screen {
            platform.enter_alternate_screen()?;
        }
        if config.mouse {
            platform.enable_mouse()?;
        }
        if config.focus_reports {
            platform.enable_focus_reports()?;
        }
        if let Some(title) = &config.title {
            platform.set_title(title)?;
        }
        Ok(())
    }
}

impl<W: Write> Deref for TerminalSession<'_, W> {
    type Target = Platform<W>;

    fn deref(&self) -> &Self::Target {
        self.platform
    }
}

impl<W: Write> DerefMut for TerminalSession<'_, W> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.platform
    }
}

impl<W: Write> Drop for TerminalSession<'_, W> {
    fn drop(&mut self) {
        self.platform.shutdown();
    }
}

static PANIC_HOOK: Once = Once::new();

/// Restore the terminal before the default panic report prints.
///
/// Installed once per process; later calls do nothing.
pub fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            restore_after_panic();
            previous(info);
        }));
    });
}

/// Best-effort cleanup usable from any context.
fn restore_after_panic() {
    let _ = crossterm::terminal::disable_raw_mode();
    let mut out = io::stdout();
    let _ = out.write_all(seq::MOUSE_DISABLE);
    let _ = out.write_all(seq::FOCUS_REPORT_DISABLE);
    let _ = out.write_all(seq::CURSOR_SHOW);
    let _ = out.write_all(seq::ALT_SCREEN_EXIT);
    let _ = out.flush();
}
