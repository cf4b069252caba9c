//! Platform: the process's single point of control over the terminal.
//!
//! Lifecycle: `Uninitialized → Initialized → ShutDown`. Raw mode, the
//! alternate screen, cursor visibility, and mouse capture are toggled
//! independently, and `shutdown` undoes exactly the ones that were applied.
//!
//! Only one `Platform` may be initialized per process at a time.

use super::caps::Capabilities;
use super::output::seq;
use super::reader::{EventReader, ReadEvents};
use crate::error::{Error, Result};
use crate::event::Event;
use crossterm::tty::IsTty;
use std::io::{self, Stdout, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Set while an initialized `Platform` exists.
static PLATFORM_ACTIVE: AtomicBool = AtomicBool::new(false);

fn claim() -> Result<()> {
    PLATFORM_ACTIVE
        .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        .map(|_| ())
        .map_err(|_| Error::PlatformBusy)
}

fn release() {
    PLATFORM_ACTIVE.store(false, Ordering::Release);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Uninitialized,
    Initialized,
    ShutDown,
}

/// Cursor shapes, numbered as DECSCUSR (`ESC [ N SP q`) expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum CursorStyle {
    /// The terminal's configured shape.
    #[default]
    Default = 0,
    /// Blinking block.
    BlinkingBlock = 1,
    /// Steady block.
    SteadyBlock = 2,
    /// Blinking underline.
    BlinkingUnderline = 3,
    /// Steady underline.
    SteadyUnderline = 4,
    /// Blinking vertical bar.
    BlinkingBar = 5,
    /// Steady vertical bar.
    SteadyBar = 6,
}

/// Terminal mode state plus the output sink escape sequences go to.
pub struct Platform<W: Write = Stdout> {
    out: W,
    lifecycle: Lifecycle,
    raw_mode: bool,
    alt_screen: bool,
    cursor_hidden: bool,
    mouse_capture: bool,
    focus_reports: bool,
    reader: EventReader,
    caps: Capabilities,
}

impl Platform<Stdout> {
    /// A platform writing to standard output, with detected capabilities.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Platform<W> {
    /// Create an uninitialized platform writing to `out`.
    pub fn new(out: W) -> Self {
        Self::with_capabilities(out, Capabilities::detect())
    }

    /// Create an uninitialized platform with known capabilities.
    pub fn with_capabilities(out: W, caps: Capabilities) -> Self {
        Self {
            out,
            lifecycle: Lifecycle::Uninitialized,
            raw_mode: false,
            alt_screen: false,
            cursor_hidden: false,
            mouse_capture: false,
            focus_reports: false,
            reader: EventReader::new(),
            caps,
        }
    }

    /// Attach to the terminal.
    ///
    /// Calling this again while initialized succeeds without doing anything.
    /// On failure nothing about the terminal has changed.
    ///
    /// # Errors
    ///
    /// [`Error::NotATerminal`] if stdin or stdout is redirected,
    /// [`Error::PlatformBusy`] if another platform is active, or
    /// [`Error::Signal`] if notification handlers cannot be installed.
    pub fn init(&mut self) -> Result<()> {
        if self.lifecycle == Lifecycle::Initialized {
            return Ok(());
        }
        if !io::stdin().is_tty() || !io::stdout().is_tty() {
            return Err(Error::NotATerminal);
        }
        claim()?;
        if let Err(err) = self.reader.register_signals() {
            release();
            return Err(err);
        }

        self.lifecycle = Lifecycle::Initialized;
        tracing::debug!(terminal = self.caps.kind.name(), "platform initialized");
        Ok(())
    }

    /// Whether `init` has succeeded and `shutdown` has not run since.
    pub fn is_initialized(&self) -> bool {
        self.lifecycle == Lifecycle::Initialized
    }

    /// Whether raw mode is on.
    pub const fn is_raw_mode(&self) -> bool {
        self.raw_mode
    }

    /// Whether the alternate screen is active.
    pub const fn is_alternate_screen(&self) -> bool {
        self.alt_screen
    }

    /// Detected terminal capabilities.
    pub const fn capabilities(&self) -> &Capabilities {
        &self.caps
    }

    /// The underlying output sink.
    pub fn output(&mut self) -> &mut W {
        &mut self.out
    }

    /// Turn off line buffering, echo, and signal keys. Idempotent.
    ///
    /// # Errors
    ///
    /// [`Error::RawMode`] if the terminal settings cannot be changed.
    pub fn enable_raw_mode(&mut self) -> Result<()> {
        if self.raw_mode {
            return Ok(());
        }
        crossterm::terminal::enable_raw_mode().map_err(Error::RawMode)?;
        self.raw_mode = true;
        Ok(())
    }

    /// Restore the terminal settings saved when raw mode was enabled. Idempotent.
    ///
    /// # Errors
    ///
    /// [`Error::RawMode`] if the terminal settings cannot be restored.
    pub fn disable_raw_mode(&mut self) -> Result<()> {
        if !self.raw_mode {
            return Ok(());
        }
        crossterm::terminal::disable_raw_mode().map_err(Error::RawMode)?;
        self.raw_mode = false;
        Ok(())
    }

    /// Current `(columns, rows)`.
    ///
    /// # Errors
    ///
    /// [`Error::NoTerminalSize`] if the terminal does not report a usable size.
    pub fn terminal_size(&self) -> Result<(u16, u16)> {
        match crossterm::terminal::size() {
            Ok((w, h)) if w > 0 && h > 0 => Ok((w, h)),
            Ok(_) => Err(Error::NoTerminalSize),
            Err(err) => {
                tracing::debug!(error = %err, "terminal size query failed");
                Err(Error::NoTerminalSize)
            }
        }
    }

    /// Wait up to `timeout` for input, a resize, or a termination request.
    ///
    /// Returns `Ok(None)` when the timeout passes with nothing to report.
    ///
    /// # Errors
    ///
    /// [`Error::NotInitialized`] before `init`, or the read error.
    pub fn poll_event(&mut self, timeout: Duration) -> Result<Option<Event>> {
        if self.lifecycle != Lifecycle::Initialized {
            return Err(Error::NotInitialized);
        }
        self.reader.poll(timeout)
    }

    fn emit(&mut self, bytes: &[u8]) -> Result<()> {
        self.out.write_all(bytes)?;
        self.out.flush()?;
        Ok(())
    }

    /// Set the window title. Control characters are dropped.
    pub fn set_title(&mut self, title: &str) -> Result<()> {
        let clean: String = title.chars().filter(|c| !c.is_control()).collect();
        write!(self.out, "\x1b]0;{clean}\x07")?;
        self.out.flush()?;
        Ok(())
    }

    /// Ring the bell.
    pub fn bell(&mut self) -> Result<()> {
        self.emit(seq::BELL)
    }

    /// Erase the whole screen.
    pub fn clear_screen(&mut self) -> Result<()> {
        self.emit(seq::CLEAR_SCREEN)
    }

    /// Erase the current line.
    pub fn clear_line(&mut self) -> Result<()> {
        self.emit(seq::CLEAR_LINE)
    }

    /// Erase from the cursor to the end of the line.
    pub fn clear_to_eol(&mut self) -> Result<()> {
        self.emit(seq::CLEAR_TO_EOL)
    }

    /// Erase from the start of the line to the cursor.
    pub fn clear_to_sol(&mut self) -> Result<()> {
        self.emit(seq::CLEAR_TO_SOL)
    }

    /// Move the cursor to a 0-indexed column and row.
    pub fn move_cursor(&mut self, x: u16, y: u16) -> Result<()> {
        write!(self.out, "\x1b[{};{}H", u32::from(y) + 1, u32::from(x) + 1)?;
        self.out.flush()?;
        Ok(())
    }

    /// Save the cursor position.
    pub fn save_cursor(&mut self) -> Result<()> {
        self.emit(seq::CURSOR_SAVE)
    }

    /// Restore the saved cursor position.
    pub fn restore_cursor(&mut self) -> Result<()> {
        self.emit(seq::CURSOR_RESTORE)
    }

    /// Show the cursor.
    pub fn show_cursor(&mut self) -> Result<()> {
        self.emit(seq::CURSOR_SHOW)?;
        self.cursor_hidden = false;
        Ok(())
    }

    /// Hide the cursor.
    pub fn hide_cursor(&mut self) -> Result<()> {
        self.emit(seq::CURSOR_HIDE)?;
        self.cursor_hidden = true;
        Ok(())
    }

    /// Change the cursor shape.
    pub fn set_cursor_style(&mut self, style: CursorStyle) -> Result<()> {
        write!(self.out, "\x1b[{} q", style as u8)?;
        self.out.flush()?;
        Ok(())
    }

    /// Switch to the alternate screen.
    pub fn enter_alternate_screen(&mut self) -> Result<()> {
        self.emit(seq::ALT_SCREEN_ENTER)?;
        self.alt_screen = true;
        Ok(())
    }

    /// Return to the main screen.
    pub fn exit_alternate_screen(&mut self) -> Result<()> {
        self.emit(seq::ALT_SCREEN_EXIT)?;
        self.alt_screen = false;
        Ok(())
    }

    /// Start SGR mouse reporting.
    pub fn enable_mouse(&mut self) -> Result<()> {
        self.emit(seq::MOUSE_ENABLE)?;
        self.mouse_capture = true;
        Ok(())
    }

    /// Stop mouse reporting.
    pub fn disable_mouse(&mut self) -> Result<()> {
        self.emit(seq::MOUSE_DISABLE)?;
        self.mouse_capture = false;
        Ok(())
    }

    /// Ask the terminal to report focus gained and lost as [`Event::Focus`](crate::Event::Focus).
    pub fn enable_focus_reports(&mut self) -> Result<()> {
        self.emit(seq::FOCUS_REPORT_ENABLE)?;
        self.focus_reports = true;
        Ok(())
    }

    /// Stop focus-change reports.
    pub fn disable_focus_reports(&mut self) -> Result<()> {
        self.emit(seq::FOCUS_REPORT_DISABLE)?;
        self.focus_reports = false;
        Ok(())
    }

    /// Put the terminal back the way `init` found it.
    ///
    /// Every step is attempted even if an earlier one fails; failures are
    /// logged. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if self.raw_mode {
            if let Err(err) = self.disable_raw_mode() {
                tracing::warn!(error = %err, "failed to leave raw mode");
            }
        }
        if self.cursor_hidden {
            if let Err(err) = self.show_cursor() {
                tracing::warn!(error = %err, "failed to show cursor");
            }
        }
        if self.alt_screen {
            if let Err(err) = self.exit_alternate_screen() {
                tracing::warn!(error = %err, "failed to leave alternate screen");
            }
        }
        if self.mouse_capture {
            if let Err(err) = self.disable_mouse() {
                tracing::warn!(error = %err, "failed to disable mouse capture");
            }
        }
        if self.focus_reports {
            if let Err(err) = self.disable_focus_reports() {
                tracing::warn!(error = %err, "failed to disable focus reports");
            }
        }
        self.reader.unregister_signals();

        if self.lifecycle == Lifecycle::Initialized {
            release();
            self.lifecycle = Lifecycle::ShutDown;
            tracing::debug!("platform shut down");
        }
    }

    fn needs_restore(&self) -> bool {
        self.lifecycle == Lifecycle::Initialized
            || self.raw_mode
            || self.alt_screen
            || self.cursor_hidden
            || self.mouse_capture
            || self.focus_reports
    }
}

impl<W: Write> Drop for Platform<W> {
    fn drop(&mut self) {
        if self.needs_restore() {
            self.shutdown();
        }
    }
}

impl<W: Write> std::fmt::Debug for Platform<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Platform")
            .field("lifecycle", &self.lifecycle)
            .field("raw_mode", &self.raw_mode)
            .field("alt_screen", &self.alt_screen)
            .field("cursor_hidden", &self.cursor_hidden)
            .field("mouse_capture", &self.mouse_capture)
            .field("focus_reports", &self.focus_reports)
            .field("caps", &self.caps)
            .finish_non_exhaustive()
    }
}
