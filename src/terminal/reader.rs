//! Event source behind [`Platform::poll_event`](super::Platform::poll_event).
//!
//! On Unix the reader waits on standard input with `poll(2)`, feeds raw bytes
//! into the [`InputDecoder`](super::InputDecoder), and turns `SIGWINCH`,
//! `SIGTERM`, and `SIGHUP` into events through `signal-hook` flags.
//! Elsewhere crossterm's event reader is translated into the same events.

use crate::error::Result;
use crate::event::Event;
use std::time::Duration;

#[cfg(unix)]
pub(crate) use self::unix::EventReader;

#[cfg(not(unix))]
pub(crate) use self::portable::EventReader;

/// Common surface of the platform readers.
pub(crate) trait ReadEvents {
    /// Install resize and termination notification.
    fn register_signals(&mut self) -> Result<()>;
    /// Remove everything `register_signals` installed.
    fn unregister_signals(&mut self);
    /// Wait up to `timeout` for one event.
    fn poll(&mut self, timeout: Duration) -> Result<Option<Event>>;
}

#[cfg(unix)]
mod unix {
    use super::ReadEvents;
    use crate::error::{Error, Result};
    use crate::event::Event;
    use crate::terminal::InputDecoder;
    use signal_hook::SigId;
    use std::io;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    const READ_CHUNK: usize = 256;

    /// Reads standard input directly and decodes escape sequences itself.
    #[derive(Debug, Default)]
    pub(crate) struct EventReader {
        decoder: InputDecoder,
        resized: Arc<AtomicBool>,
        terminate: Arc<AtomicBool>,
        signals: Vec<SigId>,
    }

    impl EventReader {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        /// An event raised by a signal since the last poll.
        fn signal_event(&self) -> Option<Event> {
            if self.terminate.swap(false, Ordering::Relaxed) {
                return Some(Event::Quit);
            }
            if self.resized.swap(false, Ordering::Relaxed) {
                return match crossterm::terminal::size() {
                    Ok((width, height)) => Some(Event::Resize { width, height }),
                    Err(err) => {
                        tracing::debug!(error = %err, "size query after SIGWINCH failed");
                        None
                    }
                };
            }
            None
        }

        /// Wait for standard input to become readable.
        #[allow(unsafe_code)]
        fn wait_readable(timeout: Duration) -> io::Result<bool> {
            let mut fds = libc::pollfd { fd: libc::STDIN_FILENO, events: libc::POLLIN, revents: 0 };
            let millis = libc::c_int::try_from(timeout.as_millis()).unwrap_or(libc::c_int::MAX);
            // SAFETY: fds points to one valid pollfd for the duration of the call.
            let ret = unsafe { libc::poll(&mut fds, 1, millis) };
            if ret < 0 {
                return Err(io::Error::last_os_error());
            }
            Ok(ret > 0)
        }

        /// Read whatever is available. `Ok(0)` means end of input.
        #[allow(unsafe_code)]
        fn read_available(buf: &mut [u8]) -> io::Result<usize> {
            // SAFETY: buf is valid for writes of buf.len() bytes.
            let n = unsafe { libc::read(libc::STDIN_FILENO, buf.as_mut_ptr().cast(), buf.len()) };
            usize::try_from(n).map_err(|_| io::Error::last_os_error())
        }
    }

    impl ReadEvents for EventReader {
        fn register_signals(&mut self) -> Result<()> {
            use signal_hook::consts::signal::{SIGHUP, SIGTERM, SIGWINCH};
            use signal_hook::flag::register;

            let wanted = [
                (SIGWINCH, Arc::clone(&self.resized)),
                (SIGTERM, Arc::clone(&self.terminate)),
                (SIGHUP, Arc::clone(&self.terminate)),
            ];
            for (signal, flag) in wanted {
                match register(signal, flag) {
                    Ok(id) => self.signals.push(id),
                    Err(err) => {
                        self.unregister_signals();
                        return Err(Error::Signal(err));
                    }
                }
            }
            tracing::debug!(count = self.signals.len(), "signal handlers registered");
            Ok(())
        }

        fn unregister_signals(&mut self) {
            for id in self.signals.drain(..) {
                signal_hook::low_level::unregister(id);
            }
        }

        fn poll(&mut self, timeout: Duration) -> Result<Option<Event>> {
            if let Some(event) = self.signal_event().or_else(|| self.decoder.next_event()) {
                return Ok(Some(event));
            }

            let deadline = Instant::now() + timeout;
            let mut buf = [0u8; READ_CHUNK];
            loop {
                let remaining = deadline.saturating_duration_since(Instant::now());
                match Self::wait_readable(remaining) {
                    Ok(true) => {}
                    Ok(false) => {
                        // A fragment that outlived the timeout will not complete
                        if self.decoder.has_pending() {
                            tracing::trace!("dropping stale input fragment");
                            self.decoder.discard_pending();
                        }
                        return Ok(None);
                    }
                    Err(err) if err.kind() == io::ErrorKind::Interrupted => {
                        if let Some(event) = self.signal_event() {
                            return Ok(Some(event));
                        }
                        continue;
                    }
                    Err(err) => return Err(err.into()),
                }

                match Self::read_available(&mut buf) {
                    Ok(0) => return Ok(Some(Event::Quit)),
                    Ok(n) => self.decoder.feed(&buf[..n]),
                    Err(err)
                        if matches!(
                            err.kind(),
                            io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock
                        ) => {}
                    Err(err) => return Err(err.into()),
                }

                if let Some(event) = self.signal_event().or_else(|| self.decoder.next_event()) {
                    return Ok(Some(event));
                }
            }
        }
    }

    impl Drop for EventReader {
        fn drop(&mut self) {
            self.unregister_signals();
        }
    }
}

#[cfg(not(unix))]
mod portable {
    use super::ReadEvents;
    use crate::error::Result;
    use crate::event::{Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent};
    use crossterm::event::{self as ct, KeyEventKind};
    use std::time::Duration;

    /// Translates crossterm's events.
    #[derive(Debug, Default)]
    pub(crate) struct EventReader;

    impl EventReader {
        pub(crate) const fn new() -> Self {
            Self
        }

        fn convert_event(event: ct::Event) -> Option<Event> {
            match event {
                ct::Event::Key(key) => {
                    // Only process key press events (not release or repeat)
                    if key.kind != KeyEventKind::Press {
                        return None;
                    }
                    let code = Self::convert_key_code(key.code)?;
                    let mut converted = KeyEvent::new(code)
                        .with_modifiers(Self::convert_modifiers(key.modifiers));
                    if let ct::KeyCode::Char(c) = key.code {
                        converted = converted.with_char(c);
                    }
                    Some(Event::Key(converted))
                }
                ct::Event::Mouse(mouse) => Self::convert_mouse_event(mouse),
                ct::Event::Resize(width, height) => Some(Event::Resize { width, height }),
                ct::Event::FocusGained => Some(Event::Focus(true)),
                ct::Event::FocusLost => Some(Event::Focus(false)),
                ct::Event::Paste(text) => Some(Event::Text(text)),
            }
        }

        fn convert_key_code(code: ct::KeyCode) -> Option<KeyCode> {
            Some(match code {
                ct::KeyCode::Char(c) => KeyCode::Char(c),
                ct::KeyCode::F(n) => KeyCode::F(n),
                ct::KeyCode::Backspace => KeyCode::Backspace,
                ct::KeyCode::Enter => KeyCode::Enter,
                ct::KeyCode::Left => KeyCode::Left,
                ct::KeyCode::Right => KeyCode::Right,
                ct::KeyCode::Up => KeyCode::Up,
                ct::KeyCode::Down => KeyCode::Down,
                ct::KeyCode::Home => KeyCode::Home,
                ct::KeyCode::End => KeyCode::End,
                ct::KeyCode::PageUp => KeyCode::PageUp,
                ct::KeyCode::PageDown => KeyCode::PageDown,
                ct::KeyCode::Tab => KeyCode::Tab,
                ct::KeyCode::BackTab => KeyCode::BackTab,
                ct::KeyCode::Delete => KeyCode::Delete,
                ct::KeyCode::Insert => KeyCode::Insert,
                ct::KeyCode::Esc => KeyCode::Esc,
                ct::KeyCode::Null => KeyCode::Null,
                _ => return None,
            })
        }

        fn convert_modifiers(mods: ct::KeyModifiers) -> KeyModifiers {
            KeyModifiers {
                shift: mods.contains(ct::KeyModifiers::SHIFT),
                control: mods.contains(ct::KeyModifiers::CONTROL),
                alt: mods.contains(ct::KeyModifiers::ALT),
            }
        }

        fn convert_mouse_event(mouse: ct::MouseEvent) -> Option<Event> {
            let (button, pressed) = match mouse.kind {
                ct::MouseEventKind::Down(button) => (Self::convert_mouse_button(button), true),
                ct::MouseEventKind::Up(button) => (Self::convert_mouse_button(button), false),
                ct::MouseEventKind::ScrollUp => (MouseButton::WheelUp, true),
                ct::MouseEventKind::ScrollDown => (MouseButton::WheelDown, true),
                _ => return None,
            };
            Some(Event::Mouse(MouseEvent {
                x: mouse.column,
                y: mouse.row,
                button,
                pressed,
                modifiers: Self::convert_modifiers(mouse.modifiers),
            }))
        }

        const fn convert_mouse_button(button: ct::MouseButton) -> MouseButton {
            match button {
                ct::MouseButton::Left => MouseButton::Left,
                ct::MouseButton::Right => MouseButton::Right,
                ct::MouseButton::Middle => MouseButton::Middle,
            }
        }
    }

    impl ReadEvents for EventReader {
        fn register_signals(&mut self) -> Result<()> {
            Ok(())
        }

        fn unregister_signals(&mut self) {}

        fn poll(&mut self, timeout: Duration) -> Result<Option<Event>> {
            if !ct::poll(timeout)? {
                return Ok(None);
            }
            Ok(Self::convert_event(ct::read()?))
        }
    }
}
