//! Terminal module: everything that touches the real terminal.
//!
//! This module contains:
//! - [`Platform`]: raw mode, alternate screen, cursor and title control
//! - [`TerminalSession`]: scoped full-screen acquisition
//! - [`Capabilities`]: environment-based capability detection
//! - [`InputDecoder`]: raw bytes to [`Event`](crate::Event)s
//! - [`OutputBuffer`]: staging buffer for escape sequences

mod caps;
pub mod decoder;
mod output;
mod platform;
mod reader;
mod session;

pub use caps::{Capabilities, TerminalKind, UNICODE_OVERRIDE_VAR};
pub use decoder::InputDecoder;
pub use output::{seq, OutputBuffer, DEFAULT_CAPACITY};
pub use platform::{CursorStyle, Platform};
pub use session::{install_panic_hook, TerminalSession};
