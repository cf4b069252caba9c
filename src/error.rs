//! Error type for platform operations.
//!
//! Drawing never fails and widget operations on stale handles are no-ops, so
//! everything here comes from the terminal boundary.

use std::io;

/// Errors surfaced by the platform layer and the application loop.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Standard input or output is not attached to a terminal.
    #[error("not running in a terminal")]
    NotATerminal,

    /// Another `Platform` in this process is already initialized.
    #[error("terminal platform is already active in this process")]
    PlatformBusy,

    /// The operation needs `Platform::init` first.
    #[error("terminal platform is not initialized")]
    NotInitialized,

    /// Switching raw mode on or off failed.
    #[error("failed to change raw mode: {0}")]
    RawMode(#[source] io::Error),

    /// The terminal did not report a usable size.
    #[error("terminal did not report a size")]
    NoTerminalSize,

    /// Installing or removing a signal handler failed.
    #[error("failed to register signal handler: {0}")]
    Signal(#[source] io::Error),

    /// Any other I/O failure.
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// Result alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
