//! Error types.
//!
//! Setup failures (terminal attributes, window size, signal handlers, thread
//! spawning) abort startup. Render output failures surface as
//! [`std::io::Error`] from the renderer. Input decoding never fails.

use std::io;
use thiserror::Error;

/// Errors raised while setting up or driving the terminal.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading the terminal attributes failed; stdin is probably not a TTY.
    #[error("failed to get terminal attributes: {0}")]
    GetAttributes(#[source] nix::Error),

    /// Applying terminal attributes failed.
    #[error("failed to set terminal attributes: {0}")]
    SetAttributes(#[source] nix::Error),

    /// The window-size ioctl failed.
    #[error("failed to get window size: {0}")]
    WindowSize(#[source] io::Error),

    /// Installing or restoring a signal handler failed.
    #[error("failed to install signal handler: {0}")]
    Signal(#[source] nix::Error),

    /// A worker thread could not be started.
    #[error("failed to spawn {name} thread: {source}")]
    Spawn {
        /// Thread name.
        name: &'static str,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// Terminal output failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = Error::Spawn {
            name: "stratum-input",
            source: io::Error::new(io::ErrorKind::Other, "no threads"),
        };
        assert_eq!(err.to_string(), "failed to spawn stratum-input thread: no threads");

        let err = Error::GetAttributes(nix::Error::ENOTTY);
        assert!(err.to_string().starts_with("failed to get terminal attributes"));
    }

    #[test]
    fn test_io_conversion() {
        let err: Error = io::Error::new(io::ErrorKind::BrokenPipe, "gone").into();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.to_string(), "gone");
    }
}
