use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HimawariArchError {
    /// The session could not be (re)established, or a remote operation ran out of attempts.
    #[error("connection error: {0}")]
    Connection(String),

    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Timeouts, EOF and broken sessions. Worth a reconnect.
    #[error("transient connection failure: {0}")]
    Transient(String),

    /// The server answered, but not the way we wanted (missing directory, bad reply).
    #[error("remote operation failed: {0}")]
    Operation(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl HimawariArchError {
    pub fn is_transient(&self) -> bool {
        match self {
            HimawariArchError::Transient(_) => true,
            HimawariArchError::Io(err) => is_transient_io(err),
            _ => false,
        }
    }
}

pub(crate) fn is_transient_io(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::TimedOut
            | io::ErrorKind::WouldBlock
            | io::ErrorKind::UnexpectedEof
            | io::ErrorKind::BrokenPipe
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::NotConnected
    )
}
