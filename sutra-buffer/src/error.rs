use std::string::FromUtf8Error;

use crate::Encoding;

pub type Result<T> = std::result::Result<T, Error>;

/// A precondition on the buffer state machine was violated. These indicate a
/// bug in the caller and are never retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ProgrammerError {
    #[error("Cannot start buffering: buffering has already been started.")]
    AlreadyStarted,

    #[error("Cannot {operation}: buffering has not been started.")]
    NotStarted { operation: &'static str },

    #[error("Cannot {operation}: a capture is in progress. Stop the capture first.")]
    Capturing { operation: &'static str },

    #[error("Cannot start capture: a capture is already in progress.")]
    AlreadyCapturing,

    #[error("Cannot stop capture: no capture has been started.")]
    NotCapturing,

    #[error("Invalid compression level {0} (expected 0 to 9).")]
    InvalidLevel(u32),
}

/// The hosting environment cannot provide what was asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EnvironmentError {
    #[error("The {0} output encoding is not available in this build.")]
    Unavailable(Encoding),
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Programmer(#[from] ProgrammerError),

    #[error(transparent)]
    Environment(#[from] EnvironmentError),

    #[error("Writing buffered output failed.")]
    Output(#[source] std::io::Error),

    #[error("Captured output is not valid UTF-8.")]
    Utf8(#[source] FromUtf8Error),
}

impl Error {
    pub fn is_programmer_error(&self) -> bool {
        matches!(self, Error::Programmer(_))
    }

    pub fn is_environment_error(&self) -> bool {
        matches!(self, Error::Environment(_))
    }

    pub fn as_programmer_error(&self) -> Option<ProgrammerError> {
        match self {
            Error::Programmer(e) => Some(*e),
            _ => None,
        }
    }
}
