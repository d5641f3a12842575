//! An output buffering guard.
//!
//! A [`Buffer`] wraps an output target and routes writes either straight
//! through, into an ambient buffer that is flushed on [`Buffer::stop`], or into
//! a capture window returned by [`Buffer::stop_capture`]. Overlapping sessions
//! are rejected with a [`ProgrammerError`].

mod buffer;
mod config;
pub mod encoding;
mod error;

pub use buffer::{Buffer, State};
pub use config::BufferConfig;
pub use encoding::{Encoding, ParseEncodingError};
pub use error::{EnvironmentError, Error, ProgrammerError, Result};
