use crate::encoding::constants::MAX_LEVEL;
use crate::{Encoding, EnvironmentError, ProgrammerError, Result};

/// Construction options for a [`Buffer`](crate::Buffer).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BufferConfig {
    pub encoding: Encoding,
    /// Compression level, 0 to 9. `None` uses the encoder's default.
    pub level: Option<u32>,
}

impl BufferConfig {
    pub fn new(encoding: Encoding) -> Self {
        Self {
            encoding,
            level: None,
        }
    }

    pub fn gzip() -> Self {
        Self::new(Encoding::Gzip)
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = Some(level);
        self
    }

    /// Checks that this build can honour the configuration. A missing encoding
    /// is an environment error, an out of range level a programmer error.
    pub fn validate(&self) -> Result<()> {
        if !self.encoding.is_available() {
            return Err(EnvironmentError::Unavailable(self.encoding).into());
        }

        match self.level {
            Some(level) if level > MAX_LEVEL => Err(ProgrammerError::InvalidLevel(level).into()),
            _ => Ok(()),
        }
    }
}
