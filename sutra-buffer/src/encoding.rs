use std::fmt;
use std::io::{Result, Write};
use std::str::FromStr;

#[cfg(feature = "gzip")]
use flate2::{write::GzEncoder, Compression as GzLevel};

pub mod constants {
    pub const DEFAULT_LEVEL: u32 = 6;
    pub const MAX_LEVEL: u32 = 9;
}

use self::constants::MAX_LEVEL;

/// How ambient content is encoded when it is flushed to the output target.
#[derive(Clone, Copy, Eq, PartialEq, Hash)]
pub enum Encoding {
    Identity,
    Gzip,
}

impl Default for Encoding {
    fn default() -> Self {
        Self::Identity
    }
}

impl Encoding {
    pub const fn available_variants() -> &'static [&'static str] {
        &["identity", "gzip"]
    }

    /// Whether this build can produce the encoding.
    pub const fn is_available(self) -> bool {
        match self {
            Encoding::Identity => true,
            Encoding::Gzip => cfg!(feature = "gzip"),
        }
    }

    /// Writes `data` to `writer` through this encoding, returning the number of
    /// input bytes consumed. A gzip stream is finished before returning.
    /// Levels above 9 are rejected for every encoding.
    pub fn encode<W: Write>(self, writer: W, data: &[u8], level: Option<u32>) -> Result<u64> {
        use Encoding::*;

        if let Some(level) = level.filter(|&l| l > MAX_LEVEL) {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Invalid compression level {} (expected 0 to {})", level, MAX_LEVEL),
            ));
        }

        match self {
            Identity => {
                let mut writer = writer;
                writer.write_all(data)?;
                Ok(data.len() as u64)
            }
            #[cfg(feature = "gzip")]
            Gzip => {
                let level = GzLevel::new(level.unwrap_or(constants::DEFAULT_LEVEL));
                let mut encoder = GzEncoder::new(writer, level);
                encoder.write_all(data)?;
                encoder.finish()?;
                Ok(data.len() as u64)
            }
            #[allow(unreachable_patterns)]
            missing => {
                let _ = (writer, level);
                Err(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    format!("Compiled without support for {:?}", missing),
                ))
            }
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Encoding::Identity => "identity",
            Encoding::Gzip => "gzip",
        };

        write!(f, "{}", s)
    }
}

impl fmt::Debug for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown output encoding: {0}")]
pub struct ParseEncodingError(pub String);

impl FromStr for Encoding {
    type Err = ParseEncodingError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "identity" | "none" => Ok(Encoding::Identity),
            "gzip" | "gz" => Ok(Encoding::Gzip),
            _ => Err(ParseEncodingError(s.to_string())),
        }
    }
}
