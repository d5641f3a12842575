use std::fmt;
use std::io::{self, Write};

use crate::{BufferConfig, Encoding, Error, ProgrammerError, Result};

/// Where writes to a [`Buffer`] currently end up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Idle,
    Buffering,
    Capturing,
    BufferingThenCapturing,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            State::Idle => "idle",
            State::Buffering => "buffering",
            State::Capturing => "capturing",
            State::BufferingThenCapturing => "buffering+capturing",
        };
        write!(f, "{}", s)
    }
}

/// Guards an output target against overlapping buffering sessions.
///
/// Bytes written through the [`Write`] impl go to the innermost active layer:
/// the capture window if one is open, otherwise the ambient buffer if it has
/// been started, otherwise straight to the output target.
#[derive(Debug)]
pub struct Buffer<W: Write> {
    output: W,
    config: BufferConfig,
    ambient: Vec<u8>,
    capture: Vec<u8>,
    started: bool,
    capturing: bool,
}

impl<W: Write> Buffer<W> {
    /// Creates an idle buffer that flushes ambient content unchanged.
    pub fn new(output: W) -> Buffer<W> {
        Buffer {
            output,
            config: BufferConfig::default(),
            ambient: Vec::new(),
            capture: Vec::new(),
            started: false,
            capturing: false,
        }
    }

    /// Creates an idle buffer that gzips ambient content when it is flushed.
    /// Fails if this build has no gzip support.
    pub fn gzip(output: W) -> Result<Buffer<W>> {
        Self::with_config(output, BufferConfig::gzip())
    }

    pub fn with_config(output: W, config: BufferConfig) -> Result<Buffer<W>> {
        config.validate()?;

        let mut buffer = Buffer::new(output);
        buffer.config = config;
        Ok(buffer)
    }

    #[inline(always)]
    fn ensure_buffering(&self, operation: &'static str) -> std::result::Result<(), ProgrammerError> {
        if self.capturing {
            return Err(ProgrammerError::Capturing { operation });
        }
        if !self.started {
            return Err(ProgrammerError::NotStarted { operation });
        }
        Ok(())
    }

    /// Begins ambient buffering.
    pub fn start(&mut self) -> Result<()> {
        if self.capturing {
            return Err(ProgrammerError::Capturing {
                operation: "start buffering",
            }
            .into());
        }
        if self.started {
            return Err(ProgrammerError::AlreadyStarted.into());
        }

        self.ambient.clear();
        self.started = true;
        tracing::debug!(encoding = %self.config.encoding, "started output buffering");
        Ok(())
    }

    /// Ends ambient buffering and writes the accumulated content to the
    /// output target. Nothing at all is written when the buffer is empty.
    pub fn stop(&mut self) -> Result<()> {
        self.ensure_buffering("stop buffering")?;

        self.started = false;
        let content = std::mem::take(&mut self.ambient);

        if content.is_empty() {
            tracing::debug!("stopped output buffering, nothing to flush");
            return Ok(());
        }

        let encoding = self.config.encoding;
        let bytes = encoding
            .encode(&mut self.output, &content, self.config.level)
            .and_then(|n| self.output.flush().map(|_| n))
            .map_err(Error::Output)?;

        tracing::debug!(bytes, %encoding, "stopped output buffering, flushed content");
        Ok(())
    }

    /// Returns the ambient content without consuming it.
    pub fn get(&self) -> Result<&[u8]> {
        self.ensure_buffering("get buffered output")?;
        Ok(&self.ambient)
    }

    /// Clears the ambient content. Buffering stays active.
    pub fn erase(&mut self) -> Result<()> {
        self.ensure_buffering("erase buffered output")?;

        tracing::trace!(bytes = self.ambient.len(), "erased buffered output");
        self.ambient.clear();
        Ok(())
    }

    /// Replaces every occurrence of `find` in the ambient content with
    /// `replacement`, returning the number of replacements made.
    pub fn replace(&mut self, find: impl AsRef<[u8]>, replacement: impl AsRef<[u8]>) -> Result<usize> {
        self.ensure_buffering("replace buffered output")?;

        let find = find.as_ref();
        if find.is_empty() {
            return Ok(0);
        }

        let (content, count) = replace_all(&self.ambient, find, replacement.as_ref());
        if count > 0 {
            self.ambient = content;
        }

        tracing::trace!(count, "replaced in buffered output");
        Ok(count)
    }

    /// Opens a capture window. Writes are diverted into it until
    /// [`stop_capture`](Self::stop_capture), including while ambient
    /// buffering is active.
    pub fn start_capture(&mut self) -> Result<()> {
        if self.capturing {
            return Err(ProgrammerError::AlreadyCapturing.into());
        }

        self.capture.clear();
        self.capturing = true;
        tracing::debug!(state = %self.state(), "started capture");
        Ok(())
    }

    /// Closes the capture window and returns what was written into it.
    pub fn stop_capture(&mut self) -> Result<Vec<u8>> {
        if !self.capturing {
            return Err(ProgrammerError::NotCapturing.into());
        }

        self.capturing = false;
        let captured = std::mem::take(&mut self.capture);
        tracing::debug!(bytes = captured.len(), state = %self.state(), "stopped capture");
        Ok(captured)
    }

    /// Like [`stop_capture`](Self::stop_capture), but decodes the capture as
    /// UTF-8. The capture is closed even if decoding fails.
    pub fn stop_capture_string(&mut self) -> Result<String> {
        let captured = self.stop_capture()?;
        String::from_utf8(captured).map_err(Error::Utf8)
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_capturing(&self) -> bool {
        self.capturing
    }

    pub fn state(&self) -> State {
        match (self.started, self.capturing) {
            (false, false) => State::Idle,
            (true, false) => State::Buffering,
            (false, true) => State::Capturing,
            (true, true) => State::BufferingThenCapturing,
        }
    }

    pub fn encoding(&self) -> Encoding {
        self.config.encoding
    }

    pub fn get_ref(&self) -> &W {
        &self.output
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.output
    }

    /// Returns the output target. Ambient or captured content that has not
    /// been flushed is discarded.
    pub fn into_inner(self) -> W {
        if self.started && !self.ambient.is_empty() {
            tracing::warn!(
                bytes = self.ambient.len(),
                "discarding unflushed buffered output"
            );
        }
        if self.capturing && !self.capture.is_empty() {
            tracing::warn!(
                bytes = self.capture.len(),
                "discarding unfinished capture"
            );
        }
        self.output
    }
}

impl<W: Write> Write for Buffer<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.capturing {
            self.capture.extend_from_slice(buf);
            Ok(buf.len())
        } else if self.started {
            self.ambient.extend_from_slice(buf);
            Ok(buf.len())
        } else {
            self.output.write(buf)
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.capturing || self.started {
            return Ok(());
        }
        self.output.flush()
    }
}

/// Replaces non-overlapping matches left to right. Replacement text is not
/// rescanned.
fn replace_all(haystack: &[u8], find: &[u8], replacement: &[u8]) -> (Vec<u8>, usize) {
    let mut out = Vec::with_capacity(haystack.len());
    let mut rest = haystack;
    let mut count = 0;

    while let Some(pos) = twoway::find_bytes(rest, find) {
        out.extend_from_slice(&rest[..pos]);
        out.extend_from_slice(replacement);
        rest = &rest[pos + find.len()..];
        count += 1;
    }

    out.extend_from_slice(rest);
    (out, count)
}
