//! Bounded text buffer for dumps

use std::fmt;

/// Size policy for a rendered dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureLimit {
    /// At most this many bytes; the rest is dropped and flagged.
    Bytes(usize),
    /// Keep everything.
    Unbounded,
}

impl CaptureLimit {
    /// Default buffer size for a capture.
    pub const DEFAULT_BYTES: usize = 102_400;

    /// `0` means unbounded.
    pub fn from_bytes(bytes: usize) -> Self {
        if bytes == 0 {
            CaptureLimit::Unbounded
        } else {
            CaptureLimit::Bytes(bytes)
        }
    }

    pub fn max_bytes(&self) -> Option<usize> {
        match self {
            CaptureLimit::Bytes(n) => Some(*n),
            CaptureLimit::Unbounded => None,
        }
    }
}

impl Default for CaptureLimit {
    fn default() -> Self {
        CaptureLimit::Bytes(Self::DEFAULT_BYTES)
    }
}

/// A rendered dump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureReport {
    /// Length of `text` in bytes.
    pub bytes: usize,
    /// The dump.
    pub text: String,
    /// Whether output was dropped to respect the limit.
    pub truncated: bool,
}

impl fmt::Display for CaptureReport {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "Stack of {} bytes: {}", self.bytes, self.text)
    }
}

/// `fmt::Write` sink that stops accepting text at its limit.
///
/// Writes never fail: once full, further input is discarded and the buffer
/// remembers that it truncated. Cuts fall on UTF-8 boundaries.
#[derive(Debug)]
pub(crate) struct CaptureBuffer {
    text: String,
    limit: CaptureLimit,
    truncated: bool,
}

impl CaptureBuffer {
    pub(crate) fn new(limit: CaptureLimit) -> Self {
        let text = match limit {
            CaptureLimit::Bytes(n) => String::with_capacity(n.min(CaptureLimit::DEFAULT_BYTES)),
            CaptureLimit::Unbounded => String::new(),
        };
        Self {
            text,
            limit,
            truncated: false,
        }
    }

    pub(crate) fn finish(self) -> CaptureReport {
        CaptureReport {
            bytes: self.text.len(),
            text: self.text,
            truncated: self.truncated,
        }
    }
}

impl fmt::Write for CaptureBuffer {
    fn write_str(
        &mut self,
        s: &str,
    ) -> fmt::Result {
        // The dump must stay a prefix of the full text: nothing after a cut.
        if self.truncated {
            return Ok(());
        }
        let Some(max) = self.limit.max_bytes() else {
            self.text.push_str(s);
            return Ok(());
        };

        let room = max.saturating_sub(self.text.len());
        if s.len() <= room {
            self.text.push_str(s);
            return Ok(());
        }

        let mut cut = room;
        while !s.is_char_boundary(cut) {
            cut -= 1;
        }
        self.text.push_str(&s[..cut]);
        self.truncated = true;
        Ok(())
    }
}
