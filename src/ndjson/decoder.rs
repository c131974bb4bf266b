//! Line framing for chunked NDJSON byte streams.

/// Incremental decoder that turns arbitrary byte chunks into complete lines.
///
/// The backend streams one JSON object per newline-terminated line, but the
/// transport delivers opaque chunks that can split a line (or a multi-byte
/// UTF-8 code point) anywhere. The decoder buffers raw bytes and only
/// decodes text once a full line is available.
///
/// Blank and whitespace-only lines are dropped. When the stream ends, any
/// non-empty remainder is not a complete frame and is discarded via
/// [`LineDecoder::finish`].
#[derive(Debug, Default)]
pub struct LineDecoder {
    buffer: Vec<u8>,
}

impl LineDecoder {
    /// Create a new decoder with an empty carry-over buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk and return every complete line it unlocked, in order.
    pub fn push_chunk(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let mut line_bytes: Vec<u8> = self.buffer.drain(..=pos).collect();
            line_bytes.pop();
            if line_bytes.last() == Some(&b'\r') {
                line_bytes.pop();
            }

            let line = String::from_utf8_lossy(&line_bytes);
            if !line.trim().is_empty() {
                lines.push(line.into_owned());
            }
        }
        lines
    }

    /// Signal end-of-stream.
    ///
    /// Returns the discarded partial fragment, if any, so the caller can log
    /// it. The buffer is left empty either way.
    pub fn finish(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            return None;
        }
        let remainder = String::from_utf8_lossy(&self.buffer).into_owned();
        self.buffer.clear();
        if remainder.trim().is_empty() {
            None
        } else {
            Some(remainder)
        }
    }

    /// Whether a partial line is currently buffered.
    pub fn has_partial(&self) -> bool {
        !self.buffer.is_empty()
    }
}
