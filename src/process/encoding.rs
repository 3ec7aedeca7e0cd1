//! Decoding of captured output lines.

use std::borrow::Cow;

/// Character encoding applied to both captured streams.
///
/// The default is UTF-8 on every platform. On Windows this differs from the
/// console code page a child may write in, so select [`OutputEncoding::Latin1`]
/// or transcode the output when a child emits legacy code page text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputEncoding {
    /// UTF-8. Invalid sequences decode to U+FFFD.
    #[default]
    Utf8,
    /// ISO-8859-1: every byte maps to the code point of the same value.
    Latin1,
}

impl OutputEncoding {
    fn decode(self, bytes: &[u8]) -> Cow<'_, str> {
        match self {
            Self::Utf8 => String::from_utf8_lossy(bytes),
            Self::Latin1 => Cow::Owned(bytes.iter().copied().map(char::from).collect()),
        }
    }
}

/// Treatment of line terminators in captured output.
///
/// Captured text keeps its terminators by default. `Strip` removes each
/// line's `\n` or `\r\n` and concatenates the lines directly, which loses the
/// line structure but matches hosts that rebuilt output from bare lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEndings {
    /// Keep every line terminator as received.
    #[default]
    Preserve,
    /// Drop line terminators.
    Strip,
}

impl LineEndings {
    fn apply(self, line: &[u8]) -> &[u8] {
        match self {
            Self::Preserve => line,
            Self::Strip => {
                let body = line.strip_suffix(b"\n").unwrap_or(line);
                if body.len() < line.len() {
                    body.strip_suffix(b"\r").unwrap_or(body)
                } else {
                    body
                }
            }
        }
    }
}

/// Per-stream decoding settings handed to a pipe reader.
#[derive(Debug, Clone, Copy, Default)]
pub(super) struct LineDecoder {
    encoding: OutputEncoding,
    line_endings: LineEndings,
}

impl LineDecoder {
    pub(super) const fn new(encoding: OutputEncoding, line_endings: LineEndings) -> Self {
        Self {
            encoding,
            line_endings,
        }
    }

    pub(super) fn decode(self, line: &[u8]) -> Cow<'_, str> {
        self.encoding.decode(self.line_endings.apply(line))
    }
}
