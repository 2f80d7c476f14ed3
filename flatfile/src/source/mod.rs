//! Line sources with encoding auto-detection.
//!
//! Flat files arrive from agency systems in UTF-8, Latin-1 or Windows-1252.
//! [`ReaderSource`] sniffs the first buffered chunk with `chardet` and then
//! decodes every line with the detected encoding.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use nibrs_flatfile::source::{LineSource, ReaderSource};
//!
//! let mut source = ReaderSource::from_path("incidents.txt", None)?;
//! while let Some(line) = source.next_line()? {
//!     println!("{}", line);
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use crate::error::{SourceError, SourceResult};

/// Read buffer size for file sources.
const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Supplies one logical line at a time.
pub trait LineSource {
    /// Name used in error contexts (usually the file path).
    fn source_name(&self) -> &str;

    /// Next line without its terminator, `None` at end of stream.
    fn next_line(&mut self) -> SourceResult<Option<String>>;
}

// =============================================================================
// Encoding
// =============================================================================

/// Supported input encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextEncoding {
    #[default]
    Utf8,
    Latin1,
    Windows1252,
}

impl TextEncoding {
    pub fn label(self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Latin1 => "iso-8859-1",
            TextEncoding::Windows1252 => "windows-1252",
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TextEncoding {
    type Err = SourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ascii" | "utf-8" | "utf8" => Ok(TextEncoding::Utf8),
            "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => Ok(TextEncoding::Latin1),
            "windows-1252" | "cp1252" => Ok(TextEncoding::Windows1252),
            other => Err(SourceError::UnsupportedEncoding(other.to_string())),
        }
    }
}

/// Detect the encoding of raw bytes using chardet.
///
/// Charsets outside the supported set fall back to (lossy) UTF-8.
pub fn detect_encoding(bytes: &[u8]) -> TextEncoding {
    if bytes.is_empty() {
        return TextEncoding::Utf8;
    }
    let (charset, _confidence, _language) = chardet::detect(bytes);
    charset.parse().unwrap_or(TextEncoding::Utf8)
}

/// Decode one line of raw bytes.
pub fn decode_line(bytes: &[u8], encoding: TextEncoding) -> String {
    match encoding {
        TextEncoding::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
        TextEncoding::Latin1 => encoding_rs::ISO_8859_15.decode(bytes).0.into_owned(),
        TextEncoding::Windows1252 => encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned(),
    }
}

// =============================================================================
// Reader source
// =============================================================================

/// Line source over any buffered reader.
pub struct ReaderSource<R> {
    reader: R,
    name: String,
    encoding: TextEncoding,
    buffer: Vec<u8>,
}

impl<R: BufRead> ReaderSource<R> {
    /// Wrap `reader`, detecting the encoding from its first buffered chunk.
    pub fn new(mut reader: R, name: impl Into<String>) -> SourceResult<Self> {
        let encoding = detect_encoding(reader.fill_buf()?);
        Ok(Self::with_encoding(reader, name, encoding))
    }

    /// Wrap `reader` with a known encoding.
    pub fn with_encoding(reader: R, name: impl Into<String>, encoding: TextEncoding) -> Self {
        Self {
            reader,
            name: name.into(),
            encoding,
            buffer: Vec::new(),
        }
    }

    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }
}

impl ReaderSource<BufReader<File>> {
    /// Open a file; `encoding` overrides detection.
    pub fn from_path(path: impl AsRef<Path>, encoding: Option<TextEncoding>) -> SourceResult<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let reader = BufReader::with_capacity(READ_BUFFER_SIZE, file);
        let name = path.display().to_string();
        match encoding {
            Some(encoding) => Ok(Self::with_encoding(reader, name, encoding)),
            None => Self::new(reader, name),
        }
    }
}

impl<R: BufRead> LineSource for ReaderSource<R> {
    fn source_name(&self) -> &str {
        &self.name
    }

    fn next_line(&mut self) -> SourceResult<Option<String>> {
        self.buffer.clear();
        if self.reader.read_until(b'\n', &mut self.buffer)? == 0 {
            return Ok(None);
        }
        if self.buffer.last() == Some(&b'\n') {
            self.buffer.pop();
            if self.buffer.last() == Some(&b'\r') {
                self.buffer.pop();
            }
        }
        Ok(Some(decode_line(&self.buffer, self.encoding)))
    }
}
