//! Error types for dump carving.

use thiserror::Error;

/// Errors that can occur while carving artifacts out of a dump.
#[derive(Error, Debug)]
pub enum CarveError {
    /// A begin or end marker was not found anywhere in the buffer.
    #[error("{target} marker not found (searched for [{marker}])")]
    MarkerNotFound {
        target: &'static str,
        /// The marker bytes, hex-encoded.
        marker: String,
    },

    /// The adjusted begin offset does not land inside the buffer.
    #[error("seek to adjusted begin offset {offset} failed (buffer is {len} bytes)")]
    SeekMismatch { offset: i64, len: usize },

    /// Region bounds are inverted or exceed the buffer.
    #[error("invalid region bounds [{begin} : {end}) in a {len}-byte buffer")]
    InvalidRange { begin: i64, end: i64, len: usize },

    /// Extracted bytes are not valid UTF-8.
    #[error("{target} is not valid UTF-8")]
    Encoding {
        target: &'static str,
        #[source]
        source: std::str::Utf8Error,
    },

    /// Extracted bytes did not parse as JSON.
    #[error("{target} is not valid JSON: {source}; bytes: [{bytes_ascii}]")]
    MalformedJson {
        target: &'static str,
        #[source]
        source: serde_json::Error,
        /// Offending bytes, hex-encoded.
        bytes_hex: String,
        /// Offending bytes with non-printables replaced by '.'.
        bytes_ascii: String,
        /// Binary header preceding the JSON, when the record carries one.
        header_hex: Option<String>,
    },

    /// The `:::0` delimiter is missing from the token record.
    #[error("token header delimiter not found in a {record_len}-byte record")]
    HeaderDelimiterNotFound { record_len: usize },

    /// The context document has no entries under "Contexts".
    #[error("no context ids found under \"Contexts\"")]
    NoContextsFound,

    /// The context document does not have the expected nested shape.
    #[error("unexpected context shape: {0}")]
    UnexpectedShape(String),

    /// I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CarveError {
    /// Create a MarkerNotFound error for the given marker bytes.
    pub fn marker_not_found(target: &'static str, marker: &[u8]) -> Self {
        CarveError::MarkerNotFound {
            target,
            marker: hex_dump_inline(marker),
        }
    }

    /// Create a MalformedJson error for a plain JSON region.
    pub fn malformed_json(target: &'static str, source: serde_json::Error, bytes: &[u8]) -> Self {
        CarveError::MalformedJson {
            target,
            source,
            bytes_hex: hex_dump_inline(bytes),
            bytes_ascii: printable_ascii(bytes),
            header_hex: None,
        }
    }

    /// Create a MalformedJson error for a record whose binary header should be
    /// preserved in the diagnostic.
    pub fn malformed_json_with_header(
        target: &'static str,
        source: serde_json::Error,
        header: &[u8],
        bytes: &[u8],
    ) -> Self {
        CarveError::MalformedJson {
            target,
            source,
            bytes_hex: hex_dump_inline(bytes),
            bytes_ascii: printable_ascii(bytes),
            header_hex: Some(hex_dump_inline(header)),
        }
    }
}

/// Result type for carving operations.
pub type CarveResult<T> = Result<T, CarveError>;

/// One-line hex string (space-separated bytes).
pub(crate) fn hex_dump_inline(data: &[u8]) -> String {
    data.iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Convert bytes to printable ASCII (non-printable → '.').
pub(crate) fn printable_ascii(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| {
            if b.is_ascii_graphic() || b == b' ' {
                b as char
            } else {
                '.'
            }
        })
        .collect()
}
