//! Authentication-context extraction — locate and validate the sign-in
//! context JSON inside a dump.

use crate::error::{CarveError, CarveResult};
use crate::memory::locator::{find_region, SearchPattern};
use tracing::info;

/// UTF-8 BOM followed by a pretty-printed object opener (`{` CRLF two spaces).
const CONTEXT_BEGIN: &[u8] = b"\xef\xbb\xbf\x7b\x0d\x0a\x20\x20";

/// Closing brace followed by a NUL terminator. Shared by both artifacts.
pub(crate) const REGION_END: &[u8] = b"\x7d\x00";

/// The context JSON sits behind a BOM; +3 realigns the region to the `{`.
/// +1 keeps the closing brace and drops the NUL.
const CONTEXT_PATTERN: SearchPattern = SearchPattern {
    target: "authentication context",
    begin_marker: CONTEXT_BEGIN,
    end_marker: REGION_END,
    begin_adjust: 3,
    end_adjust: 1,
};

/// Locate the authentication-context JSON in the dump and validate it.
///
/// The returned bytes are the raw region, untransformed. Decoding and parsing
/// here are a confidence check only; the document is re-serialized later by
/// the embedder.
pub fn extract_context(buf: &[u8]) -> CarveResult<Vec<u8>> {
    let region = find_region(buf, &CONTEXT_PATTERN)?;
    info!(
        begin = region.begin,
        end = region.end,
        "located raw authentication context"
    );

    let text = std::str::from_utf8(region.bytes).map_err(|source| CarveError::Encoding {
        target: "authentication context",
        source,
    })?;
    serde_json::from_str::<serde_json::Value>(text)
        .map_err(|e| CarveError::malformed_json("authentication context", e, region.bytes))?;

    Ok(region.bytes.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CarveError;

    /// Wrap `json` in the on-disk context framing (BOM prefix, NUL suffix).
    fn framed(json: &[u8]) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(b"\x00\x01filler");
        buf.extend_from_slice(b"\xef\xbb\xbf");
        buf.extend_from_slice(json);
        buf.push(0x00);
        buf.extend_from_slice(b"trailing junk");
        buf
    }

    #[test]
    fn test_extract_valid_context() {
        let json = b"{\r\n  \"Contexts\": {\"abc\": {\"TokenCache\": {\"CacheData\": \"\"}}}}";
        let buf = framed(json);
        let out = extract_context(&buf).unwrap();
        assert_eq!(out, json);
    }

    #[test]
    fn test_missing_context_signature() {
        let buf = b"no bom-prefixed object here }\x00";
        assert!(matches!(
            extract_context(buf),
            Err(CarveError::MarkerNotFound { .. })
        ));
    }

    #[test]
    fn test_truncated_json_is_malformed() {
        // Region closes on a brace that does not balance the document.
        let json = b"{\r\n  \"Contexts\": {\"abc\": {}}";
        let buf = framed(json);
        match extract_context(&buf) {
            Err(CarveError::MalformedJson { target, .. }) => {
                assert_eq!(target, "authentication context");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_utf8_is_encoding_error() {
        let json = b"{\r\n  \"k\": \"\xff\xfe\"}";
        let buf = framed(json);
        assert!(matches!(
            extract_context(&buf),
            Err(CarveError::Encoding { .. })
        ));
    }
}
