//! Cached-token extraction — locate the token record and split its binary
//! header from the token JSON.

use crate::error::{CarveError, CarveResult};
use crate::extract::context::REGION_END;
use crate::memory::locator::{find_region, SearchPattern};
use tracing::{debug, info};

/// Fixed token-record signature: an 8-byte record preamble, a 2-byte
/// length/type prefix, and the tenant authority URL.
const TOKEN_BEGIN: &[u8] =
    b"\x03\x00\x00\x00\x01\x00\x00\x00\x91\x01https://login.windows.net/";

/// Sub-delimiter separating the binary header from the token JSON.
const HEADER_DELIMITER: &[u8] = b":::0";

/// Delimiter length plus the fixed-width count field that follows it.
const HEADER_DELIMITER_SKIP: usize = 6;

/// The marker start is the record start; +1 on the end keeps the closing
/// brace and drops the NUL.
const TOKEN_PATTERN: SearchPattern = SearchPattern {
    target: "cached token",
    begin_marker: TOKEN_BEGIN,
    end_marker: REGION_END,
    begin_adjust: 0,
    end_adjust: 1,
};

/// A cached-token record split at the header delimiter.
///
/// The header is an opaque binary run, never parsed, preserved verbatim so it
/// can be re-embedded byte for byte. Only the JSON half is validated.
#[derive(Debug)]
pub struct CachedTokenRecord {
    pub header: Vec<u8>,
    pub token_json: Vec<u8>,
}

/// Locate the cached-token record in the dump and split it.
pub fn extract_cached_token(buf: &[u8]) -> CarveResult<CachedTokenRecord> {
    let region = find_region(buf, &TOKEN_PATTERN)?;
    info!(
        begin = region.begin,
        end = region.end,
        "located raw cached token record"
    );

    let delim = find_delimiter(region.bytes).ok_or(CarveError::HeaderDelimiterNotFound {
        record_len: region.bytes.len(),
    })?;
    let split = delim + HEADER_DELIMITER_SKIP;
    if split > region.bytes.len() {
        // Delimiter present but the count field is cut off.
        return Err(CarveError::HeaderDelimiterNotFound {
            record_len: region.bytes.len(),
        });
    }
    debug!(split, "token header/JSON split offset");

    let header = &region.bytes[..split];
    let token_json = &region.bytes[split..];

    // from_slice also rejects invalid UTF-8, which for this record is
    // reported as malformed JSON together with the header diagnostics.
    serde_json::from_slice::<serde_json::Value>(token_json).map_err(|e| {
        CarveError::malformed_json_with_header("cached token", e, header, token_json)
    })?;

    Ok(CachedTokenRecord {
        header: header.to_vec(),
        token_json: token_json.to_vec(),
    })
}

/// First occurrence of the `:::0` delimiter in the record.
fn find_delimiter(record: &[u8]) -> Option<usize> {
    record
        .windows(HEADER_DELIMITER.len())
        .position(|w| w == HEADER_DELIMITER)
}
