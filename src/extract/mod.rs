//! Extraction pipeline — carve both artifacts from a dump and merge them.
//!
//! A strict linear sequence of one-shot steps: locate and validate the
//! authentication context, locate and split the cached token record, embed
//! the token into the context. Any failure aborts the run; there is no retry
//! and no partial output.

pub mod context;
pub mod embed;
pub mod token;

use crate::error::CarveResult;
use crate::memory::image::DumpImage;

/// Run the full carve over a mapped dump.
///
/// Returns the token-embedded context document as compact JSON bytes.
pub fn carve(image: &DumpImage) -> CarveResult<Vec<u8>> {
    let buf = image.bytes();
    let context_json = context::extract_context(buf)?;
    let record = token::extract_cached_token(buf)?;
    embed::embed_cached_token(&context_json, &record.header, &record.token_json)
}
