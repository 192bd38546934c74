//! Byte region locator — delimit a slice of the dump between two fixed markers.
//!
//! Artifacts in a dump are not framed by any parseable structure; they are
//! found by fixed byte signatures known to sit adjacent to the target data.
//! A `SearchPattern` names both signatures plus the signed adjustments that
//! turn the raw marker hits into precise region bounds.

use crate::error::{CarveError, CarveResult};

/// How to turn two marker hits into a region's bounds.
///
/// The end marker is searched from the adjusted begin offset onward, first
/// hit wins. Callers must pick an end marker that does not occur inside the
/// region before the real terminator.
pub struct SearchPattern {
    /// Name of the artifact, used in diagnostics.
    pub target: &'static str,
    /// Signature marking the start of the region.
    pub begin_marker: &'static [u8],
    /// Signature marking the end of the region.
    pub end_marker: &'static [u8],
    /// Signed correction applied to the begin marker hit.
    pub begin_adjust: i64,
    /// Signed correction applied to the end marker hit.
    pub end_adjust: i64,
}

/// A delimited region borrowed from the dump buffer.
#[derive(Debug)]
pub struct Region<'a> {
    /// Offset of the first region byte in the dump.
    pub begin: usize,
    /// Offset one past the last region byte.
    pub end: usize,
    /// The region contents, `buf[begin..end]`.
    pub bytes: &'a [u8],
}

/// Locate one region in `buf` according to `pattern`.
///
/// Fails with `MarkerNotFound` if either signature is absent, `SeekMismatch`
/// if the adjusted begin offset falls outside the buffer, and `InvalidRange`
/// if the computed bounds are inverted or exceed the buffer.
pub fn find_region<'a>(buf: &'a [u8], pattern: &SearchPattern) -> CarveResult<Region<'a>> {
    let begin_hit = find(buf, pattern.begin_marker)
        .ok_or_else(|| CarveError::marker_not_found(pattern.target, pattern.begin_marker))?;

    // Re-derive the cursor position after the adjustment and check it lands
    // inside the buffer. An adjustment that pushes the offset out of range
    // means the pattern does not fit this dump.
    let begin_signed = begin_hit as i64 + pattern.begin_adjust;
    let begin = usize::try_from(begin_signed)
        .ok()
        .filter(|&b| b <= buf.len())
        .ok_or(CarveError::SeekMismatch {
            offset: begin_signed,
            len: buf.len(),
        })?;

    // Search the end marker from the cursor onward.
    let end_hit = find(&buf[begin..], pattern.end_marker)
        .map(|rel| begin + rel)
        .ok_or_else(|| CarveError::marker_not_found(pattern.target, pattern.end_marker))?;

    let end_signed = end_hit as i64 + pattern.end_adjust;
    if end_signed < begin as i64 || end_signed > buf.len() as i64 {
        return Err(CarveError::InvalidRange {
            begin: begin as i64,
            end: end_signed,
            len: buf.len(),
        });
    }
    let end = end_signed as usize;

    Ok(Region {
        begin,
        end,
        bytes: &buf[begin..end],
    })
}

/// First occurrence of `needle` in `haystack`, memchr-accelerated on the
/// first byte.
fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }

    let first = needle[0];
    let mut pos = 0;
    while pos + needle.len() <= haystack.len() {
        let rel = memchr::memchr(first, &haystack[pos..])?;
        let abs = pos + rel;
        if abs + needle.len() > haystack.len() {
            return None;
        }
        if &haystack[abs..abs + needle.len()] == needle {
            return Some(abs);
        }
        pos = abs + 1;
    }
    None
}
