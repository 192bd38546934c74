//! Memory-mapped dump image — read-only view over the whole input file.

use crate::error::CarveResult;
use memmap2::Mmap;
use std::fs::File;
use std::path::Path;

/// A read-only memory-mapped process dump.
///
/// The file is mapped once for the duration of a run and released on drop.
/// The dump is treated as an opaque byte stream; no minidump directory
/// parsing happens here or anywhere else.
pub struct DumpImage {
    /// None for a zero-length file, which cannot be mapped on all platforms.
    mmap: Option<Mmap>,
}

impl DumpImage {
    /// Map a dump file read-only.
    pub fn open(path: impl AsRef<Path>) -> CarveResult<Self> {
        let file = File::open(path)?;
        let size = file.metadata()?.len();

        if size == 0 {
            return Ok(DumpImage { mmap: None });
        }

        let mmap = unsafe { Mmap::map(&file)? };
        Ok(DumpImage { mmap: Some(mmap) })
    }

    /// The full dump contents as a byte slice.
    pub fn bytes(&self) -> &[u8] {
        self.mmap.as_deref().unwrap_or(&[])
    }

    /// Size of the dump in bytes.
    pub fn size(&self) -> usize {
        self.bytes().len()
    }
}
