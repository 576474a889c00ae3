//! # SSTable
//!
//! Immutable, on-disk sorted runs for the storage engine (§3, §4.1, §4.5).
//!
//! A flush or a compaction produces one of these; once created, a file is
//! never modified, only read, and eventually deleted once a later
//! compaction has superseded it.
//!
//! ## File layout
//!
//! The on-disk bytes are a single gzip stream. Decompressed, they are:
//!
//! ```text
//! magic:u32 = 1234
//! entryCount:u32
//! sKeyLen:u32 | sKey        -- smallest key in the run
//! lKeyLen:u32 | lKey        -- largest key in the run
//! version:u16 = 1
//! entry[0] .. entry[entryCount-1]
//! checksum:u32              -- CRC32/IEEE of every byte above
//! ```
//!
//! There is exactly one version of this format — no bloom filter, no index
//! section, no multi-version footer. A point lookup decompresses the whole
//! file and linearly scans its entries; there is no persistent file handle
//! or in-memory index kept between calls (§5: "Readers of SST files
//! open-read-close per operation").

mod reader;
mod writer;

pub use reader::{lookup, open, Lookup, OpenedSst};
pub use writer::write;

use thiserror::Error;

/// Errors raised while reading or writing an SST file.
///
/// [`SstError::Format`] is the per-file, non-fatal case §7 describes: bad
/// magic, a CRC mismatch, an unexpected version, or a gzip stream that fails
/// to decompress. Callers (the engine's read path and the compactor) catch
/// this variant, log a diagnostic, and move on to the next file.
/// [`SstError::Io`] is a genuine syscall failure and always propagates.
#[derive(Debug, Error)]
pub enum SstError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("format error: {0}")]
    Format(String),
}

#[cfg(test)]
mod tests;
