//! # Codec
//!
//! Wire formats shared by [`wal`](../wal/index.html) and
//! [`sstable`](../sstable/index.html): the entry encoding, the SST header/
//! trailer framing, the CRC32 checksum, and the gzip wrap/unwrap used for
//! every on-disk SST.
//!
//! ## Entry wire form
//!
//! ```text
//! SET: tag=0x00 | keyLen:u32 LE | key | valLen:u32 LE | val
//! DEL: tag=0x01 | keyLen:u32 LE | key
//! ```
//!
//! A [`Cursor`] walks a byte slice and advances as entries are decoded from
//! it; both the WAL reader and the SST reader drive the same [`decode_entry`]
//! over their own buffers.
//!
//! ## SST wire form (pre-compression)
//!
//! ```text
//! magic:u32 = 1234
//! entryCount:u32
//! sKeyLen:u32 | sKey
//! lKeyLen:u32 | lKey
//! version:u16 = 1
//! entry[0] .. entry[entryCount-1]
//! checksum:u32   -- CRC32/IEEE over every byte above
//! ```
//!
//! The on-disk file is the gzip compression of the sequence above; the WAL
//! carries raw, uncompressed entries with no such framing at all.

mod entry;
mod gzip;
mod sst;

pub use entry::{decode_entry, encode_entry, Cursor, Entry, Tag};
pub use gzip::{compress, decompress};
pub use sst::{decode_header, encode_header, SstHeader, MAGIC, VERSION};

use crc32fast::Hasher;

/// Computes the CRC32/IEEE checksum of `data`, matching the checksum field
/// in the SST trailer.
#[must_use]
pub fn crc32(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Errors produced while decoding a wire-format byte sequence.
///
/// These are format-level failures only — I/O failures belong to the caller
/// (the WAL or SST reader), which knows whether a given failure is fatal or,
/// per the per-file policy, should be swallowed and reported as a
/// diagnostic.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("unexpected end of buffer while decoding")]
    Truncated,
    #[error("unknown entry tag byte {0:#04x}")]
    UnknownTag(u8),
}
