use crate::SstError;
use codec::{decode_entry, decode_header, Cursor, Entry, Tag, MAGIC, VERSION};
use std::fs;
use std::path::Path;

/// The outcome of a point lookup in a single SST file.
#[derive(Debug, PartialEq, Eq)]
pub enum Lookup {
    Found(Vec<u8>),
    Deleted,
    NotFound,
}

/// An SST file that has passed the whole-file integrity checks (magic, CRC,
/// version) and is ready to be scanned for entries.
pub struct OpenedSst {
    smallest: Vec<u8>,
    largest: Vec<u8>,
    entry_count: u32,
    /// The decompressed payload, header included, trailer excluded.
    payload: Vec<u8>,
    /// Byte offset within `payload` where the entry sequence begins.
    entries_offset: usize,
}

impl OpenedSst {
    #[must_use]
    pub fn smallest(&self) -> &[u8] {
        &self.smallest
    }

    #[must_use]
    pub fn largest(&self) -> &[u8] {
        &self.largest
    }

    #[must_use]
    pub fn entry_count(&self) -> u32 {
        self.entry_count
    }

    /// Returns `true` if `key` cannot possibly be present in this file,
    /// letting the caller skip decoding any entries at all (§4.5 step 4).
    #[must_use]
    pub fn out_of_range(&self, key: &[u8]) -> bool {
        key < self.smallest.as_slice() || key > self.largest.as_slice()
    }

    /// Decodes and yields every entry in ascending key order.
    pub fn entries(&self) -> EntryIter<'_> {
        EntryIter {
            cursor: Cursor::new(&self.payload[self.entries_offset..]),
            remaining: self.entry_count,
        }
    }
}

/// Lazily decodes the entries following an SST header.
pub struct EntryIter<'a> {
    cursor: Cursor<'a>,
    remaining: u32,
}

impl Iterator for EntryIter<'_> {
    type Item = Result<Entry, SstError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        match decode_entry(&mut self.cursor) {
            Ok(entry) => Some(Ok(entry)),
            Err(e) => Some(Err(SstError::Format(format!(
                "entry decode failed inside a checksum-verified file: {e}"
            )))),
        }
    }
}

/// Reads and gzip-decompresses `path`, then validates its magic number, its
/// CRC32 trailer, and its version (§4.5 steps 1-3, 5).
///
/// Every failure here is a per-file format problem — a bad magic, a
/// checksum mismatch, an unreadable version, or a gzip stream that refuses
/// to decompress — surfaced as [`SstError::Format`] so the caller can skip
/// this file and keep going, per §7's propagation policy. A genuine I/O
/// failure opening or reading the file is [`SstError::Io`] and propagates.
pub fn open(path: &Path) -> Result<OpenedSst, SstError> {
    let compressed = fs::read(path)?;
    let body = codec::decompress(&compressed)
        .map_err(|e| SstError::Format(format!("gzip decompress failed: {e}")))?;

    if body.len() < 4 {
        return Err(SstError::Format("sstable shorter than its own trailer".into()));
    }
    let trailer_at = body.len() - 4;
    let stored_checksum = u32::from_le_bytes(body[trailer_at..].try_into().unwrap());
    let computed_checksum = codec::crc32(&body[..trailer_at]);
    if computed_checksum != stored_checksum {
        return Err(SstError::Format(format!(
            "checksum mismatch: stored {stored_checksum:#010x}, computed {computed_checksum:#010x}"
        )));
    }

    let mut cursor = Cursor::new(&body[..trailer_at]);
    let header = decode_header(&mut cursor)
        .map_err(|e| SstError::Format(format!("malformed header: {e}")))?;

    if header.magic != MAGIC {
        return Err(SstError::Format(format!(
            "bad magic {:#x}, expected {:#x}",
            header.magic, MAGIC
        )));
    }
    if header.version != VERSION {
        return Err(SstError::Format(format!(
            "unsupported version {}, expected {}",
            header.version, VERSION
        )));
    }

    let entries_offset = cursor.position();
    let mut payload = body;
    payload.truncate(trailer_at);

    Ok(OpenedSst {
        smallest: header.smallest,
        largest: header.largest,
        entry_count: header.entry_count,
        payload,
        entries_offset,
    })
}

/// Looks up `key` in a single SST file, applying §4.5's full procedure:
/// range-prune on the header's smallest/largest keys, then a linear scan.
pub fn lookup(path: &Path, key: &[u8]) -> Result<Lookup, SstError> {
    let sst = open(path)?;
    if sst.out_of_range(key) {
        return Ok(Lookup::NotFound);
    }
    for entry in sst.entries() {
        let entry = entry?;
        if entry.key == key {
            return Ok(match entry.tag {
                Tag::Set => Lookup::Found(entry.value.unwrap_or_default()),
                Tag::Del => Lookup::Deleted,
            });
        }
    }
    Ok(Lookup::NotFound)
}
