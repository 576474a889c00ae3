use crate::SstError;
use codec::{encode_entry, Entry, Tag};
use memtable::TaggedValue;
use std::fs::{rename, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Writes `entries` (already in ascending key order, no duplicate keys) to a
/// new SST file at `path`.
///
/// Whether tombstones are present in the output is entirely up to what the
/// caller passes in: a flush iterates the memtable directly, tombstones and
/// all (§4.4 step 1); a compaction iterates a merged map from which DEL
/// erased every superseded key, so by construction nothing left to iterate
/// is a tombstone (§4.6).
///
/// The write is crash-safe: the whole gzip-compressed byte sequence is
/// built in memory, written to a temp file next to `path`, fsynced, and
/// atomically renamed into place — the same pattern the teacher's SSTable
/// writer uses for its own (differently shaped) file format.
///
/// # Errors
///
/// Returns [`SstError::Io`] if `entries` is empty (there is nothing
/// meaningful to write: no smallest/largest key) or on any I/O failure,
/// including a gzip compression failure — per `SPEC_FULL.md`'s design
/// decisions, gzip failures are fatal to the write that triggered them.
pub fn write<I>(path: &Path, entries: I) -> Result<(), SstError>
where
    I: Iterator<Item = (Vec<u8>, TaggedValue)>,
{
    let materialized: Vec<(Vec<u8>, TaggedValue)> = entries.collect();
    if materialized.is_empty() {
        return Err(SstError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "refusing to write an sstable with zero entries",
        )));
    }

    let smallest = materialized[0].0.clone();
    let largest = materialized[materialized.len() - 1].0.clone();

    let mut body = codec::encode_header(materialized.len() as u32, &smallest, &largest);
    for (key, value) in &materialized {
        let entry = match value {
            TaggedValue::Set(v) => Entry {
                key: key.clone(),
                tag: Tag::Set,
                value: Some(v.clone()),
            },
            TaggedValue::Del => Entry::del(key.clone()),
        };
        encode_entry(&entry, &mut body);
    }

    let checksum = codec::crc32(&body);
    body.extend_from_slice(&checksum.to_le_bytes());

    let compressed = codec::compress(&body)?;

    let tmp_path = path.with_extension("sst.tmp");
    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&tmp_path)?;
    file.write_all(&compressed)?;
    file.sync_all()?;
    drop(file);

    rename(&tmp_path, path)?;

    if let Some(parent) = path.parent() {
        if let Ok(dir) = std::fs::File::open(parent) {
            let _ = dir.sync_all();
        }
    }

    Ok(())
}
