//! Compaction: merges a set of SST files into one (§4.6).
//!
//! Triggered from the flush path (§4.4 step 6) whenever the SST count
//! reaches `compactingSize`. Unlike the teacher's heap-based
//! `MergeIterator` over L0 and L1 readers, there are no levels here to
//! distinguish — every `db_*.sst` file is a candidate, folded oldest-first
//! into a single ordered map, which both resolves newest-wins and collapses
//! SET-then-DEL into nothing, by construction.

use codec::Tag;
use std::collections::BTreeMap;
use std::path::Path;

use memtable::TaggedValue;

/// Compacts every `db_*.sst` file in `dir` into one, if there are at least
/// `compacting_size` of them.
///
/// # Errors
///
/// Propagates any I/O failure from reading, writing, or deleting SST files.
/// A per-file *format* error (bad magic, bad CRC, unreadable version) is
/// logged and that input is skipped rather than failing the whole
/// compaction (§7: "invalid files are skipped with a diagnostic — they are
/// NOT treated as fatal").
pub(crate) fn maybe_compact(dir: &Path, compacting_size: usize) -> anyhow::Result<()> {
    let paths = crate::list_sst_files(dir)?;
    if paths.len() < compacting_size {
        return Ok(());
    }
    compact(dir, &paths)
}

/// Merges `inputs` (oldest-first) into a single new SST, then deletes them.
///
/// Algorithm (§4.6): initialize an empty ordered map; for each input file
/// oldest-first, upsert every SET and erase every DEL. The result contains
/// only live keys — nothing left in the map can be a tombstone, so the
/// output SST needs none (§4.1: "a compaction emits only live SET
/// entries").
fn compact(dir: &Path, inputs: &[std::path::PathBuf]) -> anyhow::Result<()> {
    let mut merged: BTreeMap<Vec<u8>, Vec<u8>> = BTreeMap::new();

    for path in inputs {
        let sst = match sstable::open(path) {
            Ok(sst) => sst,
            Err(sstable::SstError::Format(msg)) => {
                tracing::warn!(path = %path.display(), error = %msg, "skipping unreadable sstable during compaction");
                continue;
            }
            Err(sstable::SstError::Io(e)) => return Err(e.into()),
        };

        for entry in sst.entries() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(sstable::SstError::Format(msg)) => {
                    tracing::warn!(path = %path.display(), error = %msg, "skipping unreadable entry during compaction");
                    continue;
                }
                Err(sstable::SstError::Io(e)) => return Err(e.into()),
            };
            match entry.tag {
                Tag::Set => {
                    merged.insert(entry.key, entry.value.unwrap_or_default());
                }
                Tag::Del => {
                    merged.remove(&entry.key);
                }
            }
        }
    }

    // Every remaining tombstone has already canceled its SET: if nothing
    // survives, there is nothing to write, but the inputs are still
    // superseded and must still be removed.
    if !merged.is_empty() {
        let nanos = crate::now_nanos()?;
        let out_path = dir.join(crate::sst_filename(nanos));
        sstable::write(
            &out_path,
            merged.into_iter().map(|(k, v)| (k, TaggedValue::Set(v))),
        )?;
    }

    for path in inputs {
        if let Err(e) = std::fs::remove_file(path) {
            tracing::warn!(path = %path.display(), error = %e, "failed to remove compacted sstable");
        }
    }

    Ok(())
}
