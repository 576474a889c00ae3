//! WAL replay at startup (§4.3, §5).
//!
//! "Startup replay of the WAL is performed before the first external
//! operation is accepted" (§5) — [`Engine::open`] calls [`recover`] before
//! constructing its [`wal::WalWriter`].

use codec::Tag;
use memtable::Memtable;
use std::path::Path;

use crate::{compaction, write};

/// Replays `wal_path` into `mem`, in write order.
///
/// "If during replay the memtable reaches the flush threshold, a flush is
/// performed and replay continues against the now-empty memtable" (§4.3).
/// This is safe because [`wal::replay`] reads the whole WAL file into memory
/// before decoding it, so removing the on-disk file mid-replay (as a
/// threshold-triggered flush does) never affects the entries still to be
/// applied.
///
/// # Errors
///
/// Propagates any I/O failure from reading the WAL or from a
/// replay-triggered flush.
pub fn recover(
    dir: &Path,
    wal_path: &Path,
    mem: &mut Memtable,
    mem_limit: usize,
    compacting_size: usize,
) -> anyhow::Result<()> {
    let mut flush_error: Option<anyhow::Error> = None;

    wal::replay(wal_path, |entry| {
        if flush_error.is_some() {
            return;
        }

        match entry.tag {
            Tag::Set => mem.put(entry.key, entry.value.unwrap_or_default()),
            Tag::Del => mem.delete(entry.key),
        }

        if mem.len() == mem_limit {
            match write::flush_to_sst(dir, mem) {
                Ok(_path) => {
                    mem.clear();
                    if let Err(e) = std::fs::remove_file(wal_path) {
                        if e.kind() != std::io::ErrorKind::NotFound {
                            tracing::warn!(
                                path = %wal_path.display(),
                                error = %e,
                                "failed to remove WAL during replay-triggered flush",
                            );
                        }
                    }
                    if let Err(e) = compaction::maybe_compact(dir, compacting_size) {
                        flush_error = Some(e);
                    }
                }
                Err(e) => flush_error = Some(e),
            }
        }
    })?;

    if let Some(e) = flush_error {
        return Err(e);
    }
    Ok(())
}
