//! # Engine
//!
//! The central orchestrator that ties together [`memtable`], [`wal`], and
//! [`sstable`] into a complete embedded LSM-tree key-value store (§2, §4.7).
//!
//! ## Architecture
//!
//! ```text
//! Caller
//!   |
//!   v
//! ┌───────────────────────────────────────────┐
//! │                 ENGINE                    │
//! │                                            │
//! │ write.rs → WAL append → Memtable put/del  │
//! │              |                            │
//! │              |  (len == memLimit?)        │
//! │              v                            │
//! │           flush() → new SST               │
//! │              |                            │
//! │              |  (sst count >= compactingSize?)
//! │              v                            │
//! │           compact() → merged SST          │
//! │                                            │
//! │ read.rs → Memtable → SSTs newest-first    │
//! │            (first decision wins)           │
//! └───────────────────────────────────────────┘
//! ```
//!
//! Unlike the teacher, there is no L0/L1 split and no manifest: §6 enumerates
//! SSTs by globbing `db_*.sst` in a single flat directory and sorting on the
//! filename's embedded timestamp, so there is nothing to persist out of
//! band. There is also no sequence number anywhere — ordering between
//! conflicting writes falls entirely out of memtable-over-SSTs and
//! newest-SST-over-older-SST (§3 invariants 3-4).
//!
//! ## Crash safety
//!
//! Every write is appended to the WAL before it touches the memtable (§3
//! invariant 7). A flush writes its SST atomically (temp + rename, inside
//! [`sstable::write`]) before the WAL is removed, and a compaction deletes
//! its input files only after its merged output is durably on disk (§4.6).

mod compaction;
mod read;
mod recovery;
mod write;

use config::EngineConfig;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

use memtable::Memtable;
use wal::WalWriter;

/// The filename the WAL always uses (§6).
pub const WAL_FILENAME: &str = "db.wal";
/// Prefix every SST filename starts with (§6).
pub const SST_PREFIX: &str = "db_";
/// Suffix every SST filename ends with (§6).
pub const SST_SUFFIX: &str = ".sst";

/// Errors the engine facade can return (§6's error table, §7's taxonomy).
///
/// Unlike the rest of this workspace, `engine` reaches for `thiserror`
/// instead of `anyhow` at its own public boundary: §7 requires callers to
/// distinguish "key was never there" from "key was deleted", which a single
/// opaque `anyhow::Error` cannot express. Internal glue (flush, compaction)
/// still uses `anyhow`, matching the teacher's own split.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("key must not be empty")]
    EmptyKey,
    #[error("key not found")]
    KeyNotFound,
    #[error("key was deleted")]
    KeyDeleted,
    #[error("wal append failed: {0}")]
    WalAppendFailed(#[source] wal::WalError),
    #[error("flush failed: {0}")]
    FlushFailed(#[source] anyhow::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// The central storage engine orchestrating the memtable, the WAL, and the
/// SST files living in [`EngineConfig::dir`].
///
/// # Write path (§4.7)
///
/// `Set`/`Del` append to the WAL, then mutate the memtable, then flush if
/// the memtable has reached `memLimit` entries.
///
/// # Read path (§4.5)
///
/// `Get` checks the memtable first; on a miss it scans SST files
/// newest-first, range-pruning and skipping any file that fails its format
/// checks (§7: format errors are per-file, non-fatal).
///
/// # Recovery
///
/// [`Engine::open`] replays the WAL into a fresh memtable before accepting
/// any operation (§5: "Startup replay of the WAL is performed before the
/// first external operation is accepted").
pub struct Engine {
    pub(crate) mem: Memtable,
    pub(crate) dir: PathBuf,
    pub(crate) wal_path: PathBuf,
    pub(crate) wal_writer: WalWriter,
    pub(crate) mem_limit: usize,
    pub(crate) compacting_size: usize,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("dir", &self.dir)
            .field("memtable_entries", &self.mem.len())
            .field("mem_limit", &self.mem_limit)
            .field("compacting_size", &self.compacting_size)
            .finish()
    }
}

impl Engine {
    /// Opens (or creates) an engine rooted at `config.dir`, replaying its
    /// WAL first.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Io`] if the directory cannot be created or the
    /// WAL cannot be read during recovery.
    pub fn open(config: EngineConfig) -> Result<Self, EngineError> {
        std::fs::create_dir_all(&config.dir)?;

        let wal_path = config.dir.join(WAL_FILENAME);
        let mut mem = Memtable::new();

        recovery::recover(&config.dir, &wal_path, &mut mem, config.mem_limit, config.compacting_size)
            .map_err(EngineError::FlushFailed)?;

        // Lazy: touches no file until the first `append` (§4.3, §3 — "created
        // on first write after startup"). A read-only session that never
        // writes leaves no `db.wal` behind.
        let wal_writer = WalWriter::create(&wal_path);

        Ok(Self {
            mem,
            dir: config.dir,
            wal_path,
            wal_writer,
            mem_limit: config.mem_limit,
            compacting_size: config.compacting_size,
        })
    }

    /// Number of entries currently buffered in the memtable, tombstones
    /// included.
    #[must_use]
    pub fn memtable_len(&self) -> usize {
        self.mem.len()
    }

    /// Forces a flush of the current memtable, if non-empty. Exposed mainly
    /// for graceful shutdown (§5: "the engine ... performs a final flush so
    /// recovery on next start is either a no-op or a short replay").
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::FlushFailed`] on any I/O failure during the
    /// flush.
    pub fn force_flush(&mut self) -> Result<(), EngineError> {
        if self.mem.is_empty() {
            return Ok(());
        }
        self.flush().map_err(EngineError::FlushFailed)
    }
}

/// Best-effort flush on drop, mirroring §5's graceful-shutdown guidance.
/// Errors are swallowed: `Drop` cannot propagate them, and nothing is lost
/// because every entry still buffered in the memtable is also already
/// durable in the WAL.
impl Drop for Engine {
    fn drop(&mut self) {
        if !self.mem.is_empty() {
            let _ = self.flush();
        }
    }
}

/// Current time in nanoseconds since the epoch, for SST filenames (§6).
pub(crate) fn now_nanos() -> anyhow::Result<u128> {
    Ok(SystemTime::now().duration_since(UNIX_EPOCH)?.as_nanos())
}

/// Builds the filename for a new SST, zero-padding the timestamp to a fixed
/// 20 digits so that lexicographic and chronological order always agree —
/// `SPEC_FULL.md` §D's resolution of §9's "newest-first file ordering" open
/// question.
pub(crate) fn sst_filename(nanos: u128) -> String {
    format!("{SST_PREFIX}{nanos:020}{SST_SUFFIX}")
}

/// Lists every `db_*.sst` file in `dir`, sorted ascending — oldest first,
/// per §6.
pub(crate) fn list_sst_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(SST_PREFIX) && n.ends_with(SST_SUFFIX))
        })
        .collect();
    paths.sort();
    Ok(paths)
}
