//! Read path: `get` (§4.5, §4.7).
//!
//! Checks the memtable first (freshest data, tombstones included), then
//! scans SST files newest-first. There is deliberately no `scan`/range-read
//! here — §1's Non-goals exclude "range scans as a public operation".

use memtable::TaggedValue;

use crate::{Engine, EngineError};

impl Engine {
    /// Looks up `key` (§4.7's `Get`).
    ///
    /// # Errors
    ///
    /// [`EngineError::KeyNotFound`] if no memtable entry or SST contains
    /// the key. [`EngineError::KeyDeleted`] if the most authoritative
    /// binding found is a tombstone. [`EngineError::Io`] on a genuine I/O
    /// failure reading an SST file — a per-file *format* problem is not
    /// propagated; that file is logged and skipped (§7).
    pub fn get(&self, key: &[u8]) -> Result<Vec<u8>, EngineError> {
        if key.is_empty() {
            return Err(EngineError::EmptyKey);
        }

        if let Some(tagged) = self.mem.get(key) {
            return match tagged {
                TaggedValue::Set(v) => Ok(v.clone()),
                TaggedValue::Del => Err(EngineError::KeyDeleted),
            };
        }

        let files = crate::list_sst_files(&self.dir)?;
        for path in files.iter().rev() {
            match sstable::lookup(path, key) {
                Ok(sstable::Lookup::Found(value)) => return Ok(value),
                Ok(sstable::Lookup::Deleted) => return Err(EngineError::KeyDeleted),
                Ok(sstable::Lookup::NotFound) => continue,
                Err(sstable::SstError::Format(msg)) => {
                    tracing::warn!(path = %path.display(), error = %msg, "skipping unreadable sstable");
                    continue;
                }
                Err(sstable::SstError::Io(e)) => return Err(EngineError::Io(e)),
            }
        }

        Err(EngineError::KeyNotFound)
    }
}
