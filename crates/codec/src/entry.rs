use crate::CodecError;
use byteorder::{LittleEndian, WriteBytesExt};

/// The tag of an entry: a plain SET or a DEL tombstone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Set = 0x00,
    Del = 0x01,
}

/// A decoded (key, tag, payload) triple, matching §3's "Entry (in-memory)".
///
/// `value` is always `Some` for `Tag::Set`. For `Tag::Del` it is always
/// `None` on the wire — the design note in `SPEC_FULL.md` is explicit that a
/// tombstone's payload, if carried at all, lives only in memory and is never
/// written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: Vec<u8>,
    pub tag: Tag,
    pub value: Option<Vec<u8>>,
}

impl Entry {
    #[must_use]
    pub fn set(key: Vec<u8>, value: Vec<u8>) -> Self {
        Self {
            key,
            tag: Tag::Set,
            value: Some(value),
        }
    }

    #[must_use]
    pub fn del(key: Vec<u8>) -> Self {
        Self {
            key,
            tag: Tag::Del,
            value: None,
        }
    }
}

/// A cursor over a byte slice, advanced by successive decode calls.
///
/// Mirrors the spec's wording directly: "a parser consumes bytes starting at
/// a cursor and advances it; the caller tracks the cursor across successive
/// calls." Both the WAL replay loop and the SST entry scan drive the same
/// [`decode_entry`] against one of these.
pub struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    #[must_use]
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Bytes remaining to be consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// The cursor's current byte offset into the underlying buffer.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn read_u8(&mut self) -> Result<u8, CodecError> {
        let b = *self.buf.get(self.pos).ok_or(CodecError::Truncated)?;
        self.pos += 1;
        Ok(b)
    }

    pub(crate) fn read_u16(&mut self) -> Result<u16, CodecError> {
        let end = self.pos.checked_add(2).ok_or(CodecError::Truncated)?;
        let bytes = self.buf.get(self.pos..end).ok_or(CodecError::Truncated)?;
        self.pos = end;
        Ok(u16::from_le_bytes(bytes.try_into().unwrap()))
    }

    pub(crate) fn read_u32(&mut self) -> Result<u32, CodecError> {
        let end = self.pos.checked_add(4).ok_or(CodecError::Truncated)?;
        let bytes = self.buf.get(self.pos..end).ok_or(CodecError::Truncated)?;
        self.pos = end;
        Ok(u32::from_le_bytes(bytes.try_into().unwrap()))
    }

    pub(crate) fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], CodecError> {
        let end = self.pos.checked_add(n).ok_or(CodecError::Truncated)?;
        let bytes = self.buf.get(self.pos..end).ok_or(CodecError::Truncated)?;
        self.pos = end;
        Ok(bytes)
    }
}

/// Appends the wire form of `entry` to `out`.
pub fn encode_entry(entry: &Entry, out: &mut Vec<u8>) {
    match entry.tag {
        Tag::Set => {
            out.write_u8(Tag::Set as u8).unwrap();
            let value = entry.value.as_deref().unwrap_or(&[]);
            out.write_u32::<LittleEndian>(entry.key.len() as u32)
                .unwrap();
            out.extend_from_slice(&entry.key);
            out.write_u32::<LittleEndian>(value.len() as u32).unwrap();
            out.extend_from_slice(value);
        }
        Tag::Del => {
            out.write_u8(Tag::Del as u8).unwrap();
            out.write_u32::<LittleEndian>(entry.key.len() as u32)
                .unwrap();
            out.extend_from_slice(&entry.key);
        }
    }
}

/// Decodes one entry starting at the cursor's current position, advancing
/// it past the entry on success.
///
/// Returns [`CodecError::Truncated`] if the buffer ends before a complete
/// entry can be read — this is how both the WAL reader (truncated trailing
/// write) and the SST reader (defense in depth past the whole-file CRC
/// check) detect an incomplete tail.
pub fn decode_entry(cursor: &mut Cursor<'_>) -> Result<Entry, CodecError> {
    let tag_byte = cursor.read_u8()?;
    match tag_byte {
        0x00 => {
            let key_len = cursor.read_u32()? as usize;
            let key = cursor.read_bytes(key_len)?.to_vec();
            let val_len = cursor.read_u32()? as usize;
            let value = cursor.read_bytes(val_len)?.to_vec();
            Ok(Entry::set(key, value))
        }
        0x01 => {
            let key_len = cursor.read_u32()? as usize;
            let key = cursor.read_bytes(key_len)?.to_vec();
            Ok(Entry::del(key))
        }
        other => Err(CodecError::UnknownTag(other)),
    }
}
