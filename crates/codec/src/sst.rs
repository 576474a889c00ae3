use crate::entry::Cursor;
use crate::CodecError;
use byteorder::{LittleEndian, WriteBytesExt};

/// The magic number every SST header carries. §6: "`magicNumber` = 1234".
pub const MAGIC: u32 = 1234;
/// The only SST format version this design defines. §6: "`version` = 1".
pub const VERSION: u16 = 1;

/// The fixed-layout header fields preceding an SST's entry sequence.
///
/// Decoding this performs no semantic validation (magic/version
/// correctness) — that is the SST reader's job, since a mismatch there is a
/// per-file, skip-and-continue condition rather than a codec-level error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SstHeader {
    pub magic: u32,
    pub entry_count: u32,
    pub smallest: Vec<u8>,
    pub largest: Vec<u8>,
    pub version: u16,
}

/// Encodes the header fields for an SST with `entry_count` entries and the
/// given smallest/largest keys. Always writes the canonical [`MAGIC`] and
/// [`VERSION`] — there is no way to produce a header with any other values.
pub fn encode_header(entry_count: u32, smallest: &[u8], largest: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(18 + smallest.len() + largest.len());
    out.write_u32::<LittleEndian>(MAGIC).unwrap();
    out.write_u32::<LittleEndian>(entry_count).unwrap();
    out.write_u32::<LittleEndian>(smallest.len() as u32).unwrap();
    out.extend_from_slice(smallest);
    out.write_u32::<LittleEndian>(largest.len() as u32).unwrap();
    out.extend_from_slice(largest);
    out.write_u16::<LittleEndian>(VERSION).unwrap();
    out
}

/// Decodes the header fields from the front of `cursor`, advancing it past
/// them so the caller can decode `entry_count` entries next.
pub fn decode_header(cursor: &mut Cursor<'_>) -> Result<SstHeader, CodecError> {
    let magic = cursor.read_u32()?;
    let entry_count = cursor.read_u32()?;
    let s_len = cursor.read_u32()? as usize;
    let smallest = cursor.read_bytes(s_len)?.to_vec();
    let l_len = cursor.read_u32()? as usize;
    let largest = cursor.read_bytes(l_len)?.to_vec();
    let version = cursor.read_u16()?;
    Ok(SstHeader {
        magic,
        entry_count,
        smallest,
        largest,
        version,
    })
}
