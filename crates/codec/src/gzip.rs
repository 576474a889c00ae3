use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::{self, Read, Write};

/// Gzip-compresses `data`, matching the compression every SST file on disk
/// is wrapped in. The WAL is never passed through this.
pub fn compress(data: &[u8]) -> io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

/// Reverses [`compress`]. A corrupt or truncated gzip stream surfaces as an
/// `io::Error`; per `SPEC_FULL.md`'s design decisions this is treated as a
/// per-file format problem by the SST reader, not silently ignored the way
/// the original source does.
pub fn decompress(data: &[u8]) -> io::Result<Vec<u8>> {
    let mut decoder = GzDecoder::new(data);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out)?;
    Ok(out)
}
