use super::*;
use memtable::Memtable;
use tempfile::tempdir;

fn memtable_of(pairs: &[(&str, &str)]) -> Memtable {
    let mut m = Memtable::new();
    for (k, v) in pairs {
        m.put(k.as_bytes().to_vec(), v.as_bytes().to_vec());
    }
    m
}

#[test]
fn write_then_open_round_trips_header_fields() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("db_1.sst");
    let mem = memtable_of(&[("a", "1"), ("b", "2"), ("c", "3")]);

    write(&path, mem.iter().map(|(k, v)| (k.to_vec(), v.clone()))).unwrap();

    let sst = open(&path).unwrap();
    assert_eq!(sst.entry_count(), 3);
    assert_eq!(sst.smallest(), b"a");
    assert_eq!(sst.largest(), b"c");
}

#[test]
fn entries_are_in_ascending_order() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("db_1.sst");
    let mem = memtable_of(&[("z", "1"), ("a", "2"), ("m", "3")]);

    write(&path, mem.iter().map(|(k, v)| (k.to_vec(), v.clone()))).unwrap();

    let sst = open(&path).unwrap();
    let keys: Vec<Vec<u8>> = sst.entries().map(|e| e.unwrap().key).collect();
    assert_eq!(keys, vec![b"a".to_vec(), b"m".to_vec(), b"z".to_vec()]);
}

#[test]
fn flush_includes_tombstones() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("db_1.sst");
    let mut mem = Memtable::new();
    mem.put(b"a".to_vec(), b"1".to_vec());
    mem.delete(b"b".to_vec());

    write(&path, mem.iter().map(|(k, v)| (k.to_vec(), v.clone()))).unwrap();

    let sst = open(&path).unwrap();
    assert_eq!(sst.entry_count(), 2);
    let deleted = lookup(&path, b"b").unwrap();
    assert_eq!(deleted, Lookup::Deleted);
}

#[test]
fn lookup_found_and_not_found() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("db_1.sst");
    let mem = memtable_of(&[("a", "1"), ("b", "2")]);
    write(&path, mem.iter().map(|(k, v)| (k.to_vec(), v.clone()))).unwrap();

    assert_eq!(lookup(&path, b"a").unwrap(), Lookup::Found(b"1".to_vec()));
    assert_eq!(lookup(&path, b"missing").unwrap(), Lookup::NotFound);
}

#[test]
fn lookup_prunes_out_of_range_keys_without_scanning() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("db_1.sst");
    let mem = memtable_of(&[("m", "1"), ("n", "2")]);
    write(&path, mem.iter().map(|(k, v)| (k.to_vec(), v.clone()))).unwrap();

    assert_eq!(lookup(&path, b"a").unwrap(), Lookup::NotFound);
    assert_eq!(lookup(&path, b"z").unwrap(), Lookup::NotFound);
}

#[test]
fn write_refuses_empty_input() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("db_1.sst");
    let mem = Memtable::new();
    let result = write(&path, mem.iter().map(|(k, v)| (k.to_vec(), v.clone())));
    assert!(result.is_err());
}

#[test]
fn open_rejects_corrupted_checksum() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("db_1.sst");
    let mem = memtable_of(&[("x", "only")]);
    write(&path, mem.iter().map(|(k, v)| (k.to_vec(), v.clone()))).unwrap();

    // Flip a byte in the compressed file to corrupt the decompressed payload.
    let mut bytes = std::fs::read(&path).unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0xff;
    std::fs::write(&path, &bytes).unwrap();

    match open(&path) {
        Err(SstError::Format(_)) => {}
        other => panic!("expected a format error, got {other:?}"),
    }
}

#[test]
fn open_rejects_bad_magic() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("db_1.sst");

    let mut body = codec::encode_header(1, b"a", b"a");
    codec::encode_entry(&codec::Entry::set(b"a".to_vec(), b"1".to_vec()), &mut body);
    // Corrupt the magic field in place (first 4 bytes).
    body[0] = 0xff;
    let checksum = codec::crc32(&body);
    body.extend_from_slice(&checksum.to_le_bytes());
    let compressed = codec::compress(&body).unwrap();
    std::fs::write(&path, &compressed).unwrap();

    match open(&path) {
        Err(SstError::Format(msg)) => assert!(msg.contains("magic")),
        other => panic!("expected a bad-magic format error, got {other:?}"),
    }
}

#[test]
fn single_entry_sstable_round_trips() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("db_1.sst");
    let mem = memtable_of(&[("solo", "value")]);
    write(&path, mem.iter().map(|(k, v)| (k.to_vec(), v.clone()))).unwrap();

    let sst = open(&path).unwrap();
    assert_eq!(sst.smallest(), b"solo");
    assert_eq!(sst.largest(), b"solo");
    assert_eq!(lookup(&path, b"solo").unwrap(), Lookup::Found(b"value".to_vec()));
}
