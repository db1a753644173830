use std::io::Cursor;

use farc::info::EntryKind;
use farc::{Archive, Compression, FarcError};

fn build_archive(files: &[(&str, &[u8], Compression)], toc_compression: Compression, alignment: u32) -> Vec<u8> {
    env_logger::try_init().ok();
    let mut writer = Archive::create(Cursor::new(Vec::new()), alignment);
    for (path, data, compression) in files {
        let mut file = writer.create_file(path, *compression).unwrap();
        file.write(data).unwrap();
        file.close().unwrap();
    }
    let (stream, _) = writer.close(toc_compression).unwrap();
    stream.into_inner()
}

#[test]
fn hello_world_nested_path_roundtrips() {
    let bytes = build_archive(&[("greetings/hello.txt", b"hello, farc", Compression::None)], Compression::None, 0);
    let mut reader = Archive::open(Cursor::new(bytes)).unwrap();
    let mut handle = reader.open_file("greetings/hello.txt").unwrap();
    let mut out = vec![0u8; handle.size() as usize];
    handle.read(&mut out).unwrap();
    assert_eq!(out, b"hello, farc");
}

#[test]
fn fastlz_file_spanning_multiple_blocks_roundtrips() {
    let payload: Vec<u8> = (0..100_000u32).map(|i| (i % 251) as u8).collect();
    let bytes = build_archive(&[("data/big.bin", &payload, Compression::FastLz)], Compression::FastLz, 0);

    let mut reader = Archive::open(Cursor::new(bytes)).unwrap();
    let mut handle = reader.open_file("data/big.bin").unwrap();
    let mut out = Vec::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = handle.read(&mut buf).unwrap();
        if n == 0 {
            break;
        }
        out.extend_from_slice(&buf[..n]);
    }
    assert_eq!(out, payload);
}

#[test]
fn hundred_files_are_addressable_by_hash() {
    let files: Vec<(String, Vec<u8>)> = (0..100)
        .map(|i| (format!("items/item{i:03}.bin"), format!("payload-{i}").into_bytes()))
        .collect();
    let refs: Vec<(&str, &[u8], Compression)> = files
        .iter()
        .map(|(p, d)| (p.as_str(), d.as_slice(), Compression::None))
        .collect();
    let bytes = build_archive(&refs, Compression::None, 0);

    let mut reader = Archive::open(Cursor::new(bytes)).unwrap();
    for (path, data) in &files {
        let hash = farc::hash::hash_bytes(data);
        let hex_path = format!("@{}", hex::encode(hash));
        let mut handle = reader.open_file(&hex_path).unwrap();
        let mut out = vec![0u8; data.len()];
        handle.read(&mut out).unwrap();
        assert_eq!(&out, data, "hash lookup mismatch for {path}");
    }
}

#[test]
fn corrupted_toc_digest_is_rejected() {
    let mut bytes = build_archive(&[("a.txt", b"aaaa", Compression::None)], Compression::None, 0);
    // Flip a byte inside the TOC region (well before the 56-byte footer).
    let flip_at = bytes.len() - 56 - 10;
    bytes[flip_at] ^= 0xFF;

    let err = Archive::open(Cursor::new(bytes)).unwrap_err();
    assert!(matches!(err, FarcError::Integrity), "expected Integrity, got {err:?}");
}

#[test]
fn truncated_archive_is_rejected_as_malformed() {
    let bytes = build_archive(&[("a.txt", b"aaaa", Compression::None)], Compression::None, 0);
    let truncated = bytes[..bytes.len() / 2].to_vec();

    let err = Archive::open(Cursor::new(truncated)).unwrap_err();
    assert!(matches!(err, FarcError::Format(_) | FarcError::Io(_)), "expected Format or Io, got {err:?}");
}

#[test]
fn mixed_toc_and_data_compression_roundtrips() {
    let squeezed = vec![7u8; 20_000];
    let files = [
        ("plain.txt", b"not compressed".as_slice(), Compression::None),
        ("squeezed.bin", squeezed.as_slice(), Compression::FastLz),
    ];
    let bytes = build_archive(&files, Compression::Deflate, 0);

    let mut reader = Archive::open(Cursor::new(bytes)).unwrap();
    let mut a = reader.open_file("plain.txt").unwrap();
    let mut out = vec![0u8; a.size() as usize];
    a.read(&mut out).unwrap();
    assert_eq!(out, b"not compressed");

    let mut b = reader.open_file("squeezed.bin").unwrap();
    let mut out2 = vec![0u8; b.size() as usize];
    b.read(&mut out2).unwrap();
    assert_eq!(out2, squeezed);
}

#[test]
fn duplicate_path_write_keeps_last_reachable_by_path_both_by_hash() {
    let mut writer = Archive::create(Cursor::new(Vec::new()), 0);
    let mut f1 = writer.create_file("a/x.txt", Compression::None).unwrap();
    f1.write(b"first version").unwrap();
    f1.close().unwrap();
    let mut f2 = writer.create_file("a/x.txt", Compression::None).unwrap();
    f2.write(b"second version").unwrap();
    f2.close().unwrap();
    let (stream, _) = writer.close(Compression::None).unwrap();

    let mut reader = Archive::open(stream).unwrap();
    let mut by_path = reader.open_file("a/x.txt").unwrap();
    let mut out = vec![0u8; by_path.size() as usize];
    by_path.read(&mut out).unwrap();
    assert_eq!(out, b"second version");

    let first_hash = farc::hash::hash_bytes(b"first version");
    let mut by_hash = reader.open_by_hash(&first_hash).unwrap();
    let mut out2 = vec![0u8; by_hash.size() as usize];
    by_hash.read(&mut out2).unwrap();
    assert_eq!(out2, b"first version");
}

#[test]
fn directory_listing_yields_children_then_files() {
    let bytes = build_archive(
        &[
            ("docs/readme.txt", b"read me", Compression::None),
            ("docs/nested/leaf.txt", b"leaf", Compression::None),
        ],
        Compression::None,
        0,
    );
    let reader = Archive::open(Cursor::new(bytes)).unwrap();
    let entries: Vec<_> = reader.open_dir("docs").unwrap().collect();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].kind, EntryKind::Dir);
    assert_eq!(entries[0].name, "nested");
    assert_eq!(entries[1].kind, EntryKind::File);
    assert_eq!(entries[1].name, "readme.txt");
}

#[test]
fn alignment_rounds_up_each_files_data_offset() {
    let bytes = build_archive(
        &[("a.bin", b"abc", Compression::None), ("b.bin", b"defgh", Compression::None)],
        Compression::None,
        512,
    );
    let mut reader = Archive::open(Cursor::new(bytes)).unwrap();
    let mut b = reader.open_file("b.bin").unwrap();
    let mut out = vec![0u8; 5];
    b.read(&mut out).unwrap();
    assert_eq!(out, b"defgh");
}
