//! Round-trips the archive through a real file on disk, rather than an
//! in-memory `Cursor`, exercising the same `std::fs::File` backend a real
//! caller uses (the crate's `R: Read + Seek` / `W: Write + Seek` bounds are
//! generic over exactly this).

use std::fs::File;

use farc::{Archive, Compression};

#[test]
fn writes_and_reads_back_through_a_real_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sample.farc");

    let file = File::create(&path).unwrap();
    let mut writer = Archive::create(file, 4096);
    let mut a = writer.create_file("docs/readme.md", Compression::None).unwrap();
    a.write(b"# hello\n").unwrap();
    a.close().unwrap();
    let mut b = writer.create_file("assets/blob.bin", Compression::FastLz).unwrap();
    let payload = vec![42u8; 50_000];
    b.write(&payload).unwrap();
    b.close().unwrap();
    let (file, info) = writer.close(Compression::FastLz).unwrap();
    drop(file);
    assert!(info.footer.toc_compressed <= info.footer.toc_original);

    let file = File::open(&path).unwrap();
    let mut reader = Archive::open(file).unwrap();

    let mut readme = reader.open_file("docs/readme.md").unwrap();
    let mut out = String::new();
    let mut buf = [0u8; 64];
    loop {
        let n = readme.read(&mut buf).unwrap();
        if n == 0 {
            break;
        }
        out.push_str(std::str::from_utf8(&buf[..n]).unwrap());
    }
    assert_eq!(out, "# hello\n");

    let mut blob = reader.open_file("assets/blob.bin").unwrap();
    let mut out = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        let n = blob.read(&mut buf).unwrap();
        if n == 0 {
            break;
        }
        out.extend_from_slice(&buf[..n]);
    }
    assert_eq!(out, payload);

    let metadata = std::fs::metadata(&path).unwrap();
    assert!(metadata.len() >= 56, "archive must be at least footer-sized");
}
