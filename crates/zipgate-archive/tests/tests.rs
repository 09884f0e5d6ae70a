use std::fs::File;
use std::io::Write;
use std::path::Path;

use zip::write::SimpleFileOptions;
use zipgate_archive::{ArchiveSource, Error, ZipSource};

fn write_fixture(path: &Path) {
    let mut writer = zip::ZipWriter::new(File::create(path).unwrap());
    let options = SimpleFileOptions::default();
    writer.start_file("hello_zip.txt", options).unwrap();
    writer.write_all(b"Hello from ZIP!").unwrap();
    writer.start_file("nested/deeper/data.csv", options).unwrap();
    writer.write_all(b"a,b\n1,2\n").unwrap();
    writer.finish().unwrap();
}

#[test]
fn open_list_and_extract_from_file() {
    let temp_dir = tempfile::Builder::new()
        .prefix("zipgate-test-zip-")
        .tempdir()
        .expect("Failed to create temp dir");
    let archive_path = temp_dir.path().join("fixture.zip");
    write_fixture(&archive_path);

    let mut source = ZipSource::open(&archive_path).expect("Failed to open fixture.zip");
    assert_eq!(source.path(), Some(archive_path.as_path()));

    let entries = source.entries().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].extension(), Some("csv"));

    let out = temp_dir.path().join("out");
    let extracted = source.extract_all(&out).unwrap();
    assert_eq!(extracted, ["hello_zip.txt", "nested/deeper/data.csv"]);

    let content = std::fs::read_to_string(out.join("hello_zip.txt")).unwrap();
    assert!(content.contains("Hello from ZIP!"), "Content should match");
    assert!(out.join("nested/deeper/data.csv").is_file());

    source.close().unwrap();
    assert!(matches!(
        source.extract_all(&out),
        Err(Error::Closed)
    ));
}

#[test]
fn open_missing_archive_fails() {
    let temp_dir = tempfile::tempdir().unwrap();
    let result = ZipSource::open(temp_dir.path().join("missing.zip"));
    assert!(matches!(result, Err(Error::OpenFailed { .. })));
}
