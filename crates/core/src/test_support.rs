//! In-memory zip builders shared by the unit tests.

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Build a zip archive from `(path, text)` pairs.
pub fn build_zip(entries: &[(&str, &str)]) -> Vec<u8> {
    let raw: Vec<(&str, &[u8])> = entries.iter().map(|(p, c)| (*p, c.as_bytes())).collect();
    build_zip_bytes(&raw)
}

/// Build a zip archive from `(path, bytes)` pairs.
pub fn build_zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (path, contents) in entries {
        writer
            .start_file(*path, SimpleFileOptions::default())
            .expect("start zip entry");
        writer.write_all(contents).expect("write zip entry");
    }
    writer.finish().expect("finish zip").into_inner()
}
