//! Shared helpers for integration tests.
//!
//! Fixtures are generated on the fly instead of being checked in: a
//! minimal but structurally valid PDF is assembled with `lopdf` and
//! written into a per-test temporary directory.

use lopdf::{Document, Object, Stream, dictionary};
use std::path::PathBuf;
use tempfile::TempDir;

/// Build a minimal valid PDF with the given number of pages.
pub fn pdf_bytes(pages: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut kids: Vec<Object> = Vec::new();
    for _ in 0..pages {
        let content_id = doc.add_object(Stream::new(dictionary! {}, Vec::new()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

/// Write a generated PDF fixture into `dir` and return its path.
pub fn write_pdf(dir: &TempDir, name: &str, pages: usize) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, pdf_bytes(pages)).unwrap();
    path
}

/// Write an arbitrary (non-PDF or corrupt) fixture into `dir`.
pub fn write_raw(dir: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}
