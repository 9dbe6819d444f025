//! Integration tests for rejection and failure handling.

use bunidx::error::BunIdxError;
use bunidx::index::serialize_index;
use bunidx::ingest::Ingestor;
use bunidx::model::{EntryKey, EntryModel};
use tempfile::TempDir;

use crate::common::{write_pdf, write_raw};

#[tokio::test]
async fn test_duplicate_is_skipped_but_batch_continues() {
    let dir = TempDir::new().unwrap();
    let first = write_pdf(&dir, "claim.pdf", 1);
    let other = write_pdf(&dir, "defence.pdf", 1);
    let paths = vec![first.clone(), first, other];

    let mut model = EntryModel::new();
    let ingestor = Ingestor::new();
    let (results, stats) = ingestor.ingest_all(&mut model, &paths, |_, _| {}).await;

    assert_eq!(stats.accepted, 2);
    assert_eq!(stats.duplicates, 1);
    assert!(matches!(
        results[1],
        Err(BunIdxError::DuplicateFilename { .. })
    ));
    assert_eq!(model.document_count(), 2);
}

#[tokio::test]
async fn test_non_pdf_is_rejected() {
    let dir = TempDir::new().unwrap();
    let paths = vec![
        write_raw(&dir, "notes.txt", b"not a pdf"),
        write_pdf(&dir, "claim.pdf", 1),
    ];

    let mut model = EntryModel::new();
    let ingestor = Ingestor::new();
    let (results, stats) = ingestor.ingest_all(&mut model, &paths, |_, _| {}).await;

    assert!(matches!(results[0], Err(BunIdxError::NotAPdf { .. })));
    assert_eq!(stats.rejected, 1);
    assert_eq!(stats.accepted, 1);
}

#[tokio::test]
async fn test_corrupt_pdf_is_dropped() {
    let dir = TempDir::new().unwrap();
    let paths = vec![
        write_raw(&dir, "broken.pdf", b"%PDF-1.5 garbage"),
        write_pdf(&dir, "good.pdf", 2),
    ];

    let mut model = EntryModel::new();
    let ingestor = Ingestor::new();
    let (results, stats) = ingestor.ingest_all(&mut model, &paths, |_, _| {}).await;

    assert!(matches!(
        results[0],
        Err(BunIdxError::FailedToParsePdf { .. })
    ));
    assert_eq!(stats.failures, 1);
    assert_eq!(stats.accepted, 1);

    // The corrupt file left no trace in the working set.
    assert!(!model.contains("broken.pdf"));
    assert!(!serialize_index(&model).contains("broken.pdf"));
}

#[tokio::test]
async fn test_missing_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("gone.pdf");

    let mut model = EntryModel::new();
    let ingestor = Ingestor::new();
    let (results, stats) = ingestor.ingest_all(&mut model, &[missing], |_, _| {}).await;

    assert!(results[0].is_err());
    assert_eq!(stats.accepted, 0);
}

#[tokio::test]
async fn test_removal_purges_registries() {
    let dir = TempDir::new().unwrap();
    let paths = vec![write_pdf(&dir, "a.pdf", 1), write_pdf(&dir, "b.pdf", 1)];

    let mut model = EntryModel::new();
    let ingestor = Ingestor::new();
    ingestor.ingest_all(&mut model, &paths, |_, _| {}).await;

    model
        .remove(&EntryKey::Document("a.pdf".to_string()))
        .unwrap();

    assert!(!model.contains("a.pdf"));
    assert!(model.file("a.pdf").is_none());
    assert!(model.sanitized_name("a.pdf").is_none());

    // Re-adding the same filename is no longer a duplicate.
    let readd = write_pdf(&dir, "a.pdf", 1);
    let result = ingestor.ingest_path(&mut model, &readd).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_reorder_rejects_wrong_key_set() {
    let dir = TempDir::new().unwrap();
    let paths = vec![write_pdf(&dir, "a.pdf", 1), write_pdf(&dir, "b.pdf", 1)];

    let mut model = EntryModel::new();
    let ingestor = Ingestor::new();
    ingestor.ingest_all(&mut model, &paths, |_, _| {}).await;

    // Wrong length
    let result = model.reorder(&[EntryKey::Document("a.pdf".to_string())]);
    assert!(matches!(result, Err(BunIdxError::ReorderMismatch { .. })));

    // Right length, unknown key
    let result = model.reorder(&[
        EntryKey::Document("a.pdf".to_string()),
        EntryKey::Document("ghost.pdf".to_string()),
    ]);
    assert!(matches!(result, Err(BunIdxError::ReorderMismatch { .. })));

    // Failed reorders leave the sequence intact.
    let index = serialize_index(&model);
    let lines: Vec<&str> = index.trim_start_matches('\u{FEFF}').lines().collect();
    assert!(lines[1].starts_with("a.pdf,"));
    assert!(lines[2].starts_with("b.pdf,"));
}
