//! End-to-end tests for the ingest, arrange, and serialize flow.

use bunidx::index::serialize_index;
use bunidx::ingest::Ingestor;
use bunidx::model::{EntryKey, EntryModel, SortField};
use bunidx::submit::assemble;
use tempfile::TempDir;

use crate::common::write_pdf;

#[tokio::test]
async fn test_ingest_to_index() {
    let dir = TempDir::new().unwrap();
    let paths = vec![
        write_pdf(&dir, "2023-04-05 - Witness Statement.pdf", 3),
        write_pdf(&dir, "Exhibit_A.pdf", 1),
    ];

    let mut model = EntryModel::new();
    let ingestor = Ingestor::new();
    let (results, stats) = ingestor.ingest_all(&mut model, &paths, |_, _| {}).await;

    assert!(results.iter().all(|r| r.is_ok()));
    assert_eq!(stats.accepted, 2);
    assert_eq!(stats.total_pages, 4);

    let index = serialize_index(&model);
    let body = index.trim_start_matches('\u{FEFF}');
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines[0], "filename,title,date,section");
    assert_eq!(
        lines[1],
        "2023-04-05---Witness-Statement.pdf,Witness Statement,2023-04-05,0"
    );
    assert_eq!(lines[2], "Exhibit-A.pdf,Exhibit A,,0");
}

#[tokio::test]
async fn test_sections_and_date_sort() {
    let dir = TempDir::new().unwrap();
    let paths = vec![
        write_pdf(&dir, "2023-06-01 Reply.pdf", 1),
        write_pdf(&dir, "2023-01-15 Claim Form.pdf", 1),
        write_pdf(&dir, "2023-03-20 Defence.pdf", 1),
    ];

    let mut model = EntryModel::new();
    let ingestor = Ingestor::new();
    let (_, stats) = ingestor.ingest_all(&mut model, &paths, |_, _| {}).await;
    assert_eq!(stats.accepted, 3);

    // Pin a section heading at the top, then sort by date.
    model.insert_section_break_at(0, "Statements of Case");
    model.sort_by(SortField::Date);

    let index = serialize_index(&model);
    let lines: Vec<&str> = index.trim_start_matches('\u{FEFF}').lines().collect();
    assert_eq!(lines[1], "SECTION_BREAK_1,Statements of Case,,1");
    assert!(lines[2].starts_with("2023-01-15"));
    assert!(lines[3].starts_with("2023-03-20"));
    assert!(lines[4].starts_with("2023-06-01"));
}

#[tokio::test]
async fn test_reorder_then_assemble() {
    let dir = TempDir::new().unwrap();
    let paths = vec![
        write_pdf(&dir, "a.pdf", 1),
        write_pdf(&dir, "b.pdf", 1),
        write_pdf(&dir, "c.pdf", 1),
    ];

    let mut model = EntryModel::new();
    let ingestor = Ingestor::new();
    ingestor.ingest_all(&mut model, &paths, |_, _| {}).await;

    model
        .reorder(&[
            EntryKey::Document("c.pdf".to_string()),
            EntryKey::Document("a.pdf".to_string()),
            EntryKey::Document("b.pdf".to_string()),
        ])
        .unwrap();

    let payload = assemble(&model);
    let names: Vec<&str> = payload.files.iter().map(|f| f.filename.as_str()).collect();
    assert_eq!(names, vec!["c.pdf", "a.pdf", "b.pdf"]);

    // The index rows follow the same order as the file set.
    let lines: Vec<&str> = payload.index.trim_start_matches('\u{FEFF}').lines().collect();
    assert!(lines[1].starts_with("c.pdf,"));
    assert!(lines[2].starts_with("a.pdf,"));
    assert!(lines[3].starts_with("b.pdf,"));
}

#[tokio::test]
async fn test_title_edit_survives_serialization() {
    let dir = TempDir::new().unwrap();
    let paths = vec![write_pdf(&dir, "2023-04-05 - Witness Statement.pdf", 1)];

    let mut model = EntryModel::new();
    let ingestor = Ingestor::new();
    ingestor.ingest_all(&mut model, &paths, |_, _| {}).await;

    model
        .set_title(
            &EntryKey::Document("2023-04-05 - Witness Statement.pdf".to_string()),
            "Statement of J. Smith",
        )
        .unwrap();

    let index = serialize_index(&model);
    assert!(index.contains(",Statement of J. Smith,2023-04-05,0"));
}

#[tokio::test]
async fn test_sanitized_collision_gets_suffix() {
    let dir = TempDir::new().unwrap();
    let paths = vec![
        write_pdf(&dir, "a b.pdf", 1),
        write_pdf(&dir, "a_b.pdf", 1),
    ];

    let mut model = EntryModel::new();
    let ingestor = Ingestor::new();
    let (results, _) = ingestor.ingest_all(&mut model, &paths, |_, _| {}).await;
    assert!(results.iter().all(|r| r.is_ok()));

    let payload = assemble(&model);
    let names: Vec<&str> = payload.files.iter().map(|f| f.filename.as_str()).collect();
    assert_eq!(names, vec!["a-b.pdf", "a-b-2.pdf"]);
}
