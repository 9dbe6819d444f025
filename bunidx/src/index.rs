//! Canonical index serialization.
//!
//! The index is the contract between this tool and the backend bundler: a
//! BOM-prefixed UTF-8 text payload, one row per entry, in bundle order.
//!
//! ```text
//! filename,title,date,section
//! SECTION_BREAK_1,Pleadings,,1
//! Witness-Statement.pdf,Witness Statement,2023-04-05,0
//! ```
//!
//! Field escaping follows the usual quoting rule: a field containing a
//! comma, a double quote, or a newline is wrapped in double quotes with
//! internal quotes doubled. The format is bit-exact; do not change it
//! without coordinating with the backend.

use crate::model::{Entry, EntryModel};
use crate::naming::prettify_title;

/// Fixed header row of the canonical index.
pub const INDEX_HEADER: &str = "filename,title,date,section";

/// Synthetic filename prefix for section rows (`SECTION_BREAK_1`, ...).
pub const SECTION_TOKEN_PREFIX: &str = "SECTION_BREAK_";

/// Filename of the index part in the multipart submission.
pub const INDEX_FILENAME: &str = "index.csv";

/// Escape a single index field.
///
/// Fields containing a comma, double quote, or newline are wrapped in
/// double quotes with internal quotes doubled; everything else is emitted
/// verbatim. An empty field serializes to an empty string.
pub fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Render the entry model into the canonical index payload.
///
/// Walks the sequence in order: section entries emit a running
/// `SECTION_BREAK_<n>` token with section flag `1`; document entries emit
/// their sanitized filename (re-resolved through the registry, falling
/// back to the original name), title, and date with section flag `0`.
/// Titles are prettified before escaping so user edits are normalized the
/// same way titles derived from filenames were.
pub fn serialize_index(model: &EntryModel) -> String {
    let mut out = String::from("\u{FEFF}");
    out.push_str(INDEX_HEADER);
    out.push('\n');

    let mut section_counter = 0usize;
    for entry in model.entries() {
        match entry {
            Entry::Section(section) => {
                section_counter += 1;
                out.push_str(&format!(
                    "{SECTION_TOKEN_PREFIX}{section_counter},{},,1\n",
                    escape_field(&prettify_title(&section.title))
                ));
            }
            Entry::Document(doc) => {
                let filename = model
                    .sanitized_name(&doc.original_name)
                    .unwrap_or(&doc.original_name);
                let date = doc
                    .date
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default();
                out.push_str(&format!(
                    "{},{},{},0\n",
                    escape_field(filename),
                    escape_field(&prettify_title(&doc.title)),
                    date
                ));
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DocumentEntry, StoredFile};
    use chrono::NaiveDate;
    use std::time::SystemTime;

    fn doc(name: &str, title: &str, date: Option<NaiveDate>) -> DocumentEntry {
        DocumentEntry {
            original_name: name.to_string(),
            sanitized_name: crate::naming::sanitize_filename(name),
            title: title.to_string(),
            date,
            page_count: 1,
        }
    }

    fn stored() -> StoredFile {
        StoredFile {
            bytes: Vec::new(),
            modified: SystemTime::UNIX_EPOCH,
        }
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_escape_plain_field() {
        assert_eq!(escape_field("Witness Statement"), "Witness Statement");
        assert_eq!(escape_field(""), "");
    }

    #[test]
    fn test_escape_comma_field_round_trips() {
        let original = "Smith, John - Statement";
        let escaped = escape_field(original);
        assert_eq!(escaped, "\"Smith, John - Statement\"");

        // Unquote and unescape to recover the original.
        let inner = &escaped[1..escaped.len() - 1];
        assert_eq!(inner.replace("\"\"", "\""), original);
    }

    #[test]
    fn test_escape_quote_field() {
        assert_eq!(escape_field("the \"final\" copy"), "\"the \"\"final\"\" copy\"");
    }

    #[test]
    fn test_escape_newline_field() {
        assert_eq!(escape_field("line\nbreak"), "\"line\nbreak\"");
    }

    #[test]
    fn test_serialize_starts_with_bom_and_header() {
        let model = EntryModel::new();
        let index = serialize_index(&model);
        assert!(index.starts_with('\u{FEFF}'));
        assert_eq!(index.trim_start_matches('\u{FEFF}'), "filename,title,date,section\n");
    }

    #[test]
    fn test_serialize_document_rows() {
        let mut model = EntryModel::new();
        model
            .append_document(
                doc("Witness Statement.pdf", "Witness Statement", Some(ymd(2023, 4, 5))),
                stored(),
            )
            .unwrap();
        model.append_document(doc("undated.pdf", "Undated", None), stored()).unwrap();

        let index = serialize_index(&model);
        let lines: Vec<&str> = index.trim_start_matches('\u{FEFF}').lines().collect();
        assert_eq!(lines[0], INDEX_HEADER);
        assert_eq!(lines[1], "Witness-Statement.pdf,Witness Statement,2023-04-05,0");
        assert_eq!(lines[2], "undated.pdf,Undated,,0");
    }

    #[test]
    fn test_serialize_section_counters_in_document_order() {
        let mut model = EntryModel::new();
        model.append_document(doc("a.pdf", "A", None), stored()).unwrap();
        model.insert_section_break_at(0, "Pleadings");
        model.append_document(doc("b.pdf", "B", None), stored()).unwrap();
        model.append_document(doc("c.pdf", "C", None), stored()).unwrap();
        model.insert_section_break_at(3, "Correspondence");

        let index = serialize_index(&model);
        let lines: Vec<&str> = index.trim_start_matches('\u{FEFF}').lines().collect();
        assert_eq!(lines[1], "SECTION_BREAK_1,Pleadings,,1");
        assert_eq!(lines[2], "a.pdf,A,,0");
        assert_eq!(lines[3], "b.pdf,B,,0");
        assert_eq!(lines[4], "SECTION_BREAK_2,Correspondence,,1");
        assert_eq!(lines[5], "c.pdf,C,,0");

        // All document rows carry flag 0, all section rows flag 1.
        for line in &lines[1..] {
            let flag = line.rsplit(',').next().unwrap();
            if line.starts_with(SECTION_TOKEN_PREFIX) {
                assert_eq!(flag, "1");
            } else {
                assert_eq!(flag, "0");
            }
        }
    }

    #[test]
    fn test_serialize_prettifies_titles() {
        let mut model = EntryModel::new();
        model
            .append_document(doc("a.pdf", "  Witness__Statement ", None), stored())
            .unwrap();

        let index = serialize_index(&model);
        assert!(index.contains("a.pdf,Witness Statement,,0"));
    }

    #[test]
    fn test_serialize_escapes_comma_titles() {
        let mut model = EntryModel::new();
        model
            .append_document(doc("a.pdf", "Smith, John", None), stored())
            .unwrap();

        let index = serialize_index(&model);
        assert!(index.contains("a.pdf,\"Smith, John\",,0"));
    }

    #[test]
    fn test_missing_sanitized_mapping_falls_back_to_original_name() {
        let mut model = EntryModel::new();
        model
            .append_document(doc("Exhibit A.pdf", "Exhibit A", None), stored())
            .unwrap();
        model.forget_sanitized("Exhibit A.pdf");

        let index = serialize_index(&model);
        let lines: Vec<&str> = index.trim_start_matches('\u{FEFF}').lines().collect();
        // With no registry row, the serializer emits the original name.
        assert_eq!(lines[1], "Exhibit A.pdf,Exhibit A,,0");
    }

    #[test]
    fn test_removed_document_has_no_row() {
        let mut model = EntryModel::new();
        model.append_document(doc("a.pdf", "A", None), stored()).unwrap();
        model.append_document(doc("b.pdf", "B", None), stored()).unwrap();
        model
            .remove(&crate::model::EntryKey::Document("a.pdf".to_string()))
            .unwrap();

        let index = serialize_index(&model);
        assert!(!index.contains("a.pdf"));
        assert!(index.contains("b.pdf"));
    }
}
