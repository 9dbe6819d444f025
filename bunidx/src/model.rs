//! The ordered entry model.
//!
//! This module owns the single ordered sequence of entries that defines
//! bundle order, together with the two registries that back it: original
//! filename to retained file payload, and original filename to sanitized
//! filename. The sequence is the source of truth for ordering; positions
//! are derived from it at serialization time, never stored.
//!
//! Two entry kinds exist: document entries (carry a file) and section
//! entries (named breaks, no file, no date). Duplicate detection, manual
//! reordering, and field-based sorting all live here.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::SystemTime;

use chrono::NaiveDate;

use crate::error::{BunIdxError, Result};

/// A retained file payload with its source modification time.
#[derive(Debug, Clone)]
pub struct StoredFile {
    /// Raw file content.
    pub bytes: Vec<u8>,

    /// Modification time of the source file.
    pub modified: SystemTime,
}

/// A document in the working set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentEntry {
    /// Original filename as uploaded (unique key, case-sensitive).
    pub original_name: String,

    /// Filename-safe form used for transmission and index rows.
    pub sanitized_name: String,

    /// Display title, user-editable.
    pub title: String,

    /// Document date, user-editable. Serialized as `YYYY-MM-DD`.
    pub date: Option<NaiveDate>,

    /// Number of pages, extracted at ingestion.
    pub page_count: usize,
}

/// A named section break. Carries a title but no file and no date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionEntry {
    /// Section title, user-editable.
    pub title: String,
}

/// One row of the working set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// A document backed by a stored file.
    Document(DocumentEntry),
    /// A section break.
    Section(SectionEntry),
}

impl Entry {
    /// The entry's display title.
    pub fn title(&self) -> &str {
        match self {
            Self::Document(doc) => &doc.title,
            Self::Section(section) => &section.title,
        }
    }

    /// Whether this entry is a section break.
    pub fn is_section(&self) -> bool {
        matches!(self, Self::Section(_))
    }
}

/// Identity of an entry for removal and reordering.
///
/// Documents are identified by original filename; sections by their
/// position in the sequence (positional identity).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntryKey {
    /// A document entry, keyed by original filename.
    Document(String),
    /// A section entry, keyed by sequence position.
    Section(usize),
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Document(name) => write!(f, "{name}"),
            Self::Section(index) => write!(f, "section at position {index}"),
        }
    }
}

/// Field to sort document entries by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    /// Case-folded title ordering.
    Title,
    /// Calendar date ordering; missing dates sort before any dated entry.
    Date,
}

impl FromStr for SortField {
    type Err = BunIdxError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "title" => Ok(Self::Title),
            "date" => Ok(Self::Date),
            _ => Err(BunIdxError::invalid_config(format!(
                "Invalid sort field: {s}. Must be one of: title, date"
            ))),
        }
    }
}

/// The ordered working set of entries plus its file registries.
#[derive(Debug, Default)]
pub struct EntryModel {
    entries: Vec<Entry>,
    files: HashMap<String, StoredFile>,
    sanitized: HashMap<String, String>,
    last_sort: Option<(SortField, bool)>,
}

impl EntryModel {
    /// Create an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// The entries in bundle order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Total number of entries (documents and sections).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the working set is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of document entries.
    pub fn document_count(&self) -> usize {
        self.entries.iter().filter(|e| !e.is_section()).count()
    }

    /// Whether a document with this exact original filename is present.
    ///
    /// This is the duplicate-detection key: case-sensitive, no
    /// normalization. Two names that sanitize identically are distinct.
    pub fn contains(&self, original_name: &str) -> bool {
        self.files.contains_key(original_name)
    }

    /// The stored file for a document, if registered.
    pub fn file(&self, original_name: &str) -> Option<&StoredFile> {
        self.files.get(original_name)
    }

    /// The sanitized filename for a document, if registered.
    pub fn sanitized_name(&self, original_name: &str) -> Option<&str> {
        self.sanitized.get(original_name).map(String::as_str)
    }

    /// Whether any registered document already uses this sanitized name.
    pub fn sanitized_name_taken(&self, candidate: &str) -> bool {
        self.sanitized.values().any(|name| name == candidate)
    }

    /// Append a document entry and register its file payload.
    ///
    /// # Errors
    ///
    /// Returns [`BunIdxError::DuplicateFilename`] if a document with the
    /// same original filename is already present; the model is unchanged.
    pub fn append_document(&mut self, entry: DocumentEntry, file: StoredFile) -> Result<()> {
        if self.contains(&entry.original_name) {
            return Err(BunIdxError::duplicate_filename(&entry.original_name));
        }

        self.files.insert(entry.original_name.clone(), file);
        self.sanitized
            .insert(entry.original_name.clone(), entry.sanitized_name.clone());
        self.entries.push(Entry::Document(entry));
        Ok(())
    }

    /// Append a new section break with an empty title.
    ///
    /// Returns the index of the new entry so the caller can flag it as
    /// just added (a transient visual state, not data).
    pub fn insert_section_break(&mut self) -> usize {
        self.entries.push(Entry::Section(SectionEntry {
            title: String::new(),
        }));
        self.entries.len() - 1
    }

    /// Insert a titled section break at a position, clamped to the
    /// current length. Returns the index the section landed at.
    pub fn insert_section_break_at(&mut self, index: usize, title: impl Into<String>) -> usize {
        let index = index.min(self.entries.len());
        self.entries.insert(
            index,
            Entry::Section(SectionEntry {
                title: title.into(),
            }),
        );
        index
    }

    /// Remove an entry by identity.
    ///
    /// Removing a document also purges both registry rows, so no dangling
    /// file or sanitized-name mapping survives.
    ///
    /// # Errors
    ///
    /// Returns [`BunIdxError::UnknownEntry`] if the key does not resolve.
    pub fn remove(&mut self, key: &EntryKey) -> Result<()> {
        match key {
            EntryKey::Document(name) => {
                let index = self
                    .entries
                    .iter()
                    .position(|e| matches!(e, Entry::Document(d) if d.original_name == *name))
                    .ok_or_else(|| BunIdxError::unknown_entry(key.to_string()))?;
                self.entries.remove(index);
                self.files.remove(name);
                self.sanitized.remove(name);
                Ok(())
            }
            EntryKey::Section(index) => match self.entries.get(*index) {
                Some(Entry::Section(_)) => {
                    self.entries.remove(*index);
                    Ok(())
                }
                _ => Err(BunIdxError::unknown_entry(key.to_string())),
            },
        }
    }

    /// Set the title of an entry.
    ///
    /// # Errors
    ///
    /// Returns [`BunIdxError::UnknownEntry`] if the key does not resolve.
    pub fn set_title(&mut self, key: &EntryKey, title: impl Into<String>) -> Result<()> {
        let entry = self.entry_mut(key)?;
        match entry {
            Entry::Document(doc) => doc.title = title.into(),
            Entry::Section(section) => section.title = title.into(),
        }
        Ok(())
    }

    /// Set (or clear) the date of a document entry.
    ///
    /// Sections cannot carry a date, so this takes the original filename
    /// rather than an [`EntryKey`].
    ///
    /// # Errors
    ///
    /// Returns [`BunIdxError::UnknownEntry`] if no such document exists.
    pub fn set_date(&mut self, original_name: &str, date: Option<NaiveDate>) -> Result<()> {
        let doc = self
            .entries
            .iter_mut()
            .find_map(|e| match e {
                Entry::Document(d) if d.original_name == original_name => Some(d),
                _ => None,
            })
            .ok_or_else(|| BunIdxError::unknown_entry(original_name))?;
        doc.date = date;
        Ok(())
    }

    /// Adopt an externally driven permutation of the current entries.
    ///
    /// The new order must reference every current entry exactly once
    /// (set-equality); section keys are positions in the *current*
    /// sequence.
    ///
    /// # Errors
    ///
    /// Returns [`BunIdxError::ReorderMismatch`] if the order is not a
    /// permutation of the current entries; the model is unchanged.
    pub fn reorder(&mut self, new_order: &[EntryKey]) -> Result<()> {
        if new_order.len() != self.entries.len() {
            return Err(BunIdxError::reorder_mismatch(format!(
                "expected {} keys, got {}",
                self.entries.len(),
                new_order.len()
            )));
        }

        let mut slots: Vec<Option<Entry>> = self.entries.iter().cloned().map(Some).collect();
        let mut reordered = Vec::with_capacity(slots.len());

        for key in new_order {
            let index = match key {
                EntryKey::Document(name) => slots.iter().position(|slot| {
                    matches!(slot, Some(Entry::Document(d)) if d.original_name == *name)
                }),
                EntryKey::Section(index) => match slots.get(*index) {
                    Some(Some(Entry::Section(_))) => Some(*index),
                    _ => None,
                },
            };

            // Taking the slot makes a repeated key fail the lookup above.
            let entry = index.and_then(|i| slots[i].take()).ok_or_else(|| {
                BunIdxError::reorder_mismatch(format!(
                    "key not in working set or referenced twice: {key}"
                ))
            })?;
            reordered.push(entry);
        }

        self.entries = reordered;
        Ok(())
    }

    /// Sort document entries by a field, pinning sections in place.
    ///
    /// Repeated invocation with the same field toggles between ascending
    /// and descending. Section entries never move: documents are stably
    /// sorted among themselves and refilled around the sections' absolute
    /// positions. Missing dates order before every dated entry; titles
    /// compare case-folded.
    pub fn sort_by(&mut self, field: SortField) {
        let ascending = match self.last_sort {
            Some((last_field, last_ascending)) if last_field == field => !last_ascending,
            _ => true,
        };
        self.last_sort = Some((field, ascending));

        let mut sections: Vec<(usize, Entry)> = Vec::new();
        let mut documents: Vec<DocumentEntry> = Vec::new();
        for (index, entry) in self.entries.drain(..).enumerate() {
            match entry {
                Entry::Section(_) => sections.push((index, entry)),
                Entry::Document(doc) => documents.push(doc),
            }
        }

        // Stable sort; flipping the comparator (rather than reversing the
        // result) keeps equal keys in their original relative order.
        documents.sort_by(|a, b| {
            let ordering = match field {
                SortField::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
                SortField::Date => a
                    .date
                    .unwrap_or(NaiveDate::MIN)
                    .cmp(&b.date.unwrap_or(NaiveDate::MIN)),
            };
            if ascending { ordering } else { ordering.reverse() }
        });

        let total = sections.len() + documents.len();
        let mut sections = sections.into_iter().peekable();
        let mut documents = documents.into_iter();
        for index in 0..total {
            let section_here = sections.peek().is_some_and(|(at, _)| *at == index);
            if section_here {
                if let Some((_, section)) = sections.next() {
                    self.entries.push(section);
                }
            } else if let Some(doc) = documents.next() {
                self.entries.push(Entry::Document(doc));
            }
        }
    }

    /// Empty the sequence and both registries together.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.files.clear();
        self.sanitized.clear();
        self.last_sort = None;
    }

    /// Drop a document's stored-file registry row, leaving its sequence
    /// entry in place. Lets tests exercise the drifted-registry paths the
    /// public API never produces.
    #[cfg(test)]
    pub(crate) fn forget_file(&mut self, original_name: &str) {
        self.files.remove(original_name);
    }

    /// Drop a document's sanitized-name registry row, leaving its
    /// sequence entry in place.
    #[cfg(test)]
    pub(crate) fn forget_sanitized(&mut self, original_name: &str) {
        self.sanitized.remove(original_name);
    }

    fn entry_mut(&mut self, key: &EntryKey) -> Result<&mut Entry> {
        match key {
            EntryKey::Document(name) => self
                .entries
                .iter_mut()
                .find(|e| matches!(e, Entry::Document(d) if d.original_name == *name))
                .ok_or_else(|| BunIdxError::unknown_entry(name)),
            EntryKey::Section(index) => match self.entries.get_mut(*index) {
                Some(entry @ Entry::Section(_)) => Ok(entry),
                _ => Err(BunIdxError::unknown_entry(key.to_string())),
            },
        }
    }
}
