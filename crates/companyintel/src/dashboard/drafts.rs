//! Client-side buffer of letter drafts being edited.

use std::collections::HashMap;

use crate::types::Record;

/// In-progress letter text per record id.
///
/// An entry is seeded once, the first time its record is seen, and is never
/// replaced by later fetches. Saving does not reset it either: whatever the
/// user typed last stays on screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftBuffer {
    drafts: HashMap<String, String>,
}

impl DraftBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds entries for records not seen before. Returns how many were added.
    pub fn seed(&mut self, records: &[Record]) -> usize {
        let mut added = 0;
        for record in records {
            if !self.drafts.contains_key(&record.id) {
                self.drafts.insert(
                    record.id.clone(),
                    record.letter_draft.clone().unwrap_or_default(),
                );
                added += 1;
            }
        }
        added
    }

    pub fn get(&self, record_id: &str) -> Option<&str> {
        self.drafts.get(record_id).map(String::as_str)
    }

    pub fn edit(&mut self, record_id: &str, text: impl Into<String>) {
        self.drafts.insert(record_id.to_string(), text.into());
    }

    /// Text to persist for `record`: the buffered edit, else the server's
    /// draft, else empty.
    pub fn text_for_save(&self, record: &Record) -> String {
        self.get(&record.id)
            .map(str::to_string)
            .or_else(|| record.letter_draft.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }
}
