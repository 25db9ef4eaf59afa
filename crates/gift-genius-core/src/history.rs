//! Bounded, most-recent-first record of past requests and their results.
//!
//! The whole collection lives under one key as a JSON array. Every mutation
//! is a read-modify-write of that array with no locking, so two overlapping
//! writers race and the last one wins.

use chrono::Utc;
use uuid::Uuid;

use crate::error::Result;
use crate::model::{AlchemyRequest, HistoryEntry, Recommendation, RecommendationRequest};
use crate::storage::{read_json_list, write_json_list, KeyValueStore, HISTORY_KEY};

/// Maximum number of entries kept; older ones are dropped on every write.
pub const MAX_HISTORY_ENTRIES: usize = 20;

/// Description length kept in a history summary before it is cut.
pub const SUMMARY_DESCRIPTION_CHARS: usize = 60;

pub struct HistoryStore<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> HistoryStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// All entries, newest first. Missing or corrupt data reads as empty.
    pub fn load(&self) -> Vec<HistoryEntry> {
        read_json_list(&self.store, HISTORY_KEY)
    }

    pub fn get(&self, id: &str) -> Option<HistoryEntry> {
        self.load().into_iter().find(|e| e.id == id)
    }

    /// Record a successful generation at the front of the history.
    pub fn add(
        &self,
        summary: impl Into<String>,
        recommendations: Vec<Recommendation>,
    ) -> Result<HistoryEntry> {
        for rec in &recommendations {
            rec.validate()?;
        }
        let entry = HistoryEntry {
            id: Uuid::now_v7().to_string(),
            created_at_millis: Utc::now().timestamp_millis(),
            summary: summary.into(),
            recommendations,
        };

        let mut entries = self.load();
        entries.insert(0, entry.clone());
        entries.truncate(MAX_HISTORY_ENTRIES);
        write_json_list(&self.store, HISTORY_KEY, &entries)?;

        tracing::debug!(id = %entry.id, total = entries.len(), "history entry added");
        Ok(entry)
    }

    /// Remove the entry with `id`. Absent ids are not an error.
    pub fn remove(&self, id: &str) -> Result<()> {
        let mut entries = self.load();
        entries.retain(|e| e.id != id);
        entries.truncate(MAX_HISTORY_ENTRIES);
        write_json_list(&self.store, HISTORY_KEY, &entries)
    }

    pub fn clear(&self) -> Result<()> {
        self.store.remove(HISTORY_KEY)
    }
}

/// Summary line for a person request: occasion plus a shortened description,
/// or the locale's photo placeholder when only an image was given.
pub fn summarize_request(request: &RecommendationRequest) -> String {
    let description = request.description.trim();
    let subject = if description.is_empty() {
        request.locale.translations().photo_placeholder.to_string()
    } else {
        truncate_chars(description, SUMMARY_DESCRIPTION_CHARS)
    };
    format!("{} · {}", request.occasion_label, subject)
}

pub fn summarize_alchemy(request: &AlchemyRequest) -> String {
    format!("{} + {}", request.element_a.trim(), request.element_b.trim())
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}…", text[..cut].trim_end()),
        None => text.to_string(),
    }
}
