use std::collections::HashMap;

use redb::{ReadableTable, ReadableTableMetadata};

use super::db::{Database, DatabaseError};
use super::models::{Entry, WordSummary};
use super::tables::*;

impl Database {
    // ========================================================================
    // Entry operations
    // ========================================================================

    /// Store an entry and update the timeline and word indexes
    pub fn put_entry(&self, entry: &Entry) -> Result<(), DatabaseError> {
        debug_assert!(!entry.id.is_empty(), "entry id must not be empty");
        debug_assert!(!entry.word.is_empty(), "entry word must not be empty");

        let write_txn = self.begin_write()?;
        {
            let mut table = write_txn.open_table(ENTRIES)?;
            let data = rmp_serde::to_vec_named(entry)?;
            table.insert(entry.id.as_str(), data.as_slice())?;

            let mut timeline = write_txn.open_table(ENTRY_TIMELINE)?;
            timeline.insert((entry.created_at.timestamp_micros(), entry.id.as_str()), ())?;

            let mut word_table = write_txn.open_table(WORD_ENTRIES)?;
            let mut entry_ids: Vec<String> = word_table
                .get(entry.word.as_str())?
                .map(|v| rmp_serde::from_slice(v.value()).unwrap_or_default())
                .unwrap_or_default();

            if !entry_ids.contains(&entry.id) {
                entry_ids.push(entry.id.clone());
                let index_data = rmp_serde::to_vec_named(&entry_ids)?;
                word_table.insert(entry.word.as_str(), index_data.as_slice())?;
            }
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Get an entry by its UUID
    pub fn get_entry(&self, id: &str) -> Result<Option<Entry>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(ENTRIES)?;

        match table.get(id)? {
            Some(data) => {
                let entry: Entry = rmp_serde::from_slice(data.value())?;
                Ok(Some(entry))
            }
            None => Ok(None),
        }
    }

    /// Delete an entry and its index rows in one transaction.
    ///
    /// Returns the removed entry so the caller can release its blob, or `None`
    /// when no entry had that id (including when a concurrent delete won).
    pub fn delete_entry(&self, id: &str) -> Result<Option<Entry>, DatabaseError> {
        let write_txn = self.begin_write()?;

        let existing: Option<Entry> = {
            let table = write_txn.open_table(ENTRIES)?;
            let result = match table.get(id)? {
                Some(data) => Some(rmp_serde::from_slice(data.value())?),
                None => None,
            };
            result
        };

        if let Some(ref entry) = existing {
            {
                let mut table = write_txn.open_table(ENTRIES)?;
                table.remove(id)?;
            }
            {
                let mut timeline = write_txn.open_table(ENTRY_TIMELINE)?;
                timeline.remove((entry.created_at.timestamp_micros(), id))?;
            }

            let entry_ids: Option<Vec<String>> = {
                let word_table = write_txn.open_table(WORD_ENTRIES)?;
                let result = match word_table.get(entry.word.as_str())? {
                    Some(data) => Some(rmp_serde::from_slice(data.value())?),
                    None => None,
                };
                result
            };

            if let Some(mut ids) = entry_ids {
                ids.retain(|eid| eid != id);
                let mut word_table = write_txn.open_table(WORD_ENTRIES)?;
                if ids.is_empty() {
                    word_table.remove(entry.word.as_str())?;
                } else {
                    let data = rmp_serde::to_vec_named(&ids)?;
                    word_table.insert(entry.word.as_str(), data.as_slice())?;
                }
            }
        }

        write_txn.commit()?;
        Ok(existing)
    }

    /// List entries newest first, optionally restricted to an exact stored word.
    pub fn list_entries(
        &self,
        word: Option<&str>,
        limit: usize,
    ) -> Result<Vec<Entry>, DatabaseError> {
        match word {
            Some(w) => self.list_entries_by_word(w, limit),
            None => self.list_recent_entries(limit),
        }
    }

    fn list_recent_entries(&self, limit: usize) -> Result<Vec<Entry>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let timeline = read_txn.open_table(ENTRY_TIMELINE)?;
        let table = read_txn.open_table(ENTRIES)?;

        let mut entries = Vec::new();
        for result in timeline.iter()?.rev() {
            if entries.len() >= limit {
                break;
            }
            let (key, _) = result?;
            let (_, id) = key.value();
            if let Some(data) = table.get(id)? {
                let entry: Entry = rmp_serde::from_slice(data.value())?;
                entries.push(entry);
            }
        }

        Ok(entries)
    }

    fn list_entries_by_word(&self, word: &str, limit: usize) -> Result<Vec<Entry>, DatabaseError> {
        let mut entries = self.get_entries_by_word(word)?;
        // Index order is insertion order; reverse it so ties stay newest-inserted first.
        entries.reverse();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        entries.truncate(limit);
        Ok(entries)
    }

    /// Get all entries stored under an exact word, in insertion order
    pub fn get_entries_by_word(&self, word: &str) -> Result<Vec<Entry>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let word_table = read_txn.open_table(WORD_ENTRIES)?;
        let table = read_txn.open_table(ENTRIES)?;

        let entry_ids: Vec<String> = match word_table.get(word)? {
            Some(data) => rmp_serde::from_slice(data.value())?,
            None => return Ok(Vec::new()),
        };

        let mut entries = Vec::with_capacity(entry_ids.len());
        for entry_id in entry_ids {
            if let Some(data) = table.get(entry_id.as_str())? {
                let entry: Entry = rmp_serde::from_slice(data.value())?;
                entries.push(entry);
            }
        }

        Ok(entries)
    }

    /// Per-word counts and latest submission time, most recently active word first
    pub fn word_summaries(&self) -> Result<Vec<WordSummary>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(ENTRIES)?;

        let mut by_word: HashMap<String, WordSummary> = HashMap::new();
        for result in table.iter()? {
            let (_, value) = result?;
            let entry: Entry = rmp_serde::from_slice(value.value())?;
            by_word
                .entry(entry.word.clone())
                .and_modify(|s| {
                    s.count += 1;
                    if entry.created_at > s.latest {
                        s.latest = entry.created_at;
                    }
                })
                .or_insert_with(|| WordSummary {
                    word: entry.word.clone(),
                    count: 1,
                    latest: entry.created_at,
                });
        }

        let mut summaries: Vec<WordSummary> = by_word.into_values().collect();
        summaries.sort_by(|a, b| b.latest.cmp(&a.latest).then_with(|| a.word.cmp(&b.word)));
        Ok(summaries)
    }

    /// Number of stored entries
    pub fn entry_count(&self) -> Result<u64, DatabaseError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(ENTRIES)?;
        Ok(table.len()?)
    }
}
