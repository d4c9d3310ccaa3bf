//! Gallery assembly: group entries by word and drive per-word playback.
//!
//! Everything here is pure. Randomness is injected so callers (and tests) decide
//! where it comes from.

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::storage::Entry;

/// Entries sharing one normalized word, newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct WordGroup {
    pub word: String,
    pub items: Vec<Entry>,
}

/// Collapse runs of whitespace to a single space and trim the ends.
pub fn normalize_word(word: &str) -> String {
    word.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Group entries by normalized word, sort each group newest first, and shuffle
/// the group order.
pub fn assemble<R: Rng + ?Sized>(entries: Vec<Entry>, rng: &mut R) -> Vec<WordGroup> {
    let mut groups: Vec<WordGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for entry in entries {
        let key = normalize_word(&entry.word);
        match index.get(&key) {
            Some(&i) => groups[i].items.push(entry),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(WordGroup {
                    word: key,
                    items: vec![entry],
                });
            }
        }
    }

    for group in &mut groups {
        group.items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    }

    groups.shuffle(rng);
    groups
}

/// Cycles through a group's items, wrapping after the last one.
#[derive(Debug, Clone, Default)]
pub struct PlayCursor {
    plays: usize,
}

impl PlayCursor {
    pub fn advance<'a>(&mut self, group: &'a WordGroup) -> Option<&'a Entry> {
        if group.items.is_empty() {
            return None;
        }
        let item = &group.items[self.plays % group.items.len()];
        self.plays += 1;
        Some(item)
    }
}

/// Outcome of a play action.
#[derive(Debug, PartialEq)]
pub struct Play<'a> {
    /// Group whose playback was cut off, if one was playing
    pub stopped: Option<usize>,
    pub group: usize,
    pub entry: &'a Entry,
}

/// Per-group cursors with at most one group playing at a time.
#[derive(Debug, Clone)]
pub struct Playback {
    cursors: Vec<PlayCursor>,
    active: Option<usize>,
}

impl Playback {
    pub fn new(group_count: usize) -> Self {
        Self {
            cursors: vec![PlayCursor::default(); group_count],
            active: None,
        }
    }

    /// Stop whatever is playing and start the next item of `group`.
    pub fn play<'a>(&mut self, groups: &'a [WordGroup], group: usize) -> Option<Play<'a>> {
        let cursor = self.cursors.get_mut(group)?;
        let entry = cursor.advance(groups.get(group)?)?;
        let stopped = self.active.replace(group);
        Some(Play {
            stopped,
            group,
            entry,
        })
    }

    /// Mark playback finished (track ended or errored).
    pub fn stop(&mut self) -> Option<usize> {
        self.active.take()
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }
}
