//! Ordered, case-insensitive name → comment mapping.

use std::cmp::Ordering;
use std::collections::HashMap;

use super::types::models::Entry;

/// Insertion-ordered entries with a case-insensitive index.
///
/// Re-inserting a name that differs only in case replaces the stored casing
/// and comment but keeps the entry's position.
#[derive(Debug, Clone, Default)]
pub struct CommentMap {
    entries: Vec<Entry>,
    index: HashMap<String, usize>,
}

fn fold_case(name: &str) -> String {
    name.to_lowercase()
}

impl CommentMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.index
            .get(&fold_case(name))
            .map(|&position| &self.entries[position])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(&fold_case(name))
    }

    /// Inserts or replaces an entry. Returns the previous comment, if any.
    pub fn insert(&mut self, entry: Entry) -> Option<String> {
        let key = fold_case(&entry.name);
        match self.index.get(&key) {
            Some(&position) => {
                let previous = std::mem::replace(&mut self.entries[position], entry);
                Some(previous.comment)
            }
            None => {
                self.index.insert(key, self.entries.len());
                self.entries.push(entry);
                None
            }
        }
    }

    /// Removes an entry, keeping the relative order of the rest.
    pub fn remove(&mut self, name: &str) -> Option<Entry> {
        let position = self.index.remove(&fold_case(name))?;
        let removed = self.entries.remove(position);
        for slot in self.index.values_mut() {
            if *slot > position {
                *slot -= 1;
            }
        }
        Some(removed)
    }

    /// Keeps only the entries for which `keep` returns true.
    ///
    /// Returns the number of entries dropped.
    pub fn retain(&mut self, mut keep: impl FnMut(&Entry) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| keep(entry));
        self.rebuild_index();
        before - self.entries.len()
    }

    /// Reorders entries by name using the given total order.
    pub fn sort_by(&mut self, mut compare: impl FnMut(&str, &str) -> Ordering) {
        self.entries.sort_by(|a, b| compare(&a.name, &b.name));
        self.rebuild_index();
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    fn rebuild_index(&mut self) {
        self.index = self
            .entries
            .iter()
            .enumerate()
            .map(|(position, entry)| (fold_case(&entry.name), position))
            .collect();
    }
}

impl<'a> IntoIterator for &'a CommentMap {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<Entry> for CommentMap {
    fn from_iter<I: IntoIterator<Item = Entry>>(iter: I) -> Self {
        let mut map = CommentMap::new();
        for entry in iter {
            map.insert(entry);
        }
        map
    }
}

/// Default name ordering: case-insensitive, ties broken ordinally.
///
/// Portable stand-in for culture-aware ordering.
pub fn natural_name_order(a: &str, b: &str) -> Ordering {
    fold_case(a).cmp(&fold_case(b)).then_with(|| a.cmp(b))
}
