//! The in-memory dictionary table.

use crate::error::{CodecError, CodecResult};
use crate::DEFINITION_DELIMITER;
use std::collections::BTreeMap;

/// Normalizes a word to its canonical lookup form.
///
/// Words are case-insensitive; the table stores and compares them in lower
/// case.
#[must_use]
pub fn normalize_word(word: &str) -> String {
    word.to_lowercase()
}

/// Splits a raw definitions string on the definition delimiter.
///
/// Empty segments are dropped, so `"bark;;woof"` yields two definitions and
/// `";;"` yields none. This is the single rule used both when parsing the
/// persisted file and when interpreting a client payload.
#[must_use]
pub fn split_definitions(raw: &str) -> Vec<String> {
    raw.split(DEFINITION_DELIMITER)
        .filter(|segment| !segment.is_empty())
        .map(str::to_owned)
        .collect()
}

/// A mapping from word to its ordered list of definitions.
///
/// # Invariants
///
/// - Keys are unique, non-empty, and lower-cased.
/// - Every present word has at least one definition, and no definition is
///   the empty string.
///
/// [`put`](DictionaryTable::put) enforces these; lookups normalize their
/// input so callers never have to. Entries are kept in a `BTreeMap` so
/// iteration (and therefore rendering) is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DictionaryTable {
    entries: BTreeMap<String, Vec<String>>,
}

impl DictionaryTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of words in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if the word is present (case-insensitive).
    #[must_use]
    pub fn contains(&self, word: &str) -> bool {
        self.entries.contains_key(&normalize_word(word))
    }

    /// Returns the definitions for a word (case-insensitive), in stored
    /// order.
    #[must_use]
    pub fn get(&self, word: &str) -> Option<&[String]> {
        self.entries
            .get(&normalize_word(word))
            .map(Vec::as_slice)
    }

    /// Inserts or wholesale-replaces the entry for a word.
    ///
    /// The word is normalized before insertion.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::EmptyWord`] if the word normalizes to the
    /// empty string, or [`CodecError::EmptyDefinitions`] if the definitions
    /// list is empty or contains an empty string.
    pub fn put(&mut self, word: &str, definitions: Vec<String>) -> CodecResult<()> {
        let word = normalize_word(word);
        if word.is_empty() {
            return Err(CodecError::EmptyWord);
        }
        if definitions.is_empty() || definitions.iter().any(String::is_empty) {
            return Err(CodecError::EmptyDefinitions { word });
        }
        self.entries.insert(word, definitions);
        Ok(())
    }

    /// Removes the entry for a word (case-insensitive).
    ///
    /// Returns the removed definitions, or `None` if the word was absent.
    pub fn remove(&mut self, word: &str) -> Option<Vec<String>> {
        self.entries.remove(&normalize_word(word))
    }

    /// Iterates over entries in deterministic (sorted) order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(word, defs)| (word.as_str(), defs.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_lowercases() {
        assert_eq!(normalize_word("CaT"), "cat");
        assert_eq!(normalize_word("cat"), "cat");
    }

    #[test]
    fn split_drops_empty_segments() {
        assert_eq!(split_definitions("bark;woof"), vec!["bark", "woof"]);
        assert_eq!(split_definitions("bark;;woof"), vec!["bark", "woof"]);
        assert!(split_definitions(";;").is_empty());
        assert!(split_definitions("").is_empty());
    }

    #[test]
    fn put_and_get_are_case_insensitive() {
        let mut table = DictionaryTable::new();
        table.put("Cat", vec!["a feline".into()]).unwrap();

        assert!(table.contains("CAT"));
        assert_eq!(table.get("cat"), Some(&["a feline".to_string()][..]));
        // Stored key is the normalized form.
        assert_eq!(table.iter().next().unwrap().0, "cat");
    }

    #[test]
    fn put_replaces_wholesale() {
        let mut table = DictionaryTable::new();
        table.put("dog", vec!["bark".into()]).unwrap();
        table
            .put("dog", vec!["woof".into(), "canine".into()])
            .unwrap();

        assert_eq!(
            table.get("dog"),
            Some(&["woof".to_string(), "canine".to_string()][..])
        );
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn put_rejects_empty_word() {
        let mut table = DictionaryTable::new();
        let result = table.put("", vec!["def".into()]);
        assert_eq!(result, Err(CodecError::EmptyWord));
    }

    #[test]
    fn put_rejects_empty_definitions() {
        let mut table = DictionaryTable::new();
        assert!(matches!(
            table.put("cat", vec![]),
            Err(CodecError::EmptyDefinitions { .. })
        ));
        assert!(matches!(
            table.put("cat", vec!["ok".into(), String::new()]),
            Err(CodecError::EmptyDefinitions { .. })
        ));
    }

    #[test]
    fn remove_returns_definitions() {
        let mut table = DictionaryTable::new();
        table.put("fox", vec!["quick".into()]).unwrap();

        assert_eq!(table.remove("FOX"), Some(vec!["quick".to_string()]));
        assert!(table.remove("fox").is_none());
        assert!(table.is_empty());
    }
}
