//! Parsing the persisted file text into a table.

use crate::table::{split_definitions, DictionaryTable};
use crate::FIELD_DELIMITER;

/// Parses persisted file text into a [`DictionaryTable`].
///
/// Parsing is lenient and never fails; unusable lines are skipped:
///
/// - lines that do not split into exactly two comma-delimited fields
/// - lines whose word is empty after normalization
/// - lines whose definitions field yields no non-empty segments
///
/// If the same word appears on multiple lines, the last occurrence wins
/// (later lines overwrite earlier ones, they are not merged). Empty input
/// produces an empty table.
#[must_use]
pub fn parse(text: &str) -> DictionaryTable {
    let mut table = DictionaryTable::new();

    for line in text.lines() {
        let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();
        if fields.len() != 2 {
            continue;
        }

        let definitions = split_definitions(fields[1]);
        // Empty word or no usable definitions: skip the line.
        let _ = table.put(fields[0], definitions);
    }

    table
}
