//! Rendering a table into persisted file text.

use crate::table::DictionaryTable;
use crate::{DEFINITION_DELIMITER, FIELD_DELIMITER};

/// Renders a [`DictionaryTable`] into the persisted file text.
///
/// One newline-terminated `word,def1;def2;...` line per entry, in the
/// table's deterministic iteration order. An empty table renders as the
/// empty string. The output satisfies `parse(render(t)) == t` for any
/// table upholding the entry invariants.
#[must_use]
pub fn render(table: &DictionaryTable) -> String {
    let mut out = String::new();

    for (word, definitions) in table.iter() {
        out.push_str(word);
        out.push(FIELD_DELIMITER);
        let mut first = true;
        for definition in definitions {
            if !first {
                out.push(DEFINITION_DELIMITER);
            }
            out.push_str(definition);
            first = false;
        }
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_expected_lines() {
        let mut table = DictionaryTable::new();
        table.put("cat", vec!["a feline".into()]).unwrap();
        table
            .put("dog", vec!["bark".into(), "woof".into()])
            .unwrap();

        assert_eq!(render(&table), "cat,a feline\ndog,bark;woof\n");
    }

    #[test]
    fn empty_table_renders_empty() {
        assert_eq!(render(&DictionaryTable::new()), "");
    }

    #[test]
    fn order_is_deterministic() {
        let mut a = DictionaryTable::new();
        a.put("zebra", vec!["striped".into()]).unwrap();
        a.put("ant", vec!["small".into()]).unwrap();

        let mut b = DictionaryTable::new();
        b.put("ant", vec!["small".into()]).unwrap();
        b.put("zebra", vec!["striped".into()]).unwrap();

        assert_eq!(render(&a), render(&b));
    }
}
