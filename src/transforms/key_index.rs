//! Composite row keys and the per-dataset key index used by joins.

use std::collections::HashMap;

use crate::types::{DataSet, Row};

/// Build the composite key for a row: each key column's text, trimmed,
/// joined with `'|'`.
///
/// Returns `None` when every part is empty; such rows are excluded from
/// keyed matching entirely, so blank rows can never collide on a phantom
/// `"|"` key. A single empty part among non-empty ones still forms a key
/// (`"a|"`).
pub fn composite_key(row: &Row, key_columns: &[String]) -> Option<String> {
    let parts: Vec<String> = key_columns
        .iter()
        .map(|column| row.text(column).trim().to_string())
        .collect();

    if parts.iter().all(|part| part.is_empty()) {
        return None;
    }
    Some(parts.join("|"))
}

/// Key lookup for one dataset.
///
/// Holds at most one representative row per key: a later row with the same
/// key replaces the earlier one, so a key never fans out into multiple
/// matches. `keys` preserves first-observed order so every consumer
/// iterates deterministically.
#[derive(Debug)]
pub struct KeyIndex {
    map: HashMap<String, usize>,
    keys: Vec<String>,
}

impl KeyIndex {
    /// Index `dataset` by the composite key over `key_columns`.
    ///
    /// Rows whose key parts are all empty are skipped.
    pub fn build(dataset: &DataSet, key_columns: &[String]) -> Self {
        let mut map = HashMap::with_capacity(dataset.row_count());
        let mut keys = Vec::new();

        for (position, row) in dataset.rows.iter().enumerate() {
            let Some(key) = composite_key(row, key_columns) else {
                log::trace!(
                    "dataset '{}': row {position} has an all-empty key, skipped",
                    dataset.id
                );
                continue;
            };
            if map.insert(key.clone(), position).is_none() {
                keys.push(key);
            }
        }

        KeyIndex { map, keys }
    }

    /// Row position for `key`: the last row that produced it.
    pub fn get(&self, key: &str) -> Option<usize> {
        self.map.get(key).copied()
    }

    /// Returns `true` if any row produced `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// Keys in first-observed row order.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if no row produced a key.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Value;

    fn text(s: &str) -> Value {
        Value::Text(s.into())
    }

    fn keyed(id: &str, sku: &str) -> Row {
        Row::from_iter([("id", text(id)), ("sku", text(sku))])
    }

    fn key_columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn composite_key_trims_and_joins_with_pipe() {
        let row = keyed(" 7 ", "ab-1");
        assert_eq!(
            composite_key(&row, &key_columns(&["id", "sku"])),
            Some("7|ab-1".into())
        );
    }

    #[test]
    fn all_empty_parts_yield_no_key_but_partial_ones_do() {
        let blank = Row::from_iter([("id", text("  ")), ("sku", Value::Null)]);
        assert_eq!(composite_key(&blank, &key_columns(&["id", "sku"])), None);

        let partial = Row::from_iter([("id", text("a")), ("sku", Value::Null)]);
        assert_eq!(
            composite_key(&partial, &key_columns(&["id", "sku"])),
            Some("a|".into())
        );
    }

    #[test]
    fn later_rows_overwrite_earlier_ones_for_the_same_key() {
        let ds = DataSet::new(
            "items",
            vec!["id".into(), "sku".into()],
            vec![keyed("1", "first"), keyed("2", "other"), keyed("1", "second")],
        );
        let index = KeyIndex::build(&ds, &key_columns(&["id"]));

        assert_eq!(index.len(), 2);
        assert_eq!(index.get("1"), Some(2));
        assert_eq!(index.get("2"), Some(1));
        // First-observed order survives the overwrite.
        assert_eq!(index.keys(), ["1".to_string(), "2".to_string()]);
    }

    #[test]
    fn rows_without_any_key_material_are_skipped() {
        let ds = DataSet::new(
            "items",
            vec!["id".into(), "sku".into()],
            vec![keyed("", ""), keyed("9", "x")],
        );
        let index = KeyIndex::build(&ds, &key_columns(&["id", "sku"]));

        assert_eq!(index.len(), 1);
        assert_eq!(index.get("9|x"), Some(1));
        assert!(!index.contains("|"));
    }

    #[test]
    fn empty_dataset_builds_an_empty_index() {
        let ds = DataSet::new("items", vec!["id".into()], vec![]);
        let index = KeyIndex::build(&ds, &key_columns(&["id"]));
        assert!(index.is_empty());
        assert_eq!(index.keys(), &[] as &[String]);
    }
}
