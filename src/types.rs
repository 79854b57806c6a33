//! Core data model types.
//!
//! Every transform in this crate consumes and produces an in-memory [`DataSet`]:
//! an id, a declared column order, and a list of [`Row`]s mapping column names
//! to [`Value`]s. Inputs are never mutated; each operation returns a fresh
//! dataset.

use std::borrow::Cow;

/// A single cell value in a [`Row`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing/empty value.
    Null,
    /// Boolean.
    Bool(bool),
    /// 64-bit float. Integers are represented exactly up to 2^53.
    Number(f64),
    /// UTF-8 string.
    Text(String),
}

impl Value {
    /// Canonical text form of the value.
    ///
    /// `Null` renders as the empty string, booleans as `"true"`/`"false"`,
    /// numbers via their `Display` form (`3.0` renders as `"3"`). Composite
    /// keys, pivot column labels, and group keys are all built from this form.
    pub fn text_form(&self) -> Cow<'_, str> {
        match self {
            Value::Null => Cow::Borrowed(""),
            Value::Bool(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
            Value::Number(n) => Cow::Owned(n.to_string()),
            Value::Text(t) => Cow::Borrowed(t),
        }
    }

    /// Numeric reading of the value, if it has one.
    ///
    /// `Number` values are returned as-is; `Text` is trimmed and parsed as
    /// `f64`. Booleans and `Null` have no numeric reading, and NaN is
    /// rejected so it can never enter aggregation or comparison paths.
    pub fn as_number(&self) -> Option<f64> {
        let n = match self {
            Value::Number(n) => Some(*n),
            Value::Text(t) => t.trim().parse::<f64>().ok(),
            _ => None,
        };
        n.filter(|n| !n.is_nan())
    }

    /// Returns `true` if the value counts as missing: `Null`, or text that is
    /// empty after trimming.
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Text(t) => t.trim().is_empty(),
            _ => false,
        }
    }
}

/// A single row: column names mapped to values, in insertion order.
///
/// Column names are unique within a row; [`Row::insert`] replaces the value
/// in place when the name is already present. Iteration order is the order
/// names were first inserted, so rebuilt datasets keep a stable column
/// layout regardless of hash-map vagaries.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    entries: Vec<(String, Value)>,
}

impl Row {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty row with space for `capacity` columns.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Set `name` to `value`, replacing any existing entry in place.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Returns the value stored under `name`, if present.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Returns `true` if the row has an entry for `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Text form of the cell under `name`; the empty string when absent.
    pub fn text(&self, name: &str) -> Cow<'_, str> {
        self.get(name).map(Value::text_form).unwrap_or_default()
    }

    /// Numeric reading of the cell under `name`, if present and parseable.
    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_number)
    }

    /// Iterate `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Number of columns in the row.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the row has no columns.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (S, Value)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (name, value) in iter {
            row.insert(name, value);
        }
        row
    }
}

/// In-memory tabular dataset.
///
/// `columns` is the declared column order; transforms use it for output
/// layout and column validation. Rows may omit columns (the cell is treated
/// as missing); downstream operations never index positionally.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSet {
    /// Identifier, used to prefix columns in join output.
    pub id: String,
    /// Declared column names, in order.
    pub columns: Vec<String>,
    /// Row storage.
    pub rows: Vec<Row>,
}

impl DataSet {
    /// Create a dataset from an id, declared columns, and rows.
    pub fn new(id: impl Into<String>, columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self {
            id: id.into(),
            columns,
            rows,
        }
    }

    /// Number of rows in the dataset.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns the index of a declared column by name, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Returns `true` if `name` is a declared column.
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_form_covers_all_variants() {
        assert_eq!(Value::Null.text_form(), "");
        assert_eq!(Value::Bool(true).text_form(), "true");
        assert_eq!(Value::Bool(false).text_form(), "false");
        assert_eq!(Value::Number(3.0).text_form(), "3");
        assert_eq!(Value::Number(3.5).text_form(), "3.5");
        assert_eq!(Value::Text("  x ".into()).text_form(), "  x ");
    }

    #[test]
    fn as_number_parses_trimmed_text() {
        assert_eq!(Value::Text(" 42 ".into()).as_number(), Some(42.0));
        assert_eq!(Value::Text("42abc".into()).as_number(), None);
        assert_eq!(Value::Text("NaN".into()).as_number(), None);
        assert_eq!(Value::Number(1.5).as_number(), Some(1.5));
        assert_eq!(Value::Bool(true).as_number(), None);
        assert_eq!(Value::Null.as_number(), None);
    }

    #[test]
    fn missing_means_null_or_blank_text() {
        assert!(Value::Null.is_missing());
        assert!(Value::Text("   ".into()).is_missing());
        assert!(!Value::Text("0".into()).is_missing());
        assert!(!Value::Number(0.0).is_missing());
        assert!(!Value::Bool(false).is_missing());
    }

    #[test]
    fn row_insert_replaces_in_place() {
        let mut row = Row::new();
        row.insert("a", Value::Number(1.0));
        row.insert("b", Value::Number(2.0));
        row.insert("a", Value::Number(3.0));

        assert_eq!(row.len(), 2);
        assert_eq!(row.get("a"), Some(&Value::Number(3.0)));
        let names: Vec<&str> = row.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn row_text_of_absent_column_is_empty() {
        let row = Row::new();
        assert_eq!(row.text("missing"), "");
        assert_eq!(row.number("missing"), None);
        assert!(!row.contains("missing"));
    }
}
