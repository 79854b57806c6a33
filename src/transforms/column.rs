//! Per-column rewrites: regex modification and templated new columns.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{TransformError, TransformResult};
use crate::types::{DataSet, Value};

/// Regex behavior toggles, mapped onto the pattern at compile time
/// (`(?i)` / `(?m)`) and onto replace-all vs replace-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegexFlags {
    /// Replace every match instead of the first.
    #[serde(default)]
    pub global: bool,
    #[serde(default)]
    pub case_insensitive: bool,
    #[serde(default)]
    pub multiline: bool,
}

/// A single column transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ColumnTransform {
    /// Rewrite the column's values in place with a regex replacement.
    Modify {
        pattern: String,
        replacement: String,
        #[serde(default)]
        flags: RegexFlags,
    },
    /// Append a new column derived from this one by `$value` templating.
    ///
    /// The formula is plain text: every occurrence of the literal token
    /// `$value` is replaced with the source cell's text. A formula without
    /// the token, or no formula at all, yields the default value. The
    /// formula is never evaluated as code.
    NewColumn {
        new_column: String,
        #[serde(default)]
        formula: Option<String>,
        default_value: String,
    },
}

/// Apply `transform` to `column`, returning a fresh dataset.
///
/// Rules:
/// - `column` must be declared; a `NewColumn` target must not be.
/// - A pattern that does not compile is always an error, surfaced before
///   any row is touched.
/// - `Modify` leaves missing cells missing; other values are rewritten
///   through their text form. A rewrite (or template) result that is blank
///   is stored as `Null`.
pub fn transform_column(
    dataset: &DataSet,
    column: &str,
    transform: &ColumnTransform,
) -> TransformResult<DataSet> {
    if !dataset.has_column(column) {
        return Err(TransformError::UnknownColumn {
            dataset: dataset.id.clone(),
            column: column.to_string(),
        });
    }

    match transform {
        ColumnTransform::Modify {
            pattern,
            replacement,
            flags,
        } => modify(dataset, column, pattern, replacement, *flags),
        ColumnTransform::NewColumn {
            new_column,
            formula,
            default_value,
        } => append_column(dataset, column, new_column, formula.as_deref(), default_value),
    }
}

fn modify(
    dataset: &DataSet,
    column: &str,
    pattern: &str,
    replacement: &str,
    flags: RegexFlags,
) -> TransformResult<DataSet> {
    let regex = compile_pattern(pattern, flags)?;
    log::debug!(
        "modify dataset '{}' column '{column}' with /{pattern}/ ({} rows)",
        dataset.id,
        dataset.row_count()
    );

    let rows = dataset
        .rows
        .iter()
        .map(|row| {
            let mut out = row.clone();
            if let Some(value) = row.get(column) {
                if !value.is_missing() {
                    let text = value.text_form();
                    let rewritten = if flags.global {
                        regex.replace_all(&text, replacement)
                    } else {
                        regex.replace(&text, replacement)
                    };
                    out.insert(column, store_text(rewritten.into_owned()));
                }
            }
            out
        })
        .collect();

    Ok(DataSet::new(dataset.id.clone(), dataset.columns.clone(), rows))
}

fn append_column(
    dataset: &DataSet,
    column: &str,
    new_column: &str,
    formula: Option<&str>,
    default_value: &str,
) -> TransformResult<DataSet> {
    if dataset.has_column(new_column) {
        return Err(TransformError::ColumnAlreadyExists {
            dataset: dataset.id.clone(),
            column: new_column.to_string(),
        });
    }
    log::debug!(
        "derive dataset '{}' column '{new_column}' from '{column}' ({} rows)",
        dataset.id,
        dataset.row_count()
    );

    let mut columns = dataset.columns.clone();
    columns.push(new_column.to_string());

    let rows = dataset
        .rows
        .iter()
        .map(|row| {
            let mut out = row.clone();
            let rendered = match formula {
                Some(template) if template.contains("$value") => {
                    template.replace("$value", row.text(column).as_ref())
                }
                _ => default_value.to_string(),
            };
            out.insert(new_column, store_text(rendered));
            out
        })
        .collect();

    Ok(DataSet::new(dataset.id.clone(), columns, rows))
}

fn compile_pattern(pattern: &str, flags: RegexFlags) -> TransformResult<Regex> {
    let mut inline = String::new();
    if flags.case_insensitive {
        inline.push('i');
    }
    if flags.multiline {
        inline.push('m');
    }
    let source = if inline.is_empty() {
        pattern.to_string()
    } else {
        format!("(?{inline}){pattern}")
    };

    Regex::new(&source).map_err(|err| TransformError::InvalidRegex {
        pattern: pattern.to_string(),
        message: err.to_string(),
    })
}

/// Blank results coalesce to `Null`, like every other missing value.
fn store_text(text: String) -> Value {
    if text.trim().is_empty() {
        Value::Null
    } else {
        Value::Text(text)
    }
}
