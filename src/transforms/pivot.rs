//! Pivot tables: distinct values of one column become output columns.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{TransformError, TransformResult};
use crate::types::{DataSet, Row, Value};

/// How cell values are combined within one (group, column value) bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PivotAggregation {
    /// Sum of numeric-parseable values.
    Sum,
    /// Number of rows in the bucket, parseable or not.
    Count,
    /// Mean of numeric-parseable values.
    Average,
    /// Minimum numeric-parseable value.
    Min,
    /// Maximum numeric-parseable value.
    Max,
    /// The bucket's first value, kept raw.
    First,
}

/// Pivot configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotSpec {
    /// Columns whose values identify an output row.
    pub row_fields: Vec<String>,
    /// Column whose distinct values spread into output columns.
    pub column_field: String,
    /// Columns aggregated into each spread cell.
    pub value_fields: Vec<String>,
    pub aggregation: PivotAggregation,
}

/// Pivot `dataset` per `spec`.
///
/// Rules:
/// - Output rows are groups of the `'|'`-joined `row_fields` text, in
///   first-seen order. An all-empty group key is a legitimate group here.
/// - Distinct `column_field` values are collected in first-seen order;
///   rows where it is missing contribute to no spread column.
/// - Output columns are the row fields followed by
///   `"{column_value}_{value_field}"`, column-value-major.
/// - A bucket with no rows at all yields `Null`, for every aggregation,
///   count included. Numeric aggregations exclude values that do not
///   parse; a bucket with nothing parseable also yields `Null`.
/// - An empty input produces an empty output, not an error.
pub fn pivot(dataset: &DataSet, spec: &PivotSpec) -> TransformResult<DataSet> {
    validate(dataset, spec)?;
    log::debug!(
        "pivot dataset '{}' on '{}' ({} rows)",
        dataset.id,
        spec.column_field,
        dataset.row_count()
    );

    // Distinct column values, first-seen, missing excluded.
    let mut labels: Vec<String> = Vec::new();
    let mut seen = HashSet::new();
    for row in &dataset.rows {
        let Some(value) = row.get(&spec.column_field) else {
            continue;
        };
        if value.is_missing() {
            continue;
        }
        let label = value.text_form().into_owned();
        if seen.insert(label.clone()) {
            labels.push(label);
        }
    }

    // Group rows by the joined row-field text, first-seen order.
    let mut group_keys: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<&Row>> = HashMap::new();
    for row in &dataset.rows {
        let key = group_key(row, &spec.row_fields);
        if !groups.contains_key(&key) {
            group_keys.push(key.clone());
        }
        groups.entry(key).or_default().push(row);
    }

    let mut columns = spec.row_fields.clone();
    for label in &labels {
        for field in &spec.value_fields {
            columns.push(format!("{label}_{field}"));
        }
    }

    let mut rows = Vec::with_capacity(group_keys.len());
    for key in &group_keys {
        let members = &groups[key];
        let mut out = Row::with_capacity(columns.len());
        for field in &spec.row_fields {
            out.insert(
                field.clone(),
                members[0].get(field).cloned().unwrap_or(Value::Null),
            );
        }
        for label in &labels {
            let bucket: Vec<&Row> = members
                .iter()
                .filter(|row| {
                    row.get(&spec.column_field)
                        .is_some_and(|v| !v.is_missing() && v.text_form() == label.as_str())
                })
                .copied()
                .collect();
            for field in &spec.value_fields {
                out.insert(format!("{label}_{field}"), aggregate(&bucket, field, spec.aggregation));
            }
        }
        rows.push(out);
    }

    Ok(DataSet::new(format!("{}_pivot", dataset.id), columns, rows))
}

fn validate(dataset: &DataSet, spec: &PivotSpec) -> TransformResult<()> {
    if spec.row_fields.is_empty() {
        return Err(TransformError::EmptyField {
            operation: "pivot",
            field: "row fields",
        });
    }
    if spec.column_field.trim().is_empty() {
        return Err(TransformError::EmptyField {
            operation: "pivot",
            field: "column field",
        });
    }
    if spec.value_fields.is_empty() {
        return Err(TransformError::EmptyField {
            operation: "pivot",
            field: "value fields",
        });
    }
    for column in spec
        .row_fields
        .iter()
        .chain(std::iter::once(&spec.column_field))
        .chain(spec.value_fields.iter())
    {
        if !dataset.has_column(column) {
            return Err(TransformError::UnknownColumn {
                dataset: dataset.id.clone(),
                column: column.clone(),
            });
        }
    }
    Ok(())
}

fn group_key(row: &Row, columns: &[String]) -> String {
    columns
        .iter()
        .map(|column| row.text(column).into_owned())
        .collect::<Vec<_>>()
        .join("|")
}

fn aggregate(bucket: &[&Row], field: &str, op: PivotAggregation) -> Value {
    // An empty bucket is Null for every aggregation, count included.
    if bucket.is_empty() {
        return Value::Null;
    }
    match op {
        PivotAggregation::Count => Value::Number(bucket.len() as f64),
        PivotAggregation::First => bucket
            .first()
            .and_then(|row| row.get(field))
            .cloned()
            .unwrap_or(Value::Null),
        _ => {
            let numbers: Vec<f64> = bucket.iter().filter_map(|row| row.number(field)).collect();
            if numbers.is_empty() {
                return Value::Null;
            }
            let value = match op {
                PivotAggregation::Sum => numbers.iter().sum(),
                PivotAggregation::Average => numbers.iter().sum::<f64>() / numbers.len() as f64,
                PivotAggregation::Min => numbers.iter().copied().fold(f64::INFINITY, f64::min),
                PivotAggregation::Max => numbers.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                PivotAggregation::Count | PivotAggregation::First => {
                    unreachable!("handled above")
                }
            };
            Value::Number(value)
        }
    }
}
