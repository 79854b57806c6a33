//! Filter → group → aggregate → share-of-total → sort → limit pipeline.

use std::cmp::{Ordering, Reverse};
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{TransformError, TransformResult};
use crate::expr::Filter;
use crate::types::{DataSet, Row, Value};

/// Aggregation applied to one source column per group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregateOp {
    Sum,
    Avg,
    /// Rows in the group, parseable or not.
    Count,
    Min,
    Max,
}

/// One aggregation output column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationSpec {
    pub source_column: String,
    pub op: AggregateOp,
    /// Output column name; also the stem of `"{output_name}_share_pct"`.
    pub output_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// Sort applied to the grouped output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBy {
    /// Any output column (group column, aggregation, or share).
    pub column: String,
    #[serde(default)]
    pub direction: SortDirection,
}

/// Group-by configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupBySpec {
    pub group_columns: Vec<String>,
    pub aggregations: Vec<AggregationSpec>,
    /// Optional WHERE expression applied before grouping. Blank or
    /// unparseable expressions filter nothing.
    #[serde(default)]
    pub where_expression: Option<String>,
    #[serde(default)]
    pub order_by: Option<OrderBy>,
    /// Maximum output rows after sorting; `0` means unlimited.
    #[serde(default)]
    pub limit: usize,
}

/// Group `dataset` per `spec`.
///
/// Rules:
/// - Groups are keyed by the `'|'`-joined group-column text and emitted in
///   first-seen order (stable under the optional sort, which breaks ties
///   by that order).
/// - Each aggregation contributes two output columns: `output_name` and
///   `output_name_share_pct`, the group's source-column sum as a
///   percentage of that column's total over the *filtered* rows (`0` when
///   that total is zero).
/// - Numeric aggregations exclude unparseable values; a group with nothing
///   parseable aggregates to `Null`. `count` counts rows.
/// - `sum`/`avg`/`min`/`max` require the source column to hold at least
///   one numeric-parseable value somewhere in the dataset; an empty
///   dataset is vacuously fine.
/// - Sorting puts numeric-parseable cells first, ordered by value, then
///   the remaining cells in text order. An order column absent from the
///   output leaves row order unchanged.
pub fn group_by(dataset: &DataSet, spec: &GroupBySpec) -> TransformResult<DataSet> {
    validate(dataset, spec)?;
    log::debug!(
        "group dataset '{}' by {:?} ({} rows)",
        dataset.id,
        spec.group_columns,
        dataset.row_count()
    );

    let filter = Filter::compile(spec.where_expression.as_deref().unwrap_or(""));
    let filtered: Vec<&Row> = dataset
        .rows
        .iter()
        .filter(|row| filter.matches(row))
        .collect();

    let mut group_keys: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<&Row>> = HashMap::new();
    for row in &filtered {
        let key = group_key(row, &spec.group_columns);
        if !groups.contains_key(&key) {
            group_keys.push(key.clone());
        }
        groups.entry(key).or_default().push(row);
    }

    // Share denominators come from the filtered rows, so shares always sum
    // to 100 over the emitted groups (when the denominator is non-zero).
    let grand_totals: Vec<f64> = spec
        .aggregations
        .iter()
        .map(|agg| {
            filtered
                .iter()
                .filter_map(|row| row.number(&agg.source_column))
                .sum()
        })
        .collect();

    let mut columns = spec.group_columns.clone();
    for agg in &spec.aggregations {
        columns.push(agg.output_name.clone());
        columns.push(format!("{}_share_pct", agg.output_name));
    }

    let mut rows = Vec::with_capacity(group_keys.len());
    for key in &group_keys {
        let members = &groups[key];
        let mut out = Row::with_capacity(columns.len());
        for column in &spec.group_columns {
            out.insert(
                column.clone(),
                members[0].get(column).cloned().unwrap_or(Value::Null),
            );
        }
        for (agg, grand_total) in spec.aggregations.iter().zip(&grand_totals) {
            out.insert(agg.output_name.clone(), aggregate(members, agg));

            let group_sum: f64 = members
                .iter()
                .filter_map(|row| row.number(&agg.source_column))
                .sum();
            let share = if *grand_total == 0.0 {
                0.0
            } else {
                group_sum / grand_total * 100.0
            };
            out.insert(format!("{}_share_pct", agg.output_name), Value::Number(share));
        }
        rows.push(out);
    }

    if let Some(order) = &spec.order_by {
        match order.direction {
            SortDirection::Ascending => {
                rows.sort_by_cached_key(|row| sort_cell(row.get(&order.column)));
            }
            SortDirection::Descending => {
                rows.sort_by_cached_key(|row| Reverse(sort_cell(row.get(&order.column))));
            }
        }
    }
    if spec.limit > 0 && rows.len() > spec.limit {
        rows.truncate(spec.limit);
    }

    Ok(DataSet::new(format!("{}_grouped", dataset.id), columns, rows))
}

fn validate(dataset: &DataSet, spec: &GroupBySpec) -> TransformResult<()> {
    if spec.group_columns.is_empty() {
        return Err(TransformError::EmptyField {
            operation: "group by",
            field: "group columns",
        });
    }
    if spec.aggregations.is_empty() {
        return Err(TransformError::EmptyField {
            operation: "group by",
            field: "aggregations",
        });
    }
    for column in spec
        .group_columns
        .iter()
        .chain(spec.aggregations.iter().map(|agg| &agg.source_column))
    {
        if !dataset.has_column(column) {
            return Err(TransformError::UnknownColumn {
                dataset: dataset.id.clone(),
                column: column.clone(),
            });
        }
    }
    for agg in &spec.aggregations {
        if agg.op == AggregateOp::Count {
            continue;
        }
        let numeric_somewhere = dataset
            .rows
            .iter()
            .any(|row| row.number(&agg.source_column).is_some());
        if !dataset.rows.is_empty() && !numeric_somewhere {
            return Err(TransformError::ColumnNotNumeric {
                column: agg.source_column.clone(),
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

fn aggregate(members: &[&Row], agg: &AggregationSpec) -> Value {
    if agg.op == AggregateOp::Count {
        return Value::Number(members.len() as f64);
    }

    let numbers: Vec<f64> = members
        .iter()
        .filter_map(|row| row.number(&agg.source_column))
        .collect();
    if numbers.is_empty() {
        return Value::Null;
    }
    let value = match agg.op {
        AggregateOp::Sum => numbers.iter().sum(),
        AggregateOp::Avg => numbers.iter().sum::<f64>() / numbers.len() as f64,
        AggregateOp::Min => numbers.iter().copied().fold(f64::INFINITY, f64::min),
        AggregateOp::Max => numbers.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        AggregateOp::Count => unreachable!("handled above"),
    };
    Value::Number(value)
}

/// Sort key carrying one total order across a whole column: cells that
/// parse numerically come first, ordered by value, and every other cell
/// follows in text order. Absent cells compare as empty text.
///
/// Deciding numeric-vs-text per pair is not transitive on mixed columns
/// (`"2"` < `"11"` numerically, but `"11"` < `"1z"` < `"2"` as text), and
/// the standard sort panics on comparators that are not total orders.
#[derive(Debug)]
enum SortCell {
    Number(f64),
    Text(String),
}

fn sort_cell(cell: Option<&Value>) -> SortCell {
    match cell.and_then(Value::as_number) {
        Some(number) => SortCell::Number(number),
        None => SortCell::Text(cell.map(Value::text_form).unwrap_or_default().into_owned()),
    }
}

impl Ord for SortCell {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortCell::Number(a), SortCell::Number(b)) => a.total_cmp(b),
            (SortCell::Text(a), SortCell::Text(b)) => a.cmp(b),
            (SortCell::Number(_), SortCell::Text(_)) => Ordering::Less,
            (SortCell::Text(_), SortCell::Number(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for SortCell {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SortCell {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SortCell {}
