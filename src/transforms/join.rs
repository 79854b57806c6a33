//! Composite-key joins across two or more datasets.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{TransformError, TransformResult};
use crate::transforms::key_index::{composite_key, KeyIndex};
use crate::types::{DataSet, Row, Value};

/// How unmatched keys are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinKind {
    /// Keep only base rows matched in every dataset.
    Inner,
    /// Keep every base row.
    Left,
    /// Keep every key seen in any dataset.
    Full,
}

/// One dataset's role in a join.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinInput {
    /// Id of the dataset this entry configures.
    pub dataset: String,
    /// Columns forming the composite key, in order.
    pub key_columns: Vec<String>,
    /// Columns to carry into the output; `None` means all declared columns.
    #[serde(default)]
    pub include_columns: Option<Vec<String>>,
}

/// Join configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinSpec {
    /// One entry per dataset. Entry order is authoritative: it sets column
    /// concatenation order, the inner-join base, and full-join key
    /// discovery order.
    pub inputs: Vec<JoinInput>,
    pub kind: JoinKind,
    /// Base dataset id, honored for left joins only. A `base` that names
    /// no input falls back to the first input; that fallback is
    /// deliberate, not an error.
    #[serde(default)]
    pub base: Option<String>,
}

struct Side<'a> {
    dataset: &'a DataSet,
    key_columns: &'a [String],
    index: KeyIndex,
    /// `(output name, source column)` pairs in output order.
    columns: Vec<(String, String)>,
}

/// Join `datasets` on their composite keys.
///
/// Rules:
/// - Keys are exact trimmed text; rows whose key parts are all empty never
///   participate.
/// - Inner and left joins walk the base dataset's rows in original order,
///   taking base columns from the walked row itself, so duplicate base
///   keys emit one output row each. Inner always bases on the first input;
///   left honors `spec.base`.
/// - Matching never fans out: every non-base dataset contributes at most
///   one representative row per key, the last one that produced it.
/// - Full joins emit the key universe in dataset-then-row first-observed
///   order, one row per key, built entirely from representatives.
/// - Output columns are `"{dataset_id}:{column}"` concatenated in input
///   order; a dataset with no match for a key contributes `Null` for each
///   of its included columns.
pub fn join(datasets: &[DataSet], spec: &JoinSpec) -> TransformResult<DataSet> {
    let sides = prepare(datasets, spec)?;
    let width: usize = sides.iter().map(|side| side.columns.len()).sum();
    log::debug!(
        "join {:?} over {} datasets ({width} output columns)",
        spec.kind,
        sides.len()
    );

    let base = match spec.kind {
        JoinKind::Left => spec
            .base
            .as_deref()
            .and_then(|id| sides.iter().position(|side| side.dataset.id == id))
            .unwrap_or(0),
        JoinKind::Inner | JoinKind::Full => 0,
    };

    let rows = match spec.kind {
        JoinKind::Inner | JoinKind::Left => {
            let side = &sides[base];
            let mut rows = Vec::new();
            for row in &side.dataset.rows {
                let Some(key) = composite_key(row, side.key_columns) else {
                    continue;
                };
                let matched_everywhere = sides
                    .iter()
                    .enumerate()
                    .all(|(at, other)| at == base || other.index.contains(&key));
                if spec.kind == JoinKind::Inner && !matched_everywhere {
                    continue;
                }
                rows.push(merged_row(&sides, Some((base, row)), &key, width));
            }
            rows
        }
        JoinKind::Full => {
            let mut seen = HashSet::new();
            let mut keys: Vec<&str> = Vec::new();
            for side in &sides {
                for key in side.index.keys() {
                    if seen.insert(key.as_str()) {
                        keys.push(key.as_str());
                    }
                }
            }
            keys.iter()
                .map(|key| merged_row(&sides, None, key, width))
                .collect()
        }
    };

    let columns = sides
        .iter()
        .flat_map(|side| side.columns.iter().map(|(name, _)| name.clone()))
        .collect();
    let id = format!(
        "join_{}",
        sides
            .iter()
            .map(|side| side.dataset.id.as_str())
            .collect::<Vec<_>>()
            .join("_")
    );

    Ok(DataSet::new(id, columns, rows))
}

/// Merge one output row for `key`. When `base_row` is given, that side's
/// columns come from the walked row instead of its index representative.
fn merged_row(sides: &[Side<'_>], base_row: Option<(usize, &Row)>, key: &str, width: usize) -> Row {
    let mut out = Row::with_capacity(width);
    for (at, side) in sides.iter().enumerate() {
        let source = match base_row {
            Some((base, row)) if base == at => Some(row),
            _ => side.index.get(key).map(|position| &side.dataset.rows[position]),
        };
        for (name, column) in &side.columns {
            let value = source
                .and_then(|row| row.get(column))
                .cloned()
                .unwrap_or(Value::Null);
            out.insert(name.clone(), value);
        }
    }
    out
}

/// Validate `spec` against the supplied datasets and build one indexed
/// side per input, in input order.
fn prepare<'a>(datasets: &'a [DataSet], spec: &'a JoinSpec) -> TransformResult<Vec<Side<'a>>> {
    if datasets.len() < 2 {
        return Err(TransformError::NotEnoughDatasets {
            count: datasets.len(),
        });
    }

    for dataset in datasets {
        if !spec.inputs.iter().any(|input| input.dataset == dataset.id) {
            return Err(TransformError::MissingKeyColumns {
                dataset: dataset.id.clone(),
            });
        }
    }

    let mut sides = Vec::with_capacity(spec.inputs.len());
    for input in &spec.inputs {
        let dataset = datasets
            .iter()
            .find(|candidate| candidate.id == input.dataset)
            .ok_or_else(|| TransformError::UnknownDataset {
                dataset: input.dataset.clone(),
            })?;

        if input.key_columns.is_empty() {
            return Err(TransformError::MissingKeyColumns {
                dataset: dataset.id.clone(),
            });
        }
        for column in input
            .key_columns
            .iter()
            .chain(input.include_columns.iter().flatten())
        {
            if !dataset.has_column(column) {
                return Err(TransformError::UnknownColumn {
                    dataset: dataset.id.clone(),
                    column: column.clone(),
                });
            }
        }

        let source_columns = input
            .include_columns
            .as_deref()
            .unwrap_or(&dataset.columns);
        let columns = source_columns
            .iter()
            .map(|column| (format!("{}:{}", dataset.id, column), column.clone()))
            .collect();

        sides.push(Side {
            dataset,
            key_columns: &input.key_columns,
            index: KeyIndex::build(dataset, &input.key_columns),
            columns,
        });
    }

    Ok(sides)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Value {
        Value::Text(s.into())
    }

    fn orders() -> DataSet {
        let rows = vec![
            Row::from_iter([("id", text("1")), ("total", Value::Number(10.0))]),
            Row::from_iter([("id", text("2")), ("total", Value::Number(20.0))]),
            Row::from_iter([("id", text("3")), ("total", Value::Number(30.0))]),
        ];
        DataSet::new("orders", vec!["id".into(), "total".into()], rows)
    }

    fn shipping() -> DataSet {
        let rows = vec![
            Row::from_iter([("order", text("2")), ("fee", Value::Number(2.5))]),
            Row::from_iter([("order", text("3")), ("fee", Value::Number(3.5))]),
            Row::from_iter([("order", text("4")), ("fee", Value::Number(4.5))]),
        ];
        DataSet::new("ship", vec!["order".into(), "fee".into()], rows)
    }

    fn spec(kind: JoinKind) -> JoinSpec {
        JoinSpec {
            inputs: vec![
                JoinInput {
                    dataset: "orders".into(),
                    key_columns: vec!["id".into()],
                    include_columns: None,
                },
                JoinInput {
                    dataset: "ship".into(),
                    key_columns: vec!["order".into()],
                    include_columns: None,
                },
            ],
            kind,
            base: None,
        }
    }

    #[test]
    fn inner_join_keeps_only_matched_base_rows() {
        let joined = join(&[orders(), shipping()], &spec(JoinKind::Inner)).unwrap();

        assert_eq!(joined.id, "join_orders_ship");
        assert_eq!(
            joined.columns,
            vec!["orders:id", "orders:total", "ship:order", "ship:fee"]
        );
        assert_eq!(joined.row_count(), 2);
        assert_eq!(
            joined.rows[0],
            Row::from_iter([
                ("orders:id", text("2")),
                ("orders:total", Value::Number(20.0)),
                ("ship:order", text("2")),
                ("ship:fee", Value::Number(2.5)),
            ])
        );
    }

    #[test]
    fn left_join_null_fills_missing_sides() {
        let joined = join(&[orders(), shipping()], &spec(JoinKind::Left)).unwrap();

        assert_eq!(joined.row_count(), 3);
        assert_eq!(
            joined.rows[0],
            Row::from_iter([
                ("orders:id", text("1")),
                ("orders:total", Value::Number(10.0)),
                ("ship:order", Value::Null),
                ("ship:fee", Value::Null),
            ])
        );
    }

    #[test]
    fn full_join_emits_the_key_universe_in_discovery_order() {
        let joined = join(&[orders(), shipping()], &spec(JoinKind::Full)).unwrap();

        assert_eq!(joined.row_count(), 4);
        let ids: Vec<_> = joined
            .rows
            .iter()
            .map(|row| match (row.get("orders:id"), row.get("ship:order")) {
                (Some(Value::Text(id)), _) => id.clone(),
                (_, Some(Value::Text(id))) => id.clone(),
                other => panic!("key columns missing: {other:?}"),
            })
            .collect();
        assert_eq!(ids, vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn left_base_selects_the_walked_dataset_and_falls_back_to_first() {
        let mut left = spec(JoinKind::Left);
        left.base = Some("ship".into());
        let joined = join(&[orders(), shipping()], &left).unwrap();
        assert_eq!(joined.row_count(), 3);
        assert_eq!(joined.rows[2].get("ship:order"), Some(&text("4")));
        assert_eq!(joined.rows[2].get("orders:id"), Some(&Value::Null));

        left.base = Some("nope".into());
        let joined = join(&[orders(), shipping()], &left).unwrap();
        assert_eq!(joined.rows[0].get("orders:id"), Some(&text("1")));
    }

    #[test]
    fn include_columns_limit_the_output() {
        let mut narrowed = spec(JoinKind::Inner);
        narrowed.inputs[1].include_columns = Some(vec!["fee".into()]);
        let joined = join(&[orders(), shipping()], &narrowed).unwrap();
        assert_eq!(joined.columns, vec!["orders:id", "orders:total", "ship:fee"]);
    }

    #[test]
    fn duplicate_base_rows_each_emit_but_matches_never_fan_out() {
        let rows = vec![
            Row::from_iter([("id", text("2")), ("total", Value::Number(1.0))]),
            Row::from_iter([("id", text("2")), ("total", Value::Number(2.0))]),
        ];
        let dup_base = DataSet::new("orders", vec!["id".into(), "total".into()], rows);

        let dup_match = DataSet::new(
            "ship",
            vec!["order".into(), "fee".into()],
            vec![
                Row::from_iter([("order", text("2")), ("fee", Value::Number(1.0))]),
                Row::from_iter([("order", text("2")), ("fee", Value::Number(9.0))]),
            ],
        );

        let joined = join(&[dup_base, dup_match], &spec(JoinKind::Left)).unwrap();
        // One row per base row, both matched to the last "2" fee.
        assert_eq!(joined.row_count(), 2);
        assert_eq!(joined.rows[0].get("orders:total"), Some(&Value::Number(1.0)));
        assert_eq!(joined.rows[1].get("orders:total"), Some(&Value::Number(2.0)));
        assert_eq!(joined.rows[0].get("ship:fee"), Some(&Value::Number(9.0)));
        assert_eq!(joined.rows[1].get("ship:fee"), Some(&Value::Number(9.0)));
    }

    #[test]
    fn empty_key_rows_never_participate() {
        let rows = vec![
            Row::from_iter([("id", text("  ")), ("total", Value::Number(0.5))]),
            Row::from_iter([("id", text("2")), ("total", Value::Number(20.0))]),
        ];
        let gappy = DataSet::new("orders", vec!["id".into(), "total".into()], rows);

        let joined = join(&[gappy, shipping()], &spec(JoinKind::Left)).unwrap();
        assert_eq!(joined.row_count(), 1);
        assert_eq!(joined.rows[0].get("orders:id"), Some(&text("2")));
    }

    #[test]
    fn validation_rejects_bad_specs() {
        let err = join(&[orders()], &spec(JoinKind::Inner)).unwrap_err();
        assert!(matches!(err, TransformError::NotEnoughDatasets { count: 1 }));

        let mut missing_entry = spec(JoinKind::Inner);
        missing_entry.inputs.remove(1);
        let err = join(&[orders(), shipping()], &missing_entry).unwrap_err();
        assert!(matches!(err, TransformError::MissingKeyColumns { .. }));

        let mut ghost = spec(JoinKind::Inner);
        ghost.inputs.push(JoinInput {
            dataset: "ghost".into(),
            key_columns: vec!["id".into()],
            include_columns: None,
        });
        let err = join(&[orders(), shipping()], &ghost).unwrap_err();
        assert!(matches!(err, TransformError::UnknownDataset { .. }));

        let mut keyless = spec(JoinKind::Inner);
        keyless.inputs[0].key_columns.clear();
        let err = join(&[orders(), shipping()], &keyless).unwrap_err();
        assert!(matches!(err, TransformError::MissingKeyColumns { .. }));

        let mut bad_include = spec(JoinKind::Inner);
        bad_include.inputs[0].include_columns = Some(vec!["nope".into()]);
        let err = join(&[orders(), shipping()], &bad_include).unwrap_err();
        assert!(matches!(err, TransformError::UnknownColumn { .. }));
    }

    #[test]
    fn inputs_are_not_mutated() {
        let a = orders();
        let b = shipping();
        let _ = join(&[a.clone(), b.clone()], &spec(JoinKind::Full)).unwrap();
        assert_eq!(a, orders());
        assert_eq!(b, shipping());
    }
}
