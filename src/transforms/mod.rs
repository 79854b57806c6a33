//! In-memory dataset transformations.
//!
//! Every operation here consumes borrowed [`crate::types::DataSet`]s and
//! returns a fresh one; inputs are never mutated and nothing is cached
//! between calls.
//!
//! Currently implemented:
//!
//! - [`coerce_column()`] / [`coerce_value()`]: never-failing column type
//!   coercion
//! - [`join()`]: composite-key inner/left/full joins across datasets
//! - [`pivot()`]: pivot tables with sum/count/average/min/max/first
//! - [`group_by()`]: WHERE filter, grouping, aggregation with
//!   share-of-total, sort, limit
//! - [`transform_column()`]: regex rewrites and `$value`-templated new
//!   columns
//!
//! ## Example: group and share totals
//!
//! ```rust
//! use dataset_transforms::transforms::{group_by, AggregateOp, AggregationSpec, GroupBySpec};
//! use dataset_transforms::types::{DataSet, Row, Value};
//!
//! let rows = vec![
//!     Row::from_iter([("region", Value::Text("east".into())), ("amount", Value::Number(50.0))]),
//!     Row::from_iter([("region", Value::Text("west".into())), ("amount", Value::Number(25.0))]),
//!     Row::from_iter([("region", Value::Text("east".into())), ("amount", Value::Number(25.0))]),
//! ];
//! let sales = DataSet::new("sales", vec!["region".into(), "amount".into()], rows);
//!
//! let spec = GroupBySpec {
//!     group_columns: vec!["region".into()],
//!     aggregations: vec![AggregationSpec {
//!         source_column: "amount".into(),
//!         op: AggregateOp::Sum,
//!         output_name: "total".into(),
//!     }],
//!     where_expression: None,
//!     order_by: None,
//!     limit: 0,
//! };
//! let grouped = group_by(&sales, &spec)?;
//!
//! assert_eq!(grouped.columns, vec!["region", "total", "total_share_pct"]);
//! assert_eq!(grouped.rows[0].get("total"), Some(&Value::Number(75.0)));
//! assert_eq!(grouped.rows[0].get("total_share_pct"), Some(&Value::Number(75.0)));
//! # Ok::<(), dataset_transforms::TransformError>(())
//! ```

pub mod coerce;
pub mod column;
pub mod group_by;
pub mod join;
pub mod key_index;
pub mod pivot;

pub use coerce::{coerce_column, coerce_value, ColumnType};
pub use column::{transform_column, ColumnTransform, RegexFlags};
pub use group_by::{group_by, AggregateOp, AggregationSpec, GroupBySpec, OrderBy, SortDirection};
pub use join::{join, JoinInput, JoinKind, JoinSpec};
pub use key_index::{composite_key, KeyIndex};
pub use pivot::{pivot, PivotAggregation, PivotSpec};
