//! `dataset-transforms` is a small library for reshaping in-memory tabular
//! data: composite-key joins, pivot tables, group-by aggregation with
//! share-of-total columns, never-failing column type coercion, and regex
//! column rewrites over a [`types::DataSet`].
//!
//! Every operation is pure and synchronous: it borrows its inputs, returns a
//! freshly built dataset (or a configuration error), and never mutates
//! caller state. Bad *configuration* (unknown datasets or columns, empty
//! field lists, invalid regex patterns) is an error; bad *data* never is.
//! Unparseable cells coerce to [`types::Value::Null`] and an unparseable
//! WHERE expression filters nothing.
//!
//! ## What you can do
//!
//! - **Join** two or more datasets on trimmed composite text keys
//!   ([`transforms::join`]), inner/left/full, with at most one match per
//!   key from every non-base side.
//! - **Pivot** distinct values of one column into output columns
//!   ([`transforms::pivot`]) with sum/count/average/min/max/first.
//! - **Group** rows with an optional WHERE pre-filter
//!   ([`transforms::group_by`]), emitting aggregations plus
//!   `*_share_pct` share-of-total columns, then sort and limit.
//! - **Coerce** column values to text/integer/decimal/date/boolean
//!   ([`transforms::coerce_column`]); failures become `Null`, never errors.
//! - **Rewrite** columns with a regex or derive a new column by `$value`
//!   templating ([`transforms::transform_column`]).
//!
//! ## Quick example: join datasets
//!
//! ```rust
//! use dataset_transforms::transforms::{join, JoinInput, JoinKind, JoinSpec};
//! use dataset_transforms::types::{DataSet, Row, Value};
//!
//! # fn main() -> Result<(), dataset_transforms::TransformError> {
//! let orders = DataSet::new(
//!     "orders",
//!     vec!["id".into(), "customer".into(), "total".into()],
//!     vec![
//!         Row::from_iter([
//!             ("id", Value::Text("1".into())),
//!             ("customer", Value::Text("c1".into())),
//!             ("total", Value::Number(40.0)),
//!         ]),
//!         Row::from_iter([
//!             ("id", Value::Text("2".into())),
//!             ("customer", Value::Text("c2".into())),
//!             ("total", Value::Number(9.0)),
//!         ]),
//!     ],
//! );
//! let customers = DataSet::new(
//!     "customers",
//!     vec!["key".into(), "name".into()],
//!     vec![Row::from_iter([
//!         ("key", Value::Text("c1".into())),
//!         ("name", Value::Text("Ada".into())),
//!     ])],
//! );
//!
//! let spec = JoinSpec {
//!     inputs: vec![
//!         JoinInput {
//!             dataset: "orders".into(),
//!             key_columns: vec!["customer".into()],
//!             include_columns: None,
//!         },
//!         JoinInput {
//!             dataset: "customers".into(),
//!             key_columns: vec!["key".into()],
//!             include_columns: None,
//!         },
//!     ],
//!     kind: JoinKind::Left,
//!     base: None,
//! };
//! let joined = join(&[orders, customers], &spec)?;
//!
//! assert_eq!(
//!     joined.columns,
//!     vec!["orders:id", "orders:customer", "orders:total", "customers:key", "customers:name"]
//! );
//! assert_eq!(joined.rows[0].get("customers:name"), Some(&Value::Text("Ada".into())));
//! assert_eq!(joined.rows[1].get("customers:name"), Some(&Value::Null));
//! # Ok(())
//! # }
//! ```
//!
//! ## Coercion in one line
//!
//! ```rust
//! use dataset_transforms::transforms::{coerce_value, ColumnType};
//! use dataset_transforms::types::Value;
//!
//! // Truncating prefix parse, like a classic parseInt.
//! assert_eq!(coerce_value(&Value::Text("3.5".into()), ColumnType::Integer), Value::Number(3.0));
//! assert_eq!(coerce_value(&Value::Text("not a date".into()), ColumnType::Date), Value::Null);
//! ```
//!
//! ## Modules
//!
//! - [`types`]: the value/row/dataset model
//! - [`transforms`]: join, pivot, group-by, coercion, column rewrites
//! - [`expr`]: the minimal WHERE expression filter (lexer, parser,
//!   evaluator; expressions are data, never executed as code)
//! - [`error`]: the configuration-error taxonomy

pub mod error;
pub mod expr;
pub mod transforms;
pub mod types;

pub use error::{TransformError, TransformResult};
