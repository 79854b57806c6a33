use thiserror::Error;

/// Convenience result type for transform operations.
pub type TransformResult<T> = Result<T, TransformError>;

/// Error type returned by transform functions.
///
/// Every variant is a configuration problem: a spec naming datasets or
/// columns that do not exist, or a spec that is structurally unusable.
/// Data problems are never errors: unparseable cells coerce to
/// [`Value::Null`](crate::types::Value::Null) and an unparseable WHERE
/// expression filters nothing.
#[derive(Debug, Error)]
pub enum TransformError {
    /// A join needs at least two input datasets.
    #[error("join requires at least two datasets, got {count}")]
    NotEnoughDatasets { count: usize },

    /// A join spec names a dataset id that was not provided.
    #[error("unknown dataset '{dataset}'")]
    UnknownDataset { dataset: String },

    /// A join input declares no key columns for a dataset.
    #[error("no key columns configured for dataset '{dataset}'")]
    MissingKeyColumns { dataset: String },

    /// A required spec field is empty (e.g. a pivot with no value fields).
    #[error("{operation} requires a non-empty {field}")]
    EmptyField {
        operation: &'static str,
        field: &'static str,
    },

    /// An operation names a column the dataset does not declare.
    #[error("dataset '{dataset}' has no column '{column}'")]
    UnknownColumn { dataset: String, column: String },

    /// A numeric aggregation targets a column with no numeric values at all.
    #[error("column '{column}' has no numeric values to aggregate")]
    ColumnNotNumeric { column: String },

    /// A new-column transform targets a name the dataset already declares.
    #[error("dataset '{dataset}' already has a column '{column}'")]
    ColumnAlreadyExists { dataset: String, column: String },

    /// A column transform carries a regex pattern that does not compile.
    #[error("invalid regex '{pattern}': {message}")]
    InvalidRegex { pattern: String, message: String },
}
