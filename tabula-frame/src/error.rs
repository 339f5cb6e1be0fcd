//! Error types for tabula frames

use thiserror::Error;

/// Tabula error types
#[derive(Debug, Error)]
pub enum TabulaError {
    /// Record type exposes no instance properties to columnize.
    #[error("Unsupported record shape: {type_name} has no instance properties")]
    UnsupportedRecordShape {
        /// Name of the offending record type.
        type_name: &'static str,
    },
    /// A single conversion call saw records of more than one concrete type.
    #[error("Heterogeneous record sequence: expected {expected}, found {found}")]
    HeterogeneousRecordSequence {
        /// Type name the sequence was declared with.
        expected: &'static str,
        /// Type name actually encountered.
        found: &'static str,
    },
    /// A null value was observed in a column declared non-nullable primitive.
    #[error("Null value in non-nullable column '{column}'")]
    NullInNonNullableColumn {
        /// Name of the affected column.
        column: String,
    },
    /// Nested schema recursion exceeded the configured depth ceiling.
    #[error("Schema nesting exceeds maximum depth {limit}")]
    SchemaTooDeep {
        /// The configured depth limit that was exceeded.
        limit: usize,
    },
    /// An accessor produced a value incompatible with the declared descriptor.
    #[error("Mismatched value type in column '{column}': expected {expected}, found {found}")]
    MismatchedValueType {
        /// Name of the affected column.
        column: String,
        /// Kind the column descriptor declares.
        expected: String,
        /// Kind of the value actually produced.
        found: String,
    },
    /// Column length does not match the frame row count.
    #[error("Column '{column}' has {found} values, frame has {expected} rows")]
    ColumnLengthMismatch {
        /// Name of the affected column.
        column: String,
        /// Row count the frame declares.
        expected: usize,
        /// Number of values the column actually holds.
        found: usize,
    },
    /// Two columns or properties share the same name.
    #[error("Duplicate column name: {name}")]
    DuplicateColumnName {
        /// The repeated name.
        name: String,
    },
    /// A configured limit was exceeded.
    #[error("Limit exceeded: {0}")]
    LimitExceeded(String),
    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Internal invariant was violated.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, TabulaError>;
