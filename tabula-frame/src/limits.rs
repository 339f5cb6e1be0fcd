//! Conversion and construction limits

/// Limits guarding conversion and frame construction against runaway inputs
#[derive(Debug, Clone)]
pub struct Limits {
    /// Maximum nesting depth of record/collection schemas (default: 64)
    pub max_schema_depth: usize,
    /// Maximum columns per frame node (default: 4,096)
    pub max_columns_per_frame: usize,
    /// Maximum rows per conversion call (default: 10,000,000)
    pub max_rows_per_frame: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_schema_depth: 64,
            max_columns_per_frame: 4_096,
            max_rows_per_frame: 10_000_000,
        }
    }
}
