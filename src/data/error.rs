use thiserror::Error;

/// Errors raised by the table model, the filter engine and the aggregator.
///
/// An empty result is not an error: filters return an empty dataset and the
/// aggregator an empty summary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataError {
    /// A criterion or aggregation referenced a column the dataset lacks.
    #[error("column '{0}' not found in dataset")]
    InvalidColumn(String),

    #[error("row {row} has {found} values but the header has {expected} columns")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("duplicate column '{0}' in header")]
    DuplicateColumn(String),
}
