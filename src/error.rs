use thiserror::Error;

/// Convenience result type for boundary (I/O) operations.
pub type CollimateResult<T> = Result<T, CollimateError>;

/// Error type returned by the ingestion and writer boundaries.
///
/// The engine itself does not fail: a structurally empty [`crate::types::RowSet`]
/// yields an empty result, and capacity conditions are reported through the
/// observer channel instead of aborting the run.
#[derive(Debug, Error)]
pub enum CollimateError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV ingestion error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}
