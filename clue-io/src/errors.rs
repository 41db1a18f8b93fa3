use thiserror::Error;

/// Errors that may appear while reading or writing CLUE point/cluster CSV files.
///
/// Kept entirely separate from `clue_clustering::errors::ClueError`: the core clustering
/// pipeline never touches a file, so it can never raise an I/O error; only this ingestion
/// boundary can.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("malformed CSV schema: {reason}; offending row: {row}")]
    /// A row did not have the expected number of columns, or a column was not numeric
    InvalidSchema { reason: String, row: String },

    #[error("general I/O error occurred while reading or writing a point file")]
    /// I/O error occurred while reading or writing a file
    Io(#[from] std::io::Error),

    #[error("error returned by the CSV parser")]
    /// Error returned by the CSV parser
    Csv(#[from] csv::Error),
}
