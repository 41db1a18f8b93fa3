use thiserror::Error;

/// Errors that may appear while configuring or running the CLUE clustering pipeline.
///
/// Kept entirely separate from `clue_io::errors::IngestError`: the core pipeline never
/// touches a file, so it can never raise an I/O error.
#[derive(Debug, Error)]
pub enum ClueError {
    #[error("invalid parameter: {reason}")]
    /// A constructor or setter was given a value outside its accepted domain --
    /// e.g. a non-positive threshold, a zero `p_per_bin`, mismatched dimensions,
    /// or a non-finite / negative input value.
    InvalidParameter { reason: String },

    #[error("resource exhausted while allocating {what}")]
    /// Allocation of a point-store column or tile-grid buffer failed.
    ResourceExhausted { what: String },

    #[error("numeric error: {reason}")]
    /// A pass produced a non-finite value where a finite one was required.
    NumericError { reason: String },
}
