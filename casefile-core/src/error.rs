//! Error types for Casefile operations

use crate::record::Field;

/// Result type for Casefile operations
pub type Result<T> = std::result::Result<T, CasefileError>;

/// Error types for the evaluator
///
/// Every variant except `Configuration` and `Discovery` is scoped to a single
/// record file: the evaluator logs it, counts the file as failed, and moves on.
#[derive(Debug, thiserror::Error)]
pub enum CasefileError {
    /// A required record field is missing or empty
    #[error("No {0} found in record")]
    MissingField(Field),

    /// The file parsed as JSON but does not have the record shape
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    /// The oracle call itself failed (transport, API error, empty reply)
    #[error("Oracle error: {0}")]
    Oracle(String),

    /// The oracle answered, but not with anything resembling yes or no
    #[error("Could not parse oracle response: {0:?}")]
    UnparseableVerdict(String),

    /// Record already carries a verdict and re-scoring was disabled
    #[error("Record already has a verdict")]
    AlreadyScored,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Input directory could not be listed
    #[error("Discovery error: {0}")]
    Discovery(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
