//! Error types for the sales ledger.

use thiserror::Error;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Errors that can occur while reading or writing the ledger files or
/// encoding a response.
///
/// Malformed stored lines are not represented here: they are skipped and
/// logged so that one corrupt line never blocks the rest of a file.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Backing file could not be opened, read, written or renamed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Delimited-record reader/writer error
    #[error("record encoding error: {0}")]
    Csv(#[from] csv::Error),

    /// Temporary rewrite file could not replace the user file
    #[error("failed to replace record file: {0}")]
    Persist(#[from] tempfile::PersistError),

    /// Response could not be encoded as JSON
    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),

    /// Username cannot be mapped to a file inside the storage root
    #[error("invalid username {0:?}: must be non-empty and must not contain path separators")]
    InvalidUsername(String),

    /// Field would break the line format: it holds the delimiter or a line break
    #[error("field {0:?} contains the field delimiter or a line break")]
    UnstorableField(String),

    /// Record holds a value the reader would reject
    #[error("record cannot be stored: {0}")]
    InvalidRecord(String),

    /// Largest id on file leaves no room for another record
    #[error("no transaction id left for user {0}")]
    IdsExhausted(String),
}

/// Why a single stored line was rejected.
///
/// Never returned from a store operation; the line is skipped and this is
/// logged at warn level.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LineError {
    /// The line does not have the fixed number of fields
    #[error("expected {expected} fields, found {found}")]
    Arity { expected: usize, found: usize },

    /// A field could not be converted to its typed value
    #[error("invalid {field}: {value:?}")]
    InvalidField { field: &'static str, value: String },
}

impl LineError {
    pub(crate) fn invalid(field: &'static str, value: &str) -> Self {
        LineError::InvalidField {
            field,
            value: value.to_string(),
        }
    }
}
