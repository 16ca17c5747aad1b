use thiserror::Error;

/// Store-specific error types for the credential record.
///
/// A failed write is surfaced, never swallowed: the controller treats it
/// as fatal rather than running with a credential that diverges from the
/// persisted record.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing record failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing store refused the write
    #[error("Write rejected: {0}")]
    WriteRejected(String),

    /// A record or entry did not form a valid access code
    #[error("Invalid access code: {0}")]
    InvalidCode(#[from] deadbolt_core::Error),
}

/// Specialized result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
