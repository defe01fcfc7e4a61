//! Error types for the audit layer.

/// Errors that can occur during audit history operations.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    /// A database operation failed.
    #[error("audit database error: {0}")]
    Database(#[from] rusqlite::Error),
}
