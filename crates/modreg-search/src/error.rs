//! Error types for search and aggregation.

/// Errors that can occur during search queries.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// A database operation failed.
    #[error("search database error: {0}")]
    Database(#[from] rusqlite::Error),
}
