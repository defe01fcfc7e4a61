//! Error types for registry lifecycle operations.

use thiserror::Error;

/// Errors that can occur during provider and version lifecycle operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The supplied version string does not match the semantic-version
    /// grammar. No mutation was attempted.
    #[error(transparent)]
    Version(#[from] modreg_version::VersionError),

    /// A provider with the same (namespace, module, provider) triple
    /// already exists.
    #[error("module provider '{0}' already exists")]
    DuplicateProvider(String),

    /// A database operation failed.
    #[error("registry database error: {0}")]
    Database(#[from] rusqlite::Error),
}
