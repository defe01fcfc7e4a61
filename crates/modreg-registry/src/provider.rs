//! Module provider lifecycle: creation, lookup, configuration updates, and
//! administrative deletion with full cascade.

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::RegistryError;

/// A full row from the `module_provider` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleProvider {
    /// Auto-incremented row ID.
    pub id: i64,
    /// The namespace that groups the module.
    pub namespace: String,
    /// The module name within the namespace.
    pub module: String,
    /// The provider name.
    pub provider: String,
    /// Whether this provider is verified.
    pub verified: bool,
    /// Template for the repository base URL.
    pub repo_base_url_template: Option<String>,
    /// Template for the repository clone URL.
    pub repo_clone_url_template: Option<String>,
    /// Template for browsing a file at a tag.
    pub repo_browse_url_template: Option<String>,
    /// Format string for deriving git tags from versions.
    pub git_tag_format: Option<String>,
}

const PROVIDER_COLUMNS: &str = "id, namespace, module, provider, verified, \
     repo_base_url_template, repo_clone_url_template, repo_browse_url_template, git_tag_format";

fn row_to_provider(row: &rusqlite::Row<'_>) -> rusqlite::Result<ModuleProvider> {
    Ok(ModuleProvider {
        id: row.get(0)?,
        namespace: row.get(1)?,
        module: row.get(2)?,
        provider: row.get(3)?,
        verified: row.get(4)?,
        repo_base_url_template: row.get(5)?,
        repo_clone_url_template: row.get(6)?,
        repo_browse_url_template: row.get(7)?,
        git_tag_format: row.get(8)?,
    })
}

/// Creates a new module provider.
///
/// # Errors
///
/// Returns [`RegistryError::DuplicateProvider`] if the (namespace, module,
/// provider) triple already exists, or [`RegistryError::Database`] on any
/// other SQL failure.
pub fn create_provider(
    conn: &Connection,
    namespace: &str,
    module: &str,
    provider: &str,
) -> Result<ModuleProvider, RegistryError> {
    match conn.execute(
        "INSERT INTO module_provider (namespace, module, provider) VALUES (?1, ?2, ?3)",
        params![namespace, module, provider],
    ) {
        Ok(_) => {}
        Err(rusqlite::Error::SqliteFailure(err, _))
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            return Err(RegistryError::DuplicateProvider(format!(
                "{namespace}/{module}/{provider}"
            )));
        }
        Err(e) => return Err(RegistryError::Database(e)),
    }

    let id = conn.last_insert_rowid();
    tracing::info!(namespace, module, provider, id, "created module provider");

    Ok(ModuleProvider {
        id,
        namespace: namespace.to_string(),
        module: module.to_string(),
        provider: provider.to_string(),
        verified: false,
        repo_base_url_template: None,
        repo_clone_url_template: None,
        repo_browse_url_template: None,
        git_tag_format: None,
    })
}

/// Looks up a module provider by its identifying names.
///
/// Absence is not an error; a miss returns `Ok(None)`.
pub fn get_provider(
    conn: &Connection,
    namespace: &str,
    module: &str,
    provider: &str,
) -> Result<Option<ModuleProvider>, RegistryError> {
    let row = conn
        .query_row(
            &format!(
                "SELECT {PROVIDER_COLUMNS} FROM module_provider
                 WHERE namespace = ?1 AND module = ?2 AND provider = ?3"
            ),
            params![namespace, module, provider],
            row_to_provider,
        )
        .optional()?;

    Ok(row)
}

/// Deletes a module provider and everything it transitively owns.
///
/// Versions, submodules and example files are removed explicitly inside one
/// transaction, so the cascade does not depend on the connection's
/// foreign-key pragma.
pub fn delete_provider(conn: &mut Connection, provider_id: i64) -> Result<(), RegistryError> {
    let tx = conn.transaction()?;

    tx.execute(
        "DELETE FROM example_file WHERE submodule_id IN (
            SELECT id FROM sub_module WHERE parent_module_version IN (
                SELECT id FROM module_version WHERE module_provider_id = ?1))",
        params![provider_id],
    )?;
    tx.execute(
        "DELETE FROM sub_module WHERE parent_module_version IN (
            SELECT id FROM module_version WHERE module_provider_id = ?1)",
        params![provider_id],
    )?;
    tx.execute(
        "DELETE FROM analytics WHERE parent_module_version IN (
            SELECT id FROM module_version WHERE module_provider_id = ?1)",
        params![provider_id],
    )?;
    tx.execute(
        "DELETE FROM module_version WHERE module_provider_id = ?1",
        params![provider_id],
    )?;
    tx.execute(
        "DELETE FROM module_provider WHERE id = ?1",
        params![provider_id],
    )?;

    tx.commit()?;
    tracing::info!(provider_id, "deleted module provider and owned rows");
    Ok(())
}

/// Sets the verified flag on a provider.
pub fn set_verified(
    conn: &Connection,
    provider_id: i64,
    verified: bool,
) -> Result<(), RegistryError> {
    conn.execute(
        "UPDATE module_provider SET verified = ?2 WHERE id = ?1",
        params![provider_id, verified],
    )?;
    Ok(())
}

/// Updates the repository URL templates on a provider. Passing `None` for a
/// template clears it.
pub fn set_repo_url_templates(
    conn: &Connection,
    provider_id: i64,
    base: Option<&str>,
    clone: Option<&str>,
    browse: Option<&str>,
) -> Result<(), RegistryError> {
    conn.execute(
        "UPDATE module_provider SET
            repo_base_url_template = ?2,
            repo_clone_url_template = ?3,
            repo_browse_url_template = ?4
         WHERE id = ?1",
        params![provider_id, base, clone, browse],
    )?;
    Ok(())
}

/// Updates the git tag format on a provider.
pub fn set_git_tag_format(
    conn: &Connection,
    provider_id: i64,
    git_tag_format: Option<&str>,
) -> Result<(), RegistryError> {
    conn.execute(
        "UPDATE module_provider SET git_tag_format = ?2 WHERE id = ?1",
        params![provider_id, git_tag_format],
    )?;
    Ok(())
}
