//! Module version lifecycle: lookup, replace-and-create ingestion, and
//! publishing.

use chrono::{SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::RegistryError;
use modreg_version::{SemanticVersion, VersionError};

/// A full row from the `module_version` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleVersionRow {
    /// Auto-incremented row ID.
    pub id: i64,
    /// The owning module provider.
    pub module_provider_id: i64,
    /// The semantic version string as ingested.
    pub version: String,
    /// Whether this version has been published.
    pub published: bool,
    /// Whether this version carries a pre-release suffix.
    pub beta: bool,
    /// Whether this version is internal-only.
    pub internal: bool,
    /// Short description of the module.
    pub description: Option<String>,
    /// Owner recorded at ingestion.
    pub owner: Option<String>,
    /// README content.
    pub readme_content: Option<String>,
    /// Structured module details, stored as JSON text.
    pub module_details: Option<String>,
    /// RFC 3339 timestamp set when the version is published.
    pub published_at: Option<String>,
    /// Per-version repository base URL template override.
    pub repo_base_url_template: Option<String>,
    /// Per-version repository clone URL template override.
    pub repo_clone_url_template: Option<String>,
    /// Per-version repository browse URL template override.
    pub repo_browse_url_template: Option<String>,
    /// Template for rendering usage variables.
    pub variable_template: Option<String>,
}

impl ModuleVersionRow {
    /// Renders the version-constraint example string for this version.
    ///
    /// Non-beta versions expand the template's placeholders; beta versions
    /// return the raw version string verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`VersionError::InvalidVersion`] if the stored version string
    /// no longer parses (possible only if the row was written outside this
    /// crate).
    pub fn example_version_constraint(&self, template: &str) -> Result<String, VersionError> {
        let parsed = SemanticVersion::parse(&self.version)?;
        Ok(parsed.expand_constraint_template(template))
    }
}

/// Optional attributes supplied at ingestion. Anything left `None` is stored
/// as NULL; `published` always starts false and `beta` is derived from the
/// version string.
#[derive(Debug, Clone, Default)]
pub struct NewModuleVersion {
    /// Whether this version is internal-only.
    pub internal: bool,
    /// Short description of the module.
    pub description: Option<String>,
    /// Owner recorded at ingestion.
    pub owner: Option<String>,
    /// README content.
    pub readme_content: Option<String>,
    /// Structured module details.
    pub module_details: Option<serde_json::Value>,
    /// Per-version repository base URL template override.
    pub repo_base_url_template: Option<String>,
    /// Per-version repository clone URL template override.
    pub repo_clone_url_template: Option<String>,
    /// Per-version repository browse URL template override.
    pub repo_browse_url_template: Option<String>,
    /// Template for rendering usage variables.
    pub variable_template: Option<String>,
}

const VERSION_COLUMNS: &str = "id, module_provider_id, version, published, beta, internal, \
     description, owner, readme_content, module_details, published_at, \
     repo_base_url_template, repo_clone_url_template, repo_browse_url_template, variable_template";

fn row_to_version(row: &rusqlite::Row<'_>) -> rusqlite::Result<ModuleVersionRow> {
    Ok(ModuleVersionRow {
        id: row.get(0)?,
        module_provider_id: row.get(1)?,
        version: row.get(2)?,
        published: row.get(3)?,
        beta: row.get(4)?,
        internal: row.get(5)?,
        description: row.get(6)?,
        owner: row.get(7)?,
        readme_content: row.get(8)?,
        module_details: row.get(9)?,
        published_at: row.get(10)?,
        repo_base_url_template: row.get(11)?,
        repo_clone_url_template: row.get(12)?,
        repo_browse_url_template: row.get(13)?,
        variable_template: row.get(14)?,
    })
}

/// Looks up a module version by its (module_provider, version) pair.
///
/// Absence is not an error; a miss returns `Ok(None)`.
pub fn find_version(
    conn: &Connection,
    module_provider_id: i64,
    version: &str,
) -> Result<Option<ModuleVersionRow>, RegistryError> {
    let row = conn
        .query_row(
            &format!(
                "SELECT {VERSION_COLUMNS} FROM module_version
                 WHERE module_provider_id = ?1 AND version = ?2"
            ),
            params![module_provider_id, version],
            row_to_version,
        )
        .optional()?;

    Ok(row)
}

/// Ingests a module version, replacing any existing row for the same
/// (module_provider, version) pair.
///
/// The version string is parsed first; a grammar failure rejects the call
/// before any write. If a prior row exists, it and every row it transitively
/// owns (submodules, example files, analytics) are deleted and the new row
/// is inserted within the same transaction, so concurrent readers observe
/// either the fully-prior or the fully-new state.
///
/// Returns the new row's generated ID.
///
/// # Errors
///
/// Returns [`RegistryError::Version`] for a malformed version string, or
/// [`RegistryError::Database`] on SQL failure (the transaction rolls back).
pub fn replace_and_create(
    conn: &mut Connection,
    module_provider_id: i64,
    version: &str,
    attributes: &NewModuleVersion,
) -> Result<i64, RegistryError> {
    let parsed = SemanticVersion::parse(version)?;

    let module_details_json = attributes
        .module_details
        .as_ref()
        .map(|details| details.to_string());

    let tx = conn.transaction()?;

    let prior_id: Option<i64> = tx
        .query_row(
            "SELECT id FROM module_version WHERE module_provider_id = ?1 AND version = ?2",
            params![module_provider_id, version],
            |row| row.get(0),
        )
        .optional()?;

    if let Some(prior_id) = prior_id {
        tx.execute(
            "DELETE FROM example_file WHERE submodule_id IN (
                SELECT id FROM sub_module WHERE parent_module_version = ?1)",
            params![prior_id],
        )?;
        tx.execute(
            "DELETE FROM sub_module WHERE parent_module_version = ?1",
            params![prior_id],
        )?;
        tx.execute(
            "DELETE FROM analytics WHERE parent_module_version = ?1",
            params![prior_id],
        )?;
        tx.execute("DELETE FROM module_version WHERE id = ?1", params![prior_id])?;

        tracing::info!(
            module_provider_id,
            version,
            prior_id,
            "replacing existing module version"
        );
    }

    tx.execute(
        "INSERT INTO module_version (
            module_provider_id, version, published, beta, internal,
            description, owner, readme_content, module_details,
            repo_base_url_template, repo_clone_url_template,
            repo_browse_url_template, variable_template
         ) VALUES (?1, ?2, 0, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            module_provider_id,
            version,
            parsed.is_beta(),
            attributes.internal,
            attributes.description,
            attributes.owner,
            attributes.readme_content,
            module_details_json,
            attributes.repo_base_url_template,
            attributes.repo_clone_url_template,
            attributes.repo_browse_url_template,
            attributes.variable_template,
        ],
    )?;

    let id = tx.last_insert_rowid();
    tx.commit()?;

    Ok(id)
}

/// Marks a version as published, stamping `published_at` with the current
/// UTC time.
pub fn publish_version(conn: &Connection, version_id: i64) -> Result<(), RegistryError> {
    let published_at = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
    conn.execute(
        "UPDATE module_version SET published = 1, published_at = ?2 WHERE id = ?1",
        params![version_id, published_at],
    )?;
    Ok(())
}
