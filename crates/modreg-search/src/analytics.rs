//! Download analytics: append-only event recording and registry-wide
//! aggregates.

use chrono::{Duration, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::SearchError;
use modreg_types::{ModuleProviderRef, ModuleVersionRef};

/// Records a single download event for a module version.
///
/// Rows are append-only; they are never updated, only aggregated.
///
/// # Errors
///
/// Returns `SearchError::Database` on SQL failure (including a dangling
/// version ID when foreign keys are enforced).
pub fn record_download(
    conn: &Connection,
    module_version_id: i64,
    tool_version: Option<&str>,
    token: Option<&str>,
) -> Result<i64, SearchError> {
    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
    conn.execute(
        "INSERT INTO analytics (parent_module_version, timestamp, tool_version, token)
         VALUES (?1, ?2, ?3, ?4)",
        params![module_version_id, timestamp, tool_version, token],
    )?;

    let id = conn.last_insert_rowid();
    tracing::debug!(module_version_id, id, "recorded download event");
    Ok(id)
}

/// Returns the version with the most recent `published_at` timestamp.
///
/// Only published versions qualify (rows without a `published_at` are
/// skipped). Exact timestamp ties break toward the highest row ID, i.e. the
/// most recently inserted. An empty registry returns `Ok(None)`.
pub fn most_recently_published(
    conn: &Connection,
) -> Result<Option<ModuleVersionRef>, SearchError> {
    let row = conn
        .query_row(
            "SELECT mp.namespace, mp.module, mp.provider, mv.version
             FROM module_version mv
             JOIN module_provider mp ON mp.id = mv.module_provider_id
             WHERE mv.published_at IS NOT NULL
             ORDER BY mv.published_at DESC, mv.id DESC
             LIMIT 1",
            [],
            |row| {
                Ok(ModuleVersionRef {
                    namespace: row.get(0)?,
                    module: row.get(1)?,
                    provider: row.get(2)?,
                    version: row.get(3)?,
                })
            },
        )
        .optional()?;

    Ok(row)
}

/// Returns the provider with the most download events in the last seven
/// days.
///
/// Download counts tie-break by ascending (namespace, module, provider).
/// No downloads in the window returns `Ok(None)`.
pub fn most_downloaded_this_week(
    conn: &Connection,
) -> Result<Option<ModuleProviderRef>, SearchError> {
    let cutoff = (Utc::now() - Duration::days(7)).to_rfc3339_opts(SecondsFormat::Micros, true);

    let row = conn
        .query_row(
            "SELECT mp.namespace, mp.module, mp.provider, COUNT(*) AS download_count
             FROM analytics a
             JOIN module_version mv ON mv.id = a.parent_module_version
             JOIN module_provider mp ON mp.id = mv.module_provider_id
             WHERE a.timestamp >= ?1
             GROUP BY mp.namespace, mp.module, mp.provider
             ORDER BY download_count DESC,
                      mp.namespace ASC, mp.module ASC, mp.provider ASC
             LIMIT 1",
            params![cutoff],
            |row| {
                Ok(ModuleProviderRef {
                    namespace: row.get(0)?,
                    module: row.get(1)?,
                    provider: row.get(2)?,
                })
            },
        )
        .optional()?;

    Ok(row)
}
