//! Persistence operations for the audit history.
//!
//! All writes go through [`append_event`], which stamps the current UTC
//! time and inserts into the `audit_history` table in a single statement.
//! Reads go through [`query_events`], which supports free-text filtering
//! over usernames, actions, object IDs and values, a whitelisted ordering
//! column, and limit/offset pagination.

use chrono::{SecondsFormat, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use crate::action::AuditAction;
use crate::error::AuditError;

/// A single row from the `audit_history` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Auto-incremented row ID.
    pub id: i64,
    /// Username of the actor who performed the action.
    pub username: String,
    /// The canonical action label (e.g., `MODULE_PROVIDER_CREATE`).
    pub action: String,
    /// The type of object affected (e.g., `ModuleProvider`).
    pub object_type: String,
    /// The identifier of the affected object.
    pub object_id: String,
    /// The value before the action, if applicable.
    pub old_value: Option<String>,
    /// The value after the action, if applicable.
    pub new_value: Option<String>,
    /// RFC 3339 timestamp of when the event was recorded.
    pub timestamp: String,
}

/// Writes a single audit event.
///
/// The actor's username is supplied by the caller, resolved from its
/// authentication layer at call time.
///
/// # Errors
///
/// Returns `AuditError::Database` on SQL failure.
pub fn append_event(
    conn: &Connection,
    username: &str,
    action: AuditAction,
    object_type: &str,
    object_id: &str,
    old_value: Option<&str>,
    new_value: Option<&str>,
) -> Result<AuditEvent, AuditError> {
    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);

    let id = conn.query_row(
        "INSERT INTO audit_history
            (username, action, object_type, object_id, old_value, new_value, timestamp)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         RETURNING id",
        params![
            username,
            action.as_str(),
            object_type,
            object_id,
            old_value,
            new_value,
            timestamp,
        ],
        |row| row.get::<_, i64>(0),
    )?;

    tracing::debug!(username, action = action.as_str(), object_id, "appended audit event");

    Ok(AuditEvent {
        id,
        username: username.to_string(),
        action: action.as_str().to_string(),
        object_type: object_type.to_string(),
        object_id: object_id.to_string(),
        old_value: old_value.map(str::to_string),
        new_value: new_value.map(str::to_string),
        timestamp,
    })
}

/// Whitelisted ordering columns for audit queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuditOrderBy {
    /// Order by event timestamp (the default).
    #[default]
    Timestamp,
    /// Order by actor username.
    Username,
    /// Order by action label.
    Action,
    /// Order by affected object ID.
    ObjectId,
}

impl AuditOrderBy {
    fn column(self) -> &'static str {
        match self {
            Self::Timestamp => "timestamp",
            Self::Username => "username",
            Self::Action => "action",
            Self::ObjectId => "object_id",
        }
    }
}

/// Filter and pagination criteria for querying the audit history.
#[derive(Debug, Clone)]
pub struct AuditQuery {
    /// Maximum number of events to return (default: 10).
    pub limit: Option<i64>,
    /// Number of filtered events to skip.
    pub offset: i64,
    /// Whether to order descending (the default).
    pub descending: bool,
    /// The ordering column.
    pub order_by: AuditOrderBy,
    /// Free-text filter, matched as a single substring (no token splitting)
    /// against username, action, object ID, old value, or new value.
    pub query: Option<String>,
}

impl Default for AuditQuery {
    fn default() -> Self {
        Self {
            limit: None,
            offset: 0,
            descending: true,
            order_by: AuditOrderBy::Timestamp,
            query: None,
        }
    }
}

/// One page of audit events, with counts for pagination controls.
#[derive(Debug, Clone)]
pub struct AuditPage {
    /// The limit/offset slice of the filtered, ordered events.
    pub events: Vec<AuditEvent>,
    /// Total number of events in the table, disregarding the text filter.
    pub total_count: i64,
    /// Number of events matching the text filter, before pagination.
    pub filtered_count: i64,
}

/// Queries the audit history.
///
/// # Errors
///
/// Returns `AuditError::Database` on SQL failure.
pub fn query_events(conn: &Connection, query: &AuditQuery) -> Result<AuditPage, AuditError> {
    let total_count: i64 =
        conn.query_row("SELECT COUNT(*) FROM audit_history", [], |row| row.get(0))?;

    // The same single-token pattern binds all five searchable columns.
    let (where_clause, pattern) = match query.query.as_deref() {
        Some(text) => (
            "WHERE (username LIKE ?1 OR action LIKE ?1 OR object_id LIKE ?1 \
             OR old_value LIKE ?1 OR new_value LIKE ?1) ",
            Some(format!("%{text}%")),
        ),
        None => ("", None),
    };

    let count_sql = format!("SELECT COUNT(*) FROM audit_history {where_clause}");
    let filtered_count: i64 = match &pattern {
        Some(pattern) => conn.query_row(&count_sql, params![pattern], |row| row.get(0))?,
        None => total_count,
    };

    let direction = if query.descending { "DESC" } else { "ASC" };
    let limit = query.limit.unwrap_or(10);
    let (limit_idx, offset_idx) = if pattern.is_some() { (2, 3) } else { (1, 2) };
    let page_sql = format!(
        "SELECT id, username, action, object_type, object_id, old_value, new_value, timestamp
         FROM audit_history
         {where_clause}ORDER BY {} {direction}
         LIMIT ?{limit_idx} OFFSET ?{offset_idx}",
        query.order_by.column()
    );

    let mut stmt = conn.prepare(&page_sql)?;
    let map_row = |row: &rusqlite::Row<'_>| -> rusqlite::Result<AuditEvent> {
        Ok(AuditEvent {
            id: row.get(0)?,
            username: row.get(1)?,
            action: row.get(2)?,
            object_type: row.get(3)?,
            object_id: row.get(4)?,
            old_value: row.get(5)?,
            new_value: row.get(6)?,
            timestamp: row.get(7)?,
        })
    };

    let rows = match &pattern {
        Some(pattern) => stmt.query_map(params![pattern, limit, query.offset], map_row)?,
        None => stmt.query_map(params![limit, query.offset], map_row)?,
    };

    let mut events = Vec::new();
    for row in rows {
        events.push(row?);
    }

    Ok(AuditPage {
        events,
        total_count,
        filtered_count,
    })
}
