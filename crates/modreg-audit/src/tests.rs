//! Unit tests for the audit history.

use rusqlite::{params, Connection};

use crate::action::AuditAction;
use crate::error::AuditError;
use crate::store::{append_event, query_events, AuditOrderBy, AuditQuery};

/// Creates an in-memory SQLite database with migrations applied.
fn test_db() -> Connection {
    let conn = Connection::open_in_memory().expect("should open in-memory db");
    modreg_db::run_migrations(&conn).expect("migrations should succeed");
    conn
}

/// Inserts an event with a fixed timestamp, for deterministic ordering.
fn seed_event(conn: &Connection, username: &str, action: &str, object_id: &str, timestamp: &str) {
    conn.execute(
        "INSERT INTO audit_history (username, action, object_type, object_id, timestamp)
         VALUES (?1, ?2, 'ModuleProvider', ?3, ?4)",
        params![username, action, object_id, timestamp],
    )
    .expect("should insert event");
}

// ── append_event tests ───────────────────────────────────────────────

#[test]
fn append_event_inserts_row() {
    let conn = test_db();

    let event = append_event(
        &conn,
        "admin@example.com",
        AuditAction::ModuleProviderCreate,
        "ModuleProvider",
        "hashicorp/vpc-network/aws",
        None,
        None,
    )
    .expect("append should succeed");

    assert!(event.id > 0, "returned row ID should be positive");
    assert_eq!(event.action, "MODULE_PROVIDER_CREATE");
    assert!(event.timestamp.ends_with('Z'), "timestamp should be UTC");

    let (username, action, object_type, object_id): (String, String, String, String) = conn
        .query_row(
            "SELECT username, action, object_type, object_id FROM audit_history WHERE id = ?1",
            [event.id],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
        )
        .expect("should query inserted row");

    assert_eq!(username, "admin@example.com");
    assert_eq!(action, "MODULE_PROVIDER_CREATE");
    assert_eq!(object_type, "ModuleProvider");
    assert_eq!(object_id, "hashicorp/vpc-network/aws");
}

#[test]
fn append_event_stores_value_transition() {
    let conn = test_db();

    let event = append_event(
        &conn,
        "admin@example.com",
        AuditAction::ModuleProviderUpdateVerified,
        "ModuleProvider",
        "hashicorp/vpc-network/aws",
        Some("false"),
        Some("true"),
    )
    .expect("append should succeed");

    assert_eq!(event.old_value.as_deref(), Some("false"));
    assert_eq!(event.new_value.as_deref(), Some("true"));
}

#[test]
fn append_event_on_missing_table_returns_database_error() {
    // Use a fresh connection without migrations.
    let conn = Connection::open_in_memory().expect("open db");

    let result = append_event(
        &conn,
        "admin@example.com",
        AuditAction::ModuleVersionIndex,
        "ModuleVersion",
        "1.0.0",
        None,
        None,
    );

    assert!(
        matches!(result, Err(AuditError::Database(_))),
        "should return database error when table is missing"
    );
}

// ── query_events tests ───────────────────────────────────────────────

#[test]
fn query_defaults_to_timestamp_descending() {
    let conn = test_db();
    seed_event(&conn, "alice", "MODULE_PROVIDER_CREATE", "a/b/c", "2026-08-01T00:00:00.000000Z");
    seed_event(&conn, "bob", "MODULE_VERSION_INDEX", "a/b/c", "2026-08-03T00:00:00.000000Z");
    seed_event(&conn, "carol", "MODULE_VERSION_PUBLISH", "a/b/c", "2026-08-02T00:00:00.000000Z");

    let page = query_events(&conn, &AuditQuery::default()).expect("query");

    assert_eq!(page.total_count, 3);
    assert_eq!(page.filtered_count, 3);
    let usernames: Vec<&str> = page.events.iter().map(|e| e.username.as_str()).collect();
    assert_eq!(usernames, vec!["bob", "carol", "alice"]);
}

#[test]
fn query_ascending_reverses_order() {
    let conn = test_db();
    seed_event(&conn, "alice", "MODULE_PROVIDER_CREATE", "a/b/c", "2026-08-01T00:00:00.000000Z");
    seed_event(&conn, "bob", "MODULE_VERSION_INDEX", "a/b/c", "2026-08-03T00:00:00.000000Z");

    let page = query_events(
        &conn,
        &AuditQuery {
            descending: false,
            ..Default::default()
        },
    )
    .expect("query");

    let usernames: Vec<&str> = page.events.iter().map(|e| e.username.as_str()).collect();
    assert_eq!(usernames, vec!["alice", "bob"]);
}

#[test]
fn query_orders_by_whitelisted_column() {
    let conn = test_db();
    seed_event(&conn, "carol", "MODULE_PROVIDER_CREATE", "x", "2026-08-01T00:00:00.000000Z");
    seed_event(&conn, "alice", "MODULE_VERSION_INDEX", "y", "2026-08-02T00:00:00.000000Z");
    seed_event(&conn, "bob", "MODULE_VERSION_PUBLISH", "z", "2026-08-03T00:00:00.000000Z");

    let page = query_events(
        &conn,
        &AuditQuery {
            order_by: AuditOrderBy::Username,
            descending: false,
            ..Default::default()
        },
    )
    .expect("query");

    let usernames: Vec<&str> = page.events.iter().map(|e| e.username.as_str()).collect();
    assert_eq!(usernames, vec!["alice", "bob", "carol"]);
}

#[test]
fn free_text_filters_but_total_count_does_not() {
    let conn = test_db();
    seed_event(&conn, "alice", "MODULE_PROVIDER_CREATE", "hashicorp/vpc/aws", "2026-08-01T00:00:00.000000Z");
    seed_event(&conn, "bob", "MODULE_VERSION_INDEX", "community/firewall/datadog", "2026-08-02T00:00:00.000000Z");
    seed_event(&conn, "malice", "MODULE_PROVIDER_DELETE", "test/mod1/aws", "2026-08-03T00:00:00.000000Z");

    let page = query_events(
        &conn,
        &AuditQuery {
            query: Some("alice".to_string()),
            ..Default::default()
        },
    )
    .expect("query");

    // Substring match: both "alice" and "malice" hit.
    assert_eq!(page.total_count, 3);
    assert_eq!(page.filtered_count, 2);
    assert_eq!(page.events.len(), 2);
    assert!(page.filtered_count <= page.total_count);
    assert!(page
        .events
        .iter()
        .all(|e| e.username.contains("alice")));
}

#[test]
fn free_text_matches_values_and_object_ids() {
    let conn = test_db();
    seed_event(&conn, "alice", "MODULE_PROVIDER_CREATE", "hashicorp/vpc/aws", "2026-08-01T00:00:00.000000Z");
    conn.execute(
        "INSERT INTO audit_history (username, action, object_type, object_id, old_value, new_value, timestamp)
         VALUES ('bob', 'MODULE_PROVIDER_UPDATE_VERIFIED', 'ModuleProvider', 'test/mod1/aws', 'false', 'true', '2026-08-02T00:00:00.000000Z')",
        [],
    )
    .expect("insert");

    let by_object = query_events(
        &conn,
        &AuditQuery {
            query: Some("vpc".to_string()),
            ..Default::default()
        },
    )
    .expect("query");
    assert_eq!(by_object.filtered_count, 1);
    assert_eq!(by_object.events[0].username, "alice");

    let by_value = query_events(
        &conn,
        &AuditQuery {
            query: Some("true".to_string()),
            ..Default::default()
        },
    )
    .expect("query");
    assert_eq!(by_value.filtered_count, 1);
    assert_eq!(by_value.events[0].username, "bob");
}

#[test]
fn pagination_slices_the_filtered_order() {
    let conn = test_db();
    for day in 1..=5 {
        seed_event(
            &conn,
            &format!("user{day}"),
            "MODULE_VERSION_INDEX",
            "a/b/c",
            &format!("2026-08-0{day}T00:00:00.000000Z"),
        );
    }

    let page = query_events(
        &conn,
        &AuditQuery {
            limit: Some(2),
            offset: 1,
            ..Default::default()
        },
    )
    .expect("query");

    assert_eq!(page.total_count, 5);
    assert_eq!(page.filtered_count, 5);
    assert!(page.events.len() <= 2);
    // Descending by timestamp, skipping the newest: days 4 and 3.
    let usernames: Vec<&str> = page.events.iter().map(|e| e.username.as_str()).collect();
    assert_eq!(usernames, vec!["user4", "user3"]);
}

#[test]
fn query_on_empty_table() {
    let conn = test_db();
    let page = query_events(&conn, &AuditQuery::default()).expect("query");
    assert_eq!(page.total_count, 0);
    assert_eq!(page.filtered_count, 0);
    assert!(page.events.is_empty());
}

// ── AuditAction tests ────────────────────────────────────────────────

#[test]
fn audit_action_round_trip() {
    for action in [
        AuditAction::ModuleProviderCreate,
        AuditAction::ModuleProviderDelete,
        AuditAction::ModuleProviderUpdateVerified,
        AuditAction::ModuleProviderUpdateGitTagFormat,
        AuditAction::ModuleProviderUpdateRepoUrls,
        AuditAction::ModuleVersionIndex,
        AuditAction::ModuleVersionPublish,
        AuditAction::ModuleVersionDelete,
    ] {
        let s = action.as_str();
        let restored: AuditAction = s.parse().expect("should parse action string");
        assert_eq!(restored, action);
    }
}

#[test]
fn audit_action_from_invalid() {
    assert!("MODULE_PROVIDER_RENAME".parse::<AuditAction>().is_err());
    assert!("".parse::<AuditAction>().is_err());
}
