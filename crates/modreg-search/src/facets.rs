//! Facet counts over the text-filtered search base.
//!
//! Facets are computed against the free-text filter only — the provider,
//! namespace, verified and trust filters of the main search do not apply.
//! Each count is an independent aggregate query over the same base, counting
//! grouped (namespace, module, provider) triples so that the trusted and
//! contributed counts always sum to the total grouped count.

use std::collections::BTreeMap;

use rusqlite::Connection;
use serde::Serialize;

use crate::error::SearchError;
use crate::filter::{namespace_membership, push_text_clauses, SearchConfig, SqlParam};
use crate::BASE_FROM;

/// Counts per facet for a free-text search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchFacets {
    /// Grouped triples whose provider is verified.
    pub verified: i64,
    /// Grouped triples whose namespace is in the trusted allow-list.
    pub trusted: i64,
    /// Grouped triples whose namespace is not in the trusted allow-list.
    pub contributed: i64,
    /// Count of grouped triples per distinct provider name.
    pub providers: BTreeMap<String, i64>,
}

fn where_fragment(clauses: &[String]) -> String {
    if clauses.is_empty() {
        String::new()
    } else {
        format!("WHERE {} ", clauses.join(" AND "))
    }
}

/// Counts the grouped (namespace, module, provider) triples matching the
/// given clauses.
fn grouped_count(
    conn: &Connection,
    clauses: &[String],
    params: &[SqlParam],
) -> Result<i64, SearchError> {
    let sql = format!(
        "SELECT COUNT(*) FROM (
            SELECT 1 FROM {BASE_FROM}
            {}GROUP BY mp.namespace, mp.module, mp.provider
        )",
        where_fragment(clauses)
    );

    let params_refs: Vec<&dyn rusqlite::types::ToSql> = params.iter().map(|p| &**p).collect();
    let count = conn.query_row(&sql, params_refs.as_slice(), |row| row.get(0))?;
    Ok(count)
}

/// Computes facet counts for a free-text query.
///
/// # Errors
///
/// Returns `SearchError::Database` on SQL failure.
pub fn get_search_facets(
    conn: &Connection,
    config: &SearchConfig,
    query: Option<&str>,
) -> Result<SearchFacets, SearchError> {
    // Boxed parameters cannot be cloned, so each aggregate rebuilds its
    // clause list from the same inputs.
    let text_base = |clauses: &mut Vec<String>, params: &mut Vec<SqlParam>, idx: &mut u32| {
        push_text_clauses(query, clauses, params, idx);
    };

    let verified = {
        let mut clauses = Vec::new();
        let mut params: Vec<SqlParam> = Vec::new();
        let mut idx = 1u32;
        text_base(&mut clauses, &mut params, &mut idx);
        clauses.push("mp.verified = 1".to_string());
        grouped_count(conn, &clauses, &params)?
    };

    let trusted = {
        let mut clauses = Vec::new();
        let mut params: Vec<SqlParam> = Vec::new();
        let mut idx = 1u32;
        text_base(&mut clauses, &mut params, &mut idx);
        clauses.push(namespace_membership(
            &config.trusted_namespaces,
            false,
            &mut params,
            &mut idx,
        ));
        grouped_count(conn, &clauses, &params)?
    };

    let contributed = {
        let mut clauses = Vec::new();
        let mut params: Vec<SqlParam> = Vec::new();
        let mut idx = 1u32;
        text_base(&mut clauses, &mut params, &mut idx);
        clauses.push(namespace_membership(
            &config.trusted_namespaces,
            true,
            &mut params,
            &mut idx,
        ));
        grouped_count(conn, &clauses, &params)?
    };

    let providers = {
        let mut clauses = Vec::new();
        let mut params: Vec<SqlParam> = Vec::new();
        let mut idx = 1u32;
        text_base(&mut clauses, &mut params, &mut idx);

        let sql = format!(
            "SELECT provider, COUNT(*) FROM (
                SELECT mp.provider AS provider FROM {BASE_FROM}
                {}GROUP BY mp.namespace, mp.module, mp.provider
            )
            GROUP BY provider",
            where_fragment(&clauses)
        );

        let params_refs: Vec<&dyn rusqlite::types::ToSql> =
            params.iter().map(|p| &**p).collect();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_refs.as_slice(), |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;

        let mut providers = BTreeMap::new();
        for row in rows {
            let (provider, count) = row?;
            providers.insert(provider, count);
        }
        providers
    };

    Ok(SearchFacets {
        verified,
        trusted,
        contributed,
        providers,
    })
}
