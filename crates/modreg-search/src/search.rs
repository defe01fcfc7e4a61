//! Filtered, paginated, deduplicated listing of module providers.

use rusqlite::Connection;

use crate::error::SearchError;
use crate::filter::{push_text_clauses, trust_clause, SearchConfig, SearchFilter, SqlParam};
use crate::BASE_FROM;
use modreg_types::ModuleProviderRef;

/// Default page size when the filter does not specify a limit.
const DEFAULT_LIMIT: i64 = 10;

/// Searches module providers matching the given filter.
///
/// The result set is grouped by (namespace, module, provider) — multiple
/// versions collapse into one row per provider — ordered ascending by
/// namespace, then module, then provider, then sliced by offset/limit.
///
/// # Errors
///
/// Returns `SearchError::Database` on SQL failure.
pub fn search_module_providers(
    conn: &Connection,
    config: &SearchConfig,
    filter: &SearchFilter,
) -> Result<Vec<ModuleProviderRef>, SearchError> {
    let mut clauses: Vec<String> = Vec::new();
    let mut params: Vec<SqlParam> = Vec::new();
    let mut idx = 1u32;

    push_text_clauses(filter.query.as_deref(), &mut clauses, &mut params, &mut idx);

    if let Some(ref provider) = filter.provider {
        clauses.push(format!("mp.provider = ?{idx}"));
        params.push(Box::new(provider.clone()));
        idx += 1;
    }

    if let Some(ref namespace) = filter.namespace {
        clauses.push(format!("mp.namespace = ?{idx}"));
        params.push(Box::new(namespace.clone()));
        idx += 1;
    }

    if filter.verified_only {
        clauses.push("mp.verified = 1".to_string());
    }

    if let Some(ref selected) = filter.trust {
        clauses.push(trust_clause(
            selected,
            &config.trusted_namespaces,
            &mut params,
            &mut idx,
        ));
    }

    let where_clause = if clauses.is_empty() {
        String::new()
    } else {
        format!("WHERE {} ", clauses.join(" AND "))
    };

    let limit_idx = idx;
    let offset_idx = idx + 1;
    let sql = format!(
        "SELECT mp.namespace, mp.module, mp.provider
         FROM {BASE_FROM}
         {where_clause}GROUP BY mp.namespace, mp.module, mp.provider
         ORDER BY mp.namespace ASC, mp.module ASC, mp.provider ASC
         LIMIT ?{limit_idx} OFFSET ?{offset_idx}"
    );

    params.push(Box::new(filter.limit.unwrap_or(DEFAULT_LIMIT)));
    params.push(Box::new(filter.offset));

    let params_refs: Vec<&dyn rusqlite::types::ToSql> =
        params.iter().map(|p| &**p).collect();

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_refs.as_slice(), |row| {
        Ok(ModuleProviderRef {
            namespace: row.get(0)?,
            module: row.get(1)?,
            provider: row.get(2)?,
        })
    })?;

    let mut providers = Vec::new();
    for row in rows {
        providers.push(row?);
    }

    Ok(providers)
}
