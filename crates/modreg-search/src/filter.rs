//! Filter construction shared by the provider search and facet counts.

use modreg_types::NamespaceTrust;

/// A boxed bind parameter for dynamically built queries.
pub(crate) type SqlParam = Box<dyn rusqlite::types::ToSql>;

/// Static search configuration: the ordered trusted-namespace allow-list.
///
/// Passed in explicitly at call time rather than read from ambient state,
/// so tests can substitute their own allow-list.
#[derive(Debug, Clone, Default)]
pub struct SearchConfig {
    /// Namespaces classified as trusted; all others are contributed.
    pub trusted_namespaces: Vec<String>,
}

impl SearchConfig {
    /// Creates a configuration from a trusted-namespace allow-list.
    pub fn new(trusted_namespaces: Vec<String>) -> Self {
        Self { trusted_namespaces }
    }
}

/// Filter criteria for searching module providers.
///
/// Every field is optional; set fields combine with AND. `trust` is a
/// tri-state: `None` leaves the partition unfiltered, `Some` with both
/// classifications is equivalent to `None`, and `Some` with an empty
/// selection matches nothing.
#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
    /// Free-text query, split on whitespace into tokens. Each token must
    /// match at least one searchable field.
    pub query: Option<String>,
    /// Exact provider name.
    pub provider: Option<String>,
    /// Exact namespace name.
    pub namespace: Option<String>,
    /// Restrict to verified providers.
    pub verified_only: bool,
    /// Trust partition selection.
    pub trust: Option<Vec<NamespaceTrust>>,
    /// Number of grouped rows to skip.
    pub offset: i64,
    /// Maximum number of grouped rows to return (default: 10).
    pub limit: Option<i64>,
}

/// Appends one AND clause per whitespace-separated token of the free-text
/// query. Within a token the searchable fields combine with OR: namespace,
/// provider and version must match the token exactly, while module name,
/// description and owner match as case-insensitive substrings.
pub(crate) fn push_text_clauses(
    query: Option<&str>,
    clauses: &mut Vec<String>,
    params: &mut Vec<SqlParam>,
    idx: &mut u32,
) {
    let Some(query) = query else { return };

    for token in query.split_whitespace() {
        let i = *idx;
        clauses.push(format!(
            "(mp.namespace LIKE ?{} OR mp.module LIKE ?{} OR mp.provider LIKE ?{} \
             OR mv.version LIKE ?{} OR mv.description LIKE ?{} OR mv.owner LIKE ?{})",
            i,
            i + 1,
            i + 2,
            i + 3,
            i + 4,
            i + 5,
        ));

        let wildcarded = format!("%{token}%");
        params.push(Box::new(token.to_string()));
        params.push(Box::new(wildcarded.clone()));
        params.push(Box::new(token.to_string()));
        params.push(Box::new(token.to_string()));
        params.push(Box::new(wildcarded.clone()));
        params.push(Box::new(wildcarded));

        *idx += 6;
    }
}

/// Builds the trust-partition clause for the given selection.
///
/// Selecting both classifications yields a tautology (equivalent to no
/// partition filter); selecting neither yields a contradiction (matches
/// nothing). An empty allow-list degenerates the same way: nothing is
/// trusted, everything is contributed.
pub(crate) fn trust_clause(
    selected: &[NamespaceTrust],
    trusted_namespaces: &[String],
    params: &mut Vec<SqlParam>,
    idx: &mut u32,
) -> String {
    let mut or_parts = Vec::new();

    if selected.contains(&NamespaceTrust::Trusted) {
        or_parts.push(namespace_membership(trusted_namespaces, false, params, idx));
    }
    if selected.contains(&NamespaceTrust::Contributed) {
        or_parts.push(namespace_membership(trusted_namespaces, true, params, idx));
    }

    if or_parts.is_empty() {
        "0 = 1".to_string()
    } else {
        format!("({})", or_parts.join(" OR "))
    }
}

/// Builds a `namespace IN (...)` (or `NOT IN`) clause over the allow-list.
pub(crate) fn namespace_membership(
    trusted_namespaces: &[String],
    negated: bool,
    params: &mut Vec<SqlParam>,
    idx: &mut u32,
) -> String {
    if trusted_namespaces.is_empty() {
        // Nothing is trusted, so membership is vacuously false and its
        // complement vacuously true.
        return if negated { "1 = 1" } else { "0 = 1" }.to_string();
    }

    let placeholders: Vec<String> = trusted_namespaces
        .iter()
        .map(|namespace| {
            let placeholder = format!("?{idx}");
            params.push(Box::new(namespace.clone()));
            *idx += 1;
            placeholder
        })
        .collect();

    format!(
        "mp.namespace {} ({})",
        if negated { "NOT IN" } else { "IN" },
        placeholders.join(", ")
    )
}
