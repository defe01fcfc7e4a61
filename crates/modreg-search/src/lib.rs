//! Search and aggregation over module providers.
//!
//! The search engine builds filtered, paginated, deduplicated listings of
//! module providers: multi-token free-text matching (tokens combine with
//! AND, fields within a token with OR), optional namespace/provider
//! equality, the verified flag, and trust partitioning against a configured
//! namespace allow-list. Facet counts reuse the same free-text filter base.
//!
//! All queries are built dynamically from parameterised clauses; nothing
//! user-supplied is interpolated into SQL text.

mod analytics;
mod error;
mod facets;
mod filter;
mod search;

pub use analytics::{most_downloaded_this_week, most_recently_published, record_download};
pub use error::SearchError;
pub use facets::{get_search_facets, SearchFacets};
pub use filter::{SearchConfig, SearchFilter};
pub use search::search_module_providers;

/// Shared FROM clause: every search and facet query ranges over version
/// rows joined to their owning provider.
pub(crate) const BASE_FROM: &str =
    "module_version mv JOIN module_provider mp ON mp.id = mv.module_provider_id";
