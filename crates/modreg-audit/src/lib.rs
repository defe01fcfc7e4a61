//! Append-only audit history for the module registry.
//!
//! Every administrative action (provider creation and deletion, version
//! ingestion and publishing, settings changes) is recorded as an immutable
//! event carrying the acting username, the affected object, and the old and
//! new values. Events are never updated or deleted by this crate.
//!
//! The acting username is an explicit parameter to [`append_event`]; callers
//! resolve it from their authentication layer at call time, which keeps the
//! dependency visible and substitutable in tests.
//!
//! # Usage
//!
//! ```rust,ignore
//! use modreg_audit::{append_event, AuditAction};
//!
//! append_event(
//!     &conn,
//!     "admin@example.com",
//!     AuditAction::ModuleProviderCreate,
//!     "ModuleProvider",
//!     "hashicorp/vpc-network/aws",
//!     None,
//!     None,
//! )?;
//! ```

mod action;
mod error;
mod store;

pub use action::{AuditAction, ParseAuditActionError};
pub use error::AuditError;
pub use store::{append_event, query_events, AuditEvent, AuditOrderBy, AuditPage, AuditQuery};

#[cfg(test)]
mod tests;
