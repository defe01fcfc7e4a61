//! Database layer for the module registry.
//!
//! Provides SQLite connection pooling (via `r2d2`), WAL-mode initialization,
//! and embedded SQL migrations. Every registry table — module providers,
//! module versions, submodules, example files, download analytics, and the
//! audit history — is created through versioned migrations managed here.
//!
//! # Design decisions
//!
//! - **SQLite with WAL mode**: the registry is read-heavy (search, facet
//!   counts, aggregates) with occasional writes (ingestion, audit appends).
//!   WAL allows concurrent readers with a single writer, which matches that
//!   access pattern.
//! - **Foreign keys ON**: module versions, submodules and example files form
//!   an ownership chain; `ON DELETE CASCADE` constraints keep administrative
//!   provider deletes consistent at the store level.
//! - **Embedded migrations**: SQL files are compiled into the binary via
//!   `include_str!`, ensuring the schema ships with the code that depends
//!   on it.

mod migrations;
mod pool;

pub use migrations::{run_migrations, MigrationError};
pub use pool::{create_pool, DbPool, DbRuntimeSettings, PoolError};
