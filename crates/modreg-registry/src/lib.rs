//! Versioned-entity lifecycle for the module registry.
//!
//! A module provider is the unique (namespace, module, provider) triple that
//! owns versions. Version ingestion replaces rather than merges: creating a
//! version for a pair that already has a row deletes the prior row and
//! everything it transitively owns (submodules, example files) before
//! inserting the new one, inside a single transaction.
//!
//! All validation (version grammar) happens before any write is issued;
//! a malformed version string never reaches the store.

mod error;
mod provider;
mod version;

pub use error::RegistryError;
pub use provider::{
    create_provider, delete_provider, get_provider, set_git_tag_format, set_repo_url_templates,
    set_verified, ModuleProvider,
};
pub use version::{
    find_version, publish_version, replace_and_create, ModuleVersionRow, NewModuleVersion,
};
