//! The audit action vocabulary.

use serde::{Deserialize, Serialize};

/// Administrative actions recorded in the audit history.
///
/// Each variant has a canonical string label stored in the `action` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuditAction {
    /// A module provider was created.
    #[serde(rename = "MODULE_PROVIDER_CREATE")]
    ModuleProviderCreate,
    /// A module provider and everything it owned was deleted.
    #[serde(rename = "MODULE_PROVIDER_DELETE")]
    ModuleProviderDelete,
    /// The verified flag on a provider was changed.
    #[serde(rename = "MODULE_PROVIDER_UPDATE_VERIFIED")]
    ModuleProviderUpdateVerified,
    /// The git tag format on a provider was changed.
    #[serde(rename = "MODULE_PROVIDER_UPDATE_GIT_TAG_FORMAT")]
    ModuleProviderUpdateGitTagFormat,
    /// Repository URL templates on a provider were changed.
    #[serde(rename = "MODULE_PROVIDER_UPDATE_REPO_URLS")]
    ModuleProviderUpdateRepoUrls,
    /// A module version was ingested (created or replaced).
    #[serde(rename = "MODULE_VERSION_INDEX")]
    ModuleVersionIndex,
    /// A module version was published.
    #[serde(rename = "MODULE_VERSION_PUBLISH")]
    ModuleVersionPublish,
    /// A module version was deleted.
    #[serde(rename = "MODULE_VERSION_DELETE")]
    ModuleVersionDelete,
}

impl AuditAction {
    /// Returns the canonical string label for this action.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ModuleProviderCreate => "MODULE_PROVIDER_CREATE",
            Self::ModuleProviderDelete => "MODULE_PROVIDER_DELETE",
            Self::ModuleProviderUpdateVerified => "MODULE_PROVIDER_UPDATE_VERIFIED",
            Self::ModuleProviderUpdateGitTagFormat => "MODULE_PROVIDER_UPDATE_GIT_TAG_FORMAT",
            Self::ModuleProviderUpdateRepoUrls => "MODULE_PROVIDER_UPDATE_REPO_URLS",
            Self::ModuleVersionIndex => "MODULE_VERSION_INDEX",
            Self::ModuleVersionPublish => "MODULE_VERSION_PUBLISH",
            Self::ModuleVersionDelete => "MODULE_VERSION_DELETE",
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AuditAction {
    type Err = ParseAuditActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MODULE_PROVIDER_CREATE" => Ok(Self::ModuleProviderCreate),
            "MODULE_PROVIDER_DELETE" => Ok(Self::ModuleProviderDelete),
            "MODULE_PROVIDER_UPDATE_VERIFIED" => Ok(Self::ModuleProviderUpdateVerified),
            "MODULE_PROVIDER_UPDATE_GIT_TAG_FORMAT" => Ok(Self::ModuleProviderUpdateGitTagFormat),
            "MODULE_PROVIDER_UPDATE_REPO_URLS" => Ok(Self::ModuleProviderUpdateRepoUrls),
            "MODULE_VERSION_INDEX" => Ok(Self::ModuleVersionIndex),
            "MODULE_VERSION_PUBLISH" => Ok(Self::ModuleVersionPublish),
            "MODULE_VERSION_DELETE" => Ok(Self::ModuleVersionDelete),
            _ => Err(ParseAuditActionError(s.to_string())),
        }
    }
}

/// Error returned when parsing an unknown audit action string.
#[derive(Debug, Clone)]
pub struct ParseAuditActionError(pub String);

impl std::fmt::Display for ParseAuditActionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown audit action: {}", self.0)
    }
}

impl std::error::Error for ParseAuditActionError {}
