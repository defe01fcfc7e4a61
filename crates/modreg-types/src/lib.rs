//! Shared reference types for the module registry.
//!
//! A module provider is the unique (namespace, module, provider) triple that
//! owns versions. These lightweight references carry names only; callers
//! resolve full rows through the registry crates.

use serde::{Deserialize, Serialize};

/// A reference to a module provider by its identifying names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleProviderRef {
    /// The namespace that groups the module.
    pub namespace: String,
    /// The module name within the namespace.
    pub module: String,
    /// The provider name (e.g., "aws", "null").
    pub provider: String,
}

/// A reference to a specific version of a module provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleVersionRef {
    /// The namespace that groups the module.
    pub namespace: String,
    /// The module name within the namespace.
    pub module: String,
    /// The provider name.
    pub provider: String,
    /// The semantic version string.
    pub version: String,
}

/// Classification of a namespace against the trusted allow-list.
///
/// Every namespace is either trusted (present in the configured allow-list)
/// or contributed (absent from it), never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NamespaceTrust {
    /// Namespace appears in the trusted allow-list.
    #[serde(rename = "TRUSTED")]
    Trusted,
    /// Namespace does not appear in the trusted allow-list.
    #[serde(rename = "CONTRIBUTED")]
    Contributed,
}

impl NamespaceTrust {
    /// Returns the canonical string label for this classification.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trusted => "TRUSTED",
            Self::Contributed => "CONTRIBUTED",
        }
    }
}

impl std::fmt::Display for NamespaceTrust {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NamespaceTrust {
    type Err = ParseNamespaceTrustError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TRUSTED" => Ok(Self::Trusted),
            "CONTRIBUTED" => Ok(Self::Contributed),
            _ => Err(ParseNamespaceTrustError(s.to_string())),
        }
    }
}

/// Error returned when parsing an unknown trust classification string.
#[derive(Debug, Clone)]
pub struct ParseNamespaceTrustError(pub String);

impl std::fmt::Display for ParseNamespaceTrustError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown namespace trust classification: {}", self.0)
    }
}

impl std::error::Error for ParseNamespaceTrustError {}
