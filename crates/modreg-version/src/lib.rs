//! Semantic version parsing and constraint-template expansion.
//!
//! A module version string must match `major.minor.patch` with an optional
//! `-prerelease` suffix of alphanumerics and dots. Versions carrying a
//! pre-release suffix are beta versions: they are excluded from
//! constraint-template expansion and rendered verbatim instead.
//!
//! Leading zeros in numeric components are accepted ("01.01.01" parses to
//! 1.1.1) — a known permissiveness kept for compatibility with already
//! ingested version strings.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static VERSION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+)\.(\d+)\.(\d+)(-[A-Za-z0-9.]+)?$").expect("version pattern must compile")
});

/// Errors produced by version parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    /// The string does not match the semantic-version grammar.
    #[error("invalid version string: '{0}'")]
    InvalidVersion(String),
}

/// A parsed semantic version.
///
/// Retains the original string so that rendering a parsed version
/// round-trips exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticVersion {
    raw: String,
    major: u64,
    minor: u64,
    patch: u64,
    prerelease: Option<String>,
}

impl SemanticVersion {
    /// Parses a version string.
    ///
    /// # Errors
    ///
    /// Returns [`VersionError::InvalidVersion`] carrying the offending string
    /// if it does not match the grammar, including components too large to
    /// represent numerically.
    pub fn parse(version: &str) -> Result<Self, VersionError> {
        let caps = VERSION_PATTERN
            .captures(version)
            .ok_or_else(|| VersionError::InvalidVersion(version.to_string()))?;

        let component = |index: usize| -> Result<u64, VersionError> {
            caps.get(index)
                .expect("numeric components are non-optional in the pattern")
                .as_str()
                .parse::<u64>()
                .map_err(|_| VersionError::InvalidVersion(version.to_string()))
        };

        Ok(Self {
            raw: version.to_string(),
            major: component(1)?,
            minor: component(2)?,
            patch: component(3)?,
            // Strip the leading dash; the pattern guarantees at least one
            // character follows it.
            prerelease: caps.get(4).map(|m| m.as_str()[1..].to_string()),
        })
    }

    /// The major component.
    pub fn major(&self) -> u64 {
        self.major
    }

    /// The minor component.
    pub fn minor(&self) -> u64 {
        self.minor
    }

    /// The patch component.
    pub fn patch(&self) -> u64 {
        self.patch
    }

    /// The pre-release suffix, without the leading dash.
    pub fn prerelease(&self) -> Option<&str> {
        self.prerelease.as_deref()
    }

    /// Whether this is a beta version (a pre-release suffix is present).
    pub fn is_beta(&self) -> bool {
        self.prerelease.is_some()
    }

    /// The original version string.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Expands a version-constraint template against this version.
    ///
    /// Recognized placeholders: `{major}`, `{minor}`, `{patch}` plus their
    /// `_plus_one` and `_minus_one` variants. The minus-one variants floor
    /// at zero and the plus-one variants saturate at the numeric ceiling.
    /// Beta versions skip expansion entirely and return the raw version
    /// string verbatim.
    pub fn expand_constraint_template(&self, template: &str) -> String {
        if self.is_beta() {
            return self.raw.clone();
        }

        template
            .replace("{major}", &self.major.to_string())
            .replace("{minor}", &self.minor.to_string())
            .replace("{patch}", &self.patch.to_string())
            .replace("{major_plus_one}", &self.major.saturating_add(1).to_string())
            .replace("{minor_plus_one}", &self.minor.saturating_add(1).to_string())
            .replace("{patch_plus_one}", &self.patch.saturating_add(1).to_string())
            .replace("{major_minus_one}", &self.major.saturating_sub(1).to_string())
            .replace("{minor_minus_one}", &self.minor.saturating_sub(1).to_string())
            .replace("{patch_minus_one}", &self.patch.saturating_sub(1).to_string())
    }
}

impl std::fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

impl std::str::FromStr for SemanticVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_versions_are_rejected() {
        for version in [
            "astring",
            "",
            "1",
            "1.1",
            ".23.1",
            "1.1.1.1",
            "1.1.1.",
            "1.2.3-invalid-suffix",
            "1.0.9-",
            "1.2.3-suffix!",
            "-1.2.3",
        ] {
            let err = SemanticVersion::parse(version).expect_err(version);
            assert_eq!(err, VersionError::InvalidVersion(version.to_string()));
        }
    }

    #[test]
    fn valid_versions_and_beta_flags() {
        for (version, beta) in [
            ("1.1.1", false),
            ("13.14.16", false),
            ("1.10.10", false),
            ("01.01.01", false),
            ("1.2.3-alpha", true),
            ("1.2.3-beta", true),
            ("1.2.3-anothersuffix1", true),
            ("1.2.2-123", true),
            ("1.2.3-dotted.suffix.1", true),
        ] {
            let parsed = SemanticVersion::parse(version).expect(version);
            assert_eq!(parsed.is_beta(), beta, "beta flag for {version}");
        }
    }

    #[test]
    fn parse_extracts_components() {
        let parsed = SemanticVersion::parse("13.14.16").expect("should parse");
        assert_eq!(parsed.major(), 13);
        assert_eq!(parsed.minor(), 14);
        assert_eq!(parsed.patch(), 16);
        assert_eq!(parsed.prerelease(), None);

        let beta = SemanticVersion::parse("1.2.3-beta.1").expect("should parse");
        assert_eq!(beta.prerelease(), Some("beta.1"));
    }

    #[test]
    fn leading_zeros_parse_numerically() {
        let parsed = SemanticVersion::parse("01.01.01").expect("should parse");
        assert_eq!(parsed.major(), 1);
        assert_eq!(parsed.minor(), 1);
        assert_eq!(parsed.patch(), 1);
        // The raw string is preserved for rendering.
        assert_eq!(parsed.as_str(), "01.01.01");
    }

    #[test]
    fn render_round_trips() {
        for version in ["1.5.0", "0.0.0", "5.6.23-beta", "01.01.01"] {
            let parsed = SemanticVersion::parse(version).expect(version);
            assert_eq!(parsed.to_string(), version);
        }
    }

    #[test]
    fn template_expansion() {
        for (template, version, expected) in [
            ("= {major}.{minor}.{patch}", "1.5.0", "= 1.5.0"),
            (
                "<= {major_plus_one}.{minor_plus_one}.{patch_plus_one}",
                "1.5.0",
                "<= 2.6.1",
            ),
            (
                ">= {major_minus_one}.{minor_minus_one}.{patch_minus_one}",
                "4.3.2",
                ">= 3.2.1",
            ),
            (
                ">= {major_minus_one}.{minor_minus_one}.{patch_minus_one}",
                "0.0.0",
                ">= 0.0.0",
            ),
            ("< {major_plus_one}.0.0", "10584.321.564", "< 10585.0.0"),
        ] {
            let parsed = SemanticVersion::parse(version).expect(version);
            assert_eq!(parsed.expand_constraint_template(template), expected);
        }
    }

    #[test]
    fn beta_version_ignores_template() {
        let parsed = SemanticVersion::parse("5.6.23-beta").expect("should parse");
        assert_eq!(
            parsed.expand_constraint_template(
                ">= {major_minus_one}.{minor_minus_one}.{patch_minus_one}"
            ),
            "5.6.23-beta"
        );
    }

    #[test]
    fn oversized_component_is_invalid() {
        // 2^64 does not fit in u64.
        let err = SemanticVersion::parse("18446744073709551616.0.0").expect_err("too large");
        assert!(matches!(err, VersionError::InvalidVersion(_)));
    }

    #[test]
    fn plus_one_saturates_at_numeric_ceiling() {
        // u64::MAX is grammar-valid and parses; incrementing it must not
        // overflow, mirroring the zero floor on the minus-one side.
        let parsed = SemanticVersion::parse("18446744073709551615.0.0").expect("should parse");
        assert_eq!(
            parsed.expand_constraint_template("<= {major_plus_one}.0.0"),
            "<= 18446744073709551615.0.0"
        );
        assert_eq!(
            parsed.expand_constraint_template(
                "<= {major_plus_one}.{minor_plus_one}.{patch_plus_one}"
            ),
            "<= 18446744073709551615.1.1"
        );
    }
}
