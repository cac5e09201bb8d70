//! Semantic version parsing and comparison.

use crate::error::CoreError;
use std::fmt;

/// An immutable, comparable semantic version in the wire form
/// `vMAJOR.MINOR.PATCH[-prerelease]`.
///
/// Ordering follows semantic-versioning precedence: numeric
/// major/minor/patch first, then the prerelease lexical/numeric rules.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChamberVersion(semver::Version);

impl ChamberVersion {
    /// Parse a `v`-prefixed semantic version string.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        let bare = s
            .strip_prefix('v')
            .ok_or_else(|| CoreError::InvalidVersion(s.to_string()))?;
        let version = semver::Version::parse(bare)
            .map_err(|_| CoreError::InvalidVersion(s.to_string()))?;
        Ok(ChamberVersion(version))
    }

    /// Parse an optional endpoint: an empty string means "no bound".
    pub fn parse_endpoint(s: &str) -> Result<Option<Self>, CoreError> {
        if s.is_empty() {
            return Ok(None);
        }
        Self::parse(s).map(Some)
    }
}

impl fmt::Display for ChamberVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}
