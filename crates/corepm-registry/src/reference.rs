//! `PACKAGER:ARCH[=VERSION]` platform references.

use std::fmt;
use std::str::FromStr;

use corepm_index::Version;

use crate::error::ReferenceError;

/// A request for a platform, optionally pinned to one version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformReference {
    /// Package (packager) name.
    pub package: String,
    /// Platform architecture.
    pub architecture: String,
    /// Exact version, or `None` for the latest release.
    pub version: Option<Version>,
}

impl PlatformReference {
    /// Parse a single reference token.
    pub fn parse(token: &str) -> Result<Self, ReferenceError> {
        let invalid = || ReferenceError::Invalid {
            token: token.to_string(),
        };

        let (id, version) = match token.split_once('=') {
            Some((id, version)) => (id, Some(version)),
            None => (token, None),
        };
        let (package, architecture) = id.split_once(':').ok_or_else(invalid)?;
        if package.is_empty() || architecture.is_empty() || architecture.contains(':') {
            return Err(invalid());
        }

        let version = match version {
            None => None,
            Some("") => return Err(invalid()),
            Some(v) => Some(Version::parse(v).map_err(|source| ReferenceError::InvalidVersion {
                token: token.to_string(),
                version: v.to_string(),
                source,
            })?),
        };

        Ok(PlatformReference {
            package: package.to_string(),
            architecture: architecture.to_string(),
            version,
        })
    }
}

impl FromStr for PlatformReference {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PlatformReference::parse(s)
    }
}

impl fmt::Display for PlatformReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.package, self.architecture)?;
        if let Some(version) = &self.version {
            write!(f, "={version}")?;
        }
        Ok(())
    }
}

/// Parse every token, stopping at the first invalid one.
pub fn parse_references<S: AsRef<str>>(
    tokens: &[S],
) -> Result<Vec<PlatformReference>, ReferenceError> {
    tokens
        .iter()
        .map(|t| PlatformReference::parse(t.as_ref()))
        .collect()
}
