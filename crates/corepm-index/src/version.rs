//! Release versions with lenient parsing.
//!
//! Package indexes in the wild carry versions such as `1.6`, `1.8.013` or
//! `7.2.0-atmel3.6.1-arduino7`. They are normalised into a
//! `semver::Version` for ordering while the original spelling is kept for
//! display and for locating archives.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Serialize, Serializer};

/// A release version as written in the package index.
#[derive(Debug, Clone)]
pub struct Version {
    raw: String,
    parsed: semver::Version,
}

impl Version {
    /// Parse a version string, padding missing minor/patch components.
    pub fn parse(s: &str) -> Result<Self, semver::Error> {
        let raw = s.trim();
        let parsed = semver::Version::parse(&normalize(raw))?;
        Ok(Version {
            raw: raw.to_string(),
            parsed,
        })
    }

    /// The version exactly as written in the index.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The normalised semantic version used for comparisons.
    pub fn semver(&self) -> &semver::Version {
        &self.parsed
    }
}

/// Turn `1.6` into `1.6.0` and `1.08.2` into `1.8.2`, leaving any
/// pre-release or build suffix untouched.
fn normalize(raw: &str) -> String {
    let split_at = raw.find(['-', '+']).unwrap_or(raw.len());
    let (core, suffix) = raw.split_at(split_at);

    let mut parts: Vec<String> = core
        .split('.')
        .map(|part| {
            let trimmed = part.trim_start_matches('0');
            if trimmed.is_empty() && !part.is_empty() {
                "0".to_string()
            } else {
                trimmed.to_string()
            }
        })
        .collect();
    while parts.len() < 3 {
        parts.push("0".to_string());
    }

    format!("{}{suffix}", parts.join("."))
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.parsed == other.parsed
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.parsed.cmp(&other.parsed)
    }
}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.parsed.hash(state);
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl std::str::FromStr for Version {
    type Err = semver::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Version::parse(s)
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}
