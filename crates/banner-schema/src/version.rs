//! Schema versions for banner documents
//!
//! Provides [`SchemaVersion`], a simplified semantic version used to order
//! migration steps and to classify stored documents.

use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Defines a version string constant and its numeric components together
macro_rules! schema_version_const {
    ($(#[$meta:meta])* $name:ident, $parts:ident = $major:literal . $minor:literal . $patch:literal) => {
        $(#[$meta])*
        pub const $name: &str = concat!($major, ".", $minor, ".", $patch);
        const $parts: (u32, u32, u32) = ($major, $minor, $patch);
    };
}

schema_version_const!(
    /// Version every migrated document converges to
    CURRENT_BANNER_VERSION, CURRENT_PARTS = 2 . 1 . 0
);

schema_version_const!(
    /// Version assumed for documents stored without a `version` field
    LEGACY_BANNER_VERSION, LEGACY_PARTS = 1 . 0 . 0
);

/// A `major.minor.patch` schema version
///
/// Keeps the raw string so that `"2.1.0"` displays exactly as stored.
/// Ordering compares the numeric components only.
#[derive(Debug, Clone, Eq)]
pub struct SchemaVersion {
    major: u32,
    minor: u32,
    patch: u32,
    raw: String,
}

impl SchemaVersion {
    /// Build a version from numeric components
    #[inline]
    #[must_use]
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
            raw: format!("{major}.{minor}.{patch}"),
        }
    }

    /// Parse a `x.y.z` string
    ///
    /// # Errors
    /// Returns error if the string does not have exactly three numeric segments
    pub fn parse(input: &str) -> Result<Self, VersionError> {
        let parts: Vec<&str> = input.split('.').collect();
        if parts.len() != 3 {
            return Err(VersionError::InvalidFormat {
                input: input.to_string(),
                segments: parts.len(),
            });
        }

        let component = |name: &'static str, value: &str| {
            value
                .parse::<u32>()
                .map_err(|_| VersionError::InvalidComponent {
                    component: name,
                    value: value.to_string(),
                })
        };

        Ok(Self {
            major: component("major", parts[0])?,
            minor: component("minor", parts[1])?,
            patch: component("patch", parts[2])?,
            raw: input.to_string(),
        })
    }

    /// The version documents are migrated to
    #[must_use]
    pub fn current() -> Self {
        let (major, minor, patch) = CURRENT_PARTS;
        Self::new(major, minor, patch)
    }

    /// The version assumed for unversioned documents
    #[must_use]
    pub fn legacy() -> Self {
        let (major, minor, patch) = LEGACY_PARTS;
        Self::new(major, minor, patch)
    }

    /// Major component
    #[inline]
    #[must_use]
    pub const fn major(&self) -> u32 {
        self.major
    }

    /// Minor component
    #[inline]
    #[must_use]
    pub const fn minor(&self) -> u32 {
        self.minor
    }

    /// Patch component
    #[inline]
    #[must_use]
    pub const fn patch(&self) -> u32 {
        self.patch
    }

    /// Version string as written
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether this is [`CURRENT_BANNER_VERSION`]
    #[inline]
    #[must_use]
    pub fn is_current(&self) -> bool {
        *self == Self::current()
    }
}

impl PartialEq for SchemaVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Ord for SchemaVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
            .then(self.patch.cmp(&other.patch))
    }
}

impl PartialOrd for SchemaVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for SchemaVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for SchemaVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl serde::Serialize for SchemaVersion {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> serde::Deserialize<'de> for SchemaVersion {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Errors raised while parsing a schema version
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VersionError {
    /// Wrong number of dot-separated segments
    #[error("invalid version '{input}': expected x.y.z, found {segments} segment(s)")]
    InvalidFormat { input: String, segments: usize },

    /// A segment is not an unsigned integer
    #[error("invalid {component} component '{value}'")]
    InvalidComponent {
        component: &'static str,
        value: String,
    },
}
