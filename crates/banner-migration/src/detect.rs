//! Version detection
//!
//! Decides whether a stored document is current and, if not, which schema
//! version the migration chain should start from.

use std::fmt::{self, Display, Formatter};

use banner_schema::model::keys;
use banner_schema::{SchemaVersion, CURRENT_BANNER_VERSION};
use serde_json::Value as JsonValue;

/// Whether `config` must go through the migration chain
///
/// `false` only for an object whose `version` is exactly
/// [`CURRENT_BANNER_VERSION`]. `null` stands in for an undefined document.
#[must_use]
pub fn needs_migration(config: &JsonValue) -> bool {
    stored_version(config) != Some(CURRENT_BANNER_VERSION)
}

/// The raw `version` string of an object document
#[inline]
#[must_use]
pub fn stored_version(config: &JsonValue) -> Option<&str> {
    config
        .as_object()
        .and_then(|map| map.get(keys::VERSION))
        .and_then(JsonValue::as_str)
}

/// What the detector found in a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetectedVersion {
    /// Not a JSON object at all
    Invalid,
    /// Object without a `version` (or with `null`)
    Unversioned,
    /// Well-formed version string
    Version(SchemaVersion),
    /// `version` present but unusable, kept for diagnostics
    Malformed(String),
}

impl DetectedVersion {
    /// Version the chain starts from
    ///
    /// Unversioned and malformed documents are treated as the oldest schema
    /// so that every additive step runs. `None` for invalid input.
    #[must_use]
    pub fn effective(&self) -> Option<SchemaVersion> {
        match self {
            Self::Invalid => None,
            Self::Unversioned | Self::Malformed(_) => Some(SchemaVersion::legacy()),
            Self::Version(v) => Some(v.clone()),
        }
    }

    /// Whether the input was not an object
    #[inline]
    #[must_use]
    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid)
    }
}

impl Display for DetectedVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid => f.write_str("invalid document"),
            Self::Unversioned => f.write_str("unversioned"),
            Self::Version(v) => write!(f, "{v}"),
            Self::Malformed(raw) => write!(f, "malformed version {raw}"),
        }
    }
}

/// Classify the version of a stored document
#[must_use]
pub fn detect_version(config: &JsonValue) -> DetectedVersion {
    let Some(map) = config.as_object() else {
        return DetectedVersion::Invalid;
    };

    match map.get(keys::VERSION) {
        None | Some(JsonValue::Null) => DetectedVersion::Unversioned,
        Some(JsonValue::String(raw)) => match raw.parse::<SchemaVersion>() {
            Ok(version) => DetectedVersion::Version(version),
            Err(_) => DetectedVersion::Malformed(raw.clone()),
        },
        Some(other) => DetectedVersion::Malformed(other.to_string()),
    }
}
