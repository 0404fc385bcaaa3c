//! The banner document
//!
//! [`BannerConfig`] wraps the JSON object stored for one banner. It keeps
//! unknown keys intact and offers typed access to the well-known sections.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::fingerprint::Fingerprint;
use crate::model::keys;
use crate::path::FieldPath;
use crate::version::SchemaVersion;

/// A banner configuration document
///
/// Serializes transparently as the underlying JSON object.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BannerConfig(Map<String, JsonValue>);

impl BannerConfig {
    /// Wrap an existing JSON object
    #[inline]
    #[must_use]
    pub fn from_map(map: Map<String, JsonValue>) -> Self {
        Self(map)
    }

    /// Wrap a JSON value, rejecting anything but an object
    ///
    /// # Errors
    /// Returns [`DocumentError::NotAnObject`] for arrays, scalars and `null`
    pub fn from_value(value: JsonValue) -> Result<Self, DocumentError> {
        match value {
            JsonValue::Object(map) => Ok(Self(map)),
            other => Err(DocumentError::NotAnObject(json_kind(&other))),
        }
    }

    /// Parse from a JSON string
    ///
    /// # Errors
    /// Returns error if the text is not JSON or not an object
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let value: JsonValue = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Underlying object
    #[inline]
    #[must_use]
    pub fn as_map(&self) -> &Map<String, JsonValue> {
        &self.0
    }

    /// Mutable access to the underlying object
    #[inline]
    pub fn as_map_mut(&mut self) -> &mut Map<String, JsonValue> {
        &mut self.0
    }

    /// Unwrap into the underlying object
    #[inline]
    #[must_use]
    pub fn into_map(self) -> Map<String, JsonValue> {
        self.0
    }

    /// Unwrap into a JSON value
    #[inline]
    #[must_use]
    pub fn into_value(self) -> JsonValue {
        JsonValue::Object(self.0)
    }

    /// Clone into a JSON value
    #[inline]
    #[must_use]
    pub fn to_value(&self) -> JsonValue {
        JsonValue::Object(self.0.clone())
    }

    /// Raw `version` string, if present and a string
    #[inline]
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.0.get(keys::VERSION).and_then(JsonValue::as_str)
    }

    /// Parsed `version`, if present and well formed
    #[must_use]
    pub fn schema_version(&self) -> Option<SchemaVersion> {
        self.version().and_then(|v| v.parse().ok())
    }

    /// `lastUpdated` timestamp as stored
    #[inline]
    #[must_use]
    pub fn last_updated(&self) -> Option<&str> {
        self.0.get(keys::LAST_UPDATED).and_then(JsonValue::as_str)
    }

    /// Whether a top-level key is present and not `null`
    #[inline]
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.0.get(key).is_some_and(|v| !v.is_null())
    }

    /// Get a value by field path
    ///
    /// # Examples
    /// ```
    /// # use banner_schema::{BannerConfig, FieldPath};
    /// # use serde_json::json;
    /// let doc = BannerConfig::from_value(json!({"text": {"title": "Hi"}})).unwrap();
    /// let path: FieldPath = "text.title".parse().unwrap();
    /// assert_eq!(doc.get(&path), Some(&json!("Hi")));
    /// ```
    #[inline]
    #[must_use]
    pub fn get(&self, path: &FieldPath) -> Option<&JsonValue> {
        let (first, rest) = path.segments().split_first()?;
        rest.iter()
            .try_fold(self.0.get(first)?, |value, segment| value.get(segment))
    }

    /// Deserialize one top-level section into its typed view
    ///
    /// # Errors
    /// Returns error if the section is missing or does not match the view
    pub fn section<T: DeserializeOwned>(&self, key: &str) -> Result<T, DocumentError> {
        let value = self
            .0
            .get(key)
            .ok_or_else(|| DocumentError::MissingSection(key.to_string()))?;
        serde_json::from_value(value.clone()).map_err(|source| DocumentError::Section {
            key: key.to_string(),
            source,
        })
    }

    /// Fingerprint of the structural content (everything but `lastUpdated`)
    #[must_use]
    pub fn fingerprint(&self) -> Fingerprint {
        let mut content = self.0.clone();
        content.remove(keys::LAST_UPDATED);
        Fingerprint::of_json(&JsonValue::Object(content))
    }

    /// Whether two documents differ only in `lastUpdated`
    #[inline]
    #[must_use]
    pub fn structurally_eq(&self, other: &Self) -> bool {
        self.fingerprint() == other.fingerprint()
    }

    /// Apply a JSON merge patch (RFC 7396)
    ///
    /// Objects merge recursively, `null` removes a key, anything else
    /// (arrays included) replaces the stored value.
    pub fn apply_patch(&mut self, patch: &Map<String, JsonValue>) {
        merge_patch(&mut self.0, patch);
    }

    /// Compact JSON string
    ///
    /// # Errors
    /// Returns error if serialization fails
    #[inline]
    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string(&self.0)?)
    }

    /// Pretty-printed JSON string
    ///
    /// # Errors
    /// Returns error if serialization fails
    #[inline]
    pub fn to_json_pretty(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(&self.0)?)
    }
}

impl From<Map<String, JsonValue>> for BannerConfig {
    fn from(map: Map<String, JsonValue>) -> Self {
        Self(map)
    }
}

impl From<BannerConfig> for JsonValue {
    fn from(doc: BannerConfig) -> Self {
        doc.into_value()
    }
}

impl TryFrom<JsonValue> for BannerConfig {
    type Error = DocumentError;

    fn try_from(value: JsonValue) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

fn merge_patch(target: &mut Map<String, JsonValue>, patch: &Map<String, JsonValue>) {
    for (key, patch_value) in patch {
        match patch_value {
            JsonValue::Null => {
                target.remove(key);
            }
            JsonValue::Object(patch_map) => {
                if let Some(JsonValue::Object(existing)) = target.get_mut(key) {
                    merge_patch(existing, patch_map);
                } else {
                    let mut fresh = Map::new();
                    merge_patch(&mut fresh, patch_map);
                    target.insert(key.clone(), JsonValue::Object(fresh));
                }
            }
            other => {
                target.insert(key.clone(), other.clone());
            }
        }
    }
}

/// Short name of a JSON value's type, for diagnostics
#[must_use]
pub fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

/// Document error types
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("banner document must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("section not found: {0}")]
    MissingSection(String),

    #[error("section '{key}' does not match its schema: {source}")]
    Section {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}
