//! Presence-checked defaulting
//!
//! Every default in the pipeline goes through these helpers. A key counts as
//! absent when it is missing or `null`; any other value, including `false`,
//! `0` and `""`, is kept as the customer set it.
//!
//! The only value ever replaced is a record or bucket with the wrong JSON
//! type (for example `"branding": "blue"`), which is logged as a repair.

use banner_schema::{json_kind, FieldPath};
use serde_json::{Map, Value as JsonValue};

/// Fields a migration pass added or repaired
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FillLog {
    filled: Vec<FieldPath>,
    repaired: Vec<FieldPath>,
}

impl FillLog {
    /// Create empty log
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a default written into an absent field
    #[inline]
    pub fn record_fill(&mut self, path: FieldPath) {
        self.filled.push(path);
    }

    /// Record a malformed value replaced by its default
    #[inline]
    pub fn record_repair(&mut self, path: FieldPath) {
        self.repaired.push(path);
    }

    /// Paths that received defaults, in fill order
    #[inline]
    #[must_use]
    pub fn filled(&self) -> &[FieldPath] {
        &self.filled
    }

    /// Paths whose malformed value was replaced
    #[inline]
    #[must_use]
    pub fn repaired(&self) -> &[FieldPath] {
        &self.repaired
    }

    /// Total number of changes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.filled.len() + self.repaired.len()
    }

    /// Whether nothing changed
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filled.is_empty() && self.repaired.is_empty()
    }

    /// Split into (filled, repaired)
    #[inline]
    #[must_use]
    pub fn into_parts(self) -> (Vec<FieldPath>, Vec<FieldPath>) {
        (self.filled, self.repaired)
    }
}

/// What a presence check did to a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Value was present and left untouched
    Kept,
    /// Field was absent and received its default
    Filled,
    /// Value had the wrong shape and was replaced
    Repaired,
}

/// Missing or `null`
#[inline]
#[must_use]
pub fn is_absent(map: &Map<String, JsonValue>, key: &str) -> bool {
    map.get(key).map_or(true, JsonValue::is_null)
}

/// Write `default()` into `key` if it is absent
pub fn ensure_value<F>(
    map: &mut Map<String, JsonValue>,
    key: &str,
    parent: &FieldPath,
    log: &mut FillLog,
    default: F,
) -> Presence
where
    F: FnOnce() -> JsonValue,
{
    if !is_absent(map, key) {
        return Presence::Kept;
    }
    map.insert(key.to_string(), default());
    log.record_fill(parent.child(key));
    Presence::Filled
}

/// Like [`ensure_value`], but also replaces a present value failing `is_valid`
pub fn ensure_shaped<F>(
    map: &mut Map<String, JsonValue>,
    key: &str,
    parent: &FieldPath,
    log: &mut FillLog,
    default: F,
    is_valid: fn(&JsonValue) -> bool,
) -> Presence
where
    F: FnOnce() -> JsonValue,
{
    match map.get(key) {
        None | Some(JsonValue::Null) => {
            map.insert(key.to_string(), default());
            log.record_fill(parent.child(key));
            Presence::Filled
        }
        Some(value) if is_valid(value) => Presence::Kept,
        Some(value) => {
            let path = parent.child(key);
            tracing::warn!("Replacing malformed banner field {} ({})", path, json_kind(value));
            map.insert(key.to_string(), default());
            log.record_repair(path);
            Presence::Repaired
        }
    }
}

/// Make sure `key` holds an object, then run `f` inside it
///
/// An absent key receives `default()`; a non-object is repaired.
pub fn with_object<D, F>(
    map: &mut Map<String, JsonValue>,
    key: &str,
    parent: &FieldPath,
    log: &mut FillLog,
    default: D,
    f: F,
) where
    D: FnOnce() -> JsonValue,
    F: FnOnce(&mut Map<String, JsonValue>, &FieldPath, &mut FillLog),
{
    ensure_shaped(map, key, parent, log, default, JsonValue::is_object);
    if let Some(JsonValue::Object(inner)) = map.get_mut(key) {
        f(inner, &parent.child(key), log);
    }
}

/// An empty JSON object, for records whose fields are filled one by one
#[inline]
#[must_use]
pub fn empty_object() -> JsonValue {
    JsonValue::Object(Map::new())
}

/// Deep-fill `target` from `defaults`
///
/// Absent keys receive a copy of the default. Objects present on both sides
/// are filled recursively. A present value is replaced only when the default
/// is a container (object or array) and the stored value is a different kind.
/// Arrays are never merged element-wise.
pub fn fill_missing(
    target: &mut Map<String, JsonValue>,
    defaults: &Map<String, JsonValue>,
    parent: &FieldPath,
    log: &mut FillLog,
) {
    for (key, default) in defaults {
        match (target.get_mut(key), default) {
            (None | Some(JsonValue::Null), _) => {
                target.insert(key.clone(), default.clone());
                log.record_fill(parent.child(key.as_str()));
            }
            (Some(JsonValue::Object(inner)), JsonValue::Object(inner_defaults)) => {
                fill_missing(inner, inner_defaults, &parent.child(key.as_str()), log);
            }
            (Some(JsonValue::Array(_)), JsonValue::Array(_)) => {}
            (Some(value), JsonValue::Object(_) | JsonValue::Array(_)) => {
                let path = parent.child(key.as_str());
                tracing::warn!("Replacing malformed banner field {} ({})", path, json_kind(value));
                *value = default.clone();
                log.record_repair(path);
            }
            (Some(_), _) => {}
        }
    }
}
