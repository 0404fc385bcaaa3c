//! Final normalization pass
//!
//! Runs after the chain on every document regardless of its version, so a
//! current document missing a section still leaves the pipeline complete.

use banner_schema::defaults;
use banner_schema::model::keys;
use banner_schema::FieldPath;
use serde_json::{Map, Value as JsonValue};

use crate::fill::{ensure_shaped, ensure_value, fill_missing, FillLog};

/// Fills every absent section and field from the current defaults
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigNormalizer;

impl ConfigNormalizer {
    /// Create normalizer
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Normalize `doc` in place
    ///
    /// `compliance` is filled as a whole block only; every other section is
    /// deep-filled field by field.
    pub fn normalize(&self, doc: &mut Map<String, JsonValue>, log: &mut FillLog) {
        let root = FieldPath::root();

        ensure_shaped(
            doc,
            keys::COMPLIANCE,
            &root,
            log,
            defaults::default_compliance,
            JsonValue::is_object,
        );
        ensure_value(doc, keys::LANGUAGE, &root, log, defaults::default_language);

        let mut reference = defaults::default_banner_config();
        for key in [keys::VERSION, keys::COMPLIANCE, keys::LANGUAGE] {
            reference.remove(key);
        }
        fill_missing(doc, &reference, &root, log);
    }
}
