//! Migration step trait
//!
//! Provides the [`MigrationStep`] trait implemented by every
//! version-to-version upgrade.

use banner_schema::SchemaVersion;
use serde_json::{Map, Value as JsonValue};

use crate::fill::FillLog;

/// One upgrade from a schema version to the next
///
/// # Contract
/// `apply()` is additive-only: it fills absent fields and never overwrites
/// a present value (shape repair aside, see [`crate::fill`]). It decides
/// what to do from field presence alone, never from the `version` field,
/// so running it on a partially upgraded document is safe.
pub trait MigrationStep: Send + Sync + std::fmt::Debug {
    /// Step name (for logs and reports)
    fn name(&self) -> &'static str;

    /// Version this step upgrades from
    fn from_version(&self) -> SchemaVersion;

    /// Version this step produces
    fn to_version(&self) -> SchemaVersion;

    /// Fill the fields this version introduced
    fn apply(&self, doc: &mut Map<String, JsonValue>, log: &mut FillLog);

    /// Human-readable changelog for this upgrade
    fn notes(&self) -> &'static [&'static str];
}
