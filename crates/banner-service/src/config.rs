//! Service configuration

use serde::{Deserialize, Serialize};

/// When a migrated document is written back to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersistPolicy {
    /// Write back whenever a read had to migrate or fill the stored document
    #[default]
    OnMigration,
    /// Serve the migrated form transiently; only explicit writes persist
    Never,
}

/// Banner service configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Write-back behaviour on reads
    pub persist_policy: PersistPolicy,
    /// Largest accepted serialized document or patch
    pub max_document_bytes: usize,
}

impl ServiceConfig {
    /// Default limit for serialized documents (256 KiB)
    pub const DEFAULT_MAX_DOCUMENT_BYTES: usize = 256 * 1024;

    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With persist policy
    #[inline]
    #[must_use]
    pub fn with_persist_policy(mut self, policy: PersistPolicy) -> Self {
        self.persist_policy = policy;
        self
    }

    /// With document size limit
    #[inline]
    #[must_use]
    pub fn with_max_document_bytes(mut self, limit: usize) -> Self {
        self.max_document_bytes = limit;
        self
    }

    /// Parse from JSON; absent fields keep their defaults
    ///
    /// # Errors
    /// Returns error if `json` is not a valid configuration object
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            persist_policy: PersistPolicy::OnMigration,
            max_document_bytes: Self::DEFAULT_MAX_DOCUMENT_BYTES,
        }
    }
}
