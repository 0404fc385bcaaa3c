//! Banner Schema
//!
//! Versioned cookie-consent banner documents.
//!
//! # Core Concepts
//!
//! - [`BannerConfig`]: the stored JSON document for one banner
//! - [`SchemaVersion`]: `major.minor.patch` document schema version
//! - [`defaults`]: factories for every default section
//! - [`model`]: typed read views over the sections
//! - [`Fingerprint`]: Blake3 hash of a document's structural content
//! - [`FieldPath`]: dotted addressing of nested fields
//!
//! # Example
//!
//! ```rust
//! use banner_schema::{defaults, model::Compliance, BannerConfig};
//!
//! let doc = BannerConfig::from_map(defaults::default_banner_config());
//! let compliance: Compliance = doc.section("compliance").unwrap();
//! assert!(compliance.require_privacy_policy);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod defaults;
mod document;
mod fingerprint;
pub mod model;
mod path;
mod version;

pub use document::{json_kind, BannerConfig, DocumentError};
pub use fingerprint::{canonical_json, Fingerprint, FingerprintError};
pub use path::{FieldPath, PathError};
pub use version::{SchemaVersion, VersionError, CURRENT_BANNER_VERSION, LEGACY_BANNER_VERSION};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_document_is_current_and_typed() {
        let doc = BannerConfig::from_map(defaults::default_banner_config());
        assert_eq!(doc.version(), Some(CURRENT_BANNER_VERSION));
        assert!(doc.schema_version().unwrap().is_current());

        let branding: model::Branding = doc.section(model::keys::BRANDING).unwrap();
        assert!(branding.footer_link.enabled);
        let scripts: model::Scripts = doc.section(model::keys::SCRIPTS).unwrap();
        assert_eq!(scripts.strictly_necessary[0].id, defaults::SESSION_SCRIPT_ID);
    }

    #[test]
    fn path_lookup_matches_pointer() {
        let doc = BannerConfig::from_map(defaults::default_banner_config());
        let path: FieldPath = "branding.footerLink.floatingStyle.shape".parse().unwrap();
        assert_eq!(doc.get(&path), Some(&json!("pill")));
        assert_eq!(doc.to_value().pointer(&path.to_pointer()), doc.get(&path));
    }
}
