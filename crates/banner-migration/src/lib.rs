//! Banner Migration
//!
//! Brings stored cookie-consent banner documents of any age up to the
//! current schema version by filling in what each version introduced.
//!
//! # Core Concepts
//!
//! - [`needs_migration`]: cheap check before touching a document
//! - [`MigrationRunner`]: detect, fold chain steps, normalize, stamp
//! - [`MigrationChain`]: ordered, validated list of [`MigrationStep`]s
//! - [`ConfigNormalizer`]: final deep fill of every section
//! - [`get_migration_notes`]: changelog for a version transition
//!
//! Migration never fails: invalid input degrades to the default document,
//! and existing values are never overwritten (absent means missing or
//! `null`; `false`, `0` and `""` are kept).
//!
//! # Example
//!
//! ```rust
//! use banner_migration::{migrate_banner_config, needs_migration, CURRENT_BANNER_VERSION};
//! use serde_json::json;
//!
//! let stored = json!({"version": "1.0.0", "colors": {"primary": "#123456"}});
//! assert!(needs_migration(&stored));
//!
//! let migrated = migrate_banner_config(&stored);
//! assert_eq!(migrated.version(), Some(CURRENT_BANNER_VERSION));
//! assert!(!needs_migration(&migrated.to_value()));
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod chain;
mod clock;
mod detect;
pub mod fill;
mod normalize;
mod notes;
mod runner;
mod step;
pub mod steps;

pub use banner_schema::{BannerConfig, CURRENT_BANNER_VERSION};
pub use chain::{ChainError, MigrationChain};
pub use clock::{format_timestamp, Clock, FixedClock, SystemClock};
pub use detect::{detect_version, needs_migration, stored_version, DetectedVersion};
pub use fill::FillLog;
pub use normalize::ConfigNormalizer;
pub use notes::get_migration_notes;
pub use runner::{migrate_banner_config, MigrationOutcome, MigrationReport, MigrationRunner};
pub use step::MigrationStep;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
