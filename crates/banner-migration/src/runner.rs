//! Migration runner
//!
//! Orchestrates one pass: detect the stored version, fold the applicable
//! chain steps over a copy of the document, normalize, then stamp the
//! current version and `lastUpdated`.

use std::sync::{Arc, OnceLock};

use banner_schema::model::keys;
use banner_schema::{defaults, BannerConfig, FieldPath, SchemaVersion};
use serde_json::{Map, Value as JsonValue};

use crate::chain::MigrationChain;
use crate::clock::{format_timestamp, Clock, SystemClock};
use crate::detect::{detect_version, DetectedVersion};
use crate::fill::FillLog;
use crate::normalize::ConfigNormalizer;

/// What one migration pass did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    /// Version found in the input
    pub detected: DetectedVersion,
    /// Whether the stored `version` differed from the target
    pub needed_migration: bool,
    /// Names of the steps applied, in order
    pub applied: Vec<&'static str>,
    /// Fields that received defaults
    pub filled: Vec<FieldPath>,
    /// Fields whose malformed values were replaced
    pub repaired: Vec<FieldPath>,
    /// Input was not an object and was replaced by the default document
    pub reset: bool,
}

impl MigrationReport {
    /// Whether the pass changed anything besides `lastUpdated`
    #[must_use]
    pub fn changed(&self) -> bool {
        self.needed_migration
            || self.reset
            || !self.applied.is_empty()
            || !self.filled.is_empty()
            || !self.repaired.is_empty()
    }
}

/// Migrated document together with its report
#[derive(Debug, Clone)]
pub struct MigrationOutcome {
    pub config: BannerConfig,
    pub report: MigrationReport,
}

/// Brings any stored banner document to the current schema version
///
/// Never fails: non-object input yields the full default document. Shareable
/// across threads; every call works on its own copy of the input.
#[derive(Debug, Clone)]
pub struct MigrationRunner {
    chain: Arc<MigrationChain>,
    clock: Arc<dyn Clock>,
    normalizer: ConfigNormalizer,
}

impl MigrationRunner {
    /// Standard chain, wall clock
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom chain
    #[inline]
    #[must_use]
    pub fn with_chain(mut self, chain: MigrationChain) -> Self {
        self.chain = Arc::new(chain);
        self
    }

    /// Use a custom time source
    #[inline]
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// The chain in use
    #[inline]
    #[must_use]
    pub fn chain(&self) -> &MigrationChain {
        &self.chain
    }

    /// Version every output is stamped with
    #[inline]
    #[must_use]
    pub fn target_version(&self) -> SchemaVersion {
        self.chain.current_version()
    }

    /// Whether `config` is not yet stamped with the target version
    #[must_use]
    pub fn needs_migration(&self, config: &JsonValue) -> bool {
        crate::detect::stored_version(config) != Some(self.target_version().as_str())
    }

    /// Migrate a borrowed document; the caller's value is not modified
    #[must_use]
    pub fn migrate(&self, config: &JsonValue) -> BannerConfig {
        self.migrate_owned(config.clone()).config
    }

    /// Migrate a borrowed document and report what changed
    #[must_use]
    pub fn migrate_with_report(&self, config: &JsonValue) -> MigrationOutcome {
        self.migrate_owned(config.clone())
    }

    /// Migrate an owned document
    #[must_use]
    pub fn migrate_owned(&self, config: JsonValue) -> MigrationOutcome {
        let detected = detect_version(&config);
        let needed_migration = self.needs_migration(&config);
        let target = self.target_version();

        let (mut doc, from) = match (config, detected.effective()) {
            (JsonValue::Object(map), Some(from)) => (map, from),
            (other, _) => {
                tracing::warn!(
                    "Banner config is {}, not an object; using defaults",
                    banner_schema::json_kind(&other)
                );
                let mut doc = defaults::default_banner_config();
                self.stamp(&mut doc, &target);
                return MigrationOutcome {
                    config: BannerConfig::from_map(doc),
                    report: MigrationReport {
                        detected,
                        needed_migration,
                        applied: Vec::new(),
                        filled: Vec::new(),
                        repaired: Vec::new(),
                        reset: true,
                    },
                };
            }
        };

        if from > target {
            tracing::warn!(
                "Banner config version {} is newer than {}, stamping current version",
                from,
                target
            );
        }

        let mut log = FillLog::new();
        let plan = self.chain.plan(&from);
        let applied = plan.iter().fold(Vec::with_capacity(plan.len()), |mut applied, step| {
            let before = log.len();
            step.apply(&mut doc, &mut log);
            tracing::debug!(
                "Applied migration step {} (to {}, {} changes)",
                step.name(),
                step.to_version(),
                log.len() - before
            );
            applied.push(step.name());
            applied
        });

        self.normalizer.normalize(&mut doc, &mut log);
        self.stamp(&mut doc, &target);

        let (filled, repaired) = log.into_parts();
        if needed_migration || !filled.is_empty() || !repaired.is_empty() {
            tracing::debug!(
                "Migrated banner config {} -> {} ({} steps, {} filled, {} repaired)",
                detected,
                target,
                applied.len(),
                filled.len(),
                repaired.len()
            );
        }

        MigrationOutcome {
            config: BannerConfig::from_map(doc),
            report: MigrationReport {
                detected,
                needed_migration,
                applied,
                filled,
                repaired,
                reset: false,
            },
        }
    }

    fn stamp(&self, doc: &mut Map<String, JsonValue>, target: &SchemaVersion) {
        doc.insert(keys::VERSION.into(), JsonValue::String(target.to_string()));
        doc.insert(
            keys::LAST_UPDATED.into(),
            JsonValue::String(format_timestamp(self.clock.now())),
        );
    }
}

impl Default for MigrationRunner {
    fn default() -> Self {
        Self {
            chain: Arc::new(MigrationChain::standard()),
            clock: Arc::new(SystemClock),
            normalizer: ConfigNormalizer::new(),
        }
    }
}

fn standard_runner() -> &'static MigrationRunner {
    static RUNNER: OnceLock<MigrationRunner> = OnceLock::new();
    RUNNER.get_or_init(MigrationRunner::new)
}

/// Migrate with the standard chain and the wall clock
///
/// Always returns a complete document stamped with
/// [`CURRENT_BANNER_VERSION`](banner_schema::CURRENT_BANNER_VERSION).
#[must_use]
pub fn migrate_banner_config(config: &JsonValue) -> BannerConfig {
    standard_runner().migrate(config)
}
