//! Ordered migration chain
//!
//! Provides [`MigrationChain`], the validated sequence of steps a document
//! walks from its stored version to the current one.

use banner_schema::SchemaVersion;

use crate::step::MigrationStep;
use crate::steps::{V1ToV2, V2ToV21};

/// Contiguous, strictly ascending sequence of migration steps
///
/// Each step's `from_version` equals the previous step's `to_version`.
/// Supporting a new schema version means appending one step.
#[derive(Debug)]
pub struct MigrationChain {
    steps: Vec<Box<dyn MigrationStep>>,
}

impl MigrationChain {
    /// Build a chain, checking continuity and ordering
    ///
    /// # Errors
    /// Returns error if the chain is empty, a step does not move forward,
    /// or two neighbouring steps do not meet
    pub fn new(steps: Vec<Box<dyn MigrationStep>>) -> Result<Self, ChainError> {
        if steps.is_empty() {
            return Err(ChainError::Empty);
        }

        for step in &steps {
            if step.to_version() <= step.from_version() {
                return Err(ChainError::NotAscending {
                    step: step.name(),
                    from: step.from_version().to_string(),
                    to: step.to_version().to_string(),
                });
            }
        }

        for pair in steps.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            if prev.to_version() != next.from_version() {
                return Err(ChainError::Discontinuous {
                    previous: prev.name(),
                    next: next.name(),
                    expected: prev.to_version().to_string(),
                    found: next.from_version().to_string(),
                });
            }
        }

        Ok(Self { steps })
    }

    /// The built-in chain: 1.0.0 → 2.0.0 → 2.1.0
    #[must_use]
    pub fn standard() -> Self {
        Self {
            steps: Self::standard_steps(),
        }
    }

    /// Fresh instances of the built-in steps, oldest first
    #[must_use]
    pub fn standard_steps() -> Vec<Box<dyn MigrationStep>> {
        vec![Box::new(V1ToV2), Box::new(V2ToV21)]
    }

    /// Oldest version the chain knows
    #[must_use]
    pub fn base_version(&self) -> SchemaVersion {
        self.steps
            .first()
            .map_or_else(SchemaVersion::legacy, |step| step.from_version())
    }

    /// Version the chain ends at
    #[must_use]
    pub fn current_version(&self) -> SchemaVersion {
        self.steps
            .last()
            .map_or_else(SchemaVersion::current, |step| step.to_version())
    }

    /// Steps to run for a document at `from`
    ///
    /// Every step whose target is newer than `from`. For a chain node this is
    /// the tail starting at that node; a version between nodes gets every
    /// later step (steps are additive, so replaying part of one is safe);
    /// a version at or past the end gets nothing.
    #[must_use]
    pub fn plan(&self, from: &SchemaVersion) -> &[Box<dyn MigrationStep>] {
        let start = self
            .steps
            .iter()
            .position(|step| step.to_version() > *from)
            .unwrap_or(self.steps.len());
        &self.steps[start..]
    }

    /// Whether `version` is the start or end of some step
    #[must_use]
    pub fn is_known(&self, version: &SchemaVersion) -> bool {
        self.steps
            .iter()
            .any(|step| step.from_version() == *version || step.to_version() == *version)
    }

    /// Find the step for an exact version pair
    #[must_use]
    pub fn find(&self, from: &str, to: &str) -> Option<&dyn MigrationStep> {
        self.steps
            .iter()
            .find(|step| step.from_version().as_str() == from && step.to_version().as_str() == to)
            .map(AsRef::as_ref)
    }

    /// All steps, oldest first
    #[inline]
    #[must_use]
    pub fn steps(&self) -> &[Box<dyn MigrationStep>] {
        &self.steps
    }

    /// Number of steps
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the chain has no steps
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl Default for MigrationChain {
    fn default() -> Self {
        Self::standard()
    }
}

/// Chain construction errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChainError {
    /// No steps supplied
    #[error("migration chain has no steps")]
    Empty,

    /// A step does not move to a newer version
    #[error("step {step} does not move forward ({from} -> {to})")]
    NotAscending {
        step: &'static str,
        from: String,
        to: String,
    },

    /// Neighbouring steps do not meet
    #[error("step {next} starts at {found} but {previous} ends at {expected}")]
    Discontinuous {
        previous: &'static str,
        next: &'static str,
        expected: String,
        found: String,
    },
}
