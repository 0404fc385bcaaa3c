//! Error types for the banner service

use banner_schema::DocumentError;

use crate::ids::BannerId;
use crate::permissions::PermissionError;

/// Service error type
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// No banner with this ID
    #[error("banner not found: {0}")]
    NotFound(BannerId),

    /// Caller lacks the required permission
    #[error("permission denied: {0}")]
    PermissionDenied(#[from] PermissionError),

    /// Underlying store failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Document or patch over the configured size limit
    #[error("payload of {size} bytes exceeds limit of {limit} bytes")]
    PayloadTooLarge { size: usize, limit: usize },

    /// Patch or partial document is not usable
    #[error("invalid patch: {0}")]
    InvalidPatch(String),

    /// Migrated document could not be serialized
    #[error("serialization error: {0}")]
    Serialization(#[from] DocumentError),
}

impl ServiceError {
    /// Whether the caller can fix the request
    #[inline]
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Store(_) | Self::Serialization(_))
    }
}

/// Store error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Backend could not be reached or refused the operation
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Write rejected by the backend
    #[error("write rejected for banner {id}: {reason}")]
    WriteRejected { id: BannerId, reason: String },
}
