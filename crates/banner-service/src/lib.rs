//! Banner Service
//!
//! Caller side of the migration pipeline: loads stored banner documents,
//! serves them in the current schema, writes upgrades back and gates edits
//! behind workspace team permissions.
//!
//! # Core Concepts
//!
//! - [`BannerStore`]: persistence backend ([`MemoryBannerStore`] in memory)
//! - [`BannerService`]: fetch, list, create and update paths
//! - [`ServiceConfig`]: persist policy and payload limits
//! - [`TeamDirectory`]: memberships and [`Permission`] checks
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use banner_service::{
//!     BannerService, MemoryBannerStore, Membership, TeamDirectory, TeamRole, UserId, WorkspaceId,
//! };
//! use serde_json::json;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let directory = Arc::new(TeamDirectory::new());
//! let (workspace, owner) = (WorkspaceId::new(), UserId::new());
//! directory.insert(Membership { workspace, user: owner, role: TeamRole::Owner });
//!
//! let service = BannerService::new(Arc::new(MemoryBannerStore::new()), directory);
//! let id = service.create(owner, workspace, json!({"language": "fr"})).await.unwrap();
//! let banner = service.fetch(id).await.unwrap();
//! assert_eq!(banner.config.as_map()["language"], json!("fr"));
//! # });
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod config;
mod error;
mod ids;
mod permissions;
mod service;
mod store;

pub use config::{PersistPolicy, ServiceConfig};
pub use error::{ServiceError, StoreError};
pub use ids::{BannerId, UserId, WorkspaceId};
pub use permissions::{
    can_assign_role, role_permissions, Membership, Permission, PermissionError, TeamDirectory,
    TeamRole,
};
pub use service::{BannerService, FetchedBanner, UpdatedBanner};
pub use store::{BannerStore, MemoryBannerStore, StoredBanner};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
