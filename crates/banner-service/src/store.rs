//! Document store abstraction
//!
//! The service treats persistence as an opaque key-value store of
//! serialized banner documents keyed by banner ID.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::ids::{BannerId, WorkspaceId};

/// A banner as held by the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredBanner {
    pub id: BannerId,
    pub workspace: WorkspaceId,
    /// Serialized `BannerConfig`, possibly of an older schema or corrupt
    pub document: String,
}

impl StoredBanner {
    /// Create stored banner
    #[inline]
    #[must_use]
    pub fn new(id: BannerId, workspace: WorkspaceId, document: impl Into<String>) -> Self {
        Self {
            id,
            workspace,
            document: document.into(),
        }
    }
}

/// Persistence backend for banner documents
#[async_trait::async_trait]
pub trait BannerStore: Send + Sync + std::fmt::Debug {
    /// Load one banner
    async fn load(&self, id: BannerId) -> Result<Option<StoredBanner>, StoreError>;

    /// Insert or replace a banner
    async fn save(&self, banner: StoredBanner) -> Result<(), StoreError>;

    /// Replace a banner only if its stored document is still `expected`
    ///
    /// Returns `false` without writing when the banner is gone or its
    /// document no longer matches. The comparison and the write must be
    /// atomic with respect to `save`.
    async fn save_if_unchanged(
        &self,
        expected: &str,
        banner: StoredBanner,
    ) -> Result<bool, StoreError>;

    /// All banners of a workspace
    async fn list(&self, workspace: WorkspaceId) -> Result<Vec<StoredBanner>, StoreError>;
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryBannerStore {
    banners: DashMap<BannerId, StoredBanner>,
    writes: AtomicU64,
}

impl MemoryBannerStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a raw document without counting it as a write
    pub fn seed(&self, banner: StoredBanner) {
        self.banners.insert(banner.id, banner);
    }

    /// Raw serialized document for `id`
    #[must_use]
    pub fn raw(&self, id: BannerId) -> Option<String> {
        self.banners.get(&id).map(|entry| entry.document.clone())
    }

    /// Number of writes applied
    #[inline]
    #[must_use]
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }

    /// Number of stored banners
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.banners.len()
    }

    /// Whether the store is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.banners.is_empty()
    }
}

#[async_trait::async_trait]
impl BannerStore for MemoryBannerStore {
    async fn load(&self, id: BannerId) -> Result<Option<StoredBanner>, StoreError> {
        Ok(self.banners.get(&id).map(|entry| entry.value().clone()))
    }

    async fn save(&self, banner: StoredBanner) -> Result<(), StoreError> {
        self.writes.fetch_add(1, Ordering::Relaxed);
        self.banners.insert(banner.id, banner);
        Ok(())
    }

    async fn save_if_unchanged(
        &self,
        expected: &str,
        banner: StoredBanner,
    ) -> Result<bool, StoreError> {
        match self.banners.get_mut(&banner.id) {
            Some(mut entry) if entry.document == expected => {
                self.writes.fetch_add(1, Ordering::Relaxed);
                *entry = banner;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn list(&self, workspace: WorkspaceId) -> Result<Vec<StoredBanner>, StoreError> {
        let mut banners: Vec<StoredBanner> = self
            .banners
            .iter()
            .filter(|entry| entry.workspace == workspace)
            .map(|entry| entry.value().clone())
            .collect();
        banners.sort_by_key(|banner| banner.id);
        Ok(banners)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_and_load() {
        let store = MemoryBannerStore::new();
        let banner = StoredBanner::new(BannerId::new(), WorkspaceId::new(), "{}");

        store.save(banner.clone()).await.unwrap();
        assert_eq!(store.load(banner.id).await.unwrap(), Some(banner));
        assert_eq!(store.write_count(), 1);
        assert!(store.load(BannerId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn seeding_is_not_a_write() {
        let store = MemoryBannerStore::new();
        let banner = StoredBanner::new(BannerId::new(), WorkspaceId::new(), "null");
        store.seed(banner.clone());
        assert_eq!(store.write_count(), 0);
        assert_eq!(store.raw(banner.id).as_deref(), Some("null"));
    }

    #[tokio::test]
    async fn conditional_save_requires_matching_document() {
        let store = MemoryBannerStore::new();
        let (id, workspace) = (BannerId::new(), WorkspaceId::new());
        store.seed(StoredBanner::new(id, workspace, r#"{"a":1}"#));

        let stale = store
            .save_if_unchanged(r#"{"a":0}"#, StoredBanner::new(id, workspace, r#"{"a":2}"#))
            .await
            .unwrap();
        assert!(!stale);
        assert_eq!(store.raw(id).as_deref(), Some(r#"{"a":1}"#));
        assert_eq!(store.write_count(), 0);

        let fresh = store
            .save_if_unchanged(r#"{"a":1}"#, StoredBanner::new(id, workspace, r#"{"a":2}"#))
            .await
            .unwrap();
        assert!(fresh);
        assert_eq!(store.raw(id).as_deref(), Some(r#"{"a":2}"#));
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn conditional_save_does_not_resurrect_missing_banner() {
        let store = MemoryBannerStore::new();
        let banner = StoredBanner::new(BannerId::new(), WorkspaceId::new(), "{}");
        assert!(!store.save_if_unchanged("{}", banner.clone()).await.unwrap());
        assert!(store.load(banner.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_filters_by_workspace() {
        let store = MemoryBannerStore::new();
        let (ours, theirs) = (WorkspaceId::new(), WorkspaceId::new());
        for _ in 0..3 {
            store.seed(StoredBanner::new(BannerId::new(), ours, "{}"));
        }
        store.seed(StoredBanner::new(BannerId::new(), theirs, "{}"));

        let listed = store.list(ours).await.unwrap();
        assert_eq!(listed.len(), 3);
        assert!(listed.iter().all(|banner| banner.workspace == ours));
        assert!(listed.windows(2).all(|pair| pair[0].id < pair[1].id));
        assert_eq!(store.len(), 4);
    }
}
