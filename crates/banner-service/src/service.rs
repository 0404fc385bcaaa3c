//! Banner read and write paths
//!
//! Every path runs stored documents through the migration pipeline, so
//! callers only ever see current-schema documents. Reads write the upgraded
//! form back according to [`PersistPolicy`]; writes persist only when the
//! structural content actually changed.

use std::sync::Arc;

use banner_migration::{MigrationOutcome, MigrationReport, MigrationRunner};
use banner_schema::model::keys;
use banner_schema::{json_kind, BannerConfig, DocumentError};
use serde_json::{Map, Value as JsonValue};

use crate::config::{PersistPolicy, ServiceConfig};
use crate::error::ServiceError;
use crate::ids::{BannerId, UserId, WorkspaceId};
use crate::permissions::{Permission, PermissionError, TeamDirectory};
use crate::store::{BannerStore, StoredBanner};

/// A banner as served to callers
#[derive(Debug, Clone)]
pub struct FetchedBanner {
    pub id: BannerId,
    pub workspace: WorkspaceId,
    /// Current-schema document
    pub config: BannerConfig,
    /// What the read-path migration did
    pub report: MigrationReport,
    /// Whether the migrated form was written back
    pub persisted: bool,
}

/// Result of an update
#[derive(Debug, Clone)]
pub struct UpdatedBanner {
    pub config: BannerConfig,
    /// False when the patch left the structural content unchanged
    pub persisted: bool,
}

/// Banner service over a store and a team directory
#[derive(Debug, Clone)]
pub struct BannerService {
    store: Arc<dyn BannerStore>,
    directory: Arc<TeamDirectory>,
    runner: MigrationRunner,
    config: ServiceConfig,
}

impl BannerService {
    /// Create service with default configuration and the standard runner
    #[must_use]
    pub fn new(store: Arc<dyn BannerStore>, directory: Arc<TeamDirectory>) -> Self {
        Self {
            store,
            directory,
            runner: MigrationRunner::new(),
            config: ServiceConfig::default(),
        }
    }

    /// With configuration
    #[inline]
    #[must_use]
    pub fn with_config(mut self, config: ServiceConfig) -> Self {
        self.config = config;
        self
    }

    /// With a custom migration runner
    #[inline]
    #[must_use]
    pub fn with_runner(mut self, runner: MigrationRunner) -> Self {
        self.runner = runner;
        self
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Team directory used for permission checks
    #[inline]
    #[must_use]
    pub fn directory(&self) -> &TeamDirectory {
        &self.directory
    }

    /// Load a banner for rendering
    ///
    /// Unparseable stored JSON degrades to the default document. When the
    /// stored document had to be migrated or completed and the policy is
    /// [`PersistPolicy::OnMigration`], the upgraded form is written back,
    /// unless the stored document changed after it was read.
    ///
    /// # Errors
    /// - `ServiceError::NotFound` if no banner has this ID
    /// - `ServiceError::Store` if loading or writing back fails
    pub async fn fetch(&self, id: BannerId) -> Result<FetchedBanner, ServiceError> {
        let stored = self.load(id).await?;
        self.resolve(stored).await
    }

    /// All banners of a workspace, migrated
    ///
    /// # Errors
    /// Returns error if `actor` may not view banners there or the store fails
    pub async fn list(
        &self,
        actor: UserId,
        workspace: WorkspaceId,
    ) -> Result<Vec<FetchedBanner>, ServiceError> {
        self.directory
            .check(actor, workspace, Permission::ViewBanners)?;

        let stored = self.store.list(workspace).await?;
        let mut banners = Vec::with_capacity(stored.len());
        for banner in stored {
            banners.push(self.resolve(banner).await?);
        }
        Ok(banners)
    }

    /// Create a banner from a partial document
    ///
    /// `partial` may be `null` or an object; absent sections are filled from
    /// the current defaults.
    ///
    /// # Errors
    /// - `ServiceError::PermissionDenied` if `actor` may not edit banners
    /// - `ServiceError::InvalidPatch` if `partial` is not an object
    /// - `ServiceError::PayloadTooLarge` if the document exceeds the limit
    /// - `ServiceError::Store` if saving fails
    pub async fn create(
        &self,
        actor: UserId,
        workspace: WorkspaceId,
        partial: JsonValue,
    ) -> Result<BannerId, ServiceError> {
        self.directory
            .check(actor, workspace, Permission::EditBanners)?;

        let mut partial = into_object(partial, true)?;
        self.ensure_within_limit(&partial)?;
        partial.remove(keys::LAST_UPDATED);
        partial.insert(
            keys::VERSION.into(),
            JsonValue::String(self.runner.target_version().to_string()),
        );

        let outcome = self.runner.migrate_owned(JsonValue::Object(partial));
        let id = BannerId::new();
        let document = self.serialize_bounded(&outcome.config)?;
        self.store
            .save(StoredBanner::new(id, workspace, document))
            .await?;

        tracing::info!("Created banner {} in workspace {}", id, workspace);
        Ok(id)
    }

    /// Apply a JSON merge patch to a banner
    ///
    /// The stored document is migrated first, the patch merged (objects
    /// recursively, arrays and scalars replaced, `null` removes), and the
    /// result migrated again so removed sections come back as defaults.
    /// `version` and `lastUpdated` in the patch are ignored.
    ///
    /// # Errors
    /// - `ServiceError::NotFound` if no banner has this ID or `actor` is not
    ///   a member of its workspace
    /// - `ServiceError::PermissionDenied` if `actor` may not edit banners
    /// - `ServiceError::InvalidPatch` if `patch` is not an object
    /// - `ServiceError::PayloadTooLarge` if patch or result exceeds the limit
    /// - `ServiceError::Store` if loading or saving fails
    pub async fn update(
        &self,
        actor: UserId,
        id: BannerId,
        patch: JsonValue,
    ) -> Result<UpdatedBanner, ServiceError> {
        let stored = self.load_for(actor, id, Permission::EditBanners).await?;

        let mut patch = into_object(patch, false)?;
        self.ensure_within_limit(&patch)?;
        patch.remove(keys::VERSION);
        patch.remove(keys::LAST_UPDATED);

        let current = self.runner.migrate_owned(parse_document(&stored));
        let mut merged = current.config.clone();
        merged.apply_patch(&patch);
        let next = self.runner.migrate_owned(merged.into_value());

        let changed = current.report.changed()
            || next.config.fingerprint() != current.config.fingerprint();
        if changed {
            let document = self.serialize_bounded(&next.config)?;
            self.store
                .save(StoredBanner::new(id, stored.workspace, document))
                .await?;
            tracing::info!("Updated banner {} ({})", id, next.config.fingerprint().short());
        } else {
            tracing::debug!("Update left banner {} unchanged, skipping write", id);
        }

        Ok(UpdatedBanner {
            config: next.config,
            persisted: changed,
        })
    }

    async fn load(&self, id: BannerId) -> Result<StoredBanner, ServiceError> {
        self.store
            .load(id)
            .await?
            .ok_or(ServiceError::NotFound(id))
    }

    /// Load `id` on behalf of `actor`; non-members get `NotFound`
    async fn load_for(
        &self,
        actor: UserId,
        id: BannerId,
        permission: Permission,
    ) -> Result<StoredBanner, ServiceError> {
        let stored = self.load(id).await?;
        match self.directory.check(actor, stored.workspace, permission) {
            Ok(_) => Ok(stored),
            Err(PermissionError::NotAMember { .. }) => Err(ServiceError::NotFound(id)),
            Err(err) => Err(err.into()),
        }
    }

    async fn resolve(&self, stored: StoredBanner) -> Result<FetchedBanner, ServiceError> {
        let MigrationOutcome { config, report } =
            self.runner.migrate_owned(parse_document(&stored));

        let mut persisted = false;
        if report.changed() && self.config.persist_policy == PersistPolicy::OnMigration {
            let document = config.to_json()?;
            persisted = self
                .store
                .save_if_unchanged(
                    &stored.document,
                    StoredBanner::new(stored.id, stored.workspace, document),
                )
                .await?;
            if persisted {
                tracing::info!(
                    "Persisted migrated banner {} ({} -> {})",
                    stored.id,
                    report.detected,
                    self.runner.target_version()
                );
            } else {
                tracing::debug!(
                    "Banner {} changed since it was read, skipping write-back",
                    stored.id
                );
            }
        }

        Ok(FetchedBanner {
            id: stored.id,
            workspace: stored.workspace,
            config,
            report,
            persisted,
        })
    }

    fn ensure_within_limit(&self, payload: &Map<String, JsonValue>) -> Result<(), ServiceError> {
        let size = serde_json::to_string(payload)
            .map_err(DocumentError::from)?
            .len();
        self.check_size(size)
    }

    fn serialize_bounded(&self, config: &BannerConfig) -> Result<String, ServiceError> {
        let document = config.to_json()?;
        self.check_size(document.len())?;
        Ok(document)
    }

    fn check_size(&self, size: usize) -> Result<(), ServiceError> {
        let limit = self.config.max_document_bytes;
        if size > limit {
            return Err(ServiceError::PayloadTooLarge { size, limit });
        }
        Ok(())
    }
}

/// Stored JSON, or `null` (which migrates to defaults) when unparseable
fn parse_document(stored: &StoredBanner) -> JsonValue {
    serde_json::from_str(&stored.document).unwrap_or_else(|err| {
        tracing::warn!("Stored banner {} is not valid JSON, using defaults: {}", stored.id, err);
        JsonValue::Null
    })
}

fn into_object(value: JsonValue, allow_null: bool) -> Result<Map<String, JsonValue>, ServiceError> {
    match value {
        JsonValue::Object(map) => Ok(map),
        JsonValue::Null if allow_null => Ok(Map::new()),
        other => Err(ServiceError::InvalidPatch(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::{Membership, TeamRole};
    use crate::store::MemoryBannerStore;
    use banner_migration::FixedClock;
    use banner_schema::CURRENT_BANNER_VERSION;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    struct Fixture {
        store: Arc<MemoryBannerStore>,
        service: BannerService,
        workspace: WorkspaceId,
        editor: UserId,
        viewer: UserId,
    }

    fn fixture(config: ServiceConfig) -> Fixture {
        let store = Arc::new(MemoryBannerStore::new());
        let directory = Arc::new(TeamDirectory::new());
        let workspace = WorkspaceId::new();
        let (editor, viewer) = (UserId::new(), UserId::new());
        directory.insert(Membership { workspace, user: editor, role: TeamRole::Editor });
        directory.insert(Membership { workspace, user: viewer, role: TeamRole::Viewer });

        let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap());
        let service = BannerService::new(store.clone(), directory)
            .with_runner(MigrationRunner::new().with_clock(clock))
            .with_config(config);

        Fixture { store, service, workspace, editor, viewer }
    }

    fn seed(f: &Fixture, document: &str) -> BannerId {
        let id = BannerId::new();
        f.store.seed(StoredBanner::new(id, f.workspace, document));
        id
    }

    #[tokio::test]
    async fn fetch_persists_legacy_document() {
        let f = fixture(ServiceConfig::default());
        let id = seed(&f, r##"{"version": "1.0.0", "colors": {"primary": "#ff0000"}}"##);

        let fetched = f.service.fetch(id).await.unwrap();
        assert!(fetched.persisted);
        assert_eq!(fetched.config.version(), Some(CURRENT_BANNER_VERSION));
        assert_eq!(f.store.write_count(), 1);

        let raw = f.store.raw(id).unwrap();
        let stored = BannerConfig::from_json(&raw).unwrap();
        assert_eq!(stored.version(), Some(CURRENT_BANNER_VERSION));
        assert_eq!(stored.as_map()["colors"]["primary"], json!("#ff0000"));

        let again = f.service.fetch(id).await.unwrap();
        assert!(!again.persisted);
        assert_eq!(f.store.write_count(), 1);
    }

    #[tokio::test]
    async fn never_policy_serves_transiently() {
        let f = fixture(ServiceConfig::new().with_persist_policy(PersistPolicy::Never));
        let id = seed(&f, r#"{"version": "2.0.0"}"#);

        let fetched = f.service.fetch(id).await.unwrap();
        assert!(!fetched.persisted);
        assert!(fetched.report.needed_migration);
        assert_eq!(f.store.write_count(), 0);
        assert_eq!(f.store.raw(id).as_deref(), Some(r#"{"version": "2.0.0"}"#));
    }

    #[tokio::test]
    async fn corrupt_json_degrades_to_defaults() {
        let f = fixture(ServiceConfig::default());
        let id = seed(&f, "{not json");

        let fetched = f.service.fetch(id).await.unwrap();
        assert!(fetched.report.reset);
        for key in keys::REQUIRED_SECTIONS {
            assert!(fetched.config.has(key));
        }
    }

    #[tokio::test]
    async fn missing_banner() {
        let f = fixture(ServiceConfig::default());
        assert!(matches!(
            f.service.fetch(BannerId::new()).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn update_skips_noop_writes() {
        let f = fixture(ServiceConfig::default());
        let id = f.service.create(f.editor, f.workspace, json!(null)).await.unwrap();
        assert_eq!(f.store.write_count(), 1);

        let noop = f
            .service
            .update(f.editor, id, json!({"language": "auto"}))
            .await
            .unwrap();
        assert!(!noop.persisted);
        assert_eq!(f.store.write_count(), 1);

        let real = f
            .service
            .update(f.editor, id, json!({"behavior": {"autoShow": false}}))
            .await
            .unwrap();
        assert!(real.persisted);
        assert_eq!(real.config.as_map()["behavior"]["autoShow"], json!(false));
        assert_eq!(f.store.write_count(), 2);
    }

    #[tokio::test]
    async fn viewer_cannot_write() {
        let f = fixture(ServiceConfig::default());
        let err = f
            .service
            .create(f.viewer, f.workspace, json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::PermissionDenied(_)));
        assert!(f.store.is_empty());
    }

    #[tokio::test]
    async fn rejects_non_object_patch_and_oversized_payloads() {
        let f = fixture(ServiceConfig::new().with_max_document_bytes(64));
        let id = seed(&f, "{}");

        assert!(matches!(
            f.service.update(f.editor, id, json!([1, 2])).await,
            Err(ServiceError::InvalidPatch(_))
        ));
        assert!(matches!(
            f.service.create(f.editor, f.workspace, json!({})).await,
            Err(ServiceError::PayloadTooLarge { limit: 64, .. })
        ));
    }
}
