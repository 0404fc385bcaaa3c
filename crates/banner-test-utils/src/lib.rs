//! Testing utilities for the banner workspace
//!
//! Shared fixtures, seeded services and proptest strategies.

#![allow(missing_docs)]
#![allow(clippy::missing_panics_doc)]

use std::sync::Arc;

use banner_migration::{FixedClock, MigrationRunner};
use banner_schema::BannerConfig;
use banner_service::{
    BannerId, BannerService, MemoryBannerStore, Membership, StoredBanner, TeamDirectory,
    TeamRole, UserId, WorkspaceId,
};
use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;
use serde_json::{json, Map, Number, Value as JsonValue};

pub fn fixed_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()
}

/// `lastUpdated` produced by [`fixed_clock`]
pub const FIXED_TIMESTAMP: &str = "2024-01-15T10:30:00.000Z";

pub fn fixed_clock() -> FixedClock {
    FixedClock::new(fixed_instant())
}

/// Standard runner frozen at [`fixed_instant`]
pub fn test_runner() -> MigrationRunner {
    MigrationRunner::new().with_clock(fixed_clock())
}

/// A 1.0.0 document as the first product release stored it
pub fn legacy_v1_document() -> JsonValue {
    json!({
        "version": "1.0.0",
        "colors": {
            "primary": "#2563eb",
            "background": "#ffffff",
            "text": "#111827"
        },
        "text": {
            "title": "We value your privacy",
            "description": "We use cookies to improve your experience.",
            "acceptButton": "Accept",
            "rejectButton": "Reject"
        },
        "behavior": {
            "autoShow": true,
            "showRejectButton": true
        },
        "branding": {
            "logo": {"enabled": false, "url": ""}
        },
        "layout": {
            "position": "bottom",
            "style": "bar"
        }
    })
}

/// A 1.0.0 document whose settings are all falsy but present
pub fn falsy_v1_document() -> JsonValue {
    json!({
        "version": "1.0.0",
        "behavior": {"showPreferences": false, "autoShow": false},
        "branding": {"footerLink": {"enabled": false, "text": ""}},
        "layout": {"shadow": false, "borderRadius": 0},
        "advanced": {"consentMode": false, "customCSS": ""},
        "scripts": {"strictlyNecessary": []}
    })
}

/// A 2.0.0 document with a footer link but no link style
pub fn v2_document() -> JsonValue {
    json!({
        "version": "2.0.0",
        "compliance": {"framework": "gdpr", "explicitConsent": true},
        "language": "de",
        "branding": {
            "footerLink": {
                "enabled": true,
                "text": "Cookie-Einstellungen",
                "position": "bottom-right"
            }
        },
        "scripts": {
            "strictlyNecessary": [],
            "functionality": [],
            "trackingPerformance": [{
                "id": "ga",
                "name": "Google Analytics",
                "category": "trackingPerformance",
                "scriptCode": "<script></script>",
                "enabled": true
            }],
            "targetingAdvertising": []
        }
    })
}

/// [`legacy_v1_document`] migrated with [`test_runner`]
pub fn current_document() -> BannerConfig {
    test_runner().migrate(&legacy_v1_document())
}

/// Members of the seeded workspace
#[derive(Debug, Clone, Copy)]
pub struct TestTeam {
    pub workspace: WorkspaceId,
    pub owner: UserId,
    pub admin: UserId,
    pub editor: UserId,
    pub viewer: UserId,
}

/// A service over an in-memory store with one workspace and one member per role
#[derive(Debug)]
pub struct TestEnv {
    pub store: Arc<MemoryBannerStore>,
    pub directory: Arc<TeamDirectory>,
    pub service: BannerService,
    pub team: TestTeam,
}

impl TestEnv {
    pub fn new() -> Self {
        let store = Arc::new(MemoryBannerStore::new());
        let directory = Arc::new(TeamDirectory::new());
        let team = TestTeam {
            workspace: WorkspaceId::new(),
            owner: UserId::new(),
            admin: UserId::new(),
            editor: UserId::new(),
            viewer: UserId::new(),
        };
        for (user, role) in [
            (team.owner, TeamRole::Owner),
            (team.admin, TeamRole::Admin),
            (team.editor, TeamRole::Editor),
            (team.viewer, TeamRole::Viewer),
        ] {
            directory.insert(Membership {
                workspace: team.workspace,
                user,
                role,
            });
        }

        let service =
            BannerService::new(store.clone(), directory.clone()).with_runner(test_runner());

        Self {
            store,
            directory,
            service,
            team,
        }
    }

    /// Store a raw document in the team workspace
    pub fn seed(&self, document: &JsonValue) -> BannerId {
        self.seed_raw(&document.to_string())
    }

    /// Store raw text, which need not be valid JSON
    pub fn seed_raw(&self, document: &str) -> BannerId {
        let id = BannerId::new();
        self.store
            .seed(StoredBanner::new(id, self.team.workspace, document));
        id
    }

    /// Parse what the store currently holds for `id`
    pub fn stored(&self, id: BannerId) -> JsonValue {
        let raw = self.store.raw(id).expect("banner is stored");
        serde_json::from_str(&raw).expect("stored document is JSON")
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

const FIELD_NAMES: &[&str] = &[
    "primary",
    "background",
    "title",
    "autoShow",
    "showPreferences",
    "position",
    "enabled",
    "text",
    "style",
    "footerLink",
    "floatingStyle",
    "inlineStyle",
    "logo",
    "strictlyNecessary",
    "trackingPerformance",
    "consentMode",
    "performance",
    "googleAnalytics",
    "custom",
];

const SECTION_NAMES: &[&str] = &[
    "compliance",
    "language",
    "colors",
    "text",
    "behavior",
    "branding",
    "layout",
    "scripts",
    "advanced",
    "integrations",
    "customField",
];

/// Scalars, falsy ones included
pub fn arb_leaf() -> impl Strategy<Value = JsonValue> {
    prop_oneof![
        Just(JsonValue::Null),
        any::<bool>().prop_map(JsonValue::Bool),
        (-1000i64..1000).prop_map(|n| JsonValue::Number(Number::from(n))),
        "[a-z#0-9 ]{0,10}".prop_map(JsonValue::String),
    ]
}

/// Objects up to two levels deep drawn from real and unknown field names
pub fn arb_record() -> impl Strategy<Value = JsonValue> {
    let field = proptest::sample::select(FIELD_NAMES);
    let inner = proptest::collection::btree_map(field.clone(), arb_leaf(), 0..4)
        .prop_map(|fields| JsonValue::Object(to_map(fields)));
    let value = prop_oneof![3 => arb_leaf(), 1 => inner, 1 => Just(json!([]))];
    proptest::collection::btree_map(field, value, 0..5)
        .prop_map(|fields| JsonValue::Object(to_map(fields)))
}

/// Version field as found in stored documents, `None` when absent
pub fn arb_version() -> impl Strategy<Value = Option<JsonValue>> {
    prop_oneof![
        Just(None),
        Just(Some(json!("1.0.0"))),
        Just(Some(json!("2.0.0"))),
        Just(Some(json!("2.1.0"))),
        Just(Some(json!("1.5.0"))),
        Just(Some(json!("9.0.0"))),
        Just(Some(json!("garbage"))),
        Just(Some(json!(2))),
        Just(Some(JsonValue::Null)),
    ]
}

/// Arbitrary stored banner documents, well-formed or not
pub fn arb_banner_document() -> impl Strategy<Value = JsonValue> {
    let section = prop_oneof![3 => arb_record(), 1 => arb_leaf()];
    (
        arb_version(),
        proptest::collection::btree_map(proptest::sample::select(SECTION_NAMES), section, 0..8),
    )
        .prop_map(|(version, sections)| {
            let mut doc = to_map(sections);
            if let Some(version) = version {
                doc.insert("version".into(), version);
            }
            JsonValue::Object(doc)
        })
}

fn to_map(fields: std::collections::BTreeMap<&'static str, JsonValue>) -> Map<String, JsonValue> {
    fields
        .into_iter()
        .map(|(key, value)| (key.to_owned(), value))
        .collect()
}
