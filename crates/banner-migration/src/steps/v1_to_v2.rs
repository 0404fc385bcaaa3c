//! 1.0.0 → 2.0.0
//!
//! Introduced compliance settings, language selection, analytics
//! integrations, the footer re-open link, script categories and the
//! advanced/performance block.

use banner_schema::defaults;
use banner_schema::model::keys;
use banner_schema::{FieldPath, SchemaVersion};
use serde_json::{json, Map, Value as JsonValue};

use crate::fill::{empty_object, ensure_shaped, ensure_value, fill_missing, with_object, FillLog};
use crate::step::MigrationStep;

const NOTES: &[&str] = &[
    "Added compliance settings (defaults to PIPEDA with implied consent)",
    "Added automatic language detection",
    "Added Google Analytics integration settings (disabled by default)",
    "Added a persistent \"Cookie Settings\" footer link",
    "Added a preferences button to the banner",
    "Added script management with four consent categories",
    "Added a default session management script",
    "Added advanced settings: consent mode, custom CSS/JS and performance options",
];

/// Upgrade from the original schema to 2.0.0
#[derive(Debug, Clone, Copy, Default)]
pub struct V1ToV2;

impl MigrationStep for V1ToV2 {
    fn name(&self) -> &'static str {
        "v1_to_v2"
    }

    fn from_version(&self) -> SchemaVersion {
        SchemaVersion::new(1, 0, 0)
    }

    fn to_version(&self) -> SchemaVersion {
        SchemaVersion::new(2, 0, 0)
    }

    fn apply(&self, doc: &mut Map<String, JsonValue>, log: &mut FillLog) {
        let root = FieldPath::root();

        // Whole block only: partial compliance settings belong to the customer
        ensure_shaped(
            doc,
            keys::COMPLIANCE,
            &root,
            log,
            defaults::default_compliance,
            JsonValue::is_object,
        );
        ensure_value(doc, keys::LANGUAGE, &root, log, defaults::default_language);

        with_object(doc, keys::INTEGRATIONS, &root, log, empty_object, |integrations, path, log| {
            ensure_shaped(
                integrations,
                keys::GOOGLE_ANALYTICS,
                path,
                log,
                defaults::default_google_analytics,
                JsonValue::is_object,
            );
        });

        with_object(doc, keys::BRANDING, &root, log, empty_object, |branding, path, log| {
            ensure_shaped(
                branding,
                keys::FOOTER_LINK,
                path,
                log,
                defaults::default_footer_link_basic,
                JsonValue::is_object,
            );
        });

        with_object(doc, keys::BEHAVIOR, &root, log, empty_object, |behavior, path, log| {
            ensure_value(behavior, keys::SHOW_PREFERENCES, path, log, || json!(true));
        });

        with_object(doc, keys::SCRIPTS, &root, log, empty_object, |scripts, path, log| {
            for bucket in keys::SCRIPT_BUCKETS {
                let default: fn() -> JsonValue = if bucket == keys::STRICTLY_NECESSARY {
                    defaults::default_strictly_necessary
                } else {
                    || json!([])
                };
                ensure_shaped(scripts, bucket, path, log, default, JsonValue::is_array);
            }
        });

        with_object(doc, keys::ADVANCED, &root, log, empty_object, |advanced, path, log| {
            if let JsonValue::Object(advanced_defaults) = defaults::default_advanced() {
                fill_missing(advanced, &advanced_defaults, path, log);
            }
        });
    }

    fn notes(&self) -> &'static [&'static str] {
        NOTES
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn run(input: JsonValue) -> (JsonValue, FillLog) {
        let JsonValue::Object(mut doc) = input else {
            panic!("expected object");
        };
        let mut log = FillLog::new();
        V1ToV2.apply(&mut doc, &mut log);
        (JsonValue::Object(doc), log)
    }

    #[test]
    fn fills_every_v2_section() {
        let (doc, _) = run(json!({"version": "1.0.0", "text": {"title": "Hi"}}));

        assert_eq!(doc["text"]["title"], json!("Hi"));
        assert_eq!(doc["compliance"]["framework"], json!("pipeda"));
        assert_eq!(doc["compliance"]["consentExpiry"], json!(24));
        assert_eq!(doc["language"], json!("auto"));
        assert_eq!(doc["integrations"]["googleAnalytics"]["enabled"], json!(false));
        assert_eq!(doc["integrations"]["googleAnalytics"]["anonymizeIp"], json!(true));
        assert_eq!(doc["branding"]["footerLink"]["text"], json!("Cookie Settings"));
        assert_eq!(doc["branding"]["footerLink"]["position"], json!("bottom-left"));
        assert_eq!(doc["behavior"]["showPreferences"], json!(true));
        assert_eq!(doc["advanced"]["consentMode"], json!(true));
        assert_eq!(doc["advanced"]["performance"]["useRequestIdleCallback"], json!(true));

        let necessary = doc["scripts"]["strictlyNecessary"].as_array().unwrap();
        assert_eq!(necessary.len(), 1);
        assert_eq!(necessary[0]["id"], json!(defaults::SESSION_SCRIPT_ID));
        assert_eq!(necessary[0]["enabled"], json!(true));
        for bucket in ["functionality", "trackingPerformance", "targetingAdvertising"] {
            assert_eq!(doc["scripts"][bucket], json!([]), "{bucket}");
        }
    }

    #[test]
    fn explicit_false_show_preferences_survives() {
        let (doc, _) = run(json!({"behavior": {"showPreferences": false, "autoShow": false}}));
        assert_eq!(doc["behavior"]["showPreferences"], json!(false));
        assert_eq!(doc["behavior"]["autoShow"], json!(false));
    }

    #[test]
    fn partial_compliance_is_not_merged() {
        let (doc, _) = run(json!({"compliance": {"framework": "gdpr"}}));
        assert_eq!(doc["compliance"], json!({"framework": "gdpr"}));
    }

    #[test]
    fn existing_buckets_are_kept_even_when_empty() {
        let (doc, log) = run(json!({
            "scripts": {"strictlyNecessary": [], "functionality": [{"id": "chat"}]}
        }));
        assert_eq!(doc["scripts"]["strictlyNecessary"], json!([]));
        assert_eq!(doc["scripts"]["functionality"], json!([{"id": "chat"}]));
        assert!(!log
            .filled()
            .iter()
            .any(|p| p.to_string() == "scripts.strictlyNecessary"));
    }

    #[test]
    fn advanced_is_filled_field_by_field() {
        let (doc, _) = run(json!({
            "advanced": {"consentMode": false, "customCSS": "", "performance": {"lazyLoadAnalytics": false}}
        }));
        assert_eq!(
            doc["advanced"],
            json!({
                "consentMode": false,
                "customCSS": "",
                "customJS": "",
                "performance": {
                    "deferNonCriticalScripts": true,
                    "useRequestIdleCallback": true,
                    "lazyLoadAnalytics": false,
                    "inlineCriticalCSS": true
                }
            })
        );
    }

    #[test]
    fn second_application_changes_nothing() {
        let (once, _) = run(json!({"version": "1.0.0"}));
        let (twice, log) = run(once.clone());
        assert_eq!(once, twice);
        assert!(log.is_empty());
    }
}
