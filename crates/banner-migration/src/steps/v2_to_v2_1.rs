//! 2.0.0 → 2.1.0
//!
//! Introduced render styles for the footer re-open link. Existing links
//! become `floating`, which is how every 2.0.0 link was drawn.

use banner_schema::defaults;
use banner_schema::model::keys;
use banner_schema::{FieldPath, SchemaVersion};
use serde_json::{json, Map, Value as JsonValue};

use crate::fill::{empty_object, ensure_shaped, ensure_value, with_object, FillLog};
use crate::step::MigrationStep;

const NOTES: &[&str] = &[
    "Added footer link styles: floating button or inline footer link",
    "Existing footer links keep the floating style they had before",
    "Added floating button options: shape, size, text visibility and custom colors",
    "Added inline link options: link type, icon and logo",
];

/// Upgrade from 2.0.0 to 2.1.0
#[derive(Debug, Clone, Copy, Default)]
pub struct V2ToV21;

impl MigrationStep for V2ToV21 {
    fn name(&self) -> &'static str {
        "v2_to_v2_1"
    }

    fn from_version(&self) -> SchemaVersion {
        SchemaVersion::new(2, 0, 0)
    }

    fn to_version(&self) -> SchemaVersion {
        SchemaVersion::new(2, 1, 0)
    }

    fn apply(&self, doc: &mut Map<String, JsonValue>, log: &mut FillLog) {
        with_object(doc, keys::BRANDING, &FieldPath::root(), log, empty_object, |branding, path, log| {
            with_object(
                branding,
                keys::FOOTER_LINK,
                path,
                log,
                defaults::default_footer_link,
                |link, path, log| {
                    ensure_value(link, keys::STYLE, path, log, || json!("floating"));
                    ensure_shaped(
                        link,
                        keys::FLOATING_STYLE,
                        path,
                        log,
                        defaults::default_floating_style,
                        JsonValue::is_object,
                    );
                    ensure_shaped(
                        link,
                        keys::INLINE_STYLE,
                        path,
                        log,
                        defaults::default_inline_style,
                        JsonValue::is_object,
                    );
                },
            );
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

    fn run(input: JsonValue) -> JsonValue {
        let JsonValue::Object(mut doc) = input else {
            panic!("expected object");
        };
        V2ToV21.apply(&mut doc, &mut FillLog::new());
        JsonValue::Object(doc)
    }

    #[test]
    fn missing_link_is_created_complete() {
        let doc = run(json!({"version": "2.0.0"}));
        assert_eq!(doc["branding"]["footerLink"], defaults::default_footer_link());
    }

    #[test]
    fn existing_link_becomes_floating() {
        let doc = run(json!({
            "branding": {"footerLink": {"enabled": true, "text": "Settings"}}
        }));
        let link = &doc["branding"]["footerLink"];
        assert_eq!(link["text"], json!("Settings"));
        assert_eq!(link["enabled"], json!(true));
        assert_eq!(link["style"], json!("floating"));
        assert_eq!(link["floatingStyle"], defaults::default_floating_style());
        assert_eq!(link["inlineStyle"], defaults::default_inline_style());
    }

    #[test]
    fn sub_records_fill_independently() {
        let doc = run(json!({
            "branding": {"footerLink": {
                "enabled": false,
                "style": "inline",
                "inlineStyle": {"linkType": "underline", "showIcon": true, "showLogo": false}
            }}
        }));
        let link = &doc["branding"]["footerLink"];
        assert_eq!(link["enabled"], json!(false));
        assert_eq!(link["style"], json!("inline"));
        assert_eq!(link["inlineStyle"]["linkType"], json!("underline"));
        assert_eq!(link["floatingStyle"], defaults::default_floating_style());
    }

    #[test]
    fn other_branding_fields_are_untouched() {
        let doc = run(json!({
            "branding": {"logo": {"url": "https://example.com/logo.svg"}, "footerLink": {"style": "floating"}}
        }));
        assert_eq!(
            doc["branding"]["logo"],
            json!({"url": "https://example.com/logo.svg"})
        );
        assert!(doc["branding"]["footerLink"].get("text").is_none());
    }
}
