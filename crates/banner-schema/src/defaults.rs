//! Default sections for banner documents
//!
//! Every factory returns a freshly built value, so callers may mutate the
//! result without affecting any other document.

use serde_json::{json, Map, Value as JsonValue};

use crate::model::keys;
use crate::version::CURRENT_BANNER_VERSION;

/// Id of the session script seeded into `scripts.strictlyNecessary`
pub const SESSION_SCRIPT_ID: &str = "default-session-management";

/// Label of the re-open link
pub const FOOTER_LINK_TEXT: &str = "Cookie Settings";

const SESSION_SCRIPT_CODE: &str = r"<script>
  if (!sessionStorage.getItem('cookie_session_id')) {
    sessionStorage.setItem('cookie_session_id', Date.now().toString(36) + Math.random().toString(36).slice(2));
  }
</script>";

/// PIPEDA with implied consent
#[must_use]
pub fn default_compliance() -> JsonValue {
    json!({
        "framework": "pipeda",
        "requireExplicitConsent": false,
        "requireOptIn": false,
        "requireGranularConsent": false,
        "requirePrivacyPolicy": true,
        "requireDataRetention": false,
        "penalties": "Up to $100,000 CAD per violation",
        "consentExpiry": 24
    })
}

#[must_use]
pub fn default_language() -> JsonValue {
    json!("auto")
}

#[must_use]
pub fn default_colors() -> JsonValue {
    json!({
        "background": "#ffffff",
        "text": "#1f2937",
        "primary": "#2563eb",
        "primaryText": "#ffffff",
        "secondary": "#e5e7eb",
        "secondaryText": "#1f2937",
        "link": "#2563eb"
    })
}

#[must_use]
pub fn default_text() -> JsonValue {
    json!({
        "title": "We value your privacy",
        "description": "We use cookies to enhance your browsing experience, serve personalized content, and analyze our traffic.",
        "acceptButton": "Accept All",
        "rejectButton": "Reject All",
        "preferencesButton": "Manage Preferences",
        "savePreferencesButton": "Save Preferences"
    })
}

#[must_use]
pub fn default_behavior() -> JsonValue {
    json!({
        "autoShow": true,
        "showPreferences": true,
        "showRejectButton": true,
        "dismissOnScroll": false,
        "reloadOnConsent": false,
        "cookieExpiryDays": 365
    })
}

#[must_use]
pub fn default_layout() -> JsonValue {
    json!({
        "position": "bottom",
        "style": "bar",
        "maxWidth": "100%",
        "borderRadius": 8,
        "shadow": true,
        "animation": "slide"
    })
}

#[must_use]
pub fn default_logo() -> JsonValue {
    json!({
        "enabled": false,
        "url": "",
        "altText": "",
        "position": "left"
    })
}

#[must_use]
pub fn default_privacy_policy() -> JsonValue {
    json!({
        "enabled": true,
        "url": "",
        "text": "Privacy Policy"
    })
}

/// Footer link as introduced in 2.0.0, before render styles existed
#[must_use]
pub fn default_footer_link_basic() -> JsonValue {
    json!({
        "enabled": true,
        "text": FOOTER_LINK_TEXT,
        "position": "bottom-left"
    })
}

#[must_use]
pub fn default_floating_style() -> JsonValue {
    json!({
        "shape": "pill",
        "size": "small",
        "showText": true,
        "useCustomColors": false
    })
}

#[must_use]
pub fn default_inline_style() -> JsonValue {
    json!({
        "linkType": "plain",
        "showIcon": false,
        "showLogo": false
    })
}

/// Footer link with every 2.1.0 render option
#[must_use]
pub fn default_footer_link() -> JsonValue {
    let mut link = default_footer_link_basic();
    if let Some(map) = link.as_object_mut() {
        map.insert(keys::STYLE.into(), json!("floating"));
        map.insert(keys::FLOATING_STYLE.into(), default_floating_style());
        map.insert(keys::INLINE_STYLE.into(), default_inline_style());
    }
    link
}

#[must_use]
pub fn default_branding() -> JsonValue {
    json!({
        "logo": default_logo(),
        "privacyPolicy": default_privacy_policy(),
        "footerLink": default_footer_link()
    })
}

/// The strictly-necessary script every banner starts with
#[must_use]
pub fn default_session_script() -> JsonValue {
    json!({
        "id": SESSION_SCRIPT_ID,
        "name": "Session Management",
        "category": "strictlyNecessary",
        "scriptCode": SESSION_SCRIPT_CODE,
        "enabled": true
    })
}

#[must_use]
pub fn default_strictly_necessary() -> JsonValue {
    json!([default_session_script()])
}

#[must_use]
pub fn default_scripts() -> JsonValue {
    json!({
        "strictlyNecessary": default_strictly_necessary(),
        "functionality": [],
        "trackingPerformance": [],
        "targetingAdvertising": []
    })
}

#[must_use]
pub fn default_performance() -> JsonValue {
    json!({
        "deferNonCriticalScripts": true,
        "useRequestIdleCallback": true,
        "lazyLoadAnalytics": true,
        "inlineCriticalCSS": true
    })
}

#[must_use]
pub fn default_advanced() -> JsonValue {
    json!({
        "consentMode": true,
        "customCSS": "",
        "customJS": "",
        "performance": default_performance()
    })
}

#[must_use]
pub fn default_google_analytics() -> JsonValue {
    json!({
        "enabled": false,
        "measurementId": "",
        "trackConsentEvents": true,
        "trackBannerImpressions": true,
        "anonymizeIp": true
    })
}

#[must_use]
pub fn default_integrations() -> JsonValue {
    json!({ "googleAnalytics": default_google_analytics() })
}

/// A complete current-version document, without `lastUpdated`
#[must_use]
pub fn default_banner_config() -> Map<String, JsonValue> {
    let mut doc = Map::new();
    doc.insert(keys::VERSION.into(), json!(CURRENT_BANNER_VERSION));
    doc.insert(keys::COMPLIANCE.into(), default_compliance());
    doc.insert(keys::LANGUAGE.into(), default_language());
    doc.insert(keys::COLORS.into(), default_colors());
    doc.insert(keys::TEXT.into(), default_text());
    doc.insert(keys::BEHAVIOR.into(), default_behavior());
    doc.insert(keys::BRANDING.into(), default_branding());
    doc.insert(keys::LAYOUT.into(), default_layout());
    doc.insert(keys::SCRIPTS.into(), default_scripts());
    doc.insert(keys::ADVANCED.into(), default_advanced());
    doc.insert(keys::INTEGRATIONS.into(), default_integrations());
    doc
}

/// Default for one of the presentation sections, by top-level key
#[must_use]
pub fn default_section(key: &str) -> Option<JsonValue> {
    let value = match key {
        keys::COLORS => default_colors(),
        keys::TEXT => default_text(),
        keys::BEHAVIOR => default_behavior(),
        keys::BRANDING => default_branding(),
        keys::LAYOUT => default_layout(),
        keys::SCRIPTS => default_scripts(),
        keys::ADVANCED => default_advanced(),
        _ => return None,
    };
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Advanced, Behavior, Branding, Compliance, ComplianceFramework, FooterLinkStyle,
        Integrations, Layout, ScriptCategory, Scripts,
    };

    #[test]
    fn factories_match_typed_views() {
        let compliance: Compliance = serde_json::from_value(default_compliance()).unwrap();
        assert_eq!(compliance.framework, ComplianceFramework::Pipeda);
        assert!(compliance.require_privacy_policy);
        assert!(!compliance.require_explicit_consent);
        assert_eq!(compliance.consent_expiry, 24);

        let branding: Branding = serde_json::from_value(default_branding()).unwrap();
        assert_eq!(branding.footer_link.style, FooterLinkStyle::Floating);
        assert_eq!(branding.footer_link.position, "bottom-left");
        assert_eq!(branding.footer_link.floating_style.shape, "pill");
        assert_eq!(branding.footer_link.inline_style.link_type, "plain");

        let scripts: Scripts = serde_json::from_value(default_scripts()).unwrap();
        assert_eq!(scripts.len(), 1);
        assert_eq!(
            scripts.strictly_necessary[0].category,
            ScriptCategory::StrictlyNecessary
        );

        let advanced: Advanced = serde_json::from_value(default_advanced()).unwrap();
        assert!(advanced.consent_mode);
        assert!(advanced.performance.inline_critical_css);

        let integrations: Integrations =
            serde_json::from_value(default_integrations()).unwrap();
        assert!(!integrations.google_analytics.enabled);
        assert!(integrations.google_analytics.anonymize_ip);

        let behavior: Behavior = serde_json::from_value(default_behavior()).unwrap();
        assert!(behavior.show_preferences);
        let _: Layout = serde_json::from_value(default_layout()).unwrap();
    }

    #[test]
    fn factories_return_fresh_values() {
        let mut first = default_footer_link();
        first["text"] = json!("changed");
        assert_eq!(default_footer_link()["text"], json!(FOOTER_LINK_TEXT));
    }

    #[test]
    fn full_default_has_every_section() {
        let doc = default_banner_config();
        for key in keys::REQUIRED_SECTIONS {
            assert!(doc.get(key).is_some_and(JsonValue::is_object), "{key}");
        }
        assert_eq!(doc[keys::VERSION], json!(CURRENT_BANNER_VERSION));
        assert!(!doc.contains_key(keys::LAST_UPDATED));
    }

    #[test]
    fn default_section_covers_presentation_only() {
        assert!(default_section(keys::LAYOUT).is_some());
        assert!(default_section(keys::COMPLIANCE).is_none());
        assert!(default_section("unknown").is_none());
    }
}
