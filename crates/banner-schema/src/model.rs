//! Typed views over banner document sections
//!
//! A stored [`BannerConfig`](crate::BannerConfig) stays an open JSON object so
//! unknown keys survive migration. These structs are read views: extract one
//! with [`BannerConfig::section`](crate::BannerConfig::section) once a
//! document has been migrated and every section is populated.

use serde::{Deserialize, Serialize};

/// Top-level and nested key names used by the schema
pub mod keys {
    //! JSON key names, shared by the factories and the migration steps

    pub const VERSION: &str = "version";
    pub const LAST_UPDATED: &str = "lastUpdated";
    pub const COMPLIANCE: &str = "compliance";
    pub const LANGUAGE: &str = "language";
    pub const COLORS: &str = "colors";
    pub const TEXT: &str = "text";
    pub const BEHAVIOR: &str = "behavior";
    pub const BRANDING: &str = "branding";
    pub const LAYOUT: &str = "layout";
    pub const SCRIPTS: &str = "scripts";
    pub const ADVANCED: &str = "advanced";
    pub const INTEGRATIONS: &str = "integrations";

    pub const SHOW_PREFERENCES: &str = "showPreferences";

    pub const LOGO: &str = "logo";
    pub const PRIVACY_POLICY: &str = "privacyPolicy";
    pub const FOOTER_LINK: &str = "footerLink";
    pub const STYLE: &str = "style";
    pub const FLOATING_STYLE: &str = "floatingStyle";
    pub const INLINE_STYLE: &str = "inlineStyle";

    pub const STRICTLY_NECESSARY: &str = "strictlyNecessary";
    pub const FUNCTIONALITY: &str = "functionality";
    pub const TRACKING_PERFORMANCE: &str = "trackingPerformance";
    pub const TARGETING_ADVERTISING: &str = "targetingAdvertising";

    /// Script buckets in display order
    pub const SCRIPT_BUCKETS: [&str; 4] = [
        STRICTLY_NECESSARY,
        FUNCTIONALITY,
        TRACKING_PERFORMANCE,
        TARGETING_ADVERTISING,
    ];

    pub const PERFORMANCE: &str = "performance";
    pub const GOOGLE_ANALYTICS: &str = "googleAnalytics";

    /// Sections every migrated document carries
    pub const REQUIRED_SECTIONS: [&str; 8] = [
        COMPLIANCE, COLORS, TEXT, BEHAVIOR, BRANDING, LAYOUT, SCRIPTS, ADVANCED,
    ];
}

/// Privacy regime the banner is configured for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplianceFramework {
    /// EU General Data Protection Regulation
    Gdpr,
    /// Canadian Personal Information Protection and Electronic Documents Act
    Pipeda,
    /// Canadian Anti-Spam Legislation
    Casl,
    /// Anything else a customer typed in
    #[serde(other)]
    Other,
}

/// Consent requirements for the selected framework
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Compliance {
    pub framework: ComplianceFramework,
    pub require_explicit_consent: bool,
    pub require_opt_in: bool,
    pub require_granular_consent: bool,
    pub require_privacy_policy: bool,
    pub require_data_retention: bool,
    pub penalties: String,
    /// Months before consent must be collected again
    pub consent_expiry: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Colors {
    pub background: String,
    pub text: String,
    pub primary: String,
    pub primary_text: String,
    pub secondary: String,
    pub secondary_text: String,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BannerText {
    pub title: String,
    pub description: String,
    pub accept_button: String,
    pub reject_button: String,
    pub preferences_button: String,
    pub save_preferences_button: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Behavior {
    pub auto_show: bool,
    pub show_preferences: bool,
    pub show_reject_button: bool,
    pub dismiss_on_scroll: bool,
    pub reload_on_consent: bool,
    pub cookie_expiry_days: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    pub position: String,
    pub style: String,
    pub max_width: String,
    pub border_radius: u32,
    pub shadow: bool,
    pub animation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branding {
    pub logo: Logo,
    pub privacy_policy: PrivacyPolicyLink,
    pub footer_link: FooterLink,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Logo {
    pub enabled: bool,
    pub url: String,
    pub alt_text: String,
    pub position: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivacyPolicyLink {
    pub enabled: bool,
    pub url: String,
    pub text: String,
}

/// How the "Cookie Settings" re-open link is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FooterLinkStyle {
    /// Floating button pinned to a viewport corner
    Floating,
    /// Plain link placed in the site footer
    Inline,
}

/// Persistent link that re-opens the preferences dialog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FooterLink {
    pub enabled: bool,
    pub text: String,
    pub position: String,
    pub style: FooterLinkStyle,
    pub floating_style: FloatingStyle,
    pub inline_style: InlineStyle,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloatingStyle {
    pub shape: String,
    pub size: String,
    pub show_text: bool,
    pub use_custom_colors: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineStyle {
    pub link_type: String,
    pub show_icon: bool,
    pub show_logo: bool,
}

/// Consent category a script belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScriptCategory {
    StrictlyNecessary,
    Functionality,
    TrackingPerformance,
    TargetingAdvertising,
}

impl ScriptCategory {
    /// Bucket key inside `scripts`
    #[must_use]
    pub const fn bucket(self) -> &'static str {
        match self {
            Self::StrictlyNecessary => keys::STRICTLY_NECESSARY,
            Self::Functionality => keys::FUNCTIONALITY,
            Self::TrackingPerformance => keys::TRACKING_PERFORMANCE,
            Self::TargetingAdvertising => keys::TARGETING_ADVERTISING,
        }
    }
}

/// A third-party snippet gated behind a consent category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptEntry {
    pub id: String,
    pub name: String,
    pub category: ScriptCategory,
    pub script_code: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scripts {
    pub strictly_necessary: Vec<ScriptEntry>,
    pub functionality: Vec<ScriptEntry>,
    pub tracking_performance: Vec<ScriptEntry>,
    pub targeting_advertising: Vec<ScriptEntry>,
}

impl Scripts {
    /// Total number of scripts across buckets
    #[must_use]
    pub fn len(&self) -> usize {
        self.strictly_necessary.len()
            + self.functionality.len()
            + self.tracking_performance.len()
            + self.targeting_advertising.len()
    }

    /// Whether every bucket is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Advanced {
    pub consent_mode: bool,
    #[serde(rename = "customCSS")]
    pub custom_css: String,
    #[serde(rename = "customJS")]
    pub custom_js: String,
    pub performance: PerformanceSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSettings {
    pub defer_non_critical_scripts: bool,
    pub use_request_idle_callback: bool,
    pub lazy_load_analytics: bool,
    #[serde(rename = "inlineCriticalCSS")]
    pub inline_critical_css: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Integrations {
    pub google_analytics: GoogleAnalytics,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleAnalytics {
    pub enabled: bool,
    pub measurement_id: String,
    pub track_consent_events: bool,
    pub track_banner_impressions: bool,
    pub anonymize_ip: bool,
}
