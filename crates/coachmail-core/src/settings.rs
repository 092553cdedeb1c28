//! Settings for coachmail.
//!
//! [`Settings`] groups the branding values that seed every template's default
//! context, the template search configuration, and the mail backend choice.
//! Settings are plain values passed to the components that need them; there
//! is no process-wide settings object.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Organisation details merged under every render's data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrandingSettings {
    /// The coaching center's display name.
    pub company_name: String,
    /// Address students and parents can write to for help.
    pub support_email: String,
    /// Support phone number, shown in footers when non-empty.
    pub support_phone: String,
    /// Public URL of the portal, used for login and dashboard links.
    pub website_url: String,
    /// Currency symbol prefixed to fee amounts.
    pub currency_symbol: String,
    /// Default phrasing for link expiry (password resets, verification).
    pub default_expires_in: String,
}

impl Default for BrandingSettings {
    fn default() -> Self {
        Self {
            company_name: "Coaching Center".to_string(),
            support_email: "support@coachingcenter.example".to_string(),
            support_phone: String::new(),
            website_url: "https://coachingcenter.example".to_string(),
            currency_symbol: "₹".to_string(),
            default_expires_in: "24 hours".to_string(),
        }
    }
}

/// Where template files are looked up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateSettings {
    /// Directories searched in order before the built-in templates.
    pub dirs: Vec<PathBuf>,
    /// File extension tried when a name has none (without the dot).
    pub extension: String,
}

impl Default for TemplateSettings {
    fn default() -> Self {
        Self {
            dirs: Vec::new(),
            extension: "html".to_string(),
        }
    }
}

/// Mail transport configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailSettings {
    /// The backend name: `console`, `file`, or `memory`.
    pub backend: String,
    /// The sender address used when a message does not set one.
    pub from_email: String,
    /// Output directory for the `file` backend.
    pub file_path: PathBuf,
}

impl Default for EmailSettings {
    fn default() -> Self {
        Self {
            backend: "console".to_string(),
            from_email: "noreply@coachingcenter.example".to_string(),
            file_path: PathBuf::from("sent-mail"),
        }
    }
}

/// The complete set of coachmail settings.
///
/// # Examples
///
/// ```
/// use coachmail_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert!(!settings.debug);
/// assert_eq!(settings.branding.currency_symbol, "₹");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Whether debug mode is enabled (pretty logs instead of JSON).
    pub debug: bool,
    /// Tracing filter directive, e.g. `info` or `coachmail_template=debug`.
    pub log_level: String,
    /// Organisation details for the default context.
    pub branding: BrandingSettings,
    /// Template search configuration.
    pub templates: TemplateSettings,
    /// Mail transport configuration.
    pub email: EmailSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: false,
            log_level: "info".to_string(),
            branding: BrandingSettings::default(),
            templates: TemplateSettings::default(),
            email: EmailSettings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert!(!settings.debug);
        assert_eq!(settings.log_level, "info");
        assert_eq!(settings.email.backend, "console");
        assert!(settings.templates.dirs.is_empty());
        assert_eq!(settings.templates.extension, "html");
    }

    #[test]
    fn test_default_branding() {
        let branding = BrandingSettings::default();
        assert_eq!(branding.currency_symbol, "₹");
        assert_eq!(branding.default_expires_in, "24 hours");
        assert!(branding.support_phone.is_empty());
    }

    #[test]
    fn test_settings_serde_roundtrip_keeps_nested_tables() {
        let mut settings = Settings::default();
        settings.branding.company_name = "Bright Minds".to_string();
        let json = serde_json::to_value(&settings).unwrap();
        assert_eq!(json["branding"]["company_name"], "Bright Minds");
        assert_eq!(json["email"]["backend"], "console");
    }

    #[test]
    fn test_partial_toml_deserializes_directly() {
        let settings: Settings = toml::from_str(
            "debug = true\n[branding]\ncompany_name = \"Bright Minds\"\n[email]\nbackend = \"file\"\n",
        )
        .unwrap();
        assert!(settings.debug);
        assert_eq!(settings.log_level, "info");
        assert_eq!(settings.branding.company_name, "Bright Minds");
        assert_eq!(settings.branding.currency_symbol, "₹");
        assert_eq!(settings.email.backend, "file");
        assert_eq!(settings.email.from_email, EmailSettings::default().from_email);
        assert_eq!(settings.templates, TemplateSettings::default());
    }
}
