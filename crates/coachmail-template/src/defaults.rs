//! Default context.
//!
//! Every render through the [`Engine`](crate::engine::Engine) sees these keys
//! unless the caller supplies the same key. They cover the organisation
//! details every mail footer needs and the current date.

use chrono::{DateTime, Datelike, Local, TimeZone};
use coachmail_core::settings::BrandingSettings;

use crate::context::Data;

/// Values merged underneath caller data on every engine render.
///
/// # Examples
///
/// ```
/// use coachmail_core::settings::BrandingSettings;
/// use coachmail_template::defaults::DefaultContext;
///
/// let defaults = DefaultContext::from_branding(&BrandingSettings::default());
/// let data = defaults.to_data();
/// assert_eq!(data.get("currency").unwrap().to_display_string(), "₹");
/// assert!(data.get("current_year").is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultContext {
    /// `company_name`
    pub company_name: String,
    /// `support_email`
    pub support_email: String,
    /// `support_phone`
    pub support_phone: String,
    /// `website_url`
    pub website_url: String,
    /// `currency`
    pub currency: String,
    /// `expires_in`
    pub expires_in: String,
}

impl DefaultContext {
    /// Builds the default context from branding settings.
    pub fn from_branding(branding: &BrandingSettings) -> Self {
        Self {
            company_name: branding.company_name.clone(),
            support_email: branding.support_email.clone(),
            support_phone: branding.support_phone.clone(),
            website_url: branding.website_url.clone(),
            currency: branding.currency_symbol.clone(),
            expires_in: branding.default_expires_in.clone(),
        }
    }

    /// Produces the default data as of `now`.
    ///
    /// Adds `current_year`, `current_date` (`YYYY-MM-DD`) and
    /// `current_datetime` (RFC 3339) to the branding keys.
    pub fn to_data_at<Tz>(&self, now: &DateTime<Tz>) -> Data
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        Data::new()
            .with("company_name", self.company_name.as_str())
            .with("support_email", self.support_email.as_str())
            .with("support_phone", self.support_phone.as_str())
            .with("website_url", self.website_url.as_str())
            .with("currency", self.currency.as_str())
            .with("expires_in", self.expires_in.as_str())
            .with("current_year", now.year())
            .with("current_date", now.format("%Y-%m-%d").to_string())
            .with("current_datetime", now.to_rfc3339())
    }

    /// Produces the default data for the current local time.
    pub fn to_data(&self) -> Data {
        self.to_data_at(&Local::now())
    }
}

impl Default for DefaultContext {
    fn default() -> Self {
        Self::from_branding(&BrandingSettings::default())
    }
}
