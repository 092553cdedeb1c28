//! # coachmail-core
//!
//! Core types shared by every coachmail crate: the error enum, settings and
//! their loader, logging setup, and small text helpers.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`settings`] - Branding, template, and email configuration
//! - [`settings_loader`] - TOML loading and environment overrides
//! - [`logging`] - Tracing-based logging integration
//! - [`utils`] - Text helpers used when deriving plain-text mail bodies

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;
pub mod utils;

// Re-export the most commonly used types at the crate root.
pub use error::{CoachmailError, CoachmailResult};
pub use settings::{BrandingSettings, EmailSettings, Settings, TemplateSettings};
