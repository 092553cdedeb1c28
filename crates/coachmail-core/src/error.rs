//! Core error types for coachmail.
//!
//! [`CoachmailError`] covers template lookup, configuration, render-data and
//! transport failures. Rendering itself never fails; only the collaborators
//! around it (template sources, settings files, mail backends) produce errors.

use thiserror::Error;

/// The primary error type for coachmail.
#[derive(Error, Debug)]
pub enum CoachmailError {
    // ── Templates ────────────────────────────────────────────────────

    /// No loader could supply a template with the requested name.
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    /// A template file exists but could not be read.
    #[error("Template load error: {0}")]
    TemplateLoad(String),

    // ── Configuration ────────────────────────────────────────────────

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    // ── Render data ──────────────────────────────────────────────────

    /// Render data could not be turned into a data context.
    #[error("Invalid render data: {0}")]
    InvalidData(String),

    // ── Mail ─────────────────────────────────────────────────────────

    /// The mail transport rejected a message.
    #[error("Mail error: {0}")]
    MailError(String),

    // ── IO ───────────────────────────────────────────────────────────

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl CoachmailError {
    /// Returns `true` if the failure concerns a single message and the
    /// caller can log it and move on to the next one.
    ///
    /// Configuration and I/O errors affect every subsequent send and are
    /// not recoverable.
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::TemplateNotFound(_)
            | Self::TemplateLoad(_)
            | Self::InvalidData(_)
            | Self::MailError(_) => true,
            Self::ConfigurationError(_) | Self::IoError(_) => false,
        }
    }
}

/// A convenience type alias for `Result<T, CoachmailError>`.
pub type CoachmailResult<T> = Result<T, CoachmailError>;
