//! Logging integration for coachmail.
//!
//! Provides helpers for configuring [`tracing`]-based logging from
//! [`Settings`](crate::settings::Settings) and for creating per-send spans.

use tracing_subscriber::EnvFilter;

use crate::settings::Settings;

/// Installs the global subscriber, writing to stderr.
///
/// `RUST_LOG` wins over `settings.log_level`; an unparsable level falls back
/// to `info`. Debug mode logs human-readable lines with source locations,
/// otherwise one JSON object per event. Returns `false` when a subscriber
/// was already installed.
pub fn setup_logging(settings: &Settings) -> bool {
    let filter = log_filter(settings);
    let installed = if settings.debug {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_file(true)
            .with_line_number(true)
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_current_span(true)
            .try_init()
    };

    if installed.is_ok() {
        tracing::debug!(level = %settings.log_level, debug = settings.debug, "Logging initialized");
    }
    installed.is_ok()
}

fn log_filter(settings: &Settings) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Creates a tracing span for one templated send.
///
/// # Examples
///
/// ```
/// use coachmail_core::logging::send_span;
///
/// let span = send_span("fee_reminder", "parent@example.com");
/// let _guard = span.enter();
/// tracing::info!("rendering");
/// ```
pub fn send_span(template: &str, recipient: &str) -> tracing::Span {
    tracing::info_span!("send", template = template, to = recipient)
}

#[cfg(test)]
mod tests {
    use super::*;

    use serial_test::serial;

    #[test]
    #[serial]
    fn test_log_filter_from_settings() {
        std::env::remove_var("RUST_LOG");
        let mut settings = Settings::default();
        settings.log_level = "coachmail_mail=debug".to_string();
        assert_eq!(log_filter(&settings).to_string(), "coachmail_mail=debug");

        settings.log_level = "coachmail=loud".to_string();
        assert_eq!(log_filter(&settings).to_string(), "info");
    }

    #[test]
    #[serial]
    fn test_log_filter_prefers_rust_log() {
        std::env::set_var("RUST_LOG", "warn");
        assert_eq!(log_filter(&Settings::default()).to_string(), "warn");
        std::env::remove_var("RUST_LOG");
    }

    #[test]
    #[serial]
    fn test_setup_logging_installs_once() {
        let settings = Settings::default();
        setup_logging(&settings);
        assert!(!setup_logging(&settings));
    }
}
