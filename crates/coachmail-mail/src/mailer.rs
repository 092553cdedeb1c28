//! Templated sending.
//!
//! [`Mailer`] joins a template [`Engine`] with an [`EmailBackend`]: it renders
//! the subject and HTML body for a named template, derives the plain-text
//! alternative, and hands the message to the backend. [`Mailer::send_bulk`]
//! is the notification fan-out used for fee reminders, results and
//! announcements; one recipient's failure never stops the rest.

use std::fmt;
use std::sync::Arc;

use tracing::Instrument;

use coachmail_core::error::{CoachmailError, CoachmailResult};
use coachmail_core::logging::send_span;
use coachmail_core::settings::Settings;
use coachmail_core::utils::text::html_to_text;
use coachmail_template::{Data, Engine};

use crate::backends::{backend_from_settings, EmailBackend};
use crate::message::{Attachment, EmailMessage};

/// A request to send one named template.
#[derive(Debug, Clone)]
pub struct TemplatedEmail {
    /// The template name, e.g. `fee_reminder`.
    pub template: String,
    /// Primary recipients.
    pub to: Vec<String>,
    /// Carbon copy recipients.
    pub cc: Vec<String>,
    /// Render data for both subject and body.
    pub data: Data,
    /// Overrides the mailer's sender address.
    pub from_email: Option<String>,
    /// File attachments.
    pub attachments: Vec<Attachment>,
}

impl TemplatedEmail {
    /// Creates a request for one recipient.
    pub fn new(template: impl Into<String>, to: impl Into<String>, data: Data) -> Self {
        Self {
            template: template.into(),
            to: vec![to.into()],
            cc: Vec::new(),
            data,
            from_email: None,
            attachments: Vec::new(),
        }
    }

    /// Adds an attachment.
    #[must_use]
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Sets the sender address.
    #[must_use]
    pub fn with_from(mut self, from_email: impl Into<String>) -> Self {
        self.from_email = Some(from_email.into());
        self
    }
}

/// One recipient of a bulk send and their personal data.
#[derive(Debug, Clone)]
pub struct Recipient {
    /// The recipient address.
    pub to: String,
    /// Render data for this recipient.
    pub data: Data,
}

impl Recipient {
    /// Creates a recipient.
    pub fn new(to: impl Into<String>, data: Data) -> Self {
        Self {
            to: to.into(),
            data,
        }
    }
}

/// A recipient that could not be sent to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkFailure {
    /// The recipient address.
    pub to: String,
    /// Why the send failed.
    pub error: String,
}

/// Outcome of [`Mailer::send_bulk`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkReport {
    /// Messages handed to the backend successfully.
    pub sent: usize,
    /// Recipients skipped after a recoverable failure.
    pub failed: Vec<BulkFailure>,
}

impl BulkReport {
    /// Total recipients attempted.
    pub fn attempted(&self) -> usize {
        self.sent + self.failed.len()
    }

    /// Returns `true` when every recipient was sent to.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

impl fmt::Display for BulkReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} sent, {} failed", self.sent, self.failed.len())
    }
}

/// Renders named templates and sends them through a backend.
#[derive(Clone)]
pub struct Mailer {
    engine: Arc<Engine>,
    backend: Arc<dyn EmailBackend>,
    from_email: String,
}

impl Mailer {
    /// Creates a mailer.
    pub fn new(
        engine: Arc<Engine>,
        backend: Arc<dyn EmailBackend>,
        from_email: impl Into<String>,
    ) -> Self {
        Self {
            engine,
            backend,
            from_email: from_email.into(),
        }
    }

    /// Creates a mailer with the engine and backend described by `settings`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` for an unknown backend name.
    pub fn from_settings(settings: &Settings) -> CoachmailResult<Self> {
        Ok(Self::new(
            Arc::new(Engine::from_settings(settings)),
            backend_from_settings(&settings.email)?,
            settings.email.from_email.clone(),
        ))
    }

    /// Returns the template engine.
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Renders a templated email into a message without sending it.
    ///
    /// # Errors
    ///
    /// Returns `TemplateNotFound` when the template does not exist.
    pub fn build_message(&self, email: &TemplatedEmail) -> CoachmailResult<EmailMessage> {
        let html = self.engine.render_named(&email.template, &email.data)?;
        let subject = self.engine.subject_for(&email.template, &email.data)?;
        let text = html_to_text(&html);
        let from = email
            .from_email
            .clone()
            .unwrap_or_else(|| self.from_email.clone());

        let mut message = EmailMessage::new(subject, html, from, email.to.clone())
            .with_text(text)
            .with_cc(email.cc.clone())
            .with_header("X-Coachmail-Template", email.template.as_str());
        message.attachments.clone_from(&email.attachments);
        Ok(message)
    }

    /// Renders and sends one templated email.
    ///
    /// # Errors
    ///
    /// Returns the lookup error when the template does not exist, or the
    /// backend's error when delivery fails.
    pub async fn send_templated(&self, email: &TemplatedEmail) -> CoachmailResult<()> {
        let span = send_span(&email.template, &email.to.join(", "));
        async {
            let message = self.build_message(email)?;
            self.backend.send(&message).await?;
            tracing::info!(subject = %message.subject, "Email sent");
            Ok::<(), CoachmailError>(())
        }
        .instrument(span)
        .await
    }

    /// Sends `template` to each recipient with their own data.
    ///
    /// Recoverable failures (missing template, invalid address, rejected
    /// message) are logged, recorded in the report and skipped.
    ///
    /// # Errors
    ///
    /// Stops at the first unrecoverable failure, such as the file backend
    /// being unable to write.
    pub async fn send_bulk(
        &self,
        template: &str,
        recipients: &[Recipient],
    ) -> CoachmailResult<BulkReport> {
        let mut report = BulkReport::default();

        for recipient in recipients {
            let email = TemplatedEmail::new(template, recipient.to.as_str(), recipient.data.clone());
            match self.send_templated(&email).await {
                Ok(()) => report.sent += 1,
                Err(e) if e.is_recoverable() => {
                    tracing::warn!(template, to = %recipient.to, error = %e, "Skipping recipient");
                    report.failed.push(BulkFailure {
                        to: recipient.to.clone(),
                        error: e.to_string(),
                    });
                }
                Err(e) => {
                    tracing::error!(template, to = %recipient.to, error = %e, "Aborting bulk send");
                    return Err(e);
                }
            }
        }

        tracing::info!(template, sent = report.sent, failed = report.failed.len(), "Bulk send finished");
        Ok(report)
    }
}

impl fmt::Debug for Mailer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mailer")
            .field("engine", &self.engine)
            .field("from_email", &self.from_email)
            .finish_non_exhaustive()
    }
}
