//! Email messages.
//!
//! An [`EmailMessage`] is what a backend delivers: recipients, a subject, an
//! HTML body with an optional plain-text alternative, and attachments.

use std::collections::BTreeMap;
use std::fmt::Write;

use coachmail_core::error::{CoachmailError, CoachmailResult};

/// An email attachment, such as a fee receipt PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// The filename presented to the recipient.
    pub filename: String,
    /// The raw content.
    pub content: Vec<u8>,
    /// The MIME type, e.g. `application/pdf`.
    pub mimetype: String,
}

impl Attachment {
    /// Creates a new attachment.
    pub fn new(filename: impl Into<String>, content: Vec<u8>, mimetype: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            content,
            mimetype: mimetype.into(),
        }
    }
}

/// A message ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    /// The subject line.
    pub subject: String,
    /// The sender address.
    pub from_email: String,
    /// Primary recipients.
    pub to: Vec<String>,
    /// Carbon copy recipients.
    pub cc: Vec<String>,
    /// Blind carbon copy recipients.
    pub bcc: Vec<String>,
    /// Reply-to addresses.
    pub reply_to: Vec<String>,
    /// Extra headers, written in key order.
    pub headers: BTreeMap<String, String>,
    /// The HTML body.
    pub html: String,
    /// The plain-text alternative, if any.
    pub text: Option<String>,
    /// File attachments.
    pub attachments: Vec<Attachment>,
}

impl EmailMessage {
    /// Creates a message with the required fields.
    pub fn new(
        subject: impl Into<String>,
        html: impl Into<String>,
        from_email: impl Into<String>,
        to: Vec<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            from_email: from_email.into(),
            to,
            cc: Vec::new(),
            bcc: Vec::new(),
            reply_to: Vec::new(),
            headers: BTreeMap::new(),
            html: html.into(),
            text: None,
            attachments: Vec::new(),
        }
    }

    /// Sets the plain-text alternative.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Adds an attachment.
    #[must_use]
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Adds carbon copy recipients.
    #[must_use]
    pub fn with_cc(mut self, cc: Vec<String>) -> Self {
        self.cc.extend(cc);
        self
    }

    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Returns all recipients (to, cc and bcc).
    pub fn recipients(&self) -> Vec<&str> {
        self.to
            .iter()
            .chain(&self.cc)
            .chain(&self.bcc)
            .map(String::as_str)
            .collect()
    }

    /// Checks that the message can be delivered.
    ///
    /// # Errors
    ///
    /// Returns `MailError` when there is no primary recipient or an address
    /// is obviously malformed.
    pub fn validate(&self) -> CoachmailResult<()> {
        if self.to.is_empty() {
            return Err(CoachmailError::MailError(
                "Email must have at least one recipient".to_string(),
            ));
        }
        if let Some(bad) = self.recipients().into_iter().find(|a| !looks_like_address(a)) {
            return Err(CoachmailError::MailError(format!(
                "Invalid recipient address: '{bad}'"
            )));
        }
        Ok(())
    }

    /// Formats the message as a readable, `.eml`-like document.
    pub fn format_message(&self) -> String {
        let mut output = String::new();
        let _ = writeln!(output, "From: {}", self.from_email);
        let _ = writeln!(output, "To: {}", self.to.join(", "));

        if !self.cc.is_empty() {
            let _ = writeln!(output, "Cc: {}", self.cc.join(", "));
        }
        if !self.bcc.is_empty() {
            let _ = writeln!(output, "Bcc: {}", self.bcc.join(", "));
        }
        if !self.reply_to.is_empty() {
            let _ = writeln!(output, "Reply-To: {}", self.reply_to.join(", "));
        }

        for (key, value) in &self.headers {
            let _ = writeln!(output, "{key}: {value}");
        }

        let _ = writeln!(output, "Subject: {}", self.subject);

        if let Some(text) = &self.text {
            let _ = writeln!(output, "\n--- Text ---\n{text}");
        }
        let _ = writeln!(output, "\n--- HTML ---\n{}", self.html);

        if !self.attachments.is_empty() {
            let _ = writeln!(output, "\n--- Attachments ---");
            for att in &self.attachments {
                let _ = writeln!(
                    output,
                    "  {} ({}, {} bytes)",
                    att.filename,
                    att.mimetype,
                    att.content.len()
                );
            }
        }

        output
    }
}

fn looks_like_address(address: &str) -> bool {
    match address.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !address.contains(char::is_whitespace)
        }
        None => false,
    }
}
