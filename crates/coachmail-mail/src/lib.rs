//! # coachmail-mail
//!
//! Delivery side of coachmail. Builds [`EmailMessage`]s from named templates
//! and hands them to a pluggable [`EmailBackend`].
//!
//! ## Modules
//!
//! - [`message`] - Messages and attachments
//! - [`backends`] - Console, file and in-memory backends
//! - [`mailer`] - Templated and bulk sending

pub mod backends;
pub mod mailer;
pub mod message;

pub use backends::{backend_from_settings, ConsoleBackend, EmailBackend, FileBackend, InMemoryBackend};
pub use mailer::{BulkFailure, BulkReport, Mailer, Recipient, TemplatedEmail};
pub use message::{Attachment, EmailMessage};
