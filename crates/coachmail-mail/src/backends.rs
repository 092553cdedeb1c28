//! Mail backends.
//!
//! - [`ConsoleBackend`] - prints messages to stdout (development)
//! - [`FileBackend`] - writes one `.eml` file per message
//! - [`InMemoryBackend`] - collects messages for inspection in tests

use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;

use coachmail_core::error::{CoachmailError, CoachmailResult};
use coachmail_core::settings::EmailSettings;

use crate::message::EmailMessage;

/// Delivers email messages.
///
/// Backends are shared between tasks, hence `Send + Sync`.
#[async_trait]
pub trait EmailBackend: Send + Sync {
    /// Sends a single message.
    async fn send(&self, message: &EmailMessage) -> CoachmailResult<()>;

    /// Sends several messages, returning how many were delivered.
    async fn send_many(&self, messages: &[EmailMessage]) -> CoachmailResult<usize> {
        let mut count = 0;
        for message in messages {
            match self.send(message).await {
                Ok(()) => count += 1,
                Err(e) => tracing::warn!(subject = %message.subject, error = %e, "Message not sent"),
            }
        }
        Ok(count)
    }
}

/// Prints each message to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleBackend;

#[async_trait]
impl EmailBackend for ConsoleBackend {
    async fn send(&self, message: &EmailMessage) -> CoachmailResult<()> {
        message.validate()?;

        let separator = "-".repeat(60);
        let formatted = message.format_message();

        tokio::task::spawn_blocking(move || {
            println!("{separator}");
            print!("{formatted}");
            println!("{separator}");
        })
        .await
        .map_err(|e| CoachmailError::MailError(e.to_string()))?;

        Ok(())
    }
}

/// Writes each message to its own file in a directory.
///
/// Files are named `<UTC timestamp with microseconds>-<sequence>.eml` and
/// created with `create_new`, so a name already taken (by another backend
/// or another process sharing the directory) is skipped, never overwritten.
#[derive(Debug, Clone)]
pub struct FileBackend {
    /// Output directory, created on first send.
    pub dir: PathBuf,
    sequence: Arc<AtomicU64>,
}

impl FileBackend {
    /// Creates a file backend writing to `dir`.
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            sequence: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Writes `content` to the first free `<timestamp>-<seq>.eml` name.
    async fn write_unique(&self, timestamp: &str, content: &str) -> CoachmailResult<PathBuf> {
        loop {
            let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
            let path = self.dir.join(format!("{timestamp}-{seq:05}.eml"));
            let mut file = match OpenOptions::new().write(true).create_new(true).open(&path).await {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            };
            file.write_all(content.as_bytes()).await?;
            file.flush().await?;
            return Ok(path);
        }
    }
}

#[async_trait]
impl EmailBackend for FileBackend {
    async fn send(&self, message: &EmailMessage) -> CoachmailResult<()> {
        message.validate()?;
        tokio::fs::create_dir_all(&self.dir).await?;

        let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S_%f").to_string();
        let path = self.write_unique(&timestamp, &message.format_message()).await?;
        tracing::debug!(path = %path.display(), "Email written");
        Ok(())
    }
}

/// Collects messages in memory.
///
/// Clones share the same outbox, so a test can keep one handle and give
/// another to the code under test.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBackend {
    messages: Arc<RwLock<Vec<EmailMessage>>>,
}

impl InMemoryBackend {
    /// Creates an empty in-memory backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of all sent messages.
    pub async fn get_messages(&self) -> Vec<EmailMessage> {
        self.messages.read().await.clone()
    }

    /// Returns the number of sent messages.
    pub async fn message_count(&self) -> usize {
        self.messages.read().await.len()
    }

    /// Clears the outbox.
    pub async fn clear(&self) {
        self.messages.write().await.clear();
    }
}

#[async_trait]
impl EmailBackend for InMemoryBackend {
    async fn send(&self, message: &EmailMessage) -> CoachmailResult<()> {
        message.validate()?;
        self.messages.write().await.push(message.clone());
        Ok(())
    }
}

/// Builds the backend named in `settings.backend`.
///
/// # Errors
///
/// Returns `ConfigurationError` for an unknown backend name.
pub fn backend_from_settings(settings: &EmailSettings) -> CoachmailResult<Arc<dyn EmailBackend>> {
    match settings.backend.as_str() {
        "console" => Ok(Arc::new(ConsoleBackend)),
        "file" => Ok(Arc::new(FileBackend::new(settings.file_path.clone()))),
        "memory" | "locmem" => Ok(Arc::new(InMemoryBackend::new())),
        other => Err(CoachmailError::ConfigurationError(format!(
            "Unknown email backend '{other}' (expected console, file or memory)"
        ))),
    }
}
