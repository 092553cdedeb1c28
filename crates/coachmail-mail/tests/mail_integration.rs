//! Integration tests for templated sending.
//!
//! Tests cover: settings-driven mailer construction, built-in templates
//! through the in-memory and file backends, and bulk fan-out with mixed
//! failures.

use std::sync::Arc;

use coachmail_core::error::CoachmailError;
use coachmail_core::settings::Settings;
use coachmail_mail::{
    EmailBackend, EmailMessage, FileBackend, InMemoryBackend, Mailer, Recipient, TemplatedEmail,
};
use coachmail_template::{Data, Engine, Value};

fn fee_data(name: &str, amount: i64, overdue: bool) -> Data {
    Data::new()
        .with("name", name)
        .with("student_name", format!("{name} Jr."))
        .with("amount", amount)
        .with("overdue", overdue)
}

// ═════════════════════════════════════════════════════════════════════
// 1. Single templated send
// ═════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_fee_reminder_through_memory_backend() {
    let backend = InMemoryBackend::new();
    let mailer = Mailer::new(
        Arc::new(Engine::new()),
        Arc::new(backend.clone()),
        "accounts@coachingcenter.example",
    );

    let email = TemplatedEmail::new("fee_reminder", "parent@example.com", fee_data("Ravi", 500, true));
    mailer.send_templated(&email).await.unwrap();

    let messages = backend.get_messages().await;
    assert_eq!(messages.len(), 1);
    let message = &messages[0];
    assert_eq!(message.subject, "Overdue: Fee reminder for Ravi Jr. - ₹500");
    assert!(message.html.contains("<strong>This payment is overdue.</strong>"));

    let text = message.text.as_deref().unwrap();
    assert!(text.contains("This payment is overdue."));
    assert!(!text.contains('<'));
    assert!(!text.contains("{{"));
}

#[tokio::test]
async fn test_welcome_subject_uses_branding() {
    let mut settings = Settings::default();
    settings.email.backend = "memory".to_string();
    settings.branding.company_name = "Bright Minds".to_string();
    let mailer = Mailer::from_settings(&settings).unwrap();

    let email = TemplatedEmail::new("welcome", "new@example.com", Data::new().with("name", "Asha"));
    let message = mailer.build_message(&email).unwrap();
    assert_eq!(message.subject, "Welcome to Bright Minds, Asha!");
    assert_eq!(message.from_email, settings.email.from_email);
}

#[test]
fn test_unknown_backend_is_a_configuration_error() {
    let mut settings = Settings::default();
    settings.email.backend = "pigeon".to_string();
    let err = Mailer::from_settings(&settings).unwrap_err();
    assert!(matches!(err, CoachmailError::ConfigurationError(_)));
}

// ═════════════════════════════════════════════════════════════════════
// 2. Bulk fan-out
// ═════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_bulk_fee_reminders_to_files() {
    let dir = tempfile::tempdir().unwrap();
    let mailer = Mailer::new(
        Arc::new(Engine::new()),
        Arc::new(FileBackend::new(dir.path().to_path_buf())),
        "accounts@coachingcenter.example",
    );

    let recipients: Vec<Recipient> = [("Ravi", 500), ("Meera", 1200), ("Kabir", 0)]
        .into_iter()
        .map(|(name, amount)| {
            Recipient::new(
                format!("{}@example.com", name.to_lowercase()),
                fee_data(name, amount, amount > 1000),
            )
        })
        .collect();

    let report = mailer.send_bulk("fee_reminder", &recipients).await.unwrap();
    assert_eq!(report.sent, 3);
    assert!(report.is_complete());

    let mut files = Vec::new();
    let mut entries = tokio::fs::read_dir(dir.path()).await.unwrap();
    while let Some(entry) = entries.next_entry().await.unwrap() {
        files.push(tokio::fs::read_to_string(entry.path()).await.unwrap());
    }
    assert_eq!(files.len(), 3);
    assert!(files.iter().any(|f| f.contains("To: meera@example.com") && f.contains("Overdue:")));
    assert!(files.iter().any(|f| f.contains("To: ravi@example.com") && !f.contains("Overdue:")));
}

#[tokio::test]
async fn test_bulk_continues_past_recoverable_failures() {
    let backend = InMemoryBackend::new();
    let engine = Engine::new();
    engine.add_template("notice", "<p>{{message}}</p>");
    let mailer = Mailer::new(Arc::new(engine), Arc::new(backend.clone()), "office@example.com");

    let recipients = vec![
        Recipient::new("one@example.com", Data::new().with("message", "Holiday on Friday")),
        Recipient::new("", Data::new()),
        Recipient::new("three@example.com", Data::new().with("message", Value::Null)),
    ];
    let report = mailer.send_bulk("notice", &recipients).await.unwrap();

    assert_eq!(report.sent, 2);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].to, "");

    let messages = backend.get_messages().await;
    assert_eq!(messages[0].html, "<p>Holiday on Friday</p>");
    assert_eq!(messages[1].html, "<p></p>");
    assert_eq!(messages[1].subject, "Notice");
}

struct BrokenBackend;

#[async_trait::async_trait]
impl EmailBackend for BrokenBackend {
    async fn send(&self, _message: &EmailMessage) -> coachmail_core::CoachmailResult<()> {
        Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "outbox is read-only").into())
    }
}

#[tokio::test]
async fn test_bulk_aborts_on_unrecoverable_failure() {
    let mailer = Mailer::new(Arc::new(Engine::new()), Arc::new(BrokenBackend), "office@example.com");
    let recipients = vec![
        Recipient::new("one@example.com", Data::new()),
        Recipient::new("two@example.com", Data::new()),
    ];
    let err = mailer.send_bulk("announcement", &recipients).await.unwrap_err();
    assert!(matches!(err, CoachmailError::IoError(_)));
}
