//! Integration tests for the engine: named lookup order, built-in templates,
//! subjects, and concurrent rendering from a shared engine.

use std::sync::Arc;
use std::thread;

use coachmail_core::error::CoachmailError;
use coachmail_core::settings::Settings;
use coachmail_template::loaders::FileSystemLoader;
use coachmail_template::{Data, Engine, Value};

fn fee_data() -> Data {
    Data::new()
        .with("name", "Mrs. Sharma")
        .with("student_name", "Ravi")
        .with("amount", 4500)
        .with("due_date", "2024-07-10")
        .with("overdue", true)
        .with(
            "items",
            Value::List(vec![
                Value::from(Data::new().with("description", "Tuition").with("amount", 4000)),
                Value::from(Data::new().with("description", "Study material").with("amount", 500)),
            ]),
        )
}

#[test]
fn test_builtin_fee_reminder() {
    let engine = Engine::new();
    let html = engine.render_named("fee_reminder", &fee_data()).unwrap();

    assert!(html.contains("Dear Mrs. Sharma,"));
    assert!(html.contains("₹4500 is due for Ravi on 2024-07-10."));
    assert!(html.contains("<strong>This payment is overdue.</strong>"));
    assert!(html.contains("<tr><td>Tuition</td><td>4000</td></tr>"));
    assert!(html.contains("<tr><td>Study material</td><td>500</td></tr>"));
    assert!(html.contains("Please pay at the front office."));
    assert!(!html.contains("{{"));
}

#[test]
fn test_builtin_fee_reminder_subject() {
    let engine = Engine::new();
    assert_eq!(
        engine.subject_for("fee_reminder", &fee_data()).unwrap(),
        "Overdue: Fee reminder for Ravi - ₹4500"
    );
}

#[test]
fn test_builtin_footer_phone_block() {
    let engine = Engine::new();
    let without = engine.render_named("announcement", &Data::new()).unwrap();
    assert!(!without.contains("&middot;"));

    let with = engine
        .render_named("announcement", &Data::new().with("support_phone", "+91 98765 43210"))
        .unwrap();
    assert!(with.contains("Coaching Center &middot; +91 98765 43210"));
}

#[test]
fn test_every_builtin_renders_with_empty_data() {
    let engine = Engine::new();
    for name in engine.template_names() {
        let html = engine.render_named(&name, &Data::new()).unwrap();
        assert!(html.starts_with("<html>"), "{name}");
        assert!(!html.contains("{{"), "{name}");
        let subject = engine.subject_for(&name, &Data::new()).unwrap();
        assert!(!subject.contains("{{"), "{name}");
    }
}

#[test]
fn test_exam_result_branches() {
    let engine = Engine::new();
    let passed = Data::new()
        .with("exam_name", "Unit Test 3")
        .with("marks_obtained", 86)
        .with("total_marks", 100)
        .with("passed", true);
    let html = engine.render_named("exam_result", &passed).unwrap();
    assert!(html.contains("You scored <strong>86/100</strong>."));
    assert!(html.contains("Congratulations"));
    assert!(!html.contains("re-attempt"));

    let failed = passed.clone().with("passed", false).with("student_name", "Ravi");
    let html = engine.render_named("exam_result", &failed).unwrap();
    assert!(html.contains("Ravi scored"));
    assert!(html.contains("re-attempt"));
}

#[test]
fn test_file_templates_take_precedence() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("fee_reminder.html"), "Custom reminder for {{name}}").unwrap();
    std::fs::write(dir.path().join("fee_reminder.subject"), "Pay {{currency}}{{amount}}").unwrap();

    let mut settings = Settings::default();
    settings.templates.dirs = vec![dir.path().to_path_buf()];
    let engine = Engine::from_settings(&settings);

    let data = Data::new().with("name", "Ravi").with("amount", 10);
    assert_eq!(
        engine.render_named("fee_reminder", &data).unwrap(),
        "Custom reminder for Ravi"
    );
    assert_eq!(engine.subject_for("fee_reminder", &data).unwrap(), "Pay ₹10");
}

#[test]
fn test_missing_everywhere_is_template_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = Engine::new();
    engine.add_loader(Box::new(FileSystemLoader::new(vec![dir.path().to_path_buf()], "html")));

    let err = engine.render_named("graduation", &Data::new()).unwrap_err();
    assert!(matches!(err, CoachmailError::TemplateNotFound(_)));
    assert_eq!(err.to_string(), "Template not found: graduation");
}

#[test]
fn test_unreadable_file_is_a_load_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("welcome.html"), [0xff, 0xfe, 0x00]).unwrap();

    let mut engine = Engine::new();
    engine.add_loader(Box::new(FileSystemLoader::new(vec![dir.path().to_path_buf()], "html")));

    let err = engine.render_named("welcome", &Data::new()).unwrap_err();
    assert!(matches!(err, CoachmailError::TemplateLoad(_)));
    assert!(err.is_recoverable());
}

#[test]
fn test_concurrent_renders_share_one_engine() {
    let engine = Arc::new(Engine::new());
    engine.add_template("balance", "{{name}}:{{currency}}{{amount}}");

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                (0..50)
                    .map(|j| {
                        let data = Data::new().with("name", format!("s{i}")).with("amount", j);
                        engine.render_named("balance", &data).unwrap()
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let outputs = handle.join().unwrap();
        for (j, out) in outputs.iter().enumerate() {
            assert_eq!(out, &format!("s{i}:₹{j}"));
        }
    }
}

#[test]
fn test_engine_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Engine>();
}
