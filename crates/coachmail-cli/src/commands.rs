//! Subcommand handlers.

use std::io::Write;
use std::path::Path;

use coachmail_core::error::{CoachmailError, CoachmailResult};
use coachmail_core::settings::Settings;
use coachmail_core::settings_loader;
use coachmail_core::utils::text::html_to_text;
use coachmail_mail::{Mailer, TemplatedEmail};
use coachmail_template::{Data, Engine, Value};

use crate::cli::{Cli, Command, DataArgs};

/// Loads settings from `--config` (with environment overrides), or from
/// the environment alone. `--verbose` forces debug logging.
pub fn load_settings(cli: &Cli) -> CoachmailResult<Settings> {
    let mut settings = match &cli.config {
        Some(path) => settings_loader::from_toml_file_with_env(path)?,
        None => settings_loader::from_env(),
    };
    if cli.verbose {
        settings.debug = true;
        settings.log_level = "debug".to_string();
    }
    Ok(settings)
}

/// Executes the parsed command, writing user-facing output to `out`.
pub async fn run(cli: &Cli, settings: &Settings, out: &mut dyn Write) -> CoachmailResult<()> {
    match &cli.command {
        Command::List => list(settings, out),
        Command::Render {
            name,
            data,
            subject,
            text,
        } => render(settings, name, data, *subject, *text, out),
        Command::Send { name, to, cc, data } => send(settings, name, to, cc, data, out).await,
    }
}

fn list(settings: &Settings, out: &mut dyn Write) -> CoachmailResult<()> {
    let engine = Engine::from_settings(settings);
    for name in engine.template_names() {
        let subject = engine.subject_for(&name, &Data::new())?;
        writeln!(out, "{name:<20} {subject}")?;
    }
    Ok(())
}

fn render(
    settings: &Settings,
    name: &str,
    args: &DataArgs,
    with_subject: bool,
    as_text: bool,
    out: &mut dyn Write,
) -> CoachmailResult<()> {
    let engine = Engine::from_settings(settings);
    let data = build_data(args)?;

    let html = engine.render_named(name, &data)?;
    if with_subject {
        writeln!(out, "Subject: {}\n", engine.subject_for(name, &data)?)?;
    }
    if as_text {
        writeln!(out, "{}", html_to_text(&html))?;
    } else {
        writeln!(out, "{html}")?;
    }
    Ok(())
}

async fn send(
    settings: &Settings,
    name: &str,
    to: &[String],
    cc: &[String],
    args: &DataArgs,
    out: &mut dyn Write,
) -> CoachmailResult<()> {
    let mailer = Mailer::from_settings(settings)?;
    let email = TemplatedEmail {
        to: to.to_vec(),
        cc: cc.to_vec(),
        ..TemplatedEmail::new(name, "", build_data(args)?)
    };

    mailer.send_templated(&email).await?;
    writeln!(out, "Sent '{name}' to {}", to.join(", "))?;
    Ok(())
}

/// Builds render data from `--data` and `--set`, with `--set` applied last.
pub fn build_data(args: &DataArgs) -> CoachmailResult<Data> {
    let mut data = match &args.data {
        Some(path) => read_data_file(path)?,
        None => Data::new(),
    };
    for assignment in &args.set {
        let (key, value) = parse_assignment(assignment)?;
        set_path(&mut data, key, value);
    }
    Ok(data)
}

fn read_data_file(path: &Path) -> CoachmailResult<Data> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        CoachmailError::InvalidData(format!("Cannot read data file '{}': {e}", path.display()))
    })?;

    if path.extension().is_some_and(|ext| ext == "toml") {
        let value: toml::Value = toml::from_str(&content)
            .map_err(|e| CoachmailError::InvalidData(format!("Invalid TOML in {}: {e}", path.display())))?;
        Data::from_json(settings_loader::toml_to_json(value))
    } else {
        Data::from_json_str(&content)
    }
}

/// Splits `key=value`. The value is read as JSON when it parses (`500`,
/// `true`, `[1,2]`), otherwise kept as a string.
fn parse_assignment(assignment: &str) -> CoachmailResult<(&str, Value)> {
    let (key, raw) = assignment.split_once('=').ok_or_else(|| {
        CoachmailError::InvalidData(format!("Expected KEY=VALUE, got '{assignment}'"))
    })?;
    let key = key.trim();
    if key.is_empty() {
        return Err(CoachmailError::InvalidData(format!(
            "Missing key in '{assignment}'"
        )));
    }
    let value = serde_json::from_str::<serde_json::Value>(raw)
        .map_or_else(|_| Value::from(raw), Value::from);
    Ok((key, value))
}

/// Sets `key` or `obj.field`, creating or replacing the `obj` map.
fn set_path(data: &mut Data, key: &str, value: Value) {
    match key.split_once('.') {
        Some((root, field)) => {
            let mut map = match data.get(root) {
                Some(Value::Map(map)) => map.clone(),
                _ => Default::default(),
            };
            map.insert(field.to_string(), value);
            data.insert(root, Value::Map(map));
        }
        None => data.insert(key, value),
    }
}
