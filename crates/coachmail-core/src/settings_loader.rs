//! Builds [`Settings`] from a TOML file and `COACHMAIL_*` variables.
//!
//! Precedence, lowest first: built-in defaults, then the TOML document
//! (merged table by table, so a file may name a single key), then the
//! environment.
//!
//! | Variable | Field |
//! |---|---|
//! | `COACHMAIL_DEBUG` | `debug` (`true`, `1` or `yes`) |
//! | `COACHMAIL_LOG_LEVEL` | `log_level` |
//! | `COACHMAIL_COMPANY_NAME` | `branding.company_name` |
//! | `COACHMAIL_SUPPORT_EMAIL` | `branding.support_email` |
//! | `COACHMAIL_CURRENCY_SYMBOL` | `branding.currency_symbol` |
//! | `COACHMAIL_TEMPLATE_DIRS` | `templates.dirs`, comma separated |
//! | `COACHMAIL_EMAIL_BACKEND` | `email.backend` |
//! | `COACHMAIL_FROM_EMAIL` | `email.from_email` |
//!
//! ```rust,no_run
//! use coachmail_core::settings_loader;
//!
//! let settings = settings_loader::from_toml_file_with_env("coachmail.toml")?;
//! # Ok::<(), coachmail_core::CoachmailError>(())
//! ```

use std::env;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value as Json};

use crate::error::{CoachmailError, CoachmailResult};
use crate::settings::Settings;

/// Parses `source` and layers it over [`Settings::default`].
///
/// # Errors
///
/// `ConfigurationError` when the document is not TOML or a key has the
/// wrong type.
pub fn from_toml_str(source: &str) -> CoachmailResult<Settings> {
    let document: toml::Value = toml::from_str(source)
        .map_err(|e| CoachmailError::ConfigurationError(format!("Invalid settings TOML: {e}")))?;

    let mut layered = serde_json::to_value(Settings::default()).map_err(|e| {
        CoachmailError::ConfigurationError(format!("Cannot encode default settings: {e}"))
    })?;
    overlay(&mut layered, toml_to_json(document));

    serde_json::from_value(layered)
        .map_err(|e| CoachmailError::ConfigurationError(format!("Invalid settings: {e}")))
}

/// Reads and parses a settings file.
///
/// # Errors
///
/// `ConfigurationError` when the file is unreadable or invalid.
pub fn from_toml_file(path: impl AsRef<Path>) -> CoachmailResult<Settings> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path).map_err(|e| {
        CoachmailError::ConfigurationError(format!("Cannot read settings file '{}': {e}", path.display()))
    })?;
    from_toml_str(&source)
}

/// [`from_toml_file`] followed by [`apply_env_overrides`].
///
/// # Errors
///
/// See [`from_toml_file`].
pub fn from_toml_file_with_env(path: impl AsRef<Path>) -> CoachmailResult<Settings> {
    let mut settings = from_toml_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Defaults plus environment overrides, for runs without a settings file.
pub fn from_env() -> Settings {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings);
    settings
}

/// Overwrites fields whose `COACHMAIL_*` variable is set.
pub fn apply_env_overrides(settings: &mut Settings) {
    let var = |name: &str| env::var(name).ok();

    if let Some(flag) = var("COACHMAIL_DEBUG") {
        settings.debug = matches!(flag.to_ascii_lowercase().as_str(), "true" | "1" | "yes");
    }
    if let Some(level) = var("COACHMAIL_LOG_LEVEL") {
        settings.log_level = level;
    }
    if let Some(name) = var("COACHMAIL_COMPANY_NAME") {
        settings.branding.company_name = name;
    }
    if let Some(email) = var("COACHMAIL_SUPPORT_EMAIL") {
        settings.branding.support_email = email;
    }
    if let Some(symbol) = var("COACHMAIL_CURRENCY_SYMBOL") {
        settings.branding.currency_symbol = symbol;
    }
    if let Some(list) = var("COACHMAIL_TEMPLATE_DIRS") {
        settings.templates.dirs = list
            .split(',')
            .map(str::trim)
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from)
            .collect();
    }
    if let Some(backend) = var("COACHMAIL_EMAIL_BACKEND") {
        settings.email.backend = backend;
    }
    if let Some(from) = var("COACHMAIL_FROM_EMAIL") {
        settings.email.from_email = from;
    }
}

/// Converts a TOML tree to JSON. Datetimes become their TOML text form.
pub fn toml_to_json(value: toml::Value) -> Json {
    match value {
        toml::Value::String(text) => Json::String(text),
        toml::Value::Integer(n) => Json::from(n),
        toml::Value::Float(x) => Json::from(x),
        toml::Value::Boolean(flag) => Json::Bool(flag),
        toml::Value::Datetime(when) => Json::String(when.to_string()),
        toml::Value::Array(items) => items.into_iter().map(toml_to_json).collect(),
        toml::Value::Table(table) => Json::Object(
            table
                .into_iter()
                .map(|(key, item)| (key, toml_to_json(item)))
                .collect::<Map<_, _>>(),
        ),
    }
}

/// Writes `layer` into `base`, descending into objects present in both.
fn overlay(base: &mut Json, layer: Json) {
    match (base, layer) {
        (Json::Object(base_map), Json::Object(layer_map)) => {
            for (key, value) in layer_map {
                match base_map.get_mut(&key) {
                    Some(existing) => overlay(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}
