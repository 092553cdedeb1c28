//! Template engine: loading named templates and rendering them with the
//! default context.
//!
//! The [`Engine`] owns the [`DefaultContext`] and an ordered list of
//! loaders. It holds no mutable render state, so a single engine can be
//! shared across threads behind an `Arc` and used for concurrent renders.

use coachmail_core::error::{CoachmailError, CoachmailResult};
use coachmail_core::settings::Settings;
use coachmail_core::utils::text::humanize;

use crate::builtin;
use crate::context::Data;
use crate::defaults::DefaultContext;
use crate::loaders::{BuiltinLoader, FileSystemLoader, StringLoader, TemplateLoader, SUBJECT_SUFFIX};
use crate::render::render;

/// The template engine.
///
/// # Examples
///
/// ```
/// use coachmail_template::context::Data;
/// use coachmail_template::engine::Engine;
///
/// let engine = Engine::new();
/// engine.add_template("hello", "Hello {{name}} from {{company_name}}!");
///
/// let data = Data::new().with("name", "Ravi");
/// let out = engine.render_named("hello", &data).unwrap();
/// assert_eq!(out, "Hello Ravi from Coaching Center!");
/// ```
pub struct Engine {
    defaults: DefaultContext,
    /// Searched before the in-memory and built-in templates.
    loaders: Vec<Box<dyn TemplateLoader>>,
    string_loader: StringLoader,
    builtin_loader: BuiltinLoader,
}

impl Engine {
    /// Creates an engine with default branding and no template directories.
    pub fn new() -> Self {
        Self::with_defaults(DefaultContext::default())
    }

    /// Creates an engine with the given default context.
    pub fn with_defaults(defaults: DefaultContext) -> Self {
        Self {
            defaults,
            loaders: Vec::new(),
            string_loader: StringLoader::new(),
            builtin_loader: BuiltinLoader,
        }
    }

    /// Creates an engine from settings: branding becomes the default
    /// context and the template directories are searched first.
    pub fn from_settings(settings: &Settings) -> Self {
        let mut engine = Self::with_defaults(DefaultContext::from_branding(&settings.branding));
        if !settings.templates.dirs.is_empty() {
            engine.add_loader(Box::new(FileSystemLoader::new(
                settings.templates.dirs.clone(),
                settings.templates.extension.clone(),
            )));
        }
        engine
    }

    /// Adds a loader, searched after previously added ones.
    pub fn add_loader(&mut self, loader: Box<dyn TemplateLoader>) {
        self.loaders.push(loader);
    }

    /// Registers an in-memory template, overriding a built-in of the same name.
    pub fn add_template(&self, name: &str, source: &str) {
        self.string_loader.add(name, source);
    }

    /// Returns the default context.
    pub const fn defaults(&self) -> &DefaultContext {
        &self.defaults
    }

    /// Loads the raw source of a template by name.
    ///
    /// # Errors
    ///
    /// Returns `TemplateNotFound` if no loader has the name, or the first
    /// error other than "not found" a loader reports.
    pub fn load_source(&self, name: &str) -> CoachmailResult<String> {
        for loader in &self.loaders {
            if let Some(result) = try_load(loader.as_ref(), name) {
                return result;
            }
        }
        for loader in [&self.string_loader as &dyn TemplateLoader, &self.builtin_loader] {
            if let Some(result) = try_load(loader, name) {
                return result;
            }
        }

        tracing::debug!(template = name, "No loader has template");
        Err(CoachmailError::TemplateNotFound(name.to_string()))
    }

    /// Renders template text with the default context under `data`.
    pub fn render_str(&self, template: &str, data: &Data) -> String {
        render(template, &data.merged_over(&self.defaults.to_data()))
    }

    /// Loads the named template and renders it.
    ///
    /// # Errors
    ///
    /// Returns `TemplateNotFound` when no loader has the name. Rendering
    /// itself cannot fail.
    pub fn render_named(&self, name: &str, data: &Data) -> CoachmailResult<String> {
        let source = match self.load_source(name) {
            Ok(source) => source,
            Err(e) => {
                tracing::warn!(template = name, error = %e, "Cannot render template");
                return Err(e);
            }
        };
        Ok(self.render_str(&source, data))
    }

    /// Renders the subject line for the named template.
    ///
    /// The subject is the template `<name>.subject`, looked up through the
    /// same loaders as bodies. Without one, the subject is the humanized
    /// name, so `fee_reminder` becomes `Fee reminder`.
    ///
    /// # Errors
    ///
    /// Only fails when a subject template exists but cannot be read.
    pub fn subject_for(&self, name: &str, data: &Data) -> CoachmailResult<String> {
        match self.load_source(&format!("{name}{SUBJECT_SUFFIX}")) {
            Ok(source) => Ok(self.render_str(&source, data).trim().to_string()),
            Err(CoachmailError::TemplateNotFound(_)) => Ok(humanize(name)),
            Err(e) => Err(e),
        }
    }

    /// Returns the names of the built-in and in-memory templates, sorted.
    /// Subject templates are left out.
    pub fn template_names(&self) -> Vec<String> {
        let mut names: Vec<String> = builtin::names().into_iter().map(String::from).collect();
        names.extend(
            self.string_loader
                .names()
                .into_iter()
                .filter(|name| !name.ends_with(SUBJECT_SUFFIX)),
        );
        names.sort();
        names.dedup();
        names
    }
}

/// Asks one loader. `None` means "not here, keep looking".
fn try_load(loader: &dyn TemplateLoader, name: &str) -> Option<CoachmailResult<String>> {
    match loader.load(name) {
        Ok(source) => {
            tracing::debug!(template = name, loader = loader.name(), "Loaded template");
            Some(Ok(source))
        }
        Err(CoachmailError::TemplateNotFound(_)) => None,
        Err(e) => {
            tracing::warn!(template = name, loader = loader.name(), error = %e, "Template load failed");
            Some(Err(e))
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("defaults", &self.defaults)
            .field("loaders", &self.loaders.iter().map(|l| l.name()).collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
