//! Template loaders.
//!
//! A [`TemplateLoader`] supplies raw template text by name. The engine asks
//! its loaders in order: template directories, then templates registered in
//! memory, then the built-in table.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use coachmail_core::error::{CoachmailError, CoachmailResult};

use crate::builtin;

/// Suffix under which a template's subject line is looked up.
pub const SUBJECT_SUFFIX: &str = ".subject";

/// Loads template source text by name.
pub trait TemplateLoader: Send + Sync {
    /// A short label for log output.
    fn name(&self) -> &'static str;

    /// Loads the template source with the given name.
    ///
    /// # Errors
    ///
    /// Returns `TemplateNotFound` if this loader has no such template, or
    /// `TemplateLoad` if it exists but cannot be read.
    fn load(&self, name: &str) -> CoachmailResult<String>;
}

/// Loads templates from one or more directories on the filesystem.
///
/// Each directory is searched in order for `name`, then for
/// `name.<extension>`. The first match wins.
#[derive(Debug, Clone)]
pub struct FileSystemLoader {
    dirs: Vec<PathBuf>,
    extension: String,
}

impl FileSystemLoader {
    /// Creates a loader over `dirs`, trying `extension` (without the dot)
    /// for names that do not resolve as given.
    pub fn new(dirs: Vec<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            dirs,
            extension: extension.into(),
        }
    }

    fn candidates(&self, name: &str) -> Vec<String> {
        let mut names = vec![name.to_string()];
        if !self.extension.is_empty() {
            names.push(format!("{name}.{}", self.extension));
        }
        names
    }
}

/// Only plain relative names may reach the filesystem.
fn is_safe_name(name: &str) -> bool {
    !name.is_empty()
        && Path::new(name)
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
}

impl TemplateLoader for FileSystemLoader {
    fn name(&self) -> &'static str {
        "filesystem"
    }

    fn load(&self, name: &str) -> CoachmailResult<String> {
        if !is_safe_name(name) {
            return Err(CoachmailError::TemplateNotFound(format!(
                "'{name}' is not a valid template name"
            )));
        }

        for dir in &self.dirs {
            for candidate in self.candidates(name) {
                let path = dir.join(&candidate);
                if path.is_file() {
                    return std::fs::read_to_string(&path).map_err(|e| {
                        CoachmailError::TemplateLoad(format!(
                            "Error reading template '{}': {e}",
                            path.display()
                        ))
                    });
                }
            }
        }

        Err(CoachmailError::TemplateNotFound(format!(
            "Template '{name}' not found in directories: {:?}",
            self.dirs
        )))
    }
}

/// Loads templates from an in-memory map of name to source.
///
/// Useful for tests and for templates kept outside the filesystem, such as
/// per-tenant overrides stored in a database.
#[derive(Debug, Default)]
pub struct StringLoader {
    templates: RwLock<HashMap<String, String>>,
}

impl StringLoader {
    /// Creates an empty `StringLoader`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a template.
    pub fn add(&self, name: impl Into<String>, source: impl Into<String>) {
        self.templates
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.into(), source.into());
    }

    /// Returns the registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .templates
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }
}

impl TemplateLoader for StringLoader {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn load(&self, name: &str) -> CoachmailResult<String> {
        self.templates
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
            .ok_or_else(|| {
                CoachmailError::TemplateNotFound(format!("Template '{name}' not found in memory"))
            })
    }
}

/// Serves the compiled-in templates.
///
/// `name` returns the HTML body and `name.subject` the subject line.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinLoader;

impl TemplateLoader for BuiltinLoader {
    fn name(&self) -> &'static str {
        "builtin"
    }

    fn load(&self, name: &str) -> CoachmailResult<String> {
        let found = match name.strip_suffix(SUBJECT_SUFFIX) {
            Some(base) => builtin::find(base).map(|t| t.subject),
            None => builtin::find(name).map(|t| t.html),
        };
        found.map(str::to_string).ok_or_else(|| {
            CoachmailError::TemplateNotFound(format!("No built-in template named '{name}'"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_loader_basic() {
        let loader = StringLoader::new();
        loader.add("hello", "Hello {{name}}!");
        assert_eq!(loader.load("hello").unwrap(), "Hello {{name}}!");
    }

    #[test]
    fn test_string_loader_not_found() {
        let loader = StringLoader::new();
        let err = loader.load("missing").unwrap_err();
        assert!(matches!(err, CoachmailError::TemplateNotFound(_)));
    }

    #[test]
    fn test_string_loader_names_sorted() {
        let loader = StringLoader::new();
        loader.add("b", "content B");
        loader.add("a", "content A");
        assert_eq!(loader.load("a").unwrap(), "content A");
        assert_eq!(loader.names(), ["a", "b"]);
    }

    #[test]
    fn test_string_loader_overwrite() {
        let loader = StringLoader::new();
        loader.add("x", "version 1");
        loader.add("x", "version 2");
        assert_eq!(loader.load("x").unwrap(), "version 2");
    }

    #[test]
    fn test_builtin_loader() {
        let loader = BuiltinLoader;
        assert!(loader.load("fee_reminder").unwrap().contains("Fee reminder"));
        assert!(loader.load("fee_reminder.subject").unwrap().contains("{{amount}}"));
        assert!(matches!(
            loader.load("nope"),
            Err(CoachmailError::TemplateNotFound(_))
        ));
        assert!(loader.load("nope.subject").is_err());
    }

    #[test]
    fn test_filesystem_loader_not_found() {
        let loader = FileSystemLoader::new(vec![PathBuf::from("/nonexistent/path")], "html");
        let err = loader.load("missing").unwrap_err();
        assert!(matches!(err, CoachmailError::TemplateNotFound(_)));
    }

    #[test]
    fn test_filesystem_loader_extension_and_order() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        std::fs::write(first.path().join("welcome.html"), "first").unwrap();
        std::fs::write(second.path().join("welcome.html"), "second").unwrap();
        std::fs::write(second.path().join("notice.txt"), "plain").unwrap();

        let loader = FileSystemLoader::new(
            vec![first.path().to_path_buf(), second.path().to_path_buf()],
            "html",
        );
        assert_eq!(loader.load("welcome").unwrap(), "first");
        assert_eq!(loader.load("welcome.html").unwrap(), "first");
        assert_eq!(loader.load("notice.txt").unwrap(), "plain");
        assert!(loader.load("notice").is_err());
    }

    #[test]
    fn test_filesystem_loader_subdirectory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("fees")).unwrap();
        std::fs::write(dir.path().join("fees").join("reminder.html"), "due").unwrap();

        let loader = FileSystemLoader::new(vec![dir.path().to_path_buf()], "html");
        assert_eq!(loader.load("fees/reminder").unwrap(), "due");
    }

    #[test]
    fn test_filesystem_loader_rejects_traversal() {
        let root = tempfile::tempdir().unwrap();
        let templates = root.path().join("templates");
        std::fs::create_dir(&templates).unwrap();
        std::fs::write(root.path().join("secret.html"), "secret").unwrap();

        let loader = FileSystemLoader::new(vec![templates], "html");
        assert!(loader.load("../secret").is_err());
        assert!(loader.load("/etc/passwd").is_err());
        assert!(loader.load("").is_err());
    }

    #[test]
    fn test_filesystem_loader_directory_is_not_a_template() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("welcome")).unwrap();
        let loader = FileSystemLoader::new(vec![dir.path().to_path_buf()], "html");
        assert!(matches!(
            loader.load("welcome"),
            Err(CoachmailError::TemplateNotFound(_))
        ));
    }
}
