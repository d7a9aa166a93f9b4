/*
 * resolver.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Include lookup.
//!
//! `{{>name}}` is resolved at compile time through an [`IncludeResolver`].
//! Names are looked up in one flat namespace: an include nested inside an
//! included template comes from the same resolver, whichever file pulled
//! it in.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Source of included templates.
pub trait IncludeResolver {
    /// The source text of the named include, or `None` if there is none.
    fn get_include(&self, name: &str) -> Option<String>;

    /// Name used in error positions inside the include.
    fn include_filename(&self, name: &str) -> String {
        name.to_string()
    }
}

/// A directory of template files sharing a suffix.
///
/// `{{>entry}}` loads `dir/entry` followed by the suffix, so a repository
/// for `templates/` with suffix `.tmpl` serves `templates/entry.tmpl`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateRepository {
    dir: PathBuf,
    suffix: String,
}

impl TemplateRepository {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            suffix: String::new(),
        }
    }

    /// Append `suffix` to every include name, e.g. `.tmpl`.
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// The repository holding the siblings of a template file, using the
    /// file's extension as suffix.
    ///
    /// ```
    /// use lina::TemplateRepository;
    /// use std::path::{Path, PathBuf};
    ///
    /// let repository = TemplateRepository::for_template(Path::new("gen/enum.h.tmpl"));
    /// assert_eq!(repository.path_for("entry"), PathBuf::from("gen/entry.tmpl"));
    /// ```
    pub fn for_template(path: &Path) -> Self {
        let dir = path.parent().unwrap_or(Path::new(""));
        let suffix = path
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();
        Self::new(dir).with_suffix(suffix)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// The file an include name maps to.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}{}", name, self.suffix))
    }
}

impl IncludeResolver for TemplateRepository {
    fn get_include(&self, name: &str) -> Option<String> {
        let path = self.path_for(name);
        match std::fs::read_to_string(&path) {
            Ok(content) => Some(content),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "Failed to read include");
                None
            }
        }
    }

    fn include_filename(&self, name: &str) -> String {
        self.path_for(name).to_string_lossy().into_owned()
    }
}

/// Resolver without any includes.
///
/// [`Template::compile`](crate::Template::compile) uses it, so any include
/// directive fails to compile there.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullResolver;

impl IncludeResolver for NullResolver {
    fn get_include(&self, _name: &str) -> Option<String> {
        None
    }
}

/// Includes held in memory, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct MemoryResolver {
    includes: HashMap<String, String>,
}

impl MemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: impl Into<String>, content: impl Into<String>) -> &mut Self {
        self.includes.insert(name.into(), content.into());
        self
    }

    pub fn with_includes(
        includes: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>,
    ) -> Self {
        let mut resolver = Self::new();
        for (name, content) in includes {
            resolver.add(name, content);
        }
        resolver
    }
}

impl IncludeResolver for MemoryResolver {
    fn get_include(&self, name: &str) -> Option<String> {
        self.includes.get(name).cloned()
    }
}
