/*
 * resolver.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Include lookup for the CLI: the template's own directory first, then
//! each `--include-dir` in order, all with the template's suffix.

use lina::{IncludeResolver, TemplateRepository};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct SearchPathResolver {
    repositories: Vec<TemplateRepository>,
}

impl SearchPathResolver {
    pub fn for_template(template: &Path, include_dirs: &[PathBuf]) -> Self {
        let own = TemplateRepository::for_template(template);
        let suffix = own.suffix().to_string();
        let mut repositories = vec![own];
        repositories.extend(
            include_dirs
                .iter()
                .map(|dir| TemplateRepository::new(dir).with_suffix(suffix.clone())),
        );
        Self { repositories }
    }

    fn find(&self, name: &str) -> Option<&TemplateRepository> {
        self.repositories
            .iter()
            .find(|repository| repository.path_for(name).is_file())
    }
}

impl IncludeResolver for SearchPathResolver {
    fn get_include(&self, name: &str) -> Option<String> {
        let repository = self.find(name)?;
        tracing::debug!(name, dir = %repository.dir().display(), "Found include");
        repository.get_include(name)
    }

    fn include_filename(&self, name: &str) -> String {
        self.find(name)
            .map_or_else(|| name.to_string(), |repository| repository.include_filename(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefers_own_directory_then_search_path() {
        let templates = tempfile::tempdir().unwrap();
        let shared = tempfile::tempdir().unwrap();
        std::fs::write(templates.path().join("local.tmpl"), "local").unwrap();
        std::fs::write(shared.path().join("local.tmpl"), "shadowed").unwrap();
        std::fs::write(shared.path().join("common.tmpl"), "common").unwrap();
        std::fs::write(shared.path().join("other.txt"), "other").unwrap();

        let resolver = SearchPathResolver::for_template(
            &templates.path().join("main.tmpl"),
            &[shared.path().to_path_buf()],
        );
        assert_eq!(resolver.get_include("local").as_deref(), Some("local"));
        assert_eq!(resolver.get_include("common").as_deref(), Some("common"));
        assert_eq!(resolver.get_include("other"), None);
        assert_eq!(resolver.get_include("missing"), None);
        assert_eq!(
            resolver.include_filename("common"),
            shared.path().join("common.tmpl").to_string_lossy()
        );
        assert_eq!(resolver.include_filename("missing"), "missing");
    }
}
