/*
 * mod.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Command implementations for the lina CLI

pub mod check;
pub mod render;

use crate::diagnostic::render_compile_error;
use crate::resolver::SearchPathResolver;
use anyhow::{Context, Result};
use lina::{CompileOptions, Template};
use std::path::Path;

/// Outcome of compiling one template file.
pub enum Compiled {
    Ok(Template),
    /// The template has errors; the report is ready for display.
    Failed(String),
}

/// Read and compile a template file, resolving includes from its directory
/// and the extra include directories.
pub fn compile_file(path: &Path, include_dirs: &[std::path::PathBuf]) -> Result<Compiled> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read template {}", path.display()))?;
    let filename = path.to_string_lossy();
    let resolver = SearchPathResolver::for_template(path, include_dirs);
    let options = CompileOptions::new()
        .with_filename(&filename)
        .with_resolver(&resolver);

    match Template::compile_with_options(&source, &options) {
        Ok(template) => Ok(Compiled::Ok(template)),
        Err(err) => Ok(Compiled::Failed(render_compile_error(&err, &filename, &source))),
    }
}
