/*
 * render.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Render command implementation
 */

//! Render command implementation.
//!
//! Compiles one template, builds the context from data files and `-D`
//! definitions, and writes the output to a file or stdout.

use super::{Compiled, compile_file};
use crate::data;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info};

/// Arguments for the render command
#[derive(Debug)]
pub struct RenderArgs {
    pub template: PathBuf,
    pub data: Vec<PathBuf>,
    pub define: Vec<String>,
    pub include_dirs: Vec<PathBuf>,
    /// Output file; stdout when `None`
    pub output: Option<PathBuf>,
}

/// Execute the render command
pub fn execute(args: RenderArgs) -> Result<()> {
    let template = match compile_file(&args.template, &args.include_dirs)? {
        Compiled::Ok(template) => template,
        Compiled::Failed(report) => {
            eprint!("{}", report);
            anyhow::bail!("Failed to compile {}", args.template.display());
        }
    };

    let context = data::build_context(&args.data, &args.define)?;
    debug!(
        data_files = args.data.len(),
        definitions = args.define.len(),
        "Built render context"
    );

    let output = template
        .render(&context)
        .with_context(|| format!("Failed to render {}", args.template.display()))?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &output)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(output = %path.display(), bytes = output.len(), "Rendered template");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(output.as_bytes())
                .context("Failed to write to stdout")?;
            stdout.flush().context("Failed to write to stdout")?;
        }
    }
    Ok(())
}
