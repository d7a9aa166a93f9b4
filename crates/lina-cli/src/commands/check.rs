/*
 * check.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Check command: compile templates and report every error found.

use super::{Compiled, compile_file};
use anyhow::Result;
use std::path::PathBuf;
use tracing::info;

pub fn execute(templates: &[PathBuf], include_dirs: &[PathBuf]) -> Result<()> {
    let mut failed = 0;
    for path in templates {
        match compile_file(path, include_dirs) {
            Ok(Compiled::Ok(template)) => {
                info!(
                    template = %path.display(),
                    nodes = template.nodes().len(),
                    "Template is valid"
                );
            }
            Ok(Compiled::Failed(report)) => {
                eprint!("{}", report);
                failed += 1;
            }
            Err(err) => {
                eprintln!("error: {:#}", err);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} templates failed to compile", failed, templates.len());
    }
    Ok(())
}
