/*
 * main.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! lina CLI - Main entry point

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod data;
mod diagnostic;
mod resolver;

#[derive(Parser)]
#[command(name = "lina")]
#[command(version)]
#[command(about = "Render lina text templates", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a template with data from files and the command line
    Render {
        /// Template file
        template: PathBuf,

        /// JSON or YAML file with a mapping at the top level (repeatable)
        #[arg(short, long)]
        data: Vec<PathBuf>,

        /// Set a context value (KEY=VALUE), applied after data files
        #[arg(short = 'D', long = "define", value_name = "KEY=VALUE")]
        define: Vec<String>,

        /// Additional directory to search for included templates (repeatable)
        #[arg(short = 'I', long)]
        include_dir: Vec<PathBuf>,

        /// Write output to FILE instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compile templates and report errors without rendering
    Check {
        /// Template files
        #[arg(required = true)]
        templates: Vec<PathBuf>,

        /// Additional directory to search for included templates (repeatable)
        #[arg(short = 'I', long)]
        include_dir: Vec<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lina=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            template,
            data,
            define,
            include_dir,
            output,
        } => commands::render::execute(commands::render::RenderArgs {
            template,
            data,
            define,
            include_dirs: include_dir,
            output,
        }),
        Commands::Check {
            templates,
            include_dir,
        } => commands::check::execute(&templates, &include_dir),
    }
}
