use crate::{
    generator::{collect_routes, generate_routes},
    hot_reload::watch_app,
    manifest::resolve_manifest,
    scan::scan_app,
    validator::ensure_valid,
};
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::error;

/// Command-line interface for the Loam routing compiler
///
/// Provides commands for generating route registrations from a file-based
/// app directory, listing the discovered routes, and watching for changes.
#[derive(Parser)]
#[command(name = "loam-gen")]
#[command(about = "Loam file-based routing compiler", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands for loam-gen
#[derive(Subcommand)]
pub enum Commands {
    /// Scan the app directory, validate the route tree, and write the routes file
    Generate {
        /// App directory to scan (must contain `pages/` and/or `api/`)
        #[arg(short, long, default_value = "src/app")]
        app_dir: PathBuf,

        /// Output path for the generated routes file
        #[arg(short, long, default_value = "src/routes.rs")]
        output: PathBuf,
    },
    /// Scan and validate, then print discovered routes without writing
    List {
        /// App directory to scan
        #[arg(short, long, default_value = "src/app")]
        app_dir: PathBuf,
    },
    /// Generate, then regenerate on every app-directory change
    Watch {
        /// App directory to scan
        #[arg(short, long, default_value = "src/app")]
        app_dir: PathBuf,

        /// Output path for the generated routes file
        #[arg(short, long, default_value = "src/routes.rs")]
        output: PathBuf,

        /// Quiet window after the last change before regenerating
        #[arg(long, default_value_t = 300)]
        debounce_ms: u64,
    },
}

/// Parse arguments and run the requested command.
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match &cli.command {
        Commands::Generate { app_dir, output } => {
            require_app_dir(app_dir)?;
            run_pipeline(app_dir, output)
        }
        Commands::List { app_dir } => {
            require_app_dir(app_dir)?;
            list_routes(app_dir)
        }
        Commands::Watch {
            app_dir,
            output,
            debounce_ms,
        } => {
            require_app_dir(app_dir)?;
            run_pipeline(app_dir, output)?;
            let watch_dir = app_dir.clone();
            let watch_output = output.clone();
            // Bound to a name so the watcher stays alive for the whole run.
            let _watcher = watch_app(
                app_dir,
                Duration::from_millis(*debounce_ms),
                move || {
                    if let Err(e) = run_pipeline(&watch_dir, &watch_output) {
                        error!("regeneration failed: {e:#}");
                    }
                },
            )?;
            println!("👀 Watching {} (debounce {debounce_ms}ms)", app_dir.display());
            loop {
                std::thread::park();
            }
        }
    }
}

/// One full pipeline run: resolve manifest, scan, validate, generate.
pub fn run_pipeline(app_dir: &Path, output: &Path) -> anyhow::Result<()> {
    let manifest = resolve_manifest(app_dir).context("module-path resolution failed")?;
    let tree = scan_app(app_dir)?;
    ensure_valid(&tree)?;
    generate_routes(&tree, &manifest, output)
}

fn list_routes(app_dir: &Path) -> anyhow::Result<()> {
    let tree = scan_app(app_dir)?;
    ensure_valid(&tree)?;
    let routes = collect_routes(&tree);
    if routes.is_empty() {
        println!("ℹ️  No routes found under {}", app_dir.display());
        return Ok(());
    }
    println!("📋 {} route(s) under {}:", routes.len(), app_dir.display());
    for route in routes {
        let verbs = route
            .methods
            .iter()
            .map(|m| m.verb())
            .collect::<Vec<_>>()
            .join(",");
        println!(
            "  {:<20} {:<24} {}",
            verbs,
            route.pattern,
            route.handler_file.display()
        );
        for layout in &route.layouts {
            println!("  {:<20} {:<24} layout: {}", "", "", layout.display());
        }
    }
    Ok(())
}

fn require_app_dir(app_dir: &Path) -> anyhow::Result<()> {
    if !app_dir.is_dir() {
        anyhow::bail!("app directory {} does not exist", app_dir.display());
    }
    Ok(())
}
