//! Liveboard - live animated text panels for connected viewers.

#![allow(dead_code)]

mod actor;
mod board;
mod cli;
mod config;
mod core;
mod embed;
mod logger;
mod render;
mod viewer;
mod web;

use std::sync::Arc;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::Config;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli: &'static Cli = Box::leak(Box::new(Cli::parse()));

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = Config::load(cli)?;

    match &cli.command {
        Commands::Init { name } => {
            let cwd = std::env::current_dir()?;
            let target = match name {
                Some(name) => cwd.join(name),
                None => cwd,
            };
            cli::init::init_project(&target, &cli.config)
        }
        Commands::Serve { .. } => serve(config),
    }
}

// =============================================================================
// Serve Command
// =============================================================================

/// Wire up services and actors, then run the control plane until shutdown.
fn serve(config: Config) -> Result<()> {
    let config = Arc::new(config);

    let store = Arc::new(board::TemplateStore::new(config.panel.clone()));
    let registry = Arc::new(board::DisplayRegistry::new());
    let roster = Arc::new(viewer::Roster::new());
    let sessions = Arc::new(web::SessionStore::new());

    let (coordinator, scheduler) = actor::Coordinator::new(
        Arc::clone(&store),
        Arc::clone(&registry),
        Arc::clone(&roster),
        config.viewer.port,
        config.viewer.max_clients,
    );

    // Bind HTTP first so Ctrl+C can unblock it from the start
    let bound = web::bind_server(&config)?;

    let app = core::App::new(config, store, registry, roster, sessions, scheduler);
    bound.run(app, coordinator)
}
