//! pagemap - page discovery and entry mapping for multi-page site builds.

mod cli;
mod config;
mod discover;
mod emit;
mod entries;
mod init;
mod logger;
mod manifest;
mod overlay;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use discover::{Page, collect_pages};
use emit::emit;
use entries::{build_input_map, build_plan, describe_pages};
use init::init_config;
use overlay::{Overlay, load_overlay};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(&cli)?;

    if !cli.is_init() {
        config.validate()?;
    }

    match &cli.command {
        Commands::Init => {
            init_config(&config.config_path)?;
            log!("init"; "wrote {}", config.config_path.display());
            Ok(())
        }
        Commands::Discover => {
            for page in pages(&config)? {
                println!("{}", page.name);
            }
            Ok(())
        }
        Commands::Inputs { output } => {
            let input = build_input_map(&pages(&config)?)?;
            emit(&input, output, &config.output)
        }
        Commands::Pages { output } => {
            let pages = pages(&config)?;
            let descriptors = describe_pages(&pages, &overlay(&config)?)?;
            emit(&descriptors, output, &config.output)
        }
        Commands::Plan { output } => {
            let pages = pages(&config)?;
            let plan = build_plan(&pages, &overlay(&config)?)?;
            emit(&plan, output, &config.output)
        }
    }
}

/// Collect pages from the manifest or a directory scan.
fn pages(config: &Config) -> Result<Vec<Page>> {
    let source = if config.has_manifest() {
        "manifest"
    } else {
        "scan"
    };
    let pages = collect_pages(config).context("Failed to collect pages")?;
    log!("discover"; "found {} pages ({source})", pages.len());
    Ok(pages)
}

/// Load the environment overlay for the configured mode.
fn overlay(config: &Config) -> Result<Overlay> {
    let overlay = load_overlay(&config.env)?;
    log!("env"; "{} variables, mode `{}`", overlay.len(), config.env.mode);
    Ok(overlay)
}
