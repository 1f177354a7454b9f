mod aliases;
mod cli;
mod command_handlers;
mod config;
mod descriptions;
mod error;
mod fs_utils;
mod lock;
mod logging;
mod metadata;
mod names;
mod platform;
mod processor;
mod venv;

use anyhow::{Context, Result};
use clap::Parser;

use crate::cli::Cli;
use crate::config::{Overrides, QuickenvConfig};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    if let Err(e) = run(cli) {
        eprintln!("quickenv: {}", error::one_line_message(&e));
        std::process::exit(error::exit_code_for(&e));
    }
}

fn run(cli: Cli) -> Result<()> {
    let overrides = Overrides {
        envs_dir: cli.path,
        aliases_file: cli.aliases_file,
        config: cli.config,
    };
    let cfg = QuickenvConfig::load(&overrides).context("loading configuration")?;
    tracing::debug!(?cfg, "resolved configuration");
    command_handlers::dispatch::dispatch(cli.command, cfg)
}
