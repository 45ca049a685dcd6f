// SPDX-License-Identifier: Apache-2.0

//! reqguard - check request inputs against path, redirect and query guards.
//!
//! Runs untrusted values through the guards from `reqguard-core` the same
//! way a request handler would, so configurations and inputs can be tested
//! from the shell.

mod cli;
mod commands;
mod errors;
mod logging;
mod output;

use anyhow::{Context, Result};
use clap::Parser;
use reqguard_core::config;
use tracing::debug;

use crate::cli::{Cli, OutputContext};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.output, cli.verbose);

    let output_ctx = OutputContext::from_cli(cli.output, cli.quiet, cli.verbose);

    let (config, config_file) = match &cli.config {
        Some(path) => (
            config::load_config_file(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
            Some(path.clone()),
        ),
        None => (
            config::load_config().context("Failed to load configuration")?,
            config::config_file_path().filter(|p| p.exists()),
        ),
    };
    debug!("Configuration loaded successfully");

    match commands::run(cli.command, output_ctx, &config, config_file.as_deref()).await {
        Ok(()) => Ok(()),
        Err(e) => {
            let formatted = errors::format_error(&e);
            eprintln!("Error: {formatted}");
            std::process::exit(1);
        }
    }
}
