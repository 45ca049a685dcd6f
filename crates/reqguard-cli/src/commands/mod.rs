// SPDX-License-Identifier: Apache-2.0

//! Command handlers for the reqguard CLI.

pub mod completion;
pub mod config;
pub mod credentials;
pub mod fetch;
pub mod guards;
pub mod query;
pub mod types;

use std::path::Path;

use anyhow::Result;
use reqguard_core::GuardConfig;

use crate::cli::{Commands, CompletionCommand, ConfigCommand, OutputContext};
use crate::output;

/// Dispatch to the appropriate command handler.
pub async fn run(
    command: Commands,
    ctx: OutputContext,
    config: &GuardConfig,
    config_file: Option<&Path>,
) -> Result<()> {
    match command {
        Commands::Path {
            requested,
            root,
            resolve,
        } => {
            let result = guards::run_path(&requested, root.as_deref(), resolve, config)?;
            output::render(&result, &ctx)
        }

        Commands::Upload { filename, dir } => {
            let result = guards::run_upload(&filename, dir.as_deref(), config)?;
            output::render(&result, &ctx)
        }

        Commands::Redirect { next, allow_hosts } => {
            let result = guards::run_redirect(&next, &allow_hosts, config)?;
            output::render(&result, &ctx)
        }

        Commands::Query { name, args } => {
            let result = query::run(name, &args)?;
            output::render(&result, &ctx)
        }

        Commands::Hash { verify } => match verify {
            Some(stored) => {
                let result = credentials::run_verify(&stored, config)?;
                output::render(&result, &ctx)?;
                if result.matches {
                    Ok(())
                } else {
                    anyhow::bail!("Password does not match")
                }
            }
            None => {
                let result = credentials::run_hash(config)?;
                output::render(&result, &ctx)
            }
        },

        Commands::Token => {
            let result = credentials::run_token();
            output::render(&result, &ctx)
        }

        Commands::Sign { verify } => match verify {
            Some(signature) => {
                let result = credentials::run_verify_signature(&signature, config)?;
                output::render(&result, &ctx)?;
                if result.valid {
                    Ok(())
                } else {
                    anyhow::bail!("Signature does not match")
                }
            }
            None => {
                let result = credentials::run_sign(config)?;
                output::render(&result, &ctx)
            }
        },

        Commands::Fetch { url } => {
            let result = fetch::run(&url, config).await?;
            output::render(&result, &ctx)
        }

        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommand::Check => {
                let result = config::run_check(config, config_file)?;
                output::render(&result, &ctx)
            }
            ConfigCommand::Show => {
                let result = config::run_show(config, config_file);
                output::render(&result, &ctx)
            }
        },

        Commands::Completion(completion_cmd) => match completion_cmd {
            CompletionCommand::Generate { shell } => completion::run_generate(shell),
        },
    }
}
