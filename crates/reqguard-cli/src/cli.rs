// SPDX-License-Identifier: Apache-2.0

//! Command-line interface definition for reqguard.
//!
//! Uses clap's derive API. Each guard gets a top-level subcommand that runs
//! one input through it and reports the outcome.

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

/// Extended help text for the generate subcommand with shell-specific examples.
const COMPLETION_GENERATE_HELP: &str = r#"EXAMPLES

  bash
    Add to ~/.bashrc or ~/.bash_profile:
      eval "$(reqguard completion generate bash)"

  zsh
    Generate completion file:
      mkdir -p ~/.zsh/completions
      reqguard completion generate zsh > ~/.zsh/completions/_reqguard

  fish
    Generate completion file:
      reqguard completion generate fish > ~/.config/fish/completions/reqguard.fish
"#;

/// Output format for CLI results.
#[derive(Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text with colors (default)
    #[default]
    Text,
    /// JSON output for programmatic consumption
    Json,
    /// YAML output for programmatic consumption
    Yaml,
}

/// Global output configuration passed to commands.
#[derive(Clone)]
pub struct OutputContext {
    /// Output format (text, json, yaml)
    pub format: OutputFormat,
    /// Suppress non-essential output
    pub quiet: bool,
    /// Enable verbose output
    pub verbose: bool,
    /// Whether stdout is a terminal (TTY)
    pub is_tty: bool,
}

impl OutputContext {
    /// Creates an `OutputContext` from CLI arguments.
    pub fn from_cli(format: OutputFormat, quiet: bool, verbose: bool) -> Self {
        Self {
            format,
            quiet,
            verbose,
            is_tty: std::io::stdout().is_terminal(),
        }
    }

    /// Returns true if decorative text output should be shown.
    pub fn is_interactive(&self) -> bool {
        self.is_tty && !self.quiet && matches!(self.format, OutputFormat::Text)
    }
}

/// reqguard - check request inputs against path, redirect and query guards.
///
/// Runs untrusted values through the same guards a request handler would
/// use and reports whether they are accepted.
#[derive(Parser)]
#[command(name = "reqguard")]
#[command(version, about, long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Output format (text, json, yaml)
    #[arg(long, short = 'o', global = true, default_value = "text", value_enum)]
    pub output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Load configuration from this file instead of the default location
    #[arg(long, short = 'c', global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Confine a requested path to the trusted root
    Path {
        /// Client-supplied path, relative to the root
        requested: String,

        /// Trusted root directory (overrides the configured root)
        #[arg(long)]
        root: Option<PathBuf>,

        /// Also resolve symlinks on disk and re-check containment
        #[arg(long)]
        resolve: bool,
    },

    /// Confine an upload file name to the upload directory
    Upload {
        /// Client-supplied file name
        filename: String,

        /// Upload directory (overrides the configured one)
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
    },

    /// Validate a redirect target against the allowed hosts
    Redirect {
        /// Client-supplied `next` value
        next: String,

        /// Allowed host (repeatable; overrides the configured hosts)
        #[arg(long = "allow-host", value_name = "HOST")]
        allow_hosts: Vec<String>,
    },

    /// Bind arguments to a built-in statement template
    Query {
        /// Statement to bind
        #[arg(value_enum)]
        name: StatementName,

        /// Parameter values, in placeholder order
        #[arg(allow_negative_numbers = true)]
        args: Vec<String>,
    },

    /// Hash a password read from stdin with argon2id
    Hash {
        /// Verify the password against this PHC string instead of hashing
        #[arg(long, value_name = "PHC")]
        verify: Option<String>,
    },

    /// Generate a session token
    Token,

    /// Sign a payload read from stdin with HMAC-SHA256
    Sign {
        /// Verify the payload against this hex signature instead of signing
        #[arg(long, value_name = "HEX")]
        verify: Option<String>,
    },

    /// Fetch a URL, restricted to the allowed hosts
    Fetch {
        /// Absolute http(s) URL
        url: String,
    },

    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Generate shell completion scripts
    #[command(subcommand)]
    Completion(CompletionCommand),
}

/// Built-in statement templates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StatementName {
    /// Look up a user by name
    UserByName,
    /// Look up a user by numeric id
    UserById,
    /// Search products by name substring
    SearchProducts,
    /// Delete a user by numeric id
    DeleteUser,
}

/// Configuration subcommands
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Load configuration and validate the root and allowed hosts
    Check,

    /// Print the effective configuration
    Show,
}

/// Completion subcommands
#[derive(Subcommand)]
pub enum CompletionCommand {
    /// Generate completion script for a shell (output to stdout)
    #[command(after_long_help = COMPLETION_GENERATE_HELP)]
    Generate {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_redirect_with_hosts() {
        let cli = Cli::try_parse_from([
            "reqguard",
            "redirect",
            "https://example.com/",
            "--allow-host",
            "example.com",
            "--allow-host",
            "api.example.com",
        ])
        .unwrap();

        match cli.command {
            Commands::Redirect { next, allow_hosts } => {
                assert_eq!(next, "https://example.com/");
                assert_eq!(allow_hosts, vec!["example.com", "api.example.com"]);
            }
            _ => panic!("expected redirect command"),
        }
    }

    #[test]
    fn test_parse_query_name() {
        let cli = Cli::try_parse_from(["reqguard", "query", "user-by-id", "7"]).unwrap();
        match cli.command {
            Commands::Query { name, args } => {
                assert_eq!(name, StatementName::UserById);
                assert_eq!(args, vec!["7"]);
            }
            _ => panic!("expected query command"),
        }
    }

    #[test]
    fn test_parse_query_keeps_global_flags_out_of_args() {
        let cli = Cli::try_parse_from([
            "reqguard",
            "query",
            "user-by-id",
            "-5",
            "--output",
            "json",
            "--quiet",
        ])
        .unwrap();
        assert!(matches!(cli.output, OutputFormat::Json));
        assert!(cli.quiet);
        match cli.command {
            Commands::Query { args, .. } => assert_eq!(args, vec!["-5"]),
            _ => panic!("expected query command"),
        }
    }

    #[test]
    fn test_parse_upload_and_sign() {
        let cli = Cli::try_parse_from(["reqguard", "upload", "a.png", "--dir", "/tmp/up"]).unwrap();
        match cli.command {
            Commands::Upload { filename, dir } => {
                assert_eq!(filename, "a.png");
                assert_eq!(dir, Some(PathBuf::from("/tmp/up")));
            }
            _ => panic!("expected upload command"),
        }

        let cli = Cli::try_parse_from(["reqguard", "sign", "--verify", "abcd"]).unwrap();
        assert!(matches!(cli.command, Commands::Sign { verify: Some(ref v) } if v == "abcd"));
    }

    #[test]
    fn test_global_output_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["reqguard", "token", "--output", "json"]).unwrap();
        assert!(matches!(cli.output, OutputFormat::Json));
    }
}
