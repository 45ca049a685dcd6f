// SPDX-License-Identifier: Apache-2.0

//! Logging initialization for the reqguard CLI.
//!
//! Uses `tracing` with `tracing-subscriber` for structured logging to stderr.
//! Log level can be controlled via the `RUST_LOG` environment variable.
//!
//! # Examples
//!
//! ```bash
//! # Default: warnings only
//! reqguard path ../../etc/passwd
//!
//! # Show why an input was rejected
//! RUST_LOG=reqguard_core=debug reqguard redirect https://evil.example/
//! ```

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::OutputFormat;

/// Default filter when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "reqguard=warn,reqguard_core=warn,reqwest=error";

/// Filter used with `--verbose`.
const VERBOSE_FILTER: &str = "reqguard=debug,reqguard_core=debug,reqwest=warn";

/// Initialize the logging subsystem.
///
/// `RUST_LOG` wins when set. Otherwise `--verbose` raises reqguard's own
/// targets to `debug`, except for structured formats where stderr stays
/// at the default level.
pub fn init_logging(format: OutputFormat, verbose: bool) {
    let fmt_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    let structured = matches!(format, OutputFormat::Json | OutputFormat::Yaml);
    let default_filter = if verbose && !structured {
        VERBOSE_FILTER
    } else {
        DEFAULT_FILTER
    };

    let filter_layer = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
