// SPDX-License-Identifier: Apache-2.0

use console::style;
use std::io::{self, Write};

use crate::cli::OutputContext;
use crate::commands::types::{ConfigCheckResult, ConfigShowResult};

use super::Renderable;

fn write_source(w: &mut dyn Write, config_file: Option<&std::path::Path>) -> io::Result<()> {
    match config_file {
        Some(path) => writeln!(w, "  {}  {}", style("file:").dim(), path.display()),
        None => writeln!(w, "  {}  {}", style("file:").dim(), style("(defaults)").dim()),
    }
}

impl Renderable for ConfigCheckResult {
    fn render_text(&self, w: &mut dyn Write, ctx: &OutputContext) -> io::Result<()> {
        writeln!(w, "{} configuration is valid", style("✓").green().bold())?;
        if ctx.quiet {
            return Ok(());
        }

        write_source(w, self.config_file.as_deref())?;
        writeln!(w, "  {}  {}", style("root:").dim(), self.root.display())?;
        writeln!(
            w,
            "  {}  {}",
            style("allowed hosts:").dim(),
            self.allowed_hosts.join(", ")
        )?;
        let signing = if self.signing_key { "configured" } else { "not set" };
        writeln!(w, "  {}  {signing}", style("signing key:").dim())?;
        if !self.verify_tls {
            writeln!(
                w,
                "  {}",
                style("TLS certificate verification is disabled").yellow()
            )?;
        }
        Ok(())
    }
}

impl Renderable for ConfigShowResult {
    fn render_text(&self, w: &mut dyn Write, _ctx: &OutputContext) -> io::Result<()> {
        let c = &self.config;
        writeln!(w, "{}", style("Effective configuration").bold())?;
        write_source(w, self.config_file.as_deref())?;
        writeln!(w)?;
        writeln!(w, "root = {:?}", c.root.display().to_string())?;
        writeln!(w, "upload_dir = {:?}", c.upload_dir.display().to_string())?;
        writeln!(w, "allowed_hosts = {:?}", c.allowed_hosts)?;
        writeln!(w)?;
        writeln!(w, "[transport]")?;
        writeln!(w, "verify_tls = {}", c.transport.verify_tls)?;
        writeln!(w, "timeout_seconds = {}", c.transport.timeout_seconds)?;
        writeln!(w, "https_only = {}", c.transport.https_only)?;
        writeln!(w)?;
        writeln!(w, "[password]")?;
        writeln!(w, "memory_kib = {}", c.password.memory_kib)?;
        writeln!(w, "iterations = {}", c.password.iterations)?;
        writeln!(w, "parallelism = {}", c.password.parallelism)?;
        if c.signing_key.is_some() {
            writeln!(w)?;
            writeln!(w, "# signing_key is set (not shown)")?;
        }
        Ok(())
    }
}
