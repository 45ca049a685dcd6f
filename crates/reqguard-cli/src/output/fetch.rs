// SPDX-License-Identifier: Apache-2.0

use console::style;
use std::io::{self, Write};

use crate::cli::OutputContext;
use crate::commands::types::FetchResult;

use super::Renderable;

impl Renderable for FetchResult {
    fn render_text(&self, w: &mut dyn Write, ctx: &OutputContext) -> io::Result<()> {
        let status = if (200..300).contains(&self.status) {
            style(self.status).green()
        } else if (300..400).contains(&self.status) {
            style(self.status).yellow()
        } else {
            style(self.status).red()
        };

        writeln!(w, "{} {}", status.bold(), self.url)?;
        if ctx.quiet {
            return Ok(());
        }

        if let Some(content_type) = &self.content_type {
            writeln!(w, "  {}  {content_type}", style("type:").dim())?;
        }
        if let Some(location) = &self.location {
            writeln!(w, "  {}  {location} (not followed)", style("location:").dim())?;
        }
        writeln!(w, "  {}  {}", style("bytes:").dim(), self.bytes)?;
        writeln!(w, "  {}  {}", style("sha256:").dim(), self.sha256)?;
        Ok(())
    }
}
