// SPDX-License-Identifier: Apache-2.0

use console::style;
use reqguard_core::SqlValue;
use std::io::{self, Write};

use crate::cli::OutputContext;
use crate::commands::types::{PathResult, QueryResult, RedirectResult, UploadResult};

use super::Renderable;

impl Renderable for PathResult {
    fn render_text(&self, w: &mut dyn Write, ctx: &OutputContext) -> io::Result<()> {
        let shown = self.resolved.as_deref().unwrap_or(self.confined.as_path());
        if ctx.quiet {
            return writeln!(w, "{}", shown.display());
        }

        writeln!(w, "{} {}", style("✓").green().bold(), style(shown.display()).cyan())?;
        if ctx.verbose {
            writeln!(w, "  {}  {}", style("root:").dim(), self.root.display())?;
            let relative = if self.confined.relative().is_empty() {
                "(root)"
            } else {
                self.confined.relative()
            };
            writeln!(w, "  {}  {relative}", style("relative:").dim())?;
        }
        Ok(())
    }
}

impl Renderable for UploadResult {
    fn render_text(&self, w: &mut dyn Write, ctx: &OutputContext) -> io::Result<()> {
        if ctx.quiet {
            return writeln!(w, "{}", self.confined.as_path().display());
        }

        writeln!(
            w,
            "{} {}",
            style("✓").green().bold(),
            style(self.confined.as_path().display()).cyan()
        )?;
        if ctx.verbose {
            writeln!(w, "  {}  {}", style("dir:").dim(), self.dir.display())?;
        }
        Ok(())
    }
}

impl Renderable for RedirectResult {
    fn render_text(&self, w: &mut dyn Write, ctx: &OutputContext) -> io::Result<()> {
        if ctx.quiet {
            return writeln!(w, "{}", self.location);
        }

        writeln!(
            w,
            "{} {}",
            style("✓").green().bold(),
            style(&self.location).cyan()
        )?;
        if ctx.verbose {
            writeln!(w, "  {}  {}", style("host:").dim(), self.host)?;
        }
        Ok(())
    }
}

impl Renderable for QueryResult {
    fn render_text(&self, w: &mut dyn Write, ctx: &OutputContext) -> io::Result<()> {
        if ctx.is_interactive() {
            writeln!(w, "{}", style(&self.statement).bold())?;
        }
        writeln!(w, "{}", self.bound.sql())?;
        for (placeholder, value) in self.bound.bindings() {
            writeln!(
                w,
                "  {} = {}",
                style(placeholder).yellow(),
                display_value(value)
            )?;
        }
        Ok(())
    }
}

/// Literal-looking rendering of a bound value, for display only.
fn display_value(value: &SqlValue) -> String {
    match value {
        SqlValue::Null => "NULL".to_string(),
        SqlValue::Bool(b) => b.to_string(),
        SqlValue::Int(i) => i.to_string(),
        SqlValue::Float(f) => f.to_string(),
        SqlValue::Text(s) => format!("{s:?}"),
        SqlValue::Bytes(b) => format!("<{} bytes>", b.len()),
    }
}
