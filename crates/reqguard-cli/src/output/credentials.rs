// SPDX-License-Identifier: Apache-2.0

use console::style;
use std::io::{self, Write};

use crate::cli::OutputContext;
use crate::commands::types::{
    HashResult, SignResult, SignatureCheckResult, TokenResult, VerifyResult,
};

use super::Renderable;

impl Renderable for HashResult {
    fn render_text(&self, w: &mut dyn Write, _ctx: &OutputContext) -> io::Result<()> {
        writeln!(w, "{}", self.hash)
    }
}

impl Renderable for VerifyResult {
    fn render_text(&self, w: &mut dyn Write, ctx: &OutputContext) -> io::Result<()> {
        if ctx.quiet {
            return Ok(());
        }
        if self.matches {
            writeln!(w, "{} password matches", style("✓").green().bold())?;
        } else {
            writeln!(w, "{} password does not match", style("✗").red().bold())?;
        }
        if self.needs_rehash {
            writeln!(
                w,
                "{}",
                style("Stored hash uses outdated parameters; re-hash on next login.").yellow()
            )?;
        }
        Ok(())
    }
}

impl Renderable for TokenResult {
    fn render_text(&self, w: &mut dyn Write, _ctx: &OutputContext) -> io::Result<()> {
        writeln!(w, "{}", self.token)
    }
}

impl Renderable for SignResult {
    fn render_text(&self, w: &mut dyn Write, _ctx: &OutputContext) -> io::Result<()> {
        writeln!(w, "{}", self.signature)
    }
}

impl Renderable for SignatureCheckResult {
    fn render_text(&self, w: &mut dyn Write, ctx: &OutputContext) -> io::Result<()> {
        if ctx.quiet {
            return Ok(());
        }
        if self.valid {
            writeln!(w, "{} signature is valid", style("✓").green().bold())
        } else {
            writeln!(w, "{} signature does not match", style("✗").red().bold())
        }
    }
}
