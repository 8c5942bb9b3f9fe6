use anyhow::{Context, Result};
use shadow_mapping::Resolver;
use std::io::{self, BufRead, Write};

/// Read one answer line. EOF counts as a blank answer.
fn prompt(input: &mut impl BufRead, out: &mut impl Write, question: &str) -> Result<Option<String>> {
    write!(out, "{}", question)?;
    out.flush().ok();
    let mut s = String::new();
    if input.read_line(&mut s)? == 0 {
        return Ok(None);
    }
    let s = s.trim();
    Ok((!s.is_empty()).then(|| s.to_string()))
}

fn question(description: &str) -> String {
    format!(
        "\nNo mapping for:\n  \"{}\"\nEnter ERP subtask ID (or blank to skip): ",
        description
    )
}

/// Asks on the terminal. Questions go to stderr so stdout stays clean JSON.
pub struct TerminalResolver;

impl Resolver for TerminalResolver {
    async fn resolve(&self, description: &str) -> Result<Option<String>> {
        let q = question(description);
        tokio::task::spawn_blocking(move || {
            prompt(&mut io::stdin().lock(), &mut io::stderr(), &q)
        })
        .await
        .context("prompt task panicked")?
    }
}
