// Subcommand implementations. Each module prints its result to stdout and
// leaves logging to `tracing`.

pub mod context;
pub mod edits;
pub mod files;
pub mod history;

use std::path::Path;

use anyhow::Context;
use serde::Serialize;

/// Read a whole input file, or stdin when no path is given.
pub(crate) fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => std::io::read_to_string(std::io::stdin()).context("failed to read stdin"),
    }
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
