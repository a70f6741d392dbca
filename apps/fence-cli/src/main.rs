//! # fence
//!
//! Command-line surface over a sandboxed workspace:
//! - `fence open` / `fence files`: open a root and list its tree
//! - `fence read/write/delete/create`: file operations confined to the root
//! - `fence context`: bounded project digest for a prompt
//! - `fence extract` / `fence apply`: recover edits from a model response
//!   and write them
//! - `fence history`: show or verify the action history
//!
//! Results go to stdout (JSON for structured output); logs go to stderr.

mod commands;
mod config;
mod session;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use fence_workspace::WorkspaceManager;
use tracing_subscriber::EnvFilter;

use crate::session::Session;

/// Sandboxed workspace access for language-model tooling.
#[derive(Parser)]
#[command(name = "fence", version, about)]
struct Cli {
    /// Workspace root directory (defaults to current directory).
    #[arg(long, global = true, default_value = ".")]
    workspace: PathBuf,

    /// Abort scans and edit batches after this many seconds.
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the workspace root and report whether it is empty.
    Open,
    /// List the workspace tree as JSON.
    Files,
    /// Print a file's content.
    Read {
        path: String,
    },
    /// Write a file (content from --content or stdin).
    Write {
        path: String,
        #[arg(long)]
        content: Option<String>,
    },
    /// Delete a file or directory.
    Delete {
        path: String,
    },
    /// Create a file or directory.
    Create {
        path: String,
        #[arg(long, value_enum, default_value = "file")]
        kind: commands::files::CreateKind,
        #[arg(long)]
        content: Option<String>,
    },
    /// Print the context digest for a prompt.
    Context {
        #[arg(long, value_enum, default_value = "chat")]
        profile: commands::context::Profile,
    },
    /// Extract candidate edits from a model response and print them as JSON.
    Extract {
        /// Response file (defaults to stdin).
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Apply edits from a model response, or from a JSON candidate list.
    Apply {
        /// Response or candidate file (defaults to stdin).
        #[arg(long)]
        input: Option<PathBuf>,
        /// Treat the input as a JSON array of `{ path, content }`.
        #[arg(long)]
        json: bool,
    },
    /// Show the action history as markdown.
    History {
        /// Verify the hash chain instead of printing.
        #[arg(long)]
        verify: bool,
    },
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("fence=info".parse()?)
                .add_directive("fence_workspace=info".parse()?)
                .add_directive("fence_context=info".parse()?)
                .add_directive("fence_edits=info".parse()?)
                .add_directive("fence_history=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();
    let manager = WorkspaceManager::new();
    let session = Session::open(&manager, &cli.workspace, cli.timeout_secs)?;

    match cli.command {
        Commands::Open => commands::files::open(&session),
        Commands::Files => commands::files::list(&session),
        Commands::Read { path } => commands::files::read(&session, &path),
        Commands::Write { path, content } => commands::files::write(&session, &path, content),
        Commands::Delete { path } => commands::files::delete(&session, &path),
        Commands::Create {
            path,
            kind,
            content,
        } => commands::files::create(&session, &path, kind, content.as_deref()),
        Commands::Context { profile } => commands::context::execute(&session, profile),
        Commands::Extract { input } => commands::edits::extract(&session, input.as_deref()),
        Commands::Apply { input, json } => commands::edits::apply(&session, input.as_deref(), json),
        Commands::History { verify } => commands::history::execute(&session, verify),
    }
}
