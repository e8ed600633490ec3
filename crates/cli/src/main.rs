// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `grace`: thin administrative client for `graced` (spec §6 "Process
//! control surface (CLI / RPC)"). Deliberately minimal — the spec scopes
//! "CLI" as a product out of this core (spec §1); this binary exists only
//! to exercise the four fixed operations over the wire protocol in
//! `grace-wire`.

mod client;
mod commands;
mod error;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use client::{resolve_socket_path, DaemonClient};
use error::ClientError;
use output::OutputFormat;

#[derive(Parser)]
#[command(name = "grace", about = "Administrative client for graced", version)]
struct Cli {
    /// Path to graced's Unix domain socket. Defaults to CORE_SOCKET_PATH,
    /// or a grace.sock sibling of CORE_JOURNAL_PATH.
    #[arg(long, global = true)]
    socket: Option<PathBuf>,

    /// Emit machine-readable JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Current boot phase, per-state kernel lists, journal tail sequence.
    Status,
    /// Drain every kernel in dependency-reverse order and stop graced.
    Halt {
        /// Recorded alongside the halt in the journal.
        reason: String,
    },
    /// Atomically swap in a new route table generation.
    ReloadRoutes {
        /// Path to the new route manifest.
        path: PathBuf,
    },
    /// Walk the hash chain over [from, to] and report the first break, if any.
    VerifyJournal {
        from: u64,
        to: u64,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let format = if cli.json { OutputFormat::Json } else { OutputFormat::Text };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("error: failed to start async runtime: {err}");
            return ExitCode::from(50);
        }
    };

    match runtime.block_on(run(cli.socket, cli.command, format)) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(err.code as u8)
        }
    }
}

async fn run(socket: Option<PathBuf>, command: Command, format: OutputFormat) -> Result<bool, ClientError> {
    let socket_path = resolve_socket_path(socket)?;
    let client = DaemonClient::connect(&socket_path).await?;

    match command {
        Command::Status => commands::status::run(client, format).await,
        Command::Halt { reason } => commands::halt::run(client, reason, format).await,
        Command::ReloadRoutes { path } => commands::reload_routes::run(client, path, format).await,
        Command::VerifyJournal { from, to } => commands::verify_journal::run(client, from, to, format).await,
    }
}
