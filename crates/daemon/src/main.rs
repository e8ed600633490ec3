// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `graced`: the long-running core process (spec §4 end to end, §6
//! "Process model"). Resolves configuration from `CORE_*` environment
//! variables, assembles and boots [`grace_daemon::CoreContext`], then runs
//! the supervision tick, background journal verifier, and administrative
//! surface until asked to stop.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use grace_daemon::{server::Server, supervision, Config, CoreContext, DaemonError};

/// How often the background verifier walks the full chain, independent of
/// any on-demand `verify-journal` call served over the admin surface.
const JOURNAL_VERIFY_INTERVAL: Duration = Duration::from_secs(300);

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(err) => {
            tracing::error!(%err, "failed to start the async runtime");
            return ExitCode::from(50);
        }
    };

    match runtime.block_on(run()) {
        Ok(()) => ExitCode::from(0),
        Err(err) => {
            tracing::error!(%err, "graced exiting");
            ExitCode::from(err.exit_code() as u8)
        }
    }
}

async fn run() -> Result<(), DaemonError> {
    let config = Config::from_env()?;

    if config.tcp_port.is_some() && config.auth_token.is_none() {
        // Refuse to start with a remote surface that nobody can
        // authenticate against — the default posture is local-only, and
        // enabling `CORE_TCP_PORT` is only a safe opt-in when paired with
        // `CORE_AUTH_TOKEN` (spec §10 supplement).
        return Err(DaemonError::Config(grace_daemon::env::EnvError::Missing {
            name: "CORE_AUTH_TOKEN",
        }));
    }

    tracing::info!(mode = ?config.mode, socket = %config.socket_path.display(), "starting graced");

    let context = Arc::new(CoreContext::assemble(&config)?);
    context.boot(config.boot_timeout, config.max_restarts_default).await?;
    tracing::info!("boot complete");

    let supervision_handle = supervision::spawn(Arc::clone(&context), supervision::DEFAULT_TICK_INTERVAL);

    let verifier_context = Arc::clone(&context);
    let verifier_handle = context.journal.spawn_verifier(JOURNAL_VERIFY_INTERVAL, move |report| {
        if !report.valid {
            tracing::error!(?report, "background journal verification found a broken chain");
            let context = Arc::clone(&verifier_context);
            tokio::spawn(async move {
                let event = grace_core::Event::new(
                    "journal.integrity.violation",
                    "core.context",
                    grace_core::Timestamp::capture(&grace_core::SystemClock, std::time::Instant::now()),
                    grace_core::Priority::High,
                    serde_json::json!({ "detail": "background verification failed" }),
                );
                let _ = context.mesh.publish(event).await;
            });
        }
    });

    let server = Server::bind(&config.socket_path, config.tcp_port, Arc::clone(&context), config.auth_token.clone())
        .await?;
    let shutdown = server.shutdown_signal();
    let server_handle = tokio::spawn(server.run());

    wait_for_shutdown(&shutdown).await;
    tracing::info!("shutdown requested, draining");

    supervision_handle.abort();
    verifier_handle.abort();
    server_handle.abort();

    if let Err(err) = context.halt("process shutdown").await {
        tracing::error!(%err, "halt did not complete cleanly during shutdown");
    }

    let _ = std::fs::remove_file(&config.socket_path);
    Ok(())
}

/// Waits for either an admin-surface `halt` or an OS shutdown signal,
/// whichever comes first.
async fn wait_for_shutdown(admin_halt: &tokio::sync::Notify) {
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    #[cfg(unix)]
    {
        let mut sigterm = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(sigterm) => sigterm,
            Err(err) => {
                tracing::warn!(%err, "failed to install SIGTERM handler");
                tokio::select! {
                    _ = admin_halt.notified() => return,
                    _ = &mut ctrl_c => return,
                }
            }
        };
        tokio::select! {
            _ = admin_halt.notified() => {}
            _ = &mut ctrl_c => {}
            _ = sigterm.recv() => {}
        }
    }

    #[cfg(not(unix))]
    {
        tokio::select! {
            _ = admin_halt.notified() => {}
            _ = &mut ctrl_c => {}
        }
    }
}
