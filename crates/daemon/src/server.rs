// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Administrative surface listener (spec §6 "Process control surface",
//! §10 supplement): a Unix domain socket for local clients (`grace-cli`)
//! and, when `CORE_TCP_PORT` is set, an additional authenticated TCP
//! listener for remote administration. Grounded in the teacher's
//! `listener` module: accept loop spawns one task per connection, each
//! connection reads exactly one request and writes exactly one response.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpListener, UnixListener};
use tokio::sync::Notify;

use grace_wire::{read_request, write_response, ProtocolError, Request, Response, ResponsePayload};

use crate::context::CoreContext;
use crate::error::DaemonError;

/// How long a connection may take to send its request before it's dropped.
/// Local admin traffic is tiny and synchronous; a stuck client should not
/// pin a task forever.
const REQUEST_READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared state every connection handler needs.
pub struct ServerCtx {
    pub context: Arc<CoreContext>,
    pub auth_token: Option<String>,
    /// Signalled once a `halt` request has been served, so `main` can begin
    /// process shutdown after the response reaches the caller.
    pub shutdown: Arc<Notify>,
}

/// Accepts connections on a Unix domain socket and, optionally, a TCP port.
pub struct Server {
    unix: UnixListener,
    tcp: Option<TcpListener>,
    ctx: Arc<ServerCtx>,
}

impl Server {
    /// Bind the Unix domain socket at `socket_path`, removing a stale
    /// socket file left behind by an unclean previous shutdown first.
    pub async fn bind(
        socket_path: &Path,
        tcp_port: Option<u16>,
        context: Arc<CoreContext>,
        auth_token: Option<String>,
    ) -> Result<Self, DaemonError> {
        if socket_path.exists() {
            std::fs::remove_file(socket_path)?;
        }
        let unix = UnixListener::bind(socket_path)?;

        let tcp = match tcp_port {
            Some(port) => Some(TcpListener::bind(("127.0.0.1", port)).await?),
            None => None,
        };

        let ctx = Arc::new(ServerCtx { context, auth_token, shutdown: Arc::new(Notify::new()) });
        Ok(Self { unix, tcp, ctx })
    }

    pub fn shutdown_signal(&self) -> Arc<Notify> {
        Arc::clone(&self.ctx.shutdown)
    }

    /// Run the accept loop until the process is torn down. Never returns
    /// under normal operation.
    pub async fn run(self) {
        match self.tcp {
            Some(tcp) => self.run_dual(tcp).await,
            None => self.run_unix_only().await,
        }
    }

    async fn run_unix_only(self) {
        loop {
            match self.unix.accept().await {
                Ok((stream, _)) => {
                    let ctx = Arc::clone(&self.ctx);
                    tokio::spawn(async move {
                        let (reader, writer) = stream.into_split();
                        if let Err(err) = handle_connection(reader, writer, ConnectionSource::Local, &ctx).await {
                            log_connection_error(&err);
                        }
                    });
                }
                Err(err) => tracing::error!(%err, "admin surface: unix accept failed"),
            }
        }
    }

    async fn run_dual(self, tcp: TcpListener) {
        loop {
            tokio::select! {
                result = self.unix.accept() => {
                    match result {
                        Ok((stream, _)) => {
                            let ctx = Arc::clone(&self.ctx);
                            tokio::spawn(async move {
                                let (reader, writer) = stream.into_split();
                                if let Err(err) = handle_connection(reader, writer, ConnectionSource::Local, &ctx).await {
                                    log_connection_error(&err);
                                }
                            });
                        }
                        Err(err) => tracing::error!(%err, "admin surface: unix accept failed"),
                    }
                }
                result = tcp.accept() => {
                    match result {
                        Ok((stream, addr)) => {
                            tracing::debug!(%addr, "admin surface: tcp connection accepted");
                            let ctx = Arc::clone(&self.ctx);
                            tokio::spawn(async move {
                                let (reader, writer) = stream.into_split();
                                if let Err(err) = handle_connection(reader, writer, ConnectionSource::Remote, &ctx).await {
                                    log_connection_error(&err);
                                }
                            });
                        }
                        Err(err) => tracing::error!(%err, "admin surface: tcp accept failed"),
                    }
                }
            }
        }
    }
}

/// Whether a connection arrived over the trusted local socket or the
/// optional remote TCP listener — only the latter is gated on
/// `CORE_AUTH_TOKEN` (spec §10 supplement: remote administration is an
/// explicit, authenticated opt-in, never a silent bypass of the local
/// posture).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConnectionSource {
    Local,
    Remote,
}

#[derive(Debug, thiserror::Error)]
enum ConnectionError {
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
    #[error("request read timed out")]
    Timeout,
}

fn log_connection_error(err: &ConnectionError) {
    match err {
        ConnectionError::Protocol(ProtocolError::ConnectionClosed) => {
            tracing::debug!("admin surface: client disconnected before sending a request")
        }
        ConnectionError::Timeout => tracing::warn!("admin surface: client took too long to send a request"),
        other => tracing::warn!(error = %other, "admin surface: connection error"),
    }
}

async fn handle_connection<R, W>(
    mut reader: R,
    mut writer: W,
    source: ConnectionSource,
    ctx: &ServerCtx,
) -> Result<(), ConnectionError>
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    if source == ConnectionSource::Remote {
        // Remote connections authenticate with one length-prefixed token
        // message before the framed request, mirroring the teacher's Hello
        // handshake but without needing an auth field on every `Request`
        // variant (local connections skip this entirely — trusted by
        // construction, same as the teacher's Unix-socket path).
        let token_bytes = tokio::time::timeout(REQUEST_READ_TIMEOUT, grace_wire::read_message(&mut reader))
            .await
            .map_err(|_| ConnectionError::Timeout)??;
        let provided: String = grace_wire::decode(&token_bytes)?;
        let expected = ctx.auth_token.as_deref();
        if expected.is_none() || Some(provided.as_str()) != expected {
            let response = Response {
                outcome: grace_wire::Outcome::Error,
                reason_code: "daemon.unauthorized".to_string(),
                reason_text: "missing or incorrect auth token".to_string(),
                correlation_id: None,
                payload: ResponsePayload::None,
            };
            write_response(&mut writer, &response).await?;
            return Ok(());
        }
    }

    let request = tokio::time::timeout(REQUEST_READ_TIMEOUT, read_request(&mut reader))
        .await
        .map_err(|_| ConnectionError::Timeout)??;

    let response = dispatch(request, &ctx.context).await;
    if matches!(response.payload, ResponsePayload::Halt(_)) && response.is_ok() {
        ctx.shutdown.notify_one();
    }

    write_response(&mut writer, &response).await?;
    Ok(())
}

async fn dispatch(request: Request, context: &CoreContext) -> Response {
    match request {
        Request::Status => {
            let report = context.status().await;
            Response::ok(ResponsePayload::Status(report))
        }
        Request::Halt { reason } => match context.halt(&reason).await {
            Ok(result) => Response::ok(ResponsePayload::Halt(result)),
            Err(err) => error_response(&err),
        },
        Request::ReloadRoutes { path } => match context.reload_routes(&path).await {
            Ok(result) => Response::ok(ResponsePayload::ReloadRoutes(result)),
            Err(err) => error_response(&err),
        },
        Request::VerifyJournal { from, to } => match context.verify_journal(from, to).await {
            Ok(report) => Response::ok(ResponsePayload::VerifyJournal(report)),
            Err(err) => error_response(&err),
        },
    }
}

fn error_response(err: &DaemonError) -> Response {
    Response::from_fault(&grace_core::Fault::from(err))
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
