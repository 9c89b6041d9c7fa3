//! The listener and the per-request dispatch pipeline.

use std::net::SocketAddr;
use std::sync::Arc;

use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_rustls::TlsAcceptor;

use postrpc_common::transport::{tls, to_http_response};
use postrpc_common::{Envelope, Reply, Result, RpcError};

use crate::config::ServerConfig;
use crate::context::RequestContext;
use crate::registry::{Handler, HandlerRegistry};

/// HTTP(S) RPC server: a handler registry plus a listening loop that runs
/// one dispatch pipeline per inbound request.
pub struct Server {
    config: ServerConfig,
    registry: HandlerRegistry,
}

impl Server {
    pub fn new(config: ServerConfig) -> Self {
        Server {
            config,
            registry: HandlerRegistry::default(),
        }
    }

    /// Register `handler` under `name`. Chainable:
    ///
    /// ```no_run
    /// # use postrpc_server::{Server, ServerConfig, RequestContext, HandlerResult};
    /// # use serde_json::json;
    /// # async fn ping(ctx: RequestContext) -> HandlerResult { Ok(ctx.reply(json!("pong"))) }
    /// # async fn echo(ctx: RequestContext) -> HandlerResult { Ok(ctx.reply(json!(null))) }
    /// let server = Server::new(ServerConfig::default())
    ///     .handle("ping", ping)
    ///     .handle("echo", echo);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `name` is already registered.
    pub fn handle<H: Handler>(mut self, name: impl Into<String>, handler: H) -> Self {
        self.registry.insert(name.into(), Box::new(handler));
        self
    }

    /// Bind the configured address and start accepting connections.
    ///
    /// Bind failures and TLS configuration failures surface here. The accept
    /// loop then runs on a background task until the returned handle shuts
    /// it down or the process exits.
    pub async fn listen(self) -> Result<ServerHandle> {
        let listener = TcpListener::bind(self.config.bind_addr()).await?;
        let local_addr = listener.local_addr()?;

        let acceptor = if self.config.tls {
            let options = self
                .config
                .tls_options
                .as_ref()
                .ok_or_else(|| RpcError::Tls("tls enabled but no tls options provided".into()))?;
            let tls_config = tls::server_config(options)?;
            Some(TlsAcceptor::from(Arc::new(tls_config)))
        } else {
            None
        };

        tracing::info!(%local_addr, tls = acceptor.is_some(), "listening");

        let registry = Arc::new(self.registry);
        let task = tokio::spawn(accept_loop(listener, acceptor, registry));

        Ok(ServerHandle { local_addr, task })
    }
}

/// Handle to a running server.
///
/// Dropping the handle leaves the server running for the life of the
/// process; `shutdown` aborts the accept loop. There is no graceful drain,
/// the protocol has no cancellation concept.
pub struct ServerHandle {
    local_addr: SocketAddr,
    task: JoinHandle<()>,
}

impl ServerHandle {
    /// The address the listener actually bound, useful with port 0.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting connections.
    pub fn shutdown(self) {
        self.task.abort();
    }

    /// Wait for the accept loop, which only returns via `shutdown`.
    pub async fn join(self) {
        let _ = self.task.await;
    }
}

async fn accept_loop(
    listener: TcpListener,
    acceptor: Option<TlsAcceptor>,
    registry: Arc<HandlerRegistry>,
) {
    loop {
        let (stream, peer_addr) = match listener.accept().await {
            Ok(conn) => conn,
            Err(e) => {
                tracing::warn!("failed to accept connection: {e}");
                continue;
            }
        };

        let registry = registry.clone();
        let acceptor = acceptor.clone();

        tokio::spawn(async move {
            let service = service_fn(move |req| {
                let registry = registry.clone();
                async move {
                    Ok::<_, std::convert::Infallible>(handle_request(registry, req).await)
                }
            });

            let served = match acceptor {
                Some(acceptor) => match acceptor.accept(stream).await {
                    Ok(tls_stream) => {
                        http1::Builder::new()
                            .serve_connection(TokioIo::new(tls_stream), service)
                            .await
                    }
                    Err(e) => {
                        tracing::warn!(%peer_addr, "tls handshake failed: {e}");
                        return;
                    }
                },
                None => {
                    http1::Builder::new()
                        .serve_connection(TokioIo::new(stream), service)
                        .await
                }
            };

            if let Err(e) = served {
                tracing::debug!(%peer_addr, "error serving connection: {e}");
            }
        });
    }
}

/// Per-request pipeline: receive the body, run decode/dispatch, render the
/// reply. Every failure short-circuits to a 500 reply; the transport layer
/// never sees an error and each request is answered exactly once.
async fn handle_request(
    registry: Arc<HandlerRegistry>,
    req: Request<Incoming>,
) -> Response<Full<Bytes>> {
    let (parts, body) = req.into_parts();

    let reply = match body.collect().await {
        Ok(collected) => dispatch(&registry, parts.headers, &collected.to_bytes()).await,
        Err(e) => Reply::error(e.to_string()),
    };

    to_http_response(&reply)
}

/// Decode the buffered body, build the context and invoke the registered
/// handler. A decode failure, a missing method and a failed handler all
/// collapse into a 500 reply carrying the error message.
async fn dispatch(registry: &HandlerRegistry, headers: hyper::HeaderMap, body: &[u8]) -> Reply {
    let envelope = match Envelope::from_slice(body) {
        Ok(envelope) => envelope,
        Err(e) => return Reply::error(e.to_string()),
    };

    let ctx = RequestContext::new(envelope, headers);

    match registry.get(ctx.method()) {
        None => {
            let err = RpcError::UnknownMethod(ctx.method().to_string());
            Reply::error(err.to_string())
        }
        Some(handler) => match handler.call(ctx).await {
            Ok(reply) => reply,
            Err(e) => {
                let err = RpcError::Handler(e.to_string());
                Reply::error(err.to_string())
            }
        },
    }
}
