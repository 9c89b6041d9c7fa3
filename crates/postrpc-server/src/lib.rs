//! Postrpc Server
//!
//! This crate provides the server side of the postrpc protocol: a handler
//! registry, a per-request context, and an HTTP(S) listener that runs one
//! dispatch pipeline per inbound request.
//!
//! # Example
//!
//! ```no_run
//! use postrpc_server::{HandlerResult, RequestContext, Server, ServerConfig};
//! use serde_json::Value;
//!
//! async fn echo(ctx: RequestContext) -> HandlerResult {
//!     let data = ctx.raw_data().cloned().unwrap_or(Value::Null);
//!     Ok(ctx.reply(data))
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let handle = Server::new(ServerConfig::default())
//!         .handle("echo", echo)
//!         .listen()
//!         .await
//!         .unwrap();
//!     handle.join().await;
//! }
//! ```

pub mod config;
pub mod context;
pub mod registry;
pub mod server;

pub use config::ServerConfig;
pub use context::RequestContext;
pub use registry::{Handler, HandlerResult};
pub use server::{Server, ServerHandle};

pub use postrpc_common::transport::TlsOptions;
pub use postrpc_common::{BoxError, Reply, RpcError};
