//! Postrpc Client
//!
//! This crate provides the client side of the postrpc protocol: each call
//! opens one outbound HTTP(S) request, writes the JSON envelope
//! `{"method": ..., "data": ...}` as the POST body, collects and decodes the
//! response, and hands back a [`CallResult`] exposing the status code, the
//! parsed payload and the response headers.
//!
//! # Example
//!
//! ```no_run
//! use postrpc_client::{Client, ClientConfig};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = Client::new(ClientConfig::new("127.0.0.1", 3000)).unwrap();
//!     let result = client.call("echo", json!({"x": 1})).await.unwrap();
//!     assert_eq!(result.code(), 200);
//! }
//! ```

pub mod client;
pub mod config;

pub use client::{CallResult, Client};
pub use config::ClientConfig;

pub use postrpc_common::transport::ClientTlsOptions;
pub use postrpc_common::RpcError;
