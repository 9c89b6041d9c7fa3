//! Postrpc Common Types and Transport
//!
//! This crate provides the protocol definitions and transport helpers shared
//! by the postrpc client and server.
//!
//! # Overview
//!
//! Postrpc is a minimal single-method-per-call RPC protocol layered on
//! HTTP(S): every call is one `POST` whose body is the JSON envelope
//! `{"method": ..., "data": ...}`, answered by a JSON-encoded reply with a
//! status code and a header mapping.
//!
//! # Components
//!
//! - [`protocol`] - Envelope and reply types plus the error taxonomy
//! - [`transport`] - Reply-to-HTTP rendering and TLS configuration loading
//!
//! # Example
//!
//! ```
//! use postrpc_common::{Envelope, Reply};
//! use serde_json::json;
//!
//! // Encode a request envelope
//! let envelope = Envelope::new("echo", json!({"x": 1}));
//! let wire = envelope.to_vec().unwrap();
//!
//! // Decode it back and build a reply around the payload
//! let decoded = Envelope::from_slice(&wire).unwrap();
//! let reply = Reply::new(decoded.data.unwrap());
//! assert_eq!(reply.code(), 200);
//! ```

pub mod protocol;
pub mod transport;

pub use protocol::*;
