//! Per-request accessor bundle handed to handlers.

use hyper::HeaderMap;
use serde::de::DeserializeOwned;
use serde_json::Value;

use postrpc_common::{Envelope, Reply, Result};

/// Everything a handler can see and build for one request.
///
/// Created by the dispatch pipeline from the decoded envelope and the raw
/// inbound headers, scoped to that request, never shared with another.
pub struct RequestContext {
    method: String,
    data: Option<Value>,
    headers: HeaderMap,
}

impl RequestContext {
    pub(crate) fn new(envelope: Envelope, headers: HeaderMap) -> Self {
        RequestContext {
            method: envelope.method.unwrap_or_default(),
            data: envelope.data,
            headers,
        }
    }

    /// The decoded method name. Empty when the request body carried none.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Deserialize the request payload into `T`. An absent payload reads as
    /// JSON `null`.
    pub fn data<T: DeserializeOwned>(&self) -> Result<T> {
        let value = self.data.clone().unwrap_or(Value::Null);
        Ok(serde_json::from_value(value)?)
    }

    /// The raw request payload, if any.
    pub fn raw_data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    /// The raw inbound request headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Build a success reply (code 200, default headers) around `data`.
    pub fn reply(&self, data: Value) -> Reply {
        Reply::new(data)
    }

    /// Build a failure reply (code 500, body `{"error": message}`).
    pub fn error(&self, err: impl std::fmt::Display) -> Reply {
        Reply::error(err.to_string())
    }
}
