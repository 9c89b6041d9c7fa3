//! Reply type produced by handlers and error paths.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// One header entry: a single value or a list of values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HeaderValue {
    One(String),
    Many(Vec<String>),
}

impl HeaderValue {
    /// Iterate the underlying values, one or many.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        match self {
            HeaderValue::One(value) => std::slice::from_ref(value).iter(),
            HeaderValue::Many(values) => values.iter(),
        }
        .map(String::as_str)
    }
}

impl From<&str> for HeaderValue {
    fn from(value: &str) -> Self {
        HeaderValue::One(value.to_string())
    }
}

impl From<String> for HeaderValue {
    fn from(value: String) -> Self {
        HeaderValue::One(value)
    }
}

impl From<Vec<String>> for HeaderValue {
    fn from(values: Vec<String>) -> Self {
        HeaderValue::Many(values)
    }
}

/// Response header mapping, header name to value(s).
pub type Headers = BTreeMap<String, HeaderValue>;

/// The value a handler produces: an HTTP status code, an optional JSON
/// payload and the response header mapping.
///
/// A reply is a value object. The `with_*` builders consume and return it;
/// a finished reply is never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    code: u16,
    data: Option<Value>,
    headers: Headers,
}

impl Reply {
    /// The headers every reply starts with: `content-type: application/json`.
    pub fn default_headers() -> Headers {
        let mut headers = Headers::new();
        headers.insert("content-type".into(), "application/json".into());
        headers
    }

    /// A success reply: code 200, default headers, `data` as the body.
    pub fn new(data: Value) -> Self {
        Reply {
            code: 200,
            data: Some(data),
            headers: Self::default_headers(),
        }
    }

    /// A bodyless success reply: code 200, no payload.
    pub fn empty() -> Self {
        Reply {
            code: 200,
            data: None,
            headers: Self::default_headers(),
        }
    }

    /// A failure reply: code 500 with body `{"error": message}`.
    pub fn error(message: impl Into<String>) -> Self {
        Reply {
            code: 500,
            data: Some(json!({ "error": message.into() })),
            headers: Self::default_headers(),
        }
    }

    /// Override the status code.
    pub fn with_code(mut self, code: u16) -> Self {
        self.code = code;
        self
    }

    /// Add or replace one header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<HeaderValue>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Replace the whole header mapping.
    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }
}
