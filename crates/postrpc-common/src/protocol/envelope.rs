use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::protocol::error::Result;

/// The request envelope sent as an HTTP POST body:
/// `{"method": <string>, "data": <any>}`.
///
/// Both fields are optional on the wire and absent fields are omitted when
/// encoding. An empty request body decodes to an envelope with no method,
/// which later fails dispatch; it is not a decode error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Name of the method to invoke.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// Arbitrary JSON payload for the method.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Envelope {
    pub fn new(method: impl Into<String>, data: Value) -> Self {
        Envelope {
            method: Some(method.into()),
            data: Some(data),
        }
    }

    /// Encode to the JSON wire form.
    pub fn to_vec(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decode a request body. An empty body is treated as `{}`.
    pub fn from_slice(data: &[u8]) -> Result<Self> {
        if data.is_empty() {
            return Ok(Envelope::default());
        }
        Ok(serde_json::from_slice(data)?)
    }
}
