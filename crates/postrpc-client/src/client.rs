//! The call machinery: one outbound request per call.

use std::sync::Arc;

use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::header::{CONTENT_TYPE, HOST};
use hyper::{HeaderMap, Method, Request, Uri};
use hyper_util::rt::TokioIo;
use rustls::pki_types::ServerName;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;

use postrpc_common::transport::tls;
use postrpc_common::{Envelope, Result, RpcError};

use crate::config::ClientConfig;

/// Postrpc client.
///
/// Each [`call`](Client::call) is a single best-effort request/response
/// exchange: a fresh connection, one POST, one decoded result. No caching,
/// no retries, no connection reuse.
pub struct Client {
    config: ClientConfig,
    tls: Option<TlsConnector>,
}

impl Client {
    /// Build a client. The transport scheme is resolved here, once: with
    /// `tls` set this loads the trust roots and keeps a connector for the
    /// client's lifetime.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let connector = if config.tls {
            let options = config.tls_options.clone().unwrap_or_default();
            let tls_config = tls::client_config(&options)?;
            Some(TlsConnector::from(Arc::new(tls_config)))
        } else {
            None
        };

        Ok(Client {
            config,
            tls: connector,
        })
    }

    /// Call `method` with `data` and wait for the decoded result.
    ///
    /// Exactly one `Ok` or `Err` per call. Transport failures surface
    /// unmodified; an unparsable response body is always an error.
    pub async fn call(&self, method: impl Into<String>, data: Value) -> Result<CallResult> {
        // Encode first so a serialization failure never opens a socket.
        let body = Envelope::new(method, data).to_vec()?;

        let stream = TcpStream::connect((self.config.host.as_str(), self.config.port)).await?;

        let (status, headers, body) = match &self.tls {
            Some(connector) => {
                let server_name = ServerName::try_from(self.config.host.clone())
                    .map_err(|e| RpcError::Tls(format!("invalid server name {}: {e}", self.config.host)))?;
                let stream = connector.connect(server_name, stream).await?;
                self.exchange(stream, body).await?
            }
            None => self.exchange(stream, body).await?,
        };

        let data: Value = serde_json::from_slice(&body)?;

        Ok(CallResult {
            code: status.as_u16(),
            data,
            headers,
        })
    }

    /// Drive one HTTP/1.1 request over `stream` and collect the full
    /// response.
    async fn exchange<S>(&self, stream: S, body: Vec<u8>) -> Result<(hyper::StatusCode, HeaderMap, Bytes)>
    where
        S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        let (mut sender, connection) = hyper::client::conn::http1::handshake(TokioIo::new(stream)).await?;
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::debug!("connection error: {e}");
            }
        });

        let request = Request::builder()
            .method(Method::POST)
            .uri(Uri::from_static("/"))
            .header(HOST, format!("{}:{}", self.config.host, self.config.port))
            .header(CONTENT_TYPE, "application/json")
            .body(Full::new(Bytes::from(body)))
            .map_err(|e| RpcError::InvalidRequest(e.to_string()))?;

        let response = sender.send_request(request).await?;
        let (parts, body) = response.into_parts();
        let body = body.collect().await?.to_bytes();

        Ok((parts.status, parts.headers, body))
    }
}

/// The decoded response to one call: the HTTP status, the parsed JSON body
/// and the response header mapping.
#[derive(Debug, Clone)]
pub struct CallResult {
    code: u16,
    data: Value,
    headers: HeaderMap,
}

impl CallResult {
    /// The numeric HTTP status.
    pub fn code(&self) -> u16 {
        self.code
    }

    /// Deserialize the response payload into `T`.
    pub fn data<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(self.data.clone())?)
    }

    /// The parsed response payload.
    pub fn raw_data(&self) -> &Value {
        &self.data
    }

    /// The response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_client_new_plain() {
        let client = Client::new(ClientConfig::new("localhost", 3000)).unwrap();
        assert!(client.tls.is_none());
    }

    #[test]
    fn test_client_new_tls() {
        let client = Client::new(ClientConfig::new("localhost", 3000).with_tls()).unwrap();
        assert!(client.tls.is_some());
    }

    #[test]
    fn test_call_result_accessors() {
        let result = CallResult {
            code: 200,
            data: json!({"x": 1}),
            headers: HeaderMap::new(),
        };
        assert_eq!(result.code(), 200);
        assert_eq!(result.raw_data(), &json!({"x": 1}));

        #[derive(serde::Deserialize)]
        struct Payload {
            x: i64,
        }
        let payload: Payload = result.data().unwrap();
        assert_eq!(payload.x, 1);
    }

    #[test]
    fn test_call_result_type_mismatch() {
        let result = CallResult {
            code: 200,
            data: json!("text"),
            headers: HeaderMap::new(),
        };
        let typed: Result<Vec<i64>> = result.data();
        assert!(typed.is_err());
    }
}
