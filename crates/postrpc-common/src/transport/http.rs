//! Rendering replies as HTTP responses.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderName, HeaderValue};
use hyper::{Response, StatusCode};

use crate::protocol::Reply;

/// Render a [`Reply`] as an HTTP response.
///
/// This never fails: a reply that cannot be rendered faithfully (status code
/// out of range, unencodable payload, header name or value that is not valid
/// HTTP) is degraded piecewise, with each dropped piece reported through
/// `tracing`. Every pipeline exit path produces exactly one well-formed
/// response.
pub fn to_http_response(reply: &Reply) -> Response<Full<Bytes>> {
    let status = StatusCode::from_u16(reply.code()).unwrap_or_else(|_| {
        tracing::error!(code = reply.code(), "invalid status code in reply, sending 500");
        StatusCode::INTERNAL_SERVER_ERROR
    });

    let body = match reply.data() {
        Some(data) => serde_json::to_vec(data).unwrap_or_else(|e| {
            tracing::error!("failed to encode response body: {e}");
            Vec::new()
        }),
        None => Vec::new(),
    };

    let mut response = Response::new(Full::new(Bytes::from(body)));
    *response.status_mut() = status;

    let header_map = response.headers_mut();
    for (name, values) in reply.headers() {
        let name = match HeaderName::from_bytes(name.as_bytes()) {
            Ok(name) => name,
            Err(e) => {
                tracing::error!("dropping invalid response header name {name:?}: {e}");
                continue;
            }
        };
        for value in values.iter() {
            match HeaderValue::from_str(value) {
                Ok(value) => {
                    header_map.append(name.clone(), value);
                }
                Err(e) => {
                    tracing::error!("dropping invalid value for response header {name}: {e}");
                }
            }
        }
    }

    response
}
