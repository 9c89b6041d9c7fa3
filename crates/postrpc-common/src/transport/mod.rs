pub mod http;
pub mod tls;

pub use http::to_http_response;
pub use tls::{ClientTlsOptions, TlsOptions, client_config, server_config};
