use postrpc_common::transport::TlsOptions;

/// Server configuration. Immutable once the server is constructed.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind. Defaults to all interfaces.
    pub host: String,
    /// TCP port to bind. Defaults to 3000; use 0 to let the OS pick.
    pub port: u16,
    /// Serve HTTPS instead of plain HTTP.
    pub tls: bool,
    /// Certificate material, required when `tls` is set.
    pub tls_options: Option<TlsOptions>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "0.0.0.0".into(),
            port: 3000,
            tls: false,
            tls_options: None,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
