use postrpc_common::transport::ClientTlsOptions;

/// Client configuration. Immutable once the client is constructed; in
/// particular the transport scheme (`tls`) is fixed for the client's
/// lifetime.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Host to connect to.
    pub host: String,
    /// Port to connect to.
    pub port: u16,
    /// Use the encrypted transport scheme.
    pub tls: bool,
    /// Extra TLS knobs; only read when `tls` is set.
    pub tls_options: Option<ClientTlsOptions>,
}

impl ClientConfig {
    /// Plain-HTTP configuration for `host:port`.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        ClientConfig {
            host: host.into(),
            port,
            tls: false,
            tls_options: None,
        }
    }

    /// Switch to the encrypted scheme.
    pub fn with_tls(mut self) -> Self {
        self.tls = true;
        self
    }

    /// Set client TLS options (implies `tls`).
    pub fn with_tls_options(mut self, options: ClientTlsOptions) -> Self {
        self.tls = true;
        self.tls_options = Some(options);
        self
    }
}
