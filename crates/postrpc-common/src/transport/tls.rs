//! TLS configuration loading for the encrypted transport scheme.
//!
//! The server loads a PEM certificate chain and private key from disk; the
//! client trusts the bundled webpki roots plus any extra anchors named in
//! its options. The ring crypto provider is installed process-wide the
//! first time either side builds a configuration.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use rustls::pki_types::{CertificateDer, PrivateKeyDer};

use crate::protocol::error::{Result, RpcError};

/// PEM certificate/key material for a TLS listener.
#[derive(Debug, Clone)]
pub struct TlsOptions {
    /// Path to the PEM-encoded certificate chain.
    pub cert_path: PathBuf,
    /// Path to the PEM-encoded private key.
    pub key_path: PathBuf,
}

/// Client-side TLS knobs.
///
/// `ca_file` adds trust anchors on top of the bundled webpki roots, which
/// is what lets a client talk to a server using a private or self-signed CA.
#[derive(Debug, Clone, Default)]
pub struct ClientTlsOptions {
    /// Optional PEM file with extra CA certificates to trust.
    pub ca_file: Option<PathBuf>,
}

fn install_provider() {
    let _ = rustls::crypto::ring::default_provider().install_default();
}

fn load_certs(path: &Path) -> Result<Vec<CertificateDer<'static>>> {
    let mut reader = BufReader::new(File::open(path)?);
    let certs = rustls_pemfile::certs(&mut reader).collect::<std::io::Result<Vec<_>>>()?;
    if certs.is_empty() {
        return Err(RpcError::Tls(format!(
            "no certificates found in {}",
            path.display()
        )));
    }
    Ok(certs)
}

fn load_key(path: &Path) -> Result<PrivateKeyDer<'static>> {
    let mut reader = BufReader::new(File::open(path)?);
    rustls_pemfile::private_key(&mut reader)?
        .ok_or_else(|| RpcError::Tls(format!("no private key found in {}", path.display())))
}

/// Build the rustls server configuration from PEM files.
pub fn server_config(options: &TlsOptions) -> Result<rustls::ServerConfig> {
    install_provider();

    let certs = load_certs(&options.cert_path)?;
    let key = load_key(&options.key_path)?;

    rustls::ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(certs, key)
        .map_err(|e| RpcError::Tls(format!("failed to build server config: {e}")))
}

/// Build the rustls client configuration: webpki roots plus any extra
/// anchors from `ca_file`.
pub fn client_config(options: &ClientTlsOptions) -> Result<rustls::ClientConfig> {
    install_provider();

    let mut roots = rustls::RootCertStore::empty();
    roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    if let Some(ca_file) = &options.ca_file {
        for cert in load_certs(ca_file)? {
            roots.add(cert).map_err(|e| {
                RpcError::Tls(format!(
                    "invalid CA certificate in {}: {e}",
                    ca_file.display()
                ))
            })?;
        }
    }

    Ok(rustls::ClientConfig::builder()
        .with_root_certificates(roots)
        .with_no_client_auth())
}
