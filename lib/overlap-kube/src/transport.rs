//! HTTPS transport pinned to the cluster CA

use std::io::BufReader;
use std::sync::Arc;
use std::time::Duration;

use rustls::pki_types::CertificateDer;
use rustls::{ClientConfig, RootCertStore};
use rustls_pemfile::certs;
use tracing::{debug, info};

use crate::StartupError;

/// Connection settings for the API transport
///
/// The client built from this trusts only the supplied CA, refuses anything
/// older than TLS 1.2, keeps idle connections pooled between ticks, and
/// picks up `HTTPS_PROXY`/`NO_PROXY` from the environment.
#[derive(Clone, Debug)]
pub struct TransportConfig {
    /// Bound on TCP connect plus TLS handshake
    pub connect_timeout: Duration,
    /// Bound on a whole request, including reading the body
    pub request_timeout: Duration,
    /// How long an idle pooled connection is kept
    pub pool_idle_timeout: Duration,
    /// Maximum idle connections kept per host
    pub pool_max_idle_per_host: usize,
    pub tcp_keepalive: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            request_timeout: Duration::from_secs(60),
            pool_idle_timeout: Duration::from_secs(90),
            pool_max_idle_per_host: 100,
            tcp_keepalive: Duration::from_secs(30),
        }
    }
}

impl TransportConfig {
    /// Build a pooled HTTP client that trusts only the CAs in `ca_pem`
    pub fn build(&self, ca_pem: &[u8]) -> Result<reqwest::Client, StartupError> {
        let roots = load_root_store(ca_pem)?;
        let tls = tls_client_config(roots)?;

        let client = reqwest::Client::builder()
            .use_preconfigured_tls(tls)
            .https_only(true)
            .connect_timeout(self.connect_timeout)
            .timeout(self.request_timeout)
            .pool_idle_timeout(self.pool_idle_timeout)
            .pool_max_idle_per_host(self.pool_max_idle_per_host)
            .tcp_keepalive(self.tcp_keepalive)
            .build()
            .map_err(StartupError::HttpClient)?;

        info!(
            connect_timeout = ?self.connect_timeout,
            request_timeout = ?self.request_timeout,
            "API transport initialized"
        );
        Ok(client)
    }
}

/// TLS 1.2+ client configuration with `roots` as the only trust anchors
fn tls_client_config(roots: RootCertStore) -> Result<ClientConfig, StartupError> {
    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let config = ClientConfig::builder_with_provider(provider)
        .with_protocol_versions(&[&rustls::version::TLS13, &rustls::version::TLS12])?
        .with_root_certificates(roots)
        .with_no_client_auth();
    Ok(config)
}

/// Load certificates from PEM-encoded data
pub fn load_certificates(pem_data: &[u8]) -> Result<Vec<CertificateDer<'static>>, StartupError> {
    let mut reader = BufReader::new(pem_data);
    certs(&mut reader)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| StartupError::InvalidCaCertificate(format!("Failed to parse certificates: {}", e)))
}

/// Build a root store from PEM-encoded CA certificates
pub fn load_root_store(ca_pem: &[u8]) -> Result<RootCertStore, StartupError> {
    let ca_certs = load_certificates(ca_pem)?;
    if ca_certs.is_empty() {
        return Err(StartupError::InvalidCaCertificate(
            "No certificates found in PEM data".to_string(),
        ));
    }

    let mut root_store = RootCertStore::empty();
    for cert in ca_certs {
        root_store.add(cert).map_err(|e| {
            StartupError::InvalidCaCertificate(format!("Failed to add CA certificate to root store: {}", e))
        })?;
    }

    debug!("Loaded {} CA certificate(s)", root_store.len());
    Ok(root_store)
}
