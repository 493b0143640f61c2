//! Bearer-authenticated client for the cluster API

use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{ClientError, Result, StartupError, TransportConfig};

/// Default in-cluster API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://kubernetes.default.svc.cluster.local";

/// KubeClient issues authenticated requests against one API endpoint
///
/// Cloning is cheap: the underlying connection pool is shared.
#[derive(Clone)]
pub struct KubeClient {
    http: reqwest::Client,
    /// Base URL, always ending in `/` so request paths join beneath it
    endpoint: Url,
    authorization: HeaderValue,
}

impl KubeClient {
    /// Create a client on top of an already configured HTTP transport
    pub fn new(
        endpoint: &str,
        token: impl AsRef<[u8]>,
        http: reqwest::Client,
    ) -> std::result::Result<Self, StartupError> {
        Ok(Self {
            http,
            endpoint: parse_endpoint(endpoint)?,
            authorization: bearer_header(token.as_ref())?,
        })
    }

    /// Create a client from raw credential material: a PEM CA bundle and a bearer token
    ///
    /// The transport built here is HTTPS-only, so the endpoint must be `https`.
    pub fn from_credentials(
        endpoint: &str,
        ca_pem: &[u8],
        token: impl AsRef<[u8]>,
        transport: &TransportConfig,
    ) -> std::result::Result<Self, StartupError> {
        let url = parse_endpoint(endpoint)?;
        if url.scheme() != "https" {
            return Err(StartupError::InvalidEndpoint {
                endpoint: endpoint.to_string(),
                reason: format!("scheme must be https, got {}", url.scheme()),
            });
        }

        let http = transport.build(ca_pem)?;
        Self::new(endpoint, token, http)
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    /// Resolve an API path such as `/api/v1/pods` beneath the endpoint
    fn url(&self, path: &str) -> Result<Url> {
        self.endpoint
            .join(path.trim_start_matches('/'))
            .map_err(|e| ClientError::InvalidPath {
                path: path.to_string(),
                reason: e.to_string(),
            })
    }

    /// Issue one request and return the response body of an accepted response
    ///
    /// The body is always read to the end so the connection goes back to the pool.
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<Vec<u8>> {
        let url = self.url(path)?;
        debug!(%method, %url, "Sending API request");

        let mut request = self
            .http
            .request(method, url)
            .header(AUTHORIZATION, self.authorization.clone());
        if let Some(body) = body {
            request = request.header(CONTENT_TYPE, "application/json").body(body);
        }

        let response = request.send().await.map_err(ClientError::Transport)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(ClientError::Transport)?;

        debug!(status = status.as_u16(), len = bytes.len(), "API response received");

        if !is_accepted_status(status) {
            return Err(ClientError::Api {
                status,
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        Ok(bytes.to_vec())
    }

    /// Issue a request and decode an accepted response body as JSON
    pub async fn execute_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<T> {
        let bytes = self.execute(method, path, body).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Issue a request whose response body is not needed
    pub async fn execute_discard(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<()> {
        self.execute(method, path, body).await?;
        Ok(())
    }
}

fn parse_endpoint(endpoint: &str) -> std::result::Result<Url, StartupError> {
    let invalid = |reason: String| StartupError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        reason,
    };

    let mut url = Url::parse(endpoint).map_err(|e| invalid(e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(invalid("not a base URL".to_string()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// `Bearer <token>` header value, marked sensitive so it is never logged
fn bearer_header(token: &[u8]) -> std::result::Result<HeaderValue, StartupError> {
    let token = std::str::from_utf8(token)
        .map_err(|e| StartupError::InvalidToken(e.to_string()))?
        .trim();
    if token.is_empty() {
        return Err(StartupError::EmptyToken);
    }

    let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
        .map_err(|e| StartupError::InvalidToken(e.to_string()))?;
    value.set_sensitive(true);
    Ok(value)
}

/// Only these statuses count as success; everything else is an API error
pub fn is_accepted_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::OK | StatusCode::CREATED | StatusCode::ACCEPTED
    )
}
