//! In-process fake of the cluster API for client tests

use std::collections::HashMap;
use std::convert::Infallible;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::{Arc, Mutex};

use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::header::AUTHORIZATION;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::tokio::TokioIo;
use rcgen::{
    BasicConstraints, CertificateParams, DnType, IsCa, KeyPair, KeyUsagePurpose, SanType,
};
use rustls::pki_types::{PrivateKeyDer, PrivatePkcs8KeyDer};
use rustls::{ServerConfig, SupportedProtocolVersion};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpListener;
use tokio_rustls::TlsAcceptor;

#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub authorization: Option<String>,
}

type Routes = Arc<Mutex<HashMap<(Method, String), (StatusCode, String)>>>;
type Requests = Arc<Mutex<Vec<RecordedRequest>>>;

/// Server answering canned responses and recording every request
pub struct TestServer {
    addr: std::net::SocketAddr,
    scheme: &'static str,
    routes: Routes,
    requests: Requests,
}

impl TestServer {
    /// Plain HTTP server
    pub async fn start() -> Self {
        Self::spawn(None).await
    }

    /// HTTPS server presenting the certificate in `config`
    pub async fn start_tls(config: Arc<ServerConfig>) -> Self {
        Self::spawn(Some(TlsAcceptor::from(config))).await
    }

    async fn spawn(tls: Option<TlsAcceptor>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind test server");
        let addr = listener.local_addr().expect("test server address");
        let scheme = if tls.is_some() { "https" } else { "http" };
        let routes: Routes = Arc::default();
        let requests: Requests = Arc::default();

        let accept_routes = routes.clone();
        let accept_requests = requests.clone();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let routes = accept_routes.clone();
                let requests = accept_requests.clone();
                let tls = tls.clone();
                tokio::spawn(async move {
                    match tls {
                        Some(acceptor) => {
                            // Failed handshakes are what the trust tests expect.
                            if let Ok(stream) = acceptor.accept(stream).await {
                                serve(stream, routes, requests).await;
                            }
                        }
                        None => serve(stream, routes, requests).await,
                    }
                });
            }
        });

        Self {
            addr,
            scheme,
            routes,
            requests,
        }
    }

    /// An endpoint on which nothing is listening
    pub async fn unused_endpoint() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind unused port");
        let addr = listener.local_addr().expect("unused port address");
        drop(listener);
        format!("http://{}", addr)
    }

    pub fn endpoint(&self) -> String {
        format!("{}://{}", self.scheme, self.addr)
    }

    pub fn respond(&self, method: Method, path: &str, status: StatusCode, body: &str) {
        self.routes
            .lock()
            .unwrap()
            .insert((method, path.to_string()), (status, body.to_string()));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

async fn serve<S>(stream: S, routes: Routes, requests: Requests)
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let service = service_fn(move |req: Request<Incoming>| {
        let routes = routes.clone();
        let requests = requests.clone();
        async move { Ok::<_, Infallible>(handle(req, &routes, &requests)) }
    });
    let _ = http1::Builder::new()
        .serve_connection(TokioIo::new(stream), service)
        .await;
}

fn handle(
    req: Request<Incoming>,
    routes: &Routes,
    requests: &Mutex<Vec<RecordedRequest>>,
) -> Response<Full<Bytes>> {
    let path = req.uri().path().to_string();
    requests.lock().unwrap().push(RecordedRequest {
        method: req.method().clone(),
        path: path.clone(),
        authorization: req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(String::from),
    });

    let (status, body) = routes
        .lock()
        .unwrap()
        .get(&(req.method().clone(), path))
        .cloned()
        .unwrap_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                r#"{"kind":"Status","reason":"NotFound","code":404}"#.to_string(),
            )
        });

    Response::builder()
        .status(status)
        .body(Full::new(Bytes::from(body)))
        .unwrap()
}

/// Throwaway certificate authority
pub struct TestCa {
    cert: rcgen::Certificate,
    key_pair: KeyPair,
}

impl TestCa {
    pub fn generate(name: &str) -> Self {
        let mut params = CertificateParams::default();
        params.distinguished_name.push(DnType::CommonName, name);
        params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
        params.key_usages = vec![KeyUsagePurpose::KeyCertSign, KeyUsagePurpose::CrlSign];
        let key_pair = KeyPair::generate().expect("CA key generation");
        let cert = params.self_signed(&key_pair).expect("self-signed CA");
        Self { cert, key_pair }
    }

    pub fn pem(&self) -> String {
        self.cert.pem()
    }

    /// Server config for 127.0.0.1 with a leaf signed by this CA, limited to `versions`
    pub fn server_config(
        &self,
        versions: &[&'static SupportedProtocolVersion],
    ) -> Arc<ServerConfig> {
        let mut params = CertificateParams::default();
        params.distinguished_name.push(DnType::CommonName, "127.0.0.1");
        params
            .subject_alt_names
            .push(SanType::IpAddress(IpAddr::V4(Ipv4Addr::LOCALHOST)));
        let leaf_key = KeyPair::generate().expect("leaf key generation");
        let leaf = params
            .signed_by(&leaf_key, &self.cert, &self.key_pair)
            .expect("leaf certificate");

        let key = PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(leaf_key.serialize_der()));
        let provider = Arc::new(rustls::crypto::ring::default_provider());
        let config = ServerConfig::builder_with_provider(provider)
            .with_protocol_versions(versions)
            .expect("protocol versions")
            .with_no_client_auth()
            .with_single_cert(vec![leaf.der().clone()], key)
            .expect("server certificate");
        Arc::new(config)
    }
}
