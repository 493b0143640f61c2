use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use overlap_core::{ClusterSettings, OverlapReconciler, ReconcilerConfig};
use overlap_kube::{KubeClient, ResourceLister, StartupError, TransportConfig};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    info!("Starting overlap-killer...");

    let config = ReconcilerConfig::from_env();
    let settings = ClusterSettings::from_env();

    let client = load_client(&settings, &TransportConfig::default())
        .context("unable to initialize cluster API client")?;
    info!("API client initialized for {}", client.endpoint());

    let reconciler = OverlapReconciler::new(Arc::new(ResourceLister::new(client)), config);
    let cancel = CancellationToken::new();

    let task = {
        let cancel = cancel.clone();
        tokio::spawn(async move { reconciler.run(cancel).await })
    };

    shutdown_signal().await?;
    info!("Shutdown signal received, exiting...");
    cancel.cancel();

    if let Err(e) = task.await {
        error!("Reconciler task failed: {}", e);
    }

    Ok(())
}

/// Log to stdout, filtered by `RUST_LOG` (default `info`), as JSON when `LOG_FORMAT=json`
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json")) {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Read the service account credentials and build the API client
fn load_client(
    settings: &ClusterSettings,
    transport: &TransportConfig,
) -> std::result::Result<KubeClient, StartupError> {
    let ca_pem = read_credential(&settings.ca_cert_path)?;
    let token = read_credential(&settings.token_path)?;
    KubeClient::from_credentials(&settings.endpoint, &ca_pem, token, transport)
}

fn read_credential(path: &Path) -> std::result::Result<Vec<u8>, StartupError> {
    std::fs::read(path).map_err(|source| StartupError::Read {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(unix)]
async fn shutdown_signal() -> Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        res = tokio::signal::ctrl_c() => res?,
        _ = terminate.recv() => {}
    }
    Ok(())
}

#[cfg(not(unix))]
async fn shutdown_signal() -> Result<()> {
    tokio::signal::ctrl_c().await?;
    Ok(())
}
