//! Environment-sourced configuration, read once at startup

use std::path::PathBuf;
use std::time::Duration;

use overlap_kube::client::DEFAULT_ENDPOINT;
use tracing::warn;

/// Non-empty value enables deleting overlapping Pods
pub const DELETE_PODS_ENV: &str = "DELETE_PODS";
/// Seconds between reconcile ticks
pub const INTERVAL_SECONDS_ENV: &str = "INTERVAL_SECONDS";
pub const API_ENDPOINT_ENV: &str = "OVERLAP_API_ENDPOINT";
pub const CA_CERT_PATH_ENV: &str = "OVERLAP_CA_CERT_PATH";
pub const TOKEN_PATH_ENV: &str = "OVERLAP_TOKEN_PATH";

pub const DEFAULT_INTERVAL_SECONDS: u64 = 10;
pub const DEFAULT_CA_CERT_PATH: &str = "/var/run/secrets/kubernetes.io/serviceaccount/ca.crt";
pub const DEFAULT_TOKEN_PATH: &str = "/var/run/secrets/kubernetes.io/serviceaccount/token";

/// Reconciler tunables
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReconcilerConfig {
    /// Delete Pods whose IP collides with a Service IP
    pub delete_overlapped_pods: bool,
    /// Wait between ticks
    pub interval: Duration,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            delete_overlapped_pods: false,
            interval: Duration::from_secs(DEFAULT_INTERVAL_SECONDS),
        }
    }
}

impl ReconcilerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary variable lookup
    ///
    /// An invalid interval is logged and replaced by the default rather than
    /// failing startup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let delete_overlapped_pods = lookup(DELETE_PODS_ENV).is_some_and(|v| !v.is_empty());

        let interval_seconds = match lookup(INTERVAL_SECONDS_ENV) {
            Some(raw) if !raw.is_empty() => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    warn!(
                        value = %raw,
                        default = DEFAULT_INTERVAL_SECONDS,
                        "bad {}, using default", INTERVAL_SECONDS_ENV
                    );
                    DEFAULT_INTERVAL_SECONDS
                }
            },
            _ => DEFAULT_INTERVAL_SECONDS,
        };

        Self {
            delete_overlapped_pods,
            interval: Duration::from_secs(interval_seconds),
        }
    }
}

/// Where to reach the API and where the service account credentials live
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClusterSettings {
    pub endpoint: String,
    pub ca_cert_path: PathBuf,
    pub token_path: PathBuf,
}

impl Default for ClusterSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            ca_cert_path: PathBuf::from(DEFAULT_CA_CERT_PATH),
            token_path: PathBuf::from(DEFAULT_TOKEN_PATH),
        }
    }
}

impl ClusterSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());

        Self {
            endpoint: non_empty(API_ENDPOINT_ENV).unwrap_or(defaults.endpoint),
            ca_cert_path: non_empty(CA_CERT_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.ca_cert_path),
            token_path: non_empty(TOKEN_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.token_path),
        }
    }
}
