//! Authenticated access to the cluster API
//!
//! This library provides:
//! - `TransportConfig`: a CA-pinned, connection-pooled HTTPS transport
//! - `KubeClient`: bearer-token requests with status classification and JSON decoding
//! - `ResourceLister`: Service/Pod listing and Pod deletion behind the `ClusterApi` trait

pub mod api;
pub mod client;
pub mod error;
pub mod lister;
pub mod transport;

#[cfg(test)]
mod test_server;

pub use api::ClusterApi;
pub use client::KubeClient;
pub use error::{ClientError, Result, StartupError};
pub use lister::ResourceLister;
pub use transport::TransportConfig;
