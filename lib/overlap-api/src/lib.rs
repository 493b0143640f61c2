//! Cluster resource types consumed by the overlap killer
//!
//! This library defines two layers:
//! - Wire types: the subset of the core/v1 Service and Pod JSON the reconciler reads
//! - Domain types: the flattened `Service` and `Pod` values a reconcile tick works on

pub mod list;
pub mod pod;
pub mod service;

pub use list::{ObjectList, PodList, ServiceList};
pub use pod::{Pod, PodResource};
pub use service::{Service, ServiceResource};

/// Cluster IP value the API server reports for headless Services
pub const HEADLESS_CLUSTER_IP: &str = "None";

/// Returns true if `ip` names an actual address rather than "no address yet"
pub fn is_assigned_ip(ip: &str) -> bool {
    !ip.is_empty() && ip != HEADLESS_CLUSTER_IP
}
