//! Detection and remediation of Pod/Service IP overlaps
//!
//! This library provides:
//! - `ServiceIpIndex`: a per-tick lookup of Service virtual IPs
//! - `detect_collisions`: the pure Pod-vs-Service comparison
//! - `OverlapReconciler`: the periodic list/index/compare/delete loop
//! - `ReconcilerConfig`: environment-sourced tunables

pub mod config;
pub mod error;
pub mod index;
pub mod reconciler;

pub use config::{ClusterSettings, ReconcilerConfig};
pub use error::{error_chain, ReconcileError, Result};
pub use index::ServiceIpIndex;
pub use reconciler::{detect_collisions, Collision, OverlapReconciler, TickReport};
