//! The cluster operations a reconcile tick depends on

use async_trait::async_trait;
use overlap_api::{Pod, Service};

use crate::Result;

/// ClusterApi is the list/delete subset of the cluster API used by the reconciler
#[async_trait]
pub trait ClusterApi: Send + Sync {
    /// List every Service in every namespace
    async fn list_services(&self) -> Result<Vec<Service>>;

    /// List every Pod in every namespace
    async fn list_pods(&self) -> Result<Vec<Pod>>;

    /// Delete one Pod by namespace and name
    async fn delete_pod(&self, namespace: &str, name: &str) -> Result<()>;
}
