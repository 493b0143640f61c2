//! Listing Services and Pods and translating them into domain values

use async_trait::async_trait;
use overlap_api::{Pod, PodList, Service, ServiceList};
use reqwest::Method;
use tracing::debug;

use crate::{ClusterApi, KubeClient, Result};

const SERVICES_PATH: &str = "/api/v1/services";
const PODS_PATH: &str = "/api/v1/pods";

/// Path of a single namespaced Pod
pub fn pod_path(namespace: &str, name: &str) -> String {
    format!("/api/v1/namespaces/{}/pods/{}", namespace, name)
}

/// ResourceLister fetches full Service and Pod collections through a `KubeClient`
#[derive(Clone)]
pub struct ResourceLister {
    client: KubeClient,
}

impl ResourceLister {
    pub fn new(client: KubeClient) -> Self {
        Self { client }
    }

    /// Get the underlying client
    pub fn client(&self) -> &KubeClient {
        &self.client
    }
}

#[async_trait]
impl ClusterApi for ResourceLister {
    async fn list_services(&self) -> Result<Vec<Service>> {
        let list: ServiceList = self
            .client
            .execute_json(Method::GET, SERVICES_PATH, None)
            .await?;

        let services: Vec<Service> = list.into_domain();
        debug!("Listed {} services", services.len());
        Ok(services)
    }

    async fn list_pods(&self) -> Result<Vec<Pod>> {
        let list: PodList = self
            .client
            .execute_json(Method::GET, PODS_PATH, None)
            .await?;

        let pods: Vec<Pod> = list.into_domain();
        debug!("Listed {} pods", pods.len());
        Ok(pods)
    }

    async fn delete_pod(&self, namespace: &str, name: &str) -> Result<()> {
        self.client
            .execute_discard(Method::DELETE, &pod_path(namespace, name), None)
            .await
    }
}
