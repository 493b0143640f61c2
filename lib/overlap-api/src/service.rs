//! Service wire and domain types

use std::fmt;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::{Deserialize, Serialize};

/// A core/v1 Service as returned by the API, reduced to the fields we read
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ServiceResource {
    #[serde(default)]
    pub metadata: ObjectMeta,

    #[serde(default)]
    pub spec: ServiceSpec,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ServiceSpec {
    /// Virtual IP allocated to the Service; "None" for headless Services
    #[serde(rename = "clusterIP", default)]
    pub cluster_ip: String,
}

/// A stable virtual endpoint, flattened for a single reconcile tick
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Service {
    pub ip: String,
    pub name: String,
    pub namespace: String,
}

impl Service {
    pub fn new(
        ip: impl Into<String>,
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            ip: ip.into(),
            name: name.into(),
            namespace: namespace.into(),
        }
    }

    /// Whether this Service holds a routable virtual IP
    pub fn has_ip(&self) -> bool {
        crate::is_assigned_ip(&self.ip)
    }
}

impl From<ServiceResource> for Service {
    fn from(svc: ServiceResource) -> Self {
        Self {
            ip: svc.spec.cluster_ip,
            name: svc.metadata.name.unwrap_or_default(),
            namespace: svc.metadata.namespace.unwrap_or_default(),
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/service/{}", self.namespace, self.name)
    }
}
