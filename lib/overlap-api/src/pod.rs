//! Pod wire and domain types

use std::fmt;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::{Deserialize, Serialize};

/// A core/v1 Pod as returned by the API, reduced to the fields we read
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PodResource {
    #[serde(default)]
    pub metadata: ObjectMeta,

    #[serde(default)]
    pub status: PodStatus,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PodStatus {
    /// Address allocated to the Pod; absent until the Pod is scheduled and networked
    #[serde(rename = "podIP", default)]
    pub pod_ip: String,
}

/// A concrete workload instance, flattened for a single reconcile tick
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Pod {
    pub ip: String,
    pub name: String,
    pub namespace: String,
}

impl Pod {
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

    pub fn has_ip(&self) -> bool {
        crate::is_assigned_ip(&self.ip)
    }
}

impl From<PodResource> for Pod {
    fn from(pod: PodResource) -> Self {
        Self {
            ip: pod.status.pod_ip,
            name: pod.metadata.name.unwrap_or_default(),
            namespace: pod.metadata.namespace.unwrap_or_default(),
        }
    }
}

impl fmt::Display for Pod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/pod/{}", self.namespace, self.name)
    }
}
