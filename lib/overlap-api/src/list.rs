//! List envelopes returned by collection endpoints

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ListMeta;
use serde::{Deserialize, Serialize};

use crate::{PodResource, ServiceResource};

/// A `*List` response body: list metadata plus the items
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ObjectList<T> {
    #[serde(default)]
    pub metadata: ListMeta,

    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

impl<T> ObjectList<T> {
    /// Translate every wire item into its domain type, preserving list order
    pub fn into_domain<D>(self) -> Vec<D>
    where
        D: From<T>,
    {
        self.items.into_iter().map(D::from).collect()
    }
}

/// Response of `GET /api/v1/services`
pub type ServiceList = ObjectList<ServiceResource>;

/// Response of `GET /api/v1/pods`
pub type PodList = ObjectList<PodResource>;
