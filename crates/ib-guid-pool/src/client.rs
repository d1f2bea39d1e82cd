//! Kubernetes-backed pod client

use crate::error::PodClientError;
use crate::pod_trait::PodClientTrait;
use k8s_openapi::api::core::v1::Pod;
use kube::api::ListParams;
use kube::{Api, Client};
use tracing::debug;

/// Lists pods through the Kubernetes API
#[derive(Clone)]
pub struct KubePodClient {
    client: Client,
}

impl std::fmt::Debug for KubePodClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubePodClient").finish_non_exhaustive()
    }
}

impl KubePodClient {
    /// Wrap an existing Kubernetes client
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Create a client from the in-cluster service account or local kubeconfig
    pub async fn try_default() -> Result<Self, PodClientError> {
        let client = Client::try_default().await?;
        Ok(Self::new(client))
    }

    fn api(&self, namespace: &str) -> Api<Pod> {
        if namespace.is_empty() {
            Api::all(self.client.clone())
        } else {
            Api::namespaced(self.client.clone(), namespace)
        }
    }
}

#[async_trait::async_trait]
impl PodClientTrait for KubePodClient {
    async fn list_pods(&self, namespace: &str) -> Result<Vec<Pod>, PodClientError> {
        let scope = if namespace.is_empty() { "all namespaces" } else { namespace };
        debug!("Listing pods in {}", scope);

        let pods = self.api(namespace).list(&ListParams::default()).await?;
        debug!("Listed {} pods in {}", pods.items.len(), scope);
        Ok(pods.items)
    }
}
