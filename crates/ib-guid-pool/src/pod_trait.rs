//! PodClient trait for mocking
//!
//! This trait abstracts pod listing so the pool can be reconciled against a
//! real cluster or against an in-memory mock in unit tests.

use crate::error::PodClientError;
use k8s_openapi::api::core::v1::Pod;

/// Trait for listing pods from the cluster
///
/// All async methods must be `Send` to work with Tokio's work-stealing runtime.
#[async_trait::async_trait]
pub trait PodClientTrait: Send + Sync {
    /// List pods in `namespace`, or in every namespace when it is empty
    async fn list_pods(&self, namespace: &str) -> Result<Vec<Pod>, PodClientError>;
}
