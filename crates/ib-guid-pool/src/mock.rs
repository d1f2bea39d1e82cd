//! Mock PodClient for unit testing
//!
//! This module provides an in-memory implementation of `PodClientTrait` that
//! can be used in tests without a running cluster.

use crate::error::PodClientError;
use crate::pod_trait::PodClientTrait;
use k8s_openapi::api::core::v1::Pod;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Mock PodClient for testing
///
/// Stores pods in memory and can be configured to fail listing calls.
#[derive(Debug, Clone, Default)]
pub struct MockPodClient {
    pods: Arc<Mutex<Vec<Pod>>>,
    failure: Arc<Mutex<Option<String>>>,
    list_calls: Arc<AtomicUsize>,
}

impl MockPodClient {
    /// Create an empty mock client
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock client holding `pods`
    #[must_use]
    pub fn with_pods(pods: Vec<Pod>) -> Self {
        let client = Self::new();
        client.pods.lock().unwrap().extend(pods);
        client
    }

    /// Add a pod to the mock store (for test setup)
    pub fn add_pod(&self, pod: Pod) {
        self.pods.lock().unwrap().push(pod);
    }

    /// Make every subsequent `list_pods` call fail with `message`
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.failure.lock().unwrap() = Some(message.into());
    }

    /// Number of `list_pods` calls made so far
    #[must_use]
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl PodClientTrait for MockPodClient {
    async fn list_pods(&self, namespace: &str) -> Result<Vec<Pod>, PodClientError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(PodClientError::Api(message));
        }

        let pods = self.pods.lock().unwrap();
        Ok(pods
            .iter()
            .filter(|pod| namespace.is_empty() || pod.metadata.namespace.as_deref() == Some(namespace))
            .cloned()
            .collect())
    }
}
