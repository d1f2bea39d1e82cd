//! Report-specific error types.

use ib_guid_pool::{GuidPoolError, PodClientError};
use kube::Error as KubeError;
use thiserror::Error;

/// Errors that can occur while building the GUID pool report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Kubernetes API error
    #[error("Kubernetes error: {0}")]
    Kube(#[from] KubeError),

    /// Pod listing error
    #[error("Pod client error: {0}")]
    PodClient(#[from] PodClientError),

    /// GUID pool construction or reconciliation error
    #[error("GUID pool error: {0}")]
    Pool(#[from] GuidPoolError),

    /// Report serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
