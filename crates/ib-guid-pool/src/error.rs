//! GUID pool errors

use crate::guid::Guid;
use thiserror::Error;

/// Errors that can occur when building, reconciling or using a GUID pool
#[derive(Debug, Error)]
pub enum GuidPoolError {
    /// Text is not in the `XX:XX:XX:XX:XX:XX:XX:XX` form
    #[error("invalid GUID format: {0:?}")]
    InvalidGuidFormat(String),

    /// GUID parses but is reserved (all-zero or multicast prefix)
    #[error("GUID {0} is not allowed")]
    DisallowedGuid(Guid),

    /// Range start is greater than range end
    #[error("invalid GUID range: start {start} is greater than end {end}")]
    InvalidRange {
        /// Requested first GUID
        start: Guid,
        /// Requested last GUID
        end: Guid,
    },

    /// GUID lies outside the pool's range
    #[error("GUID {guid} is outside of range {start} - {end}")]
    OutOfRange {
        /// Rejected GUID
        guid: Guid,
        /// First GUID of the pool
        start: Guid,
        /// Last GUID of the pool
        end: Guid,
    },

    /// Listing pods from the cluster failed
    #[error("InitPool(): failed to get pods from kubernetes: {0}")]
    ReconciliationFailed(#[source] PodClientError),

    /// GUID is already marked as allocated
    #[error("GUID {0} is already allocated")]
    ConflictingAllocation(Guid),

    /// Every GUID in the range is allocated
    #[error("GUID pool {start} - {end} is exhausted")]
    PoolExhausted {
        /// First GUID of the pool
        start: Guid,
        /// Last GUID of the pool
        end: Guid,
    },

    /// GUID is not currently allocated
    #[error("GUID {0} is not allocated")]
    NotAllocated(Guid),
}

/// Errors returned by a [`PodClientTrait`](crate::PodClientTrait) implementation
#[derive(Debug, Error)]
pub enum PodClientError {
    /// Kubernetes API error
    #[error("{0}")]
    Kube(#[from] kube::Error),

    /// Any other listing failure
    #[error("{0}")]
    Api(String),

    /// The pool was built without a pod client
    #[error("no pod client configured")]
    NotConfigured,
}
