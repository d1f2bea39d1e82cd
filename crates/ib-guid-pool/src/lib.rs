//! InfiniBand GUID Pool
//!
//! Allocates InfiniBand hardware GUIDs to pods from a bounded range, one pool
//! per logical network. At startup the pool is rebuilt from the GUIDs already
//! recorded on running pods, so a restart never hands out a GUID that is
//! still in use.
//!
//! # Example
//!
//! ```no_run
//! use ib_guid_pool::{GuidPool, KubePodClient, PodClientTrait};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client: Arc<dyn PodClientTrait> = Arc::new(KubePodClient::try_default().await?);
//! let pool = GuidPool::new("02:00:00:00:00:00:00:00", "02:FF:FF:FF:FF:FF:FF:FF", Some(client))?;
//!
//! // Mark GUIDs of running pods as allocated
//! pool.init_pool().await?;
//!
//! // Hand one out, then give it back
//! let guid = pool.allocate_guid_string()?;
//! pool.release_guid(&guid)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **Codec**: canonical `XX:XX:XX:XX:XX:XX:XX:XX` text form with reserved-value checks
//! - **Round-robin allocation**: released GUIDs are reused only after the rest of the range
//! - **Reconciliation**: fail-fast rebuild from pod network annotations
//! - **Mocking**: `MockPodClient` behind the `test-util` feature

pub mod annotation;
pub mod client;
pub mod error;
pub mod guid;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;
pub mod pod_trait;
pub mod pool;
mod reconcile;

pub use annotation::{AnnotatedGuid, NETWORKS_ANNOTATION, pod_guids};
pub use client::KubePodClient;
pub use error::{GuidPoolError, PodClientError};
pub use guid::Guid;
#[cfg(any(test, feature = "test-util"))]
pub use mock::MockPodClient;
pub use pod_trait::PodClientTrait;
pub use pool::{GuidPool, PoolStats};
