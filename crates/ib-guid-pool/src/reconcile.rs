//! Startup reconciliation
//!
//! A restarted process has no memory of the GUIDs it handed out. The pods
//! that received them do: every assigned GUID is recorded in the pod's
//! networks annotation. `init_pool` lists all pods and marks each of those
//! GUIDs as allocated before the pool serves any request.

use crate::annotation::{AnnotatedGuid, pod_guids};
use crate::error::{GuidPoolError, PodClientError};
use crate::guid::Guid;
use crate::pool::{GuidPool, PoolState};
use tracing::{debug, error, info};

impl GuidPool {
    /// Rebuild allocation state from the pods running in the cluster
    ///
    /// Lists pods in all namespaces and replaces the allocated set with every
    /// GUID found in their networks annotations, so running it again yields
    /// the same state. The allocation cursor is kept. Returns the number of
    /// GUIDs marked.
    ///
    /// Pods without a usable annotation contribute nothing, and GUIDs outside
    /// this pool's range belong to another network and are ignored. A GUID
    /// that does not parse, is reserved, or is declared twice aborts the
    /// whole pass and leaves the pool as it was before the call; the caller
    /// must not serve allocations from a pool whose first pass failed.
    pub async fn init_pool(&self) -> Result<usize, GuidPoolError> {
        let client = self
            .client()
            .ok_or(GuidPoolError::ReconciliationFailed(PodClientError::NotConfigured))?;

        let pods = client.list_pods("").await.map_err(|e| {
            error!("Failed to list pods for GUID pool reconciliation: {}", e);
            GuidPoolError::ReconciliationFailed(e)
        })?;
        debug!("Reconciling GUID pool against {} pods", pods.len());

        let annotated: Vec<AnnotatedGuid> = pods.iter().flat_map(pod_guids).collect();
        let reconciled = self.mark_annotated(&annotated)?;

        let (start, end) = self.range();
        info!(
            "Reconciled GUID pool {} - {}: {} GUIDs in use across {} pods",
            start,
            end,
            reconciled,
            pods.len()
        );
        Ok(reconciled)
    }

    /// Replace the allocated set with the annotated GUIDs in one critical section
    ///
    /// The new set is built aside and swapped in only when every GUID is
    /// valid, so a failed pass leaves the previous state untouched.
    fn mark_annotated(&self, annotated: &[AnnotatedGuid]) -> Result<usize, GuidPoolError> {
        let mut state = self.lock();
        let mut rebuilt = PoolState::default();
        let mut reconciled = 0;

        for entry in annotated {
            let owner = format!("{}/{}", entry.namespace, entry.pod);

            let guid = Guid::parse(&entry.guid).inspect_err(|e| {
                error!("Pod {} declares an invalid GUID: {}", owner, e);
            })?;
            if !guid.is_allowed() {
                error!("Pod {} declares reserved GUID {}", owner, guid);
                return Err(GuidPoolError::DisallowedGuid(guid));
            }
            if !self.contains(guid) {
                info!("Ignoring GUID {} of pod {}: outside of pool range", guid, owner);
                continue;
            }
            if rebuilt.is_allocated(guid) {
                error!("Pod {} declares GUID {} which is already allocated", owner, guid);
                return Err(GuidPoolError::ConflictingAllocation(guid));
            }

            rebuilt.mark(guid);
            debug!(
                "Pod {} uses GUID {} on network {}",
                owner,
                guid,
                entry.network.as_deref().unwrap_or("<unnamed>")
            );
            reconciled += 1;
        }

        state.replace_allocated(rebuilt);
        Ok(reconciled)
    }
}

#[cfg(test)]
#[path = "reconcile_test.rs"]
mod reconcile_test;
