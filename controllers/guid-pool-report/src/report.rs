//! GUID pool report.
//!
//! Builds the pool from configuration, reconciles it against the cluster
//! and summarizes which pods hold which GUIDs.

use crate::config::PoolConfig;
use crate::error::ReportError;
use chrono::{DateTime, Utc};
use ib_guid_pool::{Guid, GuidPool, PodClientTrait, PoolStats, pod_guids};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// A GUID held by a pod
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PodGuid {
    /// GUID value
    pub guid: Guid,
    /// Pod namespace
    pub namespace: String,
    /// Pod name
    pub pod: String,
    /// Network name from the attachment descriptor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
}

/// Pool usage after reconciliation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolReport {
    /// When the report was generated
    pub generated_at: DateTime<Utc>,
    /// Pool range and usage
    pub pool: PoolStats,
    /// GUIDs marked during reconciliation
    pub reconciled: usize,
    /// Namespace the pod listing is limited to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// In-range GUIDs held by pods, sorted by GUID
    pub pods: Vec<PodGuid>,
}

/// Build and reconcile the pool, then summarize its usage
pub async fn build_report(
    config: &PoolConfig,
    client: Arc<dyn PodClientTrait>,
) -> Result<PoolReport, ReportError> {
    let pool = GuidPool::new(&config.range_start, &config.range_end, Some(Arc::clone(&client)))?;
    let reconciled = pool.init_pool().await?;

    let namespace = config.namespace.as_deref().unwrap_or_default();
    let pods = client.list_pods(namespace).await?;
    debug!("Summarizing GUIDs of {} pods", pods.len());

    // Separate best-effort listing: pods created since reconciliation were
    // never validated, so unparsable GUIDs are dropped here
    let mut holders: Vec<PodGuid> = pods
        .iter()
        .flat_map(pod_guids)
        .filter_map(|entry| {
            let guid = Guid::parse(&entry.guid).ok()?;
            pool.contains(guid).then(|| PodGuid {
                guid,
                namespace: entry.namespace,
                pod: entry.pod,
                network: entry.network,
            })
        })
        .collect();
    holders.sort_by_key(|holder| holder.guid);

    let stats = pool.stats();
    info!(
        "GUID pool {} - {}: {} allocated, {} free",
        stats.start, stats.end, stats.allocated, stats.free
    );

    Ok(PoolReport {
        generated_at: Utc::now(),
        pool: stats,
        reconciled,
        namespace: config.namespace.clone(),
        pods: holders,
    })
}
