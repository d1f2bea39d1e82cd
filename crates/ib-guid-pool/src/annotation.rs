//! Network-attachment annotation decoding
//!
//! Pods request secondary networks through the
//! `k8s.v1.cni.cncf.io/networks` annotation, a JSON array of descriptors.
//! A descriptor may carry a pre-assigned GUID under `cni-args.guid`:
//!
//! ```json
//! [{"name": "ib-net", "namespace": "foo", "cni-args": {"guid": "02:00:00:00:00:00:00:03"}}]
//! ```
//!
//! Only the GUID string is interpreted here. Anything that does not match
//! this shape contributes no GUID.

use k8s_openapi::api::core::v1::Pod;
use serde_json::Value;
use tracing::debug;

/// Annotation holding the pod's network-attachment descriptors
pub const NETWORKS_ANNOTATION: &str = "k8s.v1.cni.cncf.io/networks";

/// Descriptor key holding CNI arguments
const CNI_ARGS_KEY: &str = "cni-args";

/// CNI argument key holding the GUID
const GUID_KEY: &str = "guid";

/// A GUID string found on a pod, with enough context to report it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedGuid {
    /// Pod namespace
    pub namespace: String,
    /// Pod name
    pub pod: String,
    /// Network name from the descriptor, if present
    pub network: Option<String>,
    /// Raw GUID text, not yet validated
    pub guid: String,
}

/// Collect the non-empty GUID strings declared in the pod's networks annotation
///
/// Missing, empty or malformed annotations yield an empty list.
#[must_use]
pub fn pod_guids(pod: &Pod) -> Vec<AnnotatedGuid> {
    let namespace = pod.metadata.namespace.clone().unwrap_or_default();
    let name = pod.metadata.name.clone().unwrap_or_default();

    let Some(raw) = pod
        .metadata
        .annotations
        .as_ref()
        .and_then(|annotations| annotations.get(NETWORKS_ANNOTATION))
    else {
        return Vec::new();
    };

    descriptor_guids(raw)
        .into_iter()
        .map(|(network, guid)| AnnotatedGuid {
            namespace: namespace.clone(),
            pod: name.clone(),
            network,
            guid,
        })
        .collect()
}

/// Extract `(network name, guid)` pairs from a raw annotation value
fn descriptor_guids(raw: &str) -> Vec<(Option<String>, String)> {
    if raw.trim().is_empty() {
        return Vec::new();
    }

    let descriptors = match serde_json::from_str::<Vec<Value>>(raw) {
        Ok(descriptors) => descriptors,
        Err(e) => {
            debug!("Skipping unparsable networks annotation: {}", e);
            return Vec::new();
        }
    };

    descriptors
        .iter()
        .filter_map(|descriptor| {
            let guid = descriptor
                .get(CNI_ARGS_KEY)
                .and_then(|args| args.get(GUID_KEY))
                .and_then(Value::as_str)
                .filter(|guid| !guid.is_empty())?;
            let network = descriptor.get("name").and_then(Value::as_str).map(str::to_string);
            Some((network, guid.to_string()))
        })
        .collect()
}
