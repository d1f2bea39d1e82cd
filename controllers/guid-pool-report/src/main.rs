//! GUID Pool Report
//!
//! Rebuilds the InfiniBand GUID pool from the pods running in the cluster,
//! exactly as the allocator does at startup, and prints the resulting usage
//! as JSON. A non-zero exit means the allocator would refuse to start
//! (invalid range, unreachable API server, or conflicting GUIDs on pods).

mod config;
mod error;
mod report;

use crate::config::PoolConfig;
use crate::error::ReportError;
use ib_guid_pool::{KubePodClient, PodClientTrait};
use kube::Client;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), ReportError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    if rustls::crypto::ring::default_provider().install_default().is_err() {
        debug!("rustls crypto provider already installed");
    }

    info!("Starting GUID Pool Report");

    let config = PoolConfig::from_env();
    config.log();

    let kube_client = Client::try_default().await?;
    let client: Arc<dyn PodClientTrait> = Arc::new(KubePodClient::new(kube_client));

    let report = report::build_report(&config, client).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
