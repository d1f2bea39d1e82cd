//! Environment configuration.

use tracing::info;

/// Default first GUID of the pool
pub const DEFAULT_RANGE_START: &str = "02:00:00:00:00:00:00:00";

/// Default last GUID of the pool
pub const DEFAULT_RANGE_END: &str = "02:FF:FF:FF:FF:FF:FF:FF";

/// Settings read from the environment.
///
/// GUID values are kept as text; they are validated when the pool is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    /// First GUID of the pool (`GUID_POOL_RANGE_START`)
    pub range_start: String,
    /// Last GUID of the pool (`GUID_POOL_RANGE_END`)
    pub range_end: String,
    /// Namespace to summarize (`WATCH_NAMESPACE`), all namespaces when unset
    pub namespace: Option<String>,
}

impl PoolConfig {
    /// Load configuration from process environment variables
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Self {
            range_start: get("GUID_POOL_RANGE_START").unwrap_or_else(|| DEFAULT_RANGE_START.to_string()),
            range_end: get("GUID_POOL_RANGE_END").unwrap_or_else(|| DEFAULT_RANGE_END.to_string()),
            namespace: get("WATCH_NAMESPACE"),
        }
    }

    /// Log the effective configuration
    pub fn log(&self) {
        info!("Configuration:");
        info!("  GUID range: {} - {}", self.range_start, self.range_end);
        info!("  Namespace: {}", self.namespace.as_deref().unwrap_or("all namespaces"));
    }
}
