//! Configuration for the gateway event controller
//!
//! Values come from `SUBMARINER_*` environment variables layered over defaults.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::env::{self, VarError};
use std::time::Duration;

/// Prefix shared by all controller environment variables
pub const ENV_PREFIX: &str = "SUBMARINER";

/// Handler network plugin wildcard (handler runs with any plugin)
pub const ANY_NETWORK_PLUGIN: &str = "*";

/// Controller configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ControllerConfig {
    /// Local cluster ID, used to tell local Endpoints from remote ones
    #[serde(default)]
    pub cluster_id: String,

    /// Namespace to watch Endpoints in (None = all namespaces)
    #[serde(default)]
    pub namespace: Option<String>,

    /// CNI network plugin in use, used to select handlers
    #[serde(default = "default_network_plugin")]
    pub network_plugin: String,
}

fn default_network_plugin() -> String {
    ANY_NETWORK_PLUGIN.to_string()
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            cluster_id: String::new(),
            namespace: None,
            network_plugin: default_network_plugin(),
        }
    }
}

impl ControllerConfig {
    /// Load configuration from environment variables
    ///
    /// - `SUBMARINER_CLUSTERID`
    /// - `SUBMARINER_NAMESPACE` (empty = all namespaces)
    /// - `SUBMARINER_NETWORKPLUGIN`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| env::var(name))
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Result<String, VarError>,
    {
        let read = |suffix: &str| -> Result<Option<String>, ConfigError> {
            let name = format!("{}_{}", ENV_PREFIX, suffix);
            match lookup(&name) {
                Ok(val) => Ok(Some(val)),
                Err(VarError::NotPresent) => Ok(None),
                Err(VarError::NotUnicode(_)) => Err(ConfigError::NotUnicode { name }),
            }
        };

        let mut config = Self::default();

        if let Some(val) = read("CLUSTERID")? {
            config.cluster_id = val;
        }

        if let Some(val) = read("NAMESPACE")? {
            config.namespace = Some(val).filter(|ns| !ns.is_empty());
        }

        if let Some(val) = read("NETWORKPLUGIN")? {
            if !val.is_empty() {
                config.network_plugin = val;
            }
        }

        Ok(config)
    }
}

/// Requeue policy for failed resource callbacks
///
/// A failed callback is retried with exponential backoff until it has been
/// requeued `max_requeues` times, then the event is dropped.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RetryPolicy {
    /// Maximum requeues before an event is dropped (default: 20)
    #[serde(default = "default_max_requeues")]
    pub max_requeues: u32,

    /// First retry delay in milliseconds (default: 5ms)
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Backoff ceiling in seconds (default: 1000s)
    #[serde(default = "default_max_delay_secs")]
    pub max_delay_secs: u64,
}

fn default_max_requeues() -> u32 {
    20
}

fn default_base_delay_ms() -> u64 {
    5
}

fn default_max_delay_secs() -> u64 {
    1000
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_requeues: default_max_requeues(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_secs: default_max_delay_secs(),
        }
    }
}

impl RetryPolicy {
    /// Delay before the retry following `num_requeues` previous attempts
    pub fn backoff(&self, num_requeues: u32) -> Duration {
        let max = Duration::from_secs(self.max_delay_secs);
        let factor = 1u64.checked_shl(num_requeues).unwrap_or(u64::MAX);
        let delay = Duration::from_millis(self.base_delay_ms.saturating_mul(factor));
        delay.min(max)
    }

    /// Whether another requeue is allowed after `num_requeues` attempts
    pub fn allows_requeue(&self, num_requeues: u32) -> bool {
        num_requeues < self.max_requeues
    }
}
