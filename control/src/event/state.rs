//! Handler State - shared gateway status visible to every event handler
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                          GatewayState                            │
//! ├──────────────────────────────────────────────────────────────────┤
//! │  on_gateway (AtomicBool)      │  remote_endpoints                │
//! │  lock-free load/store         │  RwLock<HashMap<identity, Arc>>  │
//! └──────────────────────────────────────────────────────────────────┘
//!          ▲ written by controller callbacks     ▲ read by handlers
//! ```
//!
//! - **Writers**: Endpoint and Node callbacks, possibly concurrently
//! - **Readers**: any handler, through the [`HandlerState`] trait object
//! - **Thread-safe**: RwLock with poison recovery, never held across `.await`

use common::Endpoint;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, warn};

/// Read-only view of the controller state handed to event handlers
pub trait HandlerState: Send + Sync {
    /// Whether the local node is currently the active gateway
    fn is_on_gateway(&self) -> bool;

    /// Snapshot of all known remote Endpoints
    fn remote_endpoints(&self) -> Vec<Endpoint>;
}

#[inline]
fn safe_read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| {
        warn!("RwLock poisoned during read, recovering (data is still valid)");
        poisoned.into_inner()
    })
}

#[inline]
fn safe_write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| {
        warn!("RwLock poisoned during write, recovering (data is still valid)");
        poisoned.into_inner()
    })
}

/// Gateway flag plus remote Endpoints keyed by identity
///
/// Created once per controller and never reset. Entries are added on
/// create/update and removed only by explicit deletes.
#[derive(Debug, Default)]
pub struct GatewayState {
    on_gateway: AtomicBool,
    remote_endpoints: RwLock<HashMap<String, Arc<Endpoint>>>,
}

impl GatewayState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the gateway flag (last write wins)
    pub fn set_on_gateway(&self, on_gateway: bool) {
        self.on_gateway.store(on_gateway, Ordering::SeqCst);
    }

    /// Insert or replace the remote Endpoint stored under `identity`
    pub fn upsert(&self, identity: impl Into<String>, endpoint: Arc<Endpoint>) {
        let identity = identity.into();
        let mut endpoints = safe_write(&self.remote_endpoints);
        if endpoints.insert(identity.clone(), endpoint).is_none() {
            debug!(
                "Remote endpoint {} added (total: {})",
                identity,
                endpoints.len()
            );
        }
    }

    /// Remove the remote Endpoint stored under `identity`
    ///
    /// Returns `true` if an entry was present.
    pub fn remove(&self, identity: &str) -> bool {
        let mut endpoints = safe_write(&self.remote_endpoints);
        let was_present = endpoints.remove(identity).is_some();
        if was_present {
            debug!(
                "Remote endpoint {} removed (total: {})",
                identity,
                endpoints.len()
            );
        }
        was_present
    }

    /// Look up a single remote Endpoint
    pub fn get(&self, identity: &str) -> Option<Arc<Endpoint>> {
        safe_read(&self.remote_endpoints).get(identity).cloned()
    }

    /// Identities of all known remote Endpoints
    pub fn identities(&self) -> Vec<String> {
        safe_read(&self.remote_endpoints).keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        safe_read(&self.remote_endpoints).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl HandlerState for GatewayState {
    #[inline]
    fn is_on_gateway(&self) -> bool {
        self.on_gateway.load(Ordering::SeqCst)
    }

    fn remote_endpoints(&self) -> Vec<Endpoint> {
        safe_read(&self.remote_endpoints)
            .values()
            .map(|endpoint| Endpoint::clone(endpoint))
            .collect()
    }
}

impl fmt::Display for GatewayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GatewayState(on_gateway: {}, remote endpoints: {})",
            self.is_on_gateway(),
            self.len()
        )
    }
}
