//! Endpoint and Node callbacks
//!
//! Translates watch callbacks into handler state updates and registry events.
//! Every callback returns `true` when the event must be requeued.

use crate::apis::resource_watcher::ResourceEventHandler;
use crate::event::{Event, GatewayState, Registry};
use async_trait::async_trait;
use common::{is_gateway_node, Endpoint, HOSTNAME_LABEL};
use k8s_openapi::api::core::v1::Node;
use kube::ResourceExt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Decides whether a Node is the local host, given the local hostname
///
/// A matching node only updates the gateway flag from its label. Gateway
/// transition events are driven by the local Endpoint alone.
pub type NodePredicate = Arc<dyn Fn(&Node, &str) -> bool + Send + Sync>;

/// Default local-node check: node name or hostname label equals the hostname
pub fn is_local_node(node: &Node, hostname: &str) -> bool {
    node.name_any() == hostname
        || node
            .labels()
            .get(HOSTNAME_LABEL)
            .map(|value| value == hostname)
            .unwrap_or(false)
}

/// Default Node equivalence: label changes are the only meaningful updates
pub fn labels_equivalent(old: &Node, new: &Node) -> bool {
    old.labels() == new.labels()
}

/// Bridges watch callbacks to [`GatewayState`] and the event [`Registry`]
pub struct EventDispatcher {
    cluster_id: String,
    hostname: String,
    registry: Arc<Registry>,
    state: Arc<GatewayState>,
    local_node: NodePredicate,
    // Last gateway transition successfully delivered to handlers
    was_on_gateway: AtomicBool,
}

impl EventDispatcher {
    pub fn new(
        cluster_id: impl Into<String>,
        hostname: impl Into<String>,
        registry: Arc<Registry>,
        state: Arc<GatewayState>,
        local_node: Option<NodePredicate>,
    ) -> Self {
        Self {
            cluster_id: cluster_id.into(),
            hostname: hostname.into(),
            registry,
            state,
            local_node: local_node.unwrap_or_else(|| Arc::new(is_local_node) as NodePredicate),
            was_on_gateway: AtomicBool::new(false),
        }
    }

    /// Dispatch an event; returns `true` (requeue) on failure
    async fn forward(&self, event: Event, num_requeues: u32) -> bool {
        match self.registry.dispatch(&event).await {
            Ok(()) => false,
            Err(e) => {
                warn!(
                    "Error handling {} (attempt {}): {}",
                    event.name(),
                    num_requeues,
                    e
                );
                true
            }
        }
    }

    fn is_local(&self, endpoint: &Endpoint) -> bool {
        endpoint.is_from_cluster(&self.cluster_id)
    }

    async fn transition_to_gateway(&self, num_requeues: u32) -> bool {
        self.state.set_on_gateway(true);
        if self.was_on_gateway.load(Ordering::SeqCst) {
            return false;
        }

        info!("Host {} became the active gateway", self.hostname);
        if self.forward(Event::TransitionToGateway, num_requeues).await {
            return true;
        }
        self.was_on_gateway.store(true, Ordering::SeqCst);
        false
    }

    async fn transition_to_non_gateway(&self, num_requeues: u32) -> bool {
        self.state.set_on_gateway(false);
        if !self.was_on_gateway.load(Ordering::SeqCst) {
            return false;
        }

        info!("Host {} is no longer the active gateway", self.hostname);
        if self.forward(Event::TransitionToNonGateway, num_requeues).await {
            return true;
        }
        self.was_on_gateway.store(false, Ordering::SeqCst);
        false
    }

    async fn local_endpoint_applied(
        &self,
        endpoint: Arc<Endpoint>,
        num_requeues: u32,
        event: fn(Arc<Endpoint>) -> Event,
    ) -> bool {
        let requeue = if endpoint.is_from_host(&self.hostname) {
            self.transition_to_gateway(num_requeues).await
        } else {
            // Another host in this cluster took over the gateway role
            self.transition_to_non_gateway(num_requeues).await
        };

        if requeue {
            return true;
        }

        self.forward(event(endpoint), num_requeues).await
    }

    /// Sets the flag from the local node's gateway label without sending a
    /// transition event; handlers may observe the flag change first.
    async fn node_applied(
        &self,
        node: Arc<Node>,
        num_requeues: u32,
        event: fn(Arc<Node>) -> Event,
    ) -> bool {
        if (self.local_node)(&node, &self.hostname) {
            let on_gateway = is_gateway_node(node.labels());
            debug!(
                "Local node {} updated, gateway: {}",
                node.name_any(),
                on_gateway
            );
            self.state.set_on_gateway(on_gateway);
        }

        self.forward(event(node), num_requeues).await
    }
}

#[async_trait]
impl ResourceEventHandler<Endpoint> for EventDispatcher {
    async fn on_create(&self, endpoint: Arc<Endpoint>, num_requeues: u32) -> bool {
        if self.is_local(&endpoint) {
            return self
                .local_endpoint_applied(endpoint, num_requeues, Event::LocalEndpointCreated)
                .await;
        }

        self.state.upsert(endpoint.identity(), Arc::clone(&endpoint));
        self.forward(Event::RemoteEndpointCreated(endpoint), num_requeues)
            .await
    }

    async fn on_update(&self, endpoint: Arc<Endpoint>, num_requeues: u32) -> bool {
        if self.is_local(&endpoint) {
            return self
                .local_endpoint_applied(endpoint, num_requeues, Event::LocalEndpointUpdated)
                .await;
        }

        self.state.upsert(endpoint.identity(), Arc::clone(&endpoint));
        self.forward(Event::RemoteEndpointUpdated(endpoint), num_requeues)
            .await
    }

    async fn on_delete(&self, endpoint: Arc<Endpoint>, num_requeues: u32) -> bool {
        if self.is_local(&endpoint) {
            if endpoint.is_from_host(&self.hostname)
                && self.transition_to_non_gateway(num_requeues).await
            {
                return true;
            }

            return self
                .forward(Event::LocalEndpointRemoved(endpoint), num_requeues)
                .await;
        }

        self.state.remove(&endpoint.identity());
        self.forward(Event::RemoteEndpointRemoved(endpoint), num_requeues)
            .await
    }
}

#[async_trait]
impl ResourceEventHandler<Node> for EventDispatcher {
    async fn on_create(&self, node: Arc<Node>, num_requeues: u32) -> bool {
        self.node_applied(node, num_requeues, Event::NodeCreated)
            .await
    }

    async fn on_update(&self, node: Arc<Node>, num_requeues: u32) -> bool {
        self.node_applied(node, num_requeues, Event::NodeUpdated)
            .await
    }

    async fn on_delete(&self, node: Arc<Node>, num_requeues: u32) -> bool {
        if (self.local_node)(&node, &self.hostname) {
            debug!("Local node {} deleted", node.name_any());
            self.state.set_on_gateway(false);
        }

        self.forward(Event::NodeRemoved(node), num_requeues).await
    }
}
