//! Logging event handler
//!
//! Writes every controller event to the tracing log. Registered by the
//! `event-controller` binary so the controller is observable on its own.

use super::{Handler, HandlerResult, HandlerState};
use crate::config::ANY_NETWORK_PLUGIN;
use async_trait::async_trait;
use common::Endpoint;
use k8s_openapi::api::core::v1::Node;
use kube::ResourceExt;
use std::sync::{Arc, OnceLock};
use tracing::info;

#[derive(Default)]
pub struct LoggingHandler {
    state: OnceLock<Arc<dyn HandlerState>>,
}

impl LoggingHandler {
    pub fn new() -> Self {
        Self::default()
    }

    fn remote_count(&self) -> usize {
        self.state
            .get()
            .map(|state| state.remote_endpoints().len())
            .unwrap_or(0)
    }

    fn log_endpoint(&self, what: &str, endpoint: &Endpoint) {
        info!(
            cluster_id = %endpoint.spec.cluster_id,
            hostname = %endpoint.spec.hostname,
            backend = %endpoint.spec.backend,
            "{} endpoint {}",
            what,
            endpoint.identity()
        );
    }
}

#[async_trait]
impl Handler for LoggingHandler {
    fn name(&self) -> &str {
        "event-logger"
    }

    fn network_plugins(&self) -> Vec<String> {
        vec![ANY_NETWORK_PLUGIN.to_string()]
    }

    fn set_state(&self, state: Arc<dyn HandlerState>) {
        let _ = self.state.set(state);
    }

    async fn stop(&self) -> HandlerResult {
        info!("Event logger stopped");
        Ok(())
    }

    async fn transition_to_gateway(&self) -> HandlerResult {
        info!(
            remote_endpoints = self.remote_count(),
            "Local node is now the active gateway"
        );
        Ok(())
    }

    async fn transition_to_non_gateway(&self) -> HandlerResult {
        info!("Local node is no longer the active gateway");
        Ok(())
    }

    async fn local_endpoint_created(&self, endpoint: &Endpoint) -> HandlerResult {
        self.log_endpoint("Created local", endpoint);
        Ok(())
    }

    async fn local_endpoint_updated(&self, endpoint: &Endpoint) -> HandlerResult {
        self.log_endpoint("Updated local", endpoint);
        Ok(())
    }

    async fn local_endpoint_removed(&self, endpoint: &Endpoint) -> HandlerResult {
        self.log_endpoint("Removed local", endpoint);
        Ok(())
    }

    async fn remote_endpoint_created(&self, endpoint: &Endpoint) -> HandlerResult {
        self.log_endpoint("Created remote", endpoint);
        Ok(())
    }

    async fn remote_endpoint_updated(&self, endpoint: &Endpoint) -> HandlerResult {
        self.log_endpoint("Updated remote", endpoint);
        Ok(())
    }

    async fn remote_endpoint_removed(&self, endpoint: &Endpoint) -> HandlerResult {
        self.log_endpoint("Removed remote", endpoint);
        Ok(())
    }

    async fn node_created(&self, node: &Node) -> HandlerResult {
        info!("Node created: {}", node.name_any());
        Ok(())
    }

    async fn node_updated(&self, node: &Node) -> HandlerResult {
        info!("Node updated: {}", node.name_any());
        Ok(())
    }

    async fn node_removed(&self, node: &Node) -> HandlerResult {
        info!("Node removed: {}", node.name_any());
        Ok(())
    }
}
