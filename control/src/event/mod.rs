//! Event handler framework
//!
//! The controller translates Endpoint and Node watch callbacks into [`Event`]s
//! and forwards them through a [`Registry`] to every registered [`Handler`].
//! Handlers see the controller's gateway status via [`HandlerState`].

pub mod logger;
pub mod registry;
pub mod state;

pub use registry::Registry;
pub use state::{GatewayState, HandlerState};

use async_trait::async_trait;
use common::Endpoint;
use k8s_openapi::api::core::v1::Node;
use std::sync::Arc;

/// Error returned by a handler callback
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

pub type HandlerResult = Result<(), HandlerError>;

/// Normalized lifecycle event forwarded to handlers
#[derive(Debug, Clone)]
pub enum Event {
    TransitionToGateway,
    TransitionToNonGateway,
    LocalEndpointCreated(Arc<Endpoint>),
    LocalEndpointUpdated(Arc<Endpoint>),
    LocalEndpointRemoved(Arc<Endpoint>),
    RemoteEndpointCreated(Arc<Endpoint>),
    RemoteEndpointUpdated(Arc<Endpoint>),
    RemoteEndpointRemoved(Arc<Endpoint>),
    NodeCreated(Arc<Node>),
    NodeUpdated(Arc<Node>),
    NodeRemoved(Arc<Node>),
}

impl Event {
    /// Stable event name (used in logs and metric labels)
    pub fn name(&self) -> &'static str {
        match self {
            Event::TransitionToGateway => "TransitionToGateway",
            Event::TransitionToNonGateway => "TransitionToNonGateway",
            Event::LocalEndpointCreated(_) => "LocalEndpointCreated",
            Event::LocalEndpointUpdated(_) => "LocalEndpointUpdated",
            Event::LocalEndpointRemoved(_) => "LocalEndpointRemoved",
            Event::RemoteEndpointCreated(_) => "RemoteEndpointCreated",
            Event::RemoteEndpointUpdated(_) => "RemoteEndpointUpdated",
            Event::RemoteEndpointRemoved(_) => "RemoteEndpointRemoved",
            Event::NodeCreated(_) => "NodeCreated",
            Event::NodeUpdated(_) => "NodeUpdated",
            Event::NodeRemoved(_) => "NodeRemoved",
        }
    }
}

/// Downstream consumer of controller events
///
/// Every event method defaults to a no-op, so a handler only implements
/// the events it cares about.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Handler name (for logging and error aggregation)
    fn name(&self) -> &str;

    /// Network plugins this handler supports (`"*"` = any)
    fn network_plugins(&self) -> Vec<String>;

    /// Receive the shared handler state
    fn set_state(&self, _state: Arc<dyn HandlerState>) {}

    async fn stop(&self) -> HandlerResult {
        Ok(())
    }

    async fn transition_to_gateway(&self) -> HandlerResult {
        Ok(())
    }

    async fn transition_to_non_gateway(&self) -> HandlerResult {
        Ok(())
    }

    async fn local_endpoint_created(&self, _endpoint: &Endpoint) -> HandlerResult {
        Ok(())
    }

    async fn local_endpoint_updated(&self, _endpoint: &Endpoint) -> HandlerResult {
        Ok(())
    }

    async fn local_endpoint_removed(&self, _endpoint: &Endpoint) -> HandlerResult {
        Ok(())
    }

    async fn remote_endpoint_created(&self, _endpoint: &Endpoint) -> HandlerResult {
        Ok(())
    }

    async fn remote_endpoint_updated(&self, _endpoint: &Endpoint) -> HandlerResult {
        Ok(())
    }

    async fn remote_endpoint_removed(&self, _endpoint: &Endpoint) -> HandlerResult {
        Ok(())
    }

    async fn node_created(&self, _node: &Node) -> HandlerResult {
        Ok(())
    }

    async fn node_updated(&self, _node: &Node) -> HandlerResult {
        Ok(())
    }

    async fn node_removed(&self, _node: &Node) -> HandlerResult {
        Ok(())
    }
}

/// Invoke the handler method matching `event`
pub(crate) async fn deliver(handler: &dyn Handler, event: &Event) -> HandlerResult {
    match event {
        Event::TransitionToGateway => handler.transition_to_gateway().await,
        Event::TransitionToNonGateway => handler.transition_to_non_gateway().await,
        Event::LocalEndpointCreated(ep) => handler.local_endpoint_created(ep).await,
        Event::LocalEndpointUpdated(ep) => handler.local_endpoint_updated(ep).await,
        Event::LocalEndpointRemoved(ep) => handler.local_endpoint_removed(ep).await,
        Event::RemoteEndpointCreated(ep) => handler.remote_endpoint_created(ep).await,
        Event::RemoteEndpointUpdated(ep) => handler.remote_endpoint_updated(ep).await,
        Event::RemoteEndpointRemoved(ep) => handler.remote_endpoint_removed(ep).await,
        Event::NodeCreated(node) => handler.node_created(node).await,
        Event::NodeUpdated(node) => handler.node_updated(node).await,
        Event::NodeRemoved(node) => handler.node_removed(node).await,
    }
}
