//! Gateway event controller
//!
//! Watches `submariner.io/v1` Endpoints and core Nodes and forwards their
//! lifecycle events to an event [`Registry`], while tracking whether the
//! local host is the active gateway.
//!
//! ## Usage
//!
//! ```ignore
//! use control::controller::{Config, Controller};
//! use control::event::Registry;
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! let registry = Arc::new(Registry::new("gateway", "*", handlers));
//! let controller = Controller::new(Config::new(registry, kube::Config::infer().await?)).await?;
//!
//! let token = CancellationToken::new();
//! controller.start(token.clone()).await?;
//! // ... on shutdown
//! token.cancel();
//! controller.stop().await;
//! ```

pub mod handlers;

pub use handlers::{is_local_node, labels_equivalent, EventDispatcher, NodePredicate};

use crate::apis::resource_watcher::{ResourceConfig, ResourceWatcher, ResourcesEquivalent};
use crate::apis::rest_mapper::{DiscoveryRestMapper, RestMapper};
use crate::config::{ControllerConfig, RetryPolicy};
use crate::error::ControllerError;
use crate::event::{GatewayState, Registry};
use common::Endpoint;
use k8s_openapi::api::core::v1::Node;
use kube::api::Api;
use kube::Client;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Controller construction parameters
pub struct Config {
    /// Event handler registry where controller events are sent
    pub registry: Arc<Registry>,

    /// REST config used to access the watched resources
    pub rest_config: kube::Config,

    /// Pre-built client (by default one is created from `rest_config`)
    pub client: Option<Client>,

    /// REST mapper (by default API discovery through the client)
    pub rest_mapper: Option<Arc<dyn RestMapper>>,

    /// Environment configuration (by default read from `SUBMARINER_*`)
    pub env: Option<ControllerConfig>,

    /// Node update filter (default: [`labels_equivalent`])
    pub node_equivalence: Option<ResourcesEquivalent<Node>>,

    /// Local node detection (default: [`is_local_node`])
    pub local_node: Option<NodePredicate>,

    pub retry: RetryPolicy,
}

impl Config {
    pub fn new(registry: Arc<Registry>, rest_config: kube::Config) -> Self {
        Self {
            registry,
            rest_config,
            client: None,
            rest_mapper: None,
            env: None,
            node_equivalence: None,
            local_node: None,
            retry: RetryPolicy::default(),
        }
    }
}

/// Endpoint/Node event controller
pub struct Controller {
    env: ControllerConfig,
    hostname: String,
    registry: Arc<Registry>,
    state: Arc<GatewayState>,
    resource_watcher: ResourceWatcher,
}

impl Controller {
    /// Build the controller
    ///
    /// Fails without starting any watch if the hostname cannot be read, the
    /// environment is invalid, the client cannot be built, or a watched kind
    /// cannot be mapped by the API server.
    pub async fn new(config: Config) -> Result<Self, ControllerError> {
        let hostname = hostname::get()
            .map_err(ControllerError::Hostname)?
            .into_string()
            .map_err(ControllerError::InvalidHostname)?;

        let env = match config.env {
            Some(env) => env,
            None => ControllerConfig::from_env()?,
        };

        let client = match config.client {
            Some(client) => client,
            None => Client::try_from(config.rest_config).map_err(ControllerError::Client)?,
        };

        let rest_mapper: Arc<dyn RestMapper> = match config.rest_mapper {
            Some(mapper) => mapper,
            None => Arc::new(DiscoveryRestMapper::new(client.clone())),
        };

        let registry = config.registry;
        let state = Arc::new(GatewayState::new());
        let dispatcher = Arc::new(EventDispatcher::new(
            env.cluster_id.clone(),
            hostname.clone(),
            Arc::clone(&registry),
            Arc::clone(&state),
            config.local_node,
        ));

        let endpoints: Api<Endpoint> = match env.namespace.as_deref() {
            Some(namespace) => Api::namespaced(client.clone(), namespace),
            None => Api::all(client.clone()),
        };

        let node_equivalence = config
            .node_equivalence
            .unwrap_or_else(|| Arc::new(labels_equivalent) as ResourcesEquivalent<Node>);

        let resources = vec![
            ResourceConfig {
                name: format!("Endpoint watcher for {} registry", registry.name()),
                api: endpoints,
                handler: dispatcher.clone(),
                resources_equivalent: None,
                retry: config.retry.clone(),
            }
            .boxed(),
            ResourceConfig {
                name: format!("Node watcher for {} registry", registry.name()),
                api: Api::<Node>::all(client),
                handler: dispatcher,
                resources_equivalent: Some(node_equivalence),
                retry: config.retry,
            }
            .boxed(),
        ];

        let resource_watcher = ResourceWatcher::new(rest_mapper.as_ref(), resources)
            .await
            .map_err(ControllerError::Watcher)?;

        registry.set_handler_state(state.clone());

        Ok(Self {
            env,
            hostname,
            registry,
            state,
            resource_watcher,
        })
    }

    /// Start watching; returns once the initial sync completed
    pub async fn start(&self, token: CancellationToken) -> Result<(), ControllerError> {
        info!("Starting the Event controller...");

        self.resource_watcher
            .start(token)
            .await
            .map_err(ControllerError::Start)?;

        info!("Event controller started");
        Ok(())
    }

    /// Stop all handlers (best effort, errors are only logged)
    pub async fn stop(&self) {
        info!("Event controller stopping");

        if let Err(e) = self.registry.stop_handlers().await {
            warn!("In Event Controller, stopping handlers returned error: {}", e);
        }
    }

    pub fn state(&self) -> Arc<GatewayState> {
        Arc::clone(&self.state)
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn cluster_id(&self) -> &str {
        &self.env.cluster_id
    }

    pub fn namespace(&self) -> Option<&str> {
        self.env.namespace.as_deref()
    }

    /// Names of the resource watches
    pub fn watches(&self) -> &[String] {
        self.resource_watcher.names()
    }
}
