//! Event handler registry
//!
//! Holds the handlers selected for the active network plugin and fans each
//! event out to all of them. A failing handler does not prevent delivery to
//! the handlers after it; failures are aggregated into one [`RegistryError`].

use super::{deliver, Event, Handler, HandlerError, HandlerState};
use crate::apis::metrics::record_event_dispatch;
use crate::config::ANY_NETWORK_PLUGIN;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info};

/// A single handler failure inside an aggregated registry error
#[derive(Debug)]
pub struct HandlerFailure {
    pub handler: String,
    pub error: HandlerError,
}

impl fmt::Display for HandlerFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.handler, self.error)
    }
}

/// Failures of one registry operation across handlers
#[derive(Error, Debug)]
#[error("{operation} failed in registry {registry}: {}", join_failures(.failures))]
pub struct RegistryError {
    pub registry: String,
    pub operation: &'static str,
    pub failures: Vec<HandlerFailure>,
}

fn join_failures(failures: &[HandlerFailure]) -> String {
    failures
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Registry of event handlers for one network plugin
pub struct Registry {
    name: String,
    network_plugin: String,
    handlers: Vec<Arc<dyn Handler>>,
}

impl Registry {
    /// Build a registry, keeping only handlers that support `network_plugin`
    pub fn new(
        name: impl Into<String>,
        network_plugin: impl Into<String>,
        handlers: Vec<Arc<dyn Handler>>,
    ) -> Self {
        let name = name.into();
        let network_plugin = network_plugin.into();

        let handlers: Vec<_> = handlers
            .into_iter()
            .filter(|handler| {
                let supported = supports_plugin(handler.as_ref(), &network_plugin);
                if supported {
                    info!(
                        "Event registry {}: adding handler {} for network plugin {}",
                        name,
                        handler.name(),
                        network_plugin
                    );
                } else {
                    debug!(
                        "Event registry {}: ignoring handler {} (does not support {})",
                        name,
                        handler.name(),
                        network_plugin
                    );
                }
                supported
            })
            .collect();

        Self {
            name,
            network_plugin,
            handlers,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn network_plugin(&self) -> &str {
        &self.network_plugin
    }

    /// Names of the handlers selected for this registry
    pub fn handler_names(&self) -> Vec<String> {
        self.handlers.iter().map(|h| h.name().to_string()).collect()
    }

    /// Give every handler access to the shared handler state
    pub fn set_handler_state(&self, state: Arc<dyn HandlerState>) {
        for handler in &self.handlers {
            handler.set_state(Arc::clone(&state));
        }
    }

    /// Forward an event to every handler, in registration order
    pub async fn dispatch(&self, event: &Event) -> Result<(), RegistryError> {
        let start = Instant::now();
        let mut failures = Vec::new();

        for handler in &self.handlers {
            debug!(
                "Event registry {}: {} -> {}",
                self.name,
                event.name(),
                handler.name()
            );
            if let Err(error) = deliver(handler.as_ref(), event).await {
                failures.push(HandlerFailure {
                    handler: handler.name().to_string(),
                    error,
                });
            }
        }

        let result = if failures.is_empty() {
            "success"
        } else {
            "error"
        };
        record_event_dispatch(event.name(), start.elapsed().as_secs_f64(), result);

        self.aggregate(event.name(), failures)
    }

    /// Stop all handlers, continuing past individual failures
    pub async fn stop_handlers(&self) -> Result<(), RegistryError> {
        let mut failures = Vec::new();

        for handler in &self.handlers {
            if let Err(error) = handler.stop().await {
                failures.push(HandlerFailure {
                    handler: handler.name().to_string(),
                    error,
                });
            }
        }

        self.aggregate("Stop", failures)
    }

    fn aggregate(
        &self,
        operation: &'static str,
        failures: Vec<HandlerFailure>,
    ) -> Result<(), RegistryError> {
        if failures.is_empty() {
            Ok(())
        } else {
            Err(RegistryError {
                registry: self.name.clone(),
                operation,
                failures,
            })
        }
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("name", &self.name)
            .field("network_plugin", &self.network_plugin)
            .field("handlers", &self.handler_names())
            .finish()
    }
}

fn supports_plugin(handler: &dyn Handler, network_plugin: &str) -> bool {
    handler
        .network_plugins()
        .iter()
        .any(|p| p == ANY_NETWORK_PLUGIN || p == network_plugin)
}
