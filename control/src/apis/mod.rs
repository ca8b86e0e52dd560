//! Kubernetes API integrations
//!
//! REST mapping, the typed resource watcher and controller metrics.

pub mod metrics;
pub mod resource_watcher;
pub mod rest_mapper;
