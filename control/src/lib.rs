//! Gateway Event Controller Library
//!
//! Watches Endpoint and Node resources and forwards their lifecycle events
//! to a registry of event handlers.

pub mod apis;
pub mod config;
pub mod controller;
pub mod error;
pub mod event;

pub use controller::{Config, Controller};
pub use error::ControllerError;
