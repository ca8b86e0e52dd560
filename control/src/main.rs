use anyhow::Result;
use control::config::ControllerConfig;
use control::controller::{Config, Controller};
use control::event::logger::LoggingHandler;
use control::event::{Handler, Registry};
use std::sync::Arc;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Gateway event controller
///
/// Watches Endpoints and Nodes and logs every forwarded event.
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize rustls crypto provider (needed for Kubernetes TLS client)
    rustls::crypto::ring::default_provider()
        .install_default()
        .ok(); // Ignore error if already installed

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let env = ControllerConfig::from_env()?;
    info!(
        "Cluster ID: {}, namespace: {}, network plugin: {}",
        env.cluster_id,
        env.namespace.as_deref().unwrap_or("<all>"),
        env.network_plugin
    );

    let handlers: Vec<Arc<dyn Handler>> = vec![Arc::new(LoggingHandler::new())];
    let registry = Arc::new(Registry::new("gateway", env.network_plugin.clone(), handlers));

    let rest_config = kube::Config::infer().await?;
    let mut config = Config::new(registry, rest_config);
    config.env = Some(env);

    let controller = Controller::new(config).await?;
    info!(
        "Controller created on host {} ({} watches)",
        controller.hostname(),
        controller.watches().len()
    );

    let token = CancellationToken::new();

    tokio::select! {
        result = controller.start(token.clone()) => {
            if let Err(e) = result {
                error!("Failed to start the Event controller: {}", e);
                return Err(e.into());
            }
        }
        _ = signal::ctrl_c() => {
            info!("Shutdown signal received before initial sync");
            token.cancel();
            controller.stop().await;
            return Ok(());
        }
    }

    info!("Press Ctrl-C to exit.");
    signal::ctrl_c().await?;
    info!("Shutdown signal received");

    token.cancel();
    controller.stop().await;

    Ok(())
}
