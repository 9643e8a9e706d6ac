use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;
use transit_pulse::{
    api::create_app,
    config::{load_config, PulseConfig},
    fleet::FleetStore,
    simulation,
    subscription::SubscriberRegistry,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "transit_pulse=info".into()),
        )
        .init();

    info!("Transit pulse starting...");

    let mut config = match std::env::var("TRANSIT_PULSE_CONFIG") {
        Ok(path) => {
            info!(path = %path, "Loading configuration");
            load_config(&path)?
        }
        Err(_) => PulseConfig::default(),
    };
    config.apply_env();
    config.validate().context("Invalid configuration")?;

    let store = Arc::new(FleetStore::seeded());
    let registry = Arc::new(SubscriberRegistry::new(
        config.subscribers.channel_capacity,
    ));

    let simulators = simulation::spawn_all(Arc::clone(&store), Arc::clone(&registry), &config);

    let app = create_app(store, registry);
    let address = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    info!(address = %address, "Listening for HTTP and WebSocket connections");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // No drain: in-flight frames to closing subscribers may be lost
    for handle in simulators {
        handle.abort();
    }

    info!("Transit pulse stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
