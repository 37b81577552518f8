use masterserver::config::Config;
use masterserver::protocol::{Dispatcher, PROTOCOL_VERSION};
use masterserver::server::serve_tcp;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

async fn serve_http_if_configured(config: &Config, dispatcher: Arc<Dispatcher>) -> std::io::Result<()> {
    let Some(addr) = config.http_addr() else {
        return std::future::pending().await;
    };

    let listener = TcpListener::bind(addr).await?;
    info!("HTTP listening on {}", listener.local_addr()?);
    masterserver::serve_http(listener, dispatcher).await
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_log_filter()));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();

    info!(protocol_version = PROTOCOL_VERSION, "Lobby masterserver");
    info!(keepalive_secs = config.keepalive.as_secs(), "Lobbies expire without heartbeat");

    let dispatcher = Arc::new(Dispatcher::new(config.keepalive));

    let listener = TcpListener::bind(config.addr()).await?;
    info!("Listening on {}", listener.local_addr()?);

    tokio::select! {
        _ = serve_tcp(listener, dispatcher.clone(), config.max_message_bytes) => {},
        result = serve_http_if_configured(&config, dispatcher) => result?,
        _ = tokio::signal::ctrl_c() => info!("Shutting down"),
    }

    Ok(())
}
