use tracing_subscriber::EnvFilter;

use predlb_server::config::AppConfig;
use predlb_server::state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .json()
        .init();

    let config = AppConfig::from_env()?;
    let state = AppState::from_config(&config)?;

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    tracing::info!(address = %config.bind_address, "predlb server listening");
    axum::serve(listener, predlb_server::app(state)).await?;
    Ok(())
}
