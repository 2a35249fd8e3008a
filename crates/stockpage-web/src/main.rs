use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};

use stockpage_core::{ReqwestHttpClient, UpstreamConfig};
use stockpage_web::cli::Cli;
use stockpage_web::error::ServeError;
use stockpage_web::{router, AppState};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "stockpage exited");
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: Cli) -> Result<(), ServeError> {
    let config = cli.upstream_config(UpstreamConfig::from_env()?)?;
    info!(
        upstream = config.base_url(),
        api_key = config.has_api_key(),
        timeout_ms = ?config.timeout_ms(),
        "upstream configured"
    );

    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port)
        .parse()
        .map_err(|_| ServeError::InvalidAddress {
            value: format!("{}:{}", cli.host, cli.port),
        })?;

    let state = AppState::new(config, Arc::new(ReqwestHttpClient::new()));
    let app = router(state);

    info!("Registering routes:");
    info!("  GET /api/stocks/:symbol?period=daily|weekly|monthly|yearly");
    info!("  GET /api/stocks/:symbol/overview");
    info!("  GET /api/page?symbol=AAPL&period=daily");
    info!("  GET /health");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
