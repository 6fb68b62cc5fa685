use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use tb8_server::config::ServerConfig;
use tb8_server::startup::{StartupError, bootstrap};
use tb8_server::web::create_router;

/// Log filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "tb8_server=info,tower_http=info";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_target(true)
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "server failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), StartupError> {
    let config = ServerConfig::from_env()?;
    let state = bootstrap(&config).await?;
    let app = create_router(state);

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("tubeulator listening on http://{addr}");
    info!("table endpoints: /lines /lines-by-station /stations /platforms /station-points");
    info!(
        "live endpoints: /disruption-by-modes /route-by-modes /route-sequence-by-line-direction \
         /arrivals-by-lines /arrivals-by-station"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
