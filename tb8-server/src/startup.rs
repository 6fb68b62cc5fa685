//! One-off startup: load the tables, fetch the mode list, derive lookups.

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::config::{ConfigError, ServerConfig};
use crate::dataset::{DatasetError, Lookups, QueryError, load_datasets};
use crate::tfl::{LiveFeed, MockTflClient, TflClient, TflError};
use crate::web::AppState;

/// Anything that stops the server from starting.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to load datasets: {0}")]
    Dataset(#[from] DatasetError),

    #[error("failed to create TfL client: {0}")]
    Client(#[source] TflError),

    #[error("failed to fetch transport modes: {0}")]
    Modes(#[source] TflError),

    #[error("failed to derive line lookups: {0}")]
    Lookups(#[from] QueryError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Build the application state described by `config`.
pub async fn bootstrap(config: &ServerConfig) -> Result<AppState, StartupError> {
    let live: Arc<dyn LiveFeed> = match &config.mock_dir {
        Some(dir) => {
            info!(dir = %dir.display(), "serving live endpoints from fixtures");
            Arc::new(MockTflClient::new(dir).map_err(StartupError::Client)?)
        }
        None => {
            info!(base_url = %config.tfl.base_url, "using TfL Unified API");
            Arc::new(TflClient::new(config.tfl.clone()).map_err(StartupError::Client)?)
        }
    };

    build_state(&config.data_dir, live).await
}

/// Load the tables from `data_dir` and derive the lookups, using `live`
/// for the mode list.
pub async fn build_state(
    data_dir: &Path,
    live: Arc<dyn LiveFeed>,
) -> Result<AppState, StartupError> {
    let datasets = load_datasets(data_dir)?;
    for table in datasets.tables() {
        info!(table = table.name(), rows = table.height(), "loaded table");
    }

    let modes = live.modes().await.map_err(StartupError::Modes)?;
    let lookups = Lookups::derive(&datasets.lines, modes.into_iter().map(|m| m.mode_name))?;
    info!(
        lines = lookups.arrivable_line_names().len(),
        modes = lookups.disrupted_modes().len(),
        "derived lookups"
    );

    Ok(AppState::new(datasets, lookups, live))
}
