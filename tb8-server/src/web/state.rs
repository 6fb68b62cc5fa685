//! Application state for the web layer.

use std::sync::Arc;

use crate::dataset::{Datasets, Lookups, SELECT_ALL};
use crate::tfl::LiveFeed;

/// Default mode list for `/route-by-modes`.
pub const DEFAULT_ROUTE_MODE: &str = "tube";

/// Parameter defaults, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryDefaults {
    /// SQL run by table endpoints when no `query` is given
    pub table_query: String,

    /// All disrupted modes
    pub disruption_modes: Vec<String>,

    pub route_modes: Vec<String>,

    /// All arrivable lines
    pub arrival_lines: Vec<String>,
}

impl QueryDefaults {
    pub fn from_lookups(lookups: &Lookups) -> Self {
        Self {
            table_query: SELECT_ALL.to_string(),
            disruption_modes: lookups.disrupted_modes().to_vec(),
            route_modes: vec![DEFAULT_ROUTE_MODE.to_string()],
            arrival_lines: lookups.arrivable_line_names().to_vec(),
        }
    }
}

/// Shared application state.
///
/// Everything behind it is immutable after startup, so handlers read it
/// without locking.
#[derive(Clone)]
pub struct AppState {
    /// The loaded tables
    pub datasets: Arc<Datasets>,

    /// Token whitelists
    pub lookups: Arc<Lookups>,

    pub defaults: Arc<QueryDefaults>,

    /// Live TfL data, real or mocked
    pub live: Arc<dyn LiveFeed>,
}

impl AppState {
    /// Create a new app state, deriving the defaults from `lookups`.
    pub fn new(datasets: Datasets, lookups: Lookups, live: Arc<dyn LiveFeed>) -> Self {
        let defaults = QueryDefaults::from_lookups(&lookups);
        Self {
            datasets: Arc::new(datasets),
            lookups: Arc::new(lookups),
            defaults: Arc::new(defaults),
            live,
        }
    }
}
