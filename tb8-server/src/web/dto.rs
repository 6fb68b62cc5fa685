//! Query parameters accepted by the endpoints.
//!
//! Every parameter is optional at the extractor level so that a missing
//! value ends up in a failure envelope rather than a 400 from axum.

use serde::Deserialize;

/// `?query=` on the table and csv endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct QueryParams {
    /// SQL for table endpoints, comma-separated tokens for csv endpoints
    pub query: Option<String>,
}

/// Parameters of `/route-sequence-by-line-direction`.
#[derive(Debug, Default, Deserialize)]
pub struct RouteSequenceParams {
    pub line: Option<String>,

    /// Passed to the upstream as given, e.g. "inbound" or "outbound"
    pub direction: Option<String>,
}

/// Parameters of `/arrivals-by-station`.
#[derive(Debug, Default, Deserialize)]
pub struct StationArrivalsParams {
    /// Stop point id, e.g. "940GZZLUOXC"
    pub query: Option<String>,

    /// Comma-separated line ids; all arrivable lines when absent
    pub lines: Option<String>,
}

/// Treat blank parameters as absent. Non-blank values are returned as sent.
pub(crate) fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
