//! TfL Unified API response DTOs.
//!
//! Only the fields the service filters or sorts on are typed. Everything
//! else the API sends is kept verbatim in `rest` and passed through to
//! the response rows.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Entry from `GET /Line/Meta/Modes`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Mode {
    /// Mode identifier, e.g. "tube" or "elizabeth-line".
    pub mode_name: String,

    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// Entry from `GET /Line/Mode/{modes}/Disruption`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Disruption {
    /// e.g. "RealTime", "PlannedWork".
    pub category: Option<String>,

    /// Human-readable description of the disruption.
    pub description: Option<String>,

    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// A line as returned by `GET /Line/Mode/{modes}/Route`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineRoute {
    /// Line identifier, e.g. "victoria".
    pub id: String,

    pub name: Option<String>,

    pub mode_name: Option<String>,

    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// Response from `GET /Line/{id}/Route/Sequence/{direction}`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSequence {
    pub line_id: String,

    pub line_name: Option<String>,

    /// "inbound" or "outbound".
    pub direction: Option<String>,

    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// An arrival prediction from `GET /Line/{ids}/Arrivals[/{stopPointId}]`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    /// Line the vehicle is running on.
    pub line_id: String,

    /// Stop point the prediction is for.
    pub naptan_id: Option<String>,

    /// Seconds until the vehicle reaches the stop point.
    pub time_to_station: Option<i64>,

    /// Expected arrival instant (ISO 8601).
    pub expected_arrival: Option<String>,

    #[serde(flatten)]
    pub rest: Map<String, Value>,
}
