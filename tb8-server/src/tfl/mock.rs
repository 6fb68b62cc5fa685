//! Mock TfL client for running without network access.
//!
//! Loads canned API responses from JSON files and filters them by the
//! request arguments the way the live API would.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use futures::future::{self, BoxFuture, FutureExt};
use serde::de::DeserializeOwned;

use super::error::TflError;
use super::feed::LiveFeed;
use super::types::{Disruption, LineRoute, Mode, Prediction, RouteSequence};

pub const MODES_FILE: &str = "modes.json";
/// Object keyed by mode name, each value a list of disruptions.
pub const DISRUPTIONS_FILE: &str = "disruptions.json";
pub const ROUTES_FILE: &str = "routes.json";
pub const ROUTE_SEQUENCES_FILE: &str = "route_sequences.json";
pub const ARRIVALS_FILE: &str = "arrivals.json";

/// Mock client that serves data from JSON files.
#[derive(Debug, Clone)]
pub struct MockTflClient {
    modes: Vec<Mode>,
    disruptions: HashMap<String, Vec<Disruption>>,
    routes: Vec<LineRoute>,
    route_sequences: Vec<RouteSequence>,
    arrivals: Vec<Prediction>,
}

impl MockTflClient {
    /// Create a mock client by loading every fixture file in `data_dir`.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, TflError> {
        let dir = data_dir.as_ref();

        Ok(Self {
            modes: read_fixture(dir, MODES_FILE)?,
            disruptions: read_fixture(dir, DISRUPTIONS_FILE)?,
            routes: read_fixture(dir, ROUTES_FILE)?,
            route_sequences: read_fixture(dir, ROUTE_SEQUENCES_FILE)?,
            arrivals: read_fixture(dir, ARRIVALS_FILE)?,
        })
    }

    pub fn get_disruptions(&self, modes: &[String]) -> Vec<Disruption> {
        modes
            .iter()
            .filter_map(|mode| self.disruptions.get(mode))
            .flatten()
            .cloned()
            .collect()
    }

    pub fn get_routes(&self, modes: &[String]) -> Vec<LineRoute> {
        self.routes
            .iter()
            .filter(|route| {
                route
                    .mode_name
                    .as_ref()
                    .is_some_and(|mode| modes.contains(mode))
            })
            .cloned()
            .collect()
    }

    pub fn get_route_sequence(
        &self,
        line: &str,
        direction: &str,
    ) -> Result<RouteSequence, TflError> {
        self.route_sequences
            .iter()
            .find(|sequence| {
                sequence.line_id == line
                    && sequence
                        .direction
                        .as_deref()
                        .is_some_and(|d| d.eq_ignore_ascii_case(direction))
            })
            .cloned()
            .ok_or_else(|| TflError::NotFound(format!("/Line/{line}/Route/Sequence/{direction}")))
    }

    pub fn get_arrivals(&self, lines: &[String]) -> Vec<Prediction> {
        self.arrivals
            .iter()
            .filter(|p| lines.contains(&p.line_id))
            .cloned()
            .collect()
    }

    pub fn get_arrivals_at(&self, stop_point: &str, lines: &[String]) -> Vec<Prediction> {
        self.arrivals
            .iter()
            .filter(|p| lines.contains(&p.line_id) && p.naptan_id.as_deref() == Some(stop_point))
            .cloned()
            .collect()
    }
}

fn read_fixture<T: DeserializeOwned>(dir: &Path, file: &str) -> Result<T, TflError> {
    let path = dir.join(file);
    let json = fs::read_to_string(&path)
        .map_err(|e| TflError::Fixture(format!("failed to read {}: {e}", path.display())))?;

    serde_json::from_str(&json)
        .map_err(|e| TflError::Fixture(format!("failed to parse {}: {e}", path.display())))
}

impl LiveFeed for MockTflClient {
    fn modes(&self) -> BoxFuture<'_, Result<Vec<Mode>, TflError>> {
        future::ready(Ok(self.modes.clone())).boxed()
    }

    fn disruptions<'a>(
        &'a self,
        modes: &'a [String],
    ) -> BoxFuture<'a, Result<Vec<Disruption>, TflError>> {
        future::ready(Ok(self.get_disruptions(modes))).boxed()
    }

    fn routes<'a>(
        &'a self,
        modes: &'a [String],
    ) -> BoxFuture<'a, Result<Vec<LineRoute>, TflError>> {
        future::ready(Ok(self.get_routes(modes))).boxed()
    }

    fn route_sequence<'a>(
        &'a self,
        line: &'a str,
        direction: &'a str,
    ) -> BoxFuture<'a, Result<RouteSequence, TflError>> {
        future::ready(self.get_route_sequence(line, direction)).boxed()
    }

    fn arrivals<'a>(
        &'a self,
        lines: &'a [String],
    ) -> BoxFuture<'a, Result<Vec<Prediction>, TflError>> {
        future::ready(Ok(self.get_arrivals(lines))).boxed()
    }

    fn arrivals_at<'a>(
        &'a self,
        stop_point: &'a str,
        lines: &'a [String],
    ) -> BoxFuture<'a, Result<Vec<Prediction>, TflError>> {
        future::ready(Ok(self.get_arrivals_at(stop_point, lines))).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOCK_DIR: &str = "data/mock_tfl";

    fn client() -> MockTflClient {
        MockTflClient::new(MOCK_DIR).unwrap()
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn load_mock_data() {
        let modes = client().modes().await.unwrap();
        assert!(modes.iter().any(|m| m.mode_name == "tube"));
        assert!(modes.iter().any(|m| m.mode_name == "walking"));
    }

    #[test]
    fn disruptions_are_selected_by_mode() {
        let client = client();
        assert!(!client.get_disruptions(&strings(&["tube"])).is_empty());
        assert!(client.get_disruptions(&strings(&["overground"])).is_empty());

        let both = client.get_disruptions(&strings(&["tube", "dlr"]));
        let tube = client.get_disruptions(&strings(&["tube"]));
        let dlr = client.get_disruptions(&strings(&["dlr"]));
        assert_eq!(both.len(), tube.len() + dlr.len());
    }

    #[test]
    fn routes_are_filtered_by_mode() {
        let routes = client().get_routes(&strings(&["dlr"]));
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].id, "dlr");
    }

    #[test]
    fn route_sequence_matches_line_and_direction() {
        let client = client();
        let sequence = client.get_route_sequence("victoria", "Outbound").unwrap();
        assert_eq!(sequence.line_id, "victoria");
        assert_eq!(sequence.direction.as_deref(), Some("outbound"));

        let err = client.get_route_sequence("victoria", "sideways").unwrap_err();
        assert!(matches!(err, TflError::NotFound(_)));
    }

    #[test]
    fn arrivals_are_filtered_by_line_and_stop() {
        let client = client();
        let victoria = client.get_arrivals(&strings(&["victoria"]));
        assert!(!victoria.is_empty());
        assert!(victoria.iter().all(|p| p.line_id == "victoria"));

        let at_oxford_circus = client.get_arrivals_at("940GZZLUOXC", &strings(&["victoria"]));
        assert!(!at_oxford_circus.is_empty());
        assert!(at_oxford_circus.len() < victoria.len());
        assert!(
            at_oxford_circus
                .iter()
                .all(|p| p.naptan_id.as_deref() == Some("940GZZLUOXC"))
        );
    }

    #[test]
    fn missing_directory_is_an_error() {
        let err = MockTflClient::new("data/does_not_exist").unwrap_err();
        assert!(matches!(err, TflError::Fixture(_)));
        assert!(err.to_string().contains("modes.json"));
    }
}
