//! The live-data seam between the web layer and the upstream API.

use futures::future::BoxFuture;

use super::error::TflError;
use super::types::{Disruption, LineRoute, Mode, Prediction, RouteSequence};

/// Source of live network data.
///
/// Implemented by [`TflClient`](super::TflClient) for production and by
/// [`MockTflClient`](super::MockTflClient) for offline use and tests.
/// Token arguments arrive already validated.
pub trait LiveFeed: Send + Sync {
    /// Every transport mode known upstream.
    fn modes(&self) -> BoxFuture<'_, Result<Vec<Mode>, TflError>>;

    /// Current disruptions on all lines of `modes`.
    fn disruptions<'a>(
        &'a self,
        modes: &'a [String],
    ) -> BoxFuture<'a, Result<Vec<Disruption>, TflError>>;

    /// Lines, with route sections, of `modes`.
    fn routes<'a>(&'a self, modes: &'a [String]) -> BoxFuture<'a, Result<Vec<LineRoute>, TflError>>;

    /// Stop sequence of `line` travelling in `direction`.
    fn route_sequence<'a>(
        &'a self,
        line: &'a str,
        direction: &'a str,
    ) -> BoxFuture<'a, Result<RouteSequence, TflError>>;

    /// Arrival predictions for every stop on `lines`.
    fn arrivals<'a>(&'a self, lines: &'a [String])
    -> BoxFuture<'a, Result<Vec<Prediction>, TflError>>;

    /// Arrival predictions for `lines` at `stop_point`.
    fn arrivals_at<'a>(
        &'a self,
        stop_point: &'a str,
        lines: &'a [String],
    ) -> BoxFuture<'a, Result<Vec<Prediction>, TflError>>;
}
