//! HTTP route handlers.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    routing::get,
};
use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::dataset::{Datasets, Row, Table};
use crate::tfl::{Prediction, to_row, to_rows};
use crate::validate::{TokenKind, split_tokens, validate_token, validate_tokens};

use super::dto::*;
use super::envelope::{Envelope, Metadata};
use super::error::EndpointError;
use super::state::AppState;

/// Query-string parameters; decoding failures are answered in an envelope.
type Params<T> = Result<Query<T>, QueryRejection>;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(banner))
        .route("/health", get(health))
        .route("/lines", get(lines))
        .route("/lines-by-station", get(lines_by_station))
        .route("/stations", get(stations))
        .route("/platforms", get(platforms))
        .route("/station-points", get(station_points))
        .route("/disruption-by-modes", get(disruption_by_modes))
        .route("/route-by-modes", get(route_by_modes))
        .route(
            "/route-sequence-by-line-direction",
            get(route_sequence_by_line_direction),
        )
        .route("/arrivals-by-lines", get(arrivals_by_lines))
        .route("/arrivals-by-station", get(arrivals_by_station))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn banner() -> Json<Value> {
    Json(json!({ "🚨": "It's time for the tubeulator" }))
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

async fn lines(State(state): State<AppState>, params: Params<QueryParams>) -> Json<Envelope> {
    table_query(state, params, |d| &d.lines).await
}

async fn lines_by_station(
    State(state): State<AppState>,
    params: Params<QueryParams>,
) -> Json<Envelope> {
    table_query(state, params, |d| &d.lines_by_station).await
}

async fn stations(State(state): State<AppState>, params: Params<QueryParams>) -> Json<Envelope> {
    table_query(state, params, |d| &d.stations).await
}

async fn platforms(State(state): State<AppState>, params: Params<QueryParams>) -> Json<Envelope> {
    table_query(state, params, |d| &d.platforms).await
}

async fn station_points(
    State(state): State<AppState>,
    params: Params<QueryParams>,
) -> Json<Envelope> {
    table_query(state, params, |d| &d.station_points).await
}

/// Run `params.query` (or the default select-all) against one table.
///
/// polars executes on the calling thread, so the query goes to the
/// blocking pool.
async fn table_query(
    state: AppState,
    params: Params<QueryParams>,
    select: fn(&Datasets) -> &Table,
) -> Json<Envelope> {
    let request_time = Utc::now();
    let endpoint = select(&state.datasets).name();
    let params = match params {
        Ok(Query(params)) => params,
        Err(rejection) => return rejected(endpoint, request_time, rejection),
    };
    let sql = present(params.query.as_deref())
        .map(str::to_string)
        .unwrap_or_else(|| state.defaults.table_query.clone());
    info!(endpoint, query = %sql, "received query");

    let datasets = Arc::clone(&state.datasets);
    let worker_sql = sql.clone();
    let result = tokio::task::spawn_blocking(move || select(&datasets).query(&worker_sql))
        .await
        .map_err(EndpointError::from)
        .and_then(|result| result.map_err(EndpointError::from));

    finish(endpoint, request_time, sql, result)
}

async fn disruption_by_modes(
    State(state): State<AppState>,
    params: Params<QueryParams>,
) -> Json<Envelope> {
    const ENDPOINT: &str = "disruption-by-modes";
    let request_time = Utc::now();
    let params = match params {
        Ok(Query(params)) => params,
        Err(rejection) => return rejected(ENDPOINT, request_time, rejection),
    };
    let (echo, modes) = resolve_tokens(params.query.as_deref(), &state.defaults.disruption_modes);
    info!(endpoint = ENDPOINT, query = %echo, "received query");

    let result = fetch_disruptions(&state, &modes).await;
    finish(ENDPOINT, request_time, echo, result)
}

async fn route_by_modes(
    State(state): State<AppState>,
    params: Params<QueryParams>,
) -> Json<Envelope> {
    const ENDPOINT: &str = "route-by-modes";
    let request_time = Utc::now();
    let params = match params {
        Ok(Query(params)) => params,
        Err(rejection) => return rejected(ENDPOINT, request_time, rejection),
    };
    let (echo, modes) = resolve_tokens(params.query.as_deref(), &state.defaults.route_modes);
    info!(endpoint = ENDPOINT, query = %echo, "received query");

    let result = fetch_routes(&state, &modes).await;
    finish(ENDPOINT, request_time, echo, result)
}

async fn route_sequence_by_line_direction(
    State(state): State<AppState>,
    params: Params<RouteSequenceParams>,
) -> Json<Envelope> {
    const ENDPOINT: &str = "route-sequence-by-line-direction";
    let request_time = Utc::now();
    let params = match params {
        Ok(Query(params)) => params,
        Err(rejection) => return rejected(ENDPOINT, request_time, rejection),
    };
    let echo = format!(
        "line={}&direction={}",
        params.line.as_deref().unwrap_or_default(),
        params.direction.as_deref().unwrap_or_default()
    );
    info!(endpoint = ENDPOINT, query = %echo, "received query");

    let result = fetch_route_sequence(&state, &params).await;
    finish(ENDPOINT, request_time, echo, result)
}

async fn arrivals_by_lines(
    State(state): State<AppState>,
    params: Params<QueryParams>,
) -> Json<Envelope> {
    const ENDPOINT: &str = "arrivals-by-lines";
    let request_time = Utc::now();
    let params = match params {
        Ok(Query(params)) => params,
        Err(rejection) => return rejected(ENDPOINT, request_time, rejection),
    };
    let (echo, lines) = resolve_tokens(params.query.as_deref(), &state.defaults.arrival_lines);
    info!(endpoint = ENDPOINT, query = %echo, "received query");

    let result = fetch_arrivals(&state, &lines).await;
    finish(ENDPOINT, request_time, echo, result)
}

async fn arrivals_by_station(
    State(state): State<AppState>,
    params: Params<StationArrivalsParams>,
) -> Json<Envelope> {
    const ENDPOINT: &str = "arrivals-by-station";
    let request_time = Utc::now();
    let params = match params {
        Ok(Query(params)) => params,
        Err(rejection) => return rejected(ENDPOINT, request_time, rejection),
    };
    let echo = params.query.clone().unwrap_or_default();
    info!(endpoint = ENDPOINT, query = %echo, lines = ?params.lines, "received query");

    let result = fetch_station_arrivals(&state, &params).await;
    finish(ENDPOINT, request_time, echo, result)
}

async fn fetch_disruptions(state: &AppState, modes: &[String]) -> Result<Vec<Row>, EndpointError> {
    validate_tokens(TokenKind::Mode, modes, state.lookups.disrupted_modes())?;
    let disruptions = state.live.disruptions(modes).await?;
    Ok(to_rows(&disruptions)?)
}

async fn fetch_routes(state: &AppState, modes: &[String]) -> Result<Vec<Row>, EndpointError> {
    validate_tokens(TokenKind::Mode, modes, state.lookups.disrupted_modes())?;
    let routes = state.live.routes(modes).await?;
    Ok(to_rows(&routes)?)
}

async fn fetch_route_sequence(
    state: &AppState,
    params: &RouteSequenceParams,
) -> Result<Vec<Row>, EndpointError> {
    let line = present(params.line.as_deref())
        .ok_or(EndpointError::MissingParameter("line"))?
        .trim();
    let direction = present(params.direction.as_deref())
        .ok_or(EndpointError::MissingParameter("direction"))?
        .trim();

    validate_token(TokenKind::Line, line, state.lookups.arrivable_line_names())?;
    let sequence = state.live.route_sequence(line, direction).await?;
    Ok(vec![to_row(&sequence)?])
}

async fn fetch_arrivals(state: &AppState, lines: &[String]) -> Result<Vec<Row>, EndpointError> {
    validate_tokens(TokenKind::Line, lines, state.lookups.arrivable_line_names())?;
    let mut predictions = state.live.arrivals(lines).await?;
    sort_by_arrival(&mut predictions);
    Ok(to_rows(&predictions)?)
}

async fn fetch_station_arrivals(
    state: &AppState,
    params: &StationArrivalsParams,
) -> Result<Vec<Row>, EndpointError> {
    let stop_point = present(params.query.as_deref())
        .ok_or(EndpointError::MissingParameter("query"))?
        .trim();
    let (_, lines) = resolve_tokens(params.lines.as_deref(), &state.defaults.arrival_lines);

    validate_tokens(TokenKind::Line, &lines, state.lookups.arrivable_line_names())?;
    let mut predictions = state.live.arrivals_at(stop_point, &lines).await?;
    sort_by_arrival(&mut predictions);
    Ok(to_rows(&predictions)?)
}

/// Soonest first; predictions without a time go last.
fn sort_by_arrival(predictions: &mut [Prediction]) {
    predictions.sort_by_key(|p| (p.time_to_station.is_none(), p.time_to_station));
}

/// Split a csv parameter, falling back to `default` when it is absent or
/// holds no tokens. Returns the text to echo alongside the tokens.
fn resolve_tokens(raw: Option<&str>, default: &[String]) -> (String, Vec<String>) {
    if let Some(raw) = present(raw) {
        let tokens = split_tokens(raw);
        if !tokens.is_empty() {
            return (raw.to_string(), tokens);
        }
    }
    (default.join(","), default.to_vec())
}

fn finish(
    endpoint: &'static str,
    request_time: DateTime<Utc>,
    query: String,
    result: Result<Vec<Row>, EndpointError>,
) -> Json<Envelope> {
    match &result {
        Ok(rows) => debug!(endpoint, rows = rows.len(), "query succeeded"),
        Err(e) => warn!(endpoint, error = %e, "query failed"),
    }
    Json(Envelope::from_result(Metadata::since(request_time, query), result))
}

/// Answer a query string that could not be decoded. There is no query
/// to echo, so the context carries an empty one.
fn rejected(
    endpoint: &'static str,
    request_time: DateTime<Utc>,
    rejection: QueryRejection,
) -> Json<Envelope> {
    finish(endpoint, request_time, String::new(), Err(rejection.into()))
}
