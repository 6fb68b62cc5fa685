//! The uniform response envelope.
//!
//! Every query-bearing endpoint answers with
//!
//! ```json
//! { "context": { "request_time": "...", "response_time": "...",
//!                "response_latency": 0.0012, "query": "..." },
//!   "success": true,
//!   "results": [ ... ] }
//! ```
//!
//! or the same shape with `"success": false` and an `"error"` string in
//! place of `"results"`.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::dataset::Row;

/// Timing and echo information attached to every response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metadata {
    request_time: DateTime<Utc>,
    response_time: DateTime<Utc>,
    /// Seconds between `request_time` and `response_time`.
    response_latency: f64,
    query: String,
}

impl Metadata {
    /// Build metadata for a request received at `request_time` and
    /// answered at `response_time`.
    ///
    /// A `response_time` earlier than `request_time` (the wall clock
    /// stepped back mid-request) is clamped so latency is never negative.
    pub fn new(
        request_time: DateTime<Utc>,
        response_time: DateTime<Utc>,
        query: impl Into<String>,
    ) -> Self {
        let response_time = response_time.max(request_time);
        let response_latency = (response_time - request_time)
            .to_std()
            .map(|elapsed| elapsed.as_secs_f64())
            .unwrap_or_default();

        Self {
            request_time,
            response_time,
            response_latency,
            query: query.into(),
        }
    }

    /// Metadata for a request received at `request_time` and answered now.
    pub fn since(request_time: DateTime<Utc>, query: impl Into<String>) -> Self {
        Self::new(request_time, Utc::now(), query)
    }

    pub fn request_time(&self) -> DateTime<Utc> {
        self.request_time
    }

    pub fn response_time(&self) -> DateTime<Utc> {
        self.response_time
    }

    pub fn response_latency(&self) -> f64 {
        self.response_latency
    }

    pub fn query(&self) -> &str {
        &self.query
    }
}

/// Either the result rows or the error message, never both.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Results(Vec<Row>),
    Error(String),
}

/// A complete response body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    context: Metadata,
    success: bool,
    #[serde(flatten)]
    outcome: Outcome,
}

impl Envelope {
    pub fn success(context: Metadata, results: Vec<Row>) -> Self {
        Self {
            context,
            success: true,
            outcome: Outcome::Results(results),
        }
    }

    pub fn failure(context: Metadata, error: impl Into<String>) -> Self {
        Self {
            context,
            success: false,
            outcome: Outcome::Error(error.into()),
        }
    }

    /// Wrap a handler outcome; errors are rendered with `Display`.
    pub fn from_result<E: fmt::Display>(context: Metadata, result: Result<Vec<Row>, E>) -> Self {
        match result {
            Ok(results) => Self::success(context, results),
            Err(e) => Self::failure(context, e.to_string()),
        }
    }

    pub fn context(&self) -> &Metadata {
        &self.context
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn results(&self) -> Option<&[Row]> {
        match &self.outcome {
            Outcome::Results(rows) => Some(rows),
            Outcome::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Results(_) => None,
            Outcome::Error(message) => Some(message),
        }
    }
}
