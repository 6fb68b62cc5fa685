//! Handler error type.

use axum::extract::rejection::QueryRejection;

use crate::dataset::QueryError;
use crate::tfl::{ConversionError, TflError};
use crate::validate::ValidationError;

/// Everything that can turn a request into a failure envelope.
///
/// Never surfaces as an HTTP error status; the message becomes the
/// envelope's `error` text.
#[derive(Debug, thiserror::Error)]
pub enum EndpointError {
    #[error("{0}")]
    Query(#[from] QueryError),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("upstream request failed: {0}")]
    Upstream(#[from] TflError),

    #[error("{0}")]
    Conversion(#[from] ConversionError),

    /// The query string could not be decoded, e.g. a repeated parameter.
    #[error("{}", .0.body_text())]
    Parameters(#[from] QueryRejection),

    #[error("missing required parameter '{0}'")]
    MissingParameter(&'static str),

    /// The blocking query task panicked or was cancelled.
    #[error("query worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}
