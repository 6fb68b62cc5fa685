//! TfL client error types.

/// Errors from fetching live data.
#[derive(Debug, thiserror::Error)]
pub enum TflError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The configured base URL cannot be used to build request URLs
    #[error("invalid base URL '{url}': {message}")]
    InvalidBaseUrl { url: String, message: String },

    /// Missing or rejected app key
    #[error("unauthorized (check TFL_APP_KEY)")]
    Unauthorized,

    /// Rate limited by the API
    #[error("rate limited by TfL API")]
    RateLimited,

    /// The requested resource does not exist upstream
    #[error("not found: {0}")]
    NotFound(String),

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// JSON deserialization failed
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// Offline fixtures could not be read
    #[error("fixture error: {0}")]
    Fixture(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = TflError::Api {
            status: 500,
            message: "Internal Server Error".into(),
        };
        assert_eq!(err.to_string(), "API error 500: Internal Server Error");

        let err = TflError::NotFound("/Line/victoria/Route/Sequence/sideways".into());
        assert_eq!(
            err.to_string(),
            "not found: /Line/victoria/Route/Sequence/sideways"
        );

        let err = TflError::Json {
            message: "expected value".into(),
            body: Some("<html>".into()),
        };
        assert_eq!(err.to_string(), "JSON parse error: expected value");
    }
}
