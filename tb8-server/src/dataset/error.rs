//! Dataset loading error types.

use std::path::PathBuf;

use polars::prelude::PolarsError;

/// Errors that can occur while loading the static datasets.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// A dataset file is absent from the data directory
    #[error("dataset file not found: {}", .path.display())]
    MissingFile { path: PathBuf },

    /// A dataset file lacks a column the joins depend on
    #[error("{file} is missing required column '{column}'")]
    MissingColumn {
        file: &'static str,
        column: &'static str,
    },

    /// The CSV reader rejected a file
    #[error("failed to read {file}: {source}")]
    Read {
        file: &'static str,
        source: PolarsError,
    },

    /// Joining or aggregating the loaded frames failed
    #[error("failed to build table {table}: {source}")]
    Build {
        table: &'static str,
        source: PolarsError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DatasetError::MissingFile {
            path: PathBuf::from("data/stations.csv"),
        };
        assert_eq!(err.to_string(), "dataset file not found: data/stations.csv");

        let err = DatasetError::MissingColumn {
            file: "platforms.csv",
            column: "StationUniqueId",
        };
        assert_eq!(
            err.to_string(),
            "platforms.csv is missing required column 'StationUniqueId'"
        );
    }
}
