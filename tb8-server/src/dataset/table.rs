//! Immutable in-memory tables and the SQL engine bound to them.
//!
//! Each table is a polars `DataFrame` registered under the name `self`
//! in a fresh `SQLContext` per query, so a query can only ever see the
//! table it was sent to.

use polars::prelude::*;
use polars::sql::SQLContext;
use serde_json::{Map, Value};

/// Name under which the bound table is visible to queries.
pub const SELF_TABLE: &str = "self";

/// Query returning every row and column unmodified.
pub const SELECT_ALL: &str = "SELECT * FROM self;";

/// A single result row: field name to value, in column order.
pub type Row = Map<String, Value>;

/// Errors from executing a query against a table.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// Parsing, planning or execution failed inside the engine
    #[error("{0}")]
    Engine(#[from] PolarsError),

    /// The result frame could not be turned into JSON rows
    #[error("failed to serialize result rows: {0}")]
    Rows(#[from] serde_json::Error),
}

/// A named, read-only table.
///
/// Cloning is cheap: polars columns are reference counted.
#[derive(Debug, Clone)]
pub struct Table {
    name: &'static str,
    frame: DataFrame,
}

impl Table {
    pub fn new(name: &'static str, frame: DataFrame) -> Self {
        Self { name, frame }
    }

    /// Endpoint-facing name of the table (e.g. `"stations"`).
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Run a SQL query against this table.
    ///
    /// The query text is passed to the engine untouched; the table is
    /// addressed as `self` (e.g. `SELECT * FROM self WHERE Line = 'dlr'`).
    /// Blocks the calling thread for the duration of the query.
    pub fn query(&self, sql: &str) -> Result<Vec<Row>, QueryError> {
        let mut ctx = SQLContext::new();
        ctx.register(SELF_TABLE, self.frame.clone().lazy());
        let mut result = ctx.execute(sql)?.collect()?;
        frame_to_rows(&mut result)
    }
}

/// Serialize every row of a frame as a JSON object.
pub fn frame_to_rows(frame: &mut DataFrame) -> Result<Vec<Row>, QueryError> {
    if frame.height() == 0 {
        return Ok(Vec::new());
    }

    let mut buf = Vec::new();
    JsonWriter::new(&mut buf)
        .with_json_format(JsonFormat::Json)
        .finish(frame)?;

    Ok(serde_json::from_slice(&buf)?)
}
