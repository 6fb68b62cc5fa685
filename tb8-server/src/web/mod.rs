//! Web layer for the transit query service.
//!
//! Provides the table and live-data endpoints, all answering with the
//! envelope in [`envelope`].

mod dto;
pub mod envelope;
mod error;
mod routes;
mod state;

pub use dto::*;
pub use envelope::{Envelope, Metadata};
pub use error::EndpointError;
pub use routes::create_router;
pub use state::{AppState, DEFAULT_ROUTE_MODE, QueryDefaults};
