//! TfL Unified API client.
//!
//! Live disruption, route and arrival data is fetched per request from
//! the Unified API and flattened into rows for the envelope. The mode
//! metadata is fetched once at startup to build the mode whitelist.

mod client;
mod convert;
mod error;
mod feed;
mod mock;
mod types;

pub use client::{TflClient, TflConfig};
pub use convert::{ConversionError, normalize, pascal_case, to_row, to_rows};
pub use error::TflError;
pub use feed::LiveFeed;
pub use mock::MockTflClient;
pub use types::{Disruption, LineRoute, Mode, Prediction, RouteSequence};
