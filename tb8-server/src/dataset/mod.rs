//! Static transit datasets.
//!
//! Lines, stations, platforms and station points are read from CSV
//! extracts once at startup, joined into the served tables, and queried
//! with SQL for the rest of the process lifetime.

mod error;
mod loader;
mod lookups;
mod table;

pub use error::DatasetError;
pub use loader::{
    Datasets, LINES_FILE, PLATFORM_SERVICES_FILE, PLATFORMS_FILE, STATION_POINTS_FILE,
    STATIONS_FILE, load_datasets,
};
pub use lookups::{EXCLUDED_MODES, Lookups, NON_RAIL_LINE};
pub use table::{QueryError, Row, SELECT_ALL, SELF_TABLE, Table, frame_to_rows};
