//! Lookup sets derived once at startup and used to validate live requests.

use serde_json::Value;

use super::table::{QueryError, Table};

/// Line identifier used for buses; arrivals are only served for rail lines.
pub const NON_RAIL_LINE: &str = "bus";

/// Mode identifiers that never carry disruptions.
pub const EXCLUDED_MODES: [&str; 3] = ["interchange-keep-sitting", "interchange-secure", "walking"];

/// Whitelists for the live endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookups {
    arrivable_line_names: Vec<String>,
    disrupted_modes: Vec<String>,
}

impl Lookups {
    /// Build the lookup sets from raw line and mode identifiers.
    ///
    /// Both lists come out sorted and deduplicated, with the non-rail
    /// line and the excluded modes removed.
    pub fn new(
        line_names: impl IntoIterator<Item = String>,
        mode_names: impl IntoIterator<Item = String>,
    ) -> Self {
        let mut arrivable_line_names: Vec<String> = line_names
            .into_iter()
            .filter(|line| line != NON_RAIL_LINE)
            .collect();
        arrivable_line_names.sort();
        arrivable_line_names.dedup();

        let mut disrupted_modes: Vec<String> = mode_names
            .into_iter()
            .filter(|mode| !EXCLUDED_MODES.contains(&mode.as_str()))
            .collect();
        disrupted_modes.sort();
        disrupted_modes.dedup();

        Self {
            arrivable_line_names,
            disrupted_modes,
        }
    }

    /// Derive the line whitelist from the `Line` column of the lines table.
    pub fn derive(
        lines: &Table,
        mode_names: impl IntoIterator<Item = String>,
    ) -> Result<Self, QueryError> {
        let rows = lines.query("SELECT DISTINCT Line FROM self")?;
        let line_names = rows.into_iter().filter_map(|mut row| match row.remove("Line") {
            Some(Value::String(line)) if !line.is_empty() => Some(line),
            _ => None,
        });

        Ok(Self::new(line_names, mode_names))
    }

    pub fn arrivable_line_names(&self) -> &[String] {
        &self.arrivable_line_names
    }

    pub fn disrupted_modes(&self) -> &[String] {
        &self.disrupted_modes
    }
}
