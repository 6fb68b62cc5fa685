//! Startup loader for the static station datasets.
//!
//! Reads the CSV extracts from a data directory, normalises key column
//! types, and performs the joins that produce the served tables.

use std::path::Path;

use polars::prelude::*;
use tracing::debug;

use super::error::DatasetError;
use super::table::Table;

pub const LINES_FILE: &str = "lines.csv";
pub const STATIONS_FILE: &str = "stations.csv";
pub const STATION_POINTS_FILE: &str = "station_points.csv";
pub const PLATFORMS_FILE: &str = "platforms.csv";
pub const PLATFORM_SERVICES_FILE: &str = "platform_services.csv";

/// Every table served by the query endpoints.
///
/// Built once at startup and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Datasets {
    pub lines: Table,
    pub lines_by_station: Table,
    pub stations: Table,
    pub platforms: Table,
    pub station_points: Table,
}

impl Datasets {
    /// All tables, in endpoint order.
    pub fn tables(&self) -> [&Table; 5] {
        [
            &self.lines,
            &self.lines_by_station,
            &self.stations,
            &self.platforms,
            &self.station_points,
        ]
    }
}

/// Load and join every dataset found in `dir`.
pub fn load_datasets(dir: &Path) -> Result<Datasets, DatasetError> {
    let lines = read_csv(dir, LINES_FILE, &["Line"])?;
    let lines = typed(LINES_FILE, lines, &[("Line", DataType::String)])?;

    let stations = read_csv(dir, STATIONS_FILE, &["UniqueId", "Name"])?;
    let stations = rename(
        STATIONS_FILE,
        stations,
        &[("UniqueId", "StationUniqueId"), ("Name", "StationName")],
    )?;
    let stations = typed(
        STATIONS_FILE,
        stations,
        &[
            ("StationUniqueId", DataType::String),
            ("StationName", DataType::String),
        ],
    )?;

    let points = read_csv(
        dir,
        STATION_POINTS_FILE,
        &["UniqueId", "StationUniqueId", "Lat", "Lon"],
    )?;
    let points = typed(
        STATION_POINTS_FILE,
        points,
        &[
            ("StationUniqueId", DataType::String),
            ("Lat", DataType::Float64),
            ("Lon", DataType::Float64),
        ],
    )?;

    let platforms = read_csv(dir, PLATFORMS_FILE, &["UniqueId", "StationUniqueId"])?;
    let platforms = rename(
        PLATFORMS_FILE,
        platforms,
        &[("UniqueId", "PlatformUniqueId")],
    )?;
    let platforms = typed(
        PLATFORMS_FILE,
        platforms,
        &[
            ("PlatformUniqueId", DataType::String),
            ("StationUniqueId", DataType::String),
        ],
    )?;

    let services = read_csv(dir, PLATFORM_SERVICES_FILE, &["PlatformUniqueId", "Line"])?;
    let services = typed(
        PLATFORM_SERVICES_FILE,
        services,
        &[
            ("PlatformUniqueId", DataType::String),
            ("Line", DataType::String),
        ],
    )?;

    let datasets = build_datasets(lines, stations, points, platforms, services)?;
    for table in datasets.tables() {
        debug!(table = table.name(), rows = table.height(), "built table");
    }
    Ok(datasets)
}

/// Join the normalised frames into the served tables.
fn build_datasets(
    lines: DataFrame,
    stations: DataFrame,
    points: DataFrame,
    platforms: DataFrame,
    services: DataFrame,
) -> Result<Datasets, DatasetError> {
    let station_names = stations
        .clone()
        .lazy()
        .select([col("StationUniqueId"), col("StationName")]);

    // Centroid of each station's entrance/area points.
    let centroids = points
        .clone()
        .lazy()
        .group_by_stable([col("StationUniqueId")])
        .agg([col("Lat").mean(), col("Lon").mean()]);

    // Station ids with platforms that share a station name, e.g. the
    // DLR and Elizabeth line halves of Canary Wharf.
    let components = platforms
        .clone()
        .lazy()
        .select([col("StationUniqueId")])
        .join(
            station_names.clone(),
            [col("StationUniqueId")],
            [col("StationUniqueId")],
            JoinArgs::new(JoinType::Inner),
        )
        .group_by_stable([col("StationName")])
        .agg([col("StationUniqueId")
            .unique_stable()
            .alias("ComponentStations")]);

    let stations_table = collect(
        "stations",
        stations
            .clone()
            .lazy()
            .join(
                centroids,
                [col("StationUniqueId")],
                [col("StationUniqueId")],
                JoinArgs::new(JoinType::Left),
            )
            .join(
                components,
                [col("StationName")],
                [col("StationName")],
                JoinArgs::new(JoinType::Left),
            )
            .sort(
                ["StationName"],
                SortMultipleOptions::default().with_maintain_order(true),
            ),
    )?;

    let station_points = collect(
        "station-points",
        points.lazy().join(
            stations.lazy(),
            [col("StationUniqueId")],
            [col("StationUniqueId")],
            JoinArgs::new(JoinType::Left),
        ),
    )?;

    let platforms_table = collect(
        "platforms",
        platforms
            .lazy()
            .join(
                station_names,
                [col("StationUniqueId")],
                [col("StationUniqueId")],
                JoinArgs::new(JoinType::Left),
            )
            .join(
                services.lazy(),
                [col("PlatformUniqueId")],
                [col("PlatformUniqueId")],
                JoinArgs::new(JoinType::Left),
            ),
    )?;

    let lines_by_station = collect(
        "lines-by-station",
        platforms_table
            .frame()
            .clone()
            .lazy()
            .filter(col("Line").is_not_null())
            .group_by_stable([col("StationUniqueId"), col("StationName"), col("Line")])
            .agg([col("PlatformUniqueId").n_unique().alias("PlatformCount")])
            .sort(
                ["StationName", "Line"],
                SortMultipleOptions::default().with_maintain_order(true),
            ),
    )?;

    Ok(Datasets {
        lines: Table::new("lines", lines),
        lines_by_station,
        stations: stations_table,
        platforms: platforms_table,
        station_points,
    })
}

/// Read a headed CSV file and check it carries the required columns.
fn read_csv(
    dir: &Path,
    file: &'static str,
    required: &[&'static str],
) -> Result<DataFrame, DatasetError> {
    let path = dir.join(file);
    if !path.is_file() {
        return Err(DatasetError::MissingFile { path });
    }

    let frame = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path))
        .and_then(|reader| reader.finish())
        .map_err(|source| DatasetError::Read { file, source })?;

    for &column in required {
        if frame.column(column).is_err() {
            return Err(DatasetError::MissingColumn { file, column });
        }
    }

    Ok(frame)
}

fn rename(
    file: &'static str,
    mut frame: DataFrame,
    renames: &[(&str, &str)],
) -> Result<DataFrame, DatasetError> {
    for &(from, to) in renames {
        frame
            .rename(from, to.into())
            .map_err(|source| DatasetError::Read { file, source })?;
    }
    Ok(frame)
}

/// Cast columns whose inferred type would break joins (ids that look
/// numeric, coordinates written without a decimal point).
fn typed(
    file: &'static str,
    frame: DataFrame,
    columns: &[(&str, DataType)],
) -> Result<DataFrame, DatasetError> {
    let casts: Vec<Expr> = columns
        .iter()
        .map(|(name, dtype)| col(*name).cast(dtype.clone()))
        .collect();

    frame
        .lazy()
        .with_columns(casts)
        .collect()
        .map_err(|source| DatasetError::Read { file, source })
}

fn collect(table: &'static str, frame: LazyFrame) -> Result<Table, DatasetError> {
    frame
        .collect()
        .map(|frame| Table::new(table, frame))
        .map_err(|source| DatasetError::Build { table, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::table::SELECT_ALL;
    use std::fs;
    use tempfile::tempdir;

    const FIXTURES: &str = "data/fixtures";

    fn load() -> Datasets {
        load_datasets(Path::new(FIXTURES)).unwrap()
    }

    fn copy_fixtures(to: &Path) {
        for file in [
            LINES_FILE,
            STATIONS_FILE,
            STATION_POINTS_FILE,
            PLATFORMS_FILE,
            PLATFORM_SERVICES_FILE,
        ] {
            fs::copy(Path::new(FIXTURES).join(file), to.join(file)).unwrap();
        }
    }

    #[test]
    fn loads_every_table() {
        let datasets = load();

        assert_eq!(datasets.lines.height(), 7);
        assert_eq!(datasets.stations.height(), 5);
        assert_eq!(datasets.station_points.height(), 6);
        assert_eq!(datasets.platforms.height(), 7);
        assert_eq!(datasets.lines_by_station.height(), 7);
    }

    #[test]
    fn stations_are_renamed_and_sorted() {
        let rows = load().stations.query(SELECT_ALL).unwrap();

        assert!(rows[0].contains_key("StationUniqueId"));
        assert!(!rows[0].contains_key("UniqueId"));
        assert_eq!(rows[0]["StationName"], "Baker Street");
        assert_eq!(rows[4]["StationName"], "Oxford Circus");
    }

    #[test]
    fn station_centroid_is_mean_of_points() {
        let rows = load()
            .stations
            .query("SELECT Lat, Lon FROM self WHERE StationUniqueId = '940GZZLUKSX'")
            .unwrap();

        assert_eq!(rows.len(), 1);
        let lat = rows[0]["Lat"].as_f64().unwrap();
        let lon = rows[0]["Lon"].as_f64().unwrap();
        assert!((lat - 51.5305).abs() < 1e-9);
        assert!((lon - -0.1235).abs() < 1e-9);
    }

    #[test]
    fn component_stations_group_shared_names() {
        let rows = load()
            .stations
            .query("SELECT * FROM self WHERE StationName = 'Canary Wharf'")
            .unwrap();

        assert_eq!(rows.len(), 2);
        for row in &rows {
            let components = row["ComponentStations"].as_array().unwrap();
            assert_eq!(components.len(), 2);
            assert!(components.contains(&"940GZZDLCAN".into()));
            assert!(components.contains(&"910GCANWHRF".into()));
        }
    }

    #[test]
    fn station_points_carry_station_attributes() {
        let rows = load()
            .station_points
            .query("SELECT * FROM self WHERE StationUniqueId = '940GZZLUOXC'")
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["StationName"], "Oxford Circus");
        assert!(rows[0].contains_key("FareZones"));
        assert!(rows[0].contains_key("Wifi"));
        assert!(rows[0]["Lat"].is_f64());
    }

    #[test]
    fn platforms_carry_station_name_and_line() {
        let rows = load()
            .platforms
            .query("SELECT * FROM self WHERE PlatformUniqueId = '940GZZLUKSX-Plat03'")
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["StationName"], "King's Cross St. Pancras");
        assert_eq!(rows[0]["Line"], "victoria");
        assert_eq!(rows[0]["CardinalDirection"], "Southbound");
    }

    #[test]
    fn lines_by_station_is_distinct_per_station_and_line() {
        let rows = load()
            .lines_by_station
            .query("SELECT * FROM self WHERE StationUniqueId = '940GZZLUOXC'")
            .unwrap();

        let lines: Vec<&str> = rows.iter().map(|r| r["Line"].as_str().unwrap()).collect();
        assert_eq!(lines, ["central", "victoria"]);
        assert_eq!(rows[0]["PlatformCount"], 1);
    }

    #[test]
    fn missing_file_is_fatal() {
        let dir = tempdir().unwrap();
        copy_fixtures(dir.path());
        fs::remove_file(dir.path().join(PLATFORMS_FILE)).unwrap();

        let err = load_datasets(dir.path()).unwrap_err();
        assert!(matches!(err, DatasetError::MissingFile { .. }));
        assert!(err.to_string().contains("platforms.csv"));
    }

    #[test]
    fn missing_column_is_fatal() {
        let dir = tempdir().unwrap();
        copy_fixtures(dir.path());
        fs::write(
            dir.path().join(STATION_POINTS_FILE),
            "UniqueId,StationUniqueId,Lat\n940GZZLUOXC-1,940GZZLUOXC,51.5\n",
        )
        .unwrap();

        let err = load_datasets(dir.path()).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::MissingColumn {
                file: STATION_POINTS_FILE,
                column: "Lon"
            }
        ));
    }

    #[test]
    fn numeric_looking_ids_still_join() {
        let dir = tempdir().unwrap();
        copy_fixtures(dir.path());
        fs::write(dir.path().join(STATIONS_FILE), "UniqueId,Name\n1,One\n2,Two\n").unwrap();
        fs::write(
            dir.path().join(STATION_POINTS_FILE),
            "UniqueId,StationUniqueId,Lat,Lon\n10,1,51,0\n11,1,52,1\n",
        )
        .unwrap();
        fs::write(
            dir.path().join(PLATFORMS_FILE),
            "UniqueId,StationUniqueId\n100,1\n",
        )
        .unwrap();
        fs::write(
            dir.path().join(PLATFORM_SERVICES_FILE),
            "PlatformUniqueId,Line\n100,central\n",
        )
        .unwrap();

        let datasets = load_datasets(dir.path()).unwrap();
        let rows = datasets
            .stations
            .query("SELECT * FROM self WHERE StationUniqueId = '1'")
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["Lat"].as_f64(), Some(51.5));
        assert_eq!(datasets.lines_by_station.height(), 1);
    }
}
