//! Exoplanet catalog fetch-and-clean pipeline.
//!
//! Queries the NASA Exoplanet Archive TAP service for planets discovered by
//! TESS, keeps a fixed set of columns under new names, drops rows that lack
//! any required value and writes the survivors as newline-delimited JSON.
//!
//! Cleaning is driven entirely by a [`ColumnSpec`] table: each entry names the
//! archive column, the output field it becomes, whether it is numeric and
//! whether a row without it is dropped.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{FetchError, FetchResult};
use crate::http::HttpGet;
use crate::output::write_file;

/// TAP synchronous query endpoint of the NASA Exoplanet Archive.
pub const DEFAULT_ENDPOINT: &str = "https://exoplanetarchive.ipac.caltech.edu/TAP/sync";

/// ADQL query for the composite planet table, TESS discoveries only.
pub const DEFAULT_QUERY: &str =
    "select * from pscomppars where disc_facility like '%TESS%' order by pl_orbper desc";

/// File name of the cleaned catalog inside the output directory.
pub const DEFAULT_OUTPUT_FILE: &str = "cleaned_tess_exoplanets_data.json";

/// Message reported when the archive answers with an empty body.
pub const EMPTY_RESPONSE_MESSAGE: &str = "The server returned an empty response.";

/// How a column's raw value is coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Numeric,
}

/// One entry of the projection/rename table.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    /// Column name in the archive response
    pub source: String,
    /// Field name in the output record
    pub target: String,
    pub kind: ColumnKind,
    /// Rows missing this value are dropped
    pub required: bool,
}

impl ColumnSpec {
    pub fn new(source: &str, target: &str, kind: ColumnKind, required: bool) -> Self {
        Self {
            source: source.to_string(),
            target: target.to_string(),
            kind,
            required,
        }
    }
}

/// The stock column table, in output order.
pub fn default_columns() -> Vec<ColumnSpec> {
    use ColumnKind::{Numeric, Text};

    vec![
        ColumnSpec::new("pl_name", "pl_name", Text, true),
        ColumnSpec::new("hostname", "host_star", Text, true),
        ColumnSpec::new("st_spectype", "st_spectype", Text, false),
        ColumnSpec::new("pl_orbper", "pl_orbital_period", Numeric, true),
        ColumnSpec::new("pl_rade", "pl_radius", Numeric, true),
        ColumnSpec::new("pl_bmasse", "pl_mass", Numeric, true),
        ColumnSpec::new("pl_dens", "pl_density", Numeric, false),
        ColumnSpec::new("sy_dist", "to_star_distance", Numeric, true),
        ColumnSpec::new("pl_eqt", "equilibrium_temperature_pl", Numeric, false),
        ColumnSpec::new("st_teff", "star_effective_temperature", Numeric, true),
        ColumnSpec::new("st_mass", "st_mass", Numeric, false),
    ]
}

/// Catalog query and cleaning settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub endpoint: String,
    /// ADQL query text, sent as the `query` parameter
    pub query: String,
    /// Response format requested from the archive
    pub format: String,
    /// Archive API key; the public service accepts an empty one
    pub api_key: String,
    /// Projection table; its targets must be the [`CatalogRecord`] fields,
    /// so it is not read from config files
    #[serde(skip, default = "default_columns")]
    pub columns: Vec<ColumnSpec>,
    pub output_file: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            query: DEFAULT_QUERY.to_string(),
            format: "json".to_string(),
            api_key: String::new(),
            columns: default_columns(),
            output_file: DEFAULT_OUTPUT_FILE.to_string(),
        }
    }
}

/// A cleaned exoplanet row.
///
/// Field order here is the field order of every line in the output file.
/// Optional values that are absent are written as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub pl_name: String,
    pub host_star: String,
    pub st_spectype: Option<String>,
    /// Orbital period, days
    pub pl_orbital_period: Option<f64>,
    /// Planet radius, Earth radii
    pub pl_radius: Option<f64>,
    /// Planet mass, Earth masses
    pub pl_mass: Option<f64>,
    /// Planet density, g/cm^3
    pub pl_density: Option<f64>,
    /// Distance to the system, parsecs
    pub to_star_distance: Option<f64>,
    /// Equilibrium temperature, K
    pub equilibrium_temperature_pl: Option<f64>,
    /// Host star effective temperature, K
    pub star_effective_temperature: Option<f64>,
    /// Host star mass, solar masses
    pub st_mass: Option<f64>,
}

/// Result of a catalog run that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogOutcome {
    /// Records were cleaned and written to `path`.
    Written { path: PathBuf, records: usize },
    /// The archive returned an empty body; nothing was written.
    EmptyResponse,
}

/// Coerce a raw JSON value to a finite float.
///
/// Numbers pass through, strings are parsed after trimming, and everything
/// else (null, `"N/A"`, booleans, NaN/inf) becomes `None`.
pub fn coerce_numeric(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// Coerce a raw JSON value to text. Blank strings count as missing.
pub fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Project, rename and coerce one row. Returns `None` if a required value is
/// missing after coercion.
fn project_row(row: &Map<String, Value>, columns: &[ColumnSpec]) -> Option<Map<String, Value>> {
    let mut projected = Map::with_capacity(columns.len());

    for column in columns {
        let raw = row.get(&column.source).unwrap_or(&Value::Null);
        let value = match column.kind {
            ColumnKind::Numeric => coerce_numeric(raw).map(Value::from),
            ColumnKind::Text => coerce_text(raw).map(Value::String),
        };

        match value {
            Some(value) => {
                projected.insert(column.target.clone(), value);
            }
            None if column.required => return None,
            None => {
                projected.insert(column.target.clone(), Value::Null);
            }
        }
    }

    Some(projected)
}

/// Clean raw archive rows into records, preserving row order.
///
/// `columns` is normally [`default_columns`]; a row whose projection does not
/// deserialize as a [`CatalogRecord`] is dropped with a warning.
pub fn clean_rows(rows: &[Map<String, Value>], columns: &[ColumnSpec]) -> Vec<CatalogRecord> {
    let mut records = Vec::with_capacity(rows.len());

    for row in rows {
        let Some(projected) = project_row(row, columns) else {
            continue;
        };
        match serde_json::from_value::<CatalogRecord>(Value::Object(projected)) {
            Ok(record) => records.push(record),
            Err(e) => warn!("Dropping row that does not fit the record layout: {e}"),
        }
    }

    debug!(
        "Dropped {} of {} rows with missing required values",
        rows.len() - records.len(),
        rows.len()
    );
    records
}

/// Query the archive and clean the response.
///
/// Returns `Ok(None)` when the body is empty or whitespace.
pub fn fetch_catalog(
    http: &dyn HttpGet,
    config: &CatalogConfig,
) -> FetchResult<Option<Vec<CatalogRecord>>> {
    let query = [
        ("query", config.query.as_str()),
        ("format", config.format.as_str()),
        ("api_key", config.api_key.as_str()),
    ];

    info!("Requesting exoplanet catalog from {}", config.endpoint);
    let body = http.get_text(&config.endpoint, &query)?;

    if body.trim().is_empty() {
        return Ok(None);
    }

    let rows: Vec<Map<String, Value>> = serde_json::from_str(&body)?;
    let records = clean_rows(&rows, &config.columns);
    info!("Kept {} of {} catalog rows", records.len(), rows.len());

    Ok(Some(records))
}

/// Write records as newline-delimited JSON, one object per line.
pub fn write_records(path: &Path, records: &[CatalogRecord]) -> FetchResult<()> {
    let mut buffer = Vec::new();
    for record in records {
        serde_json::to_writer(&mut buffer, record)?;
        buffer.push(b'\n');
    }
    write_file(path, &buffer)
}

/// Read a newline-delimited JSON file written by [`write_records`].
pub fn read_records(path: &Path) -> FetchResult<Vec<CatalogRecord>> {
    let text = fs::read_to_string(path).map_err(|source| FetchError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).map_err(FetchError::from))
        .collect()
}

/// Run the whole catalog pipeline, writing into `output_dir`.
///
/// On [`CatalogOutcome::EmptyResponse`] the output file is left untouched
/// and reporting [`EMPTY_RESPONSE_MESSAGE`] is up to the caller.
pub fn run_catalog(
    http: &dyn HttpGet,
    config: &CatalogConfig,
    output_dir: &Path,
) -> FetchResult<CatalogOutcome> {
    let Some(records) = fetch_catalog(http, config)? else {
        return Ok(CatalogOutcome::EmptyResponse);
    };

    let path = output_dir.join(&config.output_file);
    write_records(&path, &records)?;
    info!(
        "Saved {} cleaned records to '{}'",
        records.len(),
        path.display()
    );

    Ok(CatalogOutcome::Written {
        path,
        records: records.len(),
    })
}
