//! Horizons physical-data pipeline.
//!
//! For each configured body, asks the JPL Horizons API for its object data
//! (no ephemeris) and runs [`extract_physical_data`] over the returned text.
//! The records are written together as one pretty-printed JSON array.
//!
//! A transport, HTTP or decode failure on any body aborts the whole run.
//! A reply that decodes but carries no `result` field only skips that body.

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

use crate::error::{FetchError, FetchResult};
use crate::extract::{extract_physical_data, PhysicalCharacteristics};
use crate::http::HttpGet;
use crate::output::write_file;

/// JPL Horizons API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://ssd.jpl.nasa.gov/api/horizons.api";

/// File name of the structured output inside the output directory.
pub const DEFAULT_OUTPUT_FILE: &str = "structured_planet_data.json";

/// Parameters sent with every request: JSON reply, physical data, no ephemeris.
const BASE_PARAMS: &[(&str, &str)] = &[
    ("format", "json"),
    ("OBJ_DATA", "YES"),
    ("MAKE_EPHEM", "NO"),
];

/// A body to query: Horizons `COMMAND` identifier and a display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EphemerisTarget {
    pub identifier: String,
    pub display_name: String,
}

impl EphemerisTarget {
    pub fn new(identifier: &str, display_name: &str) -> Self {
        Self {
            identifier: identifier.to_string(),
            display_name: display_name.to_string(),
        }
    }
}

/// The planets, Pluto, Ceres and comet Hale-Bopp.
pub fn default_targets() -> Vec<EphemerisTarget> {
    [
        ("199", "Меркурий"),
        ("299", "Венера"),
        ("399", "Земля"),
        ("499", "Марс"),
        ("599", "Юпитер"),
        ("699", "Сатурн"),
        ("799", "Уран"),
        ("899", "Нептун"),
        ("999", "Плутон"),
        ("2000001", "Церера"),
        ("1000012", "Комета Хейла-Боппа"),
    ]
    .iter()
    .map(|&(id, name)| EphemerisTarget::new(id, name))
    .collect()
}

/// Horizons endpoint, target list and output file name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EphemerisConfig {
    pub endpoint: String,
    /// Bodies to query, in output order
    pub targets: Vec<EphemerisTarget>,
    pub output_file: String,
}

impl Default for EphemerisConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            targets: default_targets(),
            output_file: DEFAULT_OUTPUT_FILE.to_string(),
        }
    }
}

/// Extracted physical data for one body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EphemerisRecord {
    pub identifier: String,
    pub display_name: String,
    pub physical_characteristics: PhysicalCharacteristics,
}

/// Summary of a completed ephemeris run.
#[derive(Debug, Clone, PartialEq)]
pub struct EphemerisOutcome {
    pub path: PathBuf,
    /// Number of records written
    pub records: usize,
    /// Identifiers whose reply had no `result` field
    pub skipped: Vec<String>,
}

/// Fetch and parse one body.
///
/// Returns `Ok(None)` if the decoded reply has no `result` field.
pub fn fetch_target(
    http: &dyn HttpGet,
    config: &EphemerisConfig,
    target: &EphemerisTarget,
) -> FetchResult<Option<EphemerisRecord>> {
    let mut query: Vec<(&str, &str)> = BASE_PARAMS.to_vec();
    query.push(("COMMAND", target.identifier.as_str()));

    info!(
        "Requesting physical data for {} ({})",
        target.display_name, target.identifier
    );
    let body = http.get_text(&config.endpoint, &query)?;
    let reply: Value = serde_json::from_str(&body)?;

    // A present but non-text `result` still yields a record, with no values.
    let Some(result) = reply.get("result").map(|v| v.as_str().unwrap_or_default()) else {
        match reply.get("error").and_then(Value::as_str) {
            Some(error) => warn!(
                "API did not return 'result' for {}: {}",
                target.display_name,
                error.trim()
            ),
            None => warn!("API did not return 'result' for {}", target.display_name),
        }
        return Ok(None);
    };

    Ok(Some(EphemerisRecord {
        identifier: target.identifier.clone(),
        display_name: target.display_name.clone(),
        physical_characteristics: extract_physical_data(result),
    }))
}

/// Fetch every configured body in order, leaving out skipped ones.
pub fn fetch_all(
    http: &dyn HttpGet,
    config: &EphemerisConfig,
) -> FetchResult<Vec<EphemerisRecord>> {
    let mut records = Vec::with_capacity(config.targets.len());
    for target in &config.targets {
        if let Some(record) = fetch_target(http, config, target)? {
            records.push(record);
        }
    }
    Ok(records)
}

/// Write records as one JSON array indented by four spaces.
///
/// Non-ASCII text is written as UTF-8, not as `\u` escapes.
pub fn write_records(path: &Path, records: &[EphemerisRecord]) -> FetchResult<()> {
    let mut buffer = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
    records.serialize(&mut serializer)?;
    write_file(path, &buffer)
}

/// Read a file written by [`write_records`].
pub fn read_records(path: &Path) -> FetchResult<Vec<EphemerisRecord>> {
    let text = fs::read_to_string(path).map_err(|source| FetchError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&text)?)
}

/// Run the whole ephemeris pipeline, writing into `output_dir`.
pub fn run_ephemeris(
    http: &dyn HttpGet,
    config: &EphemerisConfig,
    output_dir: &Path,
) -> FetchResult<EphemerisOutcome> {
    let records = fetch_all(http, config)?;

    let skipped: Vec<String> = config
        .targets
        .iter()
        .filter(|t| !records.iter().any(|r| r.identifier == t.identifier))
        .map(|t| t.identifier.clone())
        .collect();

    let path = output_dir.join(&config.output_file);
    write_records(&path, &records)?;
    info!("The data is stored in '{}'", path.display());

    Ok(EphemerisOutcome {
        path,
        records: records.len(),
        skipped,
    })
}
