//! End-to-end runs of the catalog pipeline against a recorded archive reply.

mod common;

use std::fs;

use approx::assert_relative_eq;
use common::{Reply, ScriptedHttp};
use serde_json::{Map, Value};
use skyfetch::catalog::{
    clean_rows, default_columns, read_records, run_catalog, CatalogConfig, CatalogOutcome,
    CatalogRecord,
};
use skyfetch::FetchError;
use test_helpers::load_fixture;

fn recorded_reply() -> String {
    load_fixture("exoplanet/pscomppars_tess.json").expect("catalog fixture")
}

fn run_with(reply: Reply, dir: &std::path::Path) -> Result<CatalogOutcome, FetchError> {
    let _ = env_logger::builder().is_test(true).try_init();
    run_catalog(&ScriptedHttp::always(reply), &CatalogConfig::default(), dir)
}

fn assert_required_present(record: &CatalogRecord) {
    assert!(!record.pl_name.trim().is_empty());
    assert!(!record.host_star.trim().is_empty());
    assert!(record.pl_orbital_period.is_some(), "{record:?}");
    assert!(record.pl_radius.is_some(), "{record:?}");
    assert!(record.pl_mass.is_some(), "{record:?}");
    assert!(record.to_star_distance.is_some(), "{record:?}");
    assert!(record.star_effective_temperature.is_some(), "{record:?}");
}

#[test]
fn test_recorded_reply_is_cleaned() {
    let dir = tempfile::tempdir().unwrap();
    let outcome = run_with(Reply::Body(recorded_reply()), dir.path()).unwrap();

    let path = dir.path().join("cleaned_tess_exoplanets_data.json");
    assert_eq!(
        outcome,
        CatalogOutcome::Written {
            path: path.clone(),
            records: 3
        }
    );

    let records = read_records(&path).unwrap();
    let names: Vec<&str> = records.iter().map(|r| r.pl_name.as_str()).collect();
    assert_eq!(names, vec!["TOI-2180 b", "TOI-700 d", "LHS 3844 b"]);

    for record in &records {
        assert_required_present(record);
    }

    let toi_700 = &records[1];
    assert_eq!(toi_700.host_star, "TOI-700");
    assert_relative_eq!(toi_700.pl_radius.unwrap(), 1.5);
    assert_eq!(toi_700.st_mass, None);
    assert_eq!(toi_700.pl_density, None);

    let lhs = &records[2];
    assert_relative_eq!(lhs.pl_orbital_period.unwrap(), 0.46292913);
    assert_relative_eq!(lhs.to_star_distance.unwrap(), 14.8864);
}

#[test]
fn test_output_round_trips_to_cleaned_set() {
    let dir = tempfile::tempdir().unwrap();
    run_with(Reply::Body(recorded_reply()), dir.path()).unwrap();
    let path = dir.path().join("cleaned_tess_exoplanets_data.json");

    let rows: Vec<Map<String, Value>> = serde_json::from_str(&recorded_reply()).unwrap();
    let expected = clean_rows(&rows, &default_columns());
    assert_eq!(read_records(&path).unwrap(), expected);

    let mut expected_keys: Vec<String> =
        default_columns().into_iter().map(|c| c.target).collect();
    expected_keys.sort();
    for line in fs::read_to_string(&path).unwrap().lines() {
        let object: Map<String, Value> = serde_json::from_str(line).unwrap();
        let mut keys: Vec<String> = object.keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, expected_keys);
    }
}

#[test]
fn test_empty_reply_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let outcome = run_with(Reply::Body(String::new()), dir.path()).unwrap();

    assert_eq!(outcome, CatalogOutcome::EmptyResponse);
    assert!(!dir.path().join("cleaned_tess_exoplanets_data.json").exists());
}

#[test]
fn test_empty_reply_keeps_previous_output() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cleaned_tess_exoplanets_data.json");
    fs::write(&path, "previous run\n").unwrap();

    let outcome = run_with(Reply::Body("\n  \n".to_string()), dir.path()).unwrap();

    assert_eq!(outcome, CatalogOutcome::EmptyResponse);
    assert_eq!(fs::read_to_string(&path).unwrap(), "previous run\n");
}

#[test]
fn test_http_error_aborts_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let err = run_with(Reply::Status(500), dir.path()).unwrap_err();

    assert!(err.is_transport());
    assert!(!dir.path().join("cleaned_tess_exoplanets_data.json").exists());
}

#[test]
fn test_malformed_reply_aborts_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let err = run_with(Reply::Body("[{\"pl_name\": ".to_string()), dir.path()).unwrap_err();

    assert!(matches!(err, FetchError::Decode(_)));
    assert!(!dir.path().join("cleaned_tess_exoplanets_data.json").exists());
}

#[test]
fn test_rerun_overwrites_output() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cleaned_tess_exoplanets_data.json");
    fs::write(&path, "stale\nstale\nstale\nstale\nstale\n").unwrap();

    run_with(Reply::Body(recorded_reply()), dir.path()).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 3);
}
