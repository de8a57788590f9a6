//! Fetches astronomical reference data into local JSON files.
//!
//! Two independent pipelines:
//!
//! - [`catalog`]: queries the NASA Exoplanet Archive for TESS planets, keeps
//!   and renames a fixed set of columns, drops incomplete rows and writes
//!   newline-delimited JSON.
//! - [`ephemeris`]: queries JPL Horizons for the physical data of a list of
//!   solar-system bodies, parses the free-text reply with the table in
//!   [`extract`] and writes a single JSON array.
//!
//! Both pipelines reach the network through [`http::HttpGet`] and take all of
//! their settings from an explicit [`config::Config`].

pub mod catalog;
pub mod config;
pub mod ephemeris;
pub mod error;
pub mod extract;
pub mod http;
pub mod output;

pub use catalog::{run_catalog, CatalogConfig, CatalogOutcome, CatalogRecord};
pub use config::Config;
pub use ephemeris::{run_ephemeris, EphemerisConfig, EphemerisOutcome, EphemerisRecord};
pub use error::{FetchError, FetchResult};
pub use extract::{extract_physical_data, PhysicalCharacteristics};
pub use http::{HttpClient, HttpGet};
