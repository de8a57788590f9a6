//! Physical parameter extraction from Horizons object-data text.
//!
//! Horizons returns a body's physical data as a free-text block whose labels,
//! units and layout differ between planets, dwarf planets and comets. The
//! extractor normalizes whitespace and runs a fixed table of
//! `(key, pattern)` entries over the text. Each entry is searched
//! independently against the full text, and its first match is parsed as a
//! float.
//!
//! Values keep their source units. The same quantity can therefore appear
//! under several keys at different scales (`mass_kg x10^22` for Pluto,
//! `mass_kg x10^24` for Earth, `mass_kg x10^26` for Jupiter).
//!
//! ```
//! use skyfetch::extract::extract_physical_data;
//!
//! let data = extract_physical_data("Mass x10^24 (kg) = 5.97+-0.01");
//! assert_eq!(data.get("mass_kg x10^24"), Some(5.97));
//! assert_eq!(data.len(), 1);
//! ```

use std::collections::BTreeMap;

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Parameter name to value, holding only the parameters found in the text.
///
/// A missing key means the parameter was not found; it is never filled with
/// zero. Serializes as a flat JSON object with keys in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhysicalCharacteristics(BTreeMap<String, f64>);

impl PhysicalCharacteristics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.get(key).copied()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert(&mut self, key: &str, value: f64) {
        self.0.insert(key.to_string(), value);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Raw `(key, pattern)` table.
///
/// The value of a match is the first capture group that took part in it, so a
/// pattern with alternative label layouts can put a group in each branch.
/// A trailing `+-uncertainty` is matched outside the group and never becomes
/// part of the value.
const PATTERNS: &[(&str, &str)] = &[
    (
        "radius_km",
        r"(?i)Vol\. mean radius \(km\)\s*=\s*([\d.]+)(?:\+-[\d.]+)?",
    ),
    ("equatorial_radius_km", r"Equ\. radius, km\s*=\s*([\d.]+)"),
    ("polar_radius_km", r"Polar axis, km\s*=\s*([\d.]+)"),
    ("density_g_cm^3", r"Density,? \(?g/cm\^3\)?\s*=\s*([\d.]+)"),
    ("density_g_cm^-3", r"Density \(?g cm\^-3\)?\s*=\s*([\d.]+)"),
    (
        "density_g_Neptune_cm3",
        r"Density\s*(?:\(R=\d+\s*km\))?\s*=\s*([\d.]+)\s*g/cm\^3",
    ),
    ("mass_kg x10^22", r"Mass x10\^22 \(kg\)\s*=\s*([\d.]+)"),
    ("mass_kg x10^23", r"Mass x10\^23 \(kg\)\s*=\s*([\d.]+)"),
    ("mass_kg x10^24", r"Mass x10\^24 \(kg\)\s*=\s*([\d.]+)"),
    ("mass_kg x10^26", r"Mass x\s*10\^26 \(kg\)\s*=\s*([\d.]+)"),
    ("gravity_polar_m_s2", r"g_p, m/s\^2 \(polar\)\s*=\s*([\d.]+)"),
    (
        "gravity_equator_m_s2",
        r"g_e, m/s\^2 \(equatorial\)\s*=\s*([\d.]+)",
    ),
    ("gravity_mean_m_s^2", r"g_o, m/s\^2\s*=\s*([\d.]+)"),
    (
        "gravity_mean_km^3_s^2",
        r"GM,? \(?km\^3/s\^2\)?\s*=\s*([+-]?[\d.]+)(?:\+-[\d.]+)?",
    ),
    ("escape_velocity_km_s", r"Escape velocity\s*=\s*([\d.]+) km/s"),
    (
        "sidereal_rotation_period_hr",
        r"Mean sidereal day, hr\s*=\s*([\d.]+)",
    ),
    ("mean_solar_day_sec", r"Mean solar day 2000\.0, s\s*=\s*([\d.]+)"),
    ("obliquity_deg", r"Obliquity to orbit, deg\s*=\s*([\d.]+)"),
    (
        "mean_surface_temp_K",
        r"Mean surface temp \(Ts\), K\s*=\s*([\d.]+)",
    ),
    ("mean_temp_K", r"(?i)Mean Temperature\s*\(K\)\s*=\s*([\d.]+)"),
    (
        "atmos_temp_K",
        r"(?i)Atmos\. temp\. \(1 bar\)\s*=\s*([\d.]+)(?:\+-[\d.]+)?\s*K",
    ),
    (
        "albedo",
        r"(?i)Geometric albedo\s*=\s*([+-]?[\d.]+)(?:\+-[\d.]+)?",
    ),
    // "Sidereal period = X d", "Sidereal orbit period = X d" or
    // "Sidereal orb. per., d = X"; a value in years is skipped.
    (
        "orbital_period_days",
        r"Sidereal\s*(?:orb(?:it(?:al)?)?\.?\s*)?per(?:iod|\.)?\s*(?:[.,]?\s*[dD]\s*=\s*([\d.]+)|=\s*([\d.]+)\s*d\b)",
    ),
    ("orbital_speed_km_s", r"Orbital speed, km/s\s*=\s*([\d.]+)"),
];

/// The compiled extraction table, built on first use.
static EXTRACTION_TABLE: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    PATTERNS
        .iter()
        .map(|&(key, pattern)| {
            let regex = Regex::new(pattern)
                .unwrap_or_else(|e| panic!("invalid extraction pattern for {key}: {e}"));
            (key, regex)
        })
        .collect()
});

/// Collapse every whitespace run, newlines included, into one space.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Search `text` with one pattern and parse the captured value.
///
/// A capture that is not a valid float ("1.2.3", ".") yields `None`.
fn first_value(regex: &Regex, text: &str) -> Option<f64> {
    let captures = regex.captures(text)?;
    let value = captures.iter().skip(1).flatten().next()?;
    value.as_str().parse::<f64>().ok()
}

/// Extract every parameter in the table from a Horizons physical-data block.
pub fn extract_physical_data(text: &str) -> PhysicalCharacteristics {
    let mut data = PhysicalCharacteristics::new();
    if text.trim().is_empty() {
        return data;
    }

    let clean = normalize_whitespace(text);
    for (key, regex) in EXTRACTION_TABLE.iter() {
        if let Some(value) = first_value(regex, &clean) {
            data.insert(key, value);
        }
    }

    debug!(
        "Extracted {} of {} parameters",
        data.len(),
        EXTRACTION_TABLE.len()
    );
    data
}
