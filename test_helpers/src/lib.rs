//! Test infrastructure for the ingestion pipelines.
//!
//! Tests never touch the live archive or Horizons services. Instead they read
//! responses recorded under `<workspace root>/test_data/`:
//!
//! ```text
//! test_data/
//! ├── exoplanet/   # TAP sync replies from the Exoplanet Archive
//! └── horizons/    # `result` texts returned by the Horizons API
//! ```
//!
//! This crate locates the workspace root from whatever directory the test
//! runner starts in and resolves fixture names against it.
//!
//! # Usage
//! ```rust
//! use test_helpers::{fixture_path, load_fixture};
//!
//! let earth = load_fixture("horizons/earth.txt").expect("fixture missing");
//! assert!(earth.contains("Vol. Mean Radius"));
//! assert!(fixture_path("horizons/earth.txt").exists());
//! ```

use once_cell::sync::Lazy;
use std::env;
use std::path::{Path, PathBuf};

/// Errors from locating the workspace or reading fixtures.
#[derive(thiserror::Error, Debug)]
pub enum TestHelperError {
    /// Project root directory could not be located or accessed.
    ///
    /// Occurs when no ancestor of the current directory holds a Cargo.toml
    /// with a `[workspace]` section.
    #[error("Failed to find project root: {0}")]
    ProjectRootNotFound(String),

    /// A fixture file is missing or unreadable.
    #[error("Failed to read fixture {}: {source}", path.display())]
    FixtureUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Locate the workspace root.
///
/// Walks up from the current directory until it finds a Cargo.toml that
/// contains a `[workspace]` section.
///
/// # Errors
/// [`TestHelperError::ProjectRootNotFound`] if the filesystem root is reached
/// first or a directory cannot be read.
pub fn find_project_root() -> Result<PathBuf, TestHelperError> {
    let mut current_dir = env::current_dir().map_err(|e| {
        TestHelperError::ProjectRootNotFound(format!("Failed to get current directory: {}", e))
    })?;

    loop {
        let cargo_toml = current_dir.join("Cargo.toml");
        if cargo_toml.exists() {
            let content = std::fs::read_to_string(&cargo_toml).map_err(|e| {
                TestHelperError::ProjectRootNotFound(format!("Failed to read Cargo.toml: {}", e))
            })?;

            if content.contains("[workspace]") {
                return Ok(current_dir);
            }
        }

        if !current_dir.pop() {
            break;
        }
    }

    Err(TestHelperError::ProjectRootNotFound(
        "Workspace root not found".to_string(),
    ))
}

/// Workspace root, computed once per test process.
static PROJECT_ROOT: Lazy<PathBuf> =
    Lazy::new(|| find_project_root().expect("Failed to find project root directory"));

/// Directory holding the recorded API responses.
pub fn fixture_dir() -> PathBuf {
    PROJECT_ROOT.join("test_data")
}

/// Path of a fixture, relative to [`fixture_dir`].
pub fn fixture_path<P: AsRef<Path>>(name: P) -> PathBuf {
    fixture_dir().join(name)
}

/// Read a fixture as UTF-8 text.
pub fn load_fixture<P: AsRef<Path>>(name: P) -> Result<String, TestHelperError> {
    let path = fixture_path(name);
    std::fs::read_to_string(&path).map_err(|source| TestHelperError::FixtureUnreadable {
        path,
        source,
    })
}
