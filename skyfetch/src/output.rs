//! Output file writing.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{FetchError, FetchResult};

/// Replace the file at `path` with `contents`, creating the parent directory
/// if needed.
///
/// The bytes go to a temporary file in the same directory which is then
/// renamed over `path`, so readers see either the old file or the new one.
pub fn write_file(path: &Path, contents: &[u8]) -> FetchResult<()> {
    let io_err = |source| FetchError::Io {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(io_err)?;

    let mut staged = NamedTempFile::new_in(dir).map_err(io_err)?;
    staged.write_all(contents).map_err(io_err)?;
    // Temp files are created owner-only; output files are meant to be shared.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        staged
            .as_file()
            .set_permissions(fs::Permissions::from_mode(0o644))
            .map_err(io_err)?;
    }
    staged.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/data.json");

        write_file(&path, b"[]").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
    }

    #[test]
    fn test_overwrites_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");

        write_file(&path, b"first run, longer contents").unwrap();
        write_file(&path, b"second").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
        assert_eq!(entries(dir.path()), vec!["data.json"]);
    }

    #[test]
    fn test_unwritable_target_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be overwritten as a file.
        let err = write_file(dir.path(), b"x").unwrap_err();
        assert!(matches!(err, FetchError::Io { .. }));
    }

    #[test]
    fn test_failed_write_leaves_no_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let previous = dir.path().join("data.json");
        fs::write(&previous, "previous run").unwrap();
        let blocked = dir.path().join("blocked");
        fs::create_dir(&blocked).unwrap();

        assert!(write_file(&blocked, b"new contents").is_err());

        assert_eq!(entries(dir.path()), vec!["blocked", "data.json"]);
        assert!(blocked.is_dir());
        assert_eq!(fs::read_to_string(&previous).unwrap(), "previous run");
    }

    #[cfg(unix)]
    #[test]
    fn test_written_file_is_world_readable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        write_file(&path, b"[]").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }
}
