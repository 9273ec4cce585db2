//! Filesystem helpers returning [`CoreError`].

use crate::error::CoreError;
use std::fs;
use std::path::Path;

/// Ensures that a directory exists at the given path, creating parents as needed.
///
/// Fails if the path exists but is not a directory.
///
/// ```no_run
/// # use novawm_core::utils::fs::ensure_dir_exists;
/// let dir = tempfile::tempdir().unwrap();
/// ensure_dir_exists(&dir.path().join("logs")).unwrap();
/// ```
pub fn ensure_dir_exists(path: &Path) -> Result<(), CoreError> {
    if path.exists() {
        if path.is_dir() {
            Ok(())
        } else {
            Err(CoreError::Filesystem {
                message: "Path exists but is not a directory".to_string(),
                path: path.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::AlreadyExists,
                    "Path exists but is not a directory",
                ),
            })
        }
    } else {
        fs::create_dir_all(path).map_err(|e| CoreError::Filesystem {
            message: "Failed to create directory".to_string(),
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Ensures the parent directory of `file` exists.
pub fn ensure_parent_dir_exists(file: &Path) -> Result<(), CoreError> {
    match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir_exists(parent),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn test_ensure_dir_exists_creates_nested() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        ensure_dir_exists(&nested).unwrap();
        assert!(nested.is_dir());
        // Idempotent.
        ensure_dir_exists(&nested).unwrap();
    }

    #[test]
    fn test_ensure_dir_exists_rejects_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("occupied");
        File::create(&file_path).unwrap();
        match ensure_dir_exists(&file_path) {
            Err(CoreError::Filesystem { path, .. }) => assert_eq!(path, file_path),
            other => panic!("expected Filesystem error, got {:?}", other),
        }
    }

    #[test]
    fn test_ensure_parent_dir_exists() {
        let dir = tempdir().unwrap();
        let log_file = dir.path().join("state").join("novawm.log");
        ensure_parent_dir_exists(&log_file).unwrap();
        assert!(dir.path().join("state").is_dir());
        ensure_parent_dir_exists(Path::new("relative.log")).unwrap();
    }
}
