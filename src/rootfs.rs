//! Helpers for container root filesystems on the host.

use std::fs;
use std::io;
use std::path::Path;

/// Whether `path` is a directory without entries.
///
/// Reads at most one entry, so it stays cheap on large trees.
pub fn is_dir_empty(path: impl AsRef<Path>) -> io::Result<bool> {
    let mut entries = fs::read_dir(path)?;
    Ok(entries.next().transpose()?.is_none())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(is_dir_empty(dir.path()).unwrap());
    }

    #[test]
    fn populated_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("etc")).unwrap();
        assert!(!is_dir_empty(dir.path()).unwrap());
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = is_dir_empty(dir.path().join("rootfs")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
