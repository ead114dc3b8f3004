//! Temporary file management module
//!
//! This module provides RAII-based handling of the scratch file used to
//! replace the catalogue atomically. The scratch file lives next to its
//! target so the final rename never crosses a filesystem boundary.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

/// Guard for a scratch file that is deleted on drop unless persisted
#[derive(Debug)]
pub(crate) struct TempGuard {
    path: PathBuf,
    persisted: bool,
}

impl TempGuard {
    /// Get the path to the scratch file
    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Renames the scratch file over `target`, disarming the cleanup
    pub(crate) fn persist(mut self, target: &Path) -> io::Result<()> {
        fs::rename(&self.path, target)?;
        self.persisted = true;
        Ok(())
    }
}

impl Drop for TempGuard {
    fn drop(&mut self) {
        if !self.persisted {
            // Silently ignore errors during cleanup
            let _ = fs::remove_file(&self.path);
        }
    }
}

/// Creates an empty scratch file beside `target`
///
/// The name is `.<target file name>.<ulid>.tmp`, unique per call thanks to
/// the ULID. Returns the guard together with the open file handle.
pub(crate) fn create_sibling_temp_file(target: &Path) -> io::Result<(TempGuard, File)> {
    let directory = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file_name = target
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "catalogue".to_string());

    let ulid = ulid::Ulid::new();
    let path = directory.join(format!(".{}.{}.tmp", file_name, ulid));

    let file = File::create_new(&path)?;

    Ok((
        TempGuard {
            path,
            persisted: false,
        },
        file,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_create_sibling_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("episodes.csv");

        let (temp, _file) = create_sibling_temp_file(&target).unwrap();
        let path = temp.path().to_path_buf();

        assert!(path.exists());
        assert_eq!(path.parent(), Some(dir.path()));

        let filename = path.file_name().unwrap().to_str().unwrap();
        assert!(filename.starts_with(".episodes.csv."));
        assert!(filename.ends_with(".tmp"));
    }

    #[test]
    fn test_temp_file_cleanup_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("episodes.csv");

        let path = {
            let (temp, _file) = create_sibling_temp_file(&target).unwrap();
            temp.path().to_path_buf()
        };

        assert!(!path.exists());
        assert!(!target.exists());
    }

    #[test]
    fn test_persist_replaces_target() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("episodes.csv");
        fs::write(&target, "old").unwrap();

        let (temp, mut file) = create_sibling_temp_file(&target).unwrap();
        file.write_all(b"new").unwrap();
        drop(file);
        let temp_path = temp.path().to_path_buf();
        temp.persist(&target).unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "new");
        assert!(!temp_path.exists());
    }

    #[test]
    fn test_multiple_temp_files_unique() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("episodes.csv");

        let (temp1, _f1) = create_sibling_temp_file(&target).unwrap();
        let (temp2, _f2) = create_sibling_temp_file(&target).unwrap();

        assert_ne!(temp1.path(), temp2.path());
    }
}
