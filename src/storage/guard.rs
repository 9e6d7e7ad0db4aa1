//! Process-wide filesystem guard
//!
//! All filesystem access flows through a [`StorageHandle`] obtained by
//! locking the [`StorageGuard`]. The guard is held once per logical
//! operation; nothing in the crate acquires it recursively, so no deadlock
//! is possible.
//!
//! Writes go to a sibling temp file first and are renamed into place, so a
//! record file either holds its old bytes or its new bytes, never a torn
//! write.

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::paths::temp_path;

/// The single lock serializing filesystem access across all tables
pub(crate) struct StorageGuard {
    handle: Mutex<StorageHandle>,
}

impl StorageGuard {
    pub fn new() -> Self {
        Self {
            handle: Mutex::new(StorageHandle { _private: () }),
        }
    }

    /// Blocks until the handle is available. A panic in another holder must
    /// not wedge the store, so poisoning is ignored.
    pub fn lock(&self) -> MutexGuard<'_, StorageHandle> {
        self.handle.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Filesystem primitives, reachable only through the guard
pub(crate) struct StorageHandle {
    _private: (),
}

impl StorageHandle {
    /// Idempotent directory creation; an existing directory is not an error
    pub fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    pub fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    /// Reads a file, capped at `bound + 1` bytes so the caller can tell an
    /// in-bound record from one that outgrew its table's declared size.
    pub fn read_bounded(&self, path: &Path, bound: usize) -> io::Result<Vec<u8>> {
        let file = File::open(path)?;
        let mut bytes = Vec::new();
        file.take(bound as u64 + 1).read_to_end(&mut bytes)?;
        Ok(bytes)
    }

    /// Writes `bytes` to a sibling temp file, fsyncs, then renames it over
    /// `path`. The rename both creates new records and replaces old ones.
    pub fn write_atomic(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        let tmp = temp_path(path);
        let result = File::create(&tmp)
            .and_then(|mut file| {
                file.write_all(bytes)?;
                file.sync_all()
            })
            .and_then(|_| fs::rename(&tmp, path));
        if result.is_err() {
            let _ = fs::remove_file(&tmp);
        }
        result
    }

    /// Removes a file; returns whether it existed
    pub fn remove(&self, path: &Path) -> io::Result<bool> {
        match fs::remove_file(path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Names of the plain files in a directory, in filesystem order
    pub fn list_file_names(&self, dir: &Path) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Ok(name) = entry.file_name().into_string() {
                names.push(name);
            }
        }
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_atomic_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("record.rec");

        let guard = StorageGuard::new();
        let fs = guard.lock();
        fs.write_atomic(&path, b"payload").unwrap();

        assert_eq!(fs.read_bounded(&path, 64).unwrap(), b"payload");
        // No temp file left behind
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn test_write_atomic_replaces_existing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("record.rec");

        let guard = StorageGuard::new();
        let fs = guard.lock();
        fs.write_atomic(&path, b"old").unwrap();
        fs.write_atomic(&path, b"new").unwrap();

        assert_eq!(fs.read_bounded(&path, 64).unwrap(), b"new");
    }

    #[test]
    fn test_read_bounded_caps_at_bound_plus_one() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("record.rec");

        let guard = StorageGuard::new();
        let fs = guard.lock();
        fs.write_atomic(&path, &[0u8; 100]).unwrap();

        let bytes = fs.read_bounded(&path, 10).unwrap();
        assert_eq!(bytes.len(), 11);
    }

    #[test]
    fn test_remove_reports_existence() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("record.rec");

        let guard = StorageGuard::new();
        let fs = guard.lock();
        fs.write_atomic(&path, b"x").unwrap();

        assert!(fs.remove(&path).unwrap());
        assert!(!fs.remove(&path).unwrap());
    }

    #[test]
    fn test_list_file_names_skips_directories() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("subdir")).unwrap();

        let guard = StorageGuard::new();
        let fs = guard.lock();
        fs.write_atomic(&dir.path().join("a.rec"), b"x").unwrap();

        let names = fs.list_file_names(dir.path()).unwrap();
        assert_eq!(names, vec!["a.rec".to_string()]);
    }
}
