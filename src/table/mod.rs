//! Table registry
//!
//! Maps a table name to its descriptor: where its record files live and how
//! large one encoded record may be. Registration is in-memory only; it is
//! not persisted and must be repeated identically on every process start
//! before the table is usable.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{PoisonError, RwLock};

/// What the registry knows about one table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDescriptor {
    /// Table name, unique within the database
    pub name: String,
    /// Directory holding the table's record files
    pub path: PathBuf,
    /// Maximum encoded record size in bytes
    pub record_size: usize,
}

/// Name -> descriptor map, owned by the database instance
#[derive(Default)]
pub(crate) struct Registry {
    tables: RwLock<HashMap<String, TableDescriptor>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a descriptor under its name. Last writer wins: the
    /// descriptor it displaced, if any, is returned so the caller can log
    /// the overwrite.
    pub fn register(&self, descriptor: TableDescriptor) -> Option<TableDescriptor> {
        let mut tables = self
            .tables
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        tables.insert(descriptor.name.clone(), descriptor)
    }

    pub fn lookup(&self, name: &str) -> Option<TableDescriptor> {
        let tables = self.tables.read().unwrap_or_else(PoisonError::into_inner);
        tables.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(name: &str, record_size: usize) -> TableDescriptor {
        TableDescriptor {
            name: name.to_owned(),
            path: PathBuf::from("/db").join(name),
            record_size,
        }
    }

    #[test]
    fn test_lookup_after_register() {
        let registry = Registry::new();
        registry.register(descriptor("users", 256));

        let found = registry.lookup("users").unwrap();
        assert_eq!(found.name, "users");
        assert_eq!(found.record_size, 256);
    }

    #[test]
    fn test_lookup_missing_is_none() {
        let registry = Registry::new();
        assert!(registry.lookup("users").is_none());
    }

    #[test]
    fn test_reregister_last_writer_wins() {
        let registry = Registry::new();
        assert!(registry.register(descriptor("users", 256)).is_none());

        let displaced = registry.register(descriptor("users", 512)).unwrap();
        assert_eq!(displaced.record_size, 256);
        assert_eq!(registry.lookup("users").unwrap().record_size, 512);
    }
}
