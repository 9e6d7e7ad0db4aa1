//! Database instance and table registration
//!
//! A [`Database`] is a namespace: a root directory grouping tables, the
//! registry mapping table names to descriptors, and the single guard
//! serializing all filesystem access. It is created once at startup with
//! [`Database::open`]; tables are then registered explicitly before use.

mod table;

pub use table::Table;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::codec::Codec;
use crate::observability::Logger;
use crate::storage::{StorageGuard, StoreError, StoreResult};
use crate::table::{Registry, TableDescriptor};

/// One database: a directory of tables sharing a registry and a guard.
///
/// Cloning is cheap and hands out another handle to the same instance, which
/// is how the store is shared across threads.
#[derive(Clone)]
pub struct Database {
    inner: Arc<DatabaseInner>,
}

pub(crate) struct DatabaseInner {
    name: String,
    path: PathBuf,
    pub(crate) registry: Registry,
    pub(crate) guard: StorageGuard,
}

impl Database {
    /// Opens the database directory `<root>/<name>`, creating it if needed.
    ///
    /// Failure to create or open this location is the one unrecoverable
    /// condition in the store: it is logged once at FATAL and returned, and
    /// no instance exists afterwards.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for an empty or path-escaping name, `Io` if the
    /// directory cannot be created.
    pub fn open(root: impl AsRef<Path>, name: &str) -> StoreResult<Self> {
        validate_component("database name", name)?;

        let path = root.as_ref().join(name);
        let guard = StorageGuard::new();
        {
            let fs = guard.lock();
            if let Err(e) = fs.create_dir_all(&path) {
                Logger::fatal(
                    "DB_OPEN_FAILED",
                    &[
                        ("path", &path.display().to_string()),
                        ("error", &e.to_string()),
                    ],
                );
                return Err(StoreError::Io(e));
            }
        }

        Logger::info(
            "DB_OPENED",
            &[("database", name), ("path", &path.display().to_string())],
        );

        Ok(Self {
            inner: Arc::new(DatabaseInner {
                name: name.to_owned(),
                path,
                registry: Registry::new(),
                guard,
            }),
        })
    }

    /// Database name
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Root directory of this database
    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Registers a table and returns its typed handle.
    ///
    /// Creates the table's backing directory if it does not exist yet; a
    /// pre-existing directory is not an error. Registration is in-memory
    /// only and must be repeated on every process start.
    ///
    /// Re-registering a name overwrites its descriptor (last writer wins)
    /// and is logged at WARN.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for an empty or path-escaping name or a zero
    /// `record_size`, `Io` if the table directory cannot be created.
    pub fn register<C: Codec>(
        &self,
        name: &str,
        codec: C,
        record_size: usize,
    ) -> StoreResult<Table<C>> {
        validate_component("table name", name)?;
        if record_size == 0 {
            return Err(StoreError::invalid("record size is zero"));
        }

        let path = self.inner.path.join(name);
        {
            let fs = self.inner.guard.lock();
            fs.create_dir_all(&path)?;
        }

        let descriptor = TableDescriptor {
            name: name.to_owned(),
            path,
            record_size,
        };

        match self.inner.registry.register(descriptor) {
            Some(previous) => Logger::warn(
                "TABLE_REREGISTERED",
                &[
                    ("table", name),
                    ("previous_record_size", &previous.record_size.to_string()),
                    ("record_size", &record_size.to_string()),
                ],
            ),
            None => Logger::info(
                "TABLE_REGISTERED",
                &[("table", name), ("record_size", &record_size.to_string())],
            ),
        }

        Ok(Table::new(Arc::clone(&self.inner), name.to_owned(), codec))
    }

    /// Registry lookup; `None` if the name was never registered
    pub fn descriptor(&self, name: &str) -> Option<TableDescriptor> {
        self.inner.registry.lookup(name)
    }
}

impl DatabaseInner {
    /// Registry resolution on every operation: an unregistered table is a
    /// caller error, not a missing record.
    pub(crate) fn resolve(&self, table: &str) -> StoreResult<TableDescriptor> {
        self.registry
            .lookup(table)
            .ok_or_else(|| StoreError::invalid(format!("table not registered: {}", table)))
    }
}

/// A name becomes a single path component; reject anything that would walk
/// out of the database directory.
fn validate_component(what: &str, name: &str) -> StoreResult<()> {
    if name.is_empty() {
        return Err(StoreError::invalid(format!("{} is empty", what)));
    }
    if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
        return Err(StoreError::invalid(format!(
            "{} is not a valid path component: {}",
            what, name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::JsonCodec;
    use tempfile::TempDir;

    #[test]
    fn test_open_creates_directory() {
        let root = TempDir::new().unwrap();
        let db = Database::open(root.path(), "sensors").unwrap();

        assert_eq!(db.name(), "sensors");
        assert!(db.path().is_dir());
    }

    #[test]
    fn test_open_rejects_bad_names() {
        let root = TempDir::new().unwrap();
        assert!(matches!(
            Database::open(root.path(), ""),
            Err(StoreError::InvalidArgument(_))
        ));
        assert!(matches!(
            Database::open(root.path(), "../escape"),
            Err(StoreError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_open_fails_when_root_is_a_file() {
        let root = TempDir::new().unwrap();
        let blocked = root.path().join("blocked");
        std::fs::write(&blocked, b"not a directory").unwrap();

        let result = Database::open(&blocked, "db");
        assert!(matches!(result, Err(StoreError::Io(_))));
    }

    #[test]
    fn test_register_validates_arguments() {
        let root = TempDir::new().unwrap();
        let db = Database::open(root.path(), "db").unwrap();

        assert!(matches!(
            db.register("", JsonCodec::<u32>::new(), 64),
            Err(StoreError::InvalidArgument(_))
        ));
        assert!(matches!(
            db.register("users", JsonCodec::<u32>::new(), 0),
            Err(StoreError::InvalidArgument(_))
        ));
        assert!(matches!(
            db.register("a/b", JsonCodec::<u32>::new(), 64),
            Err(StoreError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_register_creates_table_directory_idempotently() {
        let root = TempDir::new().unwrap();
        let db = Database::open(root.path(), "db").unwrap();

        db.register("users", JsonCodec::<u32>::new(), 64).unwrap();
        let descriptor = db.descriptor("users").unwrap();
        assert!(descriptor.path.is_dir());

        // Registering again over the existing directory succeeds
        db.register("users", JsonCodec::<u32>::new(), 64).unwrap();
    }

    #[test]
    fn test_descriptor_lookup() {
        let root = TempDir::new().unwrap();
        let db = Database::open(root.path(), "db").unwrap();

        assert!(db.descriptor("users").is_none());

        db.register("users", JsonCodec::<u32>::new(), 128).unwrap();
        let descriptor = db.descriptor("users").unwrap();
        assert_eq!(descriptor.record_size, 128);
        assert_eq!(descriptor.path, db.path().join("users"));
    }

    #[test]
    fn test_reregister_overwrites_descriptor() {
        let root = TempDir::new().unwrap();
        let db = Database::open(root.path(), "db").unwrap();

        db.register("users", JsonCodec::<u32>::new(), 64).unwrap();
        db.register("users", JsonCodec::<u32>::new(), 256).unwrap();

        assert_eq!(db.descriptor("users").unwrap().record_size, 256);
    }
}
