//! Record CRUD and the select pipeline
//!
//! All operations resolve the table through the registry first, then hold
//! the storage guard once for their filesystem work. Encoded bytes are
//! written whole via write-then-rename; an `update` is a full replace, never
//! a merge.

use std::io;
use std::path::Path;
use std::sync::Arc;

use super::DatabaseInner;
use crate::codec::Codec;
use crate::observability::Logger;
use crate::query::Select;
use crate::storage::{parse_record_file_name, record_path, StorageHandle, StoreError, StoreResult};
use crate::uuid::Uuid;

/// Typed handle to one registered table.
///
/// The handle carries the table's codec; the descriptor (directory and
/// record size bound) is re-resolved through the registry on every call, so
/// a re-registration takes effect for handles that already exist.
pub struct Table<C: Codec> {
    db: Arc<DatabaseInner>,
    name: String,
    codec: C,
}

impl<C: Codec> Table<C> {
    pub(crate) fn new(db: Arc<DatabaseInner>, name: String, codec: C) -> Self {
        Self { db, name, codec }
    }

    /// Table name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stores a new record under `uuid`.
    ///
    /// The uuid must be free: an existing record file fails the insert
    /// without modification. A colliding generated uuid is indistinguishable
    /// from a duplicate key and is rejected the same way.
    ///
    /// # Errors
    ///
    /// `AlreadyExists` if the uuid holds a record, `Encode` if the record is
    /// malformed or exceeds the table's size bound, `Io` on filesystem
    /// failure.
    pub fn insert(&self, uuid: Uuid, record: &C::Record) -> StoreResult<()> {
        let descriptor = self.db.resolve(&self.name)?;
        let path = record_path(&descriptor.path, uuid);

        let written = {
            let fs = self.db.guard.lock();
            if fs.exists(&path) {
                return Err(StoreError::AlreadyExists);
            }
            let bytes = self.encode_bounded(record, descriptor.record_size)?;
            fs.write_atomic(&path, &bytes)?;
            bytes.len()
        };

        Logger::trace(
            "RECORD_INSERTED",
            &[
                ("table", &self.name),
                ("uuid", &uuid.to_hex()),
                ("bytes", &written.to_string()),
            ],
        );
        Ok(())
    }

    /// Fetches the record stored under `uuid`.
    ///
    /// # Errors
    ///
    /// `NotFound` if no record file exists, `Decode` if the stored bytes are
    /// corrupt under the table's codec, `Io` on filesystem failure.
    pub fn get(&self, uuid: Uuid) -> StoreResult<C::Record> {
        let descriptor = self.db.resolve(&self.name)?;
        let path = record_path(&descriptor.path, uuid);

        let bytes = {
            let fs = self.db.guard.lock();
            read_record(&fs, &path, descriptor.record_size)?
        };

        self.decode_bounded(&bytes, descriptor.record_size)
    }

    /// Replaces the record stored under `uuid` with `record`.
    ///
    /// Full replace: no field of the old value survives into the new one.
    /// The new bytes are renamed over the old file in one step, so a failure
    /// mid-update leaves the old record intact.
    ///
    /// # Errors
    ///
    /// `NotFound` if the uuid holds no record, `Encode` and `Io` as for
    /// [`Table::insert`].
    pub fn update(&self, uuid: Uuid, record: &C::Record) -> StoreResult<()> {
        let descriptor = self.db.resolve(&self.name)?;
        let path = record_path(&descriptor.path, uuid);

        {
            let fs = self.db.guard.lock();
            if !fs.exists(&path) {
                return Err(StoreError::NotFound);
            }
            let bytes = self.encode_bounded(record, descriptor.record_size)?;
            fs.write_atomic(&path, &bytes)?;
        }

        Logger::trace(
            "RECORD_UPDATED",
            &[("table", &self.name), ("uuid", &uuid.to_hex())],
        );
        Ok(())
    }

    /// Removes the record stored under `uuid`. No tombstone remains.
    ///
    /// # Errors
    ///
    /// `NotFound` if the uuid holds no record, `Io` on filesystem failure.
    pub fn delete(&self, uuid: Uuid) -> StoreResult<()> {
        let descriptor = self.db.resolve(&self.name)?;
        let path = record_path(&descriptor.path, uuid);

        let removed = {
            let fs = self.db.guard.lock();
            fs.remove(&path)?
        };
        if !removed {
            return Err(StoreError::NotFound);
        }

        Logger::trace(
            "RECORD_DELETED",
            &[("table", &self.name), ("uuid", &uuid.to_hex())],
        );
        Ok(())
    }

    /// Runs the filter -> sort -> limit pipeline over the whole table.
    ///
    /// The directory is enumerated and every candidate's bytes are read
    /// under one guard acquisition; decoding, filtering, sorting, and
    /// limiting happen after release. A record that fails to decode is
    /// logged and skipped; one corrupt file never fails the scan. Every
    /// invocation rescans from scratch; results are freshly materialized
    /// values owned by the caller.
    pub fn select(&self, query: Select<'_, C::Record>) -> StoreResult<Vec<C::Record>> {
        let descriptor = self.db.resolve(&self.name)?;

        let mut candidates: Vec<(Uuid, Vec<u8>)> = Vec::new();
        {
            let fs = self.db.guard.lock();
            let names = match fs.list_file_names(&descriptor.path) {
                Ok(names) => names,
                // A never-written table has no directory yet
                Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
                Err(e) => return Err(StoreError::Io(e)),
            };

            for name in names {
                let uuid = match parse_record_file_name(&name) {
                    Some(uuid) => uuid,
                    None => continue,
                };
                let path = record_path(&descriptor.path, uuid);
                match read_record(&fs, &path, descriptor.record_size) {
                    Ok(bytes) => candidates.push((uuid, bytes)),
                    // Deleted between listing and read
                    Err(StoreError::NotFound) => continue,
                    Err(e) => return Err(e),
                }
            }
        }

        let mut records = Vec::new();
        for (uuid, bytes) in candidates {
            match self.decode_bounded(&bytes, descriptor.record_size) {
                Ok(record) => {
                    if query.matches(&record) {
                        records.push(record);
                    }
                }
                Err(e) => Logger::warn(
                    "RECORD_SKIPPED_CORRUPT",
                    &[
                        ("table", &self.name),
                        ("uuid", &uuid.to_hex()),
                        ("error", &e.to_string()),
                    ],
                ),
            }
        }

        Ok(query.finish(records))
    }

    fn encode_bounded(&self, record: &C::Record, bound: usize) -> StoreResult<Vec<u8>> {
        let bytes = self.codec.encode(record)?;
        if bytes.len() > bound {
            return Err(StoreError::Encode(format!(
                "encoded record is {} bytes, table bound is {}",
                bytes.len(),
                bound
            )));
        }
        Ok(bytes)
    }

    fn decode_bounded(&self, bytes: &[u8], bound: usize) -> StoreResult<C::Record> {
        if bytes.len() > bound {
            return Err(StoreError::Decode(format!(
                "record file exceeds table bound of {} bytes",
                bound
            )));
        }
        self.codec.decode(bytes)
    }
}

/// Shared bounded read under the guard; `get` and the scan both come
/// through here. Absence maps to `NotFound`.
fn read_record(fs: &StorageHandle, path: &Path, bound: usize) -> StoreResult<Vec<u8>> {
    match fs.read_bounded(path, bound) {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(StoreError::NotFound),
        Err(e) => Err(StoreError::Io(e)),
    }
}
