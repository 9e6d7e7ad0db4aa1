//! Physical storage layer
//!
//! One file per record on a constrained filesystem, protected by a single
//! process-wide guard.
//!
//! # Design Principles
//!
//! - One guard acquisition per logical operation
//! - Write-then-rename for every record write (no torn files)
//! - Bounded reads sized to the owning table's declared record size
//! - Filenames are uuids; anything else in a table directory is not a record

mod errors;
mod guard;
mod paths;

pub use errors::{StoreError, StoreResult};
pub use paths::RECORD_EXT;

pub(crate) use guard::{StorageGuard, StorageHandle};
pub(crate) use paths::{parse_record_file_name, record_path};
