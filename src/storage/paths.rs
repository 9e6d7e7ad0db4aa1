//! Path building for the one-file-per-record layout
//!
//! A record lives at `<root>/<database>/<table>/<16-hex-uuid>.rec`.
//! The filename is the uuid; parsing it back is the inverse of rendering it,
//! so every record file maps to exactly one uuid and back.

use std::path::{Path, PathBuf};

use crate::uuid::Uuid;

/// File extension for record files
pub const RECORD_EXT: &str = "rec";

/// Suffix appended to a record path while its replacement is being written.
/// Temp files never parse as record names, so scans cannot observe them.
const TEMP_SUFFIX: &str = ".tmp";

/// Renders the filename for a record: `<16-hex-uuid>.rec`
pub(crate) fn record_file_name(uuid: Uuid) -> String {
    format!("{}.{}", uuid.to_hex(), RECORD_EXT)
}

/// Full path of a record inside its table directory
pub(crate) fn record_path(table_dir: &Path, uuid: Uuid) -> PathBuf {
    table_dir.join(record_file_name(uuid))
}

/// Sibling temp path used for write-then-rename
pub(crate) fn temp_path(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(TEMP_SUFFIX);
    PathBuf::from(os)
}

/// Parses a directory entry name back into a uuid.
///
/// Returns `None` for anything that is not `<16-hex>.rec` (dotfiles, temp
/// files, foreign extensions, malformed hex). Such entries are not records.
pub(crate) fn parse_record_file_name(name: &str) -> Option<Uuid> {
    let stem = name.strip_suffix(RECORD_EXT)?.strip_suffix('.')?;
    Uuid::from_hex(stem)
}
