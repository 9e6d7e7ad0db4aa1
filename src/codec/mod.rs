//! Typed record codecs
//!
//! A table's codec converts between its schema-typed record and the bytes
//! stored in that record's file. The engine treats the encoded bytes as
//! opaque and never inspects record contents itself; the per-table size
//! bound is enforced by the store, not the codec.

mod json;

pub use json::JsonCodec;

use crate::storage::StoreResult;

/// Encode/decode capability for one record type.
///
/// Encode failures surface as [`StoreError::Encode`], decode failures as
/// [`StoreError::Decode`]. A file whose bytes fail to decode is a corrupt
/// record, not a valid empty one.
///
/// [`StoreError::Encode`]: crate::storage::StoreError::Encode
/// [`StoreError::Decode`]: crate::storage::StoreError::Decode
pub trait Codec {
    /// The schema-typed record this codec handles
    type Record;

    fn encode(&self, record: &Self::Record) -> StoreResult<Vec<u8>>;

    fn decode(&self, bytes: &[u8]) -> StoreResult<Self::Record>;
}
