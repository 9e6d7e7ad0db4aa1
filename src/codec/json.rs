//! JSON codec over serde
//!
//! The bundled codec: any `Serialize + DeserializeOwned` record type gets
//! encode/decode for free. Schema-compiler-generated codecs plug into the
//! same [`Codec`] seam.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::Codec;
use crate::storage::{StoreError, StoreResult};

/// Codec storing records as JSON
pub struct JsonCodec<R> {
    marker: PhantomData<fn() -> R>,
}

impl<R> JsonCodec<R> {
    pub fn new() -> Self {
        Self {
            marker: PhantomData,
        }
    }
}

impl<R> Default for JsonCodec<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Clone for JsonCodec<R> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<R> Codec for JsonCodec<R>
where
    R: Serialize + DeserializeOwned,
{
    type Record = R;

    fn encode(&self, record: &R) -> StoreResult<Vec<u8>> {
        serde_json::to_vec(record).map_err(|e| StoreError::Encode(e.to_string()))
    }

    fn decode(&self, bytes: &[u8]) -> StoreResult<R> {
        serde_json::from_slice(bytes).map_err(|e| StoreError::Decode(e.to_string()))
    }
}
