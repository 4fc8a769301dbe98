//! # Canonical Codec
//!
//! Objects go on the store as a bincode-encoded pair
//! `(protocol_version, object)`. The tagged `StoredObject` union supplies
//! the kind discriminator, so a byte string decodes to exactly one kind or
//! not at all. The encoding is deterministic and order-preserving, which
//! is what keeps identifiers stable: equal objects always hash to equal
//! identifiers.

use crate::domain::entities::StoredObject;
use crate::domain::errors::CodecError;

/// Version written into every encoded object.
pub const PROTO_VERSION: u16 = 1;

/// Encoder/decoder pair for on-store bytes.
///
/// Substitute codecs must stay deterministic, order-preserving for
/// sequence fields, and round-trip exact; identifiers lose meaning
/// otherwise.
pub trait Codec: Send + Sync {
    fn encode(&self, object: &StoredObject) -> Result<Vec<u8>, CodecError>;

    fn decode(&self, bytes: &[u8]) -> Result<StoredObject, CodecError>;
}

/// Default codec: bincode over `(PROTO_VERSION, StoredObject)`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BincodeCodec;

impl Codec for BincodeCodec {
    fn encode(&self, object: &StoredObject) -> Result<Vec<u8>, CodecError> {
        bincode::serialize(&(PROTO_VERSION, object)).map_err(|e| CodecError::Encode {
            reason: e.to_string(),
        })
    }

    fn decode(&self, bytes: &[u8]) -> Result<StoredObject, CodecError> {
        let (version, object): (u16, StoredObject) =
            bincode::deserialize(bytes).map_err(|e| CodecError::Decode {
                reason: e.to_string(),
            })?;
        if version != PROTO_VERSION {
            tracing::warn!(
                got = version,
                expected = PROTO_VERSION,
                "protocol version mismatch, decoding anyway"
            );
        }
        Ok(object)
    }
}
