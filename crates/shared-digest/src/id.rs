//! # Object Identifiers
//!
//! A content identifier is the lowercase hex encoding of a truncated
//! digest. Eight bytes (sixteen hex characters) is enough to address
//! objects against accidental corruption; deployments that need collision
//! resistance construct their store with the provider's full output width.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default truncation width applied to digests before hex encoding.
pub const DEFAULT_ID_WIDTH_BYTES: usize = 8;

/// ASCII content identifier: lowercase hex of a (possibly truncated) digest.
///
/// Identifiers are opaque map keys. Whether an identifier actually names a
/// given byte string is decided by the store on retrieval, never by the
/// identifier itself.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectId(String);

impl ObjectId {
    /// Build an identifier from a raw digest, truncated to `width` bytes.
    ///
    /// A `width` of zero or beyond the digest length falls back to the full
    /// digest.
    pub fn from_digest(digest: &[u8], width: usize) -> Self {
        let width = if width == 0 || width > digest.len() {
            digest.len()
        } else {
            width
        };
        ObjectId(hex::encode(&digest[..width]))
    }

    /// Wrap an already-encoded identifier, e.g. one received on the wire.
    pub fn from_hex(hex_id: impl Into<String>) -> Self {
        ObjectId(hex_id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
