//! # Content Digests
//!
//! Digest providers used to derive content identifiers.
//!
//! The default provider is SHA-256. BLAKE3 is available for stores where
//! hashing throughput dominates.

use sha2::{Digest, Sha256};

/// Width in bytes of a 256-bit digest.
pub const DIGEST_LEN: usize = 32;

/// A deterministic fixed-width digest over bytes.
///
/// Implementations must be pure: the same input always produces the same
/// output, and the output width never varies between calls.
pub trait ObjectHasher: Send + Sync {
    /// Digest `data` at the provider's full output width.
    fn digest(&self, data: &[u8]) -> Vec<u8>;

    /// Output width in bytes.
    fn output_len(&self) -> usize {
        DIGEST_LEN
    }
}

/// SHA-256 digest provider (default).
#[derive(Clone, Copy, Debug, Default)]
pub struct Sha256Hasher;

impl ObjectHasher for Sha256Hasher {
    fn digest(&self, data: &[u8]) -> Vec<u8> {
        sha256_digest(data).to_vec()
    }
}

/// BLAKE3 digest provider.
#[derive(Clone, Copy, Debug, Default)]
pub struct Blake3Hasher;

impl ObjectHasher for Blake3Hasher {
    fn digest(&self, data: &[u8]) -> Vec<u8> {
        blake3_digest(data).to_vec()
    }
}

/// Hash data with SHA-256 (one-shot).
pub fn sha256_digest(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Hash data with BLAKE3 (one-shot).
pub fn blake3_digest(data: &[u8]) -> [u8; 32] {
    *blake3::hash(data).as_bytes()
}
