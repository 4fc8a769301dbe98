//! # Shared Digest Crate
//!
//! Digest providers and content identifiers shared by the Hashpin data
//! structures. Everything here is pure and deterministic: an identifier is
//! derived exclusively from the bytes of the object it names.

pub mod hasher;
pub mod id;

pub use hasher::{blake3_digest, sha256_digest, Blake3Hasher, ObjectHasher, Sha256Hasher};
pub use id::{ObjectId, DEFAULT_ID_WIDTH_BYTES};
