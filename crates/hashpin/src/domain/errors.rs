//! # Error Types
//!
//! Layered the same way the components are: `StoreError` for the
//! object-store contract, `CodecError` for the canonical encoding, and
//! `HashpinError` for everything a chain or tree operation can surface.

use shared_digest::ObjectId;
use thiserror::Error;

/// Object-store contract failures.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Retrieved bytes do not hash back to the requested identifier.
    #[error("object {id} failed integrity verification")]
    IntegrityFailure { id: ObjectId },

    /// The backing store itself failed.
    #[error("store backend error: {message}")]
    Backend { message: String },
}

/// Canonical encoding failures.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Bytes do not parse as any known object kind.
    #[error("cannot decode object: {reason}")]
    Decode { reason: String },

    #[error("cannot encode object: {reason}")]
    Encode { reason: String },
}

/// Errors surfaced by chain and tree operations.
#[derive(Debug, Error)]
pub enum HashpinError {
    /// Index outside the committed range of the chain.
    #[error("block index {index} is out of range for a chain of {len} blocks")]
    OutOfRange { index: u64, len: u64 },

    /// Strict lookup for a key the tree does not hold.
    #[error("lookup key {key:?} not found in tree")]
    KeyNotFound { key: String },

    /// An identifier resolved to an object of the wrong kind.
    #[error("object {id} is not a {expected}")]
    TypeMismatch {
        id: ObjectId,
        expected: &'static str,
    },

    /// Structural violation: missing finger, missing child, dangling
    /// reference.
    #[error("malformed structure: {reason}")]
    Malformed { reason: String },

    /// Tree commit with no items.
    #[error("cannot commit a tree with no items")]
    EmptyTree,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Codec(#[from] CodecError),
}
