//! # Outbound Ports (Driven Ports)
//!
//! The storage contract the data structures are written against. The
//! library ships one adapter (`MemoryStore`); production deployments bring
//! their own.

use shared_digest::ObjectId;

use crate::domain::errors::StoreError;

/// Content-addressed object store.
///
/// Every entry is keyed by the hash of its own bytes. Entries are never
/// updated in place; `put` of bytes already present is a silent no-op.
pub trait ObjectStore: Send + Sync {
    /// Identifier the store assigns to `bytes`.
    fn hash_bytes(&self, bytes: &[u8]) -> ObjectId;

    /// Store `bytes` under their hash and return the identifier.
    fn put(&mut self, bytes: &[u8]) -> Result<ObjectId, StoreError>;

    /// Fetch bytes without integrity verification.
    fn get_unverified(&self, id: &ObjectId) -> Result<Option<Vec<u8>>, StoreError>;

    /// Fetch bytes and verify they hash back to `id`.
    fn get(&self, id: &ObjectId) -> Result<Option<Vec<u8>>, StoreError> {
        match self.get_unverified(id)? {
            Some(bytes) => {
                if self.hash_bytes(&bytes) != *id {
                    return Err(StoreError::IntegrityFailure { id: id.clone() });
                }
                Ok(Some(bytes))
            }
            None => Ok(None),
        }
    }

    /// Whether the store holds an object under `id`.
    fn contains(&self, id: &ObjectId) -> Result<bool, StoreError> {
        Ok(self.get_unverified(id)?.is_some())
    }
}
