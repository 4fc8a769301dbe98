//! # In-Memory Object Store
//!
//! Reference `ObjectStore` adapter over a `HashMap`. Configuration is
//! constructor-injected: the digest provider and the identifier width.

use std::collections::HashMap;

use shared_digest::{ObjectHasher, ObjectId, Sha256Hasher, DEFAULT_ID_WIDTH_BYTES};

use crate::domain::errors::StoreError;
use crate::ports::outbound::ObjectStore;

/// Content-addressed store backed by a `HashMap`.
pub struct MemoryStore<H: ObjectHasher = Sha256Hasher> {
    backend: HashMap<ObjectId, Vec<u8>>,
    hasher: H,
    id_width: usize,
}

impl MemoryStore<Sha256Hasher> {
    /// SHA-256 store with the default identifier width.
    pub fn new() -> Self {
        Self::with_hasher(Sha256Hasher, DEFAULT_ID_WIDTH_BYTES)
    }
}

impl<H: ObjectHasher> MemoryStore<H> {
    /// Store over an arbitrary digest provider and identifier width.
    ///
    /// An `id_width` of zero means full digest width.
    pub fn with_hasher(hasher: H, id_width: usize) -> Self {
        Self {
            backend: HashMap::new(),
            hasher,
            id_width,
        }
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.backend.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backend.is_empty()
    }

    /// Overwrite the raw bytes stored under `id`, bypassing content
    /// addressing. Exists for corruption scenarios in tests; regular
    /// writes go through `put`.
    pub fn insert_raw(&mut self, id: ObjectId, bytes: Vec<u8>) {
        self.backend.insert(id, bytes);
    }
}

impl Default for MemoryStore<Sha256Hasher> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: ObjectHasher> ObjectStore for MemoryStore<H> {
    fn hash_bytes(&self, bytes: &[u8]) -> ObjectId {
        ObjectId::from_digest(&self.hasher.digest(bytes), self.id_width)
    }

    fn put(&mut self, bytes: &[u8]) -> Result<ObjectId, StoreError> {
        let id = self.hash_bytes(bytes);
        self.backend
            .entry(id.clone())
            .or_insert_with(|| bytes.to_vec());
        Ok(id)
    }

    fn get_unverified(&self, id: &ObjectId) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.backend.get(id).cloned())
    }
}
