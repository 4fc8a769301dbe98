//! # Hashpin
//!
//! Authenticated, content-addressed data structures backed by a pluggable
//! object store:
//!
//! - **Skipchain** — an append-only hash chain whose blocks carry
//!   back-pointers to logarithmically many predecessors, giving sublinear
//!   index lookup with cryptographic inclusion proofs.
//! - **Merkle search tree** — an immutable, balanced, byte-ordered
//!   key-value tree whose inner nodes carry minimal pivot prefixes, giving
//!   compact (non-)inclusion proofs.
//!
//! Both share one substrate: objects are canonically encoded, stored under
//! the hash of their own bytes, and integrity-checked on retrieval.
//!
//! ## Crate Structure
//!
//! - `domain/` - data model, codec, chain and tree logic, proof verifiers
//! - `ports/` - the `ObjectStore` contract backing stores must satisfy
//! - `adapters/` - the in-memory reference store
//!
//! ## Usage
//!
//! ```
//! use hashpin::{BlockBuilder, Chain, MemoryStore};
//!
//! let mut chain = Chain::new(MemoryStore::new(), None);
//! let mut builder = BlockBuilder::new(&mut chain);
//! builder.payload = Some(b"Hello, world!".to_vec());
//! let block = builder.commit()?;
//! assert_eq!(block.index, 0);
//! # Ok::<(), hashpin::HashpinError>(())
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::memory::MemoryStore;
pub use domain::chain::{skipchain_indices, BlockBuilder, Chain};
pub use domain::codec::{BincodeCodec, Codec, PROTO_VERSION};
pub use domain::entities::{ChainBlock, ChainProof, StoredObject, TreeLeaf, TreeNode, TreeProof};
pub use domain::errors::{CodecError, HashpinError, StoreError};
pub use domain::tree::{Tree, TreeBuilder};
pub use domain::verify::{
    verify_chain_inclusion_proof, verify_chain_inclusion_proof_with, verify_tree_inclusion_proof,
    verify_tree_inclusion_proof_with,
};
pub use ports::outbound::ObjectStore;
pub use shared_digest::{ObjectHasher, ObjectId, Sha256Hasher, DEFAULT_ID_WIDTH_BYTES};
