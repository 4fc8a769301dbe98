//! # Proof Verification
//!
//! Stateless verifiers that replay a structure traversal over a store
//! populated only from the proof. Traversal is hash-pinned at every step,
//! so a proof convinces exactly when the replay re-derives the claimed
//! result from the trusted head or root identifier.
//!
//! Verification never propagates errors: malformed or truncated proofs
//! are logged as warnings and rejected, so adversarial inputs terminate
//! cleanly.

use shared_digest::ObjectId;

use crate::domain::chain::Chain;
use crate::domain::codec::{BincodeCodec, Codec};
use crate::domain::entities::{ChainBlock, ChainProof, StoredObject, TreeProof};
use crate::domain::tree::Tree;
use crate::ports::outbound::ObjectStore;

/// Verify a chain inclusion proof with the default codec.
///
/// `store` must start empty; it is populated from the proof and a fresh
/// chain pinned at `head` re-resolves the block by its index.
pub fn verify_chain_inclusion_proof<S: ObjectStore>(
    store: S,
    head: &ObjectId,
    block: &ChainBlock,
    proof: &ChainProof,
) -> bool {
    verify_chain_inclusion_proof_with(store, BincodeCodec, head, block, proof)
}

/// Verify a chain inclusion proof under a custom codec.
pub fn verify_chain_inclusion_proof_with<S: ObjectStore, C: Codec>(
    mut store: S,
    codec: C,
    head: &ObjectId,
    block: &ChainBlock,
    proof: &ChainProof,
) -> bool {
    for proof_block in &proof.blocks {
        let bytes = match codec.encode(&StoredObject::ChainBlock(proof_block.clone())) {
            Ok(bytes) => bytes,
            Err(error) => {
                tracing::warn!(%error, "chain proof block could not be encoded");
                return false;
            }
        };
        if let Err(error) = store.put(&bytes) {
            tracing::warn!(%error, "chain proof block could not be staged");
            return false;
        }
    }
    let mut chain = Chain::with_codec(store, Some(head.clone()), codec);
    match chain.get_block_by_index(block.index) {
        Ok(Some(found)) => found == *block,
        Ok(None) => {
            tracing::warn!(index = block.index, "chain proof does not reach the block");
            false
        }
        Err(error) => {
            tracing::warn!(%error, "chain proof traversal failed");
            false
        }
    }
}

/// Verify a tree inclusion proof with the default codec.
///
/// `store` must start empty; it is populated from the proof path plus the
/// claimed value bytes, and a fresh tree pinned at `root` re-resolves the
/// lookup.
pub fn verify_tree_inclusion_proof<S: ObjectStore>(
    store: S,
    root: &ObjectId,
    lookup_key: &[u8],
    value: &[u8],
    proof: &TreeProof,
) -> bool {
    verify_tree_inclusion_proof_with(store, BincodeCodec, root, lookup_key, value, proof)
}

/// Verify a tree inclusion proof under a custom codec.
pub fn verify_tree_inclusion_proof_with<S: ObjectStore, C: Codec>(
    mut store: S,
    codec: C,
    root: &ObjectId,
    lookup_key: &[u8],
    value: &[u8],
    proof: &TreeProof,
) -> bool {
    let mut objects: Vec<StoredObject> = proof
        .nodes
        .iter()
        .map(|node| StoredObject::TreeNode(node.clone()))
        .collect();
    objects.push(StoredObject::TreeLeaf(proof.leaf.clone()));
    objects.push(StoredObject::Other(value.to_vec()));

    for object in &objects {
        let bytes = match codec.encode(object) {
            Ok(bytes) => bytes,
            Err(error) => {
                tracing::warn!(%error, "tree proof object could not be encoded");
                return false;
            }
        };
        if let Err(error) = store.put(&bytes) {
            tracing::warn!(%error, "tree proof object could not be staged");
            return false;
        }
    }
    let mut tree = Tree::with_codec(store, root.clone(), codec);
    match tree.get(lookup_key) {
        Ok(Some(found)) => found == value,
        Ok(None) => false,
        Err(error) => {
            tracing::warn!(%error, "tree proof traversal failed");
            false
        }
    }
}
