//! # Data Model
//!
//! Pure records stored by the structures, the codec-visible tagged union,
//! and the proof containers. Records carry no behavior beyond field access
//! and small accessors.

use serde::{Deserialize, Serialize};
use shared_digest::ObjectId;

/// One block of a skipchain.
///
/// `fingers` holds back-pointers `(prev_index, prev_id)`, unique in
/// `prev_index` with every `prev_index < index`. The first entry of a
/// committed non-genesis block always points at the immediate predecessor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainBlock {
    pub index: u64,
    pub fingers: Vec<(u64, ObjectId)>,
    pub payload: Option<Vec<u8>>,
}

impl ChainBlock {
    /// The finger that descends furthest towards `target` without
    /// overshooting it: the smallest `prev_index >= target`.
    pub fn finger_towards(&self, target: u64) -> Option<&(u64, ObjectId)> {
        self.fingers
            .iter()
            .filter(|(prev_index, _)| *prev_index >= target)
            .min_by_key(|(prev_index, _)| *prev_index)
    }
}

/// Inner node of a Merkle search tree.
///
/// Every leaf under `left_hash` has `lookup_key < pivot_prefix`; every
/// leaf under `right_hash` has `lookup_key >= pivot_prefix`. Absent
/// children never leave a builder; they only appear in adversarial data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub pivot_prefix: Vec<u8>,
    pub left_hash: Option<ObjectId>,
    pub right_hash: Option<ObjectId>,
}

/// Leaf of a Merkle search tree. The value bytes live in the store under
/// `payload_hash`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeLeaf {
    pub lookup_key: Vec<u8>,
    pub payload_hash: ObjectId,
}

/// Everything the codec can put on a store.
///
/// Declaration order fixes the wire discriminators: chain block 0, tree
/// node 1, tree leaf 2, opaque payload 3.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoredObject {
    ChainBlock(ChainBlock),
    TreeNode(TreeNode),
    TreeLeaf(TreeLeaf),
    Other(Vec<u8>),
}

impl StoredObject {
    /// Human-readable kind name, used in type-mismatch errors.
    pub fn kind_name(&self) -> &'static str {
        match self {
            StoredObject::ChainBlock(_) => "chain block",
            StoredObject::TreeNode(_) => "tree node",
            StoredObject::TreeLeaf(_) => "tree leaf",
            StoredObject::Other(_) => "opaque payload",
        }
    }
}

/// Blocks visited while resolving an index, head first, target last.
/// Replayed against an otherwise empty store they re-derive the target.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainProof {
    pub blocks: Vec<ChainBlock>,
}

/// Root-first lookup path: the inner nodes descended through plus the
/// terminal leaf. Doubles as a non-inclusion witness when the leaf's key
/// differs from the queried one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeProof {
    pub nodes: Vec<TreeNode>,
    pub leaf: TreeLeaf,
}
