//! # Merkle Search Tree
//!
//! Immutable, balanced, byte-ordered key-value tree. Inner nodes route
//! lookups with the shortest prefix that separates the left subtree's
//! largest key from the right subtree's smallest, which keeps proofs
//! compact.
//!
//! `TreeBuilder` collects items and seals them in a single `commit`;
//! `Tree` is the read view over the resulting root.

use std::collections::{BTreeMap, HashMap};

use shared_digest::ObjectId;

use crate::domain::codec::{BincodeCodec, Codec};
use crate::domain::entities::{StoredObject, TreeLeaf, TreeNode, TreeProof};
use crate::domain::errors::HashpinError;
use crate::ports::outbound::ObjectStore;

/// Read view over a committed tree.
pub struct Tree<S: ObjectStore, C: Codec = BincodeCodec> {
    store: S,
    codec: C,
    root: ObjectId,
    cache: HashMap<ObjectId, StoredObject>,
}

impl<S: ObjectStore> Tree<S, BincodeCodec> {
    /// Tree view with the default codec.
    pub fn new(store: S, root: ObjectId) -> Self {
        Self::with_codec(store, root, BincodeCodec)
    }
}

impl<S: ObjectStore, C: Codec> Tree<S, C> {
    /// Tree view over a custom codec.
    pub fn with_codec(store: S, root: ObjectId, codec: C) -> Self {
        Self {
            store,
            codec,
            root,
            cache: HashMap::new(),
        }
    }

    /// Identifier of the root node.
    pub fn root(&self) -> &ObjectId {
        &self.root
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// The root node itself: an inner node, or the single leaf of a
    /// one-item tree.
    pub fn root_node(&mut self) -> Result<StoredObject, HashpinError> {
        let root = self.root.clone();
        self.get_node_by_id(&root)?
            .ok_or_else(|| HashpinError::Malformed {
                reason: format!("tree root {root} could not be resolved from the store"),
            })
    }

    /// Fetch and decode a node or leaf by identifier.
    ///
    /// Identifiers naming chain blocks or opaque payloads fail with
    /// `TypeMismatch`. Store reads are integrity-verified and cached;
    /// cache hits are trusted without re-verification.
    pub fn get_node_by_id(
        &mut self,
        id: &ObjectId,
    ) -> Result<Option<StoredObject>, HashpinError> {
        if let Some(entry) = self.cache.get(id) {
            return Ok(Some(entry.clone()));
        }
        let bytes = match self.store.get(id)? {
            Some(bytes) => bytes,
            None => return Ok(None),
        };
        let entry = match self.codec.decode(&bytes)? {
            entry @ (StoredObject::TreeNode(_) | StoredObject::TreeLeaf(_)) => entry,
            _ => {
                return Err(HashpinError::TypeMismatch {
                    id: id.clone(),
                    expected: "tree node",
                })
            }
        };
        self.cache.insert(id.clone(), entry.clone());
        Ok(Some(entry))
    }

    /// Value committed under `lookup_key`, or `None` when the terminal
    /// leaf carries a different key (a non-inclusion witness).
    pub fn get(&mut self, lookup_key: &[u8]) -> Result<Option<Vec<u8>>, HashpinError> {
        let (_, leaf) = self.walk(lookup_key)?;
        self.leaf_value(&leaf, lookup_key)
    }

    /// Membership query.
    pub fn contains(&mut self, lookup_key: &[u8]) -> Result<bool, HashpinError> {
        Ok(self.get(lookup_key)?.is_some())
    }

    /// Strict lookup failing with `KeyNotFound` for absent keys.
    pub fn value(&mut self, lookup_key: &[u8]) -> Result<Vec<u8>, HashpinError> {
        self.get(lookup_key)?
            .ok_or_else(|| HashpinError::KeyNotFound {
                key: String::from_utf8_lossy(lookup_key).into_owned(),
            })
    }

    /// Lookup returning the root-first path as a proof. The proof is
    /// produced for absent keys too, witnessing non-inclusion.
    pub fn get_with_proof(
        &mut self,
        lookup_key: &[u8],
    ) -> Result<(Option<Vec<u8>>, TreeProof), HashpinError> {
        let (nodes, leaf) = self.walk(lookup_key)?;
        let value = self.leaf_value(&leaf, lookup_key)?;
        Ok((value, TreeProof { nodes, leaf }))
    }

    /// Descend from the root: left when `lookup_key < pivot_prefix`
    /// (byte-wise), right otherwise, until a leaf terminates the path.
    fn walk(&mut self, lookup_key: &[u8]) -> Result<(Vec<TreeNode>, TreeLeaf), HashpinError> {
        let mut path = Vec::new();
        let mut current_id = self.root.clone();
        loop {
            let entry =
                self.get_node_by_id(&current_id)?
                    .ok_or_else(|| HashpinError::Malformed {
                        reason: format!(
                            "node {current_id} could not be resolved from the store"
                        ),
                    })?;
            match entry {
                StoredObject::TreeNode(node) => {
                    let child = if lookup_key < node.pivot_prefix.as_slice() {
                        node.left_hash.clone()
                    } else {
                        node.right_hash.clone()
                    };
                    let next_id = child.ok_or_else(|| HashpinError::Malformed {
                        reason: format!(
                            "inner node {current_id} is missing the child needed for the lookup"
                        ),
                    })?;
                    path.push(node);
                    current_id = next_id;
                }
                StoredObject::TreeLeaf(leaf) => return Ok((path, leaf)),
                _ => {
                    return Err(HashpinError::TypeMismatch {
                        id: current_id,
                        expected: "tree node",
                    })
                }
            }
        }
    }

    /// Resolve the leaf's payload when its key matches the queried one.
    fn leaf_value(
        &mut self,
        leaf: &TreeLeaf,
        lookup_key: &[u8],
    ) -> Result<Option<Vec<u8>>, HashpinError> {
        if leaf.lookup_key != lookup_key {
            return Ok(None);
        }
        let bytes = self
            .store
            .get(&leaf.payload_hash)?
            .ok_or_else(|| HashpinError::Malformed {
                reason: format!(
                    "value payload {} could not be resolved from the store",
                    leaf.payload_hash
                ),
            })?;
        match self.codec.decode(&bytes)? {
            StoredObject::Other(value) => Ok(Some(value)),
            _ => Err(HashpinError::TypeMismatch {
                id: leaf.payload_hash.clone(),
                expected: "opaque payload",
            }),
        }
    }
}

/// Builder collecting key-value items for a single sealed `commit`.
///
/// Items are kept byte-ordered. Assigning to a key again replaces its
/// value, so the committed key set is always de-duplicated.
pub struct TreeBuilder<S: ObjectStore, C: Codec = BincodeCodec> {
    store: S,
    codec: C,
    items: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl<S: ObjectStore> TreeBuilder<S, BincodeCodec> {
    /// Builder with the default codec.
    pub fn new(store: S) -> Self {
        Self::with_codec(store, BincodeCodec)
    }
}

impl<S: ObjectStore, C: Codec> TreeBuilder<S, C> {
    /// Builder over a custom codec.
    pub fn with_codec(store: S, codec: C) -> Self {
        Self {
            store,
            codec,
            items: BTreeMap::new(),
        }
    }

    /// Stage `value` under `key`, replacing any earlier assignment.
    pub fn insert(&mut self, key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) {
        self.items.insert(key.into(), value.into());
    }

    /// Number of staged items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Build the balanced tree over the staged items, write every node and
    /// value payload to the store, and return the read view pinned at the
    /// new root.
    pub fn commit(mut self) -> Result<Tree<S, C>, HashpinError> {
        if self.items.is_empty() {
            return Err(HashpinError::EmptyTree);
        }
        let items: Vec<(Vec<u8>, Vec<u8>)> =
            std::mem::take(&mut self.items).into_iter().collect();
        let nodes = build_subtree(&mut self.store, &self.codec, &items)?;

        let mut ids = Vec::with_capacity(nodes.len());
        for node in &nodes {
            let bytes = self.codec.encode(&node.to_stored())?;
            ids.push(self.store.put(&bytes)?);
        }
        let root = match ids.into_iter().next() {
            Some(id) => id,
            None => return Err(HashpinError::EmptyTree),
        };
        tracing::debug!(root = %root, items = items.len(), "tree committed");
        Ok(Tree::with_codec(self.store, root, self.codec))
    }
}

/// Node produced during construction, before encoding.
enum Built {
    Node(TreeNode),
    Leaf(TreeLeaf),
}

impl Built {
    /// Key an ancestor uses to route towards this subtree.
    fn routing_key(&self) -> &[u8] {
        match self {
            Built::Node(node) => &node.pivot_prefix,
            Built::Leaf(leaf) => &leaf.lookup_key,
        }
    }

    fn to_stored(&self) -> StoredObject {
        match self {
            Built::Node(node) => StoredObject::TreeNode(node.clone()),
            Built::Leaf(leaf) => StoredObject::TreeLeaf(leaf.clone()),
        }
    }
}

/// Recursively build the subtree over sorted `items`, returning its nodes
/// in pre-order: subtree root first, then the left nodes, then the right.
/// Value payloads are written to the store as they are encountered.
fn build_subtree<S: ObjectStore, C: Codec>(
    store: &mut S,
    codec: &C,
    items: &[(Vec<u8>, Vec<u8>)],
) -> Result<Vec<Built>, HashpinError> {
    if items.is_empty() {
        return Err(HashpinError::EmptyTree);
    }
    if items.len() == 1 {
        let (key, value) = &items[0];
        let payload_bytes = codec.encode(&StoredObject::Other(value.clone()))?;
        let payload_hash = store.put(&payload_bytes)?;
        return Ok(vec![Built::Leaf(TreeLeaf {
            lookup_key: key.clone(),
            payload_hash,
        })]);
    }
    // The element at the midpoint goes into the right partition and its
    // key becomes the pivot candidate.
    let mid = items.len() / 2;
    let left = build_subtree(store, codec, &items[..mid])?;
    let right = build_subtree(store, codec, &items[mid..])?;
    let pivot_prefix = pivot_prefix(&items[mid].0, left[0].routing_key(), right[0].routing_key());
    let left_hash = store.hash_bytes(&codec.encode(&left[0].to_stored())?);
    let right_hash = store.hash_bytes(&codec.encode(&right[0].to_stored())?);
    let node = TreeNode {
        pivot_prefix,
        left_hash: Some(left_hash),
        right_hash: Some(right_hash),
    };
    let mut nodes = vec![Built::Node(node)];
    nodes.extend(left);
    nodes.extend(right);
    Ok(nodes)
}

/// Shortest prefix of `pivot_key` that still separates the boundary keys:
/// one byte past their longest common prefix, at least one byte, never
/// past the end of the pivot key.
fn pivot_prefix(pivot_key: &[u8], left_key: &[u8], right_key: &[u8]) -> Vec<u8> {
    let common = pivot_key
        .iter()
        .zip(left_key)
        .zip(right_key)
        .take_while(|((a, b), c)| a == b && b == c)
        .count();
    let cut = (common + 1).min(pivot_key.len());
    pivot_key[..cut].to_vec()
}
