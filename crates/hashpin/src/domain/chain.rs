//! # Skipchain
//!
//! Append-only hash chain with skip-list back-pointers. A block at index
//! `n` carries fingers to the indices `n - 1 - ((n - 1) mod 2^f)` for
//! `f = 0, 1, 2, ...`, so any earlier index is reachable in
//! `O(log(n - i))` hops and every hop is pinned by a content hash.
//!
//! `Chain` is the read view; `BlockBuilder` appends. Read accesses cache
//! decoded blocks; a cached entry was integrity-checked when first read
//! and is trusted afterwards.

use std::collections::{BTreeSet, HashMap};

use shared_digest::ObjectId;

use crate::domain::codec::{BincodeCodec, Codec};
use crate::domain::entities::{ChainBlock, ChainProof, StoredObject};
use crate::domain::errors::HashpinError;
use crate::ports::outbound::ObjectStore;

/// Finger indices for a block at `index`.
///
/// For every target `i < index` the set contains at least one element
/// `>= i`, which is what makes descent by closest finger total.
pub fn skipchain_indices(index: u64) -> BTreeSet<u64> {
    if index == 0 {
        return BTreeSet::new();
    }
    let prev = index - 1;
    (0..u64::BITS)
        .map(|f| prev - (prev % (1u64 << f)))
        .collect()
}

/// Read view over a committed chain.
///
/// `head == None` denotes the empty chain.
pub struct Chain<S: ObjectStore, C: Codec = BincodeCodec> {
    store: S,
    codec: C,
    head: Option<ObjectId>,
    cache: HashMap<ObjectId, ChainBlock>,
}

impl<S: ObjectStore> Chain<S, BincodeCodec> {
    /// Chain view with the default codec.
    pub fn new(store: S, head: Option<ObjectId>) -> Self {
        Self::with_codec(store, head, BincodeCodec)
    }
}

impl<S: ObjectStore, C: Codec> Chain<S, C> {
    /// Chain view over a custom codec.
    pub fn with_codec(store: S, head: Option<ObjectId>, codec: C) -> Self {
        Self {
            store,
            codec,
            head,
            cache: HashMap::new(),
        }
    }

    /// Identifier of the latest block, `None` for an empty chain.
    pub fn head(&self) -> Option<&ObjectId> {
        self.head.as_ref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// The latest block itself.
    pub fn head_block(&mut self) -> Result<Option<ChainBlock>, HashpinError> {
        match self.head.clone() {
            Some(id) => self.get_block_by_id(&id),
            None => Ok(None),
        }
    }

    /// Fetch and decode a block by identifier.
    ///
    /// Store reads are integrity-verified and cached; cache hits are
    /// trusted without re-verification.
    pub fn get_block_by_id(&mut self, id: &ObjectId) -> Result<Option<ChainBlock>, HashpinError> {
        if let Some(block) = self.cache.get(id) {
            return Ok(Some(block.clone()));
        }
        let bytes = match self.store.get(id)? {
            Some(bytes) => bytes,
            None => return Ok(None),
        };
        let block = match self.codec.decode(&bytes)? {
            StoredObject::ChainBlock(block) => block,
            _ => {
                return Err(HashpinError::TypeMismatch {
                    id: id.clone(),
                    expected: "chain block",
                })
            }
        };
        self.cache.insert(id.clone(), block.clone());
        Ok(Some(block))
    }

    /// Resolve a block by its index, descending from the head.
    ///
    /// Every hop follows the closest finger that does not overshoot the
    /// target, reaching index `i` from index `n` within
    /// `O(log(n - i))` steps. Returns `Ok(None)` on an empty chain and
    /// when a referenced block is absent from the store (an incomplete
    /// store, e.g. one replaying a truncated proof).
    pub fn get_block_by_index(&mut self, index: u64) -> Result<Option<ChainBlock>, HashpinError> {
        self.descend(index, None)
    }

    /// Same traversal, additionally returning every block visited (head
    /// first, target last) as an inclusion proof.
    pub fn get_block_by_index_with_proof(
        &mut self,
        index: u64,
    ) -> Result<Option<(ChainBlock, ChainProof)>, HashpinError> {
        let mut visited = Vec::new();
        match self.descend(index, Some(&mut visited))? {
            Some(block) => Ok(Some((block, ChainProof { blocks: visited }))),
            None => Ok(None),
        }
    }

    /// Strict indexing: unlike `get_block_by_index` this fails with
    /// `OutOfRange` on an empty chain and `Malformed` when the store
    /// cannot resolve an intermediate block.
    pub fn block_at(&mut self, index: u64) -> Result<ChainBlock, HashpinError> {
        if self.head.is_none() {
            return Err(HashpinError::OutOfRange { index, len: 0 });
        }
        self.get_block_by_index(index)?
            .ok_or_else(|| HashpinError::Malformed {
                reason: format!("block {index} could not be resolved from the store"),
            })
    }

    /// Iterate blocks latest-first, ending at genesis.
    pub fn iter(&mut self) -> Blocks<'_, S, C> {
        Blocks {
            chain: self,
            state: IterState::Unprimed,
        }
    }

    fn descend(
        &mut self,
        index: u64,
        mut visited: Option<&mut Vec<ChainBlock>>,
    ) -> Result<Option<ChainBlock>, HashpinError> {
        let head_id = match self.head.clone() {
            Some(id) => id,
            None => return Ok(None),
        };
        let mut current = match self.get_block_by_id(&head_id)? {
            Some(block) => block,
            None => return Ok(None),
        };
        if index > current.index {
            return Err(HashpinError::OutOfRange {
                index,
                len: current.index + 1,
            });
        }
        loop {
            if let Some(trail) = visited.as_deref_mut() {
                trail.push(current.clone());
            }
            if current.index == index {
                return Ok(Some(current));
            }
            let (_, next_id) = current
                .finger_towards(index)
                .cloned()
                .ok_or_else(|| HashpinError::Malformed {
                    reason: format!(
                        "block {} has no finger at or above index {}",
                        current.index, index
                    ),
                })?;
            current = match self.get_block_by_id(&next_id)? {
                Some(block) => block,
                None => return Ok(None),
            };
        }
    }

    /// Append an already-built block: encode, store, advance the head.
    fn append(&mut self, block: ChainBlock) -> Result<ChainBlock, HashpinError> {
        let bytes = self.codec.encode(&StoredObject::ChainBlock(block.clone()))?;
        let id = self.store.put(&bytes)?;
        tracing::debug!(index = block.index, id = %id, "chain block committed");
        self.cache.insert(id.clone(), block.clone());
        self.head = Some(id);
        Ok(block)
    }
}

/// Latest-first block iterator. Yields `Err` once and stops if the walk
/// fails mid-way.
pub struct Blocks<'a, S: ObjectStore, C: Codec> {
    chain: &'a mut Chain<S, C>,
    state: IterState,
}

enum IterState {
    Unprimed,
    At(u64),
    Done,
}

impl<S: ObjectStore, C: Codec> Iterator for Blocks<'_, S, C> {
    type Item = Result<ChainBlock, HashpinError>;

    fn next(&mut self) -> Option<Self::Item> {
        let index = match self.state {
            IterState::Unprimed => match self.chain.head_block() {
                Ok(Some(head)) => {
                    self.state = match head.index.checked_sub(1) {
                        Some(next) => IterState::At(next),
                        None => IterState::Done,
                    };
                    return Some(Ok(head));
                }
                Ok(None) => {
                    self.state = IterState::Done;
                    return None;
                }
                Err(error) => {
                    self.state = IterState::Done;
                    return Some(Err(error));
                }
            },
            IterState::At(index) => index,
            IterState::Done => return None,
        };
        match self.chain.get_block_by_index(index) {
            Ok(Some(block)) => {
                self.state = match index.checked_sub(1) {
                    Some(next) => IterState::At(next),
                    None => IterState::Done,
                };
                Some(Ok(block))
            }
            Ok(None) => {
                self.state = IterState::Done;
                Some(Err(HashpinError::Malformed {
                    reason: format!("block {index} could not be resolved from the store"),
                }))
            }
            Err(error) => {
                self.state = IterState::Done;
                Some(Err(error))
            }
        }
    }
}

/// Builder appending blocks to a chain.
///
/// The payload is assigned directly; index and fingers are computed from
/// the chain head at commit time. An installed `pre_commit` hook observes
/// the final index and fingers and may rewrite the payload (e.g. to embed
/// a signature over them) just before encoding.
pub struct BlockBuilder<'a, S: ObjectStore, C: Codec = BincodeCodec> {
    chain: &'a mut Chain<S, C>,
    pub payload: Option<Vec<u8>>,
    pre_commit: Option<Box<dyn FnMut(&mut ChainBlock) + 'a>>,
}

impl<'a, S: ObjectStore, C: Codec> BlockBuilder<'a, S, C> {
    pub fn new(chain: &'a mut Chain<S, C>) -> Self {
        Self {
            chain,
            payload: None,
            pre_commit: None,
        }
    }

    /// Install the pre-commit hook. The hook must leave `index` and
    /// `fingers` untouched; it exists to finalize the payload.
    pub fn set_pre_commit(&mut self, hook: impl FnMut(&mut ChainBlock) + 'a) {
        self.pre_commit = Some(Box::new(hook));
    }

    /// The chain this builder appends to.
    pub fn chain(&self) -> &Chain<S, C> {
        self.chain
    }

    /// Index the next committed block will carry.
    pub fn next_index(&mut self) -> Result<u64, HashpinError> {
        Ok(self.skeleton()?.0)
    }

    /// Fingers the next committed block will carry.
    pub fn next_fingers(&mut self) -> Result<Vec<(u64, ObjectId)>, HashpinError> {
        Ok(self.skeleton()?.1)
    }

    /// Build, hook, encode and store the next block, advancing the chain
    /// head. The builder then starts over with an empty payload for the
    /// successor block.
    pub fn commit(&mut self) -> Result<ChainBlock, HashpinError> {
        let (index, fingers) = self.skeleton()?;
        let mut block = ChainBlock {
            index,
            fingers,
            payload: self.payload.take(),
        };
        if let Some(hook) = self.pre_commit.as_mut() {
            hook(&mut block);
        }
        self.chain.append(block)
    }

    /// Index and fingers of the successor block: the immediate
    /// predecessor first, then the predecessor's fingers restricted to the
    /// skipchain index set of the new index, order preserved.
    fn skeleton(&mut self) -> Result<(u64, Vec<(u64, ObjectId)>), HashpinError> {
        let prev_id = match self.chain.head().cloned() {
            Some(id) => id,
            None => return Ok((0, Vec::new())),
        };
        let prev = self
            .chain
            .get_block_by_id(&prev_id)?
            .ok_or_else(|| HashpinError::Malformed {
                reason: "chain head does not resolve to a block".into(),
            })?;
        let index = prev.index + 1;
        let keep = skipchain_indices(index);
        let mut fingers = vec![(prev.index, prev_id)];
        fingers.extend(
            prev.fingers
                .iter()
                .filter(|(prev_index, _)| keep.contains(prev_index))
                .cloned(),
        );
        Ok((index, fingers))
    }
}
