//! # Chain Integration Flows
//!
//! End-to-end skipchain scenarios: committing through the builder, index
//! lookups with the logarithmic hop bound, and proof verification against
//! a verifier that starts from an empty store.

#[cfg(test)]
mod tests {
    use hashpin::{
        skipchain_indices, verify_chain_inclusion_proof, BincodeCodec, BlockBuilder, Chain,
        ChainProof, Codec, HashpinError, MemoryStore, ObjectId, ObjectStore, StoredObject,
    };
    use rand::{rngs::StdRng, Rng, SeedableRng};

    /// Commit `count` blocks with payloads `"Block {i}"`.
    fn committed_chain(count: u64) -> Chain<MemoryStore> {
        let mut chain = Chain::new(MemoryStore::new(), None);
        {
            let mut builder = BlockBuilder::new(&mut chain);
            for i in 0..count {
                builder.payload = Some(format!("Block {i}").into_bytes());
                builder.commit().unwrap();
            }
        }
        chain
    }

    /// Blocks a descent is expected to visit, derived from the skipchain
    /// index sets alone: every hop takes the closest finger that does not
    /// overshoot the target.
    fn predicted_hops(from: u64, to: u64) -> usize {
        let mut visited = 1;
        let mut current = from;
        while current != to {
            current = skipchain_indices(current)
                .into_iter()
                .filter(|f| *f >= to)
                .min()
                .unwrap();
            visited += 1;
        }
        visited
    }

    #[test]
    fn test_forty_two_block_chain_lookup() {
        let mut chain = committed_chain(42);
        let (block, proof) = chain.get_block_by_index_with_proof(17).unwrap().unwrap();

        assert_eq!(block.payload, Some(b"Block 17".to_vec()));
        assert_eq!(proof.blocks.len(), predicted_hops(41, 17));
        // floor(log2 41) + 1
        assert!(proof.blocks.len() <= 6);
    }

    #[test]
    fn test_every_proof_verifies_from_empty_store() {
        let mut chain = committed_chain(42);
        let head = chain.head().cloned().unwrap();
        for index in 0..42 {
            let (block, proof) = chain.get_block_by_index_with_proof(index).unwrap().unwrap();
            assert!(verify_chain_inclusion_proof(
                MemoryStore::new(),
                &head,
                &block,
                &proof
            ));
        }
    }

    #[test]
    fn test_proof_survives_transport_over_evidence_store() {
        // Rebuild a chain view from nothing but the proof blocks, the way
        // a remote verifier would.
        let mut chain = committed_chain(10);
        let head = chain.head().cloned().unwrap();
        let (block, proof) = chain.get_block_by_index_with_proof(2).unwrap().unwrap();

        let codec = BincodeCodec;
        let mut evidence_store = MemoryStore::new();
        for proof_block in &proof.blocks {
            let bytes = codec
                .encode(&StoredObject::ChainBlock(proof_block.clone()))
                .unwrap();
            evidence_store.put(&bytes).unwrap();
        }

        let mut replayed = Chain::new(evidence_store, Some(head));
        let found = replayed.get_block_by_index(2).unwrap().unwrap();
        assert_eq!(found, block);
    }

    #[test]
    fn test_random_payloads_round_trip() {
        let mut rng = StdRng::seed_from_u64(7);
        let payloads: Vec<Vec<u8>> = (0..30)
            .map(|_| (0..rng.gen_range(0..64)).map(|_| rng.gen()).collect())
            .collect();

        let mut chain = Chain::new(MemoryStore::new(), None);
        {
            let mut builder = BlockBuilder::new(&mut chain);
            for payload in &payloads {
                builder.payload = Some(payload.clone());
                builder.commit().unwrap();
            }
        }

        for (i, payload) in payloads.iter().enumerate() {
            let block = chain.get_block_by_index(i as u64).unwrap().unwrap();
            assert_eq!(block.payload.as_ref(), Some(payload));
        }
    }

    #[test]
    fn test_descent_is_sublinear_everywhere() {
        let mut chain = committed_chain(64);
        for target in 0..64u64 {
            let (_, proof) = chain.get_block_by_index_with_proof(target).unwrap().unwrap();
            let distance = 63 - target;
            let bound = match distance {
                0 => 1,
                d => (64 - d.leading_zeros()) as usize + 1,
            };
            assert!(
                proof.blocks.len() <= bound,
                "reaching {} took {} hops, bound {}",
                target,
                proof.blocks.len(),
                bound
            );
        }
    }

    #[test]
    fn test_forged_proof_is_rejected() {
        let mut chain = committed_chain(8);
        let head = chain.head().cloned().unwrap();
        let (block, proof) = chain.get_block_by_index_with_proof(3).unwrap().unwrap();

        // Swap the target for a block claiming a different payload.
        let mut forged_block = block.clone();
        forged_block.payload = Some(b"Hacked!".to_vec());
        assert!(!verify_chain_inclusion_proof(
            MemoryStore::new(),
            &head,
            &forged_block,
            &proof
        ));

        // Drop an intermediate block from the evidence.
        let truncated = ChainProof {
            blocks: proof.blocks[1..].to_vec(),
        };
        assert!(!verify_chain_inclusion_proof(
            MemoryStore::new(),
            &head,
            &block,
            &truncated
        ));

        // Pin the proof to an unrelated head.
        assert!(!verify_chain_inclusion_proof(
            MemoryStore::new(),
            &ObjectId::from_hex("ffffffffffffffff"),
            &block,
            &proof
        ));
    }

    #[test]
    fn test_strict_indexing_errors() {
        let mut empty = Chain::new(MemoryStore::new(), None);
        assert!(matches!(
            empty.block_at(0),
            Err(HashpinError::OutOfRange { .. })
        ));

        let mut chain = committed_chain(3);
        assert!(matches!(
            chain.get_block_by_index(3),
            Err(HashpinError::OutOfRange { index: 3, len: 3 })
        ));
    }
}
