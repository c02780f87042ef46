//! Property-based tests for chain integrity and fork choice.
//!
//! Properties tested:
//! 1. Changing any hashed block field changes the block hash.
//! 2. A tampered block anywhere in a chain makes the chain invalid.
//! 3. Chain adoption never shortens the local chain.

#[cfg(test)]
mod tests {
    use {
        crate::fixtures::{bootstrapped, config, extend, wallet},
        blockchat_ledger::{
            hash::hash, wire::blocks_from_wire, Block, BlockWire, ChainError, Hash, Ledger,
        },
        proptest::prelude::*,
    };

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 1. Hash covers index, timestamp, parent and validator
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn block_hash_sensitive_to_header(
            index in 0..1_000u64,
            timestamp in 0..u64::MAX / 2,
            parent_seed in any::<[u8; 8]>(),
            field in 0..4u8,
        ) {
            let validator = wallet(1).address();
            let parent = hash(&parent_seed);
            let original = Block::new(index, vec![], validator, parent, 3, Some(timestamp)).unwrap();

            let mutated = match field {
                0 => Block::new(index + 1, vec![], validator, parent, 3, Some(timestamp)),
                1 => Block::new(index, vec![], validator, parent, 3, Some(timestamp + 1)),
                2 => Block::new(index, vec![], validator, hash(parent.as_ref()), 3, Some(timestamp)),
                _ => Block::new(index, vec![], wallet(2).address(), parent, 3, Some(timestamp)),
            }
            .unwrap();

            prop_assert_ne!(original.current_hash(), mutated.current_hash());
            prop_assert!(mutated.has_valid_hash());
        }
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 2. Tampering is detected at the tampered height
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn tampered_chain_rejected(
            length in 2..6usize,
            victim_seed in any::<usize>(),
            bump in 1..1_000u64,
        ) {
            let boot = wallet(1);
            let mut source = bootstrapped(config(1), &boot);
            extend(&mut source, &boot, length - 1);
            prop_assert_eq!(source.chain().len(), length);

            let victim = 1 + victim_seed % (length - 1);
            let mut chain: Vec<BlockWire> = source.chain().iter().map(BlockWire::from).collect();
            chain[victim].transactions[0].amount += bump;
            let blocks = blocks_from_wire(chain).unwrap();

            let mut target = Ledger::new(config(1)).unwrap();
            let result = target.try_adopt_chain(blocks);
            let rejected_at_victim = matches!(
                result,
                Err(ChainError::ChainInvalid { height, .. }) if height == victim
            );
            prop_assert!(rejected_at_victim, "expected rejection at {}, got {:?}", victim, result);
            prop_assert!(target.chain().is_empty());
        }
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 3. Fork choice is monotone in chain length
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn adoption_never_shortens(
            local_len in 1..5usize,
            offered_len in 1..5usize,
        ) {
            let boot = wallet(1);
            let mut longest = bootstrapped(config(1), &boot);
            extend(&mut longest, &boot, local_len.max(offered_len) - 1);

            let mut local = Ledger::new(config(1)).unwrap();
            prop_assert!(local.adopt_chain(longest.chain()[..local_len].to_vec()));
            let tip_before: Hash = *local.tip().unwrap().current_hash();

            let adopted = local.adopt_chain(longest.chain()[..offered_len].to_vec());
            prop_assert_eq!(adopted, offered_len > local_len);
            prop_assert_eq!(local.chain().len(), local_len.max(offered_len));
            if !adopted {
                prop_assert_eq!(local.tip().unwrap().current_hash(), &tip_before);
            }
        }
    }
}
