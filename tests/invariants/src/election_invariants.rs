//! Property-based tests for the stake-weighted validator election.
//!
//! Properties tested:
//! 1. The same seed and stakes always elect the same validator.
//! 2. The winner always holds a positive stake.
//! 3. Candidate insertion order does not matter.

#[cfg(test)]
mod tests {
    use {
        blockchat_ledger::{elect, hash::hash, Address, ElectionError, StakeSnapshot},
        proptest::prelude::*,
    };

    fn candidates(stakes: &[u64]) -> Vec<(Address, u64)> {
        stakes
            .iter()
            .enumerate()
            .map(|(i, stake)| {
                let mut bytes = [0u8; 32];
                bytes[0] = i as u8;
                bytes[31] = 0xCC;
                (Address::new_from_array(bytes), *stake)
            })
            .collect()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        #[test]
        fn election_is_deterministic_and_stake_backed(
            stakes in prop::collection::vec(0..10_000u64, 1..12),
            seed in any::<[u8; 16]>(),
        ) {
            let seed = hash(&seed);
            let list = candidates(&stakes);
            let snapshot = StakeSnapshot::new(list.clone());

            match elect(&seed, &snapshot) {
                Ok(winner) => {
                    // ── INVARIANT: determinism ──
                    prop_assert_eq!(elect(&seed, &snapshot), Ok(winner));
                    // ── INVARIANT: the winner has stake ──
                    prop_assert!(snapshot.stake_of(&winner) > 0);
                    // ── INVARIANT: order independence ──
                    let reversed = StakeSnapshot::new(list.into_iter().rev());
                    prop_assert_eq!(elect(&seed, &reversed), Ok(winner));
                }
                Err(e) => {
                    prop_assert_eq!(e, ElectionError::Undefined);
                    prop_assert!(stakes.iter().all(|s| *s == 0));
                }
            }
        }

        #[test]
        fn sole_staker_always_wins(
            position in 0..8usize,
            stake in 1..10_000u64,
            seed in any::<[u8; 16]>(),
        ) {
            let mut stakes = vec![0u64; 8];
            stakes[position] = stake;
            let list = candidates(&stakes);
            let snapshot = StakeSnapshot::new(list.clone());
            prop_assert_eq!(elect(&hash(&seed), &snapshot), Ok(list[position].0));
        }
    }
}
