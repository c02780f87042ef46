//! Stake-weighted validator election.
//!
//! Every node must elect the same validator for the same parent block, so the
//! draw is a pure function of `(seed, snapshot)`:
//!
//! 1. Seed a ChaCha20 generator with `SHA-256(seed)`.
//! 2. Draw one `target` uniformly from `[0, total_stake)`.
//! 3. Walk candidates in ascending address order, accumulating stake.
//! 4. The first candidate whose cumulative stake exceeds `target` wins.
//!
//! With integer stakes, "cumulative stake > target" over `[0, total)` picks
//! each candidate with probability `stake / total`, the same distribution as
//! the continuous "cumulative ≥ target" formulation.

use {
    crate::{
        address::Address,
        error::ElectionError,
        hash::{self, Hash},
        stake_snapshot::StakeSnapshot,
    },
    rand::{Rng, SeedableRng},
    rand_chacha::ChaCha20Rng,
};

/// Elect the validator for the block whose `previous_hash` is `seed`.
pub fn elect(seed: &Hash, snapshot: &StakeSnapshot) -> Result<Address, ElectionError> {
    let total_stake = snapshot.total_stake();
    if total_stake == 0 {
        return Err(ElectionError::Undefined);
    }

    let mut rng = ChaCha20Rng::from_seed(hash::hash(seed.as_ref()).to_bytes());
    let target = rng.random_range(0..total_stake);

    let mut accumulated: u64 = 0;
    for entry in snapshot.iter() {
        accumulated = accumulated.saturating_add(entry.stake);
        if accumulated > target {
            return Ok(entry.address);
        }
    }

    // Unreachable while total_stake equals the saturating sum of the entries.
    Err(ElectionError::Undefined)
}

/// Check whether `identity` is elected for `seed`.
pub fn is_elected(seed: &Hash, snapshot: &StakeSnapshot, identity: &Address) -> bool {
    elect(seed, snapshot)
        .map(|elected| elected == *identity)
        .unwrap_or(false)
}
