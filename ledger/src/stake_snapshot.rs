//! Stake snapshot used by the validator election.
//!
//! A snapshot is an ordered map from address to stake. Iteration is always in
//! byte order of the address, independent of how the snapshot was built, so
//! every node walks the same sequence during the election.

use {
    crate::{address::Address, amount::Amount},
    std::collections::BTreeMap,
};

/// A single staked address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StakeEntry {
    pub address: Address,
    pub stake: Amount,
}

/// Ordered, weighted set of election candidates.
///
/// Zero stakes are dropped on insertion; they could never be drawn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StakeSnapshot {
    stakes: BTreeMap<Address, Amount>,
    total_stake: Amount,
}

impl StakeSnapshot {
    pub fn new(stakes: impl IntoIterator<Item = (Address, Amount)>) -> Self {
        let mut snapshot = Self::default();
        for (address, stake) in stakes {
            snapshot.upsert(address, stake);
        }
        snapshot
    }

    pub fn len(&self) -> usize {
        self.stakes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stakes.is_empty()
    }

    /// Sum of all stakes, saturating at `Amount::MAX`.
    pub fn total_stake(&self) -> Amount {
        self.total_stake
    }

    pub fn get(&self, address: &Address) -> Option<StakeEntry> {
        self.stakes.get(address).map(|&stake| StakeEntry {
            address: *address,
            stake,
        })
    }

    /// Returns the stake of `address`, or 0 if it is not a candidate.
    pub fn stake_of(&self, address: &Address) -> Amount {
        self.stakes.get(address).copied().unwrap_or(0)
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.stakes.contains_key(address)
    }

    /// Entries in ascending address order.
    pub fn iter(&self) -> impl Iterator<Item = StakeEntry> + '_ {
        self.stakes
            .iter()
            .map(|(&address, &stake)| StakeEntry { address, stake })
    }

    pub fn addresses(&self) -> Vec<Address> {
        self.stakes.keys().copied().collect()
    }

    /// Add or replace a stake. A zero stake removes the address.
    pub fn upsert(&mut self, address: Address, stake: Amount) {
        if stake == 0 {
            self.stakes.remove(&address);
        } else {
            self.stakes.insert(address, stake);
        }
        self.total_stake = self
            .stakes
            .values()
            .fold(0, |acc: Amount, stake| acc.saturating_add(*stake));
    }

    pub fn remove(&mut self, address: &Address) {
        self.upsert(*address, 0);
    }
}

impl FromIterator<(Address, Amount)> for StakeSnapshot {
    fn from_iter<T: IntoIterator<Item = (Address, Amount)>>(iter: T) -> Self {
        Self::new(iter)
    }
}
