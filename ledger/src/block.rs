//! Blocks: a capacity-bounded, hash-linked batch of transactions.
//!
//! The block hash covers `index`, `previous_hash`, `timestamp`, the full
//! canonical transaction objects and `validator`, encoded as a sorted-key JSON
//! object. `capacity` travels with the block but is not hashed.

use {
    crate::{
        address::Address,
        error::BlockError,
        hash::{self, Hash},
        transaction::Transaction,
    },
    serde_json::{json, Value},
    std::time::{SystemTime, UNIX_EPOCH},
};

/// Milliseconds since the Unix epoch.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

/// An immutable block.
///
/// A block built locally always carries its computed hash. A block imported
/// from a peer carries the hash it claims, which stays untrusted until
/// [`Block::has_valid_hash`] confirms it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    index: u64,
    timestamp: u64,
    transactions: Vec<Transaction>,
    validator: Address,
    previous_hash: Hash,
    current_hash: Hash,
    capacity: usize,
}

impl Block {
    /// Assemble a block and compute its hash.
    ///
    /// A transaction list longer than `capacity` is rejected, never truncated.
    pub fn new(
        index: u64,
        transactions: Vec<Transaction>,
        validator: Address,
        previous_hash: Hash,
        capacity: usize,
        timestamp: Option<u64>,
    ) -> Result<Self, BlockError> {
        if transactions.len() > capacity {
            return Err(BlockError::CapacityExceeded {
                count: transactions.len(),
                capacity,
            });
        }
        let timestamp = timestamp.unwrap_or_else(now_millis);
        let current_hash =
            Self::compute_hash(index, timestamp, &transactions, &validator, &previous_hash);
        Ok(Self {
            index,
            timestamp,
            transactions,
            validator,
            previous_hash,
            current_hash,
            capacity,
        })
    }

    /// Rebuild a block exactly as a peer described it, keeping the claimed hash.
    pub(crate) fn from_claimed_parts(
        index: u64,
        timestamp: u64,
        transactions: Vec<Transaction>,
        validator: Address,
        previous_hash: Hash,
        current_hash: Hash,
        capacity: usize,
    ) -> Self {
        Self {
            index,
            timestamp,
            transactions,
            validator,
            previous_hash,
            current_hash,
            capacity,
        }
    }

    pub fn compute_hash(
        index: u64,
        timestamp: u64,
        transactions: &[Transaction],
        validator: &Address,
        previous_hash: &Hash,
    ) -> Hash {
        let transactions: Vec<Value> = transactions
            .iter()
            .map(Transaction::canonical_value)
            .collect();
        let material = json!({
            "index": index,
            "previous_hash": previous_hash.to_string(),
            "timestamp": timestamp,
            "transactions": transactions,
            "validator": validator.to_string(),
        });
        hash::hash(material.to_string().as_bytes())
    }

    /// Hash of the block's current contents, ignoring the stored hash.
    pub fn recompute_hash(&self) -> Hash {
        Self::compute_hash(
            self.index,
            self.timestamp,
            &self.transactions,
            &self.validator,
            &self.previous_hash,
        )
    }

    pub fn has_valid_hash(&self) -> bool {
        self.recompute_hash() == self.current_hash
    }

    pub fn is_genesis(&self) -> bool {
        self.index == 0 && self.previous_hash.is_genesis_parent()
    }

    pub fn contains_transaction(&self, id: &Hash) -> bool {
        self.transactions.iter().any(|tx| tx.id() == id)
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn validator(&self) -> &Address {
        &self.validator
    }

    pub fn previous_hash(&self) -> &Hash {
        &self.previous_hash
    }

    pub fn current_hash(&self) -> &Hash {
        &self.current_hash
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
