//! The ledger state machine: one chain, one pool.
//!
//! The ledger is a plain owned value with no interior locking. Callers that
//! share it across threads wrap it in [`crate::service::LedgerService`],
//! which serializes the four mutating operations (admission, mint, append,
//! adoption).
//!
//! Every mutation follows "check then commit": validation runs against
//! borrowed state and nothing is written until it has passed, so a rejected
//! transaction, block or chain leaves the ledger untouched.

use {
    crate::{
        account_state::AccountState,
        address::Address,
        amount::Amount,
        block::Block,
        config::{ConfigError, LedgerConfig},
        election,
        error::{BlockError, ChainError, MintError, TxError},
        hash::Hash,
        stake_snapshot::StakeSnapshot,
        transaction::{Transaction, TransactionKind},
    },
    log::*,
};

/// Outcome of delivering a transaction or block that passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Newly added.
    Admitted,
    /// Already present; nothing changed.
    AlreadyKnown,
}

/// The last block's author and contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastBlockView {
    pub index: u64,
    pub validator: Address,
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Clone)]
pub struct Ledger {
    config: LedgerConfig,
    chain: Vec<Block>,
    pool: Vec<Transaction>,
}

impl Ledger {
    /// An empty ledger. The first appended block must be a genesis block.
    pub fn new(config: LedgerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            chain: Vec::new(),
            pool: Vec::new(),
        })
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    pub fn chain(&self) -> &[Block] {
        &self.chain
    }

    pub fn pool(&self) -> &[Transaction] {
        &self.pool
    }

    pub fn tip(&self) -> Option<&Block> {
        self.chain.last()
    }

    /// Replay view over chain and pool.
    pub fn state(&self) -> AccountState<'_> {
        AccountState::new(&self.chain, &self.pool, self.config.default_stake)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn balance_of(&self, address: &Address) -> Amount {
        self.state().balance(address)
    }

    pub fn stake_of(&self, address: &Address) -> Amount {
        self.state().stake(address)
    }

    pub fn next_nonce(&self, address: &Address) -> u64 {
        self.state().next_nonce(address)
    }

    pub fn contains_transaction(&self, id: &Hash) -> bool {
        self.state().contains(id)
    }

    pub fn contains_block(&self, hash: &Hash) -> bool {
        self.chain.iter().any(|block| block.current_hash() == hash)
    }

    /// Election candidates as of the tip. Built from the chain alone.
    pub fn stake_snapshot(&self) -> StakeSnapshot {
        AccountState::new(&self.chain, &[], self.config.default_stake).stake_snapshot()
    }

    pub fn last_block_view(&self) -> Option<LastBlockView> {
        self.tip().map(|block| LastBlockView {
            index: block.index(),
            validator: *block.validator(),
            transactions: block.transactions().to_vec(),
        })
    }

    // -----------------------------------------------------------------------
    // Transactions
    // -----------------------------------------------------------------------

    /// Verify `tx` against chain and pool and append it to the pool.
    pub fn admit_transaction(&mut self, tx: Transaction) -> Result<Admission, TxError> {
        let state = self.state();
        if state.contains_exact(&tx) {
            trace!("Transaction {} already known", tx.id());
            return Ok(Admission::AlreadyKnown);
        }
        if let Err(err) = state.check_transaction(&tx) {
            debug!("Rejected transaction {}: {err}", tx.id());
            return Err(err);
        }
        debug!("Admitted {tx}");
        self.pool.push(tx);
        Ok(Admission::Admitted)
    }

    // -----------------------------------------------------------------------
    // Minting
    // -----------------------------------------------------------------------

    /// The validator elected to extend the current tip.
    pub fn elected_validator(&self) -> Result<Address, MintError> {
        let tip = self.tip().ok_or(MintError::NoGenesis)?;
        Ok(election::elect(tip.current_hash(), &self.stake_snapshot())?)
    }

    /// The elected validator, once the pool holds a full block.
    pub fn should_mint(&self) -> Option<Address> {
        if self.pool.len() < self.config.capacity {
            return None;
        }
        self.elected_validator().ok()
    }

    /// Build, validate and append the next block from the first `capacity`
    /// pool transactions. Only those transactions leave the pool.
    pub fn mint_block(
        &mut self,
        local: &Address,
        timestamp: Option<u64>,
    ) -> Result<Block, MintError> {
        let capacity = self.config.capacity;
        let tip = self.tip().ok_or(MintError::NoGenesis)?;
        if self.pool.len() < capacity {
            return Err(MintError::PoolBelowCapacity {
                pooled: self.pool.len(),
                capacity,
            });
        }
        let elected = self.elected_validator()?;
        if elected != *local {
            return Err(MintError::NotElected {
                local: *local,
                elected,
            });
        }

        let block = Block::new(
            tip.index().saturating_add(1),
            self.pool[..capacity].to_vec(),
            *local,
            *tip.current_hash(),
            capacity,
            timestamp,
        )?;
        self.validate_block(&block)?;

        self.chain.push(block.clone());
        self.pool.drain(..capacity);
        info!(
            "Minted block {} ({}) with {} transactions",
            block.index(),
            block.current_hash(),
            block.transactions().len()
        );
        Ok(block)
    }

    // -----------------------------------------------------------------------
    // Blocks
    // -----------------------------------------------------------------------

    /// Check `block` as the successor of the current tip.
    pub fn validate_block(&self, block: &Block) -> Result<(), BlockError> {
        validate_block_against(&self.chain, block, &self.config)
    }

    /// Validate and append a block, then reconcile the pool.
    pub fn append_block(&mut self, block: Block) -> Result<Admission, BlockError> {
        if self.contains_block(block.current_hash()) {
            trace!("Block {} already in chain", block.current_hash());
            return Ok(Admission::AlreadyKnown);
        }
        if let Err(err) = self.validate_block(&block) {
            warn!("Rejected block {} ({}): {err}", block.index(), block.current_hash());
            return Err(err);
        }
        info!(
            "Appended block {} ({}) from {}",
            block.index(),
            block.current_hash(),
            block.validator().short()
        );
        self.chain.push(block);
        self.reconcile_pool();
        Ok(Admission::Admitted)
    }

    // -----------------------------------------------------------------------
    // Chains
    // -----------------------------------------------------------------------

    /// Re-validate the local chain from genesis.
    pub fn check_chain(&self) -> Result<(), ChainError> {
        validate_chain_blocks(&self.chain, &self.config)
    }

    pub fn validate_chain(&self) -> bool {
        self.check_chain().is_ok()
    }

    /// Replace the local chain with `candidate` if it is valid and strictly
    /// longer.
    pub fn try_adopt_chain(&mut self, candidate: Vec<Block>) -> Result<(), ChainError> {
        let Some(candidate_genesis) = candidate.first() else {
            return Err(ChainError::Empty);
        };
        if candidate.len() <= self.chain.len() {
            return Err(ChainError::ChainNotLonger {
                local: self.chain.len(),
                candidate: candidate.len(),
            });
        }
        if let Some(local_genesis) = self.chain.first() {
            if local_genesis.current_hash() != candidate_genesis.current_hash() {
                return Err(ChainError::GenesisMismatch {
                    local: *local_genesis.current_hash(),
                    candidate: *candidate_genesis.current_hash(),
                });
            }
        }
        validate_chain_blocks(&candidate, &self.config)?;

        info!(
            "Adopting chain of length {} (was {})",
            candidate.len(),
            self.chain.len()
        );
        self.chain = candidate;
        self.reconcile_pool();
        Ok(())
    }

    pub fn adopt_chain(&mut self, candidate: Vec<Block>) -> bool {
        match self.try_adopt_chain(candidate) {
            Ok(()) => true,
            Err(err) => {
                debug!("Candidate chain not adopted: {err}");
                false
            }
        }
    }

    /// Drop pool transactions that are on chain or no longer valid, keeping
    /// the rest in arrival order. Transactions from replaced local blocks are
    /// not re-queued.
    fn reconcile_pool(&mut self) {
        let pending = std::mem::take(&mut self.pool);
        let mut kept = Vec::with_capacity(pending.len());
        for tx in pending {
            let state = AccountState::new(&self.chain, &kept, self.config.default_stake);
            if state.contains_exact(&tx) {
                continue;
            }
            match state.check_transaction(&tx) {
                Ok(()) => kept.push(tx),
                Err(err) => debug!("Dropped pooled transaction {}: {err}", tx.id()),
            }
        }
        self.pool = kept;
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Check `block` as the successor of `prefix`.
///
/// Checks run cheapest first: parent linkage, hash recomputation, index and
/// capacity, the elected validator, then a replay of every transaction
/// against the prefix and the transactions before it in the block.
pub fn validate_block_against(
    prefix: &[Block],
    block: &Block,
    config: &LedgerConfig,
) -> Result<(), BlockError> {
    let Some(parent) = prefix.last() else {
        return validate_genesis_block(block, config);
    };

    if block.previous_hash() != parent.current_hash() {
        return Err(BlockError::PreviousHashMismatch {
            expected: *parent.current_hash(),
            got: *block.previous_hash(),
        });
    }
    check_hash(block)?;
    let expected_index = parent.index().saturating_add(1);
    if block.index() != expected_index {
        return Err(BlockError::IndexMismatch {
            expected: expected_index,
            got: block.index(),
        });
    }
    check_capacity(block, config)?;

    let snapshot = AccountState::new(prefix, &[], config.default_stake).stake_snapshot();
    let elected = election::elect(parent.current_hash(), &snapshot)?;
    if *block.validator() != elected {
        return Err(BlockError::ValidatorMismatch {
            expected: elected,
            got: *block.validator(),
        });
    }

    let transactions = block.transactions();
    for (position, tx) in transactions.iter().enumerate() {
        AccountState::new(prefix, &transactions[..position], config.default_stake)
            .check_transaction(tx)
            .map_err(|source| BlockError::InvalidTransaction { position, source })?;
    }
    Ok(())
}

/// Block 0: sentinel parent, index 0, only unsigned genesis credits from the
/// sentinel address. No election.
fn validate_genesis_block(block: &Block, config: &LedgerConfig) -> Result<(), BlockError> {
    if !block.previous_hash().is_genesis_parent() {
        return Err(BlockError::PreviousHashMismatch {
            expected: Hash::GENESIS_PARENT,
            got: *block.previous_hash(),
        });
    }
    check_hash(block)?;
    if block.index() != 0 {
        return Err(BlockError::IndexMismatch {
            expected: 0,
            got: block.index(),
        });
    }
    check_capacity(block, config)?;

    for (position, tx) in block.transactions().iter().enumerate() {
        if tx.kind() != TransactionKind::Genesis || !tx.sender().is_sentinel() {
            return Err(BlockError::InvalidTransaction {
                position,
                source: TxError::NotPermitted {
                    kind: tx.kind(),
                    reason: "block 0 holds only genesis credits from the sentinel address"
                        .to_string(),
                },
            });
        }
    }
    Ok(())
}

fn check_hash(block: &Block) -> Result<(), BlockError> {
    let computed = block.recompute_hash();
    if computed != *block.current_hash() {
        return Err(BlockError::BlockHashMismatch {
            claimed: *block.current_hash(),
            computed,
        });
    }
    Ok(())
}

fn check_capacity(block: &Block, config: &LedgerConfig) -> Result<(), BlockError> {
    if block.capacity() != config.capacity {
        return Err(BlockError::CapacityMismatch {
            expected: config.capacity,
            got: block.capacity(),
        });
    }
    if block.transactions().len() > block.capacity() {
        return Err(BlockError::CapacityExceeded {
            count: block.transactions().len(),
            capacity: block.capacity(),
        });
    }
    Ok(())
}

/// Validate every block of `blocks` against the blocks before it, replaying
/// stakes from the candidate's own genesis.
pub fn validate_chain_blocks(blocks: &[Block], config: &LedgerConfig) -> Result<(), ChainError> {
    if blocks.is_empty() {
        return Err(ChainError::Empty);
    }
    for (height, block) in blocks.iter().enumerate() {
        validate_block_against(&blocks[..height], block, config)
            .map_err(|source| ChainError::ChainInvalid { height, source })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            amount::coins,
            crypto::{Keypair, SECRET_KEY_BYTES},
            error::{ElectionError, ErrorKind},
            genesis::genesis_block,
        },
        assert_matches::assert_matches,
    };

    fn keypair(seed: u8) -> Keypair {
        Keypair::from_secret_bytes(&[seed; SECRET_KEY_BYTES])
    }

    fn bootstrapped(boot: &Keypair) -> Ledger {
        let config = LedgerConfig::dev_default();
        let genesis = genesis_block(&config, boot.address(), Some(0)).unwrap();
        let mut ledger = Ledger::new(config).unwrap();
        assert_eq!(ledger.append_block(genesis), Ok(Admission::Admitted));
        ledger
    }

    fn coin(from: &Keypair, to: Address, amount: Amount, nonce: u64) -> Transaction {
        Transaction::new(from.address(), to, TransactionKind::Coin, amount, "", nonce).sign(from)
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = LedgerConfig {
            capacity: 0,
            ..LedgerConfig::default()
        };
        assert_matches!(Ledger::new(config), Err(ConfigError::InvalidCapacity));
    }

    #[test]
    fn test_genesis_bootstraps_chain() {
        let boot = keypair(1);
        let ledger = bootstrapped(&boot);
        assert_eq!(ledger.chain().len(), 1);
        assert!(ledger.validate_chain());
        assert_eq!(ledger.balance_of(&boot.address()), coins(3000));
        assert_eq!(ledger.stake_of(&boot.address()), coins(10));
    }

    #[test]
    fn test_genesis_must_use_sentinel_parent() {
        let boot = keypair(1);
        let config = LedgerConfig::dev_default();
        let tx = Transaction::genesis(boot.address(), coins(1), "Genesis Block");
        let block = Block::new(0, vec![tx], boot.address(), crate::hash::hash(b"x"), 2, None).unwrap();
        let mut ledger = Ledger::new(config).unwrap();
        assert_matches!(
            ledger.append_block(block),
            Err(BlockError::PreviousHashMismatch { .. })
        );
        assert!(ledger.chain().is_empty());
    }

    #[test]
    fn test_genesis_rejects_signed_transfers() {
        let boot = keypair(1);
        let block = Block::new(
            0,
            vec![coin(&boot, keypair(2).address(), 1, 1)],
            boot.address(),
            Hash::GENESIS_PARENT,
            2,
            None,
        )
        .unwrap();
        let mut ledger = Ledger::new(LedgerConfig::dev_default()).unwrap();
        assert_matches!(
            ledger.append_block(block),
            Err(BlockError::InvalidTransaction { position: 0, .. })
        );
    }

    #[test]
    fn test_admit_then_duplicate_is_known() {
        let boot = keypair(1);
        let mut ledger = bootstrapped(&boot);
        let tx = coin(&boot, keypair(2).address(), coins(5), 1);
        assert_eq!(ledger.admit_transaction(tx.clone()), Ok(Admission::Admitted));
        assert_eq!(ledger.admit_transaction(tx), Ok(Admission::AlreadyKnown));
        assert_eq!(ledger.pool().len(), 1);
    }

    #[test]
    fn test_same_id_different_kind_is_not_known() {
        let boot = keypair(1);
        let alice = keypair(2).address();
        let mut ledger = bootstrapped(&boot);
        let pooled = coin(&boot, alice, coins(5), 1);
        let welcome =
            Transaction::new(boot.address(), alice, TransactionKind::Welcome, coins(5), "", 1).sign(&boot);
        assert_eq!(welcome.id(), pooled.id());
        assert_ne!(welcome, pooled);

        assert_eq!(ledger.admit_transaction(pooled), Ok(Admission::Admitted));
        assert_matches!(
            ledger.admit_transaction(welcome),
            Err(TxError::NonceMismatch { expected: 2, got: 1, .. })
        );
        assert_eq!(ledger.pool().len(), 1);
        assert_eq!(ledger.pool()[0].kind(), TransactionKind::Coin);
    }

    #[test]
    fn test_admission_rejects_without_partial_state() {
        let boot = keypair(1);
        let mut ledger = bootstrapped(&boot);
        let tx = coin(&boot, keypair(2).address(), coins(3000), 1);
        let err = ledger.admit_transaction(tx).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientBalance);
        assert!(ledger.pool().is_empty());
    }

    #[test]
    fn test_mint_takes_exactly_capacity() {
        let boot = keypair(1);
        let alice = keypair(2).address();
        let mut ledger = bootstrapped(&boot);
        for nonce in 1..=3 {
            ledger.admit_transaction(coin(&boot, alice, coins(1), nonce)).unwrap();
        }
        assert_eq!(ledger.should_mint(), Some(boot.address()));

        let genesis_hash = *ledger.chain()[0].current_hash();
        let block = ledger.mint_block(&boot.address(), None).unwrap();
        assert_eq!(block.index(), 1);
        assert_eq!(block.previous_hash(), &genesis_hash);
        assert_eq!(block.transactions().len(), 2);
        assert_eq!(ledger.chain().len(), 2);
        assert_eq!(ledger.pool().len(), 1);
        assert_eq!(ledger.pool()[0].nonce(), 3);
        assert!(ledger.validate_chain());
    }

    #[test]
    fn test_mint_preconditions() {
        let boot = keypair(1);
        let alice = keypair(2);
        let mut ledger = bootstrapped(&boot);
        ledger.admit_transaction(coin(&boot, alice.address(), 1, 1)).unwrap();
        assert_eq!(ledger.should_mint(), None);
        assert_matches!(
            ledger.mint_block(&boot.address(), None),
            Err(MintError::PoolBelowCapacity {
                pooled: 1,
                capacity: 2
            })
        );
        ledger.admit_transaction(coin(&boot, alice.address(), 1, 2)).unwrap();
        assert_matches!(
            ledger.mint_block(&alice.address(), None),
            Err(MintError::NotElected { .. })
        );
        assert_eq!(ledger.chain().len(), 1);
        assert_eq!(ledger.pool().len(), 2);

        let mut empty = Ledger::new(LedgerConfig::dev_default()).unwrap();
        assert_matches!(empty.mint_block(&boot.address(), None), Err(MintError::NoGenesis));
    }

    #[test]
    fn test_append_rejects_wrong_validator() {
        let boot = keypair(1);
        let alice = keypair(2);
        let ledger = bootstrapped(&boot);
        let tip = ledger.tip().unwrap();
        let block = Block::new(
            1,
            vec![coin(&boot, alice.address(), 1, 1)],
            alice.address(),
            *tip.current_hash(),
            2,
            None,
        )
        .unwrap();
        assert_matches!(
            ledger.validate_block(&block),
            Err(BlockError::ValidatorMismatch { .. })
        );
    }

    #[test]
    fn test_append_checks_linkage_before_hash() {
        let boot = keypair(1);
        let mut ledger = bootstrapped(&boot);
        let forged = Block::from_claimed_parts(
            1,
            0,
            Vec::new(),
            boot.address(),
            crate::hash::hash(b"elsewhere"),
            crate::hash::hash(b"forged"),
            2,
        );
        assert_matches!(
            ledger.append_block(forged),
            Err(BlockError::PreviousHashMismatch { .. })
        );

        let parent = *ledger.tip().unwrap().current_hash();
        let forged = Block::from_claimed_parts(1, 0, Vec::new(), boot.address(), parent, crate::hash::hash(b"forged"), 2);
        assert_matches!(
            ledger.append_block(forged),
            Err(BlockError::BlockHashMismatch { .. })
        );
    }

    #[test]
    fn test_append_rejects_overspending_block() {
        let boot = keypair(1);
        let alice = keypair(2).address();
        let mut ledger = bootstrapped(&boot);
        let parent = *ledger.tip().unwrap().current_hash();
        let block = Block::new(
            1,
            vec![
                coin(&boot, alice, coins(2000), 1),
                coin(&boot, alice, coins(2000), 2),
            ],
            boot.address(),
            parent,
            2,
            None,
        )
        .unwrap();
        assert_matches!(
            ledger.append_block(block),
            Err(BlockError::InvalidTransaction { position: 1, source: TxError::InsufficientBalance { .. } })
        );
    }

    #[test]
    fn test_append_reconciles_pool() {
        let boot = keypair(1);
        let alice = keypair(2).address();
        let mut local = bootstrapped(&boot);
        let mut remote = local.clone();

        let first = coin(&boot, alice, coins(1), 1);
        let second = coin(&boot, alice, coins(1), 2);
        let conflicting = coin(&boot, keypair(3).address(), coins(1), 1);

        remote.admit_transaction(first.clone()).unwrap();
        remote.admit_transaction(second.clone()).unwrap();
        let block = remote.mint_block(&boot.address(), None).unwrap();

        local.admit_transaction(conflicting).unwrap();
        local.admit_transaction(first).unwrap_err();
        assert_eq!(local.append_block(block.clone()), Ok(Admission::Admitted));
        // The conflicting nonce-1 transfer can no longer apply.
        assert!(local.pool().is_empty());
        assert_eq!(local.append_block(block), Ok(Admission::AlreadyKnown));
    }

    #[test]
    fn test_adopt_longer_chain() {
        let boot = keypair(1);
        let alice = keypair(2).address();
        let mut local = bootstrapped(&boot);
        let mut remote = local.clone();
        remote.admit_transaction(coin(&boot, alice, 1, 1)).unwrap();
        remote.admit_transaction(coin(&boot, alice, 1, 2)).unwrap();
        remote.mint_block(&boot.address(), None).unwrap();

        assert!(local.adopt_chain(remote.chain().to_vec()));
        assert_eq!(local.chain(), remote.chain());
        assert_eq!(local.balance_of(&alice), 2);
    }

    #[test]
    fn test_adopt_does_not_requeue_orphaned_transactions() {
        let boot = keypair(1);
        let alice = keypair(2);
        let carol = keypair(3).address();
        let mut local = bootstrapped(&boot);
        local.admit_transaction(coin(&boot, alice.address(), coins(100), 1)).unwrap();
        local.admit_transaction(coin(&boot, alice.address(), coins(100), 2)).unwrap();
        local.mint_block(&boot.address(), None).unwrap();
        let mut remote = local.clone();

        let orphaned = coin(&alice, carol, coins(1), 1);
        local.admit_transaction(orphaned.clone()).unwrap();
        local.admit_transaction(coin(&alice, carol, coins(1), 2)).unwrap();
        local.mint_block(&boot.address(), None).unwrap();

        for nonce in 3..7 {
            remote.admit_transaction(coin(&boot, alice.address(), 1, nonce)).unwrap();
        }
        remote.mint_block(&boot.address(), None).unwrap();
        remote.mint_block(&boot.address(), None).unwrap();

        assert!(local.adopt_chain(remote.chain().to_vec()));
        assert!(local.pool().is_empty());
        assert_eq!(local.balance_of(&carol), 0);
        // Still valid on the adopted chain, so it was dropped rather than rejected.
        assert_eq!(local.admit_transaction(orphaned), Ok(Admission::Admitted));
    }

    #[test]
    fn test_adopt_rejects_equal_shorter_and_empty() {
        let boot = keypair(1);
        let mut ledger = bootstrapped(&boot);
        let same = ledger.chain().to_vec();
        assert_matches!(
            ledger.try_adopt_chain(same),
            Err(ChainError::ChainNotLonger {
                local: 1,
                candidate: 1
            })
        );
        assert_matches!(ledger.try_adopt_chain(Vec::new()), Err(ChainError::Empty));
    }

    #[test]
    fn test_adopt_rejects_foreign_genesis() {
        let boot = keypair(1);
        let other = keypair(9);
        let mut local = bootstrapped(&boot);
        let mut remote = bootstrapped(&other);
        let alice = keypair(2).address();
        remote.admit_transaction(coin(&other, alice, 1, 1)).unwrap();
        remote.admit_transaction(coin(&other, alice, 1, 2)).unwrap();
        remote.mint_block(&other.address(), None).unwrap();
        assert_matches!(
            local.try_adopt_chain(remote.chain().to_vec()),
            Err(ChainError::GenesisMismatch { .. })
        );
        assert_eq!(local.chain().len(), 1);
    }

    #[test]
    fn test_empty_ledger_adopts_any_valid_chain() {
        let boot = keypair(1);
        let remote = bootstrapped(&boot);
        let mut fresh = Ledger::new(LedgerConfig::dev_default()).unwrap();
        assert_eq!(fresh.try_adopt_chain(remote.chain().to_vec()), Ok(()));
        assert!(fresh.validate_chain());
    }

    #[test]
    fn test_zero_stake_blocks_election() {
        let boot = keypair(1);
        let mut ledger = bootstrapped(&boot);
        let unstake = Transaction::new(boot.address(), Address::SENTINEL, TransactionKind::Stake, 0, "", 1)
            .sign(&boot);
        let filler = coin(&boot, keypair(2).address(), 1, 2);
        ledger.admit_transaction(unstake).unwrap();
        ledger.admit_transaction(filler).unwrap();
        ledger.mint_block(&boot.address(), None).unwrap();

        assert_eq!(ledger.stake_snapshot().total_stake(), 0);
        assert_matches!(
            ledger.elected_validator(),
            Err(MintError::Election(ElectionError::Undefined))
        );
    }

    #[test]
    fn test_last_block_view() {
        let boot = keypair(1);
        let ledger = bootstrapped(&boot);
        let view = ledger.last_block_view().unwrap();
        assert_eq!(view.index, 0);
        assert_eq!(view.validator, boot.address());
        assert_eq!(view.transactions.len(), 1);
        assert!(Ledger::new(LedgerConfig::dev_default()).unwrap().last_block_view().is_none());
    }
}
