//! Balances, stakes and nonces derived by replaying transactions.
//!
//! Nothing here is stored. An [`AccountState`] borrows a chain prefix and a
//! list of pending transactions (the pool, or the transactions preceding a
//! position inside a block under validation) and answers queries by walking
//! them.

use {
    crate::{
        address::Address,
        amount::Amount,
        block::Block,
        error::TxError,
        hash::Hash,
        stake_snapshot::StakeSnapshot,
        transaction::{Transaction, TransactionKind},
    },
    std::collections::BTreeSet,
};

/// Read-only view over `chain` followed by `pending`.
#[derive(Debug, Clone, Copy)]
pub struct AccountState<'a> {
    chain: &'a [Block],
    pending: &'a [Transaction],
    default_stake: Amount,
}

impl<'a> AccountState<'a> {
    pub fn new(chain: &'a [Block], pending: &'a [Transaction], default_stake: Amount) -> Self {
        Self {
            chain,
            pending,
            default_stake,
        }
    }

    /// Chain transactions in block order, then pending transactions.
    pub fn transactions(self) -> impl Iterator<Item = &'a Transaction> {
        self.chain
            .iter()
            .flat_map(|block| block.transactions().iter())
            .chain(self.pending.iter())
    }

    /// Credits minus debits. Negative only if the replayed history overspent.
    pub fn raw_balance(&self, address: &Address) -> i128 {
        self.transactions().fold(0i128, |mut balance, tx| {
            if tx.receiver() == address && credits_receiver(tx.kind()) {
                balance += i128::from(tx.amount());
            }
            if tx.sender() == address {
                balance -= tx.sender_cost() as i128;
            }
            balance
        })
    }

    /// Spendable balance, clamped to `[0, Amount::MAX]`.
    pub fn balance(&self, address: &Address) -> Amount {
        let raw = self.raw_balance(address).max(0);
        Amount::try_from(raw).unwrap_or(Amount::MAX)
    }

    /// Amount of the most recent stake sent by `address`, pending first,
    /// or the default stake if it never staked.
    pub fn stake(&self, address: &Address) -> Amount {
        self.pending
            .iter()
            .rev()
            .find(|tx| is_stake_from(tx, address))
            .map(Transaction::amount)
            .unwrap_or_else(|| self.chain_stake(address))
    }

    /// Like [`AccountState::stake`] but ignoring pending transactions.
    pub fn chain_stake(&self, address: &Address) -> Amount {
        self.chain
            .iter()
            .rev()
            .flat_map(|block| block.transactions().iter().rev())
            .find(|tx| is_stake_from(tx, address))
            .map(Transaction::amount)
            .unwrap_or(self.default_stake)
    }

    /// The nonce the next transaction from `address` must carry.
    pub fn next_nonce(&self, address: &Address) -> u64 {
        self.transactions()
            .filter(|tx| tx.sender() == address)
            .map(Transaction::nonce)
            .max()
            .map_or(1, |nonce| nonce.saturating_add(1))
    }

    /// The bootstrap node: the validator of block 0.
    pub fn genesis_recipient(&self) -> Option<&'a Address> {
        self.chain.first().map(Block::validator)
    }

    /// Every address that joined the chain: credited by a genesis or welcome
    /// transaction, or sender of a stake.
    pub fn participants(&self) -> BTreeSet<Address> {
        self.chain
            .iter()
            .flat_map(|block| block.transactions().iter())
            .filter_map(|tx| match tx.kind() {
                TransactionKind::Genesis | TransactionKind::Welcome => Some(*tx.receiver()),
                TransactionKind::Stake => Some(*tx.sender()),
                TransactionKind::Coin | TransactionKind::Message => None,
            })
            .filter(|address| !address.is_sentinel())
            .collect()
    }

    /// Election candidates and their stakes as of the end of the chain.
    ///
    /// Pending transactions are ignored so that every node computes the same
    /// snapshot for the same chain regardless of its pool.
    pub fn stake_snapshot(&self) -> StakeSnapshot {
        self.participants()
            .into_iter()
            .map(|address| (address, self.chain_stake(&address)))
            .collect()
    }

    pub fn contains(&self, id: &Hash) -> bool {
        self.transactions().any(|tx| tx.id() == id)
    }

    /// Whole-value match. The id leaves out the kind, so two different
    /// signed transactions can share one.
    pub fn contains_exact(&self, tx: &Transaction) -> bool {
        self.transactions().any(|known| known == tx)
    }

    /// Check `tx` as the next transaction after everything in this view:
    /// signature, kind rules, nonce, then balance.
    pub fn check_transaction(&self, tx: &Transaction) -> Result<(), TxError> {
        if tx.kind() == TransactionKind::Genesis {
            return Err(TxError::NotPermitted {
                kind: tx.kind(),
                reason: "genesis transactions are only valid in block 0".to_string(),
            });
        }
        if tx.sender().is_sentinel() {
            return Err(TxError::Malformed {
                field: "sender_address",
                reason: "the sentinel address cannot send".to_string(),
            });
        }
        if !tx.verify() {
            let reason = if tx.is_signed() {
                "signature does not match sender"
            } else {
                "missing signature"
            };
            return Err(TxError::SignatureInvalid {
                reason: reason.to_string(),
            });
        }

        self.check_kind_rules(tx)?;

        let expected = self.next_nonce(tx.sender());
        if tx.nonce() != expected {
            return Err(TxError::NonceMismatch {
                sender: *tx.sender(),
                expected,
                got: tx.nonce(),
            });
        }

        let required = tx.sender_cost();
        let available = self.raw_balance(tx.sender());
        if available < required as i128 {
            return Err(TxError::InsufficientBalance {
                available,
                required,
            });
        }
        Ok(())
    }

    fn check_kind_rules(&self, tx: &Transaction) -> Result<(), TxError> {
        let not_permitted = |reason: &str| {
            Err(TxError::NotPermitted {
                kind: tx.kind(),
                reason: reason.to_string(),
            })
        };
        match tx.kind() {
            TransactionKind::Stake if !tx.receiver().is_sentinel() => {
                not_permitted("stake must be sent to the sentinel address")
            }
            TransactionKind::Coin | TransactionKind::Message | TransactionKind::Welcome
                if tx.receiver().is_sentinel() =>
            {
                not_permitted("receiver must not be the sentinel address")
            }
            TransactionKind::Message if tx.amount() != 0 => {
                not_permitted("message transactions carry no amount")
            }
            TransactionKind::Welcome if self.genesis_recipient() != Some(tx.sender()) => {
                not_permitted("only the genesis recipient may send welcome credits")
            }
            _ => Ok(()),
        }
    }
}

fn credits_receiver(kind: TransactionKind) -> bool {
    matches!(
        kind,
        TransactionKind::Coin | TransactionKind::Genesis | TransactionKind::Welcome
    )
}

fn is_stake_from(tx: &Transaction, address: &Address) -> bool {
    tx.kind() == TransactionKind::Stake && tx.sender() == address
}
