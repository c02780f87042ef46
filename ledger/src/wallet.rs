//! A node's keypair and transaction builders.

use {
    crate::{
        address::Address,
        amount::Amount,
        crypto::Keypair,
        transaction::{Transaction, TransactionKind},
    },
    std::fmt,
};

pub struct Wallet {
    keypair: Keypair,
}

impl Wallet {
    pub fn new(keypair: Keypair) -> Self {
        Self { keypair }
    }

    pub fn generate() -> Self {
        Self::new(Keypair::generate())
    }

    pub fn address(&self) -> Address {
        self.keypair.address()
    }

    pub fn keypair(&self) -> &Keypair {
        &self.keypair
    }

    fn build(
        &self,
        receiver: Address,
        kind: TransactionKind,
        amount: Amount,
        message: &str,
        nonce: u64,
    ) -> Transaction {
        Transaction::new(self.address(), receiver, kind, amount, message, nonce).sign(&self.keypair)
    }

    /// Signed coin transfer.
    pub fn transfer(&self, receiver: Address, amount: Amount, nonce: u64) -> Transaction {
        self.build(receiver, TransactionKind::Coin, amount, "", nonce)
    }

    /// Signed text message. Carries no amount.
    pub fn message(&self, receiver: Address, text: &str, nonce: u64) -> Transaction {
        self.build(receiver, TransactionKind::Message, 0, text, nonce)
    }

    /// Signed stake deposit. Replaces any earlier stake.
    pub fn stake(&self, amount: Amount, nonce: u64) -> Transaction {
        self.build(Address::SENTINEL, TransactionKind::Stake, amount, "", nonce)
    }

    /// Signed welcome credit. Only accepted from the genesis recipient.
    pub fn welcome(&self, receiver: Address, amount: Amount, nonce: u64) -> Transaction {
        self.build(receiver, TransactionKind::Welcome, amount, "", nonce)
    }
}

impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}
