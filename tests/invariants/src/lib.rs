//! BlockChat Property-Based Invariant Tests
//!
//! Uses proptest to verify critical ledger invariants across:
//! - Chain integrity and fork choice
//! - Validator election
//! - Accounting: fees, supply and nonces

pub mod accounting_invariants;
pub mod chain_invariants;
pub mod election_invariants;

#[cfg(test)]
pub(crate) mod fixtures {
    use blockchat_ledger::{
        crypto::SECRET_KEY_BYTES, genesis_block, Keypair, Ledger, LedgerConfig, Wallet,
    };

    pub fn wallet(seed: u8) -> Wallet {
        Wallet::new(Keypair::from_secret_bytes(&[seed; SECRET_KEY_BYTES]))
    }

    pub fn config(capacity: usize) -> LedgerConfig {
        LedgerConfig {
            capacity,
            total_nodes: 3,
            ..LedgerConfig::default()
        }
    }

    /// A ledger holding only a genesis block crediting `boot`.
    pub fn bootstrapped(config: LedgerConfig, boot: &Wallet) -> Ledger {
        let genesis = genesis_block(&config, boot.address(), Some(0)).unwrap();
        let mut ledger = Ledger::new(config).unwrap();
        ledger.append_block(genesis).unwrap();
        ledger
    }

    /// Extend `ledger` by `blocks` blocks of transfers from `boot`, who stays
    /// the only election participant and so mints every block.
    pub fn extend(ledger: &mut Ledger, boot: &Wallet, blocks: usize) {
        let receiver = wallet(200).address();
        for _ in 0..blocks {
            for _ in 0..ledger.capacity() {
                let nonce = ledger.next_nonce(&boot.address());
                ledger
                    .admit_transaction(boot.transfer(receiver, 1, nonce))
                    .unwrap();
            }
            ledger.mint_block(&boot.address(), Some(0)).unwrap();
        }
    }
}
