//! BlockChat proof-of-stake ledger.
//!
//! A replicated, append-only chain of blocks holding signed, fee-bearing
//! transactions. The validator of each block is drawn by a deterministic,
//! stake-weighted election seeded with the parent block's hash, and forks are
//! resolved by adopting the longest valid chain.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │                  LedgerService                   │
//! │   Mutex<Ledger> ─────────────▶ LedgerEvent tx    │
//! │  ┌────────────────────────────────────────────┐  │
//! │  │                  Ledger                    │  │
//! │  │   chain: Vec<Block>   pool: Vec<Tx>        │  │
//! │  │  ┌──────────────┐   ┌──────────────────┐   │  │
//! │  │  │ AccountState │──▶│ StakeSnapshot    │   │  │
//! │  │  │  (replay)    │   │  └─▶ election    │   │  │
//! │  │  └──────────────┘   └──────────────────┘   │  │
//! │  └────────────────────────────────────────────┘  │
//! │   Block ◀── Transaction ◀── crypto, hash         │
//! └──────────────────────────────────────────────────┘
//! ```
//!
//! Balances, stakes and nonces are never stored; [`AccountState`] derives
//! them by replaying the chain and the pool.

pub mod account_state;
pub mod address;
pub mod amount;
pub mod block;
pub mod config;
pub mod crypto;
pub mod election;
pub mod error;
pub mod genesis;
pub mod hash;
pub mod ledger;
pub mod service;
pub mod stake_snapshot;
pub mod transaction;
pub mod wallet;
pub mod wire;

// Re-exports for convenience
pub use account_state::AccountState;
pub use address::Address;
pub use amount::{coins, Amount, UNITS_PER_COIN};
pub use block::Block;
pub use config::{ConfigError, LedgerConfig};
pub use crypto::{generate_keypair, sign, verify, Keypair, Signature};
pub use election::{elect, is_elected};
pub use error::{BlockError, ChainError, ElectionError, ErrorKind, MintError, TxError};
pub use genesis::genesis_block;
pub use hash::Hash;
pub use ledger::{Admission, LastBlockView, Ledger};
pub use service::{LedgerEvent, LedgerService};
pub use stake_snapshot::{StakeEntry, StakeSnapshot};
pub use transaction::{Transaction, TransactionKind};
pub use wallet::Wallet;
pub use wire::{BlockWire, TransactionWire};
