//! Error types for the ledger.
//!
//! Every error is recoverable at the service boundary and carries a stable
//! [`ErrorKind`] discriminant next to its human-readable message. The CLI and
//! HTTP layers map kinds to exit codes and status codes.

use {
    crate::{address::Address, hash::Hash, transaction::TransactionKind},
    thiserror::Error,
};

/// Stable discriminant shared by all ledger errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    SignatureInvalid,
    NonceMismatch,
    InsufficientBalance,
    UnknownTransactionType,
    TransactionNotPermitted,
    MalformedWire,
    BlockHashMismatch,
    PreviousHashMismatch,
    ValidatorMismatch,
    IndexMismatch,
    CapacityExceeded,
    ChainNotLonger,
    ChainInvalid,
    GenesisMismatch,
    ElectionUndefined,
    NotElected,
    PoolBelowCapacity,
    InvalidConfig,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::SignatureInvalid => "SignatureInvalid",
            ErrorKind::NonceMismatch => "NonceMismatch",
            ErrorKind::InsufficientBalance => "InsufficientBalance",
            ErrorKind::UnknownTransactionType => "UnknownTransactionType",
            ErrorKind::TransactionNotPermitted => "TransactionNotPermitted",
            ErrorKind::MalformedWire => "MalformedWire",
            ErrorKind::BlockHashMismatch => "BlockHashMismatch",
            ErrorKind::PreviousHashMismatch => "PreviousHashMismatch",
            ErrorKind::ValidatorMismatch => "ValidatorMismatch",
            ErrorKind::IndexMismatch => "IndexMismatch",
            ErrorKind::CapacityExceeded => "CapacityExceeded",
            ErrorKind::ChainNotLonger => "ChainNotLonger",
            ErrorKind::ChainInvalid => "ChainInvalid",
            ErrorKind::GenesisMismatch => "GenesisMismatch",
            ErrorKind::ElectionUndefined => "ElectionUndefined",
            ErrorKind::NotElected => "NotElected",
            ErrorKind::PoolBelowCapacity => "PoolBelowCapacity",
            ErrorKind::InvalidConfig => "InvalidConfig",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Transactions
// ---------------------------------------------------------------------------

/// Why a transaction was not admitted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TxError {
    #[error("signature invalid: {reason}")]
    SignatureInvalid { reason: String },

    #[error("nonce mismatch for {sender}: expected {expected}, got {got}")]
    NonceMismatch {
        sender: Address,
        expected: u64,
        got: u64,
    },

    #[error("insufficient balance: {available} units available, {required} required")]
    InsufficientBalance { available: i128, required: u128 },

    #[error("unknown transaction type {0:?}")]
    UnknownTransactionType(String),

    #[error("{kind} transaction not permitted: {reason}")]
    NotPermitted {
        kind: TransactionKind,
        reason: String,
    },

    #[error("malformed transaction field {field}: {reason}")]
    Malformed { field: &'static str, reason: String },
}

impl TxError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TxError::SignatureInvalid { .. } => ErrorKind::SignatureInvalid,
            TxError::NonceMismatch { .. } => ErrorKind::NonceMismatch,
            TxError::InsufficientBalance { .. } => ErrorKind::InsufficientBalance,
            TxError::UnknownTransactionType(_) => ErrorKind::UnknownTransactionType,
            TxError::NotPermitted { .. } => ErrorKind::TransactionNotPermitted,
            TxError::Malformed { .. } => ErrorKind::MalformedWire,
        }
    }
}

// ---------------------------------------------------------------------------
// Blocks
// ---------------------------------------------------------------------------

/// Why a block was not appended.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlockError {
    #[error("previous hash mismatch: expected {expected}, got {got}")]
    PreviousHashMismatch { expected: Hash, got: Hash },

    #[error("block hash mismatch: claimed {claimed}, computed {computed}")]
    BlockHashMismatch { claimed: Hash, computed: Hash },

    #[error("block index mismatch: expected {expected}, got {got}")]
    IndexMismatch { expected: u64, got: u64 },

    #[error("block holds {count} transactions, capacity is {capacity}")]
    CapacityExceeded { count: usize, capacity: usize },

    #[error("block capacity {got} differs from configured capacity {expected}")]
    CapacityMismatch { expected: usize, got: usize },

    #[error("validator mismatch: elected {expected}, block names {got}")]
    ValidatorMismatch { expected: Address, got: Address },

    #[error(transparent)]
    Election(#[from] ElectionError),

    #[error("transaction {position} rejected: {source}")]
    InvalidTransaction {
        position: usize,
        #[source]
        source: TxError,
    },

    #[error("malformed block field {field}: {reason}")]
    Malformed { field: &'static str, reason: String },
}

impl BlockError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BlockError::PreviousHashMismatch { .. } => ErrorKind::PreviousHashMismatch,
            BlockError::BlockHashMismatch { .. } => ErrorKind::BlockHashMismatch,
            BlockError::IndexMismatch { .. } => ErrorKind::IndexMismatch,
            BlockError::CapacityExceeded { .. } | BlockError::CapacityMismatch { .. } => {
                ErrorKind::CapacityExceeded
            }
            BlockError::ValidatorMismatch { .. } => ErrorKind::ValidatorMismatch,
            BlockError::Election(e) => e.kind(),
            BlockError::InvalidTransaction { source, .. } => source.kind(),
            BlockError::Malformed { .. } => ErrorKind::MalformedWire,
        }
    }
}

// ---------------------------------------------------------------------------
// Chains
// ---------------------------------------------------------------------------

/// Why a candidate chain was not adopted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    #[error("candidate chain of length {candidate} is not longer than local length {local}")]
    ChainNotLonger { local: usize, candidate: usize },

    #[error("candidate chain invalid at height {height}: {source}")]
    ChainInvalid {
        height: usize,
        #[source]
        source: BlockError,
    },

    #[error("candidate chain is empty")]
    Empty,

    #[error("candidate genesis {candidate} differs from local genesis {local}")]
    GenesisMismatch { local: Hash, candidate: Hash },
}

impl ChainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ChainError::ChainNotLonger { .. } => ErrorKind::ChainNotLonger,
            ChainError::ChainInvalid { .. } | ChainError::Empty => ErrorKind::ChainInvalid,
            ChainError::GenesisMismatch { .. } => ErrorKind::GenesisMismatch,
        }
    }
}

// ---------------------------------------------------------------------------
// Election and minting
// ---------------------------------------------------------------------------

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElectionError {
    /// Zero total stake: nobody can be chosen until some stake exists.
    #[error("election undefined: total stake is zero")]
    Undefined,
}

impl ElectionError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::ElectionUndefined
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MintError {
    #[error("pool holds {pooled} transactions, block capacity is {capacity}")]
    PoolBelowCapacity { pooled: usize, capacity: usize },

    #[error("{local} is not the elected validator ({elected})")]
    NotElected { local: Address, elected: Address },

    #[error("cannot mint on an empty chain")]
    NoGenesis,

    #[error(transparent)]
    Election(#[from] ElectionError),

    #[error("minted block failed validation: {0}")]
    Block(#[from] BlockError),
}

impl MintError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MintError::PoolBelowCapacity { .. } => ErrorKind::PoolBelowCapacity,
            MintError::NotElected { .. } => ErrorKind::NotElected,
            MintError::NoGenesis => ErrorKind::ChainInvalid,
            MintError::Election(e) => e.kind(),
            MintError::Block(e) => e.kind(),
        }
    }
}
