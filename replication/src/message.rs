//! Replication wire envelope.
//!
//! Every message between nodes is a single JSON object tagged by `type`.
//! Payloads reuse the ledger's wire forms, so a transaction or block inside an
//! envelope is byte-for-byte its canonical encoding.

use {
    crate::error::{ReplicationError, Result},
    blockchat_ledger::{Address, BlockWire, ErrorKind, TransactionWire},
    serde::{Deserialize, Serialize},
};

/// A node known to the replication layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerInfo {
    /// Position of the node in the network, assigned at bootstrap.
    pub id: u32,
    /// The node's account address (its public key).
    pub address: Address,
    /// Transport-specific endpoint, e.g. `"10.0.0.2:5000"`.
    pub endpoint: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ReplicationMessage {
    // ── Gossip ──────────────────────────────────────────────────────────
    /// A transaction admitted by the sender.
    NewTransaction(TransactionWire),

    /// A block minted by the sender.
    NewBlock(BlockWire),

    // ── Fork resolution ─────────────────────────────────────────────────
    /// Ask a peer for its full chain.
    ChainRequest,

    /// A peer's full chain, in height order.
    ChainOffer(Vec<BlockWire>),

    /// Ask a peer for its pending transactions.
    PoolRequest,

    /// A peer's pending transactions, in admission order.
    PoolOffer(Vec<TransactionWire>),

    // ── Replies ─────────────────────────────────────────────────────────
    /// The message was applied, or was already known.
    Ack,

    /// The message was refused by the ledger.
    Rejected { kind: String, reason: String },

    // ── Membership ──────────────────────────────────────────────────────
    /// The full list of network participants, sent once bootstrap completes.
    PeerList(Vec<PeerInfo>),
}

impl ReplicationMessage {
    pub fn rejected(kind: ErrorKind, reason: impl ToString) -> Self {
        ReplicationMessage::Rejected {
            kind: kind.as_str().to_string(),
            reason: reason.to_string(),
        }
    }

    /// Encode as JSON, refusing anything over `max_size` bytes.
    pub fn encode(&self, max_size: usize) -> Result<Vec<u8>> {
        let bytes = serde_json::to_vec(self)?;
        if bytes.len() > max_size {
            return Err(ReplicationError::MessageTooLarge {
                size: bytes.len(),
                max: max_size,
            });
        }
        Ok(bytes)
    }

    /// Decode from JSON, refusing anything over `max_size` bytes.
    pub fn decode(bytes: &[u8], max_size: usize) -> Result<Self> {
        if bytes.len() > max_size {
            return Err(ReplicationError::MessageTooLarge {
                size: bytes.len(),
                max: max_size,
            });
        }
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Short label for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            ReplicationMessage::NewTransaction(_) => "NewTransaction",
            ReplicationMessage::NewBlock(_) => "NewBlock",
            ReplicationMessage::ChainRequest => "ChainRequest",
            ReplicationMessage::ChainOffer(_) => "ChainOffer",
            ReplicationMessage::PoolRequest => "PoolRequest",
            ReplicationMessage::PoolOffer(_) => "PoolOffer",
            ReplicationMessage::Ack => "Ack",
            ReplicationMessage::Rejected { .. } => "Rejected",
            ReplicationMessage::PeerList(_) => "PeerList",
        }
    }
}
