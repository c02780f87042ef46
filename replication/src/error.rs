//! Error types for the replication layer.

use {
    blockchat_ledger::{Address, ConfigError},
    thiserror::Error,
};

/// Errors that can occur in the replication layer.
#[derive(Error, Debug)]
pub enum ReplicationError {
    /// Failed to encode or decode a message.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Message exceeds the maximum allowed size.
    #[error("message too large: {size} bytes (max {max} bytes)")]
    MessageTooLarge { size: usize, max: usize },

    /// The peer is not registered.
    #[error("unknown peer: {0}")]
    UnknownPeer(Address),

    /// Maximum peer count has been reached.
    #[error("maximum peers reached: {0}")]
    MaxPeersReached(usize),

    /// The ledger event channel is closed.
    #[error("event channel closed")]
    ChannelClosed,

    /// The transport failed to deliver a message to a peer.
    #[error("transport error to peer {peer}: {reason}")]
    Transport { peer: Address, reason: String },

    /// A peer replied with something other than what was asked for.
    #[error("unexpected reply from peer {peer}: {kind}")]
    UnexpectedReply { peer: Address, kind: &'static str },

    /// The ledger could not be constructed.
    #[error("ledger config error: {0}")]
    Config(#[from] ConfigError),

    /// Thread spawn or other OS-level failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for replication operations.
pub type Result<T> = std::result::Result<T, ReplicationError>;
