//! Configuration for the replication layer.

/// Limits and timings of the replication layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplicationConfig {
    /// Maximum number of registered peers.
    pub max_peers: usize,

    /// Maximum size of a single encoded message in bytes. A full chain offer
    /// is the largest message.
    pub max_message_size: usize,

    /// How often the relay thread checks the exit flag while idle (ms).
    pub relay_poll_interval_ms: u64,

    /// Capacity of the ledger event channel.
    pub event_channel_capacity: usize,

    /// Consecutive delivery failures after which a peer is marked unreachable.
    pub max_consecutive_failures: u32,
}

impl Default for ReplicationConfig {
    fn default() -> Self {
        Self {
            max_peers: 64,
            max_message_size: 16 * 1024 * 1024,
            relay_poll_interval_ms: 50,
            event_channel_capacity: 10_000,
            max_consecutive_failures: 3,
        }
    }
}

impl ReplicationConfig {
    /// Create a config suitable for local testing.
    #[cfg(any(test, feature = "dev-context-only-utils"))]
    pub fn dev_default() -> Self {
        Self {
            max_peers: 8,
            max_message_size: 1_048_576,
            relay_poll_interval_ms: 5,
            event_channel_capacity: 1_000,
            max_consecutive_failures: 2,
        }
    }
}
