//! Registry of known peers and their delivery health.

use {
    crate::{
        error::{ReplicationError, Result},
        message::PeerInfo,
    },
    blockchat_ledger::Address,
    log::{debug, info, warn},
    std::{collections::BTreeMap, time::Instant},
};

/// Delivery bookkeeping for a single peer.
#[derive(Debug, Clone)]
pub struct PeerConnection {
    pub info: PeerInfo,
    pub last_success: Option<Instant>,
    pub messages_sent: u64,
    pub messages_failed: u64,
    pub consecutive_failures: u32,
    /// Cleared after too many consecutive failures, set again on success.
    pub is_reachable: bool,
}

impl PeerConnection {
    pub fn new(info: PeerInfo) -> Self {
        Self {
            info,
            last_success: None,
            messages_sent: 0,
            messages_failed: 0,
            consecutive_failures: 0,
            is_reachable: true,
        }
    }

    pub fn record_success(&mut self) {
        self.messages_sent = self.messages_sent.saturating_add(1);
        self.consecutive_failures = 0;
        self.last_success = Some(Instant::now());
        self.is_reachable = true;
    }

    pub fn record_failure(&mut self, max_consecutive_failures: u32) {
        self.messages_failed = self.messages_failed.saturating_add(1);
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        if self.consecutive_failures >= max_consecutive_failures {
            self.is_reachable = false;
        }
    }
}

/// Known peers, keyed by address. The local node is never registered.
#[derive(Debug)]
pub struct PeerRegistry {
    local: Address,
    peers: BTreeMap<Address, PeerConnection>,
    max_peers: usize,
    max_consecutive_failures: u32,
}

impl PeerRegistry {
    pub fn new(local: Address, max_peers: usize, max_consecutive_failures: u32) -> Self {
        Self {
            local,
            peers: BTreeMap::new(),
            max_peers,
            max_consecutive_failures,
        }
    }

    pub fn local(&self) -> &Address {
        &self.local
    }

    /// Register a peer. Re-registering an address updates its id and
    /// endpoint and keeps its counters. Returns `true` if the peer is new.
    pub fn add_peer(&mut self, info: PeerInfo) -> Result<bool> {
        if info.address == self.local {
            debug!("Ignoring registration of local node {}", info.address);
            return Ok(false);
        }
        if let Some(existing) = self.peers.get_mut(&info.address) {
            debug!("Updating peer {} at {}", info.address, info.endpoint);
            existing.info = info;
            return Ok(false);
        }
        if self.peers.len() >= self.max_peers {
            warn!("Cannot add peer {}: max peers ({}) reached", info.address, self.max_peers);
            return Err(ReplicationError::MaxPeersReached(self.max_peers));
        }
        info!("Added peer {} (id {}) at {}", info.address, info.id, info.endpoint);
        self.peers.insert(info.address, PeerConnection::new(info));
        Ok(true)
    }

    /// Register every peer in an announced list, skipping the local node.
    pub fn add_peers(&mut self, peers: impl IntoIterator<Item = PeerInfo>) -> Result<usize> {
        let mut added = 0;
        for info in peers {
            if self.add_peer(info)? {
                added += 1;
            }
        }
        Ok(added)
    }

    pub fn remove_peer(&mut self, address: &Address) -> Option<PeerInfo> {
        let removed = self.peers.remove(address).map(|conn| conn.info);
        if removed.is_some() {
            info!("Removed peer {address}");
        }
        removed
    }

    pub fn get(&self, address: &Address) -> Option<&PeerConnection> {
        self.peers.get(address)
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    /// All peers in address order.
    pub fn peers(&self) -> Vec<PeerInfo> {
        self.peers.values().map(|conn| conn.info.clone()).collect()
    }

    pub fn reachable_peers(&self) -> Vec<PeerInfo> {
        self.peers
            .values()
            .filter(|conn| conn.is_reachable)
            .map(|conn| conn.info.clone())
            .collect()
    }

    pub fn record_success(&mut self, address: &Address) -> Result<()> {
        self.peers
            .get_mut(address)
            .ok_or(ReplicationError::UnknownPeer(*address))?
            .record_success();
        Ok(())
    }

    pub fn record_failure(&mut self, address: &Address) -> Result<()> {
        let max = self.max_consecutive_failures;
        let conn = self
            .peers
            .get_mut(address)
            .ok_or(ReplicationError::UnknownPeer(*address))?;
        let was_reachable = conn.is_reachable;
        conn.record_failure(max);
        if was_reachable && !conn.is_reachable {
            warn!(
                "Peer {address} unreachable after {} consecutive failures",
                conn.consecutive_failures
            );
        }
        Ok(())
    }
}
