//! Outbound fan-out of ledger events.
//!
//! [`Broadcaster`] delivers one envelope to every registered peer through a
//! pluggable [`Transport`], recording per-peer delivery health.
//! [`EventRelay`] is the long-running thread that drains the ledger's event
//! channel and hands each event to the broadcaster.
//!
//! ```text
//!  LedgerService ──LedgerEvent──▶ EventRelay ──▶ Broadcaster ──▶ Transport
//!                 (crossbeam)     (thread)        │
//!                                                 └─▶ PeerRegistry (health)
//! ```

use {
    crate::{
        error::{ReplicationError, Result},
        message::{PeerInfo, ReplicationMessage},
        peer_registry::PeerRegistry,
    },
    blockchat_ledger::LedgerEvent,
    crossbeam_channel::{Receiver, RecvTimeoutError},
    log::*,
    parking_lot::Mutex,
    std::{
        sync::{
            atomic::{AtomicBool, Ordering},
            Arc,
        },
        thread::{self, Builder, JoinHandle},
        time::Duration,
    },
};

/// Request/response delivery of encoded envelopes to a single peer.
///
/// Implementations own framing and connection handling. A reply is always
/// expected, even if it is only an `Ack`.
pub trait Transport: Send + Sync {
    fn request(&self, peer: &PeerInfo, payload: &[u8]) -> Result<Vec<u8>>;
}

/// Outcome of one broadcast.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Peers that applied the message or already knew it.
    pub accepted: usize,
    /// Peers that answered with `Rejected`.
    pub rejected: usize,
    /// Peers the transport could not reach or whose reply was unreadable.
    pub failed: usize,
}

pub struct Broadcaster {
    registry: Arc<Mutex<PeerRegistry>>,
    transport: Arc<dyn Transport>,
    max_message_size: usize,
}

impl Broadcaster {
    pub fn new(
        registry: Arc<Mutex<PeerRegistry>>,
        transport: Arc<dyn Transport>,
        max_message_size: usize,
    ) -> Self {
        Self {
            registry,
            transport,
            max_message_size,
        }
    }

    pub fn registry(&self) -> &Arc<Mutex<PeerRegistry>> {
        &self.registry
    }

    /// Send `message` to one peer and decode its reply.
    pub fn request(&self, peer: &PeerInfo, message: &ReplicationMessage) -> Result<ReplicationMessage> {
        let payload = message.encode(self.max_message_size)?;
        self.request_encoded(peer, &payload)
    }

    fn request_encoded(&self, peer: &PeerInfo, payload: &[u8]) -> Result<ReplicationMessage> {
        let reply = self
            .transport
            .request(peer, payload)
            .and_then(|bytes| ReplicationMessage::decode(&bytes, self.max_message_size));
        let mut registry = self.registry.lock();
        let recorded = match &reply {
            Ok(_) => registry.record_success(&peer.address),
            Err(_) => registry.record_failure(&peer.address),
        };
        if let Err(e) = recorded {
            debug!("Delivery to unregistered peer {}: {e}", peer.address);
        }
        reply
    }

    /// Deliver `message` to every registered peer. Failures are logged and
    /// counted, never propagated.
    pub fn broadcast(&self, message: &ReplicationMessage) -> Result<BroadcastReport> {
        let payload = message.encode(self.max_message_size)?;
        // Snapshot so the registry lock is not held across network calls.
        let peers = self.registry.lock().peers();
        let mut report = BroadcastReport::default();
        for peer in &peers {
            match self.request_encoded(peer, &payload) {
                Ok(ReplicationMessage::Rejected { kind, reason }) => {
                    debug!(
                        "Peer {} rejected {}: {kind} ({reason})",
                        peer.address,
                        message.kind()
                    );
                    report.rejected += 1;
                }
                Ok(_) => report.accepted += 1,
                Err(e) => {
                    warn!("Failed to deliver {} to peer {}: {e}", message.kind(), peer.address);
                    report.failed += 1;
                }
            }
        }
        trace!("Broadcast {} to {} peers: {report:?}", message.kind(), peers.len());
        Ok(report)
    }
}

/// Envelope announcing a ledger event.
pub fn event_message(event: LedgerEvent) -> ReplicationMessage {
    match event {
        LedgerEvent::NewTransactionAdmitted(tx) => ReplicationMessage::NewTransaction(tx),
        LedgerEvent::NewBlockMinted(block) => ReplicationMessage::NewBlock(block),
    }
}

/// Background thread relaying ledger events to all peers.
pub struct EventRelay {
    thread: JoinHandle<()>,
}

impl EventRelay {
    /// Start the relay. It runs until `exit` is set or every event sender has
    /// been dropped.
    pub fn new(
        events: Receiver<LedgerEvent>,
        broadcaster: Arc<Broadcaster>,
        exit: Arc<AtomicBool>,
        poll_interval: Duration,
    ) -> Result<Self> {
        let thread = Builder::new()
            .name("blockchatRelay".to_string())
            .spawn(move || Self::run(&events, &broadcaster, &exit, poll_interval))
            .map_err(ReplicationError::Io)?;
        Ok(Self { thread })
    }

    pub fn join(self) -> thread::Result<()> {
        self.thread.join()
    }

    fn run(
        events: &Receiver<LedgerEvent>,
        broadcaster: &Broadcaster,
        exit: &AtomicBool,
        poll_interval: Duration,
    ) {
        info!("EventRelay: started");
        loop {
            if exit.load(Ordering::Relaxed) {
                info!("EventRelay: exit signal received, shutting down");
                break;
            }
            match events.recv_timeout(poll_interval) {
                Ok(event) => {
                    let name = event.name();
                    if let Err(e) = broadcaster.broadcast(&event_message(event)) {
                        error!("EventRelay: could not broadcast {name}: {e}");
                    }
                }
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => {
                    info!("EventRelay: event channel closed, shutting down");
                    break;
                }
            }
        }
    }
}
