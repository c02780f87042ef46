//! Wiring of one replicating node.

use {
    crate::{
        broadcast::{BroadcastReport, Broadcaster, EventRelay, Transport},
        config::ReplicationConfig,
        dispatch::InboundHandler,
        error::Result,
        message::{PeerInfo, ReplicationMessage},
        peer_registry::PeerRegistry,
        sync::ChainSync,
    },
    blockchat_ledger::{Address, ConfigError, LedgerEvent, LedgerService},
    crossbeam_channel::{bounded, Sender},
    log::*,
    parking_lot::Mutex,
    std::{
        sync::{atomic::AtomicBool, Arc},
        thread,
        time::Duration,
    },
};

/// A ledger service together with the replication components around it.
///
/// ```text
///  transport ──▶ InboundHandler ──▶ LedgerService ──▶ EventRelay ──▶ Broadcaster
///                      │                                                 ▲
///                      └──────────────▶ ChainSync ───────────────────────┘
/// ```
pub struct ReplicationNode {
    service: Arc<LedgerService>,
    registry: Arc<Mutex<PeerRegistry>>,
    broadcaster: Arc<Broadcaster>,
    handler: Arc<InboundHandler>,
    chain_sync: Arc<ChainSync>,
    relay: EventRelay,
}

impl ReplicationNode {
    /// Build the ledger with `make_service` and start relaying its events.
    pub fn start<F>(
        config: &ReplicationConfig,
        local: Address,
        transport: Arc<dyn Transport>,
        exit: Arc<AtomicBool>,
        make_service: F,
    ) -> Result<Self>
    where
        F: FnOnce(Sender<LedgerEvent>) -> std::result::Result<LedgerService, ConfigError>,
    {
        let (sender, receiver) = bounded(config.event_channel_capacity);
        let service = Arc::new(make_service(sender)?);
        let registry = Arc::new(Mutex::new(PeerRegistry::new(
            local,
            config.max_peers,
            config.max_consecutive_failures,
        )));
        let broadcaster = Arc::new(Broadcaster::new(
            registry.clone(),
            transport,
            config.max_message_size,
        ));
        let chain_sync = Arc::new(ChainSync::new(service.clone(), broadcaster.clone()));
        let handler = Arc::new(InboundHandler::new(
            service.clone(),
            registry.clone(),
            config.max_message_size,
        ));
        handler.set_chain_sync(chain_sync.clone());
        let relay = EventRelay::new(
            receiver,
            broadcaster.clone(),
            exit,
            Duration::from_millis(config.relay_poll_interval_ms),
        )?;
        info!("ReplicationNode {local} started");
        Ok(Self {
            service,
            registry,
            broadcaster,
            handler,
            chain_sync,
            relay,
        })
    }

    pub fn service(&self) -> &Arc<LedgerService> {
        &self.service
    }

    /// Entry point for the transport's inbound side.
    pub fn handler(&self) -> &Arc<InboundHandler> {
        &self.handler
    }

    pub fn registry(&self) -> &Arc<Mutex<PeerRegistry>> {
        &self.registry
    }

    pub fn chain_sync(&self) -> &Arc<ChainSync> {
        &self.chain_sync
    }

    pub fn register_peers(&self, peers: impl IntoIterator<Item = PeerInfo>) -> Result<usize> {
        self.registry.lock().add_peers(peers)
    }

    /// Tell every registered peer about the full membership, as the
    /// bootstrap node does once every participant has joined.
    pub fn announce_peers(&self, peers: Vec<PeerInfo>) -> Result<BroadcastReport> {
        self.broadcaster
            .broadcast(&ReplicationMessage::PeerList(peers))
    }

    /// Wait for the relay thread. It stops once the exit flag is set.
    pub fn join(self) -> thread::Result<()> {
        self.relay.join()
    }
}
