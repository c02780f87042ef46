//! Inbound message handling.
//!
//! [`InboundHandler`] is what a transport calls for every envelope a peer
//! sends. It maps the envelope onto the matching [`LedgerService`] entry
//! point and produces the reply.

use {
    crate::{
        error::Result,
        message::ReplicationMessage,
        peer_registry::PeerRegistry,
        sync::ChainSync,
    },
    blockchat_ledger::{Admission, ErrorKind, LedgerService},
    log::*,
    parking_lot::Mutex,
    std::sync::{Arc, OnceLock},
};

/// Reply `kind` for envelopes that make no sense as a request.
pub const UNEXPECTED_MESSAGE: &str = "UnexpectedMessage";
/// Reply `kind` for peer lists the registry could not take.
pub const PEER_LIST_REFUSED: &str = "PeerListRefused";

pub struct InboundHandler {
    service: Arc<LedgerService>,
    registry: Arc<Mutex<PeerRegistry>>,
    /// Run when a block arrives that does not extend the local tip.
    chain_sync: OnceLock<Arc<ChainSync>>,
    max_message_size: usize,
}

impl InboundHandler {
    pub fn new(
        service: Arc<LedgerService>,
        registry: Arc<Mutex<PeerRegistry>>,
        max_message_size: usize,
    ) -> Self {
        Self {
            service,
            registry,
            chain_sync: OnceLock::new(),
            max_message_size,
        }
    }

    /// Enable fork resolution on blocks that do not fit the local chain.
    /// Only the first call has an effect.
    pub fn set_chain_sync(&self, chain_sync: Arc<ChainSync>) {
        if self.chain_sync.set(chain_sync).is_err() {
            debug!("InboundHandler: chain sync already set");
        }
    }

    pub fn service(&self) -> &Arc<LedgerService> {
        &self.service
    }

    /// Decode, handle, encode. Undecodable input still gets a reply.
    pub fn handle_bytes(&self, bytes: &[u8]) -> Result<Vec<u8>> {
        let reply = match ReplicationMessage::decode(bytes, self.max_message_size) {
            Ok(message) => self.handle(message),
            Err(e) => {
                debug!("InboundHandler: undecodable message: {e}");
                ReplicationMessage::rejected(ErrorKind::MalformedWire, e)
            }
        };
        match reply.encode(self.max_message_size) {
            Ok(bytes) => Ok(bytes),
            Err(e) => {
                warn!("InboundHandler: reply {} could not be sent: {e}", reply.kind());
                ReplicationMessage::Rejected {
                    kind: UNEXPECTED_MESSAGE.to_string(),
                    reason: e.to_string(),
                }
                .encode(self.max_message_size)
            }
        }
    }

    pub fn handle(&self, message: ReplicationMessage) -> ReplicationMessage {
        trace!("InboundHandler: {}", message.kind());
        match message {
            ReplicationMessage::NewTransaction(tx) => {
                match self.service.submit_transaction(tx) {
                    Ok(_) => ReplicationMessage::Ack,
                    Err(e) => {
                        debug!("InboundHandler: transaction refused: {e}");
                        ReplicationMessage::rejected(e.kind(), e)
                    }
                }
            }
            ReplicationMessage::NewBlock(block) => {
                let index = block.index;
                match self.service.submit_block(block) {
                    Ok(Admission::Admitted) => {
                        debug!("InboundHandler: appended block {index}");
                        ReplicationMessage::Ack
                    }
                    Ok(Admission::AlreadyKnown) => ReplicationMessage::Ack,
                    Err(e) => {
                        info!("InboundHandler: block {index} refused: {e}");
                        if matches!(
                            e.kind(),
                            ErrorKind::PreviousHashMismatch | ErrorKind::IndexMismatch
                        ) {
                            self.resolve_fork();
                        }
                        ReplicationMessage::rejected(e.kind(), e)
                    }
                }
            }
            ReplicationMessage::ChainRequest => {
                ReplicationMessage::ChainOffer(self.service.snapshot_chain())
            }
            ReplicationMessage::ChainOffer(chain) => match self.service.try_submit_chain(chain) {
                Ok(()) => ReplicationMessage::Ack,
                Err(e) => ReplicationMessage::rejected(e.kind(), e),
            },
            ReplicationMessage::PoolRequest => {
                ReplicationMessage::PoolOffer(self.service.snapshot_pool())
            }
            ReplicationMessage::PoolOffer(pool) => {
                let offered = pool.len();
                let admitted = pool
                    .into_iter()
                    .filter(|tx| {
                        matches!(
                            self.service.submit_transaction(tx.clone()),
                            Ok(Admission::Admitted)
                        )
                    })
                    .count();
                debug!("InboundHandler: admitted {admitted} of {offered} pooled transactions");
                ReplicationMessage::Ack
            }
            ReplicationMessage::PeerList(peers) => match self.registry.lock().add_peers(peers) {
                Ok(added) => {
                    info!("InboundHandler: registered {added} new peers");
                    ReplicationMessage::Ack
                }
                Err(e) => ReplicationMessage::Rejected {
                    kind: PEER_LIST_REFUSED.to_string(),
                    reason: e.to_string(),
                },
            },
            other @ (ReplicationMessage::Ack | ReplicationMessage::Rejected { .. }) => {
                ReplicationMessage::Rejected {
                    kind: UNEXPECTED_MESSAGE.to_string(),
                    reason: format!("{} is a reply, not a request", other.kind()),
                }
            }
        }
    }

    fn resolve_fork(&self) {
        match self.chain_sync.get() {
            Some(sync) => {
                let outcome = sync.resolve();
                debug!("InboundHandler: fork resolution {outcome:?}");
            }
            None => trace!("InboundHandler: no chain sync configured"),
        }
    }
}
