//! Longest-chain fork resolution.
//!
//! When a node suspects it has fallen behind or forked (a peer's block did
//! not extend its tip), it asks every reachable peer for its full chain and
//! tries the offers longest first. The first one the ledger accepts wins;
//! offers that are not strictly longer than the local chain are never tried.

use {
    crate::{broadcast::Broadcaster, error::ReplicationError, message::ReplicationMessage},
    blockchat_ledger::{Address, BlockWire, LedgerService},
    log::*,
    std::sync::Arc,
};

/// Result of a resolution round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// A peer's chain replaced the local one.
    Adopted { from: Address, height: usize },
    /// No offer was both longer and valid.
    Unchanged,
}

pub struct ChainSync {
    service: Arc<LedgerService>,
    broadcaster: Arc<Broadcaster>,
}

impl ChainSync {
    pub fn new(service: Arc<LedgerService>, broadcaster: Arc<Broadcaster>) -> Self {
        Self {
            service,
            broadcaster,
        }
    }

    /// Ask every reachable peer for its chain and adopt the longest valid one.
    pub fn resolve(&self) -> SyncOutcome {
        let offers = self.collect_chain_offers();
        resolve_offers(&self.service, offers)
    }

    /// Chains offered by reachable peers. Unreachable or misbehaving peers are
    /// skipped.
    pub fn collect_chain_offers(&self) -> Vec<(Address, Vec<BlockWire>)> {
        let peers = self.broadcaster.registry().lock().reachable_peers();
        let mut offers = Vec::with_capacity(peers.len());
        for peer in peers {
            match self
                .broadcaster
                .request(&peer, &ReplicationMessage::ChainRequest)
            {
                Ok(ReplicationMessage::ChainOffer(chain)) => offers.push((peer.address, chain)),
                Ok(other) => {
                    let e = ReplicationError::UnexpectedReply {
                        peer: peer.address,
                        kind: other.kind(),
                    };
                    warn!("ChainSync: {e}");
                }
                Err(e) => warn!("ChainSync: chain request to {} failed: {e}", peer.address),
            }
        }
        offers
    }

    /// Pull pending transactions from every reachable peer. Returns how many
    /// were newly admitted.
    pub fn sync_pool(&self) -> usize {
        let peers = self.broadcaster.registry().lock().reachable_peers();
        let mut admitted = 0;
        for peer in peers {
            let pool = match self
                .broadcaster
                .request(&peer, &ReplicationMessage::PoolRequest)
            {
                Ok(ReplicationMessage::PoolOffer(pool)) => pool,
                Ok(other) => {
                    warn!("ChainSync: unexpected {} to pool request from {}", other.kind(), peer.address);
                    continue;
                }
                Err(e) => {
                    warn!("ChainSync: pool request to {} failed: {e}", peer.address);
                    continue;
                }
            };
            for tx in pool {
                match self.service.submit_transaction(tx) {
                    Ok(blockchat_ledger::Admission::Admitted) => admitted += 1,
                    Ok(blockchat_ledger::Admission::AlreadyKnown) => {}
                    Err(e) => debug!("ChainSync: pooled transaction from {} refused: {e}", peer.address),
                }
            }
        }
        admitted
    }
}

/// Try `offers` longest first and adopt the first one the ledger accepts.
/// Among equally long offers the earlier one is tried first.
pub fn resolve_offers(
    service: &LedgerService,
    mut offers: Vec<(Address, Vec<BlockWire>)>,
) -> SyncOutcome {
    offers.sort_by(|a, b| b.1.len().cmp(&a.1.len()));
    let local = service.chain_len();
    for (from, chain) in offers {
        let height = chain.len();
        if height <= local {
            // sorted, nothing after this can be longer
            break;
        }
        match service.try_submit_chain(chain) {
            Ok(()) => {
                info!("ChainSync: adopted chain of {height} blocks from {from}");
                return SyncOutcome::Adopted { from, height };
            }
            Err(e) => info!("ChainSync: chain of {height} blocks from {from} refused: {e}"),
        }
    }
    debug!("ChainSync: kept local chain of {local} blocks");
    SyncOutcome::Unchanged
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        blockchat_ledger::{LedgerConfig, LedgerEvent, Wallet},
        crossbeam_channel::{unbounded, Receiver},
    };

    fn config() -> LedgerConfig {
        LedgerConfig {
            capacity: 1,
            total_nodes: 2,
            ..LedgerConfig::default()
        }
    }

    fn bootstrap() -> (LedgerService, Wallet, Receiver<LedgerEvent>) {
        let (sender, receiver) = unbounded();
        let wallet = Wallet::generate();
        let service = LedgerService::bootstrap(config(), wallet.address(), sender).unwrap();
        (service, wallet, receiver)
    }

    #[test]
    fn test_longest_valid_offer_wins() {
        let (source, wallet, _events) = bootstrap();
        let peer = Wallet::generate().address();
        let short = source.snapshot_chain();
        source.submit_local_transaction(wallet.transfer(peer, 1, 1)).unwrap();
        let medium = source.snapshot_chain();
        source.submit_local_transaction(wallet.transfer(peer, 1, 2)).unwrap();
        let long = source.snapshot_chain();
        assert_eq!(long.len(), 3);

        let mut tampered = long.clone();
        tampered.push(long[2].clone());

        let (sender, _rx) = unbounded();
        let target = LedgerService::new(config(), None, sender).unwrap();
        let a = Wallet::generate().address();
        let b = Wallet::generate().address();
        let c = Wallet::generate().address();
        let d = Wallet::generate().address();
        let outcome = resolve_offers(
            &target,
            vec![(a, short), (b, tampered), (c, medium), (d, long)],
        );
        assert_eq!(outcome, SyncOutcome::Adopted { from: d, height: 3 });
        assert_eq!(target.chain_len(), 3);
        assert_eq!(target.balance_of(&peer), 2);
    }

    #[test]
    fn test_offers_not_longer_are_ignored() {
        let (source, _wallet, _events) = bootstrap();
        let chain = source.snapshot_chain();
        let outcome = resolve_offers(&source, vec![(Wallet::generate().address(), chain)]);
        assert_eq!(outcome, SyncOutcome::Unchanged);
        assert_eq!(resolve_offers(&source, Vec::new()), SyncOutcome::Unchanged);
    }
}
