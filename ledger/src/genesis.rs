//! Block 0.

use {
    crate::{
        address::Address,
        block::Block,
        config::{ConfigError, LedgerConfig},
        hash::Hash,
        transaction::Transaction,
    },
    log::*,
};

pub const GENESIS_MESSAGE: &str = "Genesis Block";

/// The bootstrap node's genesis block: a single unsigned credit of
/// `genesis_allocation_per_node * total_nodes` from the sentinel address to
/// `bootstrap`, validated by `bootstrap` itself.
pub fn genesis_block(
    config: &LedgerConfig,
    bootstrap: Address,
    timestamp: Option<u64>,
) -> Result<Block, ConfigError> {
    config.validate()?;
    let allocation = config.genesis_allocation()?;
    let credit = Transaction::genesis(bootstrap, allocation, GENESIS_MESSAGE);
    let block = Block::new(
        0,
        vec![credit],
        bootstrap,
        Hash::GENESIS_PARENT,
        config.capacity,
        timestamp,
    )
    // A single transaction always fits a validated capacity.
    .map_err(|_| ConfigError::InvalidCapacity)?;
    info!(
        "Created genesis block {} crediting {} to {}",
        block.current_hash(),
        crate::amount::format_amount(allocation),
        bootstrap.short()
    );
    Ok(block)
}
