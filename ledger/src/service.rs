//! Thread-safe ledger entry points for the networking layer.
//!
//! [`LedgerService`] owns the ledger behind a single mutex. Admission, mint,
//! block append and chain adoption each run entirely under that lock, so the
//! tip and the pool are observed consistently through every multi-step
//! validation. Events for the networking layer are sent on a crossbeam
//! channel only after the guard has been dropped.
//!
//! ```text
//!  peers / local user
//!        │ submit_transaction / submit_block / submit_chain
//!        ▼
//!  ┌──────────────────────────────┐
//!  │ LedgerService                │
//!  │   Mutex<Ledger> ── try_mint  │
//!  └──────────────┬───────────────┘
//!                 │ LedgerEvent (after unlock)
//!                 ▼
//!          replication relay
//! ```

use {
    crate::{
        address::Address,
        amount::Amount,
        block::Block,
        config::{ConfigError, LedgerConfig},
        error::{BlockError, ChainError, TxError},
        genesis::genesis_block,
        ledger::{Admission, LastBlockView, Ledger},
        transaction::Transaction,
        wire::{blocks_from_wire, BlockWire, TransactionWire},
    },
    crossbeam_channel::Sender,
    log::*,
    parking_lot::Mutex,
};

/// Something the networking layer should broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerEvent {
    NewTransactionAdmitted(TransactionWire),
    NewBlockMinted(BlockWire),
}

impl LedgerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            LedgerEvent::NewTransactionAdmitted(_) => "NewTransactionAdmitted",
            LedgerEvent::NewBlockMinted(_) => "NewBlockMinted",
        }
    }
}

pub struct LedgerService {
    ledger: Mutex<Ledger>,
    /// Address this node mints as. `None` for observers.
    identity: Option<Address>,
    events: Sender<LedgerEvent>,
}

impl LedgerService {
    pub fn new(
        config: LedgerConfig,
        identity: Option<Address>,
        events: Sender<LedgerEvent>,
    ) -> Result<Self, ConfigError> {
        Ok(Self::from_ledger(Ledger::new(config)?, identity, events))
    }

    pub fn from_ledger(
        ledger: Ledger,
        identity: Option<Address>,
        events: Sender<LedgerEvent>,
    ) -> Self {
        Self {
            ledger: Mutex::new(ledger),
            identity,
            events,
        }
    }

    /// The bootstrap node: a ledger holding a fresh genesis block crediting
    /// `bootstrap`, which is also the minting identity.
    pub fn bootstrap(
        config: LedgerConfig,
        bootstrap: Address,
        events: Sender<LedgerEvent>,
    ) -> Result<Self, ConfigError> {
        let genesis = genesis_block(&config, bootstrap, None)?;
        let mut ledger = Ledger::new(config)?;
        ledger
            .append_block(genesis)
            .map_err(|e| ConfigError::Parse(format!("genesis block rejected: {e}")))?;
        Ok(Self::from_ledger(ledger, Some(bootstrap), events))
    }

    pub fn identity(&self) -> Option<&Address> {
        self.identity.as_ref()
    }

    // -----------------------------------------------------------------------
    // Inbound
    // -----------------------------------------------------------------------

    /// A transaction received from a peer. Not re-broadcast.
    pub fn submit_transaction(&self, wire: TransactionWire) -> Result<Admission, TxError> {
        let tx = Transaction::try_from(wire)?;
        self.admit(tx, false)
    }

    /// A transaction created on this node. Broadcast once admitted.
    pub fn submit_local_transaction(&self, tx: Transaction) -> Result<Admission, TxError> {
        self.admit(tx, true)
    }

    fn admit(&self, tx: Transaction, announce: bool) -> Result<Admission, TxError> {
        let mut events = Vec::new();
        let admission = {
            let mut ledger = self.ledger.lock();
            let admission = ledger.admit_transaction(tx.clone())?;
            if admission == Admission::Admitted {
                if announce {
                    events.push(LedgerEvent::NewTransactionAdmitted(TransactionWire::from(&tx)));
                }
                events.extend(minted_events(&self.mint_while_elected(&mut ledger)));
            }
            admission
        };
        self.emit(events);
        Ok(admission)
    }

    /// A block broadcast by its validator.
    pub fn submit_block(&self, wire: BlockWire) -> Result<Admission, BlockError> {
        let block = Block::try_from(wire)?;
        let (admission, events) = {
            let mut ledger = self.ledger.lock();
            let admission = ledger.append_block(block)?;
            let events = match admission {
                Admission::Admitted => minted_events(&self.mint_while_elected(&mut ledger)),
                Admission::AlreadyKnown => Vec::new(),
            };
            (admission, events)
        };
        self.emit(events);
        Ok(admission)
    }

    /// A peer's full chain. Adopted if valid and strictly longer.
    pub fn try_submit_chain(&self, chain: Vec<BlockWire>) -> Result<(), ChainError> {
        let blocks = blocks_from_wire(chain)
            .map_err(|(height, source)| ChainError::ChainInvalid { height, source })?;
        let events = {
            let mut ledger = self.ledger.lock();
            ledger.try_adopt_chain(blocks)?;
            minted_events(&self.mint_while_elected(&mut ledger))
        };
        self.emit(events);
        Ok(())
    }

    pub fn submit_chain(&self, chain: Vec<BlockWire>) -> bool {
        match self.try_submit_chain(chain) {
            Ok(()) => true,
            Err(err) => {
                debug!("Offered chain not adopted: {err}");
                false
            }
        }
    }

    // -----------------------------------------------------------------------
    // Minting
    // -----------------------------------------------------------------------

    /// Mint every block this node is elected for. Returns the minted blocks.
    pub fn try_mint(&self) -> Vec<Block> {
        let blocks = self.mint_while_elected(&mut self.ledger.lock());
        self.emit(minted_events(&blocks));
        blocks
    }

    fn mint_while_elected(&self, ledger: &mut Ledger) -> Vec<Block> {
        let Some(identity) = self.identity else {
            return Vec::new();
        };
        let mut minted = Vec::new();
        while ledger.should_mint() == Some(identity) {
            match ledger.mint_block(&identity, None) {
                Ok(block) => minted.push(block),
                Err(err) => {
                    warn!("Elected to mint but failed: {err}");
                    break;
                }
            }
        }
        minted
    }

    fn emit(&self, events: Vec<LedgerEvent>) {
        for event in events {
            trace!("Emitting {}", event.name());
            if let Err(e) = self.events.send(event) {
                warn!("Failed to deliver ledger event: {e}");
            }
        }
    }

    // -----------------------------------------------------------------------
    // Read-only exports
    // -----------------------------------------------------------------------

    pub fn snapshot_chain(&self) -> Vec<BlockWire> {
        self.ledger.lock().chain().iter().map(BlockWire::from).collect()
    }

    pub fn snapshot_pool(&self) -> Vec<TransactionWire> {
        self.ledger
            .lock()
            .pool()
            .iter()
            .map(TransactionWire::from)
            .collect()
    }

    pub fn chain_len(&self) -> usize {
        self.ledger.lock().chain().len()
    }

    pub fn pool_len(&self) -> usize {
        self.ledger.lock().pool().len()
    }

    pub fn balance_of(&self, address: &Address) -> Amount {
        self.ledger.lock().balance_of(address)
    }

    pub fn stake_of(&self, address: &Address) -> Amount {
        self.ledger.lock().stake_of(address)
    }

    pub fn next_nonce(&self, address: &Address) -> u64 {
        self.ledger.lock().next_nonce(address)
    }

    pub fn last_block_view(&self) -> Option<LastBlockView> {
        self.ledger.lock().last_block_view()
    }

    pub fn validate_chain(&self) -> bool {
        self.ledger.lock().validate_chain()
    }

    /// Run `f` against a consistent view of the ledger.
    pub fn with_ledger<R>(&self, f: impl FnOnce(&Ledger) -> R) -> R {
        f(&self.ledger.lock())
    }
}

fn minted_events(blocks: &[Block]) -> Vec<LedgerEvent> {
    blocks
        .iter()
        .map(|block| LedgerEvent::NewBlockMinted(BlockWire::from(block)))
        .collect()
}
