//! BlockChat replication layer.
//!
//! Everything between a node's [`LedgerService`](blockchat_ledger::LedgerService)
//! and the network:
//!
//! - **Envelope** — one JSON object per message, tagged by `type`, carrying
//!   the ledger's canonical transaction and block encodings.
//! - **Broadcast** — ledger events drained by a relay thread and delivered to
//!   every registered peer through a pluggable [`Transport`].
//! - **Dispatch** — inbound envelopes mapped onto ledger entry points, with a
//!   reply for each.
//! - **Chain sync** — longest-valid-chain fork resolution and pool catch-up.
//!
//! The concrete transport (HTTP, TCP, in-process) is left to the embedder.
//!
//! ## Modules
//!
//! | Module          | Purpose                                         |
//! |-----------------|-------------------------------------------------|
//! | `config`        | Limits and timings                              |
//! | `error`         | Error types                                     |
//! | `message`       | Wire envelope and peer descriptor               |
//! | `peer_registry` | Known peers and delivery health                 |
//! | `broadcast`     | Transport trait, fan-out and event relay thread |
//! | `dispatch`      | Inbound message handling                        |
//! | `sync`          | Fork resolution and pool catch-up               |
//! | `node`          | Wiring of one replicating node                  |

pub mod broadcast;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod message;
pub mod node;
pub mod peer_registry;
pub mod sync;

pub use {
    broadcast::{BroadcastReport, Broadcaster, EventRelay, Transport},
    config::ReplicationConfig,
    dispatch::InboundHandler,
    error::{ReplicationError, Result},
    message::{PeerInfo, ReplicationMessage},
    node::ReplicationNode,
    peer_registry::{PeerConnection, PeerRegistry},
    sync::{ChainSync, SyncOutcome},
};
