//! JSON wire forms of transactions and blocks.
//!
//! Wire structs hold plain strings so that decoding a peer's message never
//! fails inside serde on a bad key or hash; conversion into the typed values
//! reports those problems as ledger errors instead. Fields are declared in
//! lexicographic order, so serializing a wire value yields the canonical
//! encoding.
//!
//! `transaction_id` and `current_hash` are carried for reference only: ids are
//! recomputed on receipt and block hashes are re-verified by the ledger.

use {
    crate::{
        address::Address,
        amount::Amount,
        block::Block,
        crypto::Signature,
        error::{BlockError, TxError},
        hash::Hash,
        transaction::{Transaction, TransactionKind},
    },
    serde::{Deserialize, Serialize},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionWire {
    pub amount: Amount,
    pub message: String,
    pub nonce: u64,
    pub receiver_address: String,
    pub sender_address: String,
    pub signature: Option<String>,
    pub transaction_id: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl From<&Transaction> for TransactionWire {
    fn from(tx: &Transaction) -> Self {
        Self {
            amount: tx.amount(),
            message: tx.message().to_string(),
            nonce: tx.nonce(),
            receiver_address: tx.receiver().to_string(),
            sender_address: tx.sender().to_string(),
            signature: tx.signature().map(ToString::to_string),
            transaction_id: tx.id().to_string(),
            kind: tx.kind().to_string(),
        }
    }
}

impl TryFrom<TransactionWire> for Transaction {
    type Error = TxError;

    fn try_from(wire: TransactionWire) -> Result<Self, Self::Error> {
        let kind: TransactionKind = wire.kind.parse()?;
        let sender = parse_address("sender_address", &wire.sender_address)?;
        let receiver = parse_address("receiver_address", &wire.receiver_address)?;
        let signature = wire
            .signature
            .as_deref()
            .map(|s| {
                s.parse::<Signature>().map_err(|e| TxError::SignatureInvalid {
                    reason: e.to_string(),
                })
            })
            .transpose()?;
        Ok(Transaction::from_parts(
            sender,
            receiver,
            kind,
            wire.amount,
            wire.message,
            wire.nonce,
            signature,
        ))
    }
}

fn parse_address(field: &'static str, value: &str) -> Result<Address, TxError> {
    value.parse().map_err(|e| TxError::Malformed {
        field,
        reason: format!("{e}"),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockWire {
    pub capacity: usize,
    pub current_hash: String,
    pub index: u64,
    pub previous_hash: String,
    pub timestamp: u64,
    pub transactions: Vec<TransactionWire>,
    pub validator: String,
}

impl From<&Block> for BlockWire {
    fn from(block: &Block) -> Self {
        Self {
            capacity: block.capacity(),
            current_hash: block.current_hash().to_string(),
            index: block.index(),
            previous_hash: block.previous_hash().to_string(),
            timestamp: block.timestamp(),
            transactions: block
                .transactions()
                .iter()
                .map(TransactionWire::from)
                .collect(),
            validator: block.validator().to_string(),
        }
    }
}

impl TryFrom<BlockWire> for Block {
    type Error = BlockError;

    /// Keeps the claimed `current_hash`; the ledger re-verifies it.
    fn try_from(wire: BlockWire) -> Result<Self, Self::Error> {
        let current_hash = parse_hash("current_hash", &wire.current_hash)?;
        let previous_hash = parse_hash("previous_hash", &wire.previous_hash)?;
        let validator: Address = wire.validator.parse().map_err(|e| BlockError::Malformed {
            field: "validator",
            reason: format!("{e}"),
        })?;
        let transactions = wire
            .transactions
            .into_iter()
            .enumerate()
            .map(|(position, tx)| {
                Transaction::try_from(tx)
                    .map_err(|source| BlockError::InvalidTransaction { position, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Block::from_claimed_parts(
            wire.index,
            wire.timestamp,
            transactions,
            validator,
            previous_hash,
            current_hash,
            wire.capacity,
        ))
    }
}

fn parse_hash(field: &'static str, value: &str) -> Result<Hash, BlockError> {
    value.parse().map_err(|e| BlockError::Malformed {
        field,
        reason: format!("{e}"),
    })
}

/// Decode a whole chain, reporting the height of the first bad block.
pub fn blocks_from_wire(chain: Vec<BlockWire>) -> Result<Vec<Block>, (usize, BlockError)> {
    chain
        .into_iter()
        .enumerate()
        .map(|(height, wire)| Block::try_from(wire).map_err(|e| (height, e)))
        .collect()
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            amount::coins,
            crypto::{Keypair, SECRET_KEY_BYTES},
        },
        assert_matches::assert_matches,
    };

    fn keypair(seed: u8) -> Keypair {
        Keypair::from_secret_bytes(&[seed; SECRET_KEY_BYTES])
    }

    fn sample_tx() -> Transaction {
        let a = keypair(1);
        Transaction::new(a.address(), keypair(2).address(), TransactionKind::Coin, coins(3), "", 1).sign(&a)
    }

    #[test]
    fn test_wire_json_is_canonical_encoding() {
        let tx = sample_tx();
        let json = serde_json::to_string(&TransactionWire::from(&tx)).unwrap();
        assert_eq!(json, tx.canonical_value().to_string());
    }

    #[test]
    fn test_transaction_survives_json() {
        let tx = sample_tx();
        let json = serde_json::to_string(&TransactionWire::from(&tx)).unwrap();
        let wire: TransactionWire = serde_json::from_str(&json).unwrap();
        let back = Transaction::try_from(wire).unwrap();
        assert_eq!(back, tx);
        assert!(back.verify());
    }

    #[test]
    fn test_claimed_id_is_ignored() {
        let tx = sample_tx();
        let mut wire = TransactionWire::from(&tx);
        wire.transaction_id = "ff".repeat(32);
        let back = Transaction::try_from(wire).unwrap();
        assert_eq!(back.id(), tx.id());
    }

    #[test]
    fn test_unknown_type_and_bad_fields() {
        let mut wire = TransactionWire::from(&sample_tx());
        wire.kind = "bribe".to_string();
        assert_matches!(
            Transaction::try_from(wire.clone()),
            Err(TxError::UnknownTransactionType(kind)) if kind == "bribe"
        );

        wire.kind = "coin".to_string();
        wire.sender_address = "not base64!".to_string();
        assert_matches!(
            Transaction::try_from(wire.clone()),
            Err(TxError::Malformed {
                field: "sender_address",
                ..
            })
        );

        wire.sender_address = keypair(1).address().to_string();
        wire.signature = Some("AAAA".to_string());
        assert_matches!(
            Transaction::try_from(wire),
            Err(TxError::SignatureInvalid { .. })
        );
    }

    #[test]
    fn test_block_survives_json() {
        let a = keypair(1);
        let block = Block::new(4, vec![sample_tx()], a.address(), crate::hash::hash(b"p"), 3, Some(9)).unwrap();
        let json = serde_json::to_string(&BlockWire::from(&block)).unwrap();
        let wire: BlockWire = serde_json::from_str(&json).unwrap();
        let back = Block::try_from(wire).unwrap();
        assert_eq!(back, block);
        assert!(back.has_valid_hash());
    }

    #[test]
    fn test_genesis_parent_travels_as_one() {
        let a = keypair(1);
        let block = Block::new(0, vec![sample_tx()], a.address(), Hash::GENESIS_PARENT, 3, Some(0)).unwrap();
        let mut wire = BlockWire::from(&block);
        assert_eq!(wire.previous_hash, "1");
        let back = Block::try_from(wire.clone()).unwrap();
        assert!(back.previous_hash().is_genesis_parent());
        assert!(back.has_valid_hash());

        wire.previous_hash = format!("{}1", "0".repeat(63));
        assert_matches!(
            Block::try_from(wire),
            Err(BlockError::Malformed { field: "previous_hash", .. })
        );
    }

    #[test]
    fn test_block_wire_reports_bad_transaction_position() {
        let a = keypair(1);
        let block = Block::new(1, vec![sample_tx(), sample_tx()], a.address(), Hash::GENESIS_PARENT, 3, Some(0)).unwrap();
        let mut wire = BlockWire::from(&block);
        wire.transactions[1].kind = "gift".to_string();
        assert_matches!(
            Block::try_from(wire.clone()),
            Err(BlockError::InvalidTransaction { position: 1, .. })
        );
        assert_matches!(blocks_from_wire(vec![BlockWire::from(&block), wire]), Err((1, _)));
    }
}
